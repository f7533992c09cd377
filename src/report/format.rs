//! Plain-text rendering for the `report` command.
//!
//! We keep formatting code in one place so the TUI and the text report agree
//! on what is shown, and output changes stay localized.

use crate::analysis::{categories, modes, year_bounds};
use crate::data::LabelTable;
use crate::data::localize::SOURCE_URL;
use crate::data::Snapshot;
use crate::domain::Selection;
use crate::report::MetricCard;

/// Cards per row on the dashboard.
pub const CARD_COLUMNS: usize = 4;

const CARD_WIDTH: usize = 26;

/// Dataset header: title, source, fetch time, bounds and available options.
pub fn format_summary(snapshot: &Snapshot, selection: &Selection, table: &LabelTable) -> String {
    let dataset = &snapshot.dataset;
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", table.text.title));
    out.push_str(&format!("{} ({SOURCE_URL})\n", table.text.source_name));
    out.push_str(&format!("{}\n", table.text.source_note));
    out.push_str(&format!(
        "Fetched: {} | records={}\n",
        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S"),
        dataset.len()
    ));

    match year_bounds(dataset) {
        Some(b) => out.push_str(&format!("{}: {}..={}\n", table.fields.year, b.min, b.max)),
        None => out.push_str(&format!("{}: -\n", table.fields.year)),
    }

    let available_modes = modes(dataset);
    if available_modes.is_empty() {
        out.push_str(&format!("! {}\n", table.text.no_modes));
    } else {
        out.push_str(&format!("{}: {}\n", table.fields.mode, join_labels(&available_modes, table)));
    }

    let available_categories = categories(dataset);
    if available_categories.is_empty() {
        out.push_str(&format!("! {}\n", table.text.no_categories));
    } else {
        out.push_str(&format!(
            "{}: {}\n",
            table.fields.category,
            join_labels(&available_categories, table)
        ));
    }

    out.push('\n');
    out.push_str(&format_selection(selection, table));
    out
}

/// One line per control: years, mode, categories.
pub fn format_selection(selection: &Selection, table: &LabelTable) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}..={}\n",
        table.text.year_prompt, selection.from_year, selection.to_year
    ));
    out.push_str(&format!("{} {}\n", table.text.mode_prompt, table.label(&selection.mode)));
    let cats = if selection.categories.is_empty() {
        "-".to_string()
    } else {
        join_labels(&selection.categories, table)
    };
    out.push_str(&format!("{} {cats}\n", table.text.category_prompt));
    out
}

/// Metric cards as a text grid, `columns` per row.
pub fn format_cards(heading: &str, cards: &[MetricCard], columns: usize) -> String {
    let columns = columns.max(1);
    let mut out = String::new();
    out.push_str(&format!("--- {heading} ---\n"));

    for row in cards.chunks(columns) {
        let labels: Vec<String> = row.iter().map(|c| pad(&c.label, CARD_WIDTH)).collect();
        let values: Vec<String> = row.iter().map(|c| pad(&c.value, CARD_WIDTH)).collect();
        let deltas: Vec<String> = row.iter().map(|c| pad(&c.delta, CARD_WIDTH)).collect();
        for line in [labels, values, deltas] {
            out.push_str(line.join(" ").trim_end());
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

fn join_labels(values: &[String], table: &LabelTable) -> String {
    values.iter().map(|v| table.label(v)).collect::<Vec<_>>().join(", ")
}

fn pad(s: &str, width: usize) -> String {
    let s = truncate(s, width);
    let len = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(len)))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
