//! Presentation projections: chart series, metric cards, number formatting.
//!
//! Everything here is display-ready but renderer-agnostic; the TUI and the
//! plain-text report both consume these types.

use crate::analysis::{DeltaStyle, Growth, Metric};
use crate::data::LabelTable;
use crate::domain::Dataset;

pub mod format;

pub use format::*;

/// One chart sample: x = year, y = count, grouped by `series`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub year: i32,
    pub count: f64,
    pub series: String,
}

/// All points of one category, sorted by year.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<(i32, f64)>,
}

/// What a metric card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub delta: String,
    pub style: DeltaStyle,
}

/// Flat (year, count, category) tuples. Rows without a count are skipped.
pub fn chart_points(dataset: &Dataset) -> Vec<ChartPoint> {
    dataset
        .records
        .iter()
        .filter_map(|r| {
            r.value().map(|count| ChartPoint {
                year: r.year,
                count,
                series: r.category.clone(),
            })
        })
        .collect()
}

/// Group points by category, one series per entry of `order` that has data.
///
/// Categories missing from `order` are appended in order of appearance.
pub fn chart_series(dataset: &Dataset, order: &[String], table: &LabelTable) -> Vec<ChartSeries> {
    let mut keys: Vec<&str> = order.iter().map(String::as_str).collect();
    for r in &dataset.records {
        if !keys.contains(&r.category.as_str()) {
            keys.push(&r.category);
        }
    }

    let points = chart_points(dataset);
    keys.into_iter()
        .filter_map(|key| {
            let mut pts: Vec<(i32, f64)> = points
                .iter()
                .filter(|p| p.series == key)
                .map(|p| (p.year, p.count))
                .collect();
            if pts.is_empty() {
                return None;
            }
            pts.sort_by_key(|(year, _)| *year);
            Some(ChartSeries {
                name: table.label(key).to_string(),
                points: pts,
            })
        })
        .collect()
}

/// Cards for the metrics row, labels in the table's locale.
pub fn metric_cards(metrics: &[Metric], table: &LabelTable) -> Vec<MetricCard> {
    metrics
        .iter()
        .map(|m| MetricCard {
            label: table.metric_label(&m.category),
            value: m.last.map(fmt_count).unwrap_or_else(|| NOT_APPLICABLE.to_string()),
            delta: fmt_growth(m.growth),
            style: m.growth.style(),
        })
        .collect()
}

pub const NOT_APPLICABLE: &str = "n/a";

/// Whole number with thousands separators, e.g. `12,345`.
pub fn fmt_count(v: f64) -> String {
    fmt_thousands(v, 0)
}

/// Multiplier with two decimals, e.g. `1.50x`, or `n/a`.
pub fn fmt_growth(growth: Growth) -> String {
    match growth {
        Growth::Ratio(r) => format!("{}x", fmt_thousands(r, 2)),
        Growth::NotApplicable => NOT_APPLICABLE.to_string(),
    }
}

/// Fixed-point formatting with `,` between groups of three integer digits.
pub fn fmt_thousands(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return NOT_APPLICABLE.to_string();
    }
    let raw = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    let negative = v < 0.0 && raw.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
