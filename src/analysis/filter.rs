//! Row filtering and option discovery.

use crate::domain::{Dataset, Record, YearBounds};

/// Rows with the given mode, a selected category, and a year in `from_year..=to_year`.
///
/// Row order is preserved. An empty result is a normal outcome.
pub fn filter(dataset: &Dataset, mode: &str, categories: &[String], from_year: i32, to_year: i32) -> Dataset {
    let records = dataset
        .records
        .iter()
        .filter(|r| matches(r, mode, categories, from_year, to_year))
        .cloned()
        .collect();
    dataset.with_records(records)
}

/// Rows with the given mode, every category and year.
pub fn filter_by_mode(dataset: &Dataset, mode: &str) -> Dataset {
    let records = dataset.records.iter().filter(|r| r.mode == mode).cloned().collect();
    dataset.with_records(records)
}

fn matches(r: &Record, mode: &str, categories: &[String], from_year: i32, to_year: i32) -> bool {
    r.mode == mode && categories.iter().any(|c| *c == r.category) && from_year <= r.year && r.year <= to_year
}

/// Smallest and largest year present, `None` for an empty dataset.
pub fn year_bounds(dataset: &Dataset) -> Option<YearBounds> {
    let min = dataset.records.iter().map(|r| r.year).min()?;
    let max = dataset.records.iter().map(|r| r.year).max()?;
    Some(YearBounds { min, max })
}

/// Distinct mode values in order of first appearance.
pub fn modes(dataset: &Dataset) -> Vec<String> {
    distinct(dataset.records.iter().map(|r| r.mode.as_str()))
}

/// Distinct category values in order of first appearance.
pub fn categories(dataset: &Dataset) -> Vec<String> {
    distinct(dataset.records.iter().map(|r| r.category.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|seen| seen == v) {
            out.push(v.to_string());
        }
    }
    out
}
