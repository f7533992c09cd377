//! Start-year to end-year growth per category.
//!
//! Lookups are explicit: `lookup_count` distinguishes "no such row"
//! (`DataError::MissingData`) from "row present, count absent" (`Ok(None)`).
//! `compute_growth` turns both into `Growth::NotApplicable` so a single bad
//! category never takes down the rest of the metrics.

use log::debug;

use crate::analysis::filter::filter_by_mode;
use crate::domain::Dataset;
use crate::error::DataError;

/// How a delta should be colored by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaStyle {
    /// A numeric multiplier. Declines and growth look the same.
    Normal,
    /// Greyed out, no number to show.
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Growth {
    /// `last / first`.
    Ratio(f64),
    NotApplicable,
}

impl Growth {
    pub fn style(self) -> DeltaStyle {
        match self {
            Growth::Ratio(_) => DeltaStyle::Normal,
            Growth::NotApplicable => DeltaStyle::Off,
        }
    }
}

/// Growth of one category between the first and last selected year.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub category: String,
    pub first: Option<f64>,
    pub last: Option<f64>,
    pub growth: Growth,
}

/// Count for one (category, year, mode) row.
///
/// When several rows match, the first one in dataset order wins.
pub fn lookup_count(dataset: &Dataset, category: &str, year: i32, mode: &str) -> Result<Option<f64>, DataError> {
    dataset
        .records
        .iter()
        .find(|r| r.category == category && r.year == year && r.mode == mode)
        .map(|r| r.value())
        .ok_or_else(|| DataError::MissingData {
            category: category.to_string(),
            year,
            mode: mode.to_string(),
        })
}

/// One metric per entry of `categories`, in the same order.
pub fn compute_growth(
    dataset: &Dataset,
    mode: &str,
    categories: &[String],
    from_year: i32,
    to_year: i32,
) -> Vec<Metric> {
    let view = filter_by_mode(dataset, mode);

    categories
        .iter()
        .map(|category| {
            let first = present_or_log(lookup_count(&view, category, from_year, mode));
            let last = present_or_log(lookup_count(&view, category, to_year, mode));
            Metric {
                category: category.clone(),
                first,
                last,
                growth: growth_between(first, last),
            }
        })
        .collect()
}

fn present_or_log(found: Result<Option<f64>, DataError>) -> Option<f64> {
    match found {
        Ok(value) => value,
        Err(err) => {
            debug!("{err}; metric shown as not applicable");
            None
        }
    }
}

/// `last / first`, or not applicable when either side is absent or `first` is zero.
pub fn growth_between(first: Option<f64>, last: Option<f64>) -> Growth {
    match (first, last) {
        (Some(f), Some(l)) if f != 0.0 => Growth::Ratio(l / f),
        _ => Growth::NotApplicable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Record;

    fn traffic() -> Dataset {
        Dataset::new(vec![
            Record::new(2015, "Traffic_accident", "Dispatch", Some(100.0)),
            Record::new(2020, "Traffic_accident", "Dispatch", Some(150.0)),
            Record::new(2015, "Traffic_accident", "Transport", Some(90.0)),
            Record::new(2020, "Traffic_accident", "Transport", Some(45.0)),
            Record::new(2015, "Perpetrator", "Dispatch", None),
            Record::new(2020, "Perpetrator", "Dispatch", Some(40.0)),
            Record::new(2015, "Other", "Dispatch", Some(f64::NAN)),
            Record::new(2020, "Other", "Dispatch", Some(10.0)),
            Record::new(2015, "Sudden_illness", "Dispatch", Some(0.0)),
            Record::new(2020, "Sudden_illness", "Dispatch", Some(10.0)),
        ])
    }

    fn cats(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ratio_of_last_to_first() {
        let metrics = compute_growth(&traffic(), "Dispatch", &cats(&["Traffic_accident"]), 2015, 2020);
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].growth, Growth::Ratio(1.5));
        assert_eq!(metrics[0].growth.style(), DeltaStyle::Normal);
        assert_eq!(metrics[0].last, Some(150.0));
    }

    #[test]
    fn mode_selects_the_rows() {
        let metrics = compute_growth(&traffic(), "Transport", &cats(&["Traffic_accident"]), 2015, 2020);
        assert_eq!(metrics[0].growth, Growth::Ratio(0.5));
        assert_eq!(metrics[0].growth.style(), DeltaStyle::Normal);
    }

    #[test]
    fn same_year_is_exactly_one() {
        let metrics = compute_growth(&traffic(), "Dispatch", &cats(&["Traffic_accident"]), 2020, 2020);
        assert_eq!(metrics[0].growth, Growth::Ratio(1.0));
    }

    #[test]
    fn absent_or_nan_first_is_not_applicable() {
        let metrics = compute_growth(&traffic(), "Dispatch", &cats(&["Perpetrator", "Other"]), 2015, 2020);
        for m in &metrics {
            assert_eq!(m.growth, Growth::NotApplicable, "{}", m.category);
            assert_eq!(m.growth.style(), DeltaStyle::Off);
            assert_eq!(m.first, None);
        }
        assert_eq!(metrics[0].last, Some(40.0));
    }

    #[test]
    fn zero_first_is_not_applicable() {
        let metrics = compute_growth(&traffic(), "Dispatch", &cats(&["Sudden_illness"]), 2015, 2020);
        assert_eq!(metrics[0].growth, Growth::NotApplicable);
    }

    #[test]
    fn missing_rows_degrade_only_their_metric() {
        let metrics = compute_growth(
            &traffic(),
            "Dispatch",
            &cats(&["Work-related_accidents", "Traffic_accident"]),
            2015,
            2020,
        );
        assert_eq!(metrics[0].growth, Growth::NotApplicable);
        assert_eq!(metrics[0].last, None);
        assert_eq!(metrics[1].growth, Growth::Ratio(1.5));
    }

    #[test]
    fn empty_category_list_yields_no_metrics() {
        assert!(compute_growth(&traffic(), "Dispatch", &[], 2015, 2020).is_empty());
    }

    #[test]
    fn lookup_reports_missing_combination() {
        let data = traffic();
        assert_eq!(lookup_count(&data, "Traffic_accident", 2015, "Dispatch"), Ok(Some(100.0)));
        assert_eq!(lookup_count(&data, "Perpetrator", 2015, "Dispatch"), Ok(None));
        assert_eq!(
            lookup_count(&data, "Traffic_accident", 2017, "Dispatch"),
            Err(DataError::MissingData {
                category: "Traffic_accident".to_string(),
                year: 2017,
                mode: "Dispatch".to_string(),
            })
        );
    }
}
