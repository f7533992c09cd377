//! Shared domain types.
//!
//! Rows keep their category and mode as the raw strings the API sent. The
//! enums below only name the values the API is known to produce, so a
//! renamed or new value from the remote side still flows through the
//! pipeline untouched.

use std::str::FromStr;

use clap::ValueEnum;

use crate::error::AppError;

/// Wire name of the year column.
pub const FIELD_YEAR: &str = "year";
/// Wire name of the incident category column.
pub const FIELD_CATEGORY: &str = "Type";
/// Wire name of the dispatch/transport column.
pub const FIELD_MODE: &str = "Dispatch_Transport";
/// Wire name of the count column.
pub const FIELD_COUNT: &str = "Number";

/// Dispatch vs transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Mode {
    /// An emergency vehicle deployment.
    Dispatch,
    /// A transport to hospital.
    Transport,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Dispatch, Mode::Transport];

    /// Value used by the API in the `Dispatch_Transport` column.
    pub fn wire_name(self) -> &'static str {
        match self {
            Mode::Dispatch => "Dispatch",
            Mode::Transport => "Transport",
        }
    }

    pub fn from_wire(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.wire_name() == raw)
    }
}

/// Incident classification as published by the city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum IncidentType {
    GeneralInjury,
    Other,
    Perpetrator,
    SelfInflictedDamage,
    SuddenIllness,
    TrafficAccident,
    WorkRelatedAccidents,
}

impl IncidentType {
    /// All categories, in the order the dashboard preselects them.
    pub const ALL: [IncidentType; 7] = [
        IncidentType::GeneralInjury,
        IncidentType::Other,
        IncidentType::Perpetrator,
        IncidentType::SelfInflictedDamage,
        IncidentType::SuddenIllness,
        IncidentType::TrafficAccident,
        IncidentType::WorkRelatedAccidents,
    ];

    /// Value used by the API in the `Type` column.
    pub fn wire_name(self) -> &'static str {
        match self {
            IncidentType::GeneralInjury => "General_injury",
            IncidentType::Other => "Other",
            IncidentType::Perpetrator => "Perpetrator",
            IncidentType::SelfInflictedDamage => "Self-inflicted_damage",
            IncidentType::SuddenIllness => "Sudden_illness",
            IncidentType::TrafficAccident => "Traffic_accident",
            IncidentType::WorkRelatedAccidents => "Work-related_accidents",
        }
    }

    pub fn from_wire(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.wire_name() == raw)
    }
}

/// Display language for labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Locale {
    En,
    Ja,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ja => "ja",
        }
    }

    /// Cycle to the other locale (used by the TUI toggle).
    pub fn next(self) -> Self {
        match self {
            Locale::En => Locale::Ja,
            Locale::Ja => Locale::En,
        }
    }
}

impl FromStr for Locale {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "ja" | "jp" | "japanese" => Ok(Locale::Ja),
            other => Err(AppError::new(2, format!("Unknown locale '{other}' (expected en or ja)."))),
        }
    }
}

/// One row of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub year: i32,
    pub category: String,
    pub mode: String,
    /// `None` when the API sent `null` for this combination.
    pub count: Option<f64>,
}

impl Record {
    pub fn new(year: i32, category: impl Into<String>, mode: impl Into<String>, count: Option<f64>) -> Self {
        Self {
            year,
            category: category.into(),
            mode: mode.into(),
            count,
        }
    }

    /// Count if present and finite.
    pub fn value(&self) -> Option<f64> {
        self.count.filter(|v| v.is_finite())
    }
}

/// Column headers of a dataset (wire names, or localized labels).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLabels {
    pub year: String,
    pub category: String,
    pub mode: String,
    pub count: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            year: FIELD_YEAR.to_string(),
            category: FIELD_CATEGORY.to_string(),
            mode: FIELD_MODE.to_string(),
            count: FIELD_COUNT.to_string(),
        }
    }
}

/// An ordered table of records with its column headers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub columns: ColumnLabels,
}

impl Dataset {
    /// Dataset with the API's own column names.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            columns: ColumnLabels::default(),
        }
    }

    /// Same headers, different rows.
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        Self {
            records,
            columns: self.columns.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Inclusive year range covered by a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl YearBounds {
    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

/// What the user currently wants to see.
///
/// `mode` and `categories` hold wire values; localization happens on the way
/// out to the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub from_year: i32,
    pub to_year: i32,
    pub mode: String,
    pub categories: Vec<String>,
}

impl Selection {
    /// Whole year range, dispatch, every known category.
    pub fn full(bounds: YearBounds) -> Self {
        Self {
            from_year: bounds.min,
            to_year: bounds.max,
            mode: Mode::Dispatch.wire_name().to_string(),
            categories: IncidentType::ALL.iter().map(|t| t.wire_name().to_string()).collect(),
        }
    }

    /// Check `from_year <= to_year` with both inside `bounds`.
    pub fn validate(&self, bounds: YearBounds) -> Result<(), AppError> {
        if self.from_year > self.to_year {
            return Err(AppError::new(
                2,
                format!("Invalid year range: {} is after {}.", self.from_year, self.to_year),
            ));
        }
        if !bounds.contains(self.from_year) || !bounds.contains(self.to_year) {
            return Err(AppError::new(
                2,
                format!(
                    "Year range {}..={} is outside the available data ({}..={}).",
                    self.from_year, self.to_year, bounds.min, bounds.max
                ),
            ));
        }
        Ok(())
    }

    /// Move `from_year` by `delta`, staying within `bounds` and not past `to_year`.
    pub fn shift_from(&mut self, delta: i32, bounds: YearBounds) {
        let hi = self.to_year.min(bounds.max).max(bounds.min);
        self.from_year = (self.from_year + delta).clamp(bounds.min, hi);
    }

    /// Move `to_year` by `delta`, staying within `bounds` and not before `from_year`.
    pub fn shift_to(&mut self, delta: i32, bounds: YearBounds) {
        let lo = self.from_year.max(bounds.min).min(bounds.max);
        self.to_year = (self.to_year + delta).clamp(lo, bounds.max);
    }

    /// Add `category` if absent, remove it if present. Keeps the preselection order.
    pub fn toggle_category(&mut self, category: &str, order: &[String]) {
        if let Some(pos) = self.categories.iter().position(|c| c == category) {
            self.categories.remove(pos);
            return;
        }
        self.categories.push(category.to_string());
        self.categories
            .sort_by_key(|c| order.iter().position(|o| o == c).unwrap_or(usize::MAX));
    }
}
