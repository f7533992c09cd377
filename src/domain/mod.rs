//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the row/table model (`Record`, `Dataset`, `ColumnLabels`)
//! - the known enumerations (`Mode`, `IncidentType`, `Locale`)
//! - the user's view state (`Selection`, `YearBounds`)

pub mod types;

pub use types::*;
