//! Pure table operations: filtering, option discovery, growth metrics.

pub mod filter;
pub mod growth;

pub use filter::{categories, filter, filter_by_mode, modes, year_bounds};
pub use growth::{DeltaStyle, Growth, Metric, compute_growth, growth_between, lookup_count};
