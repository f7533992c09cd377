//! Input/output helpers.
//!
//! - filtered table exports (CSV/JSON) (`export`)

pub mod export;

pub use export::*;
