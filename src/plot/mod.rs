//! Text plotting for terminals without the TUI.

pub mod ascii;

pub use ascii::*;
