//! `ems-dash` library crate.
//!
//! The binary (`ems`) is a thin wrapper around this library so that:
//!
//! - the fetch/filter/growth pipeline is testable without a terminal or network
//! - the TUI and the text report share one code path

pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod tui;
