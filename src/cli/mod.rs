//! Command-line parsing for the emergency activity dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! data pipeline; `app` turns these structs into a `Selection`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{IncidentType, Locale, Mode};
use crate::io::ExportFormat;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ems", version, about = "Kitakyushu emergency dispatch/transport statistics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (the default).
    Tui(SelectionArgs),
    /// Print the dataset summary, a chart, and the growth metrics.
    Report(ReportArgs),
    /// Write the filtered table to a CSV or JSON file.
    Export(ExportArgs),
}

/// Filters shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct SelectionArgs {
    /// First year of the range (defaults to the earliest year in the data).
    #[arg(long = "from")]
    pub from_year: Option<i32>,

    /// Last year of the range (defaults to the latest year in the data).
    #[arg(long = "to")]
    pub to_year: Option<i32>,

    /// Dispatch or transport counts.
    #[arg(short = 'm', long, value_enum, default_value_t = Mode::Dispatch)]
    pub mode: Mode,

    /// Incident type to include; repeat for several (default: all).
    #[arg(short = 'c', long = "category", value_enum)]
    pub categories: Vec<IncidentType>,

    /// Label language (overrides EMS_LOCALE).
    #[arg(short = 'l', long, value_enum)]
    pub locale: Option<Locale>,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Skip the ASCII chart.
    #[arg(long)]
    pub no_plot: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output file.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub out: PathBuf,

    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,
}
