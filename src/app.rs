//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads settings from the environment
//! - parses CLI arguments
//! - fetches (once) the emergency transport dataset
//! - turns flags into a validated `Selection`
//! - prints reports, writes exports, or hands off to the TUI

use clap::Parser;
use log::info;

use crate::analysis::year_bounds;
use crate::cli::{Command, ExportArgs, ReportArgs, SelectionArgs};
use crate::config::Settings;
use crate::data::{ApiClient, DatasetCache, warn_unlabeled};
use crate::domain::{Dataset, IncidentType, Locale, Selection};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `ems` binary.
pub fn run() -> Result<(), AppError> {
    // `ems` and `ems --from 2015` behave like `ems tui ...`. Clap requires a
    // subcommand name, so rewrite argv before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let settings = Settings::from_env()?;

    match cli.command {
        Command::Tui(args) => handle_tui(&settings, args),
        Command::Report(args) => handle_report(&settings, args),
        Command::Export(args) => handle_export(&settings, args),
    }
}

fn handle_tui(settings: &Settings, args: SelectionArgs) -> Result<(), AppError> {
    crate::tui::run(settings, args)
}

fn handle_report(settings: &Settings, args: ReportArgs) -> Result<(), AppError> {
    let cache = DatasetCache::new(ApiClient::from_settings(settings)?);
    let snapshot = cache.get()?;
    let locale = resolve_locale(&args.selection, settings);
    let selection = selection_from_args(&args.selection, &snapshot.dataset)?;
    warn_unlabeled(&snapshot.dataset, locale);

    let view = pipeline::build_view(&snapshot.dataset, &selection, locale);
    let table = view.table;

    println!("{}", crate::report::format_summary(&snapshot, &selection, table));
    println!("--- {} ---", table.text.chart_heading);
    if !args.no_plot {
        match crate::plot::render_ascii_chart(&view.series, args.width, args.height) {
            Some(plot) => println!("{plot}"),
            None => println!("{}\n", table.text.empty_chart),
        }
    }
    print!(
        "{}",
        crate::report::format_cards(&view.metrics_heading, &view.cards, crate::report::CARD_COLUMNS)
    );

    Ok(())
}

fn handle_export(settings: &Settings, args: ExportArgs) -> Result<(), AppError> {
    let cache = DatasetCache::new(ApiClient::from_settings(settings)?);
    let snapshot = cache.get()?;
    let locale = resolve_locale(&args.selection, settings);
    let selection = selection_from_args(&args.selection, &snapshot.dataset)?;
    warn_unlabeled(&snapshot.dataset, locale);

    let view = pipeline::build_view(&snapshot.dataset, &selection, locale);
    crate::io::write_dataset(&args.out, &view.filtered, args.format)?;

    info!("wrote {} rows to {}", view.filtered.len(), args.out.display());
    println!("Wrote {} rows to {}", view.filtered.len(), args.out.display());
    Ok(())
}

/// `--locale` wins over `EMS_LOCALE`.
pub fn resolve_locale(args: &SelectionArgs, settings: &Settings) -> Locale {
    args.locale.unwrap_or(settings.locale)
}

/// Build a validated selection from flags, defaulting to the dataset's full range
/// and every category.
pub fn selection_from_args(args: &SelectionArgs, dataset: &Dataset) -> Result<Selection, AppError> {
    let bounds = year_bounds(dataset).ok_or_else(|| AppError::new(4, "The API returned no records."))?;

    let categories: Vec<IncidentType> = if args.categories.is_empty() {
        IncidentType::ALL.to_vec()
    } else {
        args.categories.clone()
    };

    let selection = Selection {
        from_year: args.from_year.unwrap_or(bounds.min),
        to_year: args.to_year.unwrap_or(bounds.max),
        mode: args.mode.wire_name().to_string(),
        categories: categories.iter().map(|t| t.wire_name().to_string()).collect(),
    };
    selection.validate(bounds)?;
    Ok(selection)
}

/// Rewrite argv so `ems` defaults to `ems tui`.
///
/// Rules:
/// - `ems`                       -> `ems tui`
/// - `ems --from 2015 ...`       -> `ems tui --from 2015 ...`
/// - `ems --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report" | "export");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
