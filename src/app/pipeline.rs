//! Shared dashboard pipeline used by both the CLI and the TUI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! dataset -> filter -> chart series, and dataset -> mode view -> growth -> cards.
//!
//! The front-ends then only deal with presentation (printing vs widgets).

use crate::analysis::{categories, compute_growth, filter, modes, year_bounds};
use crate::data::{LabelTable, label_table, localize};
use crate::domain::{Dataset, Locale, Selection, YearBounds};
use crate::report::{ChartSeries, MetricCard, chart_series, metric_cards};

/// Values available to the selection controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub bounds: Option<YearBounds>,
    pub modes: Vec<String>,
    pub categories: Vec<String>,
}

/// Read the control bounds and choices off a dataset.
pub fn options(dataset: &Dataset) -> Options {
    Options {
        bounds: year_bounds(dataset),
        modes: modes(dataset),
        categories: categories(dataset),
    }
}

/// Everything a front-end needs to draw one frame.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub table: &'static LabelTable,
    /// Filtered rows with localized headers and values.
    pub filtered: Dataset,
    pub series: Vec<ChartSeries>,
    pub metrics_heading: String,
    pub cards: Vec<MetricCard>,
}

/// Run the full pipeline against the raw (wire-valued) dataset.
pub fn build_view(dataset: &Dataset, selection: &Selection, locale: Locale) -> DashboardView {
    let table = label_table(locale);

    let filtered = filter(
        dataset,
        &selection.mode,
        &selection.categories,
        selection.from_year,
        selection.to_year,
    );
    let series = chart_series(&filtered, &selection.categories, table);

    let metrics = compute_growth(
        dataset,
        &selection.mode,
        &selection.categories,
        selection.from_year,
        selection.to_year,
    );
    let cards = metric_cards(&metrics, table);

    DashboardView {
        table,
        filtered: localize(&filtered, locale),
        series,
        metrics_heading: table.metrics_heading(selection.to_year),
        cards,
    }
}
