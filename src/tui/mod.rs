//! Ratatui-based terminal UI.
//!
//! The TUI provides a selection panel (year range, activity, incident types),
//! then renders the yearly chart and the growth metric cards for the latest
//! selected year.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{info, warn};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::analysis::DeltaStyle;
use crate::app::pipeline::{DashboardView, Options, build_view, options};
use crate::cli::SelectionArgs;
use crate::config::Settings;
use crate::data::localize::SOURCE_URL;
use crate::data::{ApiClient, DatasetCache, DatasetSource, Snapshot, warn_unlabeled};
use crate::domain::{IncidentType, Locale, Mode, Selection, YearBounds};
use crate::error::AppError;
use crate::report::{CARD_COLUMNS, ChartSeries, MetricCard, fmt_thousands};

mod plotters_chart;

use plotters_chart::{CountPlottersChart, series_rgb};

/// Rows above the category toggles: From, To, Mode.
const FIXED_FIELDS: usize = 3;

/// Start the TUI.
pub fn run(settings: &Settings, args: SelectionArgs) -> Result<(), AppError> {
    let locale = crate::app::resolve_locale(&args, settings);
    let cache = DatasetCache::new(ApiClient::from_settings(settings)?);

    // Fetch before touching the terminal so a failed first load prints normally.
    let mut app = App::new(cache, locale, &args)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App<S> {
    cache: DatasetCache<S>,
    snapshot: Arc<Snapshot>,
    options: Options,
    selection: Selection,
    locale: Locale,
    selected_field: usize,
    status: String,
    view: DashboardView,
}

impl<S: DatasetSource> App<S> {
    fn new(cache: DatasetCache<S>, locale: Locale, args: &SelectionArgs) -> Result<Self, AppError> {
        let snapshot = cache.get()?;
        let selection = crate::app::selection_from_args(args, &snapshot.dataset)?;
        warn_unlabeled(&snapshot.dataset, locale);
        let options = options(&snapshot.dataset);
        let view = build_view(&snapshot.dataset, &selection, locale);
        let status = format!("Loaded {} records.", snapshot.dataset.len());

        Ok(Self {
            cache,
            snapshot,
            options,
            selection,
            locale,
            selected_field: 0,
            status,
            view,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press. Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < self.field_count() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected_category(),
            KeyCode::Char('a') => {
                self.selection.categories = self.category_order();
                self.rebuild();
            }
            KeyCode::Char('n') => {
                self.selection.categories.clear();
                self.rebuild();
            }
            KeyCode::Char('l') => {
                self.locale = self.locale.next();
                self.status = format!("locale: {}", self.locale.code());
                self.rebuild();
            }
            KeyCode::Char('r') => self.refresh(),
            _ => {}
        }
        false
    }

    fn field_count(&self) -> usize {
        FIXED_FIELDS + self.category_order().len()
    }

    /// Known incident types in preselection order, then anything else the API returned.
    fn category_order(&self) -> Vec<String> {
        let mut order: Vec<String> = IncidentType::ALL.iter().map(|t| t.wire_name().to_string()).collect();
        for c in &self.options.categories {
            if !order.contains(c) {
                order.push(c.clone());
            }
        }
        order
    }

    fn mode_choices(&self) -> Vec<String> {
        if self.options.modes.is_empty() {
            Mode::ALL.iter().map(|m| m.wire_name().to_string()).collect()
        } else {
            self.options.modes.clone()
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            0 | 1 => {
                let Some(bounds) = self.options.bounds else {
                    return;
                };
                let before = self.selection.clone();
                if self.selected_field == 0 {
                    self.selection.shift_from(delta, bounds);
                } else {
                    self.selection.shift_to(delta, bounds);
                }
                if before == self.selection {
                    warn!("{}", blocked_shift(&before, self.selected_field == 0, delta, bounds));
                }
            }
            2 => {
                let choices = self.mode_choices();
                let pos = choices.iter().position(|m| *m == self.selection.mode).unwrap_or(0) as i32;
                let next = (pos + delta).rem_euclid(choices.len() as i32) as usize;
                self.selection.mode = choices[next].clone();
            }
            _ => self.toggle_selected_category(),
        }
        self.rebuild();
    }

    fn toggle_selected_category(&mut self) {
        let Some(idx) = self.selected_field.checked_sub(FIXED_FIELDS) else {
            return;
        };
        let order = self.category_order();
        if let Some(category) = order.get(idx) {
            self.selection.toggle_category(category, &order);
            self.rebuild();
        }
    }

    fn refresh(&mut self) {
        match self.cache.refresh() {
            Ok(snapshot) => {
                info!("dashboard refreshed: {} records", snapshot.dataset.len());
                self.status = format!("Refreshed {} records.", snapshot.dataset.len());
                self.apply_snapshot(snapshot);
            }
            Err(err) => {
                self.status = format!("Refresh failed: {err}");
            }
        }
    }

    /// Swap in a new snapshot, pulling the year range back inside the new bounds.
    fn apply_snapshot(&mut self, snapshot: Arc<Snapshot>) {
        warn_unlabeled(&snapshot.dataset, self.locale);
        self.options = options(&snapshot.dataset);
        self.snapshot = snapshot;
        if let Some(b) = self.options.bounds {
            let from = self.selection.from_year.clamp(b.min, b.max);
            let to = self.selection.to_year.clamp(from, b.max);
            self.selection.from_year = from;
            self.selection.to_year = to;
        }
        self.selected_field = self.selected_field.min(self.field_count() - 1);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.view = build_view(&self.snapshot.dataset, &self.selection, self.locale);
    }

    /// Dataset-level warnings (no modes or no incident types available).
    fn warnings(&self) -> Vec<&'static str> {
        let text = &self.view.table.text;
        let mut out = Vec::new();
        if self.options.modes.is_empty() {
            out.push(text.no_modes);
        }
        if self.options.categories.is_empty() {
            out.push(text.no_categories);
        }
        out
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = &self.view.table.text;
        let lines = vec![
            Line::from(Span::styled(
                text.title,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{} ({SOURCE_URL}) {}", text.source_name, text.source_note),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format!(
                    "fetched: {} | records={} | {}",
                    self.snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S"),
                    self.snapshot.dataset.len(),
                    self.cache.source().location(),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(12)])
            .split(area);

        self.draw_chart(frame, chunks[0]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
            .split(chunks[1]);

        self.draw_settings(frame, bottom[0]);
        self.draw_metrics(frame, bottom[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let table = self.view.table;
        let block = Block::default().title(table.text.chart_heading).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.view.series.is_empty() {
            let msg = Paragraph::new(table.text.empty_chart)
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let series = colored_series(&self.view.series, &self.category_labels());
        let (x_bounds, y_bounds) = chart_bounds(&self.view.series, &self.selection);

        let ticks = year_ticks(x_bounds);
        let (chart_rect, insets) = chart_layout(rows[0]);
        let widget = CountPlottersChart {
            series: &series,
            x_ticks: ticks.len(),
            x_bounds,
            y_bounds,
            x_label: table.fields.year,
            y_label: table.fields.count,
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_count,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            let labels = (table.fields.year, table.fields.count);
            draw_axis_ticks(frame, rows[0], chart_rect, insets, &ticks, x_bounds, y_bounds, labels);
        }

        frame.render_widget(Paragraph::new(legend_line(&self.view.series, &series)), rows[1]);
    }

    /// Localized labels of `category_order()`, used to keep series colors stable.
    fn category_labels(&self) -> Vec<String> {
        let table = self.view.table;
        self.category_order().iter().map(|c| table.label(c).to_string()).collect()
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let table = self.view.table;

        let mut items = Vec::new();
        items.push(ListItem::new(format!("{} ≥ ◂ {} ▸", table.fields.year, self.selection.from_year)));
        items.push(ListItem::new(format!("{} ≤ ◂ {} ▸", table.fields.year, self.selection.to_year)));
        items.push(ListItem::new(format!(
            "{}: ◂ {} ▸",
            table.fields.mode,
            table.label(&self.selection.mode)
        )));
        for category in self.category_order() {
            let mark = if self.selection.categories.contains(&category) { "[x]" } else { "[ ]" };
            items.push(ListItem::new(format!("{mark} {}", table.label(&category))));
        }

        let list = List::new(items)
            .block(Block::default().title(table.fields.category).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_metrics(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(self.view.metrics_heading.as_str()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows: Vec<&[MetricCard]> = self.view.cards.chunks(CARD_COLUMNS).collect();
        if rows.is_empty() {
            return;
        }

        let row_rects = Layout::default()
            .direction(Direction::Vertical)
            .constraints(rows.iter().map(|_| Constraint::Length(4)).collect::<Vec<_>>())
            .split(inner);

        for (row, rect) in rows.iter().zip(row_rects.iter()) {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, CARD_COLUMNS as u32); CARD_COLUMNS])
                .split(*rect);
            for (card, cell) in row.iter().zip(cells.iter()) {
                draw_card(frame, *cell, card);
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Space toggle  a all  n none  l locale  r refresh  q quit";
        let mut spans = vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(self.status.as_str(), Style::default().fg(Color::Yellow)),
        ];
        for w in self.warnings() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(w, Style::default().fg(Color::Red)));
        }
        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_card(frame: &mut ratatui::Frame<'_>, area: Rect, card: &MetricCard) {
    let delta_color = match card.style {
        DeltaStyle::Normal => Color::Green,
        DeltaStyle::Off => Color::Gray,
    };
    let lines = vec![
        Line::from(Span::styled(
            card.value.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(card.delta.as_str(), Style::default().fg(delta_color))),
    ];
    let p = Paragraph::new(Text::from(lines))
        .block(Block::default().title(card.label.as_str()).borders(Borders::ALL));
    frame.render_widget(p, area);
}

/// Pair every series with a palette color keyed on its category's position in
/// `labels`, so toggling one category does not recolor the others.
fn colored_series(series: &[ChartSeries], labels: &[String]) -> Vec<(Vec<(f64, f64)>, (u8, u8, u8))> {
    series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let slot = labels.iter().position(|l| *l == s.name).unwrap_or(labels.len() + i);
            let points = s.points.iter().map(|&(y, c)| (y as f64, c)).collect();
            (points, series_rgb(slot))
        })
        .collect()
}

fn legend_line<'a>(series: &'a [ChartSeries], colored: &[(Vec<(f64, f64)>, (u8, u8, u8))]) -> Line<'a> {
    let mut spans = Vec::new();
    for (s, (_, (r, g, b))) in series.iter().zip(colored) {
        spans.push(Span::styled("■ ", Style::default().fg(Color::Rgb(*r, *g, *b))));
        spans.push(Span::raw(s.name.as_str()));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

/// Axis ranges: the selected years on x, the padded count range on y.
fn chart_bounds(series: &[ChartSeries], selection: &Selection) -> ([f64; 2], [f64; 2]) {
    let mut x0 = selection.from_year as f64;
    let mut x1 = selection.to_year as f64;
    if x1 <= x0 {
        x0 -= 0.5;
        x1 += 0.5;
    }

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in series.iter().flat_map(|s| s.points.iter()) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1.0);
    ([x0, x1], [y_min - pad, y_max + pad])
}

/// Whole years inside `x_bounds`: every year when there are few, otherwise
/// five evenly spaced ones.
fn year_ticks(x_bounds: [f64; 2]) -> Vec<i32> {
    let first = x_bounds[0].ceil() as i32;
    let last = x_bounds[1].floor() as i32;
    if last < first {
        return Vec::new();
    }
    if last - first < 12 {
        return (first..=last).collect();
    }

    let mut ticks: Vec<i32> = (0..5)
        .map(|i| first + ((last - first) as f64 * i as f64 / 4.0).round() as i32)
        .collect();
    ticks.dedup();
    ticks
}

/// Log message for a year key press that could not move the range.
fn blocked_shift(selection: &Selection, moving_from: bool, delta: i32, bounds: YearBounds) -> String {
    let (name, year) = if moving_from {
        ("from", selection.from_year)
    } else {
        ("to", selection.to_year)
    };
    let other_end_blocks = (moving_from && delta > 0) || (!moving_from && delta < 0);
    let at_bound = if delta < 0 { year <= bounds.min } else { year >= bounds.max };

    if other_end_blocks && !at_bound {
        format!(
            "{name} year stays at {year}: range must keep {} <= {}",
            selection.from_year, selection.to_year
        )
    } else {
        format!("{name} year stays at {year}: data covers {}..={}", bounds.min, bounds.max)
    }
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_count(v: f64) -> String {
    fmt_thousands(v, 0)
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_ticks: &[i32],
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    (x_name, y_name): (&str, &str),
) {
    let style = Style::default().fg(Color::Gray);

    for &year in x_ticks {
        let u = ((year as f64 - x_bounds[0]) / (x_bounds[1] - x_bounds[0])).clamp(0.0, 1.0);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = year.to_string();
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label.clone()).style(style),
            Rect {
                x: start,
                y,
                width: label.len() as u16,
                height: 1,
            },
        );
    }

    let y_ticks = 5usize;
    for i in 0..y_ticks {
        let u = i as f64 / (y_ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_count(y_val);
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label.clone()).style(style),
            Rect {
                x: start,
                y,
                width: label.len() as u16,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(x_name).alignment(Alignment::Center).style(style);
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(y_name).style(style.add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dataset, Record};
    use crate::error::DataError;
    use std::cell::Cell;

    /// Serves `first` on the initial load and `second` on every later one.
    struct TwoStepSource {
        first: Dataset,
        second: Result<Dataset, DataError>,
        calls: Cell<usize>,
    }

    impl DatasetSource for TwoStepSource {
        fn load(&self) -> Result<Dataset, DataError> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            if n == 0 { Ok(self.first.clone()) } else { self.second.clone() }
        }

        fn location(&self) -> &str {
            "memory://fixture"
        }
    }

    fn dataset() -> Dataset {
        let mut records = Vec::new();
        for year in 2015..=2020 {
            records.push(Record::new(year, "Traffic_accident", "Dispatch", Some(100.0 + year as f64)));
            records.push(Record::new(year, "Sudden_illness", "Dispatch", Some(1000.0)));
            records.push(Record::new(year, "Traffic_accident", "Transport", Some(50.0)));
        }
        Dataset::new(records)
    }

    fn args() -> SelectionArgs {
        SelectionArgs {
            from_year: None,
            to_year: None,
            mode: Mode::Dispatch,
            categories: Vec::new(),
            locale: None,
        }
    }

    fn app_with(second: Result<Dataset, DataError>) -> App<TwoStepSource> {
        let source = TwoStepSource {
            first: dataset(),
            second,
            calls: Cell::new(0),
        };
        App::new(DatasetCache::new(source), Locale::En, &args()).unwrap()
    }

    fn app() -> App<TwoStepSource> {
        app_with(Err(DataError::Status(503)))
    }

    #[test]
    fn starts_with_full_range_and_every_category() {
        let app = app();
        assert_eq!((app.selection.from_year, app.selection.to_year), (2015, 2020));
        assert_eq!(app.selection.categories.len(), 7);
        assert_eq!(app.view.series.len(), 2);
        assert_eq!(app.view.cards.len(), 7);
        assert!(app.warnings().is_empty());
        assert_eq!(app.cache.source().location(), "memory://fixture");
    }

    #[test]
    fn year_keys_stay_ordered_and_in_bounds() {
        let mut app = app();

        app.handle_key(KeyCode::Left);
        assert_eq!(app.selection.from_year, 2015);

        for _ in 0..10 {
            app.handle_key(KeyCode::Right);
        }
        assert_eq!(app.selection.from_year, 2020);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.selection.to_year, 2020);
        assert!(app.selection.from_year <= app.selection.to_year);
        assert_eq!(app.view.metrics_heading, "Emergency activity in 2020");
    }

    #[test]
    fn mode_cycles_through_available_values() {
        let mut app = app();
        app.selected_field = 2;
        app.handle_key(KeyCode::Right);
        assert_eq!(app.selection.mode, "Transport");
        assert_eq!(app.view.series.len(), 1);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.selection.mode, "Dispatch");
        app.handle_key(KeyCode::Left);
        assert_eq!(app.selection.mode, "Transport");
    }

    #[test]
    fn category_toggles_and_bulk_keys() {
        let mut app = app();
        let traffic = FIXED_FIELDS
            + app
                .category_order()
                .iter()
                .position(|c| c == "Traffic_accident")
                .unwrap();
        app.selected_field = traffic;

        app.handle_key(KeyCode::Char(' '));
        assert!(!app.selection.categories.contains(&"Traffic_accident".to_string()));
        assert_eq!(app.view.series.len(), 1);

        app.handle_key(KeyCode::Enter);
        assert!(app.selection.categories.contains(&"Traffic_accident".to_string()));

        app.handle_key(KeyCode::Char('n'));
        assert!(app.selection.categories.is_empty());
        assert!(app.view.series.is_empty());
        assert!(app.view.cards.is_empty());

        app.handle_key(KeyCode::Char('a'));
        assert_eq!(app.selection.categories.len(), 7);
    }

    #[test]
    fn cursor_stays_on_the_list() {
        let mut app = app();
        app.handle_key(KeyCode::Up);
        assert_eq!(app.selected_field, 0);
        for _ in 0..30 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.selected_field, app.field_count() - 1);
    }

    #[test]
    fn locale_key_relabels_the_view() {
        let mut app = app();
        app.handle_key(KeyCode::Char('l'));
        assert_eq!(app.locale, Locale::Ja);
        assert_eq!(app.view.metrics_heading, "2020年の救急活動");
        assert!(app.view.series.iter().any(|s| s.name == "交通事故"));
    }

    #[test]
    fn failed_refresh_keeps_data_and_reports() {
        let mut app = app();
        app.handle_key(KeyCode::Char('r'));
        assert!(app.status.starts_with("Refresh failed"));
        assert_eq!(app.snapshot.dataset.len(), 18);
    }

    #[test]
    fn refresh_clamps_selection_to_new_bounds() {
        let shorter = Dataset::new(vec![
            Record::new(2016, "Other", "Dispatch", Some(1.0)),
            Record::new(2018, "Other", "Dispatch", Some(2.0)),
        ]);
        let mut app = app_with(Ok(shorter));
        app.handle_key(KeyCode::Char('r'));

        assert_eq!((app.selection.from_year, app.selection.to_year), (2016, 2018));
        assert_eq!(app.snapshot.dataset.len(), 2);
        assert_eq!(app.view.series.len(), 1);
    }

    #[test]
    fn empty_refresh_shows_warnings() {
        let mut app = app_with(Ok(Dataset::default()));
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.warnings().len(), 2);
        assert!(app.view.series.is_empty());
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Esc));
    }

    #[test]
    fn bounds_pad_counts_and_widen_single_year() {
        let series = vec![ChartSeries {
            name: "a".into(),
            points: vec![(2020, 100.0), (2021, 300.0)],
        }];
        let selection = Selection {
            from_year: 2020,
            to_year: 2021,
            mode: "Dispatch".into(),
            categories: vec![],
        };
        let (x, y) = chart_bounds(&series, &selection);
        assert_eq!(x, [2020.0, 2021.0]);
        assert!((y[0] - 90.0).abs() < 1e-9);
        assert!((y[1] - 310.0).abs() < 1e-9);

        let single = Selection {
            to_year: 2020,
            ..selection
        };
        let (x, _) = chart_bounds(&series, &single);
        assert_eq!(x, [2019.5, 2020.5]);
    }

    #[test]
    fn single_year_gets_one_tick() {
        assert_eq!(year_ticks([2019.5, 2020.5]), vec![2020]);
        assert_eq!(year_ticks([2015.0, 2020.0]), (2015..=2020).collect::<Vec<_>>());
        assert_eq!(year_ticks([1990.0, 2030.0]), vec![1990, 2000, 2010, 2020, 2030]);
    }

    #[test]
    fn blocked_shift_names_the_limit() {
        let bounds = YearBounds { min: 2015, max: 2020 };
        let sel = Selection {
            from_year: 2018,
            to_year: 2018,
            mode: "Dispatch".into(),
            categories: vec![],
        };
        assert!(blocked_shift(&sel, true, 1, bounds).contains("range must keep 2018 <= 2018"));
        assert!(blocked_shift(&sel, false, -1, bounds).contains("range must keep"));

        let edge = Selection {
            from_year: 2015,
            ..sel
        };
        assert!(blocked_shift(&edge, true, -1, bounds).contains("data covers 2015..=2020"));
    }

    #[test]
    fn colors_follow_category_not_position() {
        let labels = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let only_c = vec![ChartSeries {
            name: "c".into(),
            points: vec![(2020, 1.0)],
        }];
        let colored = colored_series(&only_c, &labels);
        assert_eq!(colored[0].1, series_rgb(2));
        assert_eq!(colored[0].0, vec![(2020.0, 1.0)]);
    }
}
