//! Plotters-powered multi-series line chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Series colors, cycled by series index. Shared with the legend.
pub const PALETTE: [(u8, u8, u8); 8] = [
    (0, 255, 255),   // cyan
    (255, 200, 0),   // amber
    (0, 255, 0),     // green
    (255, 80, 80),   // red
    (200, 120, 255), // violet
    (255, 255, 255), // white
    (255, 140, 200), // pink
    (120, 170, 255), // blue
];

pub fn series_rgb(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call so `render()`
/// only draws.
pub struct CountPlottersChart<'a> {
    /// One polyline per category: (year, count) points sorted by year, plus
    /// its palette color.
    pub series: &'a [(Vec<(f64, f64)>, (u8, u8, u8))],
    /// Number of year labels on the x axis.
    pub x_ticks: usize,
    /// X bounds (years).
    pub x_bounds: [f64; 2],
    /// Y bounds (counts).
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for CountPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(self.x_ticks)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for (points, (r, g, b)) in self.series {
                let color = RGBColor(*r, *g, *b);
                chart.draw_series(LineSeries::new(points.iter().copied(), &color))?;
                // A colored `Pixel` marks the yearly samples; circle markers are
                // scaled wrongly by the ratatui backend.
                chart.draw_series(points.iter().map(|&(x, y)| Pixel::new((x, y), color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
