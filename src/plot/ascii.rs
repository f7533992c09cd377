//! ASCII line chart for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks when piping `ems report` somewhere
//! - deterministic output (helpful for golden tests)
//!
//! Each series gets its own glyph for data points; the segments between
//! consecutive years are drawn with `.` and never overwrite a point.

use crate::report::ChartSeries;

const GLYPHS: [char; 8] = ['*', 'o', '+', 'x', '#', '@', '%', '&'];

/// Render all series on one grid. `None` when there is nothing to draw.
pub fn render_ascii_chart(series: &[ChartSeries], width: usize, height: usize) -> Option<String> {
    let (x_min, x_max) = x_range(series)?;
    let (y_min, y_max) = y_range(series)?;
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let width = width.max(10);
    let height = height.max(5);
    let mut grid = vec![vec![' '; width]; height];

    for s in series {
        let mut prev = None;
        for &(year, count) in &s.points {
            let cell = (map_x(year as f64, x_min, x_max, width), map_y(count, y_min, y_max, height));
            if let Some((x0, y0)) = prev {
                draw_line(&mut grid, x0, y0, cell.0, cell.1, '.');
            }
            prev = Some(cell);
        }
    }

    for (i, s) in series.iter().enumerate() {
        let glyph = GLYPHS[i % GLYPHS.len()];
        for &(year, count) in &s.points {
            let x = map_x(year as f64, x_min, x_max, width);
            let y = map_y(count, y_min, y_max, height);
            grid[y][x] = glyph;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: year=[{}, {}] | count=[{y_min:.2}, {y_max:.2}]\n",
        x_min as i32, x_max as i32
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    let legend: Vec<String> = series
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{} {}", GLYPHS[i % GLYPHS.len()], s.name))
        .collect();
    out.push_str(&format!("Legend: {}\n", legend.join("  ")));

    Some(out)
}

fn x_range(series: &[ChartSeries]) -> Option<(f64, f64)> {
    let years = series.iter().flat_map(|s| s.points.iter().map(|&(y, _)| y));
    let (min, max) = years.fold((i32::MAX, i32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
    if min > max {
        return None;
    }
    if min == max {
        return Some((min as f64 - 1.0, max as f64 + 1.0));
    }
    Some((min as f64, max as f64))
}

fn y_range(series: &[ChartSeries]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, v) in series.iter().flat_map(|s| s.points.iter()) {
        min_y = min_y.min(v);
        max_y = max_y.max(v);
    }
    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y <= min_y {
        return Some((min_y - 1.0, max_y + 1.0));
    }
    Some((min_y, max_y))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
