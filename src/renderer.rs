//! # Depth Chart Rendering
//!
//! Renders a depth series as an ASCII chart for terminal output. The chart
//! shows the total water depth curve, the vessel's draught as a horizontal
//! line, and two lanes underneath marking the columns that fall inside a tidal
//! window (`tide`) and inside a combined tidal + daylight window (`both`).
//!
//! The series is downsampled to the requested width by picking evenly spaced
//! grid points, so short windows can fall between columns on a coarse chart.

use crate::{reconstruct::DepthSeries, Window};
use chrono::NaiveDateTime;

/// Space for Y-axis labels, including the axis line
const Y_AXIS_WIDTH: usize = 7;

/// Format used for the start/end labels under the chart
const TIME_LABEL_FORMAT: &str = "%m-%d %H:%M";

/// Render `series` as an ASCII chart `width` columns wide and `rows` rows tall.
///
/// Returns an empty string when there is nothing to draw.
pub fn render_ascii(
    series: &DepthSeries,
    draught: f64,
    tidal: &[Window],
    combined: &[Window],
    width: usize,
    rows: usize,
) -> String {
    let Some((min_depth, max_depth)) = series.depth_range() else {
        return String::new();
    };
    if width == 0 || rows < 2 {
        return String::new();
    }

    // Sampled points: evenly spaced grid indices across the chart width
    let n = series.len();
    let width = width.min(n);
    let columns: Vec<(NaiveDateTime, f64)> = (0..width)
        .map(|c| {
            let index = if width > 1 { c * (n - 1) / (width - 1) } else { 0 };
            (series.grid().times()[index], series.depths()[index])
        })
        .collect();

    // Keep the draught line on the chart even when it is outside the depth range
    let mut low = min_depth.min(draught);
    let mut high = max_depth.max(draught);
    if (high - low).abs() < f64::EPSILON {
        low -= 0.5;
        high += 0.5;
    }

    let depth_to_row = |depth: f64| {
        let normalized = (depth - low) / (high - low);
        ((1.0 - normalized) * (rows as f64 - 1.0)).round() as usize
    };

    let mut grid = vec![vec![' '; Y_AXIS_WIDTH + width]; rows];

    // Y-axis labels at top, bottom and the draught line
    for value in [high, low, draught] {
        let row = depth_to_row(value).min(rows - 1);
        let label = format!("{:>5.1} ", value);
        // Ensure label fits in Y_AXIS_WIDTH - 1 (leave room for axis line)
        for (i, ch) in label.chars().take(Y_AXIS_WIDTH - 1).enumerate() {
            grid[row][i] = ch;
        }
    }
    for row in grid.iter_mut() {
        row[Y_AXIS_WIDTH - 1] = '│';
    }

    let draught_row = depth_to_row(draught).min(rows - 1);
    for cell in grid[draught_row].iter_mut().skip(Y_AXIS_WIDTH) {
        *cell = '─';
    }

    for (column, &(_, depth)) in columns.iter().enumerate() {
        let row = depth_to_row(depth).min(rows - 1);
        grid[row][Y_AXIS_WIDTH + column] = '•';
    }

    let mut lines: Vec<String> = grid
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect();

    lines.push(lane("tide", &columns, tidal));
    lines.push(lane("both", &columns, combined));

    // Time labels below the chart
    let (first, last) = (columns[0].0, columns[columns.len() - 1].0);
    let start_label = first.format(TIME_LABEL_FORMAT).to_string();
    let end_label = last.format(TIME_LABEL_FORMAT).to_string();
    let gap = width.saturating_sub(start_label.len() + end_label.len()).max(1);
    lines.push(format!(
        "{}{}{}{}",
        " ".repeat(Y_AXIS_WIDTH),
        start_label,
        " ".repeat(gap),
        end_label
    ));

    lines.join("\n")
}

/// One row marking the columns whose time falls inside any of `windows`.
fn lane(label: &str, columns: &[(NaiveDateTime, f64)], windows: &[Window]) -> String {
    let marks: String = columns
        .iter()
        .map(|&(time, _)| {
            if windows.iter().any(|w| w.contains(time)) {
                '█'
            } else {
                '·'
            }
        })
        .collect();
    format!("{:>5} │{}", label, marks)
}
