//! # Navigability Window Extraction
//!
//! Thresholds a [`DepthSeries`] against a vessel's draught and collects the
//! contiguous runs of navigable grid points.
//!
//! ## Boundary Conventions
//! - A grid point is navigable only when `depth > draught`. Depth exactly equal
//!   to the draught is **not** navigable.
//! - A run closes at the last navigable grid point, not at the first
//!   non-navigable one. The reported end can therefore trail the true crossing
//!   by up to one grid cadence.
//! - A run of a single grid point would give `start == end` and is dropped.
//!
//! Consecutive windows are always separated by at least one non-navigable grid
//! point, so the output is ordered and no two windows touch.

use crate::{error::ForecastError, reconstruct::DepthSeries, Window};
use chrono::NaiveDateTime;
use tracing::{debug, trace};

/// A grid point is navigable when the depth strictly exceeds the draught.
pub fn is_navigable(depth: f64, draught: f64) -> bool {
    depth > draught
}

/// Reject draughts that are not positive finite numbers.
pub fn validate_draught(draught: f64) -> Result<f64, ForecastError> {
    if draught.is_finite() && draught > 0.0 {
        Ok(draught)
    } else {
        Err(ForecastError::InvalidDraught { draught })
    }
}

/// Extract the tidal windows of `series` for a vessel drawing `draught` metres.
///
/// Runs in a single pass over the grid.
///
/// # Errors
/// [`ForecastError::InvalidDraught`] unless `draught` is positive and finite.
pub fn extract_windows(series: &DepthSeries, draught: f64) -> Result<Vec<Window>, ForecastError> {
    let draught = validate_draught(draught)?;
    let times = series.grid().times();

    let mut windows = Vec::new();
    let mut open: Option<NaiveDateTime> = None;

    for (i, (time, depth)) in series.iter().enumerate() {
        match (open, is_navigable(depth, draught)) {
            (None, true) => open = Some(time),
            (Some(start), false) => {
                // `open` is only set on an earlier point, so i >= 1
                close(&mut windows, start, times[i - 1]);
                open = None;
            }
            _ => {}
        }
    }

    if let (Some(start), Some(last)) = (open, series.grid().last()) {
        close(&mut windows, start, last);
    }

    debug!(
        draught,
        grid_points = series.len(),
        windows = windows.len(),
        "extracted tidal windows"
    );
    Ok(windows)
}

fn close(windows: &mut Vec<Window>, start: NaiveDateTime, end: NaiveDateTime) {
    match Window::new(start, end) {
        Some(window) => windows.push(window),
        None => trace!(%start, "dropping single-sample window"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconstruct::{ForecastSettings, TimeGrid};
    use chrono::{Duration, NaiveDate};

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn minute(m: i64) -> NaiveDateTime {
        t0() + Duration::minutes(m)
    }

    /// One grid point per minute carrying the given depths.
    fn series(depths: &[f64]) -> DepthSeries {
        let settings = ForecastSettings {
            horizon: Duration::minutes(depths.len() as i64),
            cadence: Duration::minutes(1),
        };
        let grid = TimeGrid::new(t0(), &settings).unwrap();
        DepthSeries::from_parts(grid, depths.to_vec()).unwrap()
    }

    #[test]
    fn window_closes_at_last_navigable_point() {
        let s = series(&[9.0, 11.0, 11.0, 11.0, 9.0, 9.0]);
        let windows = extract_windows(&s, 10.0).unwrap();
        assert_eq!(windows, vec![Window::new(minute(1), minute(3)).unwrap()]);
    }

    #[test]
    fn open_window_closes_at_final_grid_point() {
        let s = series(&[9.0, 11.0, 11.0, 11.0]);
        let windows = extract_windows(&s, 10.0).unwrap();
        assert_eq!(windows, vec![Window::new(minute(1), minute(3)).unwrap()]);
    }

    #[test]
    fn depth_equal_to_draught_is_not_navigable() {
        let s = series(&[10.0, 10.0, 10.0]);
        assert!(extract_windows(&s, 10.0).unwrap().is_empty());
    }

    #[test]
    fn single_sample_runs_are_dropped() {
        let s = series(&[9.0, 11.0, 9.0, 11.0, 11.0, 9.0, 11.0]);
        let windows = extract_windows(&s, 10.0).unwrap();
        assert_eq!(windows, vec![Window::new(minute(3), minute(4)).unwrap()]);
    }

    #[test]
    fn multiple_windows_are_ordered_and_separated() {
        let s = series(&[11.0, 11.0, 9.0, 11.0, 11.0, 11.0, 9.0, 9.0, 11.0, 11.0]);
        let windows = extract_windows(&s, 10.0).unwrap();
        assert_eq!(
            windows,
            vec![
                Window::new(minute(0), minute(1)).unwrap(),
                Window::new(minute(3), minute(5)).unwrap(),
                Window::new(minute(8), minute(9)).unwrap(),
            ]
        );
        for pair in windows.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn always_navigable_gives_one_full_window() {
        let s = series(&[12.0; 30]);
        let windows = extract_windows(&s, 10.0).unwrap();
        assert_eq!(windows, vec![Window::new(minute(0), minute(29)).unwrap()]);
    }

    #[test]
    fn invalid_draught_is_rejected() {
        let s = series(&[12.0; 3]);
        for draught in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                extract_windows(&s, draught),
                Err(ForecastError::InvalidDraught { .. })
            ));
        }
    }

    #[test]
    fn single_point_series_has_no_windows() {
        let s = series(&[11.0]);
        assert!(extract_windows(&s, 10.0).unwrap().is_empty());
    }
}
