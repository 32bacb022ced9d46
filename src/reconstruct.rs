//! # Tide Height Reconstruction
//!
//! Turns a port's discrete tide samples into a total water depth series on a
//! fixed-cadence grid.
//!
//! ## Processing Pipeline
//! 1. **Select**: keep only the samples whose port name matches exactly
//! 2. **Sort**: stable sort by timestamp (input order is not trusted; duplicate
//!    timestamps are kept in their original relative order)
//! 3. **Axis**: map each timestamp to seconds after the earliest sample
//! 4. **Interpolate**: piecewise-linear between neighbouring samples
//! 5. **Sample**: evaluate on the grid and add the approach depth
//!
//! ## Extrapolation
//! Grid points before the first or after the last sample are extrapolated
//! linearly from the nearest segment. Far from the sampled range the result
//! drifts without bound; callers are expected to supply tide data that covers
//! the forecast horizon.
//!
//! The caller hands over an owned `Vec<TideSample>`, so sorting and the derived
//! time axis never touch the shared sample table.

use crate::{error::ForecastError, Port, TideSample};
use chrono::{Duration, NaiveDateTime};
use tracing::debug;

/// Default forecast horizon
pub const DEFAULT_HORIZON_DAYS: i64 = 14;

/// Default spacing between grid points
pub const DEFAULT_CADENCE_MINUTES: i64 = 1;

/// Length and resolution of the depth grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForecastSettings {
    /// Total time span covered by the grid
    pub horizon: Duration,
    /// Spacing between consecutive grid points
    pub cadence: Duration,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        ForecastSettings {
            horizon: Duration::days(DEFAULT_HORIZON_DAYS),
            cadence: Duration::minutes(DEFAULT_CADENCE_MINUTES),
        }
    }
}

impl ForecastSettings {
    /// Number of grid points, `horizon / cadence` rounded down.
    ///
    /// 20160 for the default 14 days at one-minute cadence.
    pub fn grid_len(&self) -> usize {
        let cadence = self.cadence.num_milliseconds();
        if cadence <= 0 {
            return 0;
        }
        (self.horizon.num_milliseconds().max(0) / cadence) as usize
    }
}

/// Evenly spaced timestamps starting at the arrival instant.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid {
    times: Vec<NaiveDateTime>,
    cadence: Duration,
}

impl TimeGrid {
    /// Build the grid `start, start + cadence, ...` with `horizon / cadence` points.
    ///
    /// # Errors
    /// - [`ForecastError::InvalidCadence`] if the cadence is not positive
    /// - [`ForecastError::InvalidHorizon`] if the horizon is shorter than one cadence
    pub fn new(start: NaiveDateTime, settings: &ForecastSettings) -> Result<Self, ForecastError> {
        let cadence_ms = settings.cadence.num_milliseconds();
        if cadence_ms <= 0 {
            return Err(ForecastError::InvalidCadence { millis: cadence_ms });
        }
        let horizon_ms = settings.horizon.num_milliseconds();
        if horizon_ms < cadence_ms {
            return Err(ForecastError::InvalidHorizon {
                horizon_millis: horizon_ms,
                cadence_millis: cadence_ms,
            });
        }

        let times = (0..settings.grid_len() as i64)
            .map(|step| start + Duration::milliseconds(cadence_ms * step))
            .collect();

        Ok(TimeGrid {
            times,
            cadence: settings.cadence,
        })
    }

    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDateTime> {
        self.times.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDateTime> {
        self.times.last().copied()
    }
}

/// Total water depth at every point of a [`TimeGrid`].
#[derive(Clone, Debug, PartialEq)]
pub struct DepthSeries {
    grid: TimeGrid,
    depths: Vec<f64>,
}

impl DepthSeries {
    /// Pair a grid with depth values; `None` if the lengths differ.
    pub fn from_parts(grid: TimeGrid, depths: Vec<f64>) -> Option<Self> {
        (grid.len() == depths.len()).then_some(DepthSeries { grid, depths })
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// `(timestamp, depth)` pairs in grid order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.grid.times.iter().copied().zip(self.depths.iter().copied())
    }

    /// Smallest and largest depth, or `None` for an empty series.
    pub fn depth_range(&self) -> Option<(f64, f64)> {
        if self.depths.is_empty() {
            return None;
        }
        Some(
            self.depths
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &d| {
                    (min.min(d), max.max(d))
                }),
        )
    }
}

/// Piecewise-linear function through sorted `(x, y)` points.
///
/// Evaluation outside `[x_first, x_last]` continues the first or last
/// non-degenerate segment.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearInterpolant {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolant {
    /// Build from points sorted by `x`.
    ///
    /// Returns `None` unless there are at least two distinct `x` values.
    pub fn new(points: &[(f64, f64)]) -> Option<Self> {
        let (first, last) = (points.first()?, points.last()?);
        if first.0 >= last.0 {
            return None;
        }
        let (xs, ys) = points.iter().copied().unzip();
        Some(LinearInterpolant { xs, ys })
    }

    /// Value at `x`.
    ///
    /// At a timestamp shared by several points the first of them wins.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let below = self.xs.partition_point(|&v| v < x);

        let mut hi = below.clamp(1, n - 1);
        let mut lo = hi - 1;

        // Duplicate x values at either end form zero-width segments; step past them.
        while self.xs[hi] <= self.xs[lo] {
            if below == 0 {
                hi += 1;
            } else {
                lo -= 1;
            }
        }

        let alpha = (x - self.xs[lo]) / (self.xs[hi] - self.xs[lo]);
        self.ys[lo] + alpha * (self.ys[hi] - self.ys[lo])
    }
}

/// Seconds from `origin` to `instant`, with millisecond resolution.
fn seconds_since(origin: NaiveDateTime, instant: NaiveDateTime) -> f64 {
    (instant - origin).num_milliseconds() as f64 / 1000.0
}

/// Reconstruct the total depth series for `port` starting at `arrival`.
///
/// `samples` is the caller's private copy of the tide table (or of the port's
/// slice of it); samples for other ports are ignored.
///
/// # Errors
/// - [`ForecastError::NoTideData`] if the port has fewer than two distinct
///   sample timestamps
/// - [`ForecastError::InvalidCadence`] if the grid cadence is not positive
/// - [`ForecastError::InvalidHorizon`] if the horizon is shorter than one cadence
pub fn reconstruct_depths(
    port: &Port,
    mut samples: Vec<TideSample>,
    arrival: NaiveDateTime,
    settings: &ForecastSettings,
) -> Result<DepthSeries, ForecastError> {
    samples.retain(|s| s.port_name == port.name);
    samples.sort_by_key(|s| s.timestamp);

    let distinct = samples
        .windows(2)
        .filter(|pair| pair[0].timestamp != pair[1].timestamp)
        .count()
        + usize::from(!samples.is_empty());

    let no_data = || ForecastError::NoTideData {
        port_name: port.name.clone(),
        distinct,
    };
    let origin = samples.first().map(|s| s.timestamp).ok_or_else(no_data)?;

    let points: Vec<(f64, f64)> = samples
        .iter()
        .map(|s| (seconds_since(origin, s.timestamp), s.height))
        .collect();
    let curve = LinearInterpolant::new(&points).ok_or_else(no_data)?;

    let grid = TimeGrid::new(arrival, settings)?;
    let depths: Vec<f64> = grid
        .times()
        .iter()
        .map(|&t| port.approach_depth + curve.evaluate(seconds_since(origin, t)))
        .collect();

    debug!(
        port = %port.name,
        samples = samples.len(),
        grid_points = grid.len(),
        "reconstructed depth series"
    );

    Ok(DepthSeries { grid, depths })
}
