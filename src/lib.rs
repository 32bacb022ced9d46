//! # Tide Window Core Library
//!
//! This library forecasts the periods in which a vessel can safely transit a
//! port's approach channel. A channel is passable while the total water depth
//! (charted approach depth at MLLW plus the tide height) exceeds the vessel's
//! draught, optionally restricted to daylight hours.
//!
//! ## Pipeline
//!
//! 1. **Resolve**: look up the vessel (by IMO number) and the port (by UN/LOCODE)
//!    in an immutable [`registry::ReferenceData`] built once at startup
//! 2. **Reconstruct**: interpolate the port's discrete tide samples onto a
//!    1-minute grid covering 14 days ([`reconstruct`])
//! 3. **Extract**: walk the depth grid and collect the runs where depth exceeds
//!    draught ([`windows`])
//! 4. **Intersect**: clip the tidal windows against sunrise/sunset windows
//!    ([`daylight`], [`intersect`])
//!
//! [`forecast::Forecaster`] ties the steps together.
//!
//! ## Time Semantics
//!
//! All timestamps are [`NaiveDateTime`] clock values. No time-zone conversion
//! happens anywhere in the crate.
//!
//! ## Core Types
//!
//! - [`Vessel`] and [`Port`]: reference data, immutable once loaded
//! - [`TideSample`]: one tide height observation or prediction for a port
//! - [`Window`]: a strictly non-empty `[start, end]` interval

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

// Module declarations
pub mod config;
pub mod daylight;
pub mod error;
pub mod forecast;
pub mod intersect;
pub mod reconstruct;
pub mod registry;
pub mod renderer;
pub mod synthetic;
pub mod windows;

pub use error::ForecastError;
pub use forecast::{CombinedForecast, Forecaster, TidalForecast};
pub use reconstruct::{DepthSeries, ForecastSettings, TimeGrid};

/// A vessel as registered in the reference data.
///
/// # Example
/// ```
/// use tide_window_lib::Vessel;
///
/// let vessel = Vessel {
///     imo: 9790933,
///     draught: 13.418,
///     name: "UNITY LIFE".to_string(),
///     dwt: 81_000.0,
/// };
/// assert!(vessel.draught > 0.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    /// IMO number, the vessel's registry key
    pub imo: u64,
    /// Maximum draught in metres
    pub draught: f64,
    /// Vessel name
    pub name: String,
    /// Deadweight tonnage
    pub dwt: f64,
}

/// A port and the charted depth of its approach channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// UN/LOCODE, the port's registry key (e.g. "AUBNE")
    pub unlocode: String,
    /// Port name; tide samples reference the port by this name
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Approach channel depth at mean lower low water, in metres
    pub approach_depth: f64,
}

/// A single tide height for a port at a point in time.
///
/// Heights are in metres relative to MLLW, so the total water depth in the
/// approach channel is `port.approach_depth + height`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideSample {
    /// Name of the port this sample belongs to (matches [`Port::name`])
    pub port_name: String,
    pub timestamp: NaiveDateTime,
    /// Tide height in metres above MLLW
    pub height: f64,
}

/// A closed time interval with `start < end`.
///
/// Windows are only constructed through [`Window::new`] and
/// [`Window::normalized`], which refuse zero-length intervals, so every window
/// handed out by this crate has a positive duration.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use tide_window_lib::Window;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let start = day.and_hms_opt(6, 0, 0).unwrap();
/// let end = day.and_hms_opt(18, 0, 0).unwrap();
///
/// assert!(Window::new(start, end).is_some());
/// assert!(Window::new(start, start).is_none());
/// assert_eq!(Window::normalized(end, start), Window::new(start, end));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    /// Create a window, or `None` unless `start < end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start < end).then_some(Window { start, end })
    }

    /// Create a window from two instants in either order.
    ///
    /// Returns `None` only when both instants are equal.
    pub fn normalized(a: NaiveDateTime, b: NaiveDateTime) -> Option<Self> {
        if a <= b {
            Self::new(a, b)
        } else {
            Self::new(b, a)
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True if `instant` lies within the window, bounds included.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// True if `self` lies entirely within `other`.
    pub fn is_within(&self, other: &Window) -> bool {
        other.start <= self.start && self.end <= other.end
    }

    /// The overlapping part of two windows.
    ///
    /// Touching windows (one ends exactly where the other starts) do not
    /// overlap and yield `None`.
    pub fn intersection(&self, other: &Window) -> Option<Window> {
        Window::new(self.start.max(other.start), self.end.min(other.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn window_rejects_empty_and_reversed_intervals() {
        assert!(Window::new(at(6, 0), at(6, 0)).is_none());
        assert!(Window::new(at(7, 0), at(6, 0)).is_none());
        assert!(Window::normalized(at(6, 0), at(6, 0)).is_none());
    }

    #[test]
    fn intersection_of_overlapping_windows() {
        let a = Window::new(at(2, 0), at(8, 0)).unwrap();
        let b = Window::new(at(6, 0), at(18, 0)).unwrap();
        assert_eq!(a.intersection(&b), Window::new(at(6, 0), at(8, 0)));
        assert_eq!(a.intersection(&b), b.intersection(&a));
    }

    #[test]
    fn touching_windows_do_not_intersect() {
        let a = Window::new(at(2, 0), at(6, 0)).unwrap();
        let b = Window::new(at(6, 0), at(18, 0)).unwrap();
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn contains_includes_both_bounds() {
        let w = Window::new(at(6, 0), at(7, 0)).unwrap();
        assert!(w.contains(at(6, 0)));
        assert!(w.contains(at(7, 0)));
        assert!(!w.contains(at(7, 1)));
        assert_eq!(w.duration(), Duration::hours(1));
    }
}
