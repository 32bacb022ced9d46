//! Sunrise & sunset windows (NOAA low-precision sunrise equation)
//!
//! Accuracy: about a minute at mid latitudes, degrading towards the polar
//! circles. Refraction and the solar disc radius are folded into the -0.833°
//! horizon altitude. Times are naive UTC clock values.
//!
//! Days on which the sun never sets produce a window covering the whole
//! calendar day; days on which it never rises produce no window.

use crate::Window;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::trace;

/// Source of one daylight window per calendar day.
pub trait DaylightProvider {
    /// Daylight windows for `days` consecutive dates starting at `start`, in
    /// date order. Every returned window has `start < end`.
    fn daylight_windows(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        days: u32,
    ) -> Vec<Window>;
}

/// Outcome of the sunrise equation for one date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SunEvents {
    /// The sun rises and sets.
    Daylight {
        sunrise: NaiveDateTime,
        sunset: NaiveDateTime,
    },
    /// The sun stays above the horizon all day.
    PolarDay,
    /// The sun stays below the horizon all day.
    PolarNight,
}

/// J2000.0 epoch (2000-01-01 12:00 TT) as a Julian date
const J2000: f64 = 2_451_545.0;

/// `NaiveDate::num_days_from_ce` of 2000-01-01
const J2000_DAYS_FROM_CE: i32 = 730_120;

/// Axial tilt of the Earth in degrees
const OBLIQUITY_DEG: f64 = 23.4397;

/// Solar altitude at sunrise/sunset: refraction plus solar semi-diameter
const HORIZON_ALTITUDE_DEG: f64 = -0.833;

/// Compute sunrise and sunset for `date` at the given position.
///
/// `longitude` is positive east. Returned instants are UTC clock values and
/// may fall on the neighbouring date for longitudes far from Greenwich.
pub fn sun_events(latitude: f64, longitude: f64, date: NaiveDate) -> SunEvents {
    // ---------- 1. Days since J2000, shifted to local mean solar noon -----------
    let n = (date.num_days_from_ce() - J2000_DAYS_FROM_CE) as f64;
    let mean_noon = n - longitude / 360.0;

    // ---------- 2. Solar mean anomaly and equation of the centre ----------------
    let m = (357.5291 + 0.985_600_28 * mean_noon).rem_euclid(360.0);
    let m_rad = m.to_radians();
    let centre = 1.9148 * m_rad.sin() + 0.0200 * (2.0 * m_rad).sin() + 0.0003 * (3.0 * m_rad).sin();

    // ---------- 3. Ecliptic longitude and solar transit -------------------------
    let lambda = (m + centre + 180.0 + 102.9372).rem_euclid(360.0).to_radians();
    let transit = J2000 + mean_noon + 0.0053 * m_rad.sin() - 0.0069 * (2.0 * lambda).sin();

    // ---------- 4. Declination and hour angle ------------------------------------
    let declination = (lambda.sin() * OBLIQUITY_DEG.to_radians().sin()).asin();
    let phi = latitude.to_radians();
    let cos_omega = (HORIZON_ALTITUDE_DEG.to_radians().sin() - phi.sin() * declination.sin())
        / (phi.cos() * declination.cos());

    if cos_omega < -1.0 {
        return SunEvents::PolarDay;
    }
    if cos_omega > 1.0 {
        return SunEvents::PolarNight;
    }
    let half_day = cos_omega.acos().to_degrees() / 360.0;

    // Julian date of this date's 00:00 UTC is J2000 + n - 0.5
    let midnight = midnight(date);
    let at = |jd: f64| {
        let offset_ms = ((jd - (J2000 + n - 0.5)) * 86_400_000.0).round() as i64;
        midnight + Duration::milliseconds(offset_ms)
    };

    SunEvents::Daylight {
        sunrise: at(transit - half_day),
        sunset: at(transit + half_day),
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// Whole calendar day `[00:00, next 00:00]`.
fn whole_day(date: NaiveDate) -> Option<Window> {
    let start = midnight(date);
    Window::new(start, start + Duration::days(1))
}

fn dates(start: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> {
    (0..days as i64).filter_map(move |offset| start.checked_add_signed(Duration::days(offset)))
}

/// Daylight computed from the sun's position.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarDaylight;

impl DaylightProvider for SolarDaylight {
    fn daylight_windows(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        days: u32,
    ) -> Vec<Window> {
        dates(start, days)
            .filter_map(|date| match sun_events(latitude, longitude, date) {
                SunEvents::Daylight { sunrise, sunset } => Window::normalized(sunrise, sunset),
                SunEvents::PolarDay => whole_day(date),
                SunEvents::PolarNight => {
                    trace!(%date, latitude, "polar night, no daylight window");
                    None
                }
            })
            .collect()
    }
}

/// Treats every calendar day as fully lit.
///
/// Useful for tidal-only planning through the combined-window path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullDaylight;

impl DaylightProvider for FullDaylight {
    fn daylight_windows(&self, _: f64, _: f64, start: NaiveDate, days: u32) -> Vec<Window> {
        dates(start, days).filter_map(whole_day).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hours(t: NaiveDateTime, day: NaiveDate) -> f64 {
        (t - midnight(day)).num_seconds() as f64 / 3600.0
    }

    #[test]
    fn equator_equinox_has_twelve_hour_day() {
        let day = date(2024, 3, 20);
        let SunEvents::Daylight { sunrise, sunset } = sun_events(0.0, 0.0, day) else {
            panic!("expected sunrise and sunset at the equator");
        };
        let length = (sunset - sunrise).num_minutes();
        assert!((720..=735).contains(&length), "day length {length} min");
        assert!((5.9..=6.2).contains(&hours(sunrise, day)));
        assert!((17.9..=18.3).contains(&hours(sunset, day)));
    }

    #[test]
    fn london_midsummer_matches_almanac() {
        // Almanac: sunrise 03:43 UTC, sunset 20:21 UTC
        let day = date(2024, 6, 21);
        let SunEvents::Daylight { sunrise, sunset } = sun_events(51.5074, -0.1278, day) else {
            panic!("expected sunrise and sunset in London");
        };
        assert_eq!(sunrise.date(), day);
        assert_eq!(sunrise.hour(), 3);
        assert!((38..=48).contains(&sunrise.minute()));
        assert_eq!(sunset.hour(), 20);
        assert!((16..=26).contains(&sunset.minute()));
    }

    #[test]
    fn polar_day_and_night_at_svalbard() {
        assert_eq!(sun_events(78.2, 15.6, date(2024, 6, 21)), SunEvents::PolarDay);
        assert_eq!(sun_events(78.2, 15.6, date(2024, 12, 21)), SunEvents::PolarNight);
    }

    #[test]
    fn one_window_per_day_in_order() {
        let windows = SolarDaylight.daylight_windows(-27.38, 153.17, date(2024, 3, 1), 14);
        assert_eq!(windows.len(), 14);
        for pair in windows.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
        assert!(windows.iter().all(|w| w.start < w.end));
    }

    #[test]
    fn polar_day_covers_whole_date_and_polar_night_is_skipped() {
        let summer = SolarDaylight.daylight_windows(78.2, 15.6, date(2024, 6, 20), 2);
        assert_eq!(summer, vec![
            whole_day(date(2024, 6, 20)).unwrap(),
            whole_day(date(2024, 6, 21)).unwrap(),
        ]);

        let winter = SolarDaylight.daylight_windows(78.2, 15.6, date(2024, 12, 20), 3);
        assert!(winter.is_empty());
    }

    #[test]
    fn full_daylight_tiles_consecutive_days() {
        let windows = FullDaylight.daylight_windows(0.0, 0.0, date(2024, 2, 28), 3);
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].start, midnight(date(2024, 2, 28)));
        assert_eq!(windows[2].end, midnight(date(2024, 3, 2)));
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }
}
