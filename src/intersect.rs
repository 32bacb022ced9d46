//! Intersection of tidal and daylight windows.

use crate::Window;
use tracing::debug;

/// True if `windows` is sorted by start and no window overlaps its successor.
///
/// Windows that touch (`a.end == b.start`) still count as disjoint.
pub fn is_sorted_disjoint(windows: &[Window]) -> bool {
    windows.windows(2).all(|pair| pair[0].end <= pair[1].start)
}

/// Every non-empty overlap between a tidal window and a daylight window.
///
/// An overlap is `[max(starts), min(ends)]` and is emitted only when its start
/// is strictly before its end, so touching windows contribute nothing.
///
/// Both lists are normally sorted and internally disjoint, which allows an
/// O(n+m) merge. Otherwise the full cross product is taken instead; either
/// way the result holds the same overlaps, in chronological order.
pub fn intersect_windows(tidal: &[Window], daylight: &[Window]) -> Vec<Window> {
    if is_sorted_disjoint(tidal) && is_sorted_disjoint(daylight) {
        return sweep(tidal, daylight);
    }

    debug!(
        tidal = tidal.len(),
        daylight = daylight.len(),
        "window lists not sorted and disjoint, intersecting pairwise"
    );
    let mut combined: Vec<Window> = tidal
        .iter()
        .flat_map(|t| daylight.iter().filter_map(move |d| t.intersection(d)))
        .collect();
    combined.sort();
    combined
}

fn sweep(a: &[Window], b: &[Window]) -> Vec<Window> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if let Some(overlap) = a[i].intersection(&b[j]) {
            result.push(overlap);
        }
        if a[i].end <= b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn h(hours: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::hours(hours)
    }

    fn w(start: i64, end: i64) -> Window {
        Window::new(h(start), h(end)).unwrap()
    }

    /// Reference result: every pair, sorted.
    fn cross_product(a: &[Window], b: &[Window]) -> Vec<Window> {
        let mut out: Vec<Window> = a
            .iter()
            .flat_map(|x| b.iter().filter_map(move |y| x.intersection(y)))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn overlaps_are_clipped_to_both_windows() {
        let tidal = vec![w(2, 8), w(14, 20), w(26, 32)];
        let daylight = vec![w(6, 18), w(30, 42)];
        assert_eq!(
            intersect_windows(&tidal, &daylight),
            vec![w(6, 8), w(14, 18), w(30, 32)]
        );
    }

    #[test]
    fn touching_windows_produce_nothing() {
        let tidal = vec![w(0, 6), w(18, 24)];
        let daylight = vec![w(6, 18)];
        assert!(intersect_windows(&tidal, &daylight).is_empty());
    }

    #[test]
    fn one_tidal_window_spanning_several_days() {
        let tidal = vec![w(0, 72)];
        let daylight = vec![w(6, 18), w(30, 42), w(54, 66)];
        assert_eq!(intersect_windows(&tidal, &daylight), daylight);
    }

    #[test]
    fn full_day_coverage_returns_tidal_windows_unchanged() {
        let tidal = vec![w(1, 5), w(13, 17), w(25, 29), w(37, 47)];
        let daylight = vec![w(0, 24), w(24, 48)];
        assert_eq!(intersect_windows(&tidal, &daylight), tidal);
    }

    #[test]
    fn empty_inputs() {
        assert!(intersect_windows(&[], &[w(0, 1)]).is_empty());
        assert!(intersect_windows(&[w(0, 1)], &[]).is_empty());
    }

    #[test]
    fn sweep_matches_cross_product() {
        let tidal: Vec<Window> = (0..20).map(|k| w(k * 7, k * 7 + 3)).collect();
        let daylight: Vec<Window> = (0..6).map(|d| w(d * 24 + 6, d * 24 + 18)).collect();
        assert_eq!(
            intersect_windows(&tidal, &daylight),
            cross_product(&tidal, &daylight)
        );
    }

    #[test]
    fn overlapping_daylight_input_falls_back_to_pairwise() {
        let tidal = vec![w(0, 10), w(12, 20)];
        let daylight = vec![w(2, 14), w(4, 16)];
        assert!(!is_sorted_disjoint(&daylight));
        assert_eq!(
            intersect_windows(&tidal, &daylight),
            cross_product(&tidal, &daylight)
        );
    }
}
