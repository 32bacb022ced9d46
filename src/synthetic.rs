//! # Synthetic Harmonic Tide Model
//!
//! Generates tide samples from a sum of sinusoidal constituents. Used by the
//! `demo` command so the binary runs without any reference data, and by the
//! test suite to build tide curves with known crests and troughs.
//!
//! ## Model
//! `height(t) = mean + Σ amplitude · sin(2π · t / period + phase)`, with `t`
//! in hours since the series start.
//!
//! The default two-constituent model uses the principal lunar (M2, 12.42 h)
//! and principal solar (S2, 12.00 h) semidiurnal constituents, whose beat
//! gives a spring–neap cycle of about 14.8 days.
//!
//! ## Accuracy Trade-offs
//! - ✅ **Correct period**: matches the real semidiurnal cycle
//! - ✅ **Spring–neap envelope**: from the M2/S2 beat
//! - ❌ **No diurnal inequality**: both daily high waters are equal
//! - ❌ **No station phase**: not synchronized to any real port

use crate::TideSample;
use chrono::{Duration, NaiveDateTime};
use std::f64::consts::TAU;

/// Principal lunar semidiurnal period
const M2_PERIOD_HOURS: f64 = 12.42;
/// Principal solar semidiurnal period
const S2_PERIOD_HOURS: f64 = 12.00;

/// One sinusoidal tide constituent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constituent {
    /// Half the peak-to-trough range, metres
    pub amplitude: f64,
    pub period_hours: f64,
    /// Phase at the series start, radians
    pub phase: f64,
}

/// Mean level plus a set of constituents.
#[derive(Clone, Debug, PartialEq)]
pub struct HarmonicModel {
    /// Mean tide height above MLLW, metres
    pub mean: f64,
    pub constituents: Vec<Constituent>,
}

impl HarmonicModel {
    /// A single sinusoid oscillating between `mean - amplitude` and `mean + amplitude`.
    pub fn semidiurnal(mean: f64, amplitude: f64, period_hours: f64) -> Self {
        HarmonicModel {
            mean,
            constituents: vec![Constituent {
                amplitude,
                period_hours,
                phase: 0.0,
            }],
        }
    }

    /// M2 + S2 with amplitudes typical of a mesotidal port (spring range ≈ 3.2 m).
    pub fn m2_s2(mean: f64) -> Self {
        HarmonicModel {
            mean,
            constituents: vec![
                Constituent {
                    amplitude: 1.37,
                    period_hours: M2_PERIOD_HOURS,
                    phase: 0.0,
                },
                Constituent {
                    amplitude: 0.21,
                    period_hours: S2_PERIOD_HOURS,
                    phase: 0.0,
                },
            ],
        }
    }

    /// Shift every constituent's phase by `degrees`.
    pub fn with_phase_deg(mut self, degrees: f64) -> Self {
        for c in &mut self.constituents {
            c.phase += degrees.to_radians();
        }
        self
    }

    /// Tide height `hours` after the series start.
    pub fn height_at(&self, hours: f64) -> f64 {
        self.mean
            + self
                .constituents
                .iter()
                .map(|c| c.amplitude * (hours * TAU / c.period_hours + c.phase).sin())
                .sum::<f64>()
    }
}

/// Sample `model` for `port_name` every `step_minutes` from `start`, covering
/// `hours` hours inclusive of both ends.
///
/// A non-positive step yields no samples.
pub fn harmonic_samples(
    port_name: &str,
    start: NaiveDateTime,
    hours: i64,
    step_minutes: i64,
    model: &HarmonicModel,
) -> Vec<TideSample> {
    if step_minutes <= 0 || hours < 0 {
        return Vec::new();
    }

    let count = hours * 60 / step_minutes + 1;
    let mut samples = Vec::with_capacity(count as usize);
    for step in 0..count {
        let minutes = step * step_minutes;
        samples.push(TideSample {
            port_name: port_name.to_string(),
            timestamp: start + Duration::minutes(minutes),
            height: model.height_at(minutes as f64 / 60.0),
        });
    }
    samples
}
