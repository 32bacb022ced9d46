//! # Window Forecasting
//!
//! [`Forecaster`] is the entry point for callers: it resolves the vessel and
//! port, reconstructs the depth series, extracts tidal windows and, on request,
//! clips them to daylight.
//!
//! The forecaster only borrows its registry, so one [`ReferenceData`] built at
//! startup can serve any number of forecasters and requests.
//!
//! [`ReferenceData`]: crate::registry::ReferenceData

use crate::{
    daylight::{DaylightProvider, SolarDaylight},
    error::ForecastError,
    intersect::intersect_windows,
    reconstruct::{reconstruct_depths, DepthSeries, ForecastSettings},
    registry::{PortRegistry, TideSampleStore, VesselRegistry},
    windows::extract_windows,
    Port, Vessel, Window,
};
use chrono::NaiveDateTime;
use tracing::debug;

/// Default number of daylight days requested for combined windows
pub const DEFAULT_DAYLIGHT_DAYS: u32 = 14;

/// Tidal windows together with the series they were extracted from.
#[derive(Clone, Debug)]
pub struct TidalForecast {
    pub vessel: Vessel,
    pub port: Port,
    /// Ordered, pairwise-disjoint tidal windows
    pub windows: Vec<Window>,
    /// Depth series on the forecast grid, kept for charting
    pub series: DepthSeries,
}

/// Tidal, daylight and combined windows for one request.
#[derive(Clone, Debug)]
pub struct CombinedForecast {
    pub vessel: Vessel,
    pub port: Port,
    /// Overlaps of tidal and daylight windows, chronological
    pub combined: Vec<Window>,
    pub tidal: Vec<Window>,
    pub daylight: Vec<Window>,
    pub series: DepthSeries,
}

/// Computes navigability windows against a borrowed registry.
#[derive(Clone, Debug)]
pub struct Forecaster<'a, R, D = SolarDaylight> {
    registry: &'a R,
    daylight: D,
    settings: ForecastSettings,
}

impl<'a, R> Forecaster<'a, R, SolarDaylight>
where
    R: VesselRegistry + PortRegistry + TideSampleStore,
{
    /// A forecaster using the default 14-day, 1-minute grid and solar daylight.
    pub fn new(registry: &'a R) -> Self {
        Forecaster {
            registry,
            daylight: SolarDaylight,
            settings: ForecastSettings::default(),
        }
    }
}

impl<'a, R, D> Forecaster<'a, R, D>
where
    R: VesselRegistry + PortRegistry + TideSampleStore,
    D: DaylightProvider,
{
    /// Replace the daylight provider.
    pub fn with_daylight<E: DaylightProvider>(self, daylight: E) -> Forecaster<'a, R, E> {
        Forecaster {
            registry: self.registry,
            daylight,
            settings: self.settings,
        }
    }

    /// Replace the grid horizon and cadence.
    pub fn with_settings(mut self, settings: ForecastSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    /// Tidal windows for vessel `imo` arriving at port `unlocode` at `arrival`.
    ///
    /// # Errors
    /// - [`ForecastError::UnknownVessel`] / [`ForecastError::UnknownPort`]
    /// - [`ForecastError::NoTideData`] if the port has fewer than two distinct
    ///   sample timestamps
    /// - [`ForecastError::InvalidDraught`] if the registered draught is not positive
    /// - [`ForecastError::InvalidCadence`] if the configured cadence is not positive
    /// - [`ForecastError::InvalidHorizon`] if the configured horizon is shorter than one cadence
    pub fn compute_tidal_windows(
        &self,
        imo: u64,
        unlocode: &str,
        arrival: NaiveDateTime,
    ) -> Result<TidalForecast, ForecastError> {
        let vessel = self.registry.vessel(imo)?;
        let port = self.registry.port(unlocode)?;

        let samples = self.registry.samples_for(&port.name);
        let series = reconstruct_depths(port, samples, arrival, &self.settings)?;
        let windows = extract_windows(&series, vessel.draught)?;

        debug!(
            imo,
            unlocode,
            %arrival,
            windows = windows.len(),
            "computed tidal windows"
        );

        Ok(TidalForecast {
            vessel: vessel.clone(),
            port: port.clone(),
            windows,
            series,
        })
    }

    /// Tidal windows restricted to daylight over `days` days from the arrival date.
    ///
    /// The tidal horizon is the configured grid horizon regardless of `days`.
    pub fn compute_combined_windows(
        &self,
        imo: u64,
        unlocode: &str,
        arrival: NaiveDateTime,
        days: u32,
    ) -> Result<CombinedForecast, ForecastError> {
        let TidalForecast {
            vessel,
            port,
            windows: tidal,
            series,
        } = self.compute_tidal_windows(imo, unlocode, arrival)?;

        let daylight =
            self.daylight
                .daylight_windows(port.latitude, port.longitude, arrival.date(), days);
        let combined = intersect_windows(&tidal, &daylight);

        debug!(
            imo,
            unlocode,
            daylight = daylight.len(),
            combined = combined.len(),
            "computed combined windows"
        );

        Ok(CombinedForecast {
            vessel,
            port,
            combined,
            tidal,
            daylight,
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daylight::FullDaylight;
    use crate::registry::{ReferenceData, ReferenceDocument};
    use crate::synthetic::{harmonic_samples, HarmonicModel};
    use chrono::{Duration, NaiveDate};

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn reference(draught: f64) -> ReferenceData {
        let model = HarmonicModel::semidiurnal(1.0, 2.0, 12.0).with_phase_deg(-90.0);
        ReferenceData::from_document(ReferenceDocument {
            vessels: vec![Vessel {
                imo: 9494008,
                draught,
                name: "VELSHEDA".to_string(),
                dwt: 93_000.0,
            }],
            ports: vec![Port {
                unlocode: "AUABP".to_string(),
                name: "Abbot Point".to_string(),
                latitude: -19.86,
                longitude: 148.08,
                approach_depth: 12.0,
            }],
            tide_samples: harmonic_samples("Abbot Point", t0(), 24 * 15, 10, &model),
        })
        .unwrap()
    }

    #[test]
    fn lookups_fail_before_any_computation() {
        let reference = reference(13.0);
        let forecaster = Forecaster::new(&reference);
        assert_eq!(
            forecaster.compute_tidal_windows(1, "AUABP", t0()).unwrap_err(),
            ForecastError::UnknownVessel { imo: 1 }
        );
        assert_eq!(
            forecaster
                .compute_tidal_windows(9494008, "XXXXX", t0())
                .unwrap_err(),
            ForecastError::UnknownPort {
                unlocode: "XXXXX".to_string()
            }
        );
    }

    #[test]
    fn registered_non_positive_draught_is_rejected() {
        let reference = reference(0.0);
        let forecaster = Forecaster::new(&reference);
        assert!(matches!(
            forecaster.compute_tidal_windows(9494008, "AUABP", t0()),
            Err(ForecastError::InvalidDraught { .. })
        ));
    }

    #[test]
    fn tidal_forecast_carries_series_for_default_grid() {
        let reference = reference(13.0);
        let forecast = Forecaster::new(&reference)
            .compute_tidal_windows(9494008, "AUABP", t0())
            .unwrap();
        assert_eq!(forecast.series.len(), 20160);
        assert_eq!(forecast.series.grid().first(), Some(t0()));
        assert_eq!(forecast.windows.len(), 28);
        assert_eq!(forecast.vessel.imo, 9494008);
    }

    #[test]
    fn full_daylight_keeps_tidal_windows() {
        let reference = reference(13.0);
        let forecast = Forecaster::new(&reference)
            .with_daylight(FullDaylight)
            .compute_combined_windows(9494008, "AUABP", t0(), DEFAULT_DAYLIGHT_DAYS)
            .unwrap();
        assert_eq!(forecast.combined, forecast.tidal);
        assert_eq!(forecast.daylight.len(), 14);
    }

    #[test]
    fn combined_windows_lie_in_tidal_and_daylight_windows() {
        let reference = reference(13.0);
        let forecast = Forecaster::new(&reference)
            .compute_combined_windows(9494008, "AUABP", t0(), DEFAULT_DAYLIGHT_DAYS)
            .unwrap();
        assert!(!forecast.combined.is_empty());
        for window in &forecast.combined {
            assert!(forecast.tidal.iter().any(|t| window.is_within(t)));
            assert!(forecast.daylight.iter().any(|d| window.is_within(d)));
        }
    }

    #[test]
    fn custom_settings_change_the_grid() {
        let reference = reference(13.0);
        let settings = ForecastSettings {
            horizon: Duration::days(2),
            cadence: Duration::minutes(5),
        };
        let forecast = Forecaster::new(&reference)
            .with_settings(settings)
            .compute_tidal_windows(9494008, "AUABP", t0())
            .unwrap();
        assert_eq!(forecast.series.len(), 576);
        assert_eq!(forecast.windows.len(), 4);
    }
}
