//! Error types for window forecasting.

/// Error type for every fallible step of a window forecast.
///
/// All variants are permanent: the computation is pure, so retrying the
/// same request yields the same error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    /// No vessel with this IMO number is registered.
    #[error("unknown vessel: IMO {imo}")]
    UnknownVessel { imo: u64 },

    /// No port with this UN/LOCODE is registered.
    #[error("unknown port: {unlocode}")]
    UnknownPort { unlocode: String },

    /// The port has too few tide samples to interpolate.
    #[error(
        "no tide data for port {port_name}: {distinct} distinct timestamp(s), at least 2 required"
    )]
    NoTideData {
        port_name: String,
        /// Number of distinct sample timestamps found for the port.
        distinct: usize,
    },

    /// The draught is zero, negative or not a finite number.
    #[error("invalid draught: {draught} m (must be a positive, finite number)")]
    InvalidDraught { draught: f64 },

    /// The sampling grid cadence is not a positive duration.
    #[error("invalid grid cadence: {millis} ms (must be positive)")]
    InvalidCadence { millis: i64 },

    /// The forecast horizon is shorter than one grid cadence.
    #[error("invalid forecast horizon: {horizon_millis} ms (must cover at least one {cadence_millis} ms cadence)")]
    InvalidHorizon {
        horizon_millis: i64,
        cadence_millis: i64,
    },
}
