//! # Reference Data Registry
//!
//! Vessels, ports and tide samples are loaded once at startup into an
//! immutable [`ReferenceData`] value and shared by reference with every
//! forecast. Nothing mutates it afterwards, so it can be read from many
//! threads at once without locking.
//!
//! ## Lookup Interfaces
//! The forecaster only sees the three traits below, so alternative stores
//! (a database, a remote service) can be swapped in:
//! - [`VesselRegistry`]: IMO number → [`Vessel`]
//! - [`PortRegistry`]: UN/LOCODE → [`Port`]
//! - [`TideSampleStore`]: port name → private copy of that port's samples
//!
//! ## File Format
//! A single JSON document with naive ISO-8601 timestamps:
//! ```json
//! {
//!   "vessels": [{ "imo": 9790933, "draught": 13.418, "name": "UNITY LIFE", "dwt": 81000.0 }],
//!   "ports": [{ "unlocode": "AUBNE", "name": "Brisbane", "latitude": -27.38,
//!               "longitude": 153.17, "approach_depth": 14.0 }],
//!   "tide_samples": [{ "port_name": "Brisbane", "timestamp": "2024-03-01T00:00:00", "height": 1.2 }]
//! }
//! ```
//!
//! Duplicate IMO numbers or UN/LOCODEs are rejected at load time rather than
//! silently shadowing each other.

use crate::{error::ForecastError, Port, TideSample, Vessel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fs, io, path::Path};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading reference data.
#[derive(Error, Debug)]
pub enum ReferenceDataError {
    /// Reading the reference file failed
    #[error("reference data IO: {0}")]
    Io(#[from] io::Error),

    /// The document is not valid reference JSON
    #[error("reference data parse: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate vessel IMO {imo}")]
    DuplicateVessel { imo: u64 },

    #[error("duplicate port UN/LOCODE {unlocode}")]
    DuplicatePort { unlocode: String },
}

/// Vessel lookup by IMO number.
pub trait VesselRegistry {
    fn vessel(&self, imo: u64) -> Result<&Vessel, ForecastError>;
}

/// Port lookup by UN/LOCODE.
pub trait PortRegistry {
    fn port(&self, unlocode: &str) -> Result<&Port, ForecastError>;
}

/// Tide sample access by port name.
pub trait TideSampleStore {
    /// An owned copy of every sample whose port name matches exactly.
    ///
    /// Ordering is unspecified; consumers sort.
    fn samples_for(&self, port_name: &str) -> Vec<TideSample>;
}

/// Serialized form of the reference data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDocument {
    #[serde(default)]
    pub vessels: Vec<Vessel>,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub tide_samples: Vec<TideSample>,
}

/// Immutable in-memory registry of vessels, ports and tide samples.
#[derive(Clone, Debug, Default)]
pub struct ReferenceData {
    vessels: HashMap<u64, Vessel>,
    ports: HashMap<String, Port>,
    tide_samples: Vec<TideSample>,
}

impl ReferenceData {
    /// Index a reference document.
    pub fn from_document(document: ReferenceDocument) -> Result<Self, ReferenceDataError> {
        let mut vessels = HashMap::with_capacity(document.vessels.len());
        for vessel in document.vessels {
            let imo = vessel.imo;
            if vessels.insert(imo, vessel).is_some() {
                return Err(ReferenceDataError::DuplicateVessel { imo });
            }
        }

        let mut ports = HashMap::with_capacity(document.ports.len());
        for port in document.ports {
            let unlocode = port.unlocode.clone();
            if ports.insert(unlocode.clone(), port).is_some() {
                return Err(ReferenceDataError::DuplicatePort { unlocode });
            }
        }

        Ok(ReferenceData {
            vessels,
            ports,
            tide_samples: document.tide_samples,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ReferenceDataError> {
        Self::from_document(serde_json::from_str(json)?)
    }

    /// Load reference data from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceDataError> {
        let data = fs::read(path.as_ref())?;
        let reference = Self::from_document(serde_json::from_slice(&data)?)?;
        info!(
            path = %path.as_ref().display(),
            vessels = reference.vessels.len(),
            ports = reference.ports.len(),
            tide_samples = reference.tide_samples.len(),
            "loaded reference data"
        );
        Ok(reference)
    }

    pub fn vessel_count(&self) -> usize {
        self.vessels.len()
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// The full, shared tide table.
    pub fn tide_samples(&self) -> &[TideSample] {
        &self.tide_samples
    }
}

impl VesselRegistry for ReferenceData {
    fn vessel(&self, imo: u64) -> Result<&Vessel, ForecastError> {
        self.vessels
            .get(&imo)
            .ok_or(ForecastError::UnknownVessel { imo })
    }
}

impl PortRegistry for ReferenceData {
    fn port(&self, unlocode: &str) -> Result<&Port, ForecastError> {
        self.ports
            .get(unlocode)
            .ok_or_else(|| ForecastError::UnknownPort {
                unlocode: unlocode.to_string(),
            })
    }
}

impl TideSampleStore for ReferenceData {
    fn samples_for(&self, port_name: &str) -> Vec<TideSample> {
        self.tide_samples
            .iter()
            .filter(|s| s.port_name == port_name)
            .cloned()
            .collect()
    }
}
