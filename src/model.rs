//! Entities handed over by the detection engine.
//!
//! Everything here is read-only for the exporter. The serde layout matches the
//! files of a detection run directory, see [`crate::RunDirectory`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic reference point, e.g. the center of the search volume.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// A seismic station. Identity is the station code.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Station {
    #[serde(alias = "station")]
    pub code: String,
    pub lat: f64,
    pub lon: f64,
    /// Elevation in meters
    #[serde(default)]
    pub elevation: f64,
}

/// Observed arrival of a phase at a receiver.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ObservedArrival {
    pub time: DateTime<Utc>,
    /// Detection confidence in `[0, 1]`
    pub detection_value: f64,
}

/// Modelled phase arrival with an optional matching observation.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PhaseDetection {
    /// Phase label as emitted by the detection engine, e.g. `constant:P`
    pub phase: String,
    #[serde(default)]
    pub observed: Option<ObservedArrival>,
    /// Observed minus theoretical traveltime in seconds
    #[serde(default)]
    pub traveltime_delay: f64,
}

/// A station's association to an event.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Receiver {
    pub station: String,
    #[serde(default)]
    pub phase_arrivals: Vec<PhaseDetection>,
}

impl Receiver {
    pub fn get(&self, phase: &str) -> Option<&PhaseDetection> {
        self.phase_arrivals.iter().find(|det| det.phase == phase)
    }

    /// Whether this receiver carries an observed arrival for `phase`.
    pub fn has_observation(&self, phase: &str) -> bool {
        self.get(phase).map_or(false, |det| det.observed.is_some())
    }
}

/// A located event with its receiver associations.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EventDetection {
    /// Origin time
    pub time: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    /// Depth in meters
    pub depth: f64,
    /// Average magnitude, if one was estimated
    #[serde(default)]
    pub magnitude: Option<f64>,
    pub semblance: f64,
    #[serde(default)]
    pub receivers: Vec<Receiver>,
}

impl EventDetection {
    /// Number of receivers with an observed arrival for `phase`.
    pub fn n_observations(&self, phase: &str) -> usize {
        self.receivers
            .iter()
            .filter(|rcv| rcv.has_observation(phase))
            .count()
    }

    /// Every phase label appearing in this event.
    pub fn phase_labels(&self) -> impl Iterator<Item = &str> {
        self.receivers
            .iter()
            .flat_map(|rcv| rcv.phase_arrivals.iter().map(|det| det.phase.as_str()))
    }
}

/// 1-D layered velocity profile as parallel samples, meters and m/s.
///
/// Discretization may repeat depth samples at layer interfaces.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct VelocityProfile {
    pub depth: Vec<f64>,
    pub vp: Vec<f64>,
    pub vs: Vec<f64>,
}

impl VelocityProfile {
    pub fn len(&self) -> usize {
        self.depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }
}
