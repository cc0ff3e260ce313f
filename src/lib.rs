#![deny(unsafe_code)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

pub use crate::config::ExportThresholds;
pub use crate::control::ControlFile;
pub use crate::error::{Error, Result};
pub use crate::export::{ExportCounts, ExportSummary, PhaseBlock, VelestExporter};
pub use crate::filter::{ArrivalFilter, EventRejection, SelectedArrival};
pub use crate::model::{
    EventDetection, Location, ObservedArrival, PhaseDetection, Receiver, Station, VelocityProfile,
};
pub use crate::phase::{PhaseKind, PhaseLabels};
pub use crate::rundir::{RunDirectory, SearchRun};
pub use crate::velmod::VelestModel;
pub use crate::weight::quality_weight;

mod config;
mod control;
mod error;
pub mod export;
mod filter;
pub mod format;
mod model;
mod phase;
pub mod rundir;
mod velmod;
mod weight;
