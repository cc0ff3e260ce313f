//! Detection run directories.
//!
//! A run directory holds the search setup in `search.json` and the located
//! events in `detections.json`, one JSON object per line:
//!
//! ```text
//! rundir/
//! ├── search.json       reference location, phase labels, stations, velocity profile
//! └── detections.json   one EventDetection per line
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{EventDetection, Location, Station, VelocityProfile};

pub const SEARCH_FILE: &str = "search.json";
pub const DETECTIONS_FILE: &str = "detections.json";

/// Everything an export needs from a detection run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct SearchRun {
    /// Center of the search volume
    pub reference: Location,
    /// Phase labels emitted by the detection engine
    pub phases: Vec<String>,
    pub stations: Vec<Station>,
    pub velocity_profile: VelocityProfile,
    #[serde(skip)]
    pub events: Vec<EventDetection>,
}

/// Handle to a run directory on disk.
#[derive(Debug, Clone)]
pub struct RunDirectory {
    path: PathBuf,
}

impl RunDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<SearchRun> {
        let search_file = self.path.join(SEARCH_FILE);
        let json = fs::read_to_string(&search_file)?;
        let mut run: SearchRun = serde_json::from_str(&json).map_err(|e| {
            Error::DataIntegrity(format!("cannot parse {}: {e}", search_file.display()))
        })?;
        run.events = self.load_detections()?;
        log::info!(
            "loaded run {}: {} stations, {} events",
            self.path.display(),
            run.stations.len(),
            run.events.len()
        );
        Ok(run)
    }

    fn load_detections(&self) -> Result<Vec<EventDetection>> {
        let detections_file = self.path.join(DETECTIONS_FILE);
        if !detections_file.exists() {
            log::warn!("{} not found, run has no detections", detections_file.display());
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&detections_file)?;
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|e| {
                    Error::DataIntegrity(format!(
                        "{} line {}: {e}",
                        detections_file.display(),
                        idx + 1
                    ))
                })
            })
            .collect()
    }

    /// Write `run` in run directory layout, mainly for fixtures.
    pub fn save(&self, run: &SearchRun) -> Result<()> {
        fs::create_dir_all(&self.path)?;
        let search = serde_json::to_string_pretty(run)
            .map_err(|e| Error::DataIntegrity(format!("cannot serialize search: {e}")))?;
        fs::write(self.path.join(SEARCH_FILE), search)?;

        let mut detections = String::new();
        for event in &run.events {
            let line = serde_json::to_string(event)
                .map_err(|e| Error::DataIntegrity(format!("cannot serialize event: {e}")))?;
            detections.push_str(&line);
            detections.push('\n');
        }
        fs::write(self.path.join(DETECTIONS_FILE), detections)?;
        Ok(())
    }
}
