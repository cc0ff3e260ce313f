//! Export of a detection run into a VELEST project folder.
//!
//! The folder holds
//!
//! | file                  | content                                  |
//! |-----------------------|------------------------------------------|
//! | `stations_velest.sta` | station records                          |
//! | `phase_velest.pha`    | one block per exported event             |
//! | `velest.cmn`          | control file                             |
//! | `model.mod`           | initial layered velocity model           |
//! | `export_info.json`    | thresholds and counts of the export run  |
//!
//! Phase blocks are assembled in memory and only appended once they hold at
//! least one pick, the phase file never contains empty events.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ExportThresholds;
use crate::control::ControlFile;
use crate::error::{Error, Result};
use crate::filter::{ArrivalFilter, SelectedArrival};
use crate::format::{
    event_header, phase_record, seconds_since, station_record, STATION_CODE_WIDTH, STATION_FORMAT,
};
use crate::model::{EventDetection, Station};
use crate::phase::{PhaseKind, PhaseLabels};
use crate::rundir::{RunDirectory, SearchRun};
use crate::velmod::VelestModel;
use crate::weight::quality_weight;

pub const STATION_FILE: &str = "stations_velest.sta";
pub const PHASE_FILE: &str = "phase_velest.pha";
pub const CONTROL_FILE: &str = "velest.cmn";
pub const MODEL_FILE: &str = "model.mod";
pub const INFO_FILE: &str = "export_info.json";

/// Counters accumulated over one export run.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportCounts {
    pub n_picks_p: usize,
    pub n_picks_s: usize,
    /// Events written to the phase file
    pub n_events: usize,
    /// Events failing the semblance or receiver threshold
    pub n_events_rejected: usize,
    /// Qualifying events left without any acceptable pick
    pub n_events_empty: usize,
}

impl ExportCounts {
    pub fn n_picks(&self) -> usize {
        self.n_picks_p + self.n_picks_s
    }
}

/// Rendered phase block of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseBlock {
    pub text: String,
    pub n_p: usize,
    pub n_s: usize,
}

impl PhaseBlock {
    /// Header, one record per arrival and the blank terminator line.
    pub fn render(event: &EventDetection, arrivals: &[SelectedArrival<'_>]) -> Self {
        let mut block = Self {
            text: event_header(event),
            n_p: 0,
            n_s: 0,
        };
        block.text.push('\n');
        for arrival in arrivals {
            let weight = quality_weight(arrival.observed.detection_value);
            let traveltime = seconds_since(&event.time, &arrival.observed.time);
            block.text.push_str(&phase_record(
                &arrival.receiver.station,
                arrival.kind,
                weight,
                traveltime,
            ));
            block.text.push('\n');
            match arrival.kind {
                PhaseKind::P => block.n_p += 1,
                PhaseKind::S => block.n_s += 1,
            }
        }
        block.text.push('\n');
        block
    }

    pub fn is_empty(&self) -> bool {
        self.n_p == 0 && self.n_s == 0
    }
}

/// Content of `export_info.json`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ExportSummary {
    #[serde(skip)]
    pub outdir: PathBuf,
    pub thresholds: ExportThresholds,
    pub phase_labels: PhaseLabels,
    #[serde(flatten)]
    pub counts: ExportCounts,
    pub control: ControlFile,
}

/// Writes VELEST project folders.
#[derive(Debug, Clone, Default)]
pub struct VelestExporter {
    thresholds: ExportThresholds,
}

impl VelestExporter {
    pub fn new(thresholds: ExportThresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &ExportThresholds {
        &self.thresholds
    }

    /// Export the run directory `rundir` into the new folder `outdir`.
    pub fn export(&self, rundir: &Path, outdir: &Path) -> Result<ExportSummary> {
        check_outdir(outdir)?;
        let run = RunDirectory::new(rundir).load()?;
        self.export_run(&run, outdir)
    }

    /// Export an already loaded run into the new folder `outdir`.
    ///
    /// Nothing is written if the folder exists, the phase labels cannot be
    /// resolved or the velocity profile is inconsistent.
    pub fn export_run(&self, run: &SearchRun, outdir: &Path) -> Result<ExportSummary> {
        check_outdir(outdir)?;
        let labels = if run.phases.is_empty() {
            PhaseLabels::resolve(run.events.iter().flat_map(|ev| ev.phase_labels()))?
        } else {
            PhaseLabels::resolve(&run.phases)?
        };
        let model = VelestModel::from_profile(&run.velocity_profile)?;

        log::info!("exporting {} events to {}", run.events.len(), outdir.display());
        create_outdir(outdir)?;

        write_stations(&run.stations, &outdir.join(STATION_FILE))?;

        let filter = ArrivalFilter::new(&self.thresholds, &labels);
        let mut counts = ExportCounts::default();
        let mut phase_file = BufWriter::new(File::create(outdir.join(PHASE_FILE))?);
        for event in &run.events {
            if let Some(rejection) = filter.check_event(event) {
                log::debug!("event {} skipped: {}", event.time, rejection);
                counts.n_events_rejected += 1;
                continue;
            }
            let arrivals = filter.select_arrivals(event);
            let block = PhaseBlock::render(event, &arrivals);
            if block.is_empty() {
                log::warn!("no phases observed for event {}, removed", event.time);
                counts.n_events_empty += 1;
                continue;
            }
            phase_file.write_all(block.text.as_bytes())?;
            counts.n_picks_p += block.n_p;
            counts.n_picks_s += block.n_s;
            counts.n_events += 1;
        }
        phase_file.flush()?;

        let control = ControlFile::new(run.reference, counts.n_events);
        fs::write(outdir.join(CONTROL_FILE), control.render())?;
        fs::write(outdir.join(MODEL_FILE), model.render())?;

        let summary = ExportSummary {
            outdir: outdir.to_path_buf(),
            thresholds: self.thresholds.clone(),
            phase_labels: labels,
            counts,
            control,
        };
        let info = serde_json::to_string_pretty(&summary)
            .map_err(|e| Error::DataIntegrity(format!("cannot serialize export info: {e}")))?;
        fs::write(outdir.join(INFO_FILE), info)?;

        log::info!(
            "exported {} events with {} P and {} S picks, {} rejected, {} without picks",
            counts.n_events,
            counts.n_picks_p,
            counts.n_picks_s,
            counts.n_events_rejected,
            counts.n_events_empty
        );
        Ok(summary)
    }
}

fn check_outdir(outdir: &Path) -> Result<()> {
    if outdir.exists() {
        return Err(Error::Configuration(format!(
            "destination {} already exists",
            outdir.display()
        )));
    }
    Ok(())
}

/// Create `outdir`, its parent must exist and `outdir` itself must not.
fn create_outdir(outdir: &Path) -> Result<()> {
    fs::create_dir(outdir).map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => Error::Configuration(format!(
            "destination {} already exists",
            outdir.display()
        )),
        _ => Error::Io(e),
    })
}

/// Write the station file, stations are numbered in the given order.
pub fn write_stations(stations: &[Station], path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "{STATION_FORMAT}")?;
    for (idx, station) in stations.iter().enumerate() {
        if station.code.len() > STATION_CODE_WIDTH {
            log::warn!(
                "station code {} exceeds {} characters, columns will shift",
                station.code,
                STATION_CODE_WIDTH
            );
        }
        writeln!(file, "{}", station_record(station, idx + 1))?;
    }
    writeln!(file)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{ObservedArrival, PhaseDetection, Receiver};

    fn event_with(picks: &[(&str, f64)]) -> EventDetection {
        EventDetection {
            time: "2023-04-11T10:00:00Z".parse().unwrap(),
            lat: 46.0,
            lon: 7.0,
            depth: 5000.0,
            magnitude: Some(1.2),
            semblance: 0.5,
            receivers: picks
                .iter()
                .enumerate()
                .map(|(idx, (phase, confidence))| Receiver {
                    station: format!("S{idx}"),
                    phase_arrivals: vec![PhaseDetection {
                        phase: phase.to_string(),
                        observed: Some(ObservedArrival {
                            time: "2023-04-11T10:00:02.5Z".parse().unwrap(),
                            detection_value: *confidence,
                        }),
                        traveltime_delay: 0.0,
                    }],
                })
                .collect(),
        }
    }

    #[test]
    fn block_weights_and_counts() {
        let thresholds = ExportThresholds {
            min_receivers_number: 0,
            ..Default::default()
        };
        let labels = PhaseLabels {
            p: "P".to_string(),
            s: "S".to_string(),
        };
        let filter = ArrivalFilter::new(&thresholds, &labels);
        let event = event_with(&[("P", 0.35), ("P", 0.9)]);
        let block = PhaseBlock::render(&event, &filter.select_arrivals(&event));
        assert_eq!((block.n_p, block.n_s), (2, 0));
        let lines: Vec<&str> = block.text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "  S0      P   3     2.50");
        assert_eq!(lines[2], "  S1      P   0     2.50");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn empty_block_keeps_header_and_terminator() {
        let event = event_with(&[]);
        let block = PhaseBlock::render(&event, &[]);
        assert!(block.is_empty());
        assert_eq!(block.text.lines().count(), 2);
        assert!(block.text.ends_with("\n\n"));
    }

    #[test]
    fn station_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATION_FILE);
        let stations = vec![
            Station {
                code: "AAA".to_string(),
                lat: 1.0,
                lon: 2.0,
                elevation: 10.0,
            },
            Station {
                code: "BBB".to_string(),
                lat: -1.0,
                lon: -2.0,
                elevation: 20.0,
            },
        ];
        write_stations(&stations, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], STATION_FORMAT);
        assert_eq!(lines[1], "AAA    1.0000N   2.0000E   10 1   1  0.00   0.00");
        assert_eq!(lines[2], "BBB    1.0000S   2.0000W   20 1   2  0.00   0.00");
        assert!(content.ends_with("0.00\n\n"));
    }

    #[test]
    fn existing_outdir_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = VelestExporter::default();
        assert!(matches!(
            exporter.export_run(&SearchRun::default(), dir.path()),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn outdir_created_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let outdir = dir.path().join("velest");
        create_outdir(&outdir).unwrap();
        assert!(matches!(create_outdir(&outdir), Err(Error::Configuration(_))));
    }

    #[test]
    fn outdir_parent_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let outdir = dir.path().join("missing").join("velest");
        let run = SearchRun {
            phases: vec!["P".to_string(), "S".to_string()],
            ..Default::default()
        };
        let exporter = VelestExporter::default();
        assert!(matches!(
            exporter.export_run(&run, &outdir),
            Err(Error::Io(_))
        ));
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn invalid_thresholds_rejected() {
        let thresholds = ExportThresholds {
            min_pick_semblance: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            VelestExporter::new(thresholds),
            Err(Error::Configuration(_))
        ));
    }
}
