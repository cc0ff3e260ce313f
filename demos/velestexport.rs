use std::path::PathBuf;

use clap::{self, Parser};
use velestio::{ExportThresholds, VelestExporter};

/// Export a detection run directory to a VELEST project folder
#[derive(clap::Parser)]
struct Cmd {
    /// detection run directory to read
    rundir: PathBuf,
    /// project folder to create, must not exist
    outdir: PathBuf,
    /// JSON file with export thresholds
    #[arg(short, long)]
    thresholds: Option<PathBuf>,
    /// Minimum event semblance
    #[arg(long)]
    min_pick_semblance: Option<f64>,
    /// Minimum number of receivers with a P arrival
    #[arg(long)]
    min_receivers_number: Option<usize>,
    /// Minimum pick probability for P phases
    #[arg(long)]
    min_p_phase_confidence: Option<f64>,
    /// Minimum pick probability for S phases
    #[arg(long)]
    min_s_phase_confidence: Option<f64>,
    /// Maximum difference between theoretical and observed arrival, seconds
    #[arg(long)]
    max_traveltime_delay: Option<f64>,
}

impl Cmd {
    fn export_thresholds(&self) -> anyhow::Result<ExportThresholds> {
        let mut thresholds = match &self.thresholds {
            Some(path) => ExportThresholds::load(path)?,
            None => ExportThresholds::default(),
        };
        if let Some(value) = self.min_pick_semblance {
            thresholds.min_pick_semblance = value;
        }
        if let Some(value) = self.min_receivers_number {
            thresholds.min_receivers_number = value;
        }
        if let Some(value) = self.min_p_phase_confidence {
            thresholds.min_p_phase_confidence = value;
        }
        if let Some(value) = self.min_s_phase_confidence {
            thresholds.min_s_phase_confidence = value;
        }
        if let Some(value) = self.max_traveltime_delay {
            thresholds.max_traveltime_delay = value;
        }
        Ok(thresholds)
    }
}

fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
    let cmd = Cmd::parse();
    let exporter = VelestExporter::new(cmd.export_thresholds()?)?;
    let summary = exporter.export(&cmd.rundir, &cmd.outdir)?;
    println!(
        "{}: {} events, {} P picks, {} S picks",
        summary.outdir.display(),
        summary.counts.n_events,
        summary.counts.n_picks_p,
        summary.counts.n_picks_s
    );
    Ok(())
}
