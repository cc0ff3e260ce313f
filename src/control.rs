//! VELEST control file (`velest.cmn`).
//!
//! The layout follows the VELEST manual, each numbered line is read
//! list-directed. Only the fields below vary between exports, the remaining
//! values are the usual defaults for a simultaneous inversion run.

use serde::Serialize;

use crate::model::Location;

/// Parameters substituted into the control file template.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ControlFile {
    pub ref_lat: f64,
    /// VELEST counts longitude positive towards west
    pub ref_lon: f64,
    pub n_earthquakes: usize,
    /// Single event location mode instead of simultaneous inversion
    pub isingle: bool,
    /// Epicentral distance cutoff, km
    pub max_distance_station: f64,
    /// Shallowest allowed hypocenter, km
    pub min_depth: f64,
    pub allow_low_velocity: bool,
    pub vp_vs_ratio: f64,
    pub velocity_damping: f64,
    pub station_correction_damping: f64,
    pub use_elevation: bool,
    pub use_station_correction: bool,
    pub iteration_number: u32,
    pub invertratio: u32,
    pub model_file: String,
    pub station_file: String,
    pub phase_file: String,
    pub mainout_file: String,
    pub outcheck_file: String,
    pub finalcnv_file: String,
    pub stacorrection_file: String,
}

impl Default for ControlFile {
    fn default() -> Self {
        Self {
            ref_lat: 0.0,
            ref_lon: 0.0,
            n_earthquakes: 0,
            isingle: false,
            max_distance_station: 200.0,
            min_depth: -0.2,
            allow_low_velocity: false,
            vp_vs_ratio: 1.65,
            velocity_damping: 1.0,
            station_correction_damping: 0.1,
            use_elevation: false,
            use_station_correction: false,
            iteration_number: 99,
            invertratio: 0,
            model_file: "model.mod".to_string(),
            station_file: "stations_velest.sta".to_string(),
            phase_file: "phase_velest.pha".to_string(),
            mainout_file: "main.out".to_string(),
            outcheck_file: "log.out".to_string(),
            finalcnv_file: "final.cnv".to_string(),
            stacorrection_file: "stacor.dat".to_string(),
        }
    }
}

fn flag(value: bool) -> u8 {
    u8::from(value)
}

impl ControlFile {
    /// Control file for `n_earthquakes` events around `reference`.
    pub fn new(reference: Location, n_earthquakes: usize) -> Self {
        Self {
            ref_lat: reference.lat,
            // no -0.0 on the prime meridian
            ref_lon: 0.0 - reference.lon,
            n_earthquakes,
            ..Default::default()
        }
    }

    pub fn render(&self) -> String {
        format!(
            "velest parameters are below, please modify according to their documents
{ref_lat:?}   {ref_lon:?}      0            0.0      0     0.00      1
{n_earthquakes}      0      0.0
{isingle}     0
{max_distance_station:?}  0      {min_depth:?}    0.20    5.00    {use_station_correction}
2      0.75      {vp_vs_ratio:?}       1
0.01    0.01      0.01    {velocity_damping:?}     {station_correction_damping:?}
1       0       0        {use_elevation}        {use_station_correction}
1         1         2        0
0         0         0         0         0         0        0
0.001   {iteration_number}   {invertratio}
{model_file}
{station_file}

regionsnamen.dat
regionskoord.dat


{phase_file}

{mainout_file}
{outcheck_file}
{finalcnv_file}
{stacorrection_file}
",
            ref_lat = self.ref_lat,
            ref_lon = self.ref_lon,
            n_earthquakes = self.n_earthquakes,
            isingle = flag(self.isingle),
            max_distance_station = self.max_distance_station,
            min_depth = self.min_depth,
            use_station_correction = flag(self.use_station_correction),
            vp_vs_ratio = self.vp_vs_ratio,
            velocity_damping = self.velocity_damping,
            station_correction_damping = self.station_correction_damping,
            use_elevation = flag(self.use_elevation),
            iteration_number = self.iteration_number,
            invertratio = self.invertratio,
            model_file = self.model_file,
            station_file = self.station_file,
            phase_file = self.phase_file,
            mainout_file = self.mainout_file,
            outcheck_file = self.outcheck_file,
            finalcnv_file = self.finalcnv_file,
            stacorrection_file = self.stacorrection_file,
        )
    }
}
