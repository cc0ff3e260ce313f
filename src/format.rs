//! Fixed-column records of the VELEST input files.
//!
//! VELEST reads its inputs positionally (Fortran formats), every width below
//! is part of the file contract. Functions return single lines without the
//! trailing newline.

use chrono::{DateTime, Timelike, Utc};

use crate::error::{Error, Result};
use crate::model::{EventDetection, Station};
use crate::phase::PhaseKind;

/// Widest station code the station and phase records can hold.
pub const STATION_CODE_WIDTH: usize = 6;

/// Fortran format descriptor heading the station file.
pub const STATION_FORMAT: &str = "(a6,f7.4,a1,1x,f8.4,a1,1x,i4,1x,i1,1x,i3,1x,f5.2,2x,f5.2)";

/// Absolute latitude and its hemisphere letter.
pub fn latitude(lat: f64) -> (f64, char) {
    if lat < 0.0 {
        (lat.abs(), 'S')
    } else {
        (lat.abs(), 'N')
    }
}

/// Absolute longitude and its hemisphere letter.
pub fn longitude(lon: f64) -> (f64, char) {
    if lon < 0.0 {
        (lon.abs(), 'W')
    } else {
        (lon.abs(), 'E')
    }
}

/// Signed seconds from `origin` to `time`.
pub fn seconds_since(origin: &DateTime<Utc>, time: &DateTime<Utc>) -> f64 {
    let delta = time.signed_duration_since(*origin);
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

/// Station line, `index` is the 1-based position in the station file.
pub fn station_record(station: &Station, index: usize) -> String {
    let (lat, ns) = latitude(station.lat);
    let (lon, ew) = longitude(station.lon);
    format!(
        "{:<6}{:7.4}{} {:8.4}{} {:4} 1 {:3}  0.00   0.00",
        station.code,
        lat,
        ns,
        lon,
        ew,
        station.elevation.trunc() as i64,
        index
    )
}

/// Read back code, position and elevation of a station line.
pub fn parse_station_record(line: &str) -> Result<Station> {
    let field = |start: usize, end: usize| {
        line.get(start..end).ok_or_else(|| {
            Error::DataIntegrity(format!("station record too short: {line:?}"))
        })
    };
    let number = |start: usize, end: usize| -> Result<f64> {
        let raw = field(start, end)?.trim();
        raw.parse::<f64>()
            .map_err(|e| Error::DataIntegrity(format!("bad number {raw:?} in station record: {e}")))
    };

    let mut lat = number(6, 13)?;
    match field(13, 14)? {
        "N" => {}
        "S" => lat = -lat,
        other => {
            return Err(Error::DataIntegrity(format!("bad latitude hemisphere {other:?}")));
        }
    }
    let mut lon = number(15, 23)?;
    match field(23, 24)? {
        "E" => {}
        "W" => lon = -lon,
        other => {
            return Err(Error::DataIntegrity(format!("bad longitude hemisphere {other:?}")));
        }
    }
    Ok(Station {
        code: field(0, 6)?.trim_end().to_string(),
        lat,
        lon,
        elevation: number(25, 29)?,
    })
}

/// Event header line of a phase block.
///
/// Seconds carry two fractional digits, truncated from the sub-second part.
pub fn event_header(event: &EventDetection) -> String {
    let (lat, ns) = latitude(event.lat);
    let (lon, ew) = longitude(event.lon);
    // leap seconds report nanoseconds beyond 1e9
    let centis = (event.time.nanosecond() / 10_000_000).min(99);
    format!(
        "{} {:2}.{:02} {:7.4}{} {:8.4}{} {:7.2}  {:5.2}",
        event.time.format("%y%m%d %H%M"),
        event.time.second(),
        centis,
        lat,
        ns,
        lon,
        ew,
        event.depth / 1000.0,
        event.magnitude.unwrap_or(0.0)
    )
}

/// Phase line of a phase block, `traveltime` in seconds after origin.
pub fn phase_record(station: &str, kind: PhaseKind, weight: u8, traveltime: f64) -> String {
    if station.len() > STATION_CODE_WIDTH {
        log::warn!(
            "station code {} exceeds {} characters, phase columns will shift",
            station,
            STATION_CODE_WIDTH
        );
    }
    format!(
        "  {:<6}  {}   {}  {:7.2}",
        station,
        kind.letter(),
        weight,
        traveltime
    )
}

/// Layer line of the velocity model, km/s and km.
pub fn velocity_layer(velocity: f64, depth: f64, damping: f64) -> String {
    format!("{:5.2}     {:7.2}  {:7.3}", velocity, depth, damping)
}
