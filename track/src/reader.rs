use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{Track, Waypoint};

/// Reads a track from CSV with `latitude` and `longitude` columns (or `lat` and `lon`/`lng`). Row
/// order is path order. Other columns, like elevation or timestamps, are ignored.
pub fn load_csv<R: std::io::Read>(reader: R) -> Result<Track> {
    let mut waypoints = Vec::new();
    for (idx, rec) in csv::Reader::from_reader(reader).deserialize().enumerate() {
        let row = idx + 1;
        let rec: Record = rec.with_context(|| format!("row {row}"))?;
        if !rec.latitude.is_finite() || rec.latitude.abs() > 90.0 {
            bail!("row {row} has invalid latitude {}", rec.latitude);
        }
        if !rec.longitude.is_finite() || rec.longitude.abs() > 180.0 {
            bail!("row {row} has invalid longitude {}", rec.longitude);
        }
        waypoints.push(Waypoint::new(rec.latitude, rec.longitude));
    }
    if waypoints.is_empty() {
        bail!("track file has no waypoints");
    }
    info!("Loaded track with {} waypoints", waypoints.len());
    Ok(Track::new(waypoints))
}

#[derive(Deserialize)]
struct Record {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    longitude: f64,
}
