use serde::{Deserialize, Serialize};

use crate::{TrackError, Waypoint};

/// Mean Earth radius (IUGG), in meters
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Haversine distance in meters. Treats the Earth as a sphere, which is well within GPS noise for
/// consecutive track points.
pub fn great_circle_distance(a: Waypoint, b: Waypoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h slightly past 1 for antipodal points
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Cumulative arc-length in meters at each waypoint of a track. The first entry is always 0 and
/// entries never decrease.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceIndex {
    cumulative: Vec<f64>,
}

impl DistanceIndex {
    pub fn as_slice(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Always false for an index built from a track
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }
}

/// Fails only for an empty track.
pub fn build_distance_index(track: &[Waypoint]) -> Result<DistanceIndex, TrackError> {
    if track.is_empty() {
        return Err(TrackError::InvalidTrack);
    }

    let mut cumulative = Vec::with_capacity(track.len());
    cumulative.push(0.0);
    let mut zero_length = 0;
    for pair in track.windows(2) {
        let dist = great_circle_distance(pair[0], pair[1]);
        if dist == 0.0 {
            zero_length += 1;
        }
        let so_far = cumulative[cumulative.len() - 1];
        cumulative.push(so_far + dist);
    }
    if zero_length > 0 {
        debug!(
            "Track of {} waypoints has {} zero-length segments",
            track.len(),
            zero_length
        );
    }
    Ok(DistanceIndex { cumulative })
}
