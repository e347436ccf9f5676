//! Turns a recorded GPS track into a distance-indexed curve, and answers "where is the point
//! D meters along this track" queries.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod distance;
mod locate;
mod reader;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use distance::{build_distance_index, great_circle_distance, DistanceIndex, EARTH_RADIUS_M};
pub use locate::{locate, IndexedTrack};
pub use reader::load_csv;

/// A geographic position in degrees. Altitude and timestamps from the source file are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl Waypoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// GeoJSON and most map libraries want `[x, y]`
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl From<(f64, f64)> for Waypoint {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// An ordered path of waypoints. Insertion order is path order, and the track is never mutated
/// after loading.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    waypoints: Vec<Waypoint>,
}

impl Track {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn first(&self) -> Option<Waypoint> {
        self.waypoints.first().copied()
    }

    pub fn last(&self) -> Option<Waypoint> {
        self.waypoints.last().copied()
    }
}

impl FromIterator<Waypoint> for Track {
    fn from_iter<I: IntoIterator<Item = Waypoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Precondition violations. Retrying with the same input can't succeed, so callers should refuse
/// to start a simulation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TrackError {
    #[error("track has no waypoints")]
    InvalidTrack,
    #[error("distance index has {distances} entries, but the track has {waypoints} waypoints")]
    MismatchedIndex { waypoints: usize, distances: usize },
}
