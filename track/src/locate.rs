use serde::{Deserialize, Serialize};

use crate::{build_distance_index, DistanceIndex, Track, TrackError, Waypoint};

/// Finds the position `target` meters along the track, linearly blending latitude and longitude
/// between the two bracketing waypoints.
///
/// Targets at or beyond the end return the last waypoint exactly. Targets at or before the start,
/// including negative and NaN targets, return the first waypoint exactly. When the bracketing
/// segment has zero length, the earlier of its two waypoints is returned.
pub fn locate(track: &[Waypoint], distances: &[f64], target: f64) -> Result<Waypoint, TrackError> {
    if track.is_empty() {
        return Err(TrackError::InvalidTrack);
    }
    if distances.len() != track.len() {
        return Err(TrackError::MismatchedIndex {
            waypoints: track.len(),
            distances: distances.len(),
        });
    }
    Ok(interpolate(track, distances, target))
}

// Assumes a non-empty track and a matching index
fn interpolate(track: &[Waypoint], distances: &[f64], target: f64) -> Waypoint {
    let last = track.len() - 1;
    if target >= distances[last] {
        return track[last];
    }
    if target.is_nan() || target <= 0.0 {
        return track[0];
    }

    // The smallest i >= 1 with distances[i] >= target. The early return above means this is
    // always in bounds. Binary search is fine since the distances never decrease.
    let i = 1 + distances[1..].partition_point(|d| *d < target);
    let (d1, d2) = (distances[i - 1], distances[i]);
    let ratio = if d2 == d1 {
        0.0
    } else {
        (target - d1) / (d2 - d1)
    };

    let (a, b) = (track[i - 1], track[i]);
    Waypoint::new(
        a.latitude + (b.latitude - a.latitude) * ratio,
        a.longitude + (b.longitude - a.longitude) * ratio,
    )
}

/// A track paired with its distance index. The index is built once and reused for every query, and
/// since neither half can change, the pair can't go stale. Only the track is serialized; the index
/// is rebuilt on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Track", into = "Track")]
pub struct IndexedTrack {
    track: Track,
    index: DistanceIndex,
}

impl IndexedTrack {
    pub fn new(track: Track) -> Result<Self, TrackError> {
        let index = build_distance_index(track.waypoints())?;
        Ok(Self { track, index })
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn index(&self) -> &DistanceIndex {
        &self.index
    }

    /// In meters
    pub fn total_distance(&self) -> f64 {
        self.index.total()
    }

    pub fn position_at(&self, target: f64) -> Waypoint {
        interpolate(self.track.waypoints(), self.index.as_slice(), target)
    }
}

impl TryFrom<Track> for IndexedTrack {
    type Error = TrackError;

    fn try_from(track: Track) -> Result<Self, TrackError> {
        Self::new(track)
    }
}

impl From<IndexedTrack> for Track {
    fn from(indexed: IndexedTrack) -> Self {
        indexed.track
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(lat, lon)
    }

    fn equator_track() -> Vec<Waypoint> {
        vec![pt(0.0, 0.0), pt(0.0, 0.0001), pt(0.0, 0.0002)]
    }

    fn winding_track() -> Vec<Waypoint> {
        vec![
            pt(45.5017, -73.5673),
            pt(45.5030, -73.5650),
            pt(45.5030, -73.5650),
            pt(45.5055, -73.5660),
            pt(45.5040, -73.5700),
            pt(45.5017, -73.5673),
        ]
    }

    #[test]
    fn halfway_along_first_segment() {
        let track = equator_track();
        let index = build_distance_index(&track).unwrap();
        let half = index.as_slice()[1] / 2.0;
        let pos = locate(&track, index.as_slice(), half).unwrap();
        assert!(pos.latitude.abs() < 1e-12);
        assert!((pos.longitude - 0.00005).abs() < 1e-9, "got {:?}", pos);
    }

    #[test]
    fn fixed_target_on_first_segment() {
        let track = equator_track();
        let index = build_distance_index(&track).unwrap();
        let pos = locate(&track, index.as_slice(), 5.53).unwrap();
        assert!((pos.longitude - 0.00005).abs() < 1e-6, "got {:?}", pos);
    }

    #[test]
    fn zero_returns_first_exactly() {
        for track in [equator_track(), winding_track()] {
            let index = build_distance_index(&track).unwrap();
            assert_eq!(locate(&track, index.as_slice(), 0.0), Ok(track[0]));
        }
    }

    #[test]
    fn past_the_end_returns_last_exactly() {
        for track in [equator_track(), winding_track()] {
            let index = build_distance_index(&track).unwrap();
            let total = index.total();
            for target in [total, total + 0.001, total * 2.0, f64::INFINITY] {
                assert_eq!(
                    locate(&track, index.as_slice(), target),
                    Ok(*track.last().unwrap())
                );
            }
        }
    }

    #[test]
    fn negative_and_nan_clamp_to_start() {
        let track = winding_track();
        let index = build_distance_index(&track).unwrap();
        for target in [-0.5, -1000.0, f64::NEG_INFINITY, f64::NAN] {
            assert_eq!(locate(&track, index.as_slice(), target), Ok(track[0]));
        }
    }

    #[test]
    fn coincident_pair() {
        let track = vec![pt(10.0, 10.0), pt(10.0, 10.0)];
        let index = build_distance_index(&track).unwrap();
        assert_eq!(index.as_slice(), &[0.0, 0.0]);
        assert_eq!(locate(&track, index.as_slice(), 5.0), Ok(pt(10.0, 10.0)));
    }

    #[test]
    fn repeated_waypoints_mid_track() {
        let track = vec![pt(0.0, 0.0), pt(0.0, 0.001), pt(0.0, 0.001), pt(0.0, 0.002)];
        let distances = [0.0, 100.0, 100.0, 200.0];
        // Landing exactly on the repeated distance picks the first segment reaching it
        assert_eq!(locate(&track, &distances, 100.0), Ok(track[1]));
        let pos = locate(&track, &distances, 150.0).unwrap();
        assert!((pos.longitude - 0.0015).abs() < 1e-12, "got {:?}", pos);

        let track = vec![pt(1.0, 1.0), pt(1.0, 1.0), pt(2.0, 2.0)];
        let distances = [0.0, 0.0, 10.0];
        assert_eq!(locate(&track, &distances, 5.0), Ok(pt(1.5, 1.5)));
    }

    #[test]
    fn single_waypoint() {
        let track = vec![pt(-33.8688, 151.2093)];
        for target in [-1.0, 0.0, 42.0] {
            assert_eq!(locate(&track, &[0.0], target), Ok(track[0]));
        }
    }

    #[test]
    fn matches_linear_scan() {
        let track = winding_track();
        let index = build_distance_index(&track).unwrap();
        let distances = index.as_slice();
        let total = index.total();
        for step in 1..200 {
            let target = total * (step as f64) / 200.0;
            let mut i = 1;
            while distances[i] < target {
                i += 1;
            }
            let pos = locate(&track, distances, target).unwrap();
            let (a, b) = (track[i - 1], track[i]);
            let lat_range = (a.latitude.min(b.latitude), a.latitude.max(b.latitude));
            let lon_range = (a.longitude.min(b.longitude), a.longitude.max(b.longitude));
            assert!(pos.latitude >= lat_range.0 && pos.latitude <= lat_range.1);
            assert!(pos.longitude >= lon_range.0 && pos.longitude <= lon_range.1);
        }
    }

    #[test]
    fn idempotent() {
        let track = winding_track();
        let index = build_distance_index(&track).unwrap();
        let target = index.total() * 0.37;
        assert_eq!(
            locate(&track, index.as_slice(), target),
            locate(&track, index.as_slice(), target)
        );
    }

    #[test]
    fn empty_track() {
        assert_eq!(locate(&[], &[], 3.0), Err(TrackError::InvalidTrack));
        assert_eq!(locate(&[], &[0.0], 3.0), Err(TrackError::InvalidTrack));
    }

    #[test]
    fn mismatched_index() {
        let track = equator_track();
        assert_eq!(
            locate(&track, &[0.0, 11.0], 1.0),
            Err(TrackError::MismatchedIndex {
                waypoints: 3,
                distances: 2
            })
        );
    }

    #[test]
    fn indexed_track_agrees_with_free_functions() {
        let track = winding_track();
        let indexed = IndexedTrack::new(Track::new(track.clone())).unwrap();
        let index = build_distance_index(&track).unwrap();
        assert_eq!(indexed.index(), &index);
        assert_eq!(indexed.total_distance(), index.total());
        for target in [-5.0, 0.0, 120.0, 400.0, 1e9] {
            assert_eq!(
                Ok(indexed.position_at(target)),
                locate(&track, index.as_slice(), target)
            );
        }
    }

    #[test]
    fn indexed_track_rejects_empty() {
        assert_eq!(
            IndexedTrack::new(Track::default()).unwrap_err(),
            TrackError::InvalidTrack
        );
    }

    #[test]
    fn deserializing_rebuilds_the_index() {
        let indexed = IndexedTrack::new(Track::new(winding_track())).unwrap();
        let json = serde_json::to_string(&indexed).unwrap();
        assert!(!json.contains("cumulative"), "{json}");

        let loaded: IndexedTrack = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.index(), indexed.index());
        assert_eq!(loaded.position_at(300.0), indexed.position_at(300.0));

        // A stale index in the input is ignored
        let json = r#"{"waypoints": [{"latitude": 0.0, "longitude": 0.0}, {"latitude": 0.0, "longitude": 0.001}], "index": {"cumulative": [0.0]}}"#;
        let loaded: IndexedTrack = serde_json::from_str(json).unwrap();
        assert_eq!(loaded.index().len(), 2);
        assert_eq!(loaded.position_at(5000.0), pt(0.0, 0.001));
    }

    #[test]
    fn deserializing_an_empty_track_fails() {
        let err = serde_json::from_str::<IndexedTrack>(r#"{"waypoints": []}"#).unwrap_err();
        assert!(err.to_string().contains("no waypoints"), "{err}");
    }

    #[test]
    fn concurrent_queries() {
        let indexed = std::sync::Arc::new(IndexedTrack::new(Track::new(winding_track())).unwrap());
        let expected = indexed.position_at(250.0);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let indexed = indexed.clone();
                std::thread::spawn(move || indexed.position_at(250.0))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
