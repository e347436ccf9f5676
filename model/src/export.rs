use anyhow::Result;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};

use crate::{Simulation, SimulationClock};

impl Simulation {
    /// The track as a LineString, plus a Point for every runner at the clock's time
    pub fn to_geojson(&self, clock: &SimulationClock) -> GeoJson {
        let mut features = Vec::new();

        let mut feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(
                self.track
                    .track()
                    .waypoints()
                    .iter()
                    .map(|pt| pt.to_lon_lat().to_vec())
                    .collect(),
            ))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("type", "track");
        feature.set_property("total_distance_m", self.track.total_distance());
        features.push(feature);

        for pos in self.positions(clock) {
            let mut feature = Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(
                    pos.position.to_lon_lat().to_vec(),
                ))),
                id: None,
                properties: None,
                foreign_members: None,
            };
            feature.set_property("type", "runner");
            feature.set_property("name", pos.name);
            feature.set_property("speed_kmh", pos.speed_kmh);
            feature.set_property("distance_m", pos.distance);
            feature.set_property("finished", pos.finished);
            features.push(feature);
        }

        GeoJson::FeatureCollection(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn export_to_geojson(&self, path: &str, clock: &SimulationClock) -> Result<()> {
        let gj = self.to_geojson(clock);
        fs_err::write(path, serde_json::to_string_pretty(&gj)?)?;
        info!("Wrote {path}");
        Ok(())
    }
}
