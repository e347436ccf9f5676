use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::SimulationClock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunnerID(pub usize);

/// A synthetic runner moving along the track at a constant speed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    pub id: RunnerID,
    pub speed_kmh: f64,
}

impl Runner {
    pub fn new(id: RunnerID, speed_kmh: f64) -> Result<Self> {
        if !speed_kmh.is_finite() || speed_kmh < 0.0 {
            bail!("Runner {} has invalid speed {} km/h", id.0 + 1, speed_kmh);
        }
        Ok(Self { id, speed_kmh })
    }

    pub fn name(&self) -> String {
        format!("Runner {} ({} km/h)", self.id.0 + 1, self.speed_kmh)
    }

    pub fn speed_mps(&self) -> f64 {
        self.speed_kmh / 3.6
    }

    /// Meters covered since the start, ignoring where the track ends
    pub fn distance_covered(&self, clock: &SimulationClock) -> f64 {
        self.speed_mps() * clock.elapsed_seconds()
    }
}
