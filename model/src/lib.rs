#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod clock;
mod config;
mod export;
mod runner;

use anyhow::Result;
use serde::Serialize;
use track::{IndexedTrack, Track, Waypoint};

pub use self::clock::{SimulationClock, SpeedSetting};
pub use self::config::SimulationConfig;
pub use self::runner::{Runner, RunnerID};

/// One loaded track and the runners moving along it. The track's distance index is computed once
/// here and reused by every query.
pub struct Simulation {
    track: IndexedTrack,
    runners: Vec<Runner>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunnerPosition {
    pub id: RunnerID,
    pub name: String,
    pub speed_kmh: f64,
    /// Meters along the track, never past the end
    pub distance: f64,
    pub position: Waypoint,
    pub finished: bool,
}

impl Simulation {
    pub fn new(track: Track, speeds_kmh: &[f64]) -> Result<Self> {
        let track = IndexedTrack::new(track)?;
        let mut runners = Vec::new();
        for speed in speeds_kmh {
            runners.push(Runner::new(RunnerID(runners.len()), *speed)?);
        }
        info!(
            "Simulating {} runners on a track with {} points, {:.2}m long",
            runners.len(),
            track.track().len(),
            track.total_distance()
        );
        Ok(Self { track, runners })
    }

    pub fn track(&self) -> &IndexedTrack {
        &self.track
    }

    pub fn runners(&self) -> &[Runner] {
        &self.runners
    }

    pub fn position(&self, runner: &Runner, clock: &SimulationClock) -> RunnerPosition {
        let total = self.track.total_distance();
        let covered = runner.distance_covered(clock);
        RunnerPosition {
            id: runner.id,
            name: runner.name(),
            speed_kmh: runner.speed_kmh,
            distance: covered.min(total),
            position: self.track.position_at(covered),
            finished: covered >= total,
        }
    }

    pub fn positions(&self, clock: &SimulationClock) -> Vec<RunnerPosition> {
        self.runners
            .iter()
            .map(|runner| self.position(runner, clock))
            .collect()
    }

    /// True once every runner has reached the end of the track
    pub fn all_finished(&self, clock: &SimulationClock) -> bool {
        self.positions(clock).iter().all(|pos| pos.finished)
    }
}
