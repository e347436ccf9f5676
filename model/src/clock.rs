use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How much simulated time passes per real second while the clock runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedSetting {
    /// 1 sim second per real second
    #[default]
    Realtime,
    /// 5 sim seconds per real second
    Fast,
    /// 30 sim seconds per real second
    Faster,
    /// 1 sim hour per real second
    Fastest,
}

impl SpeedSetting {
    pub fn multiplier(self) -> u32 {
        match self {
            SpeedSetting::Realtime => 1,
            SpeedSetting::Fast => 5,
            SpeedSetting::Faster => 30,
            SpeedSetting::Fastest => 3600,
        }
    }
}

/// Elapsed simulated time plus a play/pause flag. Owned by whoever drives the simulation and
/// passed into every position query; nothing else holds time state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationClock {
    elapsed: Duration,
    running: bool,
    setting: SpeedSetting,
}

impl SimulationClock {
    /// Paused at zero
    pub fn new() -> Self {
        Self::at(Duration::ZERO)
    }

    /// Paused at some elapsed time, like scrubbing a slider
    pub fn at(elapsed: Duration) -> Self {
        Self {
            elapsed,
            running: false,
            setting: SpeedSetting::default(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Back to zero, paused. The speed setting is kept.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = false;
    }

    pub fn speed_setting(&self) -> SpeedSetting {
        self.setting
    }

    pub fn set_speed_setting(&mut self, setting: SpeedSetting) {
        self.setting = setting;
    }

    /// Jumps forward by a fixed amount of simulated time, but only while running. Returns true if
    /// time changed. A step that would overflow `Duration` is dropped.
    pub fn step(&mut self, increment: Duration) -> bool {
        if !self.running || increment.is_zero() {
            return false;
        }
        match self.elapsed.checked_add(increment) {
            Some(elapsed) => {
                self.elapsed = elapsed;
                true
            }
            None => false,
        }
    }

    /// Advances by real wall-clock time, scaled by the speed setting. Paused clocks ignore this.
    pub fn advance_real(&mut self, real: Duration) -> bool {
        match real.checked_mul(self.setting.multiplier()) {
            Some(increment) => self.step(increment),
            None => false,
        }
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}
