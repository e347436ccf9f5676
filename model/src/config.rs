use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::SpeedSetting;

/// Settings for a simulation run. Every field is optional in the JSON form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub speeds_kmh: Vec<f64>,
    /// How far each tick of a running clock jumps
    pub step_seconds: f64,
    pub speed_setting: SpeedSetting,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            speeds_kmh: vec![8.0, 12.0, 16.0],
            step_seconds: 60.0,
            speed_setting: SpeedSetting::Realtime,
        }
    }
}

impl SimulationConfig {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs_err::read_to_string(path)?;
        Self::from_json(&contents).with_context(|| format!("parsing {path}"))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.step()?;
        Ok(config)
    }

    pub fn step(&self) -> Result<Duration> {
        if !self.step_seconds.is_finite() || self.step_seconds <= 0.0 {
            bail!("step_seconds must be positive, not {}", self.step_seconds);
        }
        Duration::try_from_secs_f64(self.step_seconds)
            .with_context(|| format!("step_seconds {} is too large", self.step_seconds))
    }
}
