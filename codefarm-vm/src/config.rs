//! # Game Configuration
//!
//! Tunable constants of the farm: grid size, crop economy, and the host's
//! tick cadence. Every field has a default, so a config file only needs the
//! values it overrides.

use crate::error::{self, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Growth added to each watered tile per tick (ripe at 100)
    pub growth_step: u32,
    /// Gold credited by `harvest()`
    pub harvest_value: u32,
    /// Gold debited by `plant()`
    pub plant_cost: u32,
    /// Gold debited by `water()`
    pub water_cost: u32,
    /// Ledger balance at level start
    pub starting_gold: u32,
    /// Number of log lines a runner keeps
    pub max_logs: usize,
    /// Delay between ticks when a host drives the run in real time
    pub tick_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 6,
            growth_step: 25,
            harvest_value: 15,
            plant_cost: 2,
            water_cost: 1,
            starting_gold: 20,
            max_logs: 20,
            tick_interval_ms: 600,
        }
    }
}

impl GameConfig {
    /// Load a config from a JSON file and validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            error::Error::from(e)
                .with_operation("config::from_file")
                .with_context("path", path.display().to_string())
        })?;
        Self::from_json(&content)
            .map_err(|e| e.with_context("path", path.display().to_string()))
    }

    /// Parse and validate a JSON config
    pub fn from_json(content: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(content).map_err(|e| {
            error::serialization_error(format!("invalid config: {}", e))
                .with_operation("config::from_json")
                .set_source(e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(error::config_invalid("grid_size must be at least 1", "grid_size"));
        }
        if self.growth_step == 0 {
            return Err(error::config_invalid("growth_step must be at least 1", "growth_step"));
        }
        if self.max_logs == 0 {
            return Err(error::config_invalid("max_logs must be at least 1", "max_logs"));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| error::serialization_error(e.to_string()).with_operation("config::to_json"))
    }
}
