use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::params::PhysicalParams;
use crate::scenario::Scenario;

// Configuration for the physical circuit and rod
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PhysicalConfig {
    pub flux_density_t: f64,
    pub rod_length_m: f64,
    pub resistance_ohm: f64,
    pub rod_mass_kg: f64,
    #[serde(default)]
    pub initial_speed_m_per_s: f64,
    #[serde(default)]
    pub external_force_n: f64,
    #[serde(default)]
    pub set_acceleration_m_per_s2: f64,
    #[serde(default = "default_field_polarity")]
    pub field_polarity: f64,
}

// Configuration for the driver loop timing
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    /// Simulated elapsed time handed to the engine per frame (s). The engine
    /// clamps it again internally, like any other frame source.
    pub frame_dt_s: f64,
    pub total_time_s: f64,
    pub record_interval_s: f64,
    #[serde(default)]
    pub slow_motion: bool,
}

// Configuration for output settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    #[serde(default = "default_save_snapshots")]
    pub save_snapshots: bool,
    #[serde(default = "default_save_timeseries")]
    pub save_timeseries: bool,
    /// Snapshot dump format: "json", "bincode", "messagepack"
    pub format: Option<String>,
}

fn default_field_polarity() -> f64 {
    1.0
}

fn default_save_snapshots() -> bool {
    true
}

fn default_save_timeseries() -> bool {
    true
}

/// Main configuration structure, loaded from a TOML file.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    pub scenario: Scenario,
    pub physical: PhysicalConfig,
    pub timing: TimingConfig,
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e)
        })?;
        let config: SimulationConfig = toml::from_str(&config_str).map_err(|e| {
            anyhow::anyhow!("Failed to parse TOML from '{}': {}", path_ref.display(), e)
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the engine cannot run. Parameter invariants are
    /// delegated to [`PhysicalParams::validate`]; the timing section is
    /// checked here.
    pub fn validate(&self) -> Result<()> {
        self.get_params().validate()?;
        if self.timing.frame_dt_s <= 0.0 {
            anyhow::bail!("frame_dt_s must be positive.");
        }
        if self.timing.total_time_s <= 0.0 {
            anyhow::bail!("total_time_s must be positive.");
        }
        if self.timing.record_interval_s < 0.0 {
            anyhow::bail!("record_interval_s must not be negative.");
        }
        Ok(())
    }

    /// Converts the configuration into the runtime parameter set.
    pub fn get_params(&self) -> PhysicalParams {
        PhysicalParams {
            b: self.physical.flux_density_t,
            ell: self.physical.rod_length_m,
            r: self.physical.resistance_ohm,
            m: self.physical.rod_mass_kg,
            u0: self.physical.initial_speed_m_per_s,
            f_ext: self.physical.external_force_n,
            a_set: self.physical.set_acceleration_m_per_s2,
            b_dir: self.physical.field_polarity,
        }
    }
}
