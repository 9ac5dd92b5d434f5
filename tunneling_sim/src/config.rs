//! Startup configuration
//!
//! Optional JSON file overriding the initial parameters and window settings.
//! Every field is optional; missing ones keep their defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::params::SimulationParameters;

/// Environment variable naming a config file when no path is given on the command line
pub const CONFIG_ENV_VAR: &str = "TUNNELING_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConfig {
    pub particle_energy: f32,
    pub barrier_height: f32,
    pub barrier_width: f32,
    pub animating: bool,
}

impl Default for InitialConfig {
    fn default() -> Self {
        let params = SimulationParameters::default();
        Self {
            particle_energy: params.particle_energy,
            barrier_height: params.barrier_height,
            barrier_width: params.barrier_width,
            animating: params.is_animating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Quantum Tunneling - Barrier Penetration".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial: InitialConfig,
    pub window: WindowConfig,
}

impl SimulationConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid simulation config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Load from an explicit path, else from `TUNNELING_CONFIG`, else defaults
    pub fn resolve(arg: Option<PathBuf>) -> Result<Self> {
        let path = arg.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
        match path {
            Some(path) => {
                log::info!("loading config from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parameters the simulation starts from; the clock always starts at zero
    pub fn initial_parameters(&self) -> SimulationParameters {
        SimulationParameters {
            particle_energy: self.initial.particle_energy,
            barrier_height: self.initial.barrier_height,
            barrier_width: self.initial.barrier_width,
            is_animating: self.initial.animating,
            simulation_time: 0.0,
        }
    }
}
