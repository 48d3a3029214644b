// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for djset.
//!
//! This module provides data structures for loading set defaults,
//! engine tunables and custom energy profiles from YAML or TOML.

pub mod watcher;

pub use watcher::{FileWatcher, WatchEvent};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::curve::profile::DEFAULT_PROFILE;
use crate::curve::ProfileRegistry;
use crate::set::{
    EnergySource, EngineSettings, SearchStrategy, DEFAULT_AVG_TRACK_SECONDS, DEFAULT_BEAM_WIDTH,
    DEFAULT_BRANCHING_CAP,
};
use crate::transition::TempoJumpPolicy;

/// Root configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SetFile {
    /// Defaults for `build`
    #[serde(default)]
    pub set: SetDefaults,
    /// Compiler tunables
    #[serde(default)]
    pub engine: EngineConfig,
    /// Custom energy profiles by name
    #[serde(default)]
    pub profiles: BTreeMap<String, Vec<f64>>,
}

impl SetFile {
    /// Load a configuration file, picking the format from its extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            _ => Self::from_yaml(&contents),
        };
        parsed.with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Parse a configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a configuration from TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Compiler settings described by the `engine` section
    pub fn engine_settings(&self) -> Result<EngineSettings> {
        self.engine.settings()
    }

    /// Built-in profiles plus the custom ones in this file
    pub fn registry(&self) -> Result<ProfileRegistry> {
        let mut registry = ProfileRegistry::new();
        for (name, curve) in &self.profiles {
            registry
                .register(name, curve.clone())
                .with_context(|| format!("Invalid energy profile '{}'", name))?;
        }
        Ok(registry)
    }
}

/// Defaults for a set request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetDefaults {
    /// Set length in minutes
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
    /// Assumed average track length in seconds
    #[serde(default = "default_avg_track_seconds")]
    pub avg_track_seconds: u32,
    /// Energy profile name
    #[serde(default = "default_profile")]
    pub profile: String,
}

fn default_duration_minutes() -> u32 {
    60
}
fn default_avg_track_seconds() -> u32 {
    DEFAULT_AVG_TRACK_SECONDS
}
fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

impl Default for SetDefaults {
    fn default() -> Self {
        Self {
            duration_minutes: default_duration_minutes(),
            avg_track_seconds: default_avg_track_seconds(),
            profile: default_profile(),
        }
    }
}

/// Engine tunables as written in a config file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Candidates scored per step
    #[serde(default = "default_branching_cap")]
    pub branching_cap: usize,
    /// "greedy" or "beam"
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Partial sets kept per step when `strategy` is "beam"
    #[serde(default = "default_beam_width")]
    pub beam_width: usize,
    #[serde(default)]
    pub energy_source: EnergySource,
    #[serde(default)]
    pub tempo_jump_policy: TempoJumpPolicy,
}

fn default_branching_cap() -> usize {
    DEFAULT_BRANCHING_CAP
}
fn default_strategy() -> String {
    "greedy".to_string()
}
fn default_beam_width() -> usize {
    DEFAULT_BEAM_WIDTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            branching_cap: default_branching_cap(),
            strategy: default_strategy(),
            beam_width: default_beam_width(),
            energy_source: EnergySource::default(),
            tempo_jump_policy: TempoJumpPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Convert to compiler settings, rejecting unusable values
    pub fn settings(&self) -> Result<EngineSettings> {
        if self.branching_cap == 0 {
            bail!("branching_cap must be at least 1");
        }
        let strategy = match self.strategy.trim().to_ascii_lowercase().as_str() {
            "greedy" => SearchStrategy::Greedy,
            "beam" => {
                if self.beam_width == 0 {
                    bail!("beam_width must be at least 1");
                }
                SearchStrategy::Beam {
                    width: self.beam_width,
                }
            }
            other => bail!("Unknown search strategy '{}' (expected greedy or beam)", other),
        };
        Ok(EngineSettings {
            branching_cap: self.branching_cap,
            strategy,
            energy_source: self.energy_source,
            tempo_jump_policy: self.tempo_jump_policy,
        })
    }
}
