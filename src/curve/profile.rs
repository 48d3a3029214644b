// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Named energy profiles.
//!
//! Built-in shapes cover the three classic slots of a night (opening,
//! peak time, closing). Extra shapes can be registered from config.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::validate_curve;
use crate::error::Result;

/// Profile used when a requested name is unknown
pub const DEFAULT_PROFILE: &str = "peak";

const OPENING: [f64; 6] = [5.0, 6.0, 5.0, 7.0, 6.0, 8.0];
const PEAK: [f64; 6] = [7.0, 8.0, 9.0, 10.0, 9.0, 8.0];
const CLOSING: [f64; 6] = [8.0, 7.0, 6.0, 5.0, 4.0, 3.0];

/// A named prototype energy curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyProfile {
    /// Profile name
    pub name: String,
    /// Prototype energy levels (1-10)
    pub curve: Vec<f64>,
}

impl EnergyProfile {
    /// Create a profile, checking that the curve is usable
    pub fn new(name: impl Into<String>, curve: Vec<f64>) -> Result<Self> {
        validate_curve(&curve)?;
        Ok(Self {
            name: name.into(),
            curve,
        })
    }

    /// Warm-up: hover mid-energy, nudge upward
    pub fn opening() -> Self {
        Self {
            name: "opening".to_string(),
            curve: OPENING.to_vec(),
        }
    }

    /// Peak time: climb to 10, ease off
    pub fn peak() -> Self {
        Self {
            name: "peak".to_string(),
            curve: PEAK.to_vec(),
        }
    }

    /// Closing: steady cool-down
    pub fn closing() -> Self {
        Self {
            name: "closing".to_string(),
            curve: CLOSING.to_vec(),
        }
    }

    /// Look up a built-in profile by name
    pub fn builtin(name: &str) -> Option<Self> {
        match normalize_name(name).as_str() {
            "opening" => Some(Self::opening()),
            "peak" => Some(Self::peak()),
            "closing" => Some(Self::closing()),
            _ => None,
        }
    }
}

impl fmt::Display for EnergyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let levels: Vec<String> = self.curve.iter().map(|v| format!("{}", v)).collect();
        write!(f, "{} [{}]", self.name, levels.join(", "))
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Registry of profiles: built-ins plus any loaded from config
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    custom: BTreeMap<String, EnergyProfile>,
}

impl ProfileRegistry {
    /// Create a registry holding only the built-in profiles
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom profile; a custom name shadows a built-in one
    pub fn register(&mut self, name: &str, curve: Vec<f64>) -> Result<()> {
        let key = normalize_name(name);
        let profile = EnergyProfile::new(key.clone(), curve)?;
        self.custom.insert(key, profile);
        Ok(())
    }

    /// Get a profile by name (checks custom first, then built-in)
    pub fn get(&self, name: &str) -> Option<EnergyProfile> {
        let key = normalize_name(name);
        if let Some(profile) = self.custom.get(&key) {
            return Some(profile.clone());
        }
        EnergyProfile::builtin(&key)
    }

    /// Resolve a profile, falling back to `peak` for unknown names
    pub fn resolve(&self, name: &str) -> EnergyProfile {
        match self.get(name) {
            Some(profile) => profile,
            None => {
                warn!(profile = name, "Unknown energy profile, using {}", DEFAULT_PROFILE);
                EnergyProfile::peak()
            }
        }
    }

    /// All profiles, built-ins first, each shadowed by a custom profile of the same name
    pub fn profiles(&self) -> Vec<EnergyProfile> {
        let mut all: Vec<EnergyProfile> = ["opening", "peak", "closing"]
            .iter()
            .filter_map(|name| self.get(name))
            .collect();
        all.extend(
            self.custom
                .values()
                .filter(|p| EnergyProfile::builtin(&p.name).is_none())
                .cloned(),
        );
        all
    }
}
