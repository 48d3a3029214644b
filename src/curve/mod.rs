// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Energy curves for set planning.
//!
//! A curve is a short prototype of target energy levels on a 1-10
//! scale. [`spread_curve`] stretches it over the number of slots in a
//! set; [`profile`] holds the named prototypes.

pub mod profile;

pub use profile::{EnergyProfile, ProfileRegistry};

use crate::error::{Result, SetError};

/// Lowest energy level a curve may ask for
pub const MIN_ENERGY_LEVEL: f64 = 1.0;

/// Highest energy level a curve may ask for
pub const MAX_ENERGY_LEVEL: f64 = 10.0;

/// Expand `prototype` into exactly `target_count` per-slot targets.
///
/// Shorter sets take the first `target_count` prototype values as-is.
/// Longer sets interpolate linearly so the first and last slots land
/// on the first and last prototype values.
pub fn spread_curve(target_count: usize, prototype: &[f64]) -> Result<Vec<f64>> {
    if prototype.is_empty() {
        return Err(SetError::invalid("energy curve is empty"));
    }
    if target_count == 0 {
        return Err(SetError::invalid("target count must be at least 1"));
    }

    if target_count <= prototype.len() {
        return Ok(prototype[..target_count].to_vec());
    }

    let last = prototype.len() - 1;
    let steps = (target_count - 1) as f64;
    let targets = (0..target_count)
        .map(|i| {
            let idx = if target_count == 1 {
                0.0
            } else {
                i as f64 * last as f64 / steps
            };
            let lo = (idx.floor() as usize).min(last);
            let hi = (lo + 1).min(last);
            let t = idx - lo as f64;
            prototype[lo] * (1.0 - t) + prototype[hi] * t
        })
        .collect();

    Ok(targets)
}

/// Check that every level of a curve is usable as an energy target
pub fn validate_curve(curve: &[f64]) -> Result<()> {
    if curve.is_empty() {
        return Err(SetError::invalid("energy curve is empty"));
    }
    for (i, &level) in curve.iter().enumerate() {
        if !level.is_finite() || !(MIN_ENERGY_LEVEL..=MAX_ENERGY_LEVEL).contains(&level) {
            return Err(SetError::invalid(format!(
                "energy level {} at index {} is outside {}..{}",
                level, i, MIN_ENERGY_LEVEL, MAX_ENERGY_LEVEL
            )));
        }
    }
    Ok(())
}
