// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Set compilation.
//!
//! This module provides:
//! - Requests and engine settings for a compilation run
//! - The playlist entries and compiled set a run produces
//! - The compiler itself (greedy or beam search)

pub mod compiler;

pub use compiler::{compile, SetCompiler};

use serde::{Deserialize, Serialize};

use crate::curve::EnergyProfile;
use crate::ingest::Track;
use crate::music::CamelotKey;
use crate::transition::TempoJumpPolicy;

/// Candidates considered per step
pub const DEFAULT_BRANCHING_CAP: usize = 64;

/// Assumed average track length in seconds
pub const DEFAULT_AVG_TRACK_SECONDS: u32 = 240;

/// Shortest set the compiler aims for (pool permitting)
pub const MIN_SET_LENGTH: usize = 3;

/// Default beam width when beam search is picked without one
pub const DEFAULT_BEAM_WIDTH: usize = 4;

/// How the compiler explores candidate orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Pick the best next track at each step
    #[default]
    Greedy,
    /// Keep the `width` best partial sets at each step
    Beam { width: usize },
}

/// Where a track's 1-10 energy level comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergySource {
    /// `1 + 9 * energy`, with energy defaulting to 0.5
    #[default]
    Feature,
    /// Blend of energy, danceability, loudness and tempo
    Composite,
}

impl EnergySource {
    /// Energy level of `track` on the 1-10 curve scale
    pub fn scaled(self, track: &Track) -> f64 {
        match self {
            EnergySource::Feature => track.scaled_energy(),
            EnergySource::Composite => track.composite_energy(),
        }
    }
}

/// Tunables for a compiler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Remaining candidates scored per step, nearest opening energy first
    pub branching_cap: usize,
    pub strategy: SearchStrategy,
    pub energy_source: EnergySource,
    pub tempo_jump_policy: TempoJumpPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            branching_cap: DEFAULT_BRANCHING_CAP,
            strategy: SearchStrategy::Greedy,
            energy_source: EnergySource::Feature,
            tempo_jump_policy: TempoJumpPolicy::default(),
        }
    }
}

/// What set to build
#[derive(Debug, Clone, PartialEq)]
pub struct SetRequest {
    /// Target length of the set in minutes
    pub duration_minutes: u32,
    /// Assumed average track length
    pub avg_track_seconds: u32,
    /// Energy shape to follow
    pub profile: EnergyProfile,
}

impl SetRequest {
    /// Request a set of `duration_minutes` following `profile`
    pub fn new(duration_minutes: u32, profile: EnergyProfile) -> Self {
        Self {
            duration_minutes,
            avg_track_seconds: DEFAULT_AVG_TRACK_SECONDS,
            profile,
        }
    }

    /// Override the assumed track length
    pub fn with_avg_track_seconds(mut self, seconds: u32) -> Self {
        self.avg_track_seconds = seconds;
        self
    }
}

/// One slot of a compiled set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistEntry {
    /// 1-based position in the set
    pub position: usize,
    /// Source track, kept for exporters
    #[serde(skip)]
    pub track_id: String,
    pub name: String,
    pub artist: String,
    pub bpm: Option<f64>,
    pub key: Option<CamelotKey>,
    /// Mixing note relative to the previous slot; empty for the opener
    pub note: String,
}

/// Result of a compilation run
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSet {
    /// Profile the set follows
    pub profile: String,
    /// Number of slots the run aimed for
    pub target_count: usize,
    /// Per-slot energy targets
    pub targets: Vec<f64>,
    pub entries: Vec<PlaylistEntry>,
}

impl CompiledSet {
    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
