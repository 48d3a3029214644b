// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! djset - harmonic DJ set sequencing.
//!
//! Orders a pool of analyzed tracks into a set that follows an energy
//! curve while keeping consecutive keys on the Camelot wheel and
//! tempos close, and annotates every transition with a mixing note.

pub mod config;
pub mod curve;
pub mod error;
pub mod export;
pub mod ingest;
pub mod music;
pub mod set;
pub mod transition;

pub use curve::{spread_curve, EnergyProfile, ProfileRegistry};
pub use error::{Result, SetError};
pub use ingest::{Track, TrackLibrary};
pub use music::{CamelotKey, Mode};
pub use set::{compile, CompiledSet, EngineSettings, PlaylistEntry, SetCompiler, SetRequest};
pub use transition::score_transition;
