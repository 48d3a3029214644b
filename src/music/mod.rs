// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities for djset.
//!
//! This module provides pitch-class naming and the Camelot wheel
//! used to judge harmonic compatibility between tracks.

pub mod camelot;
pub mod note;

pub use camelot::{asymmetries, CamelotKey};
pub use note::{Mode, Note};
