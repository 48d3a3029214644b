// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the sequencing engine.

use thiserror::Error;

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, SetError>;

/// Errors raised by set compilation.
///
/// Missing track features are never errors; the engine substitutes
/// defaults for them. Only a request that cannot produce a set at all
/// is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetError {
    /// Empty pool, non-positive duration, unusable energy curve, ...
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SetError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SetError::InvalidInput(msg.into())
    }
}
