// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Error classification shared by every module.
//!
//! Each module owns its own [`thiserror`] enum. They all implement
//! [`Categorized`] so callers (and tests) can tell ordinary, user-facing
//! failures apart from defects in this crate.

use strum::Display;

/// Coarse category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or out-of-range input: bad checksum, bad granularity, oversized atom...
    Validation,
    /// Structurally invalid encoded input.
    Decode,
    /// A reducer saw a particle referencing state it never observed.
    Consistency,
    /// Work was stopped by its caller.
    Cancelled,
    /// An invariant that should always hold was violated.
    Internal,
}

pub trait Categorized {
    fn kind(&self) -> ErrorKind;

    fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }
}

/// Details of a violated internal invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal invariant violated in {operation}: {details}")]
pub struct InternalError {
    pub operation: &'static str,
    pub details: String,
}

/// Builds an [`InternalError`], logging it with full context.
pub fn internal(operation: &'static str, details: impl Into<String>) -> InternalError {
    let details = details.into();
    tracing::error!(operation, %details, "internal invariant violated");
    InternalError { operation, details }
}

impl Categorized for InternalError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }
}
