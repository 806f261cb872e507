// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::encoding::{EncodeError, Euid};
use crate::error::{Categorized, ErrorKind};
use thiserror::Error;

/// Atom error
#[derive(Debug, Error)]
pub enum AtomError {
    /// Wire encoding exceeds the universe limit
    #[error("Atom is {actual} bytes, more than the maximum of {max}")]
    TooLarge { max: usize, actual: usize },
    #[error("Atom carries no signature")]
    Unsigned,
    #[error("No signature from {0}")]
    MissingSignature(Euid),
    #[error("Signing failed: {0:#}")]
    Signing(anyhow::Error),
    #[error("Invalid signature from {signer}: {reason:#}")]
    InvalidSignature { signer: Euid, reason: anyhow::Error },
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl Categorized for AtomError {
    fn kind(&self) -> ErrorKind {
        match self {
            AtomError::Encode(e) => e.kind(),
            AtomError::Signing(_) => ErrorKind::Internal,
            _ => ErrorKind::Validation,
        }
    }
}
