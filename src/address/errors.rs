// Copyright 2020 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::ADDRESS_LEN;
use crate::error::{Categorized, ErrorKind};
use crate::primitives::ValidationError;
use thiserror::Error;

/// Address error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Invalid address character: {0}")]
    InvalidCharacter(ValidationError),
    #[error("Invalid address length, wanted: {ADDRESS_LEN} got: {0}")]
    InvalidLength(usize),
    #[error("Invalid address checksum")]
    InvalidChecksum,
    #[error("Invalid address public key: {0}")]
    InvalidPublicKey(ValidationError),
    #[error("Address belongs to another universe, wanted magic byte: {expected} got: {actual}")]
    WrongMagic { expected: u8, actual: u8 },
}

impl Categorized for AddressError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
