// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::error::{Categorized, ErrorKind};
use thiserror::Error;

/// Primitive value validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Value too long, max: {max} got: {actual}")]
    TooLong { max: usize, actual: usize },
    #[error("Value too short, min: {min} got: {actual}")]
    TooShort { min: usize, actual: usize },
    #[error("Disallowed character {character:?} at index {index}")]
    DisallowedCharacter { character: char, index: usize },
    #[error("Value out of range: {0}")]
    OutOfRange(String),
    #[error("Amount {amount} is not a multiple of granularity {granularity}")]
    Granularity { amount: String, granularity: String },
    #[error("Arithmetic overflow")]
    Overflow,
    #[error("Arithmetic underflow")]
    Underflow,
}

impl Categorized for ValidationError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
