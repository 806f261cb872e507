// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::address::AddressError;
use crate::error::{Categorized, ErrorKind, InternalError};
use crate::primitives::ValidationError;
use crate::rri::RriError;
use thiserror::Error;

/// Encoding only fails when the CBOR writer itself misbehaves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl Categorized for EncodeError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Malformed CBOR: {0}")]
    Cbor(String),
    #[error("Malformed JSON: {0}")]
    Json(String),
    #[error("Input is valid CBOR but not canonical DSON")]
    NonCanonical,
    #[error("Unknown serializer {0:?}")]
    UnknownSerializer(String),
    #[error("Expected serializer {expected:?}, got {actual:?}")]
    SerializerMismatch {
        expected: &'static str,
        actual: String,
    },
    #[error("Unsupported DSON version {0}")]
    UnsupportedVersion(i64),
    #[error("Missing field {0:?}")]
    MissingField(String),
    #[error("Field {field:?} should be {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Unknown byte string prefix {0:#04x}")]
    UnknownBytePrefix(u8),
    #[error("Byte string without type prefix")]
    EmptyBytes,
    #[error("Integer {0} does not fit in 64 bits")]
    IntegerOutOfRange(String),
    #[error("Unsupported value: {0}")]
    Unsupported(String),
    #[error("JSON string {0:?} carries no known type prefix")]
    MissingJsonPrefix(String),
    #[error("Invalid value for field {field:?}: {reason}")]
    InvalidField { field: String, reason: String },
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Rri(#[from] RriError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DecodeError {
    pub(crate) fn invalid_field(field: &str, reason: impl ToString) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl Categorized for DecodeError {
    fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::Address(_) | DecodeError::Rri(_) | DecodeError::Validation(_) => {
                ErrorKind::Validation
            }
            _ => ErrorKind::Decode,
        }
    }
}
