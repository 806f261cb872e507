// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::address::{Address, AddressError};
use crate::error::{Categorized, ErrorKind};
use crate::primitives::ValidationError;
use std::{fmt, str::FromStr};
use thiserror::Error;

pub const MAX_NAME_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RriError {
    #[error("Resource identifier must start with '/'")]
    MissingLeadingSlash,
    #[error("Resource identifier must be /<address>/<name>, got {0} segments")]
    WrongSegmentCount(usize),
    #[error("Invalid resource identifier address: {0}")]
    Address(#[from] AddressError),
    #[error("Invalid resource identifier name: {0}")]
    InvalidName(ValidationError),
}

impl Categorized for RriError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Address scoped name of a resource, most commonly a token definition.
/// Text form is `/<address>/<name>`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceIdentifier {
    address: Address,
    name: String,
}

impl ResourceIdentifier {
    pub fn new(address: Address, name: impl Into<String>) -> Result<Self, RriError> {
        let name = name.into();
        validate_name(&name).map_err(RriError::InvalidName)?;
        Ok(Self { address, name })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::TooShort { min: 1, actual: 0 });
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            max: MAX_NAME_LEN,
            actual: name.len(),
        });
    }
    match name
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        Some((index, character)) => Err(ValidationError::DisallowedCharacter { character, index }),
        None => Ok(()),
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.address, self.name)
    }
}

impl fmt::Debug for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceIdentifier({self})")
    }
}

impl FromStr for ResourceIdentifier {
    type Err = RriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.strip_prefix('/').ok_or(RriError::MissingLeadingSlash)?;
        let segments: Vec<&str> = path.split('/').collect();
        let &[address, name] = segments.as_slice() else {
            return Err(RriError::WrongSegmentCount(segments.len()));
        };
        Self::new(address.parse()?, name)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for ResourceIdentifier {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789._-";
        let len = usize::arbitrary(g) % 14 + 1;
        let name: String = (0..len)
            .map(|_| char::from(*g.choose(CHARS).unwrap_or(&b'X')))
            .collect();
        Self {
            address: Address::arbitrary(g),
            name,
        }
    }
}
