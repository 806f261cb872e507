// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod errors;

pub use self::errors::AddressError;

use crate::crypto::{PUBLIC_KEY_LEN, PublicKey};
use crate::encoding::{Euid, RadixHash};
use crate::networks::Magic;
use crate::primitives::Base58String;
use std::{fmt, str::FromStr};

pub const CHECKSUM_LEN: usize = 4;
/// Magic byte, public key and checksum.
pub const ADDRESS_LEN: usize = 1 + PUBLIC_KEY_LEN + CHECKSUM_LEN;

/// Address is the public key of an account, scoped to one universe by its
/// magic byte, with a trailing checksum. Its text form is base-58.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    magic_byte: u8,
    public_key: PublicKey,
}

impl Address {
    /// Generates the address of a public key in the universe with the given magic.
    pub fn new(magic: Magic, public_key: PublicKey) -> Self {
        Self::from_parts(magic.address_byte(), public_key)
    }

    pub fn from_parts(magic_byte: u8, public_key: PublicKey) -> Self {
        Self {
            magic_byte,
            public_key,
        }
    }

    /// Creates address from encoded bytes, checksum included.
    pub fn from_bytes(bz: &[u8]) -> Result<Self, AddressError> {
        if bz.len() != ADDRESS_LEN {
            return Err(AddressError::InvalidLength(bz.len()));
        }
        let (ingest, cksm) = bz.split_at(ADDRESS_LEN - CHECKSUM_LEN);
        if !validate_checksum(ingest, cksm) {
            return Err(AddressError::InvalidChecksum);
        }
        let (magic_byte, key) = ingest.split_at(1);
        let public_key = PublicKey::from_bytes(key).map_err(AddressError::InvalidPublicKey)?;
        Ok(Self::from_parts(magic_byte[0], public_key))
    }

    pub fn magic_byte(&self) -> u8 {
        self.magic_byte
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Returns encoded bytes of Address
    pub fn to_bytes(&self) -> [u8; ADDRESS_LEN] {
        let mut bz = [0u8; ADDRESS_LEN];
        bz[0] = self.magic_byte;
        bz[1..=PUBLIC_KEY_LEN].copy_from_slice(self.public_key.as_bytes());
        let cksm = checksum(&bz[..=PUBLIC_KEY_LEN]);
        bz[ADDRESS_LEN - CHECKSUM_LEN..].copy_from_slice(&cksm);
        bz
    }

    /// Short identifier of the account, derived from the public key only.
    pub fn euid(&self) -> Euid {
        RadixHash::of(self.public_key.as_bytes()).euid()
    }

    /// Fails unless the address was generated for the universe with `magic`.
    pub fn check_magic(&self, magic: Magic) -> Result<(), AddressError> {
        let expected = magic.address_byte();
        if self.magic_byte != expected {
            return Err(AddressError::WrongMagic {
                expected,
                actual: self.magic_byte,
            });
        }
        Ok(())
    }
}

/// Checksum calculates the 4 byte checksum hash
pub fn checksum(ingest: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut cksm = [0u8; CHECKSUM_LEN];
    cksm.copy_from_slice(&RadixHash::of(ingest).as_bytes()[..CHECKSUM_LEN]);
    cksm
}

/// Validates the checksum against the ingest data
pub fn validate_checksum(ingest: &[u8], expect: &[u8]) -> bool {
    checksum(ingest)[..] == *expect
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Base58String::from_bytes(self.to_bytes()))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(addr: &str) -> Result<Self, Self::Err> {
        let text = Base58String::new(addr).map_err(AddressError::InvalidCharacter)?;
        Address::from_bytes(&text.to_bytes())
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Address {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Self::from_parts(u8::arbitrary(g), PublicKey::arbitrary(g))
    }
}
