// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Boundary to the signing capability. Key handling and the curve arithmetic
//! stay behind [`Signer`]; this module only carries public keys and
//! signatures around and knows how to encode them.

mod signer;

pub use self::signer::{Secp256k1Signer, Signer, verify};

use crate::encoding::{DecodeError, Dson, DsonField, DsonMap, DsonValue, FromDson, Output};
use crate::primitives::ValidationError;
use anyhow::ensure;

/// Length of a compressed secp256k1 public key.
pub const PUBLIC_KEY_LEN: usize = 33;
/// Length of each ECDSA scalar.
pub const SCALAR_LEN: usize = 32;

/// A compressed secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        let key: [u8; PUBLIC_KEY_LEN] = bytes.try_into().map_err(|_| {
            if bytes.len() > PUBLIC_KEY_LEN {
                ValidationError::TooLong {
                    max: PUBLIC_KEY_LEN,
                    actual: bytes.len(),
                }
            } else {
                ValidationError::TooShort {
                    min: PUBLIC_KEY_LEN,
                    actual: bytes.len(),
                }
            }
        })?;
        if !matches!(key[0], 0x02 | 0x03) {
            return Err(ValidationError::OutOfRange(format!(
                "compressed public keys start with 0x02 or 0x03, got {:#04x}",
                key[0]
            )));
        }
        Ok(Self(key))
    }

    pub(crate) fn from_array(key: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for PublicKey {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let mut key = [0u8; PUBLIC_KEY_LEN];
        key[0] = if bool::arbitrary(g) { 0x02 } else { 0x03 };
        for b in key[1..].iter_mut() {
            *b = u8::arbitrary(g);
        }
        Self(key)
    }
}

/// An ECDSA signature, kept as its two big-endian scalars.
#[derive(Clone, Debug, PartialEq, Eq, Hash, derive_more::Constructor)]
pub struct Signature {
    pub r: Vec<u8>,
    pub s: Vec<u8>,
}

impl Signature {
    pub const SERIALIZER: &'static str = "crypto.ecdsa_signature";

    /// `r ‖ s`, each left padded to 32 bytes.
    pub fn to_fixed_bytes(&self) -> anyhow::Result<[u8; 2 * SCALAR_LEN]> {
        let mut out = [0u8; 2 * SCALAR_LEN];
        for (scalar, chunk) in [&self.r, &self.s].into_iter().zip(out.chunks_mut(SCALAR_LEN)) {
            // tolerate the sign byte some encoders prepend
            let digits = match scalar.iter().position(|b| *b != 0) {
                Some(first) => &scalar[first..],
                None => &[][..],
            };
            ensure!(digits.len() <= SCALAR_LEN, "ECDSA scalar longer than 32 bytes");
            chunk[SCALAR_LEN - digits.len()..].copy_from_slice(digits);
        }
        Ok(out)
    }
}

impl Dson for Signature {
    fn serializer(&self) -> Option<&'static str> {
        Some(Self::SERIALIZER)
    }

    fn dson_fields(&self, _: Output) -> Vec<DsonField> {
        vec![
            DsonField::new("r", DsonValue::Bytes(self.r.clone())),
            DsonField::new("s", DsonValue::Bytes(self.s.clone())),
        ]
    }
}

impl FromDson for Signature {
    fn from_dson_value(value: DsonValue) -> Result<Self, DecodeError> {
        let mut map = DsonMap::expect(value, Self::SERIALIZER)?;
        Ok(Self {
            r: map.bytes("r")?,
            s: map.bytes("s")?,
        })
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Signature {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let scalar = |g: &mut quickcheck::Gen| -> Vec<u8> {
            (0..SCALAR_LEN).map(|_| u8::arbitrary(g)).collect()
        };
        Self::new(scalar(g), scalar(g))
    }
}
