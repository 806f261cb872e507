// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::primitives::ValidationError;
use sha2::{Digest as _, Sha256};
use std::{fmt, str::FromStr};

/// Double SHA-256 of the given bytes.
///
/// # Example
/// ```
/// use radix::encoding::sha256d;
///
/// let digest = sha256d(b"Radix");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha256d(ingest: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(ingest);
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(first));
    out
}

/// Content identifier: double SHA-256 of a canonical encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RadixHash([u8; 32]);

impl RadixHash {
    pub const BYTES: usize = 32;

    /// Hashes raw bytes, normally a hash-output DSON encoding.
    pub fn of(ingest: &[u8]) -> Self {
        Self(sha256d(ingest))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| length_error(Self::BYTES, bytes.len()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn euid(&self) -> Euid {
        let mut out = [0u8; Euid::BYTES];
        out.copy_from_slice(&self.0[..Euid::BYTES]);
        Euid(out)
    }

    /// Number of leading zero bits, used by the proof of work target.
    pub fn leading_zero_bits(&self) -> u32 {
        let mut zeros = 0;
        for byte in self.0 {
            zeros += byte.leading_zeros();
            if byte != 0 {
                break;
            }
        }
        zeros
    }
}

/// Compact identifier: the leading 16 bytes of a [`RadixHash`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Euid([u8; 16]);

impl Euid {
    pub const BYTES: usize = 16;

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        let bytes: [u8; 16] = bytes.try_into().map_err(|_| length_error(Self::BYTES, bytes.len()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

fn length_error(expected: usize, actual: usize) -> ValidationError {
    if actual > expected {
        ValidationError::TooLong {
            max: expected,
            actual,
        }
    } else {
        ValidationError::TooShort {
            min: expected,
            actual,
        }
    }
}

macro_rules! impl_hex_text {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({self})", stringify!($ty))
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let hex = crate::primitives::HexString::new(s)?;
                Self::from_bytes(&hex.to_bytes())
            }
        }
    )*};
}

impl_hex_text!(RadixHash, Euid);

#[cfg(test)]
impl quickcheck::Arbitrary for Euid {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let mut bytes = [0u8; 16];
        for b in bytes.iter_mut() {
            *b = u8::arbitrary(g);
        }
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_hash_of_empty_input() {
        // sha256(sha256(""))
        assert_eq!(
            RadixHash::of(&[]).to_string(),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn euid_is_the_leading_half() {
        let hash = RadixHash::of(b"Radix");
        assert_eq!(hash.euid().as_bytes()[..], hash.as_bytes()[..16]);
        assert_eq!(hash.to_string()[..32], hash.euid().to_string());
    }

    #[test]
    fn leading_zero_bits() {
        let mut bytes = [0xffu8; 32];
        assert_eq!(RadixHash(bytes).leading_zero_bits(), 0);
        bytes[0] = 0;
        bytes[1] = 0b0001_0000;
        assert_eq!(RadixHash(bytes).leading_zero_bits(), 11);
        assert_eq!(RadixHash([0; 32]).leading_zero_bits(), 256);
    }

    #[test]
    fn text_form_checks_length() {
        assert!(matches!(
            "00ff".parse::<Euid>().unwrap_err(),
            ValidationError::TooShort { min: 16, actual: 2 }
        ));
        let euid: Euid = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
        assert_eq!(euid.as_bytes()[15], 15);
    }
}
