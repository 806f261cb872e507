// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Validated primitive values. Every type here is only constructible through a
//! validating constructor.

mod amount;
mod errors;
mod strings;

pub use self::amount::*;
pub use self::errors::ValidationError;
pub use self::strings::*;

/// Per-particle random value that keeps otherwise identical particles from
/// hashing to the same identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::From, derive_more::Display,
)]
pub struct Nonce(i64);

impl Nonce {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn random() -> Self {
        Self(rand::random())
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Nonce {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Self(i64::arbitrary(g))
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for UInt256 {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let mut bytes = [0u8; 32];
        for b in bytes.iter_mut() {
            *b = u8::arbitrary(g);
        }
        // 32 bytes always fit
        Self::from_be_bytes(&bytes).unwrap_or_default()
    }
}
