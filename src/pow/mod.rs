// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Proof of work stamping.
//!
//! Nodes throttle submissions by asking for a nonce whose candidate hash
//! `RadixHash(magic ‖ seed ‖ nonce)` starts with a number of zero bits. The
//! seed is the atom hash, which does not cover the nonce, so stamping never
//! invalidates signatures.

use crate::atom::Atom;
use crate::encoding::{EncodeError, RadixHash};
use crate::error::{self, Categorized, ErrorKind, InternalError};
use crate::networks::{Magic, UniverseConfig};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Cancellation is polled once per this many attempts.
const CANCELLATION_CHECK_INTERVAL: i64 = 1 << 12;
const MAX_TARGET_ZEROS: u32 = 256;

#[derive(Debug, Error)]
pub enum PowError {
    #[error("Proof of work search cancelled after {attempts} attempts")]
    Cancelled { attempts: i64 },
    #[error("Target of {0} leading zero bits can never be met")]
    InvalidTarget(u32),
    #[error("Atom carries no proof of work nonce")]
    MissingNonce,
    #[error("Proof of work has {actual} leading zero bits, {target} required")]
    TargetNotMet { actual: u32, target: u32 },
    #[error("Nonce space exhausted")]
    Exhausted,
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl Categorized for PowError {
    fn kind(&self) -> ErrorKind {
        match self {
            PowError::Cancelled { .. } => ErrorKind::Cancelled,
            PowError::InvalidTarget(_) | PowError::MissingNonce | PowError::TargetNotMet { .. } => {
                ErrorKind::Validation
            }
            PowError::Exhausted | PowError::Encode(_) | PowError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// A nonce together with everything needed to check it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProofOfWork {
    magic: Magic,
    seed: RadixHash,
    target_zeros: u32,
    nonce: i64,
}

impl ProofOfWork {
    pub fn new(magic: Magic, seed: RadixHash, target_zeros: u32, nonce: i64) -> Self {
        Self {
            magic,
            seed,
            target_zeros,
            nonce,
        }
    }

    pub fn nonce(&self) -> i64 {
        self.nonce
    }

    pub fn seed(&self) -> &RadixHash {
        &self.seed
    }

    pub fn target_zeros(&self) -> u32 {
        self.target_zeros
    }

    pub fn hash(&self) -> RadixHash {
        candidate_hash(self.magic, &self.seed, self.nonce)
    }

    pub fn verify(&self) -> Result<(), PowError> {
        let actual = self.hash().leading_zero_bits();
        if actual < self.target_zeros {
            return Err(PowError::TargetNotMet {
                actual,
                target: self.target_zeros,
            });
        }
        Ok(())
    }
}

/// `RadixHash(magic (4, big endian) ‖ seed (32) ‖ nonce (8, big endian))`
pub fn candidate_hash(magic: Magic, seed: &RadixHash, nonce: i64) -> RadixHash {
    let mut input = [0u8; 4 + RadixHash::BYTES + 8];
    input[..4].copy_from_slice(&magic.to_be_bytes());
    input[4..4 + RadixHash::BYTES].copy_from_slice(seed.as_bytes());
    input[4 + RadixHash::BYTES..].copy_from_slice(&nonce.to_be_bytes());
    RadixHash::of(&input)
}

/// Searches nonces for one universe and difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowStamper {
    magic: Magic,
    target_zeros: u32,
}

impl PowStamper {
    pub fn new(magic: Magic, target_zeros: u32) -> Result<Self, PowError> {
        if target_zeros > MAX_TARGET_ZEROS {
            return Err(PowError::InvalidTarget(target_zeros));
        }
        Ok(Self {
            magic,
            target_zeros,
        })
    }

    pub fn from_config(config: &UniverseConfig) -> Result<Self, PowError> {
        Self::new(config.magic(), config.pow_target_zeros)
    }

    pub fn target_zeros(&self) -> u32 {
        self.target_zeros
    }

    /// Tries nonces from zero upwards until one meets the target or `cancel` fires.
    pub fn find(&self, seed: RadixHash, cancel: &CancellationToken) -> Result<ProofOfWork, PowError> {
        for nonce in 0..=i64::MAX {
            if nonce % CANCELLATION_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                tracing::debug!(attempts = nonce, "proof of work cancelled");
                return Err(PowError::Cancelled { attempts: nonce });
            }
            if candidate_hash(self.magic, &seed, nonce).leading_zero_bits() >= self.target_zeros {
                tracing::debug!(%seed, nonce, target = self.target_zeros, "proof of work found");
                return Ok(ProofOfWork::new(self.magic, seed, self.target_zeros, nonce));
            }
        }
        Err(PowError::Exhausted)
    }

    /// Stamps the atom with a nonce. Only [`Atom::pow_nonce`] changes.
    pub fn stamp(&self, atom: Atom, cancel: &CancellationToken) -> Result<(Atom, ProofOfWork), PowError> {
        let pow = self.find(atom.hash()?, cancel)?;
        Ok((atom.with_pow_nonce(pow.nonce()), pow))
    }

    /// [`Self::stamp`] on a blocking worker thread, so that the search never
    /// stalls the async runtime.
    pub async fn stamp_async(
        &self,
        atom: Atom,
        cancel: CancellationToken,
    ) -> Result<(Atom, ProofOfWork), PowError> {
        let stamper = *self;
        tokio::task::spawn_blocking(move || stamper.stamp(atom, &cancel))
            .await
            .map_err(|e| error::internal("pow stamp", e.to_string()))?
    }

    /// Re-checks the nonce an atom was stamped with.
    pub fn verify(&self, atom: &Atom) -> Result<ProofOfWork, PowError> {
        let nonce = atom.pow_nonce().ok_or(PowError::MissingNonce)?;
        let pow = ProofOfWork::new(self.magic, atom.hash()?, self.target_zeros, nonce);
        pow.verify()?;
        Ok(pow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::{ParticleGroup, RriParticle, SpunParticle, token_rri};
    use crate::primitives::Nonce;
    use crate::wire_json::snapshot_address;
    use std::time::Duration;

    const MAGIC: Magic = Magic::new(63_799_298);

    fn atom() -> Atom {
        let group = ParticleGroup::of([SpunParticle::up(RriParticle::new(
            token_rri(snapshot_address(), "XRD").unwrap(),
            Nonce::new(1),
        ))]);
        Atom::with_timestamp(vec![group], 1_000)
    }

    #[test]
    fn candidate_hash_layout() {
        let seed = RadixHash::of(b"seed");
        let mut input = Vec::new();
        input.extend(MAGIC.to_be_bytes());
        input.extend(seed.as_bytes());
        input.extend(5i64.to_be_bytes());
        assert_eq!(input.len(), 44);
        assert_eq!(candidate_hash(MAGIC, &seed, 5), RadixHash::of(&input));
    }

    #[test]
    fn stamp_and_verify() {
        let stamper = PowStamper::new(MAGIC, 12).unwrap();
        let atom = atom();
        let (stamped, pow) = stamper.stamp(atom.clone(), &CancellationToken::new()).unwrap();
        assert!(pow.hash().leading_zero_bits() >= 12);
        pow.verify().unwrap();
        assert_eq!(stamped.pow_nonce(), Some(pow.nonce()));
        assert_eq!(stamped.hash().unwrap(), atom.hash().unwrap());
        assert_eq!(stamper.verify(&stamped).unwrap(), pow);
        // the first nonce that works is the one found
        assert!((0..pow.nonce()).all(|n| candidate_hash(MAGIC, pow.seed(), n).leading_zero_bits() < 12));
    }

    #[test]
    fn verify_rejects_bad_nonces() {
        let stamper = PowStamper::new(MAGIC, 12).unwrap();
        assert!(matches!(
            stamper.verify(&atom()).unwrap_err(),
            PowError::MissingNonce
        ));
        let seed = atom().hash().unwrap();
        let bad = (0..)
            .find(|n| candidate_hash(MAGIC, &seed, *n).leading_zero_bits() < 12)
            .unwrap();
        assert!(matches!(
            stamper.verify(&atom().with_pow_nonce(bad)).unwrap_err(),
            PowError::TargetNotMet { target: 12, .. }
        ));
    }

    #[test]
    fn cancelled_before_start() {
        let stamper = PowStamper::new(MAGIC, MAX_TARGET_ZEROS).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = stamper.stamp(atom(), &cancel).unwrap_err();
        assert!(matches!(err, PowError::Cancelled { attempts: 0 }));
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn impossible_targets() {
        assert!(matches!(
            PowStamper::new(MAGIC, 257).unwrap_err(),
            PowError::InvalidTarget(257)
        ));
    }

    #[tokio::test]
    async fn async_stamp_can_be_cancelled() {
        let stamper = PowStamper::new(MAGIC, MAX_TARGET_ZEROS).unwrap();
        let cancel = CancellationToken::new();
        let task = tokio::spawn({
            let cancel = cancel.clone();
            async move { stamper.stamp_async(atom(), cancel).await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, PowError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn async_stamp_finds_nonce() {
        let stamper = PowStamper::new(MAGIC, 8).unwrap();
        let (stamped, pow) = stamper
            .stamp_async(atom(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(stamped.pow_nonce(), Some(pow.nonce()));
    }
}
