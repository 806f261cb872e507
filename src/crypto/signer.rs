// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{PublicKey, Signature};
use crate::address::Address;
use anyhow::{Context as _, ensure};
use k256::ecdsa::{
    SigningKey, VerifyingKey,
    signature::hazmat::{PrehashSigner as _, PrehashVerifier as _},
};

/// Signer is a trait which allows a key implementation to sign data for an
/// address
pub trait Signer {
    /// Function signs any arbitrary data given the [Address].
    fn sign_bytes(&self, data: &[u8], address: &Address) -> Result<Signature, anyhow::Error>;
}

/// A single secp256k1 key. Signing is deterministic (RFC 6979) over data that
/// is already a digest.
pub struct Secp256k1Signer {
    key: SigningKey,
    public_key: PublicKey,
}

impl Secp256k1Signer {
    pub fn generate() -> Self {
        Self::from_key(SigningKey::random(&mut rand::rngs::OsRng))
    }

    pub fn from_private_key(bytes: &[u8]) -> anyhow::Result<Self> {
        let key = SigningKey::from_slice(bytes).context("invalid secp256k1 private key")?;
        Ok(Self::from_key(key))
    }

    fn from_key(key: SigningKey) -> Self {
        let point = key.verifying_key().to_encoded_point(true);
        let mut compressed = [0u8; super::PUBLIC_KEY_LEN];
        compressed.copy_from_slice(point.as_bytes());
        Self {
            key,
            public_key: PublicKey::from_array(compressed),
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

impl Signer for Secp256k1Signer {
    fn sign_bytes(&self, data: &[u8], address: &Address) -> Result<Signature, anyhow::Error> {
        ensure!(
            address.public_key() == &self.public_key,
            "no key for address {address}"
        );
        let signature: k256::ecdsa::Signature = self.key.sign_prehash(data)?;
        let (r, s) = signature.split_bytes();
        Ok(Signature::new(r.to_vec(), s.to_vec()))
    }
}

/// Checks a signature over `data` against the public key embedded in `address`.
pub fn verify(signature: &Signature, data: &[u8], address: &Address) -> anyhow::Result<()> {
    let key = VerifyingKey::from_sec1_bytes(address.public_key().as_bytes())
        .context("address does not hold a valid secp256k1 public key")?;
    let signature = k256::ecdsa::Signature::from_slice(&signature.to_fixed_bytes()?)
        .context("malformed ECDSA signature")?;
    key.verify_prehash(data, &signature)
        .context("signature verification failed")?;
    Ok(())
}
