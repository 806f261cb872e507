// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{Atom, AtomError};
use crate::address::Address;
use crate::crypto::{self, Signature, Signer};
use crate::encoding::{
    DecodeError, Dson, DsonField, DsonValue, EncodeError, Euid, FromDson, Output, RadixHash,
};
use std::collections::BTreeMap;

/// Represents an atom carrying at least one signature over its hash.
#[derive(PartialEq, Clone, Debug, Eq)]
pub struct SignedAtom {
    atom: Atom,
}

impl SignedAtom {
    /// Signs the atom hash with the key behind `address`.
    pub fn sign(atom: Atom, signer: &impl Signer, address: &Address) -> Result<Self, AtomError> {
        let mut atom = atom;
        let hash = atom.hash()?;
        let signature = signer
            .sign_bytes(hash.as_bytes(), address)
            .map_err(AtomError::Signing)?;
        tracing::debug!(%hash, signer = %address.euid(), "signed atom");
        atom.insert_signature(address.euid(), signature);
        Ok(Self { atom })
    }

    /// Adds another signature over the same hash.
    pub fn cosign(self, signer: &impl Signer, address: &Address) -> Result<Self, AtomError> {
        Self::sign(self.atom, signer, address)
    }

    /// Wraps an atom that is already signed, e.g. one decoded from a node.
    /// The signatures will not be verified.
    pub fn new_unchecked(atom: Atom) -> Result<Self, AtomError> {
        if atom.signatures().is_empty() {
            return Err(AtomError::Unsigned);
        }
        Ok(Self { atom })
    }

    /// Returns reference to the signed atom.
    pub fn atom(&self) -> &Atom {
        &self.atom
    }

    /// Consumes self and returns the atom.
    pub fn into_atom(self) -> Atom {
        self.atom
    }

    pub fn signatures(&self) -> &BTreeMap<Euid, Signature> {
        self.atom.signatures()
    }

    pub fn hash(&self) -> Result<RadixHash, AtomError> {
        Ok(self.atom.hash()?)
    }

    /// Verifies that `address` signed this atom.
    pub fn verify(&self, address: &Address) -> Result<(), AtomError> {
        let signer = address.euid();
        let signature = self
            .signatures()
            .get(&signer)
            .ok_or(AtomError::MissingSignature(signer))?;
        let hash = self.hash()?;
        crypto::verify(signature, hash.as_bytes(), address)
            .map_err(|reason| AtomError::InvalidSignature { signer, reason })
    }
}

impl Dson for SignedAtom {
    fn serializer(&self) -> Option<&'static str> {
        self.atom.serializer()
    }

    fn dson_fields(&self, output: Output) -> Vec<DsonField> {
        self.atom.dson_fields(output)
    }

    fn derived_fields(&self, output: Output) -> Result<Vec<DsonField>, EncodeError> {
        self.atom.derived_fields(output)
    }
}

impl FromDson for SignedAtom {
    fn from_dson_value(value: DsonValue) -> Result<Self, DecodeError> {
        let atom = Atom::from_dson_value(value)?;
        Self::new_unchecked(atom).map_err(|e| DecodeError::invalid_field("signatures", e))
    }
}
