// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::destinations_field;
use crate::address::Address;
use crate::encoding::{DecodeError, Dson, DsonField, DsonMap, DsonValue, FromDson, Output};
use crate::primitives::Nonce;
use crate::rri::{ResourceIdentifier, RriError};

/// Claims a resource identifier. Consuming it is what allows a token
/// definition to be created under the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RriParticle {
    rri: ResourceIdentifier,
    nonce: Nonce,
}

impl RriParticle {
    pub const SERIALIZER: &'static str = "radix.particles.rri";

    pub fn new(rri: ResourceIdentifier, nonce: Nonce) -> Self {
        Self { rri, nonce }
    }

    pub fn rri(&self) -> &ResourceIdentifier {
        &self.rri
    }

    pub fn nonce(&self) -> Nonce {
        self.nonce
    }

    pub fn addresses(&self) -> Vec<Address> {
        vec![*self.rri.address()]
    }
}

impl Dson for RriParticle {
    fn serializer(&self) -> Option<&'static str> {
        Some(Self::SERIALIZER)
    }

    fn dson_fields(&self, _: Output) -> Vec<DsonField> {
        vec![
            DsonField::new("rri", self.rri.clone()),
            DsonField::new("nonce", self.nonce.value()),
            destinations_field(&self.addresses()),
        ]
    }
}

impl FromDson for RriParticle {
    fn from_dson_value(value: DsonValue) -> Result<Self, DecodeError> {
        let mut map = DsonMap::expect(value, Self::SERIALIZER)?;
        Ok(Self::new(map.rri("rri")?, Nonce::new(map.integer("nonce")?)))
    }
}

/// A name that can be put only once per address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniqueParticle {
    rri: ResourceIdentifier,
    nonce: Nonce,
}

impl UniqueParticle {
    pub const SERIALIZER: &'static str = "radix.particles.unique";

    pub fn new(address: Address, name: impl Into<String>, nonce: Nonce) -> Result<Self, RriError> {
        Ok(Self {
            rri: ResourceIdentifier::new(address, name)?,
            nonce,
        })
    }

    pub fn address(&self) -> &Address {
        self.rri.address()
    }

    pub fn name(&self) -> &str {
        self.rri.name()
    }

    /// `/<address>/<name>`
    pub fn rri(&self) -> &ResourceIdentifier {
        &self.rri
    }

    pub fn nonce(&self) -> Nonce {
        self.nonce
    }

    pub fn addresses(&self) -> Vec<Address> {
        vec![*self.address()]
    }
}

impl Dson for UniqueParticle {
    fn serializer(&self) -> Option<&'static str> {
        Some(Self::SERIALIZER)
    }

    fn dson_fields(&self, _: Output) -> Vec<DsonField> {
        vec![
            DsonField::new("address", *self.address()),
            DsonField::new("name", self.name()),
            DsonField::new("nonce", self.nonce.value()),
            destinations_field(&self.addresses()),
        ]
    }
}

impl FromDson for UniqueParticle {
    fn from_dson_value(value: DsonValue) -> Result<Self, DecodeError> {
        let mut map = DsonMap::expect(value, Self::SERIALIZER)?;
        Ok(Self::new(
            map.address("address")?,
            map.text("name")?,
            Nonce::new(map.integer("nonce")?),
        )?)
    }
}
