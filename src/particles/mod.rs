// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! The ledger data model: particles are immutable units of state, produced
//! (spin up) and consumed (spin down) by atoms.

mod group;
mod identifier;
mod spin;
mod token_definition;
mod tokens;

pub use self::group::ParticleGroup;
pub use self::identifier::{RriParticle, UniqueParticle};
pub use self::spin::{Spin, SpunParticle};
pub use self::token_definition::{
    FixedSupplyTokenDefinition, MutableSupplyTokenDefinition, TokenAction, TokenPermission,
    TokenPermissions, token_rri,
};
pub use self::tokens::{TransferrableTokensParticle, UnallocatedTokensParticle};

use crate::address::Address;
use crate::encoding::{
    DecodeError, Dson, DsonField, DsonValue, Euid, FromDson, Output, serializer_of,
};
use crate::rri::ResourceIdentifier;
use itertools::Itertools as _;

/// Every particle kind this client understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::From)]
pub enum Particle {
    MutableSupplyTokenDefinition(MutableSupplyTokenDefinition),
    FixedSupplyTokenDefinition(FixedSupplyTokenDefinition),
    TransferrableTokens(TransferrableTokensParticle),
    UnallocatedTokens(UnallocatedTokensParticle),
    Rri(RriParticle),
    Unique(UniqueParticle),
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Particle::MutableSupplyTokenDefinition($inner) => $body,
            Particle::FixedSupplyTokenDefinition($inner) => $body,
            Particle::TransferrableTokens($inner) => $body,
            Particle::UnallocatedTokens($inner) => $body,
            Particle::Rri($inner) => $body,
            Particle::Unique($inner) => $body,
        }
    };
}

impl Particle {
    /// Addresses this particle belongs to or touches, without duplicates.
    pub fn addresses(&self) -> Vec<Address> {
        let addresses = dispatch!(self, p => p.addresses());
        addresses.into_iter().sorted().dedup().collect()
    }

    /// EUIDs of [`Self::addresses`], what nodes route the particle by.
    pub fn destinations(&self) -> Vec<Euid> {
        self.addresses().iter().map(Address::euid).collect()
    }

    pub fn rri(&self) -> Option<&ResourceIdentifier> {
        Some(match self {
            Particle::MutableSupplyTokenDefinition(p) => p.rri(),
            Particle::FixedSupplyTokenDefinition(p) => p.rri(),
            Particle::TransferrableTokens(p) => p.token_definition_reference(),
            Particle::UnallocatedTokens(p) => p.token_definition_reference(),
            Particle::Rri(p) => p.rri(),
            Particle::Unique(p) => p.rri(),
        })
    }

    pub fn serializer_name(&self) -> &'static str {
        match self {
            Particle::MutableSupplyTokenDefinition(_) => MutableSupplyTokenDefinition::SERIALIZER,
            Particle::FixedSupplyTokenDefinition(_) => FixedSupplyTokenDefinition::SERIALIZER,
            Particle::TransferrableTokens(_) => TransferrableTokensParticle::SERIALIZER,
            Particle::UnallocatedTokens(_) => UnallocatedTokensParticle::SERIALIZER,
            Particle::Rri(_) => RriParticle::SERIALIZER,
            Particle::Unique(_) => UniqueParticle::SERIALIZER,
        }
    }

    pub fn as_transferrable(&self) -> Option<&TransferrableTokensParticle> {
        match self {
            Particle::TransferrableTokens(p) => Some(p),
            _ => None,
        }
    }
}

/// The computed `destinations` field every particle carries.
pub(crate) fn destinations_field(addresses: &[Address]) -> DsonField {
    let euids = addresses
        .iter()
        .sorted()
        .dedup()
        .map(|address| DsonValue::Euid(address.euid()))
        .collect();
    DsonField::new("destinations", DsonValue::Array(euids))
}

impl Dson for Particle {
    fn serializer(&self) -> Option<&'static str> {
        Some(self.serializer_name())
    }

    fn dson_fields(&self, output: Output) -> Vec<DsonField> {
        dispatch!(self, p => p.dson_fields(output))
    }
}

impl FromDson for Particle {
    fn from_dson_value(value: DsonValue) -> Result<Self, DecodeError> {
        Ok(match serializer_of(&value)? {
            MutableSupplyTokenDefinition::SERIALIZER => {
                MutableSupplyTokenDefinition::from_dson_value(value)?.into()
            }
            FixedSupplyTokenDefinition::SERIALIZER => {
                FixedSupplyTokenDefinition::from_dson_value(value)?.into()
            }
            TransferrableTokensParticle::SERIALIZER => {
                TransferrableTokensParticle::from_dson_value(value)?.into()
            }
            UnallocatedTokensParticle::SERIALIZER => {
                UnallocatedTokensParticle::from_dson_value(value)?.into()
            }
            RriParticle::SERIALIZER => RriParticle::from_dson_value(value)?.into(),
            UniqueParticle::SERIALIZER => UniqueParticle::from_dson_value(value)?.into(),
            other => return Err(DecodeError::UnknownSerializer(other.to_string())),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Granularity, Nonce, PositiveAmount};
    use crate::wire_json::snapshot_address;
    use quickcheck_macros::quickcheck;

    #[test]
    fn addresses_are_deduplicated() {
        let owner = snapshot_address();
        let particle: Particle = TransferrableTokensParticle::new(
            owner,
            token_rri(owner, "XRD").unwrap(),
            Granularity::one(),
            PositiveAmount::from_u64(1).unwrap(),
            Nonce::new(0),
            TokenPermissions::default(),
        )
        .unwrap()
        .into();
        assert_eq!(particle.addresses(), vec![owner]);
        assert_eq!(particle.destinations(), vec![owner.euid()]);
        assert_eq!(particle.rri().map(|rri| rri.name()), Some("XRD"));
        assert!(particle.as_transferrable().is_some());
    }

    #[test]
    fn unknown_serializer() {
        let mut value = Particle::from(RriParticle::new(
            token_rri(snapshot_address(), "XRD").unwrap(),
            Nonce::new(0),
        ))
        .to_dson_value(Output::Hash);
        if let DsonValue::Map(map) = &mut value {
            map.insert("serializer".into(), "radix.particles.mystery".into());
        }
        assert_eq!(
            Particle::from_dson_value(value).unwrap_err(),
            DecodeError::UnknownSerializer("radix.particles.mystery".into())
        );
    }

    #[test]
    fn destinations_are_ignored_on_decode() {
        let particle = Particle::from(RriParticle::new(
            token_rri(snapshot_address(), "XRD").unwrap(),
            Nonce::new(0),
        ));
        let DsonValue::Map(mut map) = particle.to_dson_value(Output::Wire) else {
            panic!("not a map")
        };
        map.insert("destinations".into(), DsonValue::Array(vec![]));
        assert_eq!(Particle::from_dson_value(DsonValue::Map(map)).unwrap(), particle);
    }

    #[quickcheck]
    fn hash_output_roundtrips(particle: Particle) {
        let bytes = particle.to_dson(Output::Hash).unwrap();
        assert_eq!(Particle::from_dson(&bytes).unwrap(), particle);
        assert_eq!(particle.radix_hash().unwrap(), particle.radix_hash().unwrap());
    }
}
