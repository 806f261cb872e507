// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::token_balances::signed;
use super::{ReduceError, Reducer};
use crate::particles::{
    FixedSupplyTokenDefinition, MutableSupplyTokenDefinition, Particle, Spin, SpunParticle,
    TokenPermissions,
};
use crate::primitives::{Granularity, UInt256};
use crate::rri::ResourceIdentifier;
use num_bigint::BigInt;
use std::collections::BTreeMap;

/// How the supply of a token is controlled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSupply {
    /// Everything was issued at creation.
    Fixed(UInt256),
    /// Minted from and burnt into the unallocated pool.
    Mutable(TokenPermissions),
}

/// What is known about one token class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDefinition {
    pub rri: ResourceIdentifier,
    pub name: String,
    pub description: String,
    pub granularity: Granularity,
    pub icon_url: Option<String>,
    pub supply: TokenSupply,
    /// Net amount held by unallocated token particles.
    pub unallocated: BigInt,
}

impl TokenDefinition {
    pub fn symbol(&self) -> &str {
        self.rri.name()
    }

    /// Tokens in circulation. For mutable supply tokens this is everything
    /// that left the unallocated pool, which starts out at [`UInt256::max_value`].
    pub fn total_supply(&self) -> BigInt {
        match &self.supply {
            TokenSupply::Fixed(supply) => BigInt::from(supply.as_big_uint().clone()),
            TokenSupply::Mutable(_) => {
                BigInt::from(UInt256::max_value().as_big_uint().clone()) - &self.unallocated
            }
        }
    }

    fn mutable(particle: &MutableSupplyTokenDefinition) -> Self {
        Self {
            rri: particle.rri().clone(),
            name: particle.name().to_string(),
            description: particle.description().to_string(),
            granularity: particle.granularity().clone(),
            icon_url: particle.icon_url().map(str::to_string),
            supply: TokenSupply::Mutable(particle.permissions()),
            unallocated: BigInt::default(),
        }
    }

    fn fixed(particle: &FixedSupplyTokenDefinition) -> Self {
        Self {
            rri: particle.rri().clone(),
            name: particle.name().to_string(),
            description: particle.description().to_string(),
            granularity: particle.granularity().clone(),
            icon_url: particle.icon_url().map(str::to_string),
            supply: TokenSupply::Fixed(particle.supply().value().clone()),
            unallocated: BigInt::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenDefinitions {
    definitions: BTreeMap<ResourceIdentifier, TokenDefinition>,
}

impl TokenDefinitions {
    pub fn get(&self, token: &ResourceIdentifier) -> Option<&TokenDefinition> {
        self.definitions.get(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Tracks every token definition seen, whoever owns it.
///
/// Unlike balances this fold depends on order: a definition has to be
/// observed before the unallocated particles of its token, otherwise they
/// fail with [`ReduceError::UnknownTokenDefinition`]. Nodes deliver a
/// definition in the same atom as its first unallocated particle, ahead of it.
///
/// A down definition removes the token again, which is how deleted atoms are
/// undone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenDefinitionsReducer;

impl TokenDefinitionsReducer {
    fn define(
        state: &TokenDefinitions,
        spin: Spin,
        definition: TokenDefinition,
    ) -> TokenDefinitions {
        let mut next = state.clone();
        match spin {
            Spin::Up => {
                let unallocated = next
                    .definitions
                    .remove(&definition.rri)
                    .map(|old| old.unallocated)
                    .unwrap_or_default();
                next.definitions.insert(
                    definition.rri.clone(),
                    TokenDefinition {
                        unallocated,
                        ..definition
                    },
                );
            }
            Spin::Down => {
                next.definitions.remove(&definition.rri);
            }
        }
        next
    }
}

impl Reducer for TokenDefinitionsReducer {
    type State = TokenDefinitions;

    fn name(&self) -> &'static str {
        "token_definitions"
    }

    fn reduce(
        &self,
        state: &TokenDefinitions,
        spun: &SpunParticle,
    ) -> Result<Option<TokenDefinitions>, ReduceError> {
        let spin = spun.spin();
        match spun.particle() {
            Particle::MutableSupplyTokenDefinition(p) => {
                Ok(Some(Self::define(state, spin, TokenDefinition::mutable(p))))
            }
            Particle::FixedSupplyTokenDefinition(p) => {
                Ok(Some(Self::define(state, spin, TokenDefinition::fixed(p))))
            }
            Particle::UnallocatedTokens(p) => {
                let token = p.token_definition_reference();
                let mut next = state.clone();
                let definition = next
                    .definitions
                    .get_mut(token)
                    .ok_or_else(|| ReduceError::UnknownTokenDefinition(token.clone()))?;
                definition.unallocated += signed(spin, p.amount().value());
                Ok(Some(next))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Categorized as _, ErrorKind};
    use crate::particles::{TokenPermission, UnallocatedTokensParticle, token_rri};
    use crate::primitives::{Nonce, PositiveAmount};
    use crate::wire_json::snapshot_address;

    fn xrd() -> ResourceIdentifier {
        token_rri(snapshot_address(), "XRD").unwrap()
    }

    fn mutable() -> MutableSupplyTokenDefinition {
        MutableSupplyTokenDefinition::new(
            xrd(),
            "Radix",
            "Radix tokens",
            Granularity::one(),
            None,
            TokenPermissions::new(TokenPermission::TokenOwnerOnly, TokenPermission::All),
        )
        .unwrap()
    }

    fn unallocated(amount: UInt256) -> UnallocatedTokensParticle {
        UnallocatedTokensParticle::new(
            xrd(),
            Granularity::one(),
            PositiveAmount::new(amount).unwrap(),
            Nonce::new(0),
            TokenPermissions::default(),
        )
        .unwrap()
    }

    fn fold(particles: &[SpunParticle]) -> Result<TokenDefinitions, ReduceError> {
        particles
            .iter()
            .try_fold(TokenDefinitions::default(), |state, spun| {
                Ok(TokenDefinitionsReducer.reduce(&state, spun)?.unwrap_or(state))
            })
    }

    #[test]
    fn minting_moves_tokens_out_of_the_pool() {
        let max = UInt256::max_value();
        let remaining = max.checked_sub(&UInt256::from(1_000)).unwrap();
        let state = fold(&[
            SpunParticle::up(mutable()),
            SpunParticle::up(unallocated(max.clone())),
            // mint 1000
            SpunParticle::down(unallocated(max)),
            SpunParticle::up(unallocated(remaining)),
        ])
        .unwrap();
        let definition = state.get(&xrd()).unwrap();
        assert_eq!(definition.symbol(), "XRD");
        assert_eq!(definition.total_supply(), BigInt::from(1_000));
        assert!(matches!(definition.supply, TokenSupply::Mutable(_)));
    }

    #[test]
    fn fixed_supply() {
        let fixed = FixedSupplyTokenDefinition::new(
            xrd(),
            "Radix",
            String::new(),
            PositiveAmount::from_u64(21_000_000).unwrap(),
            Granularity::one(),
            Some("https://radixdlt.com/x.png".into()),
        )
        .unwrap();
        let state = fold(&[SpunParticle::up(fixed.clone())]).unwrap();
        let definition = state.get(&xrd()).unwrap();
        assert_eq!(definition.total_supply(), BigInt::from(21_000_000));
        assert_eq!(definition.icon_url.as_deref(), Some("https://radixdlt.com/x.png"));

        assert!(fold(&[SpunParticle::up(fixed.clone()), SpunParticle::down(fixed)])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn unallocated_before_definition_is_inconsistent() {
        let err = fold(&[SpunParticle::up(unallocated(UInt256::from(5)))]).unwrap_err();
        assert_eq!(err, ReduceError::UnknownTokenDefinition(xrd()));
        assert_eq!(err.kind(), ErrorKind::Consistency);
    }

    #[test]
    fn redefinition_keeps_the_pool() {
        let state = fold(&[
            SpunParticle::up(mutable()),
            SpunParticle::up(unallocated(UInt256::from(5))),
            SpunParticle::up(mutable()),
        ])
        .unwrap();
        assert_eq!(state.get(&xrd()).unwrap().unallocated, BigInt::from(5));
        assert_eq!(state.len(), 1);
    }
}
