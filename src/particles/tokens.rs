// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::destinations_field;
use super::token_definition::TokenPermissions;
use crate::address::Address;
use crate::encoding::{DecodeError, Dson, DsonField, DsonMap, DsonValue, FromDson, Output};
use crate::primitives::{Granularity, Nonce, PositiveAmount, ValidationError};
use crate::rri::ResourceIdentifier;

/// Tokens held by an address. Spending them means consuming the particle
/// (spin down) and producing new ones for the recipient and the change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransferrableTokensParticle {
    address: Address,
    token_definition_reference: ResourceIdentifier,
    granularity: Granularity,
    amount: PositiveAmount,
    nonce: Nonce,
    permissions: TokenPermissions,
}

impl TransferrableTokensParticle {
    pub const SERIALIZER: &'static str = "radix.particles.transferrable_tokens";

    pub fn new(
        address: Address,
        token_definition_reference: ResourceIdentifier,
        granularity: Granularity,
        amount: PositiveAmount,
        nonce: Nonce,
        permissions: TokenPermissions,
    ) -> Result<Self, ValidationError> {
        granularity.check(amount.value())?;
        Ok(Self {
            address,
            token_definition_reference,
            granularity,
            amount,
            nonce,
            permissions,
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn token_definition_reference(&self) -> &ResourceIdentifier {
        &self.token_definition_reference
    }

    pub fn granularity(&self) -> &Granularity {
        &self.granularity
    }

    pub fn amount(&self) -> &PositiveAmount {
        &self.amount
    }

    pub fn nonce(&self) -> Nonce {
        self.nonce
    }

    pub fn permissions(&self) -> TokenPermissions {
        self.permissions
    }

    pub fn addresses(&self) -> Vec<Address> {
        vec![self.address]
    }
}

impl Dson for TransferrableTokensParticle {
    fn serializer(&self) -> Option<&'static str> {
        Some(Self::SERIALIZER)
    }

    fn dson_fields(&self, _: Output) -> Vec<DsonField> {
        vec![
            DsonField::new("address", self.address),
            DsonField::new(
                "tokenDefinitionReference",
                self.token_definition_reference.clone(),
            ),
            DsonField::new("granularity", self.granularity.value().clone()),
            DsonField::new("amount", self.amount.value().clone()),
            DsonField::new("nonce", self.nonce.value()),
            DsonField::new("permissions", self.permissions.to_dson_value()),
            destinations_field(&self.addresses()),
        ]
    }
}

impl FromDson for TransferrableTokensParticle {
    fn from_dson_value(value: DsonValue) -> Result<Self, DecodeError> {
        let mut map = DsonMap::expect(value, Self::SERIALIZER)?;
        Ok(Self::new(
            map.address("address")?,
            map.rri("tokenDefinitionReference")?,
            Granularity::new(map.uint256("granularity")?)?,
            PositiveAmount::new(map.uint256("amount")?)?,
            Nonce::new(map.integer("nonce")?),
            TokenPermissions::from_dson_value(map.take("permissions")?)?,
        )?)
    }
}

/// Supply of a mutable token that has not been minted yet. Minting consumes
/// it and produces [`TransferrableTokensParticle`]s; burning does the reverse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnallocatedTokensParticle {
    token_definition_reference: ResourceIdentifier,
    granularity: Granularity,
    amount: PositiveAmount,
    nonce: Nonce,
    permissions: TokenPermissions,
}

impl UnallocatedTokensParticle {
    pub const SERIALIZER: &'static str = "radix.particles.unallocated_tokens";

    pub fn new(
        token_definition_reference: ResourceIdentifier,
        granularity: Granularity,
        amount: PositiveAmount,
        nonce: Nonce,
        permissions: TokenPermissions,
    ) -> Result<Self, ValidationError> {
        granularity.check(amount.value())?;
        Ok(Self {
            token_definition_reference,
            granularity,
            amount,
            nonce,
            permissions,
        })
    }

    pub fn token_definition_reference(&self) -> &ResourceIdentifier {
        &self.token_definition_reference
    }

    pub fn granularity(&self) -> &Granularity {
        &self.granularity
    }

    pub fn amount(&self) -> &PositiveAmount {
        &self.amount
    }

    pub fn nonce(&self) -> Nonce {
        self.nonce
    }

    pub fn permissions(&self) -> TokenPermissions {
        self.permissions
    }

    /// Unallocated supply belongs to the token owner.
    pub fn addresses(&self) -> Vec<Address> {
        vec![*self.token_definition_reference.address()]
    }
}

impl Dson for UnallocatedTokensParticle {
    fn serializer(&self) -> Option<&'static str> {
        Some(Self::SERIALIZER)
    }

    fn dson_fields(&self, _: Output) -> Vec<DsonField> {
        vec![
            DsonField::new(
                "tokenDefinitionReference",
                self.token_definition_reference.clone(),
            ),
            DsonField::new("granularity", self.granularity.value().clone()),
            DsonField::new("amount", self.amount.value().clone()),
            DsonField::new("nonce", self.nonce.value()),
            DsonField::new("permissions", self.permissions.to_dson_value()),
            destinations_field(&self.addresses()),
        ]
    }
}

impl FromDson for UnallocatedTokensParticle {
    fn from_dson_value(value: DsonValue) -> Result<Self, DecodeError> {
        let mut map = DsonMap::expect(value, Self::SERIALIZER)?;
        Ok(Self::new(
            map.rri("tokenDefinitionReference")?,
            Granularity::new(map.uint256("granularity")?)?,
            PositiveAmount::new(map.uint256("amount")?)?,
            Nonce::new(map.integer("nonce")?),
            TokenPermissions::from_dson_value(map.take("permissions")?)?,
        )?)
    }
}
