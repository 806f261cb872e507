// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::destinations_field;
use crate::address::Address;
use crate::encoding::{DecodeError, Dson, DsonField, DsonMap, DsonValue, FromDson, Output};
use crate::primitives::{Granularity, PositiveAmount, ValidationError};
use crate::rri::ResourceIdentifier;
use std::collections::BTreeMap;
use std::str::FromStr as _;
use strum::{Display, EnumString};

pub const MAX_SYMBOL_LEN: usize = 14;
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 64;
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Who may perform a [`TokenAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TokenPermission {
    TokenOwnerOnly,
    All,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TokenAction {
    Mint,
    Burn,
}

/// Mint and burn permissions of a token, encoded as a `mint`/`burn` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenPermissions {
    pub mint: TokenPermission,
    pub burn: TokenPermission,
}

impl TokenPermissions {
    pub fn new(mint: TokenPermission, burn: TokenPermission) -> Self {
        Self { mint, burn }
    }

    pub fn get(&self, action: TokenAction) -> TokenPermission {
        match action {
            TokenAction::Mint => self.mint,
            TokenAction::Burn => self.burn,
        }
    }

    pub(crate) fn to_dson_value(self) -> DsonValue {
        DsonValue::Map(BTreeMap::from([
            (TokenAction::Burn.to_string(), self.burn.to_string().into()),
            (TokenAction::Mint.to_string(), self.mint.to_string().into()),
        ]))
    }

    pub(crate) fn from_dson_value(value: DsonValue) -> Result<Self, DecodeError> {
        let mut map = DsonMap::open(value)?;
        let mut read = |action: TokenAction| -> Result<TokenPermission, DecodeError> {
            let key = action.to_string();
            let text = map.text(&key)?;
            TokenPermission::from_str(&text).map_err(|e| DecodeError::invalid_field(&key, e))
        };
        Ok(Self {
            mint: read(TokenAction::Mint)?,
            burn: read(TokenAction::Burn)?,
        })
    }
}

impl Default for TokenPermissions {
    /// Only the owner may mint or burn.
    fn default() -> Self {
        Self::new(TokenPermission::TokenOwnerOnly, TokenPermission::TokenOwnerOnly)
    }
}

fn check_len(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual < min {
        Err(ValidationError::TooShort { min, actual })
    } else if actual > max {
        Err(ValidationError::TooLong { max, actual })
    } else {
        Ok(())
    }
}

/// Checks what every token definition has in common: a short alphanumeric
/// symbol (the RRI name), a display name and an optional description.
fn validate_metadata(
    rri: &ResourceIdentifier,
    name: &str,
    description: &str,
) -> Result<(), ValidationError> {
    let symbol = rri.name();
    check_len(symbol, 1, MAX_SYMBOL_LEN)?;
    if let Some((index, character)) = symbol
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphanumeric())
    {
        return Err(ValidationError::DisallowedCharacter { character, index });
    }
    check_len(name, MIN_NAME_LEN, MAX_NAME_LEN)?;
    check_len(description, 0, MAX_DESCRIPTION_LEN)
}

/// A token whose owner may mint and burn under its [`TokenPermissions`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MutableSupplyTokenDefinition {
    rri: ResourceIdentifier,
    name: String,
    description: String,
    granularity: Granularity,
    icon_url: Option<String>,
    permissions: TokenPermissions,
}

impl MutableSupplyTokenDefinition {
    pub const SERIALIZER: &'static str = "radix.particles.mutable_supply_token_definition";

    pub fn new(
        rri: ResourceIdentifier,
        name: impl Into<String>,
        description: impl Into<String>,
        granularity: Granularity,
        icon_url: Option<String>,
        permissions: TokenPermissions,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let description = description.into();
        validate_metadata(&rri, &name, &description)?;
        Ok(Self {
            rri,
            name,
            description,
            granularity,
            icon_url,
            permissions,
        })
    }

    pub fn rri(&self) -> &ResourceIdentifier {
        &self.rri
    }

    pub fn symbol(&self) -> &str {
        self.rri.name()
    }

    pub fn owner(&self) -> &Address {
        self.rri.address()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn granularity(&self) -> &Granularity {
        &self.granularity
    }

    pub fn icon_url(&self) -> Option<&str> {
        self.icon_url.as_deref()
    }

    pub fn permissions(&self) -> TokenPermissions {
        self.permissions
    }

    pub fn addresses(&self) -> Vec<Address> {
        vec![*self.owner()]
    }
}

impl Dson for MutableSupplyTokenDefinition {
    fn serializer(&self) -> Option<&'static str> {
        Some(Self::SERIALIZER)
    }

    fn dson_fields(&self, _: Output) -> Vec<DsonField> {
        let mut fields = vec![
            DsonField::new("rri", self.rri.clone()),
            DsonField::new("name", self.name.clone()),
            DsonField::new("description", self.description.clone()),
            DsonField::new("granularity", self.granularity.value().clone()),
            DsonField::new("permissions", self.permissions.to_dson_value()),
            destinations_field(&self.addresses()),
        ];
        if let Some(icon_url) = &self.icon_url {
            fields.push(DsonField::new("iconUrl", icon_url.clone()));
        }
        fields
    }
}

impl FromDson for MutableSupplyTokenDefinition {
    fn from_dson_value(value: DsonValue) -> Result<Self, DecodeError> {
        let mut map = DsonMap::expect(value, Self::SERIALIZER)?;
        Ok(Self::new(
            map.rri("rri")?,
            map.text("name")?,
            map.text("description")?,
            Granularity::new(map.uint256("granularity")?)?,
            map.text_opt("iconUrl")?,
            TokenPermissions::from_dson_value(map.take("permissions")?)?,
        )?)
    }
}

/// A token whose whole supply is created with its definition and handed to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedSupplyTokenDefinition {
    rri: ResourceIdentifier,
    name: String,
    description: String,
    supply: PositiveAmount,
    granularity: Granularity,
    icon_url: Option<String>,
}

impl FixedSupplyTokenDefinition {
    pub const SERIALIZER: &'static str = "radix.particles.fixed_supply_token_definition";

    pub fn new(
        rri: ResourceIdentifier,
        name: impl Into<String>,
        description: impl Into<String>,
        supply: PositiveAmount,
        granularity: Granularity,
        icon_url: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let description = description.into();
        validate_metadata(&rri, &name, &description)?;
        granularity.check(supply.value())?;
        Ok(Self {
            rri,
            name,
            description,
            supply,
            granularity,
            icon_url,
        })
    }

    pub fn rri(&self) -> &ResourceIdentifier {
        &self.rri
    }

    pub fn symbol(&self) -> &str {
        self.rri.name()
    }

    pub fn owner(&self) -> &Address {
        self.rri.address()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn supply(&self) -> &PositiveAmount {
        &self.supply
    }

    pub fn granularity(&self) -> &Granularity {
        &self.granularity
    }

    pub fn icon_url(&self) -> Option<&str> {
        self.icon_url.as_deref()
    }

    pub fn addresses(&self) -> Vec<Address> {
        vec![*self.owner()]
    }
}

impl Dson for FixedSupplyTokenDefinition {
    fn serializer(&self) -> Option<&'static str> {
        Some(Self::SERIALIZER)
    }

    fn dson_fields(&self, _: Output) -> Vec<DsonField> {
        let mut fields = vec![
            DsonField::new("rri", self.rri.clone()),
            DsonField::new("name", self.name.clone()),
            DsonField::new("description", self.description.clone()),
            DsonField::new("supply", self.supply.value().clone()),
            DsonField::new("granularity", self.granularity.value().clone()),
            destinations_field(&self.addresses()),
        ];
        if let Some(icon_url) = &self.icon_url {
            fields.push(DsonField::new("iconUrl", icon_url.clone()));
        }
        fields
    }
}

impl FromDson for FixedSupplyTokenDefinition {
    fn from_dson_value(value: DsonValue) -> Result<Self, DecodeError> {
        let mut map = DsonMap::expect(value, Self::SERIALIZER)?;
        Ok(Self::new(
            map.rri("rri")?,
            map.text("name")?,
            map.text("description")?,
            PositiveAmount::new(map.uint256("supply")?)?,
            Granularity::new(map.uint256("granularity")?)?,
            map.text_opt("iconUrl")?,
        )?)
    }
}

/// The RRI a token definition would be registered under.
pub fn token_rri(owner: Address, symbol: &str) -> Result<ResourceIdentifier, ValidationError> {
    ResourceIdentifier::new(owner, symbol).map_err(|e| match e {
        crate::rri::RriError::InvalidName(e) => e,
        other => ValidationError::OutOfRange(other.to_string()),
    })
}
