// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use strum::{Display, EnumString};

/// Default number of leading zero bits a proof of work must reach.
pub const DEFAULT_POW_TARGET_ZEROS: u32 = 16;
/// Maximum size of a wire-encoded atom in bytes. This is a submission-time
/// limit: larger atoms are rejected before they reach the transport.
pub const DEFAULT_MAX_ATOM_SIZE: usize = 60_000;

/// Universe-wide 32-bit constant. Its low byte prefixes every address and the
/// whole value seeds proofs of work.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct Magic(i32);

impl Magic {
    pub const fn new(magic: i32) -> Self {
        Self(magic)
    }

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn address_byte(self) -> u8 {
        self.0.to_be_bytes()[3]
    }

    pub fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

/// Builtin universes. Only `mainnet` should be considered stable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Network {
    Mainnet,
    Betanet,
    Localnet,
}

impl Network {
    pub fn magic(self) -> Magic {
        match self {
            Network::Mainnet => Magic::new(-1_332_248_574),
            Network::Betanet => Magic::new(-1_234_585_394),
            Network::Localnet => Magic::new(63_799_298),
        }
    }
}

/// Parameters shared by every participant of one universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SmartDefault)]
#[serde(default)]
pub struct UniverseConfig {
    #[default(Network::Localnet)]
    pub network: Network,
    /// Overrides the network's own magic, e.g. for a private universe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magic: Option<Magic>,
    #[default(DEFAULT_POW_TARGET_ZEROS)]
    pub pow_target_zeros: u32,
    #[default(DEFAULT_MAX_ATOM_SIZE)]
    pub max_atom_size: usize,
}

impl UniverseConfig {
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    /// Effective magic: the configured override, else the network's.
    pub fn magic(&self) -> Magic {
        self.magic.unwrap_or_else(|| self.network.magic())
    }

    pub fn mainnet() -> Self {
        Self::for_network(Network::Mainnet)
    }

    pub fn betanet() -> Self {
        Self::for_network(Network::Betanet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;

    #[test]
    fn address_byte_is_the_low_byte() {
        assert_eq!(Magic::new(0x0102_0304).address_byte(), 0x04);
        assert_eq!(Magic::new(-1).address_byte(), 0xff);
    }

    #[test]
    fn network_names() {
        assert_eq!(Network::from_str("betanet").unwrap(), Network::Betanet);
        assert_eq!(Network::Mainnet.to_string(), "mainnet");
        assert!(Network::from_str("calibnet").is_err());
    }

    #[test]
    fn presets_carry_their_magic() {
        let config = UniverseConfig::mainnet();
        assert_eq!(config.magic(), Network::Mainnet.magic());
        assert_eq!(config.pow_target_zeros, DEFAULT_POW_TARGET_ZEROS);
        assert_eq!(UniverseConfig::default().network, Network::Localnet);
    }

    #[test]
    fn magic_follows_the_network_unless_overridden() {
        let config: UniverseConfig = toml::from_str("network = \"mainnet\"").unwrap();
        assert_eq!(config.magic(), Network::Mainnet.magic());

        let config: UniverseConfig = toml::from_str("network = \"mainnet\"\nmagic = 2").unwrap();
        assert_eq!(config.magic(), Magic::new(2));
        assert_eq!(config.magic().address_byte(), 2);
    }
}
