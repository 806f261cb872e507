// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::*;
use crate::particles::Particle;
#[cfg(test)]
use crate::particles::{RriParticle, TokenPermissions, TransferrableTokensParticle, token_rri};
#[cfg(test)]
use crate::primitives::{Granularity, Nonce, PositiveAmount};

impl HasWireJson for Particle {
    #[cfg(test)]
    fn snapshots() -> Vec<(serde_json::Value, Self)> {
        let address = snapshot_address();
        let xrd = token_rri(address, "XRD").unwrap();
        vec![
            (
                json!({
                    "destinations": [":uid:a9a8d4ae65de409a1ef6ab6608f0ce3f"],
                    "nonce": 42,
                    "rri": ":rri:/JEAWxsNy6cxMuXf3zVubV16mgEAKkGtDpMTYxQHiG1erPuWMZJA/XRD",
                    "serializer": "radix.particles.rri",
                    "version": 100
                }),
                RriParticle::new(xrd.clone(), Nonce::new(42)).into(),
            ),
            (
                json!({
                    "address": ":adr:JEAWxsNy6cxMuXf3zVubV16mgEAKkGtDpMTYxQHiG1erPuWMZJA",
                    "amount": ":u20:1000",
                    "destinations": [":uid:a9a8d4ae65de409a1ef6ab6608f0ce3f"],
                    "granularity": ":u20:1",
                    "nonce": -1,
                    "permissions": {
                        "burn": ":str:token_owner_only",
                        "mint": ":str:token_owner_only"
                    },
                    "serializer": "radix.particles.transferrable_tokens",
                    "tokenDefinitionReference": ":rri:/JEAWxsNy6cxMuXf3zVubV16mgEAKkGtDpMTYxQHiG1erPuWMZJA/XRD",
                    "version": 100
                }),
                TransferrableTokensParticle::new(
                    address,
                    xrd,
                    Granularity::one(),
                    PositiveAmount::from_u64(1000).unwrap(),
                    Nonce::new(-1),
                    TokenPermissions::default(),
                )
                .unwrap()
                .into(),
            ),
        ]
    }
}
