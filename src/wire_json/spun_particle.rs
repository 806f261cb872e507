// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::*;
use crate::particles::SpunParticle;
#[cfg(test)]
use crate::{
    particles::{RriParticle, token_rri},
    primitives::Nonce,
};

impl HasWireJson for SpunParticle {
    #[cfg(test)]
    fn snapshots() -> Vec<(serde_json::Value, Self)> {
        vec![(
            json!({
                "particle": {
                    "destinations": [":uid:a9a8d4ae65de409a1ef6ab6608f0ce3f"],
                    "nonce": 0,
                    "rri": ":rri:/JEAWxsNy6cxMuXf3zVubV16mgEAKkGtDpMTYxQHiG1erPuWMZJA/XRD",
                    "serializer": "radix.particles.rri",
                    "version": 100
                },
                "serializer": "radix.spun_particle",
                "spin": -1,
                "version": 100
            }),
            SpunParticle::down(RriParticle::new(
                token_rri(snapshot_address(), "XRD").unwrap(),
                Nonce::new(0),
            )),
        )]
    }
}
