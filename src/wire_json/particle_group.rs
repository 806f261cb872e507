// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::*;
use crate::particles::ParticleGroup;
#[cfg(test)]
use crate::{
    particles::{SpunParticle, UniqueParticle},
    primitives::Nonce,
};

impl HasWireJson for ParticleGroup {
    #[cfg(test)]
    fn snapshots() -> Vec<(serde_json::Value, Self)> {
        vec![
            (
                json!({
                    "metaData": {},
                    "particles": [],
                    "serializer": "radix.particle_group",
                    "version": 100
                }),
                ParticleGroup::default(),
            ),
            (
                json!({
                    "metaData": {"message": ":str:hi"},
                    "particles": [{
                        "particle": {
                            "address": ":adr:JEAWxsNy6cxMuXf3zVubV16mgEAKkGtDpMTYxQHiG1erPuWMZJA",
                            "destinations": [":uid:a9a8d4ae65de409a1ef6ab6608f0ce3f"],
                            "name": ":str:hello",
                            "nonce": 7,
                            "serializer": "radix.particles.unique",
                            "version": 100
                        },
                        "serializer": "radix.spun_particle",
                        "spin": 1,
                        "version": 100
                    }],
                    "serializer": "radix.particle_group",
                    "version": 100
                }),
                ParticleGroup::new(
                    vec![SpunParticle::up(
                        UniqueParticle::new(snapshot_address(), "hello", Nonce::new(7)).unwrap(),
                    )],
                    [("message".to_string(), "hi".to_string())].into(),
                ),
            ),
        ]
    }
}
