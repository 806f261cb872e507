// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::*;
use crate::atom::Atom;
#[cfg(test)]
use crate::{crypto::Signature, encoding::Euid};

impl HasWireJson for Atom {
    #[cfg(test)]
    fn snapshots() -> Vec<(serde_json::Value, Self)> {
        let mut signed = Atom::with_timestamp(vec![], 1_551_000_000_000).with_pow_nonce(3);
        signed.insert_signature(
            Euid::from_bytes(&[0x11; 16]).unwrap(),
            Signature::new(vec![1], vec![2]),
        );
        vec![
            (
                json!({
                    "metaData": {},
                    "particleGroups": [],
                    "serializer": "radix.atom",
                    "signatures": {},
                    "version": 100
                }),
                Atom::default(),
            ),
            (
                json!({
                    "metaData": {"timestamp": ":str:1551000000000"},
                    "particleGroups": [],
                    "powNonce": 3,
                    "serializer": "radix.atom",
                    "signatures": {
                        "11111111111111111111111111111111": {
                            "r": ":byt:AQ==",
                            "s": ":byt:Ag==",
                            "serializer": "crypto.ecdsa_signature",
                            "version": 100
                        }
                    },
                    "version": 100
                }),
                signed,
            ),
        ]
    }
}
