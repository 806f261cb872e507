// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::*;
use crate::crypto::Signature;

impl HasWireJson for Signature {
    #[cfg(test)]
    fn snapshots() -> Vec<(serde_json::Value, Self)> {
        vec![(
            json!({
                "r": ":byt:aGVsbG8=",
                "s": ":byt:d29ybGQ=",
                "serializer": "crypto.ecdsa_signature",
                "version": 100
            }),
            Signature::new(b"hello".to_vec(), b"world".to_vec()),
        )]
    }
}
