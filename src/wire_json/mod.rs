// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Nodes present every entity in TWO ways:
//! - DSON (see [`crate::encoding`]).
//!   This is what hashes and signatures are computed over.
//! - JSON.
//!   This is what the node API and its WebSocket subscriptions speak.
//!
//! Both are produced from the same [`DsonValue`] tree, so an entity only
//! declares its fields once. JSON has fewer native types than DSON, so typed
//! values travel as strings with a short prefix:
//!
//! | prefix  | value                                  |
//! |---------|----------------------------------------|
//! | `:str:` | text                                   |
//! | `:byt:` | raw bytes, base64                      |
//! | `:uid:` | EUID, hex                              |
//! | `:hsh:` | hash, hex                              |
//! | `:adr:` | address, base58                        |
//! | `:u20:` | unsigned 256-bit integer, decimal      |
//! | `:rri:` | resource identifier, `/<address>/<name>` |
//!
//! Integers and booleans are native JSON numbers and booleans. The one
//! exception to the prefix rule is the `serializer` discriminant, which is a
//! bare string:
//! ```
//! # use radix::encoding::{Dson as _, Output};
//! # use radix::crypto::Signature;
//! let json = Signature::new(vec![1], vec![2]).to_wire_json(Output::Wire).unwrap();
//! assert_eq!(json["serializer"], "crypto.ecdsa_signature");
//! assert_eq!(json["r"], ":byt:AQ==");
//! assert_eq!(json["version"], 100);
//! ```
//!
//! # Snapshot testing
//! Each type with a JSON form gets a module below declared through
//! `decl_and_test!`, which checks the snapshots the module provides and
//! `quickcheck`s round trips through both JSON and DSON.

use crate::encoding::{DecodeError, Dson, DsonValue, FromDson, Output, SERIALIZER_KEY};
use crate::primitives::{Base64String, HexString};
use serde_json::{Map, Value};
#[cfg(test)]
use {crate::address::Address, crate::crypto::PublicKey, serde_json::json};

pub const TEXT_PREFIX: &str = ":str:";
pub const BYTES_PREFIX: &str = ":byt:";
pub const EUID_PREFIX: &str = ":uid:";
pub const HASH_PREFIX: &str = ":hsh:";
pub const ADDRESS_PREFIX: &str = ":adr:";
pub const UINT256_PREFIX: &str = ":u20:";
pub const RRI_PREFIX: &str = ":rri:";

/// Types exchanged with nodes as JSON.
pub trait HasWireJson: Dson + FromDson {
    /// To ensure the JSON form stays compatible with nodes, it MUST be
    /// tested. Provide snapshots of the JSON, and the value it decodes to.
    ///
    /// Snapshots are checked in [`Output::Wire`].
    #[cfg(test)]
    fn snapshots() -> Vec<(serde_json::Value, Self)>;

    fn into_wire_json_string(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(&self.to_wire_json(Output::Wire)?)?)
    }

    fn into_wire_json_string_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_wire_json(Output::Wire)?)?)
    }

    fn from_wire_json_str(s: &str) -> Result<Self, DecodeError> {
        let json: Value = serde_json::from_str(s).map_err(|e| DecodeError::Json(e.to_string()))?;
        Self::from_wire_json(&json)
    }
}

/// JSON form of a value tree.
pub fn to_json(value: &DsonValue) -> Value {
    match value {
        DsonValue::Bool(b) => Value::Bool(*b),
        DsonValue::Integer(i) => Value::from(*i),
        DsonValue::Text(s) => prefixed(TEXT_PREFIX, s),
        DsonValue::Bytes(bytes) => prefixed(BYTES_PREFIX, Base64String::from_bytes(bytes)),
        DsonValue::Euid(euid) => prefixed(EUID_PREFIX, euid),
        DsonValue::Hash(hash) => prefixed(HASH_PREFIX, hash),
        DsonValue::Address(address) => prefixed(ADDRESS_PREFIX, address),
        DsonValue::UInt256(value) => prefixed(UINT256_PREFIX, value),
        DsonValue::Rri(rri) => prefixed(RRI_PREFIX, rri),
        DsonValue::Array(items) => Value::Array(items.iter().map(to_json).collect()),
        DsonValue::Map(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let json = match (key.as_str(), value) {
                        (SERIALIZER_KEY, DsonValue::Text(serializer)) => {
                            Value::String(serializer.clone())
                        }
                        _ => to_json(value),
                    };
                    (key.clone(), json)
                })
                .collect::<Map<_, _>>(),
        ),
    }
}

fn prefixed(prefix: &str, value: impl std::fmt::Display) -> Value {
    Value::String(format!("{prefix}{value}"))
}

/// Parses the JSON form back into a value tree.
pub fn from_json(json: &Value) -> Result<DsonValue, DecodeError> {
    Ok(match json {
        Value::Bool(b) => DsonValue::Bool(*b),
        Value::Number(n) => DsonValue::Integer(
            n.as_i64()
                .ok_or_else(|| DecodeError::IntegerOutOfRange(n.to_string()))?,
        ),
        Value::String(s) => from_prefixed(s)?,
        Value::Array(items) => {
            DsonValue::Array(items.iter().map(from_json).collect::<Result<_, _>>()?)
        }
        Value::Object(map) => DsonValue::Map(
            map.iter()
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        (SERIALIZER_KEY, Value::String(serializer)) => {
                            DsonValue::Text(serializer.clone())
                        }
                        _ => from_json(value)?,
                    };
                    Ok((key.clone(), value))
                })
                .collect::<Result<_, DecodeError>>()?,
        ),
        Value::Null => return Err(DecodeError::Unsupported("null".into())),
    })
}

fn from_prefixed(s: &str) -> Result<DsonValue, DecodeError> {
    let Some((prefix, body)) = s.split_at_checked(TEXT_PREFIX.len()) else {
        return Err(DecodeError::MissingJsonPrefix(s.to_string()));
    };
    Ok(match prefix {
        TEXT_PREFIX => DsonValue::Text(body.to_string()),
        BYTES_PREFIX => DsonValue::Bytes(Base64String::new(body)?.to_bytes()?),
        EUID_PREFIX => DsonValue::Euid(body.parse()?),
        HASH_PREFIX => DsonValue::Hash(body.parse()?),
        ADDRESS_PREFIX => DsonValue::Address(body.parse()?),
        UINT256_PREFIX => DsonValue::UInt256(body.parse()?),
        RRI_PREFIX => DsonValue::Rri(body.parse()?),
        _ => return Err(DecodeError::MissingJsonPrefix(s.to_string())),
    })
}

/// Hex text of arbitrary bytes, as the tool prints DSON.
pub fn hex_dump(bytes: &[u8]) -> String {
    HexString::from_bytes(bytes).to_string()
}

macro_rules! decl_and_test {
    ($($mod_name:ident for $domain_ty:ty),* $(,)?) => {
        $(
            mod $mod_name;
        )*
        #[test]
        fn all_snapshots() {
            $(
                print!("test snapshots for {}...", std::any::type_name::<$domain_ty>());
                std::io::Write::flush(&mut std::io::stdout()).unwrap();
                // ^ make sure the above line is flushed in case the test fails
                assert_all_snapshots::<$domain_ty>();
                println!("ok.");
            )*
        }
        #[test]
        fn all_quickchecks() {
            $(
                print!("quickcheck for {}...", std::any::type_name::<$domain_ty>());
                std::io::Write::flush(&mut std::io::stdout()).unwrap();
                // ^ make sure the above line is flushed in case the test fails
                ::quickcheck::QuickCheck::new()
                    .tests(50)
                    .quickcheck(assert_unchanged_via_json::<$domain_ty> as fn(_));
                ::quickcheck::QuickCheck::new()
                    .tests(50)
                    .quickcheck(assert_unchanged_via_dson::<$domain_ty> as fn(_));
                println!("ok.");
            )*
        }
    }
}

decl_and_test!(
    atom for crate::atom::Atom,
    particle for crate::particles::Particle,
    particle_group for crate::particles::ParticleGroup,
    signature for crate::crypto::Signature,
    spun_particle for crate::particles::SpunParticle,
);

#[cfg(test)]
pub fn assert_all_snapshots<T>()
where
    T: HasWireJson + PartialEq + std::fmt::Debug + Clone,
{
    let snapshots = T::snapshots();
    assert!(!snapshots.is_empty());
    for (wire_json, val) in snapshots {
        assert_one_snapshot(wire_json, val);
    }
}

#[cfg(test)]
pub fn assert_one_snapshot<T>(wire_json: serde_json::Value, val: T)
where
    T: HasWireJson + PartialEq + std::fmt::Debug + Clone,
{
    // T -> wire_json
    let serialized = val.to_wire_json(Output::Wire).unwrap();
    pretty_assertions::assert_eq!(
        serialized,
        wire_json,
        "snapshot failed for {}",
        std::any::type_name::<T>()
    );

    // wire_json -> T
    let deserialized = match T::from_wire_json(&wire_json) {
        Ok(val) => val,
        Err(e) => panic!(
            "couldn't deserialize a {} from {}: {e}",
            std::any::type_name::<T>(),
            wire_json
        ),
    };
    pretty_assertions::assert_eq!(deserialized, val);
}

#[cfg(test)]
pub fn assert_unchanged_via_json<T>(val: T)
where
    T: HasWireJson + Clone + PartialEq + std::fmt::Debug,
{
    // T -> json value -> string -> json value -> T
    let temp = val.into_wire_json_string().unwrap();
    let temp = T::from_wire_json_str(&temp).unwrap();
    pretty_assertions::assert_eq!(val, temp);
}

#[cfg(test)]
pub fn assert_unchanged_via_dson<T>(val: T)
where
    T: HasWireJson + Clone + PartialEq + std::fmt::Debug,
{
    let bytes = val.to_dson(Output::Wire).unwrap();
    let temp = T::from_dson(&bytes).unwrap();
    pretty_assertions::assert_eq!(val, temp);
    // encoding is deterministic
    pretty_assertions::assert_eq!(temp.to_dson(Output::Wire).unwrap(), bytes);
}

/// A fixed address for snapshots: magic byte `0x02`, public key `0x02` x 33.
#[cfg(test)]
pub fn snapshot_address() -> Address {
    Address::from_parts(0x02, snapshot_public_key())
}

#[cfg(test)]
fn snapshot_public_key() -> PublicKey {
    PublicKey::from_bytes(&[0x02; 33]).unwrap()
}
