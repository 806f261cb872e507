// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::errors::{DecodeError, EncodeError};
use super::hash::{Euid, RadixHash};
use crate::address::Address;
use crate::error;
use crate::primitives::UInt256;
use crate::rri::ResourceIdentifier;
use cbor4ii::core::{
    Value,
    dec::Decode as _,
    enc::{self, Encode},
    types,
    utils::{BufWriter, SliceReader},
};
use std::collections::BTreeMap;

pub const BYTES_PREFIX: u8 = 0x01;
pub const EUID_PREFIX: u8 = 0x02;
pub const HASH_PREFIX: u8 = 0x03;
pub const ADDRESS_PREFIX: u8 = 0x04;
pub const UINT256_PREFIX: u8 = 0x05;
pub const RRI_PREFIX: u8 = 0x06;

/// The value tree both the binary and the JSON forms are produced from.
///
/// Semantic values (hashes, addresses, ...) are kept typed so that each form
/// can apply its own tagging: a prefix byte in DSON, a prefix string in JSON.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub enum DsonValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    Bytes(Vec<u8>),
    Euid(Euid),
    Hash(RadixHash),
    Address(Address),
    UInt256(UInt256),
    Rri(ResourceIdentifier),
    Array(Vec<DsonValue>),
    Map(BTreeMap<String, DsonValue>),
}

impl From<&str> for DsonValue {
    fn from(value: &str) -> Self {
        DsonValue::Text(value.to_string())
    }
}

impl DsonValue {
    /// Short name of the value kind, used in decode errors.
    pub fn kind(&self) -> &'static str {
        match self {
            DsonValue::Bool(_) => "bool",
            DsonValue::Integer(_) => "integer",
            DsonValue::Text(_) => "text",
            DsonValue::Bytes(_) => "bytes",
            DsonValue::Euid(_) => "euid",
            DsonValue::Hash(_) => "hash",
            DsonValue::Address(_) => "address",
            DsonValue::UInt256(_) => "uint256",
            DsonValue::Rri(_) => "rri",
            DsonValue::Array(_) => "array",
            DsonValue::Map(_) => "map",
        }
    }

    /// Canonical DSON bytes of this value.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut writer = BufWriter::new(Vec::new());
        self.encode(&mut writer)
            .map_err(|e| error::internal("dson encode", format!("{e:?}")))?;
        Ok(writer.into_inner())
    }

    /// Parses DSON bytes. Anything that would not re-encode to exactly the
    /// same bytes is rejected with [`DecodeError::NonCanonical`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = SliceReader::new(bytes);
        let raw = Value::decode(&mut reader).map_err(|e| DecodeError::Cbor(format!("{e:?}")))?;
        let value = Self::from_cbor(raw)?;
        let reencoded = value
            .to_bytes()
            .map_err(|e| DecodeError::Cbor(e.to_string()))?;
        if reencoded != bytes {
            return Err(DecodeError::NonCanonical);
        }
        Ok(value)
    }

    fn from_cbor(raw: Value) -> Result<Self, DecodeError> {
        Ok(match raw {
            Value::Bool(b) => DsonValue::Bool(b),
            Value::Integer(i) => DsonValue::Integer(
                i64::try_from(i).map_err(|_| DecodeError::IntegerOutOfRange(i.to_string()))?,
            ),
            Value::Text(s) => DsonValue::Text(s),
            Value::Bytes(bytes) => Self::from_prefixed_bytes(bytes)?,
            Value::Array(items) => DsonValue::Array(
                items
                    .into_iter()
                    .map(Self::from_cbor)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Map(entries) => {
                let mut map = BTreeMap::new();
                for (key, value) in entries {
                    let Value::Text(key) = key else {
                        return Err(DecodeError::Unsupported("non-text map key".into()));
                    };
                    map.insert(key, Self::from_cbor(value)?);
                }
                DsonValue::Map(map)
            }
            other => return Err(DecodeError::Unsupported(format!("{other:?}"))),
        })
    }

    fn from_prefixed_bytes(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        let (prefix, body) = bytes.split_first().ok_or(DecodeError::EmptyBytes)?;
        Ok(match *prefix {
            BYTES_PREFIX => DsonValue::Bytes(body.to_vec()),
            EUID_PREFIX => DsonValue::Euid(Euid::from_bytes(body)?),
            HASH_PREFIX => DsonValue::Hash(RadixHash::from_bytes(body)?),
            ADDRESS_PREFIX => DsonValue::Address(Address::from_bytes(body)?),
            UINT256_PREFIX => DsonValue::UInt256(UInt256::from_be_bytes(body)?),
            RRI_PREFIX => {
                let path = std::str::from_utf8(body)
                    .map_err(|e| DecodeError::invalid_field("rri", e))?;
                DsonValue::Rri(path.parse()?)
            }
            other => return Err(DecodeError::UnknownBytePrefix(other)),
        })
    }

    /// Prefix byte and payload of the semantic byte string forms.
    fn prefixed_bytes(&self) -> Option<Vec<u8>> {
        Some(match self {
            DsonValue::Bytes(bytes) => prefixed(BYTES_PREFIX, bytes),
            DsonValue::Euid(euid) => prefixed(EUID_PREFIX, euid.as_bytes()),
            DsonValue::Hash(hash) => prefixed(HASH_PREFIX, hash.as_bytes()),
            DsonValue::Address(address) => prefixed(ADDRESS_PREFIX, &address.to_bytes()),
            DsonValue::UInt256(value) => prefixed(UINT256_PREFIX, &value.to_be_bytes()),
            DsonValue::Rri(rri) => prefixed(RRI_PREFIX, rri.to_string().as_bytes()),
            _ => return None,
        })
    }
}

fn prefixed(prefix: u8, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(prefix);
    out.extend_from_slice(body);
    out
}

impl Encode for DsonValue {
    fn encode<W: enc::Write>(&self, writer: &mut W) -> Result<(), enc::Error<W::Error>> {
        match self {
            DsonValue::Bool(b) => b.encode(writer),
            DsonValue::Integer(i) => i.encode(writer),
            DsonValue::Text(s) => s.as_str().encode(writer),
            DsonValue::Array(items) => {
                enc::ArrayStartBounded(items.len()).encode(writer)?;
                for item in items {
                    item.encode(writer)?;
                }
                Ok(())
            }
            DsonValue::Map(map) => {
                // BTreeMap iteration is ascending byte order of the keys
                enc::MapStartUnbounded.encode(writer)?;
                for (key, value) in map {
                    key.as_str().encode(writer)?;
                    value.encode(writer)?;
                }
                enc::End.encode(writer)
            }
            semantic => match semantic.prefixed_bytes() {
                Some(bytes) => types::Bytes(bytes.as_slice()).encode(writer),
                None => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hex_of(value: &DsonValue) -> String {
        hex::encode(value.to_bytes().unwrap())
    }

    #[test]
    fn known_vectors() {
        let map = DsonValue::Map(BTreeMap::from([
            ("b".to_string(), DsonValue::Integer(2)),
            ("a".to_string(), DsonValue::Integer(1)),
        ]));
        assert_eq!(hex_of(&map), "bf616101616202ff");
        assert_eq!(hex_of(&DsonValue::from("Radix")), "655261646978");
        assert_eq!(hex_of(&DsonValue::Bool(true)), "f5");
        assert_eq!(hex_of(&DsonValue::Bool(false)), "f4");
    }

    #[test]
    fn integers_are_minimal() {
        assert_eq!(hex_of(&DsonValue::Integer(0)), "00");
        assert_eq!(hex_of(&DsonValue::Integer(23)), "17");
        assert_eq!(hex_of(&DsonValue::Integer(24)), "1818");
        assert_eq!(hex_of(&DsonValue::Integer(-1)), "20");
        assert_eq!(hex_of(&DsonValue::Integer(100)), "1864");
        assert_eq!(hex_of(&DsonValue::Integer(i64::MIN)), "3b7fffffffffffffff");
    }

    #[test]
    fn arrays_are_definite() {
        let array = DsonValue::Array(vec![DsonValue::Integer(1), DsonValue::Integer(2)]);
        assert_eq!(hex_of(&array), "820102");
    }

    #[test]
    fn byte_strings_carry_a_prefix() {
        assert_eq!(hex_of(&DsonValue::Bytes(vec![0xab])), "4201ab");
        let euid = Euid::from_bytes(&[0x11; 16]).unwrap();
        let encoded = DsonValue::Euid(euid).to_bytes().unwrap();
        assert_eq!(encoded[..2], [0x51, EUID_PREFIX]);
        assert_eq!(
            hex_of(&DsonValue::UInt256(UInt256::from(1u64))),
            format!("5821{:02x}{}01", UINT256_PREFIX, "00".repeat(31))
        );
    }

    #[test]
    fn decode_roundtrip() {
        let value = DsonValue::Map(BTreeMap::from([
            ("flag".to_string(), DsonValue::Bool(true)),
            ("n".to_string(), DsonValue::Integer(-5_000_000_000)),
            ("bytes".to_string(), DsonValue::Bytes(vec![1, 2, 3])),
            ("hash".to_string(), DsonValue::Hash(RadixHash::of(b"x"))),
            (
                "list".to_string(),
                DsonValue::Array(vec![DsonValue::from("a"), DsonValue::Map(BTreeMap::new())]),
            ),
        ]));
        let bytes = value.to_bytes().unwrap();
        assert_eq!(DsonValue::from_bytes(&bytes).unwrap(), value);
        assert_eq!(value.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn rejects_non_canonical_input() {
        // definite length map
        assert_eq!(
            DsonValue::from_bytes(&hex::decode("a2616101616202").unwrap()).unwrap_err(),
            DecodeError::NonCanonical
        );
        // keys out of order
        assert_eq!(
            DsonValue::from_bytes(&hex::decode("bf616202616101ff").unwrap()).unwrap_err(),
            DecodeError::NonCanonical
        );
        // non minimal integer
        assert_eq!(
            DsonValue::from_bytes(&hex::decode("1801").unwrap()).unwrap_err(),
            DecodeError::NonCanonical
        );
        // trailing bytes
        assert_eq!(
            DsonValue::from_bytes(&hex::decode("f5f5").unwrap()).unwrap_err(),
            DecodeError::NonCanonical
        );
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert_eq!(
            DsonValue::from_bytes(&hex::decode("4209ab").unwrap()).unwrap_err(),
            DecodeError::UnknownBytePrefix(0x09)
        );
        assert_eq!(
            DsonValue::from_bytes(&hex::decode("40").unwrap()).unwrap_err(),
            DecodeError::EmptyBytes
        );
        assert!(matches!(
            DsonValue::from_bytes(&hex::decode("f6").unwrap()).unwrap_err(),
            DecodeError::Unsupported(_)
        ));
        assert!(matches!(
            DsonValue::from_bytes(&[0xbf]).unwrap_err(),
            DecodeError::Cbor(_)
        ));
    }
}
