// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! DSON, the canonical binary encoding every identifier and signature is
//! computed over.
//!
//! An encodable entity lists its fields with a [`Visibility`]. The
//! [`Output`] mode picks which of them make it into a given encoding, so the
//! same entity yields a stable hash (`Output::Hash`) as well as a complete
//! wire form (`Output::Wire`).

mod errors;
mod hash;
mod value;

pub use self::errors::{DecodeError, EncodeError};
pub use self::hash::{Euid, RadixHash, sha256d};
pub use self::value::*;

use crate::address::Address;
use crate::primitives::UInt256;
use crate::rri::ResourceIdentifier;
use std::collections::BTreeMap;

/// Value of the `version` field injected next to every serializer.
pub const DSON_VERSION: i64 = 100;
pub const SERIALIZER_KEY: &str = "serializer";
pub const VERSION_KEY: &str = "version";

/// Purpose of an encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Output {
    /// Input of [`RadixHash`]; everything signatures must not depend on is left out.
    Hash,
    /// Responses of the node API.
    Api,
    /// What is submitted to and received from nodes.
    Wire,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Always,
    /// Every output except [`Output::Hash`].
    NotHash,
    /// Only [`Output::Api`] and [`Output::All`].
    ApiOnly,
}

impl Visibility {
    pub fn includes(self, output: Output) -> bool {
        match self {
            Visibility::Always => true,
            Visibility::NotHash => output != Output::Hash,
            Visibility::ApiOnly => matches!(output, Output::Api | Output::All),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsonField {
    pub key: &'static str,
    pub value: DsonValue,
    pub visibility: Visibility,
}

impl DsonField {
    pub fn new(key: &'static str, value: impl Into<DsonValue>) -> Self {
        Self {
            key,
            value: value.into(),
            visibility: Visibility::Always,
        }
    }

    pub fn not_hash(key: &'static str, value: impl Into<DsonValue>) -> Self {
        Self {
            visibility: Visibility::NotHash,
            ..Self::new(key, value)
        }
    }

    pub fn api_only(key: &'static str, value: impl Into<DsonValue>) -> Self {
        Self {
            visibility: Visibility::ApiOnly,
            ..Self::new(key, value)
        }
    }
}

/// An entity with a canonical encoding.
pub trait Dson {
    /// Discriminant written to the `serializer` field, if the entity has one.
    fn serializer(&self) -> Option<&'static str> {
        None
    }

    /// Fields in any order; nested entities are encoded with the same `output`.
    fn dson_fields(&self, output: Output) -> Vec<DsonField>;

    /// Fields computed from the entity's own encoding. Only a root entity
    /// carries them, so nested values leave them out.
    fn derived_fields(&self, _output: Output) -> Result<Vec<DsonField>, EncodeError> {
        Ok(Vec::new())
    }

    /// The entity as nested inside another one.
    fn to_dson_value(&self, output: Output) -> DsonValue {
        entity_value(self.serializer(), self.dson_fields(output), output)
    }

    /// The entity as the root of an encoding, including derived fields.
    fn to_root_value(&self, output: Output) -> Result<DsonValue, EncodeError> {
        let mut fields = self.dson_fields(output);
        fields.extend(self.derived_fields(output)?);
        Ok(entity_value(self.serializer(), fields, output))
    }

    fn to_dson(&self, output: Output) -> Result<Vec<u8>, EncodeError> {
        self.to_root_value(output)?.to_bytes()
    }

    /// Double SHA-256 of the hash output.
    fn radix_hash(&self) -> Result<RadixHash, EncodeError> {
        Ok(RadixHash::of(&self.to_dson(Output::Hash)?))
    }

    fn euid(&self) -> Result<Euid, EncodeError> {
        Ok(self.radix_hash()?.euid())
    }

    fn to_wire_json(&self, output: Output) -> Result<serde_json::Value, EncodeError> {
        Ok(crate::wire_json::to_json(&self.to_root_value(output)?))
    }
}

fn entity_value(serializer: Option<&'static str>, fields: Vec<DsonField>, output: Output) -> DsonValue {
    let mut map: BTreeMap<String, DsonValue> = fields
        .into_iter()
        .filter(|field| field.visibility.includes(output))
        .map(|field| (field.key.to_string(), field.value))
        .collect();
    if let Some(serializer) = serializer {
        map.insert(SERIALIZER_KEY.into(), serializer.into());
        map.insert(VERSION_KEY.into(), DsonValue::Integer(DSON_VERSION));
    }
    DsonValue::Map(map)
}

/// The decoding half of [`Dson`].
pub trait FromDson: Sized {
    fn from_dson_value(value: DsonValue) -> Result<Self, DecodeError>;

    fn from_dson(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_dson_value(DsonValue::from_bytes(bytes)?)
    }

    fn from_wire_json(json: &serde_json::Value) -> Result<Self, DecodeError> {
        Self::from_dson_value(crate::wire_json::from_json(json)?)
    }
}

/// Reads the discriminant of an encoded entity without consuming it.
pub fn serializer_of(value: &DsonValue) -> Result<&str, DecodeError> {
    let DsonValue::Map(map) = value else {
        return Err(mismatch("<root>", "map", value));
    };
    match map.get(SERIALIZER_KEY) {
        Some(DsonValue::Text(serializer)) => Ok(serializer),
        Some(other) => Err(mismatch(SERIALIZER_KEY, "text", other)),
        None => Err(DecodeError::MissingField(SERIALIZER_KEY.into())),
    }
}

fn mismatch(field: &str, expected: &'static str, actual: &DsonValue) -> DecodeError {
    DecodeError::TypeMismatch {
        field: field.to_string(),
        expected,
        actual: actual.kind(),
    }
}

/// Fields of a decoded entity, taken out one by one. Fields nobody asks for
/// (computed or API-only ones) are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsonMap {
    entries: BTreeMap<String, DsonValue>,
}

macro_rules! typed_getter {
    ($name:ident, $variant:ident, $ty:ty, $expected:literal) => {
        pub fn $name(&mut self, key: &str) -> Result<$ty, DecodeError> {
            match self.take(key)? {
                DsonValue::$variant(value) => Ok(value),
                other => Err(mismatch(key, $expected, &other)),
            }
        }
    };
}

impl DsonMap {
    pub fn open(value: DsonValue) -> Result<Self, DecodeError> {
        match value {
            DsonValue::Map(entries) => Ok(Self { entries }),
            other => Err(mismatch("<root>", "map", &other)),
        }
    }

    /// Opens the map of an entity, checking its serializer and version.
    pub fn expect(value: DsonValue, serializer: &'static str) -> Result<Self, DecodeError> {
        let actual = serializer_of(&value)?;
        if actual != serializer {
            return Err(DecodeError::SerializerMismatch {
                expected: serializer,
                actual: actual.to_string(),
            });
        }
        let mut map = Self::open(value)?;
        map.entries.remove(SERIALIZER_KEY);
        let version = map.integer(VERSION_KEY)?;
        if version != DSON_VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }
        Ok(map)
    }

    pub fn take(&mut self, key: &str) -> Result<DsonValue, DecodeError> {
        self.entries
            .remove(key)
            .ok_or_else(|| DecodeError::MissingField(key.to_string()))
    }

    pub fn take_opt(&mut self, key: &str) -> Option<DsonValue> {
        self.entries.remove(key)
    }

    /// Fields not taken yet.
    pub fn into_entries(self) -> BTreeMap<String, DsonValue> {
        self.entries
    }

    typed_getter!(boolean, Bool, bool, "bool");
    typed_getter!(integer, Integer, i64, "integer");
    typed_getter!(text, Text, String, "text");
    typed_getter!(bytes, Bytes, Vec<u8>, "bytes");
    typed_getter!(euid, Euid, Euid, "euid");
    typed_getter!(hash, Hash, RadixHash, "hash");
    typed_getter!(address, Address, Address, "address");
    typed_getter!(uint256, UInt256, UInt256, "uint256");
    typed_getter!(rri, Rri, ResourceIdentifier, "rri");
    typed_getter!(array, Array, Vec<DsonValue>, "array");
    typed_getter!(map, Map, BTreeMap<String, DsonValue>, "map");

    /// Text field that may be absent.
    pub fn text_opt(&mut self, key: &str) -> Result<Option<String>, DecodeError> {
        match self.take_opt(key) {
            None => Ok(None),
            Some(DsonValue::Text(text)) => Ok(Some(text)),
            Some(other) => Err(mismatch(key, "text", &other)),
        }
    }

    /// A `String -> String` map such as atom metadata.
    pub fn string_map(&mut self, key: &str) -> Result<BTreeMap<String, String>, DecodeError> {
        self.map(key)?
            .into_iter()
            .map(|(k, v)| match v {
                DsonValue::Text(text) => Ok((k, text)),
                other => Err(mismatch(key, "text", &other)),
            })
            .collect()
    }

    /// A nested entity.
    pub fn decode<T: FromDson>(&mut self, key: &str) -> Result<T, DecodeError> {
        T::from_dson_value(self.take(key)?)
    }

    /// An array of nested entities, order preserved.
    pub fn decode_array<T: FromDson>(&mut self, key: &str) -> Result<Vec<T>, DecodeError> {
        self.array(key)?.into_iter().map(T::from_dson_value).collect()
    }
}

/// Encodes a `String -> String` map.
pub fn string_map_value(map: &BTreeMap<String, String>) -> DsonValue {
    DsonValue::Map(
        map.iter()
            .map(|(k, v)| (k.clone(), DsonValue::Text(v.clone())))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Plain;

    impl Dson for Plain {
        fn dson_fields(&self, _: Output) -> Vec<DsonField> {
            vec![
                DsonField::new("always", 1i64),
                DsonField::not_hash("notHash", 2i64),
                DsonField::api_only("apiOnly", 3i64),
            ]
        }
    }

    struct Tagged;

    impl Dson for Tagged {
        fn serializer(&self) -> Option<&'static str> {
            Some("test.tagged")
        }

        fn dson_fields(&self, _: Output) -> Vec<DsonField> {
            vec![DsonField::new("x", true)]
        }
    }

    fn keys(value: DsonValue) -> Vec<String> {
        let DsonValue::Map(map) = value else {
            panic!("not a map")
        };
        map.into_keys().collect()
    }

    #[test]
    fn visibility_per_output() {
        assert_eq!(keys(Plain.to_dson_value(Output::Hash)), ["always"]);
        assert_eq!(keys(Plain.to_dson_value(Output::Wire)), ["always", "notHash"]);
        assert_eq!(
            keys(Plain.to_dson_value(Output::Api)),
            ["always", "apiOnly", "notHash"]
        );
        assert_eq!(
            keys(Plain.to_dson_value(Output::All)),
            ["always", "apiOnly", "notHash"]
        );
    }

    #[test]
    fn serializer_and_version_are_injected() {
        let value = Tagged.to_dson_value(Output::Hash);
        assert_eq!(serializer_of(&value).unwrap(), "test.tagged");
        let mut map = DsonMap::expect(value.clone(), "test.tagged").unwrap();
        assert!(map.boolean("x").unwrap());
        assert_eq!(
            DsonMap::expect(value, "test.other").unwrap_err(),
            DecodeError::SerializerMismatch {
                expected: "test.other",
                actual: "test.tagged".into()
            }
        );
    }

    #[test]
    fn unsupported_version() {
        let DsonValue::Map(mut map) = Tagged.to_dson_value(Output::Hash) else {
            panic!("not a map")
        };
        map.insert(VERSION_KEY.into(), DsonValue::Integer(99));
        assert_eq!(
            DsonMap::expect(DsonValue::Map(map), "test.tagged").unwrap_err(),
            DecodeError::UnsupportedVersion(99)
        );
    }

    #[test]
    fn getters_report_missing_and_mistyped_fields() {
        let mut map = DsonMap::open(Plain.to_dson_value(Output::All)).unwrap();
        assert_eq!(
            map.text("always").unwrap_err(),
            DecodeError::TypeMismatch {
                field: "always".into(),
                expected: "text",
                actual: "integer"
            }
        );
        assert_eq!(
            map.integer("always").unwrap_err(),
            DecodeError::MissingField("always".into())
        );
        assert_eq!(map.integer("notHash").unwrap(), 2);
    }

    #[test]
    fn hash_is_stable() {
        let first = Tagged.radix_hash().unwrap();
        let second = RadixHash::of(&Tagged.to_dson(Output::Hash).unwrap());
        assert_eq!(first, second);
        assert_eq!(Tagged.euid().unwrap(), first.euid());
    }
}
