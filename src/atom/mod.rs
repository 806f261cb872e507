// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod errors;
mod signed_atom;

pub use self::errors::AtomError;
pub use self::signed_atom::SignedAtom;

use crate::address::Address;
use crate::crypto::Signature;
use crate::encoding::{
    DecodeError, Dson, DsonField, DsonMap, DsonValue, EncodeError, Euid, FromDson, Output,
    RadixHash, Visibility, string_map_value,
};
use crate::particles::{ParticleGroup, Spin, SpunParticle};
use itertools::Itertools as _;
use std::collections::BTreeMap;

pub const TIMESTAMP_KEY: &str = "timestamp";

/// An atomic ledger transaction: particle groups that are applied all
/// together or not at all.
///
/// The identity of an atom is the hash of its [`Output::Hash`] encoding,
/// which leaves out signatures and the proof of work nonce. Signing and
/// stamping therefore never change what is being signed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Atom {
    particle_groups: Vec<ParticleGroup>,
    meta_data: BTreeMap<String, String>,
    signatures: BTreeMap<Euid, Signature>,
    pow_nonce: Option<i64>,
}

impl Atom {
    pub const SERIALIZER: &'static str = "radix.atom";

    pub fn new(particle_groups: Vec<ParticleGroup>, meta_data: BTreeMap<String, String>) -> Self {
        Self {
            particle_groups,
            meta_data,
            ..Default::default()
        }
    }

    /// An atom created at `timestamp`, in milliseconds since the Unix epoch.
    pub fn with_timestamp(particle_groups: Vec<ParticleGroup>, timestamp: i64) -> Self {
        Self::new(
            particle_groups,
            BTreeMap::from([(TIMESTAMP_KEY.to_string(), timestamp.to_string())]),
        )
    }

    /// An atom stamped with the current wall clock time.
    pub fn now(particle_groups: Vec<ParticleGroup>) -> Self {
        Self::with_timestamp(particle_groups, chrono::Utc::now().timestamp_millis())
    }

    pub fn particle_groups(&self) -> &[ParticleGroup] {
        &self.particle_groups
    }

    pub fn meta_data(&self) -> &BTreeMap<String, String> {
        &self.meta_data
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.meta_data.get(TIMESTAMP_KEY)?.parse().ok()
    }

    pub fn signatures(&self) -> &BTreeMap<Euid, Signature> {
        &self.signatures
    }

    pub fn pow_nonce(&self) -> Option<i64> {
        self.pow_nonce
    }

    pub fn with_pow_nonce(mut self, nonce: i64) -> Self {
        self.pow_nonce = Some(nonce);
        self
    }

    pub(crate) fn insert_signature(&mut self, signer: Euid, signature: Signature) {
        self.signatures.insert(signer, signature);
    }

    /// Every spun particle in group order.
    pub fn spun_particles(&self) -> impl Iterator<Item = &SpunParticle> {
        self.particle_groups
            .iter()
            .flat_map(|group| group.particles())
    }

    pub fn particles(&self, spin: Spin) -> impl Iterator<Item = &SpunParticle> {
        self.spun_particles()
            .filter(move |spun| spun.spin() == spin)
    }

    /// Addresses touched by any particle, without duplicates.
    pub fn addresses(&self) -> Vec<Address> {
        self.spun_particles()
            .flat_map(|spun| spun.particle().addresses())
            .sorted()
            .dedup()
            .collect()
    }

    pub fn hash(&self) -> Result<RadixHash, EncodeError> {
        self.radix_hash()
    }

    /// Identifier nodes index the atom by.
    pub fn hid(&self) -> Result<Euid, EncodeError> {
        self.euid()
    }

    /// Size of the wire encoding, failing with [`AtomError::TooLarge`] above `max`.
    pub fn check_size(&self, max: usize) -> Result<usize, AtomError> {
        let actual = self.to_dson(Output::Wire)?.len();
        if actual > max {
            return Err(AtomError::TooLarge { max, actual });
        }
        Ok(actual)
    }
}

impl Dson for Atom {
    fn serializer(&self) -> Option<&'static str> {
        Some(Self::SERIALIZER)
    }

    fn dson_fields(&self, output: Output) -> Vec<DsonField> {
        let mut fields = vec![
            DsonField::new(
                "particleGroups",
                DsonValue::Array(
                    self.particle_groups
                        .iter()
                        .map(|group| group.to_dson_value(output))
                        .collect(),
                ),
            ),
            DsonField::new("metaData", string_map_value(&self.meta_data)),
            DsonField::not_hash(
                "signatures",
                DsonValue::Map(
                    self.signatures
                        .iter()
                        .map(|(signer, signature)| {
                            (signer.to_string(), signature.to_dson_value(output))
                        })
                        .collect(),
                ),
            ),
        ];
        if let Some(nonce) = self.pow_nonce {
            fields.push(DsonField::not_hash("powNonce", nonce));
        }
        fields
    }

    fn derived_fields(&self, output: Output) -> Result<Vec<DsonField>, EncodeError> {
        // the hash output is the input of hid, never the other way around
        if !Visibility::ApiOnly.includes(output) {
            return Ok(Vec::new());
        }
        Ok(vec![DsonField::api_only("hid", self.hid()?)])
    }
}

impl FromDson for Atom {
    fn from_dson_value(value: DsonValue) -> Result<Self, DecodeError> {
        let mut map = DsonMap::expect(value, Self::SERIALIZER)?;
        let signatures = match map.take_opt("signatures") {
            None => BTreeMap::new(),
            Some(value) => DsonMap::open(value)?
                .into_entries()
                .into_iter()
                .map(|(signer, signature)| {
                    let signer: Euid = signer
                        .parse()
                        .map_err(|e| DecodeError::invalid_field("signatures", e))?;
                    Ok((signer, Signature::from_dson_value(signature)?))
                })
                .collect::<Result<_, DecodeError>>()?,
        };
        let pow_nonce = match map.take_opt("powNonce") {
            None => None,
            Some(DsonValue::Integer(nonce)) => Some(nonce),
            Some(other) => {
                return Err(DecodeError::TypeMismatch {
                    field: "powNonce".into(),
                    expected: "integer",
                    actual: other.kind(),
                });
            }
        };
        Ok(Self {
            particle_groups: map.decode_array("particleGroups")?,
            meta_data: map.string_map("metaData")?,
            signatures,
            pow_nonce,
        })
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Atom {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let len = usize::arbitrary(g) % 3;
        let groups = (0..len).map(|_| ParticleGroup::arbitrary(g)).collect();
        let mut atom = Self::with_timestamp(groups, i64::arbitrary(g));
        if bool::arbitrary(g) {
            atom.pow_nonce = Some(i64::arbitrary(g));
        }
        if bool::arbitrary(g) {
            atom.insert_signature(Euid::arbitrary(g), Signature::arbitrary(g));
        }
        atom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks::DEFAULT_MAX_ATOM_SIZE;
    use crate::particles::{RriParticle, token_rri};
    use crate::primitives::Nonce;
    use crate::wire_json::snapshot_address;
    use quickcheck::Arbitrary as _;

    fn rri_group(n: i64) -> ParticleGroup {
        ParticleGroup::of([SpunParticle::up(RriParticle::new(
            token_rri(snapshot_address(), "XRD").unwrap(),
            Nonce::new(n),
        ))])
    }

    #[test]
    fn signatures_and_nonce_stay_out_of_the_hash() {
        let atom = Atom::with_timestamp(vec![rri_group(1)], 1_551_000_000_000);
        let hash = atom.hash().unwrap();

        let mut touched = atom.clone().with_pow_nonce(12345);
        touched.insert_signature(
            Euid::from_bytes(&[1; 16]).unwrap(),
            Signature::new(vec![1], vec![2]),
        );
        assert_eq!(touched.hash().unwrap(), hash);
        assert_ne!(
            touched.to_dson(Output::Wire).unwrap(),
            atom.to_dson(Output::Wire).unwrap()
        );
    }

    #[test]
    fn hid_is_api_only() {
        let atom = Atom::with_timestamp(vec![rri_group(1)], 0);
        let hid = DsonValue::Euid(atom.hid().unwrap());
        let field = |output| {
            let DsonValue::Map(map) = atom.to_root_value(output).unwrap() else {
                panic!("not a map")
            };
            map.get("hid").cloned()
        };
        assert_eq!(field(Output::Api), Some(hid.clone()));
        assert_eq!(field(Output::All), Some(hid));
        assert_eq!(field(Output::Wire), None);
        assert_eq!(field(Output::Hash), None);
        // derived only at the root, and in every API encoding
        let DsonValue::Map(nested) = atom.to_dson_value(Output::Api) else {
            panic!("not a map")
        };
        assert!(!nested.contains_key("hid"));
        let json = atom.to_wire_json(Output::Api).unwrap();
        assert_eq!(json["hid"], format!(":uid:{}", atom.hid().unwrap()));
    }

    #[test]
    fn timestamp_is_metadata() {
        let atom = Atom::with_timestamp(vec![], 42);
        assert_eq!(atom.meta_data()["timestamp"], "42");
        assert_eq!(atom.timestamp(), Some(42));
        assert!(Atom::now(vec![]).timestamp().is_some());
    }

    #[test]
    fn size_limit_is_checked_at_submission() {
        let groups = (0..1000).map(rri_group).collect();
        let atom = Atom::with_timestamp(groups, 0);
        let err = atom.check_size(DEFAULT_MAX_ATOM_SIZE).unwrap_err();
        let AtomError::TooLarge { max, actual } = err else {
            panic!("unexpected error {err}")
        };
        assert_eq!(max, DEFAULT_MAX_ATOM_SIZE);
        assert!(actual > max);
        assert_eq!(actual, atom.to_dson(Output::Wire).unwrap().len());

        let small = Atom::with_timestamp(vec![rri_group(0)], 0);
        assert!(small.check_size(DEFAULT_MAX_ATOM_SIZE).unwrap() < DEFAULT_MAX_ATOM_SIZE);
    }

    #[test]
    fn spun_particles_in_group_order() {
        let mut second = rri_group(2).particles().to_vec();
        second.push(second[0].inverted());
        let atom = Atom::with_timestamp(vec![rri_group(1), ParticleGroup::of(second)], 0);
        assert_eq!(atom.spun_particles().count(), 3);
        assert_eq!(atom.particles(Spin::Down).count(), 1);
        assert_eq!(atom.addresses(), vec![snapshot_address()]);
    }

    #[test]
    fn decode_rejects_mistyped_pow_nonce() {
        let atom = Atom::arbitrary(&mut quickcheck::Gen::new(4));
        let DsonValue::Map(mut map) = atom.to_dson_value(Output::Wire) else {
            panic!("not a map")
        };
        map.insert("powNonce".into(), DsonValue::from("seven"));
        assert!(matches!(
            Atom::from_dson_value(DsonValue::Map(map)).unwrap_err(),
            DecodeError::TypeMismatch { .. }
        ));
    }
}
