// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::SpunParticle;
use crate::encoding::{
    DecodeError, Dson, DsonField, DsonMap, DsonValue, FromDson, Output, string_map_value,
};
use std::collections::BTreeMap;

/// Spun particles that are only valid together, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParticleGroup {
    particles: Vec<SpunParticle>,
    meta_data: BTreeMap<String, String>,
}

impl ParticleGroup {
    pub const SERIALIZER: &'static str = "radix.particle_group";

    pub fn new(particles: Vec<SpunParticle>, meta_data: BTreeMap<String, String>) -> Self {
        Self {
            particles,
            meta_data,
        }
    }

    pub fn of(particles: impl IntoIterator<Item = SpunParticle>) -> Self {
        Self::new(particles.into_iter().collect(), BTreeMap::new())
    }

    pub fn particles(&self) -> &[SpunParticle] {
        &self.particles
    }

    pub fn meta_data(&self) -> &BTreeMap<String, String> {
        &self.meta_data
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

impl Dson for ParticleGroup {
    fn serializer(&self) -> Option<&'static str> {
        Some(Self::SERIALIZER)
    }

    fn dson_fields(&self, output: Output) -> Vec<DsonField> {
        vec![
            DsonField::new(
                "particles",
                DsonValue::Array(
                    self.particles
                        .iter()
                        .map(|spun| spun.to_dson_value(output))
                        .collect(),
                ),
            ),
            DsonField::new("metaData", string_map_value(&self.meta_data)),
        ]
    }
}

impl FromDson for ParticleGroup {
    fn from_dson_value(value: DsonValue) -> Result<Self, DecodeError> {
        let mut map = DsonMap::expect(value, Self::SERIALIZER)?;
        Ok(Self {
            particles: map.decode_array("particles")?,
            meta_data: map.string_map("metaData")?,
        })
    }
}
