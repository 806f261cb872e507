// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::Particle;
use crate::encoding::{DecodeError, Dson, DsonField, DsonMap, DsonValue, FromDson, Output};

/// Whether a particle is produced or consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Spin {
    Up,
    Down,
}

impl Spin {
    pub fn value(self) -> i64 {
        match self {
            Spin::Up => 1,
            Spin::Down => -1,
        }
    }

    pub fn from_value(value: i64) -> Result<Self, DecodeError> {
        match value {
            1 => Ok(Spin::Up),
            -1 => Ok(Spin::Down),
            other => Err(DecodeError::invalid_field(
                "spin",
                format!("expected 1 or -1, got {other}"),
            )),
        }
    }

    pub fn invert(self) -> Self {
        match self {
            Spin::Up => Spin::Down,
            Spin::Down => Spin::Up,
        }
    }
}

impl From<Spin> for DsonValue {
    fn from(spin: Spin) -> Self {
        DsonValue::Integer(spin.value())
    }
}

/// A particle together with the direction it moves in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpunParticle {
    spin: Spin,
    particle: Particle,
}

impl SpunParticle {
    pub const SERIALIZER: &'static str = "radix.spun_particle";

    pub fn new(spin: Spin, particle: impl Into<Particle>) -> Self {
        Self {
            spin,
            particle: particle.into(),
        }
    }

    pub fn up(particle: impl Into<Particle>) -> Self {
        Self::new(Spin::Up, particle)
    }

    pub fn down(particle: impl Into<Particle>) -> Self {
        Self::new(Spin::Down, particle)
    }

    pub fn spin(&self) -> Spin {
        self.spin
    }

    pub fn particle(&self) -> &Particle {
        &self.particle
    }

    pub fn into_parts(self) -> (Spin, Particle) {
        (self.spin, self.particle)
    }

    /// The same particle moving the other way.
    pub fn inverted(&self) -> Self {
        Self {
            spin: self.spin.invert(),
            particle: self.particle.clone(),
        }
    }
}

impl Dson for SpunParticle {
    fn serializer(&self) -> Option<&'static str> {
        Some(Self::SERIALIZER)
    }

    fn dson_fields(&self, output: Output) -> Vec<DsonField> {
        vec![
            DsonField::new("particle", self.particle.to_dson_value(output)),
            DsonField::new("spin", self.spin),
        ]
    }
}

impl FromDson for SpunParticle {
    fn from_dson_value(value: DsonValue) -> Result<Self, DecodeError> {
        let mut map = DsonMap::expect(value, Self::SERIALIZER)?;
        Ok(Self {
            spin: Spin::from_value(map.integer("spin")?)?,
            particle: map.decode("particle")?,
        })
    }
}
