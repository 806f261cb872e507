// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::ValidationError;
use num_bigint::BigUint;
use num_traits::{One as _, Zero as _};
use std::{fmt, marker::PhantomData, str::FromStr, sync::LazyLock};

static UINT256_MAX: LazyLock<BigUint> = LazyLock::new(|| (BigUint::one() << 256u32) - 1u32);

/// Unsigned integer in `[0, 2^256)`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UInt256(BigUint);

impl UInt256 {
    pub const BYTES: usize = 32;

    pub fn new(value: BigUint) -> Result<Self, ValidationError> {
        if value > *UINT256_MAX {
            return Err(ValidationError::OutOfRange(format!(
                "{value} does not fit in 256 bits"
            )));
        }
        Ok(Self(value))
    }

    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn max_value() -> Self {
        Self(UINT256_MAX.clone())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_big_uint(&self) -> &BigUint {
        &self.0
    }

    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        if bytes.len() != Self::BYTES {
            return Err(ValidationError::OutOfRange(format!(
                "256-bit integers are {} bytes, got {}",
                Self::BYTES,
                bytes.len()
            )));
        }
        Ok(Self(BigUint::from_bytes_be(bytes)))
    }

    /// Fixed width, big endian, zero padded.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let digits = self.0.to_bytes_be();
        let mut out = [0u8; Self::BYTES];
        // at most 32 digits by construction
        out[Self::BYTES - digits.len()..].copy_from_slice(&digits);
        out
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self, ValidationError> {
        Self::new(&self.0 + &other.0).map_err(|_| ValidationError::Overflow)
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self, ValidationError> {
        if other.0 > self.0 {
            return Err(ValidationError::Underflow);
        }
        Ok(Self(&self.0 - &other.0))
    }

    pub fn checked_mul(&self, other: &Self) -> Result<Self, ValidationError> {
        Self::new(&self.0 * &other.0).map_err(|_| ValidationError::Overflow)
    }

    pub fn is_multiple_of(&self, other: &Self) -> bool {
        !other.is_zero() && (&self.0 % &other.0).is_zero()
    }
}

impl From<u64> for UInt256 {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl FromStr for UInt256 {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((index, character)) = s.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
            return Err(ValidationError::DisallowedCharacter { character, index });
        }
        let value = BigUint::from_str(s).map_err(|e| ValidationError::OutOfRange(e.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A numeric constraint checked whenever an [`Amount`] is created.
pub trait AmountBound {
    const DESCRIPTION: &'static str;
    fn holds(value: &UInt256) -> bool;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Positive;

impl AmountBound for Positive {
    const DESCRIPTION: &'static str = "positive";
    fn holds(value: &UInt256) -> bool {
        !value.is_zero()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonNegative;

impl AmountBound for NonNegative {
    const DESCRIPTION: &'static str = "non-negative";
    fn holds(_: &UInt256) -> bool {
        true
    }
}

/// A 256-bit amount whose bound `B` holds at construction and after every operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount<B> {
    value: UInt256,
    bound: PhantomData<B>,
}

pub type PositiveAmount = Amount<Positive>;
pub type NonNegativeAmount = Amount<NonNegative>;

impl<B: AmountBound> Amount<B> {
    pub fn new(value: UInt256) -> Result<Self, ValidationError> {
        if !B::holds(&value) {
            return Err(ValidationError::OutOfRange(format!(
                "amount {value} must be {}",
                B::DESCRIPTION
            )));
        }
        Ok(Self {
            value,
            bound: PhantomData,
        })
    }

    pub fn from_u64(value: u64) -> Result<Self, ValidationError> {
        Self::new(value.into())
    }

    pub fn value(&self) -> &UInt256 {
        &self.value
    }

    pub fn into_value(self) -> UInt256 {
        self.value
    }

    pub fn checked_add(&self, other: &UInt256) -> Result<Self, ValidationError> {
        Self::new(self.value.checked_add(other)?)
    }

    pub fn checked_sub(&self, other: &UInt256) -> Result<Self, ValidationError> {
        Self::new(self.value.checked_sub(other)?)
    }

    /// Re-checks the amount under another bound.
    pub fn rebound<C: AmountBound>(&self) -> Result<Amount<C>, ValidationError> {
        Amount::new(self.value.clone())
    }
}

impl NonNegativeAmount {
    pub fn zero() -> Self {
        Self {
            value: UInt256::zero(),
            bound: PhantomData,
        }
    }
}

impl<B> fmt::Display for Amount<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<B: AmountBound> FromStr for Amount<B> {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.parse()?)
    }
}

/// Minimum divisible unit of a token. Amounts of that token must be exact multiples.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub struct Granularity(PositiveAmount);

impl Granularity {
    pub fn new(value: UInt256) -> Result<Self, ValidationError> {
        Ok(Self(PositiveAmount::new(value)?))
    }

    pub fn one() -> Self {
        Self(Amount {
            value: 1u64.into(),
            bound: PhantomData,
        })
    }

    pub fn value(&self) -> &UInt256 {
        self.0.value()
    }

    pub fn check(&self, amount: &UInt256) -> Result<(), ValidationError> {
        if amount.is_multiple_of(self.value()) {
            Ok(())
        } else {
            Err(ValidationError::Granularity {
                amount: amount.to_string(),
                granularity: self.to_string(),
            })
        }
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Self::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn bounds_are_checked_on_construction() {
        assert!(PositiveAmount::from_u64(0).is_err());
        assert!(PositiveAmount::from_u64(1).is_ok());
        assert!(NonNegativeAmount::from_u64(0).is_ok());
    }

    #[test]
    fn arithmetic_never_wraps() {
        let max = NonNegativeAmount::new(UInt256::max_value()).unwrap();
        assert_eq!(
            max.checked_add(&1u64.into()).unwrap_err(),
            ValidationError::Overflow
        );
        let one = PositiveAmount::from_u64(1).unwrap();
        assert_eq!(
            one.checked_sub(&2u64.into()).unwrap_err(),
            ValidationError::Underflow
        );
        // 1 - 1 is representable but breaks the positive bound
        assert!(matches!(
            one.checked_sub(&1u64.into()).unwrap_err(),
            ValidationError::OutOfRange(_)
        ));
    }

    #[test]
    fn granularity_rejects_non_multiples() {
        let granularity = Granularity::new(10u64.into()).unwrap();
        assert!(granularity.check(&30u64.into()).is_ok());
        assert_eq!(
            granularity.check(&35u64.into()).unwrap_err(),
            ValidationError::Granularity {
                amount: "35".into(),
                granularity: "10".into()
            }
        );
        assert!(Granularity::new(UInt256::zero()).is_err());
    }

    #[test]
    fn parse_rejects_non_digits() {
        assert_eq!(
            "12a".parse::<UInt256>().unwrap_err(),
            ValidationError::DisallowedCharacter {
                character: 'a',
                index: 2
            }
        );
        let too_big = format!("{}0", UInt256::max_value());
        assert!(matches!(
            too_big.parse::<UInt256>().unwrap_err(),
            ValidationError::OutOfRange(_)
        ));
    }

    #[quickcheck]
    fn be_bytes_roundtrip(a: u64, b: u64) {
        let value = UInt256::from(a).checked_mul(&UInt256::from(b)).unwrap();
        let bytes = value.to_be_bytes();
        assert_eq!(UInt256::from_be_bytes(&bytes).unwrap(), value);
    }

    #[test]
    fn max_value_is_all_ones() {
        assert_eq!(UInt256::max_value().to_be_bytes(), [0xff; 32]);
        assert_eq!(UInt256::zero().to_be_bytes(), [0; 32]);
    }
}
