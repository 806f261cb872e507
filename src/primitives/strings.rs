// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Validated textual encodings of byte strings.

use super::ValidationError;
use base64::{Engine as _, prelude::BASE64_STANDARD};
use std::{fmt, str::FromStr};

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const BASE64_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn check_charset(s: &str, allowed: impl Fn(char) -> bool) -> Result<(), ValidationError> {
    match s.char_indices().find(|(_, c)| !allowed(*c)) {
        Some((index, character)) => Err(ValidationError::DisallowedCharacter { character, index }),
        None => Ok(()),
    }
}

/// Lower case hexadecimal text of even length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexString(String);

impl HexString {
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into().to_ascii_lowercase();
        check_charset(&s, |c| c.is_ascii_hexdigit())?;
        if s.len() % 2 != 0 {
            return Err(ValidationError::OutOfRange(format!(
                "hex string must have even length, got {}",
                s.len()
            )));
        }
        Ok(Self(s))
    }

    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        // Charset and length were validated on construction.
        hex::decode(&self.0).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Base-58 text using the Bitcoin alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Base58String(String);

impl Base58String {
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        if s.is_empty() {
            return Err(ValidationError::TooShort { min: 1, actual: 0 });
        }
        check_charset(&s, |c| BASE58_ALPHABET.contains(c))?;
        Ok(Self(s))
    }

    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        let mut encoded = multibase::encode(multibase::Base::Base58Btc, bytes);
        // drop the multibase code
        encoded.remove(0);
        Self(encoded)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        multibase::decode(format!("z{}", self.0))
            .map(|(_, bytes)| bytes)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Standard, padded base-64 text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Base64String(String);

impl Base64String {
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        let unpadded = s.trim_end_matches('=');
        check_charset(unpadded, |c| BASE64_ALPHABET.contains(c))?;
        if s.len() % 4 != 0 {
            return Err(ValidationError::OutOfRange(format!(
                "base64 string length must be a multiple of 4, got {}",
                s.len()
            )));
        }
        if s.len() - unpadded.len() > 2 {
            return Err(ValidationError::OutOfRange("too much padding".into()));
        }
        Ok(Self(s))
    }

    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self(BASE64_STANDARD.encode(bytes))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ValidationError> {
        BASE64_STANDARD
            .decode(&self.0)
            .map_err(|e| ValidationError::OutOfRange(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_text {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    )*};
}

impl_text!(HexString, Base58String, Base64String);

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn hex_rejects_bad_characters() {
        assert_eq!(
            HexString::new("0g").unwrap_err(),
            ValidationError::DisallowedCharacter {
                character: 'g',
                index: 1
            }
        );
        assert!(matches!(
            HexString::new("abc").unwrap_err(),
            ValidationError::OutOfRange(_)
        ));
        assert_eq!(HexString::new("DEADbeef").unwrap().as_str(), "deadbeef");
    }

    #[test]
    fn base58_rejects_ambiguous_characters() {
        // '0', 'O', 'I' and 'l' are not part of the alphabet
        for (s, character) in [("1O", 'O'), ("10", '0'), ("1I", 'I'), ("1l", 'l')] {
            assert_eq!(
                Base58String::new(s).unwrap_err(),
                ValidationError::DisallowedCharacter {
                    character,
                    index: 1
                }
            );
        }
    }

    #[test]
    fn base64_checks_padding() {
        assert!(Base64String::new("aGVsbG8=").is_ok());
        assert!(Base64String::new("aGVsbG8").is_err());
        assert!(Base64String::new("a===").is_err());
        assert!(matches!(
            Base64String::new("aGV$bG8=").unwrap_err(),
            ValidationError::DisallowedCharacter { character: '$', .. }
        ));
    }

    #[quickcheck]
    fn bytes_survive_text_forms(bytes: Vec<u8>) {
        assert_eq!(HexString::from_bytes(&bytes).to_bytes(), bytes);
        assert_eq!(Base64String::from_bytes(&bytes).to_bytes().unwrap(), bytes);
        if !bytes.is_empty() {
            let b58 = Base58String::from_bytes(&bytes);
            assert_eq!(Base58String::new(b58.as_str()).unwrap().to_bytes(), bytes);
        }
    }
}
