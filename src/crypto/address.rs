//! Address Codec
//!
//! Ethereum-style 20-byte addresses derived from secp256k1 public keys.
//! The text form is always lowercase hex with a `0x` prefix; parsing accepts
//! any letter case and an optional prefix.

use std::fmt;
use std::str::FromStr;

use secp256k1::PublicKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::hasher::keccak256;
use crate::error::{CryptoError, CryptoResult};

/// Length of an address in bytes
pub const ADDRESS_LENGTH: usize = 20;

/// A 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; ADDRESS_LENGTH] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Derive the address of a secp256k1 public key
    ///
    /// keccak256 over the 64 coordinate bytes, keeping the last 20 bytes.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let uncompressed = public_key.serialize_uncompressed();
        let hash = keccak256(&uncompressed[1..]);

        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(&hash[12..]);
        Self(address)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Lowercase hex with `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 mixed-case checksum encoding
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut result = String::with_capacity(2 + lower.len());
        result.push_str("0x");
        for (i, ch) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

            if ch.is_ascii_alphabetic() && nibble >= 8 {
                result.push(ch.to_ascii_uppercase());
            } else {
                result.push(ch);
            }
        }

        result
    }
}

impl FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if body.len() != ADDRESS_LENGTH * 2 {
            return Err(CryptoError::InvalidAddress(format!(
                "expected {} hex characters, got {}",
                ADDRESS_LENGTH * 2,
                body.len()
            )));
        }

        let bytes = hex::decode(body).map_err(|e| CryptoError::InvalidAddress(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Compare two address strings ignoring letter case and the `0x` prefix
///
/// Never fails: input that is not a 20-byte hex address compares unequal.
pub fn equal_addresses(a: &str, b: &str) -> bool {
    match (a.parse::<Address>(), b.parse::<Address>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Derive an address from a serialized public key
///
/// Accepts compressed (33 bytes) or uncompressed (65 bytes) encodings.
pub fn public_key_to_address(public_key: &[u8]) -> CryptoResult<Address> {
    match public_key.len() {
        33 | 65 => {}
        len => {
            return Err(CryptoError::InvalidPublicKey(format!(
                "expected 33 or 65 bytes, got {}",
                len
            )))
        }
    }

    let public_key = PublicKey::from_slice(public_key)
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
    Ok(Address::from_public_key(&public_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::{Secp256k1, SecretKey};

    fn key_one_public() -> PublicKey {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        let secret = SecretKey::from_slice(&bytes).unwrap();
        PublicKey::from_secret_key(&Secp256k1::new(), &secret)
    }

    #[test]
    fn test_address_of_generator_point() {
        let address = Address::from_public_key(&key_one_public());
        assert_eq!(address.to_hex(), "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
    }

    #[test]
    fn test_compressed_and_uncompressed_agree() {
        let public = key_one_public();
        let from_compressed = public_key_to_address(&public.serialize()).unwrap();
        let from_uncompressed = public_key_to_address(&public.serialize_uncompressed()).unwrap();
        assert_eq!(from_compressed, from_uncompressed);
    }

    #[test]
    fn test_public_key_bad_length() {
        let err = public_key_to_address(&[4u8; 64]).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidPublicKey(_)));
    }

    #[test]
    fn test_parse_is_case_and_prefix_insensitive() {
        let lower: Address = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf".parse().unwrap();
        let upper: Address = "0X7E5F4552091A69125D5DFCB7B8C2659029395BDF".parse().unwrap();
        let bare: Address = "7e5f4552091a69125d5dfcb7b8c2659029395bdf".parse().unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, bare);
    }

    #[test]
    fn test_equal_addresses() {
        assert!(equal_addresses(
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf",
            "7E5F4552091A69125D5DFCB7B8C2659029395BDF"
        ));
        assert!(!equal_addresses(
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf",
            "0x0000000000000000000000000000000000000000"
        ));
        assert!(!equal_addresses("not an address", "not an address"));
    }

    #[test]
    fn test_checksum_address() {
        let address: Address = "0xcd2a3d9f938e13cd947ec05abc7fe734df8dd826".parse().unwrap();
        assert_eq!(address.to_checksum(), "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826");
    }

    #[test]
    fn test_serde_roundtrip_uses_prefixed_hex() {
        let address = Address::from_public_key(&key_one_public());
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"0x7e5f4552091a69125d5dfcb7b8c2659029395bdf\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
