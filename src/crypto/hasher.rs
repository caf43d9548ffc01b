//! Packed Message Hashing
//!
//! Reproduces Solidity's `keccak256(abi.encodePacked(...))` for the value
//! kinds a payment channel contract hashes: raw bytes, hex strings, UTF-8
//! strings, and integers of an explicit bit width.
//!
//! ```rust,ignore
//! use micropay_crypto::crypto::{hash, TypedValue};
//!
//! // keccak256(abi.encodePacked(uint32(5)))
//! let digest = hash(&[TypedValue::uint(5u32, 32)])?;
//! ```

use std::fmt;

use ethers_core::types::{I256, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tiny_keccak::{Hasher, Keccak};

use super::address::Address;
use crate::error::{CryptoError, CryptoResult};

/// Width used for integers without an explicit size
pub const DEFAULT_INT_BITS: usize = 256;

/// Widest integer the packed encoder accepts (`uint256` / `int256`)
pub const MAX_INT_BITS: usize = 256;

/// Keccak256 hash
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// A 32-byte hash output, the only thing the signer accepts
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidDigestLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    /// Parse from hex (a leading `0x` is tolerated)
    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let s = s.trim();
        let body = s.strip_prefix("0x").unwrap_or(s);
        Self::from_slice(&hex::decode(body)?)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex without prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Digest::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// An integer operand, signed or unsigned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integer {
    Unsigned(U256),
    Signed(I256),
}

impl Integer {
    /// Sign flag and magnitude
    fn sign_and_magnitude(&self) -> (bool, U256) {
        match self {
            Integer::Unsigned(value) => (false, *value),
            Integer::Signed(value) => (value.is_negative(), value.unsigned_abs()),
        }
    }

    /// Big-endian encoding in exactly `bits / 8` bytes
    ///
    /// `bits` must be a multiple of 8 in `8..=256`. Negative values encode as
    /// `(1 << bits) + value`.
    pub fn encode(&self, bits: usize) -> CryptoResult<Vec<u8>> {
        if bits == 0 || bits % 8 != 0 || bits > MAX_INT_BITS {
            return Err(CryptoError::InvalidWidth(bits));
        }
        let width = bits / 8;
        let (negative, magnitude) = self.sign_and_magnitude();

        let overflow = || CryptoError::IntegerOverflow {
            value: self.to_string(),
            bits,
        };

        let word = if !negative {
            if bits < 256 && !(magnitude >> bits).is_zero() {
                return Err(overflow());
            }
            magnitude
        } else if bits < 256 {
            let modulus = U256::one() << bits;
            if magnitude > modulus {
                return Err(overflow());
            }
            modulus - magnitude
        } else {
            // two's complement in 256 bits
            U256::zero().overflowing_sub(magnitude).0
        };

        let mut be = [0u8; 32];
        word.to_big_endian(&mut be);
        Ok(be[32 - width..].to_vec())
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integer::Unsigned(value) => write!(f, "{}", value),
            Integer::Signed(value) => write!(f, "{}", value),
        }
    }
}

macro_rules! impl_integer_from {
    ($variant:ident, $wide:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Integer {
                fn from(value: $t) -> Self {
                    Integer::$variant(<$wide>::from(value))
                }
            }
        )*
    };
}

impl_integer_from!(Unsigned, U256: u8, u16, u32, u64, u128, U256);
impl_integer_from!(Signed, I256: i8, i16, i32, i64, i128, I256);

/// One operand of a packed hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    /// Raw bytes, passed through
    Bytes(Vec<u8>),
    /// `0x`-prefixed hex, decoded before hashing
    Hex(String),
    /// UTF-8 text
    Text(String),
    /// Integer at the default 256-bit width
    Int(Integer),
    /// Integer at an explicit bit width
    Sized(Integer, usize),
}

impl TypedValue {
    pub fn uint(value: impl Into<U256>, bits: usize) -> Self {
        TypedValue::Sized(Integer::Unsigned(value.into()), bits)
    }

    pub fn int(value: impl Into<I256>, bits: usize) -> Self {
        TypedValue::Sized(Integer::Signed(value.into()), bits)
    }

    /// String dispatch: `0x`-prefixed input is hex, anything else is text
    pub fn string(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.starts_with("0x") {
            TypedValue::Hex(s)
        } else {
            TypedValue::Text(s)
        }
    }

    /// Packed encoding of this value
    pub fn encode(&self) -> CryptoResult<Vec<u8>> {
        match self {
            TypedValue::Bytes(bytes) => Ok(bytes.clone()),
            TypedValue::Hex(s) => {
                let body = s.strip_prefix("0x").unwrap_or(s);
                Ok(hex::decode(body)?)
            }
            TypedValue::Text(s) => Ok(s.as_bytes().to_vec()),
            TypedValue::Int(value) => value.encode(DEFAULT_INT_BITS),
            TypedValue::Sized(value, bits) => value.encode(*bits),
        }
    }

    /// Parse a JSON operand
    ///
    /// Strings follow [`TypedValue::string`], integers are unsized, and a
    /// two-element array `[value, bits]` is a sized integer whose value may be
    /// a JSON integer or a decimal string.
    pub fn from_json(value: &serde_json::Value) -> CryptoResult<Self> {
        use serde_json::Value;

        match value {
            Value::String(s) => Ok(TypedValue::string(s.as_str())),
            Value::Number(_) => Ok(TypedValue::Int(json_integer(value)?)),
            Value::Array(pair) if pair.len() == 2 => {
                let bits = pair[1]
                    .as_u64()
                    .ok_or_else(|| CryptoError::UnsupportedType(format!("bit width {}", pair[1])))?;
                let bits = usize::try_from(bits).unwrap_or(usize::MAX);
                if bits > MAX_INT_BITS {
                    return Err(CryptoError::InvalidWidth(bits));
                }
                Ok(TypedValue::Sized(json_integer(&pair[0])?, bits))
            }
            other => Err(CryptoError::UnsupportedType(json_kind(other).to_string())),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn json_integer(value: &serde_json::Value) -> CryptoResult<Integer> {
    use serde_json::Value;

    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(Integer::from(u))
            } else if let Some(i) = n.as_i64() {
                Ok(Integer::from(i))
            } else {
                Err(CryptoError::UnsupportedType(format!("non-integer number {}", n)))
            }
        }
        Value::String(s) => parse_decimal(s),
        other => Err(CryptoError::UnsupportedType(json_kind(other).to_string())),
    }
}

/// Parse a decimal integer literal, optionally negative
pub fn parse_decimal(s: &str) -> CryptoResult<Integer> {
    let s = s.trim();
    let invalid = |_| CryptoError::UnsupportedType(format!("not a decimal integer: {}", s));

    match s.strip_prefix('-') {
        Some(digits) => {
            let magnitude = U256::from_dec_str(digits).map_err(invalid)?;
            let signed = I256::checked_from_sign_and_abs(ethers_core::types::Sign::Negative, magnitude)
                .ok_or_else(|| CryptoError::IntegerOverflow {
                    value: s.to_string(),
                    bits: DEFAULT_INT_BITS,
                })?;
            Ok(Integer::Signed(signed))
        }
        None => Ok(Integer::Unsigned(U256::from_dec_str(s).map_err(invalid)?)),
    }
}

impl From<&[u8]> for TypedValue {
    fn from(bytes: &[u8]) -> Self {
        TypedValue::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for TypedValue {
    fn from(bytes: Vec<u8>) -> Self {
        TypedValue::Bytes(bytes)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::string(s)
    }
}

impl From<&Address> for TypedValue {
    fn from(address: &Address) -> Self {
        TypedValue::Bytes(address.as_bytes().to_vec())
    }
}

impl<T: Into<Integer>> From<(T, usize)> for TypedValue {
    fn from((value, bits): (T, usize)) -> Self {
        TypedValue::Sized(value.into(), bits)
    }
}

/// Concatenated packed encoding of every value, in order
pub fn encode_packed(values: &[TypedValue]) -> CryptoResult<Vec<u8>> {
    let mut message = Vec::new();
    for value in values {
        message.extend(value.encode()?);
    }
    Ok(message)
}

/// keccak256 over the packed encoding
pub fn hash(values: &[TypedValue]) -> CryptoResult<Digest> {
    let message = encode_packed(values)?;
    Ok(Digest(keccak256(&message)))
}

/// Same as [`hash`], hex-encoded without prefix
pub fn hash_hex(values: &[TypedValue]) -> CryptoResult<String> {
    Ok(hash(values)?.to_hex())
}
