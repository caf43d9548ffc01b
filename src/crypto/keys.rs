//! Key Material
//!
//! secp256k1 private keys, their hex form, and fresh key generation.
//!
//! SECURITY: the scalar never appears in `Debug` output, and intermediate
//! byte buffers are zeroized on drop.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use zeroize::Zeroizing;

use super::address::Address;
use crate::error::{CryptoError, CryptoResult};

/// A secp256k1 private key
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(SecretKey);

impl PrivateKey {
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidPrivateKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        let secret = SecretKey::from_slice(bytes)
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self(secret))
    }

    /// Parse from hex (a leading `0x` is tolerated)
    pub fn from_hex(hex_key: &str) -> CryptoResult<Self> {
        let trimmed = hex_key.trim();
        let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = Zeroizing::new(
            hex::decode(body).map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?,
        );
        Self::from_bytes(&bytes)
    }

    /// Hex without prefix
    pub fn to_hex(&self) -> Zeroizing<String> {
        let bytes = Zeroizing::new(self.0.secret_bytes());
        Zeroizing::new(hex::encode(bytes.as_ref()))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_secret_key(&Secp256k1::new(), &self.0)
    }

    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key())
    }

    pub(crate) fn secret_key(&self) -> &SecretKey {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

impl From<SecretKey> for PrivateKey {
    fn from(secret: SecretKey) -> Self {
        Self(secret)
    }
}

/// Draw a new private key from the operating system RNG
///
/// Out-of-range scalars (zero, or >= the curve order) are discarded and redrawn.
pub fn generate_private_key() -> CryptoResult<PrivateKey> {
    let mut rng = OsRng;
    loop {
        let mut bytes = Zeroizing::new([0u8; 32]);
        rng.try_fill_bytes(bytes.as_mut())
            .map_err(|e| CryptoError::GenerationError(e.to_string()))?;

        if let Ok(secret) = SecretKey::from_slice(bytes.as_ref()) {
            return Ok(PrivateKey(secret));
        }
    }
}

pub fn private_key_to_address(private_key: &PrivateKey) -> Address {
    private_key.address()
}

/// Derive the address for a hex-encoded private key
pub fn private_key_hex_to_address(hex_key: &str) -> CryptoResult<Address> {
    Ok(PrivateKey::from_hex(hex_key)?.address())
}
