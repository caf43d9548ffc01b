//! Recoverable ECDSA Signing
//!
//! Signs a [`Digest`] directly, without hashing it again, and recovers the
//! signer's address from a signature and the digest it covers.

use std::fmt;

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::address::Address;
use super::hasher::Digest;
use super::keys::PrivateKey;
use crate::error::{CryptoError, CryptoResult};
use crate::utils::config::RecoveryIdFormat;

/// Length of a serialized signature: r(32) || s(32) || v(1)
pub const SIGNATURE_LENGTH: usize = 65;

/// Offset of the legacy recovery id convention (v = 27/28)
pub const LEGACY_V_OFFSET: u8 = 27;

/// A 65-byte recoverable signature
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    pub fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(&r);
        bytes[32..64].copy_from_slice(&s);
        bytes[64] = v;
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; SIGNATURE_LENGTH] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    /// Parse from hex (a leading `0x` is tolerated)
    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        Self::from_slice(&hex::decode(body)?)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// Hex without prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[32..64]
    }

    /// Raw recovery byte, as stored
    pub fn v(&self) -> u8 {
        self.0[64]
    }

    pub fn recovery_id(&self) -> CryptoResult<RecoveryId> {
        normalize_recovery_id(self.v())
    }

    /// Re-encode the recovery byte in the requested convention
    pub fn with_format(&self, format: RecoveryIdFormat) -> CryptoResult<Self> {
        let id = self.recovery_id()?.to_i32() as u8;
        let mut bytes = self.0;
        bytes[64] = match format {
            RecoveryIdFormat::Canonical => id,
            RecoveryIdFormat::Legacy => id + LEGACY_V_OFFSET,
        };
        Ok(Self(bytes))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Signature::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Map a stored recovery byte to a canonical recovery id
///
/// Early signers emitted `v = 27/28`; those are shifted down to 0/1.
/// Only 0 and 1 are accepted after the shift.
pub fn normalize_recovery_id(v: u8) -> CryptoResult<RecoveryId> {
    let id = if v >= LEGACY_V_OFFSET {
        v - LEGACY_V_OFFSET
    } else {
        v
    };

    if id > 1 {
        return Err(CryptoError::InvalidRecoveryId(v));
    }

    RecoveryId::from_i32(id as i32).map_err(|_| CryptoError::InvalidRecoveryId(v))
}

/// Sign a digest, emitting a canonical (0/1) recovery byte
///
/// Nonces are RFC6979-deterministic: the same key and digest always give
/// the same signature.
pub fn sign(private_key: &PrivateKey, digest: &Digest) -> Signature {
    sign_with(private_key, digest, RecoveryIdFormat::Canonical)
}

/// Sign a digest, emitting the recovery byte in `format`
pub fn sign_with(private_key: &PrivateKey, digest: &Digest, format: RecoveryIdFormat) -> Signature {
    let secp = Secp256k1::new();
    let message = Message::from_digest(*digest.as_bytes());

    let (recovery_id, compact) = secp
        .sign_ecdsa_recoverable(&message, private_key.secret_key())
        .serialize_compact();

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);

    let id = recovery_id.to_i32() as u8;
    let v = match format {
        RecoveryIdFormat::Canonical => id,
        RecoveryIdFormat::Legacy => id + LEGACY_V_OFFSET,
    };

    Signature::new(r, s, v)
}

/// Sign a raw 32-byte buffer that the caller has already hashed
pub fn sign_slice(private_key: &PrivateKey, digest: &[u8]) -> CryptoResult<Signature> {
    let digest = Digest::from_slice(digest)?;
    Ok(sign(private_key, &digest))
}

/// Recover the public key that produced `signature` over `digest`
pub fn recover_public_key(signature: &[u8], digest: &Digest) -> CryptoResult<PublicKey> {
    let signature = Signature::from_slice(signature)?;
    let recovery_id = signature.recovery_id()?;

    let recoverable = RecoverableSignature::from_compact(&signature.as_bytes()[..64], recovery_id)
        .map_err(|e| CryptoError::PointRecoveryFailed(e.to_string()))?;

    let message = Message::from_digest(*digest.as_bytes());
    Secp256k1::new()
        .recover_ecdsa(&message, &recoverable)
        .map_err(|e| CryptoError::PointRecoveryFailed(e.to_string()))
}

/// Recover the signer's address from `signature` over `digest`
pub fn recover_address(signature: &[u8], digest: &Digest) -> CryptoResult<Address> {
    let public_key = recover_public_key(signature, digest)?;
    Ok(Address::from_public_key(&public_key))
}
