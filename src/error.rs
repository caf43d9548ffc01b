//! Unified error types for micropay-crypto
//!
//! Every failure is a synchronous, local rejection of malformed input.
//! Nothing here is transient, so nothing here is retried.

use serde::{Deserialize, Serialize};

/// Main error type for all signing, hashing and recovery operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid digest length: expected 32 bytes, got {0}")]
    InvalidDigestLength(usize),

    #[error("invalid signature length: expected 65 bytes, got {0}")]
    InvalidSignatureLength(usize),

    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    #[error("public key recovery failed: {0}")]
    PointRecoveryFailed(String),

    #[error("unsupported value type: {0}")]
    UnsupportedType(String),

    #[error("invalid integer width: {0} bits (must be a multiple of 8 from 8 to 256)")]
    InvalidWidth(usize),

    #[error("integer {value} does not fit in {bits} bits")]
    IntegerOverflow { value: String, bits: usize },

    #[error("random source failure: {0}")]
    GenerationError(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl CryptoError {
    /// Machine-readable category for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            CryptoError::InvalidDigestLength(_) => ErrorCode::InvalidDigestLength,
            CryptoError::InvalidSignatureLength(_) => ErrorCode::InvalidSignatureLength,
            CryptoError::InvalidRecoveryId(_) => ErrorCode::InvalidRecoveryId,
            CryptoError::PointRecoveryFailed(_) => ErrorCode::PointRecoveryFailed,
            CryptoError::UnsupportedType(_) => ErrorCode::UnsupportedType,
            CryptoError::InvalidWidth(_) => ErrorCode::InvalidWidth,
            CryptoError::IntegerOverflow { .. } => ErrorCode::IntegerOverflow,
            CryptoError::GenerationError(_) => ErrorCode::GenerationError,
            CryptoError::InvalidPrivateKey(_) => ErrorCode::InvalidPrivateKey,
            CryptoError::InvalidPublicKey(_) => ErrorCode::InvalidPublicKey,
            CryptoError::InvalidAddress(_) => ErrorCode::InvalidAddress,
            CryptoError::InvalidHex(_) => ErrorCode::InvalidHex,
        }
    }

    /// Serializable report, used by the CLI for error output
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Signature errors
    InvalidDigestLength,
    InvalidSignatureLength,
    InvalidRecoveryId,
    PointRecoveryFailed,

    // Hashing errors
    UnsupportedType,
    InvalidWidth,
    IntegerOverflow,

    // Key errors
    GenerationError,
    InvalidPrivateKey,
    InvalidPublicKey,

    // Parse errors
    InvalidAddress,
    InvalidHex,
}

/// Code plus human-readable message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

/// Result type alias for micropay-crypto operations
pub type CryptoResult<T> = Result<T, CryptoError>;

impl From<hex::FromHexError> for CryptoError {
    fn from(e: hex::FromHexError) -> Self {
        CryptoError::InvalidHex(e.to_string())
    }
}
