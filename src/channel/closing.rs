//! Closing Agreements
//!
//! The counterparty signs `keccak256(balance_signature)` to accept a specific
//! balance proof for cooperative settlement.

use serde::{Deserialize, Serialize};

use crate::crypto::{self, Address, Digest, PrivateKey, Signature};
use crate::error::CryptoResult;
use crate::{log_debug, log_warn};

/// Digest a closing signature covers
///
/// Equal to `hash(&[TypedValue::Bytes(balance_signature)])`; raw bytes
/// encode as themselves, so the hash is taken directly.
pub fn closing_agreement_digest(balance_signature: &[u8]) -> Digest {
    Digest::new(crypto::keccak256(balance_signature))
}

/// Co-sign acceptance of a balance proof signature
pub fn sign_close(private_key: &PrivateKey, balance_signature: &[u8]) -> Signature {
    let digest = closing_agreement_digest(balance_signature);
    log_debug!(
        "closing",
        "signing closing agreement",
        balance_signature = hex::encode(balance_signature),
        digest = digest,
    );
    crypto::sign(private_key, &digest)
}

/// Recover the address that co-signed `balance_signature`
pub fn verify_closing_signature(
    balance_signature: &[u8],
    closing_signature: &[u8],
) -> CryptoResult<Address> {
    let digest = closing_agreement_digest(balance_signature);
    crypto::recover_address(closing_signature, &digest).map_err(|e| {
        log_warn!(
            "closing",
            "closing signature rejected",
            balance_signature = hex::encode(balance_signature),
            error = e,
        );
        e
    })
}

/// A balance proof signature together with its closing signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingAgreement {
    pub balance_signature: Signature,
    pub closing_signature: Signature,
}

impl ClosingAgreement {
    pub fn sign(private_key: &PrivateKey, balance_signature: Signature) -> Self {
        let closing_signature = sign_close(private_key, balance_signature.as_ref());
        Self {
            balance_signature,
            closing_signature,
        }
    }

    pub fn digest(&self) -> Digest {
        closing_agreement_digest(self.balance_signature.as_ref())
    }

    /// Recover the co-signer
    pub fn closer(&self) -> CryptoResult<Address> {
        verify_closing_signature(
            self.balance_signature.as_ref(),
            self.closing_signature.as_ref(),
        )
    }
}
