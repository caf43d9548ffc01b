//! Channel Authorization Protocols
//!
//! The two signed artifacts a micropayment channel exchanges off-chain:
//! - **balance_proof**: payer authorizes a cumulative balance to a receiver
//! - **closing**: counterparty accepts a balance proof for cooperative close
//!
//! # Example
//! ```rust,ignore
//! use micropay_crypto::channel::{ChannelSigner, BalanceProof};
//!
//! let payer = ChannelSigner::new(payer_key);
//! let proof = payer.sign_balance_proof(receiver, 4_000_000, balance.into(), contract)?;
//! assert_eq!(proof.signer()?, payer.address());
//!
//! let agreement = ChannelSigner::new(receiver_key).sign_close(&proof)?;
//! assert_eq!(agreement.closer()?, receiver);
//! ```

pub mod balance_proof;
pub mod closing;

pub use balance_proof::*;
pub use closing::*;

use ethers_core::types::U256;

use crate::crypto::{Address, PrivateKey};
use crate::error::CryptoResult;
use crate::utils::config::SignerSettings;

/// A channel participant's key with its signer settings
#[derive(Debug, Clone)]
pub struct ChannelSigner {
    private_key: PrivateKey,
    address: Address,
    settings: SignerSettings,
}

impl ChannelSigner {
    pub fn new(private_key: PrivateKey) -> Self {
        Self::with_settings(private_key, SignerSettings::default())
    }

    pub fn with_settings(private_key: PrivateKey, settings: SignerSettings) -> Self {
        let address = private_key.address();
        Self {
            private_key,
            address,
            settings,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn settings(&self) -> &SignerSettings {
        &self.settings
    }

    /// Sign a balance proof as the payer
    pub fn sign_balance_proof(
        &self,
        receiver: Address,
        open_block_number: u32,
        balance: U256,
        contract_address: Address,
    ) -> CryptoResult<BalanceProof> {
        let mut proof = BalanceProof::sign(
            &self.private_key,
            receiver,
            open_block_number,
            balance,
            contract_address,
        )?;
        proof.signature = proof.signature.with_format(self.settings.recovery_id_format)?;
        Ok(proof)
    }

    /// Co-sign a balance proof for cooperative close
    ///
    /// The closing digest covers the balance signature bytes exactly as
    /// received, including their recovery byte convention.
    pub fn sign_close(&self, proof: &BalanceProof) -> CryptoResult<ClosingAgreement> {
        let mut agreement = ClosingAgreement::sign(&self.private_key, proof.signature);
        agreement.closing_signature = agreement
            .closing_signature
            .with_format(self.settings.recovery_id_format)?;
        Ok(agreement)
    }
}
