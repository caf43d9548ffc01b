//! micropay-crypto
//!
//! Cryptographic authorization for off-chain micropayment channels.
//!
//! # Architecture
//!
//! This crate provides:
//! - **crypto**: addresses, keys, packed hashing, recoverable signatures
//! - **channel**: balance proofs and closing agreements
//! - **utils**: redacting logger and signer configuration
//! - **error**: the error taxonomy shared by all of the above
//!
//! Every operation is a synchronous pure function. Transport, persistence
//! and on-chain submission belong to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use micropay_crypto::{channel, crypto};
//!
//! let key = crypto::generate_private_key()?;
//! let sig = channel::sign_balance_proof(&key, &receiver, block, balance, &contract)?;
//! let payer = channel::verify_balance_proof(&receiver, block, balance, sig.as_ref(), &contract)?;
//! assert_eq!(payer, key.address());
//! ```

pub mod channel;
pub mod crypto;
pub mod error;
pub mod utils;

pub use channel::{
    balance_message_digest, closing_agreement_digest, sign_balance_proof, sign_close,
    verify_balance_proof, verify_closing_signature, BalanceProof, ChannelSigner, ClosingAgreement,
};
pub use crypto::{Address, Digest, PrivateKey, Signature, TypedValue};
pub use error::{CryptoError, CryptoResult, ErrorCode};
pub use utils::config::{RecoveryIdFormat, SignerSettings};

pub use ethers_core::types::U256;
