//! Balance Proofs
//!
//! A balance proof is the payer's signature over
//! `keccak256(receiver, uint32 open_block_number, uint192 balance, contract)`,
//! packed exactly as the channel contract recomputes it on-chain.
//!
//! Monotonicity (a later proof carries a larger balance) is the caller's
//! concern; nothing here compares proofs.

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

use crate::crypto::{self, Address, Digest, PrivateKey, Signature, TypedValue};
use crate::error::CryptoResult;
use crate::{log_debug, log_warn};

/// Bit width of the block number field
pub const OPEN_BLOCK_NUMBER_BITS: usize = 32;

/// Bit width of the balance field
pub const BALANCE_BITS: usize = 192;

/// Digest a balance proof signs
///
/// Fails with `IntegerOverflow` if `balance` needs more than 192 bits.
pub fn balance_message_digest(
    receiver: &Address,
    open_block_number: u32,
    balance: U256,
    contract_address: &Address,
) -> CryptoResult<Digest> {
    crypto::hash(&[
        TypedValue::from(receiver),
        TypedValue::uint(open_block_number, OPEN_BLOCK_NUMBER_BITS),
        TypedValue::uint(balance, BALANCE_BITS),
        TypedValue::from(contract_address),
    ])
}

/// Sign a balance proof
pub fn sign_balance_proof(
    private_key: &PrivateKey,
    receiver: &Address,
    open_block_number: u32,
    balance: U256,
    contract_address: &Address,
) -> CryptoResult<Signature> {
    let digest = balance_message_digest(receiver, open_block_number, balance, contract_address)?;
    log_debug!(
        "balance_proof",
        "signing balance proof",
        receiver = receiver,
        open_block_number = open_block_number,
        balance = balance,
        digest = digest,
    );
    Ok(crypto::sign(private_key, &digest))
}

/// Recover the address that signed a balance proof
///
/// The caller compares the result against the expected payer.
pub fn verify_balance_proof(
    receiver: &Address,
    open_block_number: u32,
    balance: U256,
    balance_signature: &[u8],
    contract_address: &Address,
) -> CryptoResult<Address> {
    let digest = balance_message_digest(receiver, open_block_number, balance, contract_address)?;
    crypto::recover_address(balance_signature, &digest).map_err(|e| {
        log_warn!(
            "balance_proof",
            "balance proof rejected",
            receiver = receiver,
            balance = balance,
            error = e,
        );
        e
    })
}

/// A signed balance proof with the parameters it commits to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceProof {
    pub receiver: Address,
    pub open_block_number: u32,
    #[serde(with = "decimal_u256")]
    pub balance: U256,
    pub contract_address: Address,
    pub signature: Signature,
}

impl BalanceProof {
    pub fn sign(
        private_key: &PrivateKey,
        receiver: Address,
        open_block_number: u32,
        balance: U256,
        contract_address: Address,
    ) -> CryptoResult<Self> {
        let signature = sign_balance_proof(
            private_key,
            &receiver,
            open_block_number,
            balance,
            &contract_address,
        )?;

        Ok(Self {
            receiver,
            open_block_number,
            balance,
            contract_address,
            signature,
        })
    }

    pub fn digest(&self) -> CryptoResult<Digest> {
        balance_message_digest(
            &self.receiver,
            self.open_block_number,
            self.balance,
            &self.contract_address,
        )
    }

    /// Recover the payer
    pub fn signer(&self) -> CryptoResult<Address> {
        verify_balance_proof(
            &self.receiver,
            self.open_block_number,
            self.balance,
            self.signature.as_ref(),
            &self.contract_address,
        )
    }

    /// True when the proof recovers to `expected`
    pub fn is_signed_by(&self, expected: &Address) -> CryptoResult<bool> {
        Ok(self.signer()? == *expected)
    }
}

/// Balances travel as decimal strings; 192-bit values overflow JSON numbers
mod decimal_u256 {
    use ethers_core::types::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let s = String::deserialize(deserializer)?;
        U256::from_dec_str(&s).map_err(serde::de::Error::custom)
    }
}
