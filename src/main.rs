//! Command-line front end for micropay-crypto.
//!
//! Every command prints one JSON object on stdout. Failures print
//! `{"error": {"code": ..., "message": ...}}` on stderr and exit with 1.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use micropay_crypto::crypto::{self, Address, PrivateKey, Signature, TypedValue};
use micropay_crypto::utils::config::{RecoveryIdFormat, SignerSettings};
use micropay_crypto::{
    log_error, log_info, BalanceProof, ChannelSigner, ClosingAgreement, CryptoError, CryptoResult, U256,
};
use serde_json::{json, Value};

/// Micropayment channel signing tool.
#[derive(Parser, Debug)]
#[command(name = "micropay-crypto")]
#[command(about = "Sign and verify micropayment channel balance proofs")]
#[command(version)]
struct Cli {
    /// Emit debug log lines on stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new private key and its address.
    Keygen,

    /// Derive the address of a private key.
    Address {
        /// Private key, hex.
        #[arg(long)]
        key: String,
    },

    /// Packed keccak256 of operands: 0x.., text, 5, [5, 32], "quoted".
    Hash {
        /// One operand per argument. Decimals are 256-bit integers.
        #[arg(allow_negative_numbers = true)]
        values: Vec<String>,
    },

    /// Sign a balance proof as the payer.
    SignBalance {
        #[arg(long)]
        key: String,
        #[arg(long)]
        receiver: String,
        #[arg(long)]
        block: u32,
        /// Balance, decimal.
        #[arg(long)]
        balance: String,
        #[arg(long)]
        contract: String,
        /// Emit v as 27/28.
        #[arg(long)]
        legacy: bool,
    },

    /// Recover the payer of a balance proof.
    VerifyBalance {
        #[arg(long)]
        receiver: String,
        #[arg(long)]
        block: u32,
        #[arg(long)]
        balance: String,
        #[arg(long)]
        contract: String,
        #[arg(long)]
        signature: String,
    },

    /// Co-sign a balance proof signature for cooperative close.
    SignClose {
        #[arg(long)]
        key: String,
        #[arg(long)]
        balance_signature: String,
        /// Emit v as 27/28.
        #[arg(long)]
        legacy: bool,
    },

    /// Recover the co-signer of a closing agreement.
    VerifyClose {
        #[arg(long)]
        balance_signature: String,
        #[arg(long)]
        closing_signature: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = SignerSettings::from_env().and_then(|settings| {
        settings
            .clone()
            .with_debug_logging(settings.debug_logging || cli.verbose)
            .apply();
        run(cli.command, settings)
    });

    match outcome {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error!("cli", "command failed", error = e);
            eprintln!("{}", json!({ "error": e.report() }));
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, settings: SignerSettings) -> CryptoResult<Value> {
    match command {
        Command::Keygen => {
            let key = crypto::generate_private_key()?;
            log_info!("cli", "generated private key", address = key.address());
            Ok(json!({
                "privateKey": key.to_hex().as_str(),
                "address": key.address(),
            }))
        }

        Command::Address { key } => {
            let address = crypto::private_key_hex_to_address(&key)?;
            Ok(json!({
                "address": address,
                "checksumAddress": address.to_checksum(),
            }))
        }

        Command::Hash { values } => {
            let typed = values
                .iter()
                .map(|raw| parse_operand(raw))
                .collect::<CryptoResult<Vec<_>>>()?;
            let packed = crypto::encode_packed(&typed)?;
            Ok(json!({
                "packed": hex::encode(&packed),
                "hash": crypto::hash(&typed)?,
            }))
        }

        Command::SignBalance {
            key,
            receiver,
            block,
            balance,
            contract,
            legacy,
        } => {
            let signer = ChannelSigner::with_settings(
                PrivateKey::from_hex(&key)?,
                settings_for(settings, legacy),
            );
            let proof = signer.sign_balance_proof(
                receiver.parse()?,
                block,
                parse_balance(&balance)?,
                contract.parse()?,
            )?;
            Ok(json!({
                "digest": proof.digest()?,
                "proof": proof,
            }))
        }

        Command::VerifyBalance {
            receiver,
            block,
            balance,
            contract,
            signature,
        } => {
            let proof = BalanceProof {
                receiver: receiver.parse()?,
                open_block_number: block,
                balance: parse_balance(&balance)?,
                contract_address: contract.parse()?,
                signature: Signature::from_hex(&signature)?,
            };
            let signer: Address = proof.signer()?;
            Ok(json!({ "signer": signer }))
        }

        Command::SignClose {
            key,
            balance_signature,
            legacy,
        } => {
            let format = settings_for(settings, legacy).recovery_id_format;
            let balance_signature = Signature::from_hex(&balance_signature)?;
            let agreement = ClosingAgreement::sign(&PrivateKey::from_hex(&key)?, balance_signature);
            let closing_signature = agreement.closing_signature.with_format(format)?;
            Ok(json!({
                "digest": agreement.digest(),
                "closingSignature": closing_signature,
            }))
        }

        Command::VerifyClose {
            balance_signature,
            closing_signature,
        } => {
            let agreement = ClosingAgreement {
                balance_signature: Signature::from_hex(&balance_signature)?,
                closing_signature: Signature::from_hex(&closing_signature)?,
            };
            Ok(json!({ "closer": agreement.closer()? }))
        }
    }
}

fn settings_for(settings: SignerSettings, legacy: bool) -> SignerSettings {
    if legacy {
        settings.with_recovery_id_format(RecoveryIdFormat::Legacy)
    } else {
        settings
    }
}

/// Parse one `hash` operand
///
/// `0x..` is hex, a bare decimal is an unsized integer of any size up to 256
/// bits, and input starting with `[`, `{`, `"`, a digit or `-` must be valid
/// JSON. Anything else is UTF-8 text.
fn parse_operand(raw: &str) -> CryptoResult<TypedValue> {
    if raw.starts_with("0x") {
        return Ok(TypedValue::string(raw));
    }

    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(TypedValue::Int(crypto::parse_decimal(raw)?));
    }

    match raw.chars().next() {
        Some('[' | '{' | '"' | '-' | '0'..='9') => {
            let value: Value = serde_json::from_str(raw).map_err(|e| {
                CryptoError::UnsupportedType(format!("malformed operand '{}': {}", raw, e))
            })?;
            TypedValue::from_json(&value)
        }
        _ => Ok(TypedValue::string(raw)),
    }
}

fn parse_balance(balance: &str) -> CryptoResult<U256> {
    U256::from_dec_str(balance.trim()).map_err(|e| CryptoError::UnsupportedType(format!(
        "balance '{}': {:?}",
        balance, e
    )))
}
