use micropay_crypto::crypto::{equal_addresses, private_key_hex_to_address};
use serde_json::Value;
use std::process::Command;

const PAYER_KEY: &str = "c85ef7d79691fe79573b1a7e708c6cf5a4e6e6e3c8c6d0a2b5e5e5e5e5e5e5e5";
const RECEIVER_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000001";
const RECEIVER: &str = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf";
const CONTRACT: &str = "0x2b5ad5c4795c026514f8317c7a215e218dccd6cf";

fn run_cli(args: &[&str]) -> Value {
    let binary_path = assert_cmd::cargo::cargo_bin!("micropay-crypto");
    let output = Command::new(binary_path)
        .args(args)
        .env_remove("MICROPAY_RECOVERY_ID_FORMAT")
        .output()
        .expect("cli run succeeds");

    assert!(
        output.status.success(),
        "cli exited unsuccessfully: {:?}",
        output
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf8");
    serde_json::from_str(&stdout).expect("stdout is valid json")
}

fn run_cli_failure(args: &[&str]) -> Value {
    let binary_path = assert_cmd::cargo::cargo_bin!("micropay-crypto");
    let output = Command::new(binary_path)
        .args(args)
        .output()
        .expect("cli runs");

    assert!(!output.status.success(), "cli unexpectedly succeeded");
    let stderr = String::from_utf8(output.stderr).expect("stderr is utf8");
    let last_line = stderr.lines().last().expect("error line present");
    serde_json::from_str(last_line).expect("error is json")
}

fn sign_balance(extra: &[&str]) -> Value {
    let mut args = vec![
        "sign-balance",
        "--key",
        PAYER_KEY,
        "--receiver",
        RECEIVER,
        "--block",
        "4000000",
        "--balance",
        "1000000000000000000",
        "--contract",
        CONTRACT,
    ];
    args.extend_from_slice(extra);
    run_cli(&args)
}

#[test]
fn keygen_emits_consistent_key_material() {
    let output = run_cli(&["keygen"]);
    let key = output["privateKey"].as_str().expect("private key");
    let address = output["address"].as_str().expect("address");

    assert_eq!(key.len(), 64);
    assert!(!key.starts_with("0x"));
    assert!(address.starts_with("0x"));
    assert_eq!(private_key_hex_to_address(key).unwrap().to_hex(), address);
}

#[test]
fn address_command_matches_library() {
    let output = run_cli(&["address", "--key", RECEIVER_KEY]);
    assert_eq!(output["address"], RECEIVER);
    assert!(equal_addresses(
        output["checksumAddress"].as_str().unwrap(),
        RECEIVER
    ));
}

#[test]
fn balance_proof_sign_then_verify() {
    let signed = sign_balance(&[]);
    assert_eq!(
        signed["digest"],
        "fe3757ab0aeb0a8957c690449286c382e68499dfdb4eef55b24cb01db79fb3bc"
    );
    let signature = signed["proof"]["signature"].as_str().unwrap().to_string();

    let verified = run_cli(&[
        "verify-balance",
        "--receiver",
        RECEIVER,
        "--block",
        "4000000",
        "--balance",
        "1000000000000000000",
        "--contract",
        CONTRACT,
        "--signature",
        &signature,
    ]);
    let payer = private_key_hex_to_address(PAYER_KEY).unwrap().to_hex();
    assert_eq!(verified["signer"], payer.as_str());
}

#[test]
fn legacy_flag_sets_high_recovery_byte() {
    let signed = sign_balance(&["--legacy"]);
    let signature = signed["proof"]["signature"].as_str().unwrap();
    let v = u8::from_str_radix(&signature[128..], 16).unwrap();
    assert!(v == 27 || v == 28);
}

#[test]
fn closing_agreement_sign_then_verify() {
    let signed = sign_balance(&[]);
    let balance_signature = signed["proof"]["signature"].as_str().unwrap().to_string();

    let closed = run_cli(&[
        "sign-close",
        "--key",
        RECEIVER_KEY,
        "--balance-signature",
        &balance_signature,
    ]);
    let closing_signature = closed["closingSignature"].as_str().unwrap().to_string();

    let verified = run_cli(&[
        "verify-close",
        "--balance-signature",
        &balance_signature,
        "--closing-signature",
        &closing_signature,
    ]);
    assert_eq!(verified["closer"], RECEIVER);
}

#[test]
fn hash_command_accepts_mixed_operands() {
    let output = run_cli(&["hash", "0xdead", "[5, 32]", "\"ab\""]);
    assert_eq!(output["packed"], "dead000000056162");
}

#[test]
fn invalid_width_reports_error_code() {
    let error = run_cli_failure(&["hash", "[1, 7]"]);
    assert_eq!(error["error"]["code"], "invalid_width");
}

#[test]
fn short_signature_reports_error_code() {
    let error = run_cli_failure(&[
        "verify-close",
        "--balance-signature",
        &"00".repeat(65),
        "--closing-signature",
        &"00".repeat(64),
    ]);
    assert_eq!(error["error"]["code"], "invalid_signature_length");
}

#[test]
fn huge_width_reports_error_instead_of_aborting() {
    let error = run_cli_failure(&["hash", "[1, 1099511627776]"]);
    assert_eq!(error["error"]["code"], "invalid_width");
}

#[test]
fn malformed_operand_is_rejected() {
    let error = run_cli_failure(&["hash", "[5, 32"]);
    assert_eq!(error["error"]["code"], "unsupported_type");
}

#[test]
fn wide_unsized_decimal_is_hashed() {
    let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
    let output = run_cli(&["hash", max]);
    assert_eq!(output["packed"], "ff".repeat(32));
}
