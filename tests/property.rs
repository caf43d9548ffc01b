use micropay_crypto::crypto::{
    self, equal_addresses, keccak256, recover_address, sign, Address, Digest, Integer, PrivateKey,
    TypedValue,
};
use micropay_crypto::{channel, CryptoError, U256};
use proptest::prelude::*;
use secp256k1::SecretKey;

fn any_private_key() -> impl Strategy<Value = PrivateKey> {
    prop::array::uniform32(any::<u8>()).prop_filter_map("valid secp256k1 scalar", |bytes| {
        SecretKey::from_slice(&bytes).ok().map(PrivateKey::from)
    })
}

fn any_address() -> impl Strategy<Value = Address> {
    prop::array::uniform20(any::<u8>()).prop_map(Address::new)
}

fn any_digest() -> impl Strategy<Value = Digest> {
    prop::array::uniform32(any::<u8>()).prop_map(Digest::new)
}

fn any_balance() -> impl Strategy<Value = U256> {
    prop::array::uniform24(any::<u8>()).prop_map(|bytes| U256::from_big_endian(&bytes))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sign_then_recover_yields_signer(key in any_private_key(), digest in any_digest()) {
        let signature = sign(&key, &digest);
        prop_assert_eq!(recover_address(signature.as_ref(), &digest).unwrap(), key.address());
    }

    #[test]
    fn legacy_recovery_byte_recovers_same_address(key in any_private_key(), digest in any_digest()) {
        let signature = sign(&key, &digest);
        let mut legacy = *signature.as_bytes();
        legacy[64] += 27;

        prop_assert_eq!(
            recover_address(&legacy, &digest).unwrap(),
            recover_address(signature.as_ref(), &digest).unwrap()
        );
    }

    #[test]
    fn address_comparison_ignores_case_and_prefix(address in any_address()) {
        let text = address.to_hex();
        prop_assert!(equal_addresses(&text, &text.to_uppercase()));
        prop_assert!(equal_addresses(&text, text.trim_start_matches("0x")));
        prop_assert!(equal_addresses(&text, &address.to_checksum()));
    }

    #[test]
    fn balance_proof_roundtrip(
        key in any_private_key(),
        receiver in any_address(),
        contract in any_address(),
        block in any::<u32>(),
        balance in any_balance(),
    ) {
        let signature = channel::sign_balance_proof(&key, &receiver, block, balance, &contract).unwrap();
        let signer = channel::verify_balance_proof(&receiver, block, balance, signature.as_ref(), &contract).unwrap();
        prop_assert_eq!(signer, key.address());
    }

    #[test]
    fn closing_roundtrip(key in any_private_key(), bsig in prop::collection::vec(any::<u8>(), 65)) {
        let closing = channel::sign_close(&key, &bsig);
        prop_assert_eq!(channel::verify_closing_signature(&bsig, closing.as_ref()).unwrap(), key.address());
    }

    #[test]
    fn sized_unsigned_is_exact_width(value in any::<u64>(), bytes in 8usize..=32) {
        let encoded = Integer::from(value).encode(bytes * 8).unwrap();
        prop_assert_eq!(encoded.len(), bytes);

        let mut expected = vec![0u8; bytes - 8];
        expected.extend_from_slice(&value.to_be_bytes());
        prop_assert_eq!(encoded, expected);
    }

    #[test]
    fn sized_negative_is_twos_complement(value in i64::MIN..0i64) {
        let encoded = Integer::from(value).encode(64).unwrap();
        prop_assert_eq!(encoded, value.to_be_bytes().to_vec());
    }

    #[test]
    fn widths_not_multiple_of_eight_rejected(bits in 1usize..512) {
        prop_assume!(bits % 8 != 0);
        prop_assert_eq!(
            crypto::hash(&[TypedValue::uint(1u8, bits)]).unwrap_err(),
            CryptoError::InvalidWidth(bits)
        );
    }

    #[test]
    fn widths_above_256_rejected(bits in 257usize..=(1usize << 48)) {
        prop_assert_eq!(
            Integer::from(1u8).encode(bits).unwrap_err(),
            CryptoError::InvalidWidth(bits)
        );
    }

    #[test]
    fn packed_hash_is_keccak_of_concatenation(
        a in prop::collection::vec(any::<u8>(), 0..64),
        text in "[a-z]{0,16}",
        n in any::<u32>(),
    ) {
        let digest = crypto::hash(&[
            TypedValue::Bytes(a.clone()),
            TypedValue::Text(text.clone()),
            TypedValue::uint(n, 32),
        ]).unwrap();

        let mut message = a;
        message.extend_from_slice(text.as_bytes());
        message.extend_from_slice(&n.to_be_bytes());
        prop_assert_eq!(digest.as_bytes(), &keccak256(&message));
    }
}

#[test]
fn empty_hash_matches_keccak_of_nothing() {
    assert_eq!(
        crypto::hash_hex(&[]).unwrap(),
        "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
    );
}

#[test]
fn sized_integer_examples() {
    assert_eq!(Integer::from(-1i32).encode(8).unwrap(), vec![0xff]);
    assert_eq!(Integer::from(5u32).encode(32).unwrap(), vec![0x00, 0x00, 0x00, 0x05]);
}

#[test]
fn short_signature_rejected() {
    let digest = Digest::new(keccak256(b"x"));
    assert_eq!(
        recover_address(&[0u8; 64], &digest).unwrap_err(),
        CryptoError::InvalidSignatureLength(64)
    );
}
