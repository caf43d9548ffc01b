//! Cryptographic Primitives
//!
//! secp256k1 + Keccak-256, matching the chain the channel contract runs on:
//! - **address**: 20-byte addresses, case-insensitive comparison
//! - **keys**: private keys and key generation
//! - **hasher**: packed encoding of typed values and hashing
//! - **signer**: recoverable signatures over digests, signer recovery
//!
//! Hex conventions: addresses carry a `0x` prefix; private keys, digests
//! and signatures do not.

pub mod address;
pub mod hasher;
pub mod keys;
pub mod signer;

pub use address::{equal_addresses, public_key_to_address, Address, ADDRESS_LENGTH};
pub use hasher::{
    encode_packed, hash, hash_hex, keccak256, parse_decimal, Digest, Integer, TypedValue,
    DEFAULT_INT_BITS, MAX_INT_BITS,
};
pub use keys::{
    generate_private_key, private_key_hex_to_address, private_key_to_address, PrivateKey,
};
pub use signer::{
    normalize_recovery_id, recover_address, recover_public_key, sign, sign_slice, sign_with,
    Signature, LEGACY_V_OFFSET, SIGNATURE_LENGTH,
};
