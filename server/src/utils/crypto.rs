//! Cryptographic helpers for session signing and token comparison

use anyhow::{Result, bail};
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Length of the HS256 signing key in bytes
pub const SIGNING_KEY_LEN: usize = 32;

/// Fill a buffer of `len` bytes from the thread-local CSPRNG
pub fn generate_key(len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut key);
    key
}

/// Random hex token of `byte_len` bytes (so `2 * byte_len` chars)
pub fn generate_token(byte_len: usize) -> String {
    hex::encode(generate_key(byte_len))
}

/// Compare two secrets without leaking the position of the first mismatch
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Decode a stored signing key, rejecting anything that is not exactly 32 bytes of hex
pub fn decode_signing_key(encoded: &str) -> Result<Vec<u8>> {
    let key = hex::decode(encoded.trim())?;
    if key.len() != SIGNING_KEY_LEN {
        bail!(
            "Signing key must be {} bytes, got {}",
            SIGNING_KEY_LEN,
            key.len()
        );
    }
    Ok(key)
}

pub fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}
