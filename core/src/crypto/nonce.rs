//! crypto/nonce.rs
//! Random 96-bit nonces for AES-256-GCM.
//!
//! Every encryption draws a fresh nonce from the OS CSPRNG. The session key is
//! itself single-use, so a (key, nonce) pair can never repeat.

use rand::{rngs::OsRng, RngCore};

use crate::crypto::types::{CryptoError, NONCE_LEN_12};

/// Draw a fresh 12-byte nonce from the operating system RNG.
#[inline]
pub fn generate_nonce_12() -> [u8; NONCE_LEN_12] {
    let mut nonce = [0u8; NONCE_LEN_12];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Convert a decoded byte slice into a nonce, rejecting any other length.
#[inline]
pub fn nonce_from_slice(bytes: &[u8]) -> Result<[u8; NONCE_LEN_12], CryptoError> {
    bytes.try_into().map_err(|_| CryptoError::InvalidNonceLen {
        expected: NONCE_LEN_12,
        actual: bytes.len(),
    })
}
