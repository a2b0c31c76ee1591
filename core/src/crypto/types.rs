use thiserror::Error;

pub use crate::constants::{DIGEST_LEN, KEY_LEN_32, NONCE_LEN_12, TAG_LEN};

/// Cryptographic failures on the envelope path.
///
/// `Decryption` is deliberately a unit variant: key-unwrap failures and AEAD tag
/// failures collapse into it so callers cannot tell them apart.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key unwrap or tag verification failed.
    #[error("decryption failed")]
    Decryption,

    /// Wrapping the session key or sealing the body failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Producing the PSS signature failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Nonce length mismatch (must be 12 bytes).
    #[error("invalid nonce length: expected={expected}, actual={actual}")]
    InvalidNonceLen { expected: usize, actual: usize },

    /// Session key length mismatch (must be 32 bytes).
    #[error("invalid key length: expected={expected}, actual={actual}")]
    InvalidKeyLen { expected: usize, actual: usize },
}
