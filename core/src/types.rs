use thiserror::Error;

use crate::{
    codec::FormatError,
    config::ConfigError,
    crypto::CryptoError,
    keys::KeyError,
    message::RejectReason,
    revocation::RevocationError,
};

/// Unified error covering key material, crypto, wire format, revocation and config.
/// - `From<T>` impls let `?` cross module boundaries.
/// - Crypto failures stay undifferentiated; callers only ever see `Decryption`.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Key generation, loading or resolution failure.
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    /// Encryption, decryption or signing failure.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Malformed serialized message.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Revocation list could not be parsed.
    #[error("revocation error: {0}")]
    Revocation(#[from] RevocationError),

    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The sender's key appears on the revocation list.
    #[error("sender key {key_ref:?} is revoked")]
    RevokedKey { key_ref: String },

    /// Message failed verification (bad signature or failed decryption).
    #[error("message rejected: {0}")]
    Rejected(RejectReason),
}

impl EnvelopeError {
    /// True when the failure is the undifferentiated decryption error, whether it came
    /// from a bad passphrase, a failed key unwrap or a failed tag check.
    pub fn is_decryption(&self) -> bool {
        matches!(
            self,
            EnvelopeError::Crypto(CryptoError::Decryption)
                | EnvelopeError::Key(KeyError::Decryption { .. })
                | EnvelopeError::Rejected(RejectReason::DecryptFailure)
        )
    }
}
