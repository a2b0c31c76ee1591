use std::io;
use std::path::PathBuf;

use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use thiserror::Error;

/// Key material failures. Loading errors stay typed and are never swallowed.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Requested modulus is below the minimum (or above the sanity bound).
    #[error("unsupported key size: {bits} bits (allowed {min}..={max})")]
    UnsupportedKeySize { bits: usize, min: usize, max: usize },

    /// No key file at the resolved location.
    #[error("key not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// File exists but does not hold a valid key.
    #[error("invalid key format in {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// Encrypted private key with a wrong or missing passphrase.
    #[error("cannot decrypt private key {}", path.display())]
    Decryption { path: PathBuf },

    /// Identity name or key reference that would escape the key directory.
    #[error("invalid identity {0:?}")]
    InvalidIdentity(String),

    /// Filesystem failure other than "not found".
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// RNG or prime search failure while generating a key pair.
    #[error("key generation failed: {0}")]
    Generation(String),

    /// Batch generation was cancelled before this key pair started.
    #[error("key generation cancelled")]
    Cancelled,
}

impl KeyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            KeyError::NotFound { path }
        } else {
            KeyError::Io { path, source }
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        KeyError::Format {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Which party a key belongs to and which half the operation needs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyRole {
    /// Sender's private key, used to sign on compose.
    SenderPrivate,
    /// Sender's public key, used to verify on open.
    SenderPublic,
    /// Receiver's public key, used to wrap the session key on compose.
    ReceiverPublic,
    /// Receiver's private key, used to unwrap on open.
    ReceiverPrivate,
}

impl KeyRole {
    pub fn is_private(self) -> bool {
        matches!(self, KeyRole::SenderPrivate | KeyRole::ReceiverPrivate)
    }
}

/// RSA key pair for one identity. The private half stays in process memory.
#[derive(Clone)]
pub struct KeyPair {
    pub private: RsaPrivateKey,
    pub public: RsaPublicKey,
}

impl KeyPair {
    pub fn from_private(private: RsaPrivateKey) -> Self {
        let public = private.to_public_key();
        Self { private, public }
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.public.size() * 8
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

/// A named party whose key files exist in the key directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub bits: usize,
}
