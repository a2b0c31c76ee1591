//! envelope-core
//!
//! Signed hybrid message envelopes: RSA-OAEP key wrap, AES-256-GCM bodies,
//! RSA-PSS signatures binding the canonical headers to the ciphertext, and a
//! revocation gate in front of verification.
//! No Python, no PyO3, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod config;

// Primitives
pub mod crypto;
pub mod headers;
pub mod keys;
pub mod revocation;

// Messages
pub mod codec;
pub mod message;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::codec::{deserialize, serialize, FormatError};
    pub use crate::config::{ConfigError, EnvelopeConfig};
    pub use crate::crypto::{decrypt, encrypt, CryptoError, Envelope, HeaderDigest};
    pub use crate::headers::{canonicalize, MailHeaders};
    pub use crate::keys::{
        generate_keypair, resolve_identity, CancelToken, Identity, KeyError, KeyLayout, KeyPair,
        KeyRole, KeyStore, KeygenPool,
    };
    pub use crate::message::{
        compose, open_bytes, open_message, verify_signature, Mailbox, MessageState, OpenedMessage,
        RejectReason, SignedMessage, Verdict, VerifyReport,
    };
    pub use crate::revocation::{RevocationChecker, RevocationList, RevocationPolicy, RevocationSnapshot};
    pub use crate::types::EnvelopeError;
}
