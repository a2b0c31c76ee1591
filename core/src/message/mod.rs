//! message/mod.rs
//! Signed messages and their lifecycle.
//!
//! - compose: canonicalize headers, encrypt the body, sign (digest, ciphertext).
//! - verify: decode, revocation, signature, decrypt, in that order.
//! - mailbox: the identity-level API over all of the above.

pub mod types;
pub mod compose;
pub mod verify;
pub mod mailbox;

pub use types::*;
pub use compose::compose;
pub use verify::{malformed, open_bytes, open_message, verify_signature, SenderKeys};
pub use mailbox::Mailbox;
