pub mod types;
pub mod aead;
pub mod digest;
pub mod envelope;
pub mod nonce;
pub mod signing;

pub use types::*;
pub use aead::SessionKey;
pub use digest::*;
pub use envelope::{decrypt, encrypt, Envelope};
pub use nonce::*;
pub use signing::{sign, signing_payload, verify};
