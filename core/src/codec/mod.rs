//! codec/mod.rs
//! JSON wire format for signed messages.
//!
//! ```json
//! {
//!   "version": 1,
//!   "headers": { "From": "...", "To": "...", "Subject": "...", "Date": "...", "X-Extra": "..." },
//!   "envelope": { "wrapped_key": "<b64>", "nonce": "<b64, 12 bytes>", "ciphertext": "<b64>" },
//!   "signature": "<b64>",
//!   "sender_key_ref": "alice_pub.pem"
//! }
//! ```

pub mod types;
pub mod encode;
pub mod decode;

pub use types::FormatError;
pub use encode::serialize;
pub use decode::deserialize;
