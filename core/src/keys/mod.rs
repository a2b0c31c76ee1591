//! keys/mod.rs
//! Key material: generation, PEM persistence, identity resolution, caching.
//!
//! - One private and one public PEM file per identity (`<name>_priv.pem`,
//!   `<name>_pub.pem`).
//! - Resolution from identity to path is a pure function of the injected layout.
//! - Private keys never leave this module except as in-memory `RsaPrivateKey`s.

pub mod types;
pub mod cache;
pub mod generate;
pub mod layout;
pub mod pem;
pub mod pool;
pub mod store;

pub use types::*;
pub use cache::KeyCache;
pub use generate::*;
pub use layout::*;
pub use pem::*;
pub use pool::*;
pub use store::KeyStore;
