//! headers/mod.rs
//! Message headers and their canonical digest.
//!
//! - The digest covers From, To, Subject and Date only; that fixed set is the
//!   whole integrity scope of the signature over headers.
//! - Additional headers are carried but unsigned.

pub mod types;
pub mod canonical;

pub use types::*;
pub use canonical::*;
