//! src/headers/canonical.rs
//!
//! Canonical header digest.
//!
//! Design notes:
//! - Exactly four fields, in the fixed order From, To, Subject, Date.
//! - Absent fields are empty strings; every field is whitespace-trimmed, where
//!   whitespace also covers the separators U+001C..=U+001F.
//! - Fields are concatenated with no delimiter and hashed with SHA-256.
//! - Headers outside the fixed set never reach the digest.

use crate::crypto::digest::{sha256_concat, HeaderDigest};
use crate::headers::types::MailHeaders;

fn is_trimmed(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn trim_field(field: &str) -> &str {
    field.trim_matches(is_trimmed)
}

/// Canonical byte input for the digest (trimmed fields, no delimiter).
pub fn canonical_bytes(headers: &MailHeaders) -> Vec<u8> {
    headers
        .signed_fields()
        .iter()
        .flat_map(|field| trim_field(field).as_bytes())
        .copied()
        .collect()
}

/// Digest the signed header set.
#[inline]
pub fn canonicalize(headers: &MailHeaders) -> HeaderDigest {
    let fields = headers.signed_fields();
    HeaderDigest::from_bytes(sha256_concat(fields.iter().map(|f| trim_field(f).as_bytes())))
}
