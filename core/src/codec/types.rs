//! codec/types.rs
//! Wire records for the serialized message and the errors raised while reading them.
//!
//! Every field of the wire structs is optional on the way in, so a missing field
//! becomes a typed [`FormatError::MissingField`] instead of an opaque serde error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid JSON: {0}")]
    Json(String),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not valid base64")]
    InvalidBase64 { field: &'static str },

    #[error("field `{field}` has length {actual}, expected {expected}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported wire version {0}")]
    UnsupportedVersion(u8),

    #[error("encoding failed: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for FormatError {
    fn from(e: serde_json::Error) -> Self {
        FormatError::Json(e.to_string())
    }
}

/// Top-level JSON object. Field order here is the order on the wire.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct WireMessage {
    pub version: Option<u8>,
    pub headers: Option<WireHeaders>,
    pub envelope: Option<WireEnvelope>,
    pub signature: Option<String>,
    pub sender_key_ref: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct WireHeaders {
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "To")]
    pub to: Option<String>,
    #[serde(rename = "Subject")]
    pub subject: Option<String>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    /// Unsigned headers, emitted after the signed four in name order.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct WireEnvelope {
    pub wrapped_key: Option<String>,
    pub nonce: Option<String>,
    pub ciphertext: Option<String>,
}

/// Dotted field paths used in error reports.
pub(crate) mod fields {
    pub const VERSION: &str = "version";
    pub const HEADERS: &str = "headers";
    pub const ENVELOPE: &str = "envelope";
    pub const WRAPPED_KEY: &str = "envelope.wrapped_key";
    pub const NONCE: &str = "envelope.nonce";
    pub const CIPHERTEXT: &str = "envelope.ciphertext";
    pub const SIGNATURE: &str = "signature";
    pub const SENDER_KEY_REF: &str = "sender_key_ref";
    pub const FROM: &str = "headers.From";
    pub const TO: &str = "headers.To";
    pub const SUBJECT: &str = "headers.Subject";
    pub const DATE: &str = "headers.Date";
}

