//! codec/encode.rs
//!
//! `SignedMessage` → JSON bytes.
//!
//! Design notes:
//! - Output is deterministic: fixed field order, extra headers sorted by name.
//! - Binary fields use standard base64 with padding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::codec::types::{FormatError, WireEnvelope, WireHeaders, WireMessage};
use crate::constants::WIRE_VERSION;
use crate::message::SignedMessage;

/// Serialize a signed message for storage or transport.
pub fn serialize(message: &SignedMessage) -> Result<Vec<u8>, FormatError> {
    let headers = &message.headers;
    let envelope = &message.envelope;

    let wire = WireMessage {
        version: Some(WIRE_VERSION),
        headers: Some(WireHeaders {
            from: Some(headers.from.clone()),
            to: Some(headers.to.clone()),
            subject: Some(headers.subject.clone()),
            date: Some(headers.date.clone()),
            extra: headers.extra().clone(),
        }),
        envelope: Some(WireEnvelope {
            wrapped_key: Some(STANDARD.encode(&envelope.wrapped_key)),
            nonce: Some(STANDARD.encode(envelope.nonce)),
            ciphertext: Some(STANDARD.encode(&envelope.ciphertext)),
        }),
        signature: Some(STANDARD.encode(&message.signature)),
        sender_key_ref: Some(message.sender_key_ref.clone()),
    };

    serde_json::to_vec_pretty(&wire).map_err(|e| FormatError::Encode(e.to_string()))
}
