//! codec/decode.rs
//!
//! JSON bytes → `SignedMessage`.
//!
//! Every structural problem is reported here, before any key is loaded or any
//! crypto runs: missing fields, bad base64, a nonce that is not 12 bytes, an
//! unknown wire version.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::codec::types::{fields, FormatError, WireEnvelope, WireHeaders, WireMessage};
use crate::constants::{NONCE_LEN_12, WIRE_VERSION};
use crate::crypto::Envelope;
use crate::headers::MailHeaders;
use crate::message::SignedMessage;

/// Parse and validate a serialized message.
pub fn deserialize(bytes: &[u8]) -> Result<SignedMessage, FormatError> {
    let wire: WireMessage = serde_json::from_slice(bytes)?;

    let version = required(wire.version, fields::VERSION)?;
    if version != WIRE_VERSION {
        return Err(FormatError::UnsupportedVersion(version));
    }

    let headers = decode_headers(required(wire.headers, fields::HEADERS)?)?;
    let envelope = decode_envelope(required(wire.envelope, fields::ENVELOPE)?)?;
    let signature = decode_b64(required(wire.signature, fields::SIGNATURE)?, fields::SIGNATURE)?;
    let sender_key_ref = required(wire.sender_key_ref, fields::SENDER_KEY_REF)?;

    Ok(SignedMessage {
        headers,
        envelope,
        signature,
        sender_key_ref,
    })
}

#[inline]
fn required<T>(value: Option<T>, field: &'static str) -> Result<T, FormatError> {
    value.ok_or(FormatError::MissingField(field))
}

fn decode_b64(value: String, field: &'static str) -> Result<Vec<u8>, FormatError> {
    STANDARD
        .decode(value.as_bytes())
        .map_err(|_| FormatError::InvalidBase64 { field })
}

fn decode_headers(wire: WireHeaders) -> Result<MailHeaders, FormatError> {
    let mut headers = MailHeaders::new(
        required(wire.from, fields::FROM)?,
        required(wire.to, fields::TO)?,
        required(wire.subject, fields::SUBJECT)?,
        required(wire.date, fields::DATE)?,
    );
    for (name, value) in wire.extra {
        headers.insert_extra(name, value);
    }
    Ok(headers)
}

fn decode_envelope(wire: WireEnvelope) -> Result<Envelope, FormatError> {
    let wrapped_key = decode_b64(required(wire.wrapped_key, fields::WRAPPED_KEY)?, fields::WRAPPED_KEY)?;
    let nonce_bytes = decode_b64(required(wire.nonce, fields::NONCE)?, fields::NONCE)?;
    let ciphertext = decode_b64(required(wire.ciphertext, fields::CIPHERTEXT)?, fields::CIPHERTEXT)?;

    let nonce: [u8; NONCE_LEN_12] =
        nonce_bytes
            .as_slice()
            .try_into()
            .map_err(|_| FormatError::InvalidLength {
                field: fields::NONCE,
                expected: NONCE_LEN_12,
                actual: nonce_bytes.len(),
            })?;

    Ok(Envelope {
        wrapped_key,
        nonce,
        ciphertext,
    })
}
