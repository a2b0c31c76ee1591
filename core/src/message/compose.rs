//! message/compose.rs
//! Compose path: canonicalize → encrypt → sign.

use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::debug;

use crate::crypto::{encrypt, sign, CryptoError};
use crate::headers::{canonicalize, MailHeaders};
use crate::message::types::{MessageState, SignedMessage};

/// Encrypt `body` for `receiver` and sign the result with `sender`.
///
/// The header digest is taken before encryption so the signature binds exactly
/// the headers the caller handed in.
pub fn compose(
    headers: MailHeaders,
    body: &[u8],
    sender_key_ref: impl Into<String>,
    sender: &RsaPrivateKey,
    receiver: &RsaPublicKey,
) -> Result<SignedMessage, CryptoError> {
    let sender_key_ref = sender_key_ref.into();
    let digest = canonicalize(&headers);

    let envelope = encrypt(body, receiver)?;
    debug!(state = ?MessageState::Composed, digest = %digest, ciphertext_len = envelope.ciphertext.len());

    let signature = sign(&digest, &envelope.ciphertext, sender)?;
    debug!(state = ?MessageState::Signed, key_ref = %sender_key_ref);

    Ok(SignedMessage {
        headers,
        envelope,
        signature,
        sender_key_ref,
    })
}
