//! message/verify.rs
//! Verify path: deserialize → revocation → signature → decrypt.
//!
//! Rules:
//! - Revocation is checked first and short-circuits; a revoked sender is
//!   rejected even when the signature and decryption would succeed.
//! - Plaintext is released only after the signature verifies AND the AEAD tag checks.
//! - A rejection names the failed stage only, never the step inside it.
//! - Problems with local key material (missing file, unreadable PEM) are errors,
//!   not verdicts.

use std::collections::BTreeMap;
use std::sync::Arc;

use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::{debug, warn};

use crate::codec::{deserialize, FormatError};
use crate::crypto::{self, decrypt};
use crate::headers::canonicalize;
use crate::keys::{KeyError, KeyStore};
use crate::message::types::{
    MessageState, OpenedMessage, RejectReason, SignedMessage, Verdict, VerifyReport,
};
use crate::revocation::RevocationChecker;
use crate::types::EnvelopeError;

/// Source of sender public keys, addressed by the key reference in a message.
pub trait SenderKeys {
    fn sender_public_key(&self, key_ref: &str) -> Result<Arc<RsaPublicKey>, KeyError>;
}

impl SenderKeys for KeyStore {
    fn sender_public_key(&self, key_ref: &str) -> Result<Arc<RsaPublicKey>, KeyError> {
        self.public_key_by_ref(key_ref)
    }
}

impl SenderKeys for BTreeMap<String, Arc<RsaPublicKey>> {
    fn sender_public_key(&self, key_ref: &str) -> Result<Arc<RsaPublicKey>, KeyError> {
        self.get(key_ref).cloned().ok_or_else(|| KeyError::NotFound {
            path: key_ref.into(),
        })
    }
}

/// Check the signature of `message` against `sender`.
pub fn verify_signature(message: &SignedMessage, sender: &RsaPublicKey) -> bool {
    let digest = canonicalize(&message.headers);
    crypto::verify(&digest, &message.envelope.ciphertext, &message.signature, sender)
}

/// Ordered record of visited states.
struct Trail(Vec<MessageState>);

impl Trail {
    fn received() -> Self {
        debug!(state = ?MessageState::Received);
        Self(vec![MessageState::Received])
    }

    fn advance(&mut self, next: MessageState) {
        if let Some(&current) = self.0.last() {
            debug_assert!(current.can_advance_to(next), "{current:?} -> {next:?}");
        }
        debug!(state = ?next);
        self.0.push(next);
    }

    fn reject(&mut self, reason: RejectReason) -> Verdict {
        self.advance(MessageState::Rejected(reason));
        Verdict::Rejected(reason)
    }

    fn into_report(self, verdict: Verdict, sender_key_ref: Option<String>) -> VerifyReport {
        VerifyReport {
            verdict,
            trail: self.0,
            sender_key_ref,
            format_error: None,
        }
    }
}

/// Run the verify path over serialized bytes.
///
/// Bytes that do not decode are rejected as `Malformed` before any key is touched.
pub fn open_bytes<K>(
    bytes: &[u8],
    revocation: &RevocationChecker,
    keys: &K,
    receiver: &RsaPrivateKey,
) -> Result<VerifyReport, EnvelopeError>
where
    K: SenderKeys + ?Sized,
{
    match deserialize(bytes) {
        Ok(message) => open_message(&message, revocation, keys, receiver),
        Err(e) => Ok(malformed(e)),
    }
}

/// Report for bytes that failed to decode.
pub fn malformed(error: FormatError) -> VerifyReport {
    let mut trail = Trail::received();
    warn!(error = %error, "rejected malformed message");
    let verdict = trail.reject(RejectReason::Malformed);

    let mut report = trail.into_report(verdict, None);
    report.format_error = Some(error);
    report
}

/// Run the verify path over an already decoded message.
pub fn open_message<K>(
    message: &SignedMessage,
    revocation: &RevocationChecker,
    keys: &K,
    receiver: &RsaPrivateKey,
) -> Result<VerifyReport, EnvelopeError>
where
    K: SenderKeys + ?Sized,
{
    let mut trail = Trail::received();
    let verdict = run_checks(message, revocation, keys, receiver, &mut trail)?;

    if let Verdict::Rejected(reason) = &verdict {
        warn!(reason = %reason, key_ref = %message.sender_key_ref, "rejected message");
    }
    Ok(trail.into_report(verdict, Some(message.sender_key_ref.clone())))
}

fn run_checks<K>(
    message: &SignedMessage,
    revocation: &RevocationChecker,
    keys: &K,
    receiver: &RsaPrivateKey,
    trail: &mut Trail,
) -> Result<Verdict, EnvelopeError>
where
    K: SenderKeys + ?Sized,
{
    let key_ref = message.sender_key_ref.as_str();

    trail.advance(MessageState::RevocationChecked);
    if revocation.is_revoked(key_ref) {
        return Ok(trail.reject(RejectReason::Revoked));
    }

    let sender = keys.sender_public_key(key_ref)?;

    trail.advance(MessageState::SignatureVerified);
    if !verify_signature(message, &sender) {
        return Ok(trail.reject(RejectReason::BadSignature));
    }

    trail.advance(MessageState::Decrypted);
    let plaintext = match decrypt(&message.envelope, receiver) {
        Ok(plaintext) => plaintext,
        Err(_) => return Ok(trail.reject(RejectReason::DecryptFailure)),
    };

    trail.advance(MessageState::Accepted);
    Ok(Verdict::Accepted(OpenedMessage {
        headers: message.headers.clone(),
        plaintext,
        sender_key_ref: message.sender_key_ref.clone(),
    }))
}
