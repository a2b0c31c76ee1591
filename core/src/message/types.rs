use std::fmt;

use crate::codec::FormatError;
use crate::crypto::Envelope;
use crate::headers::MailHeaders;
use crate::types::EnvelopeError;

/// Headers + envelope + signature + sender key reference.
///
/// Terminal artifact of the compose path and sole input of the verify path.
/// Carries no private key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedMessage {
    pub headers: MailHeaders,
    pub envelope: Envelope,
    pub signature: Vec<u8>,
    pub sender_key_ref: String,
}

/// Why a message was rejected. Each stage reports exactly one reason and never
/// which sub-step inside it failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RejectReason {
    Malformed,
    Revoked,
    BadSignature,
    DecryptFailure,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::Malformed => "malformed",
            RejectReason::Revoked => "revoked",
            RejectReason::BadSignature => "bad-signature",
            RejectReason::DecryptFailure => "decrypt-failure",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message lifecycle.
///
/// ```text
/// Composed → Signed → Persisted → Received → RevocationChecked
///          → SignatureVerified → Decrypted → Accepted
/// ```
///
/// `Rejected` is reachable after deserialize (malformed), RevocationChecked
/// (revoked), SignatureVerified (bad-signature) and Decrypted (decrypt-failure).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MessageState {
    Composed,
    Signed,
    Persisted,
    Received,
    RevocationChecked,
    SignatureVerified,
    Decrypted,
    Accepted,
    Rejected(RejectReason),
}

impl MessageState {
    pub fn is_terminal(self) -> bool {
        matches!(self, MessageState::Accepted | MessageState::Rejected(_))
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: MessageState) -> bool {
        use MessageState::*;
        match (self, next) {
            (Composed, Signed)
            | (Signed, Persisted)
            | (Persisted, Received)
            | (Received, RevocationChecked)
            | (Received, Rejected(RejectReason::Malformed))
            | (RevocationChecked, SignatureVerified)
            | (RevocationChecked, Rejected(RejectReason::Revoked))
            | (SignatureVerified, Decrypted)
            | (SignatureVerified, Rejected(RejectReason::BadSignature))
            | (Decrypted, Accepted)
            | (Decrypted, Rejected(RejectReason::DecryptFailure)) => true,
            _ => false,
        }
    }
}

/// Plaintext released after every check passed.
#[derive(Clone, PartialEq, Eq)]
pub struct OpenedMessage {
    pub headers: MailHeaders,
    pub plaintext: Vec<u8>,
    pub sender_key_ref: String,
}

impl OpenedMessage {
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.plaintext).ok()
    }
}

impl fmt::Debug for OpenedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenedMessage")
            .field("headers", &self.headers)
            .field("plaintext_len", &self.plaintext.len())
            .field("sender_key_ref", &self.sender_key_ref)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted(OpenedMessage),
    Rejected(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Verdict::Accepted(_) => None,
            Verdict::Rejected(reason) => Some(*reason),
        }
    }

    /// Short status string for callers rendering a result ("ok" or the reason).
    pub fn status(&self) -> &'static str {
        match self {
            Verdict::Accepted(_) => "ok",
            Verdict::Rejected(reason) => reason.as_str(),
        }
    }
}

/// Outcome of the verify path plus every lifecycle state it visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub verdict: Verdict,
    pub trail: Vec<MessageState>,
    /// Key reference the message claimed; `None` when it never decoded.
    pub sender_key_ref: Option<String>,
    /// Decoding failure behind a `Malformed` verdict.
    pub format_error: Option<FormatError>,
}

impl VerifyReport {
    pub fn visited(&self, state: MessageState) -> bool {
        self.trail.contains(&state)
    }

    pub fn final_state(&self) -> Option<MessageState> {
        self.trail.last().copied()
    }

    /// Collapse the report into the error taxonomy: revoked senders become
    /// `RevokedKey`, malformed input its `FormatError`, anything else `Rejected`.
    pub fn into_result(self) -> Result<OpenedMessage, EnvelopeError> {
        match self.verdict {
            Verdict::Accepted(opened) => Ok(opened),
            Verdict::Rejected(RejectReason::Revoked) => Err(EnvelopeError::RevokedKey {
                key_ref: self.sender_key_ref.unwrap_or_default(),
            }),
            Verdict::Rejected(RejectReason::Malformed) => match self.format_error {
                Some(e) => Err(EnvelopeError::Format(e)),
                None => Err(EnvelopeError::Rejected(RejectReason::Malformed)),
            },
            Verdict::Rejected(reason) => Err(EnvelopeError::Rejected(reason)),
        }
    }
}
