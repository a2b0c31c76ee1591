//! crypto/envelope.rs
//! Hybrid encryption of message bodies.
//!
//! Layout of an [`Envelope`]:
//!
//! ```text
//! wrapped_key : RSA-OAEP(SHA-256, MGF1-SHA-256, no label)(session_key)
//! nonce       : 12 random bytes
//! ciphertext  : AES-256-GCM(session_key, nonce, aad = none)(body) || tag(16)
//! ```
//!
//! Contract:
//! - The session key is generated per call and dropped (zeroized) on return.
//! - Unwrap failure and tag failure both yield `CryptoError::Decryption`. An
//!   unwrap failure still runs the AEAD open under a throwaway key so the two
//!   failure branches do comparable work.

use rand::rngs::OsRng;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::crypto::aead::{self, SessionKey};
use crate::crypto::nonce::generate_nonce_12;
use crate::crypto::types::{CryptoError, NONCE_LEN_12};

/// Hybrid-encrypted payload, independent of headers and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub wrapped_key: Vec<u8>,
    pub nonce: [u8; NONCE_LEN_12],
    pub ciphertext: Vec<u8>,
}

fn oaep() -> Oaep {
    Oaep::new::<Sha256>()
}

/// Encrypt `plaintext` for the holder of `recipient`'s private key.
pub fn encrypt(plaintext: &[u8], recipient: &RsaPublicKey) -> Result<Envelope, CryptoError> {
    let session_key = SessionKey::generate();
    let nonce = generate_nonce_12();

    let ciphertext = aead::seal(&session_key, &nonce, plaintext)?;

    let wrapped_key = recipient
        .encrypt(&mut OsRng, oaep(), session_key.as_bytes())
        .map_err(|e| CryptoError::Encryption(format!("key wrap failed: {e}")))?;

    Ok(Envelope {
        wrapped_key,
        nonce,
        ciphertext,
    })
}

/// Recover the plaintext of `envelope` with the recipient's private key.
///
/// Returns plaintext only when both the unwrap and the tag check succeed.
pub fn decrypt(envelope: &Envelope, recipient: &RsaPrivateKey) -> Result<Vec<u8>, CryptoError> {
    let unwrapped = recipient
        .decrypt_blinded(&mut OsRng, oaep(), &envelope.wrapped_key)
        .ok()
        .map(Zeroizing::new)
        .and_then(|bytes| SessionKey::from_slice(&bytes).ok());

    let unwrap_ok = unwrapped.is_some();
    let session_key = unwrapped.unwrap_or_else(SessionKey::generate);

    let opened = aead::open(&session_key, &envelope.nonce, &envelope.ciphertext);

    match opened {
        Ok(plaintext) if unwrap_ok => Ok(plaintext),
        _ => Err(CryptoError::Decryption),
    }
}
