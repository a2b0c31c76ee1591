//! crypto/signing.rs
//! RSA-PSS signatures binding the header digest to the ciphertext.
//!
//! Signing payload (canonical):
//!
//! ```text
//! digest_len      (u64 BE)
//! digest          (digest_len bytes)
//! ciphertext_len  (u64 BE)
//! ciphertext      (ciphertext_len bytes)
//! ```
//!
//! Length prefixes keep the (digest, ciphertext) split unambiguous no matter
//! which bytes the ciphertext contains. The payload is hashed with SHA-256 and
//! signed with PSS (MGF1-SHA-256, salt length 32).

use rand::rngs::OsRng;
use rsa::{Pss, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::crypto::digest::{sha256_concat, HeaderDigest};
use crate::crypto::types::CryptoError;

/// Build the exact byte sequence covered by the signature.
pub fn signing_payload(digest: &HeaderDigest, ciphertext: &[u8]) -> Vec<u8> {
    let digest = digest.as_ref();
    let mut out = Vec::with_capacity(16 + digest.len() + ciphertext.len());

    out.extend_from_slice(&(digest.len() as u64).to_be_bytes());
    out.extend_from_slice(digest);
    out.extend_from_slice(&(ciphertext.len() as u64).to_be_bytes());
    out.extend_from_slice(ciphertext);

    out
}

fn payload_hash(digest: &HeaderDigest, ciphertext: &[u8]) -> [u8; 32] {
    let payload = signing_payload(digest, ciphertext);
    sha256_concat([payload.as_slice()])
}

/// Sign (header digest, ciphertext) with the sender's private key.
pub fn sign(
    digest: &HeaderDigest,
    ciphertext: &[u8],
    sender: &RsaPrivateKey,
) -> Result<Vec<u8>, CryptoError> {
    let hashed = payload_hash(digest, ciphertext);

    sender
        .sign_with_rng(&mut OsRng, Pss::new_blinded::<Sha256>(), &hashed)
        .map_err(|e| CryptoError::Signing(e.to_string()))
}

/// Verify a signature over (header digest, ciphertext).
///
/// Fails closed: a malformed signature, the wrong key or a mismatched payload
/// all return `false`.
pub fn verify(
    digest: &HeaderDigest,
    ciphertext: &[u8],
    signature: &[u8],
    sender: &RsaPublicKey,
) -> bool {
    let hashed = payload_hash(digest, ciphertext);

    sender
        .verify(Pss::new::<Sha256>(), &hashed, signature)
        .is_ok()
}
