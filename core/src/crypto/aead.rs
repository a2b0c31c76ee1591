//! src/crypto/aead.rs
//! AES-256-GCM bulk cipher for message bodies.
//!
//! Design notes:
//! - 32-byte single-use session key, 12-byte nonce, no associated data.
//! - The 16-byte tag is appended to the ciphertext (`ciphertext || tag`).
//! - Tag verification is constant-time and fails closed (no partial plaintext).

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::types::{CryptoError, KEY_LEN_32, NONCE_LEN_12, TAG_LEN};

/// Per-message symmetric key. Wiped on drop and never serialized.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; KEY_LEN_32]);

impl SessionKey {
    /// Draw a fresh key from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN_32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Rebuild a key from unwrapped bytes; anything but 32 bytes is rejected.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; KEY_LEN_32] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLen {
            expected: KEY_LEN_32,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN_32] {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

fn cipher_for(key: &SessionKey) -> Aes256Gcm {
    Aes256Gcm::new(key.as_bytes().into())
}

/// AEAD seal (encrypt) `plaintext`. Empty plaintexts are allowed and yield a bare tag.
pub fn seal(
    key: &SessionKey,
    nonce: &[u8; NONCE_LEN_12],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    cipher_for(key)
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::Encryption("AES-GCM seal failed".into()))
}

/// AEAD open (decrypt) `ciphertext || tag`.
pub fn open(
    key: &SessionKey,
    nonce: &[u8; NONCE_LEN_12],
    ciphertext_and_tag: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if ciphertext_and_tag.len() < TAG_LEN {
        return Err(CryptoError::Decryption);
    }

    cipher_for(key)
        .decrypt(Nonce::from_slice(nonce), ciphertext_and_tag)
        .map_err(|_| CryptoError::Decryption)
}
