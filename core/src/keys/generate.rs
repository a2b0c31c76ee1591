//! keys/generate.rs
//! RSA key pair generation (public exponent 65537).

use rand::rngs::OsRng;
use rsa::RsaPrivateKey;
use tracing::info;

use crate::constants::{MAX_RSA_BITS, MIN_RSA_BITS};
use crate::keys::types::{KeyError, KeyPair};

/// Validate a requested modulus size before any expensive work.
#[inline]
pub fn validate_key_size(bits: usize) -> Result<(), KeyError> {
    if !(MIN_RSA_BITS..=MAX_RSA_BITS).contains(&bits) {
        return Err(KeyError::UnsupportedKeySize {
            bits,
            min: MIN_RSA_BITS,
            max: MAX_RSA_BITS,
        });
    }
    Ok(())
}

/// Generate a fresh key pair from the OS RNG.
///
/// This is the one expensive operation in the crate; bulk callers should go
/// through [`crate::keys::KeygenPool`] instead of calling it inline.
pub fn generate_keypair(bits: usize) -> Result<KeyPair, KeyError> {
    validate_key_size(bits)?;

    let started = std::time::Instant::now();
    let private =
        RsaPrivateKey::new(&mut OsRng, bits).map_err(|e| KeyError::Generation(e.to_string()))?;

    info!(bits, elapsed_ms = started.elapsed().as_millis() as u64, "generated RSA key pair");
    Ok(KeyPair::from_private(private))
}
