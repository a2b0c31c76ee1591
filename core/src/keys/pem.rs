//! keys/pem.rs
//! PEM persistence for RSA keys.
//!
//! Formats written:
//! - private, no passphrase : `PRIVATE KEY` (PKCS#8, unencrypted)
//! - private, passphrase    : `ENCRYPTED PRIVATE KEY` (PKCS#8 PBES2, scrypt + AES-256-CBC)
//! - public                 : `PUBLIC KEY` (SubjectPublicKeyInfo)
//!
//! Formats read: the above plus legacy PKCS#1 `RSA PRIVATE KEY` / `RSA PUBLIC KEY`.
//! Encrypted PKCS#1 (`Proc-Type` headers) is not supported and reads as a format error.
//!
//! An empty passphrase is treated as no passphrase.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use pkcs8::der::{Document, SecretDocument};
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, EncryptedPrivateKeyInfo, LineEnding};
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::{debug, warn};

use crate::keys::types::KeyError;

mod labels {
    pub const PRIVATE_PKCS8: &str = "PRIVATE KEY";
    pub const PRIVATE_PKCS8_ENCRYPTED: &str = "ENCRYPTED PRIVATE KEY";
    pub const PRIVATE_PKCS1: &str = "RSA PRIVATE KEY";
    pub const PUBLIC_SPKI: &str = "PUBLIC KEY";
    pub const PUBLIC_PKCS1: &str = "RSA PUBLIC KEY";
}

fn effective(passphrase: Option<&str>) -> Option<&str> {
    passphrase.filter(|p| !p.is_empty())
}

fn write_key_file(path: &Path, contents: &[u8], private: bool) -> Result<(), KeyError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    if private {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    #[cfg(not(unix))]
    let _ = private;

    let mut file = options.open(path).map_err(|e| KeyError::io(path, e))?;
    file.write_all(contents).map_err(|e| KeyError::io(path, e))?;
    file.sync_all().map_err(|e| KeyError::io(path, e))?;
    Ok(())
}

fn read_key_file(path: &Path) -> Result<String, KeyError> {
    let bytes = fs::read(path).map_err(|e| KeyError::io(path, e))?;
    String::from_utf8(bytes).map_err(|_| KeyError::format(path, "not a PEM text file"))
}

/// Write `key` as PEM. With a passphrase the key is encrypted at rest; without one it
/// is stored in the clear, which is logged.
pub fn serialize_private(
    key: &RsaPrivateKey,
    path: &Path,
    passphrase: Option<&str>,
) -> Result<(), KeyError> {
    let pem = match effective(passphrase) {
        Some(pass) => key
            .to_pkcs8_encrypted_pem(&mut OsRng, pass.as_bytes(), LineEnding::LF)
            .map_err(|e| KeyError::format(path, e))?,
        None => {
            warn!(path = %path.display(), "writing unencrypted private key");
            key.to_pkcs8_pem(LineEnding::LF)
                .map_err(|e| KeyError::format(path, e))?
        }
    };

    write_key_file(path, pem.as_bytes(), true)
}

/// Write `key` as a SubjectPublicKeyInfo PEM.
pub fn serialize_public(key: &RsaPublicKey, path: &Path) -> Result<(), KeyError> {
    let pem = key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| KeyError::format(path, e))?;

    write_key_file(path, pem.as_bytes(), false)
}

/// A private key plus whether its file was passphrase-protected.
pub struct LoadedPrivateKey {
    pub key: RsaPrivateKey,
    pub encrypted: bool,
}

/// Load a private key, decrypting it when it is stored encrypted.
///
/// Errors:
/// - `NotFound` if the file is absent.
/// - `Format` if the content is not a recognizable RSA private key.
/// - `Decryption` if the key is encrypted and the passphrase is wrong or missing.
pub fn load_private(path: &Path, passphrase: Option<&str>) -> Result<RsaPrivateKey, KeyError> {
    read_private(path, passphrase).map(|loaded| loaded.key)
}

/// Like [`load_private`], also reporting whether the file was encrypted.
pub fn read_private(path: &Path, passphrase: Option<&str>) -> Result<LoadedPrivateKey, KeyError> {
    let text = read_key_file(path)?;
    let (label, doc) = SecretDocument::from_pem(&text).map_err(|e| KeyError::format(path, e))?;

    match label {
        labels::PRIVATE_PKCS8_ENCRYPTED => {
            let pass = effective(passphrase).ok_or_else(|| KeyError::Decryption { path: path.into() })?;
            let info = EncryptedPrivateKeyInfo::try_from(doc.as_bytes())
                .map_err(|e| KeyError::format(path, e))?;
            // Past this point a failure means the derived key was wrong, so every
            // branch reports the same decryption error.
            let decrypted = info
                .decrypt(pass.as_bytes())
                .map_err(|_| KeyError::Decryption { path: path.into() })?;
            let key = RsaPrivateKey::from_pkcs8_der(decrypted.as_bytes())
                .map_err(|_| KeyError::Decryption { path: path.into() })?;
            Ok(LoadedPrivateKey { key, encrypted: true })
        }
        labels::PRIVATE_PKCS8 | labels::PRIVATE_PKCS1 => {
            if effective(passphrase).is_some() {
                debug!(path = %path.display(), "passphrase supplied for an unencrypted key");
            }
            let key = if label == labels::PRIVATE_PKCS8 {
                RsaPrivateKey::from_pkcs8_der(doc.as_bytes()).map_err(|e| KeyError::format(path, e))?
            } else {
                RsaPrivateKey::from_pkcs1_der(doc.as_bytes()).map_err(|e| KeyError::format(path, e))?
            };
            Ok(LoadedPrivateKey { key, encrypted: false })
        }
        other => Err(KeyError::format(path, format!("unexpected PEM label {other:?}"))),
    }
}

/// Load a public key (SPKI or PKCS#1 PEM).
pub fn load_public(path: &Path) -> Result<RsaPublicKey, KeyError> {
    let text = read_key_file(path)?;
    let (label, doc) = Document::from_pem(&text).map_err(|e| KeyError::format(path, e))?;

    match label {
        labels::PUBLIC_SPKI => {
            RsaPublicKey::from_public_key_der(doc.as_bytes()).map_err(|e| KeyError::format(path, e))
        }
        labels::PUBLIC_PKCS1 => {
            RsaPublicKey::from_pkcs1_der(doc.as_bytes()).map_err(|e| KeyError::format(path, e))
        }
        other => Err(KeyError::format(path, format!("unexpected PEM label {other:?}"))),
    }
}
