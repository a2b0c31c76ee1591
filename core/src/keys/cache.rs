//! keys/cache.rs
//! Process-lifetime memo of loaded keys.
//!
//! - Entries are read-only `Arc`s; a caller keeps its snapshot even if the cache
//!   is cleared mid-operation.
//! - Private keys are keyed by (path, SHA-256 of passphrase) so a cached key is
//!   never handed out for a different passphrase. Unencrypted files load under
//!   any passphrase and share one no-passphrase slot.
//! - Invalidation is explicit (`clear` / `invalidate`), never time-based.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::crypto::digest::sha256_concat;
use crate::keys::pem::LoadedPrivateKey;
use crate::keys::types::KeyError;

type PrivateSlot = (PathBuf, [u8; 32]);

const NO_PASSPHRASE: [u8; 32] = [0u8; 32];

#[derive(Default)]
pub struct KeyCache {
    public: RwLock<HashMap<PathBuf, Arc<RsaPublicKey>>>,
    private: RwLock<HashMap<PrivateSlot, Arc<RsaPrivateKey>>>,
}

impl KeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public_or_load<F>(&self, path: &Path, load: F) -> Result<Arc<RsaPublicKey>, KeyError>
    where
        F: FnOnce(&Path) -> Result<RsaPublicKey, KeyError>,
    {
        if let Some(hit) = self.public.read().get(path) {
            return Ok(Arc::clone(hit));
        }

        let key = Arc::new(load(path)?);
        self.public
            .write()
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::clone(&key));
        Ok(key)
    }

    pub fn private_or_load<F>(
        &self,
        path: &Path,
        passphrase: Option<&str>,
        load: F,
    ) -> Result<Arc<RsaPrivateKey>, KeyError>
    where
        F: FnOnce(&Path, Option<&str>) -> Result<LoadedPrivateKey, KeyError>,
    {
        let tag = passphrase_tag(passphrase);
        {
            let private = self.private.read();
            // An entry in the no-passphrase slot means the file is stored in the clear.
            let hit = private
                .get(&(path.to_path_buf(), tag))
                .or_else(|| private.get(&(path.to_path_buf(), NO_PASSPHRASE)));
            if let Some(hit) = hit {
                return Ok(Arc::clone(hit));
            }
        }

        let loaded = load(path, passphrase)?;
        let slot_tag = if loaded.encrypted { tag } else { NO_PASSPHRASE };
        let key = Arc::new(loaded.key);
        self.private
            .write()
            .entry((path.to_path_buf(), slot_tag))
            .or_insert_with(|| Arc::clone(&key));
        Ok(key)
    }

    /// Drop every cached entry for `path`.
    pub fn invalidate(&self, path: &Path) {
        self.public.write().remove(path);
        self.private.write().retain(|(p, _), _| p != path);
    }

    pub fn clear(&self) {
        self.public.write().clear();
        self.private.write().clear();
    }

    pub fn len(&self) -> usize {
        self.public.read().len() + self.private.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn passphrase_tag(passphrase: Option<&str>) -> [u8; 32] {
    match passphrase.filter(|p| !p.is_empty()) {
        Some(p) => sha256_concat([b"pass:".as_slice(), p.as_bytes()]),
        None => NO_PASSPHRASE,
    }
}
