//! keys/store.rs
//! Identity-addressed key store over a [`KeyLayout`] directory.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::info;

use crate::constants::key_files;
use crate::keys::cache::KeyCache;
use crate::keys::generate::generate_keypair;
use crate::keys::layout::{resolve_identity, KeyLayout};
use crate::keys::pem::{load_public, read_private, serialize_private, serialize_public};
use crate::keys::types::{Identity, KeyError, KeyPair, KeyRole};

pub struct KeyStore {
    layout: KeyLayout,
    cache: KeyCache,
}

impl KeyStore {
    pub fn new(layout: KeyLayout) -> Self {
        Self {
            layout,
            cache: KeyCache::new(),
        }
    }

    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    pub fn path_for(&self, name: &str, role: KeyRole) -> Result<PathBuf, KeyError> {
        resolve_identity(&self.layout, name, role)
    }

    /// Generate a key pair for `name` and write both key files.
    pub fn generate_identity(
        &self,
        name: &str,
        bits: usize,
        passphrase: Option<&str>,
    ) -> Result<Identity, KeyError> {
        // Resolve first so a bad name fails before the expensive part.
        self.path_for(name, KeyRole::SenderPrivate)?;
        let pair = generate_keypair(bits)?;
        self.install(name, &pair, passphrase)?;

        Ok(Identity {
            name: name.to_string(),
            bits: pair.bits(),
        })
    }

    /// Persist an existing key pair under `name`, replacing any previous files.
    pub fn install(&self, name: &str, pair: &KeyPair, passphrase: Option<&str>) -> Result<(), KeyError> {
        let private_path = self.path_for(name, KeyRole::SenderPrivate)?;
        let public_path = self.path_for(name, KeyRole::SenderPublic)?;

        fs::create_dir_all(self.layout.dir()).map_err(|e| KeyError::io(self.layout.dir(), e))?;

        // Invalidated around the writes so a partial install never serves the old key.
        self.cache.invalidate(&private_path);
        self.cache.invalidate(&public_path);
        let written = serialize_private(&pair.private, &private_path, passphrase)
            .and_then(|()| serialize_public(&pair.public, &public_path));
        self.cache.invalidate(&private_path);
        self.cache.invalidate(&public_path);
        written?;

        info!(identity = name, bits = pair.bits(), dir = %self.layout.dir().display(), "installed key pair");
        Ok(())
    }

    /// Public key of `name`, memoized.
    pub fn public_key(&self, name: &str) -> Result<Arc<RsaPublicKey>, KeyError> {
        let path = self.path_for(name, KeyRole::SenderPublic)?;
        self.cache.public_or_load(&path, load_public)
    }

    /// Public key named by a message's sender key reference, memoized.
    pub fn public_key_by_ref(&self, key_ref: &str) -> Result<Arc<RsaPublicKey>, KeyError> {
        let path = self.layout.resolve_key_ref(key_ref)?;
        self.cache.public_or_load(&path, load_public)
    }

    /// Private key of `name`, memoized per passphrase.
    pub fn private_key(&self, name: &str, passphrase: Option<&str>) -> Result<Arc<RsaPrivateKey>, KeyError> {
        let path = self.path_for(name, KeyRole::ReceiverPrivate)?;
        self.cache.private_or_load(&path, passphrase, read_private)
    }

    /// PEM file names in the key directory, sorted. A missing directory lists as empty.
    pub fn list_keys(&self) -> Result<Vec<String>, KeyError> {
        let dir = self.layout.dir();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(KeyError::io(dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| KeyError::io(dir, e))?;
            let path = entry.path();
            let is_pem = path.extension().is_some_and(|ext| ext == key_files::EXTENSION);
            if !is_pem || !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Identity names that have a public key on disk, sorted.
    pub fn list_identities(&self) -> Result<Vec<String>, KeyError> {
        Ok(self
            .list_keys()?
            .iter()
            .filter_map(|file| self.layout.identity_of_ref(file))
            .map(str::to_string)
            .collect())
    }

    /// Forget every memoized key; the next lookup reads from disk again.
    pub fn reload(&self) {
        self.cache.clear();
    }
}
