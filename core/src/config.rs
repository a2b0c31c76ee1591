//! config.rs
//! Runtime configuration: where keys and the revocation list live, and how the
//! core behaves when the list is missing.
//!
//! Every field has a default, so `{}` is a valid configuration file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{key_files, DEFAULT_KEY_DIR, DEFAULT_REVOCATION_LIST, DEFAULT_RSA_BITS};
use crate::keys::{validate_key_size, KeyLayout};
use crate::revocation::RevocationPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

fn default_key_dir() -> PathBuf {
    PathBuf::from(DEFAULT_KEY_DIR)
}

fn default_revocation_list() -> PathBuf {
    PathBuf::from(DEFAULT_REVOCATION_LIST)
}

fn default_key_bits() -> usize {
    DEFAULT_RSA_BITS
}

/// One worker per core, leaving one core free.
fn default_keygen_workers() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

fn default_private_suffix() -> String {
    key_files::PRIVATE_SUFFIX.to_string()
}

fn default_public_suffix() -> String {
    key_files::PUBLIC_SUFFIX.to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvelopeConfig {
    #[serde(default = "default_key_dir")]
    pub key_dir: PathBuf,
    #[serde(default = "default_revocation_list")]
    pub revocation_list: PathBuf,
    #[serde(default)]
    pub revocation_policy: RevocationPolicy,
    #[serde(default = "default_key_bits")]
    pub default_key_bits: usize,
    #[serde(default = "default_keygen_workers")]
    pub keygen_workers: usize,
    #[serde(default = "default_private_suffix")]
    pub private_suffix: String,
    #[serde(default = "default_public_suffix")]
    pub public_suffix: String,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            key_dir: default_key_dir(),
            revocation_list: default_revocation_list(),
            revocation_policy: RevocationPolicy::default(),
            default_key_bits: default_key_bits(),
            keygen_workers: default_keygen_workers(),
            private_suffix: default_private_suffix(),
            public_suffix: default_public_suffix(),
        }
    }
}

impl EnvelopeConfig {
    /// Defaults with every path placed under `root`.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            key_dir: root.join(DEFAULT_KEY_DIR),
            revocation_list: root.join(DEFAULT_REVOCATION_LIST),
            ..Self::default()
        }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&bytes)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_key_size(self.default_key_bits).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.keygen_workers == 0 {
            return Err(ConfigError::Invalid("keygen_workers must be at least 1".into()));
        }
        for (field, suffix) in [
            ("private_suffix", &self.private_suffix),
            ("public_suffix", &self.public_suffix),
        ] {
            if suffix.is_empty() || suffix.contains(['/', '\\']) {
                return Err(ConfigError::Invalid(format!("{field} {suffix:?} is not a plain file suffix")));
            }
        }
        if self.private_suffix == self.public_suffix {
            return Err(ConfigError::Invalid(
                "private_suffix and public_suffix must differ".into(),
            ));
        }
        Ok(())
    }

    /// Key file layout described by this configuration.
    pub fn key_layout(&self) -> KeyLayout {
        KeyLayout {
            dir: self.key_dir.clone(),
            private_suffix: self.private_suffix.clone(),
            public_suffix: self.public_suffix.clone(),
        }
    }
}
