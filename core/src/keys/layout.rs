//! keys/layout.rs
//! Pure mapping from identity names and key references to key file paths.
//!
//! Nothing here touches the filesystem; the directory and suffixes are injected
//! through [`KeyLayout`] so the rest of the core stays storage-agnostic.

use std::path::{Path, PathBuf};

use crate::constants::{key_files, DEFAULT_KEY_DIR};
use crate::keys::types::{KeyError, KeyRole};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyLayout {
    pub dir: PathBuf,
    pub private_suffix: String,
    pub public_suffix: String,
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_DIR)
    }
}

impl KeyLayout {
    /// Layout rooted at `dir` using the `<name>_priv.pem` / `<name>_pub.pem` convention.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            private_suffix: key_files::PRIVATE_SUFFIX.to_string(),
            public_suffix: key_files::PUBLIC_SUFFIX.to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Key file name (no directory) for `name` in `role`.
    pub fn file_name(&self, name: &str, role: KeyRole) -> Result<String, KeyError> {
        validate_component(name)?;
        let suffix = if role.is_private() {
            &self.private_suffix
        } else {
            &self.public_suffix
        };
        Ok(format!("{name}{suffix}"))
    }

    /// Reference recorded in a message for the sender's public key.
    pub fn public_key_ref(&self, name: &str) -> Result<String, KeyError> {
        self.file_name(name, KeyRole::SenderPublic)
    }

    /// Resolve a key reference taken from a message to a path inside the key directory.
    pub fn resolve_key_ref(&self, key_ref: &str) -> Result<PathBuf, KeyError> {
        validate_component(key_ref)?;
        Ok(self.dir.join(key_ref))
    }

    /// Identity name encoded in a public key reference, if it follows the convention.
    pub fn identity_of_ref<'a>(&self, key_ref: &'a str) -> Option<&'a str> {
        key_ref
            .strip_suffix(self.public_suffix.as_str())
            .filter(|name| !name.is_empty())
    }
}

/// Deterministic identity → key file mapping. Pure: no I/O, no global state.
pub fn resolve_identity(layout: &KeyLayout, name: &str, role: KeyRole) -> Result<PathBuf, KeyError> {
    Ok(layout.dir.join(layout.file_name(name, role)?))
}

/// Reject anything that is not a single plain path component.
fn validate_component(name: &str) -> Result<(), KeyError> {
    let invalid = name.is_empty()
        || name == "."
        || name.contains("..")
        || name.contains(['/', '\\', '\0'])
        || Path::new(name).is_absolute();

    if invalid {
        return Err(KeyError::InvalidIdentity(name.to_string()));
    }
    Ok(())
}
