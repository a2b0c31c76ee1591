//! revocation.rs
//! Revocation gate for sender keys.
//!
//! The list is an externally maintained JSON document:
//!
//! ```json
//! { "revoked": ["alice_pub.pem", "mallory_pub.pem"] }
//! ```
//!
//! It is loaded once into an immutable [`RevocationSnapshot`] and injected into a
//! [`RevocationChecker`]. Reloading builds a new checker; checks already running
//! keep the snapshot they started with.
//!
//! A missing or unreadable list is a valid state. What it means is the
//! [`RevocationPolicy`]: `FailOpen` treats every key as trusted, `FailClosed`
//! treats every key as revoked.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum RevocationError {
    /// The file exists but is not a valid revocation list.
    #[error("malformed revocation list {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },
}

/// Behavior when no revocation list is available.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevocationPolicy {
    #[default]
    FailOpen,
    FailClosed,
}

/// Set of revoked key references.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationList {
    #[serde(default)]
    revoked: BTreeSet<String>,
}

impl RevocationList {
    pub fn new<I, S>(revoked: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            revoked: revoked.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Matches the reference exactly or by its final path component.
    pub fn contains(&self, key_ref: &str) -> bool {
        if self.revoked.contains(key_ref) {
            return true;
        }
        Path::new(key_ref)
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.revoked.contains(name))
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

/// Revocation state as read at one point in time.
#[derive(Clone, Debug)]
pub enum RevocationSnapshot {
    Loaded(Arc<RevocationList>),
    Unavailable,
}

impl RevocationSnapshot {
    /// Read the list at `path`. A missing or unreadable file yields `Unavailable`;
    /// a file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self, RevocationError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::Unavailable),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "revocation list unreadable");
                return Ok(Self::Unavailable);
            }
        };

        let list = RevocationList::from_json(&bytes).map_err(|e| RevocationError::Format {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::Loaded(Arc::new(list)))
    }
}

#[derive(Clone, Debug)]
pub struct RevocationChecker {
    snapshot: RevocationSnapshot,
    policy: RevocationPolicy,
}

impl RevocationChecker {
    pub fn new(snapshot: RevocationSnapshot, policy: RevocationPolicy) -> Self {
        Self { snapshot, policy }
    }

    pub fn from_list(list: RevocationList, policy: RevocationPolicy) -> Self {
        Self::new(RevocationSnapshot::Loaded(Arc::new(list)), policy)
    }

    pub fn load(path: &Path, policy: RevocationPolicy) -> Result<Self, RevocationError> {
        Ok(Self::new(RevocationSnapshot::load(path)?, policy))
    }

    /// Fresh checker over a new snapshot with the same policy. `self` is untouched.
    pub fn reload(&self, path: &Path) -> Result<Self, RevocationError> {
        Self::load(path, self.policy)
    }

    pub fn policy(&self) -> RevocationPolicy {
        self.policy
    }

    pub fn snapshot(&self) -> &RevocationSnapshot {
        &self.snapshot
    }

    pub fn is_revoked(&self, sender_key_ref: &str) -> bool {
        match &self.snapshot {
            RevocationSnapshot::Loaded(list) => list.contains(sender_key_ref),
            RevocationSnapshot::Unavailable => match self.policy {
                RevocationPolicy::FailOpen => {
                    warn!(key_ref = sender_key_ref, "no revocation list, failing open");
                    false
                }
                RevocationPolicy::FailClosed => true,
            },
        }
    }
}
