//! message/mailbox.rs
//! Identity-level front door: compose and open messages by identity name against
//! a key store and a revocation snapshot. Persisting the serialized bytes is the
//! caller's business.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::codec::deserialize;
use crate::config::{ConfigError, EnvelopeConfig};
use crate::headers::MailHeaders;
use crate::keys::{CancelToken, Identity, KeyError, KeyRole, KeyStore, KeygenPool};
use crate::message::compose::compose;
use crate::message::types::{SignedMessage, VerifyReport};
use crate::message::verify::{malformed, open_message};
use crate::revocation::RevocationChecker;
use crate::types::EnvelopeError;

pub struct Mailbox {
    keys: KeyStore,
    revocation: RwLock<Arc<RevocationChecker>>,
    revocation_source: Option<PathBuf>,
    pool: KeygenPool,
    default_key_bits: usize,
}

impl Mailbox {
    /// Assemble from explicit parts. Revocation cannot be reloaded from disk
    /// unless a source is set with [`Mailbox::with_revocation_source`].
    pub fn new(keys: KeyStore, revocation: RevocationChecker) -> Self {
        Self {
            keys,
            revocation: RwLock::new(Arc::new(revocation)),
            revocation_source: None,
            pool: KeygenPool::new(1),
            default_key_bits: crate::constants::DEFAULT_RSA_BITS,
        }
    }

    pub fn from_config(config: &EnvelopeConfig) -> Result<Self, EnvelopeError> {
        config.validate()?;

        let revocation = RevocationChecker::load(&config.revocation_list, config.revocation_policy)?;
        info!(
            key_dir = %config.key_dir.display(),
            policy = ?config.revocation_policy,
            workers = config.keygen_workers,
            "mailbox ready"
        );

        Ok(Self {
            keys: KeyStore::new(config.key_layout()),
            revocation: RwLock::new(Arc::new(revocation)),
            revocation_source: Some(config.revocation_list.clone()),
            pool: KeygenPool::new(config.keygen_workers),
            default_key_bits: config.default_key_bits,
        })
    }

    pub fn with_revocation_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.revocation_source = Some(path.into());
        self
    }

    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }

    /// Current revocation snapshot. Holders keep it even across reloads.
    pub fn revocation(&self) -> Arc<RevocationChecker> {
        self.revocation.read().clone()
    }

    /// Swap in a new revocation checker. Opens already running finish on the old one.
    pub fn replace_revocation(&self, checker: RevocationChecker) {
        *self.revocation.write() = Arc::new(checker);
    }

    /// Re-read the revocation list from its source and clear cached keys.
    pub fn reload(&self) -> Result<(), EnvelopeError> {
        let source = self
            .revocation_source
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("no revocation list source configured".into()))?;

        let fresh = self.revocation().reload(source)?;
        self.replace_revocation(fresh);
        self.keys.reload();
        Ok(())
    }

    /// Provision `name` with a key pair of the configured default size.
    pub fn generate_identity(&self, name: &str, passphrase: Option<&str>) -> Result<Identity, EnvelopeError> {
        Ok(self.keys.generate_identity(name, self.default_key_bits, passphrase)?)
    }

    /// Provision several identities on the keygen pool. Results are in input order;
    /// names left unstarted when `cancel` fires come back as `KeyError::Cancelled`.
    pub fn generate_identities(
        &self,
        names: &[&str],
        passphrase: Option<&str>,
        cancel: CancelToken,
    ) -> Vec<Result<Identity, KeyError>> {
        let checked: Vec<Result<(), KeyError>> = names
            .iter()
            .map(|name| self.keys.path_for(name, KeyRole::SenderPrivate).map(|_| ()))
            .collect();

        // A zero size fails validation in the pool without reaching a worker.
        let sizes: Vec<usize> = checked
            .iter()
            .map(|c| if c.is_ok() { self.default_key_bits } else { 0 })
            .collect();
        let batch = self.pool.submit_batch(&sizes, cancel);

        names
            .iter()
            .zip(checked)
            .zip(batch.wait())
            .map(|((name, checked), generated)| {
                checked?;
                let pair = generated?;
                self.keys.install(name, &pair, passphrase)?;
                Ok(Identity {
                    name: name.to_string(),
                    bits: pair.bits(),
                })
            })
            .collect()
    }

    /// Compose a message from `sender` to `receiver`, dated now.
    pub fn compose(
        &self,
        sender: &str,
        receiver: &str,
        subject: &str,
        body: &[u8],
        sender_passphrase: Option<&str>,
    ) -> Result<SignedMessage, EnvelopeError> {
        let headers = MailHeaders::dated_now(sender, receiver, subject);
        self.compose_with_headers(sender, receiver, headers, body, sender_passphrase)
    }

    /// Compose with caller-supplied headers. `sender` and `receiver` name the
    /// identities whose keys are used; the headers are signed as given.
    pub fn compose_with_headers(
        &self,
        sender: &str,
        receiver: &str,
        headers: MailHeaders,
        body: &[u8],
        sender_passphrase: Option<&str>,
    ) -> Result<SignedMessage, EnvelopeError> {
        let receiver_key = self.keys.public_key(receiver)?;
        let sender_key = self.keys.private_key(sender, sender_passphrase)?;
        let sender_key_ref = self.keys.layout().public_key_ref(sender)?;

        Ok(compose(headers, body, sender_key_ref, &sender_key, &receiver_key)?)
    }

    /// Run the verify path over serialized bytes on behalf of `receiver`.
    ///
    /// Malformed input is rejected before any key is loaded. Missing or
    /// undecryptable local keys are errors, not verdicts.
    pub fn open(
        &self,
        bytes: &[u8],
        receiver: &str,
        receiver_passphrase: Option<&str>,
    ) -> Result<VerifyReport, EnvelopeError> {
        let message = match deserialize(bytes) {
            Ok(message) => message,
            Err(e) => return Ok(malformed(e)),
        };

        let revocation = self.revocation();
        let receiver_key = self.keys.private_key(receiver, receiver_passphrase)?;
        open_message(&message, &revocation, &self.keys, &receiver_key)
    }
}
