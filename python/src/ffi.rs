//! ffi.rs
//! `envelope.Mailbox` and the exception hierarchy exposed to Python.
//!
//! Every entry point releases the GIL for the duration of the core call; RSA
//! work never blocks other Python threads.

use std::path::PathBuf;

use envelope_core::prelude::*;
use pyo3::create_exception;
use pyo3::exceptions::PyException;
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyDict};

create_exception!(envelope, EnvelopeException, PyException);
create_exception!(envelope, UnsupportedKeySize, EnvelopeException);
create_exception!(envelope, KeyNotFoundError, EnvelopeException);
create_exception!(envelope, KeyFormatError, EnvelopeException);
create_exception!(envelope, DecryptionError, EnvelopeException);
create_exception!(envelope, RevokedKeyError, EnvelopeException);
create_exception!(envelope, MessageFormatError, EnvelopeException);

fn to_py_err(err: EnvelopeError) -> PyErr {
    let msg = err.to_string();
    if err.is_decryption() {
        return DecryptionError::new_err(msg);
    }
    match err {
        EnvelopeError::Key(KeyError::UnsupportedKeySize { .. }) => UnsupportedKeySize::new_err(msg),
        EnvelopeError::Key(KeyError::NotFound { .. }) => KeyNotFoundError::new_err(msg),
        EnvelopeError::Key(KeyError::Format { .. } | KeyError::InvalidIdentity(_)) => KeyFormatError::new_err(msg),
        EnvelopeError::RevokedKey { .. } => RevokedKeyError::new_err(msg),
        EnvelopeError::Format(_) => MessageFormatError::new_err(msg),
        _ => EnvelopeException::new_err(msg),
    }
}

fn key_err(err: KeyError) -> PyErr {
    to_py_err(EnvelopeError::Key(err))
}

#[pyclass(name = "Mailbox", module = "envelope")]
pub struct PyMailbox {
    inner: Mailbox,
}

#[pymethods]
impl PyMailbox {
    /// `Mailbox(root=None, config=None)`: with `config` the JSON file is used,
    /// otherwise every path defaults under `root` (or the working directory).
    #[new]
    #[pyo3(signature = (root = None, config = None))]
    fn new(root: Option<PathBuf>, config: Option<PathBuf>) -> PyResult<Self> {
        let config = match (config, root) {
            (Some(path), _) => EnvelopeConfig::from_json_file(path)
                .map_err(|e| to_py_err(e.into()))?,
            (None, Some(root)) => EnvelopeConfig::rooted_at(root),
            (None, None) => EnvelopeConfig::default(),
        };
        let inner = Mailbox::from_config(&config).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Generate and store a key pair; returns the key size in bits.
    #[pyo3(signature = (name, passphrase = None))]
    fn generate_identity(&self, py: Python<'_>, name: &str, passphrase: Option<&str>) -> PyResult<usize> {
        let identity = py
            .allow_threads(|| self.inner.generate_identity(name, passphrase))
            .map_err(to_py_err)?;
        Ok(identity.bits)
    }

    fn list_keys(&self) -> PyResult<Vec<String>> {
        self.inner.keys().list_keys().map_err(key_err)
    }

    /// Compose a message and return its serialized form.
    #[pyo3(signature = (sender, receiver, subject, body, date = None, passphrase = None))]
    #[allow(clippy::too_many_arguments)]
    fn compose<'py>(
        &self,
        py: Python<'py>,
        sender: &str,
        receiver: &str,
        subject: &str,
        body: &[u8],
        date: Option<&str>,
        passphrase: Option<&str>,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let bytes = py
            .allow_threads(|| {
                let message = match date {
                    Some(date) => self.inner.compose_with_headers(
                        sender,
                        receiver,
                        MailHeaders::new(sender, receiver, subject, date),
                        body,
                        passphrase,
                    ),
                    None => self.inner.compose(sender, receiver, subject, body, passphrase),
                }?;
                serialize(&message).map_err(EnvelopeError::from)
            })
            .map_err(to_py_err)?;
        Ok(PyBytes::new_bound(py, &bytes))
    }

    /// Verify and decrypt. Returns `{"status": ..., "plaintext": ..., "headers": ...}`;
    /// status is "ok", "malformed", "revoked", "bad-signature" or "decrypt-failure".
    #[pyo3(signature = (data, receiver, passphrase = None))]
    fn open<'py>(
        &self,
        py: Python<'py>,
        data: &[u8],
        receiver: &str,
        passphrase: Option<&str>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let report = py
            .allow_threads(|| self.inner.open(data, receiver, passphrase))
            .map_err(to_py_err)?;
        report_to_dict(py, report)
    }

    /// Re-read the revocation list and drop cached keys.
    fn reload(&self) -> PyResult<()> {
        self.inner.reload().map_err(to_py_err)
    }
}

fn report_to_dict(py: Python<'_>, report: VerifyReport) -> PyResult<Bound<'_, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("status", report.verdict.status())?;

    let trail: Vec<String> = report.trail.iter().map(|s| format!("{s:?}")).collect();
    dict.set_item("trail", trail)?;

    match report.verdict {
        Verdict::Accepted(opened) => {
            dict.set_item("plaintext", PyBytes::new_bound(py, &opened.plaintext))?;
            let headers = PyDict::new_bound(py);
            for (name, value) in [
                ("From", &opened.headers.from),
                ("To", &opened.headers.to),
                ("Subject", &opened.headers.subject),
                ("Date", &opened.headers.date),
            ] {
                headers.set_item(name, value)?;
            }
            for (name, value) in opened.headers.extra() {
                headers.set_item(name, value)?;
            }
            dict.set_item("headers", headers)?;
        }
        Verdict::Rejected(_) => {
            if let Some(e) = report.format_error {
                dict.set_item("reason", e.to_string())?;
            }
        }
    }
    Ok(dict)
}

pub fn register(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMailbox>()?;

    m.add("EnvelopeException", py.get_type_bound::<EnvelopeException>())?;
    m.add("UnsupportedKeySize", py.get_type_bound::<UnsupportedKeySize>())?;
    m.add("KeyNotFoundError", py.get_type_bound::<KeyNotFoundError>())?;
    m.add("KeyFormatError", py.get_type_bound::<KeyFormatError>())?;
    m.add("DecryptionError", py.get_type_bound::<DecryptionError>())?;
    m.add("RevokedKeyError", py.get_type_bound::<RevokedKeyError>())?;
    m.add("MessageFormatError", py.get_type_bound::<MessageFormatError>())?;

    m.add("WIRE_VERSION", envelope_core::constants::WIRE_VERSION)?;
    Ok(())
}
