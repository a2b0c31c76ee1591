//! keys/pool.rs
//! Bounded worker pool for RSA key generation.
//!
//! Key generation is the only expensive operation in the crate, so it runs on
//! dedicated threads fed through a bounded crossbeam channel. Verification and
//! decryption never wait on it.
//!
//! Batches support cooperative cancellation: each job checks its
//! [`CancelToken`] right before it starts generating. A job already in
//! progress runs to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam::channel::{bounded, unbounded, Receiver, Sender};
use tracing::debug;

use crate::keys::generate::{generate_keypair, validate_key_size};
use crate::keys::types::{KeyError, KeyPair};

/// Shared cancellation flag for one batch.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct KeygenJob {
    index: usize,
    bits: usize,
    cancel: CancelToken,
    reply: Sender<(usize, Result<KeyPair, KeyError>)>,
}

/// Results of one batch, returned in request order.
pub struct KeygenBatch {
    results: Receiver<(usize, Result<KeyPair, KeyError>)>,
    len: usize,
}

impl KeygenBatch {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Block until every job has reported. Cancelled jobs yield `KeyError::Cancelled`.
    pub fn wait(self) -> Vec<Result<KeyPair, KeyError>> {
        let mut slots: Vec<Option<Result<KeyPair, KeyError>>> = (0..self.len).map(|_| None).collect();

        for _ in 0..self.len {
            match self.results.recv() {
                Ok((index, result)) => slots[index] = Some(result),
                Err(_) => break,
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| Err(KeyError::Generation("worker pool shut down".into()))))
            .collect()
    }
}

pub struct KeygenPool {
    jobs: Option<Sender<KeygenJob>>,
    workers: Vec<JoinHandle<()>>,
}

impl KeygenPool {
    /// Spawn `worker_count` generator threads (at least one).
    pub fn new(worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let (tx, rx) = bounded::<KeygenJob>(worker_count * 4);

        let workers = (0..worker_count)
            .map(|id| {
                let rx = rx.clone();
                std::thread::spawn(move || run_worker(id, rx))
            })
            .collect();

        Self {
            jobs: Some(tx),
            workers,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Generate a single key pair in the background.
    pub fn submit(&self, bits: usize) -> KeygenBatch {
        self.submit_batch(&[bits], CancelToken::new())
    }

    /// Queue one job per entry of `sizes`. Invalid sizes fail immediately without
    /// occupying a worker.
    pub fn submit_batch(&self, sizes: &[usize], cancel: CancelToken) -> KeygenBatch {
        let (reply, results) = unbounded();

        for (index, &bits) in sizes.iter().enumerate() {
            if let Err(e) = validate_key_size(bits) {
                let _ = reply.send((index, Err(e)));
                continue;
            }

            let job = KeygenJob {
                index,
                bits,
                cancel: cancel.clone(),
                reply: reply.clone(),
            };

            let sent = match &self.jobs {
                Some(jobs) => jobs.send(job).map_err(|e| e.into_inner()),
                None => Err(job),
            };
            if let Err(job) = sent {
                let _ = job
                    .reply
                    .send((job.index, Err(KeyError::Generation("worker pool shut down".into()))));
            }
        }

        KeygenBatch {
            results,
            len: sizes.len(),
        }
    }
}

impl Drop for KeygenPool {
    fn drop(&mut self) {
        // Closing the job channel ends every worker loop.
        self.jobs.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn run_worker(id: usize, rx: Receiver<KeygenJob>) {
    while let Ok(job) = rx.recv() {
        let result = if job.cancel.is_cancelled() {
            Err(KeyError::Cancelled)
        } else {
            debug!(worker = id, bits = job.bits, index = job.index, "keygen job started");
            generate_keypair(job.bits)
        };

        if job.reply.send((job.index, result)).is_err() {
            debug!(worker = id, "batch receiver dropped");
        }
    }
}
