//! Single-flight download queue.
//!
//! Producers submit jobs from anywhere; one background worker pulls them in
//! arrival order and runs each download to completion before touching the
//! next, so at most one download is active system-wide. A failing job is
//! reported and skipped; a fault in the dispatch itself backs off briefly
//! and the loop resumes, since a dead worker would silently starve every
//! later submission.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::downloader::{self, DownloadOptions};
use crate::reporter::Reporter;
use crate::transport::MediaTransport;

/// One unit of queued work: which object to fetch, where to put it, and
/// where progress text goes. Owned by the queue from submit until the
/// worker finishes it.
pub struct Job {
    pub transport: Arc<dyn MediaTransport>,
    pub destination: PathBuf,
    pub reporter: Arc<dyn Reporter>,
}

/// Immediate acknowledgement returned by `submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitAck {
    /// Jobs already waiting ahead of this one, not counting a job that is
    /// currently in progress.
    pub queue_position: usize,
}

/// The queue rejected a submission because its worker is gone.
#[derive(Debug, Error)]
#[error("download queue is shut down")]
pub struct QueueClosed;

/// Tuning for the queue worker.
#[derive(Debug, Clone)]
pub struct QueueOptions {
    pub download: DownloadOptions,
    /// Pause after an internal dispatch fault before resuming.
    pub retry_delay: Duration,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            download: DownloadOptions::default(),
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Handle for submitting download jobs. Share it behind an `Arc` when
/// multiple producers need it.
pub struct DownloadQueue {
    tx: mpsc::UnboundedSender<Job>,
    waiting: Arc<AtomicUsize>,
    worker: JoinHandle<()>,
}

impl DownloadQueue {
    /// Start the queue and its background worker loop.
    pub fn start(opts: QueueOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let waiting = Arc::new(AtomicUsize::new(0));
        let worker = tokio::spawn(worker_loop(rx, Arc::clone(&waiting), opts));
        Self {
            tx,
            waiting,
            worker,
        }
    }

    /// Enqueue a job. Never blocks; the ack carries the number of jobs
    /// already waiting. A submitted job is never silently dropped.
    pub fn submit(&self, job: Job) -> Result<SubmitAck, QueueClosed> {
        let queue_position = self.waiting.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(job).is_err() {
            self.waiting.fetch_sub(1, Ordering::SeqCst);
            return Err(QueueClosed);
        }
        tracing::info!(queue_position, "job submitted to download queue");
        Ok(SubmitAck { queue_position })
    }

    /// Jobs waiting to start (excludes one in progress).
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    /// Stop accepting jobs, drain everything already queued, then return.
    pub async fn shutdown(self) {
        drop(self.tx);
        let _ = self.worker.await;
    }
}

async fn worker_loop(
    mut rx: mpsc::UnboundedReceiver<Job>,
    waiting: Arc<AtomicUsize>,
    opts: QueueOptions,
) {
    tracing::info!("download queue worker started");
    while let Some(job) = rx.recv().await {
        waiting.fetch_sub(1, Ordering::SeqCst);
        let destination = job.destination.clone();

        // Each job runs on its own task so a panic inside one job surfaces
        // as a JoinError here instead of killing the dispatch loop.
        match tokio::spawn(run_job(job, opts.download.clone())).await {
            Ok(()) => {}
            Err(fault) => {
                tracing::error!(
                    error = %fault,
                    "queue worker fault while processing {}",
                    destination.display()
                );
                tokio::time::sleep(opts.retry_delay).await;
            }
        }
    }
    tracing::info!("download queue worker stopped");
}

async fn run_job(job: Job, opts: DownloadOptions) {
    job.reporter.report("starting download").await;
    match downloader::download(job.transport, &job.destination, job.reporter, &opts).await {
        Ok(path) => {
            tracing::info!("queued job finished: {}", path.display());
        }
        Err(e) => {
            // Already reported by the orchestrator; the queue only records
            // it and moves on to the next job.
            tracing::error!(error = %e, "queued job failed: {}", job.destination.display());
        }
    }
}
