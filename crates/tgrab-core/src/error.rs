//! Error taxonomy for the download engine.
//!
//! Transport and sink failures are fatal for the job they occur in; planning
//! failures short-circuit before any worker starts. Faults inside the queue
//! dispatch loop are recovered with backoff and never surface as a type here.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while describing or fetching a remote object.
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O failure in the underlying transport.
    #[error("transport i/o: {0}")]
    Io(#[from] io::Error),
    /// The transport returned malformed or unexpected data.
    #[error("transport protocol: {0}")]
    Protocol(String),
    /// The block stream ended before the segment was fully delivered
    /// (e.g. remote closed early). Reported instead of silent corruption.
    #[error("short segment: expected {expected} bytes, got {received}")]
    ShortSegment { expected: u64, received: u64 },
}

/// Failure in the local sink file (preallocation, offset write, finalize).
#[derive(Debug, Error)]
#[error("sink {op} failed for {}", .path.display())]
pub struct SinkError {
    /// Which sink operation failed (`create`, `write_at`, ...).
    pub op: &'static str,
    /// Path the sink was operating on.
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl SinkError {
    pub(crate) fn new(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Outcome of one download job. The first segment failure observed becomes
/// the job's error; partial success is never surfaced.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    /// The object descriptor made no sense (zero fetch unit, no workers).
    #[error("planning: {0}")]
    Planning(String),
    /// A segment task was cancelled or panicked before returning a result.
    #[error("segment worker aborted: {0}")]
    Worker(String),
}
