//! Parallel download orchestrator.
//!
//! Plans fetch-unit-aligned segments, preallocates the sink, runs one
//! concurrent fetch task per segment and a periodic progress reporter, and
//! finalizes or cleans up the sink. The first segment failure fails the
//! whole job: remaining tasks are cancelled, the partial file is deleted,
//! and the failure is reported. Partial success is never surfaced.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::task::JoinSet;

use crate::error::{DownloadError, TransportError};
use crate::progress::{self, ProgressCounter};
use crate::reporter::Reporter;
use crate::segmenter::{self, Segment};
use crate::sink::{self, SinkFile};
use crate::transport::MediaTransport;

/// Tuning for one download run.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Concurrent segment fetchers per job.
    pub worker_count: usize,
    /// How often the reporter polls the progress counter.
    pub poll_interval: Duration,
    /// Minimum spacing between two emitted progress reports.
    pub report_min_interval: Duration,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            worker_count: 4,
            poll_interval: Duration::from_secs(2),
            report_min_interval: Duration::from_secs(3),
        }
    }
}

/// Download the whole remote object into `destination`.
///
/// Data is staged in `destination.part` and renamed into place once every
/// segment has landed and the final progress report went out. On any
/// failure the partial file is removed before the error is returned.
pub async fn download(
    transport: Arc<dyn MediaTransport>,
    destination: &Path,
    reporter: Arc<dyn Reporter>,
    opts: &DownloadOptions,
) -> Result<PathBuf, DownloadError> {
    let object = transport.describe().await?;
    if object.fetch_unit == 0 {
        return Err(DownloadError::Planning(
            "remote object has zero fetch unit".into(),
        ));
    }
    tracing::info!(
        total_bytes = object.total_len,
        fetch_unit = object.fetch_unit,
        "starting download: {}",
        destination.display()
    );

    let temp = sink::temp_path(destination);

    // Zero-length object: nothing to fetch, complete immediately.
    if object.total_len == 0 {
        let empty = SinkFile::create(&temp, 0)?;
        empty.finalize(destination)?;
        reporter
            .report(&format!("download complete: {}", destination.display()))
            .await;
        return Ok(destination.to_path_buf());
    }

    let plan = segmenter::plan_segments(object.total_len, object.fetch_unit, opts.worker_count);
    if plan.is_empty() {
        return Err(DownloadError::Planning(format!(
            "no segments planned for {} bytes with {} workers",
            object.total_len, opts.worker_count
        )));
    }

    let sink = Arc::new(SinkFile::create(&temp, object.total_len)?);
    let progress = Arc::new(ProgressCounter::new(object.total_len));
    let report_task = tokio::spawn(progress::run_report_loop(
        Arc::clone(&progress),
        Arc::clone(&reporter),
        opts.poll_interval,
        opts.report_min_interval,
    ));

    let mut tasks = JoinSet::new();
    for segment in plan {
        tasks.spawn(fetch_segment(
            Arc::clone(&transport),
            segment,
            object.fetch_unit,
            Arc::clone(&sink),
            Arc::clone(&progress),
        ));
    }

    let mut first_error: Option<DownloadError> = None;
    while let Some(joined) = tasks.join_next().await {
        let result = match joined {
            Ok(r) => r,
            Err(e) => Err(DownloadError::Worker(e.to_string())),
        };
        if let Err(e) = result {
            first_error = Some(e);
            break;
        }
    }

    if let Some(err) = first_error {
        // Cancelling the reporter must not disturb segment tasks; those are
        // aborted separately and drained before the partial file goes away.
        tasks.abort_all();
        while tasks.join_next().await.is_some() {}
        report_task.abort();
        sink.discard();
        tracing::error!(error = %err, "download failed: {}", destination.display());
        reporter.report(&format!("download failed: {err}")).await;
        return Err(err);
    }

    // All segments landed; the report loop sees a full counter and emits
    // its final 100% line before returning.
    let _ = report_task.await;

    sink.sync().await?;
    sink.finalize(destination)?;
    reporter
        .report(&format!("download complete: {}", destination.display()))
        .await;
    tracing::info!("download completed: {}", destination.display());
    Ok(destination.to_path_buf())
}

/// Stream one segment's blocks into the sink.
///
/// The fetch is addressed in transport units; the final block may run past
/// the segment's logical end (unit granularity), so it is trimmed and the
/// excess is discarded, never written.
async fn fetch_segment(
    transport: Arc<dyn MediaTransport>,
    segment: Segment,
    fetch_unit: u64,
    sink: Arc<SinkFile>,
    progress: Arc<ProgressCounter>,
) -> Result<(), DownloadError> {
    let offset_units = segment.start / fetch_unit;
    let limit_units = segment.len().div_ceil(fetch_unit);
    let mut blocks = transport.fetch(offset_units, limit_units).await?;

    let mut written = 0u64;
    while written < segment.len() {
        let Some(block) = blocks.next().await else {
            break;
        };
        let block = block?;
        let remaining = segment.len() - written;
        let take = (block.len() as u64).min(remaining) as usize;
        if take == 0 {
            break;
        }
        sink.write_at(segment.start + written, &block[..take])
            .await?;
        progress.add(take as u64);
        written += take as u64;
    }

    if written < segment.len() {
        return Err(TransportError::ShortSegment {
            expected: segment.len(),
            received: written,
        }
        .into());
    }
    tracing::debug!(
        start = segment.start,
        len = segment.len(),
        "segment complete"
    );
    Ok(())
}
