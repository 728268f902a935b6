//! Aggregate progress for one job: a shared atomic byte counter plus the
//! periodic report loop that renders it for humans.
//!
//! Correctness (write exclusion) and observability are deliberately
//! separate: workers bump the counter after each block lands, and only the
//! report loop ever reads it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::reporter::Reporter;

/// Shared progress state for one running job.
pub struct ProgressCounter {
    bytes_done: AtomicU64,
    total_bytes: u64,
    started_at: Instant,
}

impl ProgressCounter {
    pub fn new(total_bytes: u64) -> Self {
        Self {
            bytes_done: AtomicU64::new(0),
            total_bytes,
            started_at: Instant::now(),
        }
    }

    /// Record `n` more bytes written. Called concurrently by segment workers.
    pub fn add(&self, n: u64) {
        self.bytes_done.fetch_add(n, Ordering::Relaxed);
    }

    pub fn is_complete(&self) -> bool {
        self.bytes_done.load(Ordering::Relaxed) >= self.total_bytes
    }

    /// Consistent snapshot for rendering.
    pub fn snapshot(&self) -> ProgressStats {
        ProgressStats {
            bytes_done: self.bytes_done.load(Ordering::Relaxed),
            total_bytes: self.total_bytes,
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

/// Point-in-time view of a job's progress.
#[derive(Debug, Clone)]
pub struct ProgressStats {
    pub bytes_done: u64,
    pub total_bytes: u64,
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        (self.bytes_done as f64 / self.total_bytes as f64).min(1.0)
    }

    /// Overall throughput in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }
}

/// Render one progress line: percentage, throughput, elapsed time.
pub fn format_report(stats: &ProgressStats) -> String {
    format!(
        "downloading: {:.1}% | {:.2} MiB/s | {:.0}s elapsed",
        stats.fraction() * 100.0,
        stats.bytes_per_sec() / 1_048_576.0,
        stats.elapsed_secs,
    )
}

/// Periodic report loop for one job. Polls the counter every
/// `poll_interval` but emits at most once per `min_emit_interval`, except
/// that completion always emits; stops after the final 100% report.
///
/// Spawned alongside the segment workers; aborting it must not disturb
/// them, so it holds nothing but the counter and the reporter.
pub async fn run_report_loop(
    progress: Arc<ProgressCounter>,
    reporter: Arc<dyn Reporter>,
    poll_interval: Duration,
    min_emit_interval: Duration,
) {
    let mut last_emit: Option<Instant> = None;
    loop {
        tokio::time::sleep(poll_interval).await;
        let stats = progress.snapshot();
        let complete = stats.bytes_done >= stats.total_bytes;
        let due = last_emit.map_or(true, |t| t.elapsed() >= min_emit_interval);
        if complete || due {
            reporter.report(&format_report(&stats)).await;
            last_emit = Some(Instant::now());
        }
        if complete {
            break;
        }
    }
}
