//! Benchmark mode: try different worker counts and report throughput.
//!
//! Runs the full download pipeline over one local source at each worker
//! count, into a throwaway temp dir, and recommends the fastest count.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::downloader::{self, DownloadOptions};
use crate::reporter::NullReporter;
use crate::transport::{FileTransport, MediaTransport};

/// Worker counts tried when the caller does not specify any.
pub const DEFAULT_WORKER_COUNTS: &[usize] = &[2, 4, 8];

/// Result of one benchmark run (one worker count).
#[derive(Debug, Clone)]
pub struct BenchResult {
    pub worker_count: usize,
    pub bytes: u64,
    pub elapsed_secs: f64,
    pub throughput_mib_s: f64,
}

/// Download `source` once per worker count and measure throughput. Progress
/// reporting is silenced so it does not skew small runs.
pub async fn run_bench(source: &Path, worker_counts: &[usize]) -> Result<Vec<BenchResult>> {
    let bytes = std::fs::metadata(source)
        .with_context(|| format!("stat bench source {}", source.display()))?
        .len();
    anyhow::ensure!(bytes > 0, "bench source is empty");

    let mut results = Vec::with_capacity(worker_counts.len());
    for &worker_count in worker_counts {
        let dir = tempfile::tempdir().context("create temp dir for bench")?;
        let dest = dir.path().join("bench.bin");
        let transport: Arc<dyn MediaTransport> = Arc::new(FileTransport::new(source));
        let opts = DownloadOptions {
            worker_count,
            ..DownloadOptions::default()
        };

        let start = Instant::now();
        downloader::download(transport, &dest, Arc::new(NullReporter), &opts)
            .await
            .with_context(|| format!("bench run with {worker_count} workers"))?;
        let elapsed_secs = start.elapsed().as_secs_f64();

        let throughput_mib_s = if elapsed_secs > 0.0 {
            (bytes as f64 / 1_048_576.0) / elapsed_secs
        } else {
            0.0
        };
        results.push(BenchResult {
            worker_count,
            bytes,
            elapsed_secs,
            throughput_mib_s,
        });
    }
    Ok(results)
}

/// Worker count with the best measured throughput.
pub fn recommend_worker_count(results: &[BenchResult]) -> Option<usize> {
    results
        .iter()
        .max_by(|a, b| {
            a.throughput_mib_s
                .partial_cmp(&b.throughput_mib_s)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|r| r.worker_count)
}
