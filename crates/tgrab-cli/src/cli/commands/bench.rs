//! `tgrab bench` – measure throughput at several worker counts.

use std::path::Path;

use anyhow::Result;

use tgrab_core::bench::{self, DEFAULT_WORKER_COUNTS};

pub async fn run_bench(source: &Path, workers: Option<Vec<usize>>) -> Result<()> {
    let counts = workers.unwrap_or_else(|| DEFAULT_WORKER_COUNTS.to_vec());
    anyhow::ensure!(!counts.is_empty(), "no worker counts given");

    println!("benchmarking {} ...", source.display());
    let results = bench::run_bench(source, &counts).await?;

    println!("{:>8}  {:>12}  {:>10}  {:>10}", "workers", "bytes", "secs", "MiB/s");
    for r in &results {
        println!(
            "{:>8}  {:>12}  {:>10.2}  {:>10.2}",
            r.worker_count, r.bytes, r.elapsed_secs, r.throughput_mib_s
        );
    }
    if let Some(best) = bench::recommend_worker_count(&results) {
        println!("recommended worker count: {best}");
    }
    Ok(())
}
