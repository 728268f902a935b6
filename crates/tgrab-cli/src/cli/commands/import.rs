//! `tgrab import` – run one file through the download queue into the library.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use tgrab_core::config;
use tgrab_core::mapper::TitleMapper;
use tgrab_core::queue::{DownloadQueue, Job};
use tgrab_core::rename;
use tgrab_core::reporter::ConsoleReporter;
use tgrab_core::transport::FileTransport;

pub async fn run_import(
    source: &Path,
    raw_title: &str,
    season: Option<u32>,
    episode: Option<u32>,
    workers: Option<usize>,
    library: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(source.is_file(), "source not found: {}", source.display());
    let cfg = config::load_or_init().context("load config")?;

    // Known mapping wins over the raw title; either way the name is
    // sanitized before it becomes a directory.
    let mapper_path = TitleMapper::default_path().context("resolve mapping store path")?;
    let mapper = TitleMapper::open(mapper_path);
    let canonical = mapper
        .get(raw_title)
        .map(str::to_string)
        .unwrap_or_else(|| raw_title.to_string());
    let title = rename::sanitize_title(&canonical);
    anyhow::ensure!(!title.is_empty(), "title is empty after sanitizing");

    let source_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("video.mp4");
    let ext = rename::extension_or_default(source_name);
    let filename = rename::episode_filename(&title, season, episode, &ext);
    let library_dir = library.unwrap_or_else(|| cfg.library_dir.clone());
    let destination = rename::target_path(&library_dir, &title, &filename)
        .with_context(|| format!("create library dir under {}", library_dir.display()))?;

    let mut queue_opts = cfg.queue_options();
    if let Some(w) = workers {
        queue_opts.download.worker_count = w.max(1);
    }

    let queue = DownloadQueue::start(queue_opts);
    let ack = queue.submit(Job {
        transport: Arc::new(FileTransport::new(source)),
        destination: destination.clone(),
        reporter: Arc::new(ConsoleReporter),
    })?;
    if ack.queue_position > 0 {
        println!("queued behind {} job(s)", ack.queue_position);
    }

    // Drain the queue; the job reports progress and outcome on stdout.
    queue.shutdown().await;

    if destination.exists() {
        tracing::info!("import finished: {}", destination.display());
        println!("imported to {}", destination.display());
        Ok(())
    } else {
        anyhow::bail!("import failed; see log for details")
    }
}
