//! CLI for the tgrab media downloader.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{run_bench, run_import, run_map};

/// Top-level CLI for the tgrab media downloader.
#[derive(Debug, Parser)]
#[command(name = "tgrab")]
#[command(about = "tgrab: segmented media downloader with a single-flight import queue", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Import a media file into the library through the download engine.
    Import {
        /// Source media file.
        source: PathBuf,
        /// Raw title as it appears on the source (looked up in the mapping
        /// store, then sanitized).
        #[arg(long)]
        title: String,
        /// Season number (defaults to 1 when an episode is given).
        #[arg(long)]
        season: Option<u32>,
        /// Episode number; omit for movies/clips.
        #[arg(long)]
        episode: Option<u32>,
        /// Override the configured worker count.
        #[arg(long, value_name = "N")]
        workers: Option<usize>,
        /// Override the configured library directory.
        #[arg(long, value_name = "DIR")]
        library: Option<PathBuf>,
    },

    /// Measure throughput at several worker counts over a source file.
    Bench {
        /// Source media file.
        source: PathBuf,
        /// Comma-separated worker counts to try (default 2,4,8).
        #[arg(long, value_delimiter = ',', value_name = "N,N,...")]
        workers: Option<Vec<usize>>,
    },

    /// Look up a title mapping, or add one when CANONICAL is given.
    Map {
        /// Raw title as seen on incoming media.
        raw: String,
        /// Canonical title to store for it.
        canonical: Option<String>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        match cli.command {
            CliCommand::Import {
                source,
                title,
                season,
                episode,
                workers,
                library,
            } => run_import(&source, &title, season, episode, workers, library).await,
            CliCommand::Bench { source, workers } => run_bench(&source, workers).await,
            CliCommand::Map { raw, canonical } => run_map(&raw, canonical.as_deref()),
        }
    }
}
