use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::downloader::DownloadOptions;
use crate::queue::QueueOptions;
use crate::ratelimit::RateLimiter;

/// Global configuration loaded from `~/.config/tgrab/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TgrabConfig {
    /// Root directory the media library is written under.
    pub library_dir: PathBuf,
    /// Concurrent segment fetchers per download job.
    pub worker_count: usize,
    /// Max calls to the classification service per trailing window.
    pub classifier_max_calls: usize,
    /// Trailing window for the classifier rate limit, in seconds.
    pub classifier_window_secs: u64,
    /// Pause after a queue worker fault before resuming, in seconds.
    pub queue_retry_delay_secs: u64,
    /// Progress counter poll interval, in seconds.
    pub progress_poll_secs: u64,
    /// Minimum spacing between emitted progress reports, in seconds.
    pub report_min_interval_secs: u64,
}

impl Default for TgrabConfig {
    fn default() -> Self {
        Self {
            library_dir: PathBuf::from("downloads"),
            worker_count: 4,
            classifier_max_calls: 5,
            classifier_window_secs: 60,
            queue_retry_delay_secs: 5,
            progress_poll_secs: 2,
            report_min_interval_secs: 3,
        }
    }
}

impl TgrabConfig {
    /// Download tuning derived from this config.
    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            worker_count: self.worker_count,
            poll_interval: Duration::from_secs(self.progress_poll_secs),
            report_min_interval: Duration::from_secs(self.report_min_interval_secs),
        }
    }

    /// Queue tuning derived from this config.
    pub fn queue_options(&self) -> QueueOptions {
        QueueOptions {
            download: self.download_options(),
            retry_delay: Duration::from_secs(self.queue_retry_delay_secs),
        }
    }

    pub fn classifier_window(&self) -> Duration {
        Duration::from_secs(self.classifier_window_secs)
    }

    /// Rate limiter gating calls to the classification service.
    pub fn classifier_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.classifier_max_calls, self.classifier_window())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tgrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TgrabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TgrabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = std::fs::read_to_string(&path)?;
    let cfg: TgrabConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = TgrabConfig::default();
        assert_eq!(cfg.worker_count, 4);
        assert_eq!(cfg.classifier_max_calls, 5);
        assert_eq!(cfg.classifier_window_secs, 60);
        assert_eq!(cfg.queue_retry_delay_secs, 5);
        assert_eq!(cfg.progress_poll_secs, 2);
        assert_eq!(cfg.report_min_interval_secs, 3);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = TgrabConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: TgrabConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.worker_count, cfg.worker_count);
        assert_eq!(parsed.library_dir, cfg.library_dir);
        assert_eq!(parsed.classifier_max_calls, cfg.classifier_max_calls);
    }

    #[tokio::test(start_paused = true)]
    async fn classifier_limiter_enforces_configured_capacity() {
        let cfg = TgrabConfig {
            classifier_max_calls: 2,
            classifier_window_secs: 30,
            ..TgrabConfig::default()
        };
        let limiter = cfg.classifier_limiter();
        let t0 = tokio::time::Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert_eq!(t0.elapsed(), Duration::ZERO);
        limiter.acquire().await;
        assert!(t0.elapsed() >= Duration::from_secs(30));
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            library_dir = "/data/library"
            worker_count = 8
            classifier_max_calls = 10
            classifier_window_secs = 30
            queue_retry_delay_secs = 2
            progress_poll_secs = 1
            report_min_interval_secs = 5
        "#;
        let cfg: TgrabConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.library_dir, PathBuf::from("/data/library"));
        assert_eq!(cfg.worker_count, 8);
        assert_eq!(cfg.classifier_window(), Duration::from_secs(30));
        let opts = cfg.download_options();
        assert_eq!(opts.worker_count, 8);
        assert_eq!(opts.poll_interval, Duration::from_secs(1));
        assert_eq!(opts.report_min_interval, Duration::from_secs(5));
    }
}
