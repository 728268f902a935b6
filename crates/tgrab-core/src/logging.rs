//! Logging init: append-only file under the XDG state dir, or stderr when
//! the log file cannot be opened.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Per-event writer: the shared log file when it can be cloned, stderr
/// otherwise.
enum LogTarget {
    File(fs::File),
    Stderr,
}

impl io::Write for LogTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogTarget::File(f) => f.write(buf),
            LogTarget::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogTarget::File(f) => f.flush(),
            LogTarget::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct LogWriter(Option<fs::File>);

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogTarget;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .as_ref()
            .and_then(|f| f.try_clone().ok())
            .map(LogTarget::File)
            .unwrap_or(LogTarget::Stderr)
    }
}

fn open_log_file() -> Option<(fs::File, PathBuf)> {
    let dir = xdg::BaseDirectories::with_prefix("tgrab")
        .ok()?
        .get_state_home();
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join("tgrab.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;
    Some((file, path))
}

/// Initialize structured logging to `~/.local/state/tgrab/tgrab.log`,
/// falling back to stderr when the state dir is unwritable.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tgrab=debug"));

    let opened = open_log_file();
    let path = opened.as_ref().map(|(_, p)| p.clone());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(LogWriter(opened.map(|(f, _)| f)))
        .with_ansi(false)
        .init();

    match path {
        Some(p) => tracing::info!("tgrab logging initialized at {}", p.display()),
        None => tracing::warn!("log file unavailable, logging to stderr"),
    }
}
