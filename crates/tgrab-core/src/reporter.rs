//! Destination for human-readable progress and status text.
//!
//! The underlying channel (a chat message being edited, a terminal, a log)
//! may itself be throttled or unavailable; delivery is best effort and
//! implementations swallow their own failures.

use async_trait::async_trait;

/// Best-effort text reporter consumed by the download engine.
#[async_trait]
pub trait Reporter: Send + Sync {
    async fn report(&self, text: &str);
}

/// Reporter that prints to stdout (CLI).
pub struct ConsoleReporter;

#[async_trait]
impl Reporter for ConsoleReporter {
    async fn report(&self, text: &str) {
        println!("{text}");
    }
}

/// Reporter that drops everything (bench runs).
pub struct NullReporter;

#[async_trait]
impl Reporter for NullReporter {
    async fn report(&self, _text: &str) {}
}
