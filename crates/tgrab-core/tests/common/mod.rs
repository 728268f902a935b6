//! Test transports and reporters for integration tests.
//!
//! `PatternTransport` serves deterministic, offset-derived bytes so tests
//! can verify every offset of the final file independently of interleaving.
//! `FailingTransport` injects a transport failure at a chosen block.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;

use tgrab_core::error::TransportError;
use tgrab_core::reporter::Reporter;
use tgrab_core::transport::{BlockStream, MediaTransport, RemoteObject};

/// Byte value at `offset`, derived only from the offset.
pub fn pattern_byte(offset: u64) -> u8 {
    (offset.wrapping_mul(31) % 251) as u8
}

/// The full expected body of a pattern object.
pub fn pattern_body(total_len: u64) -> Vec<u8> {
    (0..total_len).map(pattern_byte).collect()
}

/// In-memory transport returning offset-derived bytes.
pub struct PatternTransport {
    pub total_len: u64,
    pub fetch_unit: u64,
}

impl PatternTransport {
    pub fn new(total_len: u64, fetch_unit: u64) -> Self {
        Self {
            total_len,
            fetch_unit,
        }
    }

    fn blocks(&self, offset_units: u64, limit_units: u64) -> Vec<Result<Bytes, TransportError>> {
        let mut out = Vec::new();
        for i in 0..limit_units {
            let start = (offset_units + i) * self.fetch_unit;
            if start >= self.total_len {
                break;
            }
            let end = (start + self.fetch_unit).min(self.total_len);
            let block: Vec<u8> = (start..end).map(pattern_byte).collect();
            out.push(Ok(Bytes::from(block)));
        }
        out
    }
}

#[async_trait]
impl MediaTransport for PatternTransport {
    async fn describe(&self) -> Result<RemoteObject, TransportError> {
        Ok(RemoteObject {
            total_len: self.total_len,
            fetch_unit: self.fetch_unit,
        })
    }

    async fn fetch(
        &self,
        offset_units: u64,
        limit_units: u64,
    ) -> Result<BlockStream, TransportError> {
        Ok(Box::pin(stream::iter(
            self.blocks(offset_units, limit_units),
        )))
    }
}

/// Pattern transport that fails every block at or past `fail_from_unit`.
pub struct FailingTransport {
    inner: PatternTransport,
    fail_from_unit: u64,
}

impl FailingTransport {
    pub fn new(total_len: u64, fetch_unit: u64, fail_from_unit: u64) -> Self {
        Self {
            inner: PatternTransport::new(total_len, fetch_unit),
            fail_from_unit,
        }
    }
}

#[async_trait]
impl MediaTransport for FailingTransport {
    async fn describe(&self) -> Result<RemoteObject, TransportError> {
        self.inner.describe().await
    }

    async fn fetch(
        &self,
        offset_units: u64,
        limit_units: u64,
    ) -> Result<BlockStream, TransportError> {
        let mut blocks = Vec::new();
        for i in 0..limit_units {
            let unit = offset_units + i;
            if unit >= self.fail_from_unit {
                blocks.push(Err(TransportError::Protocol(
                    "injected transport failure".into(),
                )));
                break;
            }
            blocks.extend(self.inner.blocks(unit, 1));
        }
        Ok(Box::pin(stream::iter(blocks)))
    }
}

/// Transport that panics as soon as it is used, simulating a crashing job.
pub struct PanickingTransport;

#[async_trait]
impl MediaTransport for PanickingTransport {
    async fn describe(&self) -> Result<RemoteObject, TransportError> {
        panic!("injected job panic");
    }

    async fn fetch(
        &self,
        _offset_units: u64,
        _limit_units: u64,
    ) -> Result<BlockStream, TransportError> {
        panic!("injected job panic");
    }
}

/// Reporter that records every line, prefixed with a job tag.
pub struct TagReporter {
    tag: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl TagReporter {
    pub fn new(tag: &'static str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self { tag, log }
    }
}

#[async_trait]
impl Reporter for TagReporter {
    async fn report(&self, text: &str) {
        self.log.lock().unwrap().push(format!("{}: {}", self.tag, text));
    }
}
