//! Abstraction over the chunked media transport.
//!
//! The remote protocol addresses objects in fixed-size blocks ("fetch
//! units"), not raw byte offsets: a fetch names a starting block and a block
//! count and yields the blocks lazily, in order. A stream is finite and not
//! restartable; retrying a segment means issuing a fresh fetch.

mod file;

pub use file::FileTransport;

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::error::TransportError;

/// Default block granularity for media transports (1 MiB).
pub const DEFAULT_FETCH_UNIT: u64 = 1024 * 1024;

/// Descriptor of one remote object. Immutable once known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteObject {
    /// Total object length in bytes.
    pub total_len: u64,
    /// Minimum addressable block size of the transport; segment boundaries
    /// must be multiples of this.
    pub fetch_unit: u64,
}

/// Lazy, finite sequence of byte blocks for one fetched range. Every block
/// is one fetch unit except possibly the last, which may be shorter.
pub type BlockStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Capability to describe a remote object and fetch block-aligned ranges
/// of it. Offsets and limits are expressed in fetch units, not bytes.
#[async_trait]
pub trait MediaTransport: Send + Sync {
    /// Resolve the object's total length and block granularity.
    async fn describe(&self) -> Result<RemoteObject, TransportError>;

    /// Start fetching `limit_units` blocks beginning at block `offset_units`.
    /// The stream may end early at the object's end.
    async fn fetch(&self, offset_units: u64, limit_units: u64)
        -> Result<BlockStream, TransportError>;
}
