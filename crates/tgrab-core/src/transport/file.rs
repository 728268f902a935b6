//! Local-file transport: serves a file on disk as a block-addressed object.
//!
//! Used by the CLI import/bench paths and as a stand-in transport wherever a
//! real chunked remote is not available. Each fetch opens its own handle so
//! concurrent segment fetches never share a file cursor.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::{BlockStream, MediaTransport, RemoteObject, DEFAULT_FETCH_UNIT};
use crate::error::TransportError;

pub struct FileTransport {
    path: PathBuf,
    fetch_unit: u64,
}

impl FileTransport {
    /// Transport over `path` with the default 1 MiB block size.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_fetch_unit(path, DEFAULT_FETCH_UNIT)
    }

    /// Transport over `path` with a custom block size (tests, bench).
    pub fn with_fetch_unit(path: impl Into<PathBuf>, fetch_unit: u64) -> Self {
        Self {
            path: path.into(),
            fetch_unit,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MediaTransport for FileTransport {
    async fn describe(&self) -> Result<RemoteObject, TransportError> {
        let meta = tokio::fs::metadata(&self.path).await?;
        Ok(RemoteObject {
            total_len: meta.len(),
            fetch_unit: self.fetch_unit,
        })
    }

    async fn fetch(
        &self,
        offset_units: u64,
        limit_units: u64,
    ) -> Result<BlockStream, TransportError> {
        let mut file = tokio::fs::File::open(&self.path).await?;
        file.seek(SeekFrom::Start(offset_units * self.fetch_unit))
            .await?;

        let unit = self.fetch_unit as usize;
        let stream = futures::stream::try_unfold(
            (file, limit_units),
            move |(mut file, units_left)| async move {
                if units_left == 0 {
                    return Ok(None);
                }
                let mut buf = vec![0u8; unit];
                let mut filled = 0usize;
                // A single read may return less than a block; keep filling
                // until the block is whole or the file ends.
                while filled < unit {
                    let n = file.read(&mut buf[filled..]).await?;
                    if n == 0 {
                        break;
                    }
                    filled += n;
                }
                if filled == 0 {
                    return Ok(None);
                }
                buf.truncate(filled);
                Ok(Some((Bytes::from(buf), (file, units_left - 1))))
            },
        );
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn describe_reports_file_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obj.bin");
        std::fs::write(&path, vec![7u8; 5000]).unwrap();

        let t = FileTransport::with_fetch_unit(&path, 1024);
        let obj = t.describe().await.unwrap();
        assert_eq!(obj.total_len, 5000);
        assert_eq!(obj.fetch_unit, 1024);
    }

    #[tokio::test]
    async fn fetch_yields_unit_blocks_with_short_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obj.bin");
        let body: Vec<u8> = (0..2500u32).map(|i| (i % 256) as u8).collect();
        std::fs::write(&path, &body).unwrap();

        let t = FileTransport::with_fetch_unit(&path, 1024);
        let blocks: Vec<Bytes> = t.fetch(0, 3).await.unwrap().try_collect().await.unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].len(), 1024);
        assert_eq!(blocks[1].len(), 1024);
        assert_eq!(blocks[2].len(), 452);
        let joined: Vec<u8> = blocks.concat();
        assert_eq!(joined, body);
    }

    #[tokio::test]
    async fn fetch_respects_offset_and_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obj.bin");
        let body: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &body).unwrap();

        let t = FileTransport::with_fetch_unit(&path, 1024);
        let blocks: Vec<Bytes> = t.fetch(1, 2).await.unwrap().try_collect().await.unwrap();
        assert_eq!(blocks.len(), 2);
        let joined: Vec<u8> = blocks.concat();
        assert_eq!(joined, &body[1024..3072]);
    }

    #[tokio::test]
    async fn fetch_past_end_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obj.bin");
        std::fs::write(&path, vec![1u8; 100]).unwrap();

        let t = FileTransport::with_fetch_unit(&path, 1024);
        let blocks: Vec<Bytes> = t.fetch(5, 2).await.unwrap().try_collect().await.unwrap();
        assert!(blocks.is_empty());
    }
}
