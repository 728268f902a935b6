//! Sink file: preallocated local target for concurrent segment writes.
//!
//! One job writes through a single shared file handle. Segment regions are
//! disjoint, but the seek-then-write primitive is not concurrent-safe, so
//! every write takes the sink lock for the whole seek+write pair. Data lands
//! in a `.part` file that is renamed into place on success and deleted on
//! failure.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::error::SinkError;

/// Temporary file suffix used before the final rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the in-progress file: appends `.part` to the final path.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Fixed-length sink for one download job. Shared by all segment workers;
/// writes are serialized behind an internal lock.
pub struct SinkFile {
    file: Mutex<File>,
    temp_path: PathBuf,
}

impl SinkFile {
    /// Create the temp file and preallocate `total_len` bytes. Overwrites a
    /// stale `.part` left by an earlier failed run.
    pub fn create(temp_path: &Path, total_len: u64) -> Result<Self, SinkError> {
        let file = std::fs::File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)
            .map_err(|e| SinkError::new("create", temp_path, e))?;
        preallocate(&file, total_len).map_err(|e| SinkError::new("preallocate", temp_path, e))?;
        Ok(Self {
            file: Mutex::new(File::from_std(file)),
            temp_path: temp_path.to_path_buf(),
        })
    }

    /// Write `data` at byte `offset`. Exclusive for the seek+write pair;
    /// blocking I/O stays off the runtime workers.
    pub async fn write_at(&self, offset: u64, data: &[u8]) -> Result<(), SinkError> {
        let mut file = self.file.lock().await;
        file.seek(SeekFrom::Start(offset))
            .await
            .map_err(|e| SinkError::new("write_at", &self.temp_path, e))?;
        file.write_all(data)
            .await
            .map_err(|e| SinkError::new("write_at", &self.temp_path, e))
    }

    /// Flush file data to disk. Call before `finalize` for durability.
    pub async fn sync(&self) -> Result<(), SinkError> {
        let file = self.file.lock().await;
        file.sync_all()
            .await
            .map_err(|e| SinkError::new("sync", &self.temp_path, e))
    }

    /// Path of the in-progress temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Rename the temp file to its final path.
    pub fn finalize(&self, final_path: &Path) -> Result<(), SinkError> {
        std::fs::rename(&self.temp_path, final_path)
            .map_err(|e| SinkError::new("finalize", final_path, e))
    }

    /// Delete the partially written temp file after a failed job. Best
    /// effort: a leftover `.part` is logged, not fatal.
    pub fn discard(&self) {
        if let Err(e) = std::fs::remove_file(&self.temp_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    error = %e,
                    "could not remove partial file {}",
                    self.temp_path.display()
                );
            }
        }
    }
}

/// Preallocate `len` bytes. On Unix tries `posix_fallocate` for real block
/// allocation; falls back to `set_len` on failure or non-Unix.
fn preallocate(file: &std::fs::File, len: u64) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        let r = unsafe { libc::posix_fallocate(file.as_raw_fd(), 0, len as libc::off_t) };
        if r == 0 {
            return Ok(());
        }
        tracing::debug!(errno = r, "posix_fallocate failed, falling back to set_len");
    }
    file.set_len(len)
}
