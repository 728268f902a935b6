//! Segment type and fetch-unit-aligned planning.

/// A single segment: byte range [start, end) (half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Start offset (inclusive). Always a multiple of the fetch unit.
    pub start: u64,
    /// End offset (exclusive).
    pub end: u64,
}

impl Segment {
    /// Length of this segment in bytes.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Builds a segment plan for `total_len` bytes split across up to `workers`
/// concurrent fetchers, with every boundary aligned to `fetch_unit`.
///
/// Each worker gets `(total_len / workers)` rounded down to the nearest
/// fetch-unit multiple; when that rounds to zero (object smaller than
/// `workers * fetch_unit`) each worker gets one whole fetch unit so small
/// objects still make progress. The last active worker absorbs the
/// unaligned remainder, which may exceed the per-worker share. Workers whose
/// start offset would land at or past `total_len` are dropped, so the plan
/// may contain fewer entries than `workers`.
///
/// Returns an empty plan when `total_len`, `fetch_unit`, or `workers` is 0.
pub fn plan_segments(total_len: u64, fetch_unit: u64, workers: usize) -> Vec<Segment> {
    if total_len == 0 || fetch_unit == 0 || workers == 0 {
        return Vec::new();
    }

    let workers = workers as u64;
    let raw = total_len / workers;
    let mut aligned = raw - raw % fetch_unit;
    if aligned == 0 {
        aligned = fetch_unit;
    }

    let mut out = Vec::with_capacity(workers as usize);
    for i in 0..workers {
        let start = i * aligned;
        if start >= total_len {
            break;
        }
        let end = if i == workers - 1 {
            total_len
        } else {
            (start + aligned).min(total_len)
        };
        out.push(Segment { start, end });
    }

    out
}
