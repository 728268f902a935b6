//! Range math and segment planning.
//!
//! Splits a remote object of known length into per-worker byte ranges whose
//! boundaries stay aligned to the transport's fetch unit, so each worker can
//! request whole protocol blocks.

mod plan;

pub use plan::{plan_segments, Segment};
