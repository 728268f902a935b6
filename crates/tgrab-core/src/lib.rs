pub mod config;
pub mod logging;

pub mod bench;
pub mod downloader;
pub mod error;
pub mod mapper;
pub mod pending;
pub mod progress;
pub mod queue;
pub mod ratelimit;
pub mod rename;
pub mod reporter;
pub mod segmenter;
pub mod sink;
pub mod transport;
