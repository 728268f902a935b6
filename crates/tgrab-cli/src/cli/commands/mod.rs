mod bench;
mod import;
mod map;

pub use bench::run_bench;
pub use import::run_import;
pub use map::run_map;
