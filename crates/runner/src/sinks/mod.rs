//! Export sink implementations.

pub mod fs;
pub mod log;

pub use fs::FsSink;
pub use log::LogSink;
