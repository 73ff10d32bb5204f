//! Matchday backup runner: scheduled logical exports with an audit trail.
//!
//! The binary in `main.rs` wires configuration, the database pool and the
//! domain services together and hands them to the job scheduler.

pub mod config;
pub mod jobs;
pub mod logging;
pub mod sinks;
