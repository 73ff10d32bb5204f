//! Persistence layer for the Matchday backup runner.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations backing the domain's store traits

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
