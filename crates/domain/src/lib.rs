//! Domain layer for the Matchday backup runner.
//!
//! This crate contains:
//! - Domain models (export summaries, backup results, audit events)
//! - Backup and export service logic
//! - Collaborator traits for the row store, export sink and audit store

pub mod models;
pub mod services;
pub mod stores;
