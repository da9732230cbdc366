//! Persistence layer for the FLIRT backend.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations, including the transactional claim lifecycle

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
