//! Domain layer for the FLIRT lost-and-found backend.
//!
//! This crate contains:
//! - Domain enums (roles, statuses, categories)
//! - Request and response DTOs with validation rules
//! - The uniform API response envelope

pub mod envelope;
pub mod models;
