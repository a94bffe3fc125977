//! Shared module - Common types and utilities
//!
//! This module contains types that are shared across all features:
//! the syntax tree consumed from the front-end and the concrete value model.

pub mod models;

// Re-exports for convenience
pub use models::*;
