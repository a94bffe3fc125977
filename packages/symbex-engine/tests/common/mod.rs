//! Common test utilities for symbex-engine
//!
//! Shared builders and fixture functions for integration tests.

#![allow(dead_code)]

mod builders;
mod fixtures;

// Re-export all utilities
pub use builders::*;
pub use fixtures::*;
