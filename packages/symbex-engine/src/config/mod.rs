//! Configuration System
//!
//! This module provides a 2-tier configuration system:
//! - Level 1: Preset - Simple one-liner
//! - Level 2: YAML - Versioned file overriding any preset field
//!
//! # Examples
//!
//! ```rust,ignore
//! use symbex_engine::config::{ExplorerConfig, Preset};
//!
//! // Level 1: Simple preset
//! let config = ExplorerConfig::preset(Preset::Fast);
//!
//! // Level 1b: Override specific fields
//! let config = ExplorerConfig::preset(Preset::Balanced)
//!     .with_timeout_ms(500)
//!     .with_trace_branches(true);
//!
//! // Level 2: Complete control via YAML
//! let config = ExplorerConfig::from_yaml("symbex.yaml")?;
//! ```

pub mod error;
pub mod explorer_config;
pub mod preset;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use explorer_config::{BackendKind, ExplorerConfig, SolverConfig, SUPPORTED_VERSIONS};
pub use preset::Preset;
