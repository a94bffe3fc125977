/*
 * Symbex Engine - Path-Sensitive Symbolic Execution
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Syntax tree and value models (input boundary)
 * - features/    : Vertical slices (registry → solver → path_explorer)
 * - config/      : Presets + versioned YAML
 * - errors       : Error taxonomy
 *
 * Output per function: test cases for reachable branches, violations for
 * unreachable ones, diagnostics for everything that could not be modeled.
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models (syntax tree, values)
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ExplorerConfig, Preset};
pub use errors::{Result, SymbexError};
pub use features::path_explorer::{
    analyze_function, analyze_module, AnalysisReport, Diagnostic, DiagnosticKind, TestCase,
    Violation,
};
pub use shared::models::{FunctionUnit, ModuleUnit};
