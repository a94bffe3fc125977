//! Path Explorer Module
//!
//! Path-sensitive symbolic execution of one function body: every branch
//! decision point yields either a concrete input reaching it or a record that
//! it is unreachable.
//!
//! ## Architecture
//!
//! ```text
//! path_explorer
//! ├── domain/               # ConstraintStore, TestCase, Violation, reports
//! ├── infrastructure/       # Implementation
//! │   ├── explorer          # Statement dispatch, snapshot/restore
//! │   └── translator        # Expression → Term
//! └── application/          # analyze_function / analyze_module
//! ```
//!
//! ## Usage
//!
//! ```text
//! use symbex_engine::config::ExplorerConfig;
//! use symbex_engine::features::path_explorer::analyze_function;
//! use symbex_engine::shared::models::FunctionUnit;
//!
//! let function = FunctionUnit::from_json(&json)?;
//! let report = analyze_function(&function, &ExplorerConfig::default())?;
//! for test_case in &report.test_cases {
//!     println!("{}", test_case);
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export application layer
pub use application::{
    analyze_function, analyze_module, AnalyzeUseCase, AnalyzeUseCaseImpl,
};

// Domain models
pub use domain::{
    AnalysisReport, BranchSnapshot, ConstraintStore, DeferredConstraint, Diagnostic,
    DiagnosticKind, ExplorationStats, InputBinding, TestCase, Violation,
};

pub use infrastructure::{ExpressionTranslator, PathExplorer};
