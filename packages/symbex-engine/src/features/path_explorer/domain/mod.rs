//! Path Explorer Domain Models
//!
//! Constraint store and the records produced by exploration.

pub mod constraint_store;
pub mod results;

pub use constraint_store::{ConstraintStore, DeferredConstraint};
pub use results::{
    AnalysisReport, BranchSnapshot, Diagnostic, DiagnosticKind, ExplorationStats, InputBinding,
    TestCase, Violation,
};
