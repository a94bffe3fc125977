//! Error types for symbex-engine
//!
//! Provides unified error handling across the crate.
//!
//! Unsatisfiable paths and solver timeouts are outcomes, not errors: they are
//! reported as violations and diagnostics respectively.

use thiserror::Error;

/// Main error type for symbex-engine operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbexError {
    /// The front-end could not produce a syntax tree (fatal for that input)
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    /// Reference to a name that was never declared
    #[error("Unbound variable '{name}'")]
    UnboundVariable { name: String },

    /// Operator tag missing from the registry
    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    /// Type tag missing from the registry
    #[error("Unknown type '{0}'")]
    UnknownType(String),

    /// Typed constructor rejected its operands and no fallback applied
    #[error("Cannot construct '{op}': {detail}")]
    SolverConstruction { op: String, detail: String },

    /// Name redeclared with a different type
    #[error("Variable '{name}' already declared as {existing}, cannot redeclare as {declared}")]
    TypeConflict {
        name: String,
        existing: String,
        declared: String,
    },

    /// Configured path constraint capacity exceeded
    #[error("Path constraint capacity of {limit} exceeded")]
    CapacityExceeded { limit: usize },

    /// Requested solver backend is not available in this build
    #[error("Solver unavailable: {0}")]
    SolverUnavailable(String),
}

impl SymbexError {
    /// Create a parse failure
    pub fn parse_failure(msg: impl Into<String>) -> Self {
        SymbexError::ParseFailure(msg.into())
    }

    /// Create an unbound variable error
    pub fn unbound(name: impl Into<String>) -> Self {
        SymbexError::UnboundVariable { name: name.into() }
    }

    /// Create a construction failure
    pub fn construction(op: impl Into<String>, detail: impl Into<String>) -> Self {
        SymbexError::SolverConstruction {
            op: op.into(),
            detail: detail.into(),
        }
    }

    /// Whether this error aborts the whole run
    ///
    /// Everything else is recorded as a diagnostic and analysis continues.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SymbexError::ParseFailure(_) | SymbexError::SolverUnavailable(_)
        )
    }
}

/// Result type alias for symbex operations
pub type Result<T> = std::result::Result<T, SymbexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(SymbexError::parse_failure("bad json").is_fatal());
        assert!(SymbexError::SolverUnavailable("z3".into()).is_fatal());
        assert!(!SymbexError::unbound("x").is_fatal());
        assert!(!SymbexError::UnknownOperator("Pow".into()).is_fatal());
        assert!(!SymbexError::CapacityExceeded { limit: 4 }.is_fatal());
    }

    #[test]
    fn test_error_formatting() {
        assert_eq!(SymbexError::unbound("x").to_string(), "Unbound variable 'x'");
        assert_eq!(
            SymbexError::construction("Add", "expected Int operands").to_string(),
            "Cannot construct 'Add': expected Int operands"
        );
    }
}
