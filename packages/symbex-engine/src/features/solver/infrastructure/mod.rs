//! Solver Implementations
//!
//! 1. **BoundedSearch**: built-in assignment search (always available)
//! 2. **Z3Backend**: full SMT solver (optional, feature-gated)

use crate::config::{BackendKind, SolverConfig};
use crate::errors::Result;
use crate::features::solver::ports::SolverBackend;

pub mod bounded_search;

#[cfg(feature = "z3")]
pub mod z3_backend;

pub use bounded_search::BoundedSearchSolver;

#[cfg(feature = "z3")]
pub use z3_backend::Z3Backend;

/// Instantiate the configured backend
///
/// Requesting Z3 from a build without the `z3` feature is fatal.
pub fn build_backend(config: &SolverConfig) -> Result<Box<dyn SolverBackend>> {
    match config.backend {
        BackendKind::Bounded => Ok(Box::new(BoundedSearchSolver::new(config))),
        #[cfg(feature = "z3")]
        BackendKind::Z3 => Ok(Box::new(Z3Backend::new(config))),
        #[cfg(not(feature = "z3"))]
        BackendKind::Z3 => Err(crate::errors::SymbexError::SolverUnavailable(
            "z3 backend requested but symbex-engine was built without the `z3` feature"
                .to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend_is_bounded() {
        let backend = build_backend(&SolverConfig::default()).unwrap();
        assert_eq!(backend.name(), "bounded");
    }

    #[cfg(not(feature = "z3"))]
    #[test]
    fn test_z3_without_feature_is_fatal() {
        let config = SolverConfig {
            backend: BackendKind::Z3,
            ..SolverConfig::default()
        };
        let err = build_backend(&config).err().unwrap();
        assert!(err.is_fatal());
    }
}
