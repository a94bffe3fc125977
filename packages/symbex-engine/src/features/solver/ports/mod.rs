//! Solver Ports
//!
//! Boundary contract for SMT-style engines. Every check receives the full
//! constraint set of the current path and builds an independent context, so
//! backends need no incremental push/pop.

use crate::features::solver::domain::{SatOutcome, Term};

/// Solver capability trait
pub trait SolverBackend: Send + Sync {
    /// Name of this solver
    fn name(&self) -> &'static str;

    /// Check the conjunction of `assertions`
    fn check(&self, assertions: &[Term]) -> SatOutcome;
}
