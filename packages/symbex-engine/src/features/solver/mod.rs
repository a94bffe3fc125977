//! Solver Module
//!
//! Satisfiability checking for path constraints.
//!
//! ## Architecture
//!
//! ```text
//! solver
//! ├── domain/               # Term, SymVar, Model, SatOutcome
//! ├── ports/                # SolverBackend trait
//! └── infrastructure/       # Backends
//!     ├── bounded_search    # Built-in search
//!     └── z3_backend        # Z3 (feature = "z3")
//! ```

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{Model, SatOutcome, SymVar, Term, VarId};
pub use infrastructure::{build_backend, BoundedSearchSolver};
pub use ports::SolverBackend;
