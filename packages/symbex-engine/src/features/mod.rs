//! Feature modules
//!
//! - path_explorer: symbolic execution over function bodies
//! - registry: operator/type tag tables
//! - solver: satisfiability backends

pub mod path_explorer;
pub mod registry;
pub mod solver;
