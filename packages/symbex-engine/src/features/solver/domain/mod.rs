//! Solver Domain Models
//!
//! Terms, variable handles and check outcomes shared by every backend.

pub mod model;
pub mod term;

pub use model::{Model, SatOutcome};
pub use term::{SymVar, Term, VarId};
