//! Path Explorer Infrastructure
//!
//! - explorer: statement dispatch and path bookkeeping
//! - translator: expression → term translation

pub mod explorer;
pub mod translator;

pub use explorer::PathExplorer;
pub use translator::{Bindings, ExpressionTranslator};
