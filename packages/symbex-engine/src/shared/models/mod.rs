//! Shared models

pub mod syntax;
pub mod value;

pub use syntax::{Expr, FunctionUnit, Line, ModuleUnit, Param, Stmt};
pub use value::{apply_arith, apply_cmp, apply_neg, ArithOp, CmpOp, Sort, Value};
