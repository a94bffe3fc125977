//! Test data builders
//!
//! Builder patterns for function units and statement shorthands.

use symbex_engine::shared::models::{Expr, FunctionUnit, Line, Param, Stmt};

/// Builder for FunctionUnit
#[derive(Debug, Default)]
pub struct FunctionBuilder {
    name: String,
    params: Vec<Param>,
    body: Vec<Stmt>,
}

impl FunctionBuilder {
    /// Create a new builder
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Add a typed parameter
    pub fn param(mut self, name: &str, type_tag: &str) -> Self {
        self.params.push(Param::new(name, type_tag));
        self
    }

    /// Add boolean parameters
    pub fn bools(mut self, names: &[&str]) -> Self {
        self.params
            .extend(names.iter().map(|n| Param::new(*n, "bool")));
        self
    }

    /// Append a statement
    pub fn stmt(mut self, stmt: Stmt) -> Self {
        self.body.push(stmt);
        self
    }

    /// Build the final FunctionUnit
    pub fn build(self) -> FunctionUnit {
        FunctionUnit::new(self.name, self.params, self.body)
    }
}

pub fn when(line: Line, test: Expr, body: Vec<Stmt>) -> Stmt {
    when_else(line, test, body, vec![])
}

pub fn when_else(line: Line, test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Stmt {
    Stmt::Conditional {
        line,
        test,
        body,
        orelse,
    }
}

pub fn while_loop(line: Line, test: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::Loop { line, test, body }
}

pub fn declare(line: Line, target: &str, type_tag: &str, value: Expr) -> Stmt {
    Stmt::Declaration {
        line,
        target: target.to_string(),
        annotation: type_tag.to_string(),
        value: Some(value),
    }
}

pub fn assign(line: Line, target: &str, value: Expr) -> Stmt {
    Stmt::Reassignment {
        line,
        targets: vec![target.to_string()],
        value,
    }
}

pub fn ret(line: Line) -> Stmt {
    Stmt::Other {
        line,
        label: Some("return".to_string()),
    }
}

pub fn id(name: &str) -> Expr {
    Expr::ident(name)
}

pub fn not(expr: Expr) -> Expr {
    Expr::not(expr)
}

pub fn and(operands: Vec<Expr>) -> Expr {
    Expr::and(operands)
}

pub fn or(operands: Vec<Expr>) -> Expr {
    Expr::or(operands)
}
