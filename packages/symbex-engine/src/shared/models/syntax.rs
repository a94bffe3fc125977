//! Syntax tree models
//!
//! Normalized, language-agnostic statement/expression tree consumed by the
//! path explorer. Produced by an external front-end and exchanged as JSON,
//! internally tagged by `kind`:
//!
//! ```json
//! {
//!   "name": "f",
//!   "params": [{ "name": "a", "type": "bool" }],
//!   "body": [
//!     {
//!       "kind": "conditional",
//!       "line": 3,
//!       "test": { "kind": "identifier", "name": "a" },
//!       "body": [{ "kind": "other", "line": 4, "label": "return" }],
//!       "orelse": []
//!     }
//!   ]
//! }
//! ```
//!
//! Operator and type fields are registry tags (`"And"`, `"Gt"`, `"int"`, ...),
//! resolved at analysis time so unknown tags surface as diagnostics instead of
//! parse failures.

use super::value::Value;
use crate::errors::{Result, SymbexError};
use serde::{Deserialize, Serialize};

/// Source line number (1-based)
pub type Line = u32;

/// Module: every function definition found by the front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModuleUnit {
    #[serde(default)]
    pub functions: Vec<FunctionUnit>,
}

impl ModuleUnit {
    /// Parse a module from its JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SymbexError::parse_failure(e.to_string()))
    }
}

/// Function definition: the unit of analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionUnit {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

impl FunctionUnit {
    pub fn new(name: impl Into<String>, params: Vec<Param>, body: Vec<Stmt>) -> Self {
        Self {
            name: name.into(),
            params,
            body,
        }
    }

    /// Parse a single function from its JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SymbexError::parse_failure(e.to_string()))
    }
}

/// Typed function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: String,
}

impl Param {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
        }
    }
}

/// Statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    /// `target: annotation = value`
    Declaration {
        line: Line,
        target: String,
        annotation: String,
        #[serde(default)]
        value: Option<Expr>,
    },

    /// `t1 = t2 = value`
    Reassignment {
        line: Line,
        targets: Vec<String>,
        value: Expr,
    },

    /// `if test: body else: orelse` (elif chains nest in `orelse`)
    Conditional {
        line: Line,
        test: Expr,
        #[serde(default)]
        body: Vec<Stmt>,
        #[serde(default)]
        orelse: Vec<Stmt>,
    },

    /// `while test: body`
    Loop {
        line: Line,
        test: Expr,
        #[serde(default)]
        body: Vec<Stmt>,
    },

    /// Anything the explorer does not model (return, pass, calls, ...)
    Other {
        line: Line,
        #[serde(default)]
        label: Option<String>,
    },
}

impl Stmt {
    pub fn line(&self) -> Line {
        match self {
            Self::Declaration { line, .. }
            | Self::Reassignment { line, .. }
            | Self::Conditional { line, .. }
            | Self::Loop { line, .. }
            | Self::Other { line, .. } => *line,
        }
    }
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Identifier {
        name: String,
    },

    Literal {
        value: Value,
    },

    /// `not x`, `-x`
    Unary {
        op: String,
        operand: Box<Expr>,
    },

    /// N-ary `and` / `or`
    Connective {
        op: String,
        operands: Vec<Expr>,
    },

    /// `left op0 c0 op1 c1 ...` (chained comparisons)
    Comparison {
        left: Box<Expr>,
        ops: Vec<String>,
        comparators: Vec<Expr>,
    },

    /// `left op right`
    Arithmetic {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Identifier { name: name.into() }
    }

    pub fn lit(value: impl Into<Value>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    pub fn unary(op: impl Into<String>, operand: Expr) -> Self {
        Self::Unary {
            op: op.into(),
            operand: Box::new(operand),
        }
    }

    pub fn not(operand: Expr) -> Self {
        Self::unary("Not", operand)
    }

    pub fn connective(op: impl Into<String>, operands: Vec<Expr>) -> Self {
        Self::Connective {
            op: op.into(),
            operands,
        }
    }

    pub fn and(operands: Vec<Expr>) -> Self {
        Self::connective("And", operands)
    }

    pub fn or(operands: Vec<Expr>) -> Self {
        Self::connective("Or", operands)
    }

    /// Single (non-chained) comparison
    pub fn compare(left: Expr, op: impl Into<String>, right: Expr) -> Self {
        Self::Comparison {
            left: Box::new(left),
            ops: vec![op.into()],
            comparators: vec![right],
        }
    }

    pub fn arith(left: Expr, op: impl Into<String>, right: Expr) -> Self {
        Self::Arithmetic {
            op: op.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_from_json() {
        let json = r#"{
            "name": "f",
            "params": [{"name": "a", "type": "bool"}],
            "body": [
                {"kind": "declaration", "line": 2, "target": "c", "annotation": "int",
                 "value": {"kind": "literal", "value": 3}},
                {"kind": "conditional", "line": 3,
                 "test": {"kind": "connective", "op": "And", "operands": [
                    {"kind": "identifier", "name": "a"},
                    {"kind": "comparison", "left": {"kind": "identifier", "name": "c"},
                     "ops": ["Gt"], "comparators": [{"kind": "literal", "value": 1}]}
                 ]},
                 "body": [{"kind": "other", "line": 4, "label": "return"}]}
            ]
        }"#;

        let func = FunctionUnit::from_json(json).unwrap();
        assert_eq!(func.name, "f");
        assert_eq!(func.params, vec![Param::new("a", "bool")]);
        assert_eq!(func.body.len(), 2);
        assert_eq!(func.body[1].line(), 3);

        match &func.body[1] {
            Stmt::Conditional { test, orelse, .. } => {
                assert!(orelse.is_empty());
                assert_eq!(
                    test,
                    &Expr::and(vec![
                        Expr::ident("a"),
                        Expr::compare(Expr::ident("c"), "Gt", Expr::lit(1)),
                    ])
                );
            }
            other => panic!("expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_tree_is_parse_failure() {
        let err = FunctionUnit::from_json(r#"{"name": "f", "body": [{"kind": "goto"}]}"#)
            .unwrap_err();
        assert!(matches!(err, SymbexError::ParseFailure(_)));
        assert!(err.is_fatal());
    }
}
