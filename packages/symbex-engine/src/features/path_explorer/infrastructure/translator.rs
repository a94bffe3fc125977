//! Expression Translator
//!
//! Turns syntax-tree expressions into solver [`Term`]s against the current
//! name → handle bindings.
//!
//! - Identifiers resolve to their bound handle (`UnboundVariable` otherwise)
//! - Nested connectives with the same operator tag are spliced into one node
//! - Chained comparisons `a < b < c` become `And(a < b, b < c)`
//! - A typed constructor rejecting its operands falls back to the native
//!   operation when every operand is a constant
//! - Tests of a non-boolean sort are coerced by truthiness
//!   (`x != 0`, `s != ""`)

use crate::errors::{Result, SymbexError};
use crate::features::registry::{self, OperatorCtor};
use crate::features::solver::domain::{SymVar, Term};
use crate::shared::models::{CmpOp, Expr, Sort, Value};
use rustc_hash::FxHashMap;

/// Name → handle map of the function under analysis
pub type Bindings = FxHashMap<String, SymVar>;

/// Stateless translator borrowing the current bindings
#[derive(Debug, Clone, Copy)]
pub struct ExpressionTranslator<'b> {
    bindings: &'b Bindings,
}

impl<'b> ExpressionTranslator<'b> {
    pub fn new(bindings: &'b Bindings) -> Self {
        Self { bindings }
    }

    /// Resolve an expression to a term of any sort
    pub fn resolve(&self, expr: &Expr) -> Result<Term> {
        match expr {
            Expr::Identifier { name } => self
                .bindings
                .get(name)
                .map(Term::var)
                .ok_or_else(|| SymbexError::unbound(name)),

            Expr::Literal { value } => Ok(Term::Const(value.clone())),

            Expr::Unary { op, operand } => {
                let ctor = registry::operator(op)?;
                let operand = self.resolve(operand)?;
                self.construct_logical(op, ctor, vec![operand])
            }

            Expr::Connective { op, operands } => {
                let ctor = registry::operator(op)?;
                let mut flat = Vec::with_capacity(operands.len());
                flatten(op, operands, &mut flat);
                let resolved = flat
                    .into_iter()
                    .map(|e| self.resolve(e))
                    .collect::<Result<Vec<_>>>()?;
                self.construct_logical(op, ctor, resolved)
            }

            Expr::Comparison {
                left,
                ops,
                comparators,
            } => self.resolve_comparison(left, ops, comparators),

            Expr::Arithmetic { op, left, right } => {
                let ctor = registry::operator(op)?;
                let operands = [self.resolve(left)?, self.resolve(right)?];
                construct(op, ctor, &operands)
            }
        }
    }

    /// Resolve a branch test to a Bool-sorted constraint
    pub fn to_constraint(&self, expr: &Expr) -> Result<Term> {
        self.resolve(expr).map(truthy)
    }

    fn resolve_comparison(&self, left: &Expr, ops: &[String], comparators: &[Expr]) -> Result<Term> {
        if ops.is_empty() || ops.len() != comparators.len() {
            return Err(SymbexError::construction(
                "Compare",
                format!(
                    "{} operator(s) for {} comparator(s)",
                    ops.len(),
                    comparators.len()
                ),
            ));
        }

        let mut lhs = self.resolve(left)?;
        let mut pairwise = Vec::with_capacity(ops.len());
        for (op, comparator) in ops.iter().zip(comparators) {
            let ctor = registry::operator(op)?;
            let rhs = self.resolve(comparator)?;
            pairwise.push(construct(op, ctor, &[lhs, rhs.clone()])?);
            lhs = rhs;
        }

        match pairwise.len() {
            1 => Ok(pairwise.remove(0)),
            _ => Ok(Term::And(pairwise)),
        }
    }

    /// Connectives and negation retry with truthiness-coerced operands before
    /// giving up
    fn construct_logical(&self, tag: &str, ctor: OperatorCtor, operands: Vec<Term>) -> Result<Term> {
        match construct(tag, ctor, &operands) {
            Err(err @ SymbexError::SolverConstruction { .. })
                if operands.iter().any(|t| t.sort() != Sort::Bool) =>
            {
                let coerced: Vec<Term> = operands.into_iter().map(truthy).collect();
                ctor(&coerced).map_err(|_| err)
            }
            other => other,
        }
    }
}

/// Typed constructor first, native fallback over constants second
fn construct(tag: &str, ctor: OperatorCtor, operands: &[Term]) -> Result<Term> {
    match ctor(operands) {
        Err(err @ SymbexError::SolverConstruction { .. }) => {
            native_fallback(tag, operands).ok_or(err)
        }
        other => other,
    }
}

fn native_fallback(tag: &str, operands: &[Term]) -> Option<Term> {
    let native = registry::native_operator(tag).ok()?;
    let values = operands
        .iter()
        .map(|t| t.as_const().cloned())
        .collect::<Option<Vec<Value>>>()?;
    native(&values).ok().map(Term::Const)
}

/// Splice operands of nested connectives carrying the same tag
fn flatten<'e>(tag: &str, operands: &'e [Expr], out: &mut Vec<&'e Expr>) {
    for operand in operands {
        match operand {
            Expr::Connective { op, operands: inner } if op == tag => flatten(tag, inner, out),
            other => out.push(other),
        }
    }
}

/// Bool-sorted view of a term
fn truthy(term: Term) -> Term {
    match term.sort() {
        Sort::Bool => term,
        Sort::Int => Term::Cmp(CmpOp::NotEq, Box::new(term), Box::new(Term::constant(0))),
        Sort::Str => Term::Cmp(CmpOp::NotEq, Box::new(term), Box::new(Term::constant(""))),
    }
}
