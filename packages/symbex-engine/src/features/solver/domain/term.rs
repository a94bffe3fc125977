//! Solver-agnostic constraint terms
//!
//! Terms are built by the operator registry and handed to a
//! [`SolverBackend`](crate::features::solver::ports::SolverBackend), which
//! translates them into its own representation.

use crate::shared::models::{ArithOp, CmpOp, Sort, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Opaque symbolic variable identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VarId(pub u32);

/// Symbolic variable handle
///
/// A name maps to exactly one handle for the whole analysis of a function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SymVar {
    id: VarId,
    name: String,
    sort: Sort,
}

impl SymVar {
    pub fn new(id: VarId, name: impl Into<String>, sort: Sort) -> Self {
        Self {
            id,
            name: name.into(),
            sort,
        }
    }

    pub fn id(&self) -> VarId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }
}

impl fmt::Display for SymVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Constraint / value term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Term {
    Var(SymVar),
    Const(Value),
    Not(Box<Term>),
    And(Vec<Term>),
    Or(Vec<Term>),
    Neg(Box<Term>),
    Cmp(CmpOp, Box<Term>, Box<Term>),
    Arith(ArithOp, Box<Term>, Box<Term>),
}

impl Term {
    pub fn var(var: &SymVar) -> Self {
        Self::Var(var.clone())
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Const(value.into())
    }

    /// `lhs == rhs`
    pub fn equals(lhs: Term, rhs: Term) -> Self {
        Self::Cmp(CmpOp::Eq, Box::new(lhs), Box::new(rhs))
    }

    /// Logical negation
    pub fn negated(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Sort of the value this term denotes
    ///
    /// Terms built through the registry are well-sorted, so this never needs
    /// to inspect more than the outermost node and, for `Add`, its left operand.
    pub fn sort(&self) -> Sort {
        match self {
            Self::Var(v) => v.sort(),
            Self::Const(c) => c.sort(),
            Self::Not(_) | Self::And(_) | Self::Or(_) | Self::Cmp(..) => Sort::Bool,
            Self::Neg(_) => Sort::Int,
            Self::Arith(ArithOp::Add, lhs, _) if lhs.sort() == Sort::Str => Sort::Str,
            Self::Arith(..) => Sort::Int,
        }
    }

    pub fn as_const(&self) -> Option<&Value> {
        match self {
            Self::Const(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&SymVar> {
        match self {
            Self::Var(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the term mentions no variables
    pub fn is_ground(&self) -> bool {
        let mut ground = true;
        self.visit_vars(&mut |_| ground = false);
        ground
    }

    /// Whether the term mentions the given variable
    pub fn mentions(&self, id: VarId) -> bool {
        let mut found = false;
        self.visit_vars(&mut |v| found |= v.id() == id);
        found
    }

    /// Call `f` for every variable occurrence, left to right
    pub fn visit_vars(&self, f: &mut impl FnMut(&SymVar)) {
        match self {
            Self::Var(v) => f(v),
            Self::Const(_) => {}
            Self::Not(t) | Self::Neg(t) => t.visit_vars(f),
            Self::And(ts) | Self::Or(ts) => ts.iter().for_each(|t| t.visit_vars(f)),
            Self::Cmp(_, l, r) | Self::Arith(_, l, r) => {
                l.visit_vars(f);
                r.visit_vars(f);
            }
        }
    }

    /// Replace every occurrence of variable `id` with `replacement`
    pub fn substitute(&self, id: VarId, replacement: &Term) -> Term {
        match self {
            Self::Var(v) if v.id() == id => replacement.clone(),
            Self::Var(_) | Self::Const(_) => self.clone(),
            Self::Not(t) => Self::Not(Box::new(t.substitute(id, replacement))),
            Self::Neg(t) => Self::Neg(Box::new(t.substitute(id, replacement))),
            Self::And(ts) => Self::And(ts.iter().map(|t| t.substitute(id, replacement)).collect()),
            Self::Or(ts) => Self::Or(ts.iter().map(|t| t.substitute(id, replacement)).collect()),
            Self::Cmp(op, l, r) => Self::Cmp(
                *op,
                Box::new(l.substitute(id, replacement)),
                Box::new(r.substitute(id, replacement)),
            ),
            Self::Arith(op, l, r) => Self::Arith(
                *op,
                Box::new(l.substitute(id, replacement)),
                Box::new(r.substitute(id, replacement)),
            ),
        }
    }

    /// Distinct variables ordered by handle id
    pub fn variables(&self) -> Vec<SymVar> {
        let mut vars = BTreeMap::new();
        self.visit_vars(&mut |v| {
            vars.entry(v.id()).or_insert_with(|| v.clone());
        });
        vars.into_values().collect()
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, terms: &[Term]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, t) in terms.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", t)?;
    }
    write!(f, ")")
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(v) => write!(f, "{}", v),
            Self::Const(c) => write!(f, "{}", c),
            Self::Not(t) => write!(f, "Not({})", t),
            Self::And(ts) => write_list(f, "And", ts),
            Self::Or(ts) => write_list(f, "Or", ts),
            Self::Neg(t) => write!(f, "-{}", t),
            Self::Cmp(op, l, r) => write!(f, "{} {} {}", l, op, r),
            Self::Arith(op, l, r) => write!(f, "({} {} {})", l, op, r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bool_var(id: u32, name: &str) -> SymVar {
        SymVar::new(VarId(id), name, Sort::Bool)
    }

    #[test]
    fn test_display_matches_solver_notation() {
        let a = bool_var(0, "a");
        let b = bool_var(1, "b");
        let t = Term::And(vec![Term::var(&a), Term::var(&b).negated()]);
        assert_eq!(t.to_string(), "And(a, Not(b))");
    }

    #[test]
    fn test_sort_inference() {
        let x = SymVar::new(VarId(0), "x", Sort::Int);
        let s = SymVar::new(VarId(1), "s", Sort::Str);
        let sum = Term::Arith(
            ArithOp::Add,
            Box::new(Term::var(&x)),
            Box::new(Term::constant(1)),
        );
        assert_eq!(sum.sort(), Sort::Int);

        let concat = Term::Arith(
            ArithOp::Add,
            Box::new(Term::var(&s)),
            Box::new(Term::constant("!")),
        );
        assert_eq!(concat.sort(), Sort::Str);
        assert_eq!(Term::equals(sum, Term::constant(2)).sort(), Sort::Bool);
    }

    #[test]
    fn test_variables_are_distinct_and_ordered() {
        let a = bool_var(3, "a");
        let b = bool_var(1, "b");
        let t = Term::Or(vec![Term::var(&a), Term::var(&b), Term::var(&a).negated()]);
        let names: Vec<_> = t.variables().iter().map(|v| v.name().to_string()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(t.mentions(VarId(3)));
        assert!(!t.mentions(VarId(2)));
        assert!(!t.is_ground());
        assert!(Term::constant(true).is_ground());
    }

    #[test]
    fn test_substitute_replaces_only_target() {
        let x = SymVar::new(VarId(0), "x", Sort::Int);
        let y = SymVar::new(VarId(1), "y", Sort::Int);
        let t = Term::Arith(
            ArithOp::Add,
            Box::new(Term::var(&x)),
            Box::new(Term::var(&y)),
        );
        let replaced = t.substitute(x.id(), &Term::constant(4));
        assert_eq!(replaced.to_string(), "(4 + y)");
        assert!(!replaced.mentions(x.id()));
        assert!(replaced.mentions(y.id()));
    }
}
