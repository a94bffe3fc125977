//! Constraint Store
//!
//! Active constraints of the current path:
//! - named entries: one deferred `var == value` per variable, last write wins
//! - branch entries: append-only sequence of branch tests
//!
//! `Clone` is a deep copy. The explorer snapshots the store before entering a
//! branch and restores it afterwards, so sibling branches never observe each
//! other's constraints.

use crate::errors::{Result, SymbexError};
use crate::features::solver::domain::{SymVar, Term, VarId};
use serde::Serialize;
use std::fmt;

/// `var == value`, captured when the statement executes and only turned into
/// a solver term at check time
///
/// The value is an owned term, so later writes to the store can never change a
/// constraint that was already recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeferredConstraint {
    var: SymVar,
    value: Term,
}

impl DeferredConstraint {
    pub fn new(var: SymVar, value: Term) -> Self {
        Self { var, value }
    }

    pub fn var(&self) -> &SymVar {
        &self.var
    }

    pub fn value(&self) -> &Term {
        &self.value
    }

    pub fn materialize(&self) -> Term {
        Term::equals(Term::var(&self.var), self.value.clone())
    }
}

impl fmt::Display for DeferredConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.var, self.value)
    }
}

/// Path constraint store
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ConstraintStore {
    /// Insertion-ordered; overwrites keep the original position
    named: Vec<(String, DeferredConstraint)>,
    branch: Vec<Term>,
    #[serde(skip)]
    capacity: Option<usize>,
}

impl ConstraintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that refuses more than `limit` branch constraints
    pub fn with_capacity_limit(limit: Option<usize>) -> Self {
        Self {
            capacity: limit,
            ..Self::default()
        }
    }

    /// Set the named constraint for `name`, replacing any previous one
    pub fn bind(&mut self, name: &str, constraint: DeferredConstraint) {
        match self.named.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = constraint,
            None => self.named.push((name.to_string(), constraint)),
        }
    }

    pub fn binding(&self, name: &str) -> Option<&DeferredConstraint> {
        self.named.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    /// Append a branch constraint, returning its sequence key
    pub fn push(&mut self, constraint: Term) -> Result<usize> {
        if let Some(limit) = self.capacity {
            if self.branch.len() >= limit {
                return Err(SymbexError::CapacityExceeded { limit });
            }
        }
        self.branch.push(constraint);
        Ok(self.branch.len() - 1)
    }

    /// Replace variable `id` in every branch constraint
    pub fn substitute_in_branches(&mut self, id: VarId, replacement: &Term) {
        for constraint in self.branch.iter_mut().filter(|c| c.mentions(id)) {
            *constraint = constraint.substitute(id, replacement);
        }
    }

    pub fn branch_constraints(&self) -> &[Term] {
        &self.branch
    }

    pub fn named_constraints(&self) -> impl Iterator<Item = (&str, &DeferredConstraint)> {
        self.named.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.named.len() + self.branch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.branch.is_empty()
    }

    /// Solver assertions: named entries first, then branch entries in order
    pub fn materialize(&self) -> Vec<Term> {
        self.named
            .iter()
            .map(|(_, c)| c.materialize())
            .chain(self.branch.iter().cloned())
            .collect()
    }

    /// One rendered string per constraint, in assertion order
    pub fn rendered(&self) -> Vec<String> {
        self.named
            .iter()
            .map(|(_, c)| c.to_string())
            .chain(self.branch.iter().map(|t| t.to_string()))
            .collect()
    }
}

impl fmt::Display for ConstraintStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rendered().join(", "))
    }
}
