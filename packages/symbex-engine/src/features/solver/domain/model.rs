//! Satisfiability outcomes and models

use super::term::SymVar;
use crate::shared::models::Value;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Satisfying assignment returned by a backend
///
/// Only variables the backend actually assigned are present; callers must not
/// default missing entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Model {
    assignments: BTreeMap<String, Value>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.assignments.insert(name.into(), value);
    }

    /// Value assigned to a variable, if any
    pub fn get(&self, var: &SymVar) -> Option<&Value> {
        self.assignments.get(var.name())
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.assignments.get(name)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.assignments.iter()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (name, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", name, value)?;
        }
        write!(f, "]")
    }
}

/// Result of one satisfiability check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatOutcome {
    /// Satisfiable, with a model
    Sat(Model),

    /// Unsatisfiable (contradiction)
    Unsat,

    /// Backend gave up without exhausting its budget (incomplete theory, ...)
    Unknown(String),

    /// Per-check budget exhausted
    Timeout,
}

impl SatOutcome {
    pub fn is_sat(&self) -> bool {
        matches!(self, SatOutcome::Sat(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, SatOutcome::Unsat)
    }
}
