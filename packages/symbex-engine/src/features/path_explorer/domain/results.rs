//! Result Collectors
//!
//! - [`TestCase`]: satisfying model + the parameter values that reach a branch
//! - [`Violation`]: unsatisfiable path condition + triggering line
//! - [`Diagnostic`]: recoverable translation / solver problems
//!
//! Records are immutable once built: fields are private, with read accessors.

use super::constraint_store::ConstraintStore;
use crate::errors::SymbexError;
use crate::features::solver::domain::{Model, SymVar, Term};
use crate::shared::models::{Line, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// `name = value` for one function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputBinding {
    pub name: String,
    pub value: Value,
}

impl fmt::Display for InputBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

/// Concrete input reaching a branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    line: Line,
    inputs: Vec<InputBinding>,
    model: Model,
    path: Vec<String>,
}

impl TestCase {
    /// Build from a satisfying model
    ///
    /// Parameters the model leaves unassigned are unconstrained on this path
    /// and are omitted rather than defaulted.
    pub fn from_model(line: Line, model: Model, params: &[SymVar], store: &ConstraintStore) -> Self {
        let inputs = params
            .iter()
            .filter_map(|param| {
                model.get(param).map(|value| InputBinding {
                    name: param.name().to_string(),
                    value: value.clone(),
                })
            })
            .collect();

        Self {
            line,
            inputs,
            model,
            path: store.rendered(),
        }
    }

    pub fn line(&self) -> Line {
        self.line
    }

    pub fn inputs(&self) -> &[InputBinding] {
        &self.inputs
    }

    /// Value chosen for a parameter, if the path constrains it
    pub fn input(&self, name: &str) -> Option<&Value> {
        self.inputs.iter().find(|b| b.name == name).map(|b| &b.value)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Rendered constraints that produced the model
    pub fn path(&self) -> &[String] {
        &self.path
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inputs: Vec<String> = self.inputs.iter().map(|b| b.to_string()).collect();
        write!(f, "line {}: {}", self.line, inputs.join(", "))
    }
}

/// Branch condition no input can satisfy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    line: Line,
    condition: String,
    #[serde(skip)]
    snapshot: ConstraintStore,
}

impl Violation {
    pub fn new(line: Line, snapshot: ConstraintStore) -> Self {
        Self {
            line,
            condition: snapshot.to_string(),
            snapshot,
        }
    }

    pub fn line(&self) -> Line {
        self.line
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn snapshot(&self) -> &ConstraintStore {
        &self.snapshot
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unsatisfied ({}) - line {}", self.condition, self.line)
    }
}

/// Diagnostic category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnboundVariable,
    UnknownOperator,
    UnknownType,
    SolverConstruction,
    TypeConflict,
    CapacityExceeded,
    SolverTimeout,
    SolverUnknown,
}

/// Only recoverable errors have a diagnostic kind; fatal ones are returned
impl TryFrom<&SymbexError> for DiagnosticKind {
    type Error = SymbexError;

    fn try_from(err: &SymbexError) -> Result<Self, Self::Error> {
        match err {
            SymbexError::UnboundVariable { .. } => Ok(Self::UnboundVariable),
            SymbexError::UnknownOperator(_) => Ok(Self::UnknownOperator),
            SymbexError::UnknownType(_) => Ok(Self::UnknownType),
            SymbexError::SolverConstruction { .. } => Ok(Self::SolverConstruction),
            SymbexError::TypeConflict { .. } => Ok(Self::TypeConflict),
            SymbexError::CapacityExceeded { .. } => Ok(Self::CapacityExceeded),
            SymbexError::ParseFailure(_) | SymbexError::SolverUnavailable(_) => Err(err.clone()),
        }
    }
}

/// Recoverable problem found while exploring
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: Line,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    /// Diagnostic for a recoverable error; a fatal error is handed back
    pub fn from_error(line: Line, err: &SymbexError) -> Result<Self, SymbexError> {
        Ok(Self {
            line,
            kind: DiagnosticKind::try_from(err)?,
            message: err.to_string(),
        })
    }

    pub fn new(line: Line, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Counters collected during one function's exploration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExplorationStats {
    pub solver_checks: usize,
    pub sat: usize,
    pub unsat: usize,
    pub timeouts: usize,
    pub unknown: usize,
    pub conditionals: usize,
    pub loops: usize,
    pub loop_checks: usize,
    /// Loop body statements skipped because their line was already unrolled
    pub skipped_statements: usize,
}

/// Store snapshots around one conditional
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchSnapshot {
    pub line: Line,
    pub test: Term,
    /// Store right before the test is pushed
    pub before_true: ConstraintStore,
    /// Store at the start of else exploration (`None` when there is no else)
    pub before_false: Option<ConstraintStore>,
}

/// Everything produced for one function
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub function: String,
    pub test_cases: Vec<TestCase>,
    pub violations: Vec<Violation>,
    pub diagnostics: Vec<Diagnostic>,
    /// Final name → handle map
    pub bindings: BTreeMap<String, SymVar>,
    pub stats: ExplorationStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branch_trace: Vec<BranchSnapshot>,
}

impl AnalysisReport {
    pub fn summary(&self) -> String {
        format!(
            "{}: {} test case(s), {} violation(s), {} diagnostic(s)",
            self.function,
            self.test_cases.len(),
            self.violations.len(),
            self.diagnostics.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::solver::domain::VarId;
    use crate::shared::models::Sort;

    #[test]
    fn test_unassigned_params_are_omitted() {
        let a = SymVar::new(VarId(0), "a", Sort::Bool);
        let b = SymVar::new(VarId(1), "b", Sort::Bool);
        let mut model = Model::new();
        model.insert("a", Value::Bool(true));

        let tc = TestCase::from_model(3, model, &[a, b], &ConstraintStore::new());
        assert_eq!(tc.inputs().len(), 1);
        assert_eq!(tc.input("a"), Some(&Value::Bool(true)));
        assert_eq!(tc.input("b"), None);
        assert_eq!(tc.to_string(), "line 3: a = true");
    }

    #[test]
    fn test_violation_renders_snapshot() {
        let a = SymVar::new(VarId(0), "a", Sort::Bool);
        let mut store = ConstraintStore::new();
        store
            .push(Term::And(vec![Term::var(&a), Term::var(&a).negated()]))
            .unwrap();

        let violation = Violation::new(9, store.clone());
        assert_eq!(violation.snapshot(), &store);
        assert_eq!(violation.to_string(), "Unsatisfied (And(a, Not(a))) - line 9");
    }

    #[test]
    fn test_diagnostic_kind_mapping() {
        let diag = Diagnostic::from_error(4, &SymbexError::unbound("zz")).unwrap();
        assert_eq!(diag.kind, DiagnosticKind::UnboundVariable);
        assert_eq!(diag.to_string(), "line 4: Unbound variable 'zz'");

        let fatal = SymbexError::parse_failure("bad tree");
        assert_eq!(Diagnostic::from_error(4, &fatal), Err(fatal.clone()));
        assert_eq!(DiagnosticKind::try_from(&fatal), Err(fatal));
    }
}
