//! Path Explorer
//!
//! Depth-first walk over one function body, keeping one [`ConstraintStore`]
//! for the current path.
//!
//! # Statement handling
//! - Declaration: resolve initializer, bind handle, set `target == value`
//! - Reassignment: overwrite the named constraint of each (bound) target
//! - Both capture the current values of other locals, never live handles
//! - Conditional: snapshot, push test, explore body, check, restore; then the
//!   same for the negated test when an else clause exists; restore again
//! - Loop: snapshot, push test, check once, run the body once, restore
//! - Other: ignored
//!
//! # Error policy
//! Translation failures become [`Diagnostic`]s and exploration continues with
//! the next statement. Solver timeouts and unknowns are diagnostics too; only
//! `Sat` and `Unsat` produce test cases and violations.

use super::translator::{Bindings, ExpressionTranslator};
use crate::config::ExplorerConfig;
use crate::errors::{Result, SymbexError};
use crate::features::path_explorer::domain::{
    AnalysisReport, BranchSnapshot, ConstraintStore, DeferredConstraint, Diagnostic,
    DiagnosticKind, ExplorationStats, TestCase, Violation,
};
use crate::features::registry;
use crate::features::solver::domain::{SatOutcome, SymVar, Term, VarId};
use crate::features::solver::ports::SolverBackend;
use crate::shared::models::{Expr, Line, Param, Stmt};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use tracing::{debug, error, trace, warn};

/// Explorer for one function
pub struct PathExplorer<'s> {
    solver: &'s dyn SolverBackend,
    trace_branches: bool,

    bindings: Bindings,
    params: Vec<SymVar>,
    next_id: u32,

    store: ConstraintStore,
    /// One skip-set per loop being unrolled, innermost last
    loop_frames: Vec<FxHashSet<Line>>,

    test_cases: Vec<TestCase>,
    violations: Vec<Violation>,
    diagnostics: Vec<Diagnostic>,
    stats: ExplorationStats,
    branch_trace: Vec<BranchSnapshot>,
}

impl<'s> PathExplorer<'s> {
    pub fn new(solver: &'s dyn SolverBackend, config: &ExplorerConfig) -> Self {
        Self {
            solver,
            trace_branches: config.trace_branches,
            bindings: Bindings::default(),
            params: Vec::new(),
            next_id: 0,
            store: ConstraintStore::with_capacity_limit(config.max_path_constraints),
            loop_frames: Vec::new(),
            test_cases: Vec::new(),
            violations: Vec::new(),
            diagnostics: Vec::new(),
            stats: ExplorationStats::default(),
            branch_trace: Vec::new(),
        }
    }

    /// Bind every parameter at its declared type
    ///
    /// A parameter with an unknown type is reported and left unbound.
    pub fn bind_params(&mut self, params: &[Param]) {
        for param in params {
            match self.bind(&param.name, &param.type_tag) {
                Ok(var) => {
                    if !self.params.iter().any(|p| p.id() == var.id()) {
                        self.params.push(var);
                    }
                }
                Err(err) => self.report(0, &err),
            }
        }
    }

    /// Explore a statement sequence in source order
    pub fn explore(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.execute(stmt);
        }
    }

    pub fn store(&self) -> &ConstraintStore {
        &self.store
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn stats(&self) -> &ExplorationStats {
        &self.stats
    }

    /// Consume the explorer into the function's report
    pub fn finish(self, function: impl Into<String>) -> AnalysisReport {
        AnalysisReport {
            function: function.into(),
            test_cases: self.test_cases,
            violations: self.violations,
            diagnostics: self.diagnostics,
            bindings: self.bindings.into_iter().collect::<BTreeMap<_, _>>(),
            stats: self.stats,
            branch_trace: self.branch_trace,
        }
    }

    fn translator(&self) -> ExpressionTranslator<'_> {
        ExpressionTranslator::new(&self.bindings)
    }

    /// Statement-level errors are recoverable; parse and backend failures
    /// are raised before exploration starts
    fn report(&mut self, line: Line, err: &SymbexError) {
        match Diagnostic::from_error(line, err) {
            Ok(diagnostic) => {
                warn!(line, error = %err, "statement skipped");
                self.diagnostics.push(diagnostic);
            }
            Err(fatal) => error!(line, error = %fatal, "fatal error during exploration"),
        }
    }

    fn execute(&mut self, stmt: &Stmt) {
        let line = stmt.line();

        if let Some(frame) = self.loop_frames.last_mut() {
            if !frame.insert(line) {
                trace!(line, "already unrolled in this loop");
                self.stats.skipped_statements += 1;
                return;
            }
        }

        let outcome = match stmt {
            Stmt::Declaration {
                target,
                annotation,
                value,
                ..
            } => self.declare(target, annotation, value.as_ref()),
            Stmt::Reassignment { targets, value, .. } => self.reassign(targets, value),
            Stmt::Conditional {
                test, body, orelse, ..
            } => self.branch(line, test, body, orelse),
            Stmt::Loop { test, body, .. } => self.unroll(line, test, body),
            Stmt::Other { label, .. } => {
                trace!(line, label = label.as_deref().unwrap_or("other"), "ignored");
                Ok(())
            }
        };

        if let Err(err) = outcome {
            self.report(line, &err);
        }
    }

    /// Handle for `name` at `type_tag`, reusing an existing handle of the same sort
    fn bind(&mut self, name: &str, type_tag: &str) -> Result<SymVar> {
        let ctor = registry::variable_constructor(type_tag)?;
        let candidate = ctor(VarId(self.next_id), name);

        match self.bindings.get(name) {
            Some(existing) if existing.sort() == candidate.sort() => Ok(existing.clone()),
            Some(existing) => Err(SymbexError::TypeConflict {
                name: name.to_string(),
                existing: existing.sort().to_string(),
                declared: candidate.sort().to_string(),
            }),
            None => {
                self.next_id += 1;
                self.bindings.insert(name.to_string(), candidate.clone());
                Ok(candidate)
            }
        }
    }

    fn declare(&mut self, target: &str, annotation: &str, value: Option<&Expr>) -> Result<()> {
        let init = value.map(|e| self.translator().resolve(e)).transpose()?;
        let var = self.bind(target, annotation)?;

        if let Some(init) = init {
            self.assign(&var, init)?;
        }
        Ok(())
    }

    fn reassign(&mut self, targets: &[String], value: &Expr) -> Result<()> {
        let vars = targets
            .iter()
            .map(|t| {
                self.bindings
                    .get(t)
                    .cloned()
                    .ok_or_else(|| SymbexError::unbound(t))
            })
            .collect::<Result<Vec<_>>>()?;
        let resolved = self.translator().resolve(value)?;

        for var in &vars {
            self.assign(var, resolved.clone())?;
        }
        Ok(())
    }

    /// Set `var == value` after a sort check through the registry's `Eq`
    ///
    /// Variables in `value` that already hold a named entry are replaced by
    /// that entry's value, so later writes cannot change this constraint.
    /// Variables without an entry (parameters, uninitialized locals) stay
    /// symbolic. `var` itself may only stay symbolic if it is not mentioned.
    fn assign(&mut self, var: &SymVar, value: Term) -> Result<()> {
        let eq = registry::operator("Eq")?;
        eq(&[Term::var(var), value.clone()])?;

        let value = self.current_value(value);
        if value.mentions(var.id()) {
            return Err(SymbexError::construction(
                "Eq",
                format!("'{}' refers to itself but has no value on this path", var.name()),
            ));
        }

        // Tests already on this path saw the value being overwritten
        if let Some(previous) = self.store.binding(var.name()) {
            let previous = previous.value().clone();
            self.store.substitute_in_branches(var.id(), &previous);
        }

        self.store
            .bind(var.name(), DeferredConstraint::new(var.clone(), value));
        Ok(())
    }

    /// `value` with every entry-holding variable replaced by its entry
    ///
    /// Entry values were captured the same way, so one pass suffices.
    fn current_value(&self, value: Term) -> Term {
        value
            .variables()
            .iter()
            .fold(value, |acc, v| match self.store.binding(v.name()) {
                Some(entry) => acc.substitute(v.id(), entry.value()),
                None => acc,
            })
    }

    fn branch(&mut self, line: Line, test: &Expr, body: &[Stmt], orelse: &[Stmt]) -> Result<()> {
        let test = self.translator().to_constraint(test)?;
        self.stats.conditionals += 1;

        let pre = self.store.clone();
        let slot = self.trace_branches.then(|| {
            self.branch_trace.push(BranchSnapshot {
                line,
                test: test.clone(),
                before_true: pre.clone(),
                before_false: None,
            });
            self.branch_trace.len() - 1
        });

        self.store.push(test.clone())?;
        self.explore(body);
        self.check(line);
        self.store = pre.clone();

        if !orelse.is_empty() {
            match self.store.push(test.negated()) {
                Ok(_) => {
                    if let Some(idx) = slot {
                        self.branch_trace[idx].before_false = Some(self.store.clone());
                    }
                    self.check(line);
                    self.explore(orelse);
                }
                Err(err) => self.report(line, &err),
            }
        }

        self.store = pre;
        Ok(())
    }

    /// Single unrolling: one check, one pass over the body
    fn unroll(&mut self, line: Line, test: &Expr, body: &[Stmt]) -> Result<()> {
        let test = self.translator().to_constraint(test)?;
        self.stats.loops += 1;

        let pre = self.store.clone();
        self.store.push(test)?;

        self.stats.loop_checks += 1;
        self.check(line);

        self.loop_frames.push(FxHashSet::default());
        self.explore(body);
        self.loop_frames.pop();

        self.store = pre;
        Ok(())
    }

    /// Check the whole store and record the outcome against `line`
    fn check(&mut self, line: Line) {
        let assertions = self.store.materialize();
        self.stats.solver_checks += 1;

        let outcome = self.solver.check(&assertions);
        debug!(
            line,
            backend = self.solver.name(),
            constraints = assertions.len(),
            outcome = ?outcome,
            "satisfiability check"
        );

        match outcome {
            SatOutcome::Sat(model) => {
                self.stats.sat += 1;
                self.test_cases
                    .push(TestCase::from_model(line, model, &self.params, &self.store));
            }
            SatOutcome::Unsat => {
                self.stats.unsat += 1;
                self.violations.push(Violation::new(line, self.store.clone()));
            }
            SatOutcome::Timeout => {
                self.stats.timeouts += 1;
                warn!(line, "solver timeout");
                self.diagnostics.push(Diagnostic::new(
                    line,
                    DiagnosticKind::SolverTimeout,
                    format!("Solver timed out on ({})", self.store),
                ));
            }
            SatOutcome::Unknown(reason) => {
                self.stats.unknown += 1;
                warn!(line, %reason, "solver returned unknown");
                self.diagnostics.push(Diagnostic::new(
                    line,
                    DiagnosticKind::SolverUnknown,
                    format!("Solver returned unknown on ({}): {}", self.store, reason),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::solver::infrastructure::BoundedSearchSolver;
    use crate::shared::models::{Sort, Value};

    fn explore(params: &[Param], body: &[Stmt], config: &ExplorerConfig) -> AnalysisReport {
        let solver = BoundedSearchSolver::new(&config.solver);
        let mut explorer = PathExplorer::new(&solver, config);
        explorer.bind_params(params);
        explorer.explore(body);
        explorer.finish("f")
    }

    fn cond(line: Line, test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Stmt {
        Stmt::Conditional {
            line,
            test,
            body,
            orelse,
        }
    }

    fn ret(line: Line) -> Stmt {
        Stmt::Other {
            line,
            label: Some("return".into()),
        }
    }

    #[test]
    fn test_reassignment_keeps_handle() {
        let body = vec![
            Stmt::Declaration {
                line: 2,
                target: "c".into(),
                annotation: "bool".into(),
                value: Some(Expr::lit(true)),
            },
            Stmt::Reassignment {
                line: 3,
                targets: vec!["c".into()],
                value: Expr::lit(false),
            },
        ];
        let solver = BoundedSearchSolver::default();
        let config = ExplorerConfig::default();
        let mut explorer = PathExplorer::new(&solver, &config);
        explorer.explore(&body[..1]);
        let before = explorer.bindings()["c"].clone();
        explorer.explore(&body[1..]);

        assert_eq!(explorer.bindings()["c"].id(), before.id());
        assert_eq!(explorer.store().to_string(), "c == false");
    }

    #[test]
    fn test_self_reference_uses_previous_value() {
        let body = vec![
            Stmt::Declaration {
                line: 2,
                target: "x".into(),
                annotation: "int".into(),
                value: Some(Expr::lit(1)),
            },
            Stmt::Reassignment {
                line: 3,
                targets: vec!["x".into()],
                value: Expr::arith(Expr::ident("x"), "Add", Expr::lit(1)),
            },
            cond(4, Expr::compare(Expr::ident("x"), "Eq", Expr::lit(2)), vec![ret(5)], vec![]),
        ];
        let report = explore(&[], &body, &ExplorerConfig::default());
        assert_eq!(report.test_cases.len(), 1);
        assert_eq!(report.test_cases[0].model().get_by_name("x"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_assignment_captures_current_values() {
        let decl = |line, target: &str, value| Stmt::Declaration {
            line,
            target: target.into(),
            annotation: "int".into(),
            value: Some(value),
        };
        let body = vec![
            decl(2, "x", Expr::lit(1)),
            decl(3, "y", Expr::arith(Expr::ident("x"), "Add", Expr::ident("n"))),
            Stmt::Reassignment {
                line: 4,
                targets: vec!["x".into()],
                value: Expr::lit(5),
            },
        ];
        let solver = BoundedSearchSolver::default();
        let config = ExplorerConfig::default();
        let mut explorer = PathExplorer::new(&solver, &config);
        explorer.bind_params(&[Param::new("n", "int")]);
        explorer.explore(&body);

        // `x` is captured as 1, the parameter stays symbolic
        assert_eq!(explorer.store().to_string(), "x == 5, y == (1 + n)");
    }

    #[test]
    fn test_branch_test_keeps_value_seen_at_the_branch() {
        // c: bool = True; if c: c = False; if not c: return
        let body = vec![
            Stmt::Declaration {
                line: 2,
                target: "c".into(),
                annotation: "bool".into(),
                value: Some(Expr::lit(true)),
            },
            cond(
                3,
                Expr::ident("c"),
                vec![
                    Stmt::Reassignment {
                        line: 4,
                        targets: vec!["c".into()],
                        value: Expr::lit(false),
                    },
                    cond(5, Expr::not(Expr::ident("c")), vec![ret(6)], vec![]),
                ],
                vec![],
            ),
        ];
        let report = explore(&[], &body, &ExplorerConfig::default());

        assert!(report.violations.is_empty());
        let lines: Vec<Line> = report.test_cases.iter().map(|tc| tc.line()).collect();
        assert_eq!(lines, vec![5, 3]);
        assert_eq!(report.test_cases[0].path(), ["c == false", "true", "Not(c)"]);
    }

    #[test]
    fn test_self_reference_without_value_is_diagnostic() {
        let body = vec![Stmt::Reassignment {
            line: 2,
            targets: vec!["x".into()],
            value: Expr::arith(Expr::ident("x"), "Add", Expr::lit(1)),
        }];
        let solver = BoundedSearchSolver::default();
        let config = ExplorerConfig::default();
        let mut explorer = PathExplorer::new(&solver, &config);
        explorer.bind_params(&[Param::new("x", "int")]);
        explorer.explore(&body);

        assert!(explorer.store().is_empty());
        let report = explorer.finish("f");
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].line, 2);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::SolverConstruction);
    }

    #[test]
    fn test_redeclaration_type_conflict() {
        let body = vec![Stmt::Declaration {
            line: 2,
            target: "a".into(),
            annotation: "int".into(),
            value: None,
        }];
        let report = explore(&[Param::new("a", "bool")], &body, &ExplorerConfig::default());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::TypeConflict);
        assert_eq!(report.bindings["a"].sort(), Sort::Bool);
    }

    #[test]
    fn test_declaration_sort_mismatch_is_diagnostic() {
        let body = vec![Stmt::Declaration {
            line: 2,
            target: "n".into(),
            annotation: "int".into(),
            value: Some(Expr::lit("text")),
        }];
        let report = explore(&[], &body, &ExplorerConfig::default());
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::SolverConstruction);
        assert!(report.bindings.contains_key("n"));
    }

    #[test]
    fn test_empty_else_is_not_checked() {
        let body = vec![cond(2, Expr::ident("a"), vec![ret(3)], vec![])];
        let report = explore(&[Param::new("a", "bool")], &body, &ExplorerConfig::default());
        assert_eq!(report.stats.solver_checks, 1);
        assert_eq!(report.test_cases.len(), 1);
    }

    #[test]
    fn test_conditional_restores_store() {
        let body = vec![cond(
            2,
            Expr::ident("a"),
            vec![ret(3)],
            vec![ret(5)],
        )];
        let solver = BoundedSearchSolver::default();
        let config = ExplorerConfig::default();
        let mut explorer = PathExplorer::new(&solver, &config);
        explorer.bind_params(&[Param::new("a", "bool")]);
        explorer.explore(&body);
        assert!(explorer.store().is_empty());
        assert_eq!(explorer.stats().solver_checks, 2);
    }

    #[test]
    fn test_loop_is_checked_once() {
        let body = vec![Stmt::Loop {
            line: 2,
            test: Expr::compare(Expr::ident("n"), "Gt", Expr::lit(0)),
            body: vec![
                cond(3, Expr::ident("a"), vec![ret(4)], vec![]),
                // Front-end duplicate of an already unrolled line
                cond(3, Expr::ident("a"), vec![ret(4)], vec![]),
            ],
        }];
        let params = [Param::new("n", "int"), Param::new("a", "bool")];
        let report = explore(&params, &body, &ExplorerConfig::default());

        assert_eq!(report.stats.loops, 1);
        assert_eq!(report.stats.loop_checks, 1);
        assert_eq!(report.stats.skipped_statements, 1);
        assert_eq!(report.stats.solver_checks, 2);
        assert_eq!(report.test_cases[0].input("n"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_capacity_limit_is_diagnostic() {
        let inner = cond(3, Expr::ident("a"), vec![ret(4)], vec![]);
        let body = vec![cond(2, Expr::ident("a"), vec![inner], vec![])];
        let config = ExplorerConfig::default().with_max_path_constraints(1);
        let report = explore(&[Param::new("a", "bool")], &body, &config);

        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::CapacityExceeded);
        assert_eq!(report.diagnostics[0].line, 3);
        assert_eq!(report.test_cases.len(), 1);
    }

    #[test]
    fn test_unknown_param_type_is_reported() {
        let report = explore(&[Param::new("f", "float")], &[], &ExplorerConfig::default());
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::UnknownType);
        assert!(report.bindings.is_empty());
    }
}
