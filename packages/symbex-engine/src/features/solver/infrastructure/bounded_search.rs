//! Bounded Search Solver
//!
//! Pure-Rust backend: depth-first assignment search over the variables of the
//! assertions, in handle order (parameters first, then locals in declaration
//! order).
//!
//! # Algorithm
//! 1. Flatten top-level conjunctions; ground conjuncts are decided up front
//! 2. For each variable, in order:
//!    - equality propagation: a conjunct `v == e` with `e` already evaluable
//!      fixes `v` to a single candidate
//!    - otherwise enumerate a candidate domain (booleans: both values;
//!      integers: `c-1, c, c+1` for every boundary `c` plus a window around 0;
//!      strings: the empty string, every literal, one fresh string)
//! 3. After each assignment, re-evaluate only the conjuncts that mention the
//!    variable with three-valued partial evaluation and prune on `false`
//!
//! # Completeness
//! Exhausting the search proves `Unsat` only when every enumerated integer or
//! string variable occurs solely in atoms comparing it with terms that were
//! already evaluable (a complete set of interval representatives). Any other
//! exhaustion is reported as `Unknown`, never as `Unsat`.
//!
//! # Budget
//! Node count and wall-clock deadline per check; either limit yields
//! `SatOutcome::Timeout`.

use crate::config::SolverConfig;
use crate::features::solver::domain::{Model, SatOutcome, SymVar, Term, VarId};
use crate::features::solver::ports::SolverBackend;
use crate::shared::models::{apply_arith, apply_cmp, apply_neg, CmpOp, Sort, Value};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

/// Bounded search backend
#[derive(Debug, Clone)]
pub struct BoundedSearchSolver {
    timeout: Duration,
    max_nodes: u64,
    int_window: i64,
}

impl BoundedSearchSolver {
    pub fn new(config: &SolverConfig) -> Self {
        Self::with_limits(config.timeout_ms, config.max_nodes, config.int_window)
    }

    pub fn with_limits(timeout_ms: u64, max_nodes: u64, int_window: i64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            max_nodes,
            int_window: int_window.max(0),
        }
    }
}

impl Default for BoundedSearchSolver {
    fn default() -> Self {
        Self::new(&SolverConfig::default())
    }
}

impl SolverBackend for BoundedSearchSolver {
    fn name(&self) -> &'static str {
        "bounded"
    }

    fn check(&self, assertions: &[Term]) -> SatOutcome {
        let mut conjuncts = Vec::new();
        for assertion in assertions {
            flatten_conjuncts(assertion, &mut conjuncts);
        }

        if let Some(bad) = conjuncts.iter().find(|c| c.sort() != Sort::Bool) {
            return SatOutcome::Unknown(format!("non-boolean assertion '{}'", bad));
        }

        let empty = FxHashMap::default();
        let mut symbolic = Vec::new();
        for conjunct in conjuncts {
            if !conjunct.is_ground() {
                symbolic.push(conjunct);
                continue;
            }
            match eval(conjunct, &empty) {
                Eval::Known(Value::Bool(true)) => {}
                Eval::Known(_) => return SatOutcome::Unsat,
                Eval::Undefined | Eval::Unknown => {
                    return SatOutcome::Unknown(format!("'{}' is undefined", conjunct))
                }
            }
        }

        let mut search = Search::new(self, symbolic);
        match search.run(0) {
            Step::Found => SatOutcome::Sat(search.model()),
            Step::OutOfBudget => SatOutcome::Timeout,
            Step::Exhausted if search.inexact => SatOutcome::Unknown(
                "search space exhausted without a completeness guarantee".to_string(),
            ),
            Step::Exhausted => SatOutcome::Unsat,
        }
    }
}

/// Splice nested top-level `And`s into one conjunct list
fn flatten_conjuncts<'t>(term: &'t Term, out: &mut Vec<&'t Term>) {
    match term {
        Term::And(ts) => ts.iter().for_each(|t| flatten_conjuncts(t, out)),
        other => out.push(other),
    }
}

/// Three-valued evaluation result
#[derive(Debug, Clone, PartialEq)]
enum Eval {
    Known(Value),
    /// Depends on a variable that is not assigned yet
    Unknown,
    /// Division by zero, overflow, ill-sorted operands
    Undefined,
}

fn eval(term: &Term, assignment: &FxHashMap<VarId, Value>) -> Eval {
    match term {
        Term::Var(v) => assignment
            .get(&v.id())
            .cloned()
            .map_or(Eval::Unknown, Eval::Known),
        Term::Const(c) => Eval::Known(c.clone()),
        Term::Not(t) => match eval(t, assignment) {
            Eval::Known(Value::Bool(b)) => Eval::Known(Value::Bool(!b)),
            Eval::Known(_) => Eval::Undefined,
            other => other,
        },
        Term::And(ts) => eval_connective(ts, assignment, false),
        Term::Or(ts) => eval_connective(ts, assignment, true),
        Term::Neg(t) => match eval(t, assignment) {
            Eval::Known(v) => apply_neg(&v).map_or(Eval::Undefined, Eval::Known),
            other => other,
        },
        Term::Cmp(op, l, r) => match (eval(l, assignment), eval(r, assignment)) {
            (Eval::Known(a), Eval::Known(b)) => apply_cmp(*op, &a, &b)
                .map_or(Eval::Undefined, |v| Eval::Known(Value::Bool(v))),
            (Eval::Undefined, _) | (_, Eval::Undefined) => Eval::Undefined,
            _ => Eval::Unknown,
        },
        Term::Arith(op, l, r) => match (eval(l, assignment), eval(r, assignment)) {
            (Eval::Known(a), Eval::Known(b)) => {
                apply_arith(*op, &a, &b).map_or(Eval::Undefined, Eval::Known)
            }
            (Eval::Undefined, _) | (_, Eval::Undefined) => Eval::Undefined,
            _ => Eval::Unknown,
        },
    }
}

/// `And` when `short_circuit` is false, `Or` when it is true
fn eval_connective(ts: &[Term], assignment: &FxHashMap<VarId, Value>, short_circuit: bool) -> Eval {
    let mut pending = false;
    let mut undefined = false;

    for t in ts {
        match eval(t, assignment) {
            Eval::Known(Value::Bool(b)) if b == short_circuit => {
                return Eval::Known(Value::Bool(short_circuit))
            }
            Eval::Known(Value::Bool(_)) => {}
            Eval::Unknown => pending = true,
            Eval::Known(_) | Eval::Undefined => undefined = true,
        }
    }

    if pending {
        Eval::Unknown
    } else if undefined {
        Eval::Undefined
    } else {
        Eval::Known(Value::Bool(!short_circuit))
    }
}

/// Comparison atoms reachable through connectives
fn collect_atoms<'t>(term: &'t Term, out: &mut Vec<&'t Term>) {
    match term {
        Term::Not(t) => collect_atoms(t, out),
        Term::And(ts) | Term::Or(ts) => ts.iter().for_each(|t| collect_atoms(t, out)),
        Term::Cmp(..) | Term::Arith(..) | Term::Neg(_) => out.push(term),
        Term::Var(_) | Term::Const(_) => {}
    }
}

/// Values of ground subterms, seeding integer and string domains
#[derive(Debug, Default)]
struct Constants {
    ints: BTreeSet<i64>,
    strings: BTreeSet<String>,
}

impl Constants {
    fn collect(conjuncts: &[&Term]) -> Self {
        let mut constants = Self::default();
        let empty = FxHashMap::default();
        for c in conjuncts {
            constants.visit(c, &empty);
        }
        constants
    }

    fn visit(&mut self, term: &Term, empty: &FxHashMap<VarId, Value>) {
        if term.is_ground() {
            match eval(term, empty) {
                Eval::Known(Value::Int(i)) => {
                    self.ints.insert(i);
                }
                Eval::Known(Value::Str(s)) => {
                    self.strings.insert(s);
                }
                _ => {}
            }
            return;
        }
        match term {
            Term::Not(t) | Term::Neg(t) => self.visit(t, empty),
            Term::And(ts) | Term::Or(ts) => ts.iter().for_each(|t| self.visit(t, empty)),
            Term::Cmp(_, l, r) | Term::Arith(_, l, r) => {
                self.visit(l, empty);
                self.visit(r, empty);
            }
            Term::Var(_) | Term::Const(_) => {}
        }
    }
}

enum Step {
    Found,
    Exhausted,
    OutOfBudget,
}

struct Search<'s, 't> {
    solver: &'s BoundedSearchSolver,
    conjuncts: Vec<&'t Term>,
    vars: Vec<SymVar>,
    /// Conjunct indices mentioning each variable
    watch: FxHashMap<VarId, Vec<usize>>,
    constants: Constants,
    assignment: FxHashMap<VarId, Value>,
    nodes: u64,
    deadline: Instant,
    inexact: bool,
}

impl<'s, 't> Search<'s, 't> {
    fn new(solver: &'s BoundedSearchSolver, conjuncts: Vec<&'t Term>) -> Self {
        let mut vars = BTreeMap::new();
        let mut watch: FxHashMap<VarId, Vec<usize>> = FxHashMap::default();

        for (idx, conjunct) in conjuncts.iter().enumerate() {
            for var in conjunct.variables() {
                watch.entry(var.id()).or_default().push(idx);
                vars.entry(var.id()).or_insert(var);
            }
        }

        let constants = Constants::collect(&conjuncts);

        Self {
            solver,
            conjuncts,
            vars: vars.into_values().collect(),
            watch,
            constants,
            assignment: FxHashMap::default(),
            nodes: 0,
            deadline: Instant::now() + solver.timeout,
            inexact: false,
        }
    }

    fn run(&mut self, depth: usize) -> Step {
        if depth == self.vars.len() {
            return Step::Found;
        }

        let var = self.vars[depth].clone();
        let candidates = self.candidates(&var);

        for value in candidates {
            self.nodes += 1;
            if self.nodes > self.solver.max_nodes || Instant::now() >= self.deadline {
                return Step::OutOfBudget;
            }

            self.assignment.insert(var.id(), value);
            if self.consistent(var.id()) {
                match self.run(depth + 1) {
                    Step::Exhausted => {}
                    done => return done,
                }
            }
        }

        self.assignment.remove(&var.id());
        Step::Exhausted
    }

    /// Every conjunct watching `id` is still possibly true
    fn consistent(&mut self, id: VarId) -> bool {
        let Some(indices) = self.watch.get(&id) else {
            return true;
        };

        for &idx in indices {
            match eval(self.conjuncts[idx], &self.assignment) {
                Eval::Known(Value::Bool(true)) | Eval::Unknown => {}
                Eval::Known(_) => return false,
                Eval::Undefined => {
                    self.inexact = true;
                    return false;
                }
            }
        }
        true
    }

    fn candidates(&mut self, var: &SymVar) -> Vec<Value> {
        match self.determined(var) {
            Some(Eval::Known(value)) => return vec![value],
            Some(_) => {
                self.inexact = true;
                return Vec::new();
            }
            None => {}
        }

        match var.sort() {
            Sort::Bool => vec![Value::Bool(true), Value::Bool(false)],
            Sort::Int => self.int_candidates(var),
            Sort::Str => self.str_candidates(var),
        }
    }

    /// Value forced by a top-level `var == e` conjunct with `e` evaluable
    fn determined(&self, var: &SymVar) -> Option<Eval> {
        let indices = self.watch.get(&var.id())?;

        for &idx in indices {
            let Term::Cmp(CmpOp::Eq, l, r) = self.conjuncts[idx] else {
                continue;
            };
            let other = match (l.as_var(), r.as_var()) {
                (Some(v), _) if v.id() == var.id() => r,
                (_, Some(v)) if v.id() == var.id() => l,
                _ => continue,
            };
            if other.mentions(var.id()) {
                continue;
            }
            match eval(other, &self.assignment) {
                Eval::Unknown => continue,
                Eval::Known(value) if value.sort() == var.sort() => {
                    return Some(Eval::Known(value))
                }
                Eval::Known(_) | Eval::Undefined => return Some(Eval::Undefined),
            }
        }
        None
    }

    /// Values compared directly against `var`, or `None` if some atom is
    /// not of that shape
    fn boundaries(&self, var: &SymVar) -> Option<Vec<Value>> {
        let mut atoms = Vec::new();
        for &idx in self.watch.get(&var.id()).into_iter().flatten() {
            collect_atoms(self.conjuncts[idx], &mut atoms);
        }

        let mut values = Vec::new();
        for atom in atoms.into_iter().filter(|a| a.mentions(var.id())) {
            let Term::Cmp(op, l, r) = atom else {
                return None;
            };
            if var.sort() == Sort::Str && op.is_ordering() {
                return None;
            }
            let other = match (l.as_var(), r.as_var()) {
                (Some(v), _) if v.id() == var.id() && !r.mentions(var.id()) => r,
                (_, Some(v)) if v.id() == var.id() && !l.mentions(var.id()) => l,
                _ => return None,
            };
            match eval(other, &self.assignment) {
                Eval::Known(value) => values.push(value),
                _ => return None,
            }
        }
        Some(values)
    }

    fn int_candidates(&mut self, var: &SymVar) -> Vec<Value> {
        let boundaries = self.boundaries(var);
        if boundaries.is_none() {
            self.inexact = true;
        }

        let window = self.solver.int_window;
        let mut ints: FxHashSet<i64> = (-window..=window).collect();
        let seeds = self.constants.ints.iter().copied().chain(
            boundaries
                .into_iter()
                .flatten()
                .filter_map(|v| v.as_int()),
        );
        for c in seeds {
            ints.insert(c);
            ints.extend(c.checked_sub(1));
            ints.extend(c.checked_add(1));
        }

        let mut ints: Vec<i64> = ints.into_iter().collect();
        ints.sort_by_key(|i| (i.unsigned_abs(), *i));
        ints.into_iter().map(Value::Int).collect()
    }

    fn str_candidates(&mut self, var: &SymVar) -> Vec<Value> {
        let boundaries = self.boundaries(var);
        if boundaries.is_none() {
            self.inexact = true;
        }

        let mut strings: BTreeSet<String> = self.constants.strings.clone();
        strings.insert(String::new());
        strings.extend(boundaries.into_iter().flatten().filter_map(|v| match v {
            Value::Str(s) => Some(s),
            _ => None,
        }));

        let fresh = (0..)
            .map(|n| format!("s{}", n))
            .find(|s| !strings.contains(s))
            .unwrap_or_default();

        strings
            .into_iter()
            .chain(std::iter::once(fresh))
            .map(Value::Str)
            .collect()
    }

    fn model(&self) -> Model {
        let mut model = Model::new();
        for var in &self.vars {
            if let Some(value) = self.assignment.get(&var.id()) {
                model.insert(var.name(), value.clone());
            }
        }
        model
    }
}
