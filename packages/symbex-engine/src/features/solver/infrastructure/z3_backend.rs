//! Z3 SMT Solver Backend
//!
//! Translates [`Term`]s into Z3 ASTs (Bool, Int and String theories) and
//! decides them with Microsoft Z3. Each check runs in its own context, so the
//! backend holds no solver state between calls.
//!
//! Only available when compiled with `--features z3`.
//!
//! ```bash
//! apt-get install libz3-dev  # Linux
//! brew install z3            # macOS
//!
//! cargo build --release --features z3
//! ```

#![cfg(feature = "z3")]

use crate::config::SolverConfig;
use crate::features::solver::domain::{Model, SatOutcome, SymVar, Term, VarId};
use crate::features::solver::ports::SolverBackend;
use crate::shared::models::{ArithOp, CmpOp, Sort, Value};
use std::collections::BTreeMap;
use z3::ast::{Ast, Bool, Dynamic, Int, String as Z3String};
use z3::{Config, Context, SatResult, Solver};

/// Z3-backed solver
#[derive(Debug, Clone)]
pub struct Z3Backend {
    timeout_ms: u64,
}

impl Z3Backend {
    pub fn new(config: &SolverConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
        }
    }
}

impl SolverBackend for Z3Backend {
    fn name(&self) -> &'static str {
        "z3"
    }

    fn check(&self, assertions: &[Term]) -> SatOutcome {
        let mut cfg = Config::new();
        cfg.set_timeout_msec(self.timeout_ms);
        let ctx = Context::new(&cfg);
        let solver = Solver::new(&ctx);
        let mut encoder = Encoder::new(&ctx);

        for assertion in assertions {
            match encoder.encode(assertion).and_then(|d| as_bool(&d)) {
                Ok(formula) => solver.assert(&formula),
                Err(reason) => return SatOutcome::Unknown(reason),
            }
        }

        match solver.check() {
            SatResult::Sat => match solver.get_model() {
                Some(z3_model) => SatOutcome::Sat(encoder.extract(&z3_model)),
                None => SatOutcome::Unknown("solver returned no model".to_string()),
            },
            SatResult::Unsat => SatOutcome::Unsat,
            SatResult::Unknown => {
                let reason = solver.get_reason_unknown().unwrap_or_default();
                if reason.contains("timeout") || reason.contains("canceled") {
                    SatOutcome::Timeout
                } else {
                    SatOutcome::Unknown(reason)
                }
            }
        }
    }
}

type EncodeResult<T> = std::result::Result<T, String>;

struct Encoder<'ctx> {
    ctx: &'ctx Context,
    vars: BTreeMap<VarId, (SymVar, Dynamic<'ctx>)>,
}

impl<'ctx> Encoder<'ctx> {
    fn new(ctx: &'ctx Context) -> Self {
        Self {
            ctx,
            vars: BTreeMap::new(),
        }
    }

    fn variable(&mut self, var: &SymVar) -> Dynamic<'ctx> {
        let ctx = self.ctx;
        self.vars
            .entry(var.id())
            .or_insert_with(|| {
                let ast = match var.sort() {
                    Sort::Bool => Dynamic::from_ast(&Bool::new_const(ctx, var.name())),
                    Sort::Int => Dynamic::from_ast(&Int::new_const(ctx, var.name())),
                    Sort::Str => Dynamic::from_ast(&Z3String::new_const(ctx, var.name())),
                };
                (var.clone(), ast)
            })
            .1
            .clone()
    }

    fn constant(&self, value: &Value) -> EncodeResult<Dynamic<'ctx>> {
        Ok(match value {
            Value::Bool(b) => Dynamic::from_ast(&Bool::from_bool(self.ctx, *b)),
            Value::Int(i) => Dynamic::from_ast(&Int::from_i64(self.ctx, *i)),
            Value::Str(s) => Dynamic::from_ast(
                &Z3String::from_str(self.ctx, s).map_err(|e| format!("string literal: {}", e))?,
            ),
        })
    }

    fn encode(&mut self, term: &Term) -> EncodeResult<Dynamic<'ctx>> {
        match term {
            Term::Var(v) => Ok(self.variable(v)),
            Term::Const(c) => self.constant(c),
            Term::Not(t) => Ok(Dynamic::from_ast(&as_bool(&self.encode(t)?)?.not())),
            Term::And(ts) | Term::Or(ts) => {
                let operands = ts
                    .iter()
                    .map(|t| self.encode(t).and_then(|d| as_bool(&d)))
                    .collect::<EncodeResult<Vec<_>>>()?;
                let refs: Vec<&Bool<'ctx>> = operands.iter().collect();
                let combined = if matches!(term, Term::And(_)) {
                    Bool::and(self.ctx, &refs)
                } else {
                    Bool::or(self.ctx, &refs)
                };
                Ok(Dynamic::from_ast(&combined))
            }
            Term::Neg(t) => Ok(Dynamic::from_ast(&as_int(&self.encode(t)?)?.unary_minus())),
            Term::Cmp(op, l, r) => {
                let (l, r) = (self.encode(l)?, self.encode(r)?);
                self.compare(*op, &l, &r).map(|b| Dynamic::from_ast(&b))
            }
            Term::Arith(op, l, r) => {
                let (l, r) = (self.encode(l)?, self.encode(r)?);
                self.arith(*op, &l, &r)
            }
        }
    }

    fn compare(&self, op: CmpOp, l: &Dynamic<'ctx>, r: &Dynamic<'ctx>) -> EncodeResult<Bool<'ctx>> {
        match op {
            CmpOp::Eq => Ok(l._eq(r)),
            CmpOp::NotEq => Ok(l._eq(r).not()),
            _ => {
                let (l, r) = (as_int(l)?, as_int(r)?);
                Ok(match op {
                    CmpOp::Lt => l.lt(&r),
                    CmpOp::LtE => l.le(&r),
                    CmpOp::Gt => l.gt(&r),
                    _ => l.ge(&r),
                })
            }
        }
    }

    fn arith(&self, op: ArithOp, l: &Dynamic<'ctx>, r: &Dynamic<'ctx>) -> EncodeResult<Dynamic<'ctx>> {
        if let (ArithOp::Add, Some(ls), Some(rs)) = (op, l.as_string(), r.as_string()) {
            return Ok(Dynamic::from_ast(&Z3String::concat(self.ctx, &[&ls, &rs])));
        }

        let (l, r) = (as_int(l)?, as_int(r)?);
        let result = match op {
            ArithOp::Add => Int::add(self.ctx, &[&l, &r]),
            ArithOp::Sub => Int::sub(self.ctx, &[&l, &r]),
            ArithOp::Mult => Int::mul(self.ctx, &[&l, &r]),
            ArithOp::Div => l.div(&r),
            ArithOp::Mod => l.modulo(&r),
        };
        Ok(Dynamic::from_ast(&result))
    }

    fn extract(&self, z3_model: &z3::Model<'ctx>) -> Model {
        let mut model = Model::new();
        for (var, ast) in self.vars.values() {
            let value = match var.sort() {
                Sort::Bool => ast
                    .as_bool()
                    .and_then(|b| z3_model.eval(&b, true))
                    .and_then(|b| b.as_bool())
                    .map(Value::Bool),
                Sort::Int => ast
                    .as_int()
                    .and_then(|i| z3_model.eval(&i, true))
                    .and_then(|i| i.as_i64())
                    .map(Value::Int),
                Sort::Str => ast
                    .as_string()
                    .and_then(|s| z3_model.eval(&s, true))
                    .and_then(|s| s.as_string())
                    .map(Value::Str),
            };
            if let Some(value) = value {
                model.insert(var.name(), value);
            }
        }
        model
    }
}

fn as_bool<'ctx>(ast: &Dynamic<'ctx>) -> EncodeResult<Bool<'ctx>> {
    ast.as_bool()
        .ok_or_else(|| format!("expected Bool term, got '{}'", ast))
}

fn as_int<'ctx>(ast: &Dynamic<'ctx>) -> EncodeResult<Int<'ctx>> {
    ast.as_int()
        .ok_or_else(|| format!("expected Int term, got '{}'", ast))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_z3_bool_scenario() {
        let a = SymVar::new(VarId(0), "a", Sort::Bool);
        let b = SymVar::new(VarId(1), "b", Sort::Bool);
        let backend = Z3Backend::new(&SolverConfig::default());

        let outcome = backend.check(&[Term::And(vec![Term::var(&a), Term::var(&b)])]);
        match outcome {
            SatOutcome::Sat(model) => {
                assert_eq!(model.get(&a), Some(&Value::Bool(true)));
                assert_eq!(model.get(&b), Some(&Value::Bool(true)));
            }
            other => panic!("expected sat, got {:?}", other),
        }

        let outcome = backend.check(&[Term::var(&a), Term::var(&a).negated()]);
        assert_eq!(outcome, SatOutcome::Unsat);
    }
}
