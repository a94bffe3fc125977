//! Operator/Type Registry
//!
//! Stateless lookup tables from operator and type tags to term constructors.
//! Tables are process-wide constants built once on first use.
//!
//! ## Tables
//!
//! | Table | Lookup | Miss |
//! |---|---|---|
//! | operators | [`operator`] → [`OperatorCtor`] | `UnknownOperator` |
//! | fallback | [`native_operator`] → [`NativeOp`] | `UnknownOperator` |
//! | types | [`variable_constructor`] → [`VariableCtor`] | `UnknownType` |
//!
//! Operator constructors are type-strict: they reject operands whose sorts do
//! not fit with `SolverConstruction`. The fallback table holds the native-value
//! version of every arithmetic/comparison operator; the translator uses it
//! only when the typed constructor failed and all operands are constants.
//!
//! ## Division
//!
//! Only the integer sort exists, so `Div` and its `/` alias are integer
//! division, the same as `FloorDiv` / `//`. Both are Euclidean: `7 / 2` is
//! `3` and `-7 / 2` is `-4`. True division on fractional values is not
//! modeled; a branch depending on a fractional quotient is approximated.

use crate::errors::{Result, SymbexError};
use crate::features::solver::domain::{SymVar, Term, VarId};
use crate::shared::models::{apply_arith, apply_cmp, apply_neg, ArithOp, CmpOp, Sort, Value};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// Typed constructor over resolved operands
pub type OperatorCtor = fn(&[Term]) -> Result<Term>;

/// Native-value operation over constant operands
pub type NativeOp = fn(&[Value]) -> std::result::Result<Value, String>;

/// Symbolic variable constructor for one declared type
pub type VariableCtor = fn(VarId, &str) -> SymVar;

static OPERATORS: Lazy<FxHashMap<&'static str, OperatorCtor>> = Lazy::new(|| {
    let entries: [(&[&'static str], OperatorCtor); 15] = [
        // Connectives
        (&["And", "and", "&&"], and_ctor),
        (&["Or", "or", "||"], or_ctor),
        (&["Not", "not", "!"], not_ctor),
        // Comparisons
        (&["Gt", ">"], |ops| compare(CmpOp::Gt, ops)),
        (&["Lt", "<"], |ops| compare(CmpOp::Lt, ops)),
        (&["LtE", "<="], |ops| compare(CmpOp::LtE, ops)),
        (&["GtE", ">="], |ops| compare(CmpOp::GtE, ops)),
        (&["Eq", "=="], |ops| compare(CmpOp::Eq, ops)),
        (&["NotEq", "!="], |ops| compare(CmpOp::NotEq, ops)),
        // Arithmetic
        (&["Add", "+"], |ops| arith(ArithOp::Add, ops)),
        (&["Sub", "-"], |ops| arith(ArithOp::Sub, ops)),
        (&["Mult", "*"], |ops| arith(ArithOp::Mult, ops)),
        (&["Div", "/", "FloorDiv", "//"], |ops| arith(ArithOp::Div, ops)),
        (&["Mod", "%"], |ops| arith(ArithOp::Mod, ops)),
        (&["USub"], neg_ctor),
    ];

    entries
        .iter()
        .flat_map(|(tags, ctor)| tags.iter().map(move |tag| (*tag, *ctor)))
        .collect()
});

static FALLBACK: Lazy<FxHashMap<&'static str, NativeOp>> = Lazy::new(|| {
    let entries: [(&[&'static str], NativeOp); 12] = [
        (&["Gt", ">"], |vals| native_cmp(CmpOp::Gt, vals)),
        (&["Lt", "<"], |vals| native_cmp(CmpOp::Lt, vals)),
        (&["LtE", "<="], |vals| native_cmp(CmpOp::LtE, vals)),
        (&["GtE", ">="], |vals| native_cmp(CmpOp::GtE, vals)),
        (&["Eq", "=="], |vals| native_cmp(CmpOp::Eq, vals)),
        (&["NotEq", "!="], |vals| native_cmp(CmpOp::NotEq, vals)),
        (&["Add", "+"], |vals| native_arith(ArithOp::Add, vals)),
        (&["Sub", "-"], |vals| native_arith(ArithOp::Sub, vals)),
        (&["Mult", "*"], |vals| native_arith(ArithOp::Mult, vals)),
        (&["Div", "/", "FloorDiv", "//"], |vals| native_arith(ArithOp::Div, vals)),
        (&["Mod", "%"], |vals| native_arith(ArithOp::Mod, vals)),
        (&["USub"], |vals| match vals {
            [v] => apply_neg(v),
            _ => Err(format!("expects 1 operand, got {}", vals.len())),
        }),
    ];

    entries
        .iter()
        .flat_map(|(tags, op)| tags.iter().map(move |tag| (*tag, *op)))
        .collect()
});

static TYPES: Lazy<FxHashMap<&'static str, VariableCtor>> = Lazy::new(|| {
    let entries: [(&[&'static str], VariableCtor); 3] = [
        (&["bool", "boolean", "Bool"], |id, name| SymVar::new(id, name, Sort::Bool)),
        (&["int", "integer", "Int"], |id, name| SymVar::new(id, name, Sort::Int)),
        (&["str", "string", "String"], |id, name| SymVar::new(id, name, Sort::Str)),
    ];

    entries
        .iter()
        .flat_map(|(tags, ctor)| tags.iter().map(move |tag| (*tag, *ctor)))
        .collect()
});

/// Typed constructor for an operator tag
pub fn operator(tag: &str) -> Result<OperatorCtor> {
    OPERATORS
        .get(tag)
        .copied()
        .ok_or_else(|| SymbexError::UnknownOperator(tag.to_string()))
}

/// Native-value fallback for an arithmetic/comparison tag
pub fn native_operator(tag: &str) -> Result<NativeOp> {
    FALLBACK
        .get(tag)
        .copied()
        .ok_or_else(|| SymbexError::UnknownOperator(tag.to_string()))
}

/// Variable constructor for a declared type tag
pub fn variable_constructor(type_tag: &str) -> Result<VariableCtor> {
    TYPES
        .get(type_tag)
        .copied()
        .ok_or_else(|| SymbexError::UnknownType(type_tag.to_string()))
}

// ═══════════════════════════════════════════════════════════════════════════
// Typed constructors
// ═══════════════════════════════════════════════════════════════════════════

fn connective_operands(name: &str, operands: &[Term]) -> Result<Vec<Term>> {
    if operands.is_empty() {
        return Err(SymbexError::construction(name, "expects at least one operand"));
    }
    if let Some(bad) = operands.iter().find(|t| t.sort() != Sort::Bool) {
        return Err(SymbexError::construction(
            name,
            format!("operand '{}' has sort {}, expected Bool", bad, bad.sort()),
        ));
    }
    Ok(operands.to_vec())
}

fn and_ctor(operands: &[Term]) -> Result<Term> {
    connective_operands("And", operands).map(Term::And)
}

fn or_ctor(operands: &[Term]) -> Result<Term> {
    connective_operands("Or", operands).map(Term::Or)
}

fn single_operand<'a>(name: &str, operands: &'a [Term], sort: Sort) -> Result<&'a Term> {
    match operands {
        [t] if t.sort() == sort => Ok(t),
        [t] => Err(SymbexError::construction(
            name,
            format!("operand '{}' has sort {}, expected {}", t, t.sort(), sort),
        )),
        _ => Err(SymbexError::construction(
            name,
            format!("expects 1 operand, got {}", operands.len()),
        )),
    }
}

fn not_ctor(operands: &[Term]) -> Result<Term> {
    single_operand("Not", operands, Sort::Bool).map(|t| t.clone().negated())
}

fn neg_ctor(operands: &[Term]) -> Result<Term> {
    single_operand("USub", operands, Sort::Int).map(|t| Term::Neg(Box::new(t.clone())))
}

fn pair<'a>(name: &str, operands: &'a [Term]) -> Result<(&'a Term, &'a Term)> {
    match operands {
        [l, r] => Ok((l, r)),
        _ => Err(SymbexError::construction(
            name,
            format!("expects 2 operands, got {}", operands.len()),
        )),
    }
}

fn compare(op: CmpOp, operands: &[Term]) -> Result<Term> {
    let name = format!("{:?}", op);
    let (l, r) = pair(&name, operands)?;

    if l.sort() != r.sort() {
        return Err(SymbexError::construction(
            name,
            format!("cannot compare {} with {}", l.sort(), r.sort()),
        ));
    }
    if op.is_ordering() && l.sort() == Sort::Bool {
        return Err(SymbexError::construction(name, "Bool operands are not ordered"));
    }

    Ok(Term::Cmp(op, Box::new(l.clone()), Box::new(r.clone())))
}

fn arith(op: ArithOp, operands: &[Term]) -> Result<Term> {
    let name = format!("{:?}", op);
    let (l, r) = pair(&name, operands)?;

    match (op, l.sort(), r.sort()) {
        (_, Sort::Int, Sort::Int) | (ArithOp::Add, Sort::Str, Sort::Str) => {
            Ok(Term::Arith(op, Box::new(l.clone()), Box::new(r.clone())))
        }
        (_, ls, rs) => Err(SymbexError::construction(
            name,
            format!("unsupported operand sorts {} and {}", ls, rs),
        )),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Native fallback operations
// ═══════════════════════════════════════════════════════════════════════════

fn native_pair(vals: &[Value]) -> std::result::Result<(&Value, &Value), String> {
    match vals {
        [l, r] => Ok((l, r)),
        _ => Err(format!("expects 2 operands, got {}", vals.len())),
    }
}

fn native_cmp(op: CmpOp, vals: &[Value]) -> std::result::Result<Value, String> {
    let (l, r) = native_pair(vals)?;
    apply_cmp(op, l, r).map(Value::Bool)
}

fn native_arith(op: ArithOp, vals: &[Value]) -> std::result::Result<Value, String> {
    let (l, r) = native_pair(vals)?;
    apply_arith(op, l, r)
}
