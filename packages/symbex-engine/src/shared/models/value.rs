//! Concrete values, sorts and operator kinds
//!
//! Native value semantics live here so the registry fallback table and the
//! built-in solver evaluate operators identically.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on the byte length of strings built by `+` and `*`
const MAX_STR_BYTES: usize = 1 << 20;

/// Sort (type) of a symbolic variable or term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    Bool,
    Int,
    Str,
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "Bool"),
            Self::Int => write!(f, "Int"),
            Self::Str => write!(f, "String"),
        }
    }
}

/// Concrete value: literal in the syntax tree or assignment in a model
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Value {
    pub fn sort(&self) -> Sort {
        match self {
            Self::Bool(_) => Sort::Bool,
            Self::Int(_) => Sort::Int,
            Self::Str(_) => Sort::Str,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view; booleans coerce to 0/1
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Int(i) => Some(*i),
            Self::Str(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Str(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
}

impl CmpOp {
    /// Ordering comparisons need Int or String operands
    pub fn is_ordering(&self) -> bool {
        !matches!(self, Self::Eq | Self::NotEq)
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "=="),
            Self::NotEq => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::LtE => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::GtE => write!(f, ">="),
        }
    }
}

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mult,
    Div,
    Mod,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mult => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::Mod => write!(f, "%"),
        }
    }
}

/// Apply an arithmetic operator to two concrete values
///
/// Integer arithmetic is checked; `Div` and `Mod` are Euclidean, matching
/// SMT-LIB integer semantics. Division by zero and overflow are errors.
pub fn apply_arith(op: ArithOp, lhs: &Value, rhs: &Value) -> Result<Value, String> {
    match (op, lhs, rhs) {
        (ArithOp::Add, Value::Str(a), Value::Str(b)) => {
            if a.len().saturating_add(b.len()) > MAX_STR_BYTES {
                return Err(format!("concatenation exceeds {MAX_STR_BYTES} bytes"));
            }
            return Ok(Value::Str(format!("{a}{b}")));
        }
        (ArithOp::Mult, Value::Str(s), n) | (ArithOp::Mult, n, Value::Str(s)) => {
            if let Some(count) = n.as_int() {
                let count = usize::try_from(count.max(0)).unwrap_or(usize::MAX);
                if s.len().saturating_mul(count) > MAX_STR_BYTES {
                    return Err(format!("repetition exceeds {MAX_STR_BYTES} bytes"));
                }
                return Ok(Value::Str(s.repeat(count)));
            }
        }
        _ => {}
    }

    let (a, b) = match (lhs.as_int(), rhs.as_int()) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(format!(
                "unsupported operand sorts for '{}': {} and {}",
                op,
                lhs.sort(),
                rhs.sort()
            ))
        }
    };

    let result = match op {
        ArithOp::Add => a.checked_add(b),
        ArithOp::Sub => a.checked_sub(b),
        ArithOp::Mult => a.checked_mul(b),
        ArithOp::Div => a.checked_div_euclid(b),
        ArithOp::Mod => a.checked_rem_euclid(b),
    };

    result
        .map(Value::Int)
        .ok_or_else(|| format!("'{a} {op} {b}' is undefined"))
}

/// Apply a comparison operator to two concrete values
pub fn apply_cmp(op: CmpOp, lhs: &Value, rhs: &Value) -> Result<bool, String> {
    if let (Value::Str(a), Value::Str(b)) = (lhs, rhs) {
        return Ok(match op {
            CmpOp::Eq => a == b,
            CmpOp::NotEq => a != b,
            CmpOp::Lt => a < b,
            CmpOp::LtE => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::GtE => a >= b,
        });
    }

    match (lhs.as_int(), rhs.as_int()) {
        (Some(a), Some(b)) => Ok(match op {
            CmpOp::Eq => a == b,
            CmpOp::NotEq => a != b,
            CmpOp::Lt => a < b,
            CmpOp::LtE => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::GtE => a >= b,
        }),
        // Mixed string / number: only (in)equality is defined
        _ => match op {
            CmpOp::Eq => Ok(false),
            CmpOp::NotEq => Ok(true),
            _ => Err(format!(
                "cannot order {} against {}",
                lhs.sort(),
                rhs.sort()
            )),
        },
    }
}

/// Arithmetic negation
pub fn apply_neg(value: &Value) -> Result<Value, String> {
    value
        .as_int()
        .and_then(i64::checked_neg)
        .map(Value::Int)
        .ok_or_else(|| format!("cannot negate {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_division() {
        assert_eq!(
            apply_arith(ArithOp::Div, &Value::Int(-7), &Value::Int(2)),
            Ok(Value::Int(-4))
        );
        assert_eq!(
            apply_arith(ArithOp::Mod, &Value::Int(-7), &Value::Int(2)),
            Ok(Value::Int(1))
        );
        assert!(apply_arith(ArithOp::Div, &Value::Int(1), &Value::Int(0)).is_err());
    }

    #[test]
    fn test_overflow_is_undefined() {
        assert!(apply_arith(ArithOp::Add, &Value::Int(i64::MAX), &Value::Int(1)).is_err());
        assert!(apply_neg(&Value::Int(i64::MIN)).is_err());
    }

    #[test]
    fn test_bool_coerces_to_int() {
        assert_eq!(
            apply_arith(ArithOp::Add, &Value::Bool(true), &Value::Int(1)),
            Ok(Value::Int(2))
        );
        assert_eq!(apply_cmp(CmpOp::Eq, &Value::Bool(true), &Value::Int(1)), Ok(true));
    }

    #[test]
    fn test_string_operations() {
        assert_eq!(
            apply_arith(ArithOp::Add, &Value::from("ab"), &Value::from("cd")),
            Ok(Value::from("abcd"))
        );
        assert_eq!(
            apply_arith(ArithOp::Mult, &Value::from("ab"), &Value::Int(2)),
            Ok(Value::from("abab"))
        );
        assert_eq!(apply_cmp(CmpOp::Lt, &Value::from("a"), &Value::from("b")), Ok(true));
        assert_eq!(apply_cmp(CmpOp::Eq, &Value::from("1"), &Value::Int(1)), Ok(false));
        assert!(apply_cmp(CmpOp::Lt, &Value::from("1"), &Value::Int(1)).is_err());
    }

    #[test]
    fn test_string_growth_is_bounded() {
        // ("x" * 65536) * 65536 would need 4 GiB
        let inner = apply_arith(ArithOp::Mult, &Value::from("x"), &Value::Int(65_536)).unwrap();
        assert_eq!(inner, Value::Str("x".repeat(65_536)));
        assert!(apply_arith(ArithOp::Mult, &inner, &Value::Int(65_536)).is_err());
        assert!(apply_arith(ArithOp::Mult, &Value::Int(65_536), &inner).is_err());

        let big = Value::Str("y".repeat(MAX_STR_BYTES));
        assert!(apply_arith(ArithOp::Add, &big, &Value::from("z")).is_err());

        // Empty strings repeat any number of times
        assert_eq!(
            apply_arith(ArithOp::Mult, &Value::from(""), &Value::Int(i64::MAX)),
            Ok(Value::from(""))
        );
    }

    #[test]
    fn test_value_deserializes_untagged() {
        let values: Vec<Value> = serde_json::from_str(r#"[true, 3, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![Value::Bool(true), Value::Int(3), Value::Str("x".into())]
        );
    }
}
