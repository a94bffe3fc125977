//! Fixture functions
//!
//! Boolean branch-detection functions with their source line numbers.

use super::builders::*;
use symbex_engine::shared::models::{Expr, FunctionUnit};

/// ```text
/// 1  def f(a: bool, b: bool) -> int:
/// 2      if a and b:
/// 3          return 1
/// 4      if a:
/// 5          return 2
/// 6      if b and not a:
/// 7          return 3
/// 8      if a and not a:
/// 9          return 4
/// 10     return 0
/// ```
pub fn two_flags() -> FunctionUnit {
    FunctionBuilder::new("f")
        .bools(&["a", "b"])
        .stmt(when(2, and(vec![id("a"), id("b")]), vec![ret(3)]))
        .stmt(when(4, id("a"), vec![ret(5)]))
        .stmt(when(6, and(vec![id("b"), not(id("a"))]), vec![ret(7)]))
        .stmt(when(8, and(vec![id("a"), not(id("a"))]), vec![ret(9)]))
        .stmt(ret(10))
        .build()
}

/// `if (a and not b) or c: ... else: ...`
pub fn either_or_else() -> FunctionUnit {
    FunctionBuilder::new("test_func2")
        .bools(&["a", "b", "c"])
        .stmt(when_else(
            19,
            or(vec![and(vec![id("a"), not(id("b"))]), id("c")]),
            vec![ret(20)],
            vec![ret(22)],
        ))
        .build()
}

/// `c: bool = True` makes `a and b and not c` dead
pub fn shadowed_by_declaration() -> FunctionUnit {
    FunctionBuilder::new("test_func4")
        .bools(&["a", "b"])
        .stmt(declare(31, "c", "bool", Expr::lit(true)))
        .stmt(when(32, and(vec![id("a"), id("b"), not(id("c"))]), vec![ret(33)]))
        .stmt(ret(35))
        .build()
}

/// `c = False` after `c: bool = True` revives the branch
pub fn revived_by_reassignment() -> FunctionUnit {
    FunctionBuilder::new("test_func5")
        .bools(&["a", "b"])
        .stmt(declare(39, "c", "bool", Expr::lit(true)))
        .stmt(assign(40, "c", Expr::lit(false)))
        .stmt(when(42, and(vec![id("a"), id("b"), not(id("c"))]), vec![ret(43)]))
        .stmt(ret(45))
        .build()
}

/// `c = not a`: reassignment from an expression
pub fn reassigned_from_expression() -> FunctionUnit {
    FunctionBuilder::new("test_func6")
        .bools(&["a", "b"])
        .stmt(declare(49, "c", "bool", Expr::lit(true)))
        .stmt(assign(50, "c", not(id("a"))))
        .stmt(when(52, and(vec![id("a"), id("b"), not(id("c"))]), vec![ret(53)]))
        .stmt(ret(55))
        .build()
}

/// ```text
/// 59     if a:
/// 60         if b:
/// 61             return 1
/// 62     elif not b:
/// 63         return 2
/// ```
pub fn nested_with_elif() -> FunctionUnit {
    FunctionBuilder::new("test_func7")
        .bools(&["a", "b"])
        .stmt(when_else(
            59,
            id("a"),
            vec![when(60, id("b"), vec![ret(61)])],
            vec![when(62, not(id("b")), vec![ret(63)])],
        ))
        .build()
}

/// Two independent if/else blocks
pub fn sequential_if_else() -> FunctionUnit {
    FunctionBuilder::new("test_func9")
        .bools(&["a", "b"])
        .stmt(when_else(76, id("a"), vec![ret(77)], vec![ret(79)]))
        .stmt(when_else(81, id("b"), vec![ret(82)], vec![ret(84)]))
        .build()
}
