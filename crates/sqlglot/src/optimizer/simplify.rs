//! Rule 1: algebraic, boolean and NULL-propagation rewrites (spec §4.4.1).

use sqlglot_ast::Expression;

use super::support::{numeric_literal, numeric_value};
use super::OptimizeContext;

pub fn apply(expr: Expression, _ctx: &OptimizeContext) -> Expression {
    expr.transform(&mut simplify_node)
}

fn simplify_node(e: Expression) -> Expression {
    use Expression::*;
    match e {
        Not(inner) => simplify_not(*inner),

        And(l, r) => match (l.as_ref(), r.as_ref()) {
            (True, _) => *r,
            (_, True) => *l,
            (False, _) => False,
            _ if *l == *r => *l,
            _ => And(l, r),
        },
        Or(l, r) => match (l.as_ref(), r.as_ref()) {
            (True, _) => True,
            (_, True) => True,
            (False, _) => *r,
            (_, False) => *l,
            _ if *l == *r => *l,
            _ => Or(l, r),
        },

        Add(l, r) => fold_arith(*l, *r, Add, |a, b| a + b),
        Sub(l, r) => {
            if *l == *r {
                return Expression::literal("0");
            }
            fold_arith(*l, *r, Sub, |a, b| a - b)
        }
        Mul(l, r) if has_null_operand_pair(&l, &r) => Null,
        Mul(l, r) => match (l.as_ref(), r.as_ref()) {
            (Literal { value, is_string: false }, _) if value == "0" => Expression::literal("0"),
            (_, Literal { value, is_string: false }) if value == "0" => Expression::literal("0"),
            (Literal { value, is_string: false }, _) if value == "1" => *r,
            (_, Literal { value, is_string: false }) if value == "1" => *l,
            _ => fold_arith(*l, *r, Mul, |a, b| a * b),
        },
        Div(l, r) if has_null_operand_pair(&l, &r) => Null,
        Div(l, r) => match (l.as_ref(), r.as_ref()) {
            (_, Literal { value, is_string: false }) if value == "0" => Null,
            (Literal { value, is_string: false }, _) if value == "0" => Expression::literal("0"),
            (_, Literal { value, is_string: false }) if value == "1" => *l,
            _ if *l == *r => Expression::literal("1"),
            _ => fold_arith(*l, *r, Div, |a, b| a / b),
        },

        Mod(l, r) => fold_arith(*l, *r, Mod, |a, b| if b == 0.0 { f64::NAN } else { a % b }),

        Eq(l, r) if has_null_operand_pair(&l, &r) => Null,
        Eq(l, r) => {
            if *l == *r && is_syntactically_determinate(&l) {
                True
            } else {
                Eq(l, r)
            }
        }
        Neq(l, r) if has_null_operand_pair(&l, &r) => Null,
        Neq(l, r) => {
            if *l == *r && is_syntactically_determinate(&l) {
                False
            } else {
                Neq(l, r)
            }
        }

        Gt(l, r) if has_null_operand_pair(&l, &r) => Null,
        Lt(l, r) if has_null_operand_pair(&l, &r) => Null,
        Gte(l, r) if has_null_operand_pair(&l, &r) => Null,
        Lte(l, r) if has_null_operand_pair(&l, &r) => Null,

        other => other,
    }
}

/// `x=x` folds to `TRUE` only when `x` is deterministic; `Star`/subqueries
/// aren't meaningful comparison operands but literal/identifier/column
/// trees are the common case this rule targets.
fn is_syntactically_determinate(e: &Expression) -> bool {
    !matches!(e, Expression::Function { .. })
}

fn has_null_operand_pair(l: &Expression, r: &Expression) -> bool {
    matches!(l, Expression::Null) || matches!(r, Expression::Null)
}

fn fold_arith(
    l: Expression,
    r: Expression,
    ctor: fn(Box<Expression>, Box<Expression>) -> Expression,
    op: fn(f64, f64) -> f64,
) -> Expression {
    if matches!(l, Expression::Null) || matches!(r, Expression::Null) {
        return Expression::Null;
    }
    match (numeric_value(&l), numeric_value(&r)) {
        (Some(a), Some(b)) => {
            let result = op(a, b);
            if result.is_finite() {
                numeric_literal(result)
            } else {
                Expression::Null
            }
        }
        _ => ctor(Box::new(l), Box::new(r)),
    }
}

fn simplify_not(inner: Expression) -> Expression {
    use Expression::*;
    match inner {
        Not(x) => *x,
        True => False,
        False => True,
        Gt(l, r) => Lte(l, r),
        Lt(l, r) => Gte(l, r),
        Gte(l, r) => Lt(l, r),
        Lte(l, r) => Gt(l, r),
        Eq(l, r) => Neq(l, r),
        Neq(l, r) => Eq(l, r),
        other => Not(Box::new(other)),
    }
}
