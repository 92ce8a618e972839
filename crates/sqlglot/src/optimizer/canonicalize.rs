//! Rule 2: normalize relational form (spec §4.4.2).

use sqlglot_ast::Expression;

use super::OptimizeContext;

pub fn apply(expr: Expression, _ctx: &OptimizeContext) -> Expression {
    expr.transform(&mut canonicalize_node)
}

fn canonicalize_node(e: Expression) -> Expression {
    use Expression::*;
    match e {
        Gt(l, r) if is_literal_column(&l, &r) => Lt(r, l),
        Lt(l, r) if is_literal_column(&l, &r) => Gt(r, l),
        Gte(l, r) if is_literal_column(&l, &r) => Lte(r, l),
        Lte(l, r) if is_literal_column(&l, &r) => Gte(r, l),

        Not(inner) => canonicalize_not(*inner),

        other => other,
    }
}

/// `literal OP column` — the shape this rule swaps to `column OP' literal`.
fn is_literal_column(l: &Expression, r: &Expression) -> bool {
    matches!(l, Expression::Literal { .. }) && matches!(r, Expression::Column { .. } | Expression::Identifier { .. })
}

fn canonicalize_not(inner: Expression) -> Expression {
    use Expression::*;
    let inner = match inner {
        Paren(boxed) => *boxed,
        other => other,
    };
    match inner {
        Gt(l, r) => Lte(l, r),
        Lt(l, r) => Gte(l, r),
        Gte(l, r) => Lt(l, r),
        Lte(l, r) => Gt(l, r),
        Eq(l, r) => Neq(l, r),
        Neq(l, r) => Eq(l, r),
        other => Not(Box::new(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::get_dialect;

    #[test]
    fn literal_lt_column_swaps_to_column_gt_literal() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let expr = Expression::Lt(Box::new(Expression::literal("5")), Box::new(Expression::identifier("x")));
        assert_eq!(
            apply(expr, &ctx),
            Expression::Gt(Box::new(Expression::identifier("x")), Box::new(Expression::literal("5")))
        );
    }

    #[test]
    fn not_gt_becomes_lte_and_strips_paren() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let expr = Expression::Not(Box::new(Expression::Paren(Box::new(Expression::Gt(
            Box::new(Expression::identifier("x")),
            Box::new(Expression::identifier("y")),
        )))));
        assert_eq!(
            apply(expr, &ctx),
            Expression::Lte(Box::new(Expression::identifier("x")), Box::new(Expression::identifier("y")))
        );
    }
}
