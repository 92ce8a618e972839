//! Rule 8: heuristic join reordering (spec §4.4.8).

use sqlglot_ast::{Expression, JoinType};

use super::OptimizeContext;

pub fn apply(expr: Expression, _ctx: &OptimizeContext) -> Expression {
    expr.transform(&mut reorder_node)
}

fn reorder_node(e: Expression) -> Expression {
    let Expression::Select { joins, .. } = &e else { return e };
    if joins.len() < 2 {
        return e;
    }
    let Expression::Select { expressions, distinct, from, joins, where_, group_by, having, order_by, limit, offset } =
        e
    else {
        unreachable!()
    };
    let mut joins = joins;
    // Stable sort: inner/cross first, then by selectivity within a tier.
    // `sort_by_key` is a stable sort in std, matching the spec's
    // "sorting is stable and idempotent" requirement.
    joins.sort_by_key(|j| (tier(j), !is_equality_join(j)));
    Expression::Select { expressions, distinct, from, joins, where_, group_by, having, order_by, limit, offset }
}

fn tier(join: &Expression) -> u8 {
    match join {
        Expression::Join { kind: JoinType::Inner | JoinType::Cross, .. } => 0,
        Expression::Join { .. } => 1,
        _ => 1,
    }
}

fn is_equality_join(join: &Expression) -> bool {
    matches!(join, Expression::Join { on: Some(on), .. } if matches!(on.as_ref(), Expression::Eq(..)))
}
