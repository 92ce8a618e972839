//! Rule 6: push a outer `WHERE` into a simple subquery (spec §4.4.6).

use sqlglot_ast::Expression;

use super::support::{has_aggregation, projected_name, projection_has_star, referenced_column_names};
use super::OptimizeContext;

pub fn apply(expr: Expression, _ctx: &OptimizeContext) -> Expression {
    expr.transform(&mut pushdown_node)
}

fn pushdown_node(e: Expression) -> Expression {
    let Expression::Select { from: Some(from), where_: Some(pred), .. } = &e else {
        return e;
    };

    let subquery_select = match from.as_ref() {
        Expression::Subquery { select } => Some(select.as_ref()),
        Expression::Alias { expression, .. } => match expression.as_ref() {
            Expression::Subquery { select } => Some(select.as_ref()),
            _ => None,
        },
        _ => None,
    };
    let Some(inner) = subquery_select else { return e };

    if has_aggregation(inner) || is_correlated(pred) {
        return e;
    }

    let Expression::Select { expressions, .. } = inner else { return e };
    if !projection_has_star(expressions) {
        let available: Vec<String> = expressions.iter().filter_map(projected_name).collect();
        let demanded = referenced_column_names(pred);
        if !demanded.iter().all(|d| available.contains(d)) {
            return e;
        }
    }

    let Expression::Select { expressions, distinct, from, joins, where_, group_by, having, order_by, limit, offset } = e
    else {
        unreachable!()
    };
    let from_inner = from.unwrap();
    let pred = where_.unwrap();

    let rewrite_inner = |inner_select: Expression| -> Expression {
        let Expression::Select {
            expressions: ie,
            distinct: id,
            from: ifrom,
            joins: ij,
            where_: iwhere,
            group_by: ig,
            having: ih,
            order_by: io,
            limit: il,
            offset: ioff,
        } = inner_select
        else {
            unreachable!()
        };
        let combined_where = match iwhere {
            Some(existing) => Some(Box::new(Expression::And(existing, pred.clone()))),
            None => Some(pred.clone()),
        };
        Expression::Select {
            expressions: ie,
            distinct: id,
            from: ifrom,
            joins: ij,
            where_: combined_where,
            group_by: ig,
            having: ih,
            order_by: io,
            limit: il,
            offset: ioff,
        }
    };

    let new_from = match *from_inner {
        Expression::Subquery { select } => Box::new(Expression::Subquery { select: Box::new(rewrite_inner(*select)) }),
        Expression::Alias { expression, alias } => match *expression {
            Expression::Subquery { select } => Box::new(Expression::Alias {
                expression: Box::new(Expression::Subquery { select: Box::new(rewrite_inner(*select)) }),
                alias,
            }),
            other => Box::new(Expression::Alias { expression: Box::new(other), alias }),
        },
        other => Box::new(other),
    };

    Expression::Select {
        expressions,
        distinct,
        from: Some(new_from),
        joins,
        where_: None,
        group_by,
        having,
        order_by,
        limit,
        offset,
    }
}

/// Whether `pred` references anything beyond plain column names — a rough
/// stand-in for true correlation analysis (spec's "correlated predicates
/// ... are not pushed"); a function call is treated as possibly correlated
/// with the outer query and blocks the rewrite.
fn is_correlated(pred: &Expression) -> bool {
    pred.find_all(|e| matches!(e, Expression::Function { .. })).into_iter().next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::get_dialect;

    fn select_star_from(table: &str) -> Expression {
        Expression::Select {
            expressions: vec![Expression::Star],
            distinct: false,
            from: Some(Box::new(Expression::Table { name: table.to_string(), schema: None })),
            joins: vec![],
            where_: None,
            group_by: None,
            having: None,
            order_by: vec![],
            limit: None,
            offset: None,
        }
    }

    #[test]
    fn predicate_pushes_into_star_subquery() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let pred = Expression::Eq(Box::new(Expression::identifier("x")), Box::new(Expression::literal("5")));
        let outer = Expression::Select {
            expressions: vec![Expression::Star],
            distinct: false,
            from: Some(Box::new(Expression::Subquery { select: Box::new(select_star_from("t")) })),
            joins: vec![],
            where_: Some(Box::new(pred.clone())),
            group_by: None,
            having: None,
            order_by: vec![],
            limit: None,
            offset: None,
        };
        let result = apply(outer, &ctx);
        let Expression::Select { from, where_, .. } = &result else { panic!("expected select") };
        assert!(where_.is_none());
        let Expression::Subquery { select } = from.as_ref().unwrap().as_ref() else { panic!("expected subquery") };
        let Expression::Select { where_: inner_where, .. } = select.as_ref() else { panic!() };
        assert_eq!(inner_where.as_deref(), Some(&pred));
    }

    #[test]
    fn aggregated_subquery_blocks_pushdown() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let mut inner = select_star_from("t");
        if let Expression::Select { group_by, .. } = &mut inner {
            *group_by = Some(Box::new(Expression::GroupBy(vec![Expression::identifier("x")])));
        }
        let pred = Expression::Eq(Box::new(Expression::identifier("x")), Box::new(Expression::literal("5")));
        let outer = Expression::Select {
            expressions: vec![Expression::Star],
            distinct: false,
            from: Some(Box::new(Expression::Subquery { select: Box::new(inner) })),
            joins: vec![],
            where_: Some(Box::new(pred.clone())),
            group_by: None,
            having: None,
            order_by: vec![],
            limit: None,
            offset: None,
        };
        let result = apply(outer.clone(), &ctx);
        assert_eq!(result, outer);
    }
}
