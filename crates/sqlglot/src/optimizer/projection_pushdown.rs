//! Rule 9: narrow a subquery's projection list to what the enclosing
//! `SELECT` actually demands (spec §4.4.9).

use sqlglot_ast::Expression;

use super::support::{projected_name, projection_has_star, referenced_column_names};
use super::OptimizeContext;

pub fn apply(expr: Expression, _ctx: &OptimizeContext) -> Expression {
    expr.transform(&mut pushdown_node)
}

fn pushdown_node(e: Expression) -> Expression {
    let Expression::Select { expressions: outer_exprs, from: Some(from), .. } = &e else {
        return e;
    };
    if projection_has_star(outer_exprs) {
        return e;
    }
    let demanded = outer_exprs
        .iter()
        .flat_map(referenced_column_names)
        .collect::<Vec<_>>();

    let rewrite_subquery = |select: Box<Expression>| -> Box<Expression> {
        let Expression::Select { expressions: inner_exprs, .. } = select.as_ref() else { return select };
        if projection_has_star(inner_exprs) || demanded.is_empty() {
            return select;
        }
        let narrowed: Vec<Expression> = inner_exprs
            .iter()
            .filter(|proj| projected_name(proj).is_some_and(|name| demanded.contains(&name)))
            .cloned()
            .collect();
        if narrowed.is_empty() || narrowed.len() == inner_exprs.len() {
            return select;
        }
        let Expression::Select { distinct, from, joins, where_, group_by, having, order_by, limit, offset, .. } =
            *select
        else {
            unreachable!()
        };
        Box::new(Expression::Select {
            expressions: narrowed,
            distinct,
            from,
            joins,
            where_,
            group_by,
            having,
            order_by,
            limit,
            offset,
        })
    };

    let new_from = match *from.clone() {
        Expression::Subquery { select } => Box::new(Expression::Subquery { select: rewrite_subquery(select) }),
        Expression::Alias { expression, alias } => match *expression {
            Expression::Subquery { select } => {
                Box::new(Expression::Alias { expression: Box::new(Expression::Subquery { select: rewrite_subquery(select) }), alias })
            }
            other => Box::new(Expression::Alias { expression: Box::new(other), alias }),
        },
        other => Box::new(other),
    };

    let Expression::Select { expressions, distinct, joins, where_, group_by, having, order_by, limit, offset, .. } = e
    else {
        unreachable!()
    };
    Expression::Select { expressions, distinct, from: Some(new_from), joins, where_, group_by, having, order_by, limit, offset }
}
