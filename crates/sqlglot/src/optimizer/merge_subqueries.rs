//! Rule 7: inline a trivial subquery into its parent (spec §4.4.7).

use sqlglot_ast::Expression;

use super::support::has_aggregation;
use super::OptimizeContext;

pub fn apply(expr: Expression, _ctx: &OptimizeContext) -> Expression {
    expr.transform(&mut merge_node)
}

fn merge_node(e: Expression) -> Expression {
    let Expression::Select { from: Some(from), .. } = &e else {
        return e;
    };
    let inner_select = match from.as_ref() {
        Expression::Subquery { select } => Some(select.as_ref()),
        Expression::Alias { expression, .. } => match expression.as_ref() {
            Expression::Subquery { select } => Some(select.as_ref()),
            _ => None,
        },
        _ => None,
    };
    let Some(inner) = inner_select else { return e };
    if !is_simple_passthrough(inner) {
        return e;
    }
    let Expression::Select { from: inner_from, .. } = inner else { return e };
    let Some(inner_table) = inner_from.clone() else { return e };

    let Expression::Select { expressions, distinct, joins, where_, group_by, having, order_by, limit, offset, .. } = e
    else {
        unreachable!()
    };
    Expression::Select {
        expressions,
        distinct,
        from: Some(inner_table),
        joins,
        where_,
        group_by,
        having,
        order_by,
        limit,
        offset,
    }
}

/// A `SELECT ... FROM t` with none of the clauses that would make
/// flattening change row counts or column identity: `GROUP BY`, `HAVING`,
/// `DISTINCT`, `LIMIT`, `OFFSET`, or an aggregate in the projection list.
fn is_simple_passthrough(select: &Expression) -> bool {
    let Expression::Select { joins, where_, .. } = select else { return false };
    !has_aggregation(select) && joins.is_empty() && where_.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::get_dialect;

    fn select_star_from(table: Expression) -> Expression {
        Expression::Select {
            expressions: vec![Expression::Star],
            distinct: false,
            from: Some(Box::new(table)),
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
    fn simple_subquery_gets_inlined() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let inner = select_star_from(Expression::Table { name: "t".to_string(), schema: None });
        let outer = select_star_from(Expression::Subquery { select: Box::new(inner) });
        let result = apply(outer, &ctx);
        assert_eq!(result, select_star_from(Expression::Table { name: "t".to_string(), schema: None }));
    }

    #[test]
    fn subquery_with_where_is_left_unmerged() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let mut inner = select_star_from(Expression::Table { name: "t".to_string(), schema: None });
        if let Expression::Select { where_, .. } = &mut inner {
            *where_ = Some(Box::new(Expression::Eq(
                Box::new(Expression::identifier("x")),
                Box::new(Expression::literal("1")),
            )));
        }
        let outer = select_star_from(Expression::Subquery { select: Box::new(inner.clone()) });
        let expected = select_star_from(Expression::Subquery { select: Box::new(inner) });
        assert_eq!(apply(outer, &ctx), expected);
    }
}
