//! Small predicates shared by several optimizer rules.

use sqlglot_ast::Expression;

/// Whether `expr` is a literal or boolean/null atom — the base case for
/// constant folding.
pub fn is_literal_atom(expr: &Expression) -> bool {
    matches!(expr, Expression::Literal { .. } | Expression::True | Expression::False | Expression::Null)
}

/// Parses a numeric literal's text, if `expr` is one.
pub fn numeric_value(expr: &Expression) -> Option<f64> {
    match expr {
        Expression::Literal { value, is_string: false } => value.parse::<f64>().ok(),
        _ => None,
    }
}

/// Whether a numeric literal's text round-trips through an integer without
/// truncation — used to decide whether a folded arithmetic result should be
/// emitted as `5` or `5.5`.
pub fn is_integral(value: f64) -> bool {
    value.fract() == 0.0 && value.is_finite()
}

pub fn numeric_literal(value: f64) -> Expression {
    if is_integral(value) {
        Expression::literal(format!("{}", value as i64))
    } else {
        Expression::literal(value.to_string())
    }
}

/// Whether `select` has any aggregation-shaped features that block rules
/// like `MergeSubqueries`/`PushdownPredicates` from treating it as a plain
/// row source: `GROUP BY`/`HAVING`/`DISTINCT`/`LIMIT`/`OFFSET`, or a known
/// aggregate function call anywhere in its projection list.
pub fn has_aggregation(select: &Expression) -> bool {
    let Expression::Select { expressions, distinct, group_by, having, limit, offset, .. } = select else {
        return false;
    };
    if *distinct || group_by.is_some() || having.is_some() || limit.is_some() || offset.is_some() {
        return true;
    }
    expressions.iter().any(|e| e.find_all(is_aggregate_call).into_iter().next().is_some())
}

fn is_aggregate_call(expr: &Expression) -> bool {
    const AGGREGATES: &[&str] = &["COUNT", "SUM", "AVG", "MIN", "MAX"];
    matches!(expr, Expression::Function { name, .. } if AGGREGATES.iter().any(|a| a.eq_ignore_ascii_case(name)))
}

/// The column name a projected expression exposes to an enclosing query:
/// an explicit alias, a bare column's own name, or `None` if nothing
/// nameable (e.g. a bare literal).
pub fn projected_name(expr: &Expression) -> Option<String> {
    match expr {
        Expression::Alias { alias, .. } => Some(alias.clone()),
        Expression::Column { name, .. } => leaf_name(name),
        _ => None,
    }
}

pub fn leaf_name(expr: &Expression) -> Option<String> {
    match expr {
        Expression::Identifier { name, .. } => Some(name.clone()),
        _ => None,
    }
}

/// All bare column names referenced anywhere in `expr`.
pub fn referenced_column_names(expr: &Expression) -> Vec<String> {
    expr.find_all(|e| matches!(e, Expression::Column { .. }))
        .into_iter()
        .filter_map(|e| match e {
            Expression::Column { name, .. } => leaf_name(name),
            _ => None,
        })
        .collect()
}

pub fn projection_has_star(expressions: &[Expression]) -> bool {
    expressions.iter().any(|e| matches!(e, Expression::Star))
}
