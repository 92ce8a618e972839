//! Rule 11: prepend the owning table to unqualified column references
//! (spec §4.4.11).

use std::collections::HashMap;

use sqlglot_ast::Expression;

use super::OptimizeContext;

pub fn apply(expr: Expression, _ctx: &OptimizeContext) -> Expression {
    expr.transform(&mut qualify_node)
}

fn qualify_node(e: Expression) -> Expression {
    let Expression::Select { .. } = &e else { return e };
    let table_map = build_table_map(&e);
    rewrite_columns(e, &table_map)
}

/// `alias → columns it projects`, built from `FROM`/`JOIN` sources; `*`
/// marks "this source could satisfy any column name" per spec.
fn build_table_map(select: &Expression) -> HashMap<String, ColumnSet> {
    let mut map = HashMap::new();
    let Expression::Select { from, joins, .. } = select else { return map };
    if let Some(from) = from {
        add_source(from, &mut map);
    }
    for join in joins {
        if let Expression::Join { table, .. } = join {
            add_source(table, &mut map);
        }
    }
    map
}

enum ColumnSet {
    Star,
    Named(Vec<String>),
}

impl ColumnSet {
    fn contains(&self, name: &str) -> bool {
        match self {
            ColumnSet::Star => true,
            ColumnSet::Named(cols) => cols.iter().any(|c| c == name),
        }
    }
}

fn add_source(expr: &Expression, map: &mut HashMap<String, ColumnSet>) {
    match expr {
        Expression::Table { name, .. } => {
            map.insert(name.clone(), ColumnSet::Star);
        }
        Expression::Alias { expression, alias } => match expression.as_ref() {
            Expression::Table { .. } => {
                map.insert(alias.clone(), ColumnSet::Star);
            }
            Expression::Subquery { select } => {
                map.insert(alias.clone(), projection_columns(select));
            }
            _ => {}
        },
        Expression::Subquery { select } => {
            if let Expression::Select { .. } = select.as_ref() {
                map.insert(String::new(), projection_columns(select));
            }
        }
        _ => {}
    }
}

fn projection_columns(select: &Expression) -> ColumnSet {
    let Expression::Select { expressions, .. } = select else { return ColumnSet::Named(vec![]) };
    if super::support::projection_has_star(expressions) {
        return ColumnSet::Star;
    }
    ColumnSet::Named(expressions.iter().filter_map(super::support::projected_name).collect())
}

fn rewrite_columns(select: Expression, table_map: &HashMap<String, ColumnSet>) -> Expression {
    select.map_children(|child| qualify_within(child, table_map))
}

fn qualify_within(expr: Expression, table_map: &HashMap<String, ColumnSet>) -> Expression {
    match expr {
        Expression::Column { name, table: None } => {
            let Expression::Identifier { name: col_name, .. } = name.as_ref() else {
                return Expression::Column { name, table: None };
            };
            let candidates: Vec<&String> =
                table_map.iter().filter(|(_, cols)| cols.contains(col_name)).map(|(alias, _)| alias).collect();
            if candidates.len() == 1 && !candidates[0].is_empty() {
                Expression::Column {
                    name,
                    table: Some(Box::new(Expression::Identifier { name: candidates[0].clone(), quoted: false })),
                }
            } else {
                Expression::Column { name, table: None }
            }
        }
        // Nested selects already had their own scope qualified during the
        // post-order transform's earlier visit to that node — recursing
        // into one here would re-resolve its columns against this scope's
        // table map instead of its own.
        select @ (Expression::Select { .. } | Expression::Subquery { .. }) => select,
        other => other.map_children(|child| qualify_within(child, table_map)),
    }
}
