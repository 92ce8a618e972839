//! Rule 4: drop CTEs nothing references (spec §4.4.4).

use sqlglot_ast::Expression;

use crate::scope::ScopeTree;

use super::OptimizeContext;

pub fn apply(expr: Expression, _ctx: &OptimizeContext) -> Expression {
    expr.transform(&mut eliminate_node)
}

fn eliminate_node(e: Expression) -> Expression {
    match e {
        Expression::With { ctes, select } => {
            let probe = Expression::With { ctes: ctes.clone(), select: select.clone() };
            let tree = ScopeTree::build(&probe);
            let root = tree.get(tree.root());
            let live: Vec<_> = ctes
                .into_iter()
                .zip(root.children.iter())
                .filter(|(_, &child)| tree.get(child).cte_ref_count > 0)
                .map(|(cte, _)| cte)
                .collect();
            if live.is_empty() {
                *select
            } else {
                Expression::With { ctes: live, select }
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::get_dialect;
    use sqlglot_ast::CteDef;

    fn table(name: &str) -> Expression {
        Expression::Table { name: name.to_string(), schema: None }
    }

    fn minimal_select(from: Expression) -> Expression {
        Expression::Select {
            expressions: vec![Expression::Star],
            distinct: false,
            from: Some(Box::new(from)),
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
    fn unreferenced_cte_is_removed_and_with_unwrapped() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let expr = Expression::With {
            ctes: vec![CteDef { name: "unused".to_string(), select: Box::new(minimal_select(table("users"))) }],
            select: Box::new(minimal_select(table("orders"))),
        };
        assert_eq!(apply(expr, &ctx), minimal_select(table("orders")));
    }

    #[test]
    fn referenced_cte_survives() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let expr = Expression::With {
            ctes: vec![CteDef { name: "recent".to_string(), select: Box::new(minimal_select(table("orders"))) }],
            select: Box::new(minimal_select(table("recent"))),
        };
        let result = apply(expr.clone(), &ctx);
        assert_eq!(result, expr);
    }

    #[test]
    fn second_cte_of_two_is_kept_when_only_it_is_referenced() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let expr = Expression::With {
            ctes: vec![
                CteDef { name: "a".to_string(), select: Box::new(minimal_select(table("x"))) },
                CteDef { name: "b".to_string(), select: Box::new(minimal_select(table("y"))) },
            ],
            select: Box::new(minimal_select(table("b"))),
        };
        let Expression::With { ctes, .. } = apply(expr, &ctx) else { panic!("expected With to survive") };
        assert_eq!(ctes.len(), 1);
        assert_eq!(ctes[0].name, "b");
    }
}
