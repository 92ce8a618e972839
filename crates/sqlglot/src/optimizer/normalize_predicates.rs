//! Rule 5: flatten and deduplicate boolean predicates (spec §4.4.5).

use sqlglot_ast::Expression;

use super::OptimizeContext;

pub fn apply(expr: Expression, _ctx: &OptimizeContext) -> Expression {
    expr.transform(&mut normalize_node)
}

fn normalize_node(e: Expression) -> Expression {
    use Expression::*;
    match e {
        Not(inner) => match *inner {
            Not(x) => *x,
            And(l, r) => Or(Box::new(Not(l)), Box::new(Not(r))),
            Or(l, r) => And(Box::new(Not(l)), Box::new(Not(r))),
            other => Not(Box::new(other)),
        },
        And(l, r) => {
            if is_negation_of(&l, &r) || is_negation_of(&r, &l) {
                return False;
            }
            let mut conjuncts = Vec::new();
            flatten(And(l, r), &mut conjuncts, is_and);
            dedup(&mut conjuncts);
            rebuild(conjuncts, And, True)
        }
        Or(l, r) => {
            if is_negation_of(&l, &r) || is_negation_of(&r, &l) {
                return True;
            }
            let mut disjuncts = Vec::new();
            flatten(Or(l, r), &mut disjuncts, is_or);
            dedup(&mut disjuncts);
            rebuild(disjuncts, Or, False)
        }
        other => other,
    }
}

fn is_and(e: &Expression) -> Option<(Expression, Expression)> {
    match e {
        Expression::And(l, r) => Some(((**l).clone(), (**r).clone())),
        _ => None,
    }
}

fn is_or(e: &Expression) -> Option<(Expression, Expression)> {
    match e {
        Expression::Or(l, r) => Some(((**l).clone(), (**r).clone())),
        _ => None,
    }
}

fn flatten(e: Expression, out: &mut Vec<Expression>, split: fn(&Expression) -> Option<(Expression, Expression)>) {
    match split(&e) {
        Some((l, r)) => {
            flatten(l, out, split);
            flatten(r, out, split);
        }
        None => out.push(e),
    }
}

fn dedup(items: &mut Vec<Expression>) {
    let mut seen: Vec<Expression> = Vec::new();
    items.retain(|item| {
        if seen.contains(item) {
            false
        } else {
            seen.push(item.clone());
            true
        }
    });
}

fn rebuild(
    items: Vec<Expression>,
    ctor: fn(Box<Expression>, Box<Expression>) -> Expression,
    identity: Expression,
) -> Expression {
    let mut iter = items.into_iter();
    let Some(first) = iter.next() else { return identity };
    iter.fold(first, |acc, item| ctor(Box::new(acc), Box::new(item)))
}

/// `a` is the literal negation of `b`: `NOT b` (or `b` is `NOT a`).
fn is_negation_of(a: &Expression, b: &Expression) -> bool {
    match a {
        Expression::Not(inner) | Expression::Not2(inner) => inner.as_ref() == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::get_dialect;

    #[test]
    fn duplicate_conjunct_is_removed() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let eq = Expression::Eq(Box::new(Expression::identifier("x")), Box::new(Expression::literal("5")));
        let expr = Expression::And(Box::new(eq.clone()), Box::new(eq.clone()));
        assert_eq!(apply(expr, &ctx), eq);
    }

    #[test]
    fn x_and_not_x_is_false() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let x = Expression::identifier("x");
        let expr = Expression::And(Box::new(x.clone()), Box::new(Expression::Not(Box::new(x))));
        assert_eq!(apply(expr, &ctx), Expression::False);
    }

    #[test]
    fn x_or_not_x_is_true() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let x = Expression::identifier("x");
        let expr = Expression::Or(Box::new(x.clone()), Box::new(Expression::Not(Box::new(x))));
        assert_eq!(apply(expr, &ctx), Expression::True);
    }

    #[test]
    fn double_negation_collapses() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let x = Expression::identifier("x");
        let expr = Expression::Not(Box::new(Expression::Not(Box::new(x.clone()))));
        assert_eq!(apply(expr, &ctx), x);
    }

    #[test]
    fn de_morgan_on_not_and() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let x = Expression::identifier("x");
        let y = Expression::identifier("y");
        let expr = Expression::Not(Box::new(Expression::And(Box::new(x.clone()), Box::new(y.clone()))));
        assert_eq!(
            apply(expr, &ctx),
            Expression::Or(Box::new(Expression::Not(Box::new(x))), Box::new(Expression::Not(Box::new(y))))
        );
    }
}
