//! Rule 3: decide which identifiers need quoting (spec §4.4.3).

use sqlglot_ast::Expression;

use crate::dialect::Dialect;

use super::OptimizeContext;

pub fn apply(expr: Expression, ctx: &OptimizeContext) -> Expression {
    let dialect = ctx.dialect;
    expr.transform(&mut |e| match e {
        Expression::Identifier { name, quoted } => {
            let quoted = quoted || needs_quoting(&name, dialect);
            Expression::Identifier { name, quoted }
        }
        Expression::Table { name, schema } if needs_quoting(&name, dialect) => {
            Expression::Table { name: quote_bare(&name), schema }
        }
        other => other,
    })
}

fn needs_quoting(name: &str, dialect: &Dialect) -> bool {
    if is_already_quoted(name) {
        return false;
    }
    dialect.is_reserved_keyword(name) || !matches_bare_identifier(name) || starts_with_digit(name)
}

fn is_already_quoted(name: &str) -> bool {
    let pairs: [(char, char); 4] = [('"', '"'), ('`', '`'), ('[', ']'), ('\'', '\'')];
    let mut chars = name.chars();
    let (Some(first), Some(last)) = (chars.next(), name.chars().last()) else {
        return false;
    };
    pairs.iter().any(|&(open, close)| first == open && last == close && name.len() >= 2)
}

fn matches_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn starts_with_digit(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// `Table.name` carries no `quoted` flag of its own (spec §3's `Table` has
/// no such field) — this rule encodes the decision directly in the text,
/// which the generator then emits verbatim since `format_identifier` is
/// only invoked with `quoted=false` for `Table`.
fn quote_bare(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::get_dialect;

    #[test]
    fn reserved_keyword_gets_quoted() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let expr = Expression::Identifier { name: "select".to_string(), quoted: false };
        assert_eq!(apply(expr, &ctx), Expression::Identifier { name: "select".to_string(), quoted: true });
    }

    #[test]
    fn plain_name_stays_unquoted() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let expr = Expression::Identifier { name: "user_id".to_string(), quoted: false };
        assert_eq!(apply(expr, &ctx), Expression::Identifier { name: "user_id".to_string(), quoted: false });
    }

    #[test]
    fn already_quoted_name_is_left_alone() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let expr = Expression::Identifier { name: "\"select\"".to_string(), quoted: true };
        assert_eq!(apply(expr, &ctx), Expression::Identifier { name: "\"select\"".to_string(), quoted: true });
    }

    #[test]
    fn name_with_space_needs_quoting() {
        let dialect = get_dialect("ANSI").unwrap();
        let ctx = OptimizeContext { dialect: &dialect };
        let expr = Expression::Identifier { name: "my col".to_string(), quoted: false };
        assert_eq!(apply(expr, &ctx), Expression::Identifier { name: "my col".to_string(), quoted: true });
    }
}
