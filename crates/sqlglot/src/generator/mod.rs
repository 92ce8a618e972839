//! AST → SQL string serialization (spec §4.6).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlglot_ast::{CteDef, Expression, JoinType, OrderDirection};

use crate::dialect::Dialect;

/// Formatting knobs every dialect shares; dialect-specific behavior
/// (identifier quoting) is delegated to [`Dialect::format_identifier`]
/// rather than subclassed here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratorConfig {
    pub pretty: bool,
    pub lower_case_keywords: bool,
    pub use_ansi_quotes: bool,
    pub indent_width: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            pretty: false,
            lower_case_keywords: false,
            use_ansi_quotes: false,
            indent_width: 2,
        }
    }
}

/// Binds a [`GeneratorConfig`] to a [`Dialect`] for one or more `generate`
/// calls. Never mutates its input tree.
pub struct Generator<'a> {
    dialect: &'a Dialect,
    config: GeneratorConfig,
}

impl<'a> Generator<'a> {
    pub fn new(dialect: &'a Dialect, config: GeneratorConfig) -> Self {
        Generator { dialect, config }
    }

    /// A one-shot pretty-printing variant (SPEC_FULL §3, mirroring the
    /// original's `generate(pretty=True)` convenience).
    pub fn with_pretty(mut self) -> Self {
        self.config.pretty = true;
        self
    }

    pub fn generate(&self, expr: &Expression) -> String {
        self.emit(expr)
    }

    fn kw(&self, s: &str) -> String {
        if self.config.lower_case_keywords {
            s.to_ascii_lowercase()
        } else {
            s.to_ascii_uppercase()
        }
    }

    fn emit_prec(&self, child: &Expression, parent_prec: u8) -> String {
        if precedence(child) < parent_prec {
            format!("({})", self.emit(child))
        } else {
            self.emit(child)
        }
    }

    fn bin(&self, l: &Expression, r: &Expression, op: &str, prec: u8) -> String {
        format!("{} {} {}", self.emit_prec(l, prec), op, self.emit_prec(r, prec))
    }

    fn quote_string_literal(&self, value: &str) -> String {
        let q = self.dialect.tokenizer_settings().string_quotes[0].open;
        let doubled = value.replace(q, &format!("{q}{q}"));
        format!("{q}{doubled}{q}")
    }

    fn emit(&self, e: &Expression) -> String {
        use Expression::*;
        match e {
            Literal { value, is_string } => {
                if *is_string {
                    self.quote_string_literal(value)
                } else {
                    value.clone()
                }
            }
            True => self.kw("TRUE"),
            False => self.kw("FALSE"),
            Null => self.kw("NULL"),
            Star => "*".to_string(),
            Identifier { name, quoted } => self.dialect.format_identifier(name, *quoted),
            Column { name, table } => match table {
                Some(t) => format!("{}.{}", self.emit(t), self.emit(name)),
                None => self.emit(name),
            },
            Table { name, schema } => {
                let quoted_name = self.dialect.format_identifier(name, false);
                match schema {
                    Some(s) => format!("{}.{}", self.dialect.format_identifier(s, false), quoted_name),
                    None => quoted_name,
                }
            }
            WorkspacePath { path } => path
                .iter()
                .map(|p| self.dialect.format_identifier(p, false))
                .collect::<Vec<_>>()
                .join("/"),
            Alias { expression, alias } => {
                format!("{} {} {}", self.emit(expression), self.kw("AS"), self.dialect.format_identifier(alias, false))
            }
            Add(l, r) => self.bin(l, r, "+", 5),
            Sub(l, r) => self.bin(l, r, "-", 5),
            Mul(l, r) => self.bin(l, r, "*", 6),
            Div(l, r) => self.bin(l, r, "/", 6),
            Mod(l, r) => self.bin(l, r, "%", 6),
            Eq(l, r) => self.bin(l, r, "=", 4),
            Neq(l, r) => self.bin(l, r, "<>", 4),
            Gt(l, r) => self.bin(l, r, ">", 4),
            Lt(l, r) => self.bin(l, r, "<", 4),
            Gte(l, r) => self.bin(l, r, ">=", 4),
            Lte(l, r) => self.bin(l, r, "<=", 4),
            Is(l, r) => self.bin(l, r, &self.kw("IS"), 4),
            In { expression, list } => format!(
                "{} {} ({})",
                self.emit_prec(expression, 4),
                self.kw("IN"),
                list.iter().map(|x| self.emit(x)).collect::<Vec<_>>().join(", ")
            ),
            Between { expression, low, high } => format!(
                "{} {} {} {} {}",
                self.emit_prec(expression, 4),
                self.kw("BETWEEN"),
                self.emit_prec(low, 5),
                self.kw("AND"),
                self.emit_prec(high, 5)
            ),
            Like { expression, pattern } => {
                format!("{} {} {}", self.emit_prec(expression, 4), self.kw("LIKE"), self.emit_prec(pattern, 4))
            }
            And(l, r) => self.bin(l, r, &self.kw("AND"), 2),
            Or(l, r) => self.bin(l, r, &self.kw("OR"), 1),
            Not(inner) | Not2(inner) => format!("{} {}", self.kw("NOT"), self.emit_prec(inner, 3)),
            Paren(inner) => format!("({})", self.emit(inner)),
            Neg(inner) => format!("-{}", self.emit_prec(inner, 7)),
            Pos(inner) => format!("+{}", self.emit_prec(inner, 7)),
            Function { name, args } => {
                if name.eq_ignore_ascii_case("COUNT") && matches!(args.as_slice(), [Expression::Star]) {
                    format!("{}(*)", self.kw(name))
                } else {
                    format!(
                        "{}({})",
                        self.kw(name),
                        args.iter().map(|a| self.emit(a)).collect::<Vec<_>>().join(", ")
                    )
                }
            }
            Cast { expression, data_type } => {
                format!("{}({} {} {})", self.kw("CAST"), self.emit(expression), self.kw("AS"), data_type)
            }
            From(table) => format!("{} {}", self.kw("FROM"), self.emit(table)),
            Where(cond) => format!("{} {}", self.kw("WHERE"), self.emit(cond)),
            GroupBy(items) => format!(
                "{} {} {}",
                self.kw("GROUP"),
                self.kw("BY"),
                items.iter().map(|i| self.emit(i)).collect::<Vec<_>>().join(", ")
            ),
            Having(cond) => format!("{} {}", self.kw("HAVING"), self.emit(cond)),
            OrderItem { expression, direction } => {
                let dir = match direction {
                    OrderDirection::Asc => self.kw("ASC"),
                    OrderDirection::Desc => self.kw("DESC"),
                };
                format!("{} {}", self.emit(expression), dir)
            }
            Limit(value) => format!("{} {}", self.kw("LIMIT"), self.emit(value)),
            Offset(value) => format!("{} {}", self.kw("OFFSET"), self.emit(value)),
            Join { kind, table, on, using } => {
                let kw = match kind {
                    JoinType::Inner => "INNER JOIN",
                    JoinType::Left => "LEFT JOIN",
                    JoinType::Right => "RIGHT JOIN",
                    JoinType::Full => "FULL JOIN",
                    JoinType::Cross => "CROSS JOIN",
                };
                let mut s = format!("{} {}", self.kw(kw), self.emit(table));
                if let Some(on) = on {
                    s.push_str(&format!(" {} {}", self.kw("ON"), self.emit(on)));
                } else if !using.is_empty() {
                    let cols = using
                        .iter()
                        .map(|u| self.dialect.format_identifier(u, false))
                        .collect::<Vec<_>>()
                        .join(", ");
                    s.push_str(&format!(" {} ({})", self.kw("USING"), cols));
                }
                s
            }
            Select { .. } => self.emit_select(e),
            Insert { table, columns, values } => {
                let cols = if columns.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", columns.iter().map(|c| self.emit(c)).collect::<Vec<_>>().join(", "))
                };
                let rows = values
                    .iter()
                    .map(|row| format!("({})", row.iter().map(|v| self.emit(v)).collect::<Vec<_>>().join(", ")))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} {} {}{} {} {}", self.kw("INSERT"), self.kw("INTO"), self.emit(table), cols, self.kw("VALUES"), rows)
            }
            Update { table, assignments, where_ } => {
                let sets = assignments
                    .iter()
                    .map(|a| format!("{} = {}", self.emit(&a.column), self.emit(&a.value)))
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut s = format!("{} {} {} {}", self.kw("UPDATE"), self.emit(table), self.kw("SET"), sets);
                if let Some(w) = where_ {
                    s.push_str(&format!(" {}", self.emit(w)));
                }
                s
            }
            Delete { table, where_ } => {
                let mut s = format!("{} {} {}", self.kw("DELETE"), self.kw("FROM"), self.emit(table));
                if let Some(w) = where_ {
                    s.push_str(&format!(" {}", self.emit(w)));
                }
                s
            }
            Create { kind, name, columns, select } => {
                let mut s = format!("{} {} {}", self.kw("CREATE"), self.kw(kind), self.emit(name));
                if !columns.is_empty() {
                    s.push_str(&format!(" ({})", columns.iter().map(|c| self.emit(c)).collect::<Vec<_>>().join(", ")));
                }
                if let Some(sel) = select {
                    s.push_str(&format!(" {} {}", self.kw("AS"), self.emit(sel)));
                }
                s
            }
            Drop { kind, name } => format!("{} {} {}", self.kw("DROP"), self.kw(kind), self.emit(name)),
            Alter { name, action } => format!("{} {} {} {}", self.kw("ALTER"), self.kw("TABLE"), self.emit(name), action),
            Subquery { select } => format!("({})", self.emit(select)),
            Cte(cte) => self.emit_cte(cte),
            With { ctes, select } => {
                let cte_list = ctes.iter().map(|c| self.emit_cte(c)).collect::<Vec<_>>().join(", ");
                format!("{} {} {}", self.kw("WITH"), cte_list, self.emit(select))
            }
            Case { whens, else_expr } => {
                let mut s = self.kw("CASE");
                for w in whens {
                    s.push_str(&format!(" {} {} {} {}", self.kw("WHEN"), self.emit(&w.condition), self.kw("THEN"), self.emit(&w.result)));
                }
                if let Some(else_expr) = else_expr {
                    s.push_str(&format!(" {} {}", self.kw("ELSE"), self.emit(else_expr)));
                }
                s.push_str(&format!(" {}", self.kw("END")));
                s
            }
            ColumnDef { name, data_type } => format!("{} {}", self.dialect.format_identifier(name, false), data_type),
        }
    }

    fn emit_cte(&self, cte: &CteDef) -> String {
        format!("{} {} ({})", self.dialect.format_identifier(&cte.name, false), self.kw("AS"), self.emit(&cte.select))
    }

    fn emit_select(&self, e: &Expression) -> String {
        let Expression::Select {
            expressions,
            distinct,
            from,
            joins,
            where_,
            group_by,
            having,
            order_by,
            limit,
            offset,
        } = e
        else {
            unreachable!("emit_select is only called with a Select node")
        };

        let sep = if self.config.pretty {
            format!("\n{}", " ".repeat(self.config.indent_width))
        } else {
            " ".to_string()
        };

        let mut parts = Vec::new();
        let select_kw = if *distinct {
            format!("{} {}", self.kw("SELECT"), self.kw("DISTINCT"))
        } else {
            self.kw("SELECT")
        };
        parts.push(format!(
            "{} {}",
            select_kw,
            expressions.iter().map(|x| self.emit(x)).collect::<Vec<_>>().join(", ")
        ));
        if let Some(f) = from {
            parts.push(format!("{} {}", self.kw("FROM"), self.emit(f)));
        }
        for j in joins {
            parts.push(self.emit(j));
        }
        if let Some(w) = where_ {
            parts.push(self.emit(w));
        }
        if let Some(g) = group_by {
            parts.push(self.emit(g));
        }
        if let Some(h) = having {
            parts.push(self.emit(h));
        }
        if !order_by.is_empty() {
            parts.push(format!(
                "{} {} {}",
                self.kw("ORDER"),
                self.kw("BY"),
                order_by.iter().map(|o| self.emit(o)).collect::<Vec<_>>().join(", ")
            ));
        }
        if let Some(l) = limit {
            parts.push(self.emit(l));
        }
        if let Some(o) = offset {
            parts.push(self.emit(o));
        }
        parts.join(&sep)
    }
}

/// Binding strength, lowest to highest, mirroring the parser's precedence
/// climb (spec §4.2) so the generator reinserts exactly the parentheses
/// the original grouping needs and no more.
fn precedence(e: &Expression) -> u8 {
    use Expression::*;
    match e {
        Or(..) => 1,
        And(..) => 2,
        Not(..) | Not2(..) => 3,
        Eq(..) | Neq(..) | Gt(..) | Lt(..) | Gte(..) | Lte(..) | Is(..) | In { .. } | Between { .. } | Like { .. } => 4,
        Add(..) | Sub(..) => 5,
        Mul(..) | Div(..) | Mod(..) => 6,
        Neg(..) | Pos(..) => 7,
        _ => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::get_dialect;

    #[test]
    fn precedence_adds_parens_around_lower_precedence_child() {
        let dialect = get_dialect("ANSI").unwrap();
        let generator = dialect.create_generator(GeneratorConfig::default());
        // (a + b) * c: Add as the left child of Mul needs parens.
        let expr = Expression::Mul(
            Box::new(Expression::Add(
                Box::new(Expression::identifier("a")),
                Box::new(Expression::identifier("b")),
            )),
            Box::new(Expression::identifier("c")),
        );
        assert_eq!(generator.generate(&expr), "(a + b) * c");
    }

    #[test]
    fn no_parens_needed_when_precedence_already_binds_tighter() {
        let dialect = get_dialect("ANSI").unwrap();
        let generator = dialect.create_generator(GeneratorConfig::default());
        // a + b * c: Mul as a child of Add does not need parens.
        let expr = Expression::Add(
            Box::new(Expression::identifier("a")),
            Box::new(Expression::Mul(
                Box::new(Expression::identifier("b")),
                Box::new(Expression::identifier("c")),
            )),
        );
        assert_eq!(generator.generate(&expr), "a + b * c");
    }

    #[test]
    fn count_star_has_no_space() {
        let dialect = get_dialect("ANSI").unwrap();
        let generator = dialect.create_generator(GeneratorConfig::default());
        let expr = Expression::Function {
            name: "COUNT".to_string(),
            args: vec![Expression::Star],
        };
        assert_eq!(generator.generate(&expr), "COUNT(*)");
    }

    #[test]
    fn quoted_identifier_uses_dialect_quote_style() {
        let dialect = get_dialect("MYSQL").unwrap();
        let generator = dialect.create_generator(GeneratorConfig::default());
        let expr = Expression::Identifier { name: "select".to_string(), quoted: true };
        assert_eq!(generator.generate(&expr), "`select`");
    }
}
