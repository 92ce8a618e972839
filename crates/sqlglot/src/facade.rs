//! Top-level entry points (spec §4.8): `parse`, `parseOne`, `generate`,
//! `format`, `transpile`, `optimize`, plus dialect lookup/registration.

use std::fmt;

use sqlglot_ast::{Expression, LexError, ParseError};
use sqlglot_parser::ParserConfig;

use crate::dialect::get_dialect;
use crate::error::ConfigError;
use crate::generator::GeneratorConfig;
use crate::optimizer::{self, OptimizerConfig};

/// The façade's unified error type — the individual stage errors (spec
/// §7) widened to one type so callers of `parse`/`generate`/`transpile`
/// don't have to match on which stage failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FacadeError {
    Config(ConfigError),
    Lex(LexError),
    Parse(ParseError),
}

impl fmt::Display for FacadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacadeError::Config(e) => write!(f, "{e}"),
            FacadeError::Lex(e) => write!(f, "{e}"),
            FacadeError::Parse(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FacadeError {}

impl From<ConfigError> for FacadeError {
    fn from(e: ConfigError) -> Self {
        FacadeError::Config(e)
    }
}

impl From<LexError> for FacadeError {
    fn from(e: LexError) -> Self {
        FacadeError::Lex(e)
    }
}

impl From<ParseError> for FacadeError {
    fn from(e: ParseError) -> Self {
        FacadeError::Parse(e)
    }
}

/// `parse(sql, dialectName)` (spec §4.8): every `;`-separated statement in
/// `sql`. The parser surfaces the first error, per §7's propagation policy.
pub fn parse(sql: &str, dialect_name: &str) -> Result<Vec<Expression>, FacadeError> {
    let dialect = get_dialect(dialect_name)?;
    let tokens = dialect.create_tokenizer().tokenize(sql)?;
    let mut parser = dialect.create_parser(tokens, ParserConfig::default());
    Ok(parser.parse()?)
}

/// `parseOne(sql, dialectName)` (spec §4.8): `None` on empty input or a
/// fatal parse error, matching §7's recovery policy at this layer.
pub fn parse_one(sql: &str, dialect_name: &str) -> Option<Expression> {
    let dialect = get_dialect(dialect_name).ok()?;
    let tokens = dialect.create_tokenizer().tokenize(sql).ok()?;
    let mut parser = dialect.create_parser(tokens, ParserConfig::default());
    parser.parse_one()
}

/// `generate(ast, dialectName, cfg)` (spec §4.8).
pub fn generate(expr: &Expression, dialect_name: &str, config: GeneratorConfig) -> Result<String, FacadeError> {
    let dialect = get_dialect(dialect_name)?;
    Ok(dialect.create_generator(config).generate(expr))
}

/// `optimize(ast, dialectName, cfg)` (spec §4.8).
pub fn optimize(expr: Expression, dialect_name: &str, config: &OptimizerConfig) -> Result<Expression, FacadeError> {
    let dialect = get_dialect(dialect_name)?;
    Ok(optimizer::optimize(expr, &dialect, config))
}

/// `format(sql, dialect)` (spec §4.8): parse → generate with a
/// pretty-printing config. Returns `""` on unparseable input, same as
/// `transpile`.
pub fn format(sql: &str, dialect_name: &str) -> String {
    let Some(expr) = parse_one(sql, dialect_name) else { return String::new() };
    let Ok(dialect) = get_dialect(dialect_name) else { return String::new() };
    let config = GeneratorConfig { pretty: true, ..GeneratorConfig::default() };
    dialect.create_generator(config).generate(&expr)
}

/// `transpile(sql, fromDialect, toDialect)` (spec §4.8): chains
/// `parseOne(from) → generate(to)`, returning `""` if parsing yielded
/// nothing.
pub fn transpile(sql: &str, from_dialect: &str, to_dialect: &str) -> String {
    let Some(expr) = parse_one(sql, from_dialect) else { return String::new() };
    let Ok(dialect) = get_dialect(to_dialect) else { return String::new() };
    dialect.create_generator(GeneratorConfig::default()).generate(&expr)
}

/// Extension methods on [`Expression`] that need a [`crate::dialect::Dialect`]
/// or [`crate::generator::Generator`] — both live in this crate, one level
/// above `sqlglot-ast`, so they can't be inherent methods there
/// (SPEC_FULL §3 supplement).
pub trait ExpressionExt {
    fn to_sql(&self, dialect_name: &str) -> Result<String, FacadeError>;
    fn deep_clone(&self) -> Expression;
}

impl ExpressionExt for Expression {
    fn to_sql(&self, dialect_name: &str) -> Result<String, FacadeError> {
        generate(self, dialect_name, GeneratorConfig::default())
    }

    /// Structural deep copy — `Expression` is already fully owned/boxed so
    /// `clone()` already walks the whole tree; this just names that
    /// operation for callers expecting a `deepClone` in the original's
    /// style.
    fn deep_clone(&self) -> Expression {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_a_from_t_round_trips_through_generate() {
        let expr = parse_one("SELECT a FROM t", "ANSI").expect("should parse");
        let sql = generate(&expr, "ANSI", GeneratorConfig::default()).unwrap();
        let select_pos = sql.find("SELECT").unwrap();
        let a_pos = sql.find('a').unwrap();
        let from_pos = sql.find("FROM").unwrap();
        let t_pos = sql.rfind('t').unwrap();
        assert!(select_pos < a_pos && a_pos < from_pos && from_pos < t_pos);
    }

    #[test]
    fn canonicalize_flips_literal_lt_column() {
        let expr = parse_one("SELECT * FROM t WHERE 5 < x", "ANSI").unwrap();
        let mut config = OptimizerConfig::minimal();
        config.canonicalize = true;
        let optimized = optimize(expr, "ANSI", &config).unwrap();
        let sql = generate(&optimized, "ANSI", GeneratorConfig::default()).unwrap();
        assert!(sql.contains('>'));
        assert!(!sql.contains("5 < x"));
    }

    #[test]
    fn simplify_removes_true_and() {
        let expr = parse_one("SELECT * FROM t WHERE TRUE AND x = 5", "ANSI").unwrap();
        let optimized = optimize(expr, "ANSI", &OptimizerConfig::minimal()).unwrap();
        let sql = generate(&optimized, "ANSI", GeneratorConfig::default()).unwrap();
        assert!(!sql.contains("TRUE AND"));
    }

    #[test]
    fn eliminate_ctes_removes_unused_with() {
        let expr = parse_one("WITH unused AS (SELECT 1) SELECT * FROM t", "ANSI").unwrap();
        let mut config = OptimizerConfig::minimal();
        config.eliminate_ctes = true;
        let optimized = optimize(expr, "ANSI", &config).unwrap();
        let sql = generate(&optimized, "ANSI", GeneratorConfig::default()).unwrap();
        assert!(!sql.to_ascii_uppercase().contains("WITH"));
    }

    #[test]
    fn normalize_predicates_dedupes_identical_conjuncts() {
        let expr = parse_one("SELECT * FROM t WHERE x = 5 AND x = 5", "ANSI").unwrap();
        let mut config = OptimizerConfig::minimal();
        config.normalize_predicates = true;
        let optimized = optimize(expr, "ANSI", &config).unwrap();
        let sql = generate(&optimized, "ANSI", GeneratorConfig::default()).unwrap();
        assert_eq!(sql.matches("x = 5").count(), 1);
    }

    #[test]
    fn transpile_round_trips_a_simple_select() {
        let sql = transpile("SELECT a FROM t", "ANSI", "ANSI");
        assert!(sql.contains("SELECT"));
        assert!(sql.contains("FROM"));
    }

    #[test]
    fn transpile_returns_empty_string_on_unparseable_input() {
        assert_eq!(transpile("not valid sql at all (((", "ANSI", "ANSI"), "");
    }

    #[test]
    fn to_sql_extension_method_generates() {
        let expr = Expression::Star;
        assert_eq!(expr.to_sql("ANSI").unwrap(), "*");
    }
}
