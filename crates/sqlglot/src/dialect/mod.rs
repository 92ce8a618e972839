//! Dialect registry and plugin contract (spec §4.7).
//!
//! A [`Dialect`] is a value, not a class: it holds a tokenizer
//! configuration, an identifier-quoting style, and a normalization
//! strategy, rather than subclassing a tokenizer/generator base (the
//! re-architecture called for in spec §9, "class-based dialect inheritance
//! → composition, not inheritance"). The registry is a process-wide
//! `RwLock<HashMap>`, populated with the 31 built-ins at first use and open
//! to late registration — readers never block each other, writers
//! serialize against both (spec §5's "two-phase lifecycle... late
//! registration must be serialized against lookups").

mod keywords;

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlglot_parser::{QuotePair, Tokenizer, TokenizerSettings};
use strum::IntoEnumIterator;

use crate::error::ConfigError;
use crate::generator::{Generator, GeneratorConfig};

/// How a dialect folds unquoted identifiers for comparison purposes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, strum::Display,
)]
pub enum NormalizationStrategy {
    Uppercase,
    Lowercase,
    CaseSensitive,
}

/// The bracket pair a dialect uses to quote identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, strum::Display)]
pub enum QuoteStyle {
    DoubleQuote,
    Backtick,
    Bracket,
}

impl QuoteStyle {
    fn pair(self) -> QuotePair {
        match self {
            QuoteStyle::DoubleQuote => QuotePair::symmetric('"'),
            QuoteStyle::Backtick => QuotePair::symmetric('`'),
            QuoteStyle::Bracket => QuotePair { open: '[', close: ']' },
        }
    }
}

/// The 31 built-in dialect names (spec §6), case-insensitively matched.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum DialectName {
    Ansi,
    Mysql,
    Postgres,
    Bigquery,
    Snowflake,
    Sqlite,
    Mssql,
    Oracle,
    Duckdb,
    Spark,
    Clickhouse,
    Redshift,
    Presto,
    Hive,
    Mariadb,
    Athena,
    Databricks,
    Trino,
    Starrocks,
    Iceberg,
    Cockroachdb,
    Aurora,
    Impala,
    Teradata,
    Vertica,
    Yellowbrick,
    Firebolt,
    Exasol,
    Pandas,
    Wasm,
    Glue,
    Drill,
}

/// A named SQL variant: its keywords, quoting style and generation
/// conventions (spec §4.7). Immutable once constructed.
pub struct Dialect {
    name: DialectName,
    normalization: NormalizationStrategy,
    quote_style: QuoteStyle,
    tokenizer_settings: TokenizerSettings,
}

impl Dialect {
    pub fn name(&self) -> DialectName {
        self.name
    }

    pub fn normalization(&self) -> NormalizationStrategy {
        self.normalization
    }

    pub fn quote_style(&self) -> QuoteStyle {
        self.quote_style
    }

    pub fn tokenizer_settings(&self) -> &TokenizerSettings {
        &self.tokenizer_settings
    }

    /// `createTokenizer()` (spec §4.7): a fresh tokenizer bound to this
    /// dialect's quoting and keyword configuration.
    pub fn create_tokenizer(&self) -> Tokenizer<'_> {
        Tokenizer::new(&self.tokenizer_settings)
    }

    /// `createParser()` (spec §4.7).
    pub fn create_parser(
        &self,
        tokens: Vec<sqlglot_ast::Token>,
        config: sqlglot_parser::ParserConfig,
    ) -> sqlglot_parser::Parser {
        sqlglot_parser::Parser::new(tokens, config)
    }

    /// `createGenerator(config)` (spec §4.7).
    pub fn create_generator(&self, config: GeneratorConfig) -> Generator<'_> {
        Generator::new(self, config)
    }

    /// Whether `name` is one of this dialect's reserved words, used by the
    /// `QuoteIdentifiers` optimizer rule to decide whether an unquoted name
    /// needs quoting.
    pub fn is_reserved_keyword(&self, name: &str) -> bool {
        self.tokenizer_settings.keywords.lookup(name).is_some()
    }

    /// Wraps `name` in this dialect's quote pair when `quoted` is set,
    /// doubling any embedded close character. Unquoted names pass through
    /// verbatim — the default the spec calls "unquoted when the lexical
    /// form is safe".
    pub fn format_identifier(&self, name: &str, quoted: bool) -> String {
        if !quoted {
            return name.to_string();
        }
        let pair = self.quote_style.pair();
        let doubled = name.replace(pair.close, &format!("{0}{0}", pair.close));
        format!("{}{}{}", pair.open, doubled, pair.close)
    }

    /// Case-folds `name` per this dialect's [`NormalizationStrategy`]
    /// (SPEC_FULL §3 supplement, grounded on the original's per-dialect
    /// identifier normalization helper).
    pub fn normalize_identifier(&self, name: &str) -> String {
        match self.normalization {
            NormalizationStrategy::Uppercase => name.to_ascii_uppercase(),
            NormalizationStrategy::Lowercase => name.to_ascii_lowercase(),
            NormalizationStrategy::CaseSensitive => name.to_string(),
        }
    }

    fn built_in(name: DialectName) -> Dialect {
        let (normalization, quote_style, identifier_quotes) = profile(name);
        let tokenizer_settings = TokenizerSettings {
            string_quotes: vec![QuotePair::symmetric('\'')],
            identifier_quotes,
            line_comment_prefixes: vec!["--"],
            keywords: keywords::build(),
        };
        Dialect {
            name,
            normalization,
            quote_style,
            tokenizer_settings,
        }
    }
}

impl Clone for Dialect {
    fn clone(&self) -> Self {
        Dialect {
            name: self.name,
            normalization: self.normalization,
            quote_style: self.quote_style,
            tokenizer_settings: self.tokenizer_settings.clone(),
        }
    }
}

/// Normalization strategy, canonical quote style, and the accepted
/// identifier-quote pairs (SQLite is deliberately permissive — spec §6
/// lists it among the 31 but real implementations accept more than one
/// quote style there) for each built-in.
fn profile(name: DialectName) -> (NormalizationStrategy, QuoteStyle, Vec<QuotePair>) {
    use DialectName::*;
    use NormalizationStrategy::*;
    use QuoteStyle::*;

    match name {
        Ansi | Oracle | Snowflake | Teradata | Exasol | Vertica | Firebolt | Yellowbrick => {
            (Uppercase, DoubleQuote, vec![QuotePair::symmetric('"')])
        }
        Mssql => (CaseSensitive, Bracket, vec![QuotePair { open: '[', close: ']' }]),
        Mysql | Mariadb | Spark | Hive | Databricks | Drill => {
            (Lowercase, Backtick, vec![QuotePair::symmetric('`')])
        }
        Bigquery | Clickhouse | Presto | Trino | Iceberg | Athena | Pandas | Wasm => {
            (CaseSensitive, DoubleQuote, vec![QuotePair::symmetric('"')])
        }
        Sqlite => (
            Lowercase,
            DoubleQuote,
            vec![
                QuotePair::symmetric('"'),
                QuotePair::symmetric('`'),
                QuotePair { open: '[', close: ']' },
            ],
        ),
        Postgres | Duckdb | Redshift | Cockroachdb | Aurora | Impala | Glue | Starrocks => {
            (Lowercase, DoubleQuote, vec![QuotePair::symmetric('"')])
        }
    }
}

static REGISTRY: OnceLock<RwLock<HashMap<String, Arc<Dialect>>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, Arc<Dialect>>> {
    REGISTRY.get_or_init(|| {
        let mut map = HashMap::new();
        for name in DialectName::iter() {
            map.insert(name.to_string().to_ascii_uppercase(), Arc::new(Dialect::built_in(name)));
        }
        RwLock::new(map)
    })
}

/// `getDialect(name)` (spec §4.7/§4.8): case-insensitive lookup against
/// the process-wide registry.
pub fn get_dialect(name: &str) -> Result<Arc<Dialect>, ConfigError> {
    registry()
        .read()
        .expect("dialect registry lock poisoned")
        .get(&name.to_ascii_uppercase())
        .cloned()
        .ok_or_else(|| ConfigError::UnknownDialect(name.to_string()))
}

/// `registerDialect(name, dialect)` (spec §4.7): late registration,
/// serialized against concurrent lookups by the same lock.
pub fn register_dialect(name: impl Into<String>, dialect: Dialect) {
    let name = name.into();
    log::debug!(target: "sqlglot::dialect", "registering dialect {name}");
    registry()
        .write()
        .expect("dialect registry lock poisoned")
        .insert(name.to_ascii_uppercase(), Arc::new(dialect));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(get_dialect("mysql").unwrap().name(), DialectName::Mysql);
        assert_eq!(get_dialect("MySQL").unwrap().name(), DialectName::Mysql);
    }

    #[test]
    fn unknown_dialect_is_a_config_error() {
        let err = get_dialect("not-a-real-dialect").unwrap_err();
        assert_eq!(err, ConfigError::UnknownDialect("not-a-real-dialect".to_string()));
    }

    #[test]
    fn all_31_built_ins_are_registered() {
        for name in DialectName::iter() {
            assert!(get_dialect(name.as_ref()).is_ok(), "{name} missing from registry");
        }
    }

    #[test]
    fn mssql_formats_identifiers_with_brackets() {
        let dialect = get_dialect("MSSQL").unwrap();
        assert_eq!(dialect.format_identifier("my col", true), "[my col]");
    }

    #[test]
    fn custom_dialect_can_be_registered_and_looked_up() {
        let base = get_dialect("ANSI").unwrap();
        register_dialect("MY_DIALECT", (*base).clone());
        assert!(get_dialect("my_dialect").is_ok());
    }
}
