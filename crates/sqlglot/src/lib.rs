//! A dialect-aware SQL transpiler and optimizer.
//!
//! This crate owns everything that needs to know about dialects:
//! the [`dialect`] registry, the [`optimizer`] pipeline and its 11 rules,
//! [`scope`] analysis, the [`generator`], and the [`facade`] functions that
//! tie parsing, optimization and generation together. The tokenizer,
//! parser and AST types are dialect-agnostic and live one crate down, in
//! `sqlglot-ast` and `sqlglot-parser`.

pub mod dialect;
pub mod error;
pub mod facade;
pub mod generator;
pub mod optimizer;
pub mod scope;

pub use dialect::{get_dialect, register_dialect, Dialect, DialectName, NormalizationStrategy, QuoteStyle};
pub use error::ConfigError;
pub use facade::{format, generate, optimize, parse, parse_one, transpile, ExpressionExt, FacadeError};
pub use generator::{Generator, GeneratorConfig};
pub use optimizer::{annotate, DataType, OptimizeContext, OptimizerConfig, TypeInfo, TypeNode};
pub use scope::{Scope, ScopeId, ScopeKind, ScopeTree, Source};

pub use sqlglot_ast::{
    Assignment, CteDef, Expression, JoinType, LexError, LexErrorKind, OrderDirection, ParseError, ParseErrorKind,
    Token, TokenType, WhenClause,
};
pub use sqlglot_parser::{Parser, ParserConfig, QuotePair, Tokenizer, TokenizerSettings, Trie};
