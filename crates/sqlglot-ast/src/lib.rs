//! Token and AST value types shared by the sqlglot-rs tokenizer, parser,
//! optimizer and generator.
//!
//! This crate has no opinion about dialects, optimization or code
//! generation — it only defines the data that flows between those stages:
//! [`Token`] (the output of tokenization) and [`Expression`] (the output of
//! parsing, and the input/output of every optimizer rule).

pub mod error;
pub mod expr;
pub mod token;

pub use error::{LexError, LexErrorKind, ParseError, ParseErrorKind};
pub use expr::{Expression, JoinType, OrderDirection};
pub use token::{Token, TokenType};
