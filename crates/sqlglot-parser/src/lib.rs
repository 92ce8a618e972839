//! A recursive-descent, Pratt-precedence SQL parser over a pre-tokenized
//! stream, plus the dialect-parameterized [`Tokenizer`] that produces that
//! stream (spec §4.1–§4.2).
//!
//! This crate knows nothing about dialects beyond the
//! [`TokenizerSettings`] it is handed — the dialect registry and plugin
//! contract live in the `sqlglot` crate, one level up.

pub mod parser;
pub mod tokenizer;
pub mod trie;

pub use parser::{Parser, ParserConfig};
pub use tokenizer::{QuotePair, Tokenizer, TokenizerSettings};
pub use trie::Trie;
