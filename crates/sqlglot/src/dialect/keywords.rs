//! The shared keyword table every built-in dialect tokenizes against.
//!
//! The grammar this workspace parses (spec §4.2) is a fixed ANSI-ish core;
//! dialects diverge in identifier-quoting style and normalization, not in
//! which clause keywords exist. A from-scratch per-dialect keyword set
//! (the spec's "reproduce the per-dialect sets exactly") is out of reach at
//! this scope — see `DESIGN.md` for the tradeoff.

use sqlglot_ast::TokenType;
use sqlglot_parser::Trie;

pub fn build() -> Trie<TokenType> {
    Trie::build(
        [
            ("SELECT", TokenType::Select),
            ("FROM", TokenType::From),
            ("WHERE", TokenType::Where),
            ("GROUP", TokenType::Group),
            ("BY", TokenType::By),
            ("HAVING", TokenType::Having),
            ("ORDER", TokenType::Order),
            ("LIMIT", TokenType::Limit),
            ("OFFSET", TokenType::Offset),
            ("DISTINCT", TokenType::Distinct),
            ("AS", TokenType::As),
            ("ON", TokenType::On),
            ("USING", TokenType::Using),
            ("JOIN", TokenType::Join),
            ("INNER", TokenType::Inner),
            ("LEFT", TokenType::Left),
            ("RIGHT", TokenType::Right),
            ("FULL", TokenType::Full),
            ("CROSS", TokenType::Cross),
            ("ASC", TokenType::Asc),
            ("DESC", TokenType::Desc),
            ("WITH", TokenType::With),
            ("INSERT", TokenType::Insert),
            ("INTO", TokenType::Into),
            ("VALUES", TokenType::Values),
            ("UPDATE", TokenType::Update),
            ("SET", TokenType::Set),
            ("DELETE", TokenType::Delete),
            ("CREATE", TokenType::Create),
            ("TABLE", TokenType::Table),
            ("VIEW", TokenType::View),
            ("DROP", TokenType::Drop),
            ("ALTER", TokenType::Alter),
            ("ADD", TokenType::Add),
            ("COLUMN", TokenType::Column),
            ("AND", TokenType::And),
            ("OR", TokenType::Or),
            ("NOT", TokenType::Not),
            ("IS", TokenType::Is),
            ("NULL", TokenType::Null),
            ("TRUE", TokenType::True),
            ("FALSE", TokenType::False),
            ("IN", TokenType::In),
            ("BETWEEN", TokenType::Between),
            ("LIKE", TokenType::Like),
            ("CASE", TokenType::Case),
            ("WHEN", TokenType::When),
            ("THEN", TokenType::Then),
            ("ELSE", TokenType::Else),
            ("END", TokenType::End),
            ("CAST", TokenType::Cast),
        ]
        .map(|(k, v)| (k.to_string(), v)),
    )
}
