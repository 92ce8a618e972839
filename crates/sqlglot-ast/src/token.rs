//! The [`Token`] value type and its [`TokenType`] tag.

use serde::{Deserialize, Serialize};

/// The closed enumeration of lexical unit kinds.
///
/// Variants are grouped by the subset predicates the tokenizer and parser
/// need ([`TokenType::is_keyword`], [`TokenType::is_operator`],
/// [`TokenType::is_punctuation`]); literals and the `Eof` sentinel sit
/// outside all three groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum TokenType {
    // Literals
    Number,
    String,
    Identifier,

    // Keywords — DML / query shape
    Select,
    From,
    Where,
    Group,
    By,
    Having,
    Order,
    Limit,
    Offset,
    Distinct,
    As,
    On,
    Using,
    Join,
    Inner,
    Left,
    Right,
    Full,
    Cross,
    Asc,
    Desc,
    With,
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    Create,
    Table,
    View,
    Drop,
    Alter,
    Add,
    Column,

    // Keywords — expressions
    And,
    Or,
    Not,
    Is,
    Null,
    True,
    False,
    In,
    Between,
    Like,
    Case,
    When,
    Then,
    Else,
    End,
    Cast,

    // Operators
    Eq,
    Neq,
    Gt,
    Lt,
    Gte,
    Lte,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,

    // Punctuation
    LParen,
    RParen,
    Comma,
    Dot,
    Semicolon,

    /// Sentinel that always terminates a token stream, exactly once.
    Eof,
}

impl TokenType {
    pub fn is_keyword(self) -> bool {
        use TokenType::*;
        matches!(
            self,
            Select
                | From
                | Where
                | Group
                | By
                | Having
                | Order
                | Limit
                | Offset
                | Distinct
                | As
                | On
                | Using
                | Join
                | Inner
                | Left
                | Right
                | Full
                | Cross
                | Asc
                | Desc
                | With
                | Insert
                | Into
                | Values
                | Update
                | Set
                | Delete
                | Create
                | Table
                | View
                | Drop
                | Alter
                | Add
                | Column
                | And
                | Or
                | Not
                | Is
                | Null
                | True
                | False
                | In
                | Between
                | Like
                | Case
                | When
                | Then
                | Else
                | End
                | Cast
        )
    }

    pub fn is_operator(self) -> bool {
        use TokenType::*;
        matches!(
            self,
            Eq | Neq | Gt | Lt | Gte | Lte | Plus | Minus | Star | Slash | Percent | Bang
        )
    }

    pub fn is_punctuation(self) -> bool {
        use TokenType::*;
        matches!(self, LParen | RParen | Comma | Dot | Semicolon)
    }

    pub fn is_literal(self) -> bool {
        use TokenType::*;
        matches!(self, Number | String | Identifier)
    }
}

/// An immutable lexical unit: `(type, text, line, col, start, end, comments)`.
///
/// `text` is the raw lexeme, except for string literals, where it is the
/// *unquoted* contents (delimiters stripped, escapes resolved). `comments`
/// holds, in order, every comment lexically attached to this token — by
/// convention, a leading comment attaches to the token that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub token_type: TokenType,
    pub text: String,
    pub line: usize,
    pub col: usize,
    pub start: usize,
    pub end: usize,
    pub comments: Vec<String>,
    /// True for an `IDENTIFIER` produced by consuming a dialect quote pair
    /// (`"..."`, `` `...` ``, `[...]`), rather than a bare word. Irrelevant
    /// for every other token type.
    pub quoted: bool,
}

impl Token {
    pub fn new(token_type: TokenType, text: impl Into<String>, line: usize, col: usize, start: usize, end: usize) -> Self {
        debug_assert!(line >= 1);
        debug_assert!(col >= 1);
        debug_assert!(end >= start);
        Token {
            token_type,
            text: text.into(),
            line,
            col,
            start,
            end,
            comments: Vec::new(),
            quoted: false,
        }
    }

    pub fn eof(line: usize, col: usize, pos: usize) -> Self {
        Token::new(TokenType::Eof, "", line, col, pos, pos)
    }

    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_quoted(mut self, quoted: bool) -> Self {
        self.quoted = quoted;
        self
    }
}
