//! Turns source text into a finite, ordered token sequence (spec §4.1).

use sqlglot_ast::{LexError, LexErrorKind, Token, TokenType};

use crate::trie::Trie;

/// A quote delimiter pair. `open == close` for the common `'...'`/`"..."`
/// case; they differ for bracket-style quoting (`[...]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotePair {
    pub open: char,
    pub close: char,
}

impl QuotePair {
    pub const fn symmetric(ch: char) -> Self {
        QuotePair { open: ch, close: ch }
    }
}

/// Everything about tokenization that varies by dialect.
#[derive(Clone)]
pub struct TokenizerSettings {
    pub string_quotes: Vec<QuotePair>,
    pub identifier_quotes: Vec<QuotePair>,
    pub line_comment_prefixes: Vec<&'static str>,
    pub keywords: Trie<TokenType>,
}

/// Dialect-parameterized tokenizer. Stateless between calls to [`tokenize`];
/// one instance is built per `createTokenizer()` call (spec §4.7) and reused
/// across any number of [`Tokenizer::tokenize`] invocations.
pub struct Tokenizer<'a> {
    settings: &'a TokenizerSettings,
}

impl<'a> Tokenizer<'a> {
    pub fn new(settings: &'a TokenizerSettings) -> Self {
        Tokenizer { settings }
    }

    /// `tokenize(source) -> [Token]`. Always terminates in exactly one
    /// `Eof` token; for empty input the output is exactly `[Eof]`.
    ///
    /// Never fails on unknown characters — those degrade to a best-effort
    /// `Identifier` or single-char operator token. Only an unterminated
    /// string or quoted identifier raises a [`LexError`].
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, LexError> {
        let chars: Vec<char> = source.chars().collect();
        let mut cursor = Cursor::new(&chars);
        let mut tokens = Vec::new();
        let mut pending_comments: Vec<String> = Vec::new();

        while !cursor.at_end() {
            if cursor.skip_whitespace() {
                continue;
            }
            if let Some(comment) = self.try_consume_comment(&mut cursor) {
                pending_comments.push(comment);
                continue;
            }

            let (line, col, start) = cursor.position();

            if let Some(tok) = self.try_consume_string(&mut cursor, line, col, start)? {
                tokens.push(tok.with_comments(std::mem::take(&mut pending_comments)));
                continue;
            }
            if let Some(tok) = self.try_consume_quoted_identifier(&mut cursor, line, col, start)? {
                tokens.push(tok.with_comments(std::mem::take(&mut pending_comments)));
                continue;
            }
            if let Some(tok) = self.try_consume_number(&mut cursor, line, col, start) {
                tokens.push(tok.with_comments(std::mem::take(&mut pending_comments)));
                continue;
            }
            if let Some(tok) = self.try_consume_word(&mut cursor, line, col, start) {
                tokens.push(tok.with_comments(std::mem::take(&mut pending_comments)));
                continue;
            }
            let tok = self.consume_operator_or_punctuation(&mut cursor, line, col, start);
            tokens.push(tok.with_comments(std::mem::take(&mut pending_comments)));
        }

        let (line, col, pos) = cursor.position();
        tokens.push(Token::eof(line, col, pos).with_comments(pending_comments));
        Ok(tokens)
    }

    fn try_consume_comment(&self, cursor: &mut Cursor) -> Option<String> {
        if cursor.starts_with("/*") {
            cursor.advance_n(2);
            let mut text = String::new();
            while !cursor.at_end() && !cursor.starts_with("*/") {
                text.push(cursor.advance().unwrap());
            }
            cursor.advance_n(2);
            return Some(text.trim().to_string());
        }
        for prefix in &self.settings.line_comment_prefixes {
            if cursor.starts_with(prefix) {
                cursor.advance_n(prefix.chars().count());
                let mut text = String::new();
                while let Some(ch) = cursor.peek() {
                    if ch == '\n' {
                        break;
                    }
                    text.push(ch);
                    cursor.advance();
                }
                return Some(text.trim().to_string());
            }
        }
        None
    }

    fn try_consume_string(
        &self,
        cursor: &mut Cursor,
        line: usize,
        col: usize,
        start: usize,
    ) -> Result<Option<Token>, LexError> {
        let Some(ch) = cursor.peek() else { return Ok(None) };
        let Some(pair) = self
            .settings
            .string_quotes
            .iter()
            .find(|p| p.open == ch)
            .copied()
        else {
            return Ok(None);
        };
        cursor.advance();
        let mut text = String::new();
        loop {
            match cursor.peek() {
                None => {
                    return Err(LexError::at(line, col, LexErrorKind::UnterminatedString));
                }
                Some(c) if c == pair.close => {
                    cursor.advance();
                    // doubled delimiter is an escaped literal delimiter
                    if cursor.peek() == Some(pair.close) {
                        text.push(pair.close);
                        cursor.advance();
                        continue;
                    }
                    break;
                }
                Some(c) => {
                    text.push(c);
                    cursor.advance();
                }
            }
        }
        let end = cursor.position().2;
        Ok(Some(Token::new(TokenType::String, text, line, col, start, end)))
    }

    fn try_consume_quoted_identifier(
        &self,
        cursor: &mut Cursor,
        line: usize,
        col: usize,
        start: usize,
    ) -> Result<Option<Token>, LexError> {
        let Some(ch) = cursor.peek() else { return Ok(None) };
        let Some(pair) = self
            .settings
            .identifier_quotes
            .iter()
            .find(|p| p.open == ch)
            .copied()
        else {
            return Ok(None);
        };
        cursor.advance();
        let mut text = String::new();
        loop {
            match cursor.peek() {
                None => {
                    return Err(LexError::at(line, col, LexErrorKind::UnterminatedIdentifier));
                }
                Some(c) if c == pair.close => {
                    cursor.advance();
                    if cursor.peek() == Some(pair.close) {
                        text.push(pair.close);
                        cursor.advance();
                        continue;
                    }
                    break;
                }
                Some(c) => {
                    text.push(c);
                    cursor.advance();
                }
            }
        }
        let end = cursor.position().2;
        Ok(Some(
            Token::new(TokenType::Identifier, text, line, col, start, end).with_quoted(true),
        ))
    }

    fn try_consume_number(&self, cursor: &mut Cursor, line: usize, col: usize, start: usize) -> Option<Token> {
        let first = cursor.peek()?;
        if !first.is_ascii_digit() {
            return None;
        }
        let mut text = String::new();
        while let Some(c) = cursor.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                cursor.advance();
            } else {
                break;
            }
        }
        if cursor.peek() == Some('.') && cursor.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            text.push('.');
            cursor.advance();
            while let Some(c) = cursor.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    cursor.advance();
                } else {
                    break;
                }
            }
        }
        if matches!(cursor.peek(), Some('e') | Some('E')) {
            let save = cursor.clone_state();
            let mut exp = String::new();
            exp.push(cursor.advance().unwrap());
            if matches!(cursor.peek(), Some('+') | Some('-')) {
                exp.push(cursor.advance().unwrap());
            }
            if cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
                while let Some(c) = cursor.peek() {
                    if c.is_ascii_digit() {
                        exp.push(c);
                        cursor.advance();
                    } else {
                        break;
                    }
                }
                text.push_str(&exp);
            } else {
                cursor.restore_state(save);
            }
        }
        let end = cursor.position().2;
        Some(Token::new(TokenType::Number, text, line, col, start, end))
    }

    fn try_consume_word(&self, cursor: &mut Cursor, line: usize, col: usize, start: usize) -> Option<Token> {
        let first = cursor.peek()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        let mut text = String::new();
        while let Some(c) = cursor.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                text.push(c);
                cursor.advance();
            } else {
                break;
            }
        }
        let end = cursor.position().2;
        let token_type = self
            .settings
            .keywords
            .lookup(&text)
            .unwrap_or(TokenType::Identifier);
        Some(Token::new(token_type, text, line, col, start, end))
    }

    fn consume_operator_or_punctuation(&self, cursor: &mut Cursor, line: usize, col: usize, start: usize) -> Token {
        const TWO_CHAR: &[(&str, TokenType)] = &[
            ("<=", TokenType::Lte),
            (">=", TokenType::Gte),
            ("!=", TokenType::Neq),
            ("<>", TokenType::Neq),
        ];
        for (lexeme, token_type) in TWO_CHAR {
            if cursor.starts_with(lexeme) {
                cursor.advance_n(2);
                let end = cursor.position().2;
                return Token::new(*token_type, *lexeme, line, col, start, end);
            }
        }
        let ch = cursor.advance().expect("caller guarantees not at end");
        let end = cursor.position().2;
        let token_type = match ch {
            '=' => TokenType::Eq,
            '<' => TokenType::Lt,
            '>' => TokenType::Gt,
            '+' => TokenType::Plus,
            '-' => TokenType::Minus,
            '*' => TokenType::Star,
            '/' => TokenType::Slash,
            '%' => TokenType::Percent,
            '!' => TokenType::Bang,
            '(' => TokenType::LParen,
            ')' => TokenType::RParen,
            ',' => TokenType::Comma,
            '.' => TokenType::Dot,
            ';' => TokenType::Semicolon,
            // unknown character: best-effort single-char identifier token
            // rather than a hard failure (spec §4.1).
            other => {
                return Token::new(TokenType::Identifier, other.to_string(), line, col, start, end);
            }
        };
        Token::new(token_type, ch.to_string(), line, col, start, end)
    }
}

/// Tracks byte-agnostic (char-indexed) position with 1-based line/col.
#[derive(Clone)]
struct Cursor<'a> {
    chars: &'a [char],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Cursor<'a> {
    fn new(chars: &'a [char]) -> Self {
        Cursor {
            chars,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        let n = s.chars().count();
        if self.pos + n > self.chars.len() {
            return false;
        }
        self.chars[self.pos..self.pos + n].iter().collect::<String>() == s
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
                skipped = true;
            } else {
                break;
            }
        }
        skipped
    }

    fn position(&self) -> (usize, usize, usize) {
        (self.line, self.col, self.pos)
    }

    fn clone_state(&self) -> (usize, usize, usize) {
        (self.pos, self.line, self.col)
    }

    fn restore_state(&mut self, state: (usize, usize, usize)) {
        (self.pos, self.line, self.col) = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::Trie;

    fn ansi_settings() -> TokenizerSettings {
        let keywords = Trie::build([
            ("SELECT".to_string(), TokenType::Select),
            ("FROM".to_string(), TokenType::From),
            ("WHERE".to_string(), TokenType::Where),
            ("AND".to_string(), TokenType::And),
            ("OR".to_string(), TokenType::Or),
        ]);
        TokenizerSettings {
            string_quotes: vec![QuotePair::symmetric('\'')],
            identifier_quotes: vec![QuotePair::symmetric('"')],
            line_comment_prefixes: vec!["--"],
            keywords,
        }
    }

    #[test]
    fn empty_input_yields_only_eof() {
        let settings = ansi_settings();
        let tokenizer = Tokenizer::new(&settings);
        let tokens = tokenizer.tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token_type, TokenType::Eof);
    }

    #[test]
    fn strings_are_unquoted_and_types_sequenced() {
        let settings = ansi_settings();
        let tokenizer = Tokenizer::new(&settings);
        let tokens = tokenizer.tokenize("SELECT 'hello', 'world'").unwrap();
        let types: Vec<_> = tokens.iter().map(|t| t.token_type).collect();
        assert_eq!(
            types,
            vec![
                TokenType::Select,
                TokenType::String,
                TokenType::Comma,
                TokenType::String,
                TokenType::Eof,
            ]
        );
        assert_eq!(tokens[1].text, "hello");
        assert_eq!(tokens[3].text, "world");
    }

    #[test]
    fn comparison_and_boolean_operators_tokenize() {
        let settings = ansi_settings();
        let tokenizer = Tokenizer::new(&settings);
        let tokens = tokenizer.tokenize("a = 1 AND b > 2 OR c <= 3").unwrap();
        let types: Vec<_> = tokens.iter().map(|t| t.token_type).collect();
        assert!(types.contains(&TokenType::Eq));
        assert!(types.contains(&TokenType::And));
        assert!(types.contains(&TokenType::Gt));
        assert!(types.contains(&TokenType::Or));
        assert!(types.contains(&TokenType::Lte));
    }

    #[test]
    fn unterminated_string_is_a_lex_error() {
        let settings = ansi_settings();
        let tokenizer = Tokenizer::new(&settings);
        let err = tokenizer.tokenize("SELECT 'oops").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn comment_attaches_to_following_token() {
        let settings = ansi_settings();
        let tokenizer = Tokenizer::new(&settings);
        let tokens = tokenizer.tokenize("-- pick everything\nSELECT").unwrap();
        assert_eq!(tokens[0].comments, vec!["pick everything".to_string()]);
    }

    #[test]
    fn unknown_character_degrades_to_identifier_rather_than_failing() {
        let settings = ansi_settings();
        let tokenizer = Tokenizer::new(&settings);
        let tokens = tokenizer.tokenize("SELECT @").unwrap();
        assert_eq!(tokens[1].token_type, TokenType::Identifier);
        assert_eq!(tokens[1].text, "@");
    }
}
