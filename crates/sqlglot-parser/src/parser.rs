//! Recursive-descent parser with Pratt-style expression precedence
//! (spec §4.2).
//!
//! Precedence, lowest to highest: `OR` < `AND` < `NOT` < comparisons
//! (`=`, `<>`, `<`, `>`, `<=`, `>=`, `IS`, `IN`, `BETWEEN`, `LIKE`) <
//! additive (`+`, `-`) < multiplicative (`*`, `/`, `%`) < unary (`-`, `+`,
//! `NOT`) < primary. Comparisons are non-associative with themselves;
//! arithmetic operators are left-associative.

use sqlglot_ast::{
    Assignment, CteDef, Expression, JoinType, OrderDirection, ParseError, ParseErrorKind, Token,
    TokenType, WhenClause,
};

/// Parser-wide knobs. Only one today: the recursion depth cap that keeps a
/// pathological input from overflowing the host stack (spec §4.2).
#[derive(Debug, Clone, Copy)]
pub struct ParserConfig {
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig { max_depth: 100 }
    }
}

/// Recursive-descent engine over an already-tokenized stream.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

type PResult<T> = Result<T, ParseError>;

impl Parser {
    pub fn new(tokens: Vec<Token>, config: ParserConfig) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
            max_depth: config.max_depth,
        }
    }

    /// `parse(source) -> [Expression]`: zero or more `;`-separated
    /// top-level statements.
    pub fn parse(&mut self) -> PResult<Vec<Expression>> {
        let mut statements = Vec::new();
        self.skip_semicolons();
        while !self.at_eof() {
            statements.push(self.parse_statement()?);
            self.skip_semicolons();
        }
        Ok(statements)
    }

    /// `parseOne(source) -> Option<Expression>`: the first statement, or
    /// `None` for empty/whitespace-only input or a fatal parse error.
    pub fn parse_one(&mut self) -> Option<Expression> {
        self.skip_semicolons();
        if self.at_eof() {
            return None;
        }
        self.parse_statement().ok()
    }

    fn skip_semicolons(&mut self) {
        while self.check(TokenType::Semicolon) {
            self.pos += 1;
        }
    }

    // --- token stream primitives -------------------------------------

    fn at_eof(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.peek().token_type == token_type
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn matches(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token_type: TokenType) -> PResult<Token> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            let got = self.peek().clone();
            Err(self.err(ParseErrorKind::UnexpectedToken {
                expected: format!("{token_type:?}"),
                got: format!("{:?} ({:?})", got.token_type, got.text),
            }))
        }
    }

    fn err(&self, kind: ParseErrorKind) -> ParseError {
        let tok = self.peek();
        ParseError::at(tok.line, tok.col, kind)
    }

    fn enter_depth(&mut self) -> PResult<()> {
        if self.depth >= self.max_depth {
            return Err(self.err(ParseErrorKind::DepthExceeded));
        }
        self.depth += 1;
        Ok(())
    }

    fn exit_depth(&mut self) {
        self.depth -= 1;
    }

    // --- statements -------------------------------------------------

    fn parse_statement(&mut self) -> PResult<Expression> {
        match self.peek().token_type {
            TokenType::With => self.parse_with(),
            TokenType::Select => self.parse_select(),
            TokenType::Insert => self.parse_insert(),
            TokenType::Update => self.parse_update(),
            TokenType::Delete => self.parse_delete(),
            TokenType::Create => self.parse_create(),
            TokenType::Drop => self.parse_drop(),
            TokenType::Alter => self.parse_alter(),
            _ => {
                let got = self.peek().clone();
                Err(self.err(ParseErrorKind::UnexpectedToken {
                    expected: "a statement (SELECT, WITH, INSERT, UPDATE, DELETE, CREATE, DROP or ALTER)".into(),
                    got: format!("{:?}", got.token_type),
                }))
            }
        }
    }

    fn parse_with(&mut self) -> PResult<Expression> {
        self.expect(TokenType::With)?;
        let mut ctes = Vec::new();
        loop {
            let name_tok = self.parse_name()?;
            self.expect(TokenType::As)?;
            self.expect(TokenType::LParen)?;
            let select = self.parse_select()?;
            self.expect(TokenType::RParen)?;
            ctes.push(CteDef {
                name: name_tok,
                select: Box::new(select),
            });
            if !self.matches(TokenType::Comma) {
                break;
            }
        }
        let select = match self.peek().token_type {
            TokenType::Select => self.parse_select()?,
            TokenType::Insert => self.parse_insert()?,
            TokenType::Update => self.parse_update()?,
            TokenType::Delete => self.parse_delete()?,
            _ => {
                return Err(self.err(ParseErrorKind::UnexpectedToken {
                    expected: "SELECT, INSERT, UPDATE or DELETE after WITH".into(),
                    got: format!("{:?}", self.peek().token_type),
                }))
            }
        };
        Ok(Expression::With {
            ctes,
            select: Box::new(select),
        })
    }

    fn parse_name(&mut self) -> PResult<String> {
        if self.check(TokenType::Identifier) {
            Ok(self.advance().text)
        } else {
            let got = self.peek().clone();
            Err(self.err(ParseErrorKind::UnexpectedToken {
                expected: "an identifier".into(),
                got: format!("{:?}", got.token_type),
            }))
        }
    }

    fn parse_select(&mut self) -> PResult<Expression> {
        self.expect(TokenType::Select)?;
        let distinct = self.matches(TokenType::Distinct);

        let mut expressions = vec![self.parse_select_item()?];
        while self.matches(TokenType::Comma) {
            expressions.push(self.parse_select_item()?);
        }

        let mut from = None;
        let mut joins = Vec::new();
        if self.matches(TokenType::From) {
            from = Some(Box::new(self.parse_table_ref()?));
            while self.is_join_start() {
                joins.push(self.parse_join()?);
            }
        }

        let where_ = if self.matches(TokenType::Where) {
            Some(Box::new(Expression::Where(Box::new(self.parse_expr()?))))
        } else {
            None
        };

        let mut group_by = None;
        let mut having = None;
        if self.matches(TokenType::Group) {
            self.expect(TokenType::By)?;
            let mut items = vec![self.parse_expr()?];
            while self.matches(TokenType::Comma) {
                items.push(self.parse_expr()?);
            }
            group_by = Some(Box::new(Expression::GroupBy(items)));
            if self.matches(TokenType::Having) {
                having = Some(Box::new(Expression::Having(Box::new(self.parse_expr()?))));
            }
        }

        let mut order_by = Vec::new();
        if self.matches(TokenType::Order) {
            self.expect(TokenType::By)?;
            order_by.push(self.parse_order_item()?);
            while self.matches(TokenType::Comma) {
                order_by.push(self.parse_order_item()?);
            }
        }

        let mut limit = None;
        let mut offset = None;
        if self.matches(TokenType::Limit) {
            limit = Some(Box::new(Expression::Limit(Box::new(self.parse_expr()?))));
            if self.matches(TokenType::Offset) {
                offset = Some(Box::new(Expression::Offset(Box::new(self.parse_expr()?))));
            }
        }

        Ok(Expression::Select {
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
        })
    }

    fn parse_select_item(&mut self) -> PResult<Expression> {
        let expr = self.parse_expr()?;
        if self.matches(TokenType::As) {
            let alias = self.parse_name()?;
            return Ok(Expression::Alias {
                expression: Box::new(expr),
                alias,
            });
        }
        // bare alias: `expr alias` with no AS, when the next token is a
        // plain identifier that cannot start a new clause.
        if self.check(TokenType::Identifier) && !self.is_clause_start() {
            let alias = self.advance().text;
            return Ok(Expression::Alias {
                expression: Box::new(expr),
                alias,
            });
        }
        Ok(expr)
    }

    fn is_clause_start(&self) -> bool {
        matches!(
            self.peek().token_type,
            TokenType::From
                | TokenType::Where
                | TokenType::Group
                | TokenType::Having
                | TokenType::Order
                | TokenType::Limit
                | TokenType::Offset
        )
    }

    fn is_join_start(&self) -> bool {
        matches!(
            self.peek().token_type,
            TokenType::Join | TokenType::Inner | TokenType::Left | TokenType::Right | TokenType::Full | TokenType::Cross
        )
    }

    fn parse_join(&mut self) -> PResult<Expression> {
        let kind = match self.peek().token_type {
            TokenType::Inner => {
                self.advance();
                JoinType::Inner
            }
            TokenType::Left => {
                self.advance();
                self.matches(TokenType::Full); // tolerate `LEFT OUTER JOIN`-style noise
                JoinType::Left
            }
            TokenType::Right => {
                self.advance();
                JoinType::Right
            }
            TokenType::Full => {
                self.advance();
                JoinType::Full
            }
            TokenType::Cross => {
                self.advance();
                JoinType::Cross
            }
            // bare `JOIN` defaults to INNER
            _ => JoinType::Inner,
        };
        self.expect(TokenType::Join)?;
        let table = Box::new(self.parse_table_ref()?);
        let mut on = None;
        let mut using = Vec::new();
        if self.matches(TokenType::On) {
            on = Some(Box::new(self.parse_expr()?));
        } else if self.matches(TokenType::Using) {
            self.expect(TokenType::LParen)?;
            using.push(self.parse_name()?);
            while self.matches(TokenType::Comma) {
                using.push(self.parse_name()?);
            }
            self.expect(TokenType::RParen)?;
        }
        Ok(Expression::Join {
            kind,
            table,
            on,
            using,
        })
    }

    /// `table_ref ::= identifier(.identifier)* [alias] | ( SELECT ... ) alias | ( table_ref )`
    fn parse_table_ref(&mut self) -> PResult<Expression> {
        if self.matches(TokenType::LParen) {
            if self.check(TokenType::Select) {
                let select = self.parse_select()?;
                self.expect(TokenType::RParen)?;
                let subquery = Expression::Subquery {
                    select: Box::new(select),
                };
                return Ok(self.maybe_alias(subquery));
            }
            let inner = self.parse_table_ref()?;
            self.expect(TokenType::RParen)?;
            return Ok(self.maybe_alias(inner));
        }
        let first = self.parse_name()?;
        let mut parts = vec![first];
        while self.matches(TokenType::Dot) {
            parts.push(self.parse_name()?);
        }
        let table = match parts.len() {
            1 => Expression::Table {
                name: parts.pop().unwrap(),
                schema: None,
            },
            _ => {
                let name = parts.pop().unwrap();
                let schema = parts.pop();
                Expression::Table { name, schema }
            }
        };
        Ok(self.maybe_alias(table))
    }

    fn maybe_alias(&mut self, expr: Expression) -> Expression {
        self.matches(TokenType::As);
        if self.check(TokenType::Identifier) && !self.is_clause_start() && !self.is_join_start() {
            let alias = self.advance().text;
            Expression::Alias {
                expression: Box::new(expr),
                alias,
            }
        } else {
            expr
        }
    }

    fn parse_order_item(&mut self) -> PResult<Expression> {
        let expression = Box::new(self.parse_expr()?);
        let direction = if self.matches(TokenType::Desc) {
            OrderDirection::Desc
        } else {
            self.matches(TokenType::Asc);
            OrderDirection::Asc
        };
        Ok(Expression::OrderItem {
            expression,
            direction,
        })
    }

    fn parse_insert(&mut self) -> PResult<Expression> {
        self.expect(TokenType::Insert)?;
        self.expect(TokenType::Into)?;
        let table = Box::new(self.parse_table_ref()?);
        let mut columns = Vec::new();
        if self.matches(TokenType::LParen) {
            columns.push(Expression::identifier(self.parse_name()?));
            while self.matches(TokenType::Comma) {
                columns.push(Expression::identifier(self.parse_name()?));
            }
            self.expect(TokenType::RParen)?;
        }
        self.expect(TokenType::Values)?;
        let mut values = vec![self.parse_value_row()?];
        while self.matches(TokenType::Comma) {
            values.push(self.parse_value_row()?);
        }
        Ok(Expression::Insert {
            table,
            columns,
            values,
        })
    }

    fn parse_value_row(&mut self) -> PResult<Vec<Expression>> {
        self.expect(TokenType::LParen)?;
        let mut row = vec![self.parse_expr()?];
        while self.matches(TokenType::Comma) {
            row.push(self.parse_expr()?);
        }
        self.expect(TokenType::RParen)?;
        Ok(row)
    }

    fn parse_update(&mut self) -> PResult<Expression> {
        self.expect(TokenType::Update)?;
        let table = Box::new(self.parse_table_ref()?);
        self.expect(TokenType::Set)?;
        let mut assignments = vec![self.parse_assignment()?];
        while self.matches(TokenType::Comma) {
            assignments.push(self.parse_assignment()?);
        }
        let where_ = if self.matches(TokenType::Where) {
            Some(Box::new(Expression::Where(Box::new(self.parse_expr()?))))
        } else {
            None
        };
        Ok(Expression::Update {
            table,
            assignments,
            where_,
        })
    }

    fn parse_assignment(&mut self) -> PResult<Assignment> {
        let column = Expression::identifier(self.parse_name()?);
        self.expect(TokenType::Eq)?;
        let value = self.parse_expr()?;
        Ok(Assignment { column, value })
    }

    fn parse_delete(&mut self) -> PResult<Expression> {
        self.expect(TokenType::Delete)?;
        self.expect(TokenType::From)?;
        let table = Box::new(self.parse_table_ref()?);
        let where_ = if self.matches(TokenType::Where) {
            Some(Box::new(Expression::Where(Box::new(self.parse_expr()?))))
        } else {
            None
        };
        Ok(Expression::Delete { table, where_ })
    }

    fn parse_create(&mut self) -> PResult<Expression> {
        self.expect(TokenType::Create)?;
        let kind = if self.matches(TokenType::Table) {
            "TABLE"
        } else if self.matches(TokenType::View) {
            "VIEW"
        } else {
            return Err(self.err(ParseErrorKind::UnexpectedToken {
                expected: "TABLE or VIEW".into(),
                got: format!("{:?}", self.peek().token_type),
            }));
        };
        let name = Box::new(self.parse_table_ref()?);
        let mut columns = Vec::new();
        if self.matches(TokenType::LParen) {
            columns.push(self.parse_column_def()?);
            while self.matches(TokenType::Comma) {
                columns.push(self.parse_column_def()?);
            }
            self.expect(TokenType::RParen)?;
        }
        let select = if self.matches(TokenType::As) {
            Some(Box::new(self.parse_select()?))
        } else {
            None
        };
        Ok(Expression::Create {
            kind: kind.to_string(),
            name,
            columns,
            select,
        })
    }

    fn parse_column_def(&mut self) -> PResult<Expression> {
        let name = self.parse_name()?;
        let data_type = self.parse_type_name()?;
        Ok(Expression::ColumnDef { name, data_type })
    }

    fn parse_type_name(&mut self) -> PResult<String> {
        if !matches!(self.peek().token_type, TokenType::Identifier) {
            return Err(self.err(ParseErrorKind::InvalidType));
        }
        let mut text = self.advance().text;
        if self.matches(TokenType::LParen) {
            text.push('(');
            text.push_str(&self.advance().text);
            while self.matches(TokenType::Comma) {
                text.push(',');
                text.push_str(&self.advance().text);
            }
            self.expect(TokenType::RParen)?;
            text.push(')');
        }
        Ok(text)
    }

    fn parse_drop(&mut self) -> PResult<Expression> {
        self.expect(TokenType::Drop)?;
        let kind = if self.matches(TokenType::Table) {
            "TABLE"
        } else if self.matches(TokenType::View) {
            "VIEW"
        } else {
            return Err(self.err(ParseErrorKind::UnexpectedToken {
                expected: "TABLE or VIEW".into(),
                got: format!("{:?}", self.peek().token_type),
            }));
        };
        let name = Box::new(self.parse_table_ref()?);
        Ok(Expression::Drop {
            kind: kind.to_string(),
            name,
        })
    }

    fn parse_alter(&mut self) -> PResult<Expression> {
        self.expect(TokenType::Alter)?;
        self.expect(TokenType::Table)?;
        let name = Box::new(self.parse_table_ref()?);
        let mut action = String::new();
        while !self.check(TokenType::Semicolon) && !self.at_eof() {
            if !action.is_empty() {
                action.push(' ');
            }
            action.push_str(&self.advance().text);
        }
        Ok(Expression::Alter { name, action })
    }

    // --- expressions (Pratt precedence climb) -------------------------

    fn parse_expr(&mut self) -> PResult<Expression> {
        self.enter_depth()?;
        let result = self.parse_or();
        self.exit_depth();
        result
    }

    fn parse_or(&mut self) -> PResult<Expression> {
        let mut left = self.parse_and()?;
        while self.matches(TokenType::Or) {
            let right = self.parse_and()?;
            left = Expression::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> PResult<Expression> {
        let mut left = self.parse_not()?;
        while self.matches(TokenType::And) {
            let right = self.parse_not()?;
            left = Expression::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> PResult<Expression> {
        if self.matches(TokenType::Not) {
            self.enter_depth()?;
            let inner = self.parse_not();
            self.exit_depth();
            return Ok(Expression::Not(Box::new(inner?)));
        }
        // `!` is the alternate spelling of `NOT` at this same precedence
        // tier (spec §3), distinct from the `Not` variant the `NOT`
        // keyword itself produces.
        if self.matches(TokenType::Bang) {
            self.enter_depth()?;
            let inner = self.parse_not();
            self.exit_depth();
            return Ok(Expression::Not2(Box::new(inner?)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> PResult<Expression> {
        let left = self.parse_additive()?;
        if self.matches(TokenType::Is) {
            let negate = self.matches(TokenType::Not);
            let right = self.parse_additive()?;
            let is = Expression::Is(Box::new(left), Box::new(right));
            return Ok(if negate { Expression::Not(Box::new(is)) } else { is });
        }
        if self.check(TokenType::In) || (self.check(TokenType::Not) && self.peek_at(1).token_type == TokenType::In) {
            let negate = self.matches(TokenType::Not);
            self.expect(TokenType::In)?;
            self.expect(TokenType::LParen)?;
            let mut list = vec![self.parse_expr()?];
            while self.matches(TokenType::Comma) {
                list.push(self.parse_expr()?);
            }
            self.expect(TokenType::RParen)?;
            let in_expr = Expression::In {
                expression: Box::new(left),
                list,
            };
            return Ok(if negate { Expression::Not(Box::new(in_expr)) } else { in_expr });
        }
        if self.check(TokenType::Between)
            || (self.check(TokenType::Not) && self.peek_at(1).token_type == TokenType::Between)
        {
            let negate = self.matches(TokenType::Not);
            self.expect(TokenType::Between)?;
            let low = self.parse_additive()?;
            self.expect(TokenType::And)?;
            let high = self.parse_additive()?;
            let between = Expression::Between {
                expression: Box::new(left),
                low: Box::new(low),
                high: Box::new(high),
            };
            return Ok(if negate { Expression::Not(Box::new(between)) } else { between });
        }
        if self.check(TokenType::Like) || (self.check(TokenType::Not) && self.peek_at(1).token_type == TokenType::Like)
        {
            let negate = self.matches(TokenType::Not);
            self.expect(TokenType::Like)?;
            let pattern = self.parse_additive()?;
            let like = Expression::Like {
                expression: Box::new(left),
                pattern: Box::new(pattern),
            };
            return Ok(if negate { Expression::Not(Box::new(like)) } else { like });
        }
        let ctor: Option<fn(Box<Expression>, Box<Expression>) -> Expression> = match self.peek().token_type {
            TokenType::Eq => Some(Expression::Eq),
            TokenType::Neq => Some(Expression::Neq),
            TokenType::Gt => Some(Expression::Gt),
            TokenType::Lt => Some(Expression::Lt),
            TokenType::Gte => Some(Expression::Gte),
            TokenType::Lte => Some(Expression::Lte),
            _ => None,
        };
        if let Some(ctor) = ctor {
            self.advance();
            let right = self.parse_additive()?;
            return Ok(ctor(Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> PResult<Expression> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let ctor: Option<fn(Box<Expression>, Box<Expression>) -> Expression> = match self.peek().token_type {
                TokenType::Plus => Some(Expression::Add),
                TokenType::Minus => Some(Expression::Sub),
                _ => None,
            };
            let Some(ctor) = ctor else { break };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = ctor(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> PResult<Expression> {
        let mut left = self.parse_unary()?;
        loop {
            let ctor: Option<fn(Box<Expression>, Box<Expression>) -> Expression> = match self.peek().token_type {
                TokenType::Star => Some(Expression::Mul),
                TokenType::Slash => Some(Expression::Div),
                TokenType::Percent => Some(Expression::Mod),
                _ => None,
            };
            let Some(ctor) = ctor else { break };
            self.advance();
            let right = self.parse_unary()?;
            left = ctor(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<Expression> {
        if self.matches(TokenType::Minus) {
            self.enter_depth()?;
            let operand = self.parse_unary();
            self.exit_depth();
            return Ok(Expression::Neg(Box::new(operand?)));
        }
        if self.matches(TokenType::Plus) {
            self.enter_depth()?;
            let operand = self.parse_unary();
            self.exit_depth();
            return Ok(Expression::Pos(Box::new(operand?)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> PResult<Expression> {
        self.enter_depth()?;
        let result = self.parse_primary_inner();
        self.exit_depth();
        result
    }

    fn parse_primary_inner(&mut self) -> PResult<Expression> {
        match self.peek().token_type {
            TokenType::Number => {
                let tok = self.advance();
                Ok(Expression::literal(tok.text))
            }
            TokenType::String => {
                let tok = self.advance();
                Ok(Expression::string_literal(tok.text))
            }
            TokenType::True => {
                self.advance();
                Ok(Expression::True)
            }
            TokenType::False => {
                self.advance();
                Ok(Expression::False)
            }
            TokenType::Null => {
                self.advance();
                Ok(Expression::Null)
            }
            TokenType::Star => {
                self.advance();
                Ok(Expression::Star)
            }
            TokenType::Cast => self.parse_cast(),
            TokenType::Case => self.parse_case(),
            TokenType::LParen => self.parse_paren(),
            TokenType::Identifier => self.parse_ident_chain(),
            _ => {
                let got = self.peek().clone();
                Err(self.err(ParseErrorKind::UnexpectedToken {
                    expected: "an expression".into(),
                    got: format!("{:?} ({:?})", got.token_type, got.text),
                }))
            }
        }
    }

    fn parse_cast(&mut self) -> PResult<Expression> {
        self.expect(TokenType::Cast)?;
        self.expect(TokenType::LParen)?;
        let expression = Box::new(self.parse_expr()?);
        self.expect(TokenType::As)?;
        let data_type = self.parse_type_name()?;
        self.expect(TokenType::RParen)?;
        Ok(Expression::Cast {
            expression,
            data_type,
        })
    }

    fn parse_case(&mut self) -> PResult<Expression> {
        self.expect(TokenType::Case)?;
        let mut whens = Vec::new();
        while self.matches(TokenType::When) {
            let condition = self.parse_expr()?;
            self.expect(TokenType::Then)?;
            let result = self.parse_expr()?;
            whens.push(WhenClause { condition, result });
        }
        if whens.is_empty() {
            return Err(self.err(ParseErrorKind::UnterminatedConstruct {
                what: "CASE expression (no WHEN clause)".into(),
            }));
        }
        let else_expr = if self.matches(TokenType::Else) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        if !self.matches(TokenType::End) {
            return Err(self.err(ParseErrorKind::UnterminatedConstruct {
                what: "CASE expression (missing END)".into(),
            }));
        }
        Ok(Expression::Case { whens, else_expr })
    }

    fn parse_paren(&mut self) -> PResult<Expression> {
        self.expect(TokenType::LParen)?;
        if self.check(TokenType::Select) {
            let select = self.parse_select()?;
            self.expect(TokenType::RParen)?;
            return Ok(Expression::Subquery {
                select: Box::new(select),
            });
        }
        let inner = self.parse_expr()?;
        self.expect(TokenType::RParen)?;
        Ok(Expression::Paren(Box::new(inner)))
    }

    /// `a.b.c` mapped to nested `Column`s; `ident(args)` mapped to a
    /// function call.
    fn parse_ident_chain(&mut self) -> PResult<Expression> {
        let tok = self.advance();
        let first = Expression::Identifier {
            name: tok.text.clone(),
            quoted: tok.quoted,
        };

        if self.matches(TokenType::LParen) {
            let mut args = Vec::new();
            if !self.check(TokenType::RParen) {
                args.push(self.parse_expr()?);
                while self.matches(TokenType::Comma) {
                    args.push(self.parse_expr()?);
                }
            }
            self.expect(TokenType::RParen)?;
            return Ok(Expression::Function {
                name: tok.text,
                args,
            });
        }

        let mut parts = vec![first];
        while self.check(TokenType::Dot) {
            // don't consume a trailing `.` that isn't followed by a name,
            // e.g. end of a qualified table reference before an alias.
            if !matches!(self.peek_at(1).token_type, TokenType::Identifier) {
                break;
            }
            self.advance();
            let tok = self.advance();
            parts.push(Expression::Identifier {
                name: tok.text,
                quoted: tok.quoted,
            });
        }

        let mut expr = parts.remove(0);
        for part in parts {
            expr = Expression::Column {
                name: Box::new(part),
                table: Some(Box::new(expr)),
            };
        }
        // a lone identifier with no qualifier is still a Column with no table
        if let Expression::Identifier { .. } = expr {
            expr = Expression::Column {
                name: Box::new(expr),
                table: None,
            };
        }
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::sqlglot_parser_test_support::tokenize_ansi;

    fn parse(sql: &str) -> PResult<Vec<Expression>> {
        let tokens = tokenize_ansi(sql);
        Parser::new(tokens, ParserConfig::default()).parse()
    }

    #[test]
    fn simple_select() {
        let stmts = parse("SELECT a FROM t").unwrap();
        assert_eq!(stmts.len(), 1);
        match &stmts[0] {
            Expression::Select { expressions, from, .. } => {
                assert_eq!(expressions.len(), 1);
                assert!(from.is_some());
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn depth_exceeded_on_pathological_nesting() {
        let mut sql = "SELECT ".to_string();
        for _ in 0..200 {
            sql.push('(');
        }
        sql.push('1');
        for _ in 0..200 {
            sql.push(')');
        }
        let err = parse(&sql).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DepthExceeded);
    }

    #[test]
    fn bang_negation_parses_as_not2() {
        let stmts = parse("SELECT * FROM t WHERE !a").unwrap();
        let Expression::Select { where_, .. } = &stmts[0] else {
            panic!()
        };
        match where_.as_deref().unwrap() {
            Expression::Where(inner) => assert!(matches!(inner.as_ref(), Expression::Not2(..))),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn where_with_and_or_precedence() {
        let stmts = parse("SELECT * FROM t WHERE a = 1 AND b = 2 OR c = 3").unwrap();
        let Expression::Select { where_, .. } = &stmts[0] else {
            panic!()
        };
        // OR binds loosest, so the top node is Or(And(..), ..)
        match where_.as_deref().unwrap() {
            Expression::Where(inner) => assert!(matches!(inner.as_ref(), Expression::Or(..))),
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[cfg(test)]
mod sqlglot_parser_test_support {
    use super::*;
    use crate::tokenizer::{QuotePair, Tokenizer, TokenizerSettings};
    use crate::trie::Trie;

    pub fn tokenize_ansi(sql: &str) -> Vec<Token> {
        let keywords = Trie::build(
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
        );
        let settings = TokenizerSettings {
            string_quotes: vec![QuotePair::symmetric('\'')],
            identifier_quotes: vec![QuotePair::symmetric('"')],
            line_comment_prefixes: vec!["--"],
            keywords,
        };
        Tokenizer::new(&settings).tokenize(sql).unwrap()
    }
}
