//! Recursive descent parser for Yul

use crate::common::{CompileError, CompileResult, Span};
use crate::frontend::ast::*;
use crate::frontend::lexer::{Lexer, Token, TokenKind};
use crate::names::{Name, NameRepository};

/// Recursive descent parser for Yul
///
/// Names are interned into the given repository; every parsed block gets a
/// fresh [`BlockId`].
pub struct Parser<'src, 'n> {
    lexer: Lexer<'src>,
    current: Token,
    previous_span: Span,
    names: &'n mut NameRepository,
    next_block_id: u32,
}

impl<'src, 'n> Parser<'src, 'n> {
    /// Create a new parser for the given source
    pub fn new(source: &'src str, names: &'n mut NameRepository) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            previous_span: Span::default(),
            names,
            next_block_id: 0,
        })
    }

    /// Parse either a Yul object or a bare code block
    ///
    /// A bare block is wrapped into an anonymous object without data.
    pub fn parse(&mut self) -> CompileResult<Object> {
        let object = if self.check_keyword("object") {
            self.parse_object()?
        } else {
            let code = self.parse_block()?;
            let span = code.span;
            Object {
                name: String::new(),
                code,
                objects: Vec::new(),
                data: Vec::new(),
                span,
            }
        };
        self.expect(TokenKind::Eof)?;
        Ok(object)
    }

    /// Parse a single top-level block followed by end of input
    pub fn parse_program(&mut self) -> CompileResult<Block> {
        let block = self.parse_block()?;
        self.expect(TokenKind::Eof)?;
        Ok(block)
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn advance(&mut self) -> CompileResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        self.previous_span = prev.span;
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Identifier(s) if s == keyword)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> CompileResult<Token> {
        if self.check_keyword(keyword) {
            self.advance()
        } else {
            Err(self.unexpected(&format!("'{}'", keyword)))
        }
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        CompileError::parser(
            format!("expected {}, found {}", expected, self.current.kind),
            self.current.span,
        )
    }

    fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous_span)
    }

    fn fresh_block_id(&mut self) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;
        id
    }

    // =========================================================================
    // Objects
    // =========================================================================

    fn parse_object(&mut self) -> CompileResult<Object> {
        let start = self.expect_keyword("object")?.span;
        let name = self.parse_string_name()?;
        self.expect(TokenKind::LBrace)?;
        self.expect_keyword("code")?;
        let code = self.parse_block()?;

        let mut objects = Vec::new();
        let mut data = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check_keyword("object") {
                objects.push(self.parse_object()?);
            } else if self.check_keyword("data") {
                data.push(self.parse_data()?);
            } else {
                return Err(self.unexpected("'object', 'data' or '}'"));
            }
        }
        self.expect(TokenKind::RBrace)?;

        Ok(Object {
            name,
            code,
            objects,
            data,
            span: self.span_from(start),
        })
    }

    fn parse_data(&mut self) -> CompileResult<Data> {
        let start = self.expect_keyword("data")?.span;
        let name = self.parse_string_name()?;
        let token = self.advance()?;
        let value = match &token.kind {
            TokenKind::StringLiteral(raw) => unescape_string(raw, token.span)?,
            TokenKind::HexString(raw) => decode_hex_string(raw, token.span)?,
            other => {
                return Err(CompileError::parser(
                    format!("expected data value, found {}", other),
                    token.span,
                ));
            }
        };
        Ok(Data {
            name,
            value,
            span: self.span_from(start),
        })
    }

    fn parse_string_name(&mut self) -> CompileResult<String> {
        let token = self.expect(TokenKind::StringLiteral(String::new()))?;
        match &token.kind {
            TokenKind::StringLiteral(raw) => {
                let bytes = unescape_string(raw, token.span)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            _ => unreachable!("expect() checked the token kind"),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Parse a block: { statement* }
    pub fn parse_block(&mut self) -> CompileResult<Block> {
        let start = self.expect(TokenKind::LBrace)?.span;
        let id = self.fresh_block_id();
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Eof) {
                return Err(self.unexpected("'}'"));
            }
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Block::new(id, statements, self.span_from(start)))
    }

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.current.span;
        let kind = match &self.current.kind {
            TokenKind::LBrace => StmtKind::Block(self.parse_block()?),
            TokenKind::Function => StmtKind::FunctionDefinition(self.parse_function_definition()?),
            TokenKind::Let => self.parse_variable_declaration()?,
            TokenKind::If => {
                self.advance()?;
                let condition = self.parse_expression()?;
                let body = self.parse_block()?;
                StmtKind::If { condition, body }
            }
            TokenKind::Switch => self.parse_switch()?,
            TokenKind::For => StmtKind::ForLoop(self.parse_for_loop()?),
            TokenKind::Break => {
                self.advance()?;
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.advance()?;
                StmtKind::Continue
            }
            TokenKind::Leave => {
                self.advance()?;
                StmtKind::Leave
            }
            TokenKind::Identifier(_) => self.parse_identifier_statement()?,
            kind if kind.is_literal() => StmtKind::Expression(self.parse_expression()?),
            _ => return Err(self.unexpected("statement")),
        };
        Ok(Stmt::new(kind, self.span_from(start)))
    }

    fn parse_function_definition(&mut self) -> CompileResult<FunctionDefinition> {
        self.expect(TokenKind::Function)?;
        let name = self.parse_identifier()?;
        self.expect(TokenKind::LParen)?;
        let parameters = if self.check(&TokenKind::RParen) {
            Vec::new()
        } else {
            self.parse_typed_name_list()?
        };
        self.expect(TokenKind::RParen)?;
        let returns = if self.match_token(&TokenKind::Arrow)? {
            self.parse_typed_name_list()?
        } else {
            Vec::new()
        };
        let body = self.parse_block()?;
        Ok(FunctionDefinition {
            name: name.name,
            name_span: name.span,
            parameters,
            returns,
            body,
        })
    }

    fn parse_variable_declaration(&mut self) -> CompileResult<StmtKind> {
        self.expect(TokenKind::Let)?;
        let variables = self.parse_typed_name_list()?;
        let value = if self.match_token(&TokenKind::Assign)? {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(StmtKind::VariableDeclaration { variables, value })
    }

    fn parse_switch(&mut self) -> CompileResult<StmtKind> {
        let switch_span = self.expect(TokenKind::Switch)?.span;
        let expression = self.parse_expression()?;
        let mut cases = Vec::new();
        loop {
            let start = self.current.span;
            let value = if self.match_token(&TokenKind::Case)? {
                Some(self.parse_literal()?)
            } else if self.match_token(&TokenKind::Default)? {
                None
            } else {
                break;
            };
            let body = self.parse_block()?;
            let is_default = value.is_none();
            cases.push(Case {
                value,
                body,
                span: self.span_from(start),
            });
            if is_default {
                if self.check(&TokenKind::Case) || self.check(&TokenKind::Default) {
                    return Err(CompileError::parser(
                        "the default case must be the last case of a switch",
                        self.current.span,
                    ));
                }
                break;
            }
        }
        if cases.is_empty() {
            return Err(CompileError::parser(
                "switch statement without any cases",
                self.span_from(switch_span),
            ));
        }
        Ok(StmtKind::Switch { expression, cases })
    }

    fn parse_for_loop(&mut self) -> CompileResult<ForLoop> {
        self.expect(TokenKind::For)?;
        let pre = self.parse_block()?;
        let condition = self.parse_expression()?;
        let post = self.parse_block()?;
        let body = self.parse_block()?;
        Ok(ForLoop {
            pre,
            condition,
            post,
            body,
        })
    }

    /// Assignment, call or bare identifier, all starting with an identifier
    fn parse_identifier_statement(&mut self) -> CompileResult<StmtKind> {
        let first = self.parse_identifier()?;
        if self.check(&TokenKind::Comma) || self.check(&TokenKind::Assign) {
            let mut variables = vec![first];
            while self.match_token(&TokenKind::Comma)? {
                variables.push(self.parse_identifier()?);
            }
            self.expect(TokenKind::Assign)?;
            let value = self.parse_expression()?;
            return Ok(StmtKind::Assignment { variables, value });
        }
        Ok(StmtKind::Expression(self.parse_expression_after_identifier(first)?))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> CompileResult<Expr> {
        if self.current.kind.is_literal() {
            let literal = self.parse_literal()?;
            let span = literal.span;
            return Ok(Expr::new(ExprKind::Literal(literal), span));
        }
        let identifier = self.parse_identifier()?;
        self.parse_expression_after_identifier(identifier)
    }

    fn parse_expression_after_identifier(&mut self, identifier: Identifier) -> CompileResult<Expr> {
        if !self.match_token(&TokenKind::LParen)? {
            return Ok(Expr::new(ExprKind::Identifier(identifier), identifier.span));
        }

        let mut arguments = Vec::new();
        if !self.check(&TokenKind::RParen) {
            arguments.push(self.parse_expression()?);
            while self.match_token(&TokenKind::Comma)? {
                arguments.push(self.parse_expression()?);
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(Expr::new(
            ExprKind::FunctionCall(FunctionCall {
                function_name: identifier,
                arguments,
            }),
            self.span_from(identifier.span),
        ))
    }

    fn parse_literal(&mut self) -> CompileResult<Literal> {
        let token = self.advance()?;
        let value = match &token.kind {
            TokenKind::DecimalNumber(digits) | TokenKind::HexNumber(digits) => {
                LiteralValue::Number(digits.clone())
            }
            TokenKind::StringLiteral(raw) => LiteralValue::String(unescape_string(raw, token.span)?),
            TokenKind::HexString(raw) => LiteralValue::String(decode_hex_string(raw, token.span)?),
            TokenKind::True => LiteralValue::Boolean(true),
            TokenKind::False => LiteralValue::Boolean(false),
            other => {
                return Err(CompileError::parser(
                    format!("expected literal, found {}", other),
                    token.span,
                ));
            }
        };
        let ty = self.parse_type_annotation()?;
        Ok(Literal::new(value, ty, self.span_from(token.span)))
    }

    fn parse_identifier(&mut self) -> CompileResult<Identifier> {
        let token = self.advance()?;
        match &token.kind {
            TokenKind::Identifier(text) => Ok(Identifier::new(self.names.intern(text), token.span)),
            other => Err(CompileError::parser(
                format!("expected identifier, found {}", other),
                token.span,
            )),
        }
    }

    fn parse_type_annotation(&mut self) -> CompileResult<Option<Name>> {
        if self.match_token(&TokenKind::Colon)? {
            Ok(Some(self.parse_identifier()?.name))
        } else {
            Ok(None)
        }
    }

    fn parse_typed_name(&mut self) -> CompileResult<TypedName> {
        let identifier = self.parse_identifier()?;
        let ty = self.parse_type_annotation()?;
        Ok(TypedName::new(identifier.name, ty, self.span_from(identifier.span)))
    }

    fn parse_typed_name_list(&mut self) -> CompileResult<Vec<TypedName>> {
        let mut names = vec![self.parse_typed_name()?];
        while self.match_token(&TokenKind::Comma)? {
            names.push(self.parse_typed_name()?);
        }
        Ok(names)
    }
}

/// Decode a quoted string literal including its quotes
fn unescape_string(raw: &str, span: Span) -> CompileResult<Vec<u8>> {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| CompileError::lexer("malformed string literal", span))?;

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => bytes.push(b'\n'),
            Some('r') => bytes.push(b'\r'),
            Some('t') => bytes.push(b'\t'),
            Some('\\') => bytes.push(b'\\'),
            Some('"') => bytes.push(b'"'),
            Some('\'') => bytes.push(b'\''),
            Some('x') => {
                let digits: String = chars.by_ref().take(2).collect();
                let byte = u8::from_str_radix(&digits, 16)
                    .map_err(|_| CompileError::lexer("invalid \\x escape", span))?;
                bytes.push(byte);
            }
            Some('u') => {
                let digits: String = chars.by_ref().take(4).collect();
                let c = u32::from_str_radix(&digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| CompileError::lexer("invalid \\u escape", span))?;
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            _ => return Err(CompileError::lexer("invalid escape sequence", span)),
        }
    }
    Ok(bytes)
}

/// Decode `hex"00ff"` into bytes
fn decode_hex_string(raw: &str, span: Span) -> CompileResult<Vec<u8>> {
    let digits = raw
        .strip_prefix("hex\"")
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| CompileError::lexer("malformed hex string", span))?;

    if digits.len() % 2 != 0 {
        return Err(CompileError::lexer("hex string needs an even number of digits", span));
    }

    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| CompileError::lexer("malformed hex string", span))
        })
        .collect()
}
