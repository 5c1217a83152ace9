//! Lexer implementation using logos

use super::token::{Token, TokenKind};
use crate::common::{CompileError, CompileResult, Span};
use logos::Logos;

/// Lexer for Yul source code
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    peeked: Option<Token>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            peeked: None,
            at_eof: false,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> CompileResult<Token> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }

        if self.at_eof {
            let len = self.inner.source().len();
            return Ok(Token::new(TokenKind::Eof, Span::new(len, len)));
        }

        match self.inner.next() {
            Some(Ok(kind)) => {
                let span = self.inner.span();
                Ok(Token::new(kind, Span::new(span.start, span.end)))
            }
            Some(Err(())) => {
                let span = self.inner.span();
                Err(CompileError::lexer(
                    format!("unexpected character '{}'", self.inner.slice()),
                    Span::new(span.start, span.end),
                ))
            }
            None => {
                self.at_eof = true;
                let len = self.inner.source().len();
                Ok(Token::new(TokenKind::Eof, Span::new(len, len)))
            }
        }
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> CompileResult<&Token> {
        if self.peeked.is_none() {
            let token = self.next_token()?;
            self.peeked = Some(token);
        }
        match &self.peeked {
            Some(token) => Ok(token),
            None => unreachable!("peeked token was just stored"),
        }
    }

    /// Tokenize the entire source and return all tokens
    pub fn tokenize_all(mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Get the source being lexed
    pub fn source(&self) -> &'a str {
        self.inner.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        let source = "function let if switch case default for break continue leave";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Function));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Let));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::If));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Switch));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Case));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Default));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::For));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Break));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Continue));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Leave));
    }

    #[test]
    fn test_identifiers() {
        let source = "foo x.slot $tmp _a1 object";
        let mut lexer = Lexer::new(source);

        for expected in ["foo", "x.slot", "$tmp", "_a1", "object"] {
            assert!(matches!(
                lexer.next_token().unwrap().kind,
                TokenKind::Identifier(s) if s == expected
            ));
        }
    }

    #[test]
    fn test_literals() {
        let source = r#"42 0x1F "abc" hex"00ff" true false"#;
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::DecimalNumber(s) if s == "42"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::HexNumber(s) if s == "0x1F"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::StringLiteral(s) if s == "\"abc\""
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::HexString(s) if s == "hex\"00ff\""
        ));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::True));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::False));
    }

    #[test]
    fn test_punctuation() {
        let source = "{ } ( ) , := -> :";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::LBrace));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::RBrace));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::LParen));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::RParen));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Comma));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Assign));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Arrow));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Colon));
    }

    #[test]
    fn test_comments() {
        let source = "let // line comment\nx /* block */ := 1";
        let tokens = Lexer::new(source).tokenize_all().unwrap();

        assert!(matches!(tokens[0].kind, TokenKind::Let));
        assert!(matches!(&tokens[1].kind, TokenKind::Identifier(s) if s == "x"));
        assert!(matches!(tokens[2].kind, TokenKind::Assign));
        assert!(matches!(&tokens[3].kind, TokenKind::DecimalNumber(s) if s == "1"));
        assert!(matches!(tokens[4].kind, TokenKind::Eof));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new("let x");
        assert!(matches!(lexer.peek().unwrap().kind, TokenKind::Let));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Let));
        assert_eq!(lexer.next_token().unwrap().span, Span::new(4, 5));
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("let #");
        assert!(lexer.next_token().is_ok());
        assert!(matches!(lexer.next_token(), Err(CompileError::Lexer { .. })));
    }
}
