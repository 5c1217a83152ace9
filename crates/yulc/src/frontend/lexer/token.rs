//! Token definitions for the Yul lexer

use crate::common::Span;
use logos::Logos;

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// All token kinds in Yul
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]  // Skip whitespace
#[logos(skip r"//[^\n]*")]      // Skip line comments
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")] // Skip block comments
pub enum TokenKind {
    // === Keywords ===
    #[token("function")]
    Function,
    #[token("let")]
    Let,
    #[token("if")]
    If,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("for")]
    For,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("leave")]
    Leave,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // === Punctuation ===
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(":=")]
    Assign,
    #[token("->")]
    Arrow,
    #[token(":")]
    Colon,

    // === Literals ===
    #[regex(r"0x[0-9a-fA-F]+", |lex| lex.slice().to_string())]
    HexNumber(String),

    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    DecimalNumber(String),

    /// Raw string literal including quotes
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice().to_string())]
    StringLiteral(String),

    /// Raw hex string including `hex` prefix and quotes
    #[regex(r#"hex"([0-9a-fA-F][0-9a-fA-F])*""#, |lex| lex.slice().to_string())]
    HexString(String),

    /// Identifier; `object`, `code` and `data` are recognized contextually
    #[regex(r"[a-zA-Z_$][a-zA-Z_$0-9.]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// End of file (not produced by logos, added by the scanner)
    Eof,
}

impl TokenKind {
    /// Whether this token can start a literal
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::HexNumber(_)
                | TokenKind::DecimalNumber(_)
                | TokenKind::StringLiteral(_)
                | TokenKind::HexString(_)
                | TokenKind::True
                | TokenKind::False
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Function => write!(f, "'function'"),
            TokenKind::Let => write!(f, "'let'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Switch => write!(f, "'switch'"),
            TokenKind::Case => write!(f, "'case'"),
            TokenKind::Default => write!(f, "'default'"),
            TokenKind::For => write!(f, "'for'"),
            TokenKind::Break => write!(f, "'break'"),
            TokenKind::Continue => write!(f, "'continue'"),
            TokenKind::Leave => write!(f, "'leave'"),
            TokenKind::True => write!(f, "'true'"),
            TokenKind::False => write!(f, "'false'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Assign => write!(f, "':='"),
            TokenKind::Arrow => write!(f, "'->'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::HexNumber(s) | TokenKind::DecimalNumber(s) => write!(f, "number '{}'", s),
            TokenKind::StringLiteral(s) => write!(f, "string {}", s),
            TokenKind::HexString(s) => write!(f, "hex string {}", s),
            TokenKind::Identifier(s) => write!(f, "identifier '{}'", s),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}
