//! Expression AST nodes

use crate::common::Span;
use crate::names::Name;

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExprKind::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Literal: 42, 0xff, "abc", true
    Literal(Literal),

    /// Identifier: x
    Identifier(Identifier),

    /// Function call: f(a, b)
    FunctionCall(FunctionCall),
}

/// Reference to a name at a source location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier {
    pub name: Name,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: Name, span: Span) -> Self {
        Self { name, span }
    }
}

/// Name with an optional type annotation: `x` or `x:u256`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedName {
    pub name: Name,
    pub ty: Option<Name>,
    pub span: Span,
}

impl TypedName {
    pub fn new(name: Name, ty: Option<Name>, span: Span) -> Self {
        Self { name, ty, span }
    }
}

/// Value of a literal as written in the source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    /// Decimal or `0x` prefixed hexadecimal digits
    Number(String),
    /// Unescaped bytes of a string or hex string
    String(Vec<u8>),
    Boolean(bool),
}

/// Literal with an optional type annotation
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub ty: Option<Name>,
    pub span: Span,
}

impl Literal {
    pub fn new(value: LiteralValue, ty: Option<Name>, span: Span) -> Self {
        Self { value, ty, span }
    }

    pub fn is_string(&self) -> bool {
        matches!(self.value, LiteralValue::String(_))
    }

    /// Source-like rendering used in messages
    pub fn text(&self) -> String {
        match &self.value {
            LiteralValue::Number(digits) => digits.clone(),
            LiteralValue::String(bytes) => format!("\"{}\"", String::from_utf8_lossy(bytes)),
            LiteralValue::Boolean(value) => value.to_string(),
        }
    }
}

/// Call of a builtin or user-defined function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub function_name: Identifier,
    pub arguments: Vec<Expr>,
}
