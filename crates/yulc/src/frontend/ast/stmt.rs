//! Statement AST nodes

use super::{Expr, Identifier, Literal, TypedName};
use crate::common::Span;
use crate::names::Name;

/// Identity of a block within one parsed program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Expression statement: f(x)
    Expression(Expr),

    /// Assignment: a, b := f()
    Assignment {
        variables: Vec<Identifier>,
        value: Expr,
    },

    /// Variable declaration: let a, b := f()
    VariableDeclaration {
        variables: Vec<TypedName>,
        value: Option<Expr>,
    },

    /// Function definition
    FunctionDefinition(FunctionDefinition),

    /// If statement (no else branch): if cond { ... }
    If { condition: Expr, body: Block },

    /// Switch statement
    Switch { expression: Expr, cases: Vec<Case> },

    /// For loop: for { pre } cond { post } { body }
    ForLoop(ForLoop),

    Break,
    Continue,

    /// Leave the current function
    Leave,

    /// Nested block
    Block(Block),
}

/// Function definition: function f(a, b) -> r { ... }
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: Name,
    pub name_span: Span,
    pub parameters: Vec<TypedName>,
    pub returns: Vec<TypedName>,
    pub body: Block,
}

/// One arm of a switch, `value` is `None` for `default`
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub value: Option<Literal>,
    pub body: Block,
    pub span: Span,
}

impl Case {
    pub fn is_default(&self) -> bool {
        self.value.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub pre: Block,
    pub condition: Expr,
    pub post: Block,
    pub body: Block,
}

/// Block: { ... }
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(id: BlockId, statements: Vec<Stmt>, span: Span) -> Self {
        Self { id, statements, span }
    }

    /// Function definitions directly inside this block
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.statements.iter().filter_map(|stmt| match &stmt.kind {
            StmtKind::FunctionDefinition(function) => Some(function),
            _ => None,
        })
    }
}
