//! Syntactic facts later stages ask about analyzed code

use std::collections::HashMap;

use crate::dialect::ControlFlowSideEffects;
use crate::frontend::ast::*;
use crate::names::{Name, NameRepository};

/// Whether any builtin call in `block` observes the memory size
///
/// Code without `msize` may drop memory accesses whose result is unused.
pub fn contains_msize(block: &Block, names: &NameRepository) -> bool {
    let mut found = false;
    walk_calls_in_block(block, &mut |call| {
        found |= names
            .builtin(call.function_name.name)
            .is_some_and(|builtin| builtin.is_msize);
    });
    found
}

/// [`contains_msize`] over an object and all of its sub-objects
pub fn object_contains_msize(object: &Object, names: &NameRepository) -> bool {
    contains_msize(&object.code, names)
        || object
            .objects
            .iter()
            .any(|sub| object_contains_msize(sub, names))
}

fn walk_calls_in_block(block: &Block, f: &mut impl FnMut(&FunctionCall)) {
    for stmt in &block.statements {
        walk_calls_in_statement(stmt, f);
    }
}

fn walk_calls_in_statement(stmt: &Stmt, f: &mut impl FnMut(&FunctionCall)) {
    match &stmt.kind {
        StmtKind::Expression(expr) | StmtKind::Assignment { value: expr, .. } => {
            walk_calls_in_expression(expr, f);
        }
        StmtKind::VariableDeclaration { value, .. } => {
            if let Some(value) = value {
                walk_calls_in_expression(value, f);
            }
        }
        StmtKind::FunctionDefinition(function) => walk_calls_in_block(&function.body, f),
        StmtKind::If { condition, body } => {
            walk_calls_in_expression(condition, f);
            walk_calls_in_block(body, f);
        }
        StmtKind::Switch { expression, cases } => {
            walk_calls_in_expression(expression, f);
            for case in cases {
                walk_calls_in_block(&case.body, f);
            }
        }
        StmtKind::ForLoop(for_loop) => {
            walk_calls_in_block(&for_loop.pre, f);
            walk_calls_in_expression(&for_loop.condition, f);
            walk_calls_in_block(&for_loop.body, f);
            walk_calls_in_block(&for_loop.post, f);
        }
        StmtKind::Block(block) => walk_calls_in_block(block, f),
        StmtKind::Break | StmtKind::Continue | StmtKind::Leave => {}
    }
}

fn walk_calls_in_expression(expr: &Expr, f: &mut impl FnMut(&FunctionCall)) {
    if let ExprKind::FunctionCall(call) = &expr.kind {
        for argument in &call.arguments {
            walk_calls_in_expression(argument, f);
        }
        f(call);
    }
}

/// How a statement leaves the straight-line flow of its block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    /// Execution continues with the next statement
    FlowOut,
    Break,
    Continue,
    Leave,
    /// Execution of the whole call ends (`return`, `revert`, ...)
    Terminate,
}

/// Finds statements after which the rest of a block is unreachable
///
/// Calls of user functions count as continuing unless a control-flow
/// summary for them is supplied with [`TerminationFinder::with_functions`].
pub struct TerminationFinder<'a> {
    names: &'a NameRepository,
    functions: Option<&'a HashMap<Name, ControlFlowSideEffects>>,
}

impl<'a> TerminationFinder<'a> {
    pub fn new(names: &'a NameRepository) -> Self {
        Self { names, functions: None }
    }

    pub fn with_functions(mut self, functions: &'a HashMap<Name, ControlFlowSideEffects>) -> Self {
        self.functions = Some(functions);
        self
    }

    /// First statement that does not flow out, with its index
    ///
    /// Returns `(ControlFlow::FlowOut, None)` if every statement flows out.
    pub fn first_unconditional_control_flow_change(&self, statements: &[Stmt]) -> (ControlFlow, Option<usize>) {
        statements
            .iter()
            .enumerate()
            .map(|(i, stmt)| (self.control_flow_kind(stmt), Some(i)))
            .find(|(kind, _)| *kind != ControlFlow::FlowOut)
            .unwrap_or((ControlFlow::FlowOut, None))
    }

    /// Unconditional effect of a single statement on control flow
    ///
    /// Nested blocks and conditional statements count as flowing out.
    pub fn control_flow_kind(&self, stmt: &Stmt) -> ControlFlow {
        match &stmt.kind {
            StmtKind::VariableDeclaration { value: Some(expr), .. }
            | StmtKind::Assignment { value: expr, .. }
            | StmtKind::Expression(expr)
                if self.contains_non_continuing_call(expr) =>
            {
                ControlFlow::Terminate
            }
            StmtKind::Break => ControlFlow::Break,
            StmtKind::Continue => ControlFlow::Continue,
            StmtKind::Leave => ControlFlow::Leave,
            _ => ControlFlow::FlowOut,
        }
    }

    /// Whether evaluating `expr` always ends execution
    pub fn contains_non_continuing_call(&self, expr: &Expr) -> bool {
        let ExprKind::FunctionCall(call) = &expr.kind else {
            return false;
        };
        call.arguments
            .iter()
            .any(|argument| self.contains_non_continuing_call(argument))
            || !self.call_can_continue(call.function_name.name)
    }

    fn call_can_continue(&self, name: Name) -> bool {
        if let Some(builtin) = self.names.builtin(name) {
            return builtin.control_flow.can_continue;
        }
        self.functions
            .and_then(|functions| functions.get(&name))
            .is_none_or(|control_flow| control_flow.can_continue)
    }
}
