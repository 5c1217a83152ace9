//! Semantic analyzer for Yul code
//!
//! [`AsmAnalyzer`] walks a block once, depth first. Scopes are created as
//! blocks are entered and recorded in the caller's [`AnalysisInfo`];
//! every problem found is recorded in an [`ErrorReporter`] and traversal
//! carries on with a local recovery, so one run reports as much as it can.

use std::collections::{BTreeSet, HashSet};
use std::mem;

use super::effects::EffectCollector;
use super::scope::{AnalysisInfo, FunctionId, ScopeId, Symbol, VariableId};
use super::types::{TypeChecker, U256, literal_value};
use crate::common::{ErrorKind, ErrorReporter, Span};
use crate::dialect::{BuiltinFunction, LiteralArgument, SideEffects};
use crate::frontend::ast::*;
use crate::names::{Name, NameRepository};

/// Suffixes marking a reference to the location of an outer variable
const LOCATION_SUFFIXES: [&str; 3] = [".slot", ".offset", ".address"];

/// Prefix reserved for `verbatim_<n>i_<m>o` builtins
const RESERVED_PREFIX: &str = "verbatim";

/// How an externally resolved identifier is accessed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    Read,
    Write,
    AddressOf,
}

/// Resolves names that are declared outside of the analyzed code
///
/// Consulted only when neither the scopes nor the dialect know a name. A
/// resolver accepts a name by returning its type label.
pub trait ExternalResolver {
    fn resolve(&self, name: Name, access: AccessKind, span: Span) -> Option<Name>;
}

impl<F> ExternalResolver for F
where
    F: Fn(Name, AccessKind, Span) -> Option<Name>,
{
    fn resolve(&self, name: Name, access: AccessKind, span: Span) -> Option<Name> {
        self(name, access, span)
    }
}

/// Where the current statement sits relative to the innermost for loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopPosition {
    Outside,
    /// Init block, condition or post block
    Header,
    Body,
}

/// Traversal state handed down every visit call
#[derive(Debug, Clone, Copy)]
struct Context {
    scope: ScopeId,
    loop_position: LoopPosition,
    in_function: bool,
    in_for_init: bool,
}

impl Context {
    fn root(scope: ScopeId) -> Self {
        Self {
            scope,
            loop_position: LoopPosition::Outside,
            in_function: false,
            in_for_init: false,
        }
    }

    fn with_scope(self, scope: ScopeId) -> Self {
        Self { scope, ..self }
    }
}

/// Result of looking a name up in the scope chain
enum Resolved {
    Variable { scope: ScopeId, ty: Name },
    Function { id: FunctionId, parameters: Vec<Name>, returns: Vec<Name> },
    Missing,
}

/// Semantic analyzer for one block of Yul code
pub struct AsmAnalyzer<'a> {
    info: &'a mut AnalysisInfo,
    reporter: &'a mut ErrorReporter,
    names: &'a NameRepository,
    checker: TypeChecker<'a>,
    resolver: Option<&'a dyn ExternalResolver>,
    data_names: BTreeSet<String>,
    active: HashSet<VariableId>,
    effects: EffectCollector,
    side_effects: SideEffects,
}

impl<'a> AsmAnalyzer<'a> {
    pub fn new(
        info: &'a mut AnalysisInfo,
        reporter: &'a mut ErrorReporter,
        names: &'a NameRepository,
        data_names: BTreeSet<String>,
    ) -> Self {
        Self {
            info,
            reporter,
            names,
            checker: TypeChecker::new(names),
            resolver: None,
            data_names,
            active: HashSet::new(),
            effects: EffectCollector::new(),
            side_effects: SideEffects::none(),
        }
    }

    pub fn with_resolver(mut self, resolver: &'a dyn ExternalResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Analyze a top-level block
    ///
    /// Returns true if no error was reported during this call.
    pub fn analyze(&mut self, block: &Block) -> bool {
        let errors_before = self.reporter.error_count();

        let root = self.open_scope(block, None);
        self.visit_statements(Context::root(root), &block.statements);
        self.close_scope(root, block);

        let effects = mem::take(&mut self.effects);
        self.side_effects += effects.finish(self.info);

        self.reporter.error_count() == errors_before
    }

    /// Everything the analyzed code may do, function bodies included
    pub fn side_effects(&self) -> SideEffects {
        self.side_effects
    }

    /// Analyze code that is known to be correct
    ///
    /// # Panics
    ///
    /// Panics with the collected diagnostics if analysis reports an error.
    pub fn analyze_strict_assert_correct(
        names: &NameRepository,
        block: &Block,
        data_names: BTreeSet<String>,
    ) -> AnalysisInfo {
        let mut info = AnalysisInfo::new();
        let mut reporter = ErrorReporter::new();
        let success = AsmAnalyzer::new(&mut info, &mut reporter, names, data_names).analyze(block);
        assert!(
            success && !reporter.has_errors(),
            "invalid Yul code:\n{}",
            reporter
                .diagnostics()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        );
        info
    }

    /// Strict analysis of an object's code with its data names
    pub fn analyze_strict_assert_correct_object(names: &NameRepository, object: &Object) -> AnalysisInfo {
        Self::analyze_strict_assert_correct(names, &object.code, object.qualified_data_names())
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    fn open_scope(&mut self, block: &Block, parent: Option<ScopeId>) -> ScopeId {
        assert!(
            !self.info.block_scopes.contains_key(&block.id),
            "block {} entered twice",
            block.id.0
        );
        let scope = self.info.add_scope(parent, false);
        self.info.block_scopes.insert(block.id, scope);
        self.effects.enter_block(block.id);

        for function in block.functions() {
            self.register_function(scope, function);
        }
        scope
    }

    fn close_scope(&mut self, scope: ScopeId, block: &Block) {
        let variables: Vec<_> = self.info.scope(scope).variables().collect();
        for name in variables {
            self.active.remove(&(scope, name));
        }
        self.effects.exit_block(block.id);
    }

    fn register_function(&mut self, scope: ScopeId, function: &FunctionDefinition) {
        let parameters = self.declared_types(&function.parameters);
        let returns = self.declared_types(&function.returns);
        if self.check_declaration(scope, function.name, function.name_span, "Function") {
            self.info
                .scope_mut(scope)
                .insert_function(function.name, parameters, returns);
        }
    }

    fn declared_types(&mut self, variables: &[TypedName]) -> Vec<Name> {
        let mut types = Vec::with_capacity(variables.len());
        for variable in variables {
            types.push(self.checker.declared_type(variable.ty, variable.span, self.reporter));
        }
        types
    }

    /// Check a new name against reserved names and everything visible from
    /// `scope`; returns false if the name must not be registered
    fn check_declaration(&mut self, scope: ScopeId, name: Name, span: Span, what: &str) -> bool {
        let text = self.names.resolve(name);
        if self.names.dialect().is_reserved(text) {
            self.reporter.declaration_error(
                format!("Cannot use builtin function name \"{}\" as identifier name.", text),
                span,
            );
        } else if text.starts_with(RESERVED_PREFIX) {
            self.reporter.declaration_error(
                format!("The identifier \"{}\" is reserved and can not be used.", text),
                span,
            );
        }

        if self.info.exists(scope, name) {
            self.reporter.declaration_error(
                format!("{} name {} already taken in this scope.", what, text),
                span,
            );
            return false;
        }
        true
    }

    fn resolve_local(&self, scope: ScopeId, name: Name) -> Resolved {
        match self.info.lookup(scope, name) {
            Some((scope, Symbol::Variable { ty })) => Resolved::Variable { scope, ty: *ty },
            Some((scope, Symbol::Function { parameters, returns })) => Resolved::Function {
                id: FunctionId { scope, name },
                parameters: parameters.clone(),
                returns: returns.clone(),
            },
            None => Resolved::Missing,
        }
    }

    fn resolve_external(&self, name: Name, access: AccessKind, span: Span) -> Option<Name> {
        let text = self.names.resolve(name);
        let access = if access == AccessKind::Read
            && LOCATION_SUFFIXES.iter().any(|suffix| text.ends_with(suffix))
        {
            AccessKind::AddressOf
        } else {
            access
        };
        self.resolver
            .and_then(|resolver| resolver.resolve(name, access, span))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn visit_block(&mut self, ctx: Context, block: &Block) {
        let scope = self.open_scope(block, Some(ctx.scope));
        self.visit_statements(ctx.with_scope(scope), &block.statements);
        self.close_scope(scope, block);
    }

    fn visit_statements(&mut self, ctx: Context, statements: &[Stmt]) {
        for stmt in statements {
            self.visit_statement(ctx, stmt);
        }
    }

    fn visit_statement(&mut self, ctx: Context, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Expression(expr) => {
                if let Some(values) = self.visit_expression(ctx, expr) {
                    if !values.is_empty() {
                        self.reporter.arity_error(
                            format!(
                                "Top-level expressions are not supposed to return values \
                                 (this expression returns {} value{}). Use ``pop()`` or assign them.",
                                values.len(),
                                if values.len() == 1 { "" } else { "s" }
                            ),
                            expr.span,
                        );
                    }
                }
            }
            StmtKind::Assignment { variables, value } => {
                self.visit_assignment(ctx, variables, value, stmt.span);
            }
            StmtKind::VariableDeclaration { variables, value } => {
                self.visit_variable_declaration(ctx, variables, value.as_ref(), stmt.span);
            }
            StmtKind::FunctionDefinition(function) => self.visit_function_definition(ctx, function),
            StmtKind::If { condition, body } => {
                self.expect_bool_expression(ctx, condition);
                self.visit_block(ctx, body);
            }
            StmtKind::Switch { expression, cases } => self.visit_switch(ctx, expression, cases, stmt.span),
            StmtKind::ForLoop(for_loop) => self.visit_for_loop(ctx, for_loop),
            StmtKind::Break => self.check_loop_keyword(ctx, "break", stmt.span),
            StmtKind::Continue => self.check_loop_keyword(ctx, "continue", stmt.span),
            StmtKind::Leave => {
                if !ctx.in_function {
                    self.reporter.control_flow_error(
                        "Keyword \"leave\" can only be used inside a function.",
                        stmt.span,
                    );
                }
            }
            StmtKind::Block(block) => self.visit_block(ctx, block),
        }
    }

    fn visit_assignment(&mut self, ctx: Context, variables: &[Identifier], value: &Expr, span: Span) {
        let mut seen = HashSet::new();
        for variable in variables {
            if !seen.insert(variable.name) {
                self.reporter.declaration_error(
                    format!(
                        "Variable {} occurs multiple times on the left-hand side of the assignment.",
                        self.names.resolve(variable.name)
                    ),
                    variable.span,
                );
            }
        }

        let values = match self.visit_expression(ctx, value) {
            Some(values) if values.len() != variables.len() => {
                self.reporter.arity_error(
                    format!(
                        "Variable count for assignment to \"{}\" does not match number of values ({} vs. {})",
                        self.names.join(variables.iter().map(|v| v.name)),
                        variables.len(),
                        values.len()
                    ),
                    span,
                );
                None
            }
            values => values,
        };

        for (i, variable) in variables.iter().enumerate() {
            let given = values.as_ref().map(|values| values[i]);
            self.check_assignment(ctx, *variable, given);
        }
    }

    /// Check one assignment target; on failure the assignment is treated as
    /// if it had succeeded
    fn check_assignment(&mut self, ctx: Context, variable: Identifier, given: Option<Name>) {
        let names = self.names;
        let text = names.resolve(variable.name);

        let declared = match self.resolve_local(ctx.scope, variable.name) {
            Resolved::Variable { scope, ty } => {
                if !self.active.contains(&(scope, variable.name)) {
                    self.reporter.undeclared(
                        format!("Variable {} used before it was declared.", text),
                        variable.span,
                    );
                }
                Some(ty)
            }
            Resolved::Function { .. } => {
                self.reporter.type_error("Assignment requires variable.", variable.span);
                None
            }
            Resolved::Missing if names.builtin(variable.name).is_some() => {
                self.reporter.type_error("Assignment requires variable.", variable.span);
                None
            }
            Resolved::Missing => {
                let resolved = self.resolve_external(variable.name, AccessKind::Write, variable.span);
                if resolved.is_none() {
                    self.reporter.undeclared(
                        "Variable not found or variable not lvalue.",
                        variable.span,
                    );
                }
                resolved
            }
        };

        if let (Some(declared), Some(given)) = (declared, given) {
            if declared != given {
                self.reporter.type_error(
                    format!(
                        "Assigning a value of type \"{}\" to a variable of type \"{}\".",
                        names.display_type(given),
                        names.display_type(declared)
                    ),
                    variable.span,
                );
            }
        }
    }

    fn visit_variable_declaration(
        &mut self,
        ctx: Context,
        variables: &[TypedName],
        value: Option<&Expr>,
        span: Span,
    ) {
        let names = self.names;
        let types = self.declared_types(variables);

        // The initializer cannot see the variables it initializes.
        if let Some(values) = value.and_then(|value| self.visit_expression(ctx, value)) {
            if values.len() != variables.len() {
                self.reporter.arity_error(
                    format!(
                        "Variable count mismatch for declaration of \"{}\": {} variables and {} values.",
                        names.join(variables.iter().map(|v| v.name)),
                        variables.len(),
                        values.len()
                    ),
                    span,
                );
            } else {
                for ((variable, declared), given) in variables.iter().zip(&types).zip(&values) {
                    if declared != given {
                        self.reporter.type_error(
                            format!(
                                "Assigning value of type \"{}\" to variable of type \"{}\".",
                                names.display_type(*given),
                                names.display_type(*declared)
                            ),
                            variable.span,
                        );
                    }
                }
            }
        }

        for (variable, ty) in variables.iter().zip(types) {
            if self.check_declaration(ctx.scope, variable.name, variable.span, "Variable") {
                self.info.scope_mut(ctx.scope).insert_variable(variable.name, ty);
                self.active.insert((ctx.scope, variable.name));
            }
        }
    }

    fn visit_function_definition(&mut self, ctx: Context, function: &FunctionDefinition) {
        if ctx.in_for_init {
            self.reporter.declaration_error(
                "Functions cannot be defined inside a for-loop init block.",
                function.name_span,
            );
        }

        let id = FunctionId {
            scope: ctx.scope,
            name: function.name,
        };
        let parameters_scope = self.info.add_scope(Some(ctx.scope), true);
        self.info.function_scopes.insert(function.body.id, parameters_scope);

        // Outer variables are invisible inside the body.
        let outer_active = mem::take(&mut self.active);
        for variable in function.parameters.iter().chain(&function.returns) {
            let ty = variable.ty.unwrap_or(self.names.default_type());
            if self.check_declaration(parameters_scope, variable.name, variable.span, "Variable") {
                self.info
                    .scope_mut(parameters_scope)
                    .insert_variable(variable.name, ty);
                self.active.insert((parameters_scope, variable.name));
            }
        }

        let body_ctx = Context {
            scope: parameters_scope,
            loop_position: LoopPosition::Outside,
            in_function: true,
            in_for_init: false,
        };
        self.effects.enter_function(id);
        self.visit_block(body_ctx, &function.body);
        self.effects.exit_function(id);

        self.active = outer_active;
    }

    fn visit_switch(&mut self, ctx: Context, expression: &Expr, cases: &[Case], span: Span) {
        let condition = self.expect_expression(ctx, expression);

        if cases.len() == 1 && cases[0].is_default() {
            self.reporter.warning(
                ErrorKind::DuplicateCaseValue,
                "Switch statement with only a default case.",
                span,
            );
        }

        let mut seen: HashSet<(Name, U256)> = HashSet::new();
        let mut has_default = false;
        for case in cases {
            match &case.value {
                None => {
                    if has_default {
                        self.reporter.error(
                            ErrorKind::DuplicateCaseValue,
                            "Only one default case allowed.",
                            case.span,
                        );
                    }
                    has_default = true;
                }
                Some(literal) => {
                    let ty = self.checker.check_literal(literal, self.reporter);
                    if let Some(condition) = condition {
                        self.checker.expect_type(condition, ty, literal.span, self.reporter);
                    }
                    if let Some(value) = literal_value(literal) {
                        if !seen.insert((ty, value)) {
                            self.reporter.error(
                                ErrorKind::DuplicateCaseValue,
                                format!("Duplicate case \"{}\" defined.", literal.text()),
                                literal.span,
                            );
                        }
                    }
                }
            }
            self.visit_block(ctx, &case.body);
        }
    }

    /// The init block's scope stays open over condition, body and post block
    fn visit_for_loop(&mut self, ctx: Context, for_loop: &ForLoop) {
        let pre_scope = self.open_scope(&for_loop.pre, Some(ctx.scope));
        let header = Context {
            scope: pre_scope,
            loop_position: LoopPosition::Header,
            in_for_init: false,
            ..ctx
        };

        self.visit_statements(
            Context {
                in_for_init: true,
                ..header
            },
            &for_loop.pre.statements,
        );
        self.expect_bool_expression(header, &for_loop.condition);
        self.visit_block(
            Context {
                loop_position: LoopPosition::Body,
                ..header
            },
            &for_loop.body,
        );
        self.visit_block(header, &for_loop.post);

        self.effects.add(SideEffects::looping());
        self.close_scope(pre_scope, &for_loop.pre);
    }

    fn check_loop_keyword(&mut self, ctx: Context, keyword: &str, span: Span) {
        if ctx.loop_position != LoopPosition::Body {
            self.reporter.control_flow_error(
                format!("Keyword \"{}\" needs to be inside a for-loop body.", keyword),
                span,
            );
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Type labels of the values an expression yields
    ///
    /// `None` means the expression could not be resolved. The problem has
    /// already been reported and the caller skips its own arity and type
    /// checks.
    fn visit_expression(&mut self, ctx: Context, expr: &Expr) -> Option<Vec<Name>> {
        match &expr.kind {
            ExprKind::Literal(literal) => Some(vec![self.checker.check_literal(literal, self.reporter)]),
            ExprKind::Identifier(identifier) => {
                self.visit_identifier(ctx, *identifier).map(|ty| vec![ty])
            }
            ExprKind::FunctionCall(call) => self.visit_function_call(ctx, call),
        }
    }

    fn expect_expression(&mut self, ctx: Context, expr: &Expr) -> Option<Name> {
        let values = self.visit_expression(ctx, expr)?;
        if let [ty] = values.as_slice() {
            return Some(*ty);
        }
        self.reporter.arity_error(
            format!(
                "Expected expression to evaluate to one value, but got {} values instead.",
                values.len()
            ),
            expr.span,
        );
        None
    }

    fn expect_bool_expression(&mut self, ctx: Context, expr: &Expr) {
        let Some(ty) = self.expect_expression(ctx, expr) else {
            return;
        };
        let expected = self.names.bool_type();
        if ty != expected {
            self.reporter.type_error(
                format!(
                    "Expected a value of boolean type \"{}\" but got \"{}\"",
                    self.names.display_type(expected),
                    self.names.display_type(ty)
                ),
                expr.span,
            );
        }
    }

    fn visit_identifier(&mut self, ctx: Context, identifier: Identifier) -> Option<Name> {
        let names = self.names;
        let text = names.resolve(identifier.name);

        match self.resolve_local(ctx.scope, identifier.name) {
            Resolved::Variable { scope, ty } => {
                if !self.active.contains(&(scope, identifier.name)) {
                    self.reporter.undeclared(
                        format!("Variable {} used before it was declared.", text),
                        identifier.span,
                    );
                }
                Some(ty)
            }
            Resolved::Function { .. } => {
                self.reporter.type_error(
                    format!("Function {} used without being called.", text),
                    identifier.span,
                );
                None
            }
            Resolved::Missing if names.builtin(identifier.name).is_some() => {
                self.reporter.type_error(
                    format!("Builtin function \"{}\" must be called.", text),
                    identifier.span,
                );
                None
            }
            Resolved::Missing => {
                let resolved = self.resolve_external(identifier.name, AccessKind::Read, identifier.span);
                if resolved.is_none() {
                    self.reporter.undeclared(
                        format!("Identifier \"{}\" not found.", text),
                        identifier.span,
                    );
                }
                resolved
            }
        }
    }

    fn visit_function_call(&mut self, ctx: Context, call: &FunctionCall) -> Option<Vec<Name>> {
        let names = self.names;
        let callee = call.function_name;
        let text = names.resolve(callee.name);
        let builtin = names.builtin(callee.name);

        let signature = match builtin {
            Some(builtin) => {
                self.check_instruction(builtin, callee.span);
                self.effects.add(builtin.side_effects);
                let parameters = builtin.parameters.iter().map(|ty| names.type_label(ty)).collect();
                let returns = builtin.returns.iter().map(|ty| names.type_label(ty)).collect();
                Some((parameters, returns))
            }
            None => match self.resolve_local(ctx.scope, callee.name) {
                Resolved::Function { id, parameters, returns } => {
                    self.effects.add_call(id);
                    Some((parameters, returns))
                }
                Resolved::Variable { .. } => {
                    self.reporter.error(
                        ErrorKind::NotCallable,
                        "Attempt to call variable instead of function.",
                        callee.span,
                    );
                    None
                }
                Resolved::Missing => {
                    self.reporter
                        .undeclared(format!("Function \"{}\" not found.", text), callee.span);
                    None
                }
            },
        };

        if let Some((parameters, _)) = &signature {
            if parameters.len() != call.arguments.len() {
                self.reporter.arity_error(
                    format!(
                        "Function \"{}\" expects {} arguments but got {}.",
                        text,
                        parameters.len(),
                        call.arguments.len()
                    ),
                    callee.span,
                );
            }
        }

        for (i, argument) in call.arguments.iter().enumerate() {
            if let Some(kind) = builtin.and_then(|builtin| builtin.literal_argument(i)) {
                self.check_literal_argument(argument, kind);
                continue;
            }
            let given = self.expect_expression(ctx, argument);
            let expected = signature
                .as_ref()
                .and_then(|(parameters, _)| parameters.get(i).copied());
            if let (Some(expected), Some(given)) = (expected, given) {
                self.checker.expect_type(expected, given, argument.span, self.reporter);
            }
        }

        signature.map(|(_, returns)| returns)
    }

    /// Literal arguments name things; they skip the 32 byte limit
    fn check_literal_argument(&mut self, argument: &Expr, kind: LiteralArgument) {
        let Some(literal) = argument.as_literal().filter(|literal| literal.is_string()) else {
            self.reporter.literal_error(
                "Function expects direct string literals as arguments.",
                argument.span,
            );
            return;
        };
        if let Some(ty) = literal.ty {
            self.checker.check_type_name(ty, literal.span, self.reporter);
        }

        if let (LiteralArgument::DataName, LiteralValue::String(bytes)) = (kind, &literal.value) {
            let name = String::from_utf8_lossy(bytes);
            if !self.data_names.contains(name.as_ref()) {
                self.reporter
                    .undeclared(format!("Unknown data object \"{}\".", name), literal.span);
            }
        }
    }

    fn check_instruction(&mut self, builtin: &BuiltinFunction, span: Span) {
        let version = self.names.dialect().evm_version();

        if !builtin.is_available_in(version) {
            let message = match (builtin.min_version, builtin.max_version) {
                (Some(min), _) if version < min => format!(
                    "The \"{}\" instruction is only available for {}-compatible VMs \
                     (you are currently compiling for \"{}\").",
                    builtin.name,
                    min.fork_name(),
                    version
                ),
                (_, Some(max)) => format!(
                    "The \"{}\" instruction is only available up to {}-compatible VMs \
                     (you are currently compiling for \"{}\").",
                    builtin.name,
                    max.fork_name(),
                    version
                ),
                _ => format!("The \"{}\" instruction is not available.", builtin.name),
            };
            self.reporter
                .error(ErrorKind::UnsupportedInstructionForVersion, message, span);
        }

        if let Some(deprecated) = builtin.deprecated_from {
            if version >= deprecated {
                self.reporter.warning(
                    ErrorKind::UnsupportedInstructionForVersion,
                    format!(
                        "\"{}\" has been deprecated since {} and may change or be removed.",
                        builtin.name,
                        deprecated.fork_name()
                    ),
                    span,
                );
            }
        }
    }
}
