//! Analyzer tests driven by Yul source

use std::cell::RefCell;
use std::collections::BTreeSet;

use pretty_assertions::assert_eq;

use super::*;
use crate::common::{ErrorKind, ErrorReporter, Severity, Span};
use crate::dialect::{EvmDialect, EvmVersion, SideEffects};
use crate::frontend::{Block, BlockId, StmtKind, parse_block};
use crate::names::{Name, NameRepository};

struct Analysis {
    names: NameRepository,
    block: Block,
    info: AnalysisInfo,
    reporter: ErrorReporter,
    success: bool,
    side_effects: SideEffects,
}

impl Analysis {
    fn error_kinds(&self) -> Vec<ErrorKind> {
        self.reporter.errors().map(|d| d.kind).collect()
    }

    fn messages(&self) -> Vec<String> {
        self.reporter.diagnostics().iter().map(|d| d.message.clone()).collect()
    }

    fn name(&self, text: &str) -> Name {
        self.names.lookup(text).unwrap()
    }

    /// Block of the `index`-th top-level statement, which must be a block
    fn nested_block(&self, index: usize) -> &Block {
        match &self.block.statements[index].kind {
            StmtKind::Block(block) => block,
            other => panic!("statement {} is not a block: {:?}", index, other),
        }
    }
}

fn run(
    mut names: NameRepository,
    source: &str,
    data_names: BTreeSet<String>,
    resolver: Option<&dyn ExternalResolver>,
) -> Analysis {
    let block = parse_block(source, &mut names).unwrap();
    run_block(names, block, data_names, resolver)
}

fn run_block(
    names: NameRepository,
    block: Block,
    data_names: BTreeSet<String>,
    resolver: Option<&dyn ExternalResolver>,
) -> Analysis {
    let mut info = AnalysisInfo::new();
    let mut reporter = ErrorReporter::new();
    let (success, side_effects) = {
        let mut analyzer = AsmAnalyzer::new(&mut info, &mut reporter, &names, data_names);
        if let Some(resolver) = resolver {
            analyzer = analyzer.with_resolver(resolver);
        }
        let success = analyzer.analyze(&block);
        (success, analyzer.side_effects())
    };
    Analysis {
        names,
        block,
        info,
        reporter,
        success,
        side_effects,
    }
}

fn untyped(version: EvmVersion) -> NameRepository {
    NameRepository::new(EvmDialect::new(version))
}

fn typed() -> NameRepository {
    NameRepository::new(EvmDialect::typed(EvmVersion::Cancun))
}

fn analyze(source: &str) -> Analysis {
    run(untyped(EvmVersion::Cancun), source, BTreeSet::new(), None)
}

fn analyze_typed(source: &str) -> Analysis {
    run(typed(), source, BTreeSet::new(), None)
}

fn analyze_for(version: EvmVersion, source: &str) -> Analysis {
    run(untyped(version), source, BTreeSet::new(), None)
}

fn assert_ok(source: &str) {
    let analysis = analyze(source);
    assert_eq!(analysis.messages(), Vec::<String>::new(), "source: {}", source);
    assert!(analysis.success);
}

fn assert_single_error(source: &str, kind: ErrorKind) -> Analysis {
    let analysis = analyze(source);
    assert_eq!(analysis.error_kinds(), vec![kind], "source: {}", source);
    assert!(!analysis.success);
    analysis
}

// =============================================================================
// Scope resolution
// =============================================================================

#[test]
fn test_well_formed_fragment() {
    assert_ok("{ let x := 1 if x { x := 2 } }");
}

#[test]
fn test_forward_function_call() {
    assert_ok("{ f() function f() {} }");
    assert_ok("{ let r := g(1) function g(a) -> b { b := a } }");
}

#[test]
fn test_assignment_to_undeclared() {
    let analysis = assert_single_error("{ x := 1 }", ErrorKind::UndeclaredIdentifier);
    assert_eq!(analysis.reporter.len(), 1);
    assert_eq!(analysis.messages(), vec!["Variable not found or variable not lvalue."]);
}

#[test]
fn test_read_of_undeclared_completes() {
    let analysis = assert_single_error(
        "{ let y := add(x, 1) pop(y) sstore(0, y) }",
        ErrorKind::UndeclaredIdentifier,
    );
    assert_eq!(analysis.messages(), vec!["Identifier \"x\" not found."]);
    assert!(analysis.side_effects.writes_persistent_state());
}

#[test]
fn test_variable_not_visible_after_block() {
    let analysis = assert_single_error("{ { let x := 1 } x := 2 }", ErrorKind::UndeclaredIdentifier);
    let inner = analysis.nested_block(0);
    let scope = analysis.info.scope_of(inner.id).unwrap();
    assert!(scope.contains(analysis.name("x")));
}

#[test]
fn test_variable_not_usable_before_declaration() {
    assert_single_error("{ pop(x) let x := 1 }", ErrorKind::UndeclaredIdentifier);
    assert_single_error("{ let x := x }", ErrorKind::UndeclaredIdentifier);
}

#[test]
fn test_no_lexical_capture() {
    let analysis = assert_single_error(
        "{ let x := 1 function f() -> r { r := x } }",
        ErrorKind::UndeclaredIdentifier,
    );
    assert_eq!(analysis.messages(), vec!["Identifier \"x\" not found."]);
}

#[test]
fn test_functions_visible_in_functions() {
    assert_ok("{ function f() -> r { r := g() } function g() -> s { s := 1 } }");
    assert_ok("{ function outer() { function inner() {} inner() } outer() }");
}

#[test]
fn test_shadowing_is_rejected() {
    assert_single_error("{ let x := 1 { let x := 2 } }", ErrorKind::DeclarationError);
    assert_single_error("{ let x := 1 function f(x) {} }", ErrorKind::DeclarationError);
    assert_single_error("{ function f() {} function f() {} }", ErrorKind::DeclarationError);
    let analysis = assert_single_error("{ let a, a }", ErrorKind::DeclarationError);
    assert_eq!(analysis.messages(), vec!["Variable name a already taken in this scope."]);
}

#[test]
fn test_repeated_parameter_names() {
    let analysis = assert_single_error("{ function f(a, a) {} }", ErrorKind::DeclarationError);
    assert_eq!(analysis.messages(), vec!["Variable name a already taken in this scope."]);
    let analysis = assert_single_error("{ function f() -> r, r {} }", ErrorKind::DeclarationError);
    assert_eq!(analysis.messages(), vec!["Variable name r already taken in this scope."]);
    assert_single_error("{ function f(a) -> a {} }", ErrorKind::DeclarationError);
}

#[test]
fn test_sibling_blocks_may_reuse_names() {
    assert_ok("{ { let x := 1 } { let x := 2 } }");
    assert_ok("{ function f(a) {} function g(a) {} }");
}

#[test]
fn test_reserved_names() {
    assert_single_error("{ let add := 1 }", ErrorKind::DeclarationError);
    assert_single_error("{ function verbatim_1i_1o() {} }", ErrorKind::DeclarationError);
}

#[test]
fn test_names_that_must_be_called() {
    let analysis = assert_single_error("{ let x := add }", ErrorKind::TypeMismatch);
    assert_eq!(analysis.messages(), vec!["Builtin function \"add\" must be called."]);
    let analysis = assert_single_error("{ function f() {} let x := f }", ErrorKind::TypeMismatch);
    assert_eq!(analysis.messages(), vec!["Function f used without being called."]);
}

#[test]
fn test_scopes_are_recorded() {
    let analysis = analyze("{ function f(a) -> b { let c := a b := c } }");
    assert!(analysis.success);

    let function = analysis.block.functions().next().unwrap();
    let parameters = analysis.info.function_scopes[&function.body.id];
    let scope = analysis.info.scope(parameters);
    assert!(scope.function_scope);
    assert!(scope.contains(analysis.name("a")));
    assert!(scope.contains(analysis.name("b")));

    let body = analysis.info.scope_of(function.body.id).unwrap();
    assert_eq!(body.parent, Some(parameters));
    assert!(body.contains(analysis.name("c")));

    let root = analysis.info.scope_of(analysis.block.id).unwrap();
    assert!(matches!(root.get(analysis.name("f")), Some(Symbol::Function { parameters, returns })
        if parameters.len() == 1 && returns.len() == 1));
}

#[test]
#[should_panic(expected = "entered twice")]
fn test_block_entered_twice_panics() {
    let mut names = untyped(EvmVersion::Cancun);
    let block = parse_block("{ }", &mut names).unwrap();
    let mut info = AnalysisInfo::new();
    let mut reporter = ErrorReporter::new();
    let mut analyzer = AsmAnalyzer::new(&mut info, &mut reporter, &names, BTreeSet::new());
    analyzer.analyze(&block);
    analyzer.analyze(&block);
}

// =============================================================================
// Types and value counts
// =============================================================================

#[test]
fn test_declaration_value_count() {
    let analysis = assert_single_error("{ let a, b := add(1, 2) }", ErrorKind::ArityMismatch);
    assert_eq!(
        analysis.messages(),
        vec!["Variable count mismatch for declaration of \"a, b\": 2 variables and 1 values."]
    );
    assert_single_error("{ let x := sstore(0, 0) }", ErrorKind::ArityMismatch);
    assert_ok("{ let a, b := f() function f() -> x, y {} }");
    assert_ok("{ let a, b }");
}

#[test]
fn test_assignment_value_count() {
    assert_single_error("{ let a, b a, b := add(1, 2) }", ErrorKind::ArityMismatch);
    assert_single_error(
        "{ let a := 1 a, a := f() function f() -> x, y {} }",
        ErrorKind::DeclarationError,
    );
}

#[test]
fn test_call_arity() {
    let analysis = assert_single_error("{ pop(add(1)) }", ErrorKind::ArityMismatch);
    assert_eq!(analysis.messages(), vec!["Function \"add\" expects 2 arguments but got 1."]);
    assert_single_error("{ f(1) function f() {} }", ErrorKind::ArityMismatch);
}

#[test]
fn test_expression_statement_must_not_return() {
    assert_single_error("{ add(1, 2) }", ErrorKind::ArityMismatch);
    assert_single_error("{ 1 }", ErrorKind::ArityMismatch);
    assert_ok("{ pop(add(1, 2)) }");
}

#[test]
fn test_argument_must_be_single_value() {
    let analysis = assert_single_error("{ pop(f()) function f() {} }", ErrorKind::ArityMismatch);
    assert_eq!(
        analysis.messages(),
        vec!["Expected expression to evaluate to one value, but got 0 values instead."]
    );
}

#[test]
fn test_unknown_function_does_not_cascade() {
    let analysis = assert_single_error("{ if foo() { } }", ErrorKind::UndeclaredIdentifier);
    assert_eq!(analysis.messages(), vec!["Function \"foo\" not found."]);

    let analysis = analyze("{ let y := foo(bar) pop(y) }");
    assert_eq!(
        analysis.error_kinds(),
        vec![ErrorKind::UndeclaredIdentifier, ErrorKind::UndeclaredIdentifier]
    );
}

#[test]
fn test_calling_a_variable() {
    let analysis = assert_single_error("{ let x := 1 x() }", ErrorKind::NotCallable);
    assert_eq!(analysis.messages(), vec!["Attempt to call variable instead of function."]);
}

#[test]
fn test_assignment_to_function() {
    assert_single_error("{ function f() {} f := 1 }", ErrorKind::TypeMismatch);
}

#[test]
fn test_typed_dialect_conditions() {
    let analysis = analyze_typed("{ if 1 { } }");
    assert_eq!(analysis.error_kinds(), vec![ErrorKind::TypeMismatch]);

    let analysis = analyze_typed("{ if lt(1, 2) { } let b:bool := true if b { } for { } b { } { } }");
    assert!(analysis.success, "{:?}", analysis.messages());
}

#[test]
fn test_typed_declaration_without_value() {
    let analysis = analyze_typed("{ let a if a { } }");
    assert_eq!(analysis.error_kinds(), vec![ErrorKind::TypeMismatch]);
    assert_eq!(
        analysis.messages(),
        vec!["Expected a value of boolean type \"bool\" but got \"u256\""]
    );
    assert!(analyze_typed("{ let a:bool if a { } }").success);
}

#[test]
fn test_typed_dialect_assignments() {
    let analysis = analyze_typed("{ let x:bool := 1 }");
    assert_eq!(analysis.error_kinds(), vec![ErrorKind::TypeMismatch]);

    let analysis = analyze_typed("{ let x := 1 x := true }");
    assert_eq!(analysis.error_kinds(), vec![ErrorKind::TypeMismatch]);

    let analysis = analyze_typed("{ function f(a:bool) {} f(1) }");
    assert_eq!(analysis.error_kinds(), vec![ErrorKind::TypeMismatch]);
}

#[test]
fn test_invalid_type_name() {
    let analysis = analyze_typed("{ let x:u257 }");
    assert_eq!(analysis.error_kinds(), vec![ErrorKind::TypeMismatch]);
    assert!(analysis.messages()[0].contains("is not a valid type"));
}

#[test]
fn test_literal_limits() {
    assert_single_error(
        &format!("{{ let x := 0x1{} }}", "0".repeat(64)),
        ErrorKind::InvalidLiteral,
    );
    assert_single_error(
        &format!("{{ let s := \"{}\" }}", "a".repeat(33)),
        ErrorKind::InvalidLiteral,
    );
    assert_ok(&format!("{{ let s := \"{}\" }}", "a".repeat(32)));
}

#[test]
fn test_typed_literals() {
    let analysis = analyze_typed("{ let x:bool := 1:bool }");
    assert_eq!(analysis.error_kinds(), vec![ErrorKind::InvalidLiteral]);

    let analysis = analyze_typed("{ let x := true:u256 }");
    assert_eq!(analysis.error_kinds(), vec![ErrorKind::InvalidLiteral]);
}

// =============================================================================
// Control flow
// =============================================================================

#[test]
fn test_loop_keywords() {
    assert_ok("{ for { } 1 { } { break continue } }");
    assert_ok("{ for { } 1 { } { if 1 { { break } } } }");

    let analysis = assert_single_error("{ break }", ErrorKind::InvalidControlFlowTarget);
    assert_eq!(analysis.messages(), vec!["Keyword \"break\" needs to be inside a for-loop body."]);
    assert_single_error("{ for { break } 1 { } { } }", ErrorKind::InvalidControlFlowTarget);
    assert_single_error("{ for { } 1 { continue } { } }", ErrorKind::InvalidControlFlowTarget);
    assert_single_error(
        "{ for { } 1 { } { function f() { break } } }",
        ErrorKind::InvalidControlFlowTarget,
    );
}

#[test]
fn test_leave_needs_function() {
    assert_ok("{ function f() { leave } }");
    assert_ok("{ function f() { for { } 1 { } { leave } } }");
    assert_single_error("{ leave }", ErrorKind::InvalidControlFlowTarget);
    assert_single_error("{ for { } 1 { } { leave } }", ErrorKind::InvalidControlFlowTarget);
}

#[test]
fn test_for_init_scope() {
    assert_ok("{ for { let i := 0 } lt(i, 10) { i := add(i, 1) } { pop(i) } }");
    assert_single_error("{ for { let i := 0 } 0 { } { } pop(i) }", ErrorKind::UndeclaredIdentifier);
    assert_single_error("{ for { function f() { } } 1 { } { } }", ErrorKind::DeclarationError);
    assert_ok("{ for { } 1 { } { function f() { } } }");
}

#[test]
fn test_switch_cases() {
    let analysis = assert_single_error("{ switch 1 case 1 {} case 1 {} }", ErrorKind::DuplicateCaseValue);
    assert_eq!(analysis.messages(), vec!["Duplicate case \"1\" defined."]);

    assert_ok("{ switch calldataload(0) case 0 { } case 1 { } default { } }");
    assert_single_error("{ switch 1 case 1 {} case 0x01 {} }", ErrorKind::DuplicateCaseValue);
}

#[test]
fn test_second_default_case() {
    // The parser rejects this, so build the switch by hand.
    let mut names = untyped(EvmVersion::Cancun);
    let mut block = parse_block("{ switch 1 case 0 {} default {} }", &mut names).unwrap();
    let StmtKind::Switch { cases, .. } = &mut block.statements[0].kind else {
        panic!("expected switch");
    };
    let mut second = cases[1].clone();
    second.body.id = BlockId(1000);
    cases.push(second);

    let analysis = run_block(names, block, BTreeSet::new(), None);
    assert_eq!(analysis.error_kinds(), vec![ErrorKind::DuplicateCaseValue]);
    assert_eq!(analysis.messages(), vec!["Only one default case allowed."]);
}

#[test]
fn test_switch_with_only_default_warns() {
    let analysis = analyze("{ switch 1 default { } }");
    assert!(analysis.success);
    assert_eq!(analysis.reporter.len(), 1);
    assert_eq!(analysis.reporter.diagnostics()[0].severity, Severity::Warning);
    assert_eq!(analysis.reporter.diagnostics()[0].kind, ErrorKind::DuplicateCaseValue);
}

#[test]
fn test_typed_switch_case_type() {
    let analysis = analyze_typed("{ switch 1 case true { } }");
    assert_eq!(analysis.error_kinds(), vec![ErrorKind::TypeMismatch]);
}

#[test]
fn test_case_bodies_are_scopes() {
    assert_ok("{ switch 1 case 0 { let x := 1 } default { let x := 2 } }");
}

// =============================================================================
// Side effects
// =============================================================================

#[test]
fn test_callers_inherit_persistent_writes() {
    let analysis = analyze(
        "{
            function f() { sstore(0, 1) }
            function g() { f() }
            { g() }
            { pop(1) }
        }",
    );
    assert!(analysis.success);

    let caller = analysis.nested_block(2);
    let bystander = analysis.nested_block(3);
    assert!(analysis.info.block_side_effects[&caller.id].writes_persistent_state());
    assert!(!analysis.info.block_side_effects[&bystander.id].writes_persistent_state());
    assert!(analysis.info.block_side_effects[&analysis.block.id].writes_persistent_state());
    assert!(analysis.side_effects.writes_persistent_state());
}

#[test]
fn test_function_effects() {
    let analysis = analyze("{ function f() { f() } function g() -> r { r := mload(0) } }");
    assert!(analysis.success);

    let root = analysis.info.block_scopes[&analysis.block.id];
    let f = FunctionId { scope: root, name: analysis.name("f") };
    let g = FunctionId { scope: root, name: analysis.name("g") };
    assert!(analysis.info.function_side_effects[&f].may_not_terminate());
    assert!(!analysis.info.function_side_effects[&g].may_not_terminate());
    assert!(!analysis.info.function_side_effects[&g].writes_persistent_state());
    assert!(analysis.side_effects.may_not_terminate());
}

#[test]
fn test_loops_may_not_terminate() {
    let analysis = analyze("{ for { } 1 { } { } }");
    assert!(analysis.side_effects.may_not_terminate());
    assert!(!analysis.side_effects.is_removable());

    let analysis = analyze("{ let x := add(1, 2) }");
    assert!(!analysis.side_effects.may_not_terminate());
    assert!(analysis.side_effects.is_removable());
    assert_eq!(analysis.side_effects, SideEffects::none());
}

// =============================================================================
// Builtins and external names
// =============================================================================

#[test]
fn test_version_gating() {
    for version in EvmVersion::ALL {
        let analysis = analyze_for(version, "{ pop(shl(1, 2)) }");
        assert_eq!(analysis.success, version >= EvmVersion::Constantinople, "{}", version);
    }

    let analysis = analyze_for(EvmVersion::Byzantium, "{ pop(shl(1, 2)) }");
    assert_eq!(analysis.error_kinds(), vec![ErrorKind::UnsupportedInstructionForVersion]);
    assert_eq!(
        analysis.messages(),
        vec![
            "The \"shl\" instruction is only available for Constantinople-compatible VMs \
             (you are currently compiling for \"byzantium\")."
        ]
    );
}

#[test]
fn test_removed_instructions() {
    let analysis = analyze_for(EvmVersion::Paris, "{ pop(difficulty()) }");
    assert_eq!(analysis.error_kinds(), vec![ErrorKind::UnsupportedInstructionForVersion]);
    assert_eq!(
        analysis.messages(),
        vec![
            "The \"difficulty\" instruction is only available up to London-compatible VMs \
             (you are currently compiling for \"paris\")."
        ]
    );
    assert!(analyze_for(EvmVersion::London, "{ pop(difficulty()) }").success);
    assert!(!analyze_for(EvmVersion::London, "{ pop(prevrandao()) }").success);
}

#[test]
fn test_deprecated_instruction_warns() {
    let analysis = analyze("{ selfdestruct(0) }");
    assert!(analysis.success);
    assert_eq!(analysis.reporter.len(), 1);
    assert_eq!(analysis.reporter.diagnostics()[0].severity, Severity::Warning);
    assert!(analyze_for(EvmVersion::Shanghai, "{ selfdestruct(0) }").reporter.is_empty());
}

#[test]
fn test_data_names() {
    let data_names: BTreeSet<String> = ["runtime".to_string()].into();
    let analysis = run(
        untyped(EvmVersion::Cancun),
        "{ datacopy(0, dataoffset(\"runtime\"), datasize(\"runtime\")) }",
        data_names,
        None,
    );
    assert!(analysis.success, "{:?}", analysis.messages());

    let analysis = assert_single_error("{ pop(datasize(\"runtime\")) }", ErrorKind::UndeclaredIdentifier);
    assert_eq!(analysis.messages(), vec!["Unknown data object \"runtime\"."]);
    assert_single_error("{ pop(datasize(1)) }", ErrorKind::InvalidLiteral);
}

#[test]
fn test_literal_arguments_skip_length_limit() {
    let name = "a".repeat(60);
    assert_ok(&format!("{{ pop(linkersymbol(\"{}\")) }}", name));
    assert_ok(&format!("{{ setimmutable(0, \"{}\", 1) }}", name));
}

#[test]
fn test_external_resolver() {
    let names = untyped(EvmVersion::Cancun);
    let default_type = names.default_type();
    let accesses = RefCell::new(Vec::new());
    let resolver = |_: Name, access: AccessKind, _: Span| {
        accesses.borrow_mut().push(access);
        Some(default_type)
    };

    let analysis = run(names, "{ sstore(0, x.slot) y := 1 pop(z) }", BTreeSet::new(), Some(&resolver));
    assert!(analysis.success, "{:?}", analysis.messages());
    assert_eq!(
        *accesses.borrow(),
        vec![AccessKind::AddressOf, AccessKind::Write, AccessKind::Read]
    );
}

#[test]
fn test_resolver_may_decline() {
    let resolver = |_: Name, _: AccessKind, _: Span| None;
    let analysis = run(untyped(EvmVersion::Cancun), "{ pop(x) }", BTreeSet::new(), Some(&resolver));
    assert_eq!(analysis.error_kinds(), vec![ErrorKind::UndeclaredIdentifier]);
}

// =============================================================================
// Runs and entry points
// =============================================================================

#[test]
fn test_many_diagnostics_per_run() {
    let analysis = analyze("{ x := 1 y := 2 break leave }");
    assert_eq!(
        analysis.error_kinds(),
        vec![
            ErrorKind::UndeclaredIdentifier,
            ErrorKind::UndeclaredIdentifier,
            ErrorKind::InvalidControlFlowTarget,
            ErrorKind::InvalidControlFlowTarget,
        ]
    );
}

#[test]
fn test_success_counts_only_this_run() {
    let mut names = untyped(EvmVersion::Cancun);
    let bad = parse_block("{ x := 1 }", &mut names).unwrap();
    let good = parse_block("{ let y := 1 }", &mut names).unwrap();
    let mut reporter = ErrorReporter::new();

    let mut info = AnalysisInfo::new();
    assert!(!AsmAnalyzer::new(&mut info, &mut reporter, &names, BTreeSet::new()).analyze(&bad));
    let mut info = AnalysisInfo::new();
    assert!(AsmAnalyzer::new(&mut info, &mut reporter, &names, BTreeSet::new()).analyze(&good));
    assert_eq!(reporter.error_count(), 1);
}

#[test]
fn test_strict_entry_point() {
    let mut names = untyped(EvmVersion::Cancun);
    let block = parse_block("{ function f(a) -> b { b := a } sstore(0, f(1)) }", &mut names).unwrap();
    let info = AsmAnalyzer::analyze_strict_assert_correct(&names, &block, BTreeSet::new());
    assert!(info.block_scopes.contains_key(&block.id));
    assert!(info.side_effects.writes_persistent_state());
}

#[test]
fn test_strict_entry_point_for_objects() {
    let mut names = untyped(EvmVersion::Cancun);
    let source = r#"
        object "Token" {
            code { datacopy(0, dataoffset("Runtime"), datasize("Runtime")) return(0, datasize("Runtime")) }
            object "Runtime" { code { stop() } }
        }
    "#;
    let object = crate::frontend::parse_source(source, &mut names).unwrap();
    let info = AsmAnalyzer::analyze_strict_assert_correct_object(&names, &object);
    assert_eq!(info.block_scopes.len(), 1);
}

#[test]
#[should_panic(expected = "invalid Yul code")]
fn test_strict_entry_point_panics_on_errors() {
    let mut names = untyped(EvmVersion::Cancun);
    let block = parse_block("{ x := 1 }", &mut names).unwrap();
    AsmAnalyzer::analyze_strict_assert_correct(&names, &block, BTreeSet::new());
}
