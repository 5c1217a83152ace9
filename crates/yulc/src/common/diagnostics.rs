//! Diagnostic collection for semantic analysis
//!
//! The analyzer never stops at the first problem. Every finding is recorded
//! here together with its severity, kind and source location, and the run is
//! considered successful when no error-severity entry was added.

use std::fmt;

use super::Span;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Category of a semantic diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A name that is neither declared, active nor externally resolved
    UndeclaredIdentifier,
    /// Redeclaration, shadowing or use of a reserved name
    DeclarationError,
    /// Two type labels that should be equal are not
    TypeMismatch,
    /// Wrong number of values or arguments
    ArityMismatch,
    /// Call of something that is not a function
    NotCallable,
    /// Repeated `case` value or repeated `default`
    ///
    /// Also the kind of the warning for a switch whose only case is
    /// `default`.
    DuplicateCaseValue,
    /// `break`, `continue` or `leave` outside of their legal context
    InvalidControlFlowTarget,
    /// Builtin not available for the selected EVM version
    UnsupportedInstructionForVersion,
    /// Malformed or out-of-range literal
    InvalidLiteral,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::UndeclaredIdentifier => "undeclared identifier",
            ErrorKind::DeclarationError => "declaration error",
            ErrorKind::TypeMismatch => "type error",
            ErrorKind::ArityMismatch => "arity mismatch",
            ErrorKind::NotCallable => "not callable",
            ErrorKind::DuplicateCaseValue => "duplicate case",
            ErrorKind::InvalidControlFlowTarget => "invalid control flow",
            ErrorKind::UnsupportedInstructionForVersion => "unsupported instruction",
            ErrorKind::InvalidLiteral => "invalid literal",
        };
        f.write_str(text)
    }
}

/// A single recorded finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) at {}: {}", self.severity, self.kind, self.span, self.message)
    }
}

/// Collector for diagnostics produced during a run
#[derive(Debug, Default)]
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, severity: Severity, kind: ErrorKind, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic {
            severity,
            kind,
            message: message.into(),
            span,
        });
    }

    pub fn error(&mut self, kind: ErrorKind, message: impl Into<String>, span: Span) {
        self.report(Severity::Error, kind, message, span);
    }

    pub fn warning(&mut self, kind: ErrorKind, message: impl Into<String>, span: Span) {
        self.report(Severity::Warning, kind, message, span);
    }

    pub fn undeclared(&mut self, message: impl Into<String>, span: Span) {
        self.error(ErrorKind::UndeclaredIdentifier, message, span);
    }

    pub fn declaration_error(&mut self, message: impl Into<String>, span: Span) {
        self.error(ErrorKind::DeclarationError, message, span);
    }

    pub fn type_error(&mut self, message: impl Into<String>, span: Span) {
        self.error(ErrorKind::TypeMismatch, message, span);
    }

    pub fn arity_error(&mut self, message: impl Into<String>, span: Span) {
        self.error(ErrorKind::ArityMismatch, message, span);
    }

    pub fn literal_error(&mut self, message: impl Into<String>, span: Span) {
        self.error(ErrorKind::InvalidLiteral, message, span);
    }

    pub fn control_flow_error(&mut self, message: impl Into<String>, span: Span) {
        self.error(ErrorKind::InvalidControlFlowTarget, message, span);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of errors of the given kind
    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.errors().filter(|d| d.kind == kind).count()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
