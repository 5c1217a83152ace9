//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{Buffer, ColorChoice, StandardStream, WriteColor};
use thiserror::Error;

use super::{Diagnostic, Severity, Span};

/// Compile error with source location
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("Analysis failed with {errors} error(s)")]
    Analysis { errors: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn analysis(errors: usize) -> Self {
        Self::Analysis { errors }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    pub fn report_error(&self, file_id: usize, error: &CompileError) {
        let diagnostic = Self::convert_error(file_id, error);
        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }

    /// Print every collected semantic diagnostic
    pub fn report_diagnostics(&self, file_id: usize, diagnostics: &[Diagnostic]) {
        let mut writer = self.writer.lock();
        for diagnostic in diagnostics {
            let _ = self.emit_to(&mut writer, file_id, diagnostic);
        }
    }

    /// Render a semantic diagnostic without colors
    pub fn render(&self, file_id: usize, diagnostic: &Diagnostic) -> String {
        let mut buffer = Buffer::no_color();
        let _ = self.emit_to(&mut buffer, file_id, diagnostic);
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }

    fn emit_to(
        &self,
        writer: &mut dyn WriteColor,
        file_id: usize,
        diagnostic: &Diagnostic,
    ) -> Result<(), codespan_reporting::files::Error> {
        let converted = Self::convert_diagnostic(file_id, diagnostic);
        term::emit(writer, &self.config, &self.files, &converted)
    }

    fn convert_diagnostic(file_id: usize, diagnostic: &Diagnostic) -> CodespanDiagnostic<usize> {
        let base = match diagnostic.severity {
            Severity::Error => CodespanDiagnostic::error(),
            Severity::Warning => CodespanDiagnostic::warning(),
        };
        base.with_message(diagnostic.message.clone())
            .with_notes(vec![format!("kind: {}", diagnostic.kind)])
            .with_labels(vec![Label::primary(file_id, diagnostic.span.range())])
    }

    fn convert_error(file_id: usize, error: &CompileError) -> CodespanDiagnostic<usize> {
        match error {
            CompileError::Lexer { message, span } => CodespanDiagnostic::error()
                .with_message("Lexer error")
                .with_labels(vec![
                    Label::primary(file_id, span.range()).with_message(message)
                ]),

            CompileError::Parser { message, span } => CodespanDiagnostic::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, span.range()).with_message(message)
                ]),

            CompileError::Analysis { errors } => CodespanDiagnostic::error()
                .with_message(format!("analysis failed with {} error(s)", errors)),

            CompileError::Io(err) => {
                CodespanDiagnostic::error().with_message(format!("IO error: {}", err))
            }
        }
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
