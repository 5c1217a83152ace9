//! Common infrastructure shared by the frontend, the analyzer and the driver

mod diagnostics;
mod error;
mod span;

pub use diagnostics::{Diagnostic, ErrorKind, ErrorReporter, Severity};
pub use error::{CompileError, CompileResult, DiagnosticReporter};
pub use span::Span;
