//! Yul semantic analyzer
//!
//! This library parses Yul, the intermediate assembly language of the EVM
//! toolchain, and checks it against an EVM dialect before any later stage
//! consumes it.
//!
//! ## Architecture
//!
//! The analyzer is organized into:
//! - **Frontend** (`frontend/`): Lexing and parsing of code blocks and objects
//! - **Dialect** (`dialect/`): EVM builtins, versions and side-effect facts
//! - **Names** (`names`): Interned identifiers and type labels
//! - **Semantic analysis** (`sema/`): Scopes, types, control flow, side effects
//! - **Common** (`common/`): Shared infrastructure (errors, spans, diagnostics)
//! - **Driver** (`driver/`): Pipeline used by the `yulc` binary

pub mod common;
pub mod dialect;
pub mod driver;
pub mod frontend;
pub mod names;
pub mod sema;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, DiagnosticReporter, ErrorReporter, Span};
pub use dialect::{Dialect, EvmDialect, EvmVersion, SideEffects};
pub use driver::{AnalyzerConfig, Pipeline};
pub use names::{Name, NameRepository};
pub use sema::{AnalysisInfo, AsmAnalyzer};
