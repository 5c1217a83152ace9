//! Semantic analysis for Yul
//!
//! The analyzer resolves names against block scopes, checks type labels and
//! value counts, validates control flow and builtin use, and summarizes side
//! effects. Results are stored in an [`AnalysisInfo`] owned by the caller.

mod analyzer;
mod effects;
mod scope;
mod semantics;
mod types;

#[cfg(test)]
mod tests;

pub use analyzer::{AccessKind, AsmAnalyzer, ExternalResolver};
pub use effects::EffectCollector;
pub use scope::{AnalysisInfo, FunctionId, Scope, ScopeId, Symbol, VariableId};
pub use semantics::{ControlFlow, TerminationFinder, contains_msize, object_contains_msize};
pub use types::{MAX_STRING_LITERAL_LEN, TypeChecker, U256, literal_value};
