//! Dialects: which builtins and types exist for a target
//!
//! The analyzer only consults a dialect through the [`Dialect`] trait, so a
//! registry for a different target can be plugged in without touching the
//! analysis itself.

mod builtin;
mod evm;
mod side_effects;
mod version;

pub use builtin::{BuiltinFunction, LiteralArgument};
pub use evm::{BOOL, EvmDialect, U256, UNTYPED};
pub use side_effects::{ControlFlowSideEffects, Effect, Location, SideEffects};
pub use version::{EvmVersion, UnknownEvmVersion};

/// Read-only catalogue of builtins and type labels
///
/// Shared between analyzer instances, hence `Send + Sync`.
pub trait Dialect: Send + Sync {
    /// Look up a builtin by name
    fn builtin(&self, name: &str) -> Option<&BuiltinFunction>;

    /// Names of all builtins
    fn builtin_names(&self) -> Vec<&'static str>;

    /// Label of values without an explicit type
    fn default_type(&self) -> &'static str;

    /// Label required for conditions
    fn bool_type(&self) -> &'static str;

    /// All valid type labels
    fn types(&self) -> &[&'static str];

    /// Target version builtins are checked against
    fn evm_version(&self) -> EvmVersion;

    /// Whether `name` may not be used for user declarations
    fn is_reserved(&self, name: &str) -> bool {
        self.builtin(name).is_some()
    }
}
