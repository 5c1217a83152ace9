//! Builtin function descriptors

use super::{ControlFlowSideEffects, EvmVersion, SideEffects};

/// Arguments that must be given as string literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralArgument {
    /// Must name a known data object (`datasize("runtime")`)
    DataName,
    /// Any string, not limited to 32 bytes
    Unlimited,
}

/// Description of one builtin function of a dialect
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub parameters: Vec<&'static str>,
    pub returns: Vec<&'static str>,
    pub side_effects: SideEffects,
    pub control_flow: ControlFlowSideEffects,
    /// One entry per parameter, `None` for ordinary expressions
    pub literal_arguments: Vec<Option<LiteralArgument>>,
    pub is_msize: bool,
    /// First version providing the builtin
    pub min_version: Option<EvmVersion>,
    /// Last version providing the builtin
    pub max_version: Option<EvmVersion>,
    /// Version from which on uses are warned about
    pub deprecated_from: Option<EvmVersion>,
}

impl BuiltinFunction {
    pub fn new(name: &'static str, parameters: usize, returns: usize, ty: &'static str) -> Self {
        Self {
            name,
            parameters: vec![ty; parameters],
            returns: vec![ty; returns],
            side_effects: SideEffects::none(),
            control_flow: ControlFlowSideEffects::continuing(),
            literal_arguments: vec![None; parameters],
            is_msize: false,
            min_version: None,
            max_version: None,
            deprecated_from: None,
        }
    }

    pub fn with_effects(mut self, side_effects: SideEffects) -> Self {
        self.side_effects = side_effects;
        self
    }

    pub fn with_control_flow(mut self, control_flow: ControlFlowSideEffects) -> Self {
        self.control_flow = control_flow;
        self
    }

    pub fn with_literal_argument(mut self, index: usize, kind: LiteralArgument) -> Self {
        if let Some(slot) = self.literal_arguments.get_mut(index) {
            *slot = Some(kind);
        }
        self
    }

    pub fn with_return_type(mut self, ty: &'static str) -> Self {
        for ret in &mut self.returns {
            *ret = ty;
        }
        self
    }

    pub fn since(mut self, version: EvmVersion) -> Self {
        self.min_version = Some(version);
        self
    }

    pub fn until(mut self, version: EvmVersion) -> Self {
        self.max_version = Some(version);
        self
    }

    pub fn deprecated_from(mut self, version: EvmVersion) -> Self {
        self.deprecated_from = Some(version);
        self
    }

    pub fn msize(mut self) -> Self {
        self.is_msize = true;
        self
    }

    pub fn literal_argument(&self, index: usize) -> Option<LiteralArgument> {
        self.literal_arguments.get(index).copied().flatten()
    }

    pub fn is_available_in(&self, version: EvmVersion) -> bool {
        self.min_version.is_none_or(|min| version >= min)
            && self.max_version.is_none_or(|max| version <= max)
    }
}
