//! EVM dialect: builtin table with version gating

use std::collections::HashMap;

use super::side_effects::Location;
use super::{
    BuiltinFunction, ControlFlowSideEffects, Dialect, Effect, EvmVersion, LiteralArgument,
    SideEffects,
};

/// Label used by the untyped dialect for every value
pub const UNTYPED: &str = "";
pub const U256: &str = "u256";
pub const BOOL: &str = "bool";

/// Builtins returning a truth value; typed with `bool` in the typed dialect
const COMPARISONS: [&str; 6] = ["lt", "gt", "slt", "sgt", "eq", "iszero"];

/// The EVM flavour of Yul
///
/// The untyped dialect uses a single empty type label for all values. The
/// typed dialect distinguishes `u256` and `bool`, with comparison builtins
/// returning `bool`.
pub struct EvmDialect {
    version: EvmVersion,
    default_type: &'static str,
    bool_type: &'static str,
    types: Vec<&'static str>,
    builtins: HashMap<&'static str, BuiltinFunction>,
}

impl EvmDialect {
    /// Untyped EVM dialect for the given version
    pub fn new(version: EvmVersion) -> Self {
        Self::build(version, UNTYPED, UNTYPED)
    }

    /// Typed EVM dialect (`u256` / `bool`)
    pub fn typed(version: EvmVersion) -> Self {
        Self::build(version, U256, BOOL)
    }

    fn build(version: EvmVersion, default_type: &'static str, bool_type: &'static str) -> Self {
        let types = if default_type == bool_type {
            vec![default_type]
        } else {
            vec![default_type, bool_type]
        };

        let builtins = builtin_table(default_type)
            .into_iter()
            .map(|builtin| {
                let builtin = if COMPARISONS.contains(&builtin.name) {
                    builtin.with_return_type(bool_type)
                } else {
                    builtin
                };
                (builtin.name, builtin)
            })
            .collect();

        Self {
            version,
            default_type,
            bool_type,
            types,
            builtins,
        }
    }
}

impl Dialect for EvmDialect {
    fn builtin(&self, name: &str) -> Option<&BuiltinFunction> {
        self.builtins.get(name)
    }

    fn builtin_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.builtins.keys().copied().collect();
        names.sort_unstable();
        names
    }

    fn default_type(&self) -> &'static str {
        self.default_type
    }

    fn bool_type(&self) -> &'static str {
        self.bool_type
    }

    fn types(&self) -> &[&'static str] {
        &self.types
    }

    fn evm_version(&self) -> EvmVersion {
        self.version
    }
}

fn builtin_table(ty: &'static str) -> Vec<BuiltinFunction> {
    use EvmVersion::{Byzantium, Cancun, Constantinople, Istanbul, London, Paris};
    use Location::{Memory, OtherState, Storage, TransientStorage};

    let f = |name, params, returns| BuiltinFunction::new(name, params, returns, ty);
    let pure = |name, params| f(name, params, 1);

    let mut table = Vec::new();

    // Arithmetic, comparison and bit operations
    for name in [
        "add", "sub", "mul", "div", "sdiv", "mod", "smod", "exp", "lt", "gt", "slt", "sgt", "eq",
        "and", "or", "xor", "byte", "signextend",
    ] {
        table.push(pure(name, 2));
    }
    for name in ["not", "iszero"] {
        table.push(pure(name, 1));
    }
    for name in ["addmod", "mulmod"] {
        table.push(pure(name, 3));
    }
    for name in ["shl", "shr", "sar"] {
        table.push(pure(name, 2).since(Constantinople));
    }
    table.push(f("pop", 1, 0));

    // Transaction and block environment
    for name in [
        "address", "origin", "caller", "callvalue", "calldatasize", "codesize", "gasprice",
        "coinbase", "timestamp", "number", "gaslimit",
    ] {
        table.push(pure(name, 0));
    }
    table.push(pure("calldataload", 1));
    table.push(pure("blockhash", 1));
    table.push(pure("chainid", 0).since(Istanbul));
    table.push(pure("basefee", 0).since(London));
    table.push(pure("difficulty", 0).until(London));
    table.push(pure("prevrandao", 0).since(Paris));
    table.push(pure("blobhash", 1).since(Cancun));
    table.push(pure("blobbasefee", 0).since(Cancun));
    table.push(f("gas", 0, 1).with_effects(SideEffects::volatile()));
    table.push(f("msize", 0, 1).with_effects(SideEffects::volatile()).msize());

    // External state
    table.push(f("balance", 1, 1).with_effects(SideEffects::reading(OtherState)));
    table.push(f("selfbalance", 0, 1).with_effects(SideEffects::reading(OtherState)).since(Istanbul));
    table.push(f("extcodesize", 1, 1).with_effects(SideEffects::reading(OtherState)));
    table.push(f("extcodehash", 1, 1).with_effects(SideEffects::reading(OtherState)).since(Constantinople));
    table.push(f("returndatasize", 0, 1).with_effects(SideEffects::reading(OtherState)).since(Byzantium));

    // Memory
    table.push(f("mload", 1, 1).with_effects(SideEffects::reading(Memory)));
    table.push(f("keccak256", 2, 1).with_effects(SideEffects::reading(Memory)));
    table.push(f("mstore", 2, 0).with_effects(SideEffects::writing(Memory)));
    table.push(f("mstore8", 2, 0).with_effects(SideEffects::writing(Memory)));
    table.push(f("mcopy", 3, 0).with_effects(SideEffects::writing(Memory)).since(Cancun));
    table.push(f("calldatacopy", 3, 0).with_effects(SideEffects::writing(Memory)));
    table.push(f("codecopy", 3, 0).with_effects(SideEffects::writing(Memory)));
    table.push(f("datacopy", 3, 0).with_effects(SideEffects::writing(Memory)));
    table.push(
        f("returndatacopy", 3, 0)
            .with_effects(SideEffects::writing(Memory).with(OtherState, Effect::Read))
            .since(Byzantium),
    );
    table.push(
        f("extcodecopy", 4, 0)
            .with_effects(SideEffects::writing(Memory).with(OtherState, Effect::Read)),
    );

    // Storage
    table.push(f("sload", 1, 1).with_effects(SideEffects::reading(Storage)));
    table.push(f("sstore", 2, 0).with_effects(SideEffects::writing(Storage)));
    table.push(f("tload", 1, 1).with_effects(SideEffects::reading(TransientStorage)).since(Cancun));
    table.push(f("tstore", 2, 0).with_effects(SideEffects::writing(TransientStorage)).since(Cancun));

    // Logs
    for (topics, name) in ["log0", "log1", "log2", "log3", "log4"].into_iter().enumerate() {
        table.push(
            f(name, 2 + topics, 0)
                .with_effects(SideEffects::writing(OtherState).with(Memory, Effect::Read)),
        );
    }

    // Calls and contract creation
    for (name, params) in [("call", 7), ("callcode", 7), ("delegatecall", 6)] {
        table.push(f(name, params, 1).with_effects(SideEffects::worst()));
    }
    table.push(
        f("staticcall", 6, 1)
            .with_effects(
                SideEffects::writing(Memory)
                    .with(OtherState, Effect::Read)
                    .with(Storage, Effect::Read)
                    .with(TransientStorage, Effect::Read),
            )
            .since(Byzantium),
    );
    let creation = SideEffects::writing(OtherState)
        .with(Storage, Effect::Write)
        .with(Memory, Effect::Read);
    table.push(f("create", 3, 1).with_effects(creation));
    table.push(f("create2", 4, 1).with_effects(creation).since(Constantinople));

    // Halting
    table.push(
        f("stop", 0, 0)
            .with_effects(SideEffects::halting())
            .with_control_flow(ControlFlowSideEffects::terminating()),
    );
    table.push(
        f("return", 2, 0)
            .with_effects(SideEffects::halting().with(Memory, Effect::Read))
            .with_control_flow(ControlFlowSideEffects::terminating()),
    );
    table.push(
        f("revert", 2, 0)
            .with_effects(SideEffects::halting().with(Memory, Effect::Read))
            .with_control_flow(ControlFlowSideEffects::reverting())
            .since(Byzantium),
    );
    table.push(
        f("invalid", 0, 0)
            .with_effects(SideEffects::halting())
            .with_control_flow(ControlFlowSideEffects::reverting()),
    );
    table.push(
        f("selfdestruct", 1, 0)
            .with_effects(SideEffects::halting().with(OtherState, Effect::Write))
            .with_control_flow(ControlFlowSideEffects::terminating())
            .deprecated_from(Cancun),
    );

    // Object and linker helpers taking literal names
    table.push(pure("datasize", 1).with_literal_argument(0, LiteralArgument::DataName));
    table.push(pure("dataoffset", 1).with_literal_argument(0, LiteralArgument::DataName));
    table.push(pure("linkersymbol", 1).with_literal_argument(0, LiteralArgument::Unlimited));
    table.push(pure("loadimmutable", 1).with_literal_argument(0, LiteralArgument::Unlimited));
    table.push(
        f("setimmutable", 3, 0)
            .with_effects(SideEffects::writing(Memory))
            .with_literal_argument(1, LiteralArgument::Unlimited),
    );

    table
}
