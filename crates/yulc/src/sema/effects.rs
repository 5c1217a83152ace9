//! Side-effect collection and propagation over the call graph
//!
//! While the analyzer walks the tree, every block and every function body
//! gets a frame that collects the effects of the builtins it calls directly
//! and the user functions it calls. Blocks merge into their parent when they
//! are left; function bodies are kept apart as the direct facts of their
//! function.
//!
//! Once traversal is done, [`EffectCollector::finish`] folds callee facts
//! into callers. Each function's summary joins the direct facts of every
//! function reachable from it, found by a depth-first search with a visited
//! set. There is no fixpoint iteration and no path sensitivity: a callee
//! counts fully even if the call sits behind a branch that never runs, and
//! anything reaching a call cycle is treated as possibly non-terminating.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::scope::{AnalysisInfo, FunctionId};
use crate::dialect::SideEffects;
use crate::frontend::ast::BlockId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Block(BlockId),
    Function(FunctionId),
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    effects: SideEffects,
    callees: BTreeSet<FunctionId>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            effects: SideEffects::none(),
            callees: BTreeSet::new(),
        }
    }
}

/// Direct facts recorded for a block or function
#[derive(Debug, Default)]
struct Facts {
    effects: SideEffects,
    callees: BTreeSet<FunctionId>,
}

/// Collects effect frames during traversal
#[derive(Debug, Default)]
pub struct EffectCollector {
    frames: Vec<Frame>,
    blocks: Vec<(BlockId, Facts)>,
    functions: HashMap<FunctionId, Facts>,
    total: SideEffects,
}

impl EffectCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_block(&mut self, block: BlockId) {
        self.frames.push(Frame::new(FrameKind::Block(block)));
    }

    /// Leave the innermost block and merge it into its parent frame
    pub fn exit_block(&mut self, block: BlockId) {
        let frame = self.pop(FrameKind::Block(block));
        if let Some(parent) = self.frames.last_mut() {
            parent.effects += frame.effects;
            parent.callees.extend(frame.callees.iter().copied());
        }
        self.blocks.push((
            block,
            Facts {
                effects: frame.effects,
                callees: frame.callees,
            },
        ));
    }

    pub fn enter_function(&mut self, function: FunctionId) {
        self.frames.push(Frame::new(FrameKind::Function(function)));
    }

    /// Leave a function body; its facts do not flow into the enclosing block
    pub fn exit_function(&mut self, function: FunctionId) {
        let frame = self.pop(FrameKind::Function(function));
        let facts = self.functions.entry(function).or_default();
        facts.effects += frame.effects;
        facts.callees.extend(frame.callees);
    }

    /// Record effects of the current frame
    pub fn add(&mut self, effects: SideEffects) {
        self.total += effects;
        if let Some(frame) = self.frames.last_mut() {
            frame.effects += effects;
        }
    }

    /// Record a call of a user-defined function from the current frame
    pub fn add_call(&mut self, function: FunctionId) {
        if let Some(frame) = self.frames.last_mut() {
            frame.callees.insert(function);
        }
    }

    fn pop(&mut self, expected: FrameKind) -> Frame {
        match self.frames.pop() {
            Some(frame) if frame.kind == expected => frame,
            other => panic!(
                "unbalanced effect frames: expected {:?}, found {:?}",
                expected,
                other.map(|frame| frame.kind)
            ),
        }
    }

    /// Propagate callee facts and store all summaries in `info`
    ///
    /// Returns the union over everything visited.
    pub fn finish(self, info: &mut AnalysisInfo) -> SideEffects {
        debug_assert!(self.frames.is_empty(), "effect frames left open");

        let graph = CallGraph::new(&self.functions);
        let summaries: HashMap<FunctionId, SideEffects> = self
            .functions
            .keys()
            .map(|function| (*function, graph.summarize(*function)))
            .collect();

        let mut total = self.total;
        for summary in summaries.values() {
            total += *summary;
        }

        for (block, facts) in self.blocks {
            let mut effects = facts.effects;
            for callee in &facts.callees {
                if let Some(summary) = summaries.get(callee) {
                    effects += *summary;
                }
            }
            info.block_side_effects.insert(block, effects);
        }
        info.function_side_effects.extend(summaries);
        info.side_effects += total;

        total
    }
}

/// Static call graph over the recorded function facts
struct CallGraph<'a> {
    functions: &'a HashMap<FunctionId, Facts>,
    recursive: HashSet<FunctionId>,
}

impl<'a> CallGraph<'a> {
    fn new(functions: &'a HashMap<FunctionId, Facts>) -> Self {
        let mut graph = Self {
            functions,
            recursive: HashSet::new(),
        };
        let recursive = functions
            .keys()
            .copied()
            .filter(|function| graph.reachable(*function).contains(function))
            .collect();
        graph.recursive = recursive;
        graph
    }

    /// Functions reachable through at least one call
    fn reachable(&self, from: FunctionId) -> HashSet<FunctionId> {
        let mut visited = HashSet::new();
        let mut stack: Vec<FunctionId> = self.callees(from).collect();
        while let Some(function) = stack.pop() {
            if visited.insert(function) {
                stack.extend(self.callees(function));
            }
        }
        visited
    }

    fn callees(&self, function: FunctionId) -> impl Iterator<Item = FunctionId> + '_ {
        self.functions
            .get(&function)
            .into_iter()
            .flat_map(|facts| facts.callees.iter().copied())
    }

    fn direct(&self, function: FunctionId) -> SideEffects {
        self.functions
            .get(&function)
            .map(|facts| facts.effects)
            .unwrap_or_default()
    }

    fn summarize(&self, function: FunctionId) -> SideEffects {
        let mut effects = self.direct(function);
        let mut may_recurse = self.recursive.contains(&function);
        for callee in self.reachable(function) {
            effects += self.direct(callee);
            may_recurse |= self.recursive.contains(&callee);
        }
        if may_recurse {
            effects += SideEffects::looping();
        }
        effects
    }
}
