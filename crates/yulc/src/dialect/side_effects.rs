//! Side-effect summaries
//!
//! A [`SideEffects`] value describes the worst behavior a piece of code may
//! exhibit. Summaries form a join semilattice: `+=` keeps the worse of each
//! flag, so merging can only make a summary more pessimistic.

use std::fmt;
use std::ops::{Add, AddAssign};

/// Access level to one kind of state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Effect {
    #[default]
    None,
    Read,
    Write,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::None => write!(f, "none"),
            Effect::Read => write!(f, "read"),
            Effect::Write => write!(f, "write"),
        }
    }
}

/// Kind of state a builtin can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Storage,
    TransientStorage,
    Memory,
    /// Balances, code, logs and everything else outside the current frame
    OtherState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SideEffects {
    /// Can be evaluated at any other point without changing the outcome
    pub movable: bool,
    /// Deterministic given its arguments and the state it reads
    pub movable_apart_from_effects: bool,
    /// Can be removed if its result is unused
    pub can_be_removed: bool,
    /// Can be removed if the program never inspects `msize`
    pub can_be_removed_if_no_msize: bool,
    /// Always terminates
    pub cannot_loop: bool,
    pub other_state: Effect,
    pub storage: Effect,
    pub transient_storage: Effect,
    pub memory: Effect,
}

impl SideEffects {
    /// No side effects at all
    pub const fn none() -> Self {
        Self {
            movable: true,
            movable_apart_from_effects: true,
            can_be_removed: true,
            can_be_removed_if_no_msize: true,
            cannot_loop: true,
            other_state: Effect::None,
            storage: Effect::None,
            transient_storage: Effect::None,
            memory: Effect::None,
        }
    }

    /// Everything that can go wrong does
    pub const fn worst() -> Self {
        Self {
            movable: false,
            movable_apart_from_effects: false,
            can_be_removed: false,
            can_be_removed_if_no_msize: false,
            cannot_loop: false,
            other_state: Effect::Write,
            storage: Effect::Write,
            transient_storage: Effect::Write,
            memory: Effect::Write,
        }
    }

    /// Effects of code that may not terminate (loops, recursion)
    pub const fn looping() -> Self {
        let mut effects = Self::none();
        effects.movable = false;
        effects.can_be_removed = false;
        effects.can_be_removed_if_no_msize = false;
        effects.cannot_loop = false;
        effects
    }

    /// Result depends on hidden machine state (e.g. `gas`)
    pub const fn volatile() -> Self {
        let mut effects = Self::none();
        effects.movable = false;
        effects.movable_apart_from_effects = false;
        effects
    }

    /// Reads `location` without modifying anything
    pub fn reading(location: Location) -> Self {
        let mut effects = Self::none();
        effects.movable = false;
        if location == Location::Memory {
            // Touching memory may expand it, which `msize` observes.
            effects.can_be_removed = false;
        }
        effects.set(location, Effect::Read);
        effects
    }

    /// Writes `location`
    pub fn writing(location: Location) -> Self {
        let mut effects = Self::none();
        effects.movable = false;
        effects.can_be_removed = false;
        effects.can_be_removed_if_no_msize = false;
        effects.set(location, Effect::Write);
        effects
    }

    /// Ends execution of the current call frame
    pub fn halting() -> Self {
        let mut effects = Self::none();
        effects.movable = false;
        effects.movable_apart_from_effects = false;
        effects.can_be_removed = false;
        effects.can_be_removed_if_no_msize = false;
        effects
    }

    pub fn set(&mut self, location: Location, effect: Effect) {
        let slot = match location {
            Location::Storage => &mut self.storage,
            Location::TransientStorage => &mut self.transient_storage,
            Location::Memory => &mut self.memory,
            Location::OtherState => &mut self.other_state,
        };
        *slot = (*slot).max(effect);
    }

    pub fn with(mut self, location: Location, effect: Effect) -> Self {
        self.set(location, effect);
        self
    }

    /// Storage or external state (logs, balances, code) may be modified
    pub fn writes_persistent_state(&self) -> bool {
        self.storage == Effect::Write || self.other_state == Effect::Write
    }

    pub fn may_not_terminate(&self) -> bool {
        !self.cannot_loop
    }

    pub fn is_removable(&self) -> bool {
        self.can_be_removed
    }

    pub fn is_worst(&self) -> bool {
        *self == Self::worst()
    }
}

impl Default for SideEffects {
    fn default() -> Self {
        Self::none()
    }
}

impl AddAssign for SideEffects {
    fn add_assign(&mut self, other: Self) {
        self.movable &= other.movable;
        self.movable_apart_from_effects &= other.movable_apart_from_effects;
        self.can_be_removed &= other.can_be_removed;
        self.can_be_removed_if_no_msize &= other.can_be_removed_if_no_msize;
        self.cannot_loop &= other.cannot_loop;
        self.other_state = self.other_state.max(other.other_state);
        self.storage = self.storage.max(other.storage);
        self.transient_storage = self.transient_storage.max(other.transient_storage);
        self.memory = self.memory.max(other.memory);
    }
}

impl Add for SideEffects {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl fmt::Display for SideEffects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "movable: {}", self.movable)?;
        writeln!(f, "movable apart from effects: {}", self.movable_apart_from_effects)?;
        writeln!(f, "can be removed: {}", self.can_be_removed)?;
        writeln!(f, "can be removed if no msize: {}", self.can_be_removed_if_no_msize)?;
        writeln!(f, "cannot loop: {}", self.cannot_loop)?;
        writeln!(f, "other state: {}", self.other_state)?;
        writeln!(f, "storage: {}", self.storage)?;
        writeln!(f, "transient storage: {}", self.transient_storage)?;
        write!(f, "memory: {}", self.memory)
    }
}

/// How a builtin may leave the current control flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlFlowSideEffects {
    /// May end execution successfully (`stop`, `return`)
    pub can_terminate: bool,
    /// May end execution with a revert
    pub can_revert: bool,
    /// May return to its caller
    pub can_continue: bool,
}

impl ControlFlowSideEffects {
    pub const fn continuing() -> Self {
        Self {
            can_terminate: false,
            can_revert: false,
            can_continue: true,
        }
    }

    pub const fn terminating() -> Self {
        Self {
            can_terminate: true,
            can_revert: false,
            can_continue: false,
        }
    }

    pub const fn reverting() -> Self {
        Self {
            can_terminate: false,
            can_revert: true,
            can_continue: false,
        }
    }
}

impl Default for ControlFlowSideEffects {
    fn default() -> Self {
        Self::continuing()
    }
}
