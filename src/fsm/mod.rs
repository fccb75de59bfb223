//! Function-pointer finite state machine for the operating mode.
//!
//! Classic embedded FSM pattern: a fixed table of state descriptors,
//! each holding plain `fn` pointers — no closures, no dynamic dispatch,
//! no heap.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  StateTable                                             │
//! │  ┌───────────┬───────────┬──────────┬────────────────┐  │
//! │  │ StateId   │ on_enter  │ on_exit  │ on_update      │  │
//! │  ├───────────┼───────────┼──────────┼────────────────┤  │
//! │  │ Manual    │ fn(ctx)   │ fn(ctx)  │ fn(ctx)        │  │
//! │  │ Automatic │ fn(ctx)   │ fn(ctx)  │ fn(ctx)        │  │
//! │  │ Halted    │ fn(ctx)   │ fn(ctx)  │ fn(ctx)        │  │
//! │  └───────────┴───────────┴──────────┴────────────────┘  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Unlike a self-transitioning FSM, the mode here is decided *outside*
//! the states: the drive service maps the selector switch pair to a
//! `StateId` at the top of every iteration and forces the transition
//! before ticking.  State `on_update` handlers only compute drive
//! commands — they never return a next state.

pub mod context;
pub mod states;

use context::DriveContext;
use log::info;

use crate::app::ports::SwitchSnapshot;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Operating modes of the drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    /// Direction follows the CW/CCW selector.
    Manual = 0,
    /// Direction derived from the measurement-channel delta.
    Automatic = 1,
    /// Selector idle or ambiguous: outputs are left untouched.
    Halted = 2,
}

impl StateId {
    /// Total number of states — sizes the table array.
    pub const COUNT: usize = 3;

    /// Convert a table index back to a `StateId`.  Debug-asserts on
    /// out-of-range; falls back to `Halted` in release (safe default).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Manual,
            1 => Self::Automatic,
            2 => Self::Halted,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Halted
            }
        }
    }

    /// Decode the mode selector pair.  Exactly one high line selects its
    /// mode; none or both yields `Halted`.
    pub fn from_switches(sw: SwitchSnapshot) -> Self {
        match (sw.manual, sw.automatic) {
            (true, false) => Self::Manual,
            (false, true) => Self::Automatic,
            _ => Self::Halted,
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut DriveContext);

/// Signature for the per-iteration update handler.
pub type StateUpdateFn = fn(&mut DriveContext);

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The mode state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    current: usize,
    tick_count: u64,
    state_entry_tick: u64,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut DriveContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Run the current state's `on_update` for one iteration.
    pub fn tick(&mut self, ctx: &mut DriveContext) {
        self.tick_count += 1;
        ctx.ticks_in_state = self.tick_count - self.state_entry_tick;
        (self.table[self.current].on_update)(ctx);
    }

    /// Transition immediately (used by the drive service when the mode
    /// selector moves).  No-op when already in `next`.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut DriveContext) {
        if next as usize == self.current {
            return;
        }
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }
        self.current = next as usize;
        self.state_entry_tick = self.tick_count;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }
}
