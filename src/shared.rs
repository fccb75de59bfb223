//! Shared drive state — the contract between foreground and interrupt context.
//!
//! The decision loop writes a direction code and a duty-cycle (compare)
//! value once per iteration; the timer compare-match handler reads the
//! direction every period, and the simulated/hardware timer compares the
//! free-running counter against the duty value.
//!
//! Both fields are individual `AtomicU8`s, which removes any torn
//! single-field read.  The *pair* is still not updated atomically: an
//! interrupt between the two stores can observe a fresh direction with a
//! stale duty (or vice versa) for one period.  That pairing window is an
//! accepted tradeoff of the single-writer/single-reader design and is
//! bounded by one timer period.
//!
//! Discipline: foreground loop is the only writer, interrupt handlers the
//! only readers.  Manual and automatic mode never write concurrently
//! because only one mode branch executes per loop iteration.

use core::sync::atomic::{AtomicU8, Ordering};

// ---------------------------------------------------------------------------
// Direction code
// ---------------------------------------------------------------------------

/// The 2-bit direction code shared between the decision loop and the
/// compare-match handler.  Any discriminant outside the three named
/// drive codes decodes to `Undefined`, which the output stage maps to
/// Brake (fail-safe default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DirectionCode {
    Undefined = 0,
    Forward = 1,
    Reverse = 2,
    Brake = 3,
}

impl DirectionCode {
    /// Decode a raw shared-state byte.
    pub fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Forward,
            2 => Self::Reverse,
            3 => Self::Brake,
            _ => Self::Undefined,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared state cell
// ---------------------------------------------------------------------------

/// Process-wide drive state, shared by reference between the foreground
/// task and the timer handlers.
pub struct SharedDriveState {
    direction: AtomicU8,
    duty: AtomicU8,
}

impl SharedDriveState {
    /// Boot state: no direction decided yet, duty at the stopped value.
    pub const fn new() -> Self {
        Self {
            direction: AtomicU8::new(DirectionCode::Undefined as u8),
            duty: AtomicU8::new(255),
        }
    }

    pub fn set_direction(&self, code: DirectionCode) {
        self.direction.store(code as u8, Ordering::Relaxed);
    }

    pub fn direction(&self) -> DirectionCode {
        DirectionCode::from_u8(self.direction.load(Ordering::Relaxed))
    }

    /// Write the 8-bit compare threshold.  The counter's on-window runs
    /// from compare-match to overflow, so a *higher* duty value means a
    /// *shorter* drive window (255 = stopped).
    pub fn set_duty(&self, duty: u8) {
        self.duty.store(duty, Ordering::Relaxed);
    }

    pub fn duty(&self) -> u8 {
        self.duty.load(Ordering::Relaxed)
    }
}

impl Default for SharedDriveState {
    fn default() -> Self {
        Self::new()
    }
}

/// The one shared instance, referenced by the timer handlers and the
/// decision loop.  Static so interrupt callbacks can reach it without
/// captured state.
pub static DRIVE: SharedDriveState = SharedDriveState::new();
