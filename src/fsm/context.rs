//! Shared mutable context threaded through every state handler.
//!
//! `DriveContext` is the blackboard the mode handlers read from and
//! write to: the latest switch and analog snapshots on the way in, the
//! drive commands on the way out.  The service clears the commands
//! before each tick and applies whatever the handler filled in — a
//! handler that writes nothing (Halted) leaves every output untouched,
//! exactly like a loop iteration that takes no branch.

use crate::app::ports::{AnalogSnapshot, SwitchSnapshot};
use crate::config::SystemConfig;
use crate::safety::StopLatch;
use crate::shared::DirectionCode;

// ---------------------------------------------------------------------------
// Drive commands (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Per-iteration output requests.  `None` means "leave as is".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveCommands {
    /// Requested direction code for the shared state.
    pub direction: Option<DirectionCode>,
    /// Requested green LED level.
    pub green: Option<bool>,
    /// Requested red LED level.
    pub red: Option<bool>,
}

impl DriveCommands {
    /// No requests — the Halted iteration shape.
    pub fn none() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// DriveContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct DriveContext {
    /// Iterations since the current mode was entered.
    pub ticks_in_state: u64,

    /// Latest selector switch levels.  Updated before each tick.
    pub switches: SwitchSnapshot,
    /// Latest analog snapshot.  Updated before each tick.
    pub analog: AnalogSnapshot,

    /// Output requests for this iteration.
    pub commands: DriveCommands,

    /// System configuration (thresholds, slopes).
    pub config: SystemConfig,

    /// Undervoltage stop latch — latched by the automatic handler,
    /// released by the manual handler.
    pub stop: StopLatch,
}

impl DriveContext {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            ticks_in_state: 0,
            switches: SwitchSnapshot::default(),
            analog: AnalogSnapshot::default(),
            commands: DriveCommands::none(),
            config,
            stop: StopLatch::new(),
        }
    }
}
