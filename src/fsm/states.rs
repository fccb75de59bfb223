//! Concrete state handler functions and table builder.
//!
//! ```text
//!            ┌──────────┐  selector  ┌───────────┐
//!            │  Manual  │◀──────────▶│ Automatic │
//!            └────┬─────┘            └─────┬─────┘
//!                 │     ┌──────────┐       │
//!                 └────▶│  Halted  │◀──────┘
//!                       └──────────┘
//! ```
//!
//! Transitions are driven entirely by the mode selector pair (decoded by
//! the drive service); the handlers below only decide direction and LED
//! outputs for the current iteration.

use log::info;

use super::context::DriveContext;
use super::{StateDescriptor, StateId};
use crate::shared::DirectionCode;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Manual
        StateDescriptor {
            id: StateId::Manual,
            name: "Manual",
            on_enter: Some(manual_enter),
            on_exit: None,
            on_update: manual_update,
        },
        // Index 1 — Automatic
        StateDescriptor {
            id: StateId::Automatic,
            name: "Automatic",
            on_enter: Some(automatic_enter),
            on_exit: None,
            on_update: automatic_update,
        },
        // Index 2 — Halted
        StateDescriptor {
            id: StateId::Halted,
            name: "Halted",
            on_enter: Some(halted_enter),
            on_exit: None,
            on_update: halted_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  MANUAL mode
// ═══════════════════════════════════════════════════════════════════════════

fn manual_enter(_ctx: &mut DriveContext) {
    info!("MANUAL: direction follows the CW/CCW selector");
}

fn manual_update(ctx: &mut DriveContext) {
    // Manual operation always releases the undervoltage stop latch.
    ctx.stop.release();

    match (ctx.switches.cw, ctx.switches.ccw) {
        (true, false) => {
            ctx.commands.direction = Some(DirectionCode::Forward);
            ctx.commands.green = Some(false);
            ctx.commands.red = Some(true);
        }
        (false, true) => {
            ctx.commands.direction = Some(DirectionCode::Reverse);
            ctx.commands.green = Some(true);
            ctx.commands.red = Some(false);
        }
        _ => {
            ctx.commands.direction = Some(DirectionCode::Brake);
            ctx.commands.green = Some(false);
            ctx.commands.red = Some(false);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  AUTOMATIC mode
// ═══════════════════════════════════════════════════════════════════════════

fn automatic_enter(_ctx: &mut DriveContext) {
    info!("AUTOMATIC: direction follows the measurement delta");
}

/// Threshold comparison on the measurement-channel delta.
///
/// The branch structure mirrors the field-proven controller logic,
/// including its `else` binding: the stop branch is evaluated only when
/// the reverse condition fails, so a delta that is simultaneously below
/// the stop threshold *and* below the direction threshold still drives
/// forward while the latch is released.  Documented in DESIGN.md; do not
/// "fix" without revisiting the commissioning data.
fn automatic_update(ctx: &mut DriveContext) {
    let threshold = ctx.config.direction_threshold(ctx.analog.threshold_trim);
    let delta = ctx.analog.measure1.abs_diff(ctx.analog.measure2);
    let running = !ctx.stop.is_stopped();

    if delta < threshold && running {
        // Delta below threshold: drive forward (CW).
        ctx.commands.direction = Some(DirectionCode::Forward);
        ctx.commands.red = Some(false);
        ctx.commands.green = Some(true);
    }
    if delta > threshold && running {
        // Delta above threshold: drive reverse (CCW).
        ctx.commands.direction = Some(DirectionCode::Reverse);
        ctx.commands.green = Some(false);
        ctx.commands.red = Some(true);
    } else if delta < ctx.config.stop_delta_threshold {
        // Supply collapsed below the stop threshold: latch stopped.
        ctx.stop.latch();
        ctx.commands.direction = Some(DirectionCode::Brake);
        ctx.commands.green = Some(false);
        ctx.commands.red = Some(false);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  HALTED mode
// ═══════════════════════════════════════════════════════════════════════════

fn halted_enter(_ctx: &mut DriveContext) {
    info!("HALTED: mode selector idle, outputs left untouched");
}

fn halted_update(_ctx: &mut DriveContext) {
    // No selector position: write nothing.  Direction, duty, and LEDs
    // all keep their previous values.
}
