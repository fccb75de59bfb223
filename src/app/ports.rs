//! Port traits — the boundary between the drive logic and the hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DriveService / TimingCore (domain)
//! ```
//!
//! Driven adapters (GPIO lines, the converter, event sinks) implement
//! these traits.  The domain consumes them via generics, so the core
//! logic never touches a hardware register directly and every interrupt
//! handler is testable against a fake register file.
//!
//! Contract notes:
//!
//! - [`MotorPort`] is called from interrupt context; implementations must
//!   be bounded, short, and must never block.
//! - [`AdcEventSink`] runs inside the conversion-complete handler at
//!   interrupt priority; implementations must not block either.

use crate::adc::{ClockDivisor, MuxSelect};
use crate::app::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Motor output lines (domain → hardware, interrupt context)
// ───────────────────────────────────────────────────────────────

/// One of the three H-bridge control lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorLine {
    Forward,
    Reverse,
    Enable,
}

/// Register-level line actuation for the motor output stage.
pub trait MotorPort {
    /// Drive a line high.
    fn set_line(&mut self, line: MotorLine);

    /// Drive a line low.
    fn clear_line(&mut self, line: MotorLine);
}

// ───────────────────────────────────────────────────────────────
// Status LEDs (domain → hardware, foreground)
// ───────────────────────────────────────────────────────────────

pub trait LedPort {
    fn set_green(&mut self, on: bool);
    fn set_red(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Selector switches (hardware → domain, foreground)
// ───────────────────────────────────────────────────────────────

/// Raw line levels of the two selector pairs.  Lines idle high through
/// pull-ups; a pair selects a position only when exactly one of its two
/// lines is high.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchSnapshot {
    pub manual: bool,
    pub automatic: bool,
    pub cw: bool,
    pub ccw: bool,
}

pub trait SwitchPort {
    fn read_switches(&mut self) -> SwitchSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Analog snapshot (hardware → domain, foreground)
// ───────────────────────────────────────────────────────────────

/// One decision-loop iteration's worth of analog inputs, 8-bit like the
/// decision math that consumes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalogSnapshot {
    /// Speed potentiometer — written straight into the duty register.
    pub speed: u8,
    /// Threshold trim potentiometer.
    pub threshold_trim: u8,
    /// Measurement input 1.
    pub measure1: u8,
    /// Measurement input 2.
    pub measure2: u8,
}

/// Read-side port: the decision loop obtains its analog inputs here.
/// Backed by blocking reads or by the scan engine's stored samples,
/// depending on the acquisition mode.
pub trait AnalogPort {
    fn read_analog(&mut self) -> AnalogSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Analog converter (domain ↔ hardware)
// ───────────────────────────────────────────────────────────────

/// Register-level access to the analog-to-digital converter.
///
/// The basic driver uses `select_input` → settle → `sample10`; the scan
/// engine reprograms the multiplexer from inside its conversion-complete
/// handler while the hardware keeps auto-retriggering.
pub trait AdcPort {
    /// Power the converter up in continuous (auto-retriggered) mode.
    fn enable(&mut self, clk: ClockDivisor);

    /// Power the converter down.
    fn disable(&mut self);

    /// Program the multiplexer.  The next one or two conversions after a
    /// switch are settling artifacts and must not be trusted.
    fn select_input(&mut self, mux: MuxSelect);

    /// Read the most recently completed 10-bit conversion.
    fn sample10(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Trigger event callback (scan engine → collaborator, ISR context)
// ───────────────────────────────────────────────────────────────

/// Synchronous, in-handler delivery of channel trigger events.
///
/// Fire-and-forget: events are not stored by the engine.  The sink runs
/// at interrupt priority and must return quickly — a typical impl packs
/// the event into the lock-free queue in [`crate::events`].
#[cfg(feature = "adc-scan")]
pub trait AdcEventSink {
    fn on_adc_event(&mut self, channel: u8, event: crate::adc::scan::TriggerEvent);
}

// ───────────────────────────────────────────────────────────────
// Application event sink (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The drive service emits structured [`AppEvent`]s through this port.
/// Adapters decide where they go (serial log, diagnostics history, …).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
