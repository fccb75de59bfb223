//! Timing core — the compare-match / overflow interrupt pair.
//!
//! One free-running 8-bit counter in normal (count-to-overflow) mode
//! generates two interrupt sources per period:
//!
//! - **Compare match** (counter == duty register): read the shared
//!   direction code and assert the matching output pattern.
//! - **Overflow** (counter wraps to zero): unconditionally assert Brake.
//!
//! The overflow brake is the safety net: the motor output returns to a
//! safe state at least once per period even if the compare path never
//! fires (duty register at an unreachable value) or misbehaves.  The
//! drive window therefore runs from compare-match to overflow — a higher
//! duty register value means a shorter on-window, and 255 means stopped.
//!
//! Both handlers run at interrupt priority: no blocking, no allocation,
//! no error reporting.  Misconfiguration is a config-time concern.
//!
//! On the firmware target the period cadence comes from
//! [`crate::drivers::hw_timer`]; on the host, [`CounterSim`] replays the
//! counter cycle-accurately for tests.

use crate::app::ports::MotorPort;
use crate::drivers::motor::MotorStage;
use crate::shared::{DirectionCode, SharedDriveState};

// ---------------------------------------------------------------------------
// Prescaler selection
// ---------------------------------------------------------------------------

/// Clock prescaler feeding the 8-bit output timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPrescaler {
    Div1,
    Div8,
    Div64,
    Div256,
    Div1024,
}

impl TimerPrescaler {
    pub fn divisor(self) -> u32 {
        match self {
            Self::Div1 => 1,
            Self::Div8 => 8,
            Self::Div64 => 64,
            Self::Div256 => 256,
            Self::Div1024 => 1024,
        }
    }

    /// Full 256-count period in microseconds for a given input clock.
    pub fn period_us(self, clock_hz: u32) -> u32 {
        // 256 counter ticks per period; widen before the multiply.
        (u64::from(256 * self.divisor()) * 1_000_000 / u64::from(clock_hz)) as u32
    }
}

// ---------------------------------------------------------------------------
// Handler object
// ---------------------------------------------------------------------------

/// Explicit handler object for the timer interrupt pair.
///
/// Owns the motor output stage and a borrow of the shared drive state.
/// Registered with the platform timer (or stepped by [`CounterSim`]).
pub struct TimingCore<P: MotorPort> {
    stage: MotorStage<P>,
    drive: &'static SharedDriveState,
}

impl<P: MotorPort> TimingCore<P> {
    pub fn new(stage: MotorStage<P>, drive: &'static SharedDriveState) -> Self {
        Self { stage, drive }
    }

    /// Compare-match handler: assert the pattern for the current shared
    /// direction code.  Undefined decodes map to Brake inside the stage.
    pub fn on_compare_match(&mut self) {
        let code = self.drive.direction();
        self.stage.apply(code);
    }

    /// Overflow handler: force Brake, whatever the direction code says.
    pub fn on_overflow(&mut self) {
        self.stage.apply(DirectionCode::Brake);
    }

    pub fn drive(&self) -> &'static SharedDriveState {
        self.drive
    }

    pub fn stage(&self) -> &MotorStage<P> {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut MotorStage<P> {
        &mut self.stage
    }
}

// ---------------------------------------------------------------------------
// Host-side counter simulation
// ---------------------------------------------------------------------------

/// Cycle-accurate replay of the free-running counter for host tests.
///
/// Each `step` advances the counter by one tick, firing the overflow
/// handler on wrap and the compare handler whenever the counter equals
/// the live duty register — the same order the hardware produces them
/// when both fall on the same count.
pub struct CounterSim<P: MotorPort> {
    core: TimingCore<P>,
    counter: u8,
}

impl<P: MotorPort> CounterSim<P> {
    pub fn new(core: TimingCore<P>) -> Self {
        Self { core, counter: 0 }
    }

    pub fn step(&mut self) {
        self.counter = self.counter.wrapping_add(1);
        if self.counter == 0 {
            self.core.on_overflow();
        }
        if self.counter == self.core.drive.duty() {
            self.core.on_compare_match();
        }
    }

    /// Run `n` counter ticks.
    pub fn run(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }

    pub fn core(&self) -> &TimingCore<P> {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut TimingCore<P> {
        &mut self.core
    }
}
