//! Motor output stage — H-bridge line actuation.
//!
//! Stateless translation of a [`DirectionCode`] into the three physical
//! line states.  Runs inside the timer interrupt handlers, so every path
//! is a fixed, short sequence of line writes.
//!
//! Brake truth table: both legs asserted = dynamic braking.  For the
//! drive codes, the new leg is asserted *before* the old one is
//! deasserted, so the only transient combination observable between the
//! two writes is the (safe) brake pattern, never a floating coast.

use crate::app::ports::{MotorLine, MotorPort};
use crate::shared::DirectionCode;

/// The output stage.  Owns its line port; consumed by the timing core.
pub struct MotorStage<P: MotorPort> {
    port: P,
}

impl<P: MotorPort> MotorStage<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    /// Assert the enable line.  Called once at startup; this stage never
    /// deasserts it (a separate concern).
    pub fn enable_driver(&mut self) {
        self.port.set_line(MotorLine::Enable);
    }

    /// Apply a direction code to the output lines.  Unrecognized codes
    /// map to Brake (fail-safe default).
    pub fn apply(&mut self, code: DirectionCode) {
        match code {
            DirectionCode::Forward => {
                self.port.set_line(MotorLine::Forward);
                self.port.clear_line(MotorLine::Reverse);
            }
            DirectionCode::Reverse => {
                self.port.set_line(MotorLine::Reverse);
                self.port.clear_line(MotorLine::Forward);
            }
            DirectionCode::Brake | DirectionCode::Undefined => {
                self.port.set_line(MotorLine::Forward);
                self.port.set_line(MotorLine::Reverse);
            }
        }
    }

    /// Access the underlying port (test inspection).
    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }
}
