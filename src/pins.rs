//! GPIO / analog channel assignments for the motor controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers or bit shifts.  Change a line assignment here and
//! it propagates everywhere.
//!
//! The H-bridge control lines sit on three adjacent output pins, the status
//! LEDs on two pins of their own, and the two selector switch pairs are
//! inputs with pull-ups (a closed switch pulls the line high through the
//! selector wiring; exactly one high line of a pair selects that position).

// ---------------------------------------------------------------------------
// H-bridge motor driver (forward / reverse / enable)
// ---------------------------------------------------------------------------

/// Digital output: reverse leg of the H-bridge.
pub const MOTOR_REVERSE_GPIO: i32 = 1;
/// Digital output: forward leg of the H-bridge.
pub const MOTOR_FORWARD_GPIO: i32 = 2;
/// Digital output: H-bridge enable (active HIGH, asserted once at boot).
pub const MOTOR_ENABLE_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Status LEDs
// ---------------------------------------------------------------------------

/// Digital output: red status LED.
pub const LED_RED_GPIO: i32 = 6;
/// Digital output: green status LED.
pub const LED_GREEN_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Selector switches (inputs, pull-ups enabled)
// ---------------------------------------------------------------------------

/// Mode selector, automatic position.
pub const SWITCH_AUTO_GPIO: i32 = 10;
/// Mode selector, manual position.
pub const SWITCH_MAN_GPIO: i32 = 11;
/// Direction selector, counter-clockwise (reverse) position.
pub const SWITCH_CCW_GPIO: i32 = 12;
/// Direction selector, clockwise (forward) position.
pub const SWITCH_CW_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Analog channel assignment (logical → physical)
// ---------------------------------------------------------------------------
//
// Fixed board wiring; configuration data, not protocol.  The scan engine
// and the blocking reader both index channels through these constants.

/// Measurement input 1 (bridge voltage tap A).
pub const ADC_CH_MEASURE_1: u8 = 0;
/// Measurement input 2 (bridge voltage tap B).
pub const ADC_CH_MEASURE_2: u8 = 1;
/// Threshold trim potentiometer.
pub const ADC_CH_THRESHOLD: u8 = 2;
/// Speed potentiometer.
pub const ADC_CH_SPEED: u8 = 3;
