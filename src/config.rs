//! System configuration parameters.
//!
//! All tunable parameters for the drive in one place.  The configuration
//! is static for the life of the firmware — there is no persistence layer
//! and no runtime reconfiguration beyond the documented ADC channel and
//! reference setup calls.

use crate::adc::ClockDivisor;
use crate::timing::TimerPrescaler;

/// Core system configuration.
#[derive(Debug, Clone, Copy)]
pub struct SystemConfig {
    // --- Automatic mode thresholds ---
    /// Base of the direction-decision threshold (raw 8-bit counts).
    pub threshold_base: u8,
    /// Slope applied to the threshold trim pot, in hundredths
    /// (40 → threshold = base + pot * 0.4).
    pub threshold_slope_x100: u16,
    /// Channel delta below which the drive latches stopped (raw counts).
    pub stop_delta_threshold: u8,

    // --- Motor timing ---
    /// Compare register value at boot.  255 keeps the on-window at zero
    /// until the first speed-pot read (safe stopped default).
    pub initial_duty: u8,
    /// Prescaler feeding the free-running 8-bit output timer.
    pub prescaler: TimerPrescaler,
    /// Timer input clock in Hz (used to derive the PWM period on target).
    pub timer_clock_hz: u32,

    // --- Analog front-end ---
    /// Nominal supply voltage in millivolts (reference when Vcc-referred).
    pub vcc_mv: u16,
    /// ADC clock divisor for interrupt-driven scanning.
    pub scan_clock_div: ClockDivisor,
    /// Positive trigger threshold for the measurement channels (raw 10-bit).
    pub trigger_positive: u16,
    /// Negative trigger threshold for the measurement channels (raw 10-bit).
    pub trigger_negative: u16,
    /// Hysteresis band width for trigger re-arming (raw counts).
    pub trigger_hysteresis: u8,

    // --- Timing ---
    /// Foreground decision-loop pacing (milliseconds).
    pub loop_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Automatic mode: threshold = 76 + 0.4 * trim pot
            threshold_base: 76,
            threshold_slope_x100: 40,
            stop_delta_threshold: 50,

            // Motor timing
            initial_duty: 255,
            prescaler: TimerPrescaler::Div8,
            timer_clock_hz: 16_000_000,

            // Analog front-end
            vcc_mv: 3300,
            scan_clock_div: ClockDivisor::Div64,
            trigger_positive: 600,
            trigger_negative: 400,
            trigger_hysteresis: 20,

            // Timing
            loop_interval_ms: 10,
        }
    }
}

impl SystemConfig {
    /// Direction-decision threshold derived from the trim pot reading.
    pub fn direction_threshold(&self, trim_raw8: u8) -> u8 {
        let scaled = u32::from(trim_raw8) * u32::from(self.threshold_slope_x100) / 100;
        self.threshold_base.saturating_add(scaled as u8)
    }
}
