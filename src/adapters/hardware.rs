//! Hardware adapters — port trait implementations over the GPIO and
//! converter helpers in [`crate::drivers::hw_init`].
//!
//! ## Dual-target design
//!
//! Every adapter funnels through `hw_init`'s free functions, which are
//! real register accesses on ESP-IDF and inert stand-ins on the host.
//! The adapters themselves compile identically for both targets.

use log::debug;

use crate::adc::{ClockDivisor, MuxSelect, Vref};
use crate::app::ports::{
    AdcPort, AnalogPort, AnalogSnapshot, LedPort, MotorLine, SwitchPort, SwitchSnapshot,
};
use crate::drivers::hw_init;
use crate::drivers::status_led::StatusLed;
use crate::pins;

// ── Motor lines ───────────────────────────────────────────────

/// H-bridge control lines over raw GPIO.  Zero-sized; the line-to-pin
/// mapping lives in [`crate::pins`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HwMotorLines;

fn line_gpio(line: MotorLine) -> i32 {
    match line {
        MotorLine::Forward => pins::MOTOR_FORWARD_GPIO,
        MotorLine::Reverse => pins::MOTOR_REVERSE_GPIO,
        MotorLine::Enable => pins::MOTOR_ENABLE_GPIO,
    }
}

impl crate::app::ports::MotorPort for HwMotorLines {
    fn set_line(&mut self, line: MotorLine) {
        hw_init::gpio_write(line_gpio(line), true);
    }

    fn clear_line(&mut self, line: MotorLine) {
        hw_init::gpio_write(line_gpio(line), false);
    }
}

// ── Converter port ────────────────────────────────────────────

/// [`AdcPort`] over the oneshot converter unit.
///
/// The hardware unit is always powered once initialised; `enable` and
/// `disable` only gate this adapter's bookkeeping.  `select_input`
/// records the mux setting and `sample10` converts the recorded input.
#[derive(Debug)]
pub struct HwAdcPort {
    selected: MuxSelect,
    enabled: bool,
}

impl HwAdcPort {
    pub const fn new() -> Self {
        Self {
            selected: MuxSelect::new(Vref::Vcc, 0),
            enabled: false,
        }
    }

    pub fn selected(&self) -> MuxSelect {
        self.selected
    }
}

impl Default for HwAdcPort {
    fn default() -> Self {
        Self::new()
    }
}

impl AdcPort for HwAdcPort {
    fn enable(&mut self, clk: ClockDivisor) {
        debug!("adc: enabled (clock div bits {})", clk.bits());
        self.enabled = true;
    }

    fn disable(&mut self) {
        debug!("adc: disabled");
        self.enabled = false;
    }

    fn select_input(&mut self, mux: MuxSelect) {
        self.selected = mux;
    }

    fn sample10(&mut self) -> u16 {
        if !self.enabled {
            return 0;
        }
        hw_init::adc_read_logical(self.selected.input)
    }
}

// ── Switches and LEDs ─────────────────────────────────────────

/// Selector switches plus the two status LEDs.
pub struct HardwareAdapter {
    led: StatusLed,
}

impl HardwareAdapter {
    pub fn new() -> Self {
        Self {
            led: StatusLed::new(),
        }
    }

    pub fn led(&self) -> &StatusLed {
        &self.led
    }
}

impl Default for HardwareAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SwitchPort for HardwareAdapter {
    fn read_switches(&mut self) -> SwitchSnapshot {
        SwitchSnapshot {
            manual: hw_init::gpio_read(pins::SWITCH_MAN_GPIO),
            automatic: hw_init::gpio_read(pins::SWITCH_AUTO_GPIO),
            cw: hw_init::gpio_read(pins::SWITCH_CW_GPIO),
            ccw: hw_init::gpio_read(pins::SWITCH_CCW_GPIO),
        }
    }
}

impl LedPort for HardwareAdapter {
    fn set_green(&mut self, on: bool) {
        self.led.set_green(on);
    }

    fn set_red(&mut self, on: bool) {
        self.led.set_red(on);
    }
}

// ── Analog snapshot sources ───────────────────────────────────

/// [`AnalogPort`] over the blocking driver: four on-demand reads per
/// loop iteration, 8-bit as the decision math expects.
pub struct BlockingAnalog<P, D>
where
    P: AdcPort,
    D: embedded_hal::delay::DelayNs,
{
    adc: crate::adc::Adc<P, D>,
}

impl<P, D> BlockingAnalog<P, D>
where
    P: AdcPort,
    D: embedded_hal::delay::DelayNs,
{
    pub fn new(adc: crate::adc::Adc<P, D>) -> Self {
        Self { adc }
    }

    pub fn adc_mut(&mut self) -> &mut crate::adc::Adc<P, D> {
        &mut self.adc
    }
}

impl<P, D> AnalogPort for BlockingAnalog<P, D>
where
    P: AdcPort,
    D: embedded_hal::delay::DelayNs,
{
    fn read_analog(&mut self) -> AnalogSnapshot {
        AnalogSnapshot {
            speed: self.adc.read_raw8(pins::ADC_CH_SPEED),
            threshold_trim: self.adc.read_raw8(pins::ADC_CH_THRESHOLD),
            measure1: self.adc.read_raw8(pins::ADC_CH_MEASURE_1),
            measure2: self.adc.read_raw8(pins::ADC_CH_MEASURE_2),
        }
    }
}

/// [`AnalogPort`] over the scan engine's stored samples.  No blocking:
/// the conversion handler keeps the samples fresh and the foreground
/// just narrows them to 8 bits.
#[cfg(feature = "adc-scan")]
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanAnalog;

#[cfg(feature = "adc-scan")]
impl AnalogPort for ScanAnalog {
    fn read_analog(&mut self) -> AnalogSnapshot {
        use crate::drivers::hw_timer::scan_value;
        let narrow = |scan_id: usize| (scan_value(scan_id) >> 2) as u8;
        AnalogSnapshot {
            measure1: narrow(pins::ADC_CH_MEASURE_1 as usize),
            measure2: narrow(pins::ADC_CH_MEASURE_2 as usize),
            threshold_trim: narrow(pins::ADC_CH_THRESHOLD as usize),
            speed: narrow(pins::ADC_CH_SPEED as usize),
        }
    }
}
