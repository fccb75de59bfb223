//! Analog front-end driver.
//!
//! Two acquisition modes share the multiplexer model:
//!
//! - **Basic mode** (this module): on-demand blocking reads.  Select the
//!   channel, busy-wait a fixed settle time so the multiplexer and
//!   sample-and-hold stabilise, then read the completed conversion.
//! - **Scan mode** ([`scan`], feature `adc-scan`): interrupt-driven
//!   round-robin sampling with per-channel edge triggers and hysteresis.
//!
//! The converter hardware sits behind [`AdcPort`](crate::app::ports::AdcPort)
//! so the driver logic runs unchanged against the real peripheral or a
//! fake register file in tests.

#[cfg(feature = "adc-scan")]
pub mod scan;

use embedded_hal::delay::DelayNs;

use crate::app::ports::AdcPort;
use crate::error::AdcError;

/// Busy-wait after a multiplexer switch before trusting a conversion.
/// Long enough for mux and sample-and-hold settling plus one conversion.
pub const ADC_SETTLE_US: u32 = 150;

/// Clock divisor used by the basic blocking mode.
pub const BLOCKING_CLOCK_DIV: ClockDivisor = ClockDivisor::Div4;

/// Out-of-range sentinel returned by scan-value queries.
pub const SCAN_VALUE_SENTINEL: u16 = 0xffff;

// ---------------------------------------------------------------------------
// Multiplexer model
// ---------------------------------------------------------------------------

/// Reference voltage source selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Vref {
    /// External reference pin.
    External = 0,
    /// Supply voltage.
    Vcc = 1,
    /// Internal 1.1 V bandgap.
    Internal1V1 = 2,
    /// Internal 2.56 V reference.
    Internal2V56 = 3,
}

impl Vref {
    /// Full-scale value in millivolts.  External references are assumed
    /// to be tied to the supply rail (board convention).
    pub fn millivolts(self, vcc_mv: u16) -> u16 {
        match self {
            Self::Internal1V1 => 1100,
            Self::Internal2V56 => 2560,
            Self::Vcc | Self::External => vcc_mv,
        }
    }
}

/// Multiplexer input selection: one of the eight single-ended channels
/// or a diagnostic source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AnalogInput {
    Adc0 = 0,
    Adc1 = 1,
    Adc2 = 2,
    Adc3 = 3,
    Adc4 = 4,
    Adc5 = 5,
    Adc6 = 6,
    Adc7 = 7,
    /// Internal 1.1 V bandgap (reference sanity checks).
    BandGap = 0x0e,
    /// Ground (offset measurement).
    Ground = 0x0f,
}

impl AnalogInput {
    /// The 4-bit mux field value.
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Single-ended channel by number; the low three bits select.
    pub fn channel(ch: u8) -> Self {
        match ch & 0x07 {
            0 => Self::Adc0,
            1 => Self::Adc1,
            2 => Self::Adc2,
            3 => Self::Adc3,
            4 => Self::Adc4,
            5 => Self::Adc5,
            6 => Self::Adc6,
            _ => Self::Adc7,
        }
    }
}

/// One multiplexer setting: reference source plus analog input.
///
/// `encode` packs the pair into the wire byte the converter expects —
/// reference selector in the top two bits, channel in the low nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuxSelect {
    pub vref: Vref,
    pub input: u8,
}

impl MuxSelect {
    pub const fn new(vref: Vref, input: u8) -> Self {
        Self { vref, input }
    }

    /// Typed-input constructor for the diagnostic sources.
    pub const fn for_input(vref: Vref, input: AnalogInput) -> Self {
        Self::new(vref, input.bits())
    }

    /// Packed mux register value: `(vref << 6) | (input & 0x0f)`.
    pub fn encode(self) -> u8 {
        ((self.vref as u8) << 6) | (self.input & 0x0f)
    }
}

/// ADC clock divisor (3-bit prescaler field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClockDivisor {
    Div2 = 1,
    Div4 = 2,
    Div8 = 3,
    Div16 = 4,
    Div32 = 5,
    Div64 = 6,
    Div128 = 7,
}

impl ClockDivisor {
    /// The 3-bit prescaler register field.
    pub fn bits(self) -> u8 {
        self as u8
    }
}

// ---------------------------------------------------------------------------
// Basic blocking driver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdcStatus {
    Closed,
    Ready,
}

/// On-demand blocking ADC driver.
///
/// Lifecycle: `configure` → reads → `close`.  Configuring an already
/// open converter is the single error condition; it leaves the prior
/// configuration intact and is recovered by an explicit `close`.
pub struct Adc<P: AdcPort, D: DelayNs> {
    port: P,
    delay: D,
    status: AdcStatus,
    vref: Vref,
    vcc_mv: u16,
}

impl<P: AdcPort, D: DelayNs> Adc<P, D> {
    pub fn new(port: P, delay: D, vcc_mv: u16) -> Self {
        Self {
            port,
            delay,
            status: AdcStatus::Closed,
            vref: Vref::Vcc,
            vcc_mv,
        }
    }

    /// Configure the converter for a reference source and start it in
    /// continuous conversion mode.
    pub fn configure(&mut self, vref: Vref) -> Result<(), AdcError> {
        if self.status == AdcStatus::Ready {
            return Err(AdcError::AlreadyConfigured);
        }
        self.vref = vref;
        self.port.enable(BLOCKING_CLOCK_DIV);
        self.status = AdcStatus::Ready;
        Ok(())
    }

    /// Switch the reference source without reopening the converter.
    /// Takes effect with the next channel selection.
    pub fn set_ref(&mut self, vref: Vref) {
        self.vref = vref;
    }

    /// Disable the converter and allow reconfiguration.
    pub fn close(&mut self) {
        self.port.disable();
        self.status = AdcStatus::Closed;
    }

    /// Blocking 8-bit read (left-adjusted: top eight bits of the result).
    pub fn read_raw8(&mut self, channel: u8) -> u8 {
        (self.read_raw10(channel) >> 2) as u8
    }

    /// Blocking full-resolution 10-bit read.
    pub fn read_raw10(&mut self, channel: u8) -> u16 {
        self.port.select_input(MuxSelect::new(self.vref, channel));
        self.delay.delay_us(ADC_SETTLE_US);
        self.port.sample10()
    }

    /// Blocking 10-bit read of a diagnostic mux source (bandgap, ground).
    pub fn read_input_raw10(&mut self, input: AnalogInput) -> u16 {
        self.port.select_input(MuxSelect::for_input(self.vref, input));
        self.delay.delay_us(ADC_SETTLE_US);
        self.port.sample10()
    }

    /// Blocking read scaled to millivolts: `(raw * vref_mv) >> 10`.
    pub fn read_millivolts(&mut self, channel: u8) -> u16 {
        let raw = u32::from(self.read_raw10(channel));
        let scaled = raw * u32::from(self.vref.millivolts(self.vcc_mv));
        (scaled >> 10) as u16
    }

    /// Millivolt read back-scaled through an external resistor divider:
    /// `measured * (r1 + r2) / r2`.  `r2` must be non-zero.
    pub fn read_millivolts_divider(&mut self, channel: u8, r1: u8, r2: u8) -> u16 {
        let mv = i32::from(self.read_millivolts(channel));
        let scaled = mv * i32::from(u16::from(r1) + u16::from(r2)) / i32::from(r2);
        (scaled & 0xffff) as u16
    }

    /// Reference full-scale currently in effect, in millivolts.
    pub fn vref_millivolts(&self) -> u16 {
        self.vref.millivolts(self.vcc_mv)
    }

    /// Reclaim the port and delay provider (used when handing the
    /// converter over to the scan engine).
    pub fn release(self) -> (P, D) {
        (self.port, self.delay)
    }
}
