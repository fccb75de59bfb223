//! Interrupt-driven multi-channel scan engine.
//!
//! The converter free-runs with its interrupt enabled; every completed
//! conversion calls [`ScanEngine::on_conversion`].  Channels are visited
//! round-robin, and each channel advance takes three conversions:
//!
//! ```text
//!   Read ──▶ Mux ──▶ Wait ──▶ Read ──▶ …
//! ```
//!
//! Only the Read step trusts the result.  Switching the multiplexer
//! contaminates up to two conversions, so the Mux and Wait steps discard
//! theirs — two thirds of the conversion rate traded for accuracy.
//!
//! Note the one-cycle staleness: when Read fires, the hardware has
//! already begun converting the *next* mux setting, so the captured
//! result belongs to the channel selected before the previous advance.
//!
//! All scan state is owned exclusively by the handler path; foreground
//! code only reads the stored sample array through [`ScanEngine::value`].

use crate::adc::{ClockDivisor, MuxSelect, SCAN_VALUE_SENTINEL, Vref};
use crate::app::ports::{AdcEventSink, AdcPort};

/// Number of scanned channels in the fixed round-robin.
pub const SCAN_CHANNELS: usize = 4;

/// Samples to discard after scan start while the front-end stabilises.
const SETTLE_SAMPLES: u8 = 20;

// ---------------------------------------------------------------------------
// Per-channel configuration and trigger state
// ---------------------------------------------------------------------------

/// Static per-channel scan configuration.  Written before the scan
/// starts, immutable while it runs.
#[derive(Debug, Clone, Copy)]
pub struct ChannelConfig {
    pub mux: MuxSelect,
    pub trigger_positive: u16,
    pub trigger_negative: u16,
    pub hysteresis: u8,
}

/// Trigger sub-state-machine status for one channel.
///
/// Legal transitions: `Init → Waiting → {Positive, Negative} → Waiting`.
/// Positive and Negative never reach each other directly — the hysteresis
/// exit always passes through Waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerStatus {
    Init,
    Waiting,
    Positive,
    Negative,
}

/// Transient trigger notification delivered synchronously from the
/// conversion-complete handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TriggerEvent {
    /// The startup settle period elapsed; the channel is now armed.
    InitialWaitElapsed = 0,
    /// Value rose through the positive threshold.
    CrossedPositive = 1,
    /// Value fell through the negative threshold.
    CrossedNegative = 2,
    /// Value fell out of the positive hysteresis band; re-armed.
    ExitedPositiveBand = 3,
    /// Value rose out of the negative hysteresis band; re-armed.
    ExitedNegativeBand = 4,
}

impl TriggerEvent {
    /// Decode the packed queue representation.
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::InitialWaitElapsed),
            1 => Some(Self::CrossedPositive),
            2 => Some(Self::CrossedNegative),
            3 => Some(Self::ExitedPositiveBand),
            4 => Some(Self::ExitedNegativeBand),
            _ => None,
        }
    }
}

/// Which phase of the three-conversion channel advance comes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStep {
    Read,
    Mux,
    Wait,
}

// ---------------------------------------------------------------------------
// Scan engine
// ---------------------------------------------------------------------------

/// Round-robin scan state machine over `N` channels (four on this
/// board).
///
/// `on_conversion` is the interrupt handler body: it must stay bounded
/// and short, and [`AdcEventSink`] callbacks it makes run at the same
/// priority.
pub struct ScanEngine<const N: usize = SCAN_CHANNELS> {
    config: [ChannelConfig; N],
    values: [u16; N],
    status: [TriggerStatus; N],
    channel: usize,
    step: ScanStep,
    /// Full round-robin passes completed; gates the initial settle only.
    samples: u8,
}

impl<const N: usize> ScanEngine<N> {
    /// Engine with the default mux pattern (single-ended channels in
    /// scan order, Vcc reference) and all triggers disarmed at zero.
    pub const fn new() -> Self {
        const DEFAULT: ChannelConfig = ChannelConfig {
            mux: MuxSelect::new(Vref::Vcc, 0),
            trigger_positive: 0,
            trigger_negative: 0,
            hysteresis: 0,
        };
        let mut config = [DEFAULT; N];
        let mut i = 0;
        while i < N {
            config[i].mux = MuxSelect::new(Vref::Vcc, i as u8);
            i += 1;
        }
        Self {
            config,
            values: [0; N],
            status: [TriggerStatus::Init; N],
            channel: 0,
            step: ScanStep::Read,
            samples: 0,
        }
    }

    /// Store one channel's static configuration.  Out-of-range ids are
    /// silently ignored.
    pub fn configure_channel(
        &mut self,
        scan_id: usize,
        input: u8,
        vref: Vref,
        trigger_positive: u16,
        trigger_negative: u16,
        hysteresis: u8,
    ) {
        if scan_id < N {
            self.config[scan_id] = ChannelConfig {
                mux: MuxSelect::new(vref, input),
                trigger_positive,
                trigger_negative,
                hysteresis,
            };
        }
    }

    /// Reset the scan state and start continuous conversion on the first
    /// configured channel.
    pub fn start<P: AdcPort>(&mut self, clk: ClockDivisor, port: &mut P) {
        self.values = [0; N];
        self.status = [TriggerStatus::Init; N];
        self.channel = 0;
        self.step = ScanStep::Read;
        self.samples = 0;
        port.select_input(self.config[0].mux);
        port.enable(clk);
    }

    /// Conversion-complete handler.  Runs at interrupt priority.
    pub fn on_conversion<P, S>(&mut self, raw: u16, port: &mut P, sink: &mut S)
    where
        P: AdcPort,
        S: AdcEventSink,
    {
        match self.step {
            ScanStep::Read => {
                self.run_trigger(raw, sink);
                self.values[self.channel] = raw;

                self.channel += 1;
                if self.channel >= N {
                    self.channel = 0;
                    self.samples = self.samples.wrapping_add(1);
                }

                // The hardware is already converting what the mux pointed
                // at; this selection lands one conversion further ahead.
                port.select_input(self.config[self.channel].mux);
                self.step = ScanStep::Mux;
            }
            ScanStep::Mux => {
                // Multiplexer settling artifact; discard.
                self.step = ScanStep::Wait;
            }
            ScanStep::Wait => {
                // Second settling conversion; discard.
                self.step = ScanStep::Read;
            }
        }
    }

    /// Last stored sample for a channel, or the all-ones sentinel for an
    /// out-of-range id.
    pub fn value(&self, scan_id: usize) -> u16 {
        if scan_id < N {
            self.values[scan_id]
        } else {
            SCAN_VALUE_SENTINEL
        }
    }

    /// Current trigger status of a channel (foreground diagnostics).
    pub fn trigger_status(&self, scan_id: usize) -> Option<TriggerStatus> {
        self.status.get(scan_id).copied()
    }

    /// Channel the next Read step will store into.
    pub fn current_channel(&self) -> usize {
        self.channel
    }

    pub fn current_step(&self) -> ScanStep {
        self.step
    }

    // -----------------------------------------------------------------------
    // Trigger sub-state-machine (Read step only)
    // -----------------------------------------------------------------------

    fn run_trigger<S: AdcEventSink>(&mut self, new: u16, sink: &mut S) {
        let ch = self.channel;
        let old = self.values[ch];
        let cfg = self.config[ch];
        let id = ch as u8;

        match self.status[ch] {
            TriggerStatus::Init => {
                if self.samples >= SETTLE_SAMPLES {
                    self.status[ch] = TriggerStatus::Waiting;
                    sink.on_adc_event(id, TriggerEvent::InitialWaitElapsed);
                }
            }
            TriggerStatus::Waiting => {
                if old < cfg.trigger_positive && new >= cfg.trigger_positive {
                    self.status[ch] = TriggerStatus::Positive;
                    sink.on_adc_event(id, TriggerEvent::CrossedPositive);
                }
                if old > cfg.trigger_negative && new <= cfg.trigger_negative {
                    self.status[ch] = TriggerStatus::Negative;
                    sink.on_adc_event(id, TriggerEvent::CrossedNegative);
                }
            }
            TriggerStatus::Positive => {
                let band = cfg.trigger_positive.wrapping_sub(u16::from(cfg.hysteresis));
                if old > band && new <= band {
                    self.status[ch] = TriggerStatus::Waiting;
                    sink.on_adc_event(id, TriggerEvent::ExitedPositiveBand);
                }
            }
            TriggerStatus::Negative => {
                let band = cfg.trigger_negative.wrapping_add(u16::from(cfg.hysteresis));
                if old < band && new >= band {
                    self.status[ch] = TriggerStatus::Waiting;
                    sink.on_adc_event(id, TriggerEvent::ExitedNegativeBand);
                }
            }
        }
    }
}

impl<const N: usize> Default for ScanEngine<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pure conversion helper: raw value → millivolts through an external
/// resistor divider.  Same math as the blocking driver.
pub fn convert_millivolts(raw: u16, vref_mv: u16, r1: u8, r2: u8) -> u16 {
    let mut value = (i32::from(vref_mv) * i32::from(raw)) >> 10;
    value = value * i32::from(u16::from(r1) + u16::from(r2)) / i32::from(r2);
    (value & 0xffff) as u16
}
