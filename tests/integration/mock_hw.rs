//! Mock hardware for integration tests.
//!
//! Records every port call so tests can assert on the full command
//! history without touching real GPIO or converter registers.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use motorctl::adc::{ClockDivisor, MuxSelect};
use motorctl::app::events::AppEvent;
use motorctl::app::ports::{
    AdcPort, AnalogPort, AnalogSnapshot, EventSink, LedPort, MotorLine, MotorPort, SwitchPort,
    SwitchSnapshot,
};

// ── Motor line register file ──────────────────────────────────

/// Fake register file for the three bridge lines, plus the write log.
#[derive(Debug, Default)]
pub struct MockMotorLines {
    pub forward: bool,
    pub reverse: bool,
    pub enable: bool,
    /// Every write in order: `(line, level)`.
    pub writes: Vec<(MotorLine, bool)>,
}

#[allow(dead_code)]
impl MockMotorLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both legs asserted — the dynamic braking pattern.
    pub fn is_braking(&self) -> bool {
        self.forward && self.reverse
    }

    pub fn is_forward(&self) -> bool {
        self.forward && !self.reverse
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse && !self.forward
    }
}

impl MotorPort for MockMotorLines {
    fn set_line(&mut self, line: MotorLine) {
        match line {
            MotorLine::Forward => self.forward = true,
            MotorLine::Reverse => self.reverse = true,
            MotorLine::Enable => self.enable = true,
        }
        self.writes.push((line, true));
    }

    fn clear_line(&mut self, line: MotorLine) {
        match line {
            MotorLine::Forward => self.forward = false,
            MotorLine::Reverse => self.reverse = false,
            MotorLine::Enable => self.enable = false,
        }
        self.writes.push((line, false));
    }
}

// ── Converter register file ───────────────────────────────────

/// Fake converter: records lifecycle calls, replays queued samples.
#[derive(Debug, Default)]
pub struct MockAdcPort {
    pub enabled: bool,
    pub clk: Option<ClockDivisor>,
    pub selects: Vec<MuxSelect>,
    /// Samples handed out by `sample10`, front first; empty → `fallback`.
    pub samples: VecDeque<u16>,
    pub fallback: u16,
}

#[allow(dead_code)]
impl MockAdcPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(samples: &[u16]) -> Self {
        Self {
            samples: samples.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn last_select(&self) -> Option<MuxSelect> {
        self.selects.last().copied()
    }
}

impl AdcPort for MockAdcPort {
    fn enable(&mut self, clk: ClockDivisor) {
        self.enabled = true;
        self.clk = Some(clk);
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn select_input(&mut self, mux: MuxSelect) {
        self.selects.push(mux);
    }

    fn sample10(&mut self) -> u16 {
        self.samples.pop_front().unwrap_or(self.fallback)
    }
}

// ── Foreground ports with shared handles ──────────────────────
//
// The drive service owns its ports, so the tests keep `Rc` handles to
// mutate inputs and inspect outputs between ticks.

#[derive(Debug, Default, Clone)]
pub struct MockSwitches {
    pub state: Rc<RefCell<SwitchSnapshot>>,
}

#[allow(dead_code)]
impl MockSwitches {
    pub fn set(&self, manual: bool, automatic: bool, cw: bool, ccw: bool) {
        *self.state.borrow_mut() = SwitchSnapshot {
            manual,
            automatic,
            cw,
            ccw,
        };
    }
}

impl SwitchPort for MockSwitches {
    fn read_switches(&mut self) -> SwitchSnapshot {
        *self.state.borrow()
    }
}

#[derive(Debug, Default, Clone)]
pub struct MockAnalog {
    pub state: Rc<RefCell<AnalogSnapshot>>,
}

#[allow(dead_code)]
impl MockAnalog {
    pub fn set(&self, speed: u8, threshold_trim: u8, measure1: u8, measure2: u8) {
        *self.state.borrow_mut() = AnalogSnapshot {
            speed,
            threshold_trim,
            measure1,
            measure2,
        };
    }
}

impl AnalogPort for MockAnalog {
    fn read_analog(&mut self) -> AnalogSnapshot {
        *self.state.borrow()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LedState {
    pub green: bool,
    pub red: bool,
}

#[derive(Debug, Default, Clone)]
pub struct MockLeds {
    pub state: Rc<RefCell<LedState>>,
}

#[allow(dead_code)]
impl MockLeds {
    pub fn get(&self) -> LedState {
        *self.state.borrow()
    }
}

impl LedPort for MockLeds {
    fn set_green(&mut self, on: bool) {
        self.state.borrow_mut().green = on;
    }

    fn set_red(&mut self, on: bool) {
        self.state.borrow_mut().red = on;
    }
}

/// Event sink that collects everything emitted.
#[derive(Debug, Default, Clone)]
pub struct CollectSink {
    pub events: Rc<RefCell<Vec<AppEvent>>>,
}

#[allow(dead_code)]
impl CollectSink {
    pub fn all(&self) -> Vec<AppEvent> {
        self.events.borrow().clone()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.borrow().iter().any(|e| e == event)
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventSink for CollectSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.borrow_mut().push(*event);
    }
}

// ── Scan event sink ───────────────────────────────────────────

/// Records trigger events delivered by the scan engine.
#[cfg(feature = "adc-scan")]
#[derive(Debug, Default)]
pub struct RecordTriggerSink {
    pub events: Vec<(u8, motorctl::adc::scan::TriggerEvent)>,
}

#[cfg(feature = "adc-scan")]
impl motorctl::app::ports::AdcEventSink for RecordTriggerSink {
    fn on_adc_event(&mut self, channel: u8, event: motorctl::adc::scan::TriggerEvent) {
        self.events.push((channel, event));
    }
}

// ── Delay stub ────────────────────────────────────────────────

/// Delay that only records the accumulated wait.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub total_ns: u64,
    pub calls: usize,
}

impl embedded_hal::delay::DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }
}
