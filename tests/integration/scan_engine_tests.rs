//! Scan engine tests: round-robin stepping, settle gating, and the
//! per-channel trigger machine.
#![cfg(feature = "adc-scan")]

use motorctl::adc::scan::{
    SCAN_CHANNELS, ScanEngine, ScanStep, TriggerEvent, TriggerStatus, convert_millivolts,
};
use motorctl::adc::{ClockDivisor, SCAN_VALUE_SENTINEL, Vref};

use crate::mock_hw::{MockAdcPort, RecordTriggerSink};

const POS: u16 = 600;
const NEG: u16 = 400;
const HYST: u8 = 20;

fn armed_engine() -> ScanEngine {
    let mut engine: ScanEngine = ScanEngine::new();
    for ch in 0..SCAN_CHANNELS {
        engine.configure_channel(ch, ch as u8, Vref::Vcc, POS, NEG, HYST);
    }
    engine
}

/// One full round-robin pass: four Read conversions (with the given
/// values) each followed by the two discarded settling conversions.
fn feed_pass(
    engine: &mut ScanEngine,
    port: &mut MockAdcPort,
    sink: &mut RecordTriggerSink,
    values: [u16; SCAN_CHANNELS],
) {
    for v in values {
        engine.on_conversion(v, port, sink); // Read
        engine.on_conversion(0, port, sink); // Mux artifact
        engine.on_conversion(0, port, sink); // Wait artifact
    }
}

/// Run enough quiet passes that every channel leaves Init.
fn settle(engine: &mut ScanEngine, port: &mut MockAdcPort, sink: &mut RecordTriggerSink, base: u16) {
    for _ in 0..21 {
        feed_pass(engine, port, sink, [base; SCAN_CHANNELS]);
    }
    sink.events.clear();
}

#[test]
fn start_selects_first_channel_and_enables() {
    let mut engine = armed_engine();
    let mut port = MockAdcPort::new();
    engine.start(ClockDivisor::Div64, &mut port);

    assert!(port.enabled);
    assert_eq!(port.clk, Some(ClockDivisor::Div64));
    assert_eq!(port.selects.len(), 1);
    assert_eq!(port.selects[0].input, 0);
    assert_eq!(engine.current_channel(), 0);
    assert_eq!(engine.current_step(), ScanStep::Read);
}

#[test]
fn round_robin_stores_and_advances() {
    let mut engine = armed_engine();
    let mut port = MockAdcPort::new();
    let mut sink = RecordTriggerSink::default();
    engine.start(ClockDivisor::Div64, &mut port);

    feed_pass(&mut engine, &mut port, &mut sink, [10, 20, 30, 40]);

    for (ch, expected) in [10, 20, 30, 40].into_iter().enumerate() {
        assert_eq!(engine.value(ch), expected);
    }
    // Wrapped back to channel 0, ready for the next Read.
    assert_eq!(engine.current_channel(), 0);
    assert_eq!(engine.current_step(), ScanStep::Read);

    // Mux selections: start plus one advance per Read, ending back at 0.
    let inputs: Vec<u8> = port.selects.iter().map(|m| m.input).collect();
    assert_eq!(inputs, vec![0, 1, 2, 3, 0]);
}

#[test]
fn settling_conversions_are_discarded() {
    let mut engine = armed_engine();
    let mut port = MockAdcPort::new();
    let mut sink = RecordTriggerSink::default();
    engine.start(ClockDivisor::Div64, &mut port);

    engine.on_conversion(111, &mut port, &mut sink); // Read → stored
    assert_eq!(engine.current_step(), ScanStep::Mux);
    engine.on_conversion(999, &mut port, &mut sink); // discarded
    assert_eq!(engine.current_step(), ScanStep::Wait);
    engine.on_conversion(888, &mut port, &mut sink); // discarded
    assert_eq!(engine.current_step(), ScanStep::Read);

    assert_eq!(engine.value(0), 111);
    assert_eq!(engine.value(1), 0, "settling values must not be stored");
}

#[test]
fn out_of_range_channel_reads_as_sentinel() {
    let engine = armed_engine();
    assert_eq!(engine.value(SCAN_CHANNELS), SCAN_VALUE_SENTINEL);
    assert_eq!(engine.value(99), SCAN_VALUE_SENTINEL);
    assert_eq!(engine.trigger_status(SCAN_CHANNELS), None);
}

#[test]
fn channels_arm_after_the_settle_period() {
    let mut engine = armed_engine();
    let mut port = MockAdcPort::new();
    let mut sink = RecordTriggerSink::default();
    engine.start(ClockDivisor::Div64, &mut port);

    // Twenty quiet passes: still settling, no events.
    for _ in 0..20 {
        feed_pass(&mut engine, &mut port, &mut sink, [500; SCAN_CHANNELS]);
    }
    assert!(sink.events.is_empty());
    assert_eq!(engine.trigger_status(0), Some(TriggerStatus::Init));

    // The next pass arms every channel, in scan order.
    feed_pass(&mut engine, &mut port, &mut sink, [500; SCAN_CHANNELS]);
    assert_eq!(
        sink.events,
        vec![
            (0, TriggerEvent::InitialWaitElapsed),
            (1, TriggerEvent::InitialWaitElapsed),
            (2, TriggerEvent::InitialWaitElapsed),
            (3, TriggerEvent::InitialWaitElapsed),
        ]
    );
    for ch in 0..SCAN_CHANNELS {
        assert_eq!(engine.trigger_status(ch), Some(TriggerStatus::Waiting));
    }
}

#[test]
fn positive_crossing_and_hysteresis_rearm() {
    let mut engine = armed_engine();
    let mut port = MockAdcPort::new();
    let mut sink = RecordTriggerSink::default();
    engine.start(ClockDivisor::Div64, &mut port);
    settle(&mut engine, &mut port, &mut sink, 500);

    // 500 → 605: rises through the positive threshold.
    feed_pass(&mut engine, &mut port, &mut sink, [605, 500, 500, 500]);
    assert_eq!(sink.events, vec![(0, TriggerEvent::CrossedPositive)]);
    assert_eq!(engine.trigger_status(0), Some(TriggerStatus::Positive));
    sink.events.clear();

    // 605 → 585: still inside the hysteresis band, no event.
    feed_pass(&mut engine, &mut port, &mut sink, [585, 500, 500, 500]);
    assert!(sink.events.is_empty());
    assert_eq!(engine.trigger_status(0), Some(TriggerStatus::Positive));

    // 585 → 579: drops out of the band, re-armed.
    feed_pass(&mut engine, &mut port, &mut sink, [579, 500, 500, 500]);
    assert_eq!(sink.events, vec![(0, TriggerEvent::ExitedPositiveBand)]);
    assert_eq!(engine.trigger_status(0), Some(TriggerStatus::Waiting));
}

#[test]
fn negative_crossing_and_hysteresis_rearm() {
    let mut engine = armed_engine();
    let mut port = MockAdcPort::new();
    let mut sink = RecordTriggerSink::default();
    engine.start(ClockDivisor::Div64, &mut port);
    settle(&mut engine, &mut port, &mut sink, 500);

    feed_pass(&mut engine, &mut port, &mut sink, [395, 500, 500, 500]);
    assert_eq!(sink.events, vec![(0, TriggerEvent::CrossedNegative)]);
    assert_eq!(engine.trigger_status(0), Some(TriggerStatus::Negative));
    sink.events.clear();

    // 395 → 415: inside the band (400 + 20), still triggered.
    feed_pass(&mut engine, &mut port, &mut sink, [415, 500, 500, 500]);
    assert!(sink.events.is_empty());

    // 415 → 425: rises out of the band, re-armed.
    feed_pass(&mut engine, &mut port, &mut sink, [425, 500, 500, 500]);
    assert_eq!(sink.events, vec![(0, TriggerEvent::ExitedNegativeBand)]);
    assert_eq!(engine.trigger_status(0), Some(TriggerStatus::Waiting));
}

#[test]
fn landing_exactly_on_threshold_counts_as_crossing() {
    let mut engine = armed_engine();
    let mut port = MockAdcPort::new();
    let mut sink = RecordTriggerSink::default();
    engine.start(ClockDivisor::Div64, &mut port);
    settle(&mut engine, &mut port, &mut sink, 500);

    feed_pass(&mut engine, &mut port, &mut sink, [POS, 500, 500, 500]);
    assert_eq!(sink.events, vec![(0, TriggerEvent::CrossedPositive)]);
}

#[test]
fn channels_trigger_independently() {
    let mut engine = armed_engine();
    let mut port = MockAdcPort::new();
    let mut sink = RecordTriggerSink::default();
    engine.start(ClockDivisor::Div64, &mut port);
    settle(&mut engine, &mut port, &mut sink, 500);

    // Channel 1 rises while channel 2 falls on the same pass.
    feed_pass(&mut engine, &mut port, &mut sink, [500, 700, 300, 500]);
    assert_eq!(
        sink.events,
        vec![
            (1, TriggerEvent::CrossedPositive),
            (2, TriggerEvent::CrossedNegative),
        ]
    );
    assert_eq!(engine.trigger_status(0), Some(TriggerStatus::Waiting));
    assert_eq!(engine.trigger_status(3), Some(TriggerStatus::Waiting));
}

#[test]
fn conversion_helper_matches_divider_math() {
    // Half scale of 5000 mV through a 4:1 divider.
    assert_eq!(convert_millivolts(512, 5000, 4, 1), 12_500);
    assert_eq!(convert_millivolts(512, 5000, 1, 1), 5000);
    assert_eq!(convert_millivolts(0, 5000, 4, 1), 0);
}
