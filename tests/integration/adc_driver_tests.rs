//! Blocking analog driver tests against the fake converter.

use motorctl::adc::{ADC_SETTLE_US, Adc, BLOCKING_CLOCK_DIV, MuxSelect, Vref};
use motorctl::error::AdcError;

use crate::mock_hw::{MockAdcPort, RecordingDelay};

fn driver(port: MockAdcPort) -> Adc<MockAdcPort, RecordingDelay> {
    Adc::new(port, RecordingDelay::default(), 5000)
}

#[test]
fn configure_twice_is_an_error() {
    let mut adc = driver(MockAdcPort::new());
    adc.configure(Vref::Vcc).unwrap();
    assert_eq!(adc.configure(Vref::Vcc), Err(AdcError::AlreadyConfigured));
    // The prior configuration stays intact and readable.
    assert_eq!(adc.vref_millivolts(), 5000);

    // Close releases the converter for reconfiguration.
    adc.close();
    adc.configure(Vref::Internal2V56).unwrap();
    assert_eq!(adc.vref_millivolts(), 2560);
}

#[test]
fn configure_enables_with_the_blocking_divisor() {
    let mut adc = driver(MockAdcPort::new());
    adc.configure(Vref::Vcc).unwrap();
    let (port, _) = adc.release();
    assert!(port.enabled);
    assert_eq!(port.clk, Some(BLOCKING_CLOCK_DIV));
}

#[test]
fn read_selects_waits_then_samples() {
    let mut adc = driver(MockAdcPort::with_samples(&[777]));
    adc.configure(Vref::Internal1V1).unwrap();

    assert_eq!(adc.read_raw10(5), 777);

    let (port, delay) = adc.release();
    assert_eq!(port.last_select(), Some(MuxSelect::new(Vref::Internal1V1, 5)));
    assert_eq!(delay.calls, 1);
    assert_eq!(delay.total_ns, u64::from(ADC_SETTLE_US) * 1_000);
}

#[test]
fn eight_bit_read_keeps_the_top_bits() {
    let mut adc = driver(MockAdcPort::with_samples(&[0x3ff, 0x201, 0]));
    adc.configure(Vref::Vcc).unwrap();
    assert_eq!(adc.read_raw8(0), 0xff);
    assert_eq!(adc.read_raw8(0), 0x80);
    assert_eq!(adc.read_raw8(0), 0);
}

#[test]
fn millivolt_scaling_tracks_the_reference() {
    // Half scale of a 5000 mV reference.
    let mut adc = driver(MockAdcPort::with_samples(&[512]));
    adc.configure(Vref::Vcc).unwrap();
    assert_eq!(adc.read_millivolts(0), 2500);

    // Same raw count against the 1.1 V bandgap.
    let mut adc = driver(MockAdcPort::with_samples(&[512]));
    adc.configure(Vref::Internal1V1).unwrap();
    assert_eq!(adc.read_millivolts(0), 550);
}

#[test]
fn divider_read_back_scales_to_the_tap_voltage() {
    // 2500 mV at the tap of a 4:1 divider → 12500 mV at the source.
    let mut adc = driver(MockAdcPort::with_samples(&[512]));
    adc.configure(Vref::Vcc).unwrap();
    assert_eq!(adc.read_millivolts_divider(0, 4, 1), 12_500);

    // Equal legs double the measured value.
    let mut adc = driver(MockAdcPort::with_samples(&[512]));
    adc.configure(Vref::Vcc).unwrap();
    assert_eq!(adc.read_millivolts_divider(0, 1, 1), 5000);
}

#[test]
fn reference_switch_applies_to_the_next_selection() {
    let mut adc = driver(MockAdcPort::with_samples(&[1, 2]));
    adc.configure(Vref::Vcc).unwrap();
    let _ = adc.read_raw10(0);
    adc.set_ref(Vref::External);
    let _ = adc.read_raw10(0);

    let (port, _) = adc.release();
    assert_eq!(port.selects[0].vref, Vref::Vcc);
    assert_eq!(port.selects[1].vref, Vref::External);
}

#[test]
fn close_disables_the_converter() {
    let mut adc = driver(MockAdcPort::new());
    adc.configure(Vref::Vcc).unwrap();
    adc.close();
    let (port, _) = adc.release();
    assert!(!port.enabled);
}
