//! Platform timers realising the counter interrupt pair.
//!
//! The free-running 8-bit counter is reproduced with two esp_timer
//! instances: a periodic timer standing in for the overflow interrupt,
//! and a one-shot re-armed from the overflow callback standing in for
//! the compare match.  The one-shot offset within the period is
//! `period * duty / 256`, so the commanded on-window (compare match to
//! overflow) matches the counter semantics exactly.
//!
//! With the `adc-scan` feature a third, faster periodic timer paces the
//! conversion-complete handler at the converter's conversion rate.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they may touch the handler statics and the lock-free trigger queue.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::adapters::hardware::HwMotorLines;
use crate::timing::TimingCore;

#[cfg(all(target_os = "espidf", feature = "adc-scan"))]
use crate::adapters::hardware::HwAdcPort;
#[cfg(all(target_os = "espidf", feature = "adc-scan"))]
use crate::adc::scan::ScanEngine;
#[cfg(feature = "adc-scan")]
use crate::adc::ClockDivisor;

// ── Timing core statics ───────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut TIMING: Option<TimingCore<HwMotorLines>> = None;
#[cfg(target_os = "espidf")]
static mut PERIOD_US: u64 = 0;
#[cfg(target_os = "espidf")]
static mut OVERFLOW_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut COMPARE_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// Overflow callback: brake, then re-arm the compare one-shot at the
/// offset the duty register selects for this period.
///
/// SAFETY: TIMING is written once in `start_timing()` before the timers
/// start; afterwards only this callback chain (single esp_timer task)
/// touches it.
#[cfg(target_os = "espidf")]
unsafe extern "C" fn overflow_cb(_arg: *mut core::ffi::c_void) {
    unsafe {
        let Some(core) = (&raw mut TIMING).as_mut().and_then(Option::as_mut) else {
            return;
        };
        core.on_overflow();

        let duty = u64::from(core.drive().duty());
        let offset = PERIOD_US * duty / 256;
        // A long on-window can leave the previous one-shot still armed.
        esp_timer_stop(COMPARE_TIMER);
        esp_timer_start_once(COMPARE_TIMER, offset);
    }
}

/// Compare-match callback.
///
/// SAFETY: same single-task discipline as `overflow_cb`.
#[cfg(target_os = "espidf")]
unsafe extern "C" fn compare_cb(_arg: *mut core::ffi::c_void) {
    unsafe {
        if let Some(core) = (&raw mut TIMING).as_mut().and_then(Option::as_mut) {
            core.on_compare_match();
        }
    }
}

/// Install the timing core and start the period cadence.
#[cfg(target_os = "espidf")]
pub fn start_timing(core: TimingCore<HwMotorLines>, period_us: u32) {
    // SAFETY: statics are written here once at boot, from the single
    // main task, before either timer is started.
    unsafe {
        TIMING = Some(core);
        PERIOD_US = u64::from(period_us);

        let compare_args = esp_timer_create_args_t {
            callback: Some(compare_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"compare\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&compare_args, &raw mut COMPARE_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: compare timer create failed (rc={ret})");
            return;
        }

        let overflow_args = esp_timer_create_args_t {
            callback: Some(overflow_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"overflow\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&overflow_args, &raw mut OVERFLOW_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: overflow timer create failed (rc={ret})");
            return;
        }
        let ret = esp_timer_start_periodic(OVERFLOW_TIMER, PERIOD_US);
        if ret != ESP_OK {
            log::error!("hw_timer: overflow timer start failed (rc={ret})");
            return;
        }

        info!("hw_timer: output period {period_us}us started");
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timing(_core: TimingCore<HwMotorLines>, _period_us: u32) {
    log::info!("hw_timer(sim): output timers not started (use the counter simulation)");
}

/// Stop the period cadence.  The last applied pattern stays on the
/// lines; callers brake first.
#[cfg(target_os = "espidf")]
pub fn stop_timing() {
    // SAFETY: handles are valid if start_timing() succeeded; null-check
    // prevents stopping a never-created timer.
    unsafe {
        if !OVERFLOW_TIMER.is_null() {
            esp_timer_stop(OVERFLOW_TIMER);
        }
        if !COMPARE_TIMER.is_null() {
            esp_timer_stop(COMPARE_TIMER);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_timing() {}

// ── Scan pacing ───────────────────────────────────────────────

#[cfg(all(target_os = "espidf", feature = "adc-scan"))]
static mut SCAN: Option<ScanEngine> = None;
#[cfg(all(target_os = "espidf", feature = "adc-scan"))]
static mut SCAN_PORT: HwAdcPort = HwAdcPort::new();
#[cfg(all(target_os = "espidf", feature = "adc-scan"))]
static mut SCAN_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// Conversion-complete callback: sample the currently selected input and
/// feed the scan engine, trigger events going to the lock-free queue.
///
/// SAFETY: SCAN and SCAN_PORT are written once in `start_scan()` before
/// the pacing timer starts; only this callback touches them afterwards.
#[cfg(all(target_os = "espidf", feature = "adc-scan"))]
unsafe extern "C" fn scan_conversion_cb(_arg: *mut core::ffi::c_void) {
    unsafe {
        let Some(engine) = (&raw mut SCAN).as_mut().and_then(Option::as_mut) else {
            return;
        };
        let port = &mut *(&raw mut SCAN_PORT);
        let raw = crate::app::ports::AdcPort::sample10(port);
        engine.on_conversion(raw, port, &mut crate::events::QueueTriggerSink);
    }
}

/// Install a configured scan engine and start the conversion cadence.
#[cfg(all(target_os = "espidf", feature = "adc-scan"))]
pub fn start_scan(mut engine: ScanEngine, clk: ClockDivisor, adc_clock_hz: u32) {
    // SAFETY: statics written once at boot before the pacing timer runs.
    unsafe {
        let port = &mut *(&raw mut SCAN_PORT);
        engine.start(clk, port);
        SCAN = Some(engine);

        let args = esp_timer_create_args_t {
            callback: Some(scan_conversion_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"adcscan\0".as_ptr() as *const _,
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut SCAN_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: scan timer create failed (rc={ret})");
            return;
        }
        let period = conversion_period_us(clk, adc_clock_hz);
        let ret = esp_timer_start_periodic(SCAN_TIMER, period);
        if ret != ESP_OK {
            log::error!("hw_timer: scan timer start failed (rc={ret})");
            return;
        }

        info!("hw_timer: scan cadence {period}us started");
    }
}

/// Foreground read of a scanned channel's latest stored sample.
#[cfg(all(target_os = "espidf", feature = "adc-scan"))]
pub fn scan_value(scan_id: usize) -> u16 {
    // SAFETY: reading a u16 out of the engine's sample array races only
    // with the esp_timer task's aligned store of the same slot; a stale
    // sample is acceptable, a torn one cannot occur on this target.
    unsafe {
        match (&raw const SCAN).as_ref().and_then(Option::as_ref) {
            Some(engine) => engine.value(scan_id),
            None => crate::adc::SCAN_VALUE_SENTINEL,
        }
    }
}

#[cfg(all(not(target_os = "espidf"), feature = "adc-scan"))]
pub fn start_scan(_engine: crate::adc::scan::ScanEngine, _clk: ClockDivisor, _adc_clock_hz: u32) {
    log::info!("hw_timer(sim): scan cadence not started");
}

#[cfg(all(not(target_os = "espidf"), feature = "adc-scan"))]
pub fn scan_value(_scan_id: usize) -> u16 {
    crate::adc::SCAN_VALUE_SENTINEL
}

/// Stop the conversion cadence.
#[cfg(all(target_os = "espidf", feature = "adc-scan"))]
pub fn stop_scan() {
    // SAFETY: handle valid if start_scan() succeeded.
    unsafe {
        if !SCAN_TIMER.is_null() {
            esp_timer_stop(SCAN_TIMER);
        }
    }
}

#[cfg(all(not(target_os = "espidf"), feature = "adc-scan"))]
pub fn stop_scan() {}

/// One conversion takes 13 converter clocks.
#[cfg(feature = "adc-scan")]
pub fn conversion_period_us(clk: ClockDivisor, adc_clock_hz: u32) -> u64 {
    let divisor = 1u64 << clk.bits();
    (13 * divisor * 1_000_000 / u64::from(adc_clock_hz)).max(1)
}
