//! Motor controller firmware — main entry point.
//!
//! Hexagonal architecture with a timer-driven output stage.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter     LogEventSink      FirmwareDelay         │
//! │  (Switch+Led ports)  (EventSink)       (DelayNs)             │
//! │  HwMotorLines        HwAdcPort                               │
//! │  (MotorPort)         (AdcPort)                               │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │            DriveService (pure logic)                 │    │
//! │  │  Mode FSM · Stop latch · Threshold decisions         │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! │                                                              │
//! │  TimingCore (compare/overflow pair) · ScanEngine (adc-scan)  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use log::info;

use motorctl::adapters::hardware::{HardwareAdapter, HwMotorLines};
use motorctl::adapters::log_sink::LogEventSink;
use motorctl::app::ports::AnalogPort;
use motorctl::app::service::DriveService;
use motorctl::config::SystemConfig;
use motorctl::drivers::motor::MotorStage;
use motorctl::shared::DRIVE;
use motorctl::timing::TimingCore;
use motorctl::drivers;

/// Telemetry report cadence, in loop iterations.
const TELEMETRY_EVERY: u64 = 100;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("motorctl v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let config = SystemConfig::default();

    // ── 3. Output stage and timing core ───────────────────────
    //
    // The shared duty register boots at 255 (stopped); the first timer
    // overflow asserts Brake before the bridge is enabled below.
    let mut stage = MotorStage::new(HwMotorLines);
    stage.enable_driver();
    let core = TimingCore::new(stage, &DRIVE);
    let period_us = config.prescaler.period_us(config.timer_clock_hz);
    drivers::hw_timer::start_timing(core, period_us);

    // ── 4. Analog acquisition ─────────────────────────────────
    let analog = start_analog(&config);

    // ── 5. Drive service ──────────────────────────────────────
    let service = DriveService::new(
        config,
        &DRIVE,
        HardwareAdapter::new(),
        analog,
        HardwareAdapter::new(),
        LogEventSink::new(),
    );

    run_loop(service, config.loop_interval_ms)
}

/// Start interrupt-driven scanning and return the stored-sample port.
#[cfg(feature = "adc-scan")]
fn start_analog(config: &SystemConfig) -> motorctl::adapters::hardware::ScanAnalog {
    use motorctl::adc::Vref;
    use motorctl::adc::scan::{SCAN_CHANNELS, ScanEngine};
    use motorctl::pins;

    let mut engine: ScanEngine = ScanEngine::new();
    for (scan_id, input) in [
        pins::ADC_CH_MEASURE_1,
        pins::ADC_CH_MEASURE_2,
        pins::ADC_CH_THRESHOLD,
        pins::ADC_CH_SPEED,
    ]
    .into_iter()
    .enumerate()
    .take(SCAN_CHANNELS)
    {
        engine.configure_channel(
            scan_id,
            input,
            Vref::Vcc,
            config.trigger_positive,
            config.trigger_negative,
            config.trigger_hysteresis,
        );
    }
    drivers::hw_timer::start_scan(engine, config.scan_clock_div, config.timer_clock_hz);

    motorctl::adapters::hardware::ScanAnalog
}

/// Open the blocking driver and return the on-demand port.
#[cfg(not(feature = "adc-scan"))]
fn start_analog(
    config: &SystemConfig,
) -> motorctl::adapters::hardware::BlockingAnalog<
    motorctl::adapters::hardware::HwAdcPort,
    motorctl::adapters::delay::FirmwareDelay,
> {
    use motorctl::adapters::delay::FirmwareDelay;
    use motorctl::adapters::hardware::{BlockingAnalog, HwAdcPort};
    use motorctl::adc::{Adc, Vref};

    let mut adc = Adc::new(HwAdcPort::new(), FirmwareDelay::new(), config.vcc_mv);
    if let Err(e) = adc.configure(Vref::Vcc) {
        // Cannot happen on a freshly constructed driver; keep going with
        // whatever configuration is active.
        log::error!("ADC configure failed: {}", e);
    }
    BlockingAnalog::new(adc)
}

/// The foreground decision loop.  Never returns in normal operation.
fn run_loop<AN, SW, LED, EV>(
    mut service: DriveService<SW, AN, LED, EV>,
    interval_ms: u32,
) -> Result<()>
where
    AN: AnalogPort,
    SW: motorctl::app::ports::SwitchPort,
    LED: motorctl::app::ports::LedPort,
    EV: motorctl::app::ports::EventSink,
{
    service.start();
    loop {
        #[cfg(feature = "adc-scan")]
        {
            let mut pending = heapless::Vec::<(u8, motorctl::adc::scan::TriggerEvent), 32>::new();
            motorctl::events::drain_triggers(|channel, event| {
                let _ = pending.push((channel, event));
            });
            for (channel, event) in pending {
                service.notify_trigger(channel, event);
            }
        }

        service.tick();
        if service.tick_count() % TELEMETRY_EVERY == 0 {
            service.report();
        }

        std::thread::sleep(Duration::from_millis(u64::from(interval_ms)));
    }
}
