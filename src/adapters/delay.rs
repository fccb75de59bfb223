//! Busy-wait delay provider for the blocking analog driver.
//!
//! - **`target_os = "espidf"`** — `esp_rom_delay_us`, a calibrated spin
//!   loop safe for the sub-millisecond settle waits the driver needs.
//! - **`not(target_os = "espidf")`** — `std::thread::sleep` for host
//!   runs; tests usually substitute a no-op delay instead.

use embedded_hal::delay::DelayNs;

#[derive(Debug, Default, Clone, Copy)]
pub struct FirmwareDelay;

impl FirmwareDelay {
    pub fn new() -> Self {
        Self
    }
}

impl DelayNs for FirmwareDelay {
    #[cfg(target_os = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        // Round up: a settle wait must never be shortened.
        let us = ns.div_ceil(1_000);
        // SAFETY: esp_rom_delay_us is a plain calibrated spin loop.
        unsafe { esp_idf_svc::sys::esp_rom_delay_us(us) };
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
