//! Discrete green/red status LED driver.
//!
//! Green and red signal the decided drive direction; the exact pattern
//! per mode is owned by the state handlers, not this driver.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives two GPIO lines via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct StatusLed {
    green: bool,
    red: bool,
}

impl StatusLed {
    pub fn new() -> Self {
        Self {
            green: false,
            red: false,
        }
    }

    pub fn set_green(&mut self, on: bool) {
        hw_init::gpio_write(pins::LED_GREEN_GPIO, on);
        self.green = on;
    }

    pub fn set_red(&mut self, on: bool) {
        hw_init::gpio_write(pins::LED_RED_GPIO, on);
        self.red = on;
    }

    pub fn off(&mut self) {
        self.set_green(false);
        self.set_red(false);
    }

    pub fn is_green(&self) -> bool {
        self.green
    }

    pub fn is_red(&self) -> bool {
        self.red
    }
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}
