//! Output stage, hardware initialisation, and platform timer plumbing.

pub mod hw_init;
pub mod hw_timer;
pub mod motor;
pub mod status_led;
