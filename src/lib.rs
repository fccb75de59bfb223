//! Motor controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adc;
pub mod app;
pub mod config;
pub mod diagnostics;
#[cfg(feature = "adc-scan")]
pub mod events;
pub mod fsm;
pub mod safety;
pub mod shared;
pub mod timing;

pub mod error;
pub mod pins;

// The hardware-facing modules compile on every target; the actual
// register accesses are guarded by cfg attributes inside.
pub mod adapters;
pub mod drivers;
