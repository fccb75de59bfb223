//! Unified error types for the motor controller firmware.
//!
//! Follows embedded practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level loop's error handling uniform.
//! All variants are `Copy` so they can be cheaply passed around without
//! allocation.  The interrupt handlers themselves never report errors —
//! the timer overflow brake is a designed safety net, not a fault path.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The analog front-end rejected an operation.
    Adc(AdcError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adc(e) => write!(f, "adc: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Analog front-end errors
// ---------------------------------------------------------------------------

/// Status errors from the ADC driver.  The taxonomy is deliberately
/// narrow: the only caller-recoverable condition is attempting to
/// configure a converter that is already open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcError {
    /// `configure` was called while the converter is Ready.
    /// Recoverable via an explicit `close` and retry.
    AlreadyConfigured,
}

impl fmt::Display for AdcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyConfigured => write!(f, "converter already configured"),
        }
    }
}

impl From<AdcError> for Error {
    fn from(e: AdcError) -> Self {
        Self::Adc(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
