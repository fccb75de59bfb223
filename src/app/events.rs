//! Structured application events.
//!
//! The drive service emits these through the [`EventSink`] port; the
//! default adapter logs them, the diagnostics module keeps a short
//! history.  Events are plain data — no channels, no allocation in the
//! hot path.
//!
//! [`EventSink`]: crate::app::ports::EventSink

use crate::fsm::StateId;
use crate::shared::DirectionCode;

/// Snapshot of the drive outputs for one decision-loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveTelemetry {
    /// Active mode.
    pub mode: StateId,
    /// Commanded direction (shared state value).
    pub direction: DirectionCode,
    /// Commanded duty (compare register value; 255 = stopped).
    pub duty: u8,
    /// Active undervoltage stop latch.
    pub stopped: bool,
    /// Iterations since boot.
    pub tick: u64,
}

/// Everything noteworthy the drive service can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Service started and the output stage is enabled.
    Started,

    /// Mode selector moved.
    ModeChanged { from: StateId, to: StateId },

    /// Commanded direction changed.
    DirectionChanged {
        from: DirectionCode,
        to: DirectionCode,
    },

    /// Undervoltage latch engaged; drive braked until manual release.
    StopLatched,

    /// Manual mode released the undervoltage latch.
    StopReleased,

    /// A scan channel crossed one of its trigger thresholds.
    #[cfg(feature = "adc-scan")]
    Trigger {
        channel: u8,
        event: crate::adc::scan::TriggerEvent,
    },

    /// Periodic output snapshot.
    Telemetry(DriveTelemetry),
}
