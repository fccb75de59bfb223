//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the serial log and mirroring them into the diagnostics history ring.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::diagnostics::EventHistory;

/// Adapter that logs every [`AppEvent`] and keeps a short history.
pub struct LogEventSink {
    history: EventHistory,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self {
            history: EventHistory::new(),
        }
    }

    /// The retained event history, oldest first.
    pub fn history(&self) -> &EventHistory {
        &self.history
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | tick={} | mode={:?} | dir={:?} | duty={} | stop={}",
                    t.tick,
                    t.mode,
                    t.direction,
                    t.duty,
                    if t.stopped { "LATCHED" } else { "clear" },
                );
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {:?} -> {:?}", from, to);
            }
            AppEvent::DirectionChanged { from, to } => {
                info!("DIR   | {:?} -> {:?}", from, to);
            }
            AppEvent::StopLatched => {
                info!("STOP  | undervoltage latch engaged");
            }
            AppEvent::StopReleased => {
                info!("STOP  | latch released (manual)");
            }
            #[cfg(feature = "adc-scan")]
            AppEvent::Trigger { channel, event } => {
                info!("TRIG  | ch{} {:?}", channel, event);
            }
            AppEvent::Started => {
                info!("START | drive service running");
            }
        }
        self.history.record(event);
    }
}
