//! In-memory event history for post-incident inspection.
//!
//! Keeps a short, fixed-capacity ring of formatted event summaries.
//! Heapless by construction: every summary is a bounded string, and the
//! ring evicts the oldest entry on overflow rather than allocating.

use core::fmt::Write as _;

use heapless::{Deque, String};

use crate::app::events::AppEvent;

/// Maximum summaries retained.
pub const HISTORY_CAP: usize = 16;

/// Length cap per summary line.
pub type Summary = String<64>;

/// Bounded ring of recent event summaries, oldest first.
#[derive(Debug, Default)]
pub struct EventHistory {
    ring: Deque<Summary, HISTORY_CAP>,
}

impl EventHistory {
    pub const fn new() -> Self {
        Self { ring: Deque::new() }
    }

    /// Record one event, evicting the oldest entry when full.
    pub fn record(&mut self, event: &AppEvent) {
        let mut line = Summary::new();
        if write!(line, "{}", format_event(event)).is_err() {
            // Longer than the cap: keep the truncated prefix.
        }
        if self.ring.is_full() {
            let _ = self.ring.pop_front();
        }
        // Cannot fail after the pop above.
        let _ = self.ring.push_back(line);
    }

    /// Iterate the retained summaries, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.ring.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

/// One-line human summary of an event.
fn format_event(event: &AppEvent) -> Summary {
    let mut s = Summary::new();
    let result = match event {
        AppEvent::Started => write!(s, "started"),
        AppEvent::ModeChanged { from, to } => write!(s, "mode {from:?} -> {to:?}"),
        AppEvent::DirectionChanged { from, to } => write!(s, "dir {from:?} -> {to:?}"),
        AppEvent::StopLatched => write!(s, "stop latched"),
        AppEvent::StopReleased => write!(s, "stop released"),
        #[cfg(feature = "adc-scan")]
        AppEvent::Trigger { channel, event } => write!(s, "ch{channel} {event:?}"),
        AppEvent::Telemetry(t) => write!(
            s,
            "t{} {:?} {:?} duty={}{}",
            t.tick,
            t.mode,
            t.direction,
            t.duty,
            if t.stopped { " STOPPED" } else { "" }
        ),
    };
    // Truncation on overflow is acceptable for a diagnostic line.
    let _ = result;
    s
}
