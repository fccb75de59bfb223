//! Lock-free trigger event queue.
//!
//! The scan engine delivers trigger events synchronously inside the
//! conversion-complete handler.  The application's [`AdcEventSink`]
//! implementation must not block there, so it packs each event into this
//! SPSC ring; the foreground loop drains and reacts at its own pace.
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ ADC conversion   │────▶│  Event Queue │────▶│  Main Loop   │
//! │ handler (sink)   │     │  (lock-free) │     │  (consumer)  │
//! └──────────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! Producer: interrupt context only.  Consumer: foreground loop only.
//! The atomics enforce the SPSC discipline; no locks, no allocation.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::adc::scan::TriggerEvent;

/// Maximum number of pending trigger events.
/// Power of 2 for efficient ring buffer modulo.
const QUEUE_CAP: usize = 32;

static QUEUE_HEAD: AtomicU8 = AtomicU8::new(0);
static QUEUE_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: slot `head` is only written by the single producer while
// `head` is reserved (not yet published via the Release store), and
// only read by the single consumer after observing that store.
static mut QUEUE_BUF: [u8; QUEUE_CAP] = [0; QUEUE_CAP];

/// Pack a (channel, event) pair into one queue byte.
fn pack(channel: u8, event: TriggerEvent) -> u8 {
    ((event as u8) << 4) | (channel & 0x0f)
}

fn unpack(raw: u8) -> Option<(u8, TriggerEvent)> {
    TriggerEvent::from_u8(raw >> 4).map(|evt| (raw & 0x0f, evt))
}

/// Push a trigger event.  Safe to call from interrupt context.
/// Returns `false` if the queue is full (event dropped).
pub fn push_trigger(channel: u8, event: TriggerEvent) -> bool {
    let head = QUEUE_HEAD.load(Ordering::Relaxed);
    let tail = QUEUE_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    // SAFETY: single producer; slot not visible to the consumer until
    // the Release store below.
    unsafe {
        QUEUE_BUF[head as usize] = pack(channel, event);
    }

    QUEUE_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next pending trigger event (foreground, single consumer).
pub fn pop_trigger() -> Option<(u8, TriggerEvent)> {
    let tail = QUEUE_TAIL.load(Ordering::Relaxed);
    let head = QUEUE_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    // SAFETY: single consumer; the Acquire load above synchronises with
    // the producer's Release store for this slot.
    let raw = unsafe { QUEUE_BUF[tail as usize] };
    QUEUE_TAIL.store((tail + 1) % QUEUE_CAP as u8, Ordering::Release);

    unpack(raw)
}

/// Drain all pending trigger events into a handler, FIFO order.
pub fn drain_triggers(mut handler: impl FnMut(u8, TriggerEvent)) {
    while let Some((channel, event)) = pop_trigger() {
        handler(channel, event);
    }
}

/// Number of pending events.
pub fn queue_len() -> usize {
    let head = QUEUE_HEAD.load(Ordering::Relaxed) as usize;
    let tail = QUEUE_TAIL.load(Ordering::Relaxed) as usize;
    (head + QUEUE_CAP - tail) % QUEUE_CAP
}

pub fn queue_is_empty() -> bool {
    queue_len() == 0
}

/// [`AdcEventSink`] adapter over the process-wide queue.  Zero-sized;
/// hand one to the scan engine wherever it runs.
///
/// [`AdcEventSink`]: crate::app::ports::AdcEventSink
#[derive(Debug, Default, Clone, Copy)]
pub struct QueueTriggerSink;

impl crate::app::ports::AdcEventSink for QueueTriggerSink {
    fn on_adc_event(&mut self, channel: u8, event: TriggerEvent) {
        if !push_trigger(channel, event) {
            // Dropping is the documented overflow policy; the foreground
            // loop will still see the channel's latest stored value.
            log::warn!("trigger queue full, dropped event {event:?} on channel {channel}");
        }
    }
}
