//! Fail-safe primitives.
//!
//! Two independent mechanisms keep the bridge from running away:
//!
//! 1. **Overflow brake** — every timer overflow re-asserts Brake before
//!    the compare match re-applies the commanded direction, so a missed
//!    or corrupted direction write is corrected within one PWM period.
//!    That path lives in [`crate::timing::TimingCore`].
//! 2. **Undervoltage stop latch** — when the measurement delta collapses
//!    below the stop threshold in automatic mode, [`StopLatch`] latches
//!    and gates the drive branches off until an operator switches to
//!    manual mode, which releases it.
//!
//! The latch is plain foreground state; it is only ever touched from the
//! decision loop.

/// Sticky stop flag for automatic mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StopLatch {
    stopped: bool,
}

impl StopLatch {
    pub const fn new() -> Self {
        Self { stopped: false }
    }

    /// Latch the drive stopped.  Idempotent.
    pub fn latch(&mut self) {
        self.stopped = true;
    }

    /// Release the latch.  Idempotent.
    pub fn release(&mut self) {
        self.stopped = false;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
