//! Idle tracking for the sleep decision.

use crate::time::Millis;

/// Converts an idle timeout in minutes to milliseconds.
#[inline]
pub fn timeout_ms(minutes: u8) -> u32 {
    minutes as u32 * 60 * 1000
}

/// Measures how long the device has gone without activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdleTimer {
    started: Millis,
}

impl IdleTimer {
    pub fn new(now: Millis) -> Self {
        Self { started: now }
    }

    /// Restarts the idle period at `now`.
    pub fn reset(&mut self, now: Millis) {
        self.started = now;
    }

    /// When the current idle period began.
    pub fn started(&self) -> Millis {
        self.started
    }

    /// Milliseconds idle so far.
    pub fn elapsed(&self, now: Millis) -> u32 {
        now.elapsed_since(self.started)
    }

    /// True once the idle period reaches `minutes`.
    pub fn has_expired(&self, now: Millis, minutes: u8) -> bool {
        self.elapsed(now) >= timeout_ms(minutes)
    }
}
