//! End-of-period alert: blink phase and expiry.

use crate::time::Millis;
use crate::types::{ALERT_BLINK_INTERVAL_MS, TimerState};

/// Progress reported by [`Alert::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertProgress {
    /// Alarm still running.
    Blinking,
    /// Alarm over. Carries the period that had just ended.
    Finished(TimerState),
}

/// A running alarm. Only exists while the engine is in [`TimerState::Alert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alert {
    previous: TimerState,
    started: Millis,
    blink: u8,
}

impl Alert {
    /// Starts an alarm for the period `previous` that ended at `now`.
    pub fn start(previous: TimerState, now: Millis) -> Self {
        Self {
            previous,
            started: now,
            blink: 0,
        }
    }

    /// Advances the blink phase and checks expiry against the alarm length.
    pub fn update(&mut self, now: Millis, alarm_duration_secs: u8) -> AlertProgress {
        let elapsed = now.elapsed_since(self.started);
        self.blink = ((elapsed / ALERT_BLINK_INTERVAL_MS) % 2) as u8;

        if elapsed >= alarm_duration_secs as u32 * 1000 {
            AlertProgress::Finished(self.previous)
        } else {
            AlertProgress::Blinking
        }
    }

    /// The period whose end raised this alarm.
    pub fn previous(&self) -> TimerState {
        self.previous
    }

    pub fn started(&self) -> Millis {
        self.started
    }

    /// Blink phase, 0 or 1.
    pub fn blink_count(&self) -> u8 {
        self.blink
    }
}
