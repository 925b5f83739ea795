//! Core state enums and compile-time configuration.

/// Maximum number of tasks whose statistics are tracked.
pub const MAX_TASKS: usize = 12;

/// Default work period length in minutes.
pub const WORK_DURATION: u8 = 25;
/// Default short break length in minutes.
pub const SHORT_BREAK_DURATION: u8 = 5;
/// Default long break length in minutes.
pub const LONG_BREAK_DURATION: u8 = 15;
/// Default number of work periods before a long break.
pub const POMODOROS_BEFORE_LONG_BREAK: u8 = 4;
/// Default idle timeout on battery power, in minutes.
pub const IDLE_TIMEOUT_BATTERY_MINUTES: u8 = 5;
/// Default idle timeout on USB power, in minutes.
pub const IDLE_TIMEOUT_USB_MINUTES: u8 = 30;
/// Default alarm length in seconds.
pub const DEFAULT_ALARM_DURATION: u8 = 2;
/// Default display brightness level (0-7).
pub const DEFAULT_BRIGHTNESS: u8 = 4;
/// Default theme id.
pub const DEFAULT_THEME: u8 = 1;

/// Blink half-period of the alert, in milliseconds.
pub const ALERT_BLINK_INTERVAL_MS: u32 = 400;

/// Supply voltage above which the device is considered USB powered.
pub const USB_VOLTAGE_THRESHOLD: f32 = 5.0;

/// The current phase of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerState {
    /// Nothing running. The only state in which the device may sleep.
    #[default]
    Idle,
    /// Work period counting down.
    Work,
    /// Wind-up gesture in progress, duration being dialled in.
    WindUp,
    /// Short break counting down.
    ShortBreak,
    /// Long break counting down.
    LongBreak,
    /// Work period frozen by `pause()`.
    PausedWork,
    /// Short break frozen by `pause()`.
    PausedShortBreak,
    /// Long break frozen by `pause()`.
    PausedLongBreak,
    /// A period just ended and the alarm is running.
    Alert,
}

impl TimerState {
    /// True for states whose countdown advances on `tick()`.
    #[inline]
    pub fn is_counting(self) -> bool {
        matches!(
            self,
            TimerState::Work | TimerState::ShortBreak | TimerState::LongBreak
        )
    }

    /// True for the three paused states.
    #[inline]
    pub fn is_paused(self) -> bool {
        matches!(
            self,
            TimerState::PausedWork | TimerState::PausedShortBreak | TimerState::PausedLongBreak
        )
    }

    /// Paused counterpart of a counting state.
    pub(crate) fn paused(self) -> Option<TimerState> {
        match self {
            TimerState::Work => Some(TimerState::PausedWork),
            TimerState::ShortBreak => Some(TimerState::PausedShortBreak),
            TimerState::LongBreak => Some(TimerState::PausedLongBreak),
            _ => None,
        }
    }

    /// Counting counterpart of a paused state.
    pub(crate) fn resumed(self) -> Option<TimerState> {
        match self {
            TimerState::PausedWork => Some(TimerState::Work),
            TimerState::PausedShortBreak => Some(TimerState::ShortBreak),
            TimerState::PausedLongBreak => Some(TimerState::LongBreak),
            _ => None,
        }
    }
}

/// State of the settings menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuState {
    /// Menu not shown.
    #[default]
    Closed,
    /// Browsing the list of items.
    ListView,
    /// Editing the selected item's value.
    EditingValue,
}

/// Where the device is drawing power from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerSource {
    Battery,
    Usb,
}

impl PowerSource {
    /// Classifies a supply voltage reading. An external supply reads above 5 V.
    #[inline]
    pub fn from_voltage(voltage: f32) -> Self {
        if voltage > USB_VOLTAGE_THRESHOLD {
            PowerSource::Usb
        } else {
            PowerSource::Battery
        }
    }
}
