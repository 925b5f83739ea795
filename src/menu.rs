//! Settings menu: item enumeration, value ranges and the modal editor.
//!
//! Each [`MenuItem`] has a [`ValueRange`] (the authoritative clamp policy) and
//! an entry in the engine's binding table that knows how to read the live
//! value and apply an edited one. Selecting, adjusting and confirming are
//! generic over that table.

use crate::engine::TimerEngine;
use crate::store::SettingsStore;
use crate::time::TimeSource;
use crate::types::{MAX_TASKS, MenuState, TimerState};

/// Editable settings, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    #[default]
    PomodoroLength,
    ShortBreakLength,
    LongBreakLength,
    PomodorosBeforeLongBreak,
    ManageTasks,
    EditCompletedPomodoros,
    EditInterruptedPomodoros,
    IdleTimeoutBattery,
    IdleTimeoutUsb,
    SleepOnUsb,
    Brightness,
    Theme,
    EnableWindup,
    AlarmDuration,
    AlarmVibration,
    AlarmFlash,
}

/// How an item's value responds to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueKind {
    /// Steps by the encoder delta, clamped to the range.
    Linear,
    /// 0/1 flag flipped by any turn, whatever its direction.
    Toggle,
}

/// Inclusive bounds and step behaviour of an editable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValueRange {
    pub min: u8,
    pub max: u8,
    pub kind: ValueKind,
}

impl ValueRange {
    const fn linear(min: u8, max: u8) -> Self {
        Self {
            min,
            max,
            kind: ValueKind::Linear,
        }
    }

    const fn toggle() -> Self {
        Self {
            min: 0,
            max: 1,
            kind: ValueKind::Toggle,
        }
    }

    /// Applies one encoder movement to `value`.
    pub fn adjust(&self, value: u8, direction: i8) -> u8 {
        match self.kind {
            ValueKind::Linear => {
                let stepped = value as i16 + direction as i16;
                stepped.clamp(self.min as i16, self.max as i16) as u8
            }
            ValueKind::Toggle => {
                if value != 0 {
                    0
                } else {
                    1
                }
            }
        }
    }

    /// Pulls `value` inside the range.
    #[inline]
    pub fn clamp(&self, value: u8) -> u8 {
        value.clamp(self.min, self.max)
    }
}

const RANGES: [ValueRange; MenuItem::COUNT] = [
    ValueRange::linear(1, 60),              // PomodoroLength
    ValueRange::linear(1, 15),              // ShortBreakLength
    ValueRange::linear(5, 30),              // LongBreakLength
    ValueRange::linear(2, 10),              // PomodorosBeforeLongBreak
    ValueRange::linear(1, MAX_TASKS as u8), // ManageTasks
    ValueRange::linear(0, 99),              // EditCompletedPomodoros
    ValueRange::linear(0, 99),              // EditInterruptedPomodoros
    ValueRange::linear(1, 30),              // IdleTimeoutBattery
    ValueRange::linear(1, 60),              // IdleTimeoutUsb
    ValueRange::toggle(),                   // SleepOnUsb
    ValueRange::linear(0, 7),               // Brightness
    ValueRange::linear(1, 2),               // Theme
    ValueRange::toggle(),                   // EnableWindup
    ValueRange::linear(1, 10),              // AlarmDuration
    ValueRange::toggle(),                   // AlarmVibration
    ValueRange::toggle(),                   // AlarmFlash
];

impl MenuItem {
    /// Number of menu items.
    pub const COUNT: usize = 16;

    /// Every item in display order.
    pub const ALL: [MenuItem; MenuItem::COUNT] = [
        MenuItem::PomodoroLength,
        MenuItem::ShortBreakLength,
        MenuItem::LongBreakLength,
        MenuItem::PomodorosBeforeLongBreak,
        MenuItem::ManageTasks,
        MenuItem::EditCompletedPomodoros,
        MenuItem::EditInterruptedPomodoros,
        MenuItem::IdleTimeoutBattery,
        MenuItem::IdleTimeoutUsb,
        MenuItem::SleepOnUsb,
        MenuItem::Brightness,
        MenuItem::Theme,
        MenuItem::EnableWindup,
        MenuItem::AlarmDuration,
        MenuItem::AlarmVibration,
        MenuItem::AlarmFlash,
    ];

    /// Position in display order.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Item at `index`, if any.
    pub fn from_index(index: usize) -> Option<MenuItem> {
        Self::ALL.get(index).copied()
    }

    /// The item `direction` steps away, wrapping at both ends.
    pub fn step(self, direction: i8) -> MenuItem {
        let count = Self::COUNT as i16;
        let index = (self.index() as i16 + direction as i16).rem_euclid(count);
        Self::ALL[index as usize]
    }

    /// Editable range of this item's value.
    #[inline]
    pub fn range(self) -> ValueRange {
        RANGES[self.index()]
    }

    /// Short display label.
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::PomodoroLength => "Pomodoro",
            MenuItem::ShortBreakLength => "Short break",
            MenuItem::LongBreakLength => "Long break",
            MenuItem::PomodorosBeforeLongBreak => "Long after",
            MenuItem::ManageTasks => "Tasks",
            MenuItem::EditCompletedPomodoros => "Completed",
            MenuItem::EditInterruptedPomodoros => "Interrupted",
            MenuItem::IdleTimeoutBattery => "Sleep (bat)",
            MenuItem::IdleTimeoutUsb => "Sleep (USB)",
            MenuItem::SleepOnUsb => "Sleep on USB",
            MenuItem::Brightness => "Brightness",
            MenuItem::Theme => "Theme",
            MenuItem::EnableWindup => "Wind-up",
            MenuItem::AlarmDuration => "Alarm",
            MenuItem::AlarmVibration => "Vibrate",
            MenuItem::AlarmFlash => "Flash",
        }
    }
}

/// Navigation state of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct MenuSession {
    pub state: MenuState,
    pub item: MenuItem,
    pub editing_value: u8,
}

/// Binds a menu item to the engine accessor and setter it edits.
pub(crate) struct MenuEntry<E> {
    pub item: MenuItem,
    pub read: fn(&E) -> u8,
    pub write: fn(&mut E, u8),
}

impl<E> Clone for MenuEntry<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for MenuEntry<E> {}

impl<'t, S: SettingsStore, T: TimeSource> TimerEngine<'t, S, T> {
    const MENU: [MenuEntry<Self>; MenuItem::COUNT] = [
        MenuEntry {
            item: MenuItem::PomodoroLength,
            read: |e| e.work_duration(),
            write: Self::set_work_duration,
        },
        MenuEntry {
            item: MenuItem::ShortBreakLength,
            read: |e| e.short_break_duration(),
            write: Self::set_short_break_duration,
        },
        MenuEntry {
            item: MenuItem::LongBreakLength,
            read: |e| e.long_break_duration(),
            write: Self::set_long_break_duration,
        },
        MenuEntry {
            item: MenuItem::PomodorosBeforeLongBreak,
            read: |e| e.pomodoros_before_long_break(),
            write: Self::set_pomodoros_before_long_break,
        },
        MenuEntry {
            item: MenuItem::ManageTasks,
            read: |e| e.total_tasks(),
            write: Self::set_total_tasks,
        },
        MenuEntry {
            item: MenuItem::EditCompletedPomodoros,
            read: |e| e.task_completed_pomodoros(e.current_task_id()),
            write: |e, value| {
                let id = e.current_task_id();
                e.set_task_completed_pomodoros(id, value);
            },
        },
        MenuEntry {
            item: MenuItem::EditInterruptedPomodoros,
            read: |e| e.task_interrupted_pomodoros(e.current_task_id()),
            write: |e, value| {
                let id = e.current_task_id();
                e.set_task_interrupted_pomodoros(id, value);
            },
        },
        MenuEntry {
            item: MenuItem::IdleTimeoutBattery,
            read: |e| e.idle_timeout_battery(),
            write: Self::set_idle_timeout_battery,
        },
        MenuEntry {
            item: MenuItem::IdleTimeoutUsb,
            read: |e| e.idle_timeout_usb(),
            write: Self::set_idle_timeout_usb,
        },
        MenuEntry {
            item: MenuItem::SleepOnUsb,
            read: |e| u8::from(e.sleep_on_usb()),
            write: |e, value| e.set_sleep_on_usb(value != 0),
        },
        MenuEntry {
            item: MenuItem::Brightness,
            read: |e| e.brightness_level(),
            write: Self::set_brightness_level,
        },
        MenuEntry {
            item: MenuItem::Theme,
            read: |e| e.theme_id(),
            write: Self::set_theme,
        },
        MenuEntry {
            item: MenuItem::EnableWindup,
            read: |e| u8::from(e.windup_enabled()),
            write: |e, value| e.set_windup_enabled(value != 0),
        },
        MenuEntry {
            item: MenuItem::AlarmDuration,
            read: |e| e.alarm_duration(),
            write: Self::set_alarm_duration,
        },
        MenuEntry {
            item: MenuItem::AlarmVibration,
            read: |e| u8::from(e.alarm_vibration_enabled()),
            write: |e, value| e.set_alarm_vibration(value != 0),
        },
        MenuEntry {
            item: MenuItem::AlarmFlash,
            read: |e| u8::from(e.alarm_flash_enabled()),
            write: |e, value| e.set_alarm_flash(value != 0),
        },
    ];

    fn menu_entry(item: MenuItem) -> MenuEntry<Self> {
        let entry = Self::MENU[item.index()];
        debug_assert!(entry.item == item);
        entry
    }

    /// Opens the menu on its first item. Only allowed while idle.
    pub fn open_menu(&mut self) {
        if self.state() != TimerState::Idle {
            return;
        }
        self.menu.state = MenuState::ListView;
        self.menu.item = MenuItem::PomodoroLength;
        debug!("menu opened");
    }

    /// Closes the menu, discarding any edit in progress.
    pub fn close_menu(&mut self) {
        self.menu.state = MenuState::Closed;
        debug!("menu closed");
    }

    /// Moves the list cursor, wrapping at both ends.
    pub fn navigate_menu(&mut self, direction: i8) {
        if self.menu.state != MenuState::ListView {
            return;
        }
        self.menu.item = self.menu.item.step(direction);
        debug!("menu item {}", self.menu.item);
    }

    /// Starts editing the highlighted item from its live value.
    pub fn select_menu_item(&mut self) {
        if self.menu.state != MenuState::ListView {
            return;
        }
        let entry = Self::menu_entry(self.menu.item);
        self.menu.editing_value = (entry.read)(self);
        self.menu.state = MenuState::EditingValue;
        debug!("editing {} = {}", entry.item, self.menu.editing_value);
    }

    /// Applies one encoder movement to the value being edited.
    pub fn adjust_value(&mut self, direction: i8) {
        if self.menu.state != MenuState::EditingValue {
            return;
        }
        let range = self.menu.item.range();
        self.menu.editing_value = range.adjust(self.menu.editing_value, direction);
        debug!("adjusted value {}", self.menu.editing_value);
    }

    /// Commits the edited value through its setter and returns to the list.
    pub fn confirm_value(&mut self) {
        if self.menu.state != MenuState::EditingValue {
            return;
        }
        let entry = Self::menu_entry(self.menu.item);
        let value = self.menu.editing_value;
        (entry.write)(self, value);
        self.menu.state = MenuState::ListView;
        info!("{} set to {}", entry.item, value);
    }

    /// Whether the menu is closed, listing or editing.
    pub fn menu_state(&self) -> MenuState {
        self.menu.state
    }

    /// Item under the cursor.
    pub fn current_menu_item(&self) -> MenuItem {
        self.menu.item
    }

    /// Value being edited. Meaningful only while editing.
    pub fn editing_value(&self) -> u8 {
        self.menu.editing_value
    }

    /// Live value of any item, for drawing the list.
    pub fn menu_value(&self, item: MenuItem) -> u8 {
        (Self::menu_entry(item).read)(self)
    }
}
