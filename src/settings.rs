//! Persisted timer settings and their storage key schema.

use crate::menu::MenuItem;
use crate::store::SettingsStore;
use crate::types::{
    DEFAULT_ALARM_DURATION, DEFAULT_BRIGHTNESS, DEFAULT_THEME, IDLE_TIMEOUT_BATTERY_MINUTES,
    IDLE_TIMEOUT_USB_MINUTES, LONG_BREAK_DURATION, POMODOROS_BEFORE_LONG_BREAK,
    SHORT_BREAK_DURATION, WORK_DURATION,
};

/// Storage keys. These strings are the on-device schema and must not change.
pub mod keys {
    pub const TOTAL_TASKS: &str = "totalTasks";
    pub const CURRENT_TASK: &str = "currentTask";
    pub const WORK_DURATION: &str = "workDuration";
    pub const SHORT_BREAK: &str = "shortBreak";
    pub const LONG_BREAK: &str = "longBreak";
    pub const POMODOROS_BEFORE_LONG_BREAK: &str = "pomosB4Long";
    /// Battery idle timeout. Older firmware stored its single idle timeout here.
    pub const IDLE_TIMEOUT_BATTERY: &str = "idleTimeout";
    pub const IDLE_TIMEOUT_USB: &str = "idleTimeUSB";
    pub const SLEEP_ON_USB: &str = "sleepOnUSB";
    pub const BRIGHTNESS: &str = "brightness";
    pub const THEME: &str = "theme";
    pub const WINDUP_ENABLED: &str = "windupEn";
    pub const ALARM_DURATION: &str = "alarmDur";
    pub const ALARM_VIBRATION: &str = "alarmVib";
    pub const ALARM_FLASH: &str = "alarmFlash";
    /// Prefix of the per-task completed counter keys (`comp0`, `comp1`, ...).
    pub const COMPLETED_PREFIX: &str = "comp";
    /// Prefix of the per-task interrupted counter keys (`int0`, `int1`, ...).
    pub const INTERRUPTED_PREFIX: &str = "int";
}

/// User-configurable timer settings.
///
/// Durations are in minutes except `alarm_duration`, which is in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub work_duration: u8,
    pub short_break_duration: u8,
    pub long_break_duration: u8,
    pub pomodoros_before_long_break: u8,
    pub idle_timeout_battery: u8,
    pub idle_timeout_usb: u8,
    /// If false the device never sleeps while USB powered.
    pub sleep_on_usb: bool,
    pub brightness_level: u8,
    pub theme_id: u8,
    pub windup_enabled: bool,
    pub alarm_duration: u8,
    pub alarm_vibration_enabled: bool,
    pub alarm_flash_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration: WORK_DURATION,
            short_break_duration: SHORT_BREAK_DURATION,
            long_break_duration: LONG_BREAK_DURATION,
            pomodoros_before_long_break: POMODOROS_BEFORE_LONG_BREAK,
            idle_timeout_battery: IDLE_TIMEOUT_BATTERY_MINUTES,
            idle_timeout_usb: IDLE_TIMEOUT_USB_MINUTES,
            sleep_on_usb: true,
            brightness_level: DEFAULT_BRIGHTNESS,
            theme_id: DEFAULT_THEME,
            windup_enabled: false,
            alarm_duration: DEFAULT_ALARM_DURATION,
            alarm_vibration_enabled: true,
            alarm_flash_enabled: true,
        }
    }
}

impl Settings {
    /// Loads every setting, clamping each into its editable range.
    pub fn load<S: SettingsStore>(store: &S) -> Self {
        let defaults = Self::default();
        let load = |item: MenuItem, key: &str, default: u8| {
            item.range().clamp(store.load_u8(key, default))
        };

        Self {
            work_duration: load(
                MenuItem::PomodoroLength,
                keys::WORK_DURATION,
                defaults.work_duration,
            ),
            short_break_duration: load(
                MenuItem::ShortBreakLength,
                keys::SHORT_BREAK,
                defaults.short_break_duration,
            ),
            long_break_duration: load(
                MenuItem::LongBreakLength,
                keys::LONG_BREAK,
                defaults.long_break_duration,
            ),
            pomodoros_before_long_break: load(
                MenuItem::PomodorosBeforeLongBreak,
                keys::POMODOROS_BEFORE_LONG_BREAK,
                defaults.pomodoros_before_long_break,
            ),
            idle_timeout_battery: load(
                MenuItem::IdleTimeoutBattery,
                keys::IDLE_TIMEOUT_BATTERY,
                defaults.idle_timeout_battery,
            ),
            idle_timeout_usb: load(
                MenuItem::IdleTimeoutUsb,
                keys::IDLE_TIMEOUT_USB,
                defaults.idle_timeout_usb,
            ),
            sleep_on_usb: store.load_bool(keys::SLEEP_ON_USB, defaults.sleep_on_usb),
            brightness_level: load(
                MenuItem::Brightness,
                keys::BRIGHTNESS,
                defaults.brightness_level,
            ),
            theme_id: load(MenuItem::Theme, keys::THEME, defaults.theme_id),
            windup_enabled: store.load_bool(keys::WINDUP_ENABLED, defaults.windup_enabled),
            alarm_duration: load(
                MenuItem::AlarmDuration,
                keys::ALARM_DURATION,
                defaults.alarm_duration,
            ),
            alarm_vibration_enabled: store
                .load_bool(keys::ALARM_VIBRATION, defaults.alarm_vibration_enabled),
            alarm_flash_enabled: store.load_bool(keys::ALARM_FLASH, defaults.alarm_flash_enabled),
        }
    }

    /// Writes every setting. Stops at the first failed write.
    pub fn save<S: SettingsStore>(&self, store: &mut S) -> Result<(), S::Error> {
        store.store_u8(keys::WORK_DURATION, self.work_duration)?;
        store.store_u8(keys::SHORT_BREAK, self.short_break_duration)?;
        store.store_u8(keys::LONG_BREAK, self.long_break_duration)?;
        store.store_u8(
            keys::POMODOROS_BEFORE_LONG_BREAK,
            self.pomodoros_before_long_break,
        )?;
        store.store_u8(keys::IDLE_TIMEOUT_BATTERY, self.idle_timeout_battery)?;
        store.store_u8(keys::IDLE_TIMEOUT_USB, self.idle_timeout_usb)?;
        store.store_bool(keys::SLEEP_ON_USB, self.sleep_on_usb)?;
        store.store_u8(keys::BRIGHTNESS, self.brightness_level)?;
        store.store_u8(keys::THEME, self.theme_id)?;
        store.store_bool(keys::WINDUP_ENABLED, self.windup_enabled)?;
        store.store_u8(keys::ALARM_DURATION, self.alarm_duration)?;
        store.store_bool(keys::ALARM_VIBRATION, self.alarm_vibration_enabled)?;
        store.store_bool(keys::ALARM_FLASH, self.alarm_flash_enabled)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn empty_store_loads_defaults() {
        let store: MemoryStore = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn save_then_load_restores_every_field() {
        let mut store: MemoryStore = MemoryStore::new();
        let settings = Settings {
            work_duration: 50,
            short_break_duration: 10,
            long_break_duration: 20,
            pomodoros_before_long_break: 3,
            idle_timeout_battery: 2,
            idle_timeout_usb: 45,
            sleep_on_usb: false,
            brightness_level: 7,
            theme_id: 2,
            windup_enabled: true,
            alarm_duration: 9,
            alarm_vibration_enabled: false,
            alarm_flash_enabled: false,
        };

        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn battery_timeout_uses_legacy_key() {
        let mut store: MemoryStore = MemoryStore::new();
        store.store_u8("idleTimeout", 12).unwrap();

        let settings = Settings::load(&store);
        assert_eq!(settings.idle_timeout_battery, 12);
        assert_eq!(settings.idle_timeout_usb, IDLE_TIMEOUT_USB_MINUTES);
    }

    #[test]
    fn corrupted_values_are_clamped_on_load() {
        let mut store: MemoryStore = MemoryStore::new();
        store.store_u8(keys::WORK_DURATION, 0).unwrap();
        store.store_u8(keys::LONG_BREAK, 200).unwrap();
        store.store_u8(keys::BRIGHTNESS, 255).unwrap();
        store.store_u8(keys::THEME, 9).unwrap();

        let settings = Settings::load(&store);
        assert_eq!(settings.work_duration, 1);
        assert_eq!(settings.long_break_duration, 30);
        assert_eq!(settings.brightness_level, 7);
        assert_eq!(settings.theme_id, 2);
    }
}
