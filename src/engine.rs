//! Pomodoro timer engine with state management and timing control.
//!
//! Provides [`TimerEngine`], which owns every piece of timer, menu, task and
//! alert state. Input layers call its command methods, the control loop calls
//! [`TimerEngine::tick`] as often as it likes, and the display reads the
//! accessors each frame.

use crate::alert::{Alert, AlertProgress};
use crate::command::TimerCommand;
use crate::idle::IdleTimer;
use crate::menu::{MenuItem, MenuSession};
use crate::settings::{Settings, keys};
use crate::store::SettingsStore;
use crate::tasks::TaskStats;
use crate::theme::Theme;
use crate::time::{Millis, TimeSource};
use crate::types::{PowerSource, TimerState};

/// Finite-state Pomodoro timer.
///
/// Commands issued in a state where they make no sense are ignored, and
/// edited values are clamped rather than rejected, so none of the command
/// methods can fail. Setters persist their value immediately; store failures
/// are logged and the in-memory value is kept.
///
/// `tick()` may be called at any cadence. All elapsed time is derived from
/// absolute timestamp differences, so long gaps (e.g. after waking from
/// sleep) are handled in one step.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `S` - Settings store implementation type
/// * `T` - Time source implementation type
pub struct TimerEngine<'t, S: SettingsStore, T: TimeSource> {
    store: S,
    time_source: &'t T,
    settings: Settings,
    tasks: TaskStats,
    pub(crate) menu: MenuSession,

    state: TimerState,
    start_time: Millis,
    paused_time: Millis,
    /// Length of the active period in seconds.
    duration: u32,
    /// Seconds left in the active period, recomputed by `tick()`.
    remaining_time: u32,
    completed_sessions: u8,
    pomodoros_since_long_break: u8,

    alert: Option<Alert>,
    windup_value: u32,
    idle: IdleTimer,
}

impl<'t, S: SettingsStore, T: TimeSource> TimerEngine<'t, S, T> {
    /// Creates an idle engine, loading settings and statistics from `store`.
    pub fn new(store: S, time_source: &'t T) -> Self {
        let settings = Settings::load(&store);
        let tasks = TaskStats::load(&store);
        let now = time_source.now();

        info!(
            "timer loaded: {} tasks, current {}, work {} min",
            tasks.total_tasks(),
            tasks.current_task_id(),
            settings.work_duration
        );

        Self {
            store,
            time_source,
            settings,
            tasks,
            menu: MenuSession::default(),
            state: TimerState::Idle,
            start_time: Millis::ZERO,
            paused_time: Millis::ZERO,
            duration: 0,
            remaining_time: 0,
            completed_sessions: 0,
            pomodoros_since_long_break: 0,
            alert: None,
            windup_value: 0,
            idle: IdleTimer::new(now),
        }
    }

    /// Handles an input command by dispatching to the matching method.
    pub fn handle_command(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::StartWork => self.start_work(),
            TimerCommand::StartBreak => self.start_break(),
            TimerCommand::Pause => self.pause(),
            TimerCommand::Resume => self.resume(),
            TimerCommand::Reset => self.reset(),
            TimerCommand::Interrupt => self.interrupt(),
            TimerCommand::OpenMenu => self.open_menu(),
            TimerCommand::CloseMenu => self.close_menu(),
            TimerCommand::NavigateMenu(direction) => self.navigate_menu(direction),
            TimerCommand::SelectMenuItem => self.select_menu_item(),
            TimerCommand::AdjustValue(direction) => self.adjust_value(direction),
            TimerCommand::ConfirmValue => self.confirm_value(),
            TimerCommand::AddTask => self.add_task(),
            TimerCommand::SelectTask(task_id) => self.select_task(task_id),
            TimerCommand::ResetTaskStats => self.reset_task_stats(),
            TimerCommand::ResetSaveState => self.reset_save_state(),
            TimerCommand::StartWindup => self.start_windup(),
            TimerCommand::CancelWindup => self.cancel_windup(),
            TimerCommand::IncrementWindup(direction) => self.increment_windup(direction),
            TimerCommand::StartWorkFromWindup => self.start_work_from_windup(),
            TimerCommand::ResetIdleTimer => self.reset_idle_timer(),
        }
    }

    #[inline]
    fn now(&self) -> Millis {
        self.time_source.now()
    }

    fn begin_period(&mut self, state: TimerState, duration_secs: u32) {
        self.alert = None;
        self.duration = duration_secs;
        self.remaining_time = duration_secs;
        self.start_time = self.now();
        self.state = state;
    }

    // ------------------------------------------------------------------
    // Timer state machine
    // ------------------------------------------------------------------

    /// Starts a work period of the configured length. Allowed from any state.
    pub fn start_work(&mut self) {
        self.windup_value = 0;
        self.begin_period(TimerState::Work, self.settings.work_duration as u32 * 60);
        info!("work started, task {}", self.tasks.current_task_id());
    }

    /// Starts the break that follows a completed work period.
    ///
    /// Every `pomodoros_before_long_break`-th break is a long one.
    pub fn start_break(&mut self) {
        self.pomodoros_since_long_break = self.pomodoros_since_long_break.saturating_add(1);

        if self.pomodoros_since_long_break >= self.settings.pomodoros_before_long_break {
            self.pomodoros_since_long_break = 0;
            self.begin_period(
                TimerState::LongBreak,
                self.settings.long_break_duration as u32 * 60,
            );
            info!("long break started");
        } else {
            self.begin_period(
                TimerState::ShortBreak,
                self.settings.short_break_duration as u32 * 60,
            );
            info!("short break started");
        }
    }

    /// Freezes the running period.
    pub fn pause(&mut self) {
        if let Some(paused) = self.state.paused() {
            self.paused_time = self.now();
            self.state = paused;
            debug!("paused at {} s remaining", self.remaining_time);
        }
    }

    /// Continues a paused period as if the pause never happened.
    pub fn resume(&mut self) {
        if let Some(resumed) = self.state.resumed() {
            let paused_for = self.now().elapsed_since(self.paused_time);
            self.start_time = self.start_time.wrapping_add(paused_for);
            self.state = resumed;
            debug!("resumed after {} ms", paused_for);
        }
    }

    /// Abandons a work period, counting it against the current task.
    pub fn interrupt(&mut self) {
        if !matches!(self.state, TimerState::Work | TimerState::PausedWork) {
            return;
        }
        let task_id = self.tasks.record_interrupted();
        self.persist_task_counters(task_id);
        self.state = TimerState::Idle;
        self.remaining_time = 0;
        info!("work interrupted, task {}", task_id);
    }

    /// Returns to idle from any state, clearing all timing.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.alert = None;
        self.windup_value = 0;
        self.remaining_time = 0;
        self.start_time = Millis::ZERO;
        self.paused_time = Millis::ZERO;
        debug!("timer reset");
    }

    /// Advances time-based state. Call from the control loop at any cadence.
    pub fn tick(&mut self) {
        if self.alert.is_some() {
            self.update_alert();
            return;
        }

        if !self.state.is_counting() {
            return;
        }

        let elapsed_ms = self.now().elapsed_since(self.start_time);
        let elapsed_secs = elapsed_ms / 1000;
        let duration_ms = self.duration.saturating_mul(1000);

        // The seconds check catches periods whose ms length saturated.
        if elapsed_ms >= duration_ms || elapsed_secs >= self.duration {
            self.remaining_time = 0;
            self.start_alert();
        } else {
            self.remaining_time = self.duration - elapsed_secs;
        }
    }

    // ------------------------------------------------------------------
    // Alert
    // ------------------------------------------------------------------

    fn start_alert(&mut self) {
        info!("{} finished, alert started", self.state);
        self.alert = Some(Alert::start(self.state, self.now()));
        self.state = TimerState::Alert;
    }

    fn update_alert(&mut self) {
        let now = self.now();
        let alarm_duration = self.settings.alarm_duration;
        let Some(alert) = self.alert.as_mut() else {
            return;
        };

        if let AlertProgress::Finished(previous) = alert.update(now, alarm_duration) {
            self.alert = None;
            self.finish_period(previous);
        }
    }

    fn finish_period(&mut self, previous: TimerState) {
        if previous == TimerState::Work {
            let task_id = self.tasks.record_completed();
            self.completed_sessions = self.completed_sessions.saturating_add(1);
            self.persist_task_counters(task_id);
            info!(
                "pomodoro completed, task {} now {}",
                task_id,
                self.tasks.completed(task_id as u8)
            );
            self.start_break();
        } else {
            self.state = TimerState::Idle;
            self.remaining_time = 0;
            info!("break finished");
        }
    }

    // ------------------------------------------------------------------
    // Wind-up
    // ------------------------------------------------------------------

    fn windup_max(&self) -> u32 {
        self.settings.work_duration as u32 * 60
    }

    /// Begins the wind-up gesture, or starts work directly if it is disabled.
    pub fn start_windup(&mut self) {
        if !self.settings.windup_enabled {
            self.start_work();
            return;
        }
        self.alert = None;
        self.state = TimerState::WindUp;
        self.windup_value = 0;
        self.remaining_time = 0;
        debug!("wind-up started");
    }

    /// Abandons the wind-up gesture.
    pub fn cancel_windup(&mut self) {
        if self.state == TimerState::WindUp {
            self.state = TimerState::Idle;
            self.windup_value = 0;
            self.remaining_time = 0;
            debug!("wind-up cancelled");
        }
    }

    /// Winds by `direction` minutes. Reaching the full work length starts work.
    pub fn increment_windup(&mut self, direction: i8) {
        if self.state != TimerState::WindUp {
            return;
        }

        let max = self.windup_max();
        let wound = self.windup_value as i64 + direction as i64 * 60;
        self.windup_value = wound.clamp(0, max as i64) as u32;

        if self.windup_value >= max {
            debug!("fully wound up");
            self.start_work_from_windup();
        }
    }

    /// Starts a work period lasting the wound-up duration.
    pub fn start_work_from_windup(&mut self) {
        if self.state != TimerState::WindUp {
            return;
        }
        let duration = self.windup_value;
        self.windup_value = 0;
        self.begin_period(TimerState::Work, duration);
        info!("work started from wind-up, {} s", duration);
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// Adds a task and makes it current. Ignored once [`MAX_TASKS`] exist.
    ///
    /// [`MAX_TASKS`]: crate::types::MAX_TASKS
    pub fn add_task(&mut self) {
        if self.tasks.add_task() {
            self.persist_task_selection();
            info!("task {} added", self.tasks.current_task_id());
        }
    }

    /// Makes `task_id` current. Ignored if the task does not exist.
    pub fn select_task(&mut self, task_id: u8) {
        if self.tasks.select(task_id) {
            self.persist_u8(keys::CURRENT_TASK, task_id);
            debug!("task {} selected", task_id);
        }
    }

    /// Sets the number of tasks, moving the current task inside the range.
    pub fn set_total_tasks(&mut self, count: u8) {
        self.tasks.set_total_tasks(count);
        self.persist_task_selection();
    }

    /// Overwrites a task's completed counter. Ignored for unknown ids.
    pub fn set_task_completed_pomodoros(&mut self, task_id: u8, count: u8) {
        let count = MenuItem::EditCompletedPomodoros.range().clamp(count);
        if self.tasks.set_completed(task_id, count) {
            self.persist_task_counters(task_id as usize);
        }
    }

    /// Overwrites a task's interrupted counter. Ignored for unknown ids.
    pub fn set_task_interrupted_pomodoros(&mut self, task_id: u8, count: u8) {
        let count = MenuItem::EditInterruptedPomodoros.range().clamp(count);
        if self.tasks.set_interrupted(task_id, count) {
            self.persist_task_counters(task_id as usize);
        }
    }

    /// Zeroes every task counter and the session count. Tasks are kept.
    pub fn reset_task_stats(&mut self) {
        self.tasks.clear_counters();
        self.completed_sessions = 0;
        self.persist_tasks();
        info!("task statistics cleared");
    }

    /// Factory-resets tasks and statistics. Timer settings are kept.
    pub fn reset_save_state(&mut self) {
        self.tasks.reset();
        self.completed_sessions = 0;
        self.pomodoros_since_long_break = 0;
        self.persist_tasks();
        info!("saved state reset");
    }

    // ------------------------------------------------------------------
    // Idle / power
    // ------------------------------------------------------------------

    /// True when the supply voltage indicates external USB power.
    pub fn is_on_usb_power(&self, battery_voltage: f32) -> bool {
        PowerSource::from_voltage(battery_voltage) == PowerSource::Usb
    }

    /// Decides whether the device should go to sleep now.
    ///
    /// Only idle time counts: in any other state the idle timer restarts and
    /// the answer is false. On USB power with sleep-on-USB disabled the
    /// answer is always false.
    pub fn check_idle_timeout(&mut self, battery_voltage: f32) -> bool {
        let now = self.now();
        if self.state != TimerState::Idle {
            self.idle.reset(now);
            return false;
        }

        let source = PowerSource::from_voltage(battery_voltage);
        let minutes = match source {
            PowerSource::Usb if !self.settings.sleep_on_usb => return false,
            PowerSource::Usb => self.settings.idle_timeout_usb,
            PowerSource::Battery => self.settings.idle_timeout_battery,
        };

        let expired = self.idle.has_expired(now, minutes);
        if expired {
            info!("idle for {} min on {}, sleeping", minutes, source);
        }
        expired
    }

    /// Registers user activity.
    pub fn reset_idle_timer(&mut self) {
        let now = self.now();
        self.idle.reset(now);
    }

    // ------------------------------------------------------------------
    // Settings setters
    // ------------------------------------------------------------------

    /// Sets the work period length in minutes, clamped to 1-60.
    pub fn set_work_duration(&mut self, minutes: u8) {
        self.settings.work_duration = MenuItem::PomodoroLength.range().clamp(minutes);
        self.persist_u8(keys::WORK_DURATION, self.settings.work_duration);
    }

    /// Sets the short break length in minutes, clamped to 1-15.
    pub fn set_short_break_duration(&mut self, minutes: u8) {
        self.settings.short_break_duration = MenuItem::ShortBreakLength.range().clamp(minutes);
        self.persist_u8(keys::SHORT_BREAK, self.settings.short_break_duration);
    }

    /// Sets the long break length in minutes, clamped to 5-30.
    pub fn set_long_break_duration(&mut self, minutes: u8) {
        self.settings.long_break_duration = MenuItem::LongBreakLength.range().clamp(minutes);
        self.persist_u8(keys::LONG_BREAK, self.settings.long_break_duration);
    }

    /// Sets how many work periods come before a long break, clamped to 2-10.
    pub fn set_pomodoros_before_long_break(&mut self, count: u8) {
        self.settings.pomodoros_before_long_break =
            MenuItem::PomodorosBeforeLongBreak.range().clamp(count);
        self.persist_u8(
            keys::POMODOROS_BEFORE_LONG_BREAK,
            self.settings.pomodoros_before_long_break,
        );
    }

    /// Sets the idle timeout on battery in minutes, clamped to 1-30.
    ///
    /// Stored under the legacy `idleTimeout` key.
    pub fn set_idle_timeout_battery(&mut self, minutes: u8) {
        self.settings.idle_timeout_battery = MenuItem::IdleTimeoutBattery.range().clamp(minutes);
        self.persist_u8(keys::IDLE_TIMEOUT_BATTERY, self.settings.idle_timeout_battery);
    }

    /// Sets the idle timeout on USB power in minutes, clamped to 1-60.
    pub fn set_idle_timeout_usb(&mut self, minutes: u8) {
        self.settings.idle_timeout_usb = MenuItem::IdleTimeoutUsb.range().clamp(minutes);
        self.persist_u8(keys::IDLE_TIMEOUT_USB, self.settings.idle_timeout_usb);
    }

    /// Allows or forbids sleeping while USB powered.
    pub fn set_sleep_on_usb(&mut self, enabled: bool) {
        self.settings.sleep_on_usb = enabled;
        self.persist_bool(keys::SLEEP_ON_USB, enabled);
    }

    /// Sets the display brightness, clamped to 0-7.
    pub fn set_brightness_level(&mut self, level: u8) {
        self.settings.brightness_level = MenuItem::Brightness.range().clamp(level);
        self.persist_u8(keys::BRIGHTNESS, self.settings.brightness_level);
    }

    /// Sets the colour theme id, clamped to 1-2.
    pub fn set_theme(&mut self, theme_id: u8) {
        self.settings.theme_id = MenuItem::Theme.range().clamp(theme_id);
        self.persist_u8(keys::THEME, self.settings.theme_id);
    }

    /// Enables or disables the wind-up gesture.
    pub fn set_windup_enabled(&mut self, enabled: bool) {
        self.settings.windup_enabled = enabled;
        self.persist_bool(keys::WINDUP_ENABLED, enabled);
    }

    /// Sets the alarm length in seconds, clamped to 1-10.
    pub fn set_alarm_duration(&mut self, seconds: u8) {
        self.settings.alarm_duration = MenuItem::AlarmDuration.range().clamp(seconds);
        self.persist_u8(keys::ALARM_DURATION, self.settings.alarm_duration);
    }

    /// Enables or disables vibration during the alarm.
    pub fn set_alarm_vibration(&mut self, enabled: bool) {
        self.settings.alarm_vibration_enabled = enabled;
        self.persist_bool(keys::ALARM_VIBRATION, enabled);
    }

    /// Enables or disables the display flash during the alarm.
    pub fn set_alarm_flash(&mut self, enabled: bool) {
        self.settings.alarm_flash_enabled = enabled;
        self.persist_bool(keys::ALARM_FLASH, enabled);
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    fn persist_u8(&mut self, key: &str, value: u8) {
        if self.store.store_u8(key, value).is_err() {
            warn!("failed to persist {}", key);
        }
    }

    fn persist_bool(&mut self, key: &str, value: bool) {
        if self.store.store_bool(key, value).is_err() {
            warn!("failed to persist {}", key);
        }
    }

    fn persist_task_selection(&mut self) {
        if self.tasks.save_selection(&mut self.store).is_err() {
            warn!("failed to persist task selection");
        }
    }

    fn persist_task_counters(&mut self, task_id: usize) {
        if self.tasks.save_counters(&mut self.store, task_id).is_err() {
            warn!("failed to persist counters of task {}", task_id);
        }
    }

    fn persist_tasks(&mut self) {
        if self.tasks.save(&mut self.store).is_err() {
            warn!("failed to persist task statistics");
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the current state of the timer.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// The period that ended and raised the running alert, if any.
    pub fn previous_state(&self) -> Option<TimerState> {
        self.alert.map(|alert| alert.previous())
    }

    /// Length of the active period in seconds.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Seconds left in the active period as of the last `tick()`.
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_time
    }

    /// Whole minutes left, for an `MM:SS` display.
    pub fn remaining_minutes(&self) -> u32 {
        self.remaining_time / 60
    }

    /// Seconds part of the time left, 0-59.
    pub fn remaining_seconds_in_minute(&self) -> u32 {
        self.remaining_time % 60
    }

    /// True during a work period, running or paused.
    pub fn is_work_period(&self) -> bool {
        matches!(self.state, TimerState::Work | TimerState::PausedWork)
    }

    /// True during either break, running or paused.
    pub fn is_break_period(&self) -> bool {
        matches!(
            self.state,
            TimerState::ShortBreak
                | TimerState::LongBreak
                | TimerState::PausedShortBreak
                | TimerState::PausedLongBreak
        )
    }

    /// Work periods completed since power-up.
    pub fn completed_sessions(&self) -> u8 {
        self.completed_sessions
    }

    /// Breaks taken since the last long break.
    pub fn pomodoros_since_last_long_break(&self) -> u8 {
        self.pomodoros_since_long_break
    }

    /// Task credited with the next finished or interrupted pomodoro.
    pub fn current_task_id(&self) -> u8 {
        self.tasks.current_task_id()
    }

    /// Number of tasks, 1 to [`MAX_TASKS`](crate::types::MAX_TASKS).
    pub fn total_tasks(&self) -> u8 {
        self.tasks.total_tasks()
    }

    /// Completed pomodoros of a task, zero for unknown ids.
    pub fn task_completed_pomodoros(&self, task_id: u8) -> u8 {
        self.tasks.completed(task_id)
    }

    /// Interrupted pomodoros of a task, zero for unknown ids.
    pub fn task_interrupted_pomodoros(&self, task_id: u8) -> u8 {
        self.tasks.interrupted(task_id)
    }

    /// All task counters and the selection.
    pub fn task_stats(&self) -> &TaskStats {
        &self.tasks
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Work period length in minutes.
    pub fn work_duration(&self) -> u8 {
        self.settings.work_duration
    }

    /// Short break length in minutes.
    pub fn short_break_duration(&self) -> u8 {
        self.settings.short_break_duration
    }

    /// Long break length in minutes.
    pub fn long_break_duration(&self) -> u8 {
        self.settings.long_break_duration
    }

    /// Work periods before a long break.
    pub fn pomodoros_before_long_break(&self) -> u8 {
        self.settings.pomodoros_before_long_break
    }

    /// Idle timeout on battery, in minutes.
    pub fn idle_timeout_battery(&self) -> u8 {
        self.settings.idle_timeout_battery
    }

    /// Idle timeout on USB power, in minutes.
    pub fn idle_timeout_usb(&self) -> u8 {
        self.settings.idle_timeout_usb
    }

    /// Whether the device may sleep while USB powered.
    pub fn sleep_on_usb(&self) -> bool {
        self.settings.sleep_on_usb
    }

    /// Display brightness, 0-7.
    pub fn brightness_level(&self) -> u8 {
        self.settings.brightness_level
    }

    /// Colour theme id, 1 or 2.
    pub fn theme_id(&self) -> u8 {
        self.settings.theme_id
    }

    /// Whether `start_windup` begins the gesture or starts work directly.
    pub fn windup_enabled(&self) -> bool {
        self.settings.windup_enabled
    }

    /// Alarm length in seconds.
    pub fn alarm_duration(&self) -> u8 {
        self.settings.alarm_duration
    }

    /// Whether the alarm vibrates.
    pub fn alarm_vibration_enabled(&self) -> bool {
        self.settings.alarm_vibration_enabled
    }

    /// Whether the alarm flashes the display.
    pub fn alarm_flash_enabled(&self) -> bool {
        self.settings.alarm_flash_enabled
    }

    /// True while the end-of-period alarm runs.
    pub fn is_alert_active(&self) -> bool {
        self.alert.is_some()
    }

    /// Blink phase of the running alert, 0 or 1. Zero when no alert runs.
    pub fn blink_count(&self) -> u8 {
        self.alert.map_or(0, |alert| alert.blink_count())
    }

    /// True while the alert runs and vibration is enabled.
    pub fn should_vibrate(&self) -> bool {
        self.is_alert_active() && self.settings.alarm_vibration_enabled
    }

    /// True during the lit half of the blink when flash is enabled.
    pub fn should_flash(&self) -> bool {
        self.settings.alarm_flash_enabled && self.blink_count() == 1
    }

    /// Seconds wound up so far.
    pub fn windup_value(&self) -> u32 {
        self.windup_value
    }

    /// Wind-up progress towards the full work length, 0-100.
    pub fn windup_percentage(&self) -> u32 {
        match self.windup_max() {
            0 => 0,
            max => self.windup_value * 100 / max,
        }
    }

    /// When the current idle period began.
    pub fn idle_start_time(&self) -> Millis {
        self.idle.started()
    }

    /// Active colour theme. Pair with [`Theme::state_color`] to draw the timer.
    pub fn theme(&self) -> &'static Theme {
        Theme::from_id(self.settings.theme_id)
    }

    /// Returns a reference to the settings store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the engine, returning its settings store.
    pub fn into_store(self) -> S {
        self.store
    }
}
