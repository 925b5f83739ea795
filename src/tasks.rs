//! Per-task pomodoro statistics.

use core::fmt::Write;

use heapless::String;

use crate::menu::MenuItem;
use crate::settings::keys;
use crate::store::{KEY_CAPACITY, SettingsStore};
use crate::types::MAX_TASKS;

/// Builds the storage key of a per-task counter, e.g. `comp3` or `int11`.
pub fn task_key(prefix: &str, task_id: usize) -> String<KEY_CAPACITY> {
    let mut key = String::new();
    let written = write!(key, "{}{}", prefix, task_id);
    debug_assert!(written.is_ok(), "task key overflows KEY_CAPACITY");
    key
}

/// Completed and interrupted counters for up to [`MAX_TASKS`] tasks.
///
/// Every index is bounds-checked: out-of-range ids read as zero and are
/// ignored on write. `current_task_id < total_tasks` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskStats {
    completed: [u8; MAX_TASKS],
    interrupted: [u8; MAX_TASKS],
    total_tasks: u8,
    current_task_id: u8,
}

impl Default for TaskStats {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStats {
    /// One task, all counters zero.
    pub const fn new() -> Self {
        Self {
            completed: [0; MAX_TASKS],
            interrupted: [0; MAX_TASKS],
            total_tasks: 1,
            current_task_id: 0,
        }
    }

    /// Loads the task selection and every counter.
    pub fn load<S: SettingsStore>(store: &S) -> Self {
        let mut stats = Self::new();
        stats.set_total_tasks(store.load_u8(keys::TOTAL_TASKS, 1));
        stats.select(store.load_u8(keys::CURRENT_TASK, 0));

        for id in 0..MAX_TASKS {
            stats.completed[id] = store.load_u8(&task_key(keys::COMPLETED_PREFIX, id), 0);
            stats.interrupted[id] = store.load_u8(&task_key(keys::INTERRUPTED_PREFIX, id), 0);
        }
        stats
    }

    /// Writes the task selection and every counter.
    pub fn save<S: SettingsStore>(&self, store: &mut S) -> Result<(), S::Error> {
        self.save_selection(store)?;
        for id in 0..MAX_TASKS {
            self.save_counters(store, id)?;
        }
        Ok(())
    }

    /// Writes `totalTasks` and `currentTask`.
    pub fn save_selection<S: SettingsStore>(&self, store: &mut S) -> Result<(), S::Error> {
        store.store_u8(keys::TOTAL_TASKS, self.total_tasks)?;
        store.store_u8(keys::CURRENT_TASK, self.current_task_id)
    }

    /// Writes both counters of one task. Out-of-range ids write nothing.
    pub fn save_counters<S: SettingsStore>(
        &self,
        store: &mut S,
        task_id: usize,
    ) -> Result<(), S::Error> {
        if task_id >= MAX_TASKS {
            return Ok(());
        }
        store.store_u8(
            &task_key(keys::COMPLETED_PREFIX, task_id),
            self.completed[task_id],
        )?;
        store.store_u8(
            &task_key(keys::INTERRUPTED_PREFIX, task_id),
            self.interrupted[task_id],
        )
    }

    pub fn total_tasks(&self) -> u8 {
        self.total_tasks
    }

    pub fn current_task_id(&self) -> u8 {
        self.current_task_id
    }

    /// Completed pomodoros of a task, zero for unknown ids.
    pub fn completed(&self, task_id: u8) -> u8 {
        self.completed.get(task_id as usize).copied().unwrap_or(0)
    }

    /// Interrupted pomodoros of a task, zero for unknown ids.
    pub fn interrupted(&self, task_id: u8) -> u8 {
        self.interrupted.get(task_id as usize).copied().unwrap_or(0)
    }

    /// Sets the task count, clamped to `1..=MAX_TASKS`, pulling the current
    /// task back inside the new range.
    pub fn set_total_tasks(&mut self, count: u8) {
        self.total_tasks = MenuItem::ManageTasks.range().clamp(count);
        if self.current_task_id >= self.total_tasks {
            self.current_task_id = self.total_tasks - 1;
        }
    }

    /// Appends a task and makes it current. Returns false when full.
    pub fn add_task(&mut self) -> bool {
        if self.total_tasks as usize >= MAX_TASKS {
            return false;
        }
        self.total_tasks += 1;
        self.current_task_id = self.total_tasks - 1;
        true
    }

    /// Makes `task_id` current. Returns false if it does not exist.
    pub fn select(&mut self, task_id: u8) -> bool {
        if task_id >= self.total_tasks {
            return false;
        }
        self.current_task_id = task_id;
        true
    }

    /// Counts a finished pomodoro against the current task.
    pub fn record_completed(&mut self) -> usize {
        let id = self.current_task_id as usize;
        if let Some(count) = self.completed.get_mut(id) {
            *count = count.saturating_add(1);
        }
        id
    }

    /// Counts an abandoned pomodoro against the current task.
    pub fn record_interrupted(&mut self) -> usize {
        let id = self.current_task_id as usize;
        if let Some(count) = self.interrupted.get_mut(id) {
            *count = count.saturating_add(1);
        }
        id
    }

    /// Overwrites a completed counter. Returns false for unknown ids.
    pub fn set_completed(&mut self, task_id: u8, count: u8) -> bool {
        match self.completed.get_mut(task_id as usize) {
            Some(slot) => {
                *slot = count;
                true
            }
            None => false,
        }
    }

    /// Overwrites an interrupted counter. Returns false for unknown ids.
    pub fn set_interrupted(&mut self, task_id: u8, count: u8) -> bool {
        match self.interrupted.get_mut(task_id as usize) {
            Some(slot) => {
                *slot = count;
                true
            }
            None => false,
        }
    }

    /// Zeroes every counter, keeping the task selection.
    pub fn clear_counters(&mut self) {
        self.completed = [0; MAX_TASKS];
        self.interrupted = [0; MAX_TASKS];
    }

    /// Back to a single empty task.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
