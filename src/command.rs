//! Command-based control of the timer engine.

/// Input commands accepted by [`TimerEngine::handle_command`].
///
/// Lets an input task queue decoded encoder and button events for the control
/// loop that owns the engine.
///
/// [`TimerEngine::handle_command`]: crate::engine::TimerEngine::handle_command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerCommand {
    /// Start a work period.
    StartWork,
    /// Start the next break.
    StartBreak,
    /// Pause the running period.
    Pause,
    /// Resume the paused period.
    Resume,
    /// Abandon everything and go idle.
    Reset,
    /// Abandon the work period, counting it as interrupted.
    Interrupt,
    /// Open the settings menu.
    OpenMenu,
    /// Close the settings menu.
    CloseMenu,
    /// Move the menu cursor.
    NavigateMenu(i8),
    /// Edit the highlighted menu item.
    SelectMenuItem,
    /// Change the value being edited.
    AdjustValue(i8),
    /// Commit the value being edited.
    ConfirmValue,
    /// Add a task and make it current.
    AddTask,
    /// Make a task current.
    SelectTask(u8),
    /// Zero all task statistics.
    ResetTaskStats,
    /// Factory-reset tasks and statistics.
    ResetSaveState,
    /// Begin the wind-up gesture (or start work if disabled).
    StartWindup,
    /// Abandon the wind-up gesture.
    CancelWindup,
    /// Wind up or down by whole minutes.
    IncrementWindup(i8),
    /// Start work with the wound-up duration.
    StartWorkFromWindup,
    /// Register user activity.
    ResetIdleTimer,
}
