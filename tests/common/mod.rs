//! Shared test infrastructure for pomodoro-core integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use pomodoro_core::{MemoryStore, Millis, SettingsStore, TimeSource, TimerEngine};

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<Millis>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(millis: u32) -> Self {
        Self {
            current_time: core::cell::Cell::new(Millis(millis)),
        }
    }

    /// Advance time by the given number of milliseconds, wrapping like a hardware tick
    pub fn advance(&self, millis: u32) {
        let current = self.current_time.get();
        self.current_time.set(current.wrapping_add(millis));
    }

    pub fn advance_secs(&self, secs: u32) {
        self.advance(secs * 1000);
    }

    pub fn advance_minutes(&self, minutes: u32) {
        self.advance(minutes * 60 * 1000);
    }

    pub fn set_time(&self, millis: u32) {
        self.current_time.set(Millis(millis));
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Millis {
        self.current_time.get()
    }
}

// ============================================================================
// Stores
// ============================================================================

/// Store whose writes always fail and whose loads always return defaults
pub struct FailingStore;

#[derive(Debug)]
pub struct WriteRejected;

impl SettingsStore for FailingStore {
    type Error = WriteRejected;

    fn load_u8(&self, _key: &str, default: u8) -> u8 {
        default
    }

    fn load_bool(&self, _key: &str, default: bool) -> bool {
        default
    }

    fn store_u8(&mut self, _key: &str, _value: u8) -> Result<(), WriteRejected> {
        Err(WriteRejected)
    }

    fn store_bool(&mut self, _key: &str, _value: bool) -> Result<(), WriteRejected> {
        Err(WriteRejected)
    }
}

pub type TestEngine<'t> = TimerEngine<'t, MemoryStore, MockTimeSource>;

/// Engine over an empty in-memory store
pub fn engine(clock: &MockTimeSource) -> TestEngine<'_> {
    TimerEngine::new(MemoryStore::new(), clock)
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Drives a started period to its end and through the alarm
pub fn run_period_through_alert(timer: &mut TestEngine<'_>, clock: &MockTimeSource) {
    clock.advance_secs(timer.duration());
    timer.tick();
    clock.advance_secs(timer.alarm_duration() as u32);
    timer.tick();
}
