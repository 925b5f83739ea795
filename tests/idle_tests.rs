//! Integration tests for the idle/sleep decision

mod common;
use common::*;

use pomodoro_core::Millis;

const BATTERY: f32 = 3.9;
const USB: f32 = 5.1;

#[test]
fn power_source_from_voltage() {
    let clock = MockTimeSource::new();
    let timer = engine(&clock);

    assert!(timer.is_on_usb_power(USB));
    assert!(!timer.is_on_usb_power(BATTERY));
    assert!(!timer.is_on_usb_power(5.0));
}

#[test]
fn battery_timeout_fires_at_threshold() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);

    clock.advance(5 * 60 * 1000 - 1);
    assert!(!timer.check_idle_timeout(BATTERY));

    clock.advance(1);
    assert!(timer.check_idle_timeout(BATTERY));
}

#[test]
fn usb_timeout_uses_its_own_setting() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);

    clock.advance_minutes(29);
    assert!(!timer.check_idle_timeout(USB));
    assert!(timer.check_idle_timeout(BATTERY));

    clock.advance_minutes(1);
    assert!(timer.check_idle_timeout(USB));
}

#[test]
fn usb_never_sleeps_when_disabled() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);
    timer.set_sleep_on_usb(false);

    clock.advance_minutes(240);
    assert!(!timer.check_idle_timeout(USB));
    assert!(timer.check_idle_timeout(BATTERY));
}

#[test]
fn running_timer_never_sleeps_and_restarts_idle() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);

    clock.advance_minutes(4);
    timer.start_work();
    clock.advance_minutes(10);
    assert!(!timer.check_idle_timeout(BATTERY));
    assert_eq!(timer.idle_start_time(), Millis(14 * 60 * 1000));

    timer.reset();
    clock.advance_minutes(4);
    assert!(!timer.check_idle_timeout(BATTERY));
    clock.advance_minutes(1);
    assert!(timer.check_idle_timeout(BATTERY));
}

#[test]
fn paused_timer_never_sleeps() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);
    timer.start_work();
    timer.pause();

    clock.advance_minutes(60);
    assert!(!timer.check_idle_timeout(BATTERY));
}

#[test]
fn activity_restarts_idle_period() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);

    clock.advance_minutes(4);
    timer.reset_idle_timer();
    assert_eq!(timer.idle_start_time(), Millis(4 * 60 * 1000));

    clock.advance_minutes(4);
    assert!(!timer.check_idle_timeout(BATTERY));
    clock.advance_minutes(1);
    assert!(timer.check_idle_timeout(BATTERY));
}

#[test]
fn timeout_follows_setting_changes() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);
    timer.set_idle_timeout_battery(1);

    clock.advance_minutes(1);
    assert!(timer.check_idle_timeout(BATTERY));
}

#[test]
fn idle_period_survives_counter_wrap() {
    let clock = MockTimeSource::starting_at(u32::MAX - 60_000);
    let mut timer = engine(&clock);

    clock.advance_minutes(4);
    assert!(!timer.check_idle_timeout(BATTERY));

    clock.advance_minutes(1);
    assert!(timer.check_idle_timeout(BATTERY));
}
