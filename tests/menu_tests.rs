//! Integration tests for the settings menu

mod common;
use common::*;

use pomodoro_core::{MAX_TASKS, MenuItem, MenuState, TimerState, ValueKind};

/// Opens the menu and moves the cursor onto `item`
fn open_at(timer: &mut TestEngine<'_>, item: MenuItem) {
    timer.open_menu();
    for _ in 0..item.index() {
        timer.navigate_menu(1);
    }
    assert_eq!(timer.current_menu_item(), item);
}

#[test]
fn menu_opens_only_while_idle() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);

    timer.start_work();
    timer.open_menu();
    assert_eq!(timer.menu_state(), MenuState::Closed);

    timer.reset();
    timer.open_menu();
    assert_eq!(timer.menu_state(), MenuState::ListView);
    assert_eq!(timer.current_menu_item(), MenuItem::PomodoroLength);
}

#[test]
fn reopening_resets_cursor_to_first_item() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);

    open_at(&mut timer, MenuItem::Theme);
    timer.close_menu();
    assert_eq!(timer.menu_state(), MenuState::Closed);

    timer.open_menu();
    assert_eq!(timer.current_menu_item(), MenuItem::PomodoroLength);
}

#[test]
fn navigation_wraps_both_ways() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);
    timer.open_menu();

    timer.navigate_menu(-1);
    assert_eq!(timer.current_menu_item(), MenuItem::AlarmFlash);

    timer.navigate_menu(1);
    assert_eq!(timer.current_menu_item(), MenuItem::PomodoroLength);

    for _ in 0..MenuItem::COUNT {
        timer.navigate_menu(1);
    }
    assert_eq!(timer.current_menu_item(), MenuItem::PomodoroLength);
}

#[test]
fn navigation_is_ignored_outside_list_view() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);

    timer.navigate_menu(1);
    assert_eq!(timer.current_menu_item(), MenuItem::PomodoroLength);

    timer.open_menu();
    timer.select_menu_item();
    timer.navigate_menu(1);
    assert_eq!(timer.current_menu_item(), MenuItem::PomodoroLength);
}

#[test]
fn select_loads_live_value() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);
    timer.set_brightness_level(6);

    open_at(&mut timer, MenuItem::Brightness);
    timer.select_menu_item();

    assert_eq!(timer.menu_state(), MenuState::EditingValue);
    assert_eq!(timer.editing_value(), 6);
}

#[test]
fn toggles_load_as_zero_or_one() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);

    open_at(&mut timer, MenuItem::SleepOnUsb);
    timer.select_menu_item();
    assert_eq!(timer.editing_value(), 1);
    timer.close_menu();

    open_at(&mut timer, MenuItem::EnableWindup);
    timer.select_menu_item();
    assert_eq!(timer.editing_value(), 0);
}

#[test]
fn adjust_and_confirm_require_editing() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);
    timer.open_menu();

    timer.adjust_value(1);
    assert_eq!(timer.editing_value(), 0);

    timer.confirm_value();
    assert_eq!(timer.menu_state(), MenuState::ListView);
    assert_eq!(timer.work_duration(), 25);
}

#[test]
fn adjust_never_leaves_documented_range() {
    for item in MenuItem::ALL {
        let clock = MockTimeSource::new();
        let mut timer = engine(&clock);
        let range = item.range();

        open_at(&mut timer, item);
        timer.select_menu_item();

        match range.kind {
            ValueKind::Linear => {
                for _ in 0..120 {
                    timer.adjust_value(1);
                    assert!(timer.editing_value() <= range.max, "{:?}", item);
                }
                assert_eq!(timer.editing_value(), range.max, "{:?}", item);

                for _ in 0..120 {
                    timer.adjust_value(-1);
                    assert!(timer.editing_value() >= range.min, "{:?}", item);
                }
                assert_eq!(timer.editing_value(), range.min, "{:?}", item);
            }
            ValueKind::Toggle => {
                let start = timer.editing_value();
                timer.adjust_value(1);
                assert_eq!(timer.editing_value(), 1 - start, "{:?}", item);
                timer.adjust_value(1);
                assert_eq!(timer.editing_value(), start, "{:?}", item);
                timer.adjust_value(-1);
                assert_eq!(timer.editing_value(), 1 - start, "{:?}", item);
            }
        }
    }
}

#[test]
fn task_count_range_tops_out_at_capacity() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);
    open_at(&mut timer, MenuItem::ManageTasks);
    timer.select_menu_item();

    for _ in 0..50 {
        timer.adjust_value(1);
    }
    assert_eq!(timer.editing_value() as usize, MAX_TASKS);
}

#[test]
fn confirm_applies_and_persists_value() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);
    timer.open_menu();
    timer.select_menu_item();
    for _ in 0..5 {
        timer.adjust_value(1);
    }

    timer.confirm_value();

    assert_eq!(timer.menu_state(), MenuState::ListView);
    assert_eq!(timer.work_duration(), 30);
    assert_eq!(timer.store().get_u8("workDuration"), Some(30));
}

#[test]
fn confirm_toggle_persists_flag() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);
    open_at(&mut timer, MenuItem::SleepOnUsb);
    timer.select_menu_item();
    timer.adjust_value(-1);
    timer.confirm_value();

    assert!(!timer.sleep_on_usb());
    assert_eq!(timer.store().get_bool("sleepOnUSB"), Some(false));
}

#[test]
fn battery_timeout_is_stored_under_legacy_key() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);
    open_at(&mut timer, MenuItem::IdleTimeoutBattery);
    timer.select_menu_item();
    timer.adjust_value(1);
    timer.confirm_value();

    assert_eq!(timer.idle_timeout_battery(), 6);
    assert_eq!(timer.store().get_u8("idleTimeout"), Some(6));
}

#[test]
fn closing_while_editing_discards_edit() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);
    timer.open_menu();
    timer.select_menu_item();
    timer.adjust_value(10);

    timer.close_menu();

    assert_eq!(timer.menu_state(), MenuState::Closed);
    assert_eq!(timer.work_duration(), 25);
    assert_eq!(timer.store().get_u8("workDuration"), None);
}

#[test]
fn shrinking_task_count_through_menu_clamps_current_task() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);
    for _ in 0..4 {
        timer.add_task();
    }
    assert_eq!(timer.current_task_id(), 4);

    open_at(&mut timer, MenuItem::ManageTasks);
    timer.select_menu_item();
    assert_eq!(timer.editing_value(), 5);
    timer.adjust_value(-1);
    timer.adjust_value(-1);
    timer.confirm_value();

    assert_eq!(timer.total_tasks(), 3);
    assert_eq!(timer.current_task_id(), 2);
}

#[test]
fn counter_items_edit_the_current_task() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);
    timer.add_task();
    timer.add_task();
    timer.select_task(1);

    open_at(&mut timer, MenuItem::EditCompletedPomodoros);
    timer.select_menu_item();
    timer.adjust_value(3);
    timer.confirm_value();

    timer.navigate_menu(1);
    timer.select_menu_item();
    timer.adjust_value(2);
    timer.confirm_value();

    assert_eq!(timer.task_completed_pomodoros(1), 3);
    assert_eq!(timer.task_interrupted_pomodoros(1), 2);
    assert_eq!(timer.task_completed_pomodoros(0), 0);
    assert_eq!(timer.store().get_u8("comp1"), Some(3));
    assert_eq!(timer.store().get_u8("int1"), Some(2));
}

#[test]
fn menu_value_reports_live_settings() {
    let clock = MockTimeSource::new();
    let mut timer = engine(&clock);
    timer.set_alarm_duration(7);
    timer.set_windup_enabled(true);

    assert_eq!(timer.menu_value(MenuItem::AlarmDuration), 7);
    assert_eq!(timer.menu_value(MenuItem::EnableWindup), 1);
    assert_eq!(timer.menu_value(MenuItem::PomodoroLength), 25);
    assert_eq!(timer.state(), TimerState::Idle);
}
