//! Long-press Training: entry, capture, persistence success and failure.

use crate::mock_hw::{HwCall, MemStore, Rig};

use filtertimer::app::events::AppEvent;
use filtertimer::drivers::color::{BLUE_LOW, GREEN_LOW, ORANGE_LOW, RED_LOW};
use filtertimer::error::{DurationError, Error, PersistenceError};
use filtertimer::fsm::FilterState;
use filtertimer::timers::TimerTag;

/// Press seen at 100 ms; the 100 ms long-press sample at 2100 ms enters Training.
fn enter_training(rig: &mut Rig) {
    rig.hold();
    rig.run_until(2_090);
    assert_eq!(rig.state(), FilterState::Idle);
    rig.run_until(2_100);
    assert_eq!(rig.state(), FilterState::Training);
}

/// Release seen at 5100 ms: a 5000 ms capture.
fn release_after_5s(rig: &mut Rig) {
    rig.run_until(5_050);
    rig.release();
    rig.run_until(5_100);
}

#[test]
fn hold_of_two_seconds_enters_training() {
    let mut rig = Rig::new();
    enter_training(&mut rig);
    let timers = rig.machine().timers();
    assert_eq!(timers.period_ms(TimerTag::Blink), 200);
    assert!(!timers.is_armed(TimerTag::LongPressCheck));
    assert!(!timers.is_armed(TimerTag::Idle));
    assert_eq!(rig.hw().last_color(), Some(BLUE_LOW));
}

#[test]
fn training_blinks_blue_rapidly() {
    let mut rig = Rig::new();
    enter_training(&mut rig);
    rig.run_until(2_500);
    assert_eq!(rig.hw().count(&HwCall::Toggle), 2);
    assert_eq!(rig.hw().lit, Some(BLUE_LOW));
}

#[test]
fn release_at_exactly_threshold_is_a_training_release() {
    let mut rig = Rig::new();
    rig.hold();
    rig.run_until(2_050);
    rig.release();
    rig.run_until(2_100);
    assert_eq!(rig.store().value, Some(2_000));
    assert_eq!(rig.machine().duration_ms(), 2_000);
    assert_eq!(rig.state(), FilterState::Idle);
}

#[test]
fn training_release_saves_captured_duration() {
    let mut rig = Rig::new();
    enter_training(&mut rig);
    release_after_5s(&mut rig);

    assert_eq!(rig.store().value, Some(5_000));
    assert_eq!(rig.machine().duration_ms(), 5_000);
    assert_eq!(rig.state(), FilterState::Idle);
    assert_eq!(rig.hw().last_color(), Some(GREEN_LOW));
    assert_eq!(rig.hw().count(&HwCall::SetColor(ORANGE_LOW)), 3);
    assert_eq!(rig.hw().count(&HwCall::Delay(500)), 6);
    // Three 500 ms on/off flashes, then the pulse.
    assert_eq!(rig.hw().line_writes(false), vec![8_100]);
    assert!(rig
        .events()
        .contains(&AppEvent::TrainingSaved { duration_ms: 5_000 }));
    assert_eq!(
        rig.app.machine().sink().transitions(),
        vec![
            (FilterState::Idle, FilterState::Training),
            (FilterState::Training, FilterState::Idle),
        ]
    );
}

#[test]
fn next_cycle_uses_trained_duration() {
    let mut rig = Rig::new();
    enter_training(&mut rig);
    release_after_5s(&mut rig);
    assert_eq!(rig.now(), 9_350);

    rig.hold();
    rig.run_until(9_400);
    rig.run_until(9_700);
    rig.release();
    rig.run_until(9_800);
    assert_eq!(rig.state(), FilterState::Blinking);
    let completion = rig.machine().timers().handle(TimerTag::Completion);
    assert_eq!(completion.period_ms, 5_000);
    assert_eq!(completion.due_at_ms, 14_800);
}

#[test]
fn failed_save_flashes_red_and_keeps_duration() {
    let mut rig = Rig::with_store(MemStore::failing());
    enter_training(&mut rig);
    release_after_5s(&mut rig);

    assert_eq!(rig.store().writes, 1);
    assert_eq!(rig.store().value, None);
    assert_eq!(rig.machine().duration_ms(), 50_000);
    assert_eq!(rig.state(), FilterState::Idle);
    assert_eq!(rig.hw().last_color(), Some(GREEN_LOW));
    // Three error flashes plus the stop-to-idle red.
    assert_eq!(rig.hw().count(&HwCall::SetColor(RED_LOW)), 4);
    assert_eq!(rig.hw().count(&HwCall::SetColor(ORANGE_LOW)), 0);
    assert!(rig.events().contains(&AppEvent::TrainingRejected {
        captured_ms: 5_000,
        reason: Error::Persistence(PersistenceError::Io),
    }));
}

#[test]
fn zero_capture_is_rejected_without_saving() {
    let mut rig = Rig::with_store(MemStore::holding(9_000));
    enter_training(&mut rig);
    // Release stamped at the press instant.
    rig.app.machine_mut().on_release(100);

    assert_eq!(rig.store().writes, 0);
    assert_eq!(rig.store().value, Some(9_000));
    assert_eq!(rig.machine().duration_ms(), 9_000);
    assert_eq!(rig.state(), FilterState::Idle);
    assert_eq!(rig.hw().last_color(), Some(GREEN_LOW));
    assert!(rig.hw().line_high);
    assert!(rig.events().contains(&AppEvent::TrainingRejected {
        captured_ms: 0,
        reason: Error::Duration(DurationError::NonPositive),
    }));
}

#[test]
fn press_during_training_is_inert() {
    let mut rig = Rig::new();
    enter_training(&mut rig);
    rig.app.machine_mut().on_press(2_200);
    assert_eq!(rig.state(), FilterState::Training);
}
