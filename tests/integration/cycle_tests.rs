//! Idle → Blinking → Idle, cancellation, and the Sleeping path, driven
//! through the full service loop (button poll → state machine → mocks).

use crate::mock_hw::{HwCall, MemStore, Rig};

use filtertimer::app::events::AppEvent;
use filtertimer::drivers::color::{BLUE_LOW, GREEN_LOW, RED_LOW};
use filtertimer::fsm::FilterState;
use filtertimer::timers::{TimerMode, TimerTag};

/// Press seen at 100 ms, release seen at 600 ms.
fn start_cycle(rig: &mut Rig) {
    rig.hold();
    rig.run_until(100);
    rig.run_until(500);
    rig.release();
    rig.run_until(600);
    assert_eq!(rig.state(), FilterState::Blinking);
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn starts_idle_green_with_actuator_inactive() {
    let rig = Rig::new();
    assert_eq!(rig.state(), FilterState::Idle);
    assert!(rig.hw().line_high);
    assert_eq!(rig.hw().lit, Some(GREEN_LOW));
    assert_eq!(
        rig.events().first(),
        Some(&AppEvent::Started {
            state: FilterState::Idle,
            duration_ms: 50_000
        })
    );
}

#[test]
fn stored_duration_is_loaded_at_startup() {
    let rig = Rig::with_store(MemStore::holding(7_000));
    assert_eq!(rig.machine().duration_ms(), 7_000);
}

// ── Press / short release ─────────────────────────────────────

#[test]
fn press_turns_indicator_blue() {
    let mut rig = Rig::new();
    rig.hold();
    rig.run_until(100);
    assert_eq!(rig.state(), FilterState::Idle);
    assert_eq!(rig.hw().last_color(), Some(BLUE_LOW));
    let timers = rig.machine().timers();
    assert!(timers.is_armed(TimerTag::LongPressCheck));
    assert_eq!(timers.period_ms(TimerTag::LongPressCheck), 100);
    assert!(!timers.is_armed(TimerTag::Idle));
}

#[test]
fn short_press_starts_blinking_cycle() {
    let mut rig = Rig::new();
    start_cycle(&mut rig);

    let timers = rig.machine().timers();
    assert_eq!(timers.period_ms(TimerTag::Blink), 500);
    assert_eq!(timers.mode(TimerTag::Blink), TimerMode::Periodic);
    assert_eq!(timers.period_ms(TimerTag::Completion), 50_000);
    assert_eq!(timers.mode(TimerTag::Completion), TimerMode::OneShot);
    assert_eq!(timers.handle(TimerTag::Completion).due_at_ms, 50_600);
    assert!(!timers.is_armed(TimerTag::LongPressCheck));
    assert_eq!(rig.hw().last_color(), Some(GREEN_LOW));
    assert!(rig
        .events()
        .contains(&AppEvent::CycleStarted { duration_ms: 50_000 }));
}

#[test]
fn blinking_toggles_green_every_half_second() {
    let mut rig = Rig::new();
    start_cycle(&mut rig);
    rig.run_until(1_100);
    assert_eq!(rig.hw().lit, None);
    rig.run_until(1_600);
    assert_eq!(rig.hw().lit, Some(GREEN_LOW));
    assert_eq!(rig.hw().count(&HwCall::Toggle), 2);
}

#[test]
fn hold_just_under_threshold_still_blinks() {
    let mut rig = Rig::new();
    rig.hold();
    rig.run_until(1_950);
    rig.release();
    // Long-press sample at 2000 sees 1900 ms held; the poll then sees the release.
    rig.run_until(2_000);
    assert_eq!(rig.state(), FilterState::Blinking);
}

#[test]
fn blip_between_polls_is_not_seen() {
    let mut rig = Rig::new();
    rig.run_until(120);
    rig.hold();
    rig.run_until(180);
    rig.release();
    rig.run_until(300);
    assert_eq!(rig.state(), FilterState::Idle);
    assert_eq!(rig.hw().last_color(), Some(GREEN_LOW));
}

// ── Cancellation ──────────────────────────────────────────────

#[test]
fn press_while_blinking_cancels_and_returns_to_idle() {
    let mut rig = Rig::new();
    start_cycle(&mut rig);
    rig.hold();
    rig.run_until(700);

    // Blocked for the 250 ms pulse and 1000 ms red display.
    assert_eq!(rig.now(), 1_950);
    assert_eq!(rig.state(), FilterState::Idle);
    assert!(rig.machine().is_canceling());
    assert_eq!(
        rig.hw().calls_since(700),
        vec![
            HwCall::Line(false),
            HwCall::Delay(250),
            HwCall::Line(true),
            HwCall::SetColor(RED_LOW),
            HwCall::Delay(1_000),
            HwCall::SetColor(GREEN_LOW),
        ]
    );
    assert_eq!(rig.hw().line_writes(false), vec![700]);

    let timers = rig.machine().timers();
    assert!(!timers.is_armed(TimerTag::Blink));
    assert!(!timers.is_armed(TimerTag::Completion));
    assert_eq!(timers.handle(TimerTag::Idle).due_at_ms, 6_950);
    assert!(rig.events().contains(&AppEvent::CycleCancelled));

    // The cancelling release does not start a new cycle.
    rig.release();
    rig.run_until(2_000);
    assert_eq!(rig.state(), FilterState::Idle);
    assert!(!rig.machine().is_canceling());
    let started = rig
        .events()
        .iter()
        .filter(|e| matches!(e, AppEvent::CycleStarted { .. }))
        .count();
    assert_eq!(started, 1);
}

// ── Completion ────────────────────────────────────────────────

#[test]
fn completion_pulses_actuator_for_exactly_250ms() {
    let mut rig = Rig::with_store(MemStore::holding(3_000));
    start_cycle(&mut rig);
    rig.run_until(3_590);
    assert_eq!(rig.state(), FilterState::Blinking);

    rig.run_until(3_600);
    assert_eq!(rig.state(), FilterState::Idle);
    let low = rig.hw().line_writes(false);
    let high = rig.hw().line_writes(true);
    assert_eq!(low, vec![3_600]);
    assert_eq!(high.last(), Some(&3_850));
    assert_eq!(rig.hw().last_color(), Some(GREEN_LOW));
    assert!(rig.hw().line_high);
    // Completion outranks the blink due at the same instant.
    assert_eq!(rig.hw().count(&HwCall::Toggle), 5);
    assert!(rig.events().contains(&AppEvent::CycleCompleted));
    assert!(rig
        .events()
        .contains(&AppEvent::ActuatorPulsed { pulse_ms: 250 }));
}

// ── Sleeping ──────────────────────────────────────────────────

#[test]
fn idle_timeout_sleeps_with_indicator_off() {
    let mut rig = Rig::new();
    rig.run_until(4_990);
    assert_eq!(rig.state(), FilterState::Idle);
    rig.run_until(5_000);
    assert_eq!(rig.state(), FilterState::Sleeping);
    assert_eq!(rig.hw().lit, None);
    assert_eq!(rig.hw().calls.last().map(|(_, c)| c), Some(&HwCall::Off));
    assert_eq!(
        rig.app.machine().sink().transitions(),
        vec![(FilterState::Idle, FilterState::Sleeping)]
    );
}

#[test]
fn short_release_while_sleeping_returns_to_idle() {
    let mut rig = Rig::new();
    rig.run_until(5_000);
    rig.hold();
    rig.run_until(5_100);
    // Press is inert while sleeping.
    assert!(rig.hw().calls_since(5_100).is_empty());
    rig.run_until(5_300);
    rig.release();
    rig.run_until(5_400);

    assert_eq!(rig.state(), FilterState::Idle);
    assert_eq!(rig.hw().line_writes(false), vec![5_400]);
    assert_eq!(rig.hw().last_color(), Some(GREEN_LOW));
    assert_eq!(
        rig.machine().timers().handle(TimerTag::Idle).due_at_ms,
        11_650
    );
}

#[test]
fn long_release_while_sleeping_is_ignored() {
    let mut rig = Rig::new();
    rig.run_until(5_000);
    rig.hold();
    rig.run_until(7_450);
    rig.release();
    rig.run_until(7_500);
    assert_eq!(rig.state(), FilterState::Sleeping);
    assert!(rig.hw().line_writes(false).is_empty());
}
