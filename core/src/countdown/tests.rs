//! Countdown scenarios, driven by a fake clock and manual ticks.

use std::sync::Arc;
use std::time::Duration;

use crate::alert::CountingAlert;
use crate::clock::FakeClock;
use crate::scheduler::ManualScheduler;

use super::{CountdownTimerEngine, DurationParseError, parse_duration};

fn engine() -> (
    CountdownTimerEngine,
    FakeClock,
    ManualScheduler,
    Arc<CountingAlert>,
) {
    let clock = FakeClock::new();
    let scheduler = ManualScheduler::new();
    let alert = Arc::new(CountingAlert::new());
    let engine = CountdownTimerEngine::new(
        Arc::new(clock.clone()),
        Arc::new(scheduler.clone()),
        alert.clone(),
    );
    (engine, clock, scheduler, alert)
}

#[test]
fn parse_duration_field_positions() {
    assert_eq!(parse_duration("5").unwrap(), Duration::from_secs(300));
    assert_eq!(parse_duration("1:30").unwrap(), Duration::from_secs(90));
    assert_eq!(parse_duration("0:0:10").unwrap(), Duration::from_secs(10));
    assert_eq!(parse_duration("2:0:0").unwrap(), Duration::from_secs(7_200));
}

#[test]
fn parse_duration_clamps_and_defaults_fields() {
    assert_eq!(parse_duration("-5").unwrap(), Duration::ZERO);
    assert_eq!(parse_duration("1:xx").unwrap(), Duration::from_secs(60));
    assert_eq!(parse_duration("5:").unwrap(), Duration::from_secs(300));
    assert_eq!(parse_duration("10m").unwrap(), Duration::from_secs(600));
    assert_eq!(parse_duration(" 1:30 ").unwrap(), Duration::from_secs(90));

    // Absurdly large values saturate instead of overflowing.
    assert_eq!(
        parse_duration("9999999999999999999").unwrap(),
        Duration::from_secs(u64::MAX)
    );
    assert_eq!(
        parse_duration("99999999999999999999999").unwrap(),
        Duration::from_secs(u64::MAX)
    );
    assert_eq!(
        parse_duration("9999999999999999999:0:0").unwrap(),
        Duration::from_secs(u64::MAX)
    );
}

#[test]
fn parse_duration_rejects_unusable_input() {
    assert_eq!(parse_duration(""), Err(DurationParseError::Empty));
    assert_eq!(parse_duration("   "), Err(DurationParseError::Empty));
    assert!(matches!(
        parse_duration("abc"),
        Err(DurationParseError::NotNumeric { .. })
    ));
    assert!(matches!(
        parse_duration("1:2:3:4"),
        Err(DurationParseError::TooManyFields { .. })
    ));
}

#[test]
fn start_requires_usable_staged_input() {
    let (engine, _clock, scheduler, _alert) = engine();

    engine.start();
    assert!(!engine.is_running(), "nothing staged, nothing to start");

    engine.configure("abc");
    engine.start();
    assert!(!engine.is_running());

    engine.configure("0");
    engine.start();
    assert!(!engine.is_running(), "zero duration must not start");
    assert_eq!(scheduler.live_tasks(), 0);

    engine.configure("0:10");
    engine.start();
    assert!(engine.is_running());
    assert_eq!(engine.remaining(), Duration::from_secs(10));
    assert_eq!(scheduler.live_tasks(), 1);
    assert_eq!(scheduler.last_period(), Some(Duration::from_millis(250)));
}

#[test]
fn counts_down_by_tick_deltas() {
    let (engine, clock, scheduler, _alert) = engine();
    let display = engine.subscribe();

    engine.configure("0:10");
    engine.start();
    assert_eq!(*display.borrow(), "00:00:10");

    clock.advance(Duration::from_millis(250));
    scheduler.fire_all();
    // 9.75 s left still displays the unfinished tenth second.
    assert_eq!(engine.remaining(), Duration::from_millis(9_750));
    assert_eq!(*display.borrow(), "00:00:10");

    clock.advance(Duration::from_millis(750));
    scheduler.fire_all();
    assert_eq!(*display.borrow(), "00:00:09");
}

#[test]
fn completion_fires_alert_exactly_once() {
    let (engine, clock, scheduler, alert) = engine();

    engine.configure("0:1");
    engine.start();

    // One slow tick overshooting the deadline.
    clock.advance(Duration::from_millis(1_200));
    scheduler.fire_all();

    assert!(engine.is_completed());
    assert!(!engine.is_running());
    assert_eq!(engine.remaining(), Duration::ZERO);
    assert_eq!(alert.count(), 1);
    assert_eq!(
        scheduler.live_tasks(),
        0,
        "count tick must be cancelled on completion"
    );
    assert_eq!(*engine.subscribe().borrow(), "00:00:00");

    // Further sweeps must not re-fire.
    scheduler.fire_all();
    scheduler.fire_all();
    assert_eq!(alert.count(), 1);
}

#[test]
fn pause_freezes_remaining_and_resume_does_not_backfill() {
    let (engine, clock, scheduler, _alert) = engine();

    engine.configure("5");
    engine.start();

    for _ in 0..10 {
        clock.advance(Duration::from_millis(250));
        scheduler.fire_all();
        engine.pause();
        let frozen = engine.remaining();

        // Wall time spent paused is free.
        clock.advance(Duration::from_secs(30));
        engine.start();
        assert_eq!(engine.remaining(), frozen);
    }

    // Ten 250 ms ticks consumed exactly 2.5 seconds.
    assert_eq!(
        engine.remaining(),
        Duration::from_secs(300) - Duration::from_millis(2_500)
    );
}

#[test]
fn configure_while_paused_mid_run_is_inert() {
    let (engine, clock, scheduler, _alert) = engine();

    engine.configure("0:10");
    engine.start();
    clock.advance(Duration::from_secs(2));
    scheduler.fire_all();
    engine.pause();

    engine.configure("0:59");
    engine.start();
    // Resumes the paused value; the staged input waits for a reset.
    assert_eq!(engine.remaining(), Duration::from_secs(8));

    engine.reset();
    assert!(!engine.is_completed());
    assert_eq!(engine.remaining(), Duration::ZERO);

    engine.start();
    assert_eq!(engine.remaining(), Duration::from_secs(59));
}

#[test]
fn restart_after_completion_reuses_staged_input() {
    let (engine, clock, scheduler, alert) = engine();

    engine.configure("0:1");
    engine.start();
    clock.advance(Duration::from_secs(2));
    scheduler.fire_all();
    assert!(engine.is_completed());

    // The staged input is still there, like text left in an input box.
    engine.start();
    assert!(engine.is_running());
    assert!(!engine.is_completed());
    assert_eq!(engine.remaining(), Duration::from_secs(1));

    clock.advance(Duration::from_secs(2));
    scheduler.fire_all();
    assert_eq!(alert.count(), 2, "each completed cycle alerts once");
}

#[test]
fn double_start_keeps_one_count_task() {
    let (engine, _clock, scheduler, _alert) = engine();

    engine.configure("1");
    engine.start();
    engine.start();

    assert_eq!(scheduler.live_tasks(), 1);
    assert_eq!(engine.remaining(), Duration::from_secs(60));
}
