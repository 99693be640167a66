use std::io::Write;

use tempo_core::format_elapsed;

use crate::context::CliContext;

pub fn stopwatch_start(ctx: &CliContext) {
    ctx.stopwatch.start();
    println!("stopwatch running");
}

pub fn stopwatch_pause(ctx: &CliContext) {
    ctx.stopwatch.pause();
    println!(
        "stopwatch paused at {}",
        format_elapsed(ctx.stopwatch.current_elapsed())
    );
}

pub fn stopwatch_reset(ctx: &CliContext) {
    ctx.stopwatch.reset();
    println!("stopwatch reset");
}

pub fn stopwatch_lap(ctx: &CliContext) {
    let lap = ctx.stopwatch.lap();
    println!("lap at {}", format_elapsed(lap.elapsed));
}

pub fn stopwatch_show(ctx: &CliContext) {
    println!("{}", format_elapsed(ctx.stopwatch.current_elapsed()));
    let laps = ctx.stopwatch.laps();
    let total = laps.len();
    for (i, lap) in laps.iter().enumerate() {
        println!("  lap {:>3}: {}", total - i, format_elapsed(lap.elapsed));
    }
}

pub fn timer_set(ctx: &CliContext, input: &str) {
    ctx.countdown.configure(input);
    println!("timer duration staged: {input}");
}

pub fn timer_start(ctx: &CliContext) {
    ctx.countdown.start();
    if ctx.countdown.is_running() {
        println!("timer running: {}", ctx.countdown.subscribe().borrow().clone());
    } else {
        println!("timer not started; stage a duration first, e.g. `timer-set 1:30`");
    }
}

pub fn timer_pause(ctx: &CliContext) {
    ctx.countdown.pause();
    println!(
        "timer paused at {}",
        ctx.countdown.subscribe().borrow().clone()
    );
}

pub fn timer_reset(ctx: &CliContext) {
    ctx.countdown.reset();
    println!("timer reset");
}

pub fn timer_show(ctx: &CliContext) {
    let display = ctx.countdown.subscribe().borrow().clone();
    if ctx.countdown.is_completed() {
        println!("{display} (done)");
    } else if ctx.countdown.is_running() {
        println!("{display}");
    } else {
        println!("{display} (paused)");
    }
}

pub fn show_clocks(ctx: &CliContext) {
    let snapshot = ctx.world_clock.subscribe().borrow().clone();
    for zone in &snapshot.zones {
        println!("{:<20} {}", zone.zone, zone.time);
    }
}

pub fn set_zone(ctx: &CliContext, zone: &str) {
    ctx.world_clock.set_timezone(Some(zone));
    println!("extra zone set to {zone}");
}

pub fn clear_zone(ctx: &CliContext) {
    ctx.world_clock.set_timezone(None);
    println!("extra zone cleared");
}

pub fn exit() {
    write!(std::io::stdout(), "quitting...").expect("error exiting");
    std::io::stdout().flush().expect("error flushing stdout");
}
