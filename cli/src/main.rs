use clap::{Parser, Subcommand};
use std::io::Write;
use tempo_cli::CliContext;
use tempo_cli::commands;
use tempo_cli::logging;
use tempo_cli::readline;

#[tokio::main]
async fn main() -> Result<(), String> {
    logging::init();

    let ctx = CliContext::new();
    ctx.world_clock.start();

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx) {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "time widgets: stopwatch, countdown, world clocks")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or resume the stopwatch
    SwStart,
    /// Pause the stopwatch
    SwPause,
    /// Reset the stopwatch and clear laps
    SwReset,
    /// Capture a lap
    SwLap,
    /// Show elapsed time and laps
    SwShow,
    /// Stage a countdown duration: M, M:S, or H:M:S
    TimerSet { input: String },
    /// Start or resume the countdown
    TimerStart,
    /// Pause the countdown
    TimerPause,
    /// Reset the countdown
    TimerReset,
    /// Show remaining time
    TimerShow,
    /// Show the world clocks
    Clocks,
    /// Add an extra world clock zone, e.g. Australia/Sydney
    SetZone { zone: String },
    /// Remove the extra world clock zone
    ClearZone,
    Exit,
}

fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "tempo".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::SwStart) => commands::stopwatch_start(ctx),
        Some(Commands::SwPause) => commands::stopwatch_pause(ctx),
        Some(Commands::SwReset) => commands::stopwatch_reset(ctx),
        Some(Commands::SwLap) => commands::stopwatch_lap(ctx),
        Some(Commands::SwShow) => commands::stopwatch_show(ctx),
        Some(Commands::TimerSet { input }) => commands::timer_set(ctx, input),
        Some(Commands::TimerStart) => commands::timer_start(ctx),
        Some(Commands::TimerPause) => commands::timer_pause(ctx),
        Some(Commands::TimerReset) => commands::timer_reset(ctx),
        Some(Commands::TimerShow) => commands::timer_show(ctx),
        Some(Commands::Clocks) => commands::show_clocks(ctx),
        Some(Commands::SetZone { zone }) => commands::set_zone(ctx, zone),
        Some(Commands::ClearZone) => commands::clear_zone(ctx),
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
