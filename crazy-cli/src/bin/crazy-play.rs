//! Play a JSON action script against the desktop at a fixed tick rate.

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crazy_core::mapper::{ScreenCamera, Viewport};
use crazy_core::platform::{create_platform, Platform};
use crazy_core::script::Script;
use crazy_core::{ActionQueue, QueueConfig, StepContext, StepOutcome};

#[derive(Parser)]
#[command(name = "crazy-play", about = "Play a timed input action script")]
struct Args {
    /// Path to the JSON action script
    script: PathBuf,

    /// Optional JSON queue config (cooldowns, move tuning, fps)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the tick rate
    #[arg(long)]
    fps: Option<u32>,

    /// Map script coordinates into this process's window instead of the
    /// whole screen
    #[arg(long)]
    pid: Option<u32>,

    /// Play against an in-memory desktop and only log the input
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn viewport_for(platform: &dyn Platform, pid: Option<u32>) -> Result<Viewport, String> {
    let (_, screen_height) = platform.screen_size().map_err(|e| e.to_string())?;
    let Some(pid) = pid else {
        return Ok(Viewport::fullscreen(screen_height));
    };
    let window = platform
        .find_window_for_process(pid)
        .ok_or_else(|| format!("no window for process {pid}"))?;
    let rect = platform.window_rect(window.hwnd).map_err(|e| e.to_string())?;
    log::info!("attached to {:?} ({:#x})", window.title, window.hwnd);
    Ok(Viewport::from_window(rect, screen_height))
}

fn run(args: Args) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => QueueConfig::load(path).map_err(|e| e.to_string())?,
        None => QueueConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.fps = fps;
    }

    let script = Script::load(&args.script).map_err(|e| e.to_string())?;
    let mut queue = ActionQueue::new();
    queue.replace(script.into_actions(&config));
    log::info!("loaded {} action(s) from {}", queue.len(), args.script.display());

    let mut platform = create_platform(args.dry_run);
    let viewport = viewport_for(platform.as_ref(), args.pid)?;
    let camera = ScreenCamera;
    let interval = Duration::from_secs_f32(config.tick_interval());

    let started = Instant::now();
    let mut last = started;
    let mut ticks: u64 = 0;
    while !queue.is_empty() {
        thread::sleep(interval);
        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f32();
        last = now;

        let mut ctx = StepContext::new(platform.as_input_mut(), &camera, viewport)
            .with_move_settings(config.move_settings);
        if queue.step(&mut ctx, delta) == StepOutcome::Completed {
            log::info!("{} action(s) left", queue.len());
        }
        ticks += 1;
    }

    log::info!(
        "script finished in {ticks} ticks ({:.2}s)",
        started.elapsed().as_secs_f32()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_millis()
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
