//! Standalone CLI tool for window lookup and placement.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use crazy_core::geometry::ScreenRect;
use crazy_core::platform::{create_platform, Platform};
use crazy_core::CrazyInputError;

#[derive(Parser)]
#[command(name = "crazy-windows", about = "Enumerate, find and place top-level windows")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every top-level window as JSON
    List {
        /// Skip windows without a title
        #[arg(long)]
        titled: bool,
    },
    /// Print the first window owned by a process
    Find {
        /// Process ID
        pid: u32,
    },
    /// Print a process window's rect (bottom-left origin)
    Rect {
        /// Process ID
        pid: u32,
    },
    /// Move a process window; give width and height to resize as well
    Place {
        /// Process ID
        pid: u32,
        /// Left edge
        x: f32,
        /// Top edge, measured from the bottom of the screen
        y: f32,
        #[arg(long, default_value_t = 0.0)]
        width: f32,
        #[arg(long, default_value_t = 0.0)]
        height: f32,
    },
}

fn window_for(platform: &dyn Platform, pid: u32) -> Result<isize, CrazyInputError> {
    platform
        .find_window_for_process(pid)
        .map(|w| w.hwnd)
        .ok_or(CrazyInputError::WindowNotFound(pid))
}

fn run(command: Command) -> Result<serde_json::Value, CrazyInputError> {
    let mut platform = create_platform(false);

    match command {
        Command::List { titled } => {
            let windows: Vec<_> = platform
                .enumerate_windows()?
                .into_iter()
                .filter(|w| !titled || !w.title.is_empty())
                .collect();
            Ok(serde_json::to_value(windows)?)
        }
        Command::Find { pid } => {
            let window = platform
                .find_window_for_process(pid)
                .ok_or(CrazyInputError::WindowNotFound(pid))?;
            Ok(serde_json::to_value(window)?)
        }
        Command::Rect { pid } => {
            let hwnd = window_for(platform.as_ref(), pid)?;
            Ok(serde_json::to_value(platform.screen_window_rect(hwnd)?)?)
        }
        Command::Place {
            pid,
            x,
            y,
            width,
            height,
        } => {
            let hwnd = window_for(platform.as_ref(), pid)?;
            let rect = ScreenRect {
                x,
                y,
                width,
                height,
            };
            platform.set_screen_window_rect(hwnd, rect)?;
            Ok(serde_json::to_value(platform.screen_window_rect(hwnd)?)?)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .format_timestamp(None)
        .init();

    let args = Args::parse();
    match run(args.command) {
        Ok(value) => {
            println!("{value:#}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("crazy-windows: {e}");
            ExitCode::FAILURE
        }
    }
}
