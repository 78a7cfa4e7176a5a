//! Print the machine snapshot or running process names as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use crazy_core::system_info::{collect_system_info, process_names};

#[derive(Parser)]
#[command(name = "crazy-sysinfo", about = "Machine snapshot and process names")]
struct Args {
    /// List running process names instead of the machine snapshot
    #[arg(long)]
    processes: bool,

    /// Exit 0 if a process with this name is running, 1 otherwise
    #[arg(long, value_name = "NAME")]
    running: Option<String>,

    /// Helper program whose first output line is the account name
    #[arg(long)]
    account_helper: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    if let Some(name) = args.running {
        return if process_names().contains(&name) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    if args.processes {
        let all = process_names();
        let names: Vec<&str> = all.iter().collect();
        println!("{}", serde_json::Value::from(names));
        return ExitCode::SUCCESS;
    }

    match collect_system_info(args.account_helper.as_deref()) {
        Some(snapshot) => match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("crazy-sysinfo: JSON serialization failed: {e}");
                ExitCode::FAILURE
            }
        },
        None => {
            eprintln!("crazy-sysinfo: system information unavailable");
            ExitCode::FAILURE
        }
    }
}
