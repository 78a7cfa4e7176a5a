//! Blocking external process runner.
//!
//! Runs a console helper and hands back the first line it prints.  The
//! caller's thread is blocked until the child exits, so keep this off any
//! per-frame path.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::errors::Result;

/// Run `program` from `dir` with `args`, returning its first stdout line.
///
/// Returns `Ok(None)` when the executable does not exist or printed
/// nothing.  The trailing newline is stripped.
pub fn run_process(dir: &Path, program: &str, args: &[&str]) -> Result<Option<String>> {
    let path = dir.join(program);
    if !path.is_file() {
        log::debug!("run_process: {} not found", path.display());
        return Ok(None);
    }

    let mut child = Command::new(&path)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let mut first_line = String::new();
    if let Some(stdout) = child.stdout.take() {
        let mut reader = BufReader::new(stdout);
        reader.read_line(&mut first_line)?;
        // Drain the rest so the child never blocks on a full pipe.
        std::io::copy(&mut reader, &mut std::io::sink())?;
    }

    let status = child.wait()?;
    log::debug!("run_process: {} exited with {status}", path.display());

    let line = first_line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        Ok(None)
    } else {
        Ok(Some(line.to_owned()))
    }
}
