//! Machine snapshot and running-process names via the `sysinfo` crate.
//!
//! # Caching
//!
//! The first successful [`collect_system_info`] result is kept for the life
//! of the process; a failed collection is not cached, so a later call tries
//! again.  `sysinfo::System` and the cache sit behind `parking_lot::Mutex` +
//! `OnceLock`.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

use parking_lot::Mutex;
use serde::Serialize;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, ProcessRefreshKind, RefreshKind, System};

use crate::process::run_process;

const BYTES_PER_GB: u64 = 1000 * 1000 * 1000;

// ---------------------------------------------------------------------------
// Singletons
// ---------------------------------------------------------------------------

static SYSTEM: OnceLock<Mutex<System>> = OnceLock::new();
static SNAPSHOT: OnceLock<Mutex<Option<SystemSnapshot>>> = OnceLock::new();

fn get_system() -> &'static Mutex<System> {
    SYSTEM.get_or_init(|| {
        Mutex::new(System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        ))
    })
}

fn snapshot_cache() -> &'static Mutex<Option<SystemSnapshot>> {
    SNAPSHOT.get_or_init(|| Mutex::new(None))
}

// ---------------------------------------------------------------------------
// Data transfer objects
// ---------------------------------------------------------------------------

/// Owned snapshot of the machine -- fully `Send` and serializable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub user_name: String,
    pub machine_name: String,
    pub os_name: String,
    pub processor_count: usize,
    pub is_64bit: bool,
    pub memory_gb: u64,
}

/// Deduplicated names of running processes, without `.exe`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessNames {
    names: BTreeSet<String>,
}

impl ProcessNames {
    pub fn add(&mut self, name: &str) {
        self.names.insert(strip_exe(name).to_owned());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(strip_exe(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

fn strip_exe(name: &str) -> &str {
    match name.len().checked_sub(4) {
        Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".exe") => {
            &name[..cut]
        }
        _ => name,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Friendly Windows release name from a version string.
///
/// Accepts what `sysinfo` reports on Windows, `"{major} ({build})"` such as
/// `"11 (22631)"` or `"0 (7601)"` (pre-10 releases have no major number in
/// the registry), as well as NT strings like `"Microsoft Windows NT 6.1.7601"`.
/// Windows 11 still reports as NT 10 and maps to `"windows 10"`.
///
/// Returns `None` for versions this table does not know.
pub fn windows_name_from_version(version: &str) -> Option<&'static str> {
    let v = version.trim();
    if let Some((major, rest)) = v.split_once(" (") {
        let build = rest.strip_suffix(')')?.trim().parse::<u32>().ok()?;
        let major = major.trim().parse::<u32>().ok()?;
        if major >= 10 {
            return Some("windows 10");
        }
        return Some(windows_name_from_build(build));
    }

    let v = v.strip_prefix("Microsoft Windows NT ").unwrap_or(v);
    const TABLE: &[(&str, &str)] = &[
        ("10", "windows 10"),
        ("6.3", "windows 8.1"),
        ("6.2", "windows 8"),
        ("6.1", "windows 7"),
        ("6.0", "windows vista"),
        ("5", "windows xp"),
    ];
    TABLE
        .iter()
        .find(|(prefix, _)| v.starts_with(prefix))
        .map(|(_, name)| *name)
}

/// First build number of each NT release.
fn windows_name_from_build(build: u32) -> &'static str {
    match build {
        10240.. => "windows 10",
        9600.. => "windows 8.1",
        9200.. => "windows 8",
        7600.. => "windows 7",
        6000.. => "windows vista",
        _ => "windows xp",
    }
}

fn current_user_name() -> String {
    std::env::var("USERNAME")
        .or_else(|_| std::env::var("USER"))
        .unwrap_or_else(|_| "Unknown".to_owned())
}

/// 64-bit OS: either a 64-bit process, or a 32-bit one under WOW64.
fn is_64bit_os() -> bool {
    cfg!(target_pointer_width = "64") || std::env::var_os("PROCESSOR_ARCHITEW6432").is_some()
}

fn os_name() -> String {
    let version = System::os_version().unwrap_or_default();
    if cfg!(windows) {
        if let Some(name) = windows_name_from_version(&version) {
            return name.to_owned();
        }
    }
    System::long_os_version().unwrap_or_else(|| "Unknown".to_owned())
}

fn collect_uncached(account_helper: Option<&Path>) -> Option<SystemSnapshot> {
    let mut sys = get_system().lock();
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    let processor_count = sys.cpus().len();
    let total_memory = sys.total_memory();
    if processor_count == 0 || total_memory == 0 {
        log::warn!(
            "sysinfo returned an empty machine (cpus={processor_count}, memory={total_memory})"
        );
        return None;
    }
    drop(sys);

    let os_name = os_name();
    let mut user_name = current_user_name();

    // Newer Windows reports the short logon name; a helper can resolve the
    // full account name.
    if os_name.contains("10") {
        if let Some(helper) = account_helper {
            let dir = helper.parent().unwrap_or_else(|| Path::new("."));
            let program = helper.file_name().and_then(|f| f.to_str()).unwrap_or_default();
            match run_process(dir, program, &[]) {
                Ok(Some(name)) => user_name = name,
                Ok(None) => {}
                Err(e) => log::warn!("account helper failed: {e}"),
            }
        }
    }

    Some(SystemSnapshot {
        user_name,
        machine_name: System::host_name().unwrap_or_else(|| "Unknown".to_owned()),
        os_name,
        processor_count,
        is_64bit: is_64bit_os(),
        memory_gb: total_memory / BYTES_PER_GB,
    })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Collect (or return the cached) machine snapshot.
///
/// `account_helper` optionally names a console program whose first output
/// line replaces the user name on Windows 10+.  Returns `None` when
/// collection failed; the failure is not cached.
pub fn collect_system_info(account_helper: Option<&Path>) -> Option<SystemSnapshot> {
    let mut cache = snapshot_cache().lock();
    if let Some(snapshot) = cache.as_ref() {
        return Some(snapshot.clone());
    }
    let snapshot = collect_uncached(account_helper)?;
    *cache = Some(snapshot.clone());
    Some(snapshot)
}

/// Names of all running processes.
pub fn process_names() -> ProcessNames {
    let sys = System::new_with_specifics(
        RefreshKind::nothing().with_processes(ProcessRefreshKind::nothing()),
    );
    let mut names = ProcessNames::default();
    for process in sys.processes().values() {
        names.add(&process.name().to_string_lossy());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_name_from_version() {
        assert_eq!(
            windows_name_from_version("Microsoft Windows NT 10.0.19045.0"),
            Some("windows 10")
        );
        assert_eq!(
            windows_name_from_version("Microsoft Windows NT 6.3.9600"),
            Some("windows 8.1")
        );
        assert_eq!(windows_name_from_version("6.2.9200"), Some("windows 8"));
        assert_eq!(windows_name_from_version("6.1.7601"), Some("windows 7"));
        assert_eq!(windows_name_from_version("6.0.6002"), Some("windows vista"));
        assert_eq!(windows_name_from_version("5.1.2600"), Some("windows xp"));
        assert_eq!(windows_name_from_version("Darwin 23.1"), None);
    }

    #[test]
    fn test_windows_name_from_sysinfo_format() {
        assert_eq!(windows_name_from_version("10 (19045)"), Some("windows 10"));
        assert_eq!(windows_name_from_version("11 (22631)"), Some("windows 10"));
        assert_eq!(windows_name_from_version("0 (9600)"), Some("windows 8.1"));
        assert_eq!(windows_name_from_version("0 (9200)"), Some("windows 8"));
        assert_eq!(windows_name_from_version("0 (7601)"), Some("windows 7"));
        assert_eq!(windows_name_from_version("0 (6002)"), Some("windows vista"));
        assert_eq!(windows_name_from_version("0 (2600)"), Some("windows xp"));
        assert_eq!(windows_name_from_version("11 (build)"), None);
    }

    #[test]
    fn test_windows_11_keeps_account_helper_branch() {
        let name = windows_name_from_version("11 (26100)").unwrap();
        assert!(name.contains("10"));
    }

    #[test]
    fn test_process_names_dedup_and_strip_exe() {
        let mut names = ProcessNames::default();
        names.add("Game.exe");
        names.add("Game");
        names.add("explorer.EXE");
        assert_eq!(names.len(), 2);
        assert!(names.contains("Game"));
        assert!(!names.contains("game.exe"));
        assert!(names.contains("explorer"));
    }

    #[test]
    fn test_strip_exe_short_names() {
        assert_eq!(strip_exe("exe"), "exe");
        assert_eq!(strip_exe(".exe"), "");
        assert_eq!(strip_exe("a.exe"), "a");
    }

    #[test]
    fn test_snapshot_is_cached() {
        let first = collect_system_info(None);
        let second = collect_system_info(None);
        assert_eq!(first, second);
        if let Some(s) = first {
            assert!(s.processor_count > 0);
        }
    }

    #[test]
    fn test_snapshot_serialization() {
        let s = SystemSnapshot {
            user_name: "player".into(),
            machine_name: "RIG".into(),
            os_name: "windows 10".into(),
            processor_count: 8,
            is_64bit: true,
            memory_gb: 16,
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"os_name\":\"windows 10\""));
        assert!(json.contains("\"memory_gb\":16"));
    }
}
