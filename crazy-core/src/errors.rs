//! Error types for `crazy_core`.
//!
//! All Rust-side failures are funnelled through [`CrazyInputError`], which
//! uses `thiserror` for `Display` and `Error` derives.  C ABI conversion is
//! handled in the `crazy-ffi` crate.

use thiserror::Error;

/// Top-level error type for the `crazy_core` library.
///
/// Each variant corresponds to a distinct subsystem.
#[derive(Debug, Error)]
pub enum CrazyInputError {
    /// No top-level window belongs to the requested process.
    #[error("WindowNotFound: no window for process {0}")]
    WindowNotFound(u32),

    /// Cursor / keyboard / mouse synthesis failure.
    #[error("InputError: {0}")]
    InputError(String),

    /// Window enumeration, rect query or placement failure.
    #[error("WindowError: {0}")]
    WindowError(String),

    /// Action script or config could not be parsed.
    #[error("ScriptError: {0}")]
    ScriptError(#[from] serde_json::Error),

    /// File or process I/O failure.
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),

    /// Any other native (Win32) failure.
    #[error("PlatformError: {0}")]
    PlatformError(String),
}

/// Convert a `windows::core::Error` (Win32 HRESULT failure) into a
/// `CrazyInputError::PlatformError`.
#[cfg(windows)]
impl From<windows::core::Error> for CrazyInputError {
    fn from(err: windows::core::Error) -> Self {
        CrazyInputError::PlatformError(format!("Win32 error: {err}"))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CrazyInputError>;
