//! Platform abstraction for cursor, click, keyboard and window operations.
//!
//! The queue and mapper only ever see these traits.  Two backends exist:
//! [`win32`] for the real desktop on Windows, and [`virtual_desktop`], an
//! in-memory desktop used for dry runs, tests and non-Windows hosts.

pub mod virtual_desktop;
#[cfg(windows)]
pub mod win32;

use serde::Serialize;

use crate::errors::Result;
use crate::geometry::{OsPoint, OsRect, ScreenRect};

pub use virtual_desktop::VirtualDesktop;

/// Owned snapshot of a top-level window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowInfo {
    pub hwnd: isize,
    pub title: String,
    pub pid: u32,
}

/// Synthetic mouse and keyboard input.
pub trait InputDriver {
    /// Absolute cursor position in OS space.
    fn cursor_position(&self) -> Result<OsPoint>;

    fn set_cursor_position(&mut self, point: OsPoint) -> Result<()>;

    /// Issue left-button edges at the current cursor position.  `down` and
    /// `up` together form a click; one of them alone lets a drag be built
    /// from two separate actions.
    fn synthesize_click(&mut self, down: bool, up: bool) -> Result<()>;

    /// Type Unicode text into the focused window.
    fn send_keys(&mut self, text: &str) -> Result<()>;
}

/// Top-level window queries and placement.
pub trait WindowSystem {
    /// Snapshot of every top-level window at call time.
    fn enumerate_windows(&self) -> Result<Vec<WindowInfo>>;

    fn window_rect(&self, hwnd: isize) -> Result<OsRect>;

    /// Move (and resize unless `move_only`) a window.
    fn set_window_rect(&mut self, hwnd: isize, rect: OsRect, move_only: bool) -> Result<()>;

    /// Primary screen `(width, height)` in pixels.
    fn screen_size(&self) -> Result<(i32, i32)>;

    /// First window in the enumeration owned by `pid`.
    ///
    /// Returns `None` if no window matches or enumeration failed.
    fn find_window_for_process(&self, pid: u32) -> Option<WindowInfo> {
        match self.enumerate_windows() {
            Ok(windows) => windows.into_iter().find(|w| w.pid == pid),
            Err(e) => {
                log::warn!("window enumeration failed: {e}");
                None
            }
        }
    }

    /// Window rect in screen (bottom-left origin) convention.
    fn screen_window_rect(&self, hwnd: isize) -> Result<ScreenRect> {
        let (_, height) = self.screen_size()?;
        Ok(ScreenRect::from_os(self.window_rect(hwnd)?, height))
    }

    /// Place a window from a screen-convention rect.  A zero-size rect only
    /// moves the window.
    fn set_screen_window_rect(&mut self, hwnd: isize, rect: ScreenRect) -> Result<()> {
        let (_, height) = self.screen_size()?;
        self.set_window_rect(hwnd, rect.to_os(height), rect.is_move_only())
    }
}

/// Everything a host needs from the OS.
pub trait Platform: InputDriver + WindowSystem {
    /// The input half, for building a [`StepContext`](crate::queue::StepContext).
    fn as_input_mut(&mut self) -> &mut dyn InputDriver;
}

impl<T: InputDriver + WindowSystem> Platform for T {
    fn as_input_mut(&mut self) -> &mut dyn InputDriver {
        self
    }
}

/// Create the platform appropriate for the current OS.
///
/// `force_virtual` selects the in-memory desktop even on Windows.
pub fn create_platform(force_virtual: bool) -> Box<dyn Platform> {
    if force_virtual {
        log::debug!("using virtual desktop");
        return Box::new(VirtualDesktop::default());
    }
    #[cfg(windows)]
    {
        log::debug!("using win32 platform");
        Box::new(win32::Win32Platform)
    }
    #[cfg(not(windows))]
    {
        log::warn!("no native input backend on this OS, using virtual desktop");
        Box::new(VirtualDesktop::default())
    }
}
