//! Win32 backend: `SendInput`, cursor APIs and `EnumWindows`.
//!
//! Clicks are sent as relative (0, 0) mouse events so they land wherever
//! the cursor currently is; cursor placement goes through `SetCursorPos`.

use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, POINT, RECT, TRUE};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYEVENTF_KEYUP,
    KEYEVENTF_UNICODE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEINPUT, MOUSE_EVENT_FLAGS,
    VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetCursorPos, GetSystemMetrics, GetWindowRect, GetWindowTextLengthW,
    GetWindowTextW, GetWindowThreadProcessId, SetCursorPos, SetWindowPos, SM_CXSCREEN,
    SM_CYSCREEN, SWP_NOSIZE, SWP_NOZORDER,
};

use crate::errors::{CrazyInputError, Result};
use crate::geometry::{OsPoint, OsRect};

use super::{InputDriver, WindowInfo, WindowSystem};

/// Maximum text length to prevent unbounded allocation.
const MAX_TEXT_LENGTH: usize = 10_000;

/// Pre-computed size of `INPUT` struct for `SendInput` calls.
const INPUT_SIZE: i32 = std::mem::size_of::<INPUT>() as i32;

/// The real Windows desktop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Platform;

// ---------------------------------------------------------------------------
// Helpers: build INPUT structs
// ---------------------------------------------------------------------------

fn unicode_key_input(scan_code: u16, key_up: bool) -> INPUT {
    let flags = if key_up {
        KEYEVENTF_UNICODE | KEYEVENTF_KEYUP
    } else {
        KEYEVENTF_UNICODE
    };

    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(0),
                wScan: scan_code,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

/// Button event at the current cursor position (no move flag, zero delta).
fn button_input(flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: 0,
                dy: 0,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn send(inputs: &[INPUT]) -> Result<()> {
    let sent = unsafe { SendInput(inputs, INPUT_SIZE) } as usize;
    if sent == inputs.len() {
        Ok(())
    } else {
        Err(CrazyInputError::InputError(format!(
            "SendInput injected {sent} of {} events",
            inputs.len()
        )))
    }
}

fn to_hwnd(handle: isize) -> HWND {
    HWND(handle as *mut core::ffi::c_void)
}

/// Read the window title.
fn read_window_title(hwnd: HWND) -> String {
    let len = unsafe { GetWindowTextLengthW(hwnd) };
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u16; (len + 1) as usize];
    let copied = unsafe { GetWindowTextW(hwnd, &mut buf) };
    if copied <= 0 {
        return String::new();
    }
    OsString::from_wide(&buf[..copied as usize])
        .to_string_lossy()
        .into_owned()
}

/// Get the owning process ID for a window handle.
fn read_pid(hwnd: HWND) -> u32 {
    let mut pid: u32 = 0;
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };
    pid
}

/// Callback for EnumWindows that collects every top-level handle.
unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let handles = unsafe { &mut *(lparam.0 as *mut Vec<HWND>) };
    handles.push(hwnd);
    TRUE // continue enumeration
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl InputDriver for Win32Platform {
    fn cursor_position(&self) -> Result<OsPoint> {
        let mut p = POINT::default();
        unsafe { GetCursorPos(&mut p) }
            .map_err(|e| CrazyInputError::InputError(format!("GetCursorPos failed: {e}")))?;
        Ok(OsPoint::new(p.x, p.y))
    }

    fn set_cursor_position(&mut self, point: OsPoint) -> Result<()> {
        unsafe { SetCursorPos(point.x, point.y) }
            .map_err(|e| CrazyInputError::InputError(format!("SetCursorPos failed: {e}")))
    }

    fn synthesize_click(&mut self, down: bool, up: bool) -> Result<()> {
        let mut inputs = Vec::with_capacity(2);
        if down {
            inputs.push(button_input(MOUSEEVENTF_LEFTDOWN));
        }
        if up {
            inputs.push(button_input(MOUSEEVENTF_LEFTUP));
        }
        if inputs.is_empty() {
            return Ok(());
        }
        send(&inputs)
    }

    fn send_keys(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        if text.len() > MAX_TEXT_LENGTH {
            return Err(CrazyInputError::InputError(format!(
                "text exceeds {MAX_TEXT_LENGTH} bytes"
            )));
        }

        let chars: Vec<u16> = text.encode_utf16().collect();
        let mut inputs: Vec<INPUT> = Vec::with_capacity(chars.len() * 2);
        for &ch in &chars {
            inputs.push(unicode_key_input(ch, false));
            inputs.push(unicode_key_input(ch, true));
        }
        send(&inputs)
    }
}

impl WindowSystem for Win32Platform {
    fn enumerate_windows(&self) -> Result<Vec<WindowInfo>> {
        let mut handles: Vec<HWND> = Vec::with_capacity(256);
        unsafe {
            EnumWindows(
                Some(enum_callback),
                LPARAM(&mut handles as *mut Vec<HWND> as isize),
            )
        }
        .map_err(|e| CrazyInputError::WindowError(format!("EnumWindows failed: {e}")))?;

        Ok(handles
            .into_iter()
            .map(|hwnd| WindowInfo {
                hwnd: hwnd.0 as isize,
                title: read_window_title(hwnd),
                pid: read_pid(hwnd),
            })
            .collect())
    }

    fn window_rect(&self, hwnd: isize) -> Result<OsRect> {
        let mut raw = RECT::default();
        unsafe { GetWindowRect(to_hwnd(hwnd), &mut raw) }
            .map_err(|e| CrazyInputError::WindowError(format!("GetWindowRect failed: {e}")))?;
        Ok(OsRect {
            left: raw.left,
            top: raw.top,
            right: raw.right,
            bottom: raw.bottom,
        })
    }

    fn set_window_rect(&mut self, hwnd: isize, rect: OsRect, move_only: bool) -> Result<()> {
        let flags = if move_only {
            SWP_NOSIZE | SWP_NOZORDER
        } else {
            SWP_NOZORDER
        };
        unsafe {
            SetWindowPos(
                to_hwnd(hwnd),
                HWND::default(),
                rect.left,
                rect.top,
                rect.width(),
                rect.height(),
                flags,
            )
        }
        .map_err(|e| CrazyInputError::WindowError(format!("SetWindowPos failed: {e}")))
    }

    fn screen_size(&self) -> Result<(i32, i32)> {
        let (w, h) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        // GetSystemMetrics returns 0 on failure
        if w > 0 && h > 0 {
            Ok((w, h))
        } else {
            Err(CrazyInputError::PlatformError(
                "GetSystemMetrics returned an empty screen".to_owned(),
            ))
        }
    }
}
