//! In-memory desktop: a cursor, a list of windows and an event log.
//!
//! Behaves like the real desktop where it matters to callers (cursor
//! clamped to the screen, unknown window handles fail) and records every
//! synthesized event so dry runs and tests can inspect them.

use crate::errors::{CrazyInputError, Result};
use crate::geometry::{OsPoint, OsRect};

use super::{InputDriver, WindowInfo, WindowSystem};

/// One synthesized input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Move(OsPoint),
    ButtonDown(OsPoint),
    ButtonUp(OsPoint),
    Keys(String),
}

#[derive(Debug, Clone)]
struct VirtualWindow {
    info: WindowInfo,
    rect: OsRect,
}

#[derive(Debug, Clone)]
pub struct VirtualDesktop {
    width: i32,
    height: i32,
    cursor: OsPoint,
    windows: Vec<VirtualWindow>,
    events: Vec<InputEvent>,
    next_hwnd: isize,
}

impl Default for VirtualDesktop {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl VirtualDesktop {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cursor: OsPoint::new(width / 2, height / 2),
            windows: Vec::new(),
            events: Vec::new(),
            next_hwnd: 0x1_0000,
        }
    }

    /// Register a window and return its handle.
    pub fn add_window(&mut self, pid: u32, title: &str, rect: OsRect) -> isize {
        let hwnd = self.next_hwnd;
        self.next_hwnd += 2;
        self.windows.push(VirtualWindow {
            info: WindowInfo {
                hwnd,
                title: title.to_owned(),
                pid,
            },
            rect,
        });
        hwnd
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn window_mut(&mut self, hwnd: isize) -> Result<&mut VirtualWindow> {
        self.windows
            .iter_mut()
            .find(|w| w.info.hwnd == hwnd)
            .ok_or_else(|| CrazyInputError::WindowError(format!("invalid window handle {hwnd:#x}")))
    }
}

impl InputDriver for VirtualDesktop {
    fn cursor_position(&self) -> Result<OsPoint> {
        Ok(self.cursor)
    }

    fn set_cursor_position(&mut self, point: OsPoint) -> Result<()> {
        self.cursor = OsPoint::new(
            point.x.clamp(0, self.width - 1),
            point.y.clamp(0, self.height - 1),
        );
        log::debug!("virtual: cursor -> ({}, {})", self.cursor.x, self.cursor.y);
        self.events.push(InputEvent::Move(self.cursor));
        Ok(())
    }

    fn synthesize_click(&mut self, down: bool, up: bool) -> Result<()> {
        log::debug!(
            "virtual: click down={down} up={up} at ({}, {})",
            self.cursor.x,
            self.cursor.y
        );
        if down {
            self.events.push(InputEvent::ButtonDown(self.cursor));
        }
        if up {
            self.events.push(InputEvent::ButtonUp(self.cursor));
        }
        Ok(())
    }

    fn send_keys(&mut self, text: &str) -> Result<()> {
        log::debug!("virtual: keys {text:?}");
        self.events.push(InputEvent::Keys(text.to_owned()));
        Ok(())
    }
}

impl WindowSystem for VirtualDesktop {
    fn enumerate_windows(&self) -> Result<Vec<WindowInfo>> {
        Ok(self.windows.iter().map(|w| w.info.clone()).collect())
    }

    fn window_rect(&self, hwnd: isize) -> Result<OsRect> {
        self.windows
            .iter()
            .find(|w| w.info.hwnd == hwnd)
            .map(|w| w.rect)
            .ok_or_else(|| CrazyInputError::WindowError(format!("invalid window handle {hwnd:#x}")))
    }

    fn set_window_rect(&mut self, hwnd: isize, rect: OsRect, move_only: bool) -> Result<()> {
        let window = self.window_mut(hwnd)?;
        window.rect = if move_only {
            let (w, h) = (window.rect.width(), window.rect.height());
            OsRect {
                left: rect.left,
                top: rect.top,
                right: rect.left + w,
                bottom: rect.top + h,
            }
        } else {
            rect
        };
        Ok(())
    }

    fn screen_size(&self) -> Result<(i32, i32)> {
        Ok((self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ScreenRect;

    fn rect(left: i32, top: i32, right: i32, bottom: i32) -> OsRect {
        OsRect {
            left,
            top,
            right,
            bottom,
        }
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut d = VirtualDesktop::new(800, 600);
        d.set_cursor_position(OsPoint::new(-20, 9000)).unwrap();
        assert_eq!(d.cursor_position().unwrap(), OsPoint::new(0, 599));
    }

    #[test]
    fn test_click_edges_are_recorded() {
        let mut d = VirtualDesktop::new(800, 600);
        d.set_cursor_position(OsPoint::new(10, 20)).unwrap();
        d.clear_events();
        d.synthesize_click(true, true).unwrap();
        d.synthesize_click(false, true).unwrap();
        let at = OsPoint::new(10, 20);
        assert_eq!(
            d.events(),
            &[InputEvent::ButtonDown(at), InputEvent::ButtonUp(at), InputEvent::ButtonUp(at)]
        );
    }

    #[test]
    fn test_find_window_for_process() {
        let mut d = VirtualDesktop::default();
        d.add_window(7, "Launcher", rect(0, 0, 100, 100));
        let game = d.add_window(42, "Game", rect(10, 10, 810, 610));
        d.add_window(42, "Game Console", rect(0, 0, 50, 50));

        let found = d.find_window_for_process(42).unwrap();
        assert_eq!(found.hwnd, game);
        assert_eq!(found.title, "Game");
    }

    #[test]
    fn test_find_window_for_missing_process() {
        let mut d = VirtualDesktop::default();
        d.add_window(7, "Launcher", rect(0, 0, 100, 100));
        assert!(d.find_window_for_process(9999).is_none());
    }

    #[test]
    fn test_set_window_rect_move_only_keeps_size() {
        let mut d = VirtualDesktop::new(1920, 1080);
        let hwnd = d.add_window(1, "Game", rect(100, 100, 900, 700));
        let target = ScreenRect {
            x: 200.0,
            y: 879.0,
            width: 0.0,
            height: 0.0,
        };
        d.set_screen_window_rect(hwnd, target).unwrap();
        assert_eq!(d.window_rect(hwnd).unwrap(), rect(200, 200, 1000, 800));
    }

    #[test]
    fn test_screen_window_rect_round_trip() {
        let mut d = VirtualDesktop::new(1920, 1080);
        let hwnd = d.add_window(1, "Game", rect(100, 100, 900, 700));
        let r = d.screen_window_rect(hwnd).unwrap();
        d.set_screen_window_rect(hwnd, r).unwrap();
        assert_eq!(d.window_rect(hwnd).unwrap(), rect(100, 100, 900, 700));
    }

    #[test]
    fn test_unknown_handle_fails() {
        let d = VirtualDesktop::default();
        assert!(matches!(d.window_rect(1), Err(CrazyInputError::WindowError(_))));
    }
}
