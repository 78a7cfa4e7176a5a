//! Plain geometry value types shared by the mapper, actions and platforms.
//!
//! Two conventions coexist:
//! - *screen* space: origin bottom-left, Y grows upward, `f32` pixels
//!   (what a game engine reports for its viewport and camera projection);
//! - *OS* space: origin top-left, Y grows downward, integer pixels
//!   (what the cursor and window APIs use).

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// 2D vector in screen space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// 3D vector in world space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Drop the Z component.
    pub fn truncate(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Cursor position in OS space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OsPoint {
    pub x: i32,
    pub y: i32,
}

impl OsPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Window bounding rectangle in OS screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl OsRect {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Window rectangle in screen space: `x`/`y` is the top-left corner with Y
/// flipped to the bottom-left origin, `width`/`height` are positive extents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    /// Convert an OS rect for a screen `screen_height` pixels tall.
    pub fn from_os(rect: OsRect, screen_height: i32) -> Self {
        Self {
            x: rect.left as f32,
            y: (screen_height - rect.top - 1) as f32,
            width: rect.width() as f32,
            height: rect.height() as f32,
        }
    }

    /// Inverse of [`ScreenRect::from_os`].
    pub fn to_os(&self, screen_height: i32) -> OsRect {
        let left = self.x as i32;
        let top = screen_height - self.y as i32 - 1;
        OsRect {
            left,
            top,
            right: left + self.width as i32,
            bottom: top + self.height as i32,
        }
    }

    /// A zero-size rect means "move only, keep the current size".
    pub fn is_move_only(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}
