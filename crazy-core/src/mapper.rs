//! Coordinate conversions between world, screen and OS cursor space.
//!
//! Everything here is pure: no platform calls, no state.  Actions combine
//! these with an [`InputDriver`](crate::platform::InputDriver) to read and
//! place the real cursor.

use serde::{Deserialize, Serialize};

use crate::geometry::{OsPoint, OsRect, Vec2, Vec3};

/// Pixel distance under which an axis counts as arrived.
pub const DEFAULT_TOLERANCE: f32 = 5.0;

/// Fraction of the remaining distance covered per tick.
pub const DEFAULT_STEP_FRACTION: f32 = 0.2;

// ---------------------------------------------------------------------------
// Screen <-> OS
// ---------------------------------------------------------------------------

/// Screen point (bottom-left origin) to OS cursor point (top-left origin).
///
/// Components truncate toward zero.
pub fn screen_to_os(p: Vec2, screen_height: i32) -> OsPoint {
    OsPoint::new(p.x as i32, screen_height - p.y as i32 - 1)
}

/// OS cursor point to screen point.  Inverse of [`screen_to_os`] for
/// integral points.
pub fn os_to_screen(p: OsPoint, screen_height: i32) -> Vec2 {
    Vec2::new(p.x as f32, (screen_height - p.y - 1) as f32)
}

/// Placement of the game's render viewport on the desktop.
///
/// `origin` is the viewport's bottom-left corner in global screen space, so
/// a game-local position is the global screen position minus `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub origin: Vec2,
    pub screen_height: i32,
}

impl Viewport {
    /// Viewport covering the whole screen (exclusive fullscreen games).
    pub fn fullscreen(screen_height: i32) -> Self {
        Self {
            origin: Vec2::ZERO,
            screen_height,
        }
    }

    /// Viewport filling a window's OS rect.  The rect includes decorations,
    /// so the origin is exact only for borderless windows.
    pub fn from_window(rect: OsRect, screen_height: i32) -> Self {
        Self {
            origin: Vec2::new(rect.left as f32, (screen_height - rect.bottom) as f32),
            screen_height,
        }
    }

    pub fn global_to_local(&self, global: Vec2) -> Vec2 {
        global - self.origin
    }

    pub fn local_to_global(&self, local: Vec2) -> Vec2 {
        local + self.origin
    }

    /// OS cursor point to game-local screen point.
    pub fn os_to_local(&self, p: OsPoint) -> Vec2 {
        self.global_to_local(os_to_screen(p, self.screen_height))
    }

    /// Game-local screen point to OS cursor point.
    pub fn local_to_os(&self, local: Vec2) -> OsPoint {
        screen_to_os(self.local_to_global(local), self.screen_height)
    }
}

// ---------------------------------------------------------------------------
// World <-> screen
// ---------------------------------------------------------------------------

/// Projection between world space and game-local screen space.
pub trait Camera {
    /// Project a world point.  `x`/`y` are pixels, `z` is the distance in
    /// front of the camera.
    fn world_to_screen(&self, world: Vec3) -> Vec3;

    /// Cast a ray through `screen` and intersect it with the world plane
    /// `z = plane_z`.  `None` when the plane is not in front of the camera.
    fn screen_to_world(&self, screen: Vec2, plane_z: f32) -> Option<Vec3>;
}

/// Identity camera: world `x`/`y` are already game-local pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenCamera;

impl Camera for ScreenCamera {
    fn world_to_screen(&self, world: Vec3) -> Vec3 {
        Vec3::new(world.x, world.y, 0.0)
    }

    fn screen_to_world(&self, screen: Vec2, plane_z: f32) -> Option<Vec3> {
        Some(Vec3::new(screen.x, screen.y, plane_z))
    }
}

/// Pinhole camera looking down +Z with +Y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl PerspectiveCamera {
    /// Focal length in pixels.
    fn focal(&self) -> f32 {
        (self.viewport_height * 0.5) / (self.fov_y.to_radians() * 0.5).tan()
    }
}

impl Camera for PerspectiveCamera {
    fn world_to_screen(&self, world: Vec3) -> Vec3 {
        let d = world - self.position;
        let f = self.focal();
        Vec3::new(
            self.viewport_width * 0.5 + d.x * f / d.z,
            self.viewport_height * 0.5 + d.y * f / d.z,
            d.z,
        )
    }

    fn screen_to_world(&self, screen: Vec2, plane_z: f32) -> Option<Vec3> {
        let depth = plane_z - self.position.z;
        if depth <= 0.0 {
            return None;
        }
        let f = self.focal();
        let dx = (screen.x - self.viewport_width * 0.5) / f;
        let dy = (screen.y - self.viewport_height * 0.5) / f;
        Some(Vec3::new(
            self.position.x + dx * depth,
            self.position.y + dy * depth,
            plane_z,
        ))
    }
}

// ---------------------------------------------------------------------------
// Eased cursor motion
// ---------------------------------------------------------------------------

/// Tuning for incremental cursor moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveSettings {
    pub tolerance: f32,
    pub step_fraction: f32,
}

impl Default for MoveSettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            step_fraction: DEFAULT_STEP_FRACTION,
        }
    }
}

/// Result of one [`ease_step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveStep {
    pub position: Vec2,
    pub arrived: bool,
}

/// Advance `current` toward `target` by one tick.
///
/// Each axis outside the tolerance moves by `step_fraction` of its remaining
/// distance; an axis inside the tolerance stays put.  The step has arrived
/// only when neither axis moved.
pub fn ease_step(current: Vec2, target: Vec2, settings: &MoveSettings) -> MoveStep {
    let mut delta = target - current;
    let mut arrived = true;

    if delta.x.abs() > settings.tolerance {
        delta.x *= settings.step_fraction;
        arrived = false;
    } else {
        delta.x = 0.0;
    }
    if delta.y.abs() > settings.tolerance {
        delta.y *= settings.step_fraction;
        arrived = false;
    } else {
        delta.y = 0.0;
    }

    MoveStep {
        position: current + delta,
        arrived,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_os_round_trip() {
        let h = 1080;
        for &(x, y) in &[(0, 0), (1919, 1079), (640, 360), (1, 1078)] {
            let p = Vec2::new(x as f32, y as f32);
            assert_eq!(os_to_screen(screen_to_os(p, h), h), p);
        }
    }

    #[test]
    fn test_screen_to_os_flips_y() {
        assert_eq!(screen_to_os(Vec2::new(10.0, 0.0), 1080), OsPoint::new(10, 1079));
        assert_eq!(screen_to_os(Vec2::new(10.0, 1079.0), 1080), OsPoint::new(10, 0));
    }

    #[test]
    fn test_viewport_offset() {
        let vp = Viewport {
            origin: Vec2::new(100.0, 200.0),
            screen_height: 1080,
        };
        let os = OsPoint::new(150, 500);
        let local = vp.os_to_local(os);
        assert_eq!(local, Vec2::new(50.0, 379.0));
        assert_eq!(vp.local_to_os(local), os);
    }

    #[test]
    fn test_viewport_from_window_bottom_left() {
        let rect = OsRect {
            left: 100,
            top: 80,
            right: 900,
            bottom: 680,
        };
        let vp = Viewport::from_window(rect, 1080);
        assert_eq!(vp.origin, Vec2::new(100.0, 400.0));
        // Bottom-left pixel of the window is local (0, 0).
        assert_eq!(vp.os_to_local(OsPoint::new(100, 679)), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_ease_step_moves_fraction() {
        let s = MoveSettings::default();
        let step = ease_step(Vec2::new(0.0, 0.0), Vec2::new(100.0, 50.0), &s);
        assert!(!step.arrived);
        assert_eq!(step.position, Vec2::new(20.0, 10.0));
    }

    #[test]
    fn test_ease_step_axis_independent() {
        let s = MoveSettings::default();
        let step = ease_step(Vec2::new(0.0, 48.0), Vec2::new(100.0, 50.0), &s);
        assert!(!step.arrived);
        assert_eq!(step.position, Vec2::new(20.0, 48.0));
    }

    #[test]
    fn test_ease_step_arrives_within_tolerance() {
        let s = MoveSettings::default();
        let step = ease_step(Vec2::new(96.0, 54.0), Vec2::new(100.0, 50.0), &s);
        assert!(step.arrived);
        assert_eq!(step.position, Vec2::new(96.0, 54.0));
    }

    #[test]
    fn test_ease_step_boundary_is_inclusive() {
        let s = MoveSettings::default();
        assert!(ease_step(Vec2::new(0.0, 0.0), Vec2::new(5.0, -5.0), &s).arrived);
    }

    #[test]
    fn test_perspective_round_trip() {
        let cam = PerspectiveCamera {
            position: Vec3::new(0.0, 0.0, -10.0),
            fov_y: 60.0,
            viewport_width: 1920.0,
            viewport_height: 1080.0,
        };
        let world = Vec3::new(2.5, -1.0, 0.0);
        let screen = cam.world_to_screen(world);
        assert!((screen.z - 10.0).abs() < 1e-4);
        let back = cam.screen_to_world(screen.truncate(), 0.0).unwrap();
        assert!((back.x - world.x).abs() < 1e-3);
        assert!((back.y - world.y).abs() < 1e-3);
    }

    #[test]
    fn test_perspective_center_projects_to_middle() {
        let cam = PerspectiveCamera {
            position: Vec3::new(3.0, 4.0, -5.0),
            fov_y: 45.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
        };
        let s = cam.world_to_screen(Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(s.truncate(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_perspective_plane_behind_camera() {
        let cam = PerspectiveCamera {
            position: Vec3::new(0.0, 0.0, 5.0),
            fov_y: 60.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
        };
        assert!(cam.screen_to_world(Vec2::new(10.0, 10.0), 0.0).is_none());
    }
}
