//! Orbit Camera
//!
//! Spherical-coordinate camera circling the meadow.
//!
//! Controls:
//! - Left mouse drag: Orbit (rotate around target)
//! - Right mouse drag: Pan (translate target point)
//! - Scroll wheel: Zoom (change distance from target)

use glam::{Mat4, Vec3};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default horizontal angle in degrees.
const DEFAULT_AZIMUTH: f32 = 0.0;
/// Default vertical angle in degrees.
const DEFAULT_ELEVATION: f32 = 20.0;
/// Default distance from target.
const DEFAULT_DISTANCE: f32 = 24.0;
/// Default field of view in degrees.
const DEFAULT_FOV: f32 = 50.0;
const DEFAULT_NEAR: f32 = 0.1;
const DEFAULT_FAR: f32 = 500.0;

pub const MIN_DISTANCE: f32 = 2.0;
pub const MAX_DISTANCE: f32 = 150.0;

/// Elevation limits in degrees. Negative elevation looks at the mirrored
/// underside of the field.
const MIN_ELEVATION: f32 = -85.0;
const MAX_ELEVATION: f32 = 85.0;

/// Degrees per pixel of mouse movement.
const ORBIT_SENSITIVITY: f32 = 0.3;
/// Multiplied by distance for depth-proportional panning.
const PAN_SENSITIVITY: f32 = 0.002;
/// How much each scroll tick affects distance.
const SCROLL_FACTOR: f32 = 0.1;

/// Mouse buttons the orbit camera reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitMouseButton {
    /// Orbit
    Left,
    /// Pan
    Right,
}

// ============================================================================
// ORBIT CAMERA
// ============================================================================

/// Camera orbiting `target` at (azimuth, elevation, distance). Y is up.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal angle in degrees (wraps around).
    pub azimuth: f32,
    /// Vertical angle in degrees.
    pub elevation: f32,
    pub distance: f32,
    pub target: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,

    is_orbiting: bool,
    is_panning: bool,
    /// Pixels moved since the last button press, used to tell clicks from drags.
    drag_travel: f32,
    last_mouse: [f32; 2],
}

impl OrbitCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            azimuth: DEFAULT_AZIMUTH,
            elevation: DEFAULT_ELEVATION,
            distance: DEFAULT_DISTANCE,
            target: Vec3::ZERO,
            aspect,
            fov: DEFAULT_FOV,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            is_orbiting: false,
            is_panning: false,
            drag_travel: 0.0,
            last_mouse: [0.0, 0.0],
        }
    }

    /// Eye position from the spherical coordinates.
    pub fn eye_position(&self) -> Vec3 {
        let azim_rad = self.azimuth.to_radians();
        let elev_rad = self.elevation.to_radians();

        let cos_elev = elev_rad.cos();
        let offset = Vec3::new(
            self.distance * cos_elev * azim_rad.sin(),
            self.distance * elev_rad.sin(),
            self.distance * cos_elev * azim_rad.cos(),
        );

        self.target + offset
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Right-handed perspective with wgpu's [0, 1] depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    // ========================================================================
    // INPUT HANDLING
    // ========================================================================

    /// Start or stop an orbit/pan drag.
    pub fn handle_mouse_drag(&mut self, button: OrbitMouseButton, pressed: bool) {
        if pressed {
            self.drag_travel = 0.0;
        }
        match button {
            OrbitMouseButton::Left => self.is_orbiting = pressed,
            OrbitMouseButton::Right => self.is_panning = pressed,
        }
    }

    /// Call on every cursor move, dragging or not, so deltas stay correct.
    pub fn handle_mouse_move(&mut self, x: f32, y: f32) {
        let dx = x - self.last_mouse[0];
        let dy = y - self.last_mouse[1];

        if self.is_orbiting {
            self.azimuth = (self.azimuth - dx * ORBIT_SENSITIVITY).rem_euclid(360.0);
            self.elevation =
                (self.elevation + dy * ORBIT_SENSITIVITY).clamp(MIN_ELEVATION, MAX_ELEVATION);
        }

        if self.is_panning {
            self.pan(
                -dx * PAN_SENSITIVITY * self.distance,
                dy * PAN_SENSITIVITY * self.distance,
            );
        }

        if self.is_active() {
            self.drag_travel += dx.abs() + dy.abs();
        }
        self.last_mouse = [x, y];
    }

    /// Multiplicative zoom. Positive delta zooms in.
    pub fn handle_scroll(&mut self, delta: f32) {
        self.distance *= 1.0 - delta * SCROLL_FACTOR;
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.eye_position() - self.target).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        self.target += right * dx + up * dy;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn is_active(&self) -> bool {
        self.is_orbiting || self.is_panning
    }

    /// Pixels travelled during the current (or last) drag.
    pub fn drag_travel(&self) -> f32 {
        self.drag_travel
    }

    /// Last cursor position seen by `handle_mouse_move`, in window pixels.
    pub fn cursor(&self) -> [f32; 2] {
        self.last_mouse
    }

    pub fn reset(&mut self) {
        self.azimuth = DEFAULT_AZIMUTH;
        self.elevation = DEFAULT_ELEVATION;
        self.distance = DEFAULT_DISTANCE;
        self.target = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_eye_at_distance() {
        let mut cam = OrbitCamera::new(1.0);
        cam.target = Vec3::new(3.0, 1.0, -2.0);
        assert_relative_eq!(
            (cam.eye_position() - cam.target).length(),
            cam.distance,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_orbit_with_left_drag() {
        let mut cam = OrbitCamera::new(1.0);
        cam.handle_mouse_move(100.0, 100.0);
        cam.handle_mouse_drag(OrbitMouseButton::Left, true);
        cam.handle_mouse_move(110.0, 120.0);

        assert_relative_eq!(cam.azimuth, 357.0, epsilon = 1e-4);
        assert_relative_eq!(cam.elevation, DEFAULT_ELEVATION + 6.0, epsilon = 1e-4);
        assert_relative_eq!(cam.drag_travel(), 30.0);
    }

    #[test]
    fn test_elevation_clamped() {
        let mut cam = OrbitCamera::new(1.0);
        cam.handle_mouse_drag(OrbitMouseButton::Left, true);
        cam.handle_mouse_move(0.0, 10_000.0);
        assert!(cam.elevation <= MAX_ELEVATION);
        cam.handle_mouse_move(0.0, -10_000.0);
        assert!(cam.elevation >= MIN_ELEVATION);
    }

    #[test]
    fn test_scroll_clamps() {
        let mut cam = OrbitCamera::new(1.0);
        for _ in 0..200 {
            cam.handle_scroll(2.0);
        }
        assert!(cam.distance >= MIN_DISTANCE);
        for _ in 0..200 {
            cam.handle_scroll(-2.0);
        }
        assert!(cam.distance <= MAX_DISTANCE);
    }

    #[test]
    fn test_pan_moves_target() {
        let mut cam = OrbitCamera::new(1.0);
        cam.handle_mouse_drag(OrbitMouseButton::Right, true);
        cam.handle_mouse_move(50.0, 0.0);
        assert_ne!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn test_no_movement_without_drag() {
        let mut cam = OrbitCamera::new(1.0);
        cam.handle_mouse_move(200.0, 200.0);
        assert_relative_eq!(cam.azimuth, DEFAULT_AZIMUTH);
        assert_eq!(cam.target, Vec3::ZERO);
        assert_eq!(cam.drag_travel(), 0.0);
    }

    #[test]
    fn test_resize_zero_ignored() {
        let mut cam = OrbitCamera::new(1.5);
        cam.resize(0, 0);
        assert_relative_eq!(cam.aspect, 1.5);
        cam.resize(1920, 1080);
        assert_relative_eq!(cam.aspect, 1920.0 / 1080.0);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let cam = OrbitCamera::new(16.0 / 9.0);
        let clip = cam.view_projection() * cam.target.extend(1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-4);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-4);
    }
}
