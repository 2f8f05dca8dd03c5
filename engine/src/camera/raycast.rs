//! Raycast Module
//!
//! Screen-to-world picking used to drop impacts where the user clicks.

use glam::Vec3;

use crate::terrain::HeightField;

/// Step length when marching a ray over the terrain.
const MARCH_STEP: f32 = 0.25;
/// Bisection passes refining a bracketed terrain hit.
const REFINE_STEPS: u32 = 16;

/// World-space ray direction through a screen point.
///
/// `uv` is normalized (0-1, 0-1) with (0,0) at the bottom-left. `fov` is the
/// vertical field of view in radians.
pub fn get_ray_direction(
    camera_pos: Vec3,
    camera_target: Vec3,
    uv: (f32, f32),
    aspect_ratio: f32,
    fov: f32,
) -> Vec3 {
    let ndc = (uv.0 * 2.0 - 1.0, uv.1 * 2.0 - 1.0);
    let half_fov = (fov * 0.5_f32).tan();

    let forward = (camera_target - camera_pos).normalize_or_zero();

    // Looking straight up or down: use world X as reference
    let (right, up) = if forward.y.abs() > 0.99 {
        let right = Vec3::X;
        (right, right.cross(forward).normalize())
    } else {
        let right = forward.cross(Vec3::Y).normalize();
        (right, right.cross(forward))
    };

    (forward + right * ndc.0 * aspect_ratio * half_fov + up * ndc.1 * half_fov).normalize()
}

/// Intersect a ray with the horizontal plane `y = plane_height`.
///
/// Returns `None` when the ray is parallel to the plane or the hit lies behind
/// the origin.
pub fn raycast_to_plane(origin: Vec3, dir: Vec3, plane_height: f32) -> Option<Vec3> {
    if dir.y.abs() < 0.0001 {
        return None;
    }

    let t = (plane_height - origin.y) / dir.y;
    if t < 0.0 {
        return None;
    }

    Some(origin + dir * t)
}

/// March a ray over a height field and return the first surface crossing.
///
/// Steps at a fixed length until the ray dips below the terrain, then
/// bisects the bracketing segment. Gives up after `max_distance`.
pub fn raycast_to_terrain(
    origin: Vec3,
    dir: Vec3,
    terrain: &impl HeightField,
    max_distance: f32,
) -> Option<Vec3> {
    let above = |t: f32| {
        let p = origin + dir * t;
        p.y - terrain.height(p.x, p.z)
    };

    if above(0.0) < 0.0 {
        return None;
    }

    let mut prev = 0.0;
    let mut t = MARCH_STEP;
    while t <= max_distance {
        if above(t) <= 0.0 {
            let (mut lo, mut hi) = (prev, t);
            for _ in 0..REFINE_STEPS {
                let mid = 0.5 * (lo + hi);
                if above(mid) > 0.0 {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            return Some(origin + dir * hi);
        }
        prev = t;
        t += MARCH_STEP;
    }
    None
}

/// Raycast configuration for a perspective camera
#[derive(Clone, Copy, Debug)]
pub struct RaycastConfig {
    /// Screen aspect ratio (width / height)
    pub aspect_ratio: f32,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Farthest terrain hit accepted
    pub max_distance: f32,
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            fov: 50.0_f32.to_radians(),
            max_distance: 300.0,
        }
    }
}

impl RaycastConfig {
    /// Pick the terrain point under a screen position.
    pub fn pick_terrain(
        &self,
        camera_pos: Vec3,
        camera_target: Vec3,
        uv: (f32, f32),
        terrain: &impl HeightField,
    ) -> Option<Vec3> {
        let dir = get_ray_direction(camera_pos, camera_target, uv, self.aspect_ratio, self.fov);
        raycast_to_terrain(camera_pos, dir, terrain, self.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::FlatTerrain;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_direction_normalized() {
        let camera_pos = Vec3::new(0.0, 5.0, 10.0);
        for x in [0.0, 0.25, 0.5, 0.75, 1.0] {
            for y in [0.0, 0.25, 0.5, 0.75, 1.0] {
                let ray = get_ray_direction(camera_pos, Vec3::ZERO, (x, y), 16.0 / 9.0, 1.2);
                assert_relative_eq!(ray.length(), 1.0, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera_pos = Vec3::new(0.0, 5.0, 10.0);
        let ray = get_ray_direction(camera_pos, Vec3::ZERO, (0.5, 0.5), 1.0, 1.0);
        let expected = (-camera_pos).normalize();
        assert_relative_eq!(ray.dot(expected), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_upper_screen_ray_points_higher() {
        let camera_pos = Vec3::new(0.0, 5.0, 10.0);
        let low = get_ray_direction(camera_pos, Vec3::ZERO, (0.5, 0.2), 1.0, 1.0);
        let high = get_ray_direction(camera_pos, Vec3::ZERO, (0.5, 0.8), 1.0, 1.0);
        assert!(high.y > low.y);
    }

    #[test]
    fn test_plane_hit() {
        let hit = raycast_to_plane(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, 2.0).unwrap();
        assert_relative_eq!(hit.y, 2.0);
    }

    #[test]
    fn test_plane_parallel_and_behind() {
        assert!(raycast_to_plane(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 0.0).is_none());
        assert!(raycast_to_plane(Vec3::new(0.0, 1.0, 0.0), Vec3::Y, 0.0).is_none());
    }

    #[test]
    fn test_terrain_hit_matches_plane() {
        let terrain = FlatTerrain { elevation: 1.5 };
        let origin = Vec3::new(0.0, 10.0, 10.0);
        let dir = (Vec3::new(2.0, 1.5, 0.0) - origin).normalize();
        let hit = raycast_to_terrain(origin, dir, &terrain, 100.0).unwrap();
        assert_relative_eq!(hit.y, 1.5, epsilon = 1e-3);
        assert_relative_eq!(hit.x, 2.0, epsilon = 1e-2);
        assert_relative_eq!(hit.z, 0.0, epsilon = 1e-2);
    }

    #[test]
    fn test_terrain_miss_when_looking_up() {
        let terrain = FlatTerrain { elevation: 0.0 };
        let hit = raycast_to_terrain(Vec3::new(0.0, 5.0, 0.0), Vec3::Y, &terrain, 100.0);
        assert!(hit.is_none());
    }

    #[test]
    fn test_origin_below_terrain_misses() {
        let terrain = FlatTerrain { elevation: 3.0 };
        let hit = raycast_to_terrain(Vec3::ZERO, Vec3::NEG_Y, &terrain, 100.0);
        assert!(hit.is_none());
    }
}
