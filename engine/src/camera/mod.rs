//! Camera Module
//!
//! Orbit camera and screen-to-terrain picking. Window-system agnostic: the
//! viewer translates winit events into the calls here.

pub mod orbit_camera;
pub mod raycast;

pub use orbit_camera::{OrbitCamera, OrbitMouseButton};
pub use raycast::{RaycastConfig, get_ray_direction, raycast_to_plane, raycast_to_terrain};
