//! Falling Drops
//!
//! Minimal stand-in for objects falling onto the meadow. Each drop falls
//! under gravity and reports exactly one ground contact.

use glam::Vec3;

use crate::math::seeded_random;
use crate::terrain::HeightField;

/// Gravity constant (m/s²)
pub const GRAVITY: f32 = 9.81;

/// An object falling towards the terrain.
#[derive(Clone, Debug)]
pub struct FallingDrop {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Ripple strength reported on landing.
    pub strength: f32,
    pub grounded: bool,
}

impl FallingDrop {
    pub fn new(position: Vec3, strength: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            strength,
            grounded: false,
        }
    }

    /// Advance the drop. Returns the landing point on the step it touches
    /// the ground, `None` otherwise (including every step after landing).
    pub fn update(&mut self, delta_time: f32, terrain: &impl HeightField) -> Option<Vec3> {
        if self.grounded {
            return None;
        }

        self.velocity.y -= GRAVITY * delta_time;
        self.position += self.velocity * delta_time;

        let ground = terrain.height(self.position.x, self.position.z);
        if self.position.y <= ground {
            self.position.y = ground;
            self.velocity = Vec3::ZERO;
            self.grounded = true;
            return Some(self.position);
        }
        None
    }
}

/// Spawns drops at a fixed interval over the field and collects landings.
pub struct DropScheduler {
    pub interval: f32,
    pub spawn_height: f32,
    /// Drops land within this radius of the origin.
    pub radius: f32,
    drops: Vec<FallingDrop>,
    since_spawn: f32,
    spawned: u32,
}

impl DropScheduler {
    pub fn new(interval: f32, spawn_height: f32, radius: f32) -> Self {
        Self {
            interval: interval.max(0.01),
            spawn_height,
            radius,
            drops: Vec::new(),
            since_spawn: 0.0,
            spawned: 0,
        }
    }

    /// Step every drop; returns `(landing point, strength)` for each landing.
    pub fn update(&mut self, delta_time: f32, terrain: &impl HeightField) -> Vec<(Vec3, f32)> {
        self.since_spawn += delta_time;
        while self.since_spawn >= self.interval {
            self.since_spawn -= self.interval;
            self.spawn(terrain);
        }

        let mut landings = Vec::new();
        for drop in &mut self.drops {
            if let Some(point) = drop.update(delta_time, terrain) {
                landings.push((point, drop.strength));
            }
        }
        self.drops.retain(|d| !d.grounded);
        landings
    }

    fn spawn(&mut self, terrain: &impl HeightField) {
        // Offset the seed space away from blade indices
        let seed = 1_000_003.0 + self.spawned as f64 * 3.0;
        let r = self.radius * seeded_random(seed).sqrt();
        let theta = seeded_random(seed + 1.0) * std::f32::consts::TAU;
        let strength = 0.6 + seeded_random(seed + 2.0) * 0.4;

        let x = r * theta.cos();
        let z = r * theta.sin();
        let y = terrain.height(x, z) + self.spawn_height;
        self.drops.push(FallingDrop::new(Vec3::new(x, y, z), strength));
        self.spawned += 1;
    }

    /// Drops spawned and not yet landed.
    pub fn in_flight(&self) -> usize {
        self.drops.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::FlatTerrain;

    #[test]
    fn test_drop_lands_once() {
        let terrain = FlatTerrain::default();
        let mut drop = FallingDrop::new(Vec3::new(1.0, 5.0, -1.0), 0.8);
        let mut landings = 0;
        for _ in 0..600 {
            if let Some(p) = drop.update(1.0 / 60.0, &terrain) {
                assert_eq!(p.y, 0.0);
                assert_eq!(p.x, 1.0);
                landings += 1;
            }
        }
        assert_eq!(landings, 1);
        assert!(drop.grounded);
    }

    #[test]
    fn test_scheduler_spawns_and_lands() {
        let terrain = FlatTerrain::default();
        let mut scheduler = DropScheduler::new(0.5, 2.0, 10.0);
        let mut landed = Vec::new();
        for _ in 0..300 {
            landed.extend(scheduler.update(1.0 / 60.0, &terrain));
        }
        assert!(!landed.is_empty());
        for (p, strength) in landed {
            assert!(p.x.hypot(p.z) <= 10.0 + 1e-3);
            assert!((0.6..=1.0).contains(&strength));
        }
    }

    #[test]
    fn test_in_flight_counts_falling_drops() {
        let terrain = FlatTerrain::default();
        let mut scheduler = DropScheduler::new(0.5, 50.0, 10.0);
        assert_eq!(scheduler.in_flight(), 0);

        // First spawn waits one full interval
        assert!(scheduler.update(0.6, &terrain).is_empty());
        assert_eq!(scheduler.in_flight(), 1);

        let mut landed = 0;
        for _ in 0..2000 {
            landed += scheduler.update(1.0 / 60.0, &terrain).len();
            if landed > 0 {
                break;
            }
        }
        assert_eq!(landed, 1);
        assert!(scheduler.in_flight() >= 1);
    }
}
