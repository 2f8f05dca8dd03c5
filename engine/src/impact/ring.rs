//! Impact Ring Buffer
//!
//! Fixed set of ground impacts uploaded to the grass shader every frame.
//! New impacts overwrite the oldest slot whether or not its ripple has faded.

/// Number of impacts the shader evaluates per vertex.
pub const IMPACT_CAPACITY: usize = 6;

/// A ground contact at world `(x, z)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impact {
    pub x: f32,
    pub z: f32,
    /// Field time in seconds when the impact landed.
    pub start: f32,
    /// Ripple strength in `0..=1`.
    pub strength: f32,
}

impl Impact {
    pub fn new(x: f32, z: f32, start: f32, strength: f32) -> Self {
        let strength = if strength.is_finite() {
            strength.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            x,
            z,
            start,
            strength,
        }
    }

    /// Seconds since the impact landed (negative if it starts in the future).
    pub fn age(&self, now: f32) -> f32 {
        now - self.start
    }

    /// `(x, z, start, strength)` as the shader reads it.
    pub fn to_vec4(&self) -> [f32; 4] {
        [self.x, self.z, self.start, self.strength]
    }
}

#[derive(Clone, Debug, Default)]
pub struct ImpactRing {
    slots: [Option<Impact>; IMPACT_CAPACITY],
    /// Slot the next impact is written to.
    cursor: usize,
    total_emitted: u64,
}

impl ImpactRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an impact, overwriting the oldest slot once full.
    pub fn push(&mut self, impact: Impact) {
        self.slots[self.cursor] = Some(impact);
        self.cursor = (self.cursor + 1) % IMPACT_CAPACITY;
        self.total_emitted += 1;
        log::debug!(
            "Impact #{} at ({:.2}, {:.2}) strength {:.2}",
            self.total_emitted,
            impact.x,
            impact.z,
            impact.strength
        );
    }

    pub fn emit(&mut self, x: f32, z: f32, strength: f32, now: f32) {
        self.push(Impact::new(x, z, now, strength));
    }

    /// Stored impacts, oldest first.
    pub fn active(&self) -> Vec<Impact> {
        (0..IMPACT_CAPACITY)
            .filter_map(|i| self.slots[(self.cursor + i) % IMPACT_CAPACITY])
            .collect()
    }

    /// Stored impacts whose ripple is still visible at `now`.
    pub fn live(&self, now: f32, lifetime: f32) -> Vec<Impact> {
        self.active()
            .into_iter()
            .filter(|imp| {
                let age = imp.age(now);
                age >= 0.0 && age < lifetime
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Impacts emitted over the ring's lifetime, including overwritten ones.
    pub fn total_emitted(&self) -> u64 {
        self.total_emitted
    }

    pub fn clear(&mut self) {
        self.slots = [None; IMPACT_CAPACITY];
        self.cursor = 0;
    }

    /// Slot contents for the uniform block; empty slots have zero strength.
    pub fn as_uniform_array(&self) -> [[f32; 4]; IMPACT_CAPACITY] {
        self.slots
            .map(|slot| slot.map(|imp| imp.to_vec4()).unwrap_or([0.0; 4]))
    }
}
