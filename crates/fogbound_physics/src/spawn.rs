//! Spawn position probing
//!
//! Level generators can drop spawn points inside geometry, where the bounded
//! solver may not fully separate the capsule. The probe tries nearby offsets
//! and small lifts until a position resolves without any contact.

use crate::shapes::Capsule;
use crate::world::PhysicsWorld;
use fogbound_math::Vec3;

/// Horizontal offsets tried around the requested spawn, nearest first
const SPAWN_OFFSETS: [Vec3; 12] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(0.5, 0.0, 0.0),
    Vec3::new(-0.5, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 0.5),
    Vec3::new(0.0, 0.0, -0.5),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(0.8, 0.0, 0.8),
    Vec3::new(-0.8, 0.0, 0.8),
    Vec3::new(0.8, 0.0, -0.8),
];

/// Lifts tried per offset
const SPAWN_LIFT_STEPS: usize = 8;

/// Height added per lift
const SPAWN_LIFT_STEP: f32 = 0.25;

impl PhysicsWorld {
    /// Find a non-colliding capsule position near `requested`
    ///
    /// Returns `None` when every offset and lift still collides.
    pub fn resolve_spawn_position(&self, requested: Vec3, capsule: Capsule) -> Option<Vec3> {
        for offset in SPAWN_OFFSETS {
            for lift in 0..SPAWN_LIFT_STEPS {
                let candidate = requested + offset + Vec3::new(0.0, lift as f32 * SPAWN_LIFT_STEP, 0.0);
                let result = self.move_capsule(candidate, capsule, Vec3::ZERO, true, 0.0);
                if !result.collided {
                    return Some(result.position);
                }
            }
        }

        log::warn!("No free spawn position near {:?}", requested);
        None
    }
}
