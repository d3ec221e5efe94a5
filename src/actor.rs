//! Capsule-driven actors
//!
//! Provides actor movement with gravity, jumping and world collision.

use fogbound_math::Vec3;
use fogbound_physics::{Capsule, EntityId, MoveResult, PhysicsWorld};

use crate::config::ActorConfig;

/// Which side an actor plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Survivor,
    Killer,
}

impl ActorRole {
    /// Spawn name used in world layouts
    pub fn spawn_name(self) -> &'static str {
        match self {
            ActorRole::Survivor => "survivor",
            ActorRole::Killer => "killer",
        }
    }
}

/// Actor physics state
///
/// Handles position, velocity, gravity, jumping, and world collision.
/// The actor is a vertical capsule whose position is its center.
#[derive(Clone, Debug)]
pub struct Actor {
    /// Entity id, used to skip the actor's own geometry in queries
    pub entity: EntityId,
    /// Survivor or killer
    pub role: ActorRole,
    /// Capsule center
    pub position: Vec3,
    /// Current velocity
    pub velocity: Vec3,
    /// Collision capsule
    pub capsule: Capsule,
    /// Highest ledge walked onto
    pub step_height: f32,
    /// Upward velocity applied when jumping
    pub jump_velocity: f32,
    /// Whether the actor is resting on something
    pub grounded: bool,
    /// Skip collision entirely
    pub noclip: bool,
}

impl Actor {
    /// Create a new actor at the given position
    pub fn new(entity: EntityId, role: ActorRole, position: Vec3, config: &ActorConfig) -> Self {
        Self {
            entity,
            role,
            position,
            velocity: Vec3::ZERO,
            capsule: config.capsule(),
            step_height: config.step_height,
            jump_velocity: config.jump_velocity,
            grounded: false,
            noclip: false,
        }
    }

    /// Set horizontal velocity from movement input
    ///
    /// The Y component is ignored to prevent flying via movement input.
    pub fn apply_movement(&mut self, movement: Vec3) {
        self.velocity.x = movement.x;
        self.velocity.z = movement.z;
    }

    /// Attempt to jump if grounded
    pub fn jump(&mut self) {
        if self.grounded {
            self.velocity.y = self.jump_velocity;
            self.grounded = false;
        }
    }

    /// Simulate one tick
    ///
    /// Applies gravity, moves through the world and updates grounded state.
    pub fn step(&mut self, world: &PhysicsWorld, dt: f32, gravity: f32) -> MoveResult {
        self.velocity.y += gravity * dt;

        let result = world.move_capsule(
            self.position,
            self.capsule,
            self.velocity * dt,
            !self.noclip,
            self.step_height,
        );

        self.position = result.position;
        self.grounded = result.grounded;

        // Landing or bumping a ceiling stops vertical motion
        if result.grounded && self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        }
        if result.collided && result.last_collision_normal.y < -0.45 && self.velocity.y > 0.0 {
            self.velocity.y = 0.0;
        }

        result
    }

    /// Check if the actor is currently in the air
    pub fn is_airborne(&self) -> bool {
        !self.grounded
    }

    /// Eye position used for sight checks
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.capsule.half_segment(), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fogbound_physics::SolidBox;

    fn floor_world() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        world.add_solid_box(SolidBox::new(EntityId(1), Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 0.5, 20.0)));
        world
    }

    fn survivor(position: Vec3) -> Actor {
        Actor::new(EntityId(100), ActorRole::Survivor, position, &ActorConfig::default())
    }

    #[test]
    fn test_actor_falls_and_lands() {
        let world = floor_world();
        let mut actor = survivor(Vec3::new(0.0, 3.0, 0.0));

        for _ in 0..120 {
            actor.step(&world, 1.0 / 60.0, -20.0);
        }

        assert!(actor.grounded);
        assert_eq!(actor.velocity.y, 0.0);
        assert!((actor.position.y - 0.9).abs() < 0.01);
    }

    #[test]
    fn test_jump_requires_ground() {
        let world = floor_world();
        let mut actor = survivor(Vec3::new(0.0, 5.0, 0.0));

        actor.jump();
        assert_eq!(actor.velocity.y, 0.0);

        for _ in 0..200 {
            actor.step(&world, 1.0 / 60.0, -20.0);
        }
        actor.jump();
        assert_eq!(actor.velocity.y, actor.jump_velocity);
        assert!(actor.is_airborne());

        actor.step(&world, 1.0 / 60.0, -20.0);
        assert!(actor.position.y > 0.95);
    }

    #[test]
    fn test_movement_ignores_vertical_input() {
        let mut actor = survivor(Vec3::ZERO);
        actor.apply_movement(Vec3::new(1.0, 50.0, -2.0));
        assert_eq!(actor.velocity, Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_noclip_passes_through_walls() {
        let mut world = floor_world();
        world.add_solid_box(SolidBox::new(EntityId(2), Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.2, 1.0, 5.0)));

        let mut actor = survivor(Vec3::new(0.0, 0.9, 0.0));
        actor.noclip = true;
        actor.apply_movement(Vec3::new(120.0, 0.0, 0.0));
        actor.step(&world, 1.0 / 60.0, 0.0);

        assert!((actor.position.x - 2.0).abs() < 1.0e-4);
    }

    #[test]
    fn test_eye_is_above_center() {
        let actor = survivor(Vec3::new(0.0, 0.9, 0.0));
        assert!((actor.eye_position().y - 1.35).abs() < 1.0e-5);
    }
}
