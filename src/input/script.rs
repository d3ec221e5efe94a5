//! Scripted input for headless runs
//!
//! Maps an actor's situation to movement intents the way a player's keys
//! would: a walk direction plus an optional jump. The survivor follows a
//! waypoint loop; the killer pursues whatever it is told to chase.

use fogbound_math::Vec3;

/// Distance at which a waypoint counts as reached
pub const DEFAULT_ARRIVE_RADIUS: f32 = 0.6;

/// What an actor wants to do this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveIntent {
    /// Horizontal unit direction, or zero to stand still
    pub direction: Vec3,
    /// Jump if grounded
    pub jump: bool,
}

impl MoveIntent {
    /// No movement
    pub const IDLE: Self = Self {
        direction: Vec3::ZERO,
        jump: false,
    };

    /// Walk from `from` toward `to` on the horizontal plane
    pub fn toward(from: Vec3, to: Vec3) -> Self {
        Self {
            direction: (to - from).horizontal().normalized(),
            jump: false,
        }
    }

    /// Scale the direction into a velocity
    pub fn velocity(&self, speed: f32) -> Vec3 {
        self.direction * speed
    }
}

/// A point on a scripted route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: Vec3,
    /// Jump when setting off toward this waypoint
    pub jump: bool,
}

impl Waypoint {
    pub fn new(position: Vec3) -> Self {
        Self { position, jump: false }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }
}

/// Looping waypoint follower
#[derive(Debug, Clone)]
pub struct WaypointScript {
    waypoints: Vec<Waypoint>,
    current: usize,
    arrive_radius: f32,
    laps: u32,
}

impl WaypointScript {
    /// Create a follower over `waypoints`; an empty route always idles
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            waypoints,
            current: 0,
            arrive_radius: DEFAULT_ARRIVE_RADIUS,
            laps: 0,
        }
    }

    /// Set the arrival distance
    pub fn with_arrive_radius(mut self, radius: f32) -> Self {
        self.arrive_radius = radius;
        self
    }

    /// Waypoint currently being walked to
    pub fn target(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.current)
    }

    /// Completed loops over the route
    pub fn laps(&self) -> u32 {
        self.laps
    }

    /// Intent for an actor standing at `position`
    ///
    /// Advances to the next waypoint (wrapping) once the current one is reached.
    pub fn next_intent(&mut self, position: Vec3) -> MoveIntent {
        let Some(target) = self.waypoints.get(self.current).copied() else {
            return MoveIntent::IDLE;
        };

        if position.horizontal_distance(target.position) > self.arrive_radius {
            return MoveIntent::toward(position, target.position);
        }

        self.current += 1;
        if self.current == self.waypoints.len() {
            self.current = 0;
            self.laps += 1;
        }

        let next = self.waypoints[self.current];
        MoveIntent {
            jump: next.jump,
            ..MoveIntent::toward(position, next.position)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_points_at_target() {
        let intent = MoveIntent::toward(Vec3::new(0.0, 0.9, 0.0), Vec3::new(3.0, 5.0, 4.0));
        assert!((intent.direction.x - 0.6).abs() < 1.0e-5);
        assert_eq!(intent.direction.y, 0.0);
        assert!((intent.direction.z - 0.8).abs() < 1.0e-5);
        assert!(!intent.jump);
    }

    #[test]
    fn test_intent_at_target_is_still() {
        let intent = MoveIntent::toward(Vec3::ONE, Vec3::ONE);
        assert_eq!(intent.direction, Vec3::ZERO);
        assert_eq!(intent.velocity(5.0), Vec3::ZERO);
    }

    #[test]
    fn test_empty_script_idles() {
        let mut script = WaypointScript::new(Vec::new());
        assert_eq!(script.next_intent(Vec3::ZERO), MoveIntent::IDLE);
        assert!(script.target().is_none());
    }

    #[test]
    fn test_script_advances_and_loops() {
        let mut script = WaypointScript::new(vec![
            Waypoint::new(Vec3::new(5.0, 0.0, 0.0)),
            Waypoint::new(Vec3::new(5.0, 0.0, 5.0)).with_jump(),
        ]);

        let intent = script.next_intent(Vec3::ZERO);
        assert_eq!(intent.direction, Vec3::X);

        // Reaching the first waypoint turns toward the second and jumps
        let intent = script.next_intent(Vec3::new(4.8, 0.9, 0.0));
        assert!(intent.jump);
        assert!((intent.direction.z - 1.0).abs() < 1.0e-2);

        // Reaching the second wraps around
        script.next_intent(Vec3::new(5.0, 0.9, 5.0));
        assert_eq!(script.laps(), 1);
        assert_eq!(script.target().map(|w| w.position), Some(Vec3::new(5.0, 0.0, 0.0)));
    }
}
