//! Capsule movement against static geometry
//!
//! A vertical capsule is tested as a sphere of the capsule radius at its
//! center, against boxes stretched vertically by the capsule's half segment.
//! That is exact for boxes and much cheaper than a real capsule-box distance.
//!
//! Movement is resolved in passes: horizontal, an optional step-up retry,
//! then vertical. Each pass runs the penetration solver, which pushes the
//! capsule out of every overlapping box for at most [`MAX_RESOLVE_ITERATIONS`]
//! rounds. The cap bounds per-call cost; deeply overlapping geometry (a spawn
//! inside a wall cluster) may still be penetrating when it is reached.

use crate::collision::sphere_vs_expanded_aabb;
use crate::shapes::{Aabb, Capsule};
use crate::world::PhysicsWorld;
use fogbound_math::Vec3;

/// Fixed number of solver rounds per resolve
pub const MAX_RESOLVE_ITERATIONS: usize = 8;

/// Extra push applied on every correction so the same contact is not found again
pub const RESOLVE_EPSILON: f32 = 0.0005;

/// Contact normals steeper than this (normal.y above it) count as ground
pub const GROUND_NORMAL_MIN_Y: f32 = 0.45;

/// Looser ground threshold used by the downward probe
pub const PROBE_GROUND_NORMAL_MIN_Y: f32 = 0.35;

/// Walls with normal.y below this trigger a step-up attempt
pub const STEP_WALL_NORMAL_MAX_Y: f32 = 0.25;

/// The stepped move must gain at least this much horizontal distance to be kept
pub const STEP_MIN_GAIN: f32 = 0.05;

/// Horizontal deltas shorter than this never step
const MIN_STEP_DELTA: f32 = 1.0e-5;

/// Outcome of moving or resolving a capsule
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveResult {
    /// Corrected capsule center
    pub position: Vec3,
    /// Any box was overlapping during resolution
    pub collided: bool,
    /// Resting on (or pushed up by) a near-horizontal surface
    pub grounded: bool,
    /// The step-up retry was adopted
    pub stepped_up: bool,
    /// Normal of the most relevant contact; up when there was none
    pub last_collision_normal: Vec3,
    /// Deepest penetration corrected
    pub max_penetration_depth: f32,
}

impl MoveResult {
    /// A result with no contact at `position`
    pub fn unobstructed(position: Vec3) -> Self {
        Self {
            position,
            collided: false,
            grounded: false,
            stepped_up: false,
            last_collision_normal: Vec3::Y,
            max_penetration_depth: 0.0,
        }
    }
}

impl PhysicsWorld {
    /// Move a capsule by `desired_delta`, resolving it against every solid
    ///
    /// # Arguments
    /// * `position` - Current capsule center
    /// * `capsule` - Capsule dimensions
    /// * `desired_delta` - Displacement for this tick (horizontal input + vertical velocity * dt)
    /// * `collision_enabled` - When false the delta is applied as-is (noclip)
    /// * `step_height` - Highest ledge the capsule may walk onto; 0 disables stepping
    pub fn move_capsule(
        &self,
        position: Vec3,
        capsule: Capsule,
        desired_delta: Vec3,
        collision_enabled: bool,
        step_height: f32,
    ) -> MoveResult {
        if !collision_enabled {
            return MoveResult::unobstructed(position + desired_delta);
        }

        let horizontal_delta = desired_delta.horizontal();
        let mut horizontal = self.resolve_capsule(position + horizontal_delta, capsule);

        let attempt_step = horizontal_delta.length() > MIN_STEP_DELTA
            && horizontal.collided
            && horizontal.last_collision_normal.y < STEP_WALL_NORMAL_MAX_Y
            && step_height > 0.0;

        if attempt_step {
            // Step up, move, drop back down
            let lift = Vec3::new(0.0, step_height, 0.0);
            let raised = self.resolve_capsule(position + lift + horizontal_delta, capsule);
            let landing = self.step_down(raised.position, capsule, step_height);
            let stepped = self.resolve_capsule(landing, capsule);

            let base_gain = position.horizontal_distance(horizontal.position);
            let step_gain = position.horizontal_distance(stepped.position);

            if step_gain > base_gain + STEP_MIN_GAIN {
                horizontal = stepped;
                horizontal.stepped_up = true;
            }
        }

        let vertical = self.resolve_capsule(
            horizontal.position + Vec3::new(0.0, desired_delta.y, 0.0),
            capsule,
        );

        MoveResult {
            position: vertical.position,
            collided: horizontal.collided || vertical.collided,
            grounded: horizontal.grounded || vertical.grounded,
            stepped_up: horizontal.stepped_up,
            last_collision_normal: if vertical.collided {
                vertical.last_collision_normal
            } else {
                horizontal.last_collision_normal
            },
            max_penetration_depth: horizontal
                .max_penetration_depth
                .max(vertical.max_penetration_depth),
        }
    }

    /// Push a capsule centered at `candidate` out of every overlapping solid
    ///
    /// Runs at most [`MAX_RESOLVE_ITERATIONS`] rounds and stops early after a
    /// round with no overlap. If the capsule ends up not grounded, a probe
    /// slightly below it checks for a surface it is resting on without moving it.
    pub fn resolve_capsule(&self, candidate: Vec3, capsule: Capsule) -> MoveResult {
        let mut result = MoveResult::unobstructed(candidate);
        let half_segment = capsule.half_segment();
        let mut candidates = Vec::new();
        let mut converged = false;

        for _ in 0..MAX_RESOLVE_ITERATIONS {
            let mut had_penetration = false;

            self.solid_candidates(&capsule.bounds_at(result.position), &mut candidates);

            for &index in &candidates {
                let bounds = self.solids()[index].bounds();
                let sphere = capsule.sphere_at(result.position);
                let Some(contact) = sphere_vs_expanded_aabb(&sphere, &bounds, half_segment) else {
                    continue;
                };

                had_penetration = true;
                result.collided = true;
                result.position += contact.normal * (contact.penetration + RESOLVE_EPSILON);
                result.max_penetration_depth = result.max_penetration_depth.max(contact.penetration);
                result.last_collision_normal = contact.normal;
                if contact.normal.y > GROUND_NORMAL_MIN_Y {
                    result.grounded = true;
                }
            }

            if !had_penetration {
                converged = true;
                break;
            }
        }

        if !converged {
            log::trace!(
                "Capsule resolve hit the {} iteration cap at {:?}",
                MAX_RESOLVE_ITERATIONS,
                result.position
            );
        }

        if !result.grounded {
            result.grounded = self.probe_ground(result.position, capsule, &mut candidates);
        }

        result
    }

    /// Lower a raised capsule by up to `step_height`, stopping on the highest support
    ///
    /// Sweeps the capsule's sphere straight down against every box below it.
    /// Without support the full step height is dropped.
    fn step_down(&self, raised: Vec3, capsule: Capsule, step_height: f32) -> Vec3 {
        let radius_sq = capsule.radius * capsule.radius;
        let half_segment = capsule.half_segment();
        let upper = capsule.bounds_at(raised);
        let sweep = Aabb::new(upper.min - Vec3::new(0.0, step_height, 0.0), upper.max);

        let mut candidates = Vec::new();
        self.solid_candidates(&sweep, &mut candidates);

        let mut drop = step_height;
        for &index in &candidates {
            let bounds = self.solids()[index].bounds().expanded_vertically(half_segment);
            let dx = (bounds.min.x - raised.x).max(raised.x - bounds.max.x).max(0.0);
            let dz = (bounds.min.z - raised.z).max(raised.z - bounds.max.z).max(0.0);
            let horizontal_sq = dx * dx + dz * dz;
            if horizontal_sq >= radius_sq {
                continue;
            }

            let rest_height = bounds.max.y + (radius_sq - horizontal_sq).sqrt();
            let gap = raised.y - rest_height;
            if gap >= -RESOLVE_EPSILON {
                drop = drop.min(gap.max(0.0));
            }
        }

        raised - Vec3::new(0.0, drop, 0.0)
    }

    /// Look for ground just below a resolved capsule
    fn probe_ground(&self, position: Vec3, capsule: Capsule, candidates: &mut Vec<usize>) -> bool {
        let probe_position = position - Vec3::new(0.0, self.config().ground_probe_distance, 0.0);
        let sphere = capsule.sphere_at(probe_position);
        let half_segment = capsule.half_segment();

        self.solid_candidates(&capsule.bounds_at(probe_position), candidates);

        candidates.iter().any(|&index| {
            sphere_vs_expanded_aabb(&sphere, &self.solids()[index].bounds(), half_segment)
                .is_some_and(|contact| contact.normal.y > PROBE_GROUND_NORMAL_MIN_Y)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{EntityId, SolidBox};

    const PLAYER: Capsule = Capsule {
        radius: 0.45,
        height: 1.8,
    };

    /// Floor slab whose top surface is at y = 0
    fn floor() -> SolidBox {
        SolidBox::new(EntityId(1), Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0))
    }

    fn world_with(solids: impl IntoIterator<Item = SolidBox>) -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        for solid in solids {
            world.add_solid_box(solid);
        }
        world
    }

    /// Distance from the capsule's sphere center to the vertically expanded box
    fn clearance(position: Vec3, capsule: Capsule, bounds: &Aabb) -> f32 {
        let expanded = bounds.expanded_vertically(capsule.half_segment());
        (position - expanded.closest_point(position)).length()
    }

    #[test]
    fn test_noclip_applies_delta_unmodified() {
        let world = world_with([floor()]);
        let start = Vec3::new(0.0, 0.9, 0.0);
        let delta = Vec3::new(1.0, -5.0, 0.5);

        let result = world.move_capsule(start, PLAYER, delta, false, 0.45);
        assert_eq!(result.position, start + delta);
        assert!(!result.collided);
        assert!(!result.grounded);
        assert_eq!(result.last_collision_normal, Vec3::Y);
    }

    #[test]
    fn test_empty_world_moves_freely() {
        let world = PhysicsWorld::new();
        let result = world.move_capsule(Vec3::ZERO, PLAYER, Vec3::new(1.0, 2.0, 3.0), true, 0.45);
        assert_eq!(result.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(!result.collided);
        assert!(!result.grounded);
        assert_eq!(result.max_penetration_depth, 0.0);
    }

    #[test]
    fn test_falling_into_floor_is_pushed_out_and_grounded() {
        let world = world_with([floor()]);
        // Capsule bottom at 0.9 - 0.9 = 0, falling 0.2 into the floor
        let result = world.move_capsule(Vec3::new(0.0, 0.9, 0.0), PLAYER, Vec3::new(0.0, -0.2, 0.0), true, 0.0);

        assert!(result.collided);
        assert!(result.grounded);
        assert_eq!(result.last_collision_normal, Vec3::Y);
        assert!((result.max_penetration_depth - 0.2).abs() < 1.0e-4);
        assert!(result.position.y >= 0.9 - 1.0e-4);
    }

    #[test]
    fn test_resolved_capsule_no_longer_penetrates() {
        let wall = SolidBox::new(EntityId(2), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.25, 1.0, 2.0));
        let world = world_with([wall]);

        let starts = [
            Vec3::new(0.5, 1.0, 0.0),
            Vec3::new(-0.4, 1.2, 0.3),
            Vec3::new(0.1, 1.0, 0.0),
            Vec3::new(0.0, 2.6, 1.9),
            Vec3::new(0.0, -0.2, -2.2),
        ];

        for start in starts {
            let result = world.resolve_capsule(start, PLAYER);
            assert!(result.collided, "start {:?} should overlap", start);
            let gap = clearance(result.position, PLAYER, &wall.bounds());
            assert!(
                gap >= PLAYER.radius - RESOLVE_EPSILON,
                "start {:?} still penetrating: gap {}",
                start,
                gap
            );
        }
    }

    #[test]
    fn test_center_inside_thin_box_escapes_through_nearest_face() {
        let slab = SolidBox::new(EntityId(3), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.1, 2.0, 2.0));
        let world = world_with([slab]);

        let result = world.resolve_capsule(Vec3::new(0.05, 1.0, 0.0), PLAYER);
        assert!(result.collided);
        assert_eq!(result.last_collision_normal, Vec3::X);
        assert!(result.position.x >= 0.1 + PLAYER.radius);
        assert!(!result.grounded);
    }

    #[test]
    fn test_resolved_position_is_a_fixed_point() {
        let wall = SolidBox::new(EntityId(2), Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.25, 1.0, 2.0));
        let world = world_with([floor(), wall]);

        let first = world.move_capsule(Vec3::new(0.6, 0.7, 0.3), PLAYER, Vec3::ZERO, true, 0.0);
        assert!(first.collided);

        let second = world.move_capsule(first.position, PLAYER, Vec3::ZERO, true, 0.0);
        assert!(!second.collided);
        assert_eq!(second.position, first.position);
    }

    #[test]
    fn test_slot_narrower_than_capsule_stops_at_iteration_cap() {
        // Walls 0.6 apart, capsule 0.9 wide: every push into one wall overlaps the other
        let left = SolidBox::new(EntityId(1), Vec3::new(-1.3, 1.5, 0.0), Vec3::new(1.0, 1.5, 2.0));
        let right = SolidBox::new(EntityId(2), Vec3::new(1.3, 1.5, 0.0), Vec3::new(1.0, 1.5, 2.0));
        let world = world_with([left, right]);

        let result = world.resolve_capsule(Vec3::new(0.0, 1.5, 0.0), PLAYER);
        assert!(result.collided);
        assert!(result.max_penetration_depth > 0.3);
        assert!((result.position.x + 0.1505).abs() < 1.0e-3, "{:?}", result.position);

        // Still penetrating after the capped rounds
        let gap = clearance(result.position, PLAYER, &left.bounds())
            .min(clearance(result.position, PLAYER, &right.bounds()));
        assert!(gap < PLAYER.radius - RESOLVE_EPSILON);

        let again = world.resolve_capsule(result.position, PLAYER);
        assert!(again.collided);
        assert!((again.position - result.position).length() < 1.0e-3);
    }

    #[test]
    fn test_resting_on_box_top_is_grounded() {
        let crate_box = SolidBox::new(EntityId(4), Vec3::new(0.0, 0.5, 0.0), Vec3::splat(0.5));
        let world = world_with([crate_box]);

        // Bottom of the capsule just above the top face (y = 1), inside probe range
        let resting = Vec3::new(0.0, 1.0 + PLAYER.height * 0.5 + 0.01, 0.0);
        let result = world.move_capsule(resting, PLAYER, Vec3::ZERO, true, 0.0);

        assert!(!result.collided);
        assert!(result.grounded);
        assert_eq!(result.position, resting);
    }

    #[test]
    fn test_hovering_above_probe_range_is_not_grounded() {
        let world = world_with([floor()]);
        let result = world.resolve_capsule(Vec3::new(0.0, 0.9 + 0.2, 0.0), PLAYER);
        assert!(!result.collided);
        assert!(!result.grounded);
    }

    #[test]
    fn test_wall_blocks_horizontal_move_and_reports_normal() {
        let wall = SolidBox::new(EntityId(2), Vec3::new(1.0, 1.5, 0.0), Vec3::new(0.25, 1.5, 3.0));
        let world = world_with([floor(), wall]);

        let start = Vec3::new(0.0, 0.9, 0.0);
        let result = world.move_capsule(start, PLAYER, Vec3::new(0.5, 0.0, 0.0), true, 0.45);

        assert!(result.collided);
        assert!(!result.stepped_up, "wall is taller than the step height");
        assert!(result.position.x <= 0.75 - PLAYER.radius + 1.0e-3);
        assert!(result.grounded);
    }

    #[test]
    fn test_wall_normal_is_kept_when_vertical_pass_is_clear() {
        let wall = SolidBox::new(EntityId(2), Vec3::new(1.0, 1.5, 0.0), Vec3::new(0.25, 1.5, 3.0));
        let world = world_with([wall]);

        let result = world.move_capsule(Vec3::new(0.0, 0.9, 0.0), PLAYER, Vec3::new(0.5, 0.0, 0.0), true, 0.0);
        assert!(result.collided);
        assert_eq!(result.last_collision_normal, -Vec3::X);
    }

    /// Ledge from x = 1.5 to 2.5 whose top is at y = 0.4
    fn ledge() -> SolidBox {
        SolidBox::new(EntityId(5), Vec3::new(2.0, 0.1, 0.0), Vec3::new(0.5, 0.3, 2.0))
    }

    #[test]
    fn test_single_move_steps_onto_low_ledge() {
        let world = world_with([floor(), ledge()]);

        // Standing just short of the ledge corner
        let start = Vec3::new(1.051, 0.9, 0.0);
        let result = world.move_capsule(start, PLAYER, Vec3::new(0.1, 0.0, 0.0), true, 0.45);

        assert!(result.stepped_up);
        assert!(result.position.x > start.x + 0.09);
        assert!(result.position.y > 1.0);
    }

    #[test]
    fn test_zero_step_height_never_steps() {
        let world = world_with([floor(), ledge()]);

        let start = Vec3::new(1.051, 0.9, 0.0);
        let result = world.move_capsule(start, PLAYER, Vec3::new(0.1, 0.0, 0.0), true, 0.0);
        assert!(!result.stepped_up);
        assert!(result.position.x < start.x + 0.01);
    }

    #[test]
    fn test_step_down_lands_on_highest_support() {
        let world = world_with([floor(), ledge()]);

        // Centered over the ledge: rests at ledge top + half segment + radius
        let landing = world.step_down(Vec3::new(2.0, 1.6, 0.0), PLAYER, 0.45);
        assert!((landing.y - 1.3).abs() < 1.0e-4);

        // Nothing below within reach: full drop
        let landing = world.step_down(Vec3::new(2.0, 5.0, 0.0), PLAYER, 0.45);
        assert!((landing.y - 4.55).abs() < 1.0e-4);
    }

    #[test]
    fn test_probe_distance_comes_from_config() {
        use crate::world::PhysicsConfig;

        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(8.0, 0.5));
        world.add_solid_box(floor());

        // 0.3 above the floor: outside the default probe, inside a 0.5 probe
        let result = world.resolve_capsule(Vec3::new(0.0, 1.2, 0.0), PLAYER);
        assert!(result.grounded);
        assert!(!result.collided);
    }
}
