//! Collision detection primitives
//!
//! Provides the two narrow-phase tests everything else is built on:
//! segment vs AABB (raycasts, swept triggers) and sphere vs vertically
//! expanded AABB (capsule resolution). Also defines collision layers.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::shapes::{Aabb, Sphere};
use fogbound_math::Vec3;

/// Segment direction components smaller than this are treated as parallel
const PARALLEL_EPSILON: f32 = 1.0e-7;

/// Squared distance under which a sphere center counts as inside the box
const INSIDE_EPSILON_SQ: f32 = 1.0e-8;

/// Collision layer a solid belongs to
///
/// The core never changes behavior per layer; callers use it to classify hits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionLayer {
    /// Actor-owned geometry
    Player,
    /// Static world geometry (walls, floors, dropped pallets)
    #[default]
    Environment,
    /// Objects the player can use
    Interactable,
}

bitflags! {
    /// Set of collision layers, used to filter raycasts
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct LayerMask: u8 {
        const PLAYER = 1 << 0;
        const ENVIRONMENT = 1 << 1;
        const INTERACTABLE = 1 << 2;
    }
}

impl LayerMask {
    /// Check whether `layer` is part of this mask
    pub fn includes(self, layer: CollisionLayer) -> bool {
        self.contains(LayerMask::from(layer))
    }
}

impl From<CollisionLayer> for LayerMask {
    fn from(layer: CollisionLayer) -> Self {
        match layer {
            CollisionLayer::Player => LayerMask::PLAYER,
            CollisionLayer::Environment => LayerMask::ENVIRONMENT,
            CollisionLayer::Interactable => LayerMask::INTERACTABLE,
        }
    }
}

/// Contact information from a sphere-vs-box test
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Closest point on the (expanded) box to the sphere center
    pub point: Vec3,
    /// Unit normal pointing from the box toward the sphere
    pub normal: Vec3,
    /// Penetration depth (positive means overlapping)
    pub penetration: f32,
}

impl Contact {
    /// Create a new contact
    pub fn new(point: Vec3, normal: Vec3, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration,
        }
    }

    /// Check if this represents an actual collision (positive penetration)
    pub fn is_colliding(&self) -> bool {
        self.penetration > 0.0
    }
}

/// Where a segment enters a box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentHit {
    /// Entry parameter along the segment, in [0, 1]
    pub t: f32,
    /// Outward normal of the face that was entered
    pub normal: Vec3,
}

/// Test a segment against an axis-aligned box (slab test)
///
/// Returns the entry parameter and the outward normal of the entered face.
/// A segment that starts inside the box hits at `t = 0` with an up normal.
/// A zero-length segment degenerates into a point-in-box test.
pub fn segment_vs_aabb(from: Vec3, to: Vec3, aabb: &Aabb) -> Option<SegmentHit> {
    let direction = to - from;

    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;
    let mut best_normal = Vec3::Y;

    for axis in 0..3 {
        let start = from[axis];
        let dir = direction[axis];
        let min_axis = aabb.min[axis];
        let max_axis = aabb.max[axis];

        if dir.abs() < PARALLEL_EPSILON {
            // Parallel to this slab: must already be between its planes
            if start < min_axis || start > max_axis {
                return None;
            }
            continue;
        }

        let inv_dir = 1.0 / dir;
        let mut t1 = (min_axis - start) * inv_dir;
        let mut t2 = (max_axis - start) * inv_dir;

        // t1 crosses the min plane, whose outward normal points down the axis
        let mut near_normal = Vec3::ZERO;
        near_normal[axis] = -1.0;

        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
            near_normal[axis] = 1.0;
        }

        if t1 > t_min {
            t_min = t1;
            best_normal = near_normal;
        }

        t_max = t_max.min(t2);
        if t_min > t_max {
            return None;
        }
    }

    if !(0.0..=1.0).contains(&t_min) {
        return None;
    }

    Some(SegmentHit {
        t: t_min,
        normal: best_normal,
    })
}

/// Test sphere vs AABB collision
///
/// Returns a contact if the sphere is intersecting the AABB.
pub fn sphere_vs_aabb(sphere: &Sphere, aabb: &Aabb) -> Option<Contact> {
    sphere_vs_expanded_aabb(sphere, aabb, 0.0)
}

/// Test a sphere against a box stretched vertically by `half_segment`
///
/// With `half_segment` set to a capsule's half segment this is an exact
/// vertical-capsule vs box overlap test. A sphere whose center lies inside
/// the box always intersects, even with a zero radius; the normal is then
/// the outward axis of the nearest face.
pub fn sphere_vs_expanded_aabb(sphere: &Sphere, aabb: &Aabb, half_segment: f32) -> Option<Contact> {
    let bounds = aabb.expanded_vertically(half_segment.max(0.0));
    let center = sphere.center;

    let closest = bounds.closest_point(center);
    let delta = center - closest;
    let dist_squared = delta.length_squared();

    if !bounds.contains(center) {
        if dist_squared >= sphere.radius * sphere.radius {
            return None;
        }

        let distance = dist_squared.sqrt();
        let normal = if dist_squared > INSIDE_EPSILON_SQ {
            delta / distance
        } else {
            dominant_axis(delta)
        };
        return Some(Contact::new(closest, normal, sphere.radius - distance));
    }

    // Center is inside: closest-point direction is undefined, use the shortest way out
    let faces = [
        (center.x - bounds.min.x, -Vec3::X),
        (bounds.max.x - center.x, Vec3::X),
        (center.y - bounds.min.y, -Vec3::Y),
        (bounds.max.y - center.y, Vec3::Y),
        (center.z - bounds.min.z, -Vec3::Z),
        (bounds.max.z - center.z, Vec3::Z),
    ];

    let (mut min_dist, mut normal) = faces[0];
    for &(dist, face_normal) in &faces[1..] {
        if dist < min_dist {
            min_dist = dist;
            normal = face_normal;
        }
    }

    Some(Contact::new(closest, normal, sphere.radius + min_dist))
}

/// Signed unit axis of the largest component of `v`
fn dominant_axis(v: Vec3) -> Vec3 {
    let magnitude = v.abs();
    let mut axis = 0;
    for i in 1..3 {
        if magnitude[i] > magnitude[axis] {
            axis = i;
        }
    }

    let mut normal = Vec3::ZERO;
    normal[axis] = v[axis].signum();
    normal
}
