//! Collision shapes
//!
//! Lightweight value types used by the narrow phase and the query surface.
//! None of them own any world state.

use fogbound_math::Vec3;
use serde::{Deserialize, Serialize};

/// A sphere defined by center and radius
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere at the given center with the given radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point is inside or on the sphere
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }
}

/// An axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a position with given half-extents
    ///
    /// Negative half-extents collapse to zero so the box is never inverted.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.max_components(Vec3::ZERO);
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest box containing both segment endpoints
    pub fn from_segment(from: Vec3, to: Vec3) -> Self {
        Self {
            min: from.min_components(to),
            max: from.max_components(to),
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents (half the size in each dimension)
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if a point is inside or on the AABB
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Get the closest point inside or on the AABB to a given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp_components(self.min, self.max)
    }

    /// Grow the box by `amount` on every side
    pub fn expanded(&self, amount: Vec3) -> Self {
        Self {
            min: self.min - amount,
            max: self.max + amount,
        }
    }

    /// Grow the box by `amount` uniformly
    pub fn inflated(&self, amount: f32) -> Self {
        self.expanded(Vec3::splat(amount))
    }

    /// Stretch the box up and down by `amount`
    ///
    /// This is how a vertical capsule is reduced to a sphere test: the
    /// capsule's half segment is moved onto the box instead.
    pub fn expanded_vertically(&self, amount: f32) -> Self {
        self.expanded(Vec3::new(0.0, amount, 0.0))
    }

    /// Translate the AABB by a delta
    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Check whether two boxes touch or overlap
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// A vertical capsule described only by its dimensions
///
/// Position is always passed separately and refers to the capsule center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    /// Radius of the hemispherical caps and of the cylinder
    pub radius: f32,
    /// Total height including both caps
    pub height: f32,
}

impl Capsule {
    /// Create a new capsule
    pub fn new(radius: f32, height: f32) -> Self {
        Self { radius, height }
    }

    /// Distance from the capsule center to the center of either cap
    ///
    /// Zero when the capsule is not taller than its diameter (it is a sphere).
    pub fn half_segment(&self) -> f32 {
        (self.height * 0.5 - self.radius).max(0.0)
    }

    /// Half-extents of the capsule's bounding box
    pub fn bounds_half_extents(&self) -> Vec3 {
        Vec3::new(self.radius, self.radius + self.half_segment(), self.radius)
    }

    /// Bounding box of the capsule centered at `position`
    pub fn bounds_at(&self, position: Vec3) -> Aabb {
        Aabb::from_center_half_extents(position, self.bounds_half_extents())
    }

    /// The sphere used for narrow-phase tests at `position`
    pub fn sphere_at(&self, position: Vec3) -> Sphere {
        Sphere::new(position, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_contains() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        assert!(sphere.contains(Vec3::ZERO));
        assert!(sphere.contains(Vec3::new(1.0, 0.0, 0.0))); // on surface
        assert!(!sphere.contains(Vec3::new(1.1, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_from_center_half_extents() {
        let aabb = Aabb::from_center_half_extents(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(0.5));
        assert_eq!(aabb.min, Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(aabb.max, Vec3::new(1.5, 2.5, 3.5));
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.half_extents(), Vec3::splat(0.5));
    }

    #[test]
    fn test_aabb_negative_half_extents_collapse() {
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(-1.0, 2.0, 1.0));
        assert_eq!(aabb.min.x, 0.0);
        assert_eq!(aabb.max.x, 0.0);
        assert!(aabb.contains(Vec3::new(0.0, 1.0, 0.5)));
    }

    #[test]
    fn test_aabb_closest_point() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);

        let inside = Vec3::splat(0.5);
        assert_eq!(aabb.closest_point(inside), inside);

        let outside = Vec3::new(2.0, 0.5, -1.0);
        assert_eq!(aabb.closest_point(outside), Vec3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_aabb_expanded_vertically() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE).expanded_vertically(0.25);
        assert_eq!(aabb.min, Vec3::new(0.0, -0.25, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 1.25, 1.0));
    }

    #[test]
    fn test_aabb_overlaps() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = a.translated(Vec3::new(0.5, 0.0, 0.0));
        let c = a.translated(Vec3::new(3.0, 0.0, 0.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_capsule_half_segment() {
        let capsule = Capsule::new(0.45, 1.8);
        assert!((capsule.half_segment() - 0.45).abs() < 0.0001);

        // Short capsules degenerate into spheres
        let ball = Capsule::new(0.5, 0.6);
        assert_eq!(ball.half_segment(), 0.0);
    }

    #[test]
    fn test_capsule_bounds() {
        let capsule = Capsule::new(0.5, 2.0);
        let bounds = capsule.bounds_at(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(bounds.min, Vec3::new(-0.5, 0.0, -0.5));
        assert_eq!(bounds.max, Vec3::new(0.5, 2.0, 0.5));
    }
}
