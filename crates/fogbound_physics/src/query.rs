//! Raycasts, line of sight and trigger queries
//!
//! Nothing here can fail: a miss is `None` or an empty list.

use crate::body::{EntityId, TriggerKind};
use crate::collision::{segment_vs_aabb, LayerMask};
use crate::shapes::{Aabb, Capsule};
use crate::world::PhysicsWorld;
use fogbound_math::Vec3;

/// Nearest solid struck by a segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastHit {
    /// Entity owning the struck box
    pub entity: EntityId,
    /// Entry fraction along the segment, 0 at `from`, 1 at `to`
    pub t: f32,
    /// World-space entry point
    pub position: Vec3,
    /// Outward normal of the struck face
    pub normal: Vec3,
}

/// A trigger overlapping a capsule
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerHit {
    pub entity: EntityId,
    pub kind: TriggerKind,
}

/// A trigger struck by a swept sphere
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerCastHit {
    pub entity: EntityId,
    pub kind: TriggerKind,
    /// Entry fraction along the sweep
    pub t: f32,
    /// Sphere center at the moment of entry
    pub position: Vec3,
}

impl PhysicsWorld {
    /// Nearest solid hit by the segment `from -> to`
    ///
    /// Boxes owned by `ignore` are skipped. On equal `t` the earlier box wins.
    pub fn raycast_nearest(&self, from: Vec3, to: Vec3, ignore: Option<EntityId>) -> Option<RaycastHit> {
        self.raycast_nearest_masked(from, to, ignore, LayerMask::all())
    }

    /// Like [`raycast_nearest`](Self::raycast_nearest), restricted to solids whose layer is in `mask`
    pub fn raycast_nearest_masked(
        &self,
        from: Vec3,
        to: Vec3,
        ignore: Option<EntityId>,
        mask: LayerMask,
    ) -> Option<RaycastHit> {
        let mut candidates = Vec::new();
        self.solid_candidates(&Aabb::from_segment(from, to), &mut candidates);

        let mut best: Option<RaycastHit> = None;
        for &index in &candidates {
            let solid = &self.solids()[index];
            if Some(solid.entity) == ignore || !mask.includes(solid.layer) {
                continue;
            }

            let Some(hit) = segment_vs_aabb(from, to, &solid.bounds()) else {
                continue;
            };

            if best.map_or(true, |current| hit.t < current.t) {
                best = Some(RaycastHit {
                    entity: solid.entity,
                    t: hit.t,
                    position: from.lerp(to, hit.t),
                    normal: hit.normal,
                });
            }
        }

        best
    }

    /// Whether any solid (other than `ignore`'s) intersects the segment
    pub fn raycast_any(&self, from: Vec3, to: Vec3, ignore: Option<EntityId>) -> bool {
        self.raycast_nearest(from, to, ignore).is_some()
    }

    /// Whether no sight-blocking solid lies between `from` and `to`
    pub fn has_line_of_sight(&self, from: Vec3, to: Vec3, ignore: Option<EntityId>) -> bool {
        let mut candidates = Vec::new();
        self.solid_candidates(&Aabb::from_segment(from, to), &mut candidates);

        !candidates.iter().any(|&index| {
            let solid = &self.solids()[index];
            solid.blocks_sight
                && Some(solid.entity) != ignore
                && segment_vs_aabb(from, to, &solid.bounds()).is_some()
        })
    }

    /// Triggers of `kind` overlapping a capsule centered at `position`
    pub fn query_capsule_triggers(&self, position: Vec3, capsule: Capsule, kind: TriggerKind) -> Vec<TriggerHit> {
        let mut hits = Vec::new();
        self.query_capsule_triggers_into(&mut hits, position, capsule, kind);
        hits
    }

    /// Buffer-reusing form of [`query_capsule_triggers`](Self::query_capsule_triggers)
    ///
    /// `hits` is cleared first. Hits come out in store order.
    pub fn query_capsule_triggers_into(
        &self,
        hits: &mut Vec<TriggerHit>,
        position: Vec3,
        capsule: Capsule,
        kind: TriggerKind,
    ) {
        hits.clear();

        let half_segment = capsule.half_segment();
        let radius_sq = capsule.radius * capsule.radius;

        hits.extend(
            self.triggers()
                .iter()
                .filter(|trigger| trigger.kind == kind)
                .filter(|trigger| {
                    let expanded = trigger.bounds().expanded_vertically(half_segment);
                    (position - expanded.closest_point(position)).length_squared() <= radius_sq
                })
                .map(|trigger| TriggerHit {
                    entity: trigger.entity,
                    kind: trigger.kind,
                }),
        );
    }

    /// Triggers of any kind struck by a sphere of `radius` swept from `from` to `to`
    ///
    /// Each trigger is inflated by the radius and tested against the segment.
    /// Hits are sorted by ascending `t`; ties keep store order.
    pub fn sphere_cast_triggers(&self, from: Vec3, to: Vec3, radius: f32) -> Vec<TriggerCastHit> {
        let mut hits = Vec::new();
        self.sphere_cast_triggers_into(&mut hits, from, to, radius);
        hits
    }

    /// Buffer-reusing form of [`sphere_cast_triggers`](Self::sphere_cast_triggers)
    pub fn sphere_cast_triggers_into(&self, hits: &mut Vec<TriggerCastHit>, from: Vec3, to: Vec3, radius: f32) {
        hits.clear();

        let radius = radius.max(0.0);
        hits.extend(self.triggers().iter().filter_map(|trigger| {
            let hit = segment_vs_aabb(from, to, &trigger.bounds().inflated(radius))?;
            Some(TriggerCastHit {
                entity: trigger.entity,
                kind: trigger.kind,
                t: hit.t,
                position: from.lerp(to, hit.t),
            })
        }));

        hits.sort_by(|a, b| a.t.total_cmp(&b.t));
    }
}
