//! Static bodies stored in the physics world
//!
//! Solid boxes block movement and sight; trigger volumes only report overlap.
//! Both are plain values copied into the world, so callers may mutate or drop
//! their own entity data freely between rebuilds.

use serde::{Deserialize, Serialize};

use crate::collision::CollisionLayer;
use crate::shapes::Aabb;
use fogbound_math::Vec3;

/// Opaque identifier of the gameplay entity that owns a box or trigger
///
/// The physics world never interprets or allocates these.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a trigger volume is used for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    /// Window or pallet gap that can be vaulted
    Vault,
    /// Anything with a use prompt (generators, hooks, pallets)
    #[default]
    Interaction,
    /// Chase-detection area that follows the killer
    Chase,
}

/// A static, axis-aligned solid
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolidBox {
    /// Owning entity
    pub entity: EntityId,
    /// World-space center
    pub center: Vec3,
    /// Half the size along each axis
    pub half_extents: Vec3,
    /// Collision layer, for callers classifying hits
    #[serde(default)]
    pub layer: CollisionLayer,
    /// Whether the box occludes line of sight
    #[serde(default = "default_blocks_sight")]
    pub blocks_sight: bool,
}

fn default_blocks_sight() -> bool {
    true
}

impl SolidBox {
    /// Create an environment box that blocks sight
    pub fn new(entity: EntityId, center: Vec3, half_extents: Vec3) -> Self {
        Self {
            entity,
            center,
            half_extents,
            layer: CollisionLayer::Environment,
            blocks_sight: true,
        }
    }

    /// Set the collision layer
    pub fn with_layer(mut self, layer: CollisionLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Set whether the box blocks line of sight
    pub fn with_blocks_sight(mut self, blocks_sight: bool) -> Self {
        self.blocks_sight = blocks_sight;
        self
    }

    /// World-space bounds of the box
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, self.half_extents)
    }
}

impl Default for SolidBox {
    fn default() -> Self {
        Self::new(EntityId::default(), Vec3::ZERO, Vec3::splat(0.5))
    }
}

/// A non-colliding volume used for overlap and kind queries
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerVolume {
    /// Owning entity
    pub entity: EntityId,
    /// World-space center, the only field that may change between rebuilds
    pub center: Vec3,
    /// Half the size along each axis
    pub half_extents: Vec3,
    /// What the trigger is for
    #[serde(default)]
    pub kind: TriggerKind,
}

impl TriggerVolume {
    /// Create a new trigger volume
    pub fn new(entity: EntityId, center: Vec3, half_extents: Vec3, kind: TriggerKind) -> Self {
        Self {
            entity,
            center,
            half_extents,
            kind,
        }
    }

    /// World-space bounds of the trigger
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, self.half_extents)
    }
}

impl Default for TriggerVolume {
    fn default() -> Self {
        Self::new(EntityId::default(), Vec3::ZERO, Vec3::splat(0.5), TriggerKind::Interaction)
    }
}
