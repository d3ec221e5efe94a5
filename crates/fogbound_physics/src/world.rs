//! Physics world: the static collision snapshot
//!
//! The world holds one generation of solid boxes and trigger volumes. It is
//! rebuilt (clear + add) whenever gameplay geometry changes and is otherwise
//! read-only: every mutating method takes `&mut self`, while movement and
//! queries take `&self`, so no query can observe a half-built world.

use serde::{Deserialize, Serialize};

use crate::body::{EntityId, SolidBox, TriggerVolume};
use crate::layout::WorldLayout;
use crate::shapes::Aabb;
use crate::spatial::{SpatialGrid, DEFAULT_CELL_SIZE};
use fogbound_math::Vec3;

/// Default distance of the downward grounded probe
pub const DEFAULT_GROUND_PROBE_DISTANCE: f32 = 0.08;

/// Configuration for the physics world
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Edge length of a broad-phase grid cell
    pub cell_size: f32,
    /// How far below a resolved capsule to look for ground it is resting on
    pub ground_probe_distance: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            ground_probe_distance: DEFAULT_GROUND_PROBE_DISTANCE,
        }
    }
}

impl PhysicsConfig {
    /// Create a new physics config
    pub fn new(cell_size: f32, ground_probe_distance: f32) -> Self {
        Self {
            cell_size,
            ground_probe_distance,
        }
    }
}

/// The static collision world
#[derive(Clone, Debug)]
pub struct PhysicsWorld {
    /// Solid boxes, in insertion order
    solids: Vec<SolidBox>,
    /// Trigger volumes, in insertion order
    triggers: Vec<TriggerVolume>,
    /// Broad phase over `solids`
    grid: SpatialGrid,
    /// Physics configuration
    config: PhysicsConfig,
}

impl PhysicsWorld {
    /// Create an empty world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create an empty world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            solids: Vec::new(),
            triggers: Vec::new(),
            grid: SpatialGrid::new(config.cell_size),
            config,
        }
    }

    /// Physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Remove every solid and trigger
    pub fn clear(&mut self) {
        self.solids.clear();
        self.triggers.clear();
        self.grid.clear();
    }

    /// Add a solid box to the world
    pub fn add_solid_box(&mut self, solid: SolidBox) {
        let index = self.solids.len();
        self.grid.insert(index, &solid.bounds());
        self.solids.push(solid);
    }

    /// Add a trigger volume to the world
    pub fn add_trigger(&mut self, trigger: TriggerVolume) {
        self.triggers.push(trigger);
    }

    /// Move an existing trigger without a rebuild
    ///
    /// Updates the first trigger owned by `entity`. Returns false if there is none.
    pub fn update_trigger_center(&mut self, entity: EntityId, center: Vec3) -> bool {
        match self.triggers.iter_mut().find(|trigger| trigger.entity == entity) {
            Some(trigger) => {
                trigger.center = center;
                true
            }
            None => false,
        }
    }

    /// Replace the whole world in one go
    pub fn rebuild<S, T>(&mut self, solids: S, triggers: T)
    where
        S: IntoIterator<Item = SolidBox>,
        T: IntoIterator<Item = TriggerVolume>,
    {
        self.clear();
        for solid in solids {
            self.add_solid_box(solid);
        }
        for trigger in triggers {
            self.add_trigger(trigger);
        }

        log::debug!(
            "Rebuilt physics world: {} solids, {} triggers, {} grid cells",
            self.solids.len(),
            self.triggers.len(),
            self.grid.cell_count()
        );
    }

    /// Replace the whole world with the contents of a layout
    pub fn rebuild_from_layout(&mut self, layout: &WorldLayout) {
        self.rebuild(layout.solids.iter().copied(), layout.triggers.iter().copied());
    }

    /// Solid boxes, in insertion order
    pub fn solids(&self) -> &[SolidBox] {
        &self.solids
    }

    /// Trigger volumes, in insertion order
    pub fn triggers(&self) -> &[TriggerVolume] {
        &self.triggers
    }

    /// Number of solid boxes
    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    /// Number of trigger volumes
    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Indices of solids whose cells overlap `bounds`, in insertion order
    pub(crate) fn solid_candidates(&self, bounds: &Aabb, out: &mut Vec<usize>) {
        self.grid.query(bounds, out);
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
