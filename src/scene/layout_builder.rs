//! LayoutBuilder - Declarative world layout construction
//!
//! Provides a fluent API for building collision layouts for a yard.

use fogbound_math::Vec3;
use fogbound_physics::{CollisionLayer, EntityId, SolidBox, TriggerKind, TriggerVolume, WorldLayout};

/// Height of the perimeter walls
const WALL_HEIGHT: f32 = 3.0;

/// Half-thickness of walls
const WALL_HALF_THICKNESS: f32 = 0.25;

/// Builder for constructing world layouts
///
/// Entity ids are handed out sequentially from 1 in the order things are added.
///
/// # Example
/// ```ignore
/// let layout = LayoutBuilder::new("Yard")
///     .add_floor(40.0)
///     .add_wall(Vec3::new(0.0, 0.0, 5.0), Vec3::new(4.0, 0.0, 0.0))
///     .add_window(Vec3::new(0.0, 0.0, -5.0))
///     .add_spawn("survivor", Vec3::new(0.0, 0.9, 0.0))
///     .build();
/// ```
pub struct LayoutBuilder {
    layout: WorldLayout,
    next_entity: u32,
}

impl LayoutBuilder {
    /// Create a new layout builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            layout: WorldLayout::new(name),
            next_entity: 1,
        }
    }

    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        id
    }

    /// Add a square floor slab whose top is at y = 0
    pub fn add_floor(mut self, size: f32) -> Self {
        let entity = self.allocate();
        let half = size * 0.5;
        self.layout.solids.push(SolidBox::new(
            entity,
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(half, 0.5, half),
        ));
        self
    }

    /// Add a full-height wall standing on the floor
    ///
    /// `base` is the wall's center at floor level; `half_length` gives its
    /// horizontal half-extents before thickness is applied.
    pub fn add_wall(mut self, base: Vec3, half_length: Vec3) -> Self {
        let entity = self.allocate();
        let half_extents = Vec3::new(
            half_length.x.max(WALL_HALF_THICKNESS),
            WALL_HEIGHT * 0.5,
            half_length.z.max(WALL_HALF_THICKNESS),
        );
        self.layout.solids.push(SolidBox::new(
            entity,
            base + Vec3::new(0.0, WALL_HEIGHT * 0.5, 0.0),
            half_extents,
        ));
        self
    }

    /// Add four walls enclosing a square of the given size
    pub fn add_perimeter(self, size: f32) -> Self {
        let half = size * 0.5;
        self.add_wall(Vec3::new(0.0, 0.0, half), Vec3::new(half, 0.0, 0.0))
            .add_wall(Vec3::new(0.0, 0.0, -half), Vec3::new(half, 0.0, 0.0))
            .add_wall(Vec3::new(half, 0.0, 0.0), Vec3::new(0.0, 0.0, half))
            .add_wall(Vec3::new(-half, 0.0, 0.0), Vec3::new(0.0, 0.0, half))
    }

    /// Add a box resting on the floor
    pub fn add_crate(mut self, base: Vec3, half_extents: Vec3) -> Self {
        let entity = self.allocate();
        self.layout.solids.push(SolidBox::new(
            entity,
            base + Vec3::new(0.0, half_extents.y, 0.0),
            half_extents,
        ));
        self
    }

    /// Add a window: a low see-through sill with a vault trigger around it
    pub fn add_window(mut self, base: Vec3) -> Self {
        let entity = self.allocate();
        let sill = Vec3::new(1.0, 0.5, WALL_HALF_THICKNESS);
        self.layout.solids.push(
            SolidBox::new(entity, base + Vec3::new(0.0, sill.y, 0.0), sill).with_blocks_sight(false),
        );
        self.layout.triggers.push(TriggerVolume::new(
            entity,
            base + Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 1.2),
            TriggerKind::Vault,
        ));
        self
    }

    /// Add a standing pallet with a use trigger
    pub fn add_pallet(mut self, base: Vec3) -> Self {
        let entity = self.allocate();
        let half = Vec3::new(0.8, 1.0, 0.1);
        self.layout.solids.push(
            SolidBox::new(entity, base + Vec3::new(0.0, half.y, 0.0), half)
                .with_layer(CollisionLayer::Interactable)
                .with_blocks_sight(false),
        );
        self.layout.triggers.push(TriggerVolume::new(
            entity,
            base + Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.2, 1.0, 1.0),
            TriggerKind::Interaction,
        ));
        self
    }

    /// Add a generator: a solid block with a use trigger around it
    pub fn add_generator(mut self, base: Vec3) -> Self {
        let entity = self.allocate();
        let half = Vec3::new(0.7, 0.6, 0.5);
        self.layout.solids.push(
            SolidBox::new(entity, base + Vec3::new(0.0, half.y, 0.0), half)
                .with_layer(CollisionLayer::Interactable),
        );
        self.layout.triggers.push(TriggerVolume::new(
            entity,
            base + Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.4, 1.0, 1.3),
            TriggerKind::Interaction,
        ));
        self
    }

    /// Add a named actor spawn
    pub fn add_spawn(mut self, name: &str, position: Vec3) -> Self {
        self.layout = self.layout.with_spawn(name, position);
        self
    }

    /// First entity id not used by the layout
    pub fn next_free_entity(&self) -> EntityId {
        EntityId(self.next_entity)
    }

    /// Build the layout
    pub fn build(self) -> WorldLayout {
        self.layout
    }
}

/// The built-in yard used when no layout file is configured
///
/// A walled square with crates, a low step, windows, pallets and generators.
pub fn default_yard() -> WorldLayout {
    LayoutBuilder::new("Yard")
        .add_floor(60.0)
        .add_perimeter(48.0)
        .add_wall(Vec3::new(-6.0, 0.0, 4.0), Vec3::new(5.0, 0.0, 0.0))
        .add_wall(Vec3::new(8.0, 0.0, -6.0), Vec3::new(0.0, 0.0, 6.0))
        .add_crate(Vec3::new(3.0, 0.0, 10.0), Vec3::new(1.0, 1.0, 1.0))
        .add_crate(Vec3::new(-12.0, 0.0, -8.0), Vec3::new(2.0, 0.75, 1.5))
        .add_crate(Vec3::new(0.0, 0.0, -4.0), Vec3::new(3.0, 0.2, 2.0))
        .add_window(Vec3::new(-6.0, 0.0, -12.0))
        .add_window(Vec3::new(14.0, 0.0, 4.0))
        .add_pallet(Vec3::new(4.0, 0.0, 4.0))
        .add_pallet(Vec3::new(-16.0, 0.0, 12.0))
        .add_generator(Vec3::new(-15.0, 0.0, -15.0))
        .add_generator(Vec3::new(16.0, 0.0, 15.0))
        .add_spawn("survivor", Vec3::new(-4.0, 0.9, -10.0))
        .add_spawn("killer", Vec3::new(15.0, 0.9, 10.0))
        .build()
}
