//! Static-world collision for Fogbound
//!
//! This crate provides the collision core used by the simulation, including:
//! - Solid boxes and trigger volumes stored in a rebuildable world
//! - Segment and sphere tests against axis-aligned boxes
//! - Capsule movement with penetration resolution and step-up
//! - Raycasts, line of sight and trigger queries
//! - Serializable world layouts

pub mod body;
pub mod capsule;
pub mod collision;
pub mod layout;
pub mod query;
pub mod shapes;
pub mod spatial;
pub mod spawn;
pub mod world;

// Re-export commonly used types
pub use body::{EntityId, SolidBox, TriggerKind, TriggerVolume};
pub use capsule::{MoveResult, MAX_RESOLVE_ITERATIONS, RESOLVE_EPSILON};
pub use collision::{segment_vs_aabb, sphere_vs_aabb, sphere_vs_expanded_aabb, CollisionLayer, Contact, LayerMask, SegmentHit};
pub use layout::{ActorSpawn, LayoutError, WorldLayout};
pub use query::{RaycastHit, TriggerCastHit, TriggerHit};
pub use shapes::{Aabb, Capsule, Sphere};
pub use spatial::SpatialGrid;
pub use world::{PhysicsConfig, PhysicsWorld};
