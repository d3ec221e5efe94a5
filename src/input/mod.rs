//! Input handling module
//!
//! Provides scripted movement intents for actors.

mod script;

pub use script::{MoveIntent, Waypoint, WaypointScript, DEFAULT_ARRIVE_RADIUS};
