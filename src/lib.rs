//! Fogbound - headless survivor/killer simulation
//!
//! Drives capsule actors through the `fogbound_physics` collision core with
//! layered configuration and scripted input.

pub mod actor;
pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
