//! 3D Mathematics Library
//!
//! This crate provides the small vector type shared by the Fogbound
//! collision core and the simulation shell.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components (Y is up)

mod vec3;

pub use vec3::Vec3;
