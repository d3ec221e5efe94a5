//! Level construction utilities
//!
//! This module provides a declarative API for building world layouts.

mod layout_builder;

pub use layout_builder::{default_yard, LayoutBuilder};
