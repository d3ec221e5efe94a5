//! Application systems
//!
//! Modular systems driving the headless simulation.

mod simulation;

pub use simulation::{SimulationStats, SimulationSystem, TickReport};
