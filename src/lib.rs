//! Physlab - 2D Particle Physics Simulation Core
//!
//! A library crate providing the body store, force laws, integrator,
//! collision handling and derived metrics for real-time 2D simulations of
//! gravity, charged particles and ideal gases, plus a bevy plugin that
//! drives them.

pub mod collision;
pub mod config;
pub mod metrics;
pub mod physics;
pub mod plugin;
pub mod rng;
pub mod scenarios;
pub mod simulation;
pub mod store;
pub mod trail;
pub mod types;

pub use config::SimulationConfig;
pub use plugin::{SimulationCommand, SimulationPlugin};
pub use simulation::{Simulation, SimulationError, SimulationState, StepReport};

#[cfg(test)]
pub mod test_utils;
