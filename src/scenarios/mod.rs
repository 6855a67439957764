//! Named preset configurations that bulk-populate a simulation.
//!
//! Each preset pairs a force-model configuration with a loader that places
//! its bodies:
//! - Gravity: binary system, solar system, accretion disk
//! - Fields: dipole field, parallel charges, charge pair
//! - Gas: gas box, heater/cooler
//!
//! Loading goes through [`Simulation::load_preset`](crate::simulation::Simulation::load_preset),
//! which resets the run before calling the loader.

pub mod presets;

use bevy::math::DVec2;

use crate::config::{Bounds, ForceModel, SimulationConfig};
use crate::simulation::Simulation;
use crate::types::InvalidBodyError;

pub use presets::PRESETS;

/// Box used by the gas presets.
pub const GAS_BOX: Bounds = Bounds {
    min: DVec2::ZERO,
    max: DVec2::new(400.0, 300.0),
};

/// A predefined simulation setup.
#[derive(Clone, Copy, Debug)]
pub struct Preset {
    /// Unique identifier used by [`find`].
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Brief description of what the preset demonstrates.
    pub description: &'static str,
    pub force_model: ForceModel,
    /// Initial time scale.
    pub time_scale: f64,
    /// Whether to stay idle after loading instead of running.
    pub start_paused: bool,
    /// Adjustments on top of the force model's default configuration.
    pub tune: fn(&mut SimulationConfig),
    /// Places the preset's bodies into a freshly reset simulation.
    pub populate: fn(&mut Simulation) -> Result<(), InvalidBodyError>,
}

impl Preset {
    /// Configuration this preset runs with.
    pub fn config(&self) -> SimulationConfig {
        let mut config = match self.force_model {
            ForceModel::Gravity => SimulationConfig::gravity(),
            ForceModel::Electromagnetic => SimulationConfig::electromagnetic(),
            ForceModel::Thermal => SimulationConfig::gas(GAS_BOX),
        };
        config.time_scale = self.time_scale;
        (self.tune)(&mut config);
        config
    }
}

/// Look up a preset by id.
pub fn find(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.id == id)
}
