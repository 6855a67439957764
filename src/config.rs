//! Run-scoped simulation configuration.
//!
//! Configuration is validated whenever it crosses into a [`Simulation`];
//! the step pipeline assumes it holds valid values.
//!
//! [`Simulation`]: crate::simulation::Simulation

use bevy::math::DVec2;

use crate::types::{
    DEFAULT_COULOMB, DEFAULT_G, DEFAULT_PERMEABILITY, DEFAULT_SINGULARITY_EPSILON,
    FIELD_TRAIL_CAPACITY, ORBITAL_TRAIL_CAPACITY,
};

/// Which force law drives the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ForceModel {
    /// Pairwise inverse-square attraction.
    #[default]
    Gravity,
    /// Coulomb fields plus magnetic dipoles coupled through the Lorentz force.
    Electromagnetic,
    /// Stochastic heat-source agitation with damping.
    Thermal,
}

/// How overlapping bodies are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Bodies pass through each other.
    None,
    /// Overlapping bodies coalesce.
    #[default]
    Merge,
    /// Overlapping bodies exchange normal velocity.
    Elastic,
}

/// Axis-aligned rectangular domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Box of the given size with its lower-left corner at the origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(DVec2::ZERO, DVec2::new(width, height))
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    /// Area of the box; the gas variant treats it as volume.
    pub fn area(&self) -> f64 {
        let size = self.size();
        size.x * size.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Force-law constants.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceConstants {
    pub gravitational: f64,
    pub coulomb: f64,
    /// Vacuum permeability μ0.
    pub permeability: f64,
    /// Pairs closer than this are dropped from force sums.
    pub singularity_epsilon: f64,
    /// Field sources closer than this are ignored when evaluating a body's field.
    pub min_field_distance: f64,
}

impl Default for ForceConstants {
    fn default() -> Self {
        Self {
            gravitational: DEFAULT_G,
            coulomb: DEFAULT_COULOMB,
            permeability: DEFAULT_PERMEABILITY,
            singularity_epsilon: DEFAULT_SINGULARITY_EPSILON,
            min_field_distance: 5.0,
        }
    }
}

/// A point that heats (positive strength) or cools (negative strength) nearby particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatSource {
    pub pos: DVec2,
    pub strength: f64,
}

impl HeatSource {
    pub fn new(pos: DVec2, strength: f64) -> Self {
        Self { pos, strength }
    }
}

/// Parameters of the thermal agitation model.
#[derive(Clone, Debug, PartialEq)]
pub struct ThermalConfig {
    pub heat_sources: Vec<HeatSource>,
    /// Length scale of the exponential influence falloff.
    pub falloff: f64,
    /// Speed kick per unit of positive heat influence.
    pub agitation: f64,
    /// Fraction of velocity removed per unit of negative heat influence.
    pub cooling: f64,
    /// Multiplicative velocity retention applied every step (1 = none).
    pub damping: f64,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            heat_sources: Vec::new(),
            falloff: 60.0,
            agitation: 4.0,
            cooling: 0.05,
            damping: 1.0,
        }
    }
}

/// Constants used by the thermodynamic estimate.
#[derive(Clone, Debug, PartialEq)]
pub struct ThermoConstants {
    pub gas_constant: f64,
    /// Converts mean particle kinetic energy to temperature.
    pub boltzmann: f64,
}

impl Default for ThermoConstants {
    fn default() -> Self {
        Self {
            gas_constant: 8.314,
            boltzmann: 1.0,
        }
    }
}

/// Configuration rejected at the boundary.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("base timestep must be positive and finite, got {0}")]
    InvalidTimestep(f64),

    #[error("time scale must be non-negative and finite, got {0}")]
    InvalidTimeScale(f64),

    #[error("{name} must be non-negative and finite, got {value}")]
    InvalidConstant { name: &'static str, value: f64 },

    #[error("{name} must lie in [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },

    #[error("bounds are degenerate: min {min:?}, max {max:?}")]
    DegenerateBounds { min: DVec2, max: DVec2 },

    #[error("trail capacity must be at least 1")]
    ZeroTrailCapacity,

    #[error("metrics interval must be at least 1 step")]
    ZeroMetricsInterval,
}

/// Everything the step pipeline reads besides the bodies themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Base timestep in seconds.
    pub base_dt: f64,
    /// Live speed multiplier; the effective step is `base_dt * time_scale`.
    pub time_scale: f64,
    pub force_model: ForceModel,
    pub collision_policy: CollisionPolicy,
    pub constants: ForceConstants,
    pub thermal: ThermalConfig,
    /// `None` means open space.
    pub bounds: Option<Bounds>,
    /// Velocity fraction kept on a wall bounce.
    pub restitution: f64,
    pub trail_capacity: usize,
    /// Metrics are recomputed every this many steps.
    pub metrics_interval: u32,
    /// Seed for every random draw in the run.
    pub seed: u64,
    pub thermo: ThermoConstants,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::gravity()
    }
}

impl SimulationConfig {
    /// Orbital variant: gravity, merging, open space, long trails.
    pub fn gravity() -> Self {
        Self {
            base_dt: 1.0 / 60.0,
            time_scale: 1.0,
            force_model: ForceModel::Gravity,
            collision_policy: CollisionPolicy::Merge,
            constants: ForceConstants::default(),
            thermal: ThermalConfig::default(),
            bounds: None,
            restitution: 0.8,
            trail_capacity: ORBITAL_TRAIL_CAPACITY,
            metrics_interval: 5,
            seed: 0x5eed,
            thermo: ThermoConstants::default(),
        }
    }

    /// Field variant: charges and magnets, pass-through, short trails.
    pub fn electromagnetic() -> Self {
        Self {
            force_model: ForceModel::Electromagnetic,
            collision_policy: CollisionPolicy::None,
            trail_capacity: FIELD_TRAIL_CAPACITY,
            ..Self::gravity()
        }
    }

    /// Gas variant: thermal agitation, elastic collisions in a closed box.
    pub fn gas(bounds: Bounds) -> Self {
        Self {
            force_model: ForceModel::Thermal,
            collision_policy: CollisionPolicy::Elastic,
            bounds: Some(bounds),
            restitution: 1.0,
            trail_capacity: FIELD_TRAIL_CAPACITY,
            ..Self::gravity()
        }
    }

    /// Effective timestep for one step.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.base_dt * self.time_scale
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_dt.is_finite() && self.base_dt > 0.0) {
            return Err(ConfigError::InvalidTimestep(self.base_dt));
        }
        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(ConfigError::InvalidTimeScale(self.time_scale));
        }

        let c = &self.constants;
        non_negative("gravitational constant", c.gravitational)?;
        non_negative("coulomb constant", c.coulomb)?;
        non_negative("permeability", c.permeability)?;
        non_negative("min field distance", c.min_field_distance)?;
        if !(c.singularity_epsilon.is_finite() && c.singularity_epsilon > 0.0) {
            return Err(ConfigError::InvalidConstant {
                name: "singularity epsilon",
                value: c.singularity_epsilon,
            });
        }

        let t = &self.thermal;
        if !(t.falloff.is_finite() && t.falloff > 0.0) {
            return Err(ConfigError::InvalidConstant {
                name: "heat falloff",
                value: t.falloff,
            });
        }
        non_negative("agitation", t.agitation)?;
        non_negative("cooling", t.cooling)?;
        unit_range("thermal damping", t.damping)?;
        let bad_source = t
            .heat_sources
            .iter()
            .find(|s| !s.strength.is_finite() || !s.pos.is_finite());
        if let Some(src) = bad_source {
            return Err(ConfigError::InvalidConstant {
                name: "heat source",
                value: src.strength,
            });
        }

        unit_range("restitution", self.restitution)?;

        if let Some(bounds) = self.bounds {
            let size = bounds.size();
            if !(bounds.min.is_finite() && bounds.max.is_finite() && size.x > 0.0 && size.y > 0.0) {
                return Err(ConfigError::DegenerateBounds {
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }

        if self.trail_capacity == 0 {
            return Err(ConfigError::ZeroTrailCapacity);
        }
        if self.metrics_interval == 0 {
            return Err(ConfigError::ZeroMetricsInterval);
        }

        non_negative("gas constant", self.thermo.gas_constant)?;
        if !(self.thermo.boltzmann.is_finite() && self.thermo.boltzmann > 0.0) {
            return Err(ConfigError::InvalidConstant {
                name: "boltzmann constant",
                value: self.thermo.boltzmann,
            });
        }

        Ok(())
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidConstant { name, value })
    }
}

fn unit_range(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}
