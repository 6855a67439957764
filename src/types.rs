//! Core body types and constants shared by every simulation variant.

use bevy::math::DVec2;

use crate::trail::Trail;

/// Default gravitational constant in simulation units.
///
/// Educational variants work in screen-scale units, so G = 1 keeps
/// accelerations in a visually useful range.
pub const DEFAULT_G: f64 = 1.0;

/// Default Coulomb constant in simulation units.
pub const DEFAULT_COULOMB: f64 = 1000.0;

/// Default vacuum permeability in simulation units.
///
/// Field kernels use μ0/4π, so this value is divided by 4π before use.
pub const DEFAULT_PERMEABILITY: f64 = 4.0 * std::f64::consts::PI * 10.0;

/// Separations below this are excluded from pairwise sums.
pub const DEFAULT_SINGULARITY_EPSILON: f64 = 1e-6;

/// Trail capacity used by orbital variants.
pub const ORBITAL_TRAIL_CAPACITY: usize = 200;

/// Trail capacity used by field and gas variants.
pub const FIELD_TRAIL_CAPACITY: usize = 30;

/// Stable identifier of a body within one simulation run.
///
/// Identifiers are arena slots: they are never reused until the store is cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl BodyId {
    /// Arena slot backing this id.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Descriptive tag for a body.
///
/// Maps loosely to star/planet/moon/asteroid, heater/cooler or charge sign.
/// Only placement heuristics look at it; force laws never do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Category {
    Primary,
    #[default]
    Secondary,
    Tertiary,
    Tracer,
}

impl Category {
    /// Mass used when a placement request does not specify one.
    pub fn default_mass(self) -> f64 {
        match self {
            Category::Primary => 1000.0,
            Category::Secondary => 10.0,
            Category::Tertiary => 1.0,
            Category::Tracer => 0.1,
        }
    }

    /// Radius used when a placement request does not specify one.
    pub fn default_radius(self) -> f64 {
        match self {
            Category::Primary => 20.0,
            Category::Secondary => 8.0,
            Category::Tertiary => 4.0,
            Category::Tracer => 2.0,
        }
    }
}

/// Reasons a body is refused by the store.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvalidBodyError {
    #[error("mass must be positive, got {0}")]
    NonPositiveMass(f64),

    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    #[error("{field} is not finite")]
    NonFinite { field: &'static str },

    #[error("fixed bodies cannot carry a velocity")]
    MovingFixedBody,
}

/// A simulated point/disc entity.
#[derive(Clone, Debug)]
pub struct Body {
    /// Assigned by the store on insertion.
    pub id: BodyId,
    /// Position in simulation units.
    pub pos: DVec2,
    /// Velocity in simulation units per second.
    pub vel: DVec2,
    pub mass: f64,
    /// Collision radius; also a rendering hint.
    pub radius: f64,
    /// Electric charge. `None` behaves as zero.
    pub charge: Option<f64>,
    /// Out-of-plane magnetic dipole moment. `None` means not a magnet.
    pub dipole: Option<f64>,
    /// Fixed bodies exert forces but never move.
    pub fixed: bool,
    pub category: Category,
    /// Recent positions, oldest first.
    pub trail: Trail,
}

impl Body {
    /// Create a free body. The id is assigned when the body is added to a store.
    pub fn new(pos: DVec2, vel: DVec2, mass: f64, radius: f64) -> Self {
        Self {
            id: BodyId::default(),
            pos,
            vel,
            mass,
            radius,
            charge: None,
            dipole: None,
            fixed: false,
            category: Category::default(),
            trail: Trail::default(),
        }
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = Some(charge);
        self
    }

    pub fn with_dipole(mut self, moment: f64) -> Self {
        self.dipole = Some(moment);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Pin the body in place. Any velocity is discarded.
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self.vel = DVec2::ZERO;
        self
    }

    /// Charge with `None` read as zero.
    #[inline]
    pub fn charge(&self) -> f64 {
        self.charge.unwrap_or(0.0)
    }

    #[inline]
    pub fn momentum(&self) -> DVec2 {
        self.vel * self.mass
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.length_squared()
    }

    /// Whether the two discs intersect.
    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        let reach = self.radius + other.radius;
        self.pos.distance_squared(other.pos) < reach * reach
    }

    /// Check the body invariants required by the store.
    pub fn validate(&self) -> Result<(), InvalidBodyError> {
        if !self.mass.is_finite() {
            return Err(InvalidBodyError::NonFinite { field: "mass" });
        }
        if self.mass <= 0.0 {
            return Err(InvalidBodyError::NonPositiveMass(self.mass));
        }
        if !self.radius.is_finite() {
            return Err(InvalidBodyError::NonFinite { field: "radius" });
        }
        if self.radius <= 0.0 {
            return Err(InvalidBodyError::NonPositiveRadius(self.radius));
        }
        if !self.pos.is_finite() {
            return Err(InvalidBodyError::NonFinite { field: "position" });
        }
        if !self.vel.is_finite() {
            return Err(InvalidBodyError::NonFinite { field: "velocity" });
        }
        if !self.charge().is_finite() {
            return Err(InvalidBodyError::NonFinite { field: "charge" });
        }
        if self.dipole.is_some_and(|m| !m.is_finite()) {
            return Err(InvalidBodyError::NonFinite { field: "dipole" });
        }
        if self.fixed && self.vel != DVec2::ZERO {
            return Err(InvalidBodyError::MovingFixedBody);
        }
        Ok(())
    }
}

/// A placement request coming from a tool or preset loader.
///
/// Unset fields fall back to per-category defaults; see
/// [`crate::simulation::Simulation::place`].
#[derive(Clone, Debug, Default)]
pub struct BodySpec {
    pub category: Category,
    pub pos: DVec2,
    pub vel: Option<DVec2>,
    pub mass: Option<f64>,
    pub radius: Option<f64>,
    pub charge: Option<f64>,
    pub dipole: Option<f64>,
    pub fixed: bool,
}

impl BodySpec {
    pub fn new(category: Category, pos: DVec2) -> Self {
        Self {
            category,
            pos,
            ..Default::default()
        }
    }

    pub fn velocity(mut self, vel: DVec2) -> Self {
        self.vel = Some(vel);
        self
    }

    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn charge(mut self, charge: f64) -> Self {
        self.charge = Some(charge);
        self
    }

    pub fn dipole(mut self, moment: f64) -> Self {
        self.dipole = Some(moment);
        self
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Build the body, using `vel` when the request left velocity unset.
    pub fn into_body(self, fallback_vel: DVec2) -> Body {
        let mut body = Body::new(
            self.pos,
            self.vel.unwrap_or(fallback_vel),
            self.mass.unwrap_or_else(|| self.category.default_mass()),
            self.radius.unwrap_or_else(|| self.category.default_radius()),
        )
        .with_category(self.category);
        body.charge = self.charge;
        body.dipole = self.dipole;
        if self.fixed {
            body = body.fixed();
        }
        body
    }
}
