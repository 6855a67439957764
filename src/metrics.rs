//! Derived physical quantities computed from the current store.
//!
//! Everything here is read-only with respect to the store. Orbital elements
//! are O(n²) in the worst case and the controller throttles how often a full
//! snapshot is taken.

use std::f64::consts::TAU;

use bevy::math::DVec2;

use crate::config::{ForceModel, SimulationConfig};
use crate::store::BodyStore;
use crate::types::{Body, BodyId};

/// Number of bins in the gas speed histogram.
pub const SPEED_HISTOGRAM_BINS: usize = 12;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EnergyReport {
    pub kinetic: f64,
    pub potential: f64,
}

impl EnergyReport {
    pub fn total(&self) -> f64 {
        self.kinetic + self.potential
    }
}

/// Keplerian elements of a bound two-body orbit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitalElements {
    /// ε = v²/2 − μ/r
    pub specific_energy: f64,
    /// |r × v|
    pub angular_momentum: f64,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub period: f64,
    pub apoapsis: f64,
    pub periapsis: f64,
}

/// Orbit of one body about its primary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OrbitStatus {
    Bound(OrbitalElements),
    /// ε ≥ 0 or degenerate geometry: reported as "no stable orbit".
    Unbound { specific_energy: f64 },
}

impl OrbitStatus {
    pub fn elements(&self) -> Option<&OrbitalElements> {
        match self {
            OrbitStatus::Bound(elements) => Some(elements),
            OrbitStatus::Unbound { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitReport {
    pub body: BodyId,
    pub primary: BodyId,
    pub status: OrbitStatus,
}

/// Ideal-gas estimate for the particles in a closed box.
///
/// Temperature is a proxy derived from mean kinetic energy, and the entropy
/// is a Sackur–Tetrode-style proxy `nR ln V + 3/2 nR ln T`, not a rigorous
/// statistical-mechanics entropy. Particle count stands in for moles.
#[derive(Clone, Debug, PartialEq)]
pub struct ThermoState {
    pub particles: usize,
    pub mean_kinetic_energy: f64,
    pub temperature: f64,
    /// Domain area.
    pub volume: f64,
    pub pressure: f64,
    /// `None` when the temperature is zero.
    pub entropy: Option<f64>,
    /// Particle counts per speed bin, from zero to `max_speed`.
    pub speed_histogram: Vec<usize>,
    pub max_speed: f64,
}

/// Point-in-time bundle of derived quantities for display panels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub tick: u64,
    /// Simulated seconds since the last reset.
    pub time: f64,
    pub body_count: usize,
    pub energy: EnergyReport,
    pub momentum: DVec2,
    pub center_of_mass: Option<DVec2>,
    /// Gravity variant only.
    pub orbits: Vec<OrbitReport>,
    /// Gas variant only.
    pub thermo: Option<ThermoState>,
}

impl MetricsSnapshot {
    /// Orbit report for one body, if computed.
    pub fn orbit_of(&self, id: BodyId) -> Option<&OrbitReport> {
        self.orbits.iter().find(|o| o.body == id)
    }
}

/// Compute a full snapshot.
pub fn compute_metrics(
    store: &BodyStore,
    config: &SimulationConfig,
    tick: u64,
    time: f64,
) -> MetricsSnapshot {
    let potential = match config.force_model {
        ForceModel::Gravity => gravitational_potential(store, config),
        ForceModel::Electromagnetic => electrostatic_potential(store, config),
        ForceModel::Thermal => 0.0,
    };

    let orbits = match config.force_model {
        ForceModel::Gravity => orbit_reports(store, config),
        _ => Vec::new(),
    };

    let thermo = match config.force_model {
        ForceModel::Thermal => thermodynamics(store, config),
        _ => None,
    };

    MetricsSnapshot {
        tick,
        time,
        body_count: store.len(),
        energy: EnergyReport {
            kinetic: kinetic_energy(store),
            potential,
        },
        momentum: total_momentum(store),
        center_of_mass: center_of_mass(store),
        orbits,
        thermo,
    }
}

/// Σ ½ m v²
pub fn kinetic_energy(store: &BodyStore) -> f64 {
    store.iter().map(Body::kinetic_energy).sum()
}

/// Σ m v
pub fn total_momentum(store: &BodyStore) -> DVec2 {
    store.iter().map(Body::momentum).sum()
}

pub fn center_of_mass(store: &BodyStore) -> Option<DVec2> {
    let mass: f64 = store.iter().map(|b| b.mass).sum();
    if mass <= 0.0 {
        return None;
    }
    Some(store.iter().map(|b| b.pos * b.mass).sum::<DVec2>() / mass)
}

/// −Σ_{i<j} G m_i m_j / r_ij, skipping near-coincident pairs.
pub fn gravitational_potential(store: &BodyStore, config: &SimulationConfig) -> f64 {
    let g = config.constants.gravitational;
    pairwise_sum(store, config.constants.singularity_epsilon, |a, b, r| {
        -g * a.mass * b.mass / r
    })
}

/// Σ_{i<j} k q_i q_j / r_ij over pairs the field kernel would see.
pub fn electrostatic_potential(store: &BodyStore, config: &SimulationConfig) -> f64 {
    let k = config.constants.coulomb;
    let cutoff = config
        .constants
        .min_field_distance
        .max(config.constants.singularity_epsilon);
    pairwise_sum(store, cutoff, |a, b, r| k * a.charge() * b.charge() / r)
}

fn pairwise_sum(store: &BodyStore, cutoff: f64, term: impl Fn(&Body, &Body, f64) -> f64) -> f64 {
    let bodies: Vec<&Body> = store.iter().collect();
    let mut sum = 0.0;
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            let r = a.pos.distance(b.pos);
            if r >= cutoff {
                sum += term(a, b, r);
            }
        }
    }
    sum
}

/// Reference body for `body`'s orbit.
///
/// The most massive fixed body if any exists, otherwise the most massive
/// other body. Earlier insertion wins ties.
pub fn select_primary<'a>(store: &'a BodyStore, body: &Body) -> Option<&'a Body> {
    let heaviest = |fixed_only: bool| {
        store
            .iter()
            .filter(|b| b.id != body.id && (!fixed_only || b.fixed))
            .fold(None, |best: Option<&Body>, b| match best {
                Some(best) if best.mass >= b.mass => Some(best),
                _ => Some(b),
            })
    };
    heaviest(true).or_else(|| heaviest(false))
}

/// Orbital elements from position and velocity relative to the primary.
///
/// `mu` is G·m_primary.
pub fn orbital_status(rel_pos: DVec2, rel_vel: DVec2, mu: f64, epsilon: f64) -> OrbitStatus {
    let r = rel_pos.length();
    let v2 = rel_vel.length_squared();

    if r < epsilon || mu <= 0.0 {
        return OrbitStatus::Unbound {
            specific_energy: f64::NAN,
        };
    }

    let specific_energy = 0.5 * v2 - mu / r;
    if specific_energy >= 0.0 {
        return OrbitStatus::Unbound { specific_energy };
    }

    let h = rel_pos.perp_dot(rel_vel).abs();
    let a = -mu / (2.0 * specific_energy);
    // Rounding can push 1 + 2εh²/μ² slightly below zero for circular orbits
    let e = (1.0 + 2.0 * specific_energy * h * h / (mu * mu)).max(0.0).sqrt();
    let period = TAU * (a.powi(3) / mu).sqrt();

    OrbitStatus::Bound(OrbitalElements {
        specific_energy,
        angular_momentum: h,
        semi_major_axis: a,
        eccentricity: e,
        period,
        apoapsis: a * (1.0 + e),
        periapsis: a * (1.0 - e),
    })
}

/// Orbit reports for every free body that has a primary.
pub fn orbit_reports(store: &BodyStore, config: &SimulationConfig) -> Vec<OrbitReport> {
    let g = config.constants.gravitational;
    store
        .iter()
        .filter(|b| !b.fixed)
        .filter_map(|body| {
            let primary = select_primary(store, body)?;
            let status = orbital_status(
                body.pos - primary.pos,
                body.vel - primary.vel,
                g * primary.mass,
                config.constants.singularity_epsilon,
            );
            Some(OrbitReport {
                body: body.id,
                primary: primary.id,
                status,
            })
        })
        .collect()
}

/// Ideal-gas estimate over the free bodies; needs a bounded domain.
pub fn thermodynamics(store: &BodyStore, config: &SimulationConfig) -> Option<ThermoState> {
    let bounds = config.bounds?;
    let particles: Vec<&Body> = store.iter().filter(|b| !b.fixed).collect();
    if particles.is_empty() {
        return None;
    }

    let n = particles.len() as f64;
    let r_gas = config.thermo.gas_constant;
    let volume = bounds.area();

    let mean_kinetic_energy = particles.iter().map(|b| b.kinetic_energy()).sum::<f64>() / n;
    let temperature = mean_kinetic_energy / config.thermo.boltzmann;
    // P V = n R T
    let pressure = n * r_gas * temperature / volume;
    let entropy = (temperature > 0.0)
        .then(|| n * r_gas * volume.ln() + 1.5 * n * r_gas * temperature.ln());

    let speeds: Vec<f64> = particles.iter().map(|b| b.vel.length()).collect();
    let max_speed = speeds.iter().copied().fold(0.0, f64::max);
    let mut speed_histogram = vec![0; SPEED_HISTOGRAM_BINS];
    for speed in speeds {
        let bin = if max_speed > 0.0 {
            ((speed / max_speed) * SPEED_HISTOGRAM_BINS as f64) as usize
        } else {
            0
        };
        speed_histogram[bin.min(SPEED_HISTOGRAM_BINS - 1)] += 1;
    }

    Some(ThermoState {
        particles: particles.len(),
        mean_kinetic_energy,
        temperature,
        volume,
        pressure,
        entropy,
        speed_histogram,
        max_speed,
    })
}
