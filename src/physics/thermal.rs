//! Thermal agitation model for the gas variant.
//!
//! Heat sources perturb nearby particles: heaters add random speed kicks,
//! coolers bleed off velocity, and a global damping factor applies every
//! step. The velocity change is expressed as an equivalent force over the
//! step so the integrator handles every variant the same way.

use bevy::math::DVec2;

use super::forces::ForceOutput;
use super::SimulationFault;
use crate::config::ThermalConfig;
use crate::rng::SimRng;
use crate::types::Body;

/// Net heat influence at `pos`: Σ strength · exp(−d / falloff).
///
/// Positive values heat, negative values cool.
pub fn heat_influence(pos: DVec2, thermal: &ThermalConfig) -> f64 {
    thermal
        .heat_sources
        .iter()
        .map(|src| src.strength * (-pos.distance(src.pos) / thermal.falloff).exp())
        .sum()
}

/// Velocity change a particle receives this step.
///
/// Random draws happen only for heated particles, so a box without
/// heaters consumes nothing from the random stream.
pub fn velocity_change(
    vel: DVec2,
    influence: f64,
    thermal: &ThermalConfig,
    rng: &mut SimRng,
) -> DVec2 {
    let mut retain = thermal.damping;
    let mut kick = DVec2::ZERO;

    if influence > 0.0 {
        kick = rng.unit_vector() * (thermal.agitation * influence);
    } else if influence < 0.0 {
        retain *= 1.0 - (-influence * thermal.cooling).min(1.0);
    }

    vel * (retain - 1.0) + kick
}

pub(crate) fn accumulate(
    bodies: &[&Body],
    thermal: &ThermalConfig,
    dt: f64,
    rng: &mut SimRng,
    out: &mut ForceOutput,
) {
    // A zero-length step cannot carry an impulse
    if dt <= 0.0 {
        return;
    }

    for body in bodies {
        if body.fixed {
            continue;
        }

        let influence = heat_influence(body.pos, thermal);
        let dv = velocity_change(body.vel, influence, thermal, rng);
        if dv == DVec2::ZERO {
            continue;
        }

        let force = dv * (body.mass / dt);
        if !force.is_finite() {
            out.faults.push(SimulationFault::NonFiniteForce {
                body: body.id,
                partner: None,
            });
            continue;
        }
        out.add(body.id, force);
    }
}
