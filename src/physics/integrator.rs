//! Semi-implicit (symplectic) Euler integration.
//!
//! Velocity is advanced first and the new velocity moves the position:
//!
//! ```text
//! v' = v + (F / m) dt
//! x' = x + v' dt
//! ```
//!
//! There is no sub-stepping. The step length is `base_dt * time_scale`, so a
//! large time scale trades accuracy for speed; local error grows with the
//! multiplier. Callers needing stability at high multipliers should lower
//! the base timestep instead.

use std::collections::HashMap;

use bevy::math::DVec2;

use super::SimulationFault;
use crate::store::BodyStore;
use crate::types::{Body, BodyId};

/// Advance one body. Returns the new `(pos, vel)` without mutating it.
#[inline]
pub fn advance(body: &Body, force: DVec2, dt: f64) -> (DVec2, DVec2) {
    let vel = body.vel + force / body.mass * dt;
    let pos = body.pos + vel * dt;
    (pos, vel)
}

/// Advance every free body by `dt` under the given forces.
///
/// Fixed bodies are skipped and held at zero velocity. A body whose new
/// state is not finite is frozen in place (velocity zeroed, position kept)
/// and reported as a fault; the rest of the store still advances.
pub fn step(
    store: &mut BodyStore,
    forces: &HashMap<BodyId, DVec2>,
    dt: f64,
) -> Vec<SimulationFault> {
    let mut faults = Vec::new();

    for body in store.iter_mut() {
        if body.fixed {
            body.vel = DVec2::ZERO;
            continue;
        }

        let force = forces.get(&body.id).copied().unwrap_or(DVec2::ZERO);
        let (pos, vel) = advance(body, force, dt);

        if !(pos.is_finite() && vel.is_finite()) {
            body.vel = DVec2::ZERO;
            faults.push(SimulationFault::NonFiniteState { id: body.id });
            continue;
        }

        body.pos = pos;
        body.vel = vel;
    }

    faults
}
