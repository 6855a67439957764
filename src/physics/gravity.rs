//! Pairwise Newtonian gravity.

use bevy::math::DVec2;

use super::forces::{Contact, ForceOutput};
use super::SimulationFault;
use crate::config::ForceConstants;
use crate::types::Body;

/// Gravitational force exerted on a body at `pos_a` by one at `pos_b`.
///
/// Returns `None` when the separation is below `epsilon`: near-coincident
/// pairs are excluded from the sum rather than clamped.
#[inline]
pub fn pair_force(
    pos_a: DVec2,
    mass_a: f64,
    pos_b: DVec2,
    mass_b: f64,
    g: f64,
    epsilon: f64,
) -> Option<DVec2> {
    let delta = pos_b - pos_a;
    let r_squared = delta.length_squared();
    if r_squared < epsilon * epsilon {
        return None;
    }
    let r = r_squared.sqrt();
    // F = G m_a m_b / r², along delta/r
    Some(delta * (g * mass_a * mass_b / (r_squared * r)))
}

/// Accumulate gravity over every unordered pair.
///
/// Pairs closer than the sum of their radii are recorded as contacts and
/// skipped. Two fixed bodies never interact.
pub(crate) fn accumulate(bodies: &[&Body], constants: &ForceConstants, out: &mut ForceOutput) {
    let g = constants.gravitational;

    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            if a.fixed && b.fixed {
                continue;
            }

            let separation = a.pos.distance(b.pos);
            if separation < a.radius + b.radius {
                out.contacts.push(Contact {
                    a: a.id,
                    b: b.id,
                    separation,
                });
                continue;
            }

            let epsilon = constants.singularity_epsilon;
            let Some(force) = pair_force(a.pos, a.mass, b.pos, b.mass, g, epsilon) else {
                continue;
            };

            if !force.is_finite() {
                out.faults.push(SimulationFault::NonFiniteForce {
                    body: a.id,
                    partner: Some(b.id),
                });
                continue;
            }

            out.add(a.id, force);
            out.add(b.id, -force);
        }
    }
}
