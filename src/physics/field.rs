//! Electrostatic and magnetic fields with Lorentz coupling.
//!
//! The plane is z = 0, so the magnetic field only has a z component and is
//! carried as a scalar. Sources are point charges (Coulomb), fixed or moving
//! magnets (out-of-plane dipoles) and moving charges (Biot–Savart point
//! charge). The kernels are approximations and are not solved
//! self-consistently.

use std::f64::consts::PI;

use bevy::math::DVec2;

use super::forces::ForceOutput;
use super::SimulationFault;
use crate::config::ForceConstants;
use crate::types::{Body, BodyId};

/// Field values at a point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldSample {
    /// In-plane electric field.
    pub electric: DVec2,
    /// Out-of-plane magnetic field.
    pub magnetic: f64,
}

/// F = q (E + v × B) with B along z.
#[inline]
pub fn lorentz_force(charge: f64, vel: DVec2, field: FieldSample) -> DVec2 {
    let v_cross_b = DVec2::new(vel.y * field.magnetic, -vel.x * field.magnetic);
    charge * (field.electric + v_cross_b)
}

/// Sum the fields of every source at `point`, skipping `exclude`.
///
/// Sources closer than `min_field_distance` are left out so a body never
/// feels a singular contribution from itself or a coincident source.
pub fn field_at(
    point: DVec2,
    exclude: Option<BodyId>,
    bodies: &[&Body],
    constants: &ForceConstants,
) -> FieldSample {
    let mu = constants.permeability / (4.0 * PI);
    let cutoff = constants.min_field_distance.max(constants.singularity_epsilon);
    let mut sample = FieldSample::default();

    for source in bodies {
        if Some(source.id) == exclude {
            continue;
        }
        let r = point - source.pos;
        let d = r.length();
        if d < cutoff {
            continue;
        }
        let d3 = d * d * d;

        let q = source.charge();
        if q != 0.0 {
            sample.electric += r * (constants.coulomb * q / d3);
            // Moving point charge: B = μ0/4π q (v × r) / d³
            sample.magnetic += mu * q * source.vel.perp_dot(r) / d3;
        }
        if let Some(moment) = source.dipole {
            // In-plane field of an out-of-plane dipole points against the moment
            sample.magnetic -= mu * moment / d3;
        }
    }

    sample
}

pub(crate) fn accumulate(bodies: &[&Body], constants: &ForceConstants, out: &mut ForceOutput) {
    for body in bodies {
        let q = body.charge();
        if body.fixed || q == 0.0 {
            continue;
        }

        let sample = field_at(body.pos, Some(body.id), bodies, constants);
        let force = lorentz_force(q, body.vel, sample);

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
