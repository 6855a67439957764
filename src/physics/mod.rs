//! Force laws and time integration.
//!
//! The force stage ([`compute_forces`]) always completes for the whole store
//! before [`integrator::step`] moves anything, so every body sees forces
//! computed from the same snapshot.

pub mod field;
pub mod forces;
pub mod gravity;
pub mod integrator;
pub mod thermal;

#[cfg(test)]
mod proptest_physics;

pub use field::{field_at, lorentz_force, FieldSample};
pub use forces::{compute_forces, Contact, ForceOutput};
pub use thermal::heat_influence;

use crate::types::BodyId;

/// A per-body numerical fault isolated during a step.
///
/// Faults never abort the step: the offending contribution is dropped or
/// the offending body is frozen for the tick, and the fault is reported.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum SimulationFault {
    #[error("non-finite force on body {body} (partner: {partner:?})")]
    NonFiniteForce {
        body: BodyId,
        partner: Option<BodyId>,
    },

    #[error("body {id} reached a non-finite state and was frozen")]
    NonFiniteState { id: BodyId },
}

impl SimulationFault {
    /// Body the fault was raised for.
    pub fn body(&self) -> BodyId {
        match *self {
            SimulationFault::NonFiniteForce { body, .. } => body,
            SimulationFault::NonFiniteState { id } => id,
        }
    }
}
