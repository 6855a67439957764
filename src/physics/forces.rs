//! Force stage of the step pipeline.
//!
//! Dispatches to the force law selected by [`ForceModel`] and gathers the
//! per-body net force, the contacts found along the way, and any faults.

use std::collections::HashMap;

use bevy::math::DVec2;

use super::{field, gravity, thermal, SimulationFault};
use crate::config::{ForceModel, SimulationConfig};
use crate::rng::SimRng;
use crate::store::BodyStore;
use crate::types::{Body, BodyId};

/// A pair of bodies found overlapping by the force stage.
///
/// Overlapping pairs contribute no force; the collision resolver decides
/// what happens to them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
    /// Centre-to-centre distance when detected.
    pub separation: f64,
}

/// Result of one force evaluation.
#[derive(Clone, Debug, Default)]
pub struct ForceOutput {
    /// Net force per body. Every body present in the store has an entry.
    pub forces: HashMap<BodyId, DVec2>,
    pub contacts: Vec<Contact>,
    pub faults: Vec<SimulationFault>,
}

impl ForceOutput {
    fn for_bodies(bodies: &[&Body]) -> Self {
        Self {
            forces: bodies.iter().map(|b| (b.id, DVec2::ZERO)).collect(),
            contacts: Vec::new(),
            faults: Vec::new(),
        }
    }

    /// Net force on a body, zero when unknown.
    pub fn force_on(&self, id: BodyId) -> DVec2 {
        self.forces.get(&id).copied().unwrap_or(DVec2::ZERO)
    }

    pub(crate) fn add(&mut self, id: BodyId, force: DVec2) {
        *self.forces.entry(id).or_insert(DVec2::ZERO) += force;
    }
}

/// Evaluate the configured force law for every body in the store.
pub fn compute_forces(
    store: &BodyStore,
    config: &SimulationConfig,
    rng: &mut SimRng,
) -> ForceOutput {
    let bodies: Vec<&Body> = store.iter().collect();
    let mut out = ForceOutput::for_bodies(&bodies);

    match config.force_model {
        ForceModel::Gravity => gravity::accumulate(&bodies, &config.constants, &mut out),
        ForceModel::Electromagnetic => field::accumulate(&bodies, &config.constants, &mut out),
        ForceModel::Thermal => {
            thermal::accumulate(&bodies, &config.thermal, config.dt(), rng, &mut out)
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bounds;

    #[test]
    fn test_every_body_gets_an_entry() {
        let mut store = BodyStore::new();
        let a = store.add(Body::new(DVec2::ZERO, DVec2::ZERO, 1.0, 1.0)).unwrap();
        let b = store.add(Body::new(DVec2::new(50.0, 0.0), DVec2::ZERO, 1.0, 1.0)).unwrap();

        let config = SimulationConfig::electromagnetic();
        let out = compute_forces(&store, &config, &mut SimRng::new(0));
        assert_eq!(out.forces.len(), 2);
        assert_eq!(out.force_on(a), DVec2::ZERO);
        assert_eq!(out.force_on(b), DVec2::ZERO);
    }

    #[test]
    fn test_dispatch_uses_selected_model() {
        let mut store = BodyStore::new();
        let a = store.add(Body::new(DVec2::ZERO, DVec2::ZERO, 1.0, 1.0)).unwrap();
        store.add(Body::new(DVec2::new(10.0, 0.0), DVec2::ZERO, 1.0, 1.0)).unwrap();

        let gravity = compute_forces(&store, &SimulationConfig::gravity(), &mut SimRng::new(0));
        assert!(gravity.force_on(a).x > 0.0);

        // Thermal model with no heat sources and no damping leaves bodies alone
        let gas = SimulationConfig::gas(Bounds::from_size(100.0, 100.0));
        let thermal = compute_forces(&store, &gas, &mut SimRng::new(0));
        assert_eq!(thermal.force_on(a), DVec2::ZERO);
    }
}
