//! Property-based tests for the step pipeline using proptest.
//!
//! These tests verify conservation laws and bounds across a wide range of
//! body configurations.

use bevy::math::DVec2;
use proptest::prelude::*;

use super::gravity::pair_force;
use crate::collision::{merge_pair, reflect_at_bounds};
use crate::config::{Bounds, CollisionPolicy, ForceModel, SimulationConfig};
use crate::simulation::Simulation;
use crate::test_utils::{assertions, fixtures};
use crate::types::Body;

fn free_flight_elastic() -> SimulationConfig {
    // Thermal model without heat sources or damping exerts no force
    SimulationConfig {
        force_model: ForceModel::Thermal,
        collision_policy: CollisionPolicy::Elastic,
        bounds: None,
        ..SimulationConfig::gravity()
    }
}

fn body_strategy() -> impl Strategy<Value = Body> {
    (
        -50.0f64..50.0,
        -50.0f64..50.0,
        -20.0f64..20.0,
        -20.0f64..20.0,
        0.1f64..100.0,
        1.0f64..8.0,
    )
        .prop_map(|(x, y, vx, vy, mass, radius)| {
            Body::new(DVec2::new(x, y), DVec2::new(vx, vy), mass, radius)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Free flight plus elastic collisions conserves momentum and kinetic energy.
    #[test]
    fn prop_elastic_collisions_conserve_momentum_and_energy(
        bodies in prop::collection::vec(body_strategy(), 2..12),
        steps in 1usize..60,
    ) {
        let mut sim = Simulation::new(free_flight_elastic()).unwrap();
        for body in bodies {
            sim.add_body(body).unwrap();
        }
        let initial = assertions::momentum(sim.store());
        let initial_ke = assertions::kinetic_energy(sim.store());
        let scale: f64 = sim.bodies().map(|b| b.momentum().length()).sum::<f64>().max(1.0);

        sim.start();
        for _ in 0..steps {
            sim.step();
        }

        let final_ = assertions::momentum(sim.store());
        assertions::assert_momentum_conserved(initial, final_, 1e-9 * scale);
        let final_ke = assertions::kinetic_energy(sim.store());
        assertions::assert_energy_within(initial_ke, final_ke, 1e-9);
    }

    /// A merge produces exactly the summed mass.
    #[test]
    fn prop_merge_mass_is_exact_sum(a in body_strategy(), b in body_strategy()) {
        let mut b = b;
        b.id = crate::types::BodyId(1);
        let (merged, absorbed) = merge_pair(&a, &b);
        prop_assert_eq!(merged.mass, a.mass + b.mass);
        prop_assert_ne!(merged.id, absorbed);
    }

    /// A wall bounce with restitution below one strictly loses energy.
    #[test]
    fn prop_wall_bounce_loses_energy(
        y in 10.0f64..90.0,
        overshoot in 0.0f64..5.0,
        vx in 0.1f64..50.0,
        vy in -50.0f64..50.0,
        restitution in 0.0f64..0.999,
    ) {
        let bounds = Bounds::from_size(100.0, 100.0);
        let radius = 2.0;
        let x = 100.0 - radius + overshoot + 1e-9;
        let body = Body::new(DVec2::new(x, y), DVec2::new(vx, vy), 1.0, radius);
        let mut store = fixtures::store_of([body]);

        let before = assertions::kinetic_energy(&store);
        let hits = reflect_at_bounds(&mut store, &bounds, restitution);
        let after = assertions::kinetic_energy(&store);

        prop_assert!(hits >= 1);
        prop_assert!(after < before, "KE rose from {} to {}", before, after);
    }

    /// Trails never exceed the configured capacity.
    #[test]
    fn prop_trail_bounded(capacity in 1usize..50, steps in 0usize..200) {
        let mut sim = Simulation::new(SimulationConfig {
            trail_capacity: capacity,
            ..SimulationConfig::gravity()
        })
        .unwrap();
        sim.add_body(fixtures::fixed_star(1000.0)).unwrap();
        sim.add_body(fixtures::circular_orbit(1000.0, 100.0)).unwrap();
        sim.start();

        for _ in 0..steps {
            sim.step();
            prop_assert!(sim.bodies().all(|b| b.trail.len() <= capacity));
        }
    }

    /// Gravity is equal and opposite.
    #[test]
    fn prop_gravity_is_antisymmetric(
        a in body_strategy(),
        b in body_strategy(),
    ) {
        let ab = pair_force(a.pos, a.mass, b.pos, b.mass, 1.0, 1e-6);
        let ba = pair_force(b.pos, b.mass, a.pos, a.mass, 1.0, 1e-6);
        match (ab, ba) {
            (Some(ab), Some(ba)) => {
                let tol = 1e-9 * ab.length().max(1.0);
                prop_assert!((ab + ba).length() <= tol);
            }
            (None, None) => {}
            _ => prop_assert!(false, "exclusion must be symmetric"),
        }
    }
}
