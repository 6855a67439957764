//! Test utilities for the physics pipeline.
//!
//! Provides fixtures for common body arrangements and assertions for
//! conservation laws. All quantities are in simulation units (G = 1).

use bevy::math::DVec2;

use crate::store::BodyStore;
use crate::types::Body;

/// Fixtures for creating test bodies and stores.
pub mod fixtures {
    use super::*;
    use crate::config::Bounds;
    use crate::rng::SimRng;

    /// A fixed primary at the origin.
    pub fn fixed_star(mass: f64) -> Body {
        Body::new(DVec2::ZERO, DVec2::ZERO, mass, 10.0).fixed()
    }

    /// Unit-mass body on a circular orbit of radius `r` about a primary at
    /// the origin with gravitational parameter `mu`.
    ///
    /// Placed on the positive x-axis moving in +y.
    pub fn circular_orbit(mu: f64, r: f64) -> Body {
        // v = sqrt(μ/r)
        let v = (mu / r).sqrt();
        Body::new(DVec2::new(r, 0.0), DVec2::new(0.0, v), 1.0, 1.0)
    }

    /// Unit-mass body at periapsis of an ellipse with the given periapsis
    /// distance and eccentricity.
    pub fn elliptical_orbit(mu: f64, periapsis: f64, eccentricity: f64) -> Body {
        assert!(
            (0.0..1.0).contains(&eccentricity),
            "Eccentricity must be in [0, 1) for elliptical orbit"
        );
        let a = periapsis / (1.0 - eccentricity);
        // Vis-viva: v = sqrt(μ (2/r − 1/a))
        let v = (mu * (2.0 / periapsis - 1.0 / a)).sqrt();
        Body::new(DVec2::new(periapsis, 0.0), DVec2::new(0.0, v), 1.0, 1.0)
    }

    /// `n` unit-mass particles scattered inside `bounds` with speeds in
    /// `[0, max_speed)`.
    pub fn gas_particles(
        n: usize,
        bounds: Bounds,
        radius: f64,
        max_speed: f64,
        seed: u64,
    ) -> Vec<Body> {
        let mut rng = SimRng::new(seed);
        let inset = DVec2::splat(radius);
        (0..n)
            .map(|_| {
                let pos = rng.point_in(bounds.min + inset, bounds.max - inset);
                let vel = rng.unit_vector() * rng.range(0.0, max_speed);
                Body::new(pos, vel, 1.0, radius)
            })
            .collect()
    }

    /// Store holding the given bodies in order.
    pub fn store_of(bodies: impl IntoIterator<Item = Body>) -> BodyStore {
        let mut store = BodyStore::new();
        for body in bodies {
            store.add(body).expect("fixture body must be valid");
        }
        store
    }
}

/// Assertions for verifying physical invariants.
pub mod assertions {
    use super::*;

    /// Σ m v over the store.
    pub fn momentum(store: &BodyStore) -> DVec2 {
        store.iter().map(Body::momentum).sum()
    }

    /// Σ ½ m v² over the store.
    pub fn kinetic_energy(store: &BodyStore) -> f64 {
        store.iter().map(Body::kinetic_energy).sum()
    }

    /// Total mass in the store.
    pub fn total_mass(store: &BodyStore) -> f64 {
        store.iter().map(|b| b.mass).sum()
    }

    /// Specific orbital energy about a primary with parameter `mu` at the origin.
    ///
    /// E = v²/2 − μ/r
    pub fn orbital_energy(pos: DVec2, vel: DVec2, mu: f64) -> f64 {
        0.5 * vel.length_squared() - mu / pos.length()
    }

    /// Specific angular momentum (2D scalar), L = r × v.
    pub fn angular_momentum(pos: DVec2, vel: DVec2) -> f64 {
        pos.x * vel.y - pos.y * vel.x
    }

    /// Kepler's third law: T = 2π sqrt(a³/μ)
    pub fn orbital_period(semi_major_axis: f64, mu: f64) -> f64 {
        use std::f64::consts::TAU;
        TAU * (semi_major_axis.powi(3) / mu).sqrt()
    }

    /// Assert that total momentum is unchanged within `tolerance`.
    ///
    /// # Panics
    /// Panics if the momentum vectors differ by more than the tolerance.
    pub fn assert_momentum_conserved(initial: DVec2, final_: DVec2, tolerance: f64) {
        let drift = (final_ - initial).length();
        assert!(
            drift <= tolerance,
            "Momentum not conserved: initial={initial:?}, final={final_:?}, drift={drift:.6e}"
        );
    }

    /// Assert that an energy `after` stays within `rel_tol` of `before`.
    ///
    /// The drift is measured against `|before|` floored at 1e-10.
    pub fn assert_energy_within(before: f64, after: f64, rel_tol: f64) {
        let scale = before.abs().max(1e-10);
        let drift = (after - before).abs() / scale;
        assert!(
            drift <= rel_tol,
            "Energy moved from {before:.6e} to {after:.6e} (drift {drift:.3e} > {rel_tol:.1e})"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bounds;
    use approx::assert_relative_eq;

    #[test]
    fn test_circular_orbit_has_correct_velocity() {
        let body = fixtures::circular_orbit(1000.0, 100.0);
        assert_relative_eq!(body.vel.length(), 10f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_elliptical_orbit_is_bound() {
        let body = fixtures::elliptical_orbit(1000.0, 100.0, 0.5);
        assert!(assertions::orbital_energy(body.pos, body.vel, 1000.0) < 0.0);
    }

    #[test]
    fn test_gas_particles_inside_bounds() {
        let bounds = Bounds::from_size(100.0, 80.0);
        let particles = fixtures::gas_particles(30, bounds, 2.0, 10.0, 3);
        assert_eq!(particles.len(), 30);
        assert!(particles.iter().all(|p| bounds.contains(p.pos)));
    }

    #[test]
    fn test_momentum_sums_over_store() {
        let store = fixtures::store_of([
            Body::new(DVec2::ZERO, DVec2::new(1.0, 0.0), 2.0, 1.0),
            Body::new(DVec2::ONE, DVec2::new(0.0, 3.0), 1.0, 1.0),
        ]);
        assert_eq!(assertions::momentum(&store), DVec2::new(2.0, 3.0));
        assert_relative_eq!(assertions::kinetic_energy(&store), 5.5, epsilon = 1e-12);
    }

    #[test]
    fn test_orbital_period_unit_circle() {
        assert_relative_eq!(
            assertions::orbital_period(1.0, 1.0),
            std::f64::consts::TAU,
            epsilon = 1e-12
        );
    }
}
