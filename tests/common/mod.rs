//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::math::DVec2;
use physlab::types::Body;
use physlab::{Simulation, SimulationConfig};

/// Create a simulation in the running state.
pub fn running(config: SimulationConfig) -> Simulation {
    let mut sim = Simulation::new(config).expect("test config must be valid");
    sim.start();
    sim
}

/// Step `n` times, returning how many steps actually ran.
pub fn step_n(sim: &mut Simulation, n: usize) -> usize {
    (0..n).filter_map(|_| sim.step()).count()
}

/// Unit-mass body on a circular orbit about the origin.
pub fn circular_orbit(mu: f64, r: f64) -> Body {
    let v = (mu / r).sqrt();
    Body::new(DVec2::new(r, 0.0), DVec2::new(0.0, v), 1.0, 1.0)
}

/// Unit-mass body at periapsis of an ellipse about the origin.
pub fn elliptical_orbit(mu: f64, periapsis: f64, eccentricity: f64) -> Body {
    let a = periapsis / (1.0 - eccentricity);
    let v = (mu * (2.0 / periapsis - 1.0 / a)).sqrt();
    Body::new(DVec2::new(periapsis, 0.0), DVec2::new(0.0, v), 1.0, 1.0)
}

/// Compute orbital period from Kepler's third law.
pub fn orbital_period(semi_major_axis: f64, mu: f64) -> f64 {
    use std::f64::consts::TAU;
    TAU * (semi_major_axis.powi(3) / mu).sqrt()
}

/// Largest distance of any point from the chord joining the first and last.
pub fn max_deviation_from_chord(points: &[DVec2]) -> f64 {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    let chord = last - first;
    let len = chord.length();
    if len == 0.0 {
        return points.iter().map(|p| p.distance(first)).fold(0.0, f64::max);
    }
    points
        .iter()
        .map(|p| chord.perp_dot(*p - first).abs() / len)
        .fold(0.0, f64::max)
}
