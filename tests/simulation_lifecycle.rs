//! Integration tests for the controller lifecycle and live configuration.

mod common;

use bevy::math::DVec2;
use physlab::types::{Body, BodySpec, Category, InvalidBodyError};
use physlab::{Simulation, SimulationConfig, SimulationError, SimulationState};

fn populated() -> Simulation {
    let mut sim = common::running(SimulationConfig::gravity());
    sim.add_body(Body::new(DVec2::ZERO, DVec2::ZERO, 1000.0, 10.0).fixed()).unwrap();
    sim.add_body(common::circular_orbit(1000.0, 100.0)).unwrap();
    sim
}

#[test]
fn test_idle_paused_running_cycle() {
    let mut sim = populated();
    assert_eq!(common::step_n(&mut sim, 10), 10);

    sim.pause();
    assert_eq!(sim.state(), SimulationState::Paused);
    assert_eq!(common::step_n(&mut sim, 10), 0);
    assert_eq!(sim.store().len(), 2, "pause keeps the store");

    sim.start();
    assert_eq!(common::step_n(&mut sim, 5), 5);
    assert_eq!(sim.tick(), 15);
}

#[test]
fn test_reset_twice_leaves_empty_store() {
    let mut sim = populated();
    common::step_n(&mut sim, 20);

    sim.reset();
    assert!(sim.store().is_empty());
    assert_eq!(sim.state(), SimulationState::Idle);

    sim.reset();
    assert!(sim.store().is_empty());
    assert_eq!(sim.state(), SimulationState::Idle);
    assert_eq!(sim.tick(), 0);
    assert_eq!(sim.time(), 0.0);
}

#[test]
fn test_ids_are_not_reused_after_removal() {
    let mut sim = Simulation::default();
    let a = sim.add_body(Body::new(DVec2::ZERO, DVec2::ZERO, 1.0, 1.0)).unwrap();
    sim.remove_body(a).unwrap();
    let b = sim.add_body(Body::new(DVec2::ZERO, DVec2::ZERO, 1.0, 1.0)).unwrap();
    assert_ne!(a, b);
    assert!(matches!(sim.remove_body(a), Err(SimulationError::UnknownBody(id)) if id == a));
}

#[test]
fn test_invalid_placements_are_rejected() {
    let mut sim = Simulation::default();
    assert_eq!(
        sim.place(BodySpec::new(Category::Secondary, DVec2::ZERO).radius(0.0)),
        Err(InvalidBodyError::NonPositiveRadius(0.0))
    );
    assert!(matches!(
        sim.place(BodySpec::new(Category::Secondary, DVec2::new(f64::NAN, 0.0))),
        Err(InvalidBodyError::NonFinite { .. })
    ));
    assert!(sim.store().is_empty());
}

#[test]
fn test_live_time_scale_change_keeps_bodies() {
    let mut sim = populated();
    common::step_n(&mut sim, 30);
    let before: Vec<DVec2> = sim.bodies().map(|b| b.pos).collect();
    let time_before = sim.time();

    sim.configure(|cfg| cfg.time_scale = 3.0).unwrap();
    let after: Vec<DVec2> = sim.bodies().map(|b| b.pos).collect();
    assert_eq!(before, after);

    let report = sim.step().unwrap();
    assert!((sim.time() - time_before - report.dt).abs() < 1e-12);
    assert!((report.dt - 3.0 * sim.config().base_dt).abs() < 1e-15);
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let mut sim = populated();
    assert!(sim.configure(|cfg| cfg.restitution = 1.5).is_err());
    assert!(sim.configure(|cfg| cfg.base_dt = f64::NAN).is_err());
    assert!(sim.configure(|cfg| cfg.time_scale = -1.0).is_err());
    assert_eq!(sim.config(), &SimulationConfig::gravity());
}

#[test]
fn test_zero_time_scale_freezes_motion() {
    let mut sim = populated();
    sim.configure(|cfg| cfg.time_scale = 0.0).unwrap();
    let before: Vec<DVec2> = sim.bodies().map(|b| b.pos).collect();
    common::step_n(&mut sim, 10);
    let after: Vec<DVec2> = sim.bodies().map(|b| b.pos).collect();
    assert_eq!(before, after);
}
