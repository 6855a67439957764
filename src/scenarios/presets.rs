//! Preset definitions.
//!
//! Eight setups across the three force models. Random scatter draws from the
//! simulation's seeded source, so a preset loads identically every time.

use std::f64::consts::TAU;

use bevy::math::DVec2;

use super::{Preset, GAS_BOX};
use crate::config::{ForceModel, HeatSource, SimulationConfig};
use crate::simulation::Simulation;
use crate::types::{BodySpec, Category, InvalidBodyError};

/// All available presets.
pub static PRESETS: &[Preset] = &[
    BINARY_SYSTEM,
    SOLAR_SYSTEM,
    ACCRETION_DISK,
    DIPOLE_FIELD,
    PARALLEL_CHARGES,
    CHARGE_PAIR,
    GAS_BOX_PRESET,
    HEATER_COOLER,
];

fn keep_defaults(_: &mut SimulationConfig) {}

/// Two equal stars orbiting their common centre of mass, with a
/// circumbinary planet far outside.
pub static BINARY_SYSTEM: Preset = Preset {
    id: "binary_system",
    name: "Binary System",
    description: "Two equal stars circle their barycentre. A distant planet orbits both.",
    force_model: ForceModel::Gravity,
    time_scale: 2.0,
    start_paused: false,
    tune: keep_defaults,
    populate: populate_binary,
};

/// A fixed star with three planets, one moon and an eccentric comet.
pub static SOLAR_SYSTEM: Preset = Preset {
    id: "solar_system",
    name: "Solar System",
    description: "Planets on circular orbits, a moon, and a comet on an ellipse.",
    force_model: ForceModel::Gravity,
    time_scale: 2.0,
    start_paused: false,
    tune: keep_defaults,
    populate: populate_solar,
};

/// Many light tracers on circular orbits that slowly clump by merging.
pub static ACCRETION_DISK: Preset = Preset {
    id: "accretion_disk",
    name: "Accretion Disk",
    description: "A ring of debris around a star. Collisions merge bodies.",
    force_model: ForceModel::Gravity,
    time_scale: 1.0,
    start_paused: false,
    tune: keep_defaults,
    populate: populate_disk,
};

/// Charges drifting past a fixed magnet curve under the Lorentz force.
pub static DIPOLE_FIELD: Preset = Preset {
    id: "dipole_field",
    name: "Dipole Field",
    description: "Moving charges bend around a fixed magnetic dipole.",
    force_model: ForceModel::Electromagnetic,
    time_scale: 1.0,
    start_paused: true,
    tune: keep_defaults,
    populate: populate_dipole,
};

/// Parallel and antiparallel moving charges.
pub static PARALLEL_CHARGES: Preset = Preset {
    id: "parallel_charges",
    name: "Parallel Charges",
    description: "Like charges moving side by side repel electrically and attract magnetically.",
    force_model: ForceModel::Electromagnetic,
    time_scale: 1.0,
    start_paused: true,
    tune: keep_defaults,
    populate: populate_parallel,
};

/// A test charge moving through the field of a fixed dipole pair.
pub static CHARGE_PAIR: Preset = Preset {
    id: "charge_pair",
    name: "Charge Pair",
    description: "A small test charge deflected by fixed positive and negative charges.",
    force_model: ForceModel::Electromagnetic,
    time_scale: 1.0,
    start_paused: true,
    tune: keep_defaults,
    populate: populate_charge_pair,
};

/// Ideal gas in a closed box, no heat sources.
pub static GAS_BOX_PRESET: Preset = Preset {
    id: "gas_box",
    name: "Gas Box",
    description: "Particles bounce elastically in a closed box. Temperature stays steady.",
    force_model: ForceModel::Thermal,
    time_scale: 1.0,
    start_paused: false,
    tune: keep_defaults,
    populate: populate_gas,
};

/// Gas between a heater on the left wall and a cooler on the right.
pub static HEATER_COOLER: Preset = Preset {
    id: "heater_cooler",
    name: "Heater and Cooler",
    description: "Particles speed up near the heater and slow down near the cooler.",
    force_model: ForceModel::Thermal,
    time_scale: 1.0,
    start_paused: false,
    tune: tune_heater_cooler,
    populate: populate_gas,
};

const GAS_PARTICLES: usize = 50;
const GAS_PARTICLE_RADIUS: f64 = 3.0;

fn populate_binary(sim: &mut Simulation) -> Result<(), InvalidBodyError> {
    let g = sim.config().constants.gravitational;
    let (mass, half_sep) = (500.0, 60.0);
    // Each star circles the barycentre at half the separation
    let v = (g * mass * half_sep / (2.0 * half_sep).powi(2)).sqrt();

    for side in [-1.0, 1.0] {
        sim.place(
            BodySpec::new(Category::Primary, DVec2::new(side * half_sep, 0.0))
                .mass(mass)
                .radius(15.0)
                .velocity(DVec2::new(0.0, side * v)),
        )?;
    }

    let r = 320.0;
    let v_planet = (g * 2.0 * mass / r).sqrt();
    sim.place(
        BodySpec::new(Category::Secondary, DVec2::new(r, 0.0)).velocity(DVec2::new(0.0, v_planet)),
    )?;
    Ok(())
}

fn populate_solar(sim: &mut Simulation) -> Result<(), InvalidBodyError> {
    let g = sim.config().constants.gravitational;
    let sun = sim.place(BodySpec::new(Category::Primary, DVec2::ZERO).fixed())?;
    let sun_mass = sim.body(sun).map_or(0.0, |b| b.mass);

    for (radius, angle) in [(120.0, 0.0), (200.0, 2.1), (320.0, 4.0)] {
        let pos = DVec2::from_angle(angle) * radius;
        sim.place(BodySpec::new(Category::Secondary, pos))?;
    }

    // Moon around the middle planet
    let planet = sim
        .bodies()
        .filter(|b| b.category == Category::Secondary)
        .nth(1)
        .map(|b| (b.pos, b.vel, b.mass));
    if let Some((pos, vel, mass)) = planet {
        let offset = pos.normalize_or_zero() * 22.0;
        let v_rel = offset.perp().normalize_or_zero() * (g * mass / 22.0).sqrt();
        sim.place(
            BodySpec::new(Category::Tertiary, pos + offset)
                .radius(3.0)
                .velocity(vel + v_rel),
        )?;
    }

    // Comet: released below circular speed so it falls onto an ellipse
    let r = 420.0;
    let v = 0.7 * (g * sun_mass / r).sqrt();
    sim.place(BodySpec::new(Category::Tracer, DVec2::new(-r, 0.0)).velocity(DVec2::new(0.0, -v)))?;
    Ok(())
}

fn populate_disk(sim: &mut Simulation) -> Result<(), InvalidBodyError> {
    sim.place(BodySpec::new(Category::Primary, DVec2::ZERO).fixed())?;
    for _ in 0..40 {
        let rng = sim.rng_mut();
        let radius = rng.range(80.0, 260.0);
        let angle = rng.range(0.0, TAU);
        sim.place(BodySpec::new(Category::Tracer, DVec2::from_angle(angle) * radius))?;
    }
    Ok(())
}

fn populate_dipole(sim: &mut Simulation) -> Result<(), InvalidBodyError> {
    sim.place(BodySpec::new(Category::Primary, DVec2::ZERO).dipole(1.5e4).fixed())?;
    // Lanes stay clear of the strong field near the magnet
    for (i, y) in [-90.0, -50.0, 50.0, 90.0].into_iter().enumerate() {
        let charge = if i % 2 == 0 { 1.0 } else { -1.0 };
        sim.place(
            BodySpec::new(Category::Tracer, DVec2::new(-150.0, y))
                .mass(1.0)
                .radius(3.0)
                .charge(charge)
                .velocity(DVec2::new(20.0, 0.0)),
        )?;
    }
    Ok(())
}

fn populate_parallel(sim: &mut Simulation) -> Result<(), InvalidBodyError> {
    let charge = |pos: DVec2, vel: DVec2| {
        BodySpec::new(Category::Secondary, pos)
            .mass(1.0)
            .radius(4.0)
            .charge(2.0)
            .velocity(vel)
    };
    // Side by side, same direction
    sim.place(charge(DVec2::new(-150.0, -30.0), DVec2::new(30.0, 0.0)))?;
    sim.place(charge(DVec2::new(-150.0, 30.0), DVec2::new(30.0, 0.0)))?;
    // Passing in opposite directions
    sim.place(charge(DVec2::new(-150.0, 120.0), DVec2::new(30.0, 0.0)))?;
    sim.place(charge(DVec2::new(150.0, 170.0), DVec2::new(-30.0, 0.0)))?;
    Ok(())
}

fn populate_charge_pair(sim: &mut Simulation) -> Result<(), InvalidBodyError> {
    sim.place(BodySpec::new(Category::Primary, DVec2::new(-80.0, 0.0)).charge(5.0).fixed())?;
    sim.place(BodySpec::new(Category::Secondary, DVec2::new(80.0, 0.0)).charge(-5.0).fixed())?;
    sim.place(
        BodySpec::new(Category::Tracer, DVec2::new(-200.0, 120.0))
            .mass(1.0)
            .radius(3.0)
            .charge(0.5)
            .velocity(DVec2::new(15.0, 0.0)),
    )?;
    Ok(())
}

fn populate_gas(sim: &mut Simulation) -> Result<(), InvalidBodyError> {
    let inset = DVec2::splat(GAS_PARTICLE_RADIUS);
    for _ in 0..GAS_PARTICLES {
        let rng = sim.rng_mut();
        let pos = rng.point_in(GAS_BOX.min + inset, GAS_BOX.max - inset);
        let vel = rng.unit_vector() * rng.range(10.0, 40.0);
        sim.place(
            BodySpec::new(Category::Tracer, pos)
                .mass(1.0)
                .radius(GAS_PARTICLE_RADIUS)
                .velocity(vel),
        )?;
    }
    Ok(())
}

fn tune_heater_cooler(config: &mut SimulationConfig) {
    let mid = GAS_BOX.center().y;
    config.thermal.heat_sources = vec![
        HeatSource::new(DVec2::new(GAS_BOX.min.x, mid), 0.5),
        HeatSource::new(DVec2::new(GAS_BOX.max.x, mid), -1.0),
    ];
    config.thermal.damping = 0.999;
}
