//! Simulation controller: owns one run's state and drives the step pipeline.
//!
//! A step always runs the stages in the same order, each one completing for
//! the whole store before the next starts:
//!
//! ```text
//! forces -> integrate -> collisions/walls -> trails -> metrics
//! ```
//!
//! The controller holds no timers. Whoever owns it (the bevy plugin, a test,
//! the headless runner) calls [`Simulation::step`] once per tick.

use bevy::log::{debug, info, warn};
use bevy::math::DVec2;
use bevy::prelude::Resource;

use crate::collision::{self, CollisionRecord};
use crate::config::{ConfigError, ForceModel, SimulationConfig};
use crate::metrics::{self, MetricsSnapshot};
use crate::physics::{self, integrator, SimulationFault};
use crate::rng::SimRng;
use crate::scenarios;
use crate::store::BodyStore;
use crate::trail;
use crate::types::{Body, BodyId, BodySpec, InvalidBodyError};

/// Lifecycle state. Only `Running` advances on [`Simulation::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimulationState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Errors surfaced to callers driving the simulation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error(transparent)]
    InvalidBody(#[from] InvalidBodyError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown preset `{0}`")]
    UnknownPreset(String),

    #[error("no body with id {0}")]
    UnknownBody(BodyId),
}

/// Summary of one completed step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Tick number after the step.
    pub tick: u64,
    /// Effective timestep used.
    pub dt: f64,
    pub collisions: Vec<CollisionRecord>,
    pub faults: Vec<SimulationFault>,
    pub wall_hits: usize,
}

/// One simulation run: configuration, bodies and derived state.
#[derive(Resource, Clone, Debug)]
pub struct Simulation {
    state: SimulationState,
    config: SimulationConfig,
    store: BodyStore,
    rng: SimRng,
    tick: u64,
    time: f64,
    metrics: MetricsSnapshot,
    preset: Option<&'static str>,
}

impl Default for Simulation {
    fn default() -> Self {
        let config = SimulationConfig::default();
        Self {
            state: SimulationState::Idle,
            rng: SimRng::new(config.seed),
            config,
            store: BodyStore::new(),
            tick: 0,
            time: 0.0,
            metrics: MetricsSnapshot::default(),
            preset: None,
        }
    }
}

impl Simulation {
    /// Create an idle, empty simulation.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rng: SimRng::new(config.seed),
            config,
            ..Default::default()
        })
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimulationState::Running
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Read-only view of the bodies.
    pub fn store(&self) -> &BodyStore {
        &self.store
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.store.get(id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.store.iter()
    }

    /// Latest derived metrics.
    pub fn metrics(&self) -> &MetricsSnapshot {
        &self.metrics
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds since the last reset.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Id of the last loaded preset, if any.
    pub fn preset(&self) -> Option<&'static str> {
        self.preset
    }

    pub(crate) fn rng_mut(&mut self) -> &mut SimRng {
        &mut self.rng
    }

    pub fn start(&mut self) {
        if self.state != SimulationState::Running {
            info!("Simulation running ({} bodies)", self.store.len());
            self.state = SimulationState::Running;
        }
    }

    /// Suspend stepping. Has no effect unless running.
    pub fn pause(&mut self) {
        if self.state == SimulationState::Running {
            info!("Simulation paused at tick {}", self.tick);
            self.state = SimulationState::Paused;
        }
    }

    /// Back to `Idle` with an empty store, zeroed clock and metrics.
    ///
    /// The random source is re-seeded, so a reset run replays identically.
    pub fn reset(&mut self) {
        self.store.clear();
        self.rng.reseed(self.config.seed);
        self.tick = 0;
        self.time = 0.0;
        self.metrics = MetricsSnapshot::default();
        self.preset = None;
        if self.state != SimulationState::Idle {
            info!("Simulation reset");
        }
        self.state = SimulationState::Idle;
    }

    /// Remove every body without changing the lifecycle state or clock.
    pub fn clear(&mut self) {
        self.store.clear();
        self.refresh_metrics();
    }

    /// Insert a fully specified body.
    ///
    /// Metrics are refreshed on success so an idle simulation reports the
    /// new body straight away.
    pub fn add_body(&mut self, body: Body) -> Result<BodyId, InvalidBodyError> {
        match self.store.add(body) {
            Ok(id) => {
                debug!("Added body {id}");
                self.refresh_metrics();
                Ok(id)
            }
            Err(err) => {
                warn!("Rejected body: {err}");
                Err(err)
            }
        }
    }

    /// Insert a body from a placement request, filling in what it omits.
    pub fn place(&mut self, spec: BodySpec) -> Result<BodyId, InvalidBodyError> {
        let fallback = self.placement_velocity(spec.pos);
        self.add_body(spec.into_body(fallback))
    }

    /// Velocity given to a placed body that did not ask for one.
    ///
    /// Under gravity this is the circular orbital velocity about the most
    /// massive body, counter-clockwise and relative to that body's motion.
    /// Other force models place bodies at rest.
    pub fn placement_velocity(&self, pos: DVec2) -> DVec2 {
        if self.config.force_model != ForceModel::Gravity {
            return DVec2::ZERO;
        }
        let Some(primary) = self.store.heaviest() else {
            return DVec2::ZERO;
        };

        let offset = pos - primary.pos;
        let r = offset.length();
        if r < self.config.constants.singularity_epsilon {
            return primary.vel;
        }
        let speed = (self.config.constants.gravitational * primary.mass / r).sqrt();
        primary.vel + offset.perp() / r * speed
    }

    pub fn remove_body(&mut self, id: BodyId) -> Result<Body, SimulationError> {
        let body = self.store.remove(id).ok_or(SimulationError::UnknownBody(id))?;
        debug!("Removed body {id}");
        self.refresh_metrics();
        Ok(body)
    }

    /// Apply a configuration change atomically.
    ///
    /// The closure edits a copy; if the copy fails validation the running
    /// configuration is left untouched. Accumulated state is never reset,
    /// so the time scale can be changed mid-run.
    pub fn configure(
        &mut self,
        edit: impl FnOnce(&mut SimulationConfig),
    ) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        edit(&mut next);
        if let Err(err) = next.validate() {
            warn!("Rejected configuration change: {err}");
            return Err(err);
        }

        if next.trail_capacity < self.config.trail_capacity {
            for body in self.store.iter_mut() {
                body.trail.truncate(next.trail_capacity);
            }
        }
        self.config = next;
        Ok(())
    }

    /// Recompute the metrics snapshot now.
    pub fn refresh_metrics(&mut self) {
        self.metrics = metrics::compute_metrics(&self.store, &self.config, self.tick, self.time);
    }

    /// Replace the current run with a named preset.
    ///
    /// The preset installs its own configuration, so any previous live
    /// changes are discarded.
    pub fn load_preset(&mut self, id: &str) -> Result<(), SimulationError> {
        let preset =
            scenarios::find(id).ok_or_else(|| SimulationError::UnknownPreset(id.to_string()))?;

        let config = preset.config();
        config.validate()?;
        self.config = config;
        self.reset();
        (preset.populate)(self)?;
        self.preset = Some(preset.id);
        self.refresh_metrics();

        info!("Loaded preset: {} ({} bodies)", preset.name, self.store.len());
        if !preset.start_paused {
            self.start();
        }
        Ok(())
    }

    /// Run one step if running; returns `None` otherwise.
    pub fn step(&mut self) -> Option<StepReport> {
        if self.state != SimulationState::Running {
            return None;
        }
        Some(self.advance())
    }

    /// Run the full pipeline once, regardless of state.
    fn advance(&mut self) -> StepReport {
        let dt = self.config.dt();

        let forces = physics::compute_forces(&self.store, &self.config, &mut self.rng);
        let mut faults = forces.faults;
        faults.extend(integrator::step(&mut self.store, &forces.forces, dt));

        let resolved = collision::resolve(&mut self.store, &self.config, &forces.contacts);
        trail::record_all(&mut self.store, self.config.trail_capacity);

        self.tick += 1;
        self.time += dt;
        if self.tick % u64::from(self.config.metrics_interval) == 0 {
            self.refresh_metrics();
        }

        for fault in &faults {
            warn!("Tick {}: {fault}", self.tick);
        }
        if !resolved.collisions.is_empty() {
            debug!("Tick {}: {} collisions", self.tick, resolved.collisions.len());
        }

        StepReport {
            tick: self.tick,
            dt,
            collisions: resolved.collisions,
            faults,
            wall_hits: resolved.wall_hits,
        }
    }
}
