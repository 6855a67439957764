//! Bevy integration for the simulation controller.
//!
//! The [`Simulation`] lives in the world as a resource. External systems
//! (UI, input, scripts) drive it by writing [`SimulationCommand`] messages,
//! which are applied in `Update`. Stepping happens once per `FixedUpdate`
//! tick, and what happened during the step is forwarded as
//! [`CollisionEvent`] and [`FaultEvent`] messages.

use std::time::Duration;

use bevy::prelude::*;

use crate::collision::CollisionRecord;
use crate::config::SimulationConfig;
use crate::physics::SimulationFault;
use crate::simulation::Simulation;
use crate::types::{BodyId, BodySpec};

/// Lifecycle and editing requests from collaborators.
#[derive(Message, Clone, Debug)]
pub enum SimulationCommand {
    Start,
    Pause,
    /// Toggle between running and paused.
    TogglePause,
    Reset,
    Clear,
    LoadPreset(String),
    Place(BodySpec),
    Remove(BodyId),
    SetTimeScale(f64),
}

/// A merge or bounce that happened during a step.
#[derive(Message, Clone, Debug)]
pub struct CollisionEvent {
    pub tick: u64,
    pub record: CollisionRecord,
}

/// A per-body numerical fault isolated during a step.
#[derive(Message, Clone, Debug)]
pub struct FaultEvent {
    pub tick: u64,
    pub fault: SimulationFault,
}

/// Plugin owning the simulation resource and its schedule.
///
/// The fixed timestep tracks the configuration's base timestep so one
/// `FixedUpdate` tick corresponds to one simulated step at time scale 1.
/// Changes made through [`Simulation::configure`] are picked up in the
/// next `Update`.
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let simulation = match Simulation::new(self.config.clone()) {
            Ok(simulation) => simulation,
            Err(err) => {
                warn!("Invalid simulation config ({err}), using defaults");
                Simulation::default()
            }
        };

        app.insert_resource(Time::<Fixed>::from_seconds(simulation.config().base_dt))
            .insert_resource(simulation)
            .add_message::<SimulationCommand>()
            .add_message::<CollisionEvent>()
            .add_message::<FaultEvent>()
            .add_systems(Update, (handle_commands, sync_fixed_timestep).chain())
            .add_systems(FixedUpdate, tick_simulation);
    }
}

/// Apply queued commands in arrival order.
fn handle_commands(mut commands: MessageReader<SimulationCommand>, mut sim: ResMut<Simulation>) {
    for command in commands.read() {
        match command {
            SimulationCommand::Start => sim.start(),
            SimulationCommand::Pause => sim.pause(),
            SimulationCommand::TogglePause => {
                if sim.is_running() {
                    sim.pause();
                } else {
                    sim.start();
                }
            }
            SimulationCommand::Reset => sim.reset(),
            SimulationCommand::Clear => sim.clear(),
            SimulationCommand::LoadPreset(id) => {
                if let Err(err) = sim.load_preset(id) {
                    warn!("Failed to load preset: {err}");
                }
            }
            SimulationCommand::Place(spec) => {
                if let Err(err) = sim.place(spec.clone()) {
                    debug!("Placement ignored: {err}");
                }
            }
            SimulationCommand::Remove(id) => {
                if let Err(err) = sim.remove_body(*id) {
                    warn!("{err}");
                }
            }
            SimulationCommand::SetTimeScale(scale) => {
                let scale = *scale;
                if let Err(err) = sim.configure(|cfg| cfg.time_scale = scale) {
                    debug!("Time scale {scale} ignored: {err}");
                }
            }
        }
    }
}

/// Keep the fixed timestep equal to the configured base timestep.
fn sync_fixed_timestep(sim: Res<Simulation>, mut fixed: ResMut<Time<Fixed>>) {
    let base_dt = Duration::from_secs_f64(sim.config().base_dt);
    if fixed.timestep() != base_dt {
        debug!("Fixed timestep {:?} -> {:?}", fixed.timestep(), base_dt);
        fixed.set_timestep(base_dt);
    }
}

/// Run one step and forward its report.
fn tick_simulation(
    mut sim: ResMut<Simulation>,
    mut collisions: MessageWriter<CollisionEvent>,
    mut faults: MessageWriter<FaultEvent>,
) {
    if !sim.is_running() {
        return;
    }
    let Some(report) = sim.step() else {
        return;
    };

    for record in report.collisions {
        collisions.write(CollisionEvent {
            tick: report.tick,
            record,
        });
    }
    for fault in report.faults {
        faults.write(FaultEvent {
            tick: report.tick,
            fault,
        });
    }
}
