//! Physlab - headless runner
//!
//! Loads a preset, steps it in real time without a window and logs the
//! derived metrics once per second of simulated time.
//!
//! Usage: `physlab [preset] [ticks]`

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use physlab::scenarios::PRESETS;
use physlab::{Simulation, SimulationCommand, SimulationPlugin};

const DEFAULT_PRESET: &str = "solar_system";
const DEFAULT_TICKS: u64 = 600;

/// What to run, from the command line.
#[derive(Resource)]
struct RunOptions {
    preset: String,
    max_ticks: u64,
}

fn main() {
    let mut args = std::env::args().skip(1);
    let preset = args.next().unwrap_or_else(|| DEFAULT_PRESET.to_string());
    let max_ticks = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_TICKS);

    if !PRESETS.iter().any(|p| p.id == preset) {
        let ids: Vec<&str> = PRESETS.iter().map(|p| p.id).collect();
        eprintln!("Unknown preset '{preset}'. Available: {}", ids.join(", "));
        std::process::exit(2);
    }

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
        )
        .add_plugins(LogPlugin::default())
        .add_plugins(SimulationPlugin::default())
        .insert_resource(RunOptions { preset, max_ticks })
        .add_systems(Startup, load_preset)
        .add_systems(Update, (report_metrics, exit_when_done))
        .run();
}

/// Queue the chosen preset and start it.
fn load_preset(options: Res<RunOptions>, mut commands: MessageWriter<SimulationCommand>) {
    commands.write(SimulationCommand::LoadPreset(options.preset.clone()));
    commands.write(SimulationCommand::Start);
}

/// Log a metrics line whenever the snapshot crosses a whole simulated second.
fn report_metrics(sim: Res<Simulation>, mut last_second: Local<u64>) {
    let metrics = sim.metrics();
    let second = metrics.time.floor() as u64;
    if metrics.tick == 0 || second == *last_second {
        return;
    }
    *last_second = second;

    info!(
        "t={:.1}s tick={} bodies={} E={:.3} (KE {:.3}, PE {:.3}) |p|={:.3}",
        metrics.time,
        metrics.tick,
        metrics.body_count,
        metrics.energy.total(),
        metrics.energy.kinetic,
        metrics.energy.potential,
        metrics.momentum.length(),
    );
    if let Some(thermo) = &metrics.thermo {
        info!(
            "  T={:.3} P={:.5} S={}",
            thermo.temperature,
            thermo.pressure,
            thermo.entropy.map_or("n/a".to_string(), |s| format!("{s:.3}")),
        );
    }
    for orbit in &metrics.orbits {
        match orbit.status.elements() {
            Some(el) => debug!(
                "  {} about {}: a={:.1} e={:.3} T={:.1}",
                orbit.body, orbit.primary, el.semi_major_axis, el.eccentricity, el.period
            ),
            None => debug!("  {} about {}: no stable orbit", orbit.body, orbit.primary),
        }
    }
}

fn exit_when_done(
    sim: Res<Simulation>,
    options: Res<RunOptions>,
    mut exit: MessageWriter<AppExit>,
) {
    if sim.tick() >= options.max_ticks {
        info!("Reached {} ticks, exiting", sim.tick());
        exit.write(AppExit::Success);
    }
}
