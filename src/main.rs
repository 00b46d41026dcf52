#![warn(missing_docs)]
//! Scripted fleet runner.
//!
//! Spawns a fleet of autopilot drones over a waypoint circuit (optionally
//! littered with obstacles), steps the headless simulation for a fixed
//! number of ticks and logs status snapshots once per simulated second.

use bevy::prelude::*;
use clap::{Parser, ValueEnum};

use drone_fleet::autopilot::{Autopilot, Obstacle, SteeringMode};
use drone_fleet::fleet::{ClientId, DroneStatus, PilotJoined};
use drone_fleet::headless_app;

#[derive(Parser, Debug)]
#[command(name = "drone-fleet", about = "Headless multi-drone flight runs")]
struct Args {
    /// Number of drones to spawn.
    #[arg(long, default_value_t = 4)]
    drones: u64,

    /// Steering mode for every drone.
    #[arg(long, value_enum, default_value = "waypoint")]
    mode: Mode,

    /// RNG seed; identical seeds replay identical runs.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of fixed ticks to simulate.
    #[arg(long, default_value_t = 3600)]
    ticks: u32,

    /// Physics tick rate in hertz.
    #[arg(long, default_value_t = drone_fleet::TICK_HZ)]
    hz: f64,

    /// Scatter an obstacle field across the circuit.
    #[arg(long)]
    obstacles: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// Random targets around the spawn point.
    Wander,
    /// Fixed circuit, in order.
    Waypoint,
    /// Fixed circuit, random order.
    Random,
    /// Fixed circuit, back and forth.
    PingPong,
}

impl Mode {
    fn steering(self) -> SteeringMode {
        match self {
            Mode::Wander => SteeringMode::Wander,
            Mode::Waypoint => SteeringMode::Waypoint,
            Mode::Random => SteeringMode::WaypointRandom,
            Mode::PingPong => SteeringMode::WaypointPingPong,
        }
    }
}

/// Square circuit at cruising height.
fn circuit() -> Vec<Vec3> {
    vec![
        Vec3::new(20.0, 8.0, 20.0),
        Vec3::new(-20.0, 8.0, 20.0),
        Vec3::new(-20.0, 8.0, -20.0),
        Vec3::new(20.0, 8.0, -20.0),
    ]
}

fn main() {
    let args = Args::parse();

    let mut app = headless_app(args.seed);
    app.add_plugins(bevy::log::LogPlugin::default());
    if args.hz != drone_fleet::TICK_HZ {
        app.insert_resource(Time::<Fixed>::from_hz(args.hz))
            .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
                std::time::Duration::from_secs_f64(1.0 / args.hz),
            ));
    }
    app.finish();
    app.cleanup();

    if args.obstacles {
        let points = circuit();
        for (i, point) in points.iter().enumerate() {
            // One pillar halfway along each circuit leg.
            let midpoint = point.midpoint(points[(i + 1) % points.len()]);
            app.world_mut()
                .spawn((Transform::from_translation(midpoint), Obstacle { radius: 1.5 }));
        }
    }

    for i in 0..args.drones {
        let position = Vec3::new(i as f32 * 3.0, 2.0, 0.0);
        app.world_mut()
            .write_message(PilotJoined { client: ClientId(i), position });
    }
    // First tick processes the joins and spawns the fleet.
    app.update();

    let mode = args.mode.steering();
    let waypoints = circuit();
    let mut pilots = app.world_mut().query::<&mut Autopilot>();
    for mut pilot in pilots.iter_mut(app.world_mut()) {
        pilot.mode = mode;
        pilot.waypoints = waypoints.clone();
    }

    let report_every = (args.hz as u32).max(1);
    for tick in 1..args.ticks {
        app.update();
        if tick % report_every == 0 {
            let mut statuses = app
                .world_mut()
                .resource_mut::<Messages<DroneStatus>>();
            for status in statuses.drain() {
                info!(
                    tick,
                    client = status.client.0,
                    position = ?status.position,
                    speed = status.velocity.length(),
                    grounded = status.grounded,
                    "status"
                );
            }
        }
    }
}
