//! Multi-drone quadcopter flight simulation on the Bevy ECS.
//!
//! Drones fly under exactly one input source at a time: a device rig
//! ([`controls`]), externally fed axes, or the AI [`autopilot`]. Whatever
//! the source, it publishes the same normalized 4-axis
//! [`ControlCommand`](controls::ControlCommand), which the [`flight`]
//! integrator turns into rotation and force on a fixed 60 Hz tick. The
//! [`fleet`] registry ties drones to pilots and broadcasts per-tick status.
//!
//! [`headless_app`] builds the whole stack without a window or renderer,
//! stepped manually at the fixed rate for scripted runs and tests.

#![warn(missing_docs)]

pub mod autopilot;
pub mod controls;
pub mod fleet;
pub mod flight;
pub mod math;
pub mod pid;

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use autopilot::{AutopilotPlugin, SteeringRng};
use controls::{ControlsConfig, ControlsPlugin};
use fleet::FleetPlugin;
use flight::{FlightConfig, FlightPlugin};

/// The fixed physics tick rate, in hertz.
pub const TICK_HZ: f64 = 60.0;

/// A windowless app with the full simulation stack, deterministic for a
/// given `seed`.
///
/// Time advances exactly one tick per [`App::update`] call, so callers step
/// the simulation rather than racing a wall clock.
pub fn headless_app(seed: u64) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, bevy::input::InputPlugin))
        .add_plugins((
            ControlsPlugin(ControlsConfig::default()),
            AutopilotPlugin,
            FlightPlugin(FlightConfig::default()),
            FleetPlugin,
        ))
        .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / TICK_HZ,
        )))
        .insert_resource(SteeringRng::seeded(seed));
    app
}
