//! Fleet registry: pilot lifecycle, drone ownership and status broadcast.
//!
//! Each pilot owns exactly one drone, tracked in the [`FleetRegistry`].
//! Joining spawns an authoritative autopilot drone, leaving despawns it, and
//! selecting a drone swaps it onto direct keyboard control while every other
//! drone falls back to autopilot. Mirror drones (spawned without
//! [`Authority`]) hold state for display but are never advanced here.

mod entities;
mod systems;

pub use entities::{
    Authority, ClientId, DroneSelected, DroneStatus, FleetRegistry, InputSource, PilotJoined,
    PilotLeft, set_input_source, spawn_drone,
};

use bevy::prelude::*;

use crate::flight::FlightIntegrationSet;

/// Pilot lifecycle handling and per-tick status broadcast.
pub struct FleetPlugin;

impl Plugin for FleetPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<ClientId>()
            .register_type::<Authority>()
            .init_resource::<FleetRegistry>()
            .add_message::<PilotJoined>()
            .add_message::<PilotLeft>()
            .add_message::<DroneSelected>()
            .add_message::<DroneStatus>()
            .add_systems(
                Update,
                (systems::handle_joins, systems::handle_leaves, systems::handle_selection),
            )
            .add_systems(
                FixedUpdate,
                systems::broadcast_status.after(FlightIntegrationSet),
            );
    }
}
