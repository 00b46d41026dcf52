use bevy::prelude::*;

use super::entities::{
    Authority, ClientId, DroneSelected, DroneStatus, FleetRegistry, InputSource, PilotJoined,
    PilotLeft, set_input_source, spawn_drone,
};
use crate::autopilot::Autopilot;
use crate::flight::{FlightState, Velocity};

/// Spawns an authoritative autopilot drone for each joining pilot.
pub fn handle_joins(
    mut commands: Commands,
    mut registry: ResMut<FleetRegistry>,
    mut joins: MessageReader<PilotJoined>,
) {
    for join in joins.read() {
        if registry.get(join.client).is_some() {
            warn!(client = join.client.0, "pilot already has a drone, ignoring join");
            continue;
        }
        let drone = spawn_drone(
            &mut commands,
            &mut registry,
            join.client,
            join.position,
            InputSource::Autopilot(Autopilot::default()),
            true,
        );
        info!(client = join.client.0, ?drone, "pilot joined");
    }
}

/// Despawns and unregisters the drone of each leaving pilot.
pub fn handle_leaves(
    mut commands: Commands,
    mut registry: ResMut<FleetRegistry>,
    mut leaves: MessageReader<PilotLeft>,
) {
    for leave in leaves.read() {
        match registry.remove(leave.client) {
            Some(drone) => {
                commands.entity(drone).despawn();
                info!(client = leave.client.0, "pilot left");
            }
            None => warn!(client = leave.client.0, "leave for unknown pilot"),
        }
    }
}

/// Hands the selected drone the keyboard and returns every other drone to
/// autopilot.
pub fn handle_selection(
    mut commands: Commands,
    registry: Res<FleetRegistry>,
    mut selections: MessageReader<DroneSelected>,
) {
    for selection in selections.read() {
        let Some(selected) = registry.get(selection.client) else {
            warn!(client = selection.client.0, "selection for unknown pilot");
            continue;
        };
        for (client, drone) in registry.iter() {
            if drone == selected {
                set_input_source(&mut commands, drone, InputSource::Keyboard);
            } else {
                set_input_source(
                    &mut commands,
                    drone,
                    InputSource::Autopilot(Autopilot::default()),
                );
            }
            debug!(client = client.0, selected = drone == selected, "input source swapped");
        }
    }
}

/// Emits one [`DroneStatus`] per simulated drone, after integration.
pub fn broadcast_status(
    mut statuses: MessageWriter<DroneStatus>,
    drones: Query<(&ClientId, &Transform, &Velocity, &FlightState), With<Authority>>,
) {
    for (client, transform, velocity, state) in &drones {
        statuses.write(DroneStatus {
            client: *client,
            position: transform.translation,
            velocity: velocity.linear,
            grounded: state.grounded,
        });
    }
}
