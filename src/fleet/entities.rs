use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::autopilot::Autopilot;
use crate::controls::{
    AxisFilter, ControlCommand, ExternalAxes, GamepadRig, KeyboardRig, MouseRig, RawAxes,
};
use crate::flight::{FlightState, Velocity};

/// Stable pilot identifier, also tagged onto the pilot's drone entity.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct ClientId(pub u64);

/// Marks a drone this instance simulates. Input sampling, steering and the
/// flight integrator all filter on it; a drone without the marker holds
/// state but is never advanced.
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
pub struct Authority;

/// The one command source a drone flies under.
///
/// Applying a source replaces whatever source the drone had before; sources
/// never stack.
#[derive(Clone, Debug)]
pub enum InputSource {
    /// Digital axes from [`crate::controls::KeyBindings`].
    Keyboard,
    /// First connected gamepad, analog sticks.
    Gamepad,
    /// Mouse-look virtual stick plus keyboard yaw/lift.
    Mouse,
    /// Axes pushed in by an external caller (scripts, bridges).
    External,
    /// Self-steering with the given configuration.
    Autopilot(Autopilot),
}

/// `ClientId → Entity` map of every spawned drone.
#[derive(Resource, Clone, Debug, Default)]
pub struct FleetRegistry {
    drones: HashMap<ClientId, Entity>,
}

impl FleetRegistry {
    /// The drone entity registered for `client`, if any.
    pub fn get(&self, client: ClientId) -> Option<Entity> {
        self.drones.get(&client).copied()
    }

    /// Registers `entity` for `client`, returning the entity it displaced.
    pub fn insert(&mut self, client: ClientId, entity: Entity) -> Option<Entity> {
        self.drones.insert(client, entity)
    }

    /// Unregisters `client`, returning its drone if one was registered.
    pub fn remove(&mut self, client: ClientId) -> Option<Entity> {
        self.drones.remove(&client)
    }

    /// Iterates registered `(client, entity)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (ClientId, Entity)> + '_ {
        self.drones.iter().map(|(c, e)| (*c, *e))
    }

    /// Number of registered drones.
    pub fn len(&self) -> usize {
        self.drones.len()
    }

    /// True when no drone is registered.
    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }
}

/// A pilot joined; the fleet spawns them a drone at `position`.
#[derive(Message, Clone, Debug)]
pub struct PilotJoined {
    /// The joining pilot.
    pub client: ClientId,
    /// Spawn point for the new drone.
    pub position: Vec3,
}

/// A pilot left; their drone despawns and leaves the registry.
#[derive(Message, Clone, Copy, Debug)]
pub struct PilotLeft {
    /// The departing pilot.
    pub client: ClientId,
}

/// A pilot's drone was selected for direct keyboard control. Every other
/// registered drone returns to autopilot.
#[derive(Message, Clone, Copy, Debug)]
pub struct DroneSelected {
    /// Owner of the drone to hand the keyboard.
    pub client: ClientId,
}

/// Per-fixed-tick snapshot of one drone, emitted after integration.
#[derive(Message, Clone, Copy, Debug)]
pub struct DroneStatus {
    /// Owner of the reported drone.
    pub client: ClientId,
    /// World position.
    pub position: Vec3,
    /// World-space linear velocity.
    pub velocity: Vec3,
    /// Whether the ground probe reports contact.
    pub grounded: bool,
}

/// Swaps `drone` onto `source`, removing whatever source it carried.
///
/// This is the only place input sources change; device sources bring the
/// raw-sample and filter components with them, the autopilot publishes
/// commands directly and needs neither.
pub fn set_input_source(commands: &mut Commands, drone: Entity, source: InputSource) {
    let mut entity = commands.entity(drone);
    entity.remove::<(
        KeyboardRig,
        GamepadRig,
        MouseRig,
        ExternalAxes,
        Autopilot,
        RawAxes,
        AxisFilter,
    )>();
    match source {
        InputSource::Keyboard => {
            entity.insert((KeyboardRig, RawAxes::default(), AxisFilter::default()));
        }
        InputSource::Gamepad => {
            entity.insert((GamepadRig, RawAxes::default(), AxisFilter::default()));
        }
        InputSource::Mouse => {
            entity.insert((MouseRig::default(), RawAxes::default(), AxisFilter::default()));
        }
        InputSource::External => {
            entity.insert((
                ExternalAxes::default(),
                RawAxes::default(),
                AxisFilter::default(),
            ));
        }
        InputSource::Autopilot(pilot) => {
            entity.insert(pilot);
        }
    }
}

/// Spawns a drone for `client` at `position` under the given source and
/// registers it. With `authoritative` false the drone is a mirror: it holds
/// state but no tick system touches it.
pub fn spawn_drone(
    commands: &mut Commands,
    registry: &mut FleetRegistry,
    client: ClientId,
    position: Vec3,
    source: InputSource,
    authoritative: bool,
) -> Entity {
    let mut entity = commands.spawn((
        client,
        Transform::from_translation(position),
        ControlCommand::default(),
        FlightState::default(),
        Velocity::default(),
    ));
    if authoritative {
        entity.insert(Authority);
    }
    let drone = entity.id();
    set_input_source(commands, drone, source);
    registry.insert(client, drone);
    drone
}
