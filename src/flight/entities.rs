use bevy::prelude::*;

/// Rendered orientation state of one drone, mutated once per fixed tick.
///
/// `yaw` is the accumulated heading target; `current_*` are the smoothed
/// angles actually composed into the transform. Angles are in degrees, in
/// the command-aligned convention: positive pitch = nose-down forward tilt,
/// positive yaw = clockwise heading seen from above.
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
pub struct FlightState {
    /// Smoothed, clamped pitch tilt.
    pub current_pitch: f32,
    /// Smoothed, clamped roll tilt (negative when banking right).
    pub current_roll: f32,
    /// Smoothed heading.
    pub current_yaw: f32,
    /// Unsmoothed heading accumulator fed by the yaw command.
    pub yaw: f32,
    /// True while the ground probe reports contact.
    pub grounded: bool,
}

/// Custom rigidbody stand-in: velocity integrated by the flight systems and
/// applied directly to the transform.
#[derive(Component, Clone, Copy, Debug, Reflect)]
pub struct Velocity {
    /// Linear velocity in world space.
    pub linear: Vec3,
    /// Mass used for the gravity-compensation term.
    pub mass: f32,
}

impl Default for Velocity {
    fn default() -> Self {
        Self {
            linear: Vec3::ZERO,
            mass: 1.0,
        }
    }
}

/// Spinning propeller visual attached to a drone.
///
/// Links to its drone by entity id rather than hierarchy lookup; the spin
/// system reads that drone's velocity and ground state.
#[derive(Component, Clone, Copy, Debug, Reflect)]
pub struct Rotor {
    /// The drone whose motion drives this rotor.
    pub drone: Entity,
    /// Counter-rotating rotors spin the other way.
    pub inverse: bool,
    /// Current spin rate in degrees per second (retained for wind-down).
    pub speed: f32,
}

impl Rotor {
    /// A rotor driven by `drone`.
    pub fn new(drone: Entity, inverse: bool) -> Self {
        Self {
            drone,
            inverse,
            speed: 0.0,
        }
    }
}
