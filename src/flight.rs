//! Flight integration: command → rotation + translational forces.
//!
//! Runs once per fixed tick for every authoritative drone. Rotation is
//! composed absolutely from smoothed Euler angles each tick (yaw is an
//! accumulated heading, pitch/roll are bounded tilts); translation goes
//! force → velocity → position with rigidbody-style linear damping. The
//! [`Rotor`] spin animation reads the resulting state every frame.

mod entities;
mod systems;

pub use entities::{FlightState, Rotor, Velocity};

use bevy::prelude::*;

/// Flight model parameters shared by the whole fleet.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct FlightConfig {
    /// Peak force per axis at full stick, in newtons per unit mass.
    pub max_speed: f32,
    /// Nose tilt in degrees at full pitch command.
    pub pitch_amount: f32,
    /// Bank tilt in degrees at full roll command.
    pub roll_amount: f32,
    /// Heading change in degrees accumulated per tick at full yaw command.
    pub yaw_amount: f32,
    /// Lerp rate of the rendered angles toward their targets.
    pub rotation_lerp_speed: f32,
    /// Zero out the pitch axis entirely.
    pub disable_pitch: bool,
    /// Zero out the roll axis entirely.
    pub disable_roll: bool,
    /// Zero out the yaw axis entirely.
    pub disable_yaw: bool,
    /// Skip the pitch/roll tilt clamps.
    pub ignore_rotation_limits: bool,
    /// Min/max rendered pitch tilt in degrees.
    pub pitch_limit: Vec2,
    /// Min/max rendered roll tilt in degrees.
    pub roll_limit: Vec2,
    /// Pin full forward force and a fixed nose-down tilt regardless of the
    /// pitch command (fixed-wing style cruising).
    pub auto_forward: bool,
    /// Zero the vertical component of forward/side forces so banking never
    /// couples into climb or dive.
    pub maintain_altitude: bool,
    /// Skip gravity compensation: idle drones free-fall instead of hovering.
    pub gravity_when_idle: bool,
    /// Add a sinusoidal lift bob while the command is idle.
    pub hover: bool,
    /// Hover bob strength.
    pub hover_amplitude: f32,
    /// Hover bob frequency in radians per second.
    pub hover_frequency: f32,
    /// Gravitational acceleration magnitude.
    pub gravity: f32,
    /// Rigidbody-style linear damping coefficient.
    pub linear_damping: f32,
    /// World height of the ground plane.
    pub ground_height: f32,
    /// Probe length of the downward ground check.
    pub ground_check_distance: f32,
    /// Damp velocity toward zero while resting on the ground, overriding
    /// pilot and autopilot intent.
    pub decelerate_on_ground: bool,
    /// Ground deceleration rate per second.
    pub ground_deceleration: f32,
    /// Rotor spin rate in degrees per second at full tilt.
    pub rotor_spin_speed: f32,
    /// Fraction of full spin kept while hovering in place.
    pub rotor_min_speed_factor: f32,
    /// Rotor wind-down rate in degrees per second once parked.
    pub rotor_wind_down: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            max_speed: 30.0,
            pitch_amount: 30.0,
            roll_amount: 30.0,
            yaw_amount: 4.0,
            rotation_lerp_speed: 2.0,
            disable_pitch: false,
            disable_roll: false,
            disable_yaw: false,
            ignore_rotation_limits: false,
            pitch_limit: Vec2::new(-30.0, 30.0),
            roll_limit: Vec2::new(-30.0, 30.0),
            auto_forward: false,
            maintain_altitude: true,
            gravity_when_idle: false,
            hover: false,
            hover_amplitude: 1.25,
            hover_frequency: 2.0,
            gravity: 9.81,
            linear_damping: 0.6,
            ground_height: 0.0,
            ground_check_distance: 0.2,
            decelerate_on_ground: false,
            ground_deceleration: 4.0,
            rotor_spin_speed: 1500.0,
            rotor_min_speed_factor: 0.1,
            rotor_wind_down: 720.0,
        }
    }
}

/// Label for the fixed-tick integration chain; later fixed-tick work (status
/// broadcast) orders after it.
#[derive(SystemSet, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlightIntegrationSet;

/// Fixed-tick flight integration + per-frame rotor animation.
pub struct FlightPlugin(pub FlightConfig);

impl Plugin for FlightPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<FlightConfig>()
            .register_type::<FlightState>()
            .register_type::<Velocity>()
            .register_type::<Rotor>()
            .insert_resource(self.0.clone())
            .add_systems(
                FixedUpdate,
                (
                    systems::integrate_rotation,
                    systems::apply_throttle,
                    systems::integrate_velocity,
                    systems::ground_effects,
                )
                    .chain()
                    .in_set(FlightIntegrationSet),
            )
            .add_systems(Update, systems::spin_rotors);
    }
}
