//! Pilot input: device sampling and the per-axis command filter.
//!
//! Every piloted drone carries exactly one input-source component
//! ([`KeyboardRig`], [`GamepadRig`], [`MouseRig`], [`ExternalAxes`] or the
//! autopilot from [`crate::autopilot`]). Device sources write a [`RawAxes`]
//! sample each frame; the filter pipeline then shapes it into the published
//! [`ControlCommand`] consumed by the flight integrator.

mod entities;
mod systems;

pub use entities::{
    AxisFilter, ControlCommand, ExternalAxes, GamepadRig, KeyBindings, KeyboardRig, MouseRig,
    RawAxes,
};

use bevy::prelude::*;

/// Shared input shaping parameters for all device-driven drones.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct ControlsConfig {
    /// Lerp rate from the per-axis target to the published current value.
    pub input_smoothness: f32,
    /// Target ramp rate while the stick is pushed away from center.
    pub input_acceleration: f32,
    /// Target ramp rate while the stick returns to center.
    pub input_deceleration: f32,
    /// Analog dead zone; magnitudes below this read as zero.
    pub dead_zone: f32,
    /// Actuator lag: time constant of the rotor response stage (seconds).
    pub rotor_response_delay: f32,
    /// Lerp rate of the rotor smoothing stage.
    pub rotor_smoothness: f32,
    /// Rotor stage ramp rate under active input.
    pub rotor_acceleration: f32,
    /// Rotor stage ramp rate while settling back to idle.
    pub rotor_deceleration: f32,
    /// Mouse-look axis gain (command units per pixel of motion).
    pub mouse_sensitivity: f32,
    /// Rate at which the virtual mouse stick recenters with no motion.
    pub mouse_return_rate: f32,
    /// Keyboard axis bindings.
    pub bindings: KeyBindings,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            input_smoothness: 5.0,
            input_acceleration: 2.0,
            input_deceleration: 3.0,
            dead_zone: 0.1,
            rotor_response_delay: 0.1,
            rotor_smoothness: 8.0,
            rotor_acceleration: 2.0,
            rotor_deceleration: 3.0,
            mouse_sensitivity: 0.0015,
            mouse_return_rate: 2.0,
            bindings: KeyBindings::default(),
        }
    }
}

/// Device input sampling + command filtering, every frame.
pub struct ControlsPlugin(pub ControlsConfig);

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<ControlsConfig>()
            .register_type::<ControlCommand>()
            .register_type::<RawAxes>()
            .register_type::<AxisFilter>()
            .insert_resource(self.0.clone())
            .add_systems(
                Update,
                (
                    systems::sample_keyboard,
                    systems::sample_gamepad,
                    systems::sample_mouse,
                    systems::sample_external,
                    systems::filter_axes,
                )
                    .chain(),
            );
    }
}
