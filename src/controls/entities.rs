use bevy::prelude::*;

use super::ControlsConfig;
use crate::math;

/// The normalized 4-axis intent signal handed to the flight integrator.
///
/// All axes are clamped to `[-1, 1]` on publish; `idle` is true when every
/// axis sits inside the 0.05 dead band, gating idle-only behaviors such as
/// the hover bob.
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
pub struct ControlCommand {
    /// Forward/backward intent.
    pub pitch: f32,
    /// Right/left strafe intent.
    pub roll: f32,
    /// Clockwise/counter-clockwise heading intent.
    pub yaw: f32,
    /// Up/down thrust intent.
    pub lift: f32,
    /// True when all four axes are within ±0.05 of center.
    pub idle: bool,
}

impl ControlCommand {
    /// Clamps and stores a `[pitch, roll, yaw, lift]` sample, re-evaluating
    /// the idle flag.
    pub fn publish(&mut self, axes: [f32; 4]) {
        self.pitch = axes[0].clamp(-1.0, 1.0);
        self.roll = axes[1].clamp(-1.0, 1.0);
        self.yaw = axes[2].clamp(-1.0, 1.0);
        self.lift = axes[3].clamp(-1.0, 1.0);
        self.idle = self.pitch.abs() <= 0.05
            && self.roll.abs() <= 0.05
            && self.yaw.abs() <= 0.05
            && self.lift.abs() <= 0.05;
    }

    /// The command as a `[pitch, roll, yaw, lift]` array.
    pub fn axes(&self) -> [f32; 4] {
        [self.pitch, self.roll, self.yaw, self.lift]
    }
}

/// Unfiltered `[pitch, roll, yaw, lift]` sample written by the active device
/// source each frame, before any smoothing.
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
pub struct RawAxes(pub [f32; 4]);

/// Retained state of the three-stage input filter for one drone.
///
/// Stage one ramps a target toward the raw sample at a capped rate
/// (asymmetric: pushing away from center vs. returning). Stage two
/// exponentially smooths a current value toward that target. Stage three
/// models actuator lag: a delayed lerp followed by rotor-rate smoothing.
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
pub struct AxisFilter {
    target: [f32; 4],
    current: [f32; 4],
    rotor: [f32; 4],
}

impl AxisFilter {
    /// Advances all four axes by one frame and returns the filtered values,
    /// each clamped to `[-1, 1]`.
    pub fn advance(&mut self, raw: [f32; 4], cfg: &ControlsConfig, dt: f32) -> [f32; 4] {
        // Floor so a zero delay never divides the step to infinity.
        let delay = cfg.rotor_response_delay.max(0.01);
        let mut out = [0.0; 4];
        for i in 0..4 {
            let rate = if raw[i].abs() > 0.1 {
                cfg.input_acceleration
            } else {
                cfg.input_deceleration
            };
            self.target[i] = math::move_toward(self.target[i], raw[i], dt * rate);
            self.current[i] = math::lerp(self.current[i], self.target[i], dt * cfg.input_smoothness);

            let delayed = math::lerp(self.rotor[i], self.current[i], dt / delay);
            let rotor_rate = if self.current[i].abs() > 0.1 {
                cfg.rotor_acceleration
            } else {
                cfg.rotor_deceleration
            };
            self.rotor[i] = math::lerp(self.rotor[i], delayed, dt * cfg.rotor_smoothness * rotor_rate);
            out[i] = self.rotor[i].clamp(-1.0, 1.0);
        }
        out
    }
}

/// Key bindings for the keyboard source.
#[derive(Clone, Copy, Debug, Reflect)]
pub struct KeyBindings {
    /// Pitch forward.
    pub pitch_forward: KeyCode,
    /// Pitch backward.
    pub pitch_backward: KeyCode,
    /// Roll (strafe) left.
    pub roll_left: KeyCode,
    /// Roll (strafe) right.
    pub roll_right: KeyCode,
    /// Yaw left.
    pub yaw_left: KeyCode,
    /// Yaw right.
    pub yaw_right: KeyCode,
    /// Climb.
    pub lift_up: KeyCode,
    /// Descend.
    pub lift_down: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            pitch_forward: KeyCode::KeyW,
            pitch_backward: KeyCode::KeyS,
            roll_left: KeyCode::KeyA,
            roll_right: KeyCode::KeyD,
            yaw_left: KeyCode::ArrowLeft,
            yaw_right: KeyCode::ArrowRight,
            lift_up: KeyCode::ArrowUp,
            lift_down: KeyCode::ArrowDown,
        }
    }
}

/// Digital keyboard source: each axis reads -1, 0 or +1 from its key pair.
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
pub struct KeyboardRig;

/// Analog gamepad source: left stick = roll/pitch, right stick = yaw/lift,
/// dead-zone remapped.
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
pub struct GamepadRig;

/// Mouse source: motion deflects a virtual stick for pitch/roll that
/// recenters when the mouse rests; yaw/lift come from the arrow keys.
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
pub struct MouseRig {
    /// Current virtual stick deflection (x = roll, y = pitch).
    pub stick: Vec2,
}

/// Externally fed source: raw axes pushed in by code rather than a device.
///
/// Covers touch panels, scripted scenarios and replicated remote pilots; in
/// tests it doubles as mock input.
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
pub struct ExternalAxes(pub [f32; 4]);
