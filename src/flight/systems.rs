use bevy::prelude::*;

use super::FlightConfig;
use super::entities::{FlightState, Rotor, Velocity};
use crate::controls::ControlCommand;
use crate::fleet::Authority;
use crate::math;

/// Smooths and clamps the Euler angles toward the commanded targets and
/// composes the absolute orientation for this tick.
pub fn integrate_rotation(
    time: Res<Time<Fixed>>,
    cfg: Res<FlightConfig>,
    mut query: Query<(&ControlCommand, &mut FlightState, &mut Transform), With<Authority>>,
) {
    let dt = time.delta_secs();
    for (command, mut state, mut transform) in &mut query {
        let pitch_target = command.pitch * cfg.pitch_amount;
        let roll_target = -command.roll * cfg.roll_amount;
        state.yaw += command.yaw * cfg.yaw_amount;

        state.current_pitch = if cfg.disable_pitch {
            0.0
        } else {
            math::lerp(state.current_pitch, pitch_target, cfg.rotation_lerp_speed * dt)
        };
        state.current_roll = if cfg.disable_roll {
            0.0
        } else {
            math::lerp(state.current_roll, roll_target, cfg.rotation_lerp_speed * dt)
        };
        state.current_yaw = if cfg.disable_yaw {
            0.0
        } else {
            math::lerp(state.current_yaw, state.yaw, cfg.rotation_lerp_speed * dt)
        };

        if cfg.auto_forward {
            state.current_pitch = cfg.pitch_amount;
        }

        if !cfg.ignore_rotation_limits {
            state.current_pitch = state.current_pitch.clamp(cfg.pitch_limit.x, cfg.pitch_limit.y);
            state.current_roll = state.current_roll.clamp(cfg.roll_limit.x, cfg.roll_limit.y);
        }

        // Command convention is clockwise-positive yaw and nose-down-positive
        // pitch; both map to negative right-handed rotations.
        transform.rotation = Quat::from_euler(
            EulerRot::YXZ,
            -state.current_yaw.to_radians(),
            -state.current_pitch.to_radians(),
            state.current_roll.to_radians(),
        );
    }
}

/// Converts the command into lift/forward/side forces and integrates them
/// into velocity, with gravity and linear damping.
pub fn apply_throttle(
    time: Res<Time<Fixed>>,
    cfg: Res<FlightConfig>,
    mut query: Query<(&ControlCommand, &mut Velocity, &Transform), With<Authority>>,
) {
    let dt = time.delta_secs();
    let elapsed = time.elapsed_secs();
    for (command, mut velocity, transform) in &mut query {
        let forward: Vec3 = *transform.forward();
        let right: Vec3 = *transform.right();

        // Gravity-compensated lift keeps an idle drone hovering; with
        // gravity_when_idle the compensation term is dropped and an idle
        // drone free-falls.
        let upward = if cfg.gravity_when_idle {
            command.lift * cfg.max_speed
        } else {
            velocity.mass * cfg.gravity + command.lift * cfg.max_speed
        };
        let mut lift_force = Vec3::Y * upward;

        let mut forward_force = if cfg.disable_pitch {
            Vec3::ZERO
        } else {
            command.pitch * cfg.max_speed * forward
        };
        if cfg.auto_forward {
            forward_force = cfg.max_speed * forward;
        }
        let mut side_force = if cfg.disable_roll {
            Vec3::ZERO
        } else {
            command.roll * cfg.max_speed * right
        };

        if cfg.maintain_altitude {
            forward_force.y = 0.0;
            side_force.y = 0.0;
        }

        if cfg.hover && command.idle {
            lift_force += Vec3::Y * (elapsed * cfg.hover_frequency).sin() * cfg.hover_amplitude;
        }

        let force = lift_force + forward_force + side_force;
        let acceleration = force / velocity.mass + Vec3::NEG_Y * cfg.gravity;
        velocity.linear += acceleration * dt;
        velocity.linear /= 1.0 + cfg.linear_damping * dt;
    }
}

/// Applies velocity to position.
pub fn integrate_velocity(
    time: Res<Time<Fixed>>,
    mut query: Query<(&Velocity, &mut Transform), With<Authority>>,
) {
    let dt = time.delta_secs();
    for (velocity, mut transform) in &mut query {
        transform.translation += velocity.linear * dt;
    }
}

/// Ground probe, landing deceleration and floor clamp.
pub fn ground_effects(
    time: Res<Time<Fixed>>,
    cfg: Res<FlightConfig>,
    mut query: Query<(&mut Velocity, &mut FlightState, &mut Transform), With<Authority>>,
) {
    let dt = time.delta_secs();
    for (mut velocity, mut state, mut transform) in &mut query {
        let altitude = transform.translation.y - cfg.ground_height;
        state.grounded = altitude <= cfg.ground_check_distance;

        if state.grounded && cfg.decelerate_on_ground && velocity.linear != Vec3::ZERO {
            velocity.linear = math::damp_toward_zero(velocity.linear, cfg.ground_deceleration, dt);
        }

        // The floor plane is the only collider; clamp instead of sinking.
        if altitude < 0.0 {
            transform.translation.y = cfg.ground_height;
            if velocity.linear.y < 0.0 {
                velocity.linear.y = 0.0;
            }
        }
    }
}

/// Spins rotor visuals from their drone's motion; parked rotors wind down
/// at a fixed rate.
pub fn spin_rotors(
    time: Res<Time>,
    cfg: Res<FlightConfig>,
    drones: Query<(&Velocity, &FlightState, &ControlCommand)>,
    mut rotors: Query<(&mut Transform, &mut Rotor)>,
) {
    let dt = time.delta_secs();
    for (mut transform, mut rotor) in &mut rotors {
        let Ok((velocity, state, command)) = drones.get(rotor.drone) else {
            continue;
        };
        let airborne = !state.grounded;

        if airborne || !command.idle {
            let factor =
                (velocity.linear.length() / cfg.max_speed).clamp(cfg.rotor_min_speed_factor, 1.0);
            rotor.speed = factor * cfg.rotor_spin_speed;
        } else {
            rotor.speed = math::move_toward(rotor.speed, 0.0, cfg.rotor_wind_down * dt);
        }

        let step = rotor.speed * dt;
        let signed = if rotor.inverse { step } else { -step };
        transform.rotate_local_y(signed.to_radians());
    }
}
