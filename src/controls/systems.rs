use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;

use super::ControlsConfig;
use super::entities::{
    AxisFilter, ControlCommand, ExternalAxes, GamepadRig, KeyboardRig, MouseRig, RawAxes,
};
use crate::fleet::Authority;
use crate::math;

/// -1/0/+1 from a digital key pair, positive key winning.
fn digital_axis(keys: &ButtonInput<KeyCode>, positive: KeyCode, negative: KeyCode) -> f32 {
    if keys.pressed(positive) {
        1.0
    } else if keys.pressed(negative) {
        -1.0
    } else {
        0.0
    }
}

/// Samples the keyboard bindings into [`RawAxes`] for keyboard-rigged drones.
pub fn sample_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    cfg: Res<ControlsConfig>,
    mut query: Query<&mut RawAxes, (With<KeyboardRig>, With<Authority>)>,
) {
    let b = &cfg.bindings;
    let axes = [
        digital_axis(&keys, b.pitch_forward, b.pitch_backward),
        digital_axis(&keys, b.roll_right, b.roll_left),
        digital_axis(&keys, b.yaw_right, b.yaw_left),
        digital_axis(&keys, b.lift_up, b.lift_down),
    ];
    for mut raw in &mut query {
        raw.0 = axes;
    }
}

/// Samples the first connected gamepad into [`RawAxes`], dead-zone remapped.
pub fn sample_gamepad(
    pads: Query<&Gamepad>,
    cfg: Res<ControlsConfig>,
    mut query: Query<&mut RawAxes, (With<GamepadRig>, With<Authority>)>,
) {
    let Some(pad) = pads.iter().next() else {
        return;
    };
    let left = pad.left_stick();
    let right = pad.right_stick();
    let axes = [
        math::remap_deadzone(left.y, cfg.dead_zone),
        math::remap_deadzone(left.x, cfg.dead_zone),
        math::remap_deadzone(right.x, cfg.dead_zone),
        math::remap_deadzone(right.y, cfg.dead_zone),
    ];
    for mut raw in &mut query {
        raw.0 = axes;
    }
}

/// Deflects mouse-rigged drones' virtual stick from accumulated mouse motion;
/// the stick recenters while the mouse rests. Yaw/lift fall back to the
/// arrow-key bindings.
pub fn sample_mouse(
    mut motion: MessageReader<MouseMotion>,
    keys: Res<ButtonInput<KeyCode>>,
    cfg: Res<ControlsConfig>,
    time: Res<Time>,
    mut query: Query<(&mut MouseRig, &mut RawAxes), With<Authority>>,
) {
    let mut delta = Vec2::ZERO;
    for ev in motion.read() {
        delta += ev.delta;
    }
    let dt = time.delta_secs();
    let b = &cfg.bindings;
    for (mut rig, mut raw) in &mut query {
        if delta != Vec2::ZERO {
            rig.stick.x = (rig.stick.x + delta.x * cfg.mouse_sensitivity).clamp(-1.0, 1.0);
            rig.stick.y = (rig.stick.y - delta.y * cfg.mouse_sensitivity).clamp(-1.0, 1.0);
        } else {
            rig.stick.x = math::lerp(rig.stick.x, 0.0, dt * cfg.mouse_return_rate);
            rig.stick.y = math::lerp(rig.stick.y, 0.0, dt * cfg.mouse_return_rate);
        }
        raw.0 = [
            rig.stick.y,
            rig.stick.x,
            digital_axis(&keys, b.yaw_right, b.yaw_left),
            digital_axis(&keys, b.lift_up, b.lift_down),
        ];
    }
}

/// Copies externally pushed axes into [`RawAxes`], clamped to range.
pub fn sample_external(
    mut query: Query<(&ExternalAxes, &mut RawAxes), With<Authority>>,
) {
    for (external, mut raw) in &mut query {
        raw.0 = external.0.map(|v| v.clamp(-1.0, 1.0));
    }
}

/// Runs the three-stage filter over the sampled raw axes and publishes the
/// resulting [`ControlCommand`].
pub fn filter_axes(
    time: Res<Time>,
    cfg: Res<ControlsConfig>,
    mut query: Query<(&RawAxes, &mut AxisFilter, &mut ControlCommand), With<Authority>>,
) {
    let dt = time.delta_secs();
    for (raw, mut filter, mut command) in &mut query {
        let out = filter.advance(raw.0, &cfg, dt);
        command.publish(out);
    }
}
