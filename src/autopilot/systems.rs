use bevy::log::warn;
use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::SteeringRng;
use super::entities::{Autopilot, Obstacle, SteeringMode};
use crate::controls::ControlCommand;
use crate::fleet::Authority;
use crate::math;

/// Next waypoint index with wraparound.
fn advance_wrap(index: usize, count: usize) -> usize {
    (index + 1) % count
}

/// Next waypoint index for ping-pong sweeps: advance in the current
/// direction, bouncing at both ends of the list.
fn advance_ping_pong(index: usize, forward: bool, count: usize) -> (usize, bool) {
    if count < 2 {
        return (0, forward);
    }
    if forward {
        if index + 1 >= count {
            (count - 2, false)
        } else {
            (index + 1, true)
        }
    } else if index == 0 {
        (1, true)
    } else {
        (index - 1, false)
    }
}

/// Uniform random point inside a sphere of `radius`, by rejection sampling.
fn random_in_sphere(rng: &mut ChaCha8Rng, radius: f32) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v * radius;
        }
    }
}

/// Accumulated avoidance vector from the probe-ray fan.
///
/// Each ray sphere-casts against the obstacle set; a hit contributes a steer
/// direction weighted by how close it is, and the vertical component is
/// discarded. Contributions sum unnormalized, optionally capped by
/// `avoidance_limit`.
pub(super) fn detect_obstacles(
    this: Entity,
    transform: &Transform,
    pilot: &Autopilot,
    obstacles: &[(Entity, Vec3, f32)],
) -> Vec3 {
    let forward: Vec3 = *transform.forward();
    let right: Vec3 = *transform.right();
    let origin = transform.translation;
    let mut avoidance = Vec3::ZERO;

    for i in 0..pilot.ray_count {
        let angle = math::fan_angle(i, pilot.ray_count, pilot.ray_spread);
        // Clockwise-positive yaw offset about +Y.
        let mut ray_dir = Quat::from_rotation_y(-angle.to_radians()) * forward;
        if !pilot.local_forward_rays {
            ray_dir.y = 0.0;
        }
        let Some(ray_dir) = ray_dir.try_normalize() else {
            continue;
        };

        // Nearest obstacle along this ray, probe radius inflated onto the
        // target sphere (equivalent to a sphere cast).
        let mut nearest: Option<(f32, Vec3)> = None;
        for &(entity, center, radius) in obstacles {
            if entity == this {
                continue;
            }
            if let Some(dist) =
                math::ray_sphere_intersection(origin, ray_dir, center, radius + pilot.probe_radius)
                && dist <= pilot.detection_distance
                && nearest.is_none_or(|(best, _)| dist < best)
            {
                nearest = Some((dist, center));
            }
        }

        let Some((dist, center)) = nearest else {
            continue;
        };
        let hit_point = origin + ray_dir * dist;
        let distance_factor = (pilot.detection_distance - dist) / pilot.detection_distance;
        let away = (origin - hit_point).normalize_or_zero();

        if pilot.local_forward_rays {
            let normal = (hit_point - center).normalize_or_zero();
            avoidance += (away + math::reflect(ray_dir, normal)) * distance_factor;
        } else {
            // Steer laterally, away from whichever side the obstacle sits on.
            let side = math::signed_angle_y(forward, away);
            let steer = if side > 0.0 { right } else { -right };
            avoidance += steer * distance_factor;
        }
        avoidance.y = 0.0;
    }

    if avoidance.length() > pilot.avoidance_limit {
        avoidance = avoidance.normalize() * pilot.avoidance_limit;
    }
    avoidance
}

/// Picks the current target point for the pilot's mode, advancing waypoint
/// cursors and wander timers as they trip. `None` means the configuration
/// has degraded (no waypoints, dangling follow target) and only avoidance
/// steering remains.
fn select_target(
    pilot: &mut Autopilot,
    position: Vec3,
    dt: f32,
    rng: &mut ChaCha8Rng,
    transforms: &Query<&Transform>,
) -> Option<Vec3> {
    match pilot.mode {
        SteeringMode::Follow(target) => match transforms.get(target) {
            Ok(t) => Some(t.translation),
            Err(_) => {
                if !pilot.warned_degraded {
                    warn!("autopilot follow target is gone; steering by avoidance only");
                    pilot.warned_degraded = true;
                }
                None
            }
        },
        SteeringMode::Wander => {
            pilot.wander_elapsed = if pilot.wander_elapsed >= pilot.wander_timer {
                pilot.wander_target = Some(position + random_in_sphere(rng, pilot.wander_radius));
                0.0
            } else {
                pilot.wander_elapsed + dt
            };
            pilot.wander_target
        }
        SteeringMode::Waypoint | SteeringMode::WaypointRandom | SteeringMode::WaypointPingPong => {
            let count = pilot.waypoints.len();
            if count == 0 {
                if !pilot.warned_degraded {
                    warn!("autopilot has no waypoints; steering by avoidance only");
                    pilot.warned_degraded = true;
                }
                return None;
            }
            pilot.waypoint_index = pilot.waypoint_index.min(count - 1);
            let target = pilot.waypoints[pilot.waypoint_index];
            if position.distance(target) < pilot.stop_distance {
                match pilot.mode {
                    SteeringMode::Waypoint => {
                        pilot.waypoint_index = advance_wrap(pilot.waypoint_index, count);
                    }
                    SteeringMode::WaypointRandom => {
                        pilot.waypoint_index = rng.gen_range(0..count);
                    }
                    SteeringMode::WaypointPingPong => {
                        let (index, forward) =
                            advance_ping_pong(pilot.waypoint_index, pilot.ping_pong_forward, count);
                        pilot.waypoint_index = index;
                        pilot.ping_pong_forward = forward;
                    }
                    _ => unreachable!(),
                }
            }
            Some(target)
        }
    }
}

/// Converts a target direction + avoidance vector into the published
/// command for one drone.
fn synthesize_command(
    transform: &Transform,
    pilot: &mut Autopilot,
    command: &mut ControlCommand,
    target: Option<Vec3>,
    avoidance: Vec3,
    dt: f32,
    pid_dt: f32,
) {
    let forward: Vec3 = *transform.forward();
    let right: Vec3 = *transform.right();
    let to_target = target
        .map(|t| (t - transform.translation).normalize_or_zero())
        .unwrap_or(Vec3::ZERO);
    let direction = to_target + avoidance;

    let mut desired_roll = right.dot(direction);
    let mut desired_pitch = forward.dot(direction);
    let mut desired_lift = direction.y;
    let mut desired_yaw = math::signed_angle_y(forward, direction) / 360.0 * 2.0;

    if pilot.use_pid {
        desired_roll = pilot.pid_roll.seek(desired_roll, command.roll, pid_dt);
        desired_pitch = pilot.pid_pitch.seek(desired_pitch, command.pitch, pid_dt);
        desired_lift = pilot.pid_lift.seek(desired_lift, command.lift, pid_dt);
        desired_yaw = math::signed_angle_y(forward, direction) / 360.0;
    }

    // Degenerate direction (no target, clear fan): desired axes are all
    // zero and the command decays toward neutral below.
    if direction == Vec3::ZERO {
        desired_roll = 0.0;
        desired_pitch = 0.0;
        desired_lift = 0.0;
        desired_yaw = 0.0;
    }

    let t = pilot.lerp_speed * dt;
    command.publish([
        math::lerp(command.pitch, desired_pitch.clamp(-1.0, 1.0), t),
        math::lerp(command.roll, desired_roll.clamp(-1.0, 1.0), t),
        math::lerp(command.yaw, desired_yaw.clamp(-1.0, 1.0), t),
        math::lerp(command.lift, desired_lift.clamp(-1.0, 1.0), t),
    ]);
}

/// Per-frame steering pass for every authoritative autopilot drone.
pub fn steer(
    time: Res<Time>,
    fixed: Res<Time<Fixed>>,
    mut rng: ResMut<SteeringRng>,
    transforms: Query<&Transform>,
    obstacle_query: Query<(Entity, &Transform, &Obstacle)>,
    mut pilots: Query<
        (Entity, &Transform, &mut Autopilot, &mut ControlCommand),
        With<Authority>,
    >,
) {
    let dt = time.delta_secs();
    let pid_dt = fixed.delta_secs();
    let obstacles: Vec<(Entity, Vec3, f32)> = obstacle_query
        .iter()
        .map(|(entity, transform, obstacle)| (entity, transform.translation, obstacle.radius))
        .collect();

    for (entity, transform, mut pilot, mut command) in &mut pilots {
        let avoidance = detect_obstacles(entity, transform, &pilot, &obstacles);
        let target = select_target(&mut pilot, transform.translation, dt, &mut rng.0, &transforms);
        synthesize_command(transform, &mut pilot, &mut command, target, avoidance, dt, pid_dt);
    }
}
