//! Pure computation helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / `Vec3` inputs, making them straightforward to unit-test.

use bevy::math::Vec3;

/// Linear interpolation with the interpolant clamped to `[0, 1]`.
///
/// The clamp means a smoothing step can never overshoot its target, even when
/// `dt * rate` exceeds one on a long frame.
///
/// # Examples
/// ```
/// # use drone_fleet::math::lerp;
/// assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
/// assert_eq!(lerp(0.0, 10.0, 3.0), 10.0);
/// ```
pub fn lerp(current: f32, target: f32, t: f32) -> f32 {
    current + (target - current) * t.clamp(0.0, 1.0)
}

/// Moves `current` toward `target` by at most `max_delta`, never overshooting.
///
/// A negative `max_delta` is treated as zero (no movement).
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    let step = max_delta.max(0.0);
    let delta = target - current;
    if delta.abs() <= step {
        target
    } else {
        current + delta.signum() * step
    }
}

/// Dead-zone remap for analog axes.
///
/// Values with magnitude below `dead_zone` collapse to zero; the remainder is
/// rescaled so the output still spans the full `[-1, 1]` range:
/// `sign * (|v| - dz) / (1 - dz)`.
///
/// # Examples
/// ```
/// # use drone_fleet::math::remap_deadzone;
/// assert_eq!(remap_deadzone(0.05, 0.1), 0.0);
/// assert_eq!(remap_deadzone(1.0, 0.1), 1.0);
/// ```
pub fn remap_deadzone(value: f32, dead_zone: f32) -> f32 {
    let dz = dead_zone.clamp(0.0, 0.9);
    if value.abs() < dz {
        return 0.0;
    }
    value.signum() * (value.abs() - dz) / (1.0 - dz)
}

/// Signed angle in degrees from `from` to `to`, measured around the +Y axis.
///
/// Both vectors are flattened onto the XZ plane first. Returns zero when
/// either flattened vector is degenerate. The sign convention is clockwise-
/// positive viewed from above, so a turn from `-Z` (forward) toward `+X`
/// (right) is positive.
pub fn signed_angle_y(from: Vec3, to: Vec3) -> f32 {
    let a = Vec3::new(from.x, 0.0, from.z);
    let b = Vec3::new(to.x, 0.0, to.z);
    if a.length_squared() < 1e-8 || b.length_squared() < 1e-8 {
        return 0.0;
    }
    let a = a.normalize();
    let b = b.normalize();
    let cross_y = a.z * b.x - a.x * b.z;
    -cross_y.atan2(a.dot(b)).to_degrees()
}

/// Distance along a ray to the first intersection with a sphere.
///
/// `dir` must be normalized. Returns `None` when the ray misses or the sphere
/// lies behind the origin. An origin already inside the sphere reports a hit
/// at distance zero.
pub fn ray_sphere_intersection(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    if to_center.length_squared() <= radius * radius {
        return Some(0.0);
    }
    let projection = to_center.dot(dir);
    if projection < 0.0 {
        return None;
    }
    let closest_sq = to_center.length_squared() - projection * projection;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - closest_sq).sqrt();
    Some(projection - half_chord)
}

/// Yaw offset in degrees for ray `index` of a fan of `count` rays spread
/// symmetrically across `spread` degrees.
///
/// A fan of one ray points straight ahead.
pub fn fan_angle(index: usize, count: usize, spread: f32) -> f32 {
    if count <= 1 {
        return 0.0;
    }
    let increment = spread / (count - 1) as f32;
    -spread / 2.0 + increment * index as f32
}

/// Reflects `dir` across the plane defined by `normal` (which must be
/// normalized).
pub fn reflect(dir: Vec3, normal: Vec3) -> Vec3 {
    dir - 2.0 * dir.dot(normal) * normal
}

/// Damps a velocity toward zero at `rate` per second.
///
/// The effective shrink factor is clamped to one, so a single step reduces
/// the vector monotonically and never reverses it, regardless of `dt`.
pub fn damp_toward_zero(velocity: Vec3, rate: f32, dt: f32) -> Vec3 {
    velocity * (1.0 - (rate * dt).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── lerp ────────────────────────────────────────────────────────

    #[test]
    fn lerp_midpoint() {
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn lerp_clamps_overshoot() {
        assert_eq!(lerp(0.0, 1.0, 5.0), 1.0);
        assert_eq!(lerp(0.0, 1.0, -2.0), 0.0);
    }

    // ── move_toward ─────────────────────────────────────────────────

    #[test]
    fn move_toward_steps_by_delta() {
        assert_eq!(move_toward(0.0, 1.0, 0.25), 0.25);
        assert_eq!(move_toward(1.0, 0.0, 0.25), 0.75);
    }

    #[test]
    fn move_toward_never_overshoots() {
        assert_eq!(move_toward(0.9, 1.0, 0.5), 1.0);
    }

    #[test]
    fn move_toward_negative_delta_is_inert() {
        assert_eq!(move_toward(0.5, 1.0, -1.0), 0.5);
    }

    // ── remap_deadzone ──────────────────────────────────────────────

    #[test]
    fn deadzone_suppresses_small_values() {
        assert_eq!(remap_deadzone(0.09, 0.1), 0.0);
        assert_eq!(remap_deadzone(-0.09, 0.1), 0.0);
    }

    #[test]
    fn deadzone_preserves_full_range() {
        assert!((remap_deadzone(1.0, 0.1) - 1.0).abs() < 1e-6);
        assert!((remap_deadzone(-1.0, 0.1) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn deadzone_edge_rescales_to_zero() {
        assert!(remap_deadzone(0.1, 0.1).abs() < 1e-6);
    }

    // ── signed_angle_y ──────────────────────────────────────────────

    #[test]
    fn signed_angle_zero_for_parallel() {
        assert!(signed_angle_y(Vec3::NEG_Z, Vec3::NEG_Z).abs() < 1e-4);
    }

    #[test]
    fn signed_angle_quarter_turns() {
        let angle = signed_angle_y(Vec3::NEG_Z, Vec3::X);
        assert!((angle - 90.0).abs() < 1e-3, "angle = {angle}");
        let angle = signed_angle_y(Vec3::NEG_Z, Vec3::NEG_X);
        assert!((angle + 90.0).abs() < 1e-3, "angle = {angle}");
    }

    #[test]
    fn signed_angle_ignores_vertical_component() {
        let angle = signed_angle_y(Vec3::new(0.0, 5.0, -1.0), Vec3::new(1.0, -3.0, 0.0));
        assert!((angle - 90.0).abs() < 1e-3, "angle = {angle}");
    }

    #[test]
    fn signed_angle_degenerate_is_zero() {
        assert_eq!(signed_angle_y(Vec3::Y, Vec3::Z), 0.0);
    }

    // ── ray_sphere_intersection ─────────────────────────────────────

    #[test]
    fn ray_hits_sphere_dead_ahead() {
        let hit = ray_sphere_intersection(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 1.0);
        assert!((hit.unwrap() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn ray_misses_offset_sphere() {
        let hit = ray_sphere_intersection(Vec3::ZERO, Vec3::Z, Vec3::new(3.0, 0.0, 5.0), 1.0);
        assert!(hit.is_none());
    }

    #[test]
    fn ray_ignores_sphere_behind_origin() {
        let hit = ray_sphere_intersection(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -5.0), 1.0);
        assert!(hit.is_none());
    }

    #[test]
    fn ray_inside_sphere_hits_at_zero() {
        let hit = ray_sphere_intersection(Vec3::ZERO, Vec3::Z, Vec3::new(0.2, 0.0, 0.0), 1.0);
        assert_eq!(hit, Some(0.0));
    }

    // ── fan_angle ───────────────────────────────────────────────────

    #[test]
    fn fan_spans_spread_symmetrically() {
        assert_eq!(fan_angle(0, 5, 45.0), -22.5);
        assert_eq!(fan_angle(2, 5, 45.0), 0.0);
        assert_eq!(fan_angle(4, 5, 45.0), 22.5);
    }

    #[test]
    fn single_ray_fan_points_forward() {
        assert_eq!(fan_angle(0, 1, 45.0), 0.0);
    }

    // ── reflect ─────────────────────────────────────────────────────

    #[test]
    fn reflect_off_facing_plane() {
        let reflected = reflect(Vec3::Z, Vec3::NEG_Z);
        assert!((reflected - Vec3::NEG_Z).length() < 1e-6);
    }

    // ── damp_toward_zero ────────────────────────────────────────────

    #[test]
    fn damping_shrinks_monotonically() {
        let v = Vec3::new(3.0, 0.0, 4.0);
        let damped = damp_toward_zero(v, 4.0, 1.0 / 60.0);
        assert!(damped.length() < v.length());
        assert!(damped.dot(v) > 0.0, "damping must not reverse direction");
    }

    #[test]
    fn damping_never_overshoots_past_zero() {
        let v = Vec3::new(1.0, 0.0, 0.0);
        let damped = damp_toward_zero(v, 1000.0, 1.0);
        assert_eq!(damped, Vec3::ZERO);
    }
}
