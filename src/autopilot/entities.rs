use bevy::prelude::*;

use crate::pid::PidController;

/// Target-selection mode, fixed for the lifetime of one autopilot instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum SteeringMode {
    /// Chase another entity's current position.
    Follow(Entity),
    /// Pick a fresh random point near the drone on a timer.
    Wander,
    /// Visit the waypoint list in order, wrapping to the start.
    Waypoint,
    /// Visit the waypoint list in uniform-random order.
    WaypointRandom,
    /// Sweep the waypoint list forward then backward, bouncing at both ends.
    WaypointPingPong,
}

/// A sensed obstacle: a sphere of `radius` around the entity's translation.
///
/// Probe rays test against these instead of a physics engine's colliders.
#[derive(Component, Clone, Copy, Debug, Reflect)]
pub struct Obstacle {
    /// Sphere radius in world units.
    pub radius: f32,
}

/// AI input source for one drone.
///
/// Carries its whole configuration per instance (the way each drone in the
/// fleet can fly a different patrol), plus the retained steering state:
/// waypoint cursor, ping-pong direction, wander timer and the optional PID
/// controllers.
#[derive(Component, Clone, Debug, Reflect)]
pub struct Autopilot {
    /// Steering mode; never changes at runtime.
    pub mode: SteeringMode,
    /// Ordered patrol points for the waypoint modes.
    pub waypoints: Vec<Vec3>,
    /// Rate at which the published command chases the desired command.
    pub lerp_speed: f32,
    /// Distance below which the current target counts as reached.
    pub stop_distance: f32,
    /// Radius of the wander sphere around the drone.
    pub wander_radius: f32,
    /// Seconds between wander target re-rolls.
    pub wander_timer: f32,
    /// Number of probe rays in the detection fan.
    pub ray_count: usize,
    /// Total fan spread in degrees, centered on the heading.
    pub ray_spread: f32,
    /// Maximum obstacle detection range.
    pub detection_distance: f32,
    /// Radius of the spherical probe swept along each ray.
    pub probe_radius: f32,
    /// Keep the fan aligned with the tilted body axis instead of flattening
    /// rays onto the horizontal plane, and steer by surface reflection.
    pub local_forward_rays: bool,
    /// Cap on the accumulated avoidance vector's length. The default
    /// `INFINITY` preserves the unnormalized sum, where a dense fan can
    /// outweigh the target direction.
    pub avoidance_limit: f32,
    /// Route roll/pitch/lift through the PID controllers instead of using
    /// the raw heuristic values.
    pub use_pid: bool,
    /// PID for the roll axis.
    pub pid_roll: PidController,
    /// PID for the pitch axis.
    pub pid_pitch: PidController,
    /// PID for the lift axis.
    pub pid_lift: PidController,
    pub(crate) waypoint_index: usize,
    pub(crate) ping_pong_forward: bool,
    pub(crate) wander_elapsed: f32,
    pub(crate) wander_target: Option<Vec3>,
    pub(crate) warned_degraded: bool,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            mode: SteeringMode::Waypoint,
            waypoints: Vec::new(),
            lerp_speed: 5.0,
            stop_distance: 1.0,
            wander_radius: 5.0,
            wander_timer: 3.0,
            ray_count: 5,
            ray_spread: 45.0,
            detection_distance: 5.0,
            probe_radius: 0.5,
            local_forward_rays: false,
            avoidance_limit: f32::INFINITY,
            use_pid: false,
            pid_roll: PidController::default(),
            pid_pitch: PidController::default(),
            pid_lift: PidController::default(),
            waypoint_index: 0,
            ping_pong_forward: true,
            // Expired from the start so the first wander pass rolls a target.
            wander_elapsed: f32::MAX,
            wander_target: None,
            warned_degraded: false,
        }
    }
}

impl Autopilot {
    /// Autopilot in the given mode with everything else at defaults.
    pub fn with_mode(mode: SteeringMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Waypoint autopilot over `waypoints`.
    pub fn patrol(waypoints: Vec<Vec3>) -> Self {
        Self {
            mode: SteeringMode::Waypoint,
            waypoints,
            ..Self::default()
        }
    }

    /// Index of the waypoint currently being flown toward.
    pub fn waypoint_index(&self) -> usize {
        self.waypoint_index
    }

    /// Clears retained steering state: PID accumulators, wander target and
    /// the waypoint cursor.
    pub fn reset(&mut self) {
        self.pid_roll.reset();
        self.pid_pitch.reset();
        self.pid_lift.reset();
        self.waypoint_index = 0;
        self.ping_pong_forward = true;
        self.wander_elapsed = f32::MAX;
        self.wander_target = None;
    }
}
