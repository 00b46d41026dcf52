//! AI steering: obstacle avoidance, target selection and command synthesis.
//!
//! An [`Autopilot`] component replaces a device rig as a drone's input
//! source. Each frame it fans probe rays ahead of the drone to accumulate an
//! avoidance vector, picks a target point for its fixed steering mode, and
//! converts the combined direction into the same 4-axis [`ControlCommand`]
//! a human pilot would produce, optionally routed through per-axis PID
//! controllers.

mod entities;
mod systems;

pub use entities::{Autopilot, Obstacle, SteeringMode};

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded RNG for wander targets and random waypoint picks, so fleet runs
/// replay deterministically.
#[derive(Resource)]
pub struct SteeringRng(pub ChaCha8Rng);

impl SteeringRng {
    /// RNG seeded from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Default for SteeringRng {
    fn default() -> Self {
        Self::seeded(42)
    }
}

/// Autopilot steering, every frame, for authoritative autopilot drones.
pub struct AutopilotPlugin;

impl Plugin for AutopilotPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Autopilot>()
            .register_type::<Obstacle>()
            .register_type::<SteeringMode>()
            .init_resource::<SteeringRng>()
            .add_systems(Update, systems::steer);
    }
}
