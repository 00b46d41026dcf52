//! Per-axis proportional-integral-derivative controller.
//!
//! Used by the autopilot to chase a moving setpoint (the heuristic desired
//! axis value) with the published command as the process variable. One
//! instance owns exactly one axis of one drone.

use bevy::prelude::*;

/// PID state for a single control axis.
///
/// Unlike the usual textbook form, `seek` is fed both the setpoint and the
/// current value each call, so the controller carries no setpoint of its own.
/// The integral accumulator is clamped to `±integral_limit` and can be
/// cleared with [`PidController::reset`], so a long-lived controller cannot
/// wind up without bound.
#[derive(Clone, Debug, Reflect)]
pub struct PidController {
    /// Proportional gain.
    pub p: f32,
    /// Integral gain.
    pub i: f32,
    /// Derivative gain.
    pub d: f32,
    /// Lower output clamp.
    pub min: f32,
    /// Upper output clamp.
    pub max: f32,
    /// Magnitude bound on the integral accumulator.
    pub integral_limit: f32,
    integral: f32,
    last_error: f32,
}

impl Default for PidController {
    fn default() -> Self {
        Self {
            p: 0.8,
            i: 0.0002,
            d: 0.2,
            min: -1.0,
            max: 1.0,
            integral_limit: 10.0,
            integral: 0.0,
            last_error: 0.0,
        }
    }
}

impl PidController {
    /// Builds a controller with the given gains and the default `[-1, 1]`
    /// output clamp.
    pub fn new(p: f32, i: f32, d: f32) -> Self {
        Self {
            p,
            i,
            d,
            ..Self::default()
        }
    }

    /// One control step at timestep `dt`: returns the clamped correction that
    /// drives `current` toward `target`.
    ///
    /// A non-positive `dt` skips the derivative and integral terms rather
    /// than dividing by zero.
    pub fn seek(&mut self, target: f32, current: f32, dt: f32) -> f32 {
        let error = target - current;

        let derivative = if dt > 0.0 {
            (error - self.last_error) / dt
        } else {
            0.0
        };
        if dt > 0.0 {
            self.integral += error * dt;
            self.integral = self.integral.clamp(-self.integral_limit, self.integral_limit);
        }
        self.last_error = error;

        let value = self.p * error + self.i * self.integral + self.d * derivative;
        value.clamp(self.min, self.max)
    }

    /// Clears the integral accumulator and last error, e.g. when the drone's
    /// input source is swapped.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = 0.0;
    }

    /// Current value of the integral accumulator (bounded by
    /// `integral_limit`).
    pub fn integral(&self) -> f32 {
        self.integral
    }
}
