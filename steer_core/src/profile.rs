//! Target velocity from elapsed time and position error.

use crate::arith::{Arith, EPSILON};
use crate::easing::Easer;
use crate::error::BuildError;

/// Velocity ramp: speeds up over `startup_t` seconds, slows down inside
/// `braking_x` of the target, runs at `v_scale` in between.
///
/// Stateless apart from its configuration; callers supply elapsed time and
/// the current position error each tick.
#[derive(Debug, Clone)]
pub struct VelocityProfile {
    pub v_scale: f32,
    pub startup_t: f32,
    pub braking_x: f32,
    pub v_by_t: Easer,
    pub v_by_x: Easer,
    pub x_min: f32,
    pub v_min: f32,
}

impl Default for VelocityProfile {
    fn default() -> Self {
        Self {
            v_scale: 12.0,
            startup_t: 0.25,
            braking_x: 2.0,
            v_by_t: Easer::default(),
            v_by_x: Easer::default(),
            x_min: EPSILON,
            v_min: EPSILON,
        }
    }
}

impl VelocityProfile {
    /// Profile with no ramps: always `v_scale` toward the target.
    pub fn constant(v_scale: f32) -> Self {
        Self {
            v_scale,
            startup_t: 0.0,
            braking_x: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        let all_finite = [
            self.v_scale,
            self.startup_t,
            self.braking_x,
            self.x_min,
            self.v_min,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(BuildError::InvalidConfig("profile values must be finite"));
        }
        if self.v_scale < 0.0 {
            return Err(BuildError::InvalidConfig("profile.v_scale must be >= 0"));
        }
        if self.x_min < 0.0 || self.v_min < 0.0 {
            return Err(BuildError::InvalidConfig(
                "profile.x_min and profile.v_min must be >= 0",
            ));
        }
        Ok(())
    }

    /// Target velocity for the given position error, pointing along it.
    ///
    /// Returns the zero value when the error is shorter than `x_min` or the
    /// resulting speed is under `v_min`.
    pub fn apply<A: Arith>(&self, arith: &A, elapsed: f32, error_x: A::Value) -> A::Value {
        let len_x = arith.length(error_x);
        if len_x < self.x_min || len_x == 0.0 {
            return arith.zero();
        }
        let ramp_t = if self.startup_t > 0.0 {
            self.v_by_t.evaluate(elapsed / self.startup_t)
        } else {
            1.0
        };
        let ramp_x = if self.braking_x > 0.0 {
            self.v_by_x.evaluate(len_x / self.braking_x)
        } else {
            1.0
        };
        let speed = self.v_scale * ramp_t.min(ramp_x);
        if speed < self.v_min {
            return arith.zero();
        }
        arith.scale(speed / len_x, error_x)
    }
}
