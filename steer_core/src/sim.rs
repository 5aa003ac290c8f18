//! A simulated point mass for running motions without a host engine.

use std::fmt;

use steer_traits::Body;

use crate::arith::Arith;

/// Point mass with semi-implicit Euler integration.
///
/// `apply_force` takes the accelerator's output (an acceleration) and
/// queues `mass * a`; [`SimBody::integrate`] turns queued force into motion
/// and clears it.
pub struct SimBody<A: Arith> {
    arith: A,
    position: A::Value,
    velocity: A::Value,
    mass: f32,
    force: A::Value,
}

impl<A: Arith> fmt::Debug for SimBody<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimBody")
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("mass", &self.mass)
            .finish_non_exhaustive()
    }
}

impl<A: Arith> SimBody<A> {
    /// # Panics
    /// If `mass` is not finite and positive.
    pub fn new(arith: A, position: A::Value, mass: f32) -> Self {
        assert!(
            mass.is_finite() && mass > 0.0,
            "body mass must be finite and > 0, got {mass}"
        );
        let zero = arith.zero();
        Self {
            arith,
            position,
            velocity: zero,
            mass,
            force: zero,
        }
    }

    #[must_use]
    pub fn with_velocity(mut self, velocity: A::Value) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Force queued since the last `integrate`.
    pub fn pending_force(&self) -> A::Value {
        self.force
    }

    /// Advance by `dt`: `v += F/m * dt`, then `x += v * dt`.
    pub fn integrate(&mut self, dt: f32) {
        let a = &self.arith;
        let accel = a.scale(1.0 / self.mass, self.force);
        self.velocity = a.add(self.velocity, a.scale(dt, accel));
        self.position = a.add(self.position, a.scale(dt, self.velocity));
        self.force = a.zero();
    }
}

impl<A: Arith> Body<A::Value> for SimBody<A> {
    fn position(&self) -> A::Value {
        self.position
    }

    fn velocity(&self) -> A::Value {
        self.velocity
    }

    fn apply_force(&mut self, force: A::Value) {
        self.force = self
            .arith
            .add(self.force, self.arith.scale(self.mass, force));
    }

    fn set_velocity(&mut self, velocity: A::Value) {
        self.velocity = velocity;
    }

    fn set_position(&mut self, position: A::Value) {
        self.position = position;
    }
}
