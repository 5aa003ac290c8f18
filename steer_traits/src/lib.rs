//! Host contracts for the steering core.
//!
//! The core never owns a physics body or a clock. Hosts implement [`Body`]
//! for whatever they simulate and hand a [`Clock`] to the runner when ticks
//! need real-time pacing.

pub mod clock;

pub use clock::{Clock, MonotonicClock, SimClock};

/// A point mass the accelerator can read and drive.
///
/// Reads happen every tick. Which write is used depends on the output mode:
/// force mode calls [`Body::apply_force`], velocity mode calls
/// [`Body::set_velocity`]. [`Body::set_position`] is only used to snap the
/// body onto the target once a motion converges.
pub trait Body<T> {
    fn position(&self) -> T;
    fn velocity(&self) -> T;

    /// Queue a force for the next integration step. Implementations scale by
    /// their own mass.
    fn apply_force(&mut self, force: T);
    fn set_velocity(&mut self, velocity: T);
    fn set_position(&mut self, position: T);
}

impl<T, B: Body<T> + ?Sized> Body<T> for &mut B {
    fn position(&self) -> T {
        (**self).position()
    }
    fn velocity(&self) -> T {
        (**self).velocity()
    }
    fn apply_force(&mut self, force: T) {
        (**self).apply_force(force);
    }
    fn set_velocity(&mut self, velocity: T) {
        (**self).set_velocity(velocity);
    }
    fn set_position(&mut self, position: T) {
        (**self).set_position(position);
    }
}
