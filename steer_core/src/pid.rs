//! PID controller with input/output clamping and anti-windup.
//!
//! The running state lives outside the controller in [`PidState`], so one
//! `Pid` configuration can drive any number of independent loops.

use crate::arith::{Arith, EPSILON};
use crate::error::BuildError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pid {
    pub gain: f32,
    /// Seconds the integral term takes to correct a steady error.
    pub i_time: f32,
    /// Seconds of look-ahead for the derivative term.
    pub d_time: f32,
    /// Error magnitude limit applied before any other math.
    pub max_in: f32,
    /// Output magnitude limit.
    pub max_out: f32,
}

impl Default for Pid {
    fn default() -> Self {
        Self {
            gain: 12.0,
            i_time: 2.0,
            d_time: 2.0,
            max_in: 36.0,
            max_out: 36.0,
        }
    }
}

/// Previous (clamped) error and accumulated error of one control loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidState<T> {
    pub prev_error: T,
    pub cum_error: T,
}

impl<T: Copy> PidState<T> {
    pub fn zeroed<A: Arith<Value = T>>(arith: &A) -> Self {
        Self {
            prev_error: arith.zero(),
            cum_error: arith.zero(),
        }
    }

    pub fn reset<A: Arith<Value = T>>(&mut self, arith: &A) {
        *self = Self::zeroed(arith);
    }
}

impl Pid {
    pub fn new(gain: f32, i_time: f32, d_time: f32, max_in: f32, max_out: f32) -> Self {
        Self {
            gain,
            i_time,
            d_time,
            max_in,
            max_out,
        }
    }

    /// Reject settings that would make [`Pid::apply`] panic or emit
    /// non-finite output.
    pub fn validate(&self) -> Result<(), BuildError> {
        let all_finite = [self.gain, self.i_time, self.d_time, self.max_in, self.max_out]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(BuildError::InvalidConfig("pid values must be finite"));
        }
        if self.i_time <= 0.0 {
            return Err(BuildError::InvalidConfig("pid.i_time must be > 0"));
        }
        if self.d_time < 0.0 {
            return Err(BuildError::InvalidConfig("pid.d_time must be >= 0"));
        }
        if self.max_in <= 0.0 || self.max_out <= 0.0 {
            return Err(BuildError::InvalidConfig("pid.max_in and pid.max_out must be > 0"));
        }
        Ok(())
    }

    /// One controller update for `error` (target - actual) over `dt`.
    ///
    /// # Panics
    /// If `dt` is not finite and positive, or `i_time <= 0`.
    pub fn apply<A: Arith>(
        &self,
        arith: &A,
        dt: f32,
        error: A::Value,
        state: &mut PidState<A::Value>,
    ) -> A::Value {
        assert!(dt.is_finite() && dt > 0.0, "pid dt must be finite and > 0, got {dt}");
        assert!(self.i_time > 0.0, "pid i_time must be > 0, got {}", self.i_time);

        let error = arith.clamp(error, self.max_in);

        // Crossed zero while still heading the same way: drop the integral.
        if arith.approximately(error, EPSILON) && arith.dot(error, state.prev_error) > 0.0 {
            state.cum_error = arith.zero();
        }

        state.cum_error = arith.add(state.cum_error, arith.scale(dt, error));
        let i = arith.scale(1.0 / self.i_time, state.cum_error);

        let d = arith.scale(self.d_time / dt, arith.difference(error, state.prev_error));
        state.prev_error = error;

        let out = arith.scale(self.gain, arith.add(arith.add(error, d), i));
        arith.clamp(out, self.max_out)
    }

    /// Bind the controller to a fixed timestep and its own zeroed state,
    /// yielding an `error -> output` closure.
    pub fn bind<A: Arith>(self, arith: A, dt: f32) -> impl FnMut(A::Value) -> A::Value {
        let mut state = PidState::zeroed(&arith);
        move |error| self.apply(&arith, dt, error, &mut state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::{EuclidArith, ScalarArith};
    use nalgebra::Vector2;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn zero_error_stays_zero() {
        let pid = Pid::default();
        let mut s = PidState::zeroed(&ScalarArith);
        for _ in 0..100 {
            assert_eq!(pid.apply(&ScalarArith, DT, 0.0, &mut s), 0.0);
            assert_eq!(s.cum_error, 0.0);
        }
    }

    #[test]
    fn first_step_terms() {
        let pid = Pid::new(1.0, 2.0, 0.0, 100.0, 100.0);
        let mut s = PidState::zeroed(&ScalarArith);
        let out = pid.apply(&ScalarArith, 0.5, 4.0, &mut s);
        // p = 4, i = (0.5 * 4) / 2 = 1
        assert!((out - 5.0).abs() < 1e-6);
        assert_eq!(s.prev_error, 4.0);
        assert_eq!(s.cum_error, 2.0);
    }

    #[test]
    fn input_is_clamped_before_state_update() {
        let pid = Pid::new(1.0, 1.0, 0.0, 1.0, 100.0);
        let mut s = PidState::zeroed(&EuclidArith::<2>);
        pid.apply(&EuclidArith::<2>, DT, Vector2::new(30.0, 40.0), &mut s);
        assert!((s.prev_error - Vector2::new(0.6, 0.8)).norm() < 1e-6);
    }

    #[test]
    fn output_is_clamped() {
        let pid = Pid::default();
        let mut s = PidState::zeroed(&ScalarArith);
        let out = pid.apply(&ScalarArith, DT, 1_000.0, &mut s);
        assert_eq!(out, 36.0);
    }

    #[test]
    fn anti_windup_resets_on_zero_crossing() {
        let pid = Pid::default();
        let mut s = PidState::zeroed(&ScalarArith);
        for _ in 0..10 {
            pid.apply(&ScalarArith, DT, 1.0, &mut s);
        }
        assert!(s.cum_error > 0.1);
        pid.apply(&ScalarArith, DT, 1e-8, &mut s);
        assert!(s.cum_error.abs() < 1e-6, "cum_error {}", s.cum_error);
    }

    #[test]
    fn reset_zeroes_state() {
        let pid = Pid::default();
        let mut s = PidState::zeroed(&ScalarArith);
        pid.apply(&ScalarArith, DT, 3.0, &mut s);
        s.reset(&ScalarArith);
        assert_eq!(s, PidState::zeroed(&ScalarArith));
    }

    #[test]
    #[should_panic(expected = "dt must be finite and > 0")]
    fn zero_dt_panics() {
        let mut s = PidState::zeroed(&ScalarArith);
        Pid::default().apply(&ScalarArith, 0.0, 1.0, &mut s);
    }

    #[test]
    #[should_panic(expected = "i_time must be > 0")]
    fn zero_i_time_panics() {
        let mut s = PidState::zeroed(&ScalarArith);
        Pid::new(1.0, 0.0, 0.0, 1.0, 1.0).apply(&ScalarArith, DT, 1.0, &mut s);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(Pid::default().validate().is_ok());
        assert!(Pid::new(1.0, 0.0, 1.0, 1.0, 1.0).validate().is_err());
        assert!(Pid::new(1.0, 1.0, 1.0, 0.0, 1.0).validate().is_err());
        assert!(Pid::new(f32::NAN, 1.0, 1.0, 1.0, 1.0).validate().is_err());
    }

    #[test]
    fn bound_controller_keeps_its_own_state() {
        let mut ctl = Pid::new(1.0, 1.0, 0.0, 10.0, 10.0).bind(ScalarArith, 1.0);
        assert_eq!(ctl(1.0), 2.0);
        assert_eq!(ctl(1.0), 3.0);
    }
}
