//! The per-tick convergence state machine.
//!
//! An [`Accelerator`] composes a [`VelocityProfile`] and a [`Pid`] into a
//! single "move toward the target" primitive. The host calls
//! [`Accelerator::step`] once per fixed tick with the body it controls.

use std::fmt;

use steer_traits::Body;

use crate::arith::Arith;
use crate::config::{AccelCfg, Mode};
use crate::pid::{Pid, PidState};
use crate::profile::VelocityProfile;
use crate::status::{Completion, Control, StepStatus};

pub(crate) type OnComplete = Box<dyn FnMut(Completion) + Send>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    /// Seconds since `begin_converge`.
    Converging(f32),
    Aborted,
}

pub struct Accelerator<A: Arith> {
    pub(crate) arith: A,
    pub(crate) profile: VelocityProfile,
    pub(crate) pid: Pid,
    pub(crate) cfg: AccelCfg,
    pub(crate) on_complete: Option<OnComplete>,

    /// Seconds since `start`; `None` while stopped.
    elapsed: Option<f32>,
    phase: Phase,
    pid_state: PidState<A::Value>,

    target: A::Value,
    error_x: A::Value,
    target_v: A::Value,
    error_v: A::Value,
    target_a: A::Value,
}

impl<A: Arith> fmt::Debug for Accelerator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accelerator")
            .field("mode", &self.cfg.mode)
            .field("elapsed", &self.elapsed)
            .field("phase", &self.phase)
            .field("target", &self.target)
            .field("error_x", &self.error_x)
            .finish_non_exhaustive()
    }
}

impl<A: Arith> Accelerator<A> {
    pub(crate) fn from_parts(
        arith: A,
        profile: VelocityProfile,
        pid: Pid,
        cfg: AccelCfg,
        on_complete: Option<OnComplete>,
    ) -> Self {
        let zero = arith.zero();
        Self {
            pid_state: PidState::zeroed(&arith),
            arith,
            profile,
            pid,
            cfg,
            on_complete,
            elapsed: None,
            phase: Phase::Idle,
            target: zero,
            error_x: zero,
            target_v: zero,
            error_v: zero,
            target_a: zero,
        }
    }

    /// Begin a motion toward `target`. A motion already running is
    /// replaced without a completion callback.
    pub fn start(&mut self, target: A::Value) {
        if self.is_running() {
            tracing::debug!(goal = ?target, "restarting running motion");
        } else {
            tracing::debug!(goal = ?target, mode = self.cfg.mode.name(), "motion start");
        }
        self.target = target;
        self.elapsed = Some(0.0);
        self.phase = Phase::Idle;
        self.pid_state.reset(&self.arith);
    }

    /// Move the target of the running motion without resetting timing.
    pub fn set_target(&mut self, target: A::Value) {
        self.target = target;
    }

    /// Start checking for convergence; the converge timeout counts from now.
    pub fn begin_converge(&mut self) {
        if !self.is_running() {
            tracing::warn!("begin_converge ignored: no motion running");
            return;
        }
        if self.phase == Phase::Aborted {
            return;
        }
        tracing::debug!(elapsed = ?self.elapsed, "converge start");
        self.phase = Phase::Converging(0.0);
    }

    /// Ask the running motion to stop. Takes effect on the next `step`.
    pub fn abort(&mut self) {
        if !self.is_running() {
            tracing::warn!("abort ignored: no motion running");
            return;
        }
        tracing::debug!(elapsed = ?self.elapsed, "abort requested");
        self.phase = Phase::Aborted;
    }

    /// One tick of `dt` seconds against `body`.
    ///
    /// # Panics
    /// If `dt` is not finite and positive.
    pub fn step<B>(&mut self, body: &mut B, dt: f32) -> StepStatus<A::Value>
    where
        B: Body<A::Value> + ?Sized,
    {
        assert!(dt.is_finite() && dt > 0.0, "step dt must be finite and > 0, got {dt}");

        let Some(elapsed) = self.elapsed else {
            return StepStatus::Idle;
        };
        if self.phase == Phase::Aborted {
            return self.complete(Completion::Aborted);
        }

        let elapsed = elapsed + dt;
        self.elapsed = Some(elapsed);
        if let Phase::Converging(c) = self.phase {
            let c = c + dt;
            self.phase = Phase::Converging(c);
            if c >= self.cfg.converge_timeout {
                return self.complete(Completion::Timeout);
            }
        }

        let a = &self.arith;
        self.error_x = a.difference(self.target, body.position());
        self.target_v = self.profile.apply(a, elapsed, self.error_x);
        self.error_v = a.difference(self.target_v, body.velocity());

        if self.is_converging()
            && a.approximately(self.error_x, self.cfg.tolerance)
            && a.approximately(self.error_v, self.cfg.tolerance)
        {
            body.set_position(self.target);
            body.set_velocity(self.target_v);
            return self.complete(Completion::Converged);
        }

        let control = match self.cfg.mode {
            Mode::Velocity => {
                body.set_velocity(self.target_v);
                Control::Velocity(self.target_v)
            }
            Mode::Force => {
                self.target_a = self
                    .pid
                    .apply(&self.arith, dt, self.error_v, &mut self.pid_state);
                body.apply_force(self.target_a);
                Control::Force(self.target_a)
            }
        };
        tracing::trace!(
            elapsed,
            error_x = ?self.error_x,
            target_v = ?self.target_v,
            control = ?control,
            "tick"
        );
        StepStatus::Running(control)
    }

    fn complete(&mut self, reason: Completion) -> StepStatus<A::Value> {
        tracing::info!(
            outcome = reason.name(),
            elapsed = ?self.elapsed,
            error_x = ?self.error_x,
            "motion complete"
        );
        self.elapsed = None;
        self.phase = Phase::Idle;
        self.pid_state.reset(&self.arith);
        if let Some(cb) = self.on_complete.as_mut() {
            cb(reason);
        }
        StepStatus::Complete(reason)
    }

    /// Install or replace the completion callback.
    pub fn set_on_complete(&mut self, f: impl FnMut(Completion) + Send + 'static) {
        self.on_complete = Some(Box::new(f));
    }

    pub fn is_running(&self) -> bool {
        self.elapsed.is_some()
    }

    pub fn is_converging(&self) -> bool {
        matches!(self.phase, Phase::Converging(_))
    }

    /// Seconds since `start`, while running.
    pub fn elapsed(&self) -> Option<f32> {
        self.elapsed
    }

    /// Seconds since `begin_converge`, while converging.
    pub fn converge_elapsed(&self) -> Option<f32> {
        match self.phase {
            Phase::Converging(c) => Some(c),
            _ => None,
        }
    }

    pub fn target(&self) -> A::Value {
        self.target
    }

    /// Telemetry: last position error (target - position).
    pub fn error_x(&self) -> A::Value {
        self.error_x
    }

    /// Telemetry: last target velocity from the profile.
    pub fn target_v(&self) -> A::Value {
        self.target_v
    }

    /// Telemetry: last velocity error.
    pub fn error_v(&self) -> A::Value {
        self.error_v
    }

    /// Telemetry: last PID output. Stays zero in velocity mode.
    pub fn target_a(&self) -> A::Value {
        self.target_a
    }

    pub fn pid_state(&self) -> &PidState<A::Value> {
        &self.pid_state
    }

    pub fn arith(&self) -> &A {
        &self.arith
    }

    pub fn profile(&self) -> &VelocityProfile {
        &self.profile
    }

    pub fn pid(&self) -> &Pid {
        &self.pid
    }

    pub fn config(&self) -> &AccelCfg {
        &self.cfg
    }
}
