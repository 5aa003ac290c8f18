//! Drive an accelerator and a simulated body until the motion completes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use steer_traits::{Body, Clock};

use crate::accelerator::Accelerator;
use crate::arith::Arith;
use crate::error::{Result, SteerError};
use crate::sim::SimBody;
use crate::status::{Completion, Control, StepStatus};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunParams {
    /// Fixed tick length in seconds.
    pub dt: f32,
    /// Hard cap on ticks; exceeding it aborts the motion with an error.
    pub max_ticks: u64,
    /// Pace ticks against the clock instead of running flat out.
    pub realtime: bool,
    /// Seconds after start at which convergence checking begins.
    pub converge_after: f32,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            max_ticks: 60 * 60,
            realtime: false,
            converge_after: 0.0,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport<T> {
    pub outcome: Completion,
    pub ticks: u64,
    /// Simulated seconds (`ticks * dt`).
    pub sim_time: f32,
    /// Clock time spent, as reported by the clock driving the run.
    pub wall_time: Duration,
    pub position: T,
    pub velocity: T,
}

impl<T> RunReport<T> {
    /// The report itself when the motion converged, otherwise
    /// [`SteerError::NotConverged`] naming the outcome.
    pub fn into_converged(self) -> Result<Self> {
        match self.outcome {
            Completion::Converged => Ok(self),
            other => Err(eyre::Report::new(SteerError::NotConverged(other))),
        }
    }
}

/// One running tick, after the body has been integrated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick<T> {
    pub index: u64,
    pub time: f32,
    pub position: T,
    pub velocity: T,
    pub control: Control<T>,
}

/// Run until the motion already started on `accel` completes.
pub fn run<A: Arith>(
    accel: &mut Accelerator<A>,
    body: &mut SimBody<A>,
    clock: &dyn Clock,
    params: RunParams,
) -> Result<RunReport<A::Value>> {
    run_observed(accel, body, clock, params, None, |_| {})
}

/// Like [`run`], reporting every running tick to `on_tick`. Setting `stop`
/// aborts the motion on the next tick.
pub fn run_observed<A, F>(
    accel: &mut Accelerator<A>,
    body: &mut SimBody<A>,
    clock: &dyn Clock,
    params: RunParams,
    stop: Option<&AtomicBool>,
    mut on_tick: F,
) -> Result<RunReport<A::Value>>
where
    A: Arith,
    F: FnMut(&Tick<A::Value>),
{
    if !(params.dt.is_finite() && params.dt > 0.0) {
        return Err(eyre::Report::new(SteerError::Config(format!(
            "dt must be finite and > 0, got {}",
            params.dt
        ))));
    }
    let tick_len = Duration::try_from_secs_f32(params.dt).map_err(|e| {
        eyre::Report::new(SteerError::Config(format!(
            "dt {} is not a usable tick length: {e}",
            params.dt
        )))
    })?;
    if !accel.is_running() {
        return Err(eyre::Report::new(SteerError::State("no motion running".into())));
    }

    let epoch = clock.now();
    let mut converge_pending = true;

    for index in 1..=params.max_ticks {
        if stop.is_some_and(|s| s.load(Ordering::Relaxed)) {
            accel.abort();
        }
        if converge_pending && accel.elapsed().unwrap_or(0.0) >= params.converge_after {
            accel.begin_converge();
            converge_pending = false;
        }

        match accel.step(body, params.dt) {
            StepStatus::Running(control) => {
                body.integrate(params.dt);
                on_tick(&Tick {
                    index,
                    time: index as f32 * params.dt,
                    position: body.position(),
                    velocity: body.velocity(),
                    control,
                });
                if params.realtime {
                    let deadline = tick_len
                        .checked_mul(u32::try_from(index).unwrap_or(u32::MAX))
                        .and_then(|d| epoch.checked_add(d));
                    if let Some(deadline) = deadline {
                        clock.sleep(deadline.saturating_duration_since(clock.now()));
                    }
                }
            }
            StepStatus::Complete(outcome) => {
                return Ok(RunReport {
                    outcome,
                    ticks: index,
                    sim_time: index as f32 * params.dt,
                    wall_time: clock.now().saturating_duration_since(epoch),
                    position: body.position(),
                    velocity: body.velocity(),
                });
            }
            StepStatus::Idle => {
                return Err(eyre::Report::new(SteerError::State(
                    "motion stopped without completing".into(),
                )));
            }
        }
    }

    tracing::warn!(max_ticks = params.max_ticks, "tick cap reached; aborting motion");
    accel.abort();
    let _ = accel.step(body, params.dt);
    Err(eyre::Report::new(SteerError::TickCap(params.max_ticks)))
}
