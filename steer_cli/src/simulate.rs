//! Config loading, accelerator assembly per value space, and the run itself.

use std::fmt::Debug;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use eyre::WrapErr;
use nalgebra::{Vector2, Vector3, Vector4};
use serde_json::json;
use steer_config::{Config, Space};
use steer_core::arith::{self, AngleArith, ArithTag, Color, ScalarArith, registry};
use steer_core::error::Result as CoreResult;
use steer_core::{
    AccelCfg, Arith, Components, Control, DynAccelerator, MonotonicClock, Pid, RunParams,
    RunReport, SimBody, Tick, VelocityProfile, run_observed,
};

use crate::cli::{LAST_RUN, RunInfo};

/// Read, resolve and validate a config file. `space` overrides `[sim].space`.
pub fn load_config(path: &Path, space: Option<Space>) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config {}", path.display()))?;
    let mut cfg = steer_config::load_toml(&text)
        .wrap_err_with(|| format!("parse config {}", path.display()))?;
    if let Some(space) = space {
        cfg.sim.space = space;
    }
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    cfg.inline_keyframes(base)?;
    cfg.validate().wrap_err("invalid configuration")?;
    Ok(cfg)
}

/// Run the configured motion, reporting values as flat component lists.
pub fn run_simulation(
    cfg: &Config,
    trace: bool,
    stop: &AtomicBool,
) -> CoreResult<RunReport<Vec<f32>>> {
    let _ = LAST_RUN.set(RunInfo {
        space: cfg.sim.space,
        dt: cfg.sim.dt,
        max_ticks: cfg.sim.max_ticks,
        converge_timeout: cfg.accelerator.converge_timeout,
    });

    arith::init();
    match cfg.sim.space {
        Space::Scalar | Space::Radians | Space::Degrees => {
            select_f32_arith(cfg.sim.space);
            simulate::<f32>(cfg, trace, stop)
        }
        Space::Vec2 => simulate::<Vector2<f32>>(cfg, trace, stop),
        Space::Vec3 => simulate::<Vector3<f32>>(cfg, trace, stop),
        Space::Vec4 => simulate::<Vector4<f32>>(cfg, trace, stop),
        Space::Color => simulate::<Color>(cfg, trace, stop),
    }
}

/// Scalars and angles share `f32`; point its registry entry at the
/// arithmetic of `space` so an earlier run in another space does not leak.
fn select_f32_arith(space: Space) {
    let tag = ArithTag::from(space);
    match space {
        Space::Radians => registry::register(tag, AngleArith::RADIANS),
        Space::Degrees => registry::register(tag, AngleArith::DEGREES),
        _ => registry::register(tag, ScalarArith),
    }
}

fn value<T: Components>(what: &str, c: &[f32]) -> eyre::Result<T> {
    T::from_components(c).ok_or_else(|| eyre::eyre!("{what}: {} components do not fit", c.len()))
}

fn simulate<T>(cfg: &Config, trace: bool, stop: &AtomicBool) -> CoreResult<RunReport<Vec<f32>>>
where
    T: Components + Copy + Debug + 'static,
{
    let accel_cfg = AccelCfg::from(&cfg.accelerator);
    let mut accel = DynAccelerator::<T>::builder()
        .with_profile(VelocityProfile::try_from(&cfg.profile)?)
        .with_pid(Pid::from(&cfg.pid))
        .with_config(accel_cfg)
        .try_build_registered()?;

    let sim = &cfg.sim;
    let arith = accel.arith().clone();
    let start = value::<T>("sim.start_position", &sim.start_position)?;
    let velocity = match &sim.start_velocity {
        Some(v) => value::<T>("sim.start_velocity", v)?,
        None => arith.zero(),
    };
    let target = value::<T>("sim.target", &sim.target)?;
    let mut body = SimBody::new(arith.clone(), start, sim.mass).with_velocity(velocity);

    tracing::info!(
        space = sim.space.name(),
        arith = %arith.tag(),
        mode = accel_cfg.mode.name(),
        goal = ?target,
        "simulation start"
    );
    accel.start(target);
    let report = run_observed(
        &mut accel,
        &mut body,
        &MonotonicClock::new(),
        RunParams::from(sim),
        Some(stop),
        |tick| {
            if trace {
                println!("{}", tick_json(tick));
            }
        },
    )?;

    Ok(RunReport {
        outcome: report.outcome,
        ticks: report.ticks,
        sim_time: report.sim_time,
        wall_time: report.wall_time,
        position: report.position.components(),
        velocity: report.velocity.components(),
    })
}

fn tick_json<T: Components + Copy>(tick: &Tick<T>) -> serde_json::Value {
    let (kind, control) = match tick.control {
        Control::Force(v) => ("force", v),
        Control::Velocity(v) => ("velocity", v),
    };
    json!({
        "tick": tick.index,
        "t": tick.time,
        "position": tick.position.components(),
        "velocity": tick.velocity.components(),
        "control": kind,
        "value": control.components(),
    })
}

fn fmt_components(c: &[f32]) -> String {
    let parts: Vec<String> = c.iter().map(|v| format!("{v:.4}")).collect();
    format!("[{}]", parts.join(", "))
}

/// Print the final report as one JSON line or as text.
pub fn print_report(report: &RunReport<Vec<f32>>, space: Space, json_mode: bool) {
    if json_mode {
        let line = json!({
            "outcome": report.outcome.name(),
            "space": space.name(),
            "ticks": report.ticks,
            "sim_time_s": report.sim_time,
            "wall_ms": u64::try_from(report.wall_time.as_millis()).unwrap_or(u64::MAX),
            "position": report.position,
            "velocity": report.velocity,
        });
        println!("{line}");
    } else {
        println!(
            "motion {} after {} ticks ({:.3} s simulated, {} ms wall)",
            report.outcome,
            report.ticks,
            report.sim_time,
            report.wall_time.as_millis()
        );
        println!("  position: {}", fmt_components(&report.position));
        println!("  velocity: {}", fmt_components(&report.velocity));
    }
}
