#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Tick-driven steering of a point mass toward a target.
//!
//! Everything here is generic over an [`arith::Arith`] implementation, so
//! the same control code runs over scalars, 2/3/4-dimensional vectors,
//! colors and wrapping angles.
//!
//! ## Architecture
//!
//! - **Arithmetic**: add/scale/dot per value type, with derived length,
//!   clamp and lerp; a process-wide registry (`arith` module)
//! - **Easing**: named curves, keyframes and custom functions (`easing`)
//! - **Profile**: target velocity from elapsed time and position error
//!   (`profile`)
//! - **PID**: anti-windup controller with caller-owned state (`pid`)
//! - **Accelerator**: the per-tick convergence state machine
//!   (`accelerator`, `builder`)
//! - **Runner**: drives an accelerator against a simulated body until the
//!   motion completes (`runner`, `sim`)
//!
//! Control math fails fast: a non-positive `dt` or `i_time` panics on first
//! use, while near-zero vectors fall back to exact zero instead of NaN.

pub mod accelerator;
pub mod arith;
pub mod builder;
pub mod config;
pub mod conversions;
pub mod easing;
pub mod error;
pub mod pid;
pub mod profile;
pub mod runner;
pub mod sim;
pub mod status;

pub use accelerator::Accelerator;
pub use arith::{Arith, ArithTag, Components, HasArith, Shared};
pub use builder::{AcceleratorBuilder, DynAccelerator};
pub use config::{AccelCfg, Mode};
pub use easing::{Curve, Easer, Interpolation, Keyframes, ScaledEaser};
pub use pid::{Pid, PidState};
pub use profile::VelocityProfile;
pub use runner::{RunParams, RunReport, Tick, run, run_observed};
pub use sim::SimBody;
pub use status::{Completion, Control, StepStatus};

pub use steer_traits::{Body, Clock, MonotonicClock, SimClock};
