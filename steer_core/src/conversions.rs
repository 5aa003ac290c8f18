//! `From`/`TryFrom` implementations bridging `steer_config` types to
//! `steer_core` types.

use crate::arith::ArithTag;
use crate::config::{AccelCfg, Mode};
use crate::easing::{Easer, Interpolation, Keyframes};
use crate::error::EasingError;
use crate::pid::Pid;
use crate::profile::VelocityProfile;
use crate::runner::RunParams;

// ── Easer ────────────────────────────────────────────────────────────────────

impl TryFrom<&steer_config::EasingCfg> for Easer {
    type Error = EasingError;

    fn try_from(c: &steer_config::EasingCfg) -> Result<Self, Self::Error> {
        match c {
            steer_config::EasingCfg::Curve(name) => name.parse(),
            steer_config::EasingCfg::Keyframes {
                keyframes,
                interpolation,
            } => {
                let interpolation = match interpolation {
                    Some(name) => name.parse::<Interpolation>()?,
                    None => Interpolation::default(),
                };
                Keyframes::new(keyframes.clone(), interpolation).map(Easer::Keyframes)
            }
            steer_config::EasingCfg::Csv { csv, .. } => Err(EasingError::UnresolvedCsv(csv.clone())),
        }
    }
}

// ── VelocityProfile ──────────────────────────────────────────────────────────

impl TryFrom<&steer_config::ProfileCfg> for VelocityProfile {
    type Error = EasingError;

    fn try_from(c: &steer_config::ProfileCfg) -> Result<Self, Self::Error> {
        Ok(Self {
            v_scale: c.v_scale,
            startup_t: c.startup_t,
            braking_x: c.braking_x,
            v_by_t: Easer::try_from(&c.v_by_t)?,
            v_by_x: Easer::try_from(&c.v_by_x)?,
            x_min: c.x_min,
            v_min: c.v_min,
        })
    }
}

// ── Pid ──────────────────────────────────────────────────────────────────────

impl From<&steer_config::PidCfg> for Pid {
    fn from(c: &steer_config::PidCfg) -> Self {
        Self::new(c.gain, c.i_time, c.d_time, c.max_in, c.max_out)
    }
}

// ── AccelCfg ─────────────────────────────────────────────────────────────────

impl From<steer_config::ModeCfg> for Mode {
    fn from(m: steer_config::ModeCfg) -> Self {
        match m {
            steer_config::ModeCfg::Velocity => Mode::Velocity,
            steer_config::ModeCfg::Force => Mode::Force,
        }
    }
}

impl From<&steer_config::AcceleratorCfg> for AccelCfg {
    fn from(c: &steer_config::AcceleratorCfg) -> Self {
        Self {
            mode: c.mode.into(),
            converge_timeout: c.converge_timeout,
            tolerance: c.tolerance,
        }
    }
}

// ── Space / RunParams ────────────────────────────────────────────────────────

impl From<steer_config::Space> for ArithTag {
    fn from(s: steer_config::Space) -> Self {
        match s {
            steer_config::Space::Scalar => ArithTag::Scalar,
            steer_config::Space::Radians => ArithTag::Radians,
            steer_config::Space::Degrees => ArithTag::Degrees,
            steer_config::Space::Vec2 => ArithTag::Vec2,
            steer_config::Space::Vec3 => ArithTag::Vec3,
            steer_config::Space::Vec4 => ArithTag::Vec4,
            steer_config::Space::Color => ArithTag::Color,
        }
    }
}

impl From<&steer_config::SimCfg> for RunParams {
    fn from(c: &steer_config::SimCfg) -> Self {
        Self {
            dt: c.dt,
            max_ticks: c.max_ticks,
            realtime: c.realtime,
            converge_after: c.converge_after,
        }
    }
}
