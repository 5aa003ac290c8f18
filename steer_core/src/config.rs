//! Runtime configuration for the accelerator.
//!
//! Separate from the TOML-deserialized schema in `steer_config`; see
//! `conversions` for the mapping.

use crate::arith::EPSILON;
use crate::error::BuildError;

/// What the accelerator writes to the body each tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Set the body's velocity to the profile's target velocity.
    Velocity,
    /// Feed the velocity error through the PID and apply the result as a
    /// force.
    #[default]
    Force,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Velocity => "velocity",
            Mode::Force => "force",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelCfg {
    pub mode: Mode,
    /// Seconds after `begin_converge` before the motion gives up.
    pub converge_timeout: f32,
    /// Position and velocity errors shorter than this count as converged.
    pub tolerance: f32,
}

impl Default for AccelCfg {
    fn default() -> Self {
        Self {
            mode: Mode::Force,
            converge_timeout: 15.0,
            tolerance: EPSILON,
        }
    }
}

impl AccelCfg {
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.converge_timeout.is_nan() || self.converge_timeout <= 0.0 {
            return Err(BuildError::InvalidConfig("converge_timeout must be > 0"));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(BuildError::InvalidConfig("tolerance must be finite and >= 0"));
        }
        Ok(())
    }
}
