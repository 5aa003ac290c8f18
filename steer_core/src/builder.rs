//! Type-state builder for [`Accelerator`].
//!
//! `build()` is only available once arithmetic has been supplied;
//! `try_build()` is always available and reports what is missing.
//! [`DynAccelerator`] resolves its arithmetic from the registry instead.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use crate::accelerator::{Accelerator, OnComplete};
use crate::arith::{Arith, HasArith, Shared, registry};
use crate::config::{AccelCfg, Mode};
use crate::error::{BuildError, Result};
use crate::pid::Pid;
use crate::profile::VelocityProfile;
use crate::status::Completion;

/// Accelerator whose arithmetic comes from the runtime registry.
pub type DynAccelerator<T> = Accelerator<Shared<T>>;

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

pub struct AcceleratorBuilder<A: Arith, S> {
    arith: Option<A>,
    profile: Option<VelocityProfile>,
    pid: Option<Pid>,
    cfg: AccelCfg,
    on_complete: Option<OnComplete>,
    _s: PhantomData<S>,
}

impl<A: Arith, S> fmt::Debug for AcceleratorBuilder<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceleratorBuilder")
            .field("arith", &self.arith.is_some())
            .field("profile", &self.profile)
            .field("pid", &self.pid)
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

impl<A: Arith> Default for AcceleratorBuilder<A, Missing> {
    fn default() -> Self {
        Self {
            arith: None,
            profile: None,
            pid: None,
            cfg: AccelCfg::default(),
            on_complete: None,
            _s: PhantomData,
        }
    }
}

impl<A: Arith> Accelerator<A> {
    /// Start building an accelerator.
    pub fn builder() -> AcceleratorBuilder<A, Missing> {
        AcceleratorBuilder::default()
    }
}

fn validate_and_build<A: Arith>(
    arith: A,
    profile: VelocityProfile,
    pid: Pid,
    cfg: AccelCfg,
    on_complete: Option<OnComplete>,
) -> Result<Accelerator<A>> {
    profile.validate().map_err(eyre::Report::new)?;
    pid.validate().map_err(eyre::Report::new)?;
    cfg.validate().map_err(eyre::Report::new)?;
    Ok(Accelerator::from_parts(arith, profile, pid, cfg, on_complete))
}

impl<A: Arith, S> AcceleratorBuilder<A, S> {
    /// Fallible build available in any type-state.
    pub fn try_build(self) -> Result<Accelerator<A>> {
        let arith = self.arith.ok_or_else(|| {
            eyre::Report::new(BuildError::MissingArith {
                type_name: type_name::<A::Value>(),
            })
        })?;
        validate_and_build(
            arith,
            self.profile.unwrap_or_default(),
            self.pid.unwrap_or_default(),
            self.cfg,
            self.on_complete,
        )
    }
}

/// Chainable setters that do not affect type-state.
impl<A: Arith, S> AcceleratorBuilder<A, S> {
    pub fn with_profile(mut self, profile: VelocityProfile) -> Self {
        self.profile = Some(profile);
        self
    }
    pub fn with_pid(mut self, pid: Pid) -> Self {
        self.pid = Some(pid);
        self
    }
    pub fn with_config(mut self, cfg: AccelCfg) -> Self {
        self.cfg = cfg;
        self
    }
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.cfg.mode = mode;
        self
    }
    pub fn with_converge_timeout(mut self, secs: f32) -> Self {
        self.cfg.converge_timeout = secs;
        self
    }
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.cfg.tolerance = tolerance;
        self
    }
    pub fn with_on_complete<F>(mut self, f: F) -> Self
    where
        F: FnMut(Completion) + Send + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }
}

// Setters that advance type-state
impl<A: Arith> AcceleratorBuilder<A, Missing> {
    pub fn with_arith(self, arith: A) -> AcceleratorBuilder<A, Set> {
        AcceleratorBuilder {
            arith: Some(arith),
            profile: self.profile,
            pid: self.pid,
            cfg: self.cfg,
            on_complete: self.on_complete,
            _s: PhantomData,
        }
    }
}

impl<A: Arith + Default> AcceleratorBuilder<A, Missing> {
    pub fn with_default_arith(self) -> AcceleratorBuilder<A, Set> {
        self.with_arith(A::default())
    }
}

impl<T: Copy + fmt::Debug + 'static> AcceleratorBuilder<Shared<T>, Missing> {
    /// Resolve arithmetic for `T` from the registry and build.
    ///
    /// Fails with [`BuildError::MissingArith`] when nothing is registered.
    pub fn try_build_registered(self) -> Result<DynAccelerator<T>> {
        let arith = registry::lookup::<T>().map_err(|_| {
            eyre::Report::new(BuildError::MissingArith {
                type_name: type_name::<T>(),
            })
        })?;
        tracing::debug!(value_type = type_name::<T>(), tag = %arith.tag(), "arithmetic resolved");
        self.with_arith(arith).build()
    }
}

impl<A: Arith> AcceleratorBuilder<A, Set> {
    /// Validate and build. Only available once arithmetic is set.
    pub fn build(self) -> Result<Accelerator<A>> {
        self.try_build()
    }
}

/// Statically dispatched accelerator for a value type with a default
/// arithmetic.
pub fn build_default<T: HasArith>(
    profile: VelocityProfile,
    pid: Pid,
    cfg: AccelCfg,
) -> Result<Accelerator<T::Arith>> {
    validate_and_build(T::arith(), profile, pid, cfg, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::{ArithTag, ScalarArith};

    #[derive(Debug, Clone, Copy)]
    struct Unregistered;

    #[test]
    fn try_build_without_arith_names_type() {
        let err = Accelerator::<ScalarArith>::builder().try_build().unwrap_err();
        assert_eq!(
            err.downcast_ref::<BuildError>(),
            Some(&BuildError::MissingArith { type_name: "f32" })
        );
    }

    #[test]
    fn registered_missing_type_fails() {
        let err = DynAccelerator::<Unregistered>::builder()
            .try_build_registered()
            .unwrap_err();
        let be = err.downcast_ref::<BuildError>().unwrap();
        assert!(matches!(be, BuildError::MissingArith { type_name } if type_name.contains("Unregistered")));
    }

    #[test]
    fn registered_scalar_builds() {
        crate::arith::init();
        let a = DynAccelerator::<f32>::builder()
            .with_mode(Mode::Velocity)
            .try_build_registered()
            .unwrap();
        assert!(matches!(
            a.arith().tag(),
            ArithTag::Scalar | ArithTag::Radians | ArithTag::Degrees
        ));
    }

    #[test]
    fn invalid_pid_rejected() {
        let err = Accelerator::builder()
            .with_arith(ScalarArith)
            .with_pid(Pid::new(1.0, 0.0, 1.0, 1.0, 1.0))
            .build()
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<BuildError>(),
            Some(&BuildError::InvalidConfig("pid.i_time must be > 0"))
        );
    }

    #[test]
    fn setters_land_in_config() {
        let a = Accelerator::<ScalarArith>::builder()
            .with_default_arith()
            .with_mode(Mode::Velocity)
            .with_converge_timeout(3.0)
            .with_tolerance(0.5)
            .build()
            .unwrap();
        let cfg = a.config();
        assert_eq!(cfg.mode, Mode::Velocity);
        assert_eq!(cfg.converge_timeout, 3.0);
        assert_eq!(cfg.tolerance, 0.5);
    }

    #[test]
    fn build_default_uses_has_arith() {
        let a = build_default::<f32>(
            VelocityProfile::default(),
            Pid::default(),
            AccelCfg::default(),
        )
        .unwrap();
        assert!(!a.is_running());
    }
}
