//! Status values returned from each accelerator tick.

use std::fmt;

/// Why a motion ended. Reported exactly once per motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Completion {
    /// Position and velocity errors were both within tolerance.
    Converged,
    /// Convergence checking ran longer than the configured timeout.
    Timeout,
    /// `abort()` was called; observed on the following tick.
    Aborted,
}

impl Completion {
    pub fn name(self) -> &'static str {
        match self {
            Completion::Converged => "converged",
            Completion::Timeout => "timeout",
            Completion::Aborted => "aborted",
        }
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The control signal emitted on a running tick. It has already been written
/// to the body when the caller sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control<T> {
    Force(T),
    Velocity(T),
}

impl<T: Copy> Control<T> {
    pub fn value(&self) -> T {
        match *self {
            Control::Force(v) | Control::Velocity(v) => v,
        }
    }
}

/// Public status of a single accelerator step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepStatus<T> {
    /// No motion is running; nothing was read or written.
    Idle,
    /// Keep going; the control output was applied to the body.
    Running(Control<T>),
    /// The motion ended this tick and the accelerator is stopped again.
    Complete(Completion),
}

impl<T> StepStatus<T> {
    pub fn completion(&self) -> Option<Completion> {
        match self {
            StepStatus::Complete(c) => Some(*c),
            _ => None,
        }
    }
}
