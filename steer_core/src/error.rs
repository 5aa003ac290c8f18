use thiserror::Error;

use crate::status::Completion;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArithError {
    #[error(
        "no arithmetic registered for `{type_name}`; call steer_core::arith::init() or register one"
    )]
    Unregistered { type_name: &'static str },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EasingError {
    #[error("unsupported curve: {0}")]
    UnsupportedCurve(String),
    #[error("unsupported interpolation: {0}")]
    UnsupportedInterpolation(String),
    #[error("keyframe curve needs at least one sample")]
    EmptyKeyframes,
    #[error("keyframe times must be finite and strictly increasing (index {0})")]
    UnsortedKeyframes(usize),
    #[error("keyframe CSV '{0}' was not loaded")]
    UnresolvedCsv(String),
}

#[derive(Debug, Error, Clone)]
pub enum SteerError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid state: {0}")]
    State(String),
    #[error("max ticks exceeded ({0})")]
    TickCap(u64),
    #[error("motion ended without converging: {0}")]
    NotConverged(Completion),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing arithmetic for `{type_name}`")]
    MissingArith { type_name: &'static str },
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
