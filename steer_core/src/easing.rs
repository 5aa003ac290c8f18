//! Easing functions `[0, 1] -> ℝ`.
//!
//! [`Easer::evaluate`] clamps its input to `[0, 1]` and never its output:
//! back, elastic and bounce curves overshoot on purpose.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::EasingError;

const C1: f32 = 1.701_58;
const C2: f32 = C1 * 1.525;
const C3: f32 = C1 + 1.0;
const C4: f32 = TAU / 3.0;
const C5: f32 = TAU / 4.5;

/// The closed set of named curves (easings.net definitions).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InBack,
    OutBack,
    InOutBack,
    InElastic,
    OutElastic,
    InOutElastic,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl Curve {
    pub const ALL: [Curve; 31] = [
        Curve::Linear,
        Curve::InQuad,
        Curve::OutQuad,
        Curve::InOutQuad,
        Curve::InCubic,
        Curve::OutCubic,
        Curve::InOutCubic,
        Curve::InQuart,
        Curve::OutQuart,
        Curve::InOutQuart,
        Curve::InQuint,
        Curve::OutQuint,
        Curve::InOutQuint,
        Curve::InSine,
        Curve::OutSine,
        Curve::InOutSine,
        Curve::InExpo,
        Curve::OutExpo,
        Curve::InOutExpo,
        Curve::InCirc,
        Curve::OutCirc,
        Curve::InOutCirc,
        Curve::InBack,
        Curve::OutBack,
        Curve::InOutBack,
        Curve::InElastic,
        Curve::OutElastic,
        Curve::InOutElastic,
        Curve::InBounce,
        Curve::OutBounce,
        Curve::InOutBounce,
    ];

    /// Kebab-case name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Curve::Linear => "linear",
            Curve::InQuad => "in-quad",
            Curve::OutQuad => "out-quad",
            Curve::InOutQuad => "in-out-quad",
            Curve::InCubic => "in-cubic",
            Curve::OutCubic => "out-cubic",
            Curve::InOutCubic => "in-out-cubic",
            Curve::InQuart => "in-quart",
            Curve::OutQuart => "out-quart",
            Curve::InOutQuart => "in-out-quart",
            Curve::InQuint => "in-quint",
            Curve::OutQuint => "out-quint",
            Curve::InOutQuint => "in-out-quint",
            Curve::InSine => "in-sine",
            Curve::OutSine => "out-sine",
            Curve::InOutSine => "in-out-sine",
            Curve::InExpo => "in-expo",
            Curve::OutExpo => "out-expo",
            Curve::InOutExpo => "in-out-expo",
            Curve::InCirc => "in-circ",
            Curve::OutCirc => "out-circ",
            Curve::InOutCirc => "in-out-circ",
            Curve::InBack => "in-back",
            Curve::OutBack => "out-back",
            Curve::InOutBack => "in-out-back",
            Curve::InElastic => "in-elastic",
            Curve::OutElastic => "out-elastic",
            Curve::InOutElastic => "in-out-elastic",
            Curve::InBounce => "in-bounce",
            Curve::OutBounce => "out-bounce",
            Curve::InOutBounce => "in-out-bounce",
        }
    }

    /// True for the curves that leave `[0, 1]` between the endpoints.
    pub fn overshoots(self) -> bool {
        matches!(
            self,
            Curve::InBack
                | Curve::OutBack
                | Curve::InOutBack
                | Curve::InElastic
                | Curve::OutElastic
                | Curve::InOutElastic
        )
    }

    /// Evaluate at `x` without clamping the input.
    #[allow(clippy::float_cmp)]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Curve::Linear => x,
            Curve::InQuad => x * x,
            Curve::OutQuad => 1.0 - (1.0 - x).powi(2),
            Curve::InOutQuad => {
                if x < 0.5 {
                    2.0 * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(2) / 2.0
                }
            }
            Curve::InCubic => x.powi(3),
            Curve::OutCubic => 1.0 - (1.0 - x).powi(3),
            Curve::InOutCubic => {
                if x < 0.5 {
                    4.0 * x.powi(3)
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
                }
            }
            Curve::InQuart => x.powi(4),
            Curve::OutQuart => 1.0 - (1.0 - x).powi(4),
            Curve::InOutQuart => {
                if x < 0.5 {
                    8.0 * x.powi(4)
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(4) / 2.0
                }
            }
            Curve::InQuint => x.powi(5),
            Curve::OutQuint => 1.0 - (1.0 - x).powi(5),
            Curve::InOutQuint => {
                if x < 0.5 {
                    16.0 * x.powi(5)
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(5) / 2.0
                }
            }
            Curve::InSine => 1.0 - (x * FRAC_PI_2).cos(),
            Curve::OutSine => (x * FRAC_PI_2).sin(),
            Curve::InOutSine => -((PI * x).cos() - 1.0) / 2.0,
            Curve::InExpo => {
                if x == 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * x - 10.0)
                }
            }
            Curve::OutExpo => {
                if x == 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * x)
                }
            }
            Curve::InOutExpo => {
                if x == 0.0 {
                    0.0
                } else if x == 1.0 {
                    1.0
                } else if x < 0.5 {
                    2f32.powf(20.0 * x - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * x + 10.0)) / 2.0
                }
            }
            Curve::InCirc => 1.0 - (1.0 - x * x).max(0.0).sqrt(),
            Curve::OutCirc => (1.0 - (x - 1.0).powi(2)).max(0.0).sqrt(),
            Curve::InOutCirc => {
                if x < 0.5 {
                    (1.0 - (1.0 - (2.0 * x).powi(2)).max(0.0).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * x + 2.0).powi(2)).max(0.0).sqrt() + 1.0) / 2.0
                }
            }
            Curve::InBack => C3 * x.powi(3) - C1 * x * x,
            Curve::OutBack => 1.0 + C3 * (x - 1.0).powi(3) + C1 * (x - 1.0).powi(2),
            Curve::InOutBack => {
                if x < 0.5 {
                    ((2.0 * x).powi(2) * ((C2 + 1.0) * 2.0 * x - C2)) / 2.0
                } else {
                    ((2.0 * x - 2.0).powi(2) * ((C2 + 1.0) * (x * 2.0 - 2.0) + C2) + 2.0) / 2.0
                }
            }
            Curve::InElastic => {
                if x == 0.0 || x == 1.0 {
                    x
                } else {
                    -2f32.powf(10.0 * x - 10.0) * ((x * 10.0 - 10.75) * C4).sin()
                }
            }
            Curve::OutElastic => {
                if x == 0.0 || x == 1.0 {
                    x
                } else {
                    2f32.powf(-10.0 * x) * ((x * 10.0 - 0.75) * C4).sin() + 1.0
                }
            }
            Curve::InOutElastic => {
                if x == 0.0 || x == 1.0 {
                    x
                } else if x < 0.5 {
                    -(2f32.powf(20.0 * x - 10.0) * ((20.0 * x - 11.125) * C5).sin()) / 2.0
                } else {
                    (2f32.powf(-20.0 * x + 10.0) * ((20.0 * x - 11.125) * C5).sin()) / 2.0 + 1.0
                }
            }
            Curve::InBounce => 1.0 - bounce_out(1.0 - x),
            Curve::OutBounce => bounce_out(x),
            Curve::InOutBounce => {
                if x < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * x)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * x - 1.0)) / 2.0
                }
            }
        }
    }
}

fn bounce_out(x: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;
    if x < 1.0 / D1 {
        N1 * x * x
    } else if x < 2.0 / D1 {
        let x = x - 1.5 / D1;
        N1 * x * x + 0.75
    } else if x < 2.5 / D1 {
        let x = x - 2.25 / D1;
        N1 * x * x + 0.9375
    } else {
        let x = x - 2.625 / D1;
        N1 * x * x + 0.984_375
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Curve {
    type Err = EasingError;

    /// Accepts kebab-case (`in-out-quad`); `_` is read as `-` and case is
    /// ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Curve::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| EasingError::UnsupportedCurve(s.to_string()))
    }
}

/// How a [`Keyframes`] curve fills the gaps between samples.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    #[default]
    Linear,
    /// Hold the left sample's value until the next sample.
    Step,
    /// Cubic Hermite with Catmull-Rom tangents.
    Smooth,
}

impl FromStr for Interpolation {
    type Err = EasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Interpolation::Linear),
            "step" | "constant" => Ok(Interpolation::Step),
            "smooth" | "cubic" => Ok(Interpolation::Smooth),
            _ => Err(EasingError::UnsupportedInterpolation(s.to_string())),
        }
    }
}

/// Sampled curve: `(t, value)` pairs with strictly increasing `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    samples: Vec<(f32, f32)>,
    interpolation: Interpolation,
}

impl Keyframes {
    pub fn new(samples: Vec<(f32, f32)>, interpolation: Interpolation) -> Result<Self, EasingError> {
        if samples.is_empty() {
            return Err(EasingError::EmptyKeyframes);
        }
        for (i, (t, v)) in samples.iter().enumerate() {
            if !t.is_finite() || !v.is_finite() {
                return Err(EasingError::UnsortedKeyframes(i));
            }
        }
        if let Some(i) = samples.windows(2).position(|w| w[1].0 <= w[0].0) {
            return Err(EasingError::UnsortedKeyframes(i + 1));
        }
        Ok(Self {
            samples,
            interpolation,
        })
    }

    pub fn samples(&self) -> &[(f32, f32)] {
        &self.samples
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Value at `t`; before the first and after the last sample the
    /// endpoint value is held.
    pub fn evaluate(&self, t: f32) -> f32 {
        let s = &self.samples;
        let (first, last) = match (s.first(), s.last()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => return 0.0,
        };
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }
        // first index with time > t; 1..len because of the guards above
        let hi = s.partition_point(|&(ts, _)| ts <= t);
        let lo = hi - 1;
        let (t0, v0) = s[lo];
        let (t1, v1) = s[hi];
        let h = t1 - t0;
        let u = (t - t0) / h;
        match self.interpolation {
            Interpolation::Step => v0,
            Interpolation::Linear => v0 + (v1 - v0) * u,
            Interpolation::Smooth => {
                let m0 = self.tangent(lo);
                let m1 = self.tangent(hi);
                let u2 = u * u;
                let u3 = u2 * u;
                let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
                let h10 = u3 - 2.0 * u2 + u;
                let h01 = -2.0 * u3 + 3.0 * u2;
                let h11 = u3 - u2;
                h00 * v0 + h10 * h * m0 + h01 * v1 + h11 * h * m1
            }
        }
    }

    // Catmull-Rom slope at sample i, one-sided at the ends.
    fn tangent(&self, i: usize) -> f32 {
        let s = &self.samples;
        let lo = i.saturating_sub(1);
        let hi = (i + 1).min(s.len() - 1);
        if hi == lo {
            return 0.0;
        }
        (s[hi].1 - s[lo].1) / (s[hi].0 - s[lo].0)
    }
}

pub type EaseFn = Arc<dyn Fn(f32) -> f32 + Send + Sync>;

/// A named curve, a sampled curve or an arbitrary function.
#[derive(Clone)]
pub enum Easer {
    Named(Curve),
    Keyframes(Keyframes),
    Custom(EaseFn),
}

impl Default for Easer {
    fn default() -> Self {
        Easer::Named(Curve::Linear)
    }
}

impl fmt::Debug for Easer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easer::Named(c) => f.debug_tuple("Named").field(c).finish(),
            Easer::Keyframes(k) => f.debug_tuple("Keyframes").field(k).finish(),
            Easer::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<Curve> for Easer {
    fn from(c: Curve) -> Self {
        Easer::Named(c)
    }
}

impl From<Keyframes> for Easer {
    fn from(k: Keyframes) -> Self {
        Easer::Keyframes(k)
    }
}

impl FromStr for Easer {
    type Err = EasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Curve>().map(Easer::Named)
    }
}

impl Easer {
    pub fn custom(f: impl Fn(f32) -> f32 + Send + Sync + 'static) -> Self {
        Easer::Custom(Arc::new(f))
    }

    /// Evaluate at `x` clamped to `[0, 1]`. NaN reads as 0.
    pub fn evaluate(&self, x: f32) -> f32 {
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        match self {
            Easer::Named(c) => c.apply(x),
            Easer::Keyframes(k) => k.evaluate(x),
            Easer::Custom(f) => f(x),
        }
    }

    /// `e(1 - x)`; plays the curve backwards ("yoyo").
    #[must_use]
    pub fn flip_x(self) -> Self {
        Easer::custom(move |x| self.evaluate(1.0 - x))
    }

    /// `1 - e(x)`; turns an ease-in into an ease-out and back.
    #[must_use]
    pub fn flip_y(self) -> Self {
        Easer::custom(move |x| 1.0 - self.evaluate(x))
    }
}

/// An [`Easer`] stretched on both axes: `out_scale * e(x / in_scale)`.
#[derive(Debug, Clone)]
pub struct ScaledEaser {
    pub easer: Easer,
    pub in_scale: f32,
    pub out_scale: f32,
}

impl Default for ScaledEaser {
    fn default() -> Self {
        Self {
            easer: Easer::default(),
            in_scale: 1.0,
            out_scale: 1.0,
        }
    }
}

impl ScaledEaser {
    pub fn new(easer: impl Into<Easer>, in_scale: f32, out_scale: f32) -> Self {
        Self {
            easer: easer.into(),
            in_scale,
            out_scale,
        }
    }

    pub fn evaluate(&self, x: f32) -> f32 {
        self.out_scale * self.easer.evaluate(x / self.in_scale)
    }
}
