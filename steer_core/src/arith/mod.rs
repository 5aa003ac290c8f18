//! Generic vector-space arithmetic.
//!
//! An [`Arith`] implementation is a stateless strategy for one value type.
//! Implementors supply `add`, `scale`, `dot` and `zero`; everything else
//! (length, clamp, lerp, approximate equality, ...) is derived once here and
//! reused by the profile, PID and accelerator for every value type.
//!
//! Two ways to get an implementation:
//! - compile time, through [`HasArith`] (`T::Arith::default()`);
//! - run time, through the process-wide [`registry`] after [`init`].

mod angle;
mod color;
mod euclid;
pub mod registry;

use std::fmt;
use std::sync::Arc;

use nalgebra::SVector;

pub use angle::AngleArith;
pub use color::{Color, ColorArith};
pub use euclid::EuclidArith;
pub use registry::{ArithTag, init};

/// Default tolerance for approximate comparisons.
pub const EPSILON: f32 = 1e-6;

/// Vector-space operations over `Self::Value`.
///
/// `add` must be commutative and associative, `scale` bilinear and `dot`
/// symmetric for the derived operations to be meaningful. Nothing here
/// verifies that.
pub trait Arith {
    type Value: Copy + fmt::Debug + 'static;

    /// The additive identity.
    fn zero(&self) -> Self::Value;
    /// Returns a + b.
    fn add(&self, a: Self::Value, b: Self::Value) -> Self::Value;
    /// Returns k * a.
    fn scale(&self, k: f32, a: Self::Value) -> Self::Value;
    /// Returns a · b.
    fn dot(&self, a: Self::Value, b: Self::Value) -> f32;

    #[inline]
    fn length2(&self, a: Self::Value) -> f32 {
        self.dot(a, a)
    }

    #[inline]
    fn length(&self, a: Self::Value) -> f32 {
        self.length2(a).sqrt()
    }

    #[inline]
    fn negate(&self, a: Self::Value) -> Self::Value {
        self.scale(-1.0, a)
    }

    /// Returns a - b.
    #[inline]
    fn difference(&self, a: Self::Value, b: Self::Value) -> Self::Value {
        self.add(a, self.negate(b))
    }

    fn lerp_unclamped(&self, a: Self::Value, b: Self::Value, ratio: f32) -> Self::Value {
        self.add(a, self.scale(ratio, self.difference(b, a)))
    }

    fn lerp(&self, a: Self::Value, b: Self::Value, ratio: f32) -> Self::Value {
        self.lerp_unclamped(a, b, ratio.clamp(0.0, 1.0))
    }

    /// Limit the magnitude of `a` to `max`. Values already inside the limit
    /// are returned untouched.
    fn clamp(&self, a: Self::Value, max: f32) -> Self::Value {
        let len2 = self.length2(a);
        if len2 <= max * max {
            return a;
        }
        if len2 == 0.0 {
            return self.zero();
        }
        self.scale(max / len2.sqrt(), a)
    }

    /// Split `a` into its length and unit direction. The zero vector yields
    /// `(0, zero)` rather than NaN components.
    fn normalize(&self, a: Self::Value) -> (f32, Self::Value) {
        let len = self.length(a);
        if len == 0.0 {
            return (0.0, self.zero());
        }
        (len, self.scale(1.0 / len, a))
    }

    /// Projection of `a` onto `onto`; zero when `onto` is (nearly) zero.
    fn project(&self, a: Self::Value, onto: Self::Value) -> Self::Value {
        let len2 = self.length2(onto);
        if len2 < EPSILON {
            return self.zero();
        }
        self.scale(self.dot(a, onto) / len2, onto)
    }

    /// True when `length(a) < epsilon`.
    #[inline]
    fn approximately(&self, a: Self::Value, epsilon: f32) -> bool {
        self.length2(a) < epsilon * epsilon
    }

    /// True when `a` and `b` are within `epsilon` of each other.
    #[inline]
    fn approximately_eq(&self, a: Self::Value, b: Self::Value, epsilon: f32) -> bool {
        self.approximately(self.difference(b, a), epsilon)
    }
}

impl<A: Arith + ?Sized> Arith for &A {
    type Value = A::Value;

    fn zero(&self) -> Self::Value {
        (**self).zero()
    }
    fn add(&self, a: Self::Value, b: Self::Value) -> Self::Value {
        (**self).add(a, b)
    }
    fn scale(&self, k: f32, a: Self::Value) -> Self::Value {
        (**self).scale(k, a)
    }
    fn dot(&self, a: Self::Value, b: Self::Value) -> f32 {
        (**self).dot(a, b)
    }
    fn clamp(&self, a: Self::Value, max: f32) -> Self::Value {
        (**self).clamp(a, max)
    }
}

/// Plain `f32` arithmetic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScalarArith;

impl Arith for ScalarArith {
    type Value = f32;

    #[inline]
    fn zero(&self) -> f32 {
        0.0
    }
    #[inline]
    fn add(&self, a: f32, b: f32) -> f32 {
        a + b
    }
    #[inline]
    fn scale(&self, k: f32, a: f32) -> f32 {
        k * a
    }
    #[inline]
    fn dot(&self, a: f32, b: f32) -> f32 {
        a * b
    }
}

/// Type-erased, cheaply clonable arithmetic, as handed out by the registry.
#[derive(Clone)]
pub struct Shared<T> {
    tag: ArithTag,
    inner: Arc<dyn Arith<Value = T> + Send + Sync>,
}

impl<T: Copy + fmt::Debug + 'static> Shared<T> {
    pub fn new<A>(tag: ArithTag, arith: A) -> Self
    where
        A: Arith<Value = T> + Send + Sync + 'static,
    {
        Self {
            tag,
            inner: Arc::new(arith),
        }
    }

    pub fn tag(&self) -> ArithTag {
        self.tag
    }
}

impl<T> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared").field("tag", &self.tag).finish()
    }
}

impl<T: Copy + fmt::Debug + 'static> Arith for Shared<T> {
    type Value = T;

    fn zero(&self) -> T {
        self.inner.zero()
    }
    fn add(&self, a: T, b: T) -> T {
        self.inner.add(a, b)
    }
    fn scale(&self, k: f32, a: T) -> T {
        self.inner.scale(k, a)
    }
    fn dot(&self, a: T, b: T) -> f32 {
        self.inner.dot(a, b)
    }
    fn clamp(&self, a: T, max: f32) -> T {
        self.inner.clamp(a, max)
    }
}

/// Compile-time default arithmetic for a value type.
pub trait HasArith: Copy + fmt::Debug + 'static {
    type Arith: Arith<Value = Self> + Default + Send + Sync + 'static;

    fn arith() -> Self::Arith {
        Self::Arith::default()
    }
}

impl HasArith for f32 {
    type Arith = ScalarArith;
}

impl<const N: usize> HasArith for SVector<f32, N> {
    type Arith = EuclidArith<N>;
}

impl HasArith for Color {
    type Arith = ColorArith;
}

/// Conversion between a value and its flat `f32` components, used when
/// values come from configuration files or go out as telemetry.
pub trait Components: Sized {
    fn from_components(c: &[f32]) -> Option<Self>;
    fn components(&self) -> Vec<f32>;
}

impl Components for f32 {
    fn from_components(c: &[f32]) -> Option<Self> {
        match c {
            [x] => Some(*x),
            _ => None,
        }
    }
    fn components(&self) -> Vec<f32> {
        vec![*self]
    }
}

impl<const N: usize> Components for SVector<f32, N> {
    fn from_components(c: &[f32]) -> Option<Self> {
        (c.len() == N).then(|| SVector::from_column_slice(c))
    }
    fn components(&self) -> Vec<f32> {
        self.iter().copied().collect()
    }
}

impl Components for Color {
    fn from_components(c: &[f32]) -> Option<Self> {
        match c {
            [r, g, b] => Some(Color::rgb(*r, *g, *b)),
            [r, g, b, a] => Some(Color::new(*r, *g, *b, *a)),
            _ => None,
        }
    }
    fn components(&self) -> Vec<f32> {
        vec![self.r, self.g, self.b, self.a]
    }
}
