use nalgebra::SVector;

use super::Arith;

/// Component-wise arithmetic over `N`-dimensional `f32` vectors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EuclidArith<const N: usize>;

impl<const N: usize> Arith for EuclidArith<N> {
    type Value = SVector<f32, N>;

    #[inline]
    fn zero(&self) -> Self::Value {
        SVector::zeros()
    }

    #[inline]
    fn add(&self, a: Self::Value, b: Self::Value) -> Self::Value {
        a + b
    }

    #[inline]
    fn scale(&self, k: f32, a: Self::Value) -> Self::Value {
        a * k
    }

    #[inline]
    fn dot(&self, a: Self::Value, b: Self::Value) -> f32 {
        a.dot(&b)
    }

    // nalgebra has a faster norm than the provided sqrt(dot).
    #[inline]
    fn length(&self, a: Self::Value) -> f32 {
        a.norm()
    }
}
