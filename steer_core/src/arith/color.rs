use nalgebra::Vector4;

use super::{Arith, EuclidArith};

/// Linear RGBA color. Components are not clamped; intermediate values of a
/// motion may leave `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

impl From<Vector4<f32>> for Color {
    fn from(v: Vector4<f32>) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Color> for Vector4<f32> {
    fn from(c: Color) -> Self {
        Vector4::new(c.r, c.g, c.b, c.a)
    }
}

/// Colors behave as 4-vectors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ColorArith;

const RGBA: EuclidArith<4> = EuclidArith;

impl Arith for ColorArith {
    type Value = Color;

    fn zero(&self) -> Color {
        Color::new(0.0, 0.0, 0.0, 0.0)
    }

    fn add(&self, a: Color, b: Color) -> Color {
        RGBA.add(a.into(), b.into()).into()
    }

    fn scale(&self, k: f32, a: Color) -> Color {
        RGBA.scale(k, a.into()).into()
    }

    fn dot(&self, a: Color, b: Color) -> f32 {
        RGBA.dot(a.into(), b.into())
    }
}
