use std::f32::consts::TAU;

use super::Arith;

/// Scalar angle arithmetic with wraparound.
///
/// `add` and `scale` wrap results into `[0, period)`. `scale` and `dot` act
/// on the shortest representative of each operand, in `(-period/2,
/// period/2]`, so lengths, clamps and lerps follow the short way round.
///
/// Velocities are angles too: a rate whose magnitude reaches half a period
/// per unit time aliases to the opposite direction. Keep `v_scale` well
/// under `period / 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleArith {
    period: f32,
}

impl AngleArith {
    pub const RADIANS: AngleArith = AngleArith { period: TAU };
    pub const DEGREES: AngleArith = AngleArith { period: 360.0 };

    /// # Panics
    /// If `period` is not finite and positive.
    pub fn new(period: f32) -> Self {
        assert!(
            period.is_finite() && period > 0.0,
            "angle period must be finite and positive, got {period}"
        );
        Self { period }
    }

    pub const fn radians() -> Self {
        Self::RADIANS
    }

    pub const fn degrees() -> Self {
        Self::DEGREES
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    /// Wrap into `[0, period)`.
    pub fn wrap(&self, a: f32) -> f32 {
        let r = a.rem_euclid(self.period);
        // rem_euclid can round up to the period itself for tiny negatives
        if r >= self.period { 0.0 } else { r }
    }

    /// Shortest signed representative, in `(-period/2, period/2]`.
    pub fn shortest(&self, a: f32) -> f32 {
        let w = self.wrap(a);
        if w > self.period * 0.5 {
            w - self.period
        } else {
            w
        }
    }
}

impl Default for AngleArith {
    fn default() -> Self {
        Self::RADIANS
    }
}

impl Arith for AngleArith {
    type Value = f32;

    fn zero(&self) -> f32 {
        0.0
    }

    fn add(&self, a: f32, b: f32) -> f32 {
        self.wrap(a + b)
    }

    fn scale(&self, k: f32, a: f32) -> f32 {
        self.wrap(k * self.shortest(a))
    }

    fn dot(&self, a: f32, b: f32) -> f32 {
        self.shortest(a) * self.shortest(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(370.0, 10.0)]
    #[case(-10.0, 350.0)]
    #[case(360.0, 0.0)]
    #[case(720.0, 0.0)]
    #[case(-1e-9, 0.0)]
    fn wraps_degrees(#[case] input: f32, #[case] expected: f32) {
        let w = AngleArith::DEGREES.wrap(input);
        assert!((0.0..360.0).contains(&w));
        assert!((w - expected).abs() < 1e-4, "{input} wrapped to {w}");
    }

    #[test]
    fn shortest_picks_short_way_round() {
        let a = AngleArith::DEGREES;
        assert_eq!(a.shortest(350.0), -10.0);
        assert_eq!(a.shortest(180.0), 180.0);
        assert_eq!(a.shortest(190.0), -170.0);
    }

    #[test]
    fn difference_is_short_arc() {
        let a = AngleArith::DEGREES;
        let d = a.difference(10.0, 350.0);
        assert!((a.shortest(d) - 20.0).abs() < 1e-4);
        assert!((a.length(d) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn lerp_crosses_zero() {
        let a = AngleArith::DEGREES;
        let mid = a.lerp(350.0, 10.0, 0.5);
        assert!(a.approximately(mid, 1e-3), "midpoint {mid}");
    }

    #[test]
    fn radians_add_wraps() {
        let a = AngleArith::RADIANS;
        let s = a.add(TAU - 0.1, 0.2);
        assert!((s - 0.1).abs() < 1e-5);
    }

    #[test]
    #[should_panic(expected = "angle period")]
    fn zero_period_rejected() {
        let _ = AngleArith::new(0.0);
    }
}
