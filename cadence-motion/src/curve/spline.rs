//! Quintic polynomials and splines over `t in [0, 1]`.

use crate::math::Vector2d;
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};

/// A quintic polynomial `c0 + c1 t + ... + c5 t^5`.
#[derive(Debug, Clone, Copy, PartialEq, Archive, RkyvSerialize, RkyvDeserialize)]
pub struct QuinticPolynomial {
    coefficients: [f64; 6],
}

impl QuinticPolynomial {
    /// Create from coefficients, lowest degree first.
    #[must_use]
    pub const fn new(coefficients: [f64; 6]) -> Self {
        Self { coefficients }
    }

    /// The unique quintic with the given value, first and second
    /// derivative at `t = 0` and `t = 1`.
    #[must_use]
    pub fn from_derivatives(p0: f64, v0: f64, a0: f64, p1: f64, v1: f64, a1: f64) -> Self {
        Self::new([
            p0,
            v0,
            a0 / 2.0,
            -10.0 * p0 - 6.0 * v0 - 1.5 * a0 + 0.5 * a1 - 4.0 * v1 + 10.0 * p1,
            15.0 * p0 + 8.0 * v0 + 1.5 * a0 - a1 + 7.0 * v1 - 15.0 * p1,
            -6.0 * p0 - 3.0 * v0 - 0.5 * a0 + 0.5 * a1 - 3.0 * v1 + 6.0 * p1,
        ])
    }

    /// Coefficients, lowest degree first.
    pub fn coefficients(&self) -> &[f64; 6] {
        &self.coefficients
    }

    /// Value at `t`.
    #[must_use]
    pub fn value(&self, t: f64) -> f64 {
        let c = &self.coefficients;
        c[0] + t * (c[1] + t * (c[2] + t * (c[3] + t * (c[4] + t * c[5]))))
    }

    /// First derivative at `t`.
    #[must_use]
    pub fn deriv(&self, t: f64) -> f64 {
        let c = &self.coefficients;
        c[1] + t * (2.0 * c[2] + t * (3.0 * c[3] + t * (4.0 * c[4] + t * 5.0 * c[5])))
    }

    /// Second derivative at `t`.
    #[must_use]
    pub fn second_deriv(&self, t: f64) -> f64 {
        let c = &self.coefficients;
        2.0 * c[2] + t * (6.0 * c[3] + t * (12.0 * c[4] + t * 20.0 * c[5]))
    }

    /// Third derivative at `t`.
    #[must_use]
    pub fn third_deriv(&self, t: f64) -> f64 {
        let c = &self.coefficients;
        6.0 * c[3] + t * (24.0 * c[4] + t * 60.0 * c[5])
    }
}

/// A planar curve with independent quintic `x(t)` and `y(t)`.
#[derive(Debug, Clone, Copy, PartialEq, Archive, RkyvSerialize, RkyvDeserialize)]
pub struct QuinticSpline {
    x: QuinticPolynomial,
    y: QuinticPolynomial,
}

impl QuinticSpline {
    /// Create from component polynomials.
    #[must_use]
    pub const fn new(x: QuinticPolynomial, y: QuinticPolynomial) -> Self {
        Self { x, y }
    }

    /// The spline with the given position and parametric derivatives at
    /// both ends.
    #[must_use]
    pub fn from_derivatives(
        start: Vector2d,
        start_deriv: Vector2d,
        start_second_deriv: Vector2d,
        end: Vector2d,
        end_deriv: Vector2d,
        end_second_deriv: Vector2d,
    ) -> Self {
        Self::new(
            QuinticPolynomial::from_derivatives(
                start.x,
                start_deriv.x,
                start_second_deriv.x,
                end.x,
                end_deriv.x,
                end_second_deriv.x,
            ),
            QuinticPolynomial::from_derivatives(
                start.y,
                start_deriv.y,
                start_second_deriv.y,
                end.y,
                end_deriv.y,
                end_second_deriv.y,
            ),
        )
    }

    /// A spline leaving `start` at `start_angle` and arriving at `end` at
    /// `end_angle`, with zero second derivatives.
    ///
    /// Derivative magnitudes are set to the chord length, which keeps the
    /// curve free of loops for moderate turns.
    #[must_use]
    pub fn from_endpoints(
        start: Vector2d,
        start_angle: f64,
        end: Vector2d,
        end_angle: f64,
    ) -> Self {
        let chord = (end - start).norm();
        Self::from_derivatives(
            start,
            Vector2d::from_polar(chord, start_angle),
            Vector2d::ZERO,
            end,
            Vector2d::from_polar(chord, end_angle),
            Vector2d::ZERO,
        )
    }

    /// Consecutive splines passing through every waypoint in order.
    ///
    /// Interior tangents follow the neighbouring waypoints (Catmull-Rom),
    /// end tangents follow the first and last chords, and second
    /// derivatives are zero at every waypoint. Fewer than two waypoints
    /// yield no splines.
    #[must_use]
    pub fn from_waypoints(waypoints: &[Vector2d]) -> Vec<Self> {
        let n = waypoints.len();
        if n < 2 {
            return Vec::new();
        }
        let tangent = |i: usize| {
            let prev = waypoints[i.saturating_sub(1)];
            let next = waypoints[(i + 1).min(n - 1)];
            if i == 0 || i == n - 1 {
                next - prev
            } else {
                (next - prev) / 2.0
            }
        };
        (0..n - 1)
            .map(|i| {
                Self::from_derivatives(
                    waypoints[i],
                    tangent(i),
                    Vector2d::ZERO,
                    waypoints[i + 1],
                    tangent(i + 1),
                    Vector2d::ZERO,
                )
            })
            .collect()
    }

    /// Position at `t`.
    #[must_use]
    pub fn position(&self, t: f64) -> Vector2d {
        Vector2d::new(self.x.value(t), self.y.value(t))
    }

    /// First parametric derivative at `t`.
    #[must_use]
    pub fn deriv(&self, t: f64) -> Vector2d {
        Vector2d::new(self.x.deriv(t), self.y.deriv(t))
    }

    /// Second parametric derivative at `t`.
    #[must_use]
    pub fn second_deriv(&self, t: f64) -> Vector2d {
        Vector2d::new(self.x.second_deriv(t), self.y.second_deriv(t))
    }

    /// Third parametric derivative at `t`.
    #[must_use]
    pub fn third_deriv(&self, t: f64) -> Vector2d {
        Vector2d::new(self.x.third_deriv(t), self.y.third_deriv(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{EPSILON, epsilon_eq};

    #[test]
    fn polynomial_matches_boundary_conditions() {
        let p = QuinticPolynomial::from_derivatives(1.0, -2.0, 3.0, 4.0, 5.0, -6.0);
        assert!(epsilon_eq(p.value(0.0), 1.0, EPSILON));
        assert!(epsilon_eq(p.deriv(0.0), -2.0, EPSILON));
        assert!(epsilon_eq(p.second_deriv(0.0), 3.0, EPSILON));
        assert!(epsilon_eq(p.value(1.0), 4.0, 1e-9));
        assert!(epsilon_eq(p.deriv(1.0), 5.0, 1e-9));
        assert!(epsilon_eq(p.second_deriv(1.0), -6.0, 1e-9));
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let p = QuinticPolynomial::new([0.3, -1.0, 2.0, 0.5, -0.25, 0.1]);
        let h = 1e-6;
        for &t in &[0.1, 0.5, 0.9] {
            let numeric = (p.value(t + h) - p.value(t - h)) / (2.0 * h);
            assert!(epsilon_eq(p.deriv(t), numeric, 1e-6));
            let numeric = (p.second_deriv(t + h) - p.second_deriv(t - h)) / (2.0 * h);
            assert!(epsilon_eq(p.third_deriv(t), numeric, 1e-5));
        }
    }

    #[test]
    fn endpoint_spline_leaves_at_requested_angle() {
        let spline = QuinticSpline::from_endpoints(
            Vector2d::ZERO,
            0.0,
            Vector2d::new(2.0, 2.0),
            std::f64::consts::FRAC_PI_2,
        );
        assert!(spline.position(1.0).epsilon_eq(Vector2d::new(2.0, 2.0), 1e-9));
        assert!(epsilon_eq(spline.deriv(0.0).angle(), 0.0, 1e-12));
        assert!(epsilon_eq(spline.deriv(1.0).angle(), std::f64::consts::FRAC_PI_2, 1e-9));
    }

    #[test]
    fn waypoint_splines_join_smoothly() {
        let points = [
            Vector2d::ZERO,
            Vector2d::new(1.0, 1.0),
            Vector2d::new(2.0, 0.0),
            Vector2d::new(3.0, 1.0),
        ];
        let splines = QuinticSpline::from_waypoints(&points);
        assert_eq!(splines.len(), 3);
        for (i, spline) in splines.iter().enumerate() {
            assert!(spline.position(0.0).epsilon_eq(points[i], 1e-9));
            assert!(spline.position(1.0).epsilon_eq(points[i + 1], 1e-9));
        }
        for pair in splines.windows(2) {
            assert!(pair[0].deriv(1.0).epsilon_eq(pair[1].deriv(0.0), 1e-9));
            assert!(pair[0].second_deriv(1.0).epsilon_eq(pair[1].second_deriv(0.0), 1e-9));
        }
        assert!(QuinticSpline::from_waypoints(&points[..1]).is_empty());
    }
}
