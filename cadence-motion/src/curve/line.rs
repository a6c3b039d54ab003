//! Straight line segments.

use super::{Curve, CurvePoint};
use crate::math::Vector2d;
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};

/// A straight segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Archive, RkyvSerialize, RkyvDeserialize)]
pub struct Line {
    start: Vector2d,
    end: Vector2d,
}

impl Line {
    /// Create a line.
    #[must_use]
    pub fn new(start: Vector2d, end: Vector2d) -> Self {
        Self { start, end }
    }

    /// Start point.
    pub fn start(&self) -> Vector2d {
        self.start
    }

    /// End point.
    pub fn end(&self) -> Vector2d {
        self.end
    }
}

impl Curve for Line {
    fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    fn point_at(&self, s: f64) -> CurvePoint {
        let direction = (self.end - self.start).normalized();
        let s = s.clamp(0.0, self.length());
        CurvePoint {
            position: self.start + direction * s,
            position_deriv: direction,
            position_second_deriv: Vector2d::ZERO,
            tangent_angle: direction.angle(),
            tangent_angle_deriv: 0.0,
            tangent_angle_second_deriv: 0.0,
        }
    }
}
