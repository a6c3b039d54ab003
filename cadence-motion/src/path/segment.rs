//! Single path segments.

use super::heading::HeadingMode;
use super::{Path, PathPoint};
use crate::curve::{Curve, CurvePoint, CurveShape, Line, ReparamCurve};
use crate::math::{Pose2d, Vector2d};
use cadence_core::stepper::Stepper;
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};

/// Rotation in place.
///
/// Arc length is measured in radians of heading change, so a profile over
/// a point turn limits angular rather than linear motion. A zero turn is a
/// path of length zero at a single pose.
#[derive(Debug, Clone, Copy, PartialEq, Archive, RkyvSerialize, RkyvDeserialize)]
pub struct PointTurn {
    position: Vector2d,
    start_heading: f64,
    turn: f64,
}

impl PointTurn {
    /// Turn by `turn` radians (positive is counter-clockwise) starting from
    /// `start`.
    #[must_use]
    pub fn new(start: Pose2d, turn: f64) -> Self {
        Self {
            position: start.vec,
            start_heading: start.heading,
            turn,
        }
    }

    /// A zero-length path that stays at `pose`.
    #[must_use]
    pub fn stationary(pose: Pose2d) -> Self {
        Self::new(pose, 0.0)
    }

    /// Signed total turn.
    pub fn turn(&self) -> f64 {
        self.turn
    }
}

impl Path for PointTurn {
    fn length(&self) -> f64 {
        self.turn.abs()
    }

    fn point_at(&self, s: f64) -> PathPoint {
        let direction = if self.turn > 0.0 {
            1.0
        } else if self.turn < 0.0 {
            -1.0
        } else {
            0.0
        };
        let s = s.clamp(0.0, self.length());
        PathPoint {
            curve: CurvePoint {
                position: self.position,
                tangent_angle: self.start_heading,
                ..CurvePoint::default()
            },
            heading: self.start_heading + direction * s,
            heading_deriv: direction,
            heading_second_deriv: 0.0,
        }
    }

    fn stepper(&self) -> Box<dyn Stepper<PathPoint> + '_> {
        Box::new(PointTurnStepper { turn: self })
    }
}

struct PointTurnStepper<'a> {
    turn: &'a PointTurn,
}

impl Stepper<PathPoint> for PointTurnStepper<'_> {
    fn step_to(&mut self, at: f64) -> PathPoint {
        self.turn.point_at(at)
    }
}

/// One piece of a [`MultiplePath`](super::MultiplePath).
#[derive(Debug, Clone, PartialEq, Archive, RkyvSerialize, RkyvDeserialize)]
pub enum PathSegment {
    /// A curve with a heading rule.
    Curve {
        /// The geometry.
        shape: CurveShape,
        /// How heading follows the geometry.
        heading: HeadingMode,
    },
    /// Rotation in place.
    PointTurn(PointTurn),
}

impl PathSegment {
    /// A curve segment.
    #[must_use]
    pub fn curve(shape: impl Into<CurveShape>, heading: HeadingMode) -> Self {
        Self::Curve {
            shape: shape.into(),
            heading,
        }
    }

    /// A straight segment from `start` to `end`.
    #[must_use]
    pub fn line(start: Vector2d, end: Vector2d, heading: HeadingMode) -> Self {
        Self::curve(Line::new(start, end), heading)
    }

    /// A spline segment.
    #[must_use]
    pub fn spline(curve: ReparamCurve, heading: HeadingMode) -> Self {
        Self::curve(curve, heading)
    }

    /// A turn in place.
    #[must_use]
    pub fn point_turn(start: Pose2d, turn: f64) -> Self {
        Self::PointTurn(PointTurn::new(start, turn))
    }
}

impl Path for PathSegment {
    fn length(&self) -> f64 {
        match self {
            Self::Curve { shape, .. } => shape.length(),
            Self::PointTurn(turn) => turn.length(),
        }
    }

    fn point_at(&self, s: f64) -> PathPoint {
        match self {
            Self::Curve { shape, heading } => {
                with_heading(shape.point_at(s), *heading, s, shape.length())
            }
            Self::PointTurn(turn) => turn.point_at(s),
        }
    }

    fn stepper(&self) -> Box<dyn Stepper<PathPoint> + '_> {
        match self {
            Self::Curve { shape, heading } => Box::new(CurveSegmentStepper {
                curve: shape.stepper(),
                heading: *heading,
                length: shape.length(),
            }),
            Self::PointTurn(turn) => turn.stepper(),
        }
    }
}

fn with_heading(curve: CurvePoint, mode: HeadingMode, s: f64, length: f64) -> PathPoint {
    let (heading, heading_deriv, heading_second_deriv) = mode.evaluate(&curve, s, length);
    PathPoint {
        curve,
        heading,
        heading_deriv,
        heading_second_deriv,
    }
}

struct CurveSegmentStepper<'a> {
    curve: Box<dyn Stepper<CurvePoint> + 'a>,
    heading: HeadingMode,
    length: f64,
}

impl Stepper<PathPoint> for CurveSegmentStepper<'_> {
    fn step_to(&mut self, at: f64) -> PathPoint {
        let point = self.curve.step_to(at);
        with_heading(point, self.heading, at, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn point_turn_rotates_in_place() {
        let turn = PointTurn::new(Pose2d::new(1.0, 2.0, 0.0), -FRAC_PI_2);
        assert_eq!(turn.length(), FRAC_PI_2);

        let end = turn.point_at(turn.length());
        assert!(end.pose().epsilon_eq(Pose2d::new(1.0, 2.0, -FRAC_PI_2), EPSILON));
        assert_eq!(end.heading_deriv, -1.0);
        assert_eq!(end.pose_deriv().vec, Vector2d::ZERO);
    }

    #[test]
    fn stationary_turn_is_a_single_point() {
        let pose = Pose2d::new(3.0, -1.0, 0.7);
        let turn = PointTurn::stationary(pose);
        assert_eq!(turn.length(), 0.0);
        let point = turn.point_at(0.0);
        assert_eq!(point.pose(), pose);
        assert_eq!(point.pose_deriv(), Pose2d::ZERO);
        assert_eq!(point.pose_second_deriv(), Pose2d::ZERO);
    }

    #[test]
    fn line_segment_with_linear_heading() {
        let segment = PathSegment::line(
            Vector2d::ZERO,
            Vector2d::new(0.0, 2.0),
            HeadingMode::Linear { from: 0.0, to: 1.0 },
        );
        let point = segment.point_at(1.0);
        assert!(point.pose().epsilon_eq(Pose2d::new(0.0, 1.0, 0.5), EPSILON));
        assert!(point.pose_deriv().epsilon_eq(Pose2d::new(0.0, 1.0, 0.5), EPSILON));
    }

    #[test]
    fn segment_stepper_matches_point_queries() {
        let segment = PathSegment::line(
            Vector2d::ZERO,
            Vector2d::new(3.0, 4.0),
            HeadingMode::TANGENT,
        );
        let mut stepper = segment.stepper();
        for s in [0.0, 1.0, 2.5, 2.0, 5.0] {
            assert_eq!(stepper.step_to(s), segment.point_at(s));
        }
    }
}
