//! Paths: curves with heading.
//!
//! A [`Path`] is what the profile generator and trajectories consume. The
//! concrete, serializable implementation is [`MultiplePath`], a sequence of
//! [`PathSegment`]s sharing one arc-length domain.

mod heading;
mod multiple;
mod segment;

pub use heading::HeadingMode;
pub use multiple::MultiplePath;
pub use segment::{PathSegment, PointTurn};

use crate::curve::CurvePoint;
use crate::math::Pose2d;
use cadence_core::stepper::Stepper;

/// Geometry and heading of a path at one arc-length coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PathPoint {
    /// Geometry of the underlying curve.
    pub curve: CurvePoint,
    /// Heading.
    pub heading: f64,
    /// Derivative of heading with respect to arc length.
    pub heading_deriv: f64,
    /// Second derivative of heading with respect to arc length.
    pub heading_second_deriv: f64,
}

impl PathPoint {
    /// Position and heading.
    #[must_use]
    pub fn pose(&self) -> Pose2d {
        Pose2d::from_vec(self.curve.position, self.heading)
    }

    /// Derivative of the pose with respect to arc length.
    #[must_use]
    pub fn pose_deriv(&self) -> Pose2d {
        Pose2d::from_vec(self.curve.position_deriv, self.heading_deriv)
    }

    /// Second derivative of the pose with respect to arc length.
    #[must_use]
    pub fn pose_second_deriv(&self) -> Pose2d {
        Pose2d::from_vec(self.curve.position_second_deriv, self.heading_second_deriv)
    }
}

/// A curve with heading, parameterized by arc length over `[0, length]`.
pub trait Path {
    /// Total arc length.
    fn length(&self) -> f64;

    /// Path point at arc length `s`, clamped to the domain.
    fn point_at(&self, s: f64) -> PathPoint;

    /// Cursor for sequential queries.
    fn stepper(&self) -> Box<dyn Stepper<PathPoint> + '_>;
}
