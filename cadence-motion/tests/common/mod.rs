//! Paths and constraint sets shared by motion tests.

#![allow(dead_code)]

use cadence_motion::prelude::*;
use std::f64::consts::FRAC_PI_2;

/// A line along +x starting at the origin.
pub fn straight(length: f64) -> MultiplePath {
    MultiplePath::single(PathSegment::line(
        Vector2d::ZERO,
        Vector2d::new(length, 0.0),
        HeadingMode::TANGENT,
    ))
}

/// Drive 2 m along x, turn left in place, drive 2 m along y.
pub fn corner() -> MultiplePath {
    MultiplePath::new(vec![
        PathSegment::line(Vector2d::ZERO, Vector2d::new(2.0, 0.0), HeadingMode::TANGENT),
        PathSegment::point_turn(Pose2d::new(2.0, 0.0, 0.0), FRAC_PI_2),
        PathSegment::line(
            Vector2d::new(2.0, 0.0),
            Vector2d::new(2.0, 2.0),
            HeadingMode::TANGENT,
        ),
    ])
    .unwrap()
}

/// A smooth S-bend made of two splines.
pub fn s_bend() -> MultiplePath {
    let first = QuinticSpline::from_endpoints(Vector2d::ZERO, 0.0, Vector2d::new(2.0, 1.0), 0.0);
    let second =
        QuinticSpline::from_endpoints(Vector2d::new(2.0, 1.0), 0.0, Vector2d::new(4.0, 0.0), 0.0);
    MultiplePath::new(vec![
        PathSegment::spline(ReparamCurve::from_spline(first).unwrap(), HeadingMode::TANGENT),
        PathSegment::spline(ReparamCurve::from_spline(second).unwrap(), HeadingMode::TANGENT),
    ])
    .unwrap()
}

/// Constant velocity and tangential acceleration limits.
pub fn limits(velocity: f64, acceleration: f64) -> MotionConstraintSet {
    MotionConstraintSet::new([
        MotionConstraint::velocity(MaxVelocity::new(velocity)),
        MotionConstraint::acceleration(MaxTangentAcceleration::new(acceleration)),
    ])
}

/// Limits for a differential drive: linear, angular and centripetal.
pub fn drive_limits() -> MotionConstraintSet {
    MotionConstraintSet::new([
        MotionConstraint::velocity(MaxVelocity::new(3.0)),
        MotionConstraint::velocity(MaxAngularVelocity::new(2.0)),
        MotionConstraint::velocity(MaxCentripetalAcceleration::new(1.5)),
        MotionConstraint::acceleration(MaxTangentAcceleration::new(2.0)),
    ])
}

/// Limits whose acceleration ranges depend on velocity.
pub fn dynamic_limits() -> MotionConstraintSet {
    MotionConstraintSet::new([
        MotionConstraint::velocity(MaxVelocity::new(3.0)),
        MotionConstraint::velocity(MaxAngularVelocity::new(2.0)),
        MotionConstraint::acceleration(MaxTangentAcceleration::new(2.0)),
        MotionConstraint::acceleration(MaxTotalAcceleration::new(2.5)),
        MotionConstraint::acceleration(MaxAngularAcceleration::new(3.0)),
    ])
}

/// Linear, tangential and angular acceleration limits only.
pub fn angular_acceleration_limits(max: f64) -> MotionConstraintSet {
    MotionConstraintSet::new([
        MotionConstraint::velocity(MaxVelocity::new(3.0)),
        MotionConstraint::acceleration(MaxTangentAcceleration::new(2.0)),
        MotionConstraint::acceleration(MaxAngularAcceleration::new(max)),
    ])
}
