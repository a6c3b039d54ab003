//! Constraints evaluated along one path.

use super::MotionConstraintSet;
use crate::path::{Path, PathPoint};
use cadence_core::interval::Interval;

/// A constraint set bound to a specific path.
pub struct TrajectoryConstrainer<'a, P: Path + ?Sized> {
    path: &'a P,
    constraints: &'a MotionConstraintSet,
}

impl<'a, P: Path + ?Sized> TrajectoryConstrainer<'a, P> {
    /// Bind `constraints` to `path`.
    pub fn new(path: &'a P, constraints: &'a MotionConstraintSet) -> Self {
        Self { path, constraints }
    }

    /// The bound path.
    pub fn path(&self) -> &'a P {
        self.path
    }

    /// The bound constraint set.
    pub fn constraints(&self) -> &'a MotionConstraintSet {
        self.constraints
    }

    /// Constraints at arc length `s`.
    pub fn at(&self, s: f64) -> PointConstraint<'a> {
        PointConstraint::new(self.path.point_at(s), self.constraints)
    }

    /// Constraints at an already evaluated path point.
    pub fn at_point(&self, point: PathPoint) -> PointConstraint<'a> {
        PointConstraint::new(point, self.constraints)
    }
}

/// The combined constraint at a single path point.
#[derive(Debug, Clone, Copy)]
pub struct PointConstraint<'a> {
    point: PathPoint,
    max_velocity: f64,
    constraints: &'a MotionConstraintSet,
}

impl<'a> PointConstraint<'a> {
    fn new(point: PathPoint, constraints: &'a MotionConstraintSet) -> Self {
        Self {
            max_velocity: constraints.max_velocity(&point),
            point,
            constraints,
        }
    }

    /// The path point.
    pub fn point(&self) -> &PathPoint {
        &self.point
    }

    /// Minimum of all velocity caps.
    pub fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    /// Intersection of all acceleration ranges at `velocity`.
    pub fn acceleration_range(&self, velocity: f64) -> Interval {
        self.constraints.acceleration_range(&self.point, velocity)
    }
}
