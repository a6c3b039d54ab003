//! Kinematic constraints.

use super::{AccelerationConstraint, MultipleConstraint, VelocityConstraint};
use crate::path::PathPoint;
use cadence_core::interval::Interval;
use std::any::Any;
use std::sync::Arc;

/// `other` is the same kind of constraint as `self` and its bound is at
/// least as loose.
fn looser<T: Any>(other: &dyn Any, bound: f64, other_bound: impl Fn(&T) -> f64) -> bool {
    other.downcast_ref::<T>().is_some_and(|o| other_bound(o) >= bound)
}

/// Constant velocity cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxVelocity {
    max: f64,
}

impl MaxVelocity {
    /// Velocity may not exceed `max`.
    pub fn new(max: f64) -> Self {
        Self { max }
    }
}

impl VelocityConstraint for MaxVelocity {
    fn max_velocity(&self, _point: &PathPoint) -> f64 {
        self.max
    }

    fn other_is_redundant(&self, other: &dyn VelocityConstraint) -> bool {
        looser::<Self>(other.as_any(), self.max, |o| o.max)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Cap on the rate of heading change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxAngularVelocity {
    max: f64,
}

impl MaxAngularVelocity {
    /// Angular velocity may not exceed `max` rad/s.
    pub fn new(max: f64) -> Self {
        Self { max }
    }
}

impl VelocityConstraint for MaxAngularVelocity {
    fn max_velocity(&self, point: &PathPoint) -> f64 {
        let rate = point.heading_deriv.abs();
        if rate == 0.0 { f64::INFINITY } else { self.max / rate }
    }

    fn other_is_redundant(&self, other: &dyn VelocityConstraint) -> bool {
        looser::<Self>(other.as_any(), self.max, |o| o.max)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Cap on centripetal acceleration `v^2 * |curvature|`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxCentripetalAcceleration {
    max: f64,
}

impl MaxCentripetalAcceleration {
    /// Centripetal acceleration may not exceed `max`.
    pub fn new(max: f64) -> Self {
        Self { max }
    }
}

impl VelocityConstraint for MaxCentripetalAcceleration {
    fn max_velocity(&self, point: &PathPoint) -> f64 {
        let curvature = point.curve.curvature().abs();
        if curvature == 0.0 {
            f64::INFINITY
        } else {
            (self.max / curvature).sqrt()
        }
    }

    fn other_is_redundant(&self, other: &dyn VelocityConstraint) -> bool {
        looser::<Self>(other.as_any(), self.max, |o| o.max)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Symmetric bound on tangential acceleration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxTangentAcceleration {
    max: f64,
}

impl MaxTangentAcceleration {
    /// Tangential acceleration must lie in `[-max, max]`.
    pub fn new(max: f64) -> Self {
        Self { max }
    }
}

impl AccelerationConstraint for MaxTangentAcceleration {
    fn acceleration_range(&self, _point: &PathPoint, _velocity: f64) -> Interval {
        Interval::symmetric(self.max)
    }

    fn other_is_redundant(&self, other: &dyn AccelerationConstraint) -> bool {
        looser::<Self>(other.as_any(), self.max, |o| o.max)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Bound on the magnitude of total acceleration, tangential and
/// centripetal combined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxTotalAcceleration {
    max: f64,
}

impl MaxTotalAcceleration {
    /// Total acceleration may not exceed `max`.
    pub fn new(max: f64) -> Self {
        Self { max }
    }
}

impl AccelerationConstraint for MaxTotalAcceleration {
    fn acceleration_range(&self, point: &PathPoint, velocity: f64) -> Interval {
        let centripetal = velocity * velocity * point.curve.curvature();
        let remaining = self.max * self.max - centripetal * centripetal;
        if remaining < 0.0 {
            Interval::EMPTY
        } else {
            Interval::symmetric(remaining.sqrt())
        }
    }

    fn other_is_redundant(&self, other: &dyn AccelerationConstraint) -> bool {
        // total acceleration bounds the tangential part too
        looser::<Self>(other.as_any(), self.max, |o| o.max)
            || looser::<MaxTangentAcceleration>(other.as_any(), self.max, |o| o.max)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Bound on angular acceleration `h'' v^2 + h' a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxAngularAcceleration {
    max: f64,
}

impl MaxAngularAcceleration {
    /// Angular acceleration may not exceed `max` rad/s^2.
    pub fn new(max: f64) -> Self {
        Self { max }
    }
}

impl AccelerationConstraint for MaxAngularAcceleration {
    fn acceleration_range(&self, point: &PathPoint, velocity: f64) -> Interval {
        let h1 = point.heading_deriv;
        let h2 = point.heading_second_deriv;
        let fixed = h2 * velocity * velocity;
        if h1 == 0.0 {
            return if fixed.abs() <= self.max {
                Interval::REAL
            } else {
                Interval::EMPTY
            };
        }
        Interval::spanning((-self.max - fixed) / h1, (self.max - fixed) / h1)
    }

    fn other_is_redundant(&self, other: &dyn AccelerationConstraint) -> bool {
        looser::<Self>(other.as_any(), self.max, |o| o.max)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An explicit group of constraints that belong together.
#[derive(Debug, Clone, Default)]
pub struct ConstraintBundle {
    velocity: Vec<Arc<dyn VelocityConstraint>>,
    acceleration: Vec<Arc<dyn AccelerationConstraint>>,
}

impl ConstraintBundle {
    /// An empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a velocity constraint.
    pub fn with_velocity(mut self, constraint: impl VelocityConstraint + 'static) -> Self {
        self.velocity.push(Arc::new(constraint));
        self
    }

    /// Add an acceleration constraint.
    pub fn with_acceleration(mut self, constraint: impl AccelerationConstraint + 'static) -> Self {
        self.acceleration.push(Arc::new(constraint));
        self
    }
}

impl MultipleConstraint for ConstraintBundle {
    fn velocity_constraints(&self) -> Vec<Arc<dyn VelocityConstraint>> {
        self.velocity.clone()
    }

    fn acceleration_constraints(&self) -> Vec<Arc<dyn AccelerationConstraint>> {
        self.acceleration.clone()
    }
}
