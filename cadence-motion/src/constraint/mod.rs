//! Motion constraints.
//!
//! A constraint bounds either the velocity along a path at a point
//! ([`VelocityConstraint`]) or the tangential acceleration given a point and
//! the current velocity ([`AccelerationConstraint`]). A
//! [`MultipleConstraint`] stands for a physical limit that implies several
//! of both.
//!
//! Redundancy: `a.other_is_redundant(b)` may only return `true` when every
//! motion `a` allows is also allowed by `b`, so that dropping `b` never
//! changes the feasible set.

mod constrainer;
mod library;
mod set;

pub use constrainer::{PointConstraint, TrajectoryConstrainer};
pub use library::{
    ConstraintBundle, MaxAngularAcceleration, MaxAngularVelocity, MaxCentripetalAcceleration,
    MaxTangentAcceleration, MaxTotalAcceleration, MaxVelocity,
};
pub use set::{MotionConstraintSet, PERMISSIVE_LIMIT};

use crate::path::PathPoint;
use cadence_core::interval::Interval;
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// Upper bound on velocity at a path point.
pub trait VelocityConstraint: Debug + Send + Sync {
    /// Largest allowed velocity at `point`; may be infinite.
    fn max_velocity(&self, point: &PathPoint) -> f64;

    /// Whether `other` is implied by `self` and can be dropped.
    fn other_is_redundant(&self, _other: &dyn VelocityConstraint) -> bool {
        false
    }

    /// For downcasting in [`other_is_redundant`](Self::other_is_redundant).
    fn as_any(&self) -> &dyn Any;
}

/// Range of tangential acceleration at a path point and velocity.
pub trait AccelerationConstraint: Debug + Send + Sync {
    /// Allowed tangential accelerations; empty if no acceleration keeps the
    /// motion within the limit.
    fn acceleration_range(&self, point: &PathPoint, velocity: f64) -> Interval;

    /// Whether `other` is implied by `self` and can be dropped.
    fn other_is_redundant(&self, _other: &dyn AccelerationConstraint) -> bool {
        false
    }

    /// For downcasting in [`other_is_redundant`](Self::other_is_redundant).
    fn as_any(&self) -> &dyn Any;
}

/// A limit expressed as several velocity and acceleration constraints.
pub trait MultipleConstraint: Debug + Send + Sync {
    /// Velocity constraints implied by this limit.
    fn velocity_constraints(&self) -> Vec<Arc<dyn VelocityConstraint>>;

    /// Acceleration constraints implied by this limit.
    fn acceleration_constraints(&self) -> Vec<Arc<dyn AccelerationConstraint>>;
}

/// Any kind of motion constraint.
#[derive(Debug, Clone)]
pub enum MotionConstraint {
    /// A velocity cap.
    Velocity(Arc<dyn VelocityConstraint>),
    /// An acceleration range.
    Acceleration(Arc<dyn AccelerationConstraint>),
    /// A bundle of both.
    Multiple(Arc<dyn MultipleConstraint>),
}

impl MotionConstraint {
    /// Wrap a velocity constraint.
    pub fn velocity(constraint: impl VelocityConstraint + 'static) -> Self {
        Self::Velocity(Arc::new(constraint))
    }

    /// Wrap an acceleration constraint.
    pub fn acceleration(constraint: impl AccelerationConstraint + 'static) -> Self {
        Self::Acceleration(Arc::new(constraint))
    }

    /// Wrap a multiple constraint.
    pub fn multiple(constraint: impl MultipleConstraint + 'static) -> Self {
        Self::Multiple(Arc::new(constraint))
    }
}
