//! Flattened, pruned constraint collections.

use super::library::{MaxTangentAcceleration, MaxVelocity};
use super::{AccelerationConstraint, MotionConstraint, VelocityConstraint};
use crate::path::PathPoint;
use cadence_core::interval::Interval;
use std::sync::Arc;
use tracing::{debug, warn};

/// Bound used by the fallback constraints, and the largest velocity or
/// acceleration the profile generator will ever plan for.
pub const PERMISSIVE_LIMIT: f64 = 1e10;

/// Velocity and acceleration constraints with multiples flattened and
/// dominated entries removed.
///
/// Neither list is ever empty. If no constraint of a kind is supplied, a
/// constant [`PERMISSIVE_LIMIT`] bound stands in and a warning is logged;
/// the resulting profile is only as meaningful as the constraints given.
#[derive(Debug, Clone)]
pub struct MotionConstraintSet {
    velocity: Vec<Arc<dyn VelocityConstraint>>,
    acceleration: Vec<Arc<dyn AccelerationConstraint>>,
}

impl MotionConstraintSet {
    /// Flatten and prune `constraints`.
    pub fn new(constraints: impl IntoIterator<Item = MotionConstraint>) -> Self {
        let mut velocity: Vec<Arc<dyn VelocityConstraint>> = Vec::new();
        let mut acceleration: Vec<Arc<dyn AccelerationConstraint>> = Vec::new();
        let mut supplied = 0usize;

        for constraint in constraints {
            match constraint {
                MotionConstraint::Velocity(c) => {
                    supplied += 1;
                    add_velocity(&mut velocity, c);
                }
                MotionConstraint::Acceleration(c) => {
                    supplied += 1;
                    add_acceleration(&mut acceleration, c);
                }
                MotionConstraint::Multiple(m) => {
                    for c in m.velocity_constraints() {
                        supplied += 1;
                        add_velocity(&mut velocity, c);
                    }
                    for c in m.acceleration_constraints() {
                        supplied += 1;
                        add_acceleration(&mut acceleration, c);
                    }
                }
            }
        }

        if velocity.is_empty() {
            warn!(
                limit = PERMISSIVE_LIMIT,
                "No velocity constraints given, substituting a permissive bound"
            );
            velocity.push(Arc::new(MaxVelocity::new(PERMISSIVE_LIMIT)));
        }
        if acceleration.is_empty() {
            warn!(
                limit = PERMISSIVE_LIMIT,
                "No acceleration constraints given, substituting a permissive bound"
            );
            acceleration.push(Arc::new(MaxTangentAcceleration::new(PERMISSIVE_LIMIT)));
        }

        debug!(
            supplied,
            velocity = velocity.len(),
            acceleration = acceleration.len(),
            "Built motion constraint set"
        );

        Self {
            velocity,
            acceleration,
        }
    }

    /// The surviving velocity constraints.
    pub fn velocity_constraints(&self) -> &[Arc<dyn VelocityConstraint>] {
        &self.velocity
    }

    /// The surviving acceleration constraints.
    pub fn acceleration_constraints(&self) -> &[Arc<dyn AccelerationConstraint>] {
        &self.acceleration
    }

    /// Minimum of all velocity caps at `point`.
    pub fn max_velocity(&self, point: &PathPoint) -> f64 {
        self.velocity
            .iter()
            .map(|c| c.max_velocity(point))
            .fold(f64::INFINITY, f64::min)
    }

    /// Intersection of all acceleration ranges at `point` and `velocity`.
    pub fn acceleration_range(&self, point: &PathPoint, velocity: f64) -> Interval {
        self.acceleration
            .iter()
            .map(|c| c.acceleration_range(point, velocity))
            .fold(Interval::REAL, |acc, range| acc.intersect(&range))
    }
}

fn add_velocity(kept: &mut Vec<Arc<dyn VelocityConstraint>>, new: Arc<dyn VelocityConstraint>) {
    if kept.iter().any(|k| k.other_is_redundant(new.as_ref())) {
        return;
    }
    kept.retain(|k| !new.other_is_redundant(k.as_ref()));
    kept.push(new);
}

fn add_acceleration(
    kept: &mut Vec<Arc<dyn AccelerationConstraint>>,
    new: Arc<dyn AccelerationConstraint>,
) {
    if kept.iter().any(|k| k.other_is_redundant(new.as_ref())) {
        return;
    }
    kept.retain(|k| !new.other_is_redundant(k.as_ref()));
    kept.push(new);
}
