//! Forward/backward sweep profile generation.

use super::MotionProfile;
use crate::config::ProfileGenConfig;
use crate::constraint::{
    MotionConstraintSet, PERMISSIVE_LIMIT, PointConstraint, TrajectoryConstrainer,
};
use crate::path::Path;
use cadence_core::error::{CadenceError, Result};
use tracing::debug;

/// Slack when checking a segment's acceleration against its allowed range.
const ACCELERATION_TOLERANCE: f64 = 1e-9;

/// Generates time-optimal velocity profiles under a constraint set.
#[derive(Debug, Clone, Default)]
pub struct ProfileGenerator {
    config: ProfileGenConfig,
}

impl ProfileGenerator {
    /// Create a generator, rejecting invalid configuration.
    pub fn new(config: ProfileGenConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The generator configuration.
    pub fn config(&self) -> &ProfileGenConfig {
        &self.config
    }

    /// Generate a profile along `path` that starts at `start_velocity`,
    /// ends at `end_velocity`, and respects `constraints` at every sample.
    ///
    /// Boundary velocities above the local velocity cap are lowered to it.
    /// A zero-length path yields [`MotionProfile::stationary`].
    pub fn generate<P: Path + ?Sized>(
        &self,
        path: &P,
        constraints: &MotionConstraintSet,
        start_velocity: f64,
        end_velocity: f64,
    ) -> Result<MotionProfile> {
        check_velocity("start_velocity", start_velocity)?;
        check_velocity("end_velocity", end_velocity)?;

        let length = path.length();
        if length <= 0.0 {
            debug!(length, "Zero-length path, generating stationary profile");
            return Ok(MotionProfile::stationary());
        }

        let count = ((length / self.config.max_segment_size) - 1e-9).ceil().max(1.0);
        if count >= self.config.max_samples as f64 {
            return Err(CadenceError::ConfigValue {
                field: "max_segment_size".to_string(),
                cause: format!(
                    "path length {length} needs {count} segments, over the limit of {} samples",
                    self.config.max_samples
                ),
            });
        }
        let segments = count as usize;
        let ds = length / segments as f64;

        let constrainer = TrajectoryConstrainer::new(path, constraints);
        let mut stepper = path.stepper();
        let mut samples = Vec::with_capacity(segments + 1);
        let mut distances = Vec::with_capacity(segments + 1);
        let mut velocities = Vec::with_capacity(segments + 1);
        for i in 0..=segments {
            let s = if i == segments { length } else { i as f64 * ds };
            let sample = constrainer.at_point(stepper.step_to(s));
            velocities.push(self.velocity_cap(&sample));
            distances.push(s);
            samples.push(sample);
        }
        velocities[0] = velocities[0].min(start_velocity);
        velocities[segments] = velocities[segments].min(end_velocity);

        // forward: limited by the largest acceleration at each sample
        for i in 0..segments {
            let v = velocities[i];
            let range = samples[i].acceleration_range(v);
            if range.is_empty() {
                return Err(CadenceError::InfeasibleConstraints {
                    distance: distances[i],
                    velocity: v,
                });
            }
            let span = distances[i + 1] - distances[i];
            let reach = (v * v + 2.0 * range.upper() * span).max(0.0).sqrt();
            velocities[i + 1] = velocities[i + 1].min(reach);
        }

        // backward: every segment is settled against its final exit velocity
        for i in (0..segments).rev() {
            let span = distances[i + 1] - distances[i];
            let entry = self.entry_velocity(&samples[i], velocities[i], velocities[i + 1], span);
            let Some(v) = entry else {
                return Err(CadenceError::InfeasibleConstraints {
                    distance: distances[i],
                    velocity: velocities[i],
                });
            };
            velocities[i] = v;
        }

        let profile = MotionProfile::from_velocities(distances, velocities)?;
        debug!(
            length,
            samples = segments + 1,
            duration = profile.duration(),
            "Generated motion profile"
        );
        Ok(profile)
    }

    /// Largest velocity not above the sample's cap at which the
    /// acceleration range still contains zero, so that speed can be held,
    /// raised or lowered from it.
    fn velocity_cap(&self, sample: &PointConstraint<'_>) -> f64 {
        let cap = sample.max_velocity();
        let cap = if cap.is_nan() { 0.0 } else { cap.clamp(0.0, PERMISSIVE_LIMIT) };
        let holds = |v: f64| sample.acceleration_range(v).contains(0.0);
        if holds(cap) {
            return cap;
        }
        if !holds(0.0) {
            return 0.0;
        }
        self.bisect(0.0, cap, holds)
    }

    /// Largest velocity not above `cap` from which a segment of length
    /// `span` reaches `exit` with an acceleration allowed at the sample.
    ///
    /// `None` if not even holding speed (or entering at `cap` when `exit`
    /// is faster) is allowed.
    fn entry_velocity(
        &self,
        sample: &PointConstraint<'_>,
        cap: f64,
        exit: f64,
        span: f64,
    ) -> Option<f64> {
        let admits = |v: f64| {
            let acceleration = (exit * exit - v * v) / (2.0 * span);
            sample
                .acceleration_range(v)
                .contains_approx(acceleration, ACCELERATION_TOLERANCE)
        };
        if admits(cap) {
            return Some(cap);
        }

        // braking at the range's lower bound at the cap; exact whenever the
        // range does not depend on velocity
        let range = sample.acceleration_range(cap);
        let braking = (exit * exit - 2.0 * range.lower() * span).max(0.0).sqrt();
        let feasible = if !range.is_empty() && braking < cap && admits(braking) {
            braking
        } else {
            let floor = exit.min(cap);
            if !admits(floor) {
                return None;
            }
            floor
        };
        Some(self.bisect(feasible, cap, admits))
    }

    /// Bisect between a velocity satisfying `ok` and one that does not,
    /// returning the largest satisfying velocity found.
    fn bisect(&self, mut feasible: f64, mut infeasible: f64, ok: impl Fn(f64) -> bool) -> f64 {
        for _ in 0..self.config.velocity_search_iterations {
            if infeasible - feasible <= self.config.velocity_search_tolerance {
                break;
            }
            let mid = 0.5 * (feasible + infeasible);
            if ok(mid) {
                feasible = mid;
            } else {
                infeasible = mid;
            }
        }
        feasible
    }
}

fn check_velocity(field: &str, velocity: f64) -> Result<()> {
    if velocity.is_nan() || velocity < 0.0 {
        return Err(CadenceError::InvalidGeometry {
            field: field.to_string(),
            cause: format!("must be non-negative, got {velocity}"),
        });
    }
    Ok(())
}

/// Generate a profile with the default generator configuration.
pub fn generate_profile<P: Path + ?Sized>(
    path: &P,
    constraints: &MotionConstraintSet,
    start_velocity: f64,
    end_velocity: f64,
) -> Result<MotionProfile> {
    ProfileGenerator::default().generate(path, constraints, start_velocity, end_velocity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{
        MaxAngularAcceleration, MaxCentripetalAcceleration, MaxTangentAcceleration,
        MaxTotalAcceleration, MaxVelocity, MotionConstraint,
    };
    use crate::curve::{QuinticSpline, ReparamCurve};
    use crate::math::Vector2d;
    use crate::path::{HeadingMode, PathSegment};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn line(length: f64) -> PathSegment {
        PathSegment::line(Vector2d::ZERO, Vector2d::new(length, 0.0), HeadingMode::TANGENT)
    }

    fn bend() -> PathSegment {
        PathSegment::spline(
            ReparamCurve::from_spline(QuinticSpline::from_endpoints(
                Vector2d::ZERO,
                0.0,
                Vector2d::new(2.0, 1.0),
                0.0,
            ))
            .unwrap(),
            HeadingMode::TANGENT,
        )
    }

    fn assert_feasible(path: &PathSegment, set: &MotionConstraintSet, profile: &MotionProfile) {
        let constrainer = TrajectoryConstrainer::new(path, set);
        let samples = profile.distances().iter().zip(profile.velocities());
        for (i, (&s, &v)) in samples.enumerate() {
            let at = constrainer.at(s);
            assert!(v <= at.max_velocity() + 1e-9, "v = {v} above cap at s = {s}");
            if let Some(&a) = profile.accelerations().get(i) {
                let range = at.acceleration_range(v);
                assert!(range.contains_approx(a, 1e-6), "a = {a} outside {range:?} at s = {s}");
            }
        }
    }

    fn limits(velocity: f64, acceleration: f64) -> MotionConstraintSet {
        MotionConstraintSet::new([
            MotionConstraint::velocity(MaxVelocity::new(velocity)),
            MotionConstraint::acceleration(MaxTangentAcceleration::new(acceleration)),
        ])
    }

    #[test]
    fn trapezoid_on_a_long_line() {
        let profile = generate_profile(&line(20.0), &limits(5.0, 2.0), 0.0, 0.0).unwrap();
        // 2.5 s up over 6.25 m, 1.5 s cruise over 7.5 m, 2.5 s down
        assert!((profile.duration() - 6.5).abs() < 1e-2, "{}", profile.duration());
        assert_eq!(profile.distance(), 20.0);
        assert!((profile.state_at_distance(10.0).vel - 5.0).abs() < 1e-9);
    }

    #[test]
    fn triangle_when_cruise_is_unreachable() {
        let profile = generate_profile(&line(10.0), &limits(5.0, 2.0), 0.0, 0.0).unwrap();
        let expected = 2.0 * 5.0_f64.sqrt();
        assert!((profile.duration() - expected).abs() < 1e-2, "{}", profile.duration());
        assert!(profile.velocities().iter().all(|v| *v < 5.0));
    }

    #[test]
    fn boundary_velocities_are_respected() {
        let profile = generate_profile(&line(4.0), &limits(3.0, 1.0), 1.0, 2.0).unwrap();
        assert_eq!(profile.velocities()[0], 1.0);
        assert_eq!(*profile.velocities().last().unwrap(), 2.0);

        let capped = generate_profile(&line(4.0), &limits(3.0, 1.0), 10.0, 10.0).unwrap();
        assert_eq!(capped.velocities()[0], 3.0);
    }

    #[test]
    fn zero_length_is_stationary() {
        let profile = generate_profile(&line(0.0), &limits(1.0, 1.0), 0.0, 0.0).unwrap();
        assert_eq!(profile, MotionProfile::stationary());
    }

    #[test]
    fn zero_velocity_cap_stalls() {
        let err = generate_profile(&line(1.0), &limits(0.0, 1.0), 0.0, 0.0).unwrap_err();
        assert_eq!(err.code(), "E402");
    }

    #[test]
    fn negative_boundary_velocity_is_rejected() {
        let err = generate_profile(&line(1.0), &limits(1.0, 1.0), -1.0, 0.0).unwrap_err();
        assert_eq!(err.code(), "E403");
    }

    #[test]
    fn cap_is_lowered_to_a_feasible_velocity() {
        // on a unit circle arc, total acceleration 1 leaves no room above v = 1
        let arc = PathSegment::spline(
            ReparamCurve::from_spline(QuinticSpline::from_endpoints(
                Vector2d::new(1.0, 0.0),
                FRAC_PI_2,
                Vector2d::new(0.0, 1.0),
                PI,
            ))
            .unwrap(),
            HeadingMode::TANGENT,
        );
        let set = MotionConstraintSet::new([
            MotionConstraint::velocity(MaxVelocity::new(100.0)),
            MotionConstraint::acceleration(MaxTotalAcceleration::new(1.0)),
        ]);
        let profile = generate_profile(&arc, &set, 0.0, 0.0).unwrap();
        let constrainer = TrajectoryConstrainer::new(&arc, &set);
        for (s, v) in profile.distances().iter().zip(profile.velocities()) {
            assert!(!constrainer.at(*s).acceleration_range(*v).is_empty(), "s = {s}");
        }
        assert!(profile.duration() > 0.0);
    }

    #[test]
    fn centripetal_limit_slows_curves() {
        let curve = PathSegment::spline(
            ReparamCurve::from_spline(QuinticSpline::from_endpoints(
                Vector2d::ZERO,
                0.0,
                Vector2d::new(2.0, 2.0),
                FRAC_PI_2,
            ))
            .unwrap(),
            HeadingMode::TANGENT,
        );
        let mut constraints = vec![
            MotionConstraint::velocity(MaxVelocity::new(5.0)),
            MotionConstraint::acceleration(MaxTangentAcceleration::new(3.0)),
        ];
        let free_set = MotionConstraintSet::new(constraints.clone());
        let free = generate_profile(&curve, &free_set, 0.0, 0.0).unwrap();
        constraints.push(MotionConstraint::velocity(MaxCentripetalAcceleration::new(0.5)));
        let slowed =
            generate_profile(&curve, &MotionConstraintSet::new(constraints), 0.0, 0.0).unwrap();
        assert!(slowed.duration() > free.duration());
    }

    #[test]
    fn angular_acceleration_limit_slows_a_spline_without_stalling() {
        let path = bend();
        let free = generate_profile(&path, &limits(3.0, 2.0), 0.0, 0.0).unwrap();
        for max in [1.0, 3.0, 10.0, 30.0] {
            let set = MotionConstraintSet::new([
                MotionConstraint::velocity(MaxVelocity::new(3.0)),
                MotionConstraint::acceleration(MaxTangentAcceleration::new(2.0)),
                MotionConstraint::acceleration(MaxAngularAcceleration::new(max)),
            ]);
            let profile = generate_profile(&path, &set, 0.0, 0.0)
                .unwrap_or_else(|e| panic!("max = {max}: {e}"));
            assert_feasible(&path, &set, &profile);
            assert!(profile.duration() >= free.duration() - 1e-6, "max = {max}");
        }
    }

    #[test]
    fn velocity_dependent_ranges_are_checked_at_the_final_velocity() {
        let path = bend();
        let set = MotionConstraintSet::new([
            MotionConstraint::velocity(MaxVelocity::new(4.0)),
            MotionConstraint::acceleration(MaxTotalAcceleration::new(1.5)),
            MotionConstraint::acceleration(MaxAngularAcceleration::new(2.0)),
        ]);
        let profile = generate_profile(&path, &set, 0.5, 0.0).unwrap();
        assert_feasible(&path, &set, &profile);
    }

    #[test]
    fn sample_count_is_bounded() {
        let config = ProfileGenConfig {
            max_samples: 100,
            ..ProfileGenConfig::default()
        };
        let generator = ProfileGenerator::new(config).unwrap();

        let err = generator.generate(&line(10.0), &limits(1.0, 1.0), 0.0, 0.0).unwrap_err();
        match err {
            CadenceError::ConfigValue { field, .. } => assert_eq!(field, "max_segment_size"),
            other => panic!("unexpected error: {other}"),
        }

        let profile = generator.generate(&line(0.5), &limits(1.0, 1.0), 0.0, 0.0).unwrap();
        assert_eq!(profile.segment_count(), 50);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ProfileGenConfig {
            max_segment_size: 0.0,
            ..ProfileGenConfig::default()
        };
        assert_eq!(ProfileGenerator::new(config).unwrap_err().code(), "E108");
    }
}
