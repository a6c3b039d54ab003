//! Piecewise constant-acceleration profiles.

use crate::math::LinearMotionState;
use cadence_core::error::{CadenceError, Result};
use cadence_core::stepper::{KnotCursor, Stepper, segment_index};
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};

/// Below this, the sum of a segment's end velocities counts as zero.
const STALL_VELOCITY: f64 = 1e-12;

/// Velocity, acceleration, and time as functions of distance.
///
/// Knots are stored per sample; segment `i` runs from knot `i` to knot
/// `i + 1` with constant acceleration `accelerations[i]`. A profile with a
/// single knot covers zero distance in zero time.
#[derive(Debug, Clone, PartialEq, Archive, RkyvSerialize, RkyvDeserialize)]
pub struct MotionProfile {
    distances: Vec<f64>,
    velocities: Vec<f64>,
    times: Vec<f64>,
    accelerations: Vec<f64>,
}

impl MotionProfile {
    /// A profile that goes nowhere.
    pub fn stationary() -> Self {
        Self {
            distances: vec![0.0],
            velocities: vec![0.0],
            times: vec![0.0],
            accelerations: Vec::new(),
        }
    }

    /// Build a profile from velocities sampled at increasing distances.
    ///
    /// Each segment gets the constant acceleration that connects its end
    /// velocities, and time is integrated exactly. Fails if the tables are
    /// malformed or if a segment would have to be crossed at zero velocity.
    pub fn from_velocities(distances: Vec<f64>, velocities: Vec<f64>) -> Result<Self> {
        if distances.is_empty() || distances.len() != velocities.len() {
            return Err(CadenceError::InvalidGeometry {
                field: "velocities".to_string(),
                cause: format!(
                    "need one velocity per distance, got {} distances and {} velocities",
                    distances.len(),
                    velocities.len()
                ),
            });
        }
        if let Some(v) = velocities.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(CadenceError::InvalidGeometry {
                field: "velocities".to_string(),
                cause: format!("velocity {v} is not a finite non-negative number"),
            });
        }

        let mut times = Vec::with_capacity(distances.len());
        let mut accelerations = Vec::with_capacity(distances.len() - 1);
        times.push(0.0);

        for (i, pair) in distances.windows(2).enumerate() {
            let (s0, s1) = (pair[0], pair[1]);
            let ds = s1 - s0;
            if ds.is_nan() || ds <= 0.0 {
                return Err(CadenceError::InvalidGeometry {
                    field: "distances".to_string(),
                    cause: format!("distances must strictly increase, found {s0} then {s1}"),
                });
            }
            let (v0, v1) = (velocities[i], velocities[i + 1]);
            if v0 + v1 <= STALL_VELOCITY {
                return Err(CadenceError::ProfileStall { distance: s0 });
            }
            accelerations.push((v1 * v1 - v0 * v0) / (2.0 * ds));
            times.push(times[i] + 2.0 * ds / (v0 + v1));
        }

        Ok(Self {
            distances,
            velocities,
            times,
            accelerations,
        })
    }

    /// Total time.
    pub fn duration(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Total distance.
    pub fn distance(&self) -> f64 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// Number of constant-acceleration segments.
    pub fn segment_count(&self) -> usize {
        self.accelerations.len()
    }

    /// Distance of each knot.
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Velocity at each knot.
    pub fn velocities(&self) -> &[f64] {
        &self.velocities
    }

    /// Time at each knot.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Acceleration of each segment.
    pub fn accelerations(&self) -> &[f64] {
        &self.accelerations
    }

    /// Distance, velocity, and acceleration at time `t`, clamped to
    /// `[0, duration]`.
    pub fn state_at_time(&self, t: f64) -> LinearMotionState {
        self.state_in_segment_at_time(segment_index(&self.times, t), t)
    }

    /// Velocity and acceleration at distance `s`, clamped to
    /// `[0, distance]`.
    pub fn state_at_distance(&self, s: f64) -> LinearMotionState {
        self.state_in_segment_at_distance(segment_index(&self.distances, s), s)
    }

    /// Time at which distance `s` is reached.
    pub fn time_at_distance(&self, s: f64) -> f64 {
        self.time_in_segment_at_distance(segment_index(&self.distances, s), s)
    }

    /// Cursor for increasing time queries.
    pub fn time_stepper(&self) -> TimeStepper<'_> {
        TimeStepper {
            profile: self,
            cursor: KnotCursor::new(),
        }
    }

    /// Cursor for increasing distance queries.
    pub fn distance_stepper(&self) -> DistanceStepper<'_> {
        DistanceStepper {
            profile: self,
            cursor: KnotCursor::new(),
        }
    }

    fn acceleration(&self, segment: usize) -> f64 {
        self.accelerations.get(segment).copied().unwrap_or(0.0)
    }

    fn state_in_segment_at_time(&self, i: usize, t: f64) -> LinearMotionState {
        let t = t.clamp(0.0, self.duration());
        let a = self.acceleration(i);
        let v0 = self.velocities[i];
        let dt = t - self.times[i];
        let upper = self.distances.get(i + 1).copied().unwrap_or(self.distances[i]);
        let s = (self.distances[i] + v0 * dt + 0.5 * a * dt * dt).clamp(self.distances[i], upper);
        let v = (v0 + a * dt).max(0.0);
        LinearMotionState::new(s, v, a)
    }

    fn velocity_in_segment(&self, i: usize, s: f64) -> f64 {
        let v0 = self.velocities[i];
        let v_sq = v0 * v0 + 2.0 * self.acceleration(i) * (s - self.distances[i]);
        v_sq.max(0.0).sqrt()
    }

    fn state_in_segment_at_distance(&self, i: usize, s: f64) -> LinearMotionState {
        let s = s.clamp(0.0, self.distance());
        LinearMotionState::new(s, self.velocity_in_segment(i, s), self.acceleration(i))
    }

    fn time_in_segment_at_distance(&self, i: usize, s: f64) -> f64 {
        let s = s.clamp(0.0, self.distance());
        let ds = s - self.distances[i];
        let speed_sum = self.velocities[i] + self.velocity_in_segment(i, s);
        if ds <= 0.0 || speed_sum <= STALL_VELOCITY {
            return self.times[i];
        }
        self.times[i] + 2.0 * ds / speed_sum
    }
}

/// Sequential [`MotionProfile::state_at_time`].
#[derive(Debug)]
pub struct TimeStepper<'a> {
    profile: &'a MotionProfile,
    cursor: KnotCursor,
}

impl Stepper<LinearMotionState> for TimeStepper<'_> {
    fn step_to(&mut self, t: f64) -> LinearMotionState {
        let i = self.cursor.seek(&self.profile.times, t);
        self.profile.state_in_segment_at_time(i, t)
    }
}

/// Sequential [`MotionProfile::state_at_distance`].
#[derive(Debug)]
pub struct DistanceStepper<'a> {
    profile: &'a MotionProfile,
    cursor: KnotCursor,
}

impl Stepper<LinearMotionState> for DistanceStepper<'_> {
    fn step_to(&mut self, s: f64) -> LinearMotionState {
        let i = self.cursor.seek(&self.profile.distances, s);
        self.profile.state_in_segment_at_distance(i, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::stepper::step_all;

    /// 0 -> 2 m/s over 1 m, cruise 2 m, back to 0 over 1 m.
    fn trapezoid() -> MotionProfile {
        MotionProfile::from_velocities(vec![0.0, 1.0, 3.0, 4.0], vec![0.0, 2.0, 2.0, 0.0]).unwrap()
    }

    #[test]
    fn integrates_time_per_segment() {
        let profile = trapezoid();
        assert_eq!(profile.segment_count(), 3);
        assert_eq!(profile.accelerations(), &[2.0, 0.0, -2.0]);
        assert_eq!(profile.times(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(profile.duration(), 3.0);
        assert_eq!(profile.distance(), 4.0);
    }

    #[test]
    fn time_and_distance_queries_agree() {
        let profile = trapezoid();
        let state = profile.state_at_time(0.5);
        assert!((state.value - 0.25).abs() < 1e-12);
        assert!((state.vel - 1.0).abs() < 1e-12);
        assert_eq!(state.accel, 2.0);

        for s in [0.0, 0.25, 1.0, 2.2, 3.5, 4.0] {
            let t = profile.time_at_distance(s);
            let back = profile.state_at_time(t);
            assert!((back.value - s).abs() < 1e-9, "s = {s}");
            assert!((back.vel - profile.state_at_distance(s).vel).abs() < 1e-9);
        }
    }

    #[test]
    fn queries_clamp_to_domain() {
        let profile = trapezoid();
        assert_eq!(profile.state_at_time(-1.0).value, 0.0);
        assert_eq!(profile.state_at_time(10.0).value, 4.0);
        assert_eq!(profile.state_at_time(10.0).vel, 0.0);
        assert_eq!(profile.time_at_distance(99.0), 3.0);
    }

    #[test]
    fn steppers_match_point_queries() {
        let profile = trapezoid();
        let times = [0.0, 0.3, 0.9, 1.0, 1.7, 2.5, 3.0, 0.4, 2.9];
        let stepped = step_all(&mut profile.time_stepper(), &times);
        for (t, state) in times.iter().zip(stepped) {
            assert_eq!(state, profile.state_at_time(*t));
        }

        let distances = [0.0, 0.5, 1.0, 3.9, 4.0, 2.0];
        let stepped = step_all(&mut profile.distance_stepper(), &distances);
        for (s, state) in distances.iter().zip(stepped) {
            assert_eq!(state, profile.state_at_distance(*s));
        }
    }

    #[test]
    fn stationary_profile_is_empty() {
        let profile = MotionProfile::stationary();
        assert_eq!(profile.duration(), 0.0);
        assert_eq!(profile.distance(), 0.0);
        assert_eq!(profile.state_at_time(1.0), LinearMotionState::default());
        assert_eq!(profile.time_at_distance(0.0), 0.0);
    }

    #[test]
    fn zero_velocity_segment_is_a_stall() {
        let err = MotionProfile::from_velocities(vec![0.0, 1.0, 2.0], vec![1.0, 0.0, 0.0])
            .unwrap_err();
        assert_eq!(err.code(), "E402");
        assert!(matches!(err, CadenceError::ProfileStall { distance } if distance == 1.0));
    }

    #[test]
    fn malformed_tables_are_rejected() {
        assert!(MotionProfile::from_velocities(vec![], vec![]).is_err());
        assert!(MotionProfile::from_velocities(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(MotionProfile::from_velocities(vec![0.0, 0.0], vec![1.0, 1.0]).is_err());
        assert!(MotionProfile::from_velocities(vec![0.0, 1.0], vec![1.0, -1.0]).is_err());
    }
}
