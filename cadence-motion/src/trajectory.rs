//! Paths paired with motion profiles.
//!
//! A [`Trajectory`] answers "where is the robot, and how is it moving, at
//! time `t`" by reading arc length off its [`MotionProfile`] and geometry
//! off its [`MultiplePath`], then combining the two with the chain rule.
//!
//! Trajectories are plain data and can be stored with
//! [`Trajectory::save`] and read back with [`Trajectory::load`].

use crate::constraint::MotionConstraintSet;
use crate::math::{MotionState, Pose2d};
use crate::path::{MultiplePath, Path, PathPoint};
use crate::profile::{MotionProfile, ProfileGenerator, TimeStepper};
use cadence_core::error::{CadenceError, Result};
use cadence_core::stepper::Stepper;
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use std::fs;
use tracing::debug;

/// Largest allowed difference between path length and profile distance.
pub const LENGTH_TOLERANCE: f64 = 1e-6;

/// A path traversed according to a motion profile.
#[derive(Debug, Clone, PartialEq, Archive, RkyvSerialize, RkyvDeserialize)]
pub struct Trajectory {
    path: MultiplePath,
    profile: MotionProfile,
}

impl Trajectory {
    /// Pair a path with a profile of the same length.
    pub fn new(path: MultiplePath, profile: MotionProfile) -> Result<Self> {
        let path_length = path.length();
        let profile_distance = profile.distance();
        if (path_length - profile_distance).abs() > LENGTH_TOLERANCE {
            return Err(CadenceError::LengthMismatch {
                path_length,
                profile_distance,
            });
        }
        Ok(Self { path, profile })
    }

    /// Generate a profile for `path` and pair the two.
    pub fn generate(
        generator: &ProfileGenerator,
        path: MultiplePath,
        constraints: &MotionConstraintSet,
        start_velocity: f64,
        end_velocity: f64,
    ) -> Result<Self> {
        let profile = generator.generate(&path, constraints, start_velocity, end_velocity)?;
        Self::new(path, profile)
    }

    /// The path.
    pub fn path(&self) -> &MultiplePath {
        &self.path
    }

    /// The profile.
    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Total time.
    pub fn duration(&self) -> f64 {
        self.profile.duration()
    }

    /// Total distance.
    pub fn distance(&self) -> f64 {
        self.profile.distance()
    }

    /// Pose, velocity, and acceleration at time `t`.
    pub fn at_time(&self, t: f64) -> MotionState<Pose2d> {
        let state = self.profile.state_at_time(t);
        compose(&self.path.point_at(state.value), state.vel, state.accel)
    }

    /// Pose, velocity, and acceleration on reaching distance `s`.
    pub fn at_distance(&self, s: f64) -> MotionState<Pose2d> {
        let state = self.profile.state_at_distance(s);
        compose(&self.path.point_at(state.value), state.vel, state.accel)
    }

    /// Cursor for increasing time queries.
    pub fn stepper(&self) -> TrajectoryStepper<'_> {
        TrajectoryStepper {
            profile: self.profile.time_stepper(),
            path: self.path.stepper(),
        }
    }

    /// Encode into an opaque byte buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|bytes| bytes.to_vec())
            .map_err(|e| CadenceError::Serialization(format!("Failed to encode trajectory: {e}")))
    }

    /// Decode a buffer produced by [`to_bytes`](Self::to_bytes).
    ///
    /// The length invariant is checked again on the decoded value.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut aligned = rkyv::util::AlignedVec::<16>::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);
        let decoded = rkyv::from_bytes::<Self, rkyv::rancor::Error>(&aligned)
            .map_err(|e| CadenceError::Serialization(format!("Failed to decode trajectory: {e}")))?;
        Self::new(decoded.path, decoded.profile)
    }

    /// Write to a file.
    pub fn save(&self, file: impl AsRef<std::path::Path>) -> Result<()> {
        let file = file.as_ref();
        let bytes = self.to_bytes()?;
        fs::write(file, &bytes).map_err(|e| CadenceError::Io {
            path: file.to_path_buf(),
            cause: e.to_string(),
        })?;
        debug!(path = %file.display(), bytes = bytes.len(), "Saved trajectory");
        Ok(())
    }

    /// Read from a file written by [`save`](Self::save).
    pub fn load(file: impl AsRef<std::path::Path>) -> Result<Self> {
        let file = file.as_ref();
        let bytes = fs::read(file).map_err(|e| CadenceError::Io {
            path: file.to_path_buf(),
            cause: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }
}

/// Generate a trajectory with the default generator configuration.
pub fn generate_trajectory(
    path: MultiplePath,
    constraints: &MotionConstraintSet,
    start_velocity: f64,
    end_velocity: f64,
) -> Result<Trajectory> {
    Trajectory::generate(
        &ProfileGenerator::default(),
        path,
        constraints,
        start_velocity,
        end_velocity,
    )
}

/// Chain rule from arc-length derivatives to time derivatives.
fn compose(point: &PathPoint, velocity: f64, acceleration: f64) -> MotionState<Pose2d> {
    let deriv = point.pose_deriv();
    MotionState::new(
        point.pose(),
        deriv * velocity,
        point.pose_second_deriv() * (velocity * velocity) + deriv * acceleration,
    )
}

/// Sequential [`Trajectory::at_time`].
pub struct TrajectoryStepper<'a> {
    profile: TimeStepper<'a>,
    path: Box<dyn Stepper<PathPoint> + 'a>,
}

impl Stepper<MotionState<Pose2d>> for TrajectoryStepper<'_> {
    fn step_to(&mut self, t: f64) -> MotionState<Pose2d> {
        let state = self.profile.step_to(t);
        compose(&self.path.step_to(state.value), state.vel, state.accel)
    }
}
