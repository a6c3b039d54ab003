//! Cadence Motion
//!
//! Time-optimal motion along planar paths.
//!
//! # Overview
//!
//! 1. Describe geometry with [`curve`]s and turn it into a [`path`] by
//!    adding a heading rule.
//! 2. Collect velocity and acceleration limits into a
//!    [`MotionConstraintSet`].
//! 3. Run the [`ProfileGenerator`] to get a [`MotionProfile`]: the fastest
//!    velocity-over-distance curve the constraints allow.
//! 4. Pair path and profile in a [`Trajectory`] and sample it by time.
//!
//! ```ignore
//! use cadence_motion::prelude::*;
//!
//! let path = MultiplePath::single(PathSegment::line(
//!     Vector2d::ZERO,
//!     Vector2d::new(10.0, 0.0),
//!     HeadingMode::TANGENT,
//! ));
//! let constraints = MotionConstraintSet::new([
//!     MotionConstraint::velocity(MaxVelocity::new(5.0)),
//!     MotionConstraint::acceleration(MaxTangentAcceleration::new(2.0)),
//! ]);
//! let trajectory = generate_trajectory(path, &constraints, 0.0, 0.0)?;
//! let halfway = trajectory.at_time(trajectory.duration() / 2.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod constraint;
pub mod curve;
pub mod math;
pub mod path;
pub mod profile;
pub mod trajectory;

pub use config::{ProfileGenConfig, ReparamConfig};
pub use constraint::{MotionConstraint, MotionConstraintSet, TrajectoryConstrainer};
pub use math::{LinearMotionState, MotionState, Pose2d, Vector2d};
pub use path::{MultiplePath, Path, PathPoint, PathSegment};
pub use profile::{MotionProfile, ProfileGenerator, generate_profile};
pub use trajectory::{Trajectory, generate_trajectory};

/// Commonly used types.
pub mod prelude {
    pub use crate::config::{ProfileGenConfig, ReparamConfig};
    pub use crate::constraint::{
        AccelerationConstraint, ConstraintBundle, MaxAngularAcceleration, MaxAngularVelocity,
        MaxCentripetalAcceleration, MaxTangentAcceleration, MaxTotalAcceleration, MaxVelocity,
        MotionConstraint, MotionConstraintSet, MultipleConstraint, VelocityConstraint,
    };
    pub use crate::curve::{Curve, CurvePoint, Line, QuinticSpline, ReparamCurve};
    pub use crate::math::{LinearMotionState, MotionState, Pose2d, Vector2d};
    pub use crate::path::{HeadingMode, MultiplePath, Path, PathPoint, PathSegment, PointTurn};
    pub use crate::profile::{MotionProfile, ProfileGenerator, generate_profile};
    pub use crate::trajectory::{Trajectory, generate_trajectory};
    pub use cadence_core::stepper::Stepper;
}
