//! Velocity profiles over arc length.
//!
//! [`ProfileGenerator`] turns a path and a [`MotionConstraintSet`] into a
//! [`MotionProfile`]: a piecewise constant-acceleration description of
//! velocity over distance that can be queried by time or by distance.
//!
//! [`MotionConstraintSet`]: crate::constraint::MotionConstraintSet

mod generator;
mod motion_profile;

pub use generator::{ProfileGenerator, generate_profile};
pub use motion_profile::{DistanceStepper, MotionProfile, TimeStepper};
