//! Blocks driven by motion trajectories.

mod follower;

pub use follower::TrajectoryFollower;
