//! Trajectory playback.

use cadence_core::prelude::*;
use cadence_motion::{MotionState, Pose2d, Trajectory};
use std::sync::Arc;
use tracing::debug;

/// Samples the active trajectory at the time elapsed since it arrived.
///
/// A trajectory becomes active on the tick it first appears on the input;
/// presenting the same `Arc` again does not restart it. Time advances by
/// the loop time of each later tick. Once the trajectory has finished, the
/// follower holds its final pose at rest until a new one arrives.
pub struct TrajectoryFollower {
    active: Option<Arc<Trajectory>>,
    elapsed: f64,
    initial: Pose2d,
}

impl TrajectoryFollower {
    /// The trajectory to follow; `None` keeps the current one.
    pub const TRAJECTORY: InputSlot<Option<Arc<Trajectory>>> = InputSlot::new(0);
    /// Pose, velocity and acceleration to track this tick.
    pub const REFERENCE: OutputSlot<MotionState<Pose2d>> = OutputSlot::new(0);
    /// Whether a trajectory is still in progress.
    pub const ACTIVE: OutputSlot<bool> = OutputSlot::new(1);

    /// A follower that rests at the origin until given a trajectory.
    pub fn new() -> Self {
        Self::with_initial_pose(Pose2d::ZERO)
    }

    /// A follower that rests at `pose` until given a trajectory.
    pub fn with_initial_pose(pose: Pose2d) -> Self {
        Self {
            active: None,
            elapsed: 0.0,
            initial: pose,
        }
    }

    fn reference(&self) -> (MotionState<Pose2d>, bool) {
        let Some(trajectory) = &self.active else {
            return (at_rest(self.initial), false);
        };
        if self.elapsed < trajectory.duration() {
            (trajectory.at_time(self.elapsed), true)
        } else {
            (at_rest(trajectory.at_time(trajectory.duration()).value), false)
        }
    }
}

impl Default for TrajectoryFollower {
    fn default() -> Self {
        Self::new()
    }
}

fn at_rest(pose: Pose2d) -> MotionState<Pose2d> {
    MotionState::new(pose, Pose2d::ZERO, Pose2d::ZERO)
}

impl Block for TrajectoryFollower {
    fn info(&self) -> BlockInfo {
        BlockInfo::new("trajectory_follower", ProcessingPolicy::Always)
            .with_input(PortInfo::of::<Option<Arc<Trajectory>>>().named("trajectory"))
            .with_output(PortInfo::of::<MotionState<Pose2d>>().named("reference"))
            .with_output(PortInfo::of::<bool>().named("active"))
    }

    fn init(&mut self) -> Result<()> {
        self.active = None;
        self.elapsed = 0.0;
        Ok(())
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        let current = self.active.as_ref();
        match ctx.get(Self::TRAJECTORY)? {
            Some(new) if !current.is_some_and(|c| Arc::ptr_eq(c, &new)) => {
                debug!(
                    block = %ctx.block_id(),
                    duration = new.duration(),
                    distance = new.distance(),
                    "Following new trajectory"
                );
                self.active = Some(new);
                self.elapsed = 0.0;
            }
            _ if current.is_some() => self.elapsed += ctx.system().loop_time(),
            _ => {}
        }

        let (reference, active) = self.reference();
        ctx.set(Self::REFERENCE, reference)?;
        ctx.set(Self::ACTIVE, active)
    }

    fn stop(&mut self) {
        self.active = None;
    }
}
