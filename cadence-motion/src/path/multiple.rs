//! Sequential concatenation of path segments.

use super::segment::{PathSegment, PointTurn};
use super::{Path, PathPoint};
use crate::math::Pose2d;
use cadence_core::error::{CadenceError, Result};
use cadence_core::stepper::{KnotCursor, Stepper, segment_index};
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};

/// Segments laid end to end on one arc-length domain.
///
/// Segment `i` covers `[bounds[i], bounds[i + 1]]`. A coordinate on a join
/// belongs to the later segment; the last segment also owns the end point.
#[derive(Debug, Clone, PartialEq, Archive, RkyvSerialize, RkyvDeserialize)]
pub struct MultiplePath {
    segments: Vec<PathSegment>,
    bounds: Vec<f64>,
}

impl MultiplePath {
    /// Concatenate segments. At least one segment is required.
    pub fn new(segments: Vec<PathSegment>) -> Result<Self> {
        if segments.is_empty() {
            return Err(CadenceError::InvalidGeometry {
                field: "segments".to_string(),
                cause: "a path needs at least one segment".to_string(),
            });
        }
        let mut bounds = Vec::with_capacity(segments.len() + 1);
        let mut total = 0.0;
        bounds.push(total);
        for segment in &segments {
            total += segment.length();
            bounds.push(total);
        }
        Ok(Self { segments, bounds })
    }

    /// A path of a single segment.
    #[must_use]
    pub fn single(segment: PathSegment) -> Self {
        let length = segment.length();
        Self {
            segments: vec![segment],
            bounds: vec![0.0, length],
        }
    }

    /// A zero-length path at `pose`.
    #[must_use]
    pub fn stationary(pose: Pose2d) -> Self {
        Self::single(PathSegment::PointTurn(PointTurn::stationary(pose)))
    }

    /// Concatenate whole paths, flattening their segments.
    pub fn concat(paths: impl IntoIterator<Item = MultiplePath>) -> Result<Self> {
        let segments = paths.into_iter().flat_map(|path| path.segments).collect();
        Self::new(segments)
    }

    /// The segments, in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Arc length at which each segment starts.
    pub fn segment_starts(&self) -> &[f64] {
        &self.bounds[..self.segments.len()]
    }

    fn locate(&self, index: usize, s: f64) -> PathPoint {
        self.segments[index].point_at(s - self.bounds[index])
    }
}

impl Path for MultiplePath {
    fn length(&self) -> f64 {
        self.bounds.last().copied().unwrap_or(0.0)
    }

    fn point_at(&self, s: f64) -> PathPoint {
        let s = s.clamp(0.0, self.length());
        self.locate(segment_index(&self.bounds, s), s)
    }

    fn stepper(&self) -> Box<dyn Stepper<PathPoint> + '_> {
        Box::new(MultiplePathStepper {
            path: self,
            cursor: KnotCursor::new(),
            current: None,
        })
    }
}

struct MultiplePathStepper<'a> {
    path: &'a MultiplePath,
    cursor: KnotCursor,
    current: Option<(usize, Box<dyn Stepper<PathPoint> + 'a>)>,
}

impl Stepper<PathPoint> for MultiplePathStepper<'_> {
    fn step_to(&mut self, at: f64) -> PathPoint {
        let s = at.clamp(0.0, self.path.length());
        let index = self.cursor.seek(&self.path.bounds, s);
        let local = s - self.path.bounds[index];

        if let Some((current, stepper)) = &mut self.current {
            if *current == index {
                return stepper.step_to(local);
            }
        }
        let mut stepper = self.path.segments[index].stepper();
        let point = stepper.step_to(local);
        self.current = Some((index, stepper));
        point
    }
}
