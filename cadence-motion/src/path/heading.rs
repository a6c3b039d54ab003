//! Heading along a curve.

use crate::curve::CurvePoint;
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};

/// How a path segment's heading follows its curve.
#[derive(Debug, Clone, Copy, PartialEq, Archive, RkyvSerialize, RkyvDeserialize)]
pub enum HeadingMode {
    /// Face along the tangent, plus a fixed offset (`PI` drives backwards).
    Tangent {
        /// Offset from the tangent angle.
        offset: f64,
    },
    /// Hold a fixed heading.
    Constant(f64),
    /// Turn linearly with arc length from `from` to `to`.
    Linear {
        /// Heading at the start.
        from: f64,
        /// Heading at the end.
        to: f64,
    },
}

impl HeadingMode {
    /// Tangent heading with no offset.
    pub const TANGENT: HeadingMode = HeadingMode::Tangent { offset: 0.0 };

    /// Heading and its first two arc-length derivatives at `s` on a curve
    /// of total `length`.
    #[must_use]
    pub fn evaluate(&self, point: &CurvePoint, s: f64, length: f64) -> (f64, f64, f64) {
        match *self {
            Self::Tangent { offset } => (
                point.tangent_angle + offset,
                point.tangent_angle_deriv,
                point.tangent_angle_second_deriv,
            ),
            Self::Constant(heading) => (heading, 0.0, 0.0),
            Self::Linear { from, to } => {
                if length <= 0.0 {
                    return (from, 0.0, 0.0);
                }
                let rate = (to - from) / length;
                (from + rate * s.clamp(0.0, length), rate, 0.0)
            }
        }
    }
}

impl Default for HeadingMode {
    fn default() -> Self {
        Self::TANGENT
    }
}
