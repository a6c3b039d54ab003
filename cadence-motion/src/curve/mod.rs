//! Arc-length parameterized planar curves.
//!
//! - [`Line`] - a straight segment
//! - [`QuinticSpline`] - a parametric quintic, reparameterized by arc length
//!   through [`ReparamCurve`]
//! - [`CurveShape`] - the closed set of curves a path segment can hold

mod line;
mod reparam;
mod spline;

pub use line::Line;
pub use reparam::{MappingStepper, ReparamCurve, ReparamMapping};
pub use spline::{QuinticPolynomial, QuinticSpline};

use crate::math::Vector2d;
use cadence_core::stepper::Stepper;
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};

/// Geometry of a curve at one arc-length coordinate.
///
/// Derivatives are taken with respect to arc length.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CurvePoint {
    /// Position.
    pub position: Vector2d,
    /// First derivative of position (unit tangent).
    pub position_deriv: Vector2d,
    /// Second derivative of position.
    pub position_second_deriv: Vector2d,
    /// Angle of the tangent.
    pub tangent_angle: f64,
    /// Derivative of the tangent angle (signed curvature).
    pub tangent_angle_deriv: f64,
    /// Second derivative of the tangent angle.
    pub tangent_angle_second_deriv: f64,
}

impl CurvePoint {
    /// Signed curvature.
    #[must_use]
    pub fn curvature(&self) -> f64 {
        self.tangent_angle_deriv
    }
}

/// A curve parameterized by arc length over `[0, length]`.
pub trait Curve {
    /// Total arc length.
    fn length(&self) -> f64;

    /// Geometry at arc length `s`, clamped to the domain.
    fn point_at(&self, s: f64) -> CurvePoint;

    /// Cursor for sequential queries.
    fn stepper(&self) -> Box<dyn Stepper<CurvePoint> + '_> {
        Box::new(PointStepper { curve: self })
    }
}

/// Stepper that answers each query with [`Curve::point_at`].
struct PointStepper<'a, C: ?Sized> {
    curve: &'a C,
}

impl<C: Curve + ?Sized> Stepper<CurvePoint> for PointStepper<'_, C> {
    fn step_to(&mut self, at: f64) -> CurvePoint {
        self.curve.point_at(at)
    }
}

/// The curves a path segment can be built from.
#[derive(Debug, Clone, PartialEq, Archive, RkyvSerialize, RkyvDeserialize)]
pub enum CurveShape {
    /// A straight segment.
    Line(Line),
    /// An arc-length reparameterized spline.
    Spline(ReparamCurve),
}

impl From<Line> for CurveShape {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<ReparamCurve> for CurveShape {
    fn from(curve: ReparamCurve) -> Self {
        Self::Spline(curve)
    }
}

impl Curve for CurveShape {
    fn length(&self) -> f64 {
        match self {
            Self::Line(line) => line.length(),
            Self::Spline(curve) => curve.length(),
        }
    }

    fn point_at(&self, s: f64) -> CurvePoint {
        match self {
            Self::Line(line) => line.point_at(s),
            Self::Spline(curve) => curve.point_at(s),
        }
    }

    fn stepper(&self) -> Box<dyn Stepper<CurvePoint> + '_> {
        match self {
            Self::Line(line) => line.stepper(),
            Self::Spline(curve) => curve.stepper(),
        }
    }
}
