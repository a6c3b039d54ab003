//! Closed numeric intervals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed interval `[a, b]` on the real line.
///
/// An interval with `a > b` is empty. Intersection of disjoint intervals
/// therefore yields an empty interval without a separate representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    a: f64,
    b: f64,
}

impl Interval {
    /// The empty interval.
    pub const EMPTY: Interval = Interval {
        a: f64::INFINITY,
        b: f64::NEG_INFINITY,
    };

    /// The whole real line.
    pub const REAL: Interval = Interval {
        a: f64::NEG_INFINITY,
        b: f64::INFINITY,
    };

    /// Create the interval `[a, b]`. Empty when `a > b` or either bound is NaN.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        if a.is_nan() || b.is_nan() {
            return Self::EMPTY;
        }
        Self { a, b }
    }

    /// Create the interval spanning two values in either order.
    #[must_use]
    pub fn spanning(x: f64, y: f64) -> Self {
        if x <= y { Self::new(x, y) } else { Self::new(y, x) }
    }

    /// Create `[-radius, radius]`. Negative radius gives the empty interval.
    #[must_use]
    pub fn symmetric(radius: f64) -> Self {
        Self::new(-radius, radius)
    }

    /// Create the degenerate interval `[x, x]`.
    #[must_use]
    pub fn point(x: f64) -> Self {
        Self::new(x, x)
    }

    /// Lower bound.
    #[must_use]
    pub fn lower(&self) -> f64 {
        self.a
    }

    /// Upper bound.
    #[must_use]
    pub fn upper(&self) -> f64 {
        self.b
    }

    /// Whether this interval contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.a > self.b || self.a.is_nan() || self.b.is_nan()
    }

    /// Whether this interval is the whole real line.
    #[must_use]
    pub fn is_real(&self) -> bool {
        self.a == f64::NEG_INFINITY && self.b == f64::INFINITY
    }

    /// Width of the interval, zero when empty.
    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.b - self.a }
    }

    /// Whether `x` lies in the interval.
    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        self.a <= x && x <= self.b
    }

    /// Whether `x` lies in the interval widened by `tolerance` on both sides.
    #[must_use]
    pub fn contains_approx(&self, x: f64, tolerance: f64) -> bool {
        self.a - tolerance <= x && x <= self.b + tolerance
    }

    /// Intersection of two intervals.
    #[must_use]
    pub fn intersect(&self, other: &Interval) -> Interval {
        if self.is_empty() || other.is_empty() {
            return Self::EMPTY;
        }
        Interval {
            a: self.a.max(other.a),
            b: self.b.min(other.b),
        }
    }

    /// Clamp `x` into the interval. Returns `None` for the empty interval.
    #[must_use]
    pub fn clamp(&self, x: f64) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(x.max(self.a).min(self.b))
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::REAL
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[empty]")
        } else {
            write!(f, "[{}, {}]", self.a, self.b)
        }
    }
}
