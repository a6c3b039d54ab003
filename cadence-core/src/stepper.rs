//! Sequential evaluation cursors.
//!
//! A [`Stepper`] evaluates a function of a monotonic parameter (arc length,
//! time) and is allowed to keep state between calls so that increasing
//! queries cost amortized constant time. Queries out of order are still
//! answered exactly; the stepper simply re-seeks.

/// A stateful cursor over a function of one real parameter.
pub trait Stepper<T> {
    /// Evaluate the function at `at`.
    ///
    /// Results must equal the corresponding single-point query for any
    /// sequence of arguments, monotonic or not.
    fn step_to(&mut self, at: f64) -> T;
}

/// Evaluate a stepper at each of `points` in order.
pub fn step_all<T>(stepper: &mut dyn Stepper<T>, points: &[f64]) -> Vec<T> {
    points.iter().map(|&x| stepper.step_to(x)).collect()
}

/// Index of the segment of a sorted knot sequence that contains `x`.
///
/// Returns the largest `i <= knots.len() - 2` with `knots[i] <= x`, or `0`
/// when `x` lies before the first knot. Sequences with fewer than two knots
/// have the single segment `0`.
#[must_use]
pub fn segment_index(knots: &[f64], x: f64) -> usize {
    if knots.len() < 2 {
        return 0;
    }
    let last = knots.len() - 2;
    knots
        .partition_point(|&k| k <= x)
        .saturating_sub(1)
        .min(last)
}

/// Incremental form of [`segment_index`].
///
/// Walks forward for non-decreasing queries and falls back to a binary
/// search when asked to go backwards, so it always agrees with
/// [`segment_index`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KnotCursor {
    index: usize,
}

impl KnotCursor {
    /// Create a cursor at the first segment.
    #[must_use]
    pub fn new() -> Self {
        Self { index: 0 }
    }

    /// Current segment index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Move to the segment containing `x` and return its index.
    pub fn seek(&mut self, knots: &[f64], x: f64) -> usize {
        if knots.len() < 2 {
            self.index = 0;
            return 0;
        }
        let last = knots.len() - 2;
        if self.index > last || x < knots[self.index] {
            self.index = segment_index(knots, x);
            return self.index;
        }
        while self.index < last && knots[self.index + 1] <= x {
            self.index += 1;
        }
        self.index
    }
}
