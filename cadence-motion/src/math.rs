//! Planar vectors, poses, and motion states.

use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Default tolerance for approximate comparisons.
pub const EPSILON: f64 = 1e-9;

/// Whether `a` and `b` differ by at most `epsilon`.
#[must_use]
pub fn epsilon_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// Wrap an angle into `(-pi, pi]`.
#[must_use]
pub fn angle_norm(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(2.0 * PI);
    if wrapped > PI { wrapped - 2.0 * PI } else { wrapped }
}

/// A 2D vector.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    SerdeSerialize,
    SerdeDeserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
pub struct Vector2d {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Vector2d {
    /// The zero vector.
    pub const ZERO: Vector2d = Vector2d { x: 0.0, y: 0.0 };

    /// Create a vector.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `angle`, scaled by `length`.
    #[must_use]
    pub fn from_polar(length: f64, angle: f64) -> Self {
        Self::new(length * angle.cos(), length * angle.sin())
    }

    /// Euclidean norm.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Squared norm.
    #[must_use]
    pub fn norm_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Angle from the x axis; zero for the zero vector.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Dot product.
    #[must_use]
    pub fn dot(&self, other: Vector2d) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    #[must_use]
    pub fn cross(&self, other: Vector2d) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Rotate counter-clockwise by `angle`.
    #[must_use]
    pub fn rotate(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Unit vector in the same direction; zero stays zero.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if norm == 0.0 { *self } else { *self / norm }
    }

    /// Component-wise approximate equality.
    #[must_use]
    pub fn epsilon_eq(&self, other: Vector2d, epsilon: f64) -> bool {
        epsilon_eq(self.x, other.x, epsilon) && epsilon_eq(self.y, other.y, epsilon)
    }
}

impl Add for Vector2d {
    type Output = Vector2d;

    fn add(self, rhs: Vector2d) -> Vector2d {
        Vector2d::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2d {
    fn add_assign(&mut self, rhs: Vector2d) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2d {
    type Output = Vector2d;

    fn sub(self, rhs: Vector2d) -> Vector2d {
        Vector2d::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector2d {
    type Output = Vector2d;

    fn neg(self) -> Vector2d {
        Vector2d::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector2d {
    type Output = Vector2d;

    fn mul(self, rhs: f64) -> Vector2d {
        Vector2d::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vector2d {
    type Output = Vector2d;

    fn div(self, rhs: f64) -> Vector2d {
        Vector2d::new(self.x / rhs, self.y / rhs)
    }
}

impl fmt::Display for Vector2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

/// A position and heading in the plane.
///
/// Also used for pose derivatives, where `vec` is a linear rate and
/// `heading` an angular one. Headings are not wrapped so that derivatives
/// stay continuous.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    SerdeSerialize,
    SerdeDeserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
pub struct Pose2d {
    /// Position.
    pub vec: Vector2d,
    /// Heading in radians.
    pub heading: f64,
}

impl Pose2d {
    /// The zero pose.
    pub const ZERO: Pose2d = Pose2d {
        vec: Vector2d::ZERO,
        heading: 0.0,
    };

    /// Create a pose.
    #[must_use]
    pub const fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            vec: Vector2d::new(x, y),
            heading,
        }
    }

    /// Create a pose from a position and heading.
    #[must_use]
    pub const fn from_vec(vec: Vector2d, heading: f64) -> Self {
        Self { vec, heading }
    }

    /// Approximate equality of position and heading.
    #[must_use]
    pub fn epsilon_eq(&self, other: Pose2d, epsilon: f64) -> bool {
        self.vec.epsilon_eq(other.vec, epsilon) && epsilon_eq(self.heading, other.heading, epsilon)
    }
}

impl Add for Pose2d {
    type Output = Pose2d;

    fn add(self, rhs: Pose2d) -> Pose2d {
        Pose2d::from_vec(self.vec + rhs.vec, self.heading + rhs.heading)
    }
}

impl Sub for Pose2d {
    type Output = Pose2d;

    fn sub(self, rhs: Pose2d) -> Pose2d {
        Pose2d::from_vec(self.vec - rhs.vec, self.heading - rhs.heading)
    }
}

impl Mul<f64> for Pose2d {
    type Output = Pose2d;

    fn mul(self, rhs: f64) -> Pose2d {
        Pose2d::from_vec(self.vec * rhs, self.heading * rhs)
    }
}

impl fmt::Display for Pose2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:.4} rad", self.vec, self.heading)
    }
}

/// A value with its first and second time derivatives.
#[derive(Debug, Clone, Copy, Default, PartialEq, SerdeSerialize, SerdeDeserialize)]
pub struct MotionState<T> {
    /// The value.
    pub value: T,
    /// First derivative.
    pub vel: T,
    /// Second derivative.
    pub accel: T,
}

impl<T> MotionState<T> {
    /// Create a motion state.
    pub const fn new(value: T, vel: T, accel: T) -> Self {
        Self { value, vel, accel }
    }
}

/// Motion along a single axis, e.g. arc length.
pub type LinearMotionState = MotionState<f64>;
