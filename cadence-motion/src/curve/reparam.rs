//! Arc-length reparameterization of quintic splines.
//!
//! The mapping from arc length `s` to spline parameter `t` is sampled by
//! adaptive subdivision of `[0, 1]`: an interval is split while it is longer
//! than the configured segment length or its tangent turns more than the
//! configured angle. Arc length per interval comes from 5-point
//! Gauss-Legendre quadrature of `|dp/dt|`. Between samples `t(s)` is
//! interpolated linearly; all derivatives are then evaluated exactly at
//! that `t`.

use super::spline::QuinticSpline;
use super::{Curve, CurvePoint};
use crate::config::ReparamConfig;
use crate::math::angle_norm;
use cadence_core::error::Result;
use cadence_core::stepper::{KnotCursor, Stepper, segment_index};
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};

const GAUSS_NODES: [f64; 5] = [
    0.0,
    -0.538_469_310_105_683_1,
    0.538_469_310_105_683_1,
    -0.906_179_845_938_664,
    0.906_179_845_938_664,
];
const GAUSS_WEIGHTS: [f64; 5] = [
    0.568_888_888_888_888_9,
    0.478_628_670_499_366_5,
    0.478_628_670_499_366_5,
    0.236_926_885_056_189_1,
    0.236_926_885_056_189_1,
];

/// Below this parametric speed a spline point is treated as a cusp.
const MIN_SPEED: f64 = 1e-12;

fn arc_length(spline: &QuinticSpline, t0: f64, t1: f64) -> f64 {
    let half = (t1 - t0) / 2.0;
    let mid = (t0 + t1) / 2.0;
    GAUSS_NODES
        .iter()
        .zip(GAUSS_WEIGHTS)
        .map(|(&x, w)| w * spline.deriv(mid + half * x).norm())
        .sum::<f64>()
        * half
}

/// Sampled mapping from arc length to curve parameter.
#[derive(Debug, Clone, PartialEq, Archive, RkyvSerialize, RkyvDeserialize)]
pub struct ReparamMapping {
    s_samples: Vec<f64>,
    t_samples: Vec<f64>,
}

impl ReparamMapping {
    /// Sample the arc-length mapping of `spline`.
    pub fn build(spline: &QuinticSpline, config: &ReparamConfig) -> Result<Self> {
        config.validate()?;
        let mut mapping = Self {
            s_samples: vec![0.0],
            t_samples: vec![0.0],
        };
        mapping.subdivide(spline, config, 0.0, 1.0, 0);
        Ok(mapping)
    }

    fn subdivide(
        &mut self,
        spline: &QuinticSpline,
        config: &ReparamConfig,
        t0: f64,
        t1: f64,
        depth: u32,
    ) {
        let length = arc_length(spline, t0, t1);
        let turn = angle_norm(spline.deriv(t1).angle() - spline.deriv(t0).angle()).abs();
        let too_coarse = length > config.max_segment_length || turn > config.max_angle_change;

        if too_coarse && depth < config.max_depth {
            let mid = (t0 + t1) / 2.0;
            self.subdivide(spline, config, t0, mid, depth + 1);
            self.subdivide(spline, config, mid, t1, depth + 1);
        } else {
            let s = self.s_samples.last().copied().unwrap_or(0.0) + length;
            self.s_samples.push(s);
            self.t_samples.push(t1);
        }
    }

    /// Total arc length.
    pub fn length(&self) -> f64 {
        self.s_samples.last().copied().unwrap_or(0.0)
    }

    /// Number of samples, endpoints included.
    pub fn sample_count(&self) -> usize {
        self.s_samples.len()
    }

    /// Curve parameter at arc length `s`, clamped to the domain.
    pub fn t_of_s(&self, s: f64) -> f64 {
        self.interpolate(segment_index(&self.s_samples, s), s)
    }

    /// Cursor for sequential `t_of_s` queries.
    pub fn stepper(&self) -> MappingStepper<'_> {
        MappingStepper {
            mapping: self,
            cursor: KnotCursor::new(),
        }
    }

    fn interpolate(&self, i: usize, s: f64) -> f64 {
        if self.s_samples.len() < 2 {
            return self.t_samples.first().copied().unwrap_or(0.0);
        }
        let (s0, s1) = (self.s_samples[i], self.s_samples[i + 1]);
        let (t0, t1) = (self.t_samples[i], self.t_samples[i + 1]);
        if s1 <= s0 {
            return t0;
        }
        let fraction = ((s - s0) / (s1 - s0)).clamp(0.0, 1.0);
        t0 + fraction * (t1 - t0)
    }
}

/// Sequential cursor over a [`ReparamMapping`].
pub struct MappingStepper<'a> {
    mapping: &'a ReparamMapping,
    cursor: KnotCursor,
}

impl Stepper<f64> for MappingStepper<'_> {
    fn step_to(&mut self, at: f64) -> f64 {
        let i = self.cursor.seek(&self.mapping.s_samples, at);
        self.mapping.interpolate(i, at)
    }
}

/// A quintic spline traversed by arc length.
#[derive(Debug, Clone, PartialEq, Archive, RkyvSerialize, RkyvDeserialize)]
pub struct ReparamCurve {
    spline: QuinticSpline,
    mapping: ReparamMapping,
}

impl ReparamCurve {
    /// Reparameterize `spline` with `config`.
    pub fn new(spline: QuinticSpline, config: &ReparamConfig) -> Result<Self> {
        let mapping = ReparamMapping::build(&spline, config)?;
        Ok(Self { spline, mapping })
    }

    /// Reparameterize `spline` with the default configuration.
    pub fn from_spline(spline: QuinticSpline) -> Result<Self> {
        Self::new(spline, &ReparamConfig::default())
    }

    /// The underlying spline.
    pub fn spline(&self) -> &QuinticSpline {
        &self.spline
    }

    /// The arc-length mapping.
    pub fn mapping(&self) -> &ReparamMapping {
        &self.mapping
    }

    /// Arc-length geometry at spline parameter `t`.
    fn point_at_t(&self, t: f64) -> CurvePoint {
        let position = self.spline.position(t);
        let v = self.spline.deriv(t);
        let a = self.spline.second_deriv(t);
        let j = self.spline.third_deriv(t);

        let speed = v.norm();
        if speed < MIN_SPEED {
            return CurvePoint {
                position,
                ..CurvePoint::default()
            };
        }

        let speed2 = speed * speed;
        let speed3 = speed2 * speed;
        let v_dot_a = v.dot(a);
        let v_cross_a = v.cross(a);

        let curvature = v_cross_a / speed3;
        let curvature_rate =
            (v.cross(j) / speed3 - 3.0 * v_cross_a * v_dot_a / (speed3 * speed2)) / speed;

        CurvePoint {
            position,
            position_deriv: v / speed,
            position_second_deriv: (a * speed2 - v * v_dot_a) / (speed2 * speed2),
            tangent_angle: v.angle(),
            tangent_angle_deriv: curvature,
            tangent_angle_second_deriv: curvature_rate,
        }
    }
}

impl Curve for ReparamCurve {
    fn length(&self) -> f64 {
        self.mapping.length()
    }

    fn point_at(&self, s: f64) -> CurvePoint {
        self.point_at_t(self.mapping.t_of_s(s))
    }

    fn stepper(&self) -> Box<dyn Stepper<CurvePoint> + '_> {
        Box::new(ReparamStepper {
            curve: self,
            mapping: self.mapping.stepper(),
        })
    }
}

struct ReparamStepper<'a> {
    curve: &'a ReparamCurve,
    mapping: MappingStepper<'a>,
}

impl Stepper<CurvePoint> for ReparamStepper<'_> {
    fn step_to(&mut self, at: f64) -> CurvePoint {
        let t = self.mapping.step_to(at);
        self.curve.point_at_t(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vector2d, epsilon_eq};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn straight() -> QuinticSpline {
        QuinticSpline::from_endpoints(Vector2d::ZERO, 0.0, Vector2d::new(3.0, 0.0), 0.0)
    }

    fn bend() -> QuinticSpline {
        QuinticSpline::from_endpoints(Vector2d::ZERO, 0.0, Vector2d::new(2.0, 2.0), FRAC_PI_2)
    }

    #[test]
    fn straight_spline_has_chord_length() {
        let curve = ReparamCurve::from_spline(straight()).unwrap();
        assert!(epsilon_eq(curve.length(), 3.0, 1e-9));

        let mid = curve.point_at(1.2);
        assert!(mid.position.epsilon_eq(Vector2d::new(1.2, 0.0), 1e-6));
        assert!(mid.position_deriv.epsilon_eq(Vector2d::new(1.0, 0.0), 1e-9));
        assert!(epsilon_eq(mid.curvature(), 0.0, 1e-9));
    }

    #[test]
    fn arc_length_matches_fine_polyline() {
        let spline = bend();
        let curve = ReparamCurve::from_spline(spline).unwrap();
        let n = 100_000;
        let polyline: f64 = (0..n)
            .map(|i| {
                let t0 = i as f64 / n as f64;
                let t1 = (i + 1) as f64 / n as f64;
                (spline.position(t1) - spline.position(t0)).norm()
            })
            .sum();
        assert!(epsilon_eq(curve.length(), polyline, 1e-6));
    }

    #[test]
    fn derivatives_are_unit_speed_and_match_curvature() {
        let curve = ReparamCurve::from_spline(bend()).unwrap();
        let h = 1e-5;
        for i in 1..10 {
            let s = curve.length() * i as f64 / 10.0;
            let point = curve.point_at(s);
            assert!(epsilon_eq(point.position_deriv.norm(), 1.0, 1e-9));

            // curvature against the tangent angle's local slope
            let t = curve.mapping.t_of_s(s);
            let ahead = curve.point_at_t(t + h);
            let behind = curve.point_at_t(t - h);
            let ds = arc_length(&curve.spline, t - h, t + h);
            let numeric = angle_norm(ahead.tangent_angle - behind.tangent_angle) / ds;
            assert!(epsilon_eq(point.curvature(), numeric, 1e-4));

            let numeric_rate = (ahead.curvature() - behind.curvature()) / ds;
            assert!(epsilon_eq(point.tangent_angle_second_deriv, numeric_rate, 1e-3));
        }
    }

    #[test]
    fn end_point_is_spline_end() {
        let curve = ReparamCurve::from_spline(bend()).unwrap();
        let end = curve.point_at(curve.length());
        assert!(end.position.epsilon_eq(Vector2d::new(2.0, 2.0), 1e-9));
        assert!(epsilon_eq(end.tangent_angle, FRAC_PI_2, 1e-9));
        assert!(epsilon_eq(curve.point_at(-5.0).tangent_angle, 0.0, 1e-12));
    }

    #[test]
    fn samples_respect_segment_length() {
        let config = ReparamConfig {
            max_segment_length: 0.1,
            max_angle_change: PI,
            max_depth: 20,
        };
        let mapping = ReparamMapping::build(&bend(), &config).unwrap();
        let gaps = mapping.s_samples.windows(2).map(|w| w[1] - w[0]);
        for gap in gaps {
            assert!(gap <= 0.1 + 1e-12);
        }
    }

    #[test]
    fn mapping_stepper_matches_single_queries() {
        let mapping = ReparamMapping::build(&bend(), &ReparamConfig::default()).unwrap();
        let mut stepper = mapping.stepper();
        let length = mapping.length();
        let queries = [0.0, 0.1, 0.1, 0.7, length * 0.5, 0.2, length, length + 1.0, -1.0];
        for s in queries {
            assert_eq!(stepper.step_to(s), mapping.t_of_s(s));
        }
    }

    #[test]
    fn degenerate_spline_is_a_point() {
        let p = Vector2d::new(1.0, -1.0);
        let zero = Vector2d::ZERO;
        let spline = QuinticSpline::from_derivatives(p, zero, zero, p, zero, zero);
        let curve = ReparamCurve::from_spline(spline).unwrap();
        assert_eq!(curve.length(), 0.0);
        let point = curve.point_at(0.0);
        assert_eq!(point.position, p);
        assert_eq!(point.position_deriv, Vector2d::ZERO);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ReparamConfig {
            max_segment_length: 0.0,
            ..Default::default()
        };
        assert!(ReparamCurve::new(straight(), &config).is_err());
    }
}
