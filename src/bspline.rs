//! Closed quadratic B-spline fitting and evaluation (spec section 4.6).
//!
//! Every path is fit with a closed, uniform-knot B-spline built the
//! standard way: the control points wrap around by `degree` points so the
//! curve closes smoothly, and the knot vector is just `0, 1, 2, ...` with
//! unit spacing throughout.

use crate::error::{VectorizeError, VectorizeResult};
use crate::geom::Vec2;

/// A closed, uniform-knot B-spline over a cyclic sequence of control points.
#[derive(Debug, Clone)]
pub struct ClosedBSpline {
    control_points: Vec<Vec2>,
    degree: usize,
}

impl ClosedBSpline {
    /// Build a spline from its distinct (non-wrapped) control points. Needs
    /// at least `degree + 1` points so the wrap-extended control polygon has
    /// a well-defined span for every parameter in the domain.
    pub fn new(control_points: Vec<Vec2>, degree: usize) -> VectorizeResult<Self> {
        if control_points.len() < degree + 1 {
            return Err(VectorizeError::DegreeMismatch {
                expected: degree + 1,
                actual: control_points.len(),
                knots: control_points.len() + degree + 1,
                points: control_points.len(),
            });
        }
        Ok(Self { control_points, degree })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn control_points(&self) -> &[Vec2] {
        &self.control_points
    }

    /// The open parameter interval this spline is actually fit over; `t`
    /// outside `[0, domain().1)` does not correspond to the intended curve.
    pub fn domain(&self) -> (f64, f64) {
        (0.0, self.control_points.len() as f64)
    }

    fn extended_control_points(&self) -> Vec<Vec2> {
        let mut points = self.control_points.clone();
        if self.degree > 0 {
            points.extend_from_slice(&self.control_points[..self.degree]);
        }
        points
    }

    fn knot_vector(&self, point_count: usize) -> Vec<f64> {
        (0..=(point_count + self.degree)).map(|i| i as f64).collect()
    }

    /// Evaluate the curve at `t` in `domain()` via De Boor's algorithm.
    pub fn evaluate(&self, t: f64) -> Vec2 {
        let shifted = t + self.degree as f64;
        let extended = self.extended_control_points();
        let knots = self.knot_vector(extended.len());
        de_boor(&knots, &extended, self.degree, shifted)
    }

    /// Replace one control point in place.
    pub fn move_point(&mut self, index: usize, new_position: Vec2) -> VectorizeResult<()> {
        if index >= self.control_points.len() {
            return Err(VectorizeError::invalid_input(format!(
                "control point index {index} out of range for {} points",
                self.control_points.len()
            )));
        }
        self.control_points[index] = new_position;
        Ok(())
    }

    pub fn reversed(&self) -> Self {
        let mut points = self.control_points.clone();
        points.reverse();
        Self {
            control_points: points,
            degree: self.degree,
        }
    }

    /// The analytic derivative curve: for a uniform-knot B-spline (unit knot
    /// spacing) the derivative of a degree-`p` spline is a degree-`(p - 1)`
    /// spline whose control points are the first differences of the
    /// original's wrap-extended control polygon.
    pub fn derivative(&self) -> ClosedBSpline {
        if self.degree == 0 {
            return ClosedBSpline {
                control_points: vec![Vec2::new(0.0, 0.0); self.control_points.len()],
                degree: 0,
            };
        }
        let extended = self.extended_control_points();
        let diffs: Vec<Vec2> = extended.windows(2).map(|w| w[1] - w[0]).collect();
        ClosedBSpline {
            control_points: diffs[..self.control_points.len()].to_vec(),
            degree: self.degree - 1,
        }
    }

    /// Unsigned curvature at `t` - `|v x a| / |v|^3` from the first and
    /// second derivative curves. Zero when the curve has zero speed at `t`
    /// (denominator would be zero); that degeneracy is handled locally here
    /// rather than surfaced as an error, per spec section 7.
    pub fn curvature(&self, t: f64) -> f64 {
        let velocity = self.derivative().evaluate(t);
        let acceleration = self.derivative().derivative().evaluate(t);
        let speed_sq = velocity.x * velocity.x + velocity.y * velocity.y;
        if speed_sq < 1e-12 {
            return 0.0;
        }
        let cross = velocity.x * acceleration.y - velocity.y * acceleration.x;
        (cross / speed_sq.powf(1.5)).abs()
    }

    /// Integral of `|curvature(u)|` over one closed span `[start, end]`,
    /// approximated by the trapezoidal rule (endpoint coefficients 1/2,
    /// interior coefficients 1, scaled by the interval width); spans of
    /// length zero contribute nothing.
    fn integrate_curvature_over_span(&self, start: f64, end: f64, intervals_per_span: u32) -> f64 {
        if (end - start).abs() < 1e-12 {
            return 0.0;
        }
        let intervals = intervals_per_span.max(1);
        let step = (end - start) / intervals as f64;
        let mut sum = (self.curvature(start) + self.curvature(end)) / 2.0;
        for i in 1..intervals {
            sum += self.curvature(start + step * i as f64);
        }
        sum * step
    }

    /// Curvature energy for a single control point: the integral of
    /// `|curvature(u)|` over the `degree` knot-spans that touch control
    /// point `index` (spec section 4.7's `E_curv(i)` term). For a closed
    /// spline these spans wrap modulo the unwrapped length `L`.
    ///
    /// Curvature itself is invariant to reparametrization, but this spline's
    /// knots are unit-spaced (`0, 1, 2, ...`) rather than the spec's
    /// `U_i = i / m` (spacing `1/m`, over a domain of total length 1). A span
    /// here is `m` times wider than the spec's corresponding span, so the raw
    /// trapezoidal sum below is `m` times too large relative to
    /// [`SmootherConfig::positional_energy_multiplier`]'s `|P - P_orig|^4`
    /// term; dividing by `m` restores the spec's curvature/position balance
    /// without rebuilding the knot vector in fractional units.
    pub fn curvature_energy_at(&self, index: usize, intervals_per_span: u32) -> f64 {
        let len = self.control_points.len() as i64;
        let mut total = 0.0;
        for j in 0..self.degree as i64 {
            let start = (index as i64 + j).rem_euclid(len) as f64;
            total += self.integrate_curvature_over_span(start, start + 1.0, intervals_per_span);
        }
        let m = self.control_points.len() as f64 + 2.0 * self.degree as f64;
        total / m
    }

    /// Convert this uniform quadratic B-spline into its equivalent sequence
    /// of quadratic Bezier segments - the standard midpoint-subdivision
    /// identity for uniform quadratic splines, one Bezier per unit span.
    pub fn quadratic_bezier_segments(&self) -> VectorizeResult<Vec<[Vec2; 3]>> {
        if self.degree != 2 {
            return Err(VectorizeError::spline_invariant(format!(
                "Bezier conversion requires degree 2, got {}",
                self.degree
            )));
        }
        let extended = self.extended_control_points();
        let n = self.control_points.len();
        Ok((0..n)
            .map(|i| {
                let c0 = extended[i];
                let c1 = extended[i + 1];
                let c2 = extended[i + 2];
                [midpoint(c0, c1), c1, midpoint(c1, c2)]
            })
            .collect())
    }
}

fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Locate the knot span index `k` such that `knots[k] <= t < knots[k + 1]`,
/// clamped so a De Boor evaluation at the domain's right edge still lands on
/// the last valid span.
fn find_knot_span(knots: &[f64], degree: usize, point_count: usize, t: f64) -> usize {
    let max_span = point_count - 1;
    if t >= knots[max_span] {
        return max_span.max(degree);
    }
    let mut k = degree;
    while k < max_span && t >= knots[k + 1] {
        k += 1;
    }
    k
}

fn de_boor(knots: &[f64], control: &[Vec2], degree: usize, t: f64) -> Vec2 {
    let k = find_knot_span(knots, degree, control.len(), t);
    let mut d: Vec<Vec2> = (0..=degree).map(|j| control[j + k - degree]).collect();
    for r in 1..=degree {
        for j in (r..=degree).rev() {
            let i = j + k - degree;
            let denom = knots[i + degree - r + 1] - knots[i];
            let alpha = if denom.abs() < 1e-12 { 0.0 } else { (t - knots[i]) / denom };
            d[j] = d[j - 1] * (1.0 - alpha) + d[j] * alpha;
        }
    }
    d[degree]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> ClosedBSpline {
        ClosedBSpline::new(
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            2,
        )
        .unwrap()
    }

    #[test]
    fn rejects_too_few_control_points_for_degree() {
        assert!(ClosedBSpline::new(vec![Vec2::new(0.0, 0.0)], 2).is_err());
    }

    #[test]
    fn evaluate_stays_within_the_control_polygon_bounds() {
        let spline = square();
        let (start, end) = spline.domain();
        let mut t = start;
        while t < end {
            let p = spline.evaluate(t);
            assert!((-0.1..=1.1).contains(&p.x));
            assert!((-0.1..=1.1).contains(&p.y));
            t += 0.1;
        }
    }

    #[test]
    fn moving_a_control_point_changes_the_curve_near_it() {
        let mut spline = square();
        let before = spline.evaluate(1.0);
        spline.move_point(1, Vec2::new(5.0, 5.0)).unwrap();
        let after = spline.evaluate(1.0);
        assert_ne!(before, after);
    }

    #[test]
    fn bezier_conversion_requires_quadratic_degree() {
        let linear = ClosedBSpline::new(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)], 1).unwrap();
        assert!(linear.quadratic_bezier_segments().is_err());
        assert_eq!(square().quadratic_bezier_segments().unwrap().len(), 4);
    }

    #[test]
    fn curvature_energy_of_a_straight_segment_is_near_zero() {
        let collinear = ClosedBSpline::new(
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(2.0, 0.0),
                Vec2::new(3.0, 0.0),
            ],
            1,
        )
        .unwrap();
        for i in 0..collinear.control_points().len() {
            assert!(collinear.curvature_energy_at(i, 20) < 1e-6);
        }
    }

    #[test]
    fn bezier_anchors_coincide_with_knot_evaluations_and_close_the_loop() {
        // Evaluating at every integer knot in the domain must agree with the
        // on-curve anchor a freshly built spline's Bezier segments produce at
        // that same knot, and walking the segments' anchors must close back
        // on itself - the round-trip property from spec section 8.
        let spline = ClosedBSpline::new(
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(3.0, 0.0),
                Vec2::new(3.0, 2.0),
                Vec2::new(1.0, 3.0),
                Vec2::new(-1.0, 1.0),
            ],
            2,
        )
        .unwrap();
        let segments = spline.quadratic_bezier_segments().unwrap();
        let n = spline.control_points().len();
        assert_eq!(segments.len(), n);

        for (i, segment) in segments.iter().enumerate() {
            let [anchor_start, _control, _anchor_end] = segment;
            let evaluated = spline.evaluate(i as f64);
            assert!((anchor_start.x - evaluated.x).abs() < 1e-9);
            assert!((anchor_start.y - evaluated.y).abs() < 1e-9);
        }

        for i in 0..n {
            let this_end = segments[i][2];
            let next_start = segments[(i + 1) % n][0];
            assert!((this_end.x - next_start.x).abs() < 1e-9);
            assert!((this_end.y - next_start.y).abs() < 1e-9);
        }
    }

    #[test]
    fn curvature_is_never_negative() {
        let spline = square();
        let mut t = 0.0;
        while t < spline.domain().1 {
            assert!(spline.curvature(t) >= 0.0);
            t += 0.1;
        }
    }
}
