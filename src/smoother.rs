//! Stage 7: energy-minimizing spline smoothing (spec section 4.7).
//!
//! Each shared path's fitted spline is relaxed by repeated random-offset
//! coordinate descent: for every useful control point, try a handful of
//! random nearby positions and keep whichever - including staying put -
//! minimizes that point's own energy (curvature term plus a penalty for
//! drifting from its original grid position). The RNG is always
//! caller-supplied so a run is exactly reproducible given a seed, unlike the
//! source's implicit process-wide generator.

use std::f64::consts::PI;

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::bspline::ClosedBSpline;
use crate::config::SmootherConfig;
use crate::error::{VectorizeError, VectorizeResult};
use crate::geom::Vec2;

/// `E_pos(i) = |P_i - P_i^orig|^4`, scaled by the configured multiplier.
fn positional_energy(point: Vec2, original: Vec2, config: SmootherConfig) -> f64 {
    let dx = point.x - original.x;
    let dy = point.y - original.y;
    let dist_sq = dx * dx + dy * dy;
    config.positional_energy_multiplier * dist_sq * dist_sq
}

/// `E(i) = E_curv(i) + E_pos(i)` for the control point currently at index
/// `i` in `spline`.
fn point_energy(spline: &ClosedBSpline, original: &[Vec2], index: usize, config: SmootherConfig) -> f64 {
    let curvature = spline.curvature_energy_at(index, config.intervals_per_span);
    let positional = positional_energy(spline.control_points()[index], original[index], config);
    curvature + positional
}

/// Relax `spline` in place toward lower per-point energy, anchored to
/// `original` (the pre-smoothing corner positions) by the positional term.
pub fn smooth_path<R: Rng>(
    spline: &mut ClosedBSpline,
    original: &[Vec2],
    config: SmootherConfig,
    rng: &mut R,
) -> VectorizeResult<()> {
    if spline.control_points().len() != original.len() {
        return Err(VectorizeError::spline_invariant(format!(
            "spline has {} control points but {} original corners were supplied",
            spline.control_points().len(),
            original.len()
        )));
    }

    // r in Uniform[0, GUESS_OFFSET), theta in Uniform[0, 2*pi).
    let radius = Uniform::new(0.0, config.guess_offset.max(f64::MIN_POSITIVE));
    let angle = Uniform::new(0.0, 2.0 * PI);

    for _ in 0..config.iterations {
        for i in 0..spline.control_points().len() {
            let start = spline.control_points()[i];
            let baseline_energy = point_energy(spline, original, i, config);
            let mut best_point = start;
            let mut best_energy = baseline_energy;

            for _ in 0..config.point_guesses {
                let r = radius.sample(rng);
                let theta = angle.sample(rng);
                let candidate = Vec2::new(start.x + r * theta.cos(), start.y + r * theta.sin());
                spline.move_point(i, candidate)?;
                let candidate_energy = point_energy(spline, original, i, config);
                if candidate_energy < best_energy {
                    best_energy = candidate_energy;
                    best_point = candidate;
                }
            }

            spline.move_point(i, best_point)?;
        }
    }

    Ok(())
}
