//! Tunable constants for the vectorization pipeline
//!
//! The original Kopf-Lischinski implementation hard-codes these as class
//! attributes (`Heuristics._SPARSE_WINDOW_DIMS`, `SplineSmoother.ITERATIONS`,
//! etc). We lift them into a `serde`-serializable config so callers and test
//! fixtures can tune or snapshot them without touching algorithm code.

use serde::{Deserialize, Serialize};

/// YUV similarity thresholds used by stage 1 (similarity graph construction)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityThresholds {
    pub y: i32,
    pub u: i32,
    pub v: i32,
}

impl Default for SimilarityThresholds {
    fn default() -> Self {
        Self { y: 48, u: 7, v: 6 }
    }
}

/// Parameters for the Gestalt diagonal-resolution heuristics (stage 2)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Width/height of the sparse-pixels sampling window (must be even)
    pub sparse_window: (u32, u32),
    /// Bonus weight added when cutting a diagonal would orphan a single pixel
    pub island_weight: i64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            sparse_window: (8, 8),
            island_weight: 5,
        }
    }
}

/// Parameters for the energy-minimizing spline smoother (stage 7)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmootherConfig {
    /// Number of trapezoidal-rule subintervals per knot span when integrating curvature
    pub intervals_per_span: u32,
    /// Number of random candidate offsets sampled per point, per iteration
    pub point_guesses: u32,
    /// Maximum magnitude of a random candidate offset
    pub guess_offset: f64,
    /// Number of outer optimization passes over all useful control points
    pub iterations: u32,
    /// Scalar multiplier applied to the positional energy term
    pub positional_energy_multiplier: f64,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            intervals_per_span: 20,
            point_guesses: 20,
            guess_offset: 0.05,
            iterations: 20,
            positional_energy_multiplier: 1.0,
        }
    }
}

/// Top-level configuration for a vectorization run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct VectorizerConfig {
    pub similarity: SimilarityThresholds,
    pub heuristics: HeuristicConfig,
    pub smoother: SmootherConfig,
}
