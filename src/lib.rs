//! # pixelart-vectorize
//!
//! Kopf-Lischinski pixel-art vectorization: builds a similarity graph over an
//! image's pixels, resolves ambiguous crossing diagonals with Gestalt-law
//! heuristics, deforms the dual pixel-cell grid into Voronoi-consistent
//! region boundaries, extracts shapes and their outlines, and fits each
//! outline with a closed quadratic B-spline that shared boundaries are
//! smoothed against once via energy-minimizing coordinate descent.
//!
//! ```no_run
//! use pixelart_vectorize::{vectorize, VectorizerConfig};
//!
//! let rows = vec![vec![[255, 0, 0], [255, 0, 0]], vec![[0, 0, 255], [0, 0, 255]]];
//! let shapes = vectorize(2, 2, &rows, VectorizerConfig::default()).unwrap();
//! assert_eq!(shapes.len(), 2);
//! ```

pub mod bspline;
pub mod color;
pub mod config;
pub mod diagonal;
pub mod error;
pub mod geom;
pub mod heuristics;
pub mod path;
pub mod pixel_graph;
pub mod raster;
pub mod shapes;
pub mod similarity;
pub mod smoother;
pub mod vectorizer;

pub use bspline::ClosedBSpline;
pub use color::Rgb;
pub use config::{HeuristicConfig, SimilarityThresholds, SmootherConfig, VectorizerConfig};
pub use error::{VectorizeError, VectorizeResult};
pub use raster::{OutOfBoundsStrategy, PixelBuffer};
pub use shapes::{BoundaryKind, Shape};
pub use vectorizer::{vectorize, vectorize_seeded, VectorShape};
