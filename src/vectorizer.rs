//! Top-level orchestration: wires the seven pipeline stages together behind
//! a single [`vectorize`] / [`vectorize_seeded`] entry point.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::bspline::ClosedBSpline;
use crate::color::Rgb;
use crate::config::VectorizerConfig;
use crate::diagonal::resolve_diagonals;
use crate::error::VectorizeResult;
use crate::geom::Vec2;
use crate::path::{trace_paths, Path, PathCache};
use crate::pixel_graph::{build_pixel_graph, deform_pixel_grid};
use crate::raster::PixelBuffer;
use crate::shapes::{build_outline_graph, extract_shapes, split_shape_boundaries, BoundaryKind, Shape};
use crate::similarity::build_similarity_graph;
use crate::smoother::smooth_path;

/// One extracted shape, fully converted to vector form: a fill colour, an
/// outer boundary spline, and zero or more hole splines.
#[derive(Debug, Clone)]
pub struct VectorShape {
    pub color: Rgb,
    pub outer: ClosedBSpline,
    pub holes: Vec<ClosedBSpline>,
}

/// Vectorize an image using a fixed, fully-reproducible smoother seed.
///
/// Equivalent to [`vectorize_seeded`] with seed `0`; use that entry point
/// directly when the caller wants to vary or control the smoother's
/// randomness.
pub fn vectorize(width: u32, height: u32, rows: &[Vec<Rgb>], config: VectorizerConfig) -> VectorizeResult<Vec<VectorShape>> {
    vectorize_seeded(width, height, rows, config, 0)
}

/// Vectorize an image, seeding the spline smoother's RNG explicitly.
pub fn vectorize_seeded(
    width: u32,
    height: u32,
    rows: &[Vec<Rgb>],
    config: VectorizerConfig,
    seed: u64,
) -> VectorizeResult<Vec<VectorShape>> {
    let image = PixelBuffer::new(width, height, rows)?;
    info!("vectorizing {width}x{height} image");

    let mut similarity = build_similarity_graph(&image, config.similarity);
    debug!("similarity graph built with {} pixel nodes", similarity.nodes_iter().count());

    resolve_diagonals(&mut similarity, width, height, config.heuristics)?;
    debug!("diagonal ambiguities resolved");

    let mut pixel_graph = build_pixel_graph(width, height);
    deform_pixel_grid(&mut similarity, &mut pixel_graph, width, height)?;
    debug!("pixel-cell grid deformed");

    let shapes = extract_shapes(&similarity);
    info!("{} shapes extracted", shapes.len());

    let outline = build_outline_graph(&similarity, &pixel_graph);

    let mut cache = PathCache::new();
    let mut fitted: HashMap<*const std::cell::RefCell<Path>, ClosedBSpline> = HashMap::new();
    let mut usage_count: HashMap<*const std::cell::RefCell<Path>, usize> = HashMap::new();
    let mut assignments: Vec<Vec<(BoundaryKind, Vec<Rc<std::cell::RefCell<Path>>>)>> = Vec::new();

    for shape in &shapes {
        let mut boundaries = Vec::new();
        for (kind, component) in split_shape_boundaries(&outline, shape) {
            let segments: Vec<_> = trace_paths(&component)
                .into_iter()
                .map(|p| {
                    let handle = cache.intern(p);
                    *usage_count.entry(Rc::as_ptr(&handle)).or_insert(0) += 1;
                    handle
                })
                .collect();
            boundaries.push((kind, segments));
        }
        assignments.push(boundaries);
    }

    for handle in cache.paths() {
        let control_points = control_points_from_path(&handle.borrow());
        let spline = ClosedBSpline::new(control_points, 2)?;
        fitted.insert(Rc::as_ptr(handle), spline);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for handle in cache.paths() {
        let ptr = Rc::as_ptr(handle);
        if usage_count.get(&ptr).copied().unwrap_or(0) < 2 {
            continue;
        }
        let original = control_points_from_path(&handle.borrow());
        if let Some(spline) = fitted.get_mut(&ptr) {
            smooth_path(spline, &original, config.smoother, &mut rng)?;
        }
    }
    debug!("{} shared paths relaxed by the smoother", usage_count.values().filter(|&&c| c >= 2).count());

    let mut output = Vec::with_capacity(shapes.len());
    for (shape, boundaries) in shapes.iter().zip(assignments.into_iter()) {
        output.push(assemble_shape(shape, boundaries, &fitted)?);
    }

    info!("vectorization complete: {} shapes emitted", output.len());
    Ok(output)
}

fn control_points_from_path(path: &Path) -> Vec<Vec2> {
    let corners = if path.is_closed() {
        &path.corners[..path.corners.len() - 1]
    } else {
        &path.corners[..]
    };
    corners.iter().map(|c| c.as_vec2()).collect()
}

/// Concatenate the fitted splines of a boundary's segments into one closed
/// curve. The overwhelmingly common case is a single segment (a simple
/// cycle with no branch points); boundaries with branch points concatenate
/// their segments' control points in trace order.
fn concatenate_boundary(
    segments: &[Rc<std::cell::RefCell<Path>>],
    fitted: &HashMap<*const std::cell::RefCell<Path>, ClosedBSpline>,
) -> VectorizeResult<ClosedBSpline> {
    let mut points = Vec::new();
    for segment in segments {
        let spline = &fitted[&Rc::as_ptr(segment)];
        points.extend_from_slice(spline.control_points());
    }
    ClosedBSpline::new(points, 2)
}

fn assemble_shape(
    shape: &Shape,
    boundaries: Vec<(BoundaryKind, Vec<Rc<std::cell::RefCell<Path>>>)>,
    fitted: &HashMap<*const std::cell::RefCell<Path>, ClosedBSpline>,
) -> VectorizeResult<VectorShape> {
    let mut outer = None;
    let mut holes = Vec::new();

    for (kind, segments) in boundaries {
        let spline = concatenate_boundary(&segments, fitted)?;
        match kind {
            // The outer boundary is emitted with reversed winding relative to
            // how it was traced, so outer and hole loops wind consistently
            // for downstream fill-rule consumers (spec section 6).
            BoundaryKind::Outer => outer = Some(spline.reversed()),
            BoundaryKind::Hole => holes.push(spline),
        }
    }

    let outer = outer.unwrap_or_else(|| {
        // A shape with no outline edges at all cannot occur: every shape has
        // at least one pixel, and every pixel contributes at least one edge
        // to the outline (its side against the image border or a neighbour).
        unreachable!("shape {:?} produced no outer boundary", shape.color)
    });

    Ok(VectorShape {
        color: shape.color,
        outer,
        holes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VectorizerConfig;

    #[test]
    fn single_red_pixel_yields_one_shape_with_no_holes() {
        let shapes = vectorize(1, 1, &[vec![[255, 0, 0]]], VectorizerConfig::default()).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].color, [255, 0, 0]);
        assert!(shapes[0].holes.is_empty());
        assert_eq!(shapes[0].outer.control_points().len(), 4);
    }

    #[test]
    fn two_column_image_yields_two_shapes() {
        let shapes = vectorize(2, 1, &[vec![[0, 0, 0], [255, 255, 255]]], VectorizerConfig::default()).unwrap();
        assert_eq!(shapes.len(), 2);
    }

    #[test]
    fn solid_image_yields_a_single_shape() {
        let rows = vec![vec![[5, 5, 5], [5, 5, 5]], vec![[5, 5, 5], [5, 5, 5]]];
        let shapes = vectorize(2, 2, &rows, VectorizerConfig::default()).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].outer.control_points().len(), 4);
    }

    #[test]
    fn checkerboard_yields_four_shapes() {
        let rows = vec![
            vec![[0, 0, 0], [255, 255, 255]],
            vec![[255, 255, 255], [0, 0, 0]],
        ];
        let shapes = vectorize(2, 2, &rows, VectorizerConfig::default()).unwrap();
        assert_eq!(shapes.len(), 4);
    }

    #[test]
    fn same_seed_is_fully_reproducible() {
        let rows = vec![vec![[10, 10, 10], [200, 30, 30], [10, 10, 10]]];
        let a = vectorize_seeded(3, 1, &rows, VectorizerConfig::default(), 99).unwrap();
        let b = vectorize_seeded(3, 1, &rows, VectorizerConfig::default(), 99).unwrap();
        assert_eq!(a.len(), b.len());
        for (sa, sb) in a.iter().zip(b.iter()) {
            assert_eq!(sa.outer.control_points(), sb.outer.control_points());
        }
    }
}
