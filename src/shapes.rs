//! Stage 5 (shape extraction) and stage 6 (outline graph derivation and
//! outside-boundary/hole separation).

use std::collections::HashSet;

use crate::color::Rgb;
use crate::geom::{Corner, PixelCoord};
use crate::pixel_graph::PixelGraph;
use crate::similarity::SimilarityGraph;

/// One connected region of mutually similar pixels: a solid-colour shape with
/// a known boundary (its corner set) but not yet a fitted curve.
#[derive(Debug, Clone)]
pub struct Shape {
    pub pixels: HashSet<PixelCoord>,
    pub color: Rgb,
    pub corners: HashSet<Corner>,
}

/// One [`Shape`] per connected component of the similarity graph (spec
/// section 4.4). A shape's fill colour is its last pixel's colour in raster
/// (row-major) order, mirroring the source's "last write wins" dictionary
/// update rather than an arbitrary graph-traversal order.
pub fn extract_shapes(sim: &SimilarityGraph) -> Vec<Shape> {
    sim.connected_components()
        .into_iter()
        .map(|mut pixels| {
            // Sort in raster (row-major) scan order so the last element is
            // the last pixel the original top-to-bottom, left-to-right walk
            // would have visited - matching the "last write wins" colour
            // convention.
            pixels.sort_unstable_by_key(|p| (p.1, p.0));
            let color = sim.value(*pixels.last().expect("component is non-empty"));
            let mut corners = HashSet::new();
            for &p in &pixels {
                corners.extend(sim.corners(p).iter().copied());
            }
            Shape {
                pixels: pixels.into_iter().collect(),
                color,
                corners,
            }
        })
        .collect()
}

/// Derive the outline graph `O = G_p` minus every edge interior to a shape
/// (spec section 4.4).
///
/// An edge `(u, v)` of the deformed pixel graph is interior iff two
/// similarity-graph-adjacent pixels both have `u` and `v` in their corner
/// set - i.e. the edge sits between two pixels the similarity graph already
/// judged to belong together, so it carries no region boundary. `O` starts
/// as a full copy of the pixel graph with every such edge removed, then its
/// isolated (interior-only) nodes are dropped.
pub fn build_outline_graph(sim: &SimilarityGraph, pixel_graph: &PixelGraph) -> PixelGraph {
    let mut outline = pixel_graph.clone();

    for p in sim.nodes_iter() {
        let corners = sim.corners(p);
        for neighbor in sim.neighbors(p) {
            let shared: Vec<Corner> = corners.intersection(sim.corners(neighbor)).copied().collect();
            if shared.len() == 2 {
                outline.remove_edge(shared[0], shared[1]);
            }
        }
    }

    let isolated: Vec<Corner> = outline.nodes_iter().filter(|&n| outline.degree(n) == 0).collect();
    for node in isolated {
        outline.remove_node(node);
    }

    outline
}

/// One connected piece of a shape's outline, tagged as the outer boundary or
/// a hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Outer,
    Hole,
}

/// Split a shape's induced outline subgraph into its connected components,
/// tagging the component containing the lexicographically smallest corner as
/// the outer boundary (spec section 4.4's minimum-corner rule) and every
/// other component as a hole.
pub fn split_shape_boundaries(outline: &PixelGraph, shape: &Shape) -> Vec<(BoundaryKind, PixelGraph)> {
    let induced = outline.induced_subgraph(&shape.corners);
    let components = induced.connected_components();

    let outer_min = components
        .iter()
        .enumerate()
        .map(|(i, nodes)| (i, *nodes.iter().min().expect("component is non-empty")))
        .min_by_key(|&(_, corner)| corner)
        .map(|(i, _)| i);

    components
        .into_iter()
        .enumerate()
        .map(|(i, nodes)| {
            let kind = if Some(i) == outer_min {
                BoundaryKind::Outer
            } else {
                BoundaryKind::Hole
            };
            (kind, induced.induced_subgraph(&nodes))
        })
        .collect()
}
