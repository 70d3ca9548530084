//! Gestalt-law heuristics used to resolve an ambiguous crossing-diagonal pair
//! (spec section 4.2): Curves, Sparse pixels, and Island.

use std::collections::HashSet;

use crate::config::HeuristicConfig;
use crate::geom::PixelCoord;
use crate::similarity::SimilarityGraph;

type SortedEdge = (PixelCoord, PixelCoord);

fn sorted_edge(a: PixelCoord, b: PixelCoord) -> SortedEdge {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Walk the similarity graph outward from the diagonal's endpoints through
/// valence-2 nodes only, accumulating visited edges. Long smooth curves
/// accrue a large weight, rewarding the diagonal that continues one.
fn weight_curve(graph: &SimilarityGraph, a: PixelCoord, b: PixelCoord) -> i64 {
    let mut edges_in_curve: HashSet<SortedEdge> = HashSet::new();
    edges_in_curve.insert(sorted_edge(a, b));
    let mut frontier = vec![a, b];

    while let Some(node) = frontier.pop() {
        if graph.degree(node) != 2 {
            continue;
        }
        for neighbor in graph.neighbors(node).collect::<Vec<_>>() {
            let edge = sorted_edge(node, neighbor);
            if edges_in_curve.insert(edge) {
                frontier.push(neighbor);
            }
        }
    }

    edges_in_curve.len() as i64
}

fn sparse_offset(a: PixelCoord, b: PixelCoord, window: (u32, u32)) -> (i64, i64) {
    let min_x = a.0.min(b.0) as i64;
    let min_y = a.1.min(b.1) as i64;
    (
        window.0 as i64 / 2 - 1 - min_x,
        window.1 as i64 / 2 - 1 - min_y,
    )
}

fn within_window(node: PixelCoord, window: (u32, u32), offset: (i64, i64)) -> bool {
    let x = node.0 as i64 + offset.0;
    let y = node.1 as i64 + offset.1;
    x >= 0 && y >= 0 && x < window.0 as i64 && y < window.1 as i64
}

/// Flood-fill similarity-graph neighbours of the diagonal's endpoints that lie
/// within an 8x8 (by default) window centred on the edge. The weight is the
/// negative of the reached node count, so the sparser side of the pair wins.
fn weight_sparse(graph: &SimilarityGraph, a: PixelCoord, b: PixelCoord, config: HeuristicConfig) -> i64 {
    let offset = sparse_offset(a, b, config.sparse_window);
    let mut reached: HashSet<PixelCoord> = HashSet::new();
    reached.insert(a);
    reached.insert(b);
    let mut frontier = vec![a, b];

    while let Some(node) = frontier.pop() {
        for neighbor in graph.neighbors(node).collect::<Vec<_>>() {
            if reached.contains(&neighbor) {
                continue;
            }
            if within_window(neighbor, config.sparse_window, offset) {
                reached.insert(neighbor);
                frontier.push(neighbor);
            }
        }
    }

    -(reached.len() as i64)
}

/// If either endpoint has similarity-degree 1, cutting this diagonal would
/// visually orphan a single pixel; penalize that outcome.
fn weight_island(graph: &SimilarityGraph, a: PixelCoord, b: PixelCoord, config: HeuristicConfig) -> i64 {
    if graph.degree(a) == 1 || graph.degree(b) == 1 {
        config.island_weight
    } else {
        0
    }
}

/// Sum of the three heuristic terms for a single diagonal edge.
pub fn edge_weight(graph: &SimilarityGraph, a: PixelCoord, b: PixelCoord, config: HeuristicConfig) -> i64 {
    weight_curve(graph, a, b) + weight_sparse(graph, a, b, config) + weight_island(graph, a, b, config)
}

/// Resolve one ambiguous crossing-diagonal pair given its already-computed
/// weights (computed up front, before any pair in the image is resolved - see
/// [`crate::diagonal::resolve_diagonals`]): remove every diagonal tied for the
/// minimum (so a symmetric tie removes both).
pub fn resolve_ambiguous_pair(
    graph: &mut SimilarityGraph,
    pair: [(PixelCoord, PixelCoord); 2],
    weights: [i64; 2],
) {
    let min_weight = weights[0].min(weights[1]);
    for (edge, &weight) in pair.iter().zip(weights.iter()) {
        if weight == min_weight {
            graph.remove_edge(edge.0, edge.1);
        }
    }
}
