//! Stage 2: diagonal resolution over every 2x2 pixel block.

use crate::config::HeuristicConfig;
use crate::error::{VectorizeError, VectorizeResult};
use crate::heuristics::resolve_ambiguous_pair;
use crate::similarity::SimilarityGraph;

/// Visit every 2x2 block of pixels; remove both diagonals of a fully
/// connected block, and hand ambiguous (diagonals-only) pairs to the
/// heuristics module.
///
/// Returns [`VectorizeError::StructuralInvariant`] if a block has two
/// diagonal edges but neither 6 nor 2 edges in total - evidence of a bug
/// upstream in similarity-graph construction, per spec section 4.2.
pub fn resolve_diagonals(
    graph: &mut SimilarityGraph,
    width: u32,
    height: u32,
    config: HeuristicConfig,
) -> VectorizeResult<()> {
    if width < 2 || height < 2 {
        // No 2x2 block exists; nothing to resolve (spec boundary case: H=1).
        return Ok(());
    }

    let mut ambiguous_pairs = Vec::new();

    for y in 0..height - 1 {
        for x in 0..width - 1 {
            let block = [(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)];
            let edges = graph.edges_within(&block);
            let diagonals: Vec<_> = edges.iter().filter(|e| e.2).collect();

            match diagonals.len() {
                0 | 1 => {}
                2 => {
                    if edges.len() == 6 {
                        for d in &diagonals {
                            graph.remove_edge(d.0, d.1);
                        }
                    } else if edges.len() == 2 {
                        ambiguous_pairs.push([
                            (diagonals[0].0, diagonals[0].1),
                            (diagonals[1].0, diagonals[1].1),
                        ]);
                    } else {
                        return Err(VectorizeError::structural_invariant(format!(
                            "2x2 block at ({x}, {y}) has 2 diagonals but {} total edges (expected 2 or 6)",
                            edges.len()
                        )));
                    }
                }
                n => {
                    return Err(VectorizeError::structural_invariant(format!(
                        "2x2 block at ({x}, {y}) has {n} diagonal edges; at most 2 are possible"
                    )));
                }
            }
        }
    }

    // Weights for every ambiguous pair are computed against the graph state
    // before *any* pair is resolved, matching the original two-phase
    // (`_compute_weights` then removal) structure: overlapping 2x2 blocks can
    // share a node, so resolving one pair first would change the degree/curve
    // walk the next pair's weights are computed against.
    let weighed: Vec<_> = ambiguous_pairs
        .into_iter()
        .map(|pair| {
            let weights = [
                crate::heuristics::edge_weight(graph, pair[0].0, pair[0].1, config),
                crate::heuristics::edge_weight(graph, pair[1].0, pair[1].1, config),
            ];
            (pair, weights)
        })
        .collect();

    for (pair, weights) in weighed {
        resolve_ambiguous_pair(graph, pair, weights);
    }

    Ok(())
}
