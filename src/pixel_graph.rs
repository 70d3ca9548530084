//! Stage 3 (pixel-cell lattice) and stage 4 (Voronoi-consistent deformation).

use std::collections::{HashMap, HashSet};

use crate::error::VectorizeResult;
use crate::geom::Corner;
use crate::similarity::SimilarityGraph;

/// The dual pixel-cell graph `G_p`: an undirected graph over corner
/// coordinates, initially the full `(W+1) x (H+1)` orthogonal lattice.
#[derive(Debug, Clone, Default)]
pub struct PixelGraph {
    adjacency: HashMap<Corner, HashSet<Corner>>,
}

impl PixelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, c: Corner) -> bool {
        self.adjacency.contains_key(&c)
    }

    pub fn neighbors(&self, c: Corner) -> impl Iterator<Item = Corner> + '_ {
        self.adjacency.get(&c).into_iter().flatten().copied()
    }

    pub fn degree(&self, c: Corner) -> usize {
        self.adjacency.get(&c).map_or(0, |s| s.len())
    }

    pub fn has_edge(&self, a: Corner, b: Corner) -> bool {
        self.adjacency.get(&a).is_some_and(|s| s.contains(&b))
    }

    pub fn add_node(&mut self, c: Corner) {
        self.adjacency.entry(c).or_default();
    }

    pub fn add_edge(&mut self, a: Corner, b: Corner) {
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
    }

    /// Remove an edge if present; a no-op otherwise. The original Python
    /// implementation calls `networkx.Graph.remove_edge`, which raises if the
    /// edge is absent - we treat the operation as idempotent instead, in
    /// keeping with the rest of the pipeline's `safe_remove`-style tolerance
    /// for "might already be gone" topology edits.
    pub fn remove_edge(&mut self, a: Corner, b: Corner) {
        if let Some(s) = self.adjacency.get_mut(&a) {
            s.remove(&b);
        }
        if let Some(s) = self.adjacency.get_mut(&b) {
            s.remove(&a);
        }
    }

    pub fn remove_node(&mut self, c: Corner) {
        if let Some(neighbors) = self.adjacency.remove(&c) {
            for n in neighbors {
                if let Some(s) = self.adjacency.get_mut(&n) {
                    s.remove(&c);
                }
            }
        }
    }

    pub fn nodes_iter(&self) -> impl Iterator<Item = Corner> + '_ {
        self.adjacency.keys().copied()
    }

    /// Induced subgraph over a given node set, keeping only edges with both
    /// endpoints in `nodes`.
    pub fn induced_subgraph(&self, nodes: &HashSet<Corner>) -> PixelGraph {
        let mut out = PixelGraph::new();
        for &n in nodes {
            out.add_node(n);
        }
        for &n in nodes {
            for neighbor in self.neighbors(n) {
                if nodes.contains(&neighbor) {
                    out.add_edge(n, neighbor);
                }
            }
        }
        out
    }

    /// Connected components of this graph (as node sets), in a deterministic
    /// order: components are discovered by scanning nodes sorted by their
    /// `Corner` coordinate, so the result does not depend on `HashMap`'s
    /// randomized iteration order.
    pub fn connected_components(&self) -> Vec<HashSet<Corner>> {
        let mut starts: Vec<Corner> = self.nodes_iter().collect();
        starts.sort_unstable();

        let mut visited: HashSet<Corner> = HashSet::new();
        let mut components = Vec::new();
        for start in starts {
            if visited.contains(&start) {
                continue;
            }
            let mut component = HashSet::new();
            let mut stack = vec![start];
            visited.insert(start);
            while let Some(node) = stack.pop() {
                component.insert(node);
                for neighbor in self.neighbors(node) {
                    if visited.insert(neighbor) {
                        stack.push(neighbor);
                    }
                }
            }
            components.push(component);
        }
        components
    }
}

/// Build the full `(W+1) x (H+1)` orthogonal lattice (stage 3).
pub fn build_pixel_graph(width: u32, height: u32) -> PixelGraph {
    let mut graph = PixelGraph::new();
    for y in 0..=height {
        for x in 0..=width {
            graph.add_node(Corner::from_int(x as i64, y as i64));
        }
    }
    for y in 0..=height {
        for x in 0..=width {
            let here = Corner::from_int(x as i64, y as i64);
            if x < width {
                graph.add_edge(here, Corner::from_int(x as i64 + 1, y as i64));
            }
            if y < height {
                graph.add_edge(here, Corner::from_int(x as i64, y as i64 + 1));
            }
        }
    }
    graph
}

/// Deform one notch at `pixnode`: splice in `pn - mpn - npn - pixnode` in
/// place of whatever currently connects `pn`/`mpn` to `pixnode` (spec section
/// 4.3, `_deform`).
fn deform(pixel_graph: &mut PixelGraph, pixnode: Corner, pn: Corner, mpn: Corner, npn: Corner) {
    if pixel_graph.contains(mpn) {
        pixel_graph.remove_edge(mpn, pixnode);
    } else {
        pixel_graph.remove_edge(pn, pixnode);
        pixel_graph.add_edge(pn, mpn);
    }
    pixel_graph.add_edge(mpn, npn);
    pixel_graph.add_edge(npn, pixnode);
}

/// Deform the pixel-cell grid according to the diagonal edges of the
/// similarity graph, then collapse degree-<=2 non-image-corner nodes (spec
/// section 4.3).
pub fn deform_pixel_grid(
    sim: &mut SimilarityGraph,
    pixel_graph: &mut PixelGraph,
    width: u32,
    height: u32,
) -> VectorizeResult<()> {
    let nodes: Vec<_> = sim.nodes_iter().collect();
    for n in nodes {
        let diagonal_neighbors: Vec<_> = sim
            .neighbors(n)
            .filter(|&m| sim.is_diagonal(n, m))
            .collect();
        for m in diagonal_neighbors {
            deform_cell(sim, pixel_graph, n, m);
        }
    }

    collapse_low_degree_nodes(pixel_graph, width, height);
    prune_stale_corners(sim, pixel_graph);

    Ok(())
}

fn deform_cell(
    sim: &mut SimilarityGraph,
    pixel_graph: &mut PixelGraph,
    n: (u32, u32),
    m: (u32, u32),
) {
    let offx: i64 = m.0 as i64 - n.0 as i64;
    let offy: i64 = m.1 as i64 - n.1 as i64;
    let px_x = m.0.max(n.0) as i64;
    let px_y = m.1.max(n.1) as i64;
    let pixnode = Corner::from_int(px_x, px_y);

    // Adjacent pixel a = (mx, ny)
    let a = (m.0, n.1);
    if sim.value(n) != sim.value(a) {
        let pn = pixnode.shifted(0, -4 * offy);
        let mpn = Corner::midpoint(pn, pixnode);
        let npn = pixnode.shifted(offx, -offy);
        sim.corners_mut(a).remove(&pixnode);
        sim.corners_mut(a).insert(npn);
        sim.corners_mut(n).insert(npn);
        deform(pixel_graph, pixnode, pn, mpn, npn);
    }

    // Adjacent pixel b = (nx, my)
    let b = (n.0, m.1);
    if sim.value(n) != sim.value(b) {
        let pn = pixnode.shifted(-4 * offx, 0);
        let mpn = Corner::midpoint(pn, pixnode);
        let npn = pixnode.shifted(-offx, offy);
        sim.corners_mut(b).remove(&pixnode);
        sim.corners_mut(b).insert(npn);
        sim.corners_mut(n).insert(npn);
        deform(pixel_graph, pixnode, pn, mpn, npn);
    }
}

fn collapse_low_degree_nodes(pixel_graph: &mut PixelGraph, width: u32, height: u32) {
    let image_corners: HashSet<Corner> = [
        Corner::from_int(0, 0),
        Corner::from_int(width as i64, 0),
        Corner::from_int(0, height as i64),
        Corner::from_int(width as i64, height as i64),
    ]
    .into_iter()
    .collect();

    let mut removals = Vec::new();
    let nodes: Vec<Corner> = pixel_graph.nodes_iter().collect();
    for node in nodes {
        if image_corners.contains(&node) {
            continue;
        }
        let neighbors: Vec<_> = pixel_graph.neighbors(node).collect();
        if neighbors.len() == 2 {
            pixel_graph.add_edge(neighbors[0], neighbors[1]);
        }
        if neighbors.len() <= 2 {
            removals.push(node);
        }
    }
    for node in removals {
        pixel_graph.remove_node(node);
    }
}

fn prune_stale_corners(sim: &mut SimilarityGraph, pixel_graph: &PixelGraph) {
    for pixel in sim.nodes_iter().collect::<Vec<_>>() {
        let stale: Vec<Corner> = sim
            .corners(pixel)
            .iter()
            .copied()
            .filter(|c| !pixel_graph.contains(*c))
            .collect();
        for corner in stale {
            sim.corners_mut(pixel).remove(&corner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_has_expected_node_and_edge_counts() {
        let g = build_pixel_graph(2, 3);
        assert_eq!(g.nodes_iter().count(), 3 * 4);
        assert_eq!(g.degree(Corner::from_int(0, 0)), 2);
        assert_eq!(g.degree(Corner::from_int(1, 1)), 4);
    }

    #[test]
    fn image_corners_are_never_collapsed() {
        let mut g = build_pixel_graph(1, 1);
        // A 1x1 lattice: every node already has degree 2, so all would be
        // candidates for collapse if they weren't all image corners.
        collapse_low_degree_nodes(&mut g, 1, 1);
        for corner in [
            Corner::from_int(0, 0),
            Corner::from_int(1, 0),
            Corner::from_int(0, 1),
            Corner::from_int(1, 1),
        ] {
            assert!(g.contains(corner));
        }
    }
}
