//! Stage 1: the similarity graph G_s, and its builder.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::color::{pixels_similar, Rgb};
use crate::config::SimilarityThresholds;
use crate::geom::{Corner, PixelCoord};
use crate::raster::{OutOfBoundsStrategy, PixelBuffer};

/// A node of the similarity graph: a pixel's colour and its four (initially
/// integer) corner coordinates in the pixel-cell graph.
#[derive(Debug, Clone)]
pub struct SimNode {
    pub value: Rgb,
    pub corners: HashSet<Corner>,
}

/// The similarity graph `G_s`: nodes are pixel coordinates, edges connect
/// 8-neighbour pixels judged "similar" in YUV space, and each edge records
/// whether it is a diagonal (shares only a corner) or orthogonal (shares an
/// edge) connection.
#[derive(Debug, Clone, Default)]
pub struct SimilarityGraph {
    nodes: HashMap<PixelCoord, SimNode>,
    // adjacency[a][b] = is_diagonal(a, b); stored symmetrically.
    adjacency: HashMap<PixelCoord, HashMap<PixelCoord, bool>>,
}

impl SimilarityGraph {
    fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, p: PixelCoord) -> Option<&SimNode> {
        self.nodes.get(&p)
    }

    pub fn corners(&self, p: PixelCoord) -> &HashSet<Corner> {
        &self.nodes[&p].corners
    }

    pub fn corners_mut(&mut self, p: PixelCoord) -> &mut HashSet<Corner> {
        &mut self.nodes.get_mut(&p).unwrap().corners
    }

    pub fn value(&self, p: PixelCoord) -> Rgb {
        self.nodes[&p].value
    }

    pub fn contains_node(&self, p: PixelCoord) -> bool {
        self.nodes.contains_key(&p)
    }

    pub fn nodes_iter(&self) -> impl Iterator<Item = PixelCoord> + '_ {
        self.nodes.keys().copied()
    }

    pub fn neighbors(&self, p: PixelCoord) -> impl Iterator<Item = PixelCoord> + '_ {
        self.adjacency
            .get(&p)
            .into_iter()
            .flat_map(|m| m.keys().copied())
    }

    pub fn degree(&self, p: PixelCoord) -> usize {
        self.adjacency.get(&p).map_or(0, |m| m.len())
    }

    pub fn has_edge(&self, a: PixelCoord, b: PixelCoord) -> bool {
        self.adjacency.get(&a).is_some_and(|m| m.contains_key(&b))
    }

    pub fn is_diagonal(&self, a: PixelCoord, b: PixelCoord) -> bool {
        self.adjacency[&a][&b]
    }

    fn add_node(&mut self, p: PixelCoord, value: Rgb, corners: HashSet<Corner>) {
        self.nodes.insert(p, SimNode { value, corners });
        self.adjacency.entry(p).or_default();
    }

    fn add_edge(&mut self, a: PixelCoord, b: PixelCoord, diagonal: bool) {
        self.adjacency.entry(a).or_default().insert(b, diagonal);
        self.adjacency.entry(b).or_default().insert(a, diagonal);
    }

    pub fn remove_edge(&mut self, a: PixelCoord, b: PixelCoord) {
        if let Some(m) = self.adjacency.get_mut(&a) {
            m.remove(&b);
        }
        if let Some(m) = self.adjacency.get_mut(&b) {
            m.remove(&a);
        }
    }

    /// Edges among a set of nodes (used by the diagonal resolver to restrict
    /// to edges entirely inside a 2x2 block).
    pub fn edges_within(&self, block: &[PixelCoord]) -> Vec<(PixelCoord, PixelCoord, bool)> {
        let block_set: HashSet<PixelCoord> = block.iter().copied().collect();
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for &a in block {
            if let Some(neighbors) = self.adjacency.get(&a) {
                for (&b, &diagonal) in neighbors {
                    if !block_set.contains(&b) {
                        continue;
                    }
                    let key = if a < b { (a, b) } else { (b, a) };
                    if seen.insert(key) {
                        out.push((key.0, key.1, diagonal));
                    }
                }
            }
        }
        out
    }

    /// Connected components of `G_s`, in a deterministic order: components are
    /// discovered by scanning pixels in raster (row-major) order, so the
    /// result is independent of `HashMap`'s randomized iteration order and
    /// identical across repeated calls over the same graph content.
    pub fn connected_components(&self) -> Vec<Vec<PixelCoord>> {
        let mut starts: Vec<PixelCoord> = self.nodes.keys().copied().collect();
        starts.sort_unstable_by_key(|p| (p.1, p.0));

        let mut visited: HashSet<PixelCoord> = HashSet::new();
        let mut components = Vec::new();
        for start in starts {
            if visited.contains(&start) {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = VecDeque::new();
            queue.push_back(start);
            visited.insert(start);
            while let Some(node) = queue.pop_front() {
                component.push(node);
                for neighbor in self.neighbors(node) {
                    if visited.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }
            components.push(component);
        }
        components
    }
}

/// Build the similarity graph (spec section 4.1).
///
/// For every pixel, add a node carrying its four integer corners, then
/// attempt edges to its right, top-right, bottom-right and bottom neighbours
/// (in that order). This visits each of the 8-neighbour relationships exactly
/// once. An edge is inserted iff the target pixel is in-bounds and the two
/// pixels are similar; out-of-bounds reads used purely for the similarity
/// check are treated as black.
pub fn build_similarity_graph(image: &PixelBuffer, thresholds: SimilarityThresholds) -> SimilarityGraph {
    let width = image.width();
    let height = image.height();
    let mut graph = SimilarityGraph::new();

    for y in 0..height {
        for x in 0..width {
            let corners: HashSet<Corner> = [
                Corner::from_int(x as i64, y as i64),
                Corner::from_int(x as i64 + 1, y as i64),
                Corner::from_int(x as i64, y as i64 + 1),
                Corner::from_int(x as i64 + 1, y as i64 + 1),
            ]
            .into_iter()
            .collect();
            graph.add_node((x, y), image.get_in_bounds(x, y), corners);
        }
    }

    for y in 0..height {
        for x in 0..width {
            let n0 = (x, y);
            for (dx, dy) in [(1_i64, 0_i64), (1, -1), (1, 1), (0, 1)] {
                try_add_edge(&mut graph, image, thresholds, n0, dx, dy);
            }
        }
    }

    graph
}

fn try_add_edge(
    graph: &mut SimilarityGraph,
    image: &PixelBuffer,
    thresholds: SimilarityThresholds,
    n0: PixelCoord,
    dx: i64,
    dy: i64,
) {
    let nx = n0.0 as i64 + dx;
    let ny = n0.1 as i64 + dy;
    let width = image.width() as i64;
    let height = image.height() as i64;
    if nx < 0 || ny < 0 || nx >= width || ny >= height {
        return;
    }
    let n1 = (nx as u32, ny as u32);

    let p0 = image
        .get(n0.0 as i64, n0.1 as i64, OutOfBoundsStrategy::Zero)
        .expect("Zero strategy never errors");
    let p1 = image
        .get(nx, ny, OutOfBoundsStrategy::Zero)
        .expect("Zero strategy never errors");

    if pixels_similar(p0, p1, thresholds) {
        let diagonal = dx != 0 && dy != 0;
        graph.add_edge(n0, n1, diagonal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(rows: &[Vec<Rgb>]) -> PixelBuffer {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        PixelBuffer::new(width, height, rows).unwrap()
    }

    #[test]
    fn single_pixel_has_no_edges_and_four_corners() {
        let image = buf(&[vec![[255, 0, 0]]]);
        let graph = build_similarity_graph(&image, SimilarityThresholds::default());
        assert_eq!(graph.nodes_iter().count(), 1);
        assert_eq!(graph.degree((0, 0)), 0);
        assert_eq!(graph.corners((0, 0)).len(), 4);
    }

    #[test]
    fn similar_neighbours_are_connected_with_diagonal_flag() {
        let image = buf(&[
            vec![[10, 10, 10], [11, 10, 10]],
            vec![[10, 11, 10], [9, 9, 11]],
        ]);
        let graph = build_similarity_graph(&image, SimilarityThresholds::default());
        // All four pixels are mutually similar (tiny deltas), so the 2x2 block
        // should be fully connected: 4 sides + 2 diagonals.
        assert!(graph.has_edge((0, 0), (1, 0)));
        assert!(graph.has_edge((0, 0), (0, 1)));
        assert!(graph.has_edge((0, 0), (1, 1)));
        assert!(graph.is_diagonal((0, 0), (1, 1)));
        assert!(!graph.is_diagonal((0, 0), (1, 0)));
    }

    #[test]
    fn dissimilar_neighbours_are_not_connected() {
        let image = buf(&[vec![[0, 0, 0], [255, 255, 255]]]);
        let graph = build_similarity_graph(&image, SimilarityThresholds::default());
        assert!(!graph.has_edge((0, 0), (1, 0)));
    }

    #[test]
    fn connected_components_group_similar_runs() {
        let image = buf(&[vec![[10, 10, 10], [11, 11, 11], [255, 0, 0]]]);
        let graph = build_similarity_graph(&image, SimilarityThresholds::default());
        let mut components = graph.connected_components();
        components.sort_by_key(|c| c.len());
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].len(), 1);
        assert_eq!(components[1].len(), 2);
    }
}
