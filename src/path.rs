//! Maximal outline segments ("paths") and the cache that lets two shapes
//! sharing a boundary refer to - and later smooth - the very same segment.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::geom::{slope, Corner};
use crate::pixel_graph::PixelGraph;

/// A maximal simple walk along the outline graph: either a segment between
/// two branch nodes (degree != 2) or, for a branch-free component, the whole
/// simple cycle it forms. Closed paths repeat their start corner as the last
/// element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub corners: Vec<Corner>,
}

impl Path {
    pub fn is_closed(&self) -> bool {
        self.corners.len() > 2 && self.corners.first() == self.corners.last()
    }

    pub fn reversed(&self) -> Path {
        let mut corners = self.corners.clone();
        corners.reverse();
        Path { corners }
    }

    /// A canonical coordinate sequence used as the cache key: closed paths
    /// are rotated to start at their smallest corner and oriented so the
    /// second element is the lexicographically smaller of the two possible
    /// directions; open paths are oriented so the smaller endpoint comes
    /// first. Two differently-traced walks over the same physical segment
    /// always agree on this key.
    pub fn canonical_key(&self) -> Vec<Corner> {
        if self.is_closed() {
            let ring = &self.corners[..self.corners.len() - 1];
            let min_idx = (0..ring.len()).min_by_key(|&i| ring[i]).expect("ring is non-empty");
            let forward: Vec<Corner> = (0..ring.len()).map(|i| ring[(min_idx + i) % ring.len()]).collect();
            let mut backward = forward.clone();
            backward[1..].reverse();
            if backward < forward {
                backward
            } else {
                forward
            }
        } else if self.corners.last() < self.corners.first() {
            let mut reversed = self.corners.clone();
            reversed.reverse();
            reversed
        } else {
            self.corners.clone()
        }
    }
}

fn sorted_pair(a: Corner, b: Corner) -> (Corner, Corner) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// The unvisited neighbour of `from` reached by the smallest slope, excluding
/// a direct step back the way we came (unless that is the only option - a
/// degree-1 dead end).
fn smallest_slope_neighbor(
    graph: &PixelGraph,
    from: Corner,
    came_from: Option<Corner>,
    visited: &HashSet<(Corner, Corner)>,
) -> Option<Corner> {
    graph
        .neighbors(from)
        .filter(|&n| !visited.contains(&sorted_pair(from, n)))
        .filter(|&n| Some(n) != came_from || graph.degree(from) == 1)
        .min_by(|&a, &b| slope(from, a).partial_cmp(&slope(from, b)).expect("slope is never NaN"))
}

fn walk_from(
    graph: &PixelGraph,
    start: Corner,
    first: Corner,
    visited: &mut HashSet<(Corner, Corner)>,
) -> Vec<Corner> {
    visited.insert(sorted_pair(start, first));
    let mut corners = vec![start, first];
    let mut previous = start;
    let mut current = first;
    while current != start && graph.degree(current) == 2 {
        let Some(next) = smallest_slope_neighbor(graph, current, Some(previous), visited) else {
            break;
        };
        visited.insert(sorted_pair(current, next));
        previous = current;
        current = next;
        corners.push(current);
    }
    corners
}

/// Trace every maximal path of the outline graph (spec section 4.5): first
/// the segments hanging off every branch node (a corner shared by more than
/// two outline edges, which happens where three or more shapes meet at a
/// point), then the remaining branch-free components as whole simple cycles.
pub fn trace_paths(graph: &PixelGraph) -> Vec<Path> {
    let mut visited: HashSet<(Corner, Corner)> = HashSet::new();
    let mut paths = Vec::new();

    let mut branch_nodes: Vec<Corner> = graph.nodes_iter().filter(|&n| graph.degree(n) != 2).collect();
    branch_nodes.sort();

    for start in branch_nodes {
        while let Some(first) = smallest_slope_neighbor(graph, start, None, &visited) {
            let corners = walk_from(graph, start, first, &mut visited);
            paths.push(Path { corners });
        }
    }

    let mut traced_nodes: HashSet<Corner> = HashSet::new();
    for path in &paths {
        traced_nodes.extend(path.corners.iter().copied());
    }
    let mut remaining: Vec<Corner> = graph
        .nodes_iter()
        .filter(|n| !traced_nodes.contains(n))
        .collect();
    remaining.sort();

    let mut cycle_visited: HashSet<Corner> = HashSet::new();
    for start in remaining {
        if cycle_visited.contains(&start) {
            continue;
        }
        let Some(first) = smallest_slope_neighbor(graph, start, None, &visited) else {
            continue;
        };
        let corners = walk_from(graph, start, first, &mut visited);
        cycle_visited.extend(corners.iter().copied());
        paths.push(Path { corners });
    }

    paths
}

/// Interns traced paths so that two shapes whose boundaries cross the same
/// physical segment share one `Rc<RefCell<Path>>` - smoothing it once (spec
/// section 4.7) updates both shapes' boundaries at once.
#[derive(Debug, Default)]
pub struct PathCache {
    by_key: HashMap<Vec<Corner>, usize>,
    paths: Vec<Rc<RefCell<Path>>>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, path: Path) -> Rc<RefCell<Path>> {
        let key = path.canonical_key();
        if let Some(&idx) = self.by_key.get(&key) {
            return Rc::clone(&self.paths[idx]);
        }
        let idx = self.paths.len();
        let handle = Rc::new(RefCell::new(path));
        self.paths.push(Rc::clone(&handle));
        self.by_key.insert(key, idx);
        handle
    }

    pub fn paths(&self) -> &[Rc<RefCell<Path>>] {
        &self.paths
    }
}
