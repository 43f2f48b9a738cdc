use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::node::NodeId;
use crate::traversal::{bfs, reconstruct_path};

/// Single-source distances and predecessor links.
#[derive(Debug, Clone, Default)]
pub struct DijkstraResult {
    /// Tentative or final distance for every node reached. Unreached nodes
    /// are absent.
    pub distances: HashMap<NodeId, f64>,
    pub predecessors: HashMap<NodeId, NodeId>,
}

impl DijkstraResult {
    pub fn path_to(&self, source: &NodeId, target: &NodeId) -> Option<Vec<NodeId>> {
        if !self.distances.contains_key(target) {
            return None;
        }
        reconstruct_path(&self.predecessors, source, target)
    }
}

/// Normalized answer to a point-to-point query.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathData {
    /// Nodes from source to target inclusive. None if unreachable.
    pub path: Option<Vec<NodeId>>,
    /// Total weight (hop count on unweighted graphs). Infinite if unreachable.
    pub distance: f64,
}

impl ShortestPathData {
    fn unreachable() -> Self {
        Self { path: None, distance: f64::INFINITY }
    }

    pub fn is_reachable(&self) -> bool {
        self.path.is_some()
    }
}

/// Dijkstra's single-source shortest paths over a binary heap.
///
/// Stops as soon as `target` is popped. Any negative edge weight met on the
/// way aborts the whole computation with [`GraphError::NegativeWeight`];
/// there is no partial result.
///
/// Heap keys are `f64::to_bits` of non-negative distances, which order the
/// same way as the floats. Stale entries are skipped on pop.
pub fn dijkstra(graph: &Graph, source: &NodeId, target: Option<&NodeId>) -> Result<DijkstraResult> {
    let source_index = graph
        .store
        .index_of(source)
        .ok_or_else(|| GraphError::NodeNotFound(source.clone()))?;
    if let Some(t) = target {
        graph.require_ref(t)?;
    }

    let mut result = DijkstraResult::default();
    let mut finalized: HashSet<NodeId> = HashSet::new();
    // (distance bits, push sequence, node index); the sequence breaks ties FIFO.
    let mut heap: BinaryHeap<Reverse<(u64, u64, usize)>> = BinaryHeap::new();
    let mut pushes: u64 = 0;

    result.distances.insert(source.clone(), 0.0);
    heap.push(Reverse((0.0_f64.to_bits(), pushes, source_index)));

    while let Some(Reverse((dist_bits, _, index))) = heap.pop() {
        let Some(current) = graph.store.node_at(index) else {
            continue;
        };
        if !finalized.insert(current.clone()) {
            continue;
        }
        if target == Some(current) {
            break;
        }
        let dist = f64::from_bits(dist_bits);

        for (next, weight) in graph.store.successors(current) {
            if finalized.contains(next) {
                continue;
            }
            if weight < 0.0 {
                debug!(%current, %next, weight, "dijkstra aborted on negative weight");
                return Err(GraphError::NegativeWeight {
                    from: current.clone(),
                    to: next.clone(),
                    weight,
                });
            }
            let candidate = dist + weight;
            let improves = result.distances.get(next).map_or(true, |&known| candidate < known);
            if improves {
                let Some(next_index) = graph.store.index_of(next) else {
                    continue;
                };
                result.distances.insert(next.clone(), candidate);
                result.predecessors.insert(next.clone(), current.clone());
                pushes += 1;
                heap.push(Reverse((candidate.to_bits(), pushes, next_index)));
            }
        }
    }

    Ok(result)
}

/// Shortest path from `source` to `target`, dispatching on the weighted flag:
/// Dijkstra for weighted graphs, BFS hop count otherwise.
pub fn shortest_path_data(graph: &Graph, source: &NodeId, target: &NodeId) -> Result<ShortestPathData> {
    if graph.is_weighted() {
        let result = dijkstra(graph, source, Some(target))?;
        let Some(path) = result.path_to(source, target) else {
            return Ok(ShortestPathData::unreachable());
        };
        Ok(ShortestPathData { distance: result.distances[target], path: Some(path) })
    } else {
        let result = bfs(graph, source, Some(target))?;
        let Some(path) = result.path_to(source, target) else {
            return Ok(ShortestPathData::unreachable());
        };
        Ok(ShortestPathData { distance: (path.len() - 1) as f64, path: Some(path) })
    }
}

/// Node sequence of a shortest path, or None if `target` is unreachable.
pub fn shortest_path(graph: &Graph, source: &NodeId, target: &NodeId) -> Result<Option<Vec<NodeId>>> {
    Ok(shortest_path_data(graph, source, target)?.path)
}

/// Length of a shortest path; infinite if `target` is unreachable.
pub fn shortest_distance(graph: &Graph, source: &NodeId, target: &NodeId) -> Result<f64> {
    Ok(shortest_path_data(graph, source, target)?.distance)
}
