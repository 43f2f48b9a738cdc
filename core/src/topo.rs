use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::node::NodeId;

/// Kahn's algorithm. Directed graphs only.
///
/// Zero in-degree nodes are released in insertion order, so the result is
/// deterministic among the valid orderings. Returns `Ok(None)` when the
/// graph has a cycle: no order exists, but the call itself was valid.
pub fn topological_sort(graph: &Graph) -> Result<Option<Vec<NodeId>>> {
    if !graph.is_directed() {
        return Err(GraphError::RequiresDirected("topological_sort"));
    }

    let store = &graph.store;
    let mut in_degree: HashMap<&NodeId, usize> =
        store.nodes().map(|id| (id, store.in_degree(id))).collect();
    let mut queue: VecDeque<&NodeId> =
        store.nodes().filter(|id| in_degree[id] == 0).collect();
    let mut order = Vec::with_capacity(store.node_count());

    while let Some(current) = queue.pop_front() {
        order.push(current.clone());
        for (next, _) in store.successors(current) {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(next);
                }
            }
        }
    }

    if order.len() < store.node_count() {
        debug!(
            graph = graph.debug_id,
            sorted = order.len(),
            nodes = store.node_count(),
            "no topological order: graph is cyclic"
        );
        return Ok(None);
    }
    Ok(Some(order))
}

impl Graph {
    /// See [`topological_sort`].
    pub fn topological_sort(&self) -> Result<Option<Vec<NodeId>>> {
        topological_sort(self)
    }
}
