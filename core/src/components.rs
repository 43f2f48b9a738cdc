use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::debug;

use crate::graph::Graph;
use crate::node::NodeId;

/// Partition the nodes into weakly connected components.
///
/// Each BFS follows edges in both directions, so on directed graphs the
/// result does not depend on which node of a component is met first.
/// Components are ordered by their earliest-inserted node; members appear
/// in discovery order.
pub fn weak_components(graph: &Graph) -> Vec<Vec<NodeId>> {
    let store = &graph.store;
    let mut seen: HashSet<&NodeId> = HashSet::with_capacity(store.node_count());
    let mut components = Vec::new();

    for start in store.nodes() {
        if !seen.insert(start) {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            component.push(current.clone());
            let outgoing = store.successors(current).map(|(n, _)| n);
            for next in outgoing.chain(store.predecessors(current)) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        components.push(component);
    }

    components
}

impl Graph {
    /// Weakly connected components, memoized until the topology changes.
    ///
    /// Unlike [`Graph::edges`], the cached partition is shared rather than
    /// copied; the `Arc` keeps it immutable.
    pub fn components(&self) -> Arc<Vec<Vec<NodeId>>> {
        self.component_cache.get_or_compute(self.topology_version, || {
            let components = weak_components(self);
            debug!(
                graph = self.debug_id,
                version = self.topology_version,
                count = components.len(),
                "recomputed components"
            );
            Arc::new(components)
        })
    }

    pub fn component_count(&self) -> usize {
        self.components().len()
    }

    /// Exactly one component. The empty graph is not connected.
    pub fn is_connected(&self) -> bool {
        self.component_count() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::GraphFlags;

    fn ids(ns: &[i64]) -> Vec<NodeId> {
        ns.iter().map(|&n| NodeId::from(n)).collect()
    }

    #[test]
    fn test_undirected_components() {
        let mut g = Graph::default();
        g.add_edges([(1, 2), (3, 4), (2, 5)]).unwrap();
        g.add_node(6);
        let components = g.components();
        assert_eq!(*components, vec![ids(&[1, 2, 5]), ids(&[3, 4]), ids(&[6])]);
        assert_eq!(g.component_count(), 3);
        assert!(!g.is_connected());
    }

    #[test]
    fn test_directed_weak_connectivity_ignores_direction() {
        // 1 → 2 ← 3: node 3 cannot be reached from 1 but is weakly connected.
        let mut g = Graph::new(GraphFlags::DIRECTED);
        g.add_edges([(1, 2), (3, 2)]).unwrap();
        assert_eq!(*g.components(), vec![ids(&[1, 2, 3])]);
        assert!(g.is_connected());
    }

    #[test]
    fn test_insertion_order_does_not_split_components() {
        let mut g = Graph::new(GraphFlags::DIRECTED);
        g.add_nodes([2, 1]);
        g.add_edge(1, 2).unwrap();
        assert_eq!(g.component_count(), 1);
    }

    #[test]
    fn test_empty_graph() {
        let g = Graph::default();
        assert_eq!(g.component_count(), 0);
        assert!(!g.is_connected());
    }

    #[test]
    fn test_cache_shared_until_topology_changes() {
        let mut g = Graph::new(GraphFlags::WEIGHTED);
        g.add_weighted_edge(1, 2, 3.0).unwrap();
        let first = g.components();
        assert!(Arc::ptr_eq(&first, &g.components()));

        g.set_weight(1, 2, 8.0).unwrap();
        assert!(Arc::ptr_eq(&first, &g.components()));

        g.add_node(3);
        let second = g.components();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_cache_follows_removal_clear_reverse_and_copy() {
        let mut g = Graph::new(GraphFlags::DIRECTED);
        g.add_edges([(1, 2), (2, 3), (4, 5)]).unwrap();
        assert_eq!(g.component_count(), 2);

        assert!(g.remove_edge(2, 3));
        assert_eq!(*g.components(), weak_components(&g));
        assert_eq!(g.component_count(), 3);

        assert!(g.remove_node(5));
        assert_eq!(*g.components(), weak_components(&g));
        assert_eq!(g.component_count(), 3);

        g.reverse().unwrap();
        assert_eq!(*g.components(), weak_components(&g));
        assert_eq!(g.component_count(), 3);

        let mut other = Graph::new(GraphFlags::DIRECTED);
        other.add_edges([(7, 8), (8, 9)]).unwrap();
        g.copy_from(&other, false);
        assert_eq!(*g.components(), vec![ids(&[7, 8, 9])]);

        g.clear();
        assert!(g.components().is_empty());
        assert!(!g.is_connected());
    }

    #[test]
    fn test_partition_covers_every_node_once() {
        let mut g = Graph::new(GraphFlags::DIRECTED | GraphFlags::ALLOW_SELF_LOOP);
        g.add_edges([(1, 1), (2, 3), (4, 3), (5, 6), (6, 5)]).unwrap();
        g.add_node(7);
        let mut all: Vec<NodeId> = g.components().iter().flatten().cloned().collect();
        all.sort();
        assert_eq!(all, ids(&[1, 2, 3, 4, 5, 6, 7]));
    }
}
