use tracing::debug;

use crate::error::{GraphError, Result};
use crate::flags::GraphFlags;
use crate::graph::{next_debug_id, Graph};
use crate::store::Store;

impl Graph {
    /// Permanently stop structural mutation. There is no unfreeze; use
    /// [`Graph::duplicate`] with `unfreeze = true` for a mutable copy.
    pub fn freeze(&mut self) {
        if !self.is_immutable() {
            debug!(graph = self.debug_id, "frozen");
        }
        self.flags |= GraphFlags::IMMUTABLE;
    }

    /// Independent copy with its own identity, optionally without `IMMUTABLE`.
    ///
    /// The store is cloned as is, so node order and every neighbor list match
    /// the source and traversals visit nodes in the same order. With
    /// `unfreeze = false` a frozen source gives a frozen copy.
    pub fn duplicate(&self, unfreeze: bool) -> Graph {
        let mut copy = Graph::new(self.flags.mutable());
        copy.store = self.store.clone();
        copy.touch_edges();
        if !unfreeze && self.is_immutable() {
            copy.flags |= GraphFlags::IMMUTABLE;
        }
        copy
    }

    /// Overwrite this graph with a deep copy of `source`.
    ///
    /// Flags follow the source (with `IMMUTABLE` dropped when `unfreeze`).
    /// The receiver gets a new identity and all its derived views are
    /// invalidated. Ignored if the receiver is frozen.
    pub fn copy_from(&mut self, source: &Graph, unfreeze: bool) {
        if self.is_immutable() {
            debug!(graph = self.debug_id, "copy ignored: graph is immutable");
            return;
        }
        self.flags = if unfreeze { source.flags.mutable() } else { source.flags };
        self.store = source.store.clone();
        self.debug_id = next_debug_id();
        self.touch_edges();
        self.edge_cache.clear();
        self.component_cache.clear();
        self.cycle_cache.clear();
        debug!(graph = self.debug_id, source = source.debug_id, "copied");
    }

    /// Reverse every edge in place. Directed graphs only; ignored if frozen.
    pub fn reverse(&mut self) -> Result<()> {
        if !self.is_directed() {
            return Err(GraphError::RequiresDirected("reverse"));
        }
        if self.is_immutable() {
            debug!(graph = self.debug_id, "reverse ignored: graph is immutable");
            return Ok(());
        }
        let edges = self.edges();
        let mut store = Store::new(false);
        for id in self.store.nodes() {
            store.insert_node(id.clone());
        }
        for edge in &edges {
            store.link(&edge.to, &edge.from, edge.weight);
        }
        self.store = store;
        self.touch_edges();
        debug!(graph = self.debug_id, edges = edges.len(), "reversed");
        Ok(())
    }

    /// Reversed copy. The copy is frozen if this graph is.
    pub fn reversed(&self) -> Result<Graph> {
        if !self.is_directed() {
            return Err(GraphError::RequiresDirected("reversed"));
        }
        let mut copy = self.duplicate(true);
        copy.reverse()?;
        if self.is_immutable() {
            copy.freeze();
        }
        Ok(copy)
    }
}

impl Clone for Graph {
    /// Same as `duplicate(false)`: the clone keeps every flag, `IMMUTABLE`
    /// included, but gets its own identity. Cloning a frozen graph gives a
    /// frozen graph; use `duplicate(true)` for a mutable copy.
    fn clone(&self) -> Self {
        self.duplicate(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;
    use crate::traversal::{bfs, dfs};

    fn frozen_chain() -> Graph {
        Graph::build(
            GraphFlags::DIRECTED | GraphFlags::WEIGHTED | GraphFlags::IMMUTABLE,
            |g| {
                g.add_weighted_edge("A", "B", 2.0)?;
                g.add_weighted_edge("B", "C", 3.0)?;
                Ok(())
            },
        )
        .unwrap()
    }

    #[test]
    fn test_freeze_blocks_all_mutation() {
        let mut g = Graph::new(GraphFlags::WEIGHTED);
        g.add_weighted_edge("A", "B", 2.0).unwrap();
        g.freeze();
        g.freeze();

        assert!(!g.add_node("C"));
        assert!(!g.add_edge("C", "D").unwrap());
        assert!(!g.remove_edge("A", "B"));
        assert!(!g.remove_node("A"));
        assert!(!g.set_weight("A", "B", 9.0).unwrap());
        assert!(!g.clear());
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.weight("A", "B").unwrap(), 2.0);
    }

    #[test]
    fn test_frozen_graph_still_reports_policy_errors_as_noops() {
        let mut g = Graph::default();
        g.freeze();
        // Frozen check runs first, so even an invalid self-loop is a no-op.
        assert!(!g.add_edge("A", "A").unwrap());
    }

    #[test]
    fn test_duplicate_is_independent() {
        let mut g1 = Graph::new(GraphFlags::DIRECTED);
        g1.add_edge("A", "B").unwrap();
        g1.add_node("lonely");
        let mut g2 = g1.duplicate(true);
        g2.add_edge("X", "Y").unwrap();

        assert_eq!(g1.edge_count(), 1);
        assert_eq!(g2.edge_count(), 2);
        assert!(g2.has_node("lonely"));
        assert_ne!(g1.debug_id(), g2.debug_id());
    }

    #[test]
    fn test_duplicate_unfreeze() {
        let g = frozen_chain();
        let mut thawed = g.duplicate(true);
        assert!(!thawed.is_immutable());
        assert!(thawed.add_edge("C", "D").unwrap());

        let still_frozen = g.duplicate(false);
        assert!(still_frozen.is_immutable());
        assert_eq!(still_frozen.edge_count(), 2);
        assert_eq!(still_frozen.weight("B", "C").unwrap(), 3.0);
    }

    #[test]
    fn test_clone_keeps_flags() {
        let g = frozen_chain();
        let c = g.clone();
        assert_eq!(c.flags(), g.flags());
        assert_ne!(c.debug_id(), g.debug_id());
        assert_eq!(c.edges(), g.edges());
    }

    #[test]
    fn test_duplicate_preserves_node_order() {
        let mut g = Graph::default();
        g.add_nodes(["C", "A"]);
        g.add_edge("B", "A").unwrap();
        let copy = g.duplicate(true);
        let order: Vec<&NodeId> = copy.nodes().collect();
        assert_eq!(order, g.nodes().collect::<Vec<_>>());
    }

    #[test]
    fn test_duplicate_keeps_neighbor_order_undirected() {
        let mut g = Graph::default();
        g.add_nodes(["A", "B", "C"]);
        g.add_edge("B", "C").unwrap();
        g.add_edge("A", "B").unwrap();
        let copy = g.duplicate(true);

        assert_eq!(copy.neighbors("B").unwrap(), g.neighbors("B").unwrap());
        let source: NodeId = "B".into();
        assert_eq!(
            bfs(&copy, &source, None).unwrap().visit_order,
            bfs(&g, &source, None).unwrap().visit_order
        );
        assert_eq!(
            dfs(&copy, &source, None).unwrap().visit_order,
            dfs(&g, &source, None).unwrap().visit_order
        );
        assert_eq!(copy.edges(), g.edges());
    }

    #[test]
    fn test_clone_of_frozen_graph_stays_frozen() {
        let g = frozen_chain();
        let mut c = g.clone();
        assert!(c.is_immutable());
        assert!(!c.add_node("D"));
        assert!(g.duplicate(true).add_node("D"));
    }

    #[test]
    fn test_copy_from_replaces_contents_and_identity() {
        let source = frozen_chain();
        let mut target = Graph::default();
        target.add_edge("old", "stuff").unwrap();
        let _ = target.edges();
        let before = target.debug_id();

        target.copy_from(&source, true);
        assert_ne!(target.debug_id(), before);
        assert_ne!(target.debug_id(), source.debug_id());
        assert!(target.is_directed());
        assert!(!target.is_immutable());
        assert!(!target.has_node("old"));
        assert_eq!(target.edges().len(), 2);

        target.add_edge("C", "D").unwrap();
        assert_eq!(source.edge_count(), 2);
    }

    #[test]
    fn test_copy_from_keeps_immutable_when_asked() {
        let source = frozen_chain();
        let mut target = Graph::default();
        target.copy_from(&source, false);
        assert!(target.is_immutable());
    }

    #[test]
    fn test_copy_into_frozen_is_noop() {
        let source = frozen_chain();
        let mut target = Graph::default();
        target.add_node("keep");
        target.freeze();
        let id = target.debug_id();
        target.copy_from(&source, true);
        assert!(target.has_node("keep"));
        assert_eq!(target.debug_id(), id);
    }

    #[test]
    fn test_reverse() {
        let mut g = Graph::new(GraphFlags::DIRECTED | GraphFlags::WEIGHTED);
        g.add_weighted_edge("A", "B", 2.0).unwrap();
        g.add_node("Z");
        g.reverse().unwrap();
        assert!(g.has_edge("B", "A"));
        assert!(!g.has_edge("A", "B"));
        assert_eq!(g.weight("B", "A").unwrap(), 2.0);
        assert!(g.has_node("Z"));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_reverse_requires_directed() {
        let mut g = Graph::default();
        assert_eq!(g.reverse().unwrap_err(), GraphError::RequiresDirected("reverse"));
        assert!(g.reversed().is_err());
    }

    #[test]
    fn test_reverse_frozen_is_noop() {
        let mut g = frozen_chain();
        g.reverse().unwrap();
        assert!(g.has_edge("A", "B"));
    }

    #[test]
    fn test_reversed_propagates_freeze() {
        let g = frozen_chain();
        let r = g.reversed().unwrap();
        assert!(r.is_immutable());
        assert!(r.has_edge("C", "B"));
        assert!(g.has_edge("B", "C"));

        let mut open = Graph::new(GraphFlags::DIRECTED);
        open.add_edge(1, 2).unwrap();
        let r = open.reversed().unwrap();
        assert!(!r.is_immutable());
        assert!(r.has_edge(2, 1));
    }
}
