use tracing::debug;

use crate::graph::Graph;
use crate::node::NodeId;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    /// On the current DFS path.
    InProgress,
    Finalized,
}

/// One level of the explicit DFS stack. The frame is popped only after all
/// of its neighbors have been examined, which is what exposes back edges.
struct Frame {
    node: usize,
    neighbors: Vec<usize>,
    cursor: usize,
}

impl Frame {
    fn new(store: &Store, node: usize) -> Self {
        let neighbors: Vec<usize> = store
            .node_at(node)
            .map(|id| {
                store
                    .successors(id)
                    .filter_map(|(next, _)| store.index_of(next))
                    .collect()
            })
            .unwrap_or_default();
        Self { node, neighbors, cursor: 0 }
    }
}

/// Shared search state, so components already scanned are not revisited.
struct Search<'a> {
    store: &'a Store,
    colors: Vec<Color>,
    parents: Vec<Option<usize>>,
}

impl<'a> Search<'a> {
    fn new(store: &'a Store) -> Self {
        let n = store.node_count();
        Self { store, colors: vec![Color::Unvisited; n], parents: vec![None; n] }
    }

    /// Walk parent links from `from` up to its ancestor `to`, inclusive.
    fn climb(&self, from: usize, to: usize) -> Vec<usize> {
        let mut chain = vec![from];
        let mut current = from;
        while current != to {
            match self.parents[current] {
                Some(parent) => {
                    chain.push(parent);
                    current = parent;
                }
                None => break,
            }
        }
        chain
    }

    /// Directed search: a neighbor still on the DFS path closes a cycle.
    /// Returns `[v, ..., u, v]` in edge direction for the back edge u → v.
    fn directed(&mut self, start: usize) -> Option<Vec<usize>> {
        self.colors[start] = Color::InProgress;
        let mut stack = vec![Frame::new(self.store, start)];

        while let Some(frame) = stack.last_mut() {
            if frame.cursor == frame.neighbors.len() {
                self.colors[frame.node] = Color::Finalized;
                stack.pop();
                continue;
            }
            let (node, next) = (frame.node, frame.neighbors[frame.cursor]);
            frame.cursor += 1;

            match self.colors[next] {
                Color::Unvisited => {
                    self.colors[next] = Color::InProgress;
                    self.parents[next] = Some(node);
                    stack.push(Frame::new(self.store, next));
                }
                Color::InProgress => {
                    let mut cycle = self.climb(node, next);
                    cycle.reverse();
                    cycle.push(next);
                    return Some(cycle);
                }
                Color::Finalized => {}
            }
        }
        None
    }

    /// Undirected search: any visited neighbor other than the DFS parent
    /// closes a cycle. Returns `[u, parent(u), ..., v, u]` for the non-tree edge {u, v}.
    fn undirected(&mut self, start: usize) -> Option<Vec<usize>> {
        self.colors[start] = Color::InProgress;
        let mut stack = vec![Frame::new(self.store, start)];

        while let Some(frame) = stack.last_mut() {
            if frame.cursor == frame.neighbors.len() {
                self.colors[frame.node] = Color::Finalized;
                stack.pop();
                continue;
            }
            let (node, next) = (frame.node, frame.neighbors[frame.cursor]);
            frame.cursor += 1;

            match self.colors[next] {
                Color::Unvisited => {
                    self.colors[next] = Color::InProgress;
                    self.parents[next] = Some(node);
                    stack.push(Frame::new(self.store, next));
                }
                Color::InProgress if self.parents[node] != Some(next) => {
                    let mut cycle = self.climb(node, next);
                    cycle.push(node);
                    return Some(cycle);
                }
                // The tree edge back to the parent, or an edge into a
                // finished subtree whose cycle would already have been found.
                _ => {}
            }
        }
        None
    }
}

/// First cycle found scanning nodes in insertion order, as a closed node
/// sequence (`cycle[0] == cycle[last]`). Not memoized; see [`Graph::cycle`].
pub fn find_cycle(graph: &Graph) -> Option<Vec<NodeId>> {
    let store = &graph.store;
    let directed = graph.is_directed();
    let mut search = Search::new(store);

    for start in 0..store.node_count() {
        if search.colors[start] != Color::Unvisited {
            continue;
        }
        let found = if directed { search.directed(start) } else { search.undirected(start) };
        if let Some(cycle) = found {
            return Some(
                cycle
                    .into_iter()
                    .filter_map(|i| store.node_at(i).cloned())
                    .collect(),
            );
        }
    }
    None
}

impl Graph {
    /// First cycle in the graph, memoized until the topology changes.
    pub fn cycle(&self) -> Option<Vec<NodeId>> {
        self.cycle_cache.get_or_compute(self.topology_version, || {
            debug!(graph = self.debug_id, version = self.topology_version, "searching for cycle");
            find_cycle(self)
        })
    }

    pub fn has_cycle(&self) -> bool {
        self.cycle().is_some()
    }

    pub fn is_cyclic(&self) -> bool {
        self.has_cycle()
    }

    pub fn is_acyclic(&self) -> bool {
        !self.has_cycle()
    }

    /// Directed and acyclic.
    pub fn is_dag(&self) -> bool {
        self.is_directed() && self.is_acyclic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::GraphFlags;

    fn ids(names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|&n| NodeId::from(n)).collect()
    }

    fn graph(flags: GraphFlags, edges: &[(&str, &str)]) -> Graph {
        let mut g = Graph::new(flags);
        g.add_edges(edges.iter().copied()).unwrap();
        g
    }

    /// Every consecutive pair of a reported cycle must be an edge.
    fn assert_closed_walk(g: &Graph, cycle: &[NodeId]) {
        assert!(cycle.len() >= 2);
        assert_eq!(cycle.first(), cycle.last());
        for pair in cycle.windows(2) {
            assert!(g.has_edge(&pair[0], &pair[1]), "{} -> {} missing", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_undirected_triangle() {
        let g = graph(GraphFlags::NONE, &[("A", "B"), ("B", "C"), ("C", "A")]);
        let cycle = g.cycle().unwrap();
        assert_eq!(cycle, ids(&["C", "B", "A", "C"]));
        assert_closed_walk(&g, &cycle);
        assert!(g.has_cycle());
        assert!(!g.is_dag());
    }

    #[test]
    fn test_undirected_tree_is_acyclic() {
        let g = graph(GraphFlags::NONE, &[("A", "B"), ("A", "C"), ("C", "D"), ("E", "F")]);
        assert!(g.cycle().is_none());
        assert!(g.is_acyclic());
        // Undirected graphs are never DAGs.
        assert!(!g.is_dag());
    }

    #[test]
    fn test_undirected_square_closes_on_ancestor() {
        let g = graph(GraphFlags::NONE, &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")]);
        let cycle = g.cycle().unwrap();
        assert_eq!(cycle.len(), 5);
        assert_closed_walk(&g, &cycle);
    }

    #[test]
    fn test_directed_cycle() {
        let g = graph(GraphFlags::DIRECTED, &[("A", "B"), ("B", "C"), ("C", "A"), ("C", "D")]);
        let cycle = g.cycle().unwrap();
        assert_eq!(cycle, ids(&["A", "B", "C", "A"]));
        assert_closed_walk(&g, &cycle);
        assert!(g.is_cyclic());
    }

    #[test]
    fn test_directed_diamond_is_dag() {
        let g = graph(GraphFlags::DIRECTED, &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]);
        assert!(g.cycle().is_none());
        assert!(g.is_dag());
    }

    #[test]
    fn test_directed_two_cycle() {
        let g = graph(GraphFlags::DIRECTED, &[("A", "B"), ("B", "A")]);
        assert_eq!(g.cycle().unwrap(), ids(&["A", "B", "A"]));
    }

    #[test]
    fn test_cycle_in_later_component() {
        let g = graph(
            GraphFlags::DIRECTED,
            &[("A", "B"), ("X", "Y"), ("Y", "Z"), ("Z", "Y")],
        );
        let cycle = g.cycle().unwrap();
        assert_eq!(cycle, ids(&["Y", "Z", "Y"]));
    }

    #[test]
    fn test_self_loops() {
        let mut g = Graph::new(GraphFlags::DIRECTED | GraphFlags::ALLOW_SELF_LOOP);
        g.add_edge("A", "A").unwrap();
        assert_eq!(g.cycle().unwrap(), ids(&["A", "A"]));

        let mut u = Graph::new(GraphFlags::ALLOW_SELF_LOOP);
        u.add_edge("B", "B").unwrap();
        assert_eq!(u.cycle().unwrap(), ids(&["B", "B"]));
    }

    #[test]
    fn test_empty_graph_acyclic() {
        assert!(Graph::new(GraphFlags::DIRECTED).is_dag());
        assert!(Graph::default().is_acyclic());
    }

    #[test]
    fn test_cycle_cache_tracks_topology() {
        let mut g = graph(GraphFlags::DIRECTED, &[("A", "B"), ("B", "C")]);
        assert!(g.is_acyclic());
        g.add_edge("C", "A").unwrap();
        assert!(g.has_cycle());
        g.remove_edge("B", "C");
        assert!(g.is_acyclic());
    }

    #[test]
    fn test_cycle_cache_survives_reweight() {
        let mut g = Graph::new(GraphFlags::DIRECTED | GraphFlags::WEIGHTED);
        g.add_edges([("A", "B"), ("B", "A")]).unwrap();
        assert!(g.has_cycle());
        g.set_weight("A", "B", 4.0).unwrap();
        assert!(g.cycle_cache.is_fresh(g.topology_version));
    }

    #[test]
    fn test_deep_chain_no_stack_overflow() {
        let mut g = Graph::new(GraphFlags::DIRECTED);
        for i in 0..20_000 {
            g.add_edge(i, i + 1).unwrap();
        }
        assert!(g.is_dag());
        g.add_edge(20_000, 0).unwrap();
        assert_eq!(g.cycle().unwrap().len(), 20_002);
    }
}
