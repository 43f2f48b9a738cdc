use indexmap::{IndexMap, IndexSet};

use crate::graph::Edge;
use crate::node::NodeId;

/// Adjacency storage: forward weights plus a reverse index of in-neighbors.
///
/// `outgoing[a][b] = w` holds the edge a→b. `incoming[b]` contains a.
/// In symmetric (undirected) mode every edge is stored in both directions and
/// counted once. Both maps keep insertion order, and removals use
/// `shift_remove` so iteration order stays stable for traversal.
///
/// The store applies no policy. Callers must check flags before linking.
#[derive(Debug, Clone)]
pub(crate) struct Store {
    outgoing: IndexMap<NodeId, IndexMap<NodeId, f64>>,
    incoming: IndexMap<NodeId, IndexSet<NodeId>>,
    symmetric: bool,
    node_count: usize,
    edge_count: usize,
}

impl Store {
    pub fn new(symmetric: bool) -> Self {
        Self {
            outgoing: IndexMap::new(),
            incoming: IndexMap::new(),
            symmetric,
            node_count: 0,
            edge_count: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Insert a node with no neighbors. Returns false if it already exists.
    pub fn insert_node(&mut self, id: NodeId) -> bool {
        if self.outgoing.contains_key(&id) {
            return false;
        }
        self.incoming.insert(id.clone(), IndexSet::new());
        self.outgoing.insert(id, IndexMap::new());
        self.node_count += 1;
        true
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.outgoing.contains_key(id)
    }

    /// Position of a node in insertion order.
    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.outgoing.get_index_of(id)
    }

    pub fn node_at(&self, index: usize) -> Option<&NodeId> {
        self.outgoing.get_index(index).map(|(id, _)| id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.outgoing.keys()
    }

    /// Out-neighbors with weights, in insertion order. Empty for unknown nodes.
    pub fn successors<'a>(&'a self, id: &NodeId) -> impl DoubleEndedIterator<Item = (&'a NodeId, f64)> {
        self.outgoing
            .get(id)
            .into_iter()
            .flat_map(|targets| targets.iter().map(|(to, &w)| (to, w)))
    }

    /// In-neighbors, in insertion order. Empty for unknown nodes.
    pub fn predecessors<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = &'a NodeId> {
        self.incoming.get(id).into_iter().flat_map(|sources| sources.iter())
    }

    pub fn out_degree(&self, id: &NodeId) -> usize {
        self.outgoing.get(id).map_or(0, |targets| targets.len())
    }

    pub fn in_degree(&self, id: &NodeId) -> usize {
        self.incoming.get(id).map_or(0, |sources| sources.len())
    }

    pub fn weight(&self, from: &NodeId, to: &NodeId) -> Option<f64> {
        self.outgoing.get(from).and_then(|targets| targets.get(to)).copied()
    }

    pub fn has_edge(&self, from: &NodeId, to: &NodeId) -> bool {
        self.weight(from, to).is_some()
    }

    /// Write the edge from→to (and its mirror when symmetric). Both endpoints
    /// must already exist. Returns false if the edge was already present.
    pub fn link(&mut self, from: &NodeId, to: &NodeId, weight: f64) -> bool {
        if self.has_edge(from, to) {
            return false;
        }
        self.write_arc(from, to, weight);
        if self.symmetric && from != to {
            self.write_arc(to, from, weight);
        }
        self.edge_count += 1;
        true
    }

    /// Remove the edge from→to (and its mirror). Returns the removed weight.
    pub fn unlink(&mut self, from: &NodeId, to: &NodeId) -> Option<f64> {
        let weight = self.erase_arc(from, to)?;
        if self.symmetric && from != to {
            self.erase_arc(to, from);
        }
        self.edge_count -= 1;
        Some(weight)
    }

    /// Overwrite the weight of an existing edge (and its mirror).
    pub fn reweight(&mut self, from: &NodeId, to: &NodeId, weight: f64) -> bool {
        let Some(slot) = self.outgoing.get_mut(from).and_then(|t| t.get_mut(to)) else {
            return false;
        };
        *slot = weight;
        if self.symmetric {
            if let Some(mirror) = self.outgoing.get_mut(to).and_then(|t| t.get_mut(from)) {
                *mirror = weight;
            }
        }
        true
    }

    /// Remove a node and every edge touching it, in either direction.
    /// Returns the number of edges removed, or None if the node is unknown.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<usize> {
        let targets = self.outgoing.shift_remove(id)?;
        let sources = self.incoming.shift_remove(id).unwrap_or_default();
        let mut removed = targets.len();

        for to in targets.keys().filter(|&to| to != id) {
            if let Some(s) = self.incoming.get_mut(to) {
                s.shift_remove(id);
            }
        }

        for from in sources.iter().filter(|&from| from != id) {
            if let Some(t) = self.outgoing.get_mut(from) {
                t.shift_remove(id);
            }
            // In symmetric mode each incoming entry mirrors an outgoing one
            // already counted above.
            if !self.symmetric {
                removed += 1;
            }
        }

        self.node_count -= 1;
        self.edge_count -= removed;
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.outgoing.clear();
        self.incoming.clear();
        self.node_count = 0;
        self.edge_count = 0;
    }

    /// Flattened edge list. Undirected edges appear once, oriented from the
    /// endpoint inserted first.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.edge_count);
        for (i, (from, targets)) in self.outgoing.iter().enumerate() {
            for (to, &weight) in targets {
                if self.symmetric && self.index_of(to).is_some_and(|j| j < i) {
                    continue;
                }
                edges.push(Edge { from: from.clone(), to: to.clone(), weight });
            }
        }
        edges
    }

    fn write_arc(&mut self, from: &NodeId, to: &NodeId, weight: f64) {
        if let Some(targets) = self.outgoing.get_mut(from) {
            targets.insert(to.clone(), weight);
        }
        if let Some(sources) = self.incoming.get_mut(to) {
            sources.insert(from.clone());
        }
    }

    fn erase_arc(&mut self, from: &NodeId, to: &NodeId) -> Option<f64> {
        let weight = self.outgoing.get_mut(from)?.shift_remove(to)?;
        if let Some(sources) = self.incoming.get_mut(to) {
            sources.shift_remove(from);
        }
        Some(weight)
    }
}
