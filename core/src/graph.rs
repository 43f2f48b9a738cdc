use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cache::VersionedCache;
use crate::error::{GraphError, Result};
use crate::flags::GraphFlags;
use crate::node::NodeId;
use crate::seed::EdgeSpec;
use crate::store::Store;

static NEXT_DEBUG_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a process-unique graph identity.
pub(crate) fn next_debug_id() -> u64 {
    NEXT_DEBUG_ID.fetch_add(1, Ordering::Relaxed)
}

/// An edge projected out of the adjacency store. Never stored as such.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
}

/// In-memory graph with a flag-driven mutation contract.
///
/// Every structural mutation goes through the guard methods on this type:
/// frozen graphs ignore them, self-loops and weights are checked against the
/// flags, and undirected edges are mirrored. Derived views (edge list,
/// components, first cycle) are memoized against version counters and
/// recomputed lazily after the relevant class of mutation.
///
/// A `Graph` is meant to be owned by a single caller. The caches use interior
/// mutability, so the type is `Send` but not `Sync`.
#[derive(Debug)]
pub struct Graph {
    pub(crate) flags: GraphFlags,
    pub(crate) store: Store,
    /// Bumped by node or edge insertion/removal.
    pub(crate) topology_version: u64,
    /// Bumped by every edge-level change, including reweighting.
    pub(crate) edge_version: u64,
    pub(crate) edge_cache: VersionedCache<Arc<[Edge]>>,
    pub(crate) component_cache: VersionedCache<Arc<Vec<Vec<NodeId>>>>,
    pub(crate) cycle_cache: VersionedCache<Option<Vec<NodeId>>>,
    pub(crate) debug_id: u64,
}

impl Graph {
    pub fn new(flags: GraphFlags) -> Self {
        Self {
            flags,
            store: Store::new(!flags.contains(GraphFlags::DIRECTED)),
            topology_version: 0,
            edge_version: 0,
            edge_cache: VersionedCache::new(),
            component_cache: VersionedCache::new(),
            cycle_cache: VersionedCache::new(),
            debug_id: next_debug_id(),
        }
    }

    pub fn flags(&self) -> GraphFlags {
        self.flags
    }

    pub fn is_directed(&self) -> bool {
        self.flags.contains(GraphFlags::DIRECTED)
    }

    pub fn is_weighted(&self) -> bool {
        self.flags.contains(GraphFlags::WEIGHTED)
    }

    pub fn allows_self_loops(&self) -> bool {
        self.flags.contains(GraphFlags::ALLOW_SELF_LOOP)
    }

    pub fn is_immutable(&self) -> bool {
        self.flags.contains(GraphFlags::IMMUTABLE)
    }

    /// Process-unique identity, reassigned when the storage is replaced.
    pub fn debug_id(&self) -> u64 {
        self.debug_id
    }

    pub(crate) fn touch_topology(&mut self) {
        self.topology_version += 1;
    }

    pub(crate) fn touch_edges(&mut self) {
        self.topology_version += 1;
        self.edge_version += 1;
    }

    fn frozen(&self, op: &str) -> bool {
        if self.is_immutable() {
            trace!(graph = self.debug_id, op, "ignored: graph is immutable");
            return true;
        }
        false
    }

    /// Validate a weight against the flags.
    fn check_weight(&self, from: &NodeId, to: &NodeId, weight: f64) -> Result<()> {
        if !weight.is_finite() {
            return Err(GraphError::InvalidWeight { from: from.clone(), to: to.clone(), weight });
        }
        if !self.is_weighted() && weight != 1.0 {
            return Err(GraphError::WeightOnUnweighted {
                from: from.clone(),
                to: to.clone(),
                weight,
            });
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------------

    /// Insert a node if absent. Returns true if the store changed.
    pub fn add_node(&mut self, id: impl Into<NodeId>) -> bool {
        if self.frozen("add_node") {
            return false;
        }
        let inserted = self.store.insert_node(id.into());
        if inserted {
            self.touch_topology();
        }
        inserted
    }

    pub fn add_nodes<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        ids.into_iter().map(|id| self.add_node(id) as usize).sum()
    }

    /// Add an edge with the default weight of 1.
    pub fn add_edge(&mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> Result<bool> {
        self.add_weighted_edge(from, to, 1.0)
    }

    /// Add an edge, creating missing endpoints.
    ///
    /// Returns `Ok(false)` without touching the store if the graph is frozen
    /// or the edge already exists. Disallowed self-loops, non-default weights
    /// on an unweighted graph, and NaN or infinite weights are errors.
    pub fn add_weighted_edge(
        &mut self,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        weight: f64,
    ) -> Result<bool> {
        if self.frozen("add_edge") {
            return Ok(false);
        }
        let (from, to) = (from.into(), to.into());
        if self.store.has_edge(&from, &to) {
            trace!(graph = self.debug_id, %from, %to, "edge already present");
            return Ok(false);
        }
        if from == to && !self.allows_self_loops() {
            return Err(GraphError::SelfLoopNotAllowed(from));
        }
        self.check_weight(&from, &to, weight)?;

        self.store.insert_node(from.clone());
        self.store.insert_node(to.clone());
        self.store.link(&from, &to, weight);
        self.touch_edges();
        Ok(true)
    }

    /// Add an edge given in any of the accepted shapes.
    pub fn add_edge_spec(&mut self, spec: impl Into<EdgeSpec>) -> Result<bool> {
        let (from, to, weight) = spec.into().resolve();
        self.add_weighted_edge(from, to, weight)
    }

    /// Fold [`Graph::add_edge_spec`] over `specs`. Stops at the first error;
    /// edges added before it remain. Returns the number of edges added.
    pub fn add_edges<I>(&mut self, specs: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<EdgeSpec>,
    {
        let mut added = 0;
        for spec in specs {
            if self.add_edge_spec(spec)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: impl Into<NodeId>) -> bool {
        if self.frozen("remove_node") {
            return false;
        }
        match self.store.remove_node(&id.into()) {
            Some(_) => {
                self.touch_edges();
                true
            }
            None => false,
        }
    }

    pub fn remove_nodes<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        ids.into_iter().map(|id| self.remove_node(id) as usize).sum()
    }

    /// Remove an edge (both directions on an undirected graph).
    pub fn remove_edge(&mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> bool {
        if self.frozen("remove_edge") {
            return false;
        }
        match self.store.unlink(&from.into(), &to.into()) {
            Some(_) => {
                self.touch_edges();
                true
            }
            None => false,
        }
    }

    /// Remove edges given in any accepted shape. Weights are ignored.
    pub fn remove_edges<I>(&mut self, specs: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<EdgeSpec>,
    {
        specs
            .into_iter()
            .map(|spec| {
                let (from, to, _) = spec.into().resolve();
                self.remove_edge(from, to) as usize
            })
            .sum()
    }

    /// Change the weight of an existing edge. Invalidates the edge list but
    /// not the topology-derived views.
    pub fn set_weight(
        &mut self,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        weight: f64,
    ) -> Result<bool> {
        if self.frozen("set_weight") {
            return Ok(false);
        }
        let (from, to) = (from.into(), to.into());
        if !self.store.has_edge(&from, &to) {
            return Err(GraphError::EdgeNotFound { from, to });
        }
        self.check_weight(&from, &to, weight)?;
        self.store.reweight(&from, &to, weight);
        self.edge_version += 1;
        Ok(true)
    }

    /// Remove every node and edge.
    pub fn clear(&mut self) -> bool {
        if self.frozen("clear") {
            return false;
        }
        self.store.clear();
        self.touch_edges();
        true
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.store.nodes()
    }

    pub fn has_node(&self, id: impl Into<NodeId>) -> bool {
        self.store.contains_node(&id.into())
    }

    pub fn has_edge(&self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> bool {
        self.store.has_edge(&from.into(), &to.into())
    }

    pub fn weight(&self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> Result<f64> {
        let (from, to) = (from.into(), to.into());
        self.store.weight(&from, &to).ok_or(GraphError::EdgeNotFound { from, to })
    }

    /// Out-neighbors (all neighbors on an undirected graph) in insertion order.
    pub fn neighbors(&self, id: impl Into<NodeId>) -> Result<Vec<NodeId>> {
        let id = self.require(id.into())?;
        Ok(self.store.successors(&id).map(|(n, _)| n.clone()).collect())
    }

    /// In-neighbors in insertion order.
    pub fn predecessors(&self, id: impl Into<NodeId>) -> Result<Vec<NodeId>> {
        let id = self.require(id.into())?;
        Ok(self.store.predecessors(&id).cloned().collect())
    }

    pub fn out_degree(&self, id: impl Into<NodeId>) -> Result<usize> {
        let id = self.require(id.into())?;
        Ok(self.store.out_degree(&id))
    }

    pub fn in_degree(&self, id: impl Into<NodeId>) -> Result<usize> {
        let id = self.require(id.into())?;
        Ok(self.store.in_degree(&id))
    }

    /// Number of incident edges: out + in when directed, neighbors otherwise.
    pub fn degree(&self, id: impl Into<NodeId>) -> Result<usize> {
        let id = self.require(id.into())?;
        if self.is_directed() {
            Ok(self.store.out_degree(&id) + self.store.in_degree(&id))
        } else {
            Ok(self.store.out_degree(&id))
        }
    }

    /// Flattened edge list. Each undirected edge appears once.
    ///
    /// The list is memoized; callers get their own copy.
    pub fn edges(&self) -> Vec<Edge> {
        self.edge_cache
            .get_or_compute(self.edge_version, || {
                debug!(graph = self.debug_id, version = self.edge_version, "rebuilding edge list");
                self.store.edges().into()
            })
            .to_vec()
    }

    /// Resolve `id` to a known node or fail with `NodeNotFound`.
    pub(crate) fn require(&self, id: NodeId) -> Result<NodeId> {
        if self.store.contains_node(&id) {
            Ok(id)
        } else {
            Err(GraphError::NodeNotFound(id))
        }
    }

    pub(crate) fn require_ref<'a>(&self, id: &'a NodeId) -> Result<&'a NodeId> {
        if self.store.contains_node(id) {
            Ok(id)
        } else {
            Err(GraphError::NodeNotFound(id.clone()))
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(GraphFlags::NONE)
    }
}
