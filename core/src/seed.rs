//! Construction inputs: the accepted edge shapes and the seeds a graph can
//! be built from.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::flags::GraphFlags;
use crate::graph::{Edge, Graph};
use crate::node::NodeId;

/// One edge in any of the three accepted shapes: `[from, to]`,
/// `[from, to, weight]`, or `{from, to, weight?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeSpec {
    Triple(NodeId, NodeId, f64),
    Pair(NodeId, NodeId),
    Record {
        from: NodeId,
        to: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight: Option<f64>,
    },
}

impl EdgeSpec {
    /// Flatten to `(from, to, weight)`, defaulting the weight to 1.
    pub fn resolve(self) -> (NodeId, NodeId, f64) {
        match self {
            EdgeSpec::Pair(from, to) => (from, to, 1.0),
            EdgeSpec::Triple(from, to, weight) => (from, to, weight),
            EdgeSpec::Record { from, to, weight } => (from, to, weight.unwrap_or(1.0)),
        }
    }
}

impl<A: Into<NodeId>, B: Into<NodeId>> From<(A, B)> for EdgeSpec {
    fn from((from, to): (A, B)) -> Self {
        EdgeSpec::Pair(from.into(), to.into())
    }
}

impl<A: Into<NodeId>, B: Into<NodeId>> From<(A, B, f64)> for EdgeSpec {
    fn from((from, to, weight): (A, B, f64)) -> Self {
        EdgeSpec::Triple(from.into(), to.into(), weight)
    }
}

impl From<Edge> for EdgeSpec {
    fn from(edge: Edge) -> Self {
        EdgeSpec::Triple(edge.from, edge.to, edge.weight)
    }
}

impl From<&Edge> for EdgeSpec {
    fn from(edge: &Edge) -> Self {
        EdgeSpec::Triple(edge.from.clone(), edge.to.clone(), edge.weight)
    }
}

/// The `{nodes?, edges?}` builder shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDescription {
    #[serde(default)]
    pub nodes: Vec<NodeId>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

/// An element of a mixed node/edge sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedItem {
    Node(NodeId),
    Edge(EdgeSpec),
}

impl From<EdgeSpec> for SeedItem {
    fn from(spec: EdgeSpec) -> Self {
        SeedItem::Edge(spec)
    }
}

impl From<NodeId> for SeedItem {
    fn from(id: NodeId) -> Self {
        SeedItem::Node(id)
    }
}

/// Initial content applied while a graph is still buildable.
pub enum Seed<'a> {
    /// Deep copy of another graph, including its topology flags.
    Snapshot(&'a Graph),
    Description(GraphDescription),
    Items(Vec<SeedItem>),
    Node(NodeId),
    Callback(Box<dyn FnOnce(&mut Graph) -> Result<()> + 'a>),
}

impl Graph {
    /// Two-phase construction: the graph is built with `IMMUTABLE` masked
    /// off, the seed is applied, and only then is `IMMUTABLE` (if requested)
    /// put in place. No caller can observe the buildable phase.
    pub fn from_seed(flags: GraphFlags, seed: Seed<'_>) -> Result<Self> {
        let mut graph = Graph::new(flags.mutable());
        match seed {
            Seed::Snapshot(source) => graph.copy_from(source, true),
            Seed::Description(description) => {
                graph.add_nodes(description.nodes);
                graph.add_edges(description.edges)?;
            }
            Seed::Items(items) => {
                for item in items {
                    match item {
                        SeedItem::Node(id) => {
                            graph.add_node(id);
                        }
                        SeedItem::Edge(spec) => {
                            graph.add_edge_spec(spec)?;
                        }
                    }
                }
            }
            Seed::Node(id) => {
                graph.add_node(id);
            }
            Seed::Callback(build) => build(&mut graph)?,
        }
        Ok(graph.seal(flags))
    }

    /// Construct by running `build` during the buildable phase.
    pub fn build<F>(flags: GraphFlags, build: F) -> Result<Self>
    where
        F: FnOnce(&mut Graph) -> Result<()>,
    {
        let mut graph = Graph::new(flags.mutable());
        build(&mut graph)?;
        Ok(graph.seal(flags))
    }

    /// End the buildable phase, applying `IMMUTABLE` if it was requested.
    fn seal(mut self, requested: GraphFlags) -> Self {
        if requested.contains(GraphFlags::IMMUTABLE) {
            self.flags |= GraphFlags::IMMUTABLE;
        }
        debug!(
            graph = self.debug_id,
            nodes = self.node_count(),
            edges = self.edge_count(),
            sealed = self.is_immutable(),
            "graph constructed"
        );
        self
    }
}
