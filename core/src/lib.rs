//! graphkit-core: In-memory graph with a flag-driven mutation contract.
//!
//! A single [`Graph`] type covers directed/undirected, weighted/unweighted,
//! self-loop policy and immutability, all chosen by [`GraphFlags`] at
//! construction. On top of the adjacency store sit BFS/DFS traversal,
//! Dijkstra, cycle detection, Kahn's topological sort and weak component
//! analysis. Derived views are memoized against version counters so repeated
//! queries are cheap and never stale.
//!
//! Node keys are normalized: `123` and `"123"` are the same node (see
//! [`NodeId`]).
//!
//! Single-owner, synchronous. No persistence or concurrent mutation.

mod cache;
mod components;
mod cycle;
mod error;
pub mod export;
mod flags;
mod graph;
mod lifecycle;
mod node;
mod seed;
mod shortest_path;
mod store;
mod topo;
mod traversal;

pub use components::weak_components;
pub use cycle::find_cycle;
pub use error::{ErrorKind, GraphError, Result};
pub use flags::GraphFlags;
pub use graph::{Edge, Graph};
pub use node::NodeId;
pub use seed::{EdgeSpec, GraphDescription, Seed, SeedItem};
pub use shortest_path::{
    dijkstra, shortest_distance, shortest_path, shortest_path_data, DijkstraResult,
    ShortestPathData,
};
pub use topo::topological_sort;
pub use traversal::{bfs, bfs_visit, dfs, dfs_visit, reconstruct_path, TraversalResult};
