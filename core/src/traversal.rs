use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::Result;
use crate::graph::Graph;
use crate::node::NodeId;

/// Outcome of a BFS or DFS.
#[derive(Debug, Clone, Default)]
pub struct TraversalResult {
    /// Nodes in the order they were finalized.
    pub visit_order: Vec<NodeId>,
    /// Every node marked visited (BFS marks on enqueue, DFS on pop).
    pub visited: HashSet<NodeId>,
    /// Node → the node that discovered it. The source has no entry.
    pub predecessors: HashMap<NodeId, NodeId>,
}

impl TraversalResult {
    /// Path from the traversal source to `target`, if it was reached.
    pub fn path_to(&self, source: &NodeId, target: &NodeId) -> Option<Vec<NodeId>> {
        if !self.visited.contains(target) {
            return None;
        }
        reconstruct_path(&self.predecessors, source, target)
    }
}

/// Walk predecessor links from `target` back to `source`.
///
/// Returns the path source → target inclusive, or None if the chain does
/// not lead back to `source`.
pub fn reconstruct_path(
    predecessors: &HashMap<NodeId, NodeId>,
    source: &NodeId,
    target: &NodeId,
) -> Option<Vec<NodeId>> {
    let mut path = vec![target.clone()];
    let mut current = target;

    while current != source {
        current = predecessors.get(current)?;
        path.push(current.clone());
        // A chain longer than the map cannot terminate.
        if path.len() > predecessors.len() + 1 {
            return None;
        }
    }

    path.reverse();
    Some(path)
}

/// Breadth-first traversal from `source`, stopping after `target` is visited.
pub fn bfs(graph: &Graph, source: &NodeId, target: Option<&NodeId>) -> Result<TraversalResult> {
    bfs_visit(graph, source, target, |_, _| {})
}

/// [`bfs`] with an observer called as `(node, predecessor)` for each node in
/// visitation order. The observer cannot change the traversal.
pub fn bfs_visit<F>(
    graph: &Graph,
    source: &NodeId,
    target: Option<&NodeId>,
    mut visitor: F,
) -> Result<TraversalResult>
where
    F: FnMut(&NodeId, Option<&NodeId>),
{
    graph.require_ref(source)?;
    if let Some(t) = target {
        graph.require_ref(t)?;
    }

    let mut result = TraversalResult::default();
    let mut queue: VecDeque<NodeId> = VecDeque::new();

    result.visited.insert(source.clone());
    queue.push_back(source.clone());

    while let Some(current) = queue.pop_front() {
        visitor(&current, result.predecessors.get(&current));
        result.visit_order.push(current.clone());

        if target == Some(&current) {
            break;
        }

        for (next, _) in graph.store.successors(&current) {
            if result.visited.insert(next.clone()) {
                result.predecessors.insert(next.clone(), current.clone());
                queue.push_back(next.clone());
            }
        }
    }

    Ok(result)
}

/// Depth-first traversal from `source`, stopping after `target` is visited.
pub fn dfs(graph: &Graph, source: &NodeId, target: Option<&NodeId>) -> Result<TraversalResult> {
    dfs_visit(graph, source, target, |_, _| {})
}

/// [`dfs`] with an observer, see [`bfs_visit`].
///
/// Uses an explicit stack. Neighbors are pushed in reverse so they pop in
/// insertion order, matching recursive DFS. A node may be pushed by several
/// discoverers; only the first pop counts.
pub fn dfs_visit<F>(
    graph: &Graph,
    source: &NodeId,
    target: Option<&NodeId>,
    mut visitor: F,
) -> Result<TraversalResult>
where
    F: FnMut(&NodeId, Option<&NodeId>),
{
    graph.require_ref(source)?;
    if let Some(t) = target {
        graph.require_ref(t)?;
    }

    let mut result = TraversalResult::default();
    let mut stack: Vec<(NodeId, Option<NodeId>)> = vec![(source.clone(), None)];

    while let Some((current, parent)) = stack.pop() {
        if !result.visited.insert(current.clone()) {
            continue;
        }
        if let Some(p) = &parent {
            result.predecessors.insert(current.clone(), p.clone());
        }
        visitor(&current, parent.as_ref());
        result.visit_order.push(current.clone());

        if target == Some(&current) {
            break;
        }

        for (next, _) in graph.store.successors(&current).rev() {
            if !result.visited.contains(next) {
                stack.push((next.clone(), Some(current.clone())));
            }
        }
    }

    Ok(result)
}
