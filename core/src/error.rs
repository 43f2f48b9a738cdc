use std::fmt;

use crate::node::NodeId;

/// Coarse classification of a [`GraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An unknown node or edge was referenced.
    NotFound,
    /// The call is not allowed by the graph's flags.
    PolicyViolation,
    /// The algorithm cannot run on this input.
    Algorithmic,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::PolicyViolation => "policy violation",
            ErrorKind::Algorithmic => "algorithmic error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("edge {from} -> {to} not found")]
    EdgeNotFound { from: NodeId, to: NodeId },
    #[error("self-loop on {0} is not allowed")]
    SelfLoopNotAllowed(NodeId),
    #[error("cannot set weight {weight} on {from} -> {to}: graph is unweighted")]
    WeightOnUnweighted { from: NodeId, to: NodeId, weight: f64 },
    #[error("invalid weight {weight} on {from} -> {to}")]
    InvalidWeight { from: NodeId, to: NodeId, weight: f64 },
    #[error("{0} requires a directed graph")]
    RequiresDirected(&'static str),
    #[error("negative weight {weight} on {from} -> {to}")]
    NegativeWeight { from: NodeId, to: NodeId, weight: f64 },
}

impl GraphError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::NodeNotFound(_) | GraphError::EdgeNotFound { .. } => ErrorKind::NotFound,
            GraphError::SelfLoopNotAllowed(_)
            | GraphError::WeightOnUnweighted { .. }
            | GraphError::InvalidWeight { .. }
            | GraphError::RequiresDirected(_) => ErrorKind::PolicyViolation,
            GraphError::NegativeWeight { .. } => ErrorKind::Algorithmic,
        }
    }

    /// Kind-prefixed message, with a hint at how to avoid the error.
    pub fn long_message(&self) -> String {
        let hint = match self {
            GraphError::NodeNotFound(_) => "check has_node before querying",
            GraphError::EdgeNotFound { .. } => "check has_edge before querying",
            GraphError::SelfLoopNotAllowed(_) => "construct the graph with ALLOW_SELF_LOOP",
            GraphError::WeightOnUnweighted { .. } => "construct the graph with WEIGHTED",
            GraphError::InvalidWeight { .. } => "weights must be finite numbers",
            GraphError::RequiresDirected(_) => "construct the graph with DIRECTED",
            GraphError::NegativeWeight { .. } => "Dijkstra needs non-negative weights",
        };
        format!("{}: {} ({})", self.kind(), self, hint)
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(GraphError::NodeNotFound(1.into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            GraphError::RequiresDirected("reverse").kind(),
            ErrorKind::PolicyViolation
        );
        let err = GraphError::NegativeWeight { from: "a".into(), to: "b".into(), weight: -1.0 };
        assert_eq!(err.kind(), ErrorKind::Algorithmic);
    }

    #[test]
    fn test_messages() {
        let err = GraphError::SelfLoopNotAllowed("A".into());
        assert_eq!(err.to_string(), "self-loop on A is not allowed");
        assert_eq!(
            err.long_message(),
            "policy violation: self-loop on A is not allowed (construct the graph with ALLOW_SELF_LOOP)"
        );
    }
}
