//! Text and matrix renderings built only on the public read API.

use std::fmt::Write;

use crate::graph::Graph;
use crate::node::NodeId;

/// Render as Graphviz DOT.
///
/// Isolated nodes are listed first as bare statements, then one statement
/// per edge. Weights are emitted as a `weight` attribute on weighted graphs.
pub fn to_dot(graph: &Graph, name: &str) -> String {
    let (keyword, arrow) = if graph.is_directed() { ("digraph", "->") } else { ("graph", "--") };
    let mut out = String::new();
    let _ = writeln!(out, "{keyword} {} {{", dot_id(name));

    for id in graph.nodes() {
        if matches!(graph.degree(id), Ok(0)) {
            let _ = writeln!(out, "  {};", dot_node(id));
        }
    }

    for edge in graph.edges() {
        let _ = write!(out, "  {} {arrow} {}", dot_node(&edge.from), dot_node(&edge.to));
        if graph.is_weighted() {
            let _ = write!(out, " [weight={}]", edge.weight);
        }
        out.push_str(";\n");
    }

    out.push('}');
    out.push('\n');
    out
}

fn dot_node(id: &NodeId) -> String {
    match id {
        NodeId::Int(n) => n.to_string(),
        NodeId::Str(s) => dot_id(s),
    }
}

/// Reserved words of the DOT grammar, matched case-insensitively.
const DOT_KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Bare if a plain identifier that is not a keyword, otherwise double-quoted.
fn dot_id(s: &str) -> String {
    let mut chars = s.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !DOT_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(s));
    if plain {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// Node labels in the row/column order of [`to_adjacency_matrix`]:
/// sorted lexicographically by their string form.
pub fn adjacency_labels(graph: &Graph) -> Vec<NodeId> {
    let mut labels: Vec<NodeId> = graph.nodes().cloned().collect();
    labels.sort_by_cached_key(|id| id.to_string());
    labels
}

/// Square boolean matrix where `matrix[x][y]` is true iff the edge x→y
/// exists. Empty for an empty graph.
pub fn to_adjacency_matrix(graph: &Graph) -> Vec<Vec<bool>> {
    let labels = adjacency_labels(graph);
    labels
        .iter()
        .map(|from| labels.iter().map(|to| graph.has_edge(from, to)).collect())
        .collect()
}
