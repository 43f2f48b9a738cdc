//! Deterministic graph generators. All build through the public mutation
//! API, so every edge passes the target graph's policy checks.

use graphkit_core::{Graph, GraphFlags, Result};

/// Simple LCG for deterministic, fast pseudo-random numbers.
pub struct FastRng(u64);

impl FastRng {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn step(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.0
    }

    /// Uniform in `0..max`. `max` must be non-zero.
    pub fn next(&mut self, max: u64) -> u64 {
        (self.step() >> 33) % max
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.step() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Weight for a generated edge: 1 on unweighted graphs, 1..=10 otherwise.
fn edge_weight(flags: GraphFlags, rng: &mut FastRng) -> f64 {
    if flags.contains(GraphFlags::WEIGHTED) {
        (1 + rng.next(10)) as f64
    } else {
        1.0
    }
}

/// Erdős–Rényi G(n, p): every candidate edge exists independently with
/// probability `p`. Directed graphs consider both orientations of each
/// pair, undirected graphs each pair once. Self-loops are never generated.
pub fn erdos_renyi(node_count: u64, p: f64, flags: GraphFlags, seed: u64) -> Result<Graph> {
    let mut rng = FastRng::new(seed);
    let directed = flags.contains(GraphFlags::DIRECTED);

    Graph::build(flags, |g| {
        g.add_nodes(0..node_count);
        for from in 0..node_count {
            let first = if directed { 0 } else { from + 1 };
            for to in first..node_count {
                if from == to || rng.next_f64() >= p {
                    continue;
                }
                let weight = edge_weight(flags, &mut rng);
                g.add_weighted_edge(from, to, weight)?;
            }
        }
        Ok(())
    })
}

/// `0 - 1 - ... - (n-1)`.
pub fn path(node_count: u64, flags: GraphFlags) -> Result<Graph> {
    Graph::build(flags, |g| {
        g.add_nodes(0..node_count);
        for i in 1..node_count {
            g.add_edge(i - 1, i)?;
        }
        Ok(())
    })
}

/// A path closed back on node 0. A single node becomes a self-loop, which
/// fails unless `ALLOW_SELF_LOOP` is set.
pub fn cycle(node_count: u64, flags: GraphFlags) -> Result<Graph> {
    Graph::build(flags, |g| {
        g.add_nodes(0..node_count);
        for i in 0..node_count {
            g.add_edge(i, (i + 1) % node_count)?;
        }
        Ok(())
    })
}

/// `width × height` lattice. Node `row * width + col` links right and down.
pub fn grid(width: u64, height: u64, flags: GraphFlags) -> Result<Graph> {
    Graph::build(flags, |g| {
        for row in 0..height {
            for col in 0..width {
                let id = row * width + col;
                g.add_node(id);
                if col + 1 < width {
                    g.add_edge(id, id + 1)?;
                }
                if row + 1 < height {
                    g.add_edge(id, id + width)?;
                }
            }
        }
        Ok(())
    })
}
