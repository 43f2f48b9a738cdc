use bitflags::bitflags;

bitflags! {
    /// Behavioural contract of a graph, fixed at construction.
    ///
    /// `IMMUTABLE` is the only bit that changes afterwards, and only one way:
    /// `Graph::freeze` sets it, nothing clears it in place.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GraphFlags: u8 {
        /// Undirected, unweighted, no self-loops, mutable.
        const NONE = 0;
        /// Edges are one-way.
        const DIRECTED = 1;
        /// Edges carry arbitrary weights; otherwise every weight is 1.
        const WEIGHTED = 2;
        /// Edges from a node to itself are accepted.
        const ALLOW_SELF_LOOP = 4;
        /// Structural mutation is ignored.
        const IMMUTABLE = 8;
    }
}

impl GraphFlags {
    /// The same flags with `IMMUTABLE` cleared.
    pub fn mutable(self) -> Self {
        self - GraphFlags::IMMUTABLE
    }
}
