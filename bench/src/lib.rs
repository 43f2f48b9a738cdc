//! graphkit-bench: workload generators shared by the benchmark binary.

pub mod generators;
