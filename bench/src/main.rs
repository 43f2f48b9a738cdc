use std::time::Instant;

use graphkit_bench::generators;
use graphkit_core::{Graph, GraphFlags};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Timing of one algorithm on one generated graph.
#[derive(Debug, Serialize)]
struct Timing {
    op: &'static str,
    millis: f64,
    /// Algorithm-specific size of the answer (visited nodes, path length...).
    result: Option<usize>,
}

#[derive(Debug, Serialize)]
struct Report {
    generator: &'static str,
    directed: bool,
    weighted: bool,
    nodes: usize,
    edges: usize,
    build_millis: f64,
    timings: Vec<Timing>,
}

type Generator = fn(u64) -> graphkit_core::Result<Graph>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let positional: Vec<&str> = args.iter().map(String::as_str).filter(|a| !a.starts_with("--")).collect();

    if args.iter().any(|a| a == "--help" || a == "help") {
        print_usage();
        return;
    }

    let mode = positional.first().copied().unwrap_or("all");
    let node_count: u64 = positional.get(1).and_then(|s| s.parse().ok()).unwrap_or(2_000);

    let generators: Vec<(&'static str, Generator)> = match mode {
        "random" => vec![("random", gen_random)],
        "path" => vec![("path", gen_path)],
        "cycle" => vec![("cycle", gen_cycle)],
        "grid" => vec![("grid", gen_grid)],
        "all" => vec![
            ("random", gen_random as Generator),
            ("path", gen_path),
            ("cycle", gen_cycle),
            ("grid", gen_grid),
        ],
        _ => {
            eprintln!("Unknown mode: {mode}. Use --help for options.");
            std::process::exit(2);
        }
    };

    let mut reports = Vec::new();
    for (name, generator) in generators {
        if let Some(report) = run_benchmark(name, generator, node_count) {
            if !json {
                print_report(&report);
            }
            reports.push(report);
        }
    }

    if json {
        match serde_json::to_string_pretty(&reports) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("failed to encode report: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("Usage: graphkit-bench [mode] [node_count] [--json]");
    println!();
    println!("Modes:");
    println!("  all     Run every generator (default)");
    println!("  random  Erdos-Renyi, directed and weighted, ~5 out-edges per node");
    println!("  path    Directed chain 0 -> 1 -> ... -> n-1");
    println!("  cycle   Directed ring");
    println!("  grid    Undirected square lattice");
    println!();
    println!("Default node_count: 2000");
    println!("Log level via RUST_LOG (default: info)");
}

fn run_benchmark(name: &'static str, generator: Generator, node_count: u64) -> Option<Report> {
    let t = Instant::now();
    let graph = match generator(node_count) {
        Ok(graph) => graph,
        Err(e) => {
            warn!(generator = name, error = %e, "generation failed");
            return None;
        }
    };
    let build_millis = millis(t);
    info!(generator = name, nodes = graph.node_count(), edges = graph.edge_count(), build_millis, "generated");

    let mut timings = Vec::new();
    let (Some(first), Some(last)) = (graph.nodes().next().cloned(), graph.nodes().last().cloned()) else {
        return Some(report(name, &graph, build_millis, timings));
    };

    timings.push(time("bfs", || graphkit_core::bfs(&graph, &first, None).ok().map(|r| r.visit_order.len())));
    timings.push(time("dfs", || graphkit_core::dfs(&graph, &first, None).ok().map(|r| r.visit_order.len())));
    timings.push(time("shortest_path", || {
        graphkit_core::shortest_path(&graph, &first, &last).ok().flatten().map(|p| p.len())
    }));
    if graph.is_weighted() {
        timings.push(time("dijkstra", || {
            graphkit_core::dijkstra(&graph, &first, None).ok().map(|r| r.distances.len())
        }));
    }
    timings.push(time("components", || Some(graph.component_count())));
    timings.push(time("cycle", || graph.cycle().map(|c| c.len())));
    if graph.is_directed() {
        timings.push(time("topological_sort", || graph.topological_sort().ok().flatten().map(|o| o.len())));
    }
    // Second call is served from the cache.
    timings.push(time("components (cached)", || Some(graph.component_count())));

    Some(report(name, &graph, build_millis, timings))
}

fn report(generator: &'static str, graph: &Graph, build_millis: f64, timings: Vec<Timing>) -> Report {
    Report {
        generator,
        directed: graph.is_directed(),
        weighted: graph.is_weighted(),
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        build_millis,
        timings,
    }
}

fn time(op: &'static str, f: impl FnOnce() -> Option<usize>) -> Timing {
    let t = Instant::now();
    let result = f();
    Timing { op, millis: millis(t), result }
}

fn millis(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

fn print_report(report: &Report) {
    println!("--- {} ---", report.generator);
    println!(
        "{} nodes, {} edges ({}, {}) built in {:.1}ms",
        report.nodes,
        report.edges,
        if report.directed { "directed" } else { "undirected" },
        if report.weighted { "weighted" } else { "unweighted" },
        report.build_millis
    );
    println!("{:>22} {:>12} {:>10}", "op", "result", "time");
    println!("{:->22} {:->12} {:->10}", "", "", "");
    for timing in &report.timings {
        let result = timing.result.map_or_else(|| "-".to_string(), |n| n.to_string());
        println!("{:>22} {:>12} {:>8.2}ms", timing.op, result, timing.millis);
    }
    println!();
}

// ---------------------------------------------------------------------------
// Generator presets
// ---------------------------------------------------------------------------

fn gen_random(node_count: u64) -> graphkit_core::Result<Graph> {
    let p = if node_count > 1 { 5.0 / node_count as f64 } else { 0.0 };
    generators::erdos_renyi(node_count, p, GraphFlags::DIRECTED | GraphFlags::WEIGHTED, 54321)
}

fn gen_path(node_count: u64) -> graphkit_core::Result<Graph> {
    generators::path(node_count, GraphFlags::DIRECTED)
}

fn gen_cycle(node_count: u64) -> graphkit_core::Result<Graph> {
    generators::cycle(node_count, GraphFlags::DIRECTED | GraphFlags::ALLOW_SELF_LOOP)
}

fn gen_grid(node_count: u64) -> graphkit_core::Result<Graph> {
    let side = (node_count as f64).sqrt().ceil().max(1.0) as u64;
    generators::grid(side, side, GraphFlags::NONE)
}
