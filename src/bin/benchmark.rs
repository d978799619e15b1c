use std::env;
use std::time::Duration;

use floyd_apsp::matrix::generators::generate_random;
use floyd_apsp::{
    AllPairsShortestPath, BarrierStrategy, DistanceMatrix, DuplicateEdgePolicy, EngineConfig, FloydWarshall,
    ParallelFloydWarshall,
};

// Function to benchmark an engine on a copy of the input matrix
fn benchmark_engine<A>(engine: &A, input: &DistanceMatrix<f64>) -> Result<(Duration, DistanceMatrix<f64>), Box<dyn std::error::Error>>
where
    A: AllPairsShortestPath<f64>,
{
    println!("Running {} on {} vertices...", engine.name(), input.dimension());

    let mut matrix = input.clone();
    let summary = engine.compute(&mut matrix)?;
    println!("  - {} relaxations in {:?}", summary.relaxations, summary.elapsed);

    Ok((summary.elapsed, matrix))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    // Optional JSON engine configuration as the first argument
    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(json) => EngineConfig::from_json(json)?,
        None => EngineConfig::default(),
    };

    // Define graph sizes to test
    let graph_sizes = vec![64, 128, 256, 512, 1024];

    // Probability that an ordered pair is connected
    let density = 0.1;

    println!("=====================================================");
    println!("Benchmark: sequential vs parallel Floyd-Warshall");
    println!("Edge density: {}", density);
    println!("Configured engine: {:?}", config);
    println!("=====================================================");

    let sequential = FloydWarshall::new();
    let fork_join = ParallelFloydWarshall::new()
        .with_strategy(BarrierStrategy::ForkJoin)
        .with_num_threads(config.num_threads);
    let persistent = ParallelFloydWarshall::new()
        .with_strategy(BarrierStrategy::Persistent)
        .with_num_threads(config.num_threads);
    let configured = config.build();

    let mut results = Vec::new();

    for &size in &graph_sizes {
        println!("\nGenerating random graph with {} vertices...", size);
        let edges = generate_random(size, density, 1.0, 100.0, size as u64);
        println!("Graph has {} vertices and {} edges", size, edges.len());
        let input = DistanceMatrix::from_edges(size, edges, DuplicateEdgePolicy::KeepLast)?;

        let (sequential_time, expected) = benchmark_engine(&sequential, &input)?;
        let (fork_join_time, fork_join_result) = benchmark_engine(&fork_join, &input)?;
        let (persistent_time, persistent_result) = benchmark_engine(&persistent, &input)?;
        let (configured_time, configured_result) = benchmark_engine(&configured, &input)?;

        for (name, result) in [
            ("fork-join", &fork_join_result),
            ("persistent", &persistent_result),
            ("configured", &configured_result),
        ] {
            if *result != expected {
                return Err(format!("{} result differs from the sequential one at {} vertices", name, size).into());
            }
        }

        results.push((size, sequential_time, fork_join_time, persistent_time, configured_time));

        println!(
            "Speedup - fork-join: {:.2}x, persistent: {:.2}x",
            sequential_time.as_secs_f64() / fork_join_time.as_secs_f64(),
            sequential_time.as_secs_f64() / persistent_time.as_secs_f64()
        );
    }

    // Print summary table
    println!("\n=====================================================");
    println!("Summary of Results");
    println!("=====================================================");
    println!(
        "{:<10} | {:<15} | {:<15} | {:<15} | {:<15}",
        "Vertices", "Sequential (ms)", "ForkJoin (ms)", "Persistent (ms)", "Configured (ms)"
    );
    println!("-----------------------------------------------------");

    for (size, sequential_time, fork_join_time, persistent_time, configured_time) in &results {
        println!(
            "{:<10} | {:<15} | {:<15} | {:<15} | {:<15}",
            size,
            sequential_time.as_millis(),
            fork_join_time.as_millis(),
            persistent_time.as_millis(),
            configured_time.as_millis()
        );
    }

    Ok(())
}
