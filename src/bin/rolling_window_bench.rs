//! Benchmark binary for the rolling-window featurizers.
//!
//! Usage:
//!     rolling_window_bench <data_file> <iterations>
//!
//! The data file is JSON of the form `{"values": [..], "grains": [[..], ..]}`,
//! where `grains` is optional and, when present, holds one key per value.
//! Outputs a JSON array of benchmark results to stdout.

use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::process;
use std::time::Instant;

use featurizer_rolling::prelude::*;

#[derive(Debug, Deserialize)]
struct SeriesData {
    values: Vec<f64>,
    #[serde(default)]
    grains: Option<Vec<Grain>>,
}

#[derive(Debug, Serialize)]
struct BenchmarkResult {
    name: String,
    rows: usize,
    iterations: usize,
    total_time_ms: f64,
    avg_time_ms: f64,
    min_time_ms: f64,
    max_time_ms: f64,
    throughput_rows_per_sec: f64,
}

fn load_series(path: &str) -> Result<SeriesData, Box<dyn Error>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let data: SeriesData = serde_json::from_reader(reader)?;

    if let Some(grains) = &data.grains {
        if grains.len() != data.values.len() {
            return Err(format!(
                "expected {} grains, found {}",
                data.values.len(),
                grains.len()
            )
            .into());
        }
    }
    Ok(data)
}

fn benchmark<F>(name: &str, iterations: usize, rows: usize, mut f: F) -> BenchmarkResult
where
    F: FnMut(),
{
    let mut times = Vec::with_capacity(iterations);

    for _ in 0..iterations {
        let start = Instant::now();
        f();
        times.push(start.elapsed().as_secs_f64() * 1000.0);
    }

    let total_time: f64 = times.iter().sum();
    let avg_time = total_time / iterations as f64;
    let min_time = times.iter().copied().fold(f64::INFINITY, f64::min);
    let max_time = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let throughput = if avg_time > 0.0 {
        (rows as f64 / avg_time) * 1000.0
    } else {
        0.0
    };

    BenchmarkResult {
        name: name.to_string(),
        rows,
        iterations,
        total_time_ms: total_time,
        avg_time_ms: avg_time,
        min_time_ms: min_time,
        max_time_ms: max_time,
        throughput_rows_per_sec: throughput,
    }
}

fn run(data_file: &str, iterations: usize) -> Result<Vec<BenchmarkResult>, Box<dyn Error>> {
    eprintln!("Loading data from {}...", data_file);
    let data = load_series(data_file)?;
    let rows = data.values.len();
    eprintln!("Loaded {} values", rows);

    let mut results = Vec::new();

    for (horizon, max_window_size) in [(1, 14), (1, 50), (7, 28), (28, 200)] {
        let label = format!("Mean(h={horizon}, w={max_window_size})");
        let prototype = AnalyticalRollingWindowTransformer::<f64>::with_defaults(
            AnalyticalRollingWindowCalculation::Mean,
            horizon,
            max_window_size,
        )?;
        eprintln!("  {}...", label);
        results.push(benchmark(&label, iterations, rows, || {
            let mut t = prototype.clone();
            for &value in &data.values {
                let _ = t.execute(value);
            }
        }));
    }

    for calculation in [SimpleRollingWindowCalculation::Min, SimpleRollingWindowCalculation::Max] {
        let label = format!("{calculation:?}(h=7, w=28)");
        let prototype = SimpleRollingWindowTransformer::<f64>::with_defaults(calculation, 7, 28)?;
        eprintln!("  {}...", label);
        results.push(benchmark(&label, iterations, rows, || {
            let mut t = prototype.clone();
            for &value in &data.values {
                let _ = t.execute(value);
            }
        }));
    }

    if let Some(grains) = &data.grains {
        let mut estimator = GrainedAnalyticalRollingWindowEstimator::<f64>::new(
            AnalyticalRollingWindowCalculation::Mean,
            7,
            28,
            1,
        )?;
        estimator.begin_training()?;
        estimator.complete_training()?;
        let prototype = estimator.create_transformer()?;

        eprintln!("  Grained Mean(h=7, w=28)...");
        results.push(benchmark("Grained Mean(h=7, w=28)", iterations, rows, || {
            let mut t = prototype.clone();
            for (grain, &value) in grains.iter().zip(&data.values) {
                let _ = t.execute((grain.clone(), value));
            }
        }));
    }

    Ok(results)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <data_file> <iterations>", args[0]);
        process::exit(1);
    }

    let iterations: usize = match args[2].parse() {
        Ok(n) if n > 0 => n,
        _ => {
            eprintln!("Invalid iterations: {}", args[2]);
            process::exit(1);
        }
    };

    let results = match run(&args[1], iterations) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Benchmark failed: {}", e);
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&results) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize results: {}", e);
            process::exit(1);
        }
    }
}
