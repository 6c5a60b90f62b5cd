//! Riffle sweep runner
//!
//! Standalone binary that runs the full pipeline across a range of group
//! sizes and prints per-run reports as text, CSV, or JSON.
//!
//! Usage: `riffle-bench [text|csv|json] [total_size] [max_group_size]`

use riffle_core::ShellSorter;
use riffle_rt::{run_local, PipelinePlan, UniformSource};
use serde::Serialize;

/// Result of one pipeline run at a fixed group size.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    pub group_size: usize,
    pub total_size: usize,
    pub iterations: usize,
    pub mean_seconds: f64,
    pub throughput_elems_per_sec: f64,
}

fn run_group_size(group_size: usize, plan: &PipelinePlan) -> Result<SweepResult, String> {
    let report = run_local(
        group_size,
        plan,
        ShellSorter::new(num_threads_per_member(group_size)),
        &UniformSource,
    )
    .map_err(|e| e.to_string())?;

    let mean_seconds = report.mean.as_secs_f64();
    let throughput = if mean_seconds > 0.0 {
        plan.total_size as f64 / mean_seconds
    } else {
        0.0
    };
    Ok(SweepResult {
        group_size,
        total_size: plan.total_size,
        iterations: report.iterations,
        mean_seconds,
        throughput_elems_per_sec: throughput,
    })
}

/// Split the machine's CPUs across the group members so a sweep compares
/// group sizes at constant hardware budget.
fn num_threads_per_member(group_size: usize) -> usize {
    (std::thread::available_parallelism().map_or(1, |n| n.get()) / group_size).max(1)
}

fn print_csv_header() {
    println!("group_size,total_size,iterations,mean_seconds,elems_per_sec");
}

fn print_csv_row(r: &SweepResult) {
    println!(
        "{},{},{},{:.7},{:.0}",
        r.group_size, r.total_size, r.iterations, r.mean_seconds, r.throughput_elems_per_sec,
    );
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let output_format = args.get(1).map(|s| s.as_str()).unwrap_or("text");
    let total_size: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1_000_000);
    let max_group_size: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(8);

    let plan = PipelinePlan {
        total_size,
        ..PipelinePlan::default()
    };

    let mut results: Vec<SweepResult> = Vec::new();
    for group_size in 1..=max_group_size {
        if total_size % group_size != 0 {
            eprintln!(
                "Warning: group size {} does not divide {} elements, skipping",
                group_size, total_size
            );
            continue;
        }
        match run_group_size(group_size, &plan) {
            Ok(result) => results.push(result),
            Err(err) => {
                eprintln!("Error: group size {} failed: {}", group_size, err);
                std::process::exit(1);
            }
        }
    }

    match output_format {
        "csv" => {
            print_csv_header();
            for r in &results {
                print_csv_row(r);
            }
        }
        "json" => match serde_json::to_string_pretty(&results) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("Error: serializing results failed: {}", err);
                std::process::exit(1);
            }
        },
        _ => {
            println!("Riffle Pipeline Sweep");
            println!("=====================");
            println!();
            for r in &results {
                println!(
                    "[group {:>2}] {:.7}s mean ({} iters) | {:.0} elems/s",
                    r.group_size, r.mean_seconds, r.iterations, r.throughput_elems_per_sec,
                );
            }
        }
    }
}
