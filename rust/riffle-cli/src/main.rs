//! Riffle CLI — drive the distributed sort-and-merge pipeline.

mod config;

use clap::{Args, Parser, Subcommand};
use config::RiffleConfig;
use riffle_core::ShellSorter;
use riffle_rt::{run_local, FileRecorder, InputKind, PipelinePlan, Recorder};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

// ANSI color helpers
fn red(s: &str) -> String {
    format!("\x1b[31m{}\x1b[0m", s)
}
fn status_label(label: &str) -> String {
    format!("\x1b[1;32m{:>12}\x1b[0m", label)
}
fn warn_label(label: &str) -> String {
    format!("\x1b[1;33m{:>12}\x1b[0m", label)
}

#[derive(Parser)]
#[command(
    name = "riffle",
    version,
    about = "Distributed sort-and-merge benchmark pipeline"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline once at a fixed group size
    Run {
        /// Number of cooperating group members
        #[arg(long, default_value_t = 4)]
        group_size: usize,

        #[command(flatten)]
        params: PipelineArgs,
    },
    /// Run the pipeline at every group size in a range, one record each
    Sweep {
        /// Smallest group size
        #[arg(long, default_value_t = 1)]
        from: usize,

        /// Largest group size
        #[arg(long, default_value_t = 8)]
        to: usize,

        #[command(flatten)]
        params: PipelineArgs,
    },
}

#[derive(Args)]
struct PipelineArgs {
    /// Total dataset size
    #[arg(long)]
    size: Option<usize>,

    /// Sort threads per member (default: one per CPU)
    #[arg(long)]
    threads: Option<usize>,

    /// Timed iterations per run
    #[arg(long)]
    iterations: Option<usize>,

    /// Base seed; each iteration offsets it by its index
    #[arg(long)]
    seed: Option<u64>,

    /// Input family: uniform, reversed, or partial
    #[arg(long)]
    input: Option<InputKind>,

    /// Append one tab-separated record per run to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Configuration file (default: ./riffle.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Flags merged over `riffle.toml` merged over built-in defaults.
struct Settings {
    plan: PipelinePlan,
    threads: usize,
    input: InputKind,
    output: Option<PathBuf>,
}

fn resolve(params: &PipelineArgs) -> Result<Settings, Box<dyn Error>> {
    let file = RiffleConfig::load(params.config.as_deref())?;
    let defaults = PipelinePlan::default();

    let input = match (params.input, &file.pipeline.input) {
        (Some(kind), _) => kind,
        (None, Some(name)) => name.parse::<InputKind>()?,
        (None, None) => InputKind::Uniform,
    };

    Ok(Settings {
        plan: PipelinePlan {
            total_size: params
                .size
                .or(file.pipeline.size)
                .unwrap_or(defaults.total_size),
            iterations: params
                .iterations
                .or(file.pipeline.iterations)
                .unwrap_or(defaults.iterations),
            seed: params.seed.or(file.pipeline.seed).unwrap_or(defaults.seed),
        },
        threads: params
            .threads
            .or(file.pipeline.threads)
            .unwrap_or_else(num_cpus::get),
        input,
        output: params.output.clone().or_else(|| file.pipeline.output.clone()),
    })
}

/// Open the result sink up front: an unreachable sink must stop the run
/// before any group member starts.
fn open_recorder(settings: &Settings) -> Result<Option<FileRecorder>, Box<dyn Error>> {
    match &settings.output {
        Some(path) => Ok(Some(FileRecorder::append(path)?)),
        None => Ok(None),
    }
}

fn run_once(
    group_size: usize,
    settings: &Settings,
    recorder: Option<&mut FileRecorder>,
) -> Result<(), Box<dyn Error>> {
    println!(
        "{} group={} size={} threads={} iterations={}",
        status_label("Running"),
        group_size,
        settings.plan.total_size,
        settings.threads,
        settings.plan.iterations
    );
    let source = settings.input.source();
    let report = run_local(
        group_size,
        &settings.plan,
        ShellSorter::new(settings.threads),
        &*source,
    )?;
    println!(
        "{} mean {:.7}s over {} iterations",
        status_label("Sorted"),
        report.mean.as_secs_f64(),
        report.iterations
    );
    if let Some(rec) = recorder {
        rec.record(report.group_size, report.mean)?;
    }
    Ok(())
}

fn execute(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Run { group_size, params } => {
            let settings = resolve(&params)?;
            let mut recorder = open_recorder(&settings)?;
            run_once(group_size, &settings, recorder.as_mut())
        }
        Commands::Sweep { from, to, params } => {
            let settings = resolve(&params)?;
            if from == 0 || from > to {
                return Err(format!("invalid sweep range {from}..={to}").into());
            }
            let mut recorder = open_recorder(&settings)?;
            for group_size in from..=to {
                if settings.plan.total_size % group_size != 0 {
                    println!(
                        "{} group={} does not divide {} elements",
                        warn_label("Skipped"),
                        group_size,
                        settings.plan.total_size
                    );
                    continue;
                }
                run_once(group_size, &settings, recorder.as_mut())?;
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", red("error:"), err);
            ExitCode::FAILURE
        }
    }
}
