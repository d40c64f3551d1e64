use std::path::PathBuf;

use clap::Parser;

use hunt_bench::config::{BenchmarkConfig, ResolvedOutputs};
use hunt_bench::logging::init_logging;
use hunt_bench::trials::TrialRunner;

/// Benchmark harness comparing hunt strategies over generated worlds.
#[derive(Debug, Parser)]
#[command(
    name = "hunt-bench",
    author,
    version,
    about = "Deterministic target-hunt benchmark harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/hunt.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of worlds to generate.
    #[arg(long, value_name = "TRIALS")]
    trials: Option<usize>,

    /// Override the RNG seed for world generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the grid side length.
    #[arg(long, value_name = "DIM")]
    dim: Option<usize>,

    /// Exit after validating the configuration (no trials are run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(trials) = cli.trials {
        config.worlds.trials = trials;
    }

    if let Some(seed) = cli.seed {
        config.worlds.seed = Some(seed);
    }

    if let Some(dim) = cli.dim {
        config.worlds.dim = dim;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let agent_count = config.agents.len();
    let run_id = config.run_id.clone();
    let trials = config.worlds.trials;
    let dim = config.worlds.dim;

    println!(
        "Loaded configuration '{run_id}' with {agent_count} agent{} ({trials} worlds, {dim}x{dim})",
        if agent_count == 1 { "" } else { "s" }
    );

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = TrialRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: trials skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} worlds × {} agents → {} rows at {}",
        summary.trials,
        summary.agents,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
