use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use hunt_bot::agent::DEFAULT_MAX_ACTIONS;
use hunt_bot::{AgentParams, HuntOutcome, SearchAgent, Strategy};
use hunt_core::grid::{GridBuilder, GridError, World};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{AgentConfig, BenchmarkConfig, ResolvedOutputs};
use crate::logging::telemetry_path_for;

/// Offset between a world's seed and the seed of the agents hunting in it.
const AGENT_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// Runs every configured agent over the same sequence of generated worlds.
pub struct TrialRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    builder: GridBuilder,
    agents: Vec<AgentBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub trials: usize,
    pub agents: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

struct AgentBlueprint {
    name: String,
    agent: SearchAgent,
}

impl AgentBlueprint {
    fn from_configs(configs: &[AgentConfig]) -> Vec<Self> {
        configs
            .iter()
            .map(|cfg| {
                let max_actions = cfg.max_actions.unwrap_or(DEFAULT_MAX_ACTIONS);
                Self {
                    name: cfg.name.clone(),
                    agent: SearchAgent::new(AgentParams::new(cfg.strategy, max_actions)),
                }
            })
            .collect()
    }
}

/// One agent's hunt in one world.
#[derive(Debug, Clone)]
pub struct AgentResult {
    pub agent_name: String,
    pub strategy: Strategy,
    pub outcome: HuntOutcome,
    pub elapsed_ms: f64,
}

/// Every agent's hunt in one world.
#[derive(Debug, Clone)]
pub struct TrialOutcome {
    pub world_seed: u64,
    pub results: Vec<AgentResult>,
}

impl TrialRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let builder = GridBuilder::new(config.worlds.dim, config.worlds.blocked_density)?;
        let agents = AgentBlueprint::from_configs(&config.agents);

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            builder,
            agents,
        })
    }

    /// Execute all trials, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.worlds.seed.unwrap_or(0));
        let mut analytics = AnalyticsCollector::new(&self.config)?;
        let mut rows_written = 0usize;

        for trial_index in 0..self.config.worlds.trials {
            let world_seed = rng.next_u64();
            let outcome = self.run_trial(trial_index, world_seed)?;
            analytics.record_trial(trial_index, &outcome)?;
            rows_written += write_trial_rows(&mut writer, &self.config, trial_index, &outcome)?;
        }

        writer.flush()?;

        let summary = analytics.finalize()?;
        summary.write_markdown(&self.outputs.summary_md)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| telemetry_path_for(&self.outputs));

        Ok(RunSummary {
            trials: self.config.worlds.trials,
            agents: self.agents.len(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    fn run_trial(&self, trial_index: usize, world_seed: u64) -> Result<TrialOutcome, RunnerError> {
        let world = World::generate(&self.builder, &mut StdRng::seed_from_u64(world_seed))?;
        let mut results = Vec::with_capacity(self.agents.len());

        for blueprint in &self.agents {
            let mut hunt_world = world.clone();
            // Same agent seed for every agent so the examination draws are paired.
            let mut agent_rng = StdRng::seed_from_u64(world_seed ^ AGENT_SEED_OFFSET);
            let start = Instant::now();
            let outcome = blueprint.agent.run(&mut hunt_world, &mut agent_rng);
            let elapsed_ms = start.elapsed().as_secs_f64() * 1_000.0;

            if self.logging_enabled && tracing::enabled!(Level::INFO) {
                event!(
                    target: "hunt_bench::trial",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    trial_index = trial_index as u64,
                    world_seed,
                    agent = %blueprint.name,
                    found = outcome.found,
                    actions = outcome.actions(),
                    elapsed_ms
                );
            }

            results.push(AgentResult {
                agent_name: blueprint.name.clone(),
                strategy: blueprint.agent.params().strategy,
                outcome,
                elapsed_ms,
            });
        }

        Ok(TrialOutcome {
            world_seed,
            results,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_trial_rows(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    trial_index: usize,
    outcome: &TrialOutcome,
) -> Result<usize, RunnerError> {
    let trial_id = format!("T{trial_index:05}");

    let mut rows_written = 0usize;
    for result in &outcome.results {
        let row = TrialLogRow {
            run_id: config.run_id.clone(),
            trial_id: trial_id.clone(),
            trial_index,
            world_seed: outcome.world_seed,
            agent: result.agent_name.clone(),
            strategy: result.strategy,
            found: result.outcome.found,
            movements: result.outcome.movements,
            examinations: result.outcome.examinations,
            actions: result.outcome.actions(),
            blocked_hits: result.outcome.blocked_hits,
            replans: result.outcome.replans,
            elapsed_ms: result.elapsed_ms,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

#[derive(Debug, Serialize)]
struct TrialLogRow {
    run_id: String,
    trial_id: String,
    trial_index: usize,
    world_seed: u64,
    agent: String,
    strategy: Strategy,
    found: bool,
    movements: u64,
    examinations: u64,
    actions: u64,
    blocked_hits: u64,
    replans: u64,
    elapsed_ms: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize row: {0}")]
    Json(#[from] serde_json::Error),
    #[error("world generation failed: {0}")]
    World(#[from] GridError),
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}
