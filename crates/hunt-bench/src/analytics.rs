use std::collections::HashMap;
use std::fs;
use std::path::Path;

use hunt_bot::Strategy;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::BenchmarkConfig;
use crate::trials::TrialOutcome;

const CONFIDENCE_Z: f64 = 1.96; // 95% CI

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("baseline agent '{0}' not present in trial results")]
    MissingBaseline(String),
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("baseline '{0}' missing for trial {1}")]
    MissingBaselineTrial(String, String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub struct AnalyticsCollector {
    baseline: String,
    agents: HashMap<String, AgentAccumulator>,
    comparisons: HashMap<String, ComparisonAccumulator>,
    agent_order: Vec<String>,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Result<Self, AnalyticsError> {
        let baseline = config
            .metrics
            .baseline
            .clone()
            .ok_or_else(|| AnalyticsError::MissingBaseline("<unset>".into()))?;

        let mut agents = HashMap::new();
        let mut order = Vec::new();
        for agent in &config.agents {
            agents.insert(
                agent.name.clone(),
                AgentAccumulator::new(agent.name.clone(), agent.strategy),
            );
            order.push(agent.name.clone());
        }

        if !agents.contains_key(&baseline) {
            return Err(AnalyticsError::MissingBaseline(baseline));
        }

        Ok(Self {
            baseline,
            agents,
            comparisons: HashMap::new(),
            agent_order: order,
        })
    }

    pub fn record_trial(
        &mut self,
        trial_index: usize,
        outcome: &TrialOutcome,
    ) -> Result<(), AnalyticsError> {
        let trial_id = format!("T{trial_index:05}");

        let baseline_actions = outcome
            .results
            .iter()
            .find(|result| result.agent_name == self.baseline)
            .map(|result| result.outcome.actions() as f64)
            .ok_or_else(|| {
                AnalyticsError::MissingBaselineTrial(self.baseline.clone(), trial_id.clone())
            })?;

        for result in &outcome.results {
            let acc = self
                .agents
                .get_mut(&result.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(result.agent_name.clone()))?;
            acc.record(
                result.outcome.actions() as f64,
                result.outcome.found,
                result.outcome.blocked_hits,
                result.elapsed_ms,
            );
        }

        for result in &outcome.results {
            if result.agent_name == self.baseline {
                continue;
            }
            let diff = result.outcome.actions() as f64 - baseline_actions;
            self.comparisons
                .entry(result.agent_name.clone())
                .or_default()
                .record(diff);
        }

        Ok(())
    }

    pub fn finalize(mut self) -> Result<AnalyticsSummary, AnalyticsError> {
        let mut reports = Vec::new();
        for name in &self.agent_order {
            if let Some(acc) = self.agents.remove(name) {
                reports.push(acc.into_report());
            }
        }

        let mut comparisons = Vec::new();
        for report in &reports {
            if report.name == self.baseline {
                comparisons.push(ComparisonReport {
                    agent: report.name.clone(),
                    p_value: 1.0,
                    sample_size: report.trials,
                });
                continue;
            }
            let (p_value, sample_size) = self
                .comparisons
                .remove(&report.name)
                .map(ComparisonAccumulator::wilcoxon_signed_rank)
                .unwrap_or((1.0, 0));
            comparisons.push(ComparisonReport {
                agent: report.name.clone(),
                p_value,
                sample_size,
            });
        }

        Ok(AnalyticsSummary {
            baseline: self.baseline,
            agents: reports,
            comparisons,
        }
        .enrich())
    }
}

struct AgentAccumulator {
    name: String,
    strategy: Strategy,
    per_trial_actions: Vec<f64>,
    found: u32,
    blocked_hits: u64,
    total_elapsed_ms: f64,
}

impl AgentAccumulator {
    fn new(name: String, strategy: Strategy) -> Self {
        Self {
            name,
            strategy,
            per_trial_actions: Vec::new(),
            found: 0,
            blocked_hits: 0,
            total_elapsed_ms: 0.0,
        }
    }

    fn record(&mut self, actions: f64, found: bool, blocked_hits: u64, elapsed_ms: f64) {
        self.per_trial_actions.push(actions);
        if found {
            self.found += 1;
        }
        self.blocked_hits += blocked_hits;
        self.total_elapsed_ms += elapsed_ms;
    }

    fn into_report(self) -> AgentReport {
        let trials = self.per_trial_actions.len();
        let (mean_actions, avg_blocked, avg_elapsed_ms, found_rate) = if trials == 0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let n = trials as f64;
            (
                self.per_trial_actions.iter().sum::<f64>() / n,
                self.blocked_hits as f64 / n,
                self.total_elapsed_ms / n,
                self.found as f64 / n,
            )
        };

        AgentReport {
            ci95: confidence_interval(&self.per_trial_actions),
            name: self.name,
            strategy: self.strategy,
            trials,
            found_rate,
            mean_actions,
            mean_blocked_hits: avg_blocked,
            average_elapsed_ms: avg_elapsed_ms,
            delta_vs_baseline: 0.0,
        }
    }
}

#[derive(Clone, Default)]
struct ComparisonAccumulator {
    diffs: Vec<f64>,
}

impl ComparisonAccumulator {
    fn record(&mut self, diff: f64) {
        self.diffs.push(diff);
    }

    /// Two-sided normal approximation with tie and continuity corrections.
    fn wilcoxon_signed_rank(self) -> (f64, usize) {
        let mut paired: Vec<(f64, f64)> = self
            .diffs
            .into_iter()
            .filter(|d| d.abs() > f64::EPSILON)
            .map(|d| (d.abs(), d.signum()))
            .collect();
        let n = paired.len();
        if n == 0 {
            return (1.0, 0);
        }
        paired.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut ranks = Vec::with_capacity(n);
        let mut tie_sizes = Vec::new();
        let mut i = 0;
        while i < n {
            let mut j = i;
            while j + 1 < n && (paired[j + 1].0 - paired[i].0).abs() < 1e-12 {
                j += 1;
            }
            let rank = (i + j + 2) as f64 / 2.0;
            ranks.extend(paired[i..=j].iter().map(|&(_, sign)| (rank, sign)));
            if j > i {
                tie_sizes.push(j - i + 1);
            }
            i = j + 1;
        }

        let w_plus: f64 = ranks
            .iter()
            .filter(|(_, sign)| *sign > 0.0)
            .map(|(rank, _)| rank)
            .sum();
        let w_minus: f64 = ranks
            .iter()
            .filter(|(_, sign)| *sign < 0.0)
            .map(|(rank, _)| rank)
            .sum();

        let w = w_plus.min(w_minus);
        let n_f = n as f64;
        let mean_w = n_f * (n_f + 1.0) / 4.0;

        let tie_adjustment: f64 = tie_sizes
            .into_iter()
            .map(|count| {
                let c = count as f64;
                (c.powi(3) - c) / 48.0
            })
            .sum();
        let variance_w = n_f * (n_f + 1.0) * (2.0 * n_f + 1.0) / 24.0 - tie_adjustment;
        if variance_w <= 0.0 {
            return (1.0, n);
        }

        let z = (((w - mean_w).abs() - 0.5) / variance_w.sqrt()).max(0.0);
        let Ok(normal) = Normal::new(0.0, 1.0) else {
            return (1.0, n);
        };
        let p = 2.0 * (1.0 - normal.cdf(z));
        (p.clamp(0.0, 1.0), n)
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub baseline: String,
    pub agents: Vec<AgentReport>,
    pub comparisons: Vec<ComparisonReport>,
}

impl AnalyticsSummary {
    pub fn enrich(mut self) -> Self {
        let baseline_mean = self
            .agents
            .iter()
            .find(|agent| agent.name == self.baseline)
            .map(|agent| agent.mean_actions)
            .unwrap_or(0.0);

        for agent in &mut self.agents {
            agent.delta_vs_baseline = agent.mean_actions - baseline_mean;
        }

        self
    }

    pub fn to_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Hunt Summary\n\n");
        rows.push_str(&format!(
            "Baseline: `{}` (fewer actions is better)\n\n",
            self.baseline
        ));
        rows.push_str("| Agent | Strategy | Trials | Found % | Mean actions | Δ vs baseline | 95% CI | Blocked/trial | Avg ms | p-value |\n");
        rows.push_str("|-------|----------|--------|---------|--------------|----------------|--------|---------------|--------|---------|\n");

        for agent in &self.agents {
            let p_value = self
                .comparisons
                .iter()
                .find(|c| c.agent == agent.name)
                .map(|c| c.p_value)
                .unwrap_or(1.0);

            rows.push_str(&format!(
                "| {name} | {strategy} | {trials} | {found:.1}% | {mean:.1} | {delta:+.1} | [{ci_low:.1}, {ci_high:.1}] | {blocked:.2} | {elapsed:.2} | {pval:.3} |\n",
                name = agent.name,
                strategy = agent.strategy,
                trials = agent.trials,
                found = agent.found_rate * 100.0,
                mean = agent.mean_actions,
                delta = agent.delta_vs_baseline,
                ci_low = agent.ci95.0,
                ci_high = agent.ci95.1,
                blocked = agent.mean_blocked_hits,
                elapsed = agent.average_elapsed_ms,
                pval = p_value,
            ));
        }

        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.to_markdown()).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub strategy: Strategy,
    pub trials: usize,
    pub found_rate: f64,
    pub mean_actions: f64,
    pub ci95: (f64, f64),
    pub mean_blocked_hits: f64,
    pub average_elapsed_ms: f64,
    #[serde(skip)]
    pub delta_vs_baseline: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub agent: String,
    pub p_value: f64,
    pub sample_size: usize,
}

fn confidence_interval(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean = points.iter().sum::<f64>() / points.len() as f64;
    if points.len() == 1 {
        return (mean, mean);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    let std_error = (variance / points.len() as f64).sqrt();
    let margin = CONFIDENCE_Z * std_error;
    (mean - margin, mean + margin)
}
