//! Scenario runner for batch and sensitivity projections
//!
//! Holds one projection config and applies it across many proposals, or
//! across alternative growth assumptions for a single proposal.

use std::path::Path;

use rayon::prelude::*;

use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionError, ProjectionResult};
use crate::proposal::{LoadError, ProjectionInput, Proposal};

/// Outcome of projecting one proposal in a batch
pub type BatchOutcome = (u32, Result<ProjectionResult, ProjectionError>);

/// Outcome of projecting one growth assumption
pub type GrowthOutcome = (f64, Result<ProjectionResult, ProjectionError>);

/// Pre-configured scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
///
/// for (growth, result) in runner.run_growth_scenarios(&input, &[0.0, 3.0, 6.0]) {
///     println!("{growth}% -> {:?}", result.map(|r| r.capitalized.capitalized_total));
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: ProjectionConfig,
}

impl ScenarioRunner {
    /// Create runner with the default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner with a specific config
    pub fn with_config(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Create runner from a JSON config file
    pub fn from_json_path(path: &Path) -> Result<Self, LoadError> {
        Ok(Self::with_config(ProjectionConfig::from_json_path(path)?))
    }

    fn engine(&self) -> ProjectionEngine {
        ProjectionEngine::new(self.config.clone())
    }

    /// Run a single projection
    pub fn run(&self, input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
        self.engine().project(input)
    }

    /// Run projections for many proposals in parallel.
    ///
    /// Results come back in input order, tagged with the proposal id. A failing
    /// proposal does not stop the others.
    pub fn run_batch(&self, proposals: &[Proposal]) -> Vec<BatchOutcome> {
        let engine = self.engine();
        let outcomes: Vec<BatchOutcome> = proposals
            .par_iter()
            .map(|p| (p.proposal_id, engine.project(&p.input)))
            .collect();

        let failed = outcomes.iter().filter(|(_, r)| r.is_err()).count();
        if failed > 0 {
            log::warn!("{} of {} proposals failed to project", failed, outcomes.len());
        }

        outcomes
    }

    /// Re-project one proposal under alternative growth rates (percent)
    pub fn run_growth_scenarios(&self, input: &ProjectionInput, growth_rates: &[f64]) -> Vec<GrowthOutcome> {
        let engine = self.engine();
        growth_rates
            .iter()
            .map(|&rate| (rate, engine.project(&input.with_growth_rate(rate))))
            .collect()
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ProjectionConfig {
        &mut self.config
    }
}
