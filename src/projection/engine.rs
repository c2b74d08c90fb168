//! Core projection engine: sampled year table plus capitalized summary

use std::fs::File;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::proposal::{LoadError, ProjectionInput};
use super::capitalized::{CapitalizedSummary, CapitalizedValuator, DegenerateGrowth};
use super::error::ProjectionError;
use super::round_currency;
use super::table::{ProjectionRow, ProjectionTable};
use super::timeframe::sample_timeframe;

/// Flat income tax applied to the additional payout
pub const DEFAULT_INCOME_TAX_RATE: f64 = 0.4;

/// Rate at which the bonus and payout stream are carried to retirement
pub const DEFAULT_CAPITALIZATION_RATE: f64 = 0.05;

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Flat tax rate on additional payout (decimal)
    pub income_tax_rate: f64,

    /// Annual capitalization rate (decimal)
    pub capitalization_rate: f64,

    /// Handling of a growth rate equal to the capitalization rate
    pub degenerate_growth: DegenerateGrowth,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            income_tax_rate: DEFAULT_INCOME_TAX_RATE,
            capitalization_rate: DEFAULT_CAPITALIZATION_RATE,
            degenerate_growth: DegenerateGrowth::AnalyticLimit,
        }
    }
}

impl ProjectionConfig {
    /// Load a config from a JSON file; missing keys keep their defaults
    pub fn from_json_path(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(file).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Complete projection result for one proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Sampled year rows, ascending by year
    pub table: ProjectionTable,

    /// Capitalized value at retirement
    pub capitalized: CapitalizedSummary,
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Sample the horizon, build the table and value the proposal
    pub fn project(&self, input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
        let span = input.projection_length();
        if span < 0 {
            return Err(ProjectionError::InvalidHorizon {
                current_age: input.current_age,
                retirement_age: input.retirement_age,
            });
        }

        let years = sample_timeframe(span);
        let table = self.build_table(input, &years);
        let capitalized = self.valuate(input)?;

        debug!(
            "projected {} sampled years to age {}: capitalized total {}",
            table.len(),
            input.retirement_age,
            capitalized.capitalized_total
        );

        Ok(ProjectionResult { table, capitalized })
    }

    /// Build the year table for the given sample years.
    ///
    /// Each year is computed independently from the input. The year-0 row then
    /// drops the new-firm figures, which have no meaning before the move, and
    /// carries the bonus instead.
    pub fn build_table(&self, input: &ProjectionInput, years: &[u32]) -> ProjectionTable {
        let mut table = ProjectionTable::new();

        for &year in years {
            table.insert(self.calculate_year(input, year));
        }

        if let Some(present) = table.get_mut(0) {
            present.new_payout_value = None;
            present.additional_payout = None;
            present.additional_payout_after_tax = None;
            present.bonus_amount = Some(input.bonus_amount);
        }

        table
    }

    /// Capitalized bonus and payout at retirement
    pub fn valuate(&self, input: &ProjectionInput) -> Result<CapitalizedSummary, ProjectionError> {
        CapitalizedValuator::from_config(&self.config).valuate(input)
    }

    /// Figures for a single year offset
    fn calculate_year(&self, input: &ProjectionInput, year: u32) -> ProjectionRow {
        let growth = (1.0 + input.growth_rate()).powf(year as f64);
        let gross_production = round_currency(input.current_production as f64 * growth);

        let current_payout_value =
            round_currency(gross_production as f64 * (input.current_payout_rate / 100.0));
        let new_payout_value =
            round_currency(gross_production as f64 * (input.new_payout_rate / 100.0));

        let additional_payout = new_payout_value - current_payout_value;
        let additional_payout_after_tax =
            additional_payout as f64 * (1.0 - self.config.income_tax_rate);

        ProjectionRow {
            year,
            age: u32::from(input.current_age) + year,
            gross_production,
            current_payout_value,
            new_payout_value: Some(new_payout_value),
            additional_payout: Some(additional_payout),
            additional_payout_after_tax: Some(additional_payout_after_tax),
            bonus_amount: None,
        }
    }
}

/// Project with the default configuration
pub fn project(input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
    ProjectionEngine::default().project(input)
}
