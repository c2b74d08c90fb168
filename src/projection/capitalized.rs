//! Capitalized value at retirement of the bonus and the incremental payout
//!
//! Both figures are accumulated to the retirement date at a fixed
//! capitalization rate, independent of the sampled table years:
//! - Bonus: `bonus * (1 + r)^n`
//! - Payout: after-tax incremental payout treated as a growing annuity,
//!   `p * ((1 + r)^n - (1 + g)^n) / (r - g)`, evaluated as the equivalent
//!   sum `p * sum_{k<n} (1 + r)^(n-1-k) (1 + g)^k`

use serde::{Deserialize, Serialize};

use crate::proposal::ProjectionInput;
use super::engine::ProjectionConfig;
use super::error::ProjectionError;
use super::round_currency;

/// Below this gap the growth and capitalization rates are treated as equal
const RATE_EQUALITY_TOLERANCE: f64 = 1e-12;

/// What to do when the growth rate equals the capitalization rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegenerateGrowth {
    /// Use the limit of the annuity factor, `n * (1 + r)^(n - 1)`
    #[default]
    AnalyticLimit,
    /// Fail with `ProjectionError::DegenerateGrowthRate`
    Reject,
}

/// Capitalized figures for one proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalizedSummary {
    /// Years from today to retirement
    pub horizon_years: u32,

    pub capitalized_bonus: i64,
    pub capitalized_payout: i64,

    /// Always `capitalized_bonus + capitalized_payout`
    pub capitalized_total: i64,
}

/// Future-value factor of a growing annuity over `years` periods.
///
/// The closed form is undefined when `growth == rate`; `policy` decides
/// between the analytic limit and an error. Otherwise the factor is summed
/// term by term, which stays accurate when the two rates are close.
pub fn growing_annuity_factor(
    rate: f64,
    growth: f64,
    years: u32,
    policy: DegenerateGrowth,
) -> Result<f64, ProjectionError> {
    let n = years as f64;

    if (rate - growth).abs() < RATE_EQUALITY_TOLERANCE {
        return match policy {
            DegenerateGrowth::AnalyticLimit => {
                log::warn!(
                    "growth rate {:.4} equals capitalization rate; using analytic limit",
                    growth
                );
                Ok(n * (1.0 + rate).powf(n - 1.0))
            }
            DegenerateGrowth::Reject => Err(ProjectionError::DegenerateGrowthRate {
                field: "production_growth_rate",
                rate: growth * 100.0,
            }),
        };
    }

    // Horner form of sum_{k<n} (1 + r)^(n-1-k) (1 + g)^k
    let mut factor = 0.0;
    let mut growth_power = 1.0;
    for _ in 0..years {
        factor = factor * (1.0 + rate) + growth_power;
        growth_power *= 1.0 + growth;
    }

    Ok(factor)
}

/// Computes the capitalized bonus and payout for a proposal
#[derive(Debug, Clone)]
pub struct CapitalizedValuator {
    capitalization_rate: f64,
    income_tax_rate: f64,
    degenerate_growth: DegenerateGrowth,
}

impl CapitalizedValuator {
    pub fn from_config(config: &ProjectionConfig) -> Self {
        Self {
            capitalization_rate: config.capitalization_rate,
            income_tax_rate: config.income_tax_rate,
            degenerate_growth: config.degenerate_growth,
        }
    }

    /// Value the bonus and incremental payout at the retirement date
    pub fn valuate(&self, input: &ProjectionInput) -> Result<CapitalizedSummary, ProjectionError> {
        let span = input.projection_length();
        if span < 0 {
            return Err(ProjectionError::InvalidHorizon {
                current_age: input.current_age,
                retirement_age: input.retirement_age,
            });
        }
        let years = span as u32;

        let capitalized_bonus = self.capitalize_bonus(input.bonus_amount, years);
        let capitalized_payout = self.capitalize_payout(input, years)?;

        Ok(CapitalizedSummary {
            horizon_years: years,
            capitalized_bonus,
            capitalized_payout,
            capitalized_total: capitalized_bonus + capitalized_payout,
        })
    }

    fn capitalize_bonus(&self, bonus_amount: i64, years: u32) -> i64 {
        round_currency(bonus_amount as f64 * (1.0 + self.capitalization_rate).powf(years as f64))
    }

    fn capitalize_payout(&self, input: &ProjectionInput, years: u32) -> Result<i64, ProjectionError> {
        let growth = input.growth_rate();

        // First-year payment: next year's production at the new spread, after tax
        let payment = input.payout_spread()
            * (input.current_production as f64 * (1.0 + growth))
            * (1.0 - self.income_tax_rate);

        let factor = growing_annuity_factor(
            self.capitalization_rate,
            growth,
            years,
            self.degenerate_growth,
        )?;

        Ok(round_currency(payment * factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_input(growth: f64) -> ProjectionInput {
        ProjectionInput {
            current_age: 40,
            retirement_age: 45,
            current_production: 1_000_000,
            current_payout_rate: 40.0,
            production_growth_rate: growth,
            new_payout_rate: 50.0,
            bonus_amount: 100_000,
        }
    }

    fn valuator(policy: DegenerateGrowth) -> CapitalizedValuator {
        CapitalizedValuator::from_config(&ProjectionConfig {
            degenerate_growth: policy,
            ..ProjectionConfig::default()
        })
    }

    #[test]
    fn test_annuity_factor_without_growth() {
        // Level annuity: ((1.05)^5 - 1) / 0.05
        let factor = growing_annuity_factor(0.05, 0.0, 5, DegenerateGrowth::Reject).unwrap();
        assert_relative_eq!(factor, 5.52563125, epsilon = 1e-9);
    }

    #[test]
    fn test_annuity_factor_limit_is_continuous() {
        let limit = growing_annuity_factor(0.05, 0.05, 5, DegenerateGrowth::AnalyticLimit).unwrap();
        let near = growing_annuity_factor(0.05, 0.05 - 1e-7, 5, DegenerateGrowth::Reject).unwrap();
        assert_relative_eq!(limit, 6.07753125, epsilon = 1e-9);
        assert_relative_eq!(limit, near, epsilon = 1e-5);
    }

    #[test]
    fn test_annuity_factor_just_outside_tolerance() {
        for gap in [2e-12, 1e-11, 1e-10, 1e-9] {
            let factor =
                growing_annuity_factor(0.05, 0.05 - gap, 5, DegenerateGrowth::Reject).unwrap();
            assert_relative_eq!(factor, 6.07753125, epsilon = 1e-8);
        }

        // Capitalized payout for the 1,000,000 / 40% -> 50% proposal stays on the limit
        let summary = valuator(DegenerateGrowth::Reject)
            .valuate(&sample_input(4.999999999))
            .unwrap();
        assert_eq!(summary.capitalized_payout, 382_884);
    }

    #[test]
    fn test_annuity_factor_zero_years() {
        let factor = growing_annuity_factor(0.05, 0.03, 0, DegenerateGrowth::Reject).unwrap();
        assert_eq!(factor, 0.0);
    }

    #[test]
    fn test_valuate_growing_payout() {
        let summary = valuator(DegenerateGrowth::Reject).valuate(&sample_input(3.0)).unwrap();

        assert_eq!(summary.horizon_years, 5);
        assert_eq!(summary.capitalized_bonus, 127_628);
        assert_eq!(summary.capitalized_payout, 361_553);
        assert_eq!(summary.capitalized_total, 489_181);
    }

    #[test]
    fn test_valuate_flat_production() {
        let summary = valuator(DegenerateGrowth::Reject).valuate(&sample_input(0.0)).unwrap();
        assert_eq!(summary.capitalized_payout, 331_538);
        assert_eq!(summary.capitalized_total, 127_628 + 331_538);
    }

    #[test]
    fn test_degenerate_growth_uses_limit_by_default() {
        let summary = valuator(DegenerateGrowth::AnalyticLimit)
            .valuate(&sample_input(5.0))
            .unwrap();

        // 63000 * 5 * 1.05^4
        assert_eq!(summary.capitalized_payout, 382_884);
        assert_eq!(summary.capitalized_total, 510_512);
    }

    #[test]
    fn test_degenerate_growth_rejected() {
        let err = valuator(DegenerateGrowth::Reject)
            .valuate(&sample_input(5.0))
            .unwrap_err();

        match err {
            ProjectionError::DegenerateGrowthRate { field, rate } => {
                assert_eq!(field, "production_growth_rate");
                assert_relative_eq!(rate, 5.0, epsilon = 1e-9);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_zero_horizon() {
        let mut input = sample_input(3.0);
        input.retirement_age = input.current_age;

        let summary = valuator(DegenerateGrowth::Reject).valuate(&input).unwrap();
        assert_eq!(summary.horizon_years, 0);
        assert_eq!(summary.capitalized_bonus, 100_000);
        assert_eq!(summary.capitalized_payout, 0);
        assert_eq!(summary.capitalized_total, 100_000);
    }

    #[test]
    fn test_negative_horizon_rejected() {
        let mut input = sample_input(3.0);
        input.retirement_age = 38;

        let err = valuator(DegenerateGrowth::AnalyticLimit).valuate(&input).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::InvalidHorizon { current_age: 40, retirement_age: 38 }
        );
    }

    #[test]
    fn test_payout_cut_gives_negative_capitalized_payout() {
        let mut input = sample_input(3.0);
        input.new_payout_rate = 30.0;

        let summary = valuator(DegenerateGrowth::Reject).valuate(&input).unwrap();
        assert_eq!(summary.capitalized_payout, -361_553);
    }
}
