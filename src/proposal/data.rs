//! Proposal data structures matching the transition wizard fields

use serde::{Deserialize, Serialize};

/// Validated inputs consumed by the projection engine.
///
/// Rates are percentages (40.0 = 40%). Money amounts are whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Producer's age today
    #[serde(alias = "currentAge")]
    pub current_age: u8,

    /// Age at which the producer expects to retire
    #[serde(alias = "retirementAge")]
    pub retirement_age: u8,

    /// Annual gross production today
    #[serde(alias = "currentProduction")]
    pub current_production: i64,

    /// Payout percentage at the current firm
    #[serde(alias = "currentPayoutRate")]
    pub current_payout_rate: f64,

    /// Assumed annual growth of production, compounded
    #[serde(alias = "productionGrowthRate")]
    pub production_growth_rate: f64,

    /// Payout percentage offered by the new firm
    #[serde(alias = "newPayoutRate")]
    pub new_payout_rate: f64,

    /// Signing or transition bonus paid up front
    #[serde(alias = "bonusAmount")]
    pub bonus_amount: i64,
}

impl ProjectionInput {
    /// Years until retirement; negative when retirement age precedes current age
    pub fn projection_length(&self) -> i32 {
        i32::from(self.retirement_age) - i32::from(self.current_age)
    }

    /// Annual production growth as a decimal rate
    pub fn growth_rate(&self) -> f64 {
        self.production_growth_rate / 100.0
    }

    /// Difference between new and current payout, as a decimal rate
    pub fn payout_spread(&self) -> f64 {
        (self.new_payout_rate - self.current_payout_rate) / 100.0
    }

    /// Copy of this input with a different growth assumption
    pub fn with_growth_rate(&self, production_growth_rate: f64) -> Self {
        Self {
            production_growth_rate,
            ..self.clone()
        }
    }
}

/// Descriptive fields collected alongside the projection inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalDetails {
    pub date: Option<String>,
    pub recruiting_firm: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub producer: Option<String>,
    pub new_firm: Option<String>,
}

/// A complete proposal as loaded for batch runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// Unique proposal identifier
    pub proposal_id: u32,

    pub details: ProposalDetails,

    pub input: ProjectionInput,
}

/// Raw wizard input before validation; any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalForm {
    #[serde(default)]
    pub details: ProposalDetails,

    pub current_age: Option<i64>,
    pub retirement_age: Option<i64>,
    pub current_production: Option<i64>,
    pub current_payout_rate: Option<f64>,
    pub production_growth_rate: Option<f64>,
    pub new_payout_rate: Option<f64>,
    pub bonus_amount: Option<i64>,
}

impl From<&ProjectionInput> for ProposalForm {
    fn from(input: &ProjectionInput) -> Self {
        Self {
            details: ProposalDetails::default(),
            current_age: Some(i64::from(input.current_age)),
            retirement_age: Some(i64::from(input.retirement_age)),
            current_production: Some(input.current_production),
            current_payout_rate: Some(input.current_payout_rate),
            production_growth_rate: Some(input.production_growth_rate),
            new_payout_rate: Some(input.new_payout_rate),
            bonus_amount: Some(input.bonus_amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> ProjectionInput {
        ProjectionInput {
            current_age: 40,
            retirement_age: 45,
            current_production: 1_000_000,
            current_payout_rate: 40.0,
            production_growth_rate: 5.0,
            new_payout_rate: 50.0,
            bonus_amount: 100_000,
        }
    }

    #[test]
    fn test_projection_length() {
        let mut input = sample_input();
        assert_eq!(input.projection_length(), 5);

        input.retirement_age = 38;
        assert_eq!(input.projection_length(), -2);
    }

    #[test]
    fn test_rates_as_decimals() {
        let input = sample_input();
        assert!((input.growth_rate() - 0.05).abs() < 1e-12);
        assert!((input.payout_spread() - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_camel_case_aliases() {
        let json = r#"{
            "currentAge": 40, "retirementAge": 45, "currentProduction": 1000000,
            "currentPayoutRate": 40, "productionGrowthRate": 5,
            "newPayoutRate": 50, "bonusAmount": 100000
        }"#;
        let input: ProjectionInput = serde_json::from_str(json).unwrap();
        assert_eq!(input, sample_input());
    }
}
