//! Error conditions raised by the projection engine

use thiserror::Error;

/// Numeric hazards the engine reports instead of producing a meaningless figure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// Retirement age precedes current age, so the horizon is negative
    #[error("retirement age {retirement_age} precedes current age {current_age}")]
    InvalidHorizon { current_age: u8, retirement_age: u8 },

    /// Growth rate equals the capitalization rate and the annuity formula has no value
    #[error("{field} of {rate}% equals the capitalization rate; growing annuity is undefined")]
    DegenerateGrowthRate { field: &'static str, rate: f64 },
}
