//! Projection engine for payout comparison and capitalized valuation

mod timeframe;
mod table;
mod capitalized;
mod engine;
mod error;

pub use timeframe::{sample_timeframe, DENSE_HORIZON_YEARS};
pub use table::{ProjectionRow, ProjectionTable};
pub use capitalized::{growing_annuity_factor, CapitalizedSummary, CapitalizedValuator, DegenerateGrowth};
pub use engine::{
    project, ProjectionConfig, ProjectionEngine, ProjectionResult,
    DEFAULT_CAPITALIZATION_RATE, DEFAULT_INCOME_TAX_RATE,
};
pub use error::ProjectionError;

/// Round a currency figure to whole units, halves away from zero
pub(crate) fn round_currency(value: f64) -> i64 {
    value.round() as i64
}
