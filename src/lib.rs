//! Transition Proposal - payout projection engine for advisor moves
//!
//! This library provides:
//! - Year-by-year comparison of current and proposed payout schedules
//! - Sparse timeframe sampling for long horizons
//! - Capitalized value at retirement of the transition bonus and incremental payout
//! - Step-indexed validation of wizard input
//! - Batch and growth-sensitivity runs

pub mod proposal;
pub mod projection;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use proposal::{ProjectionInput, Proposal, ProposalForm};
pub use projection::{
    project, CapitalizedSummary, ProjectionConfig, ProjectionEngine, ProjectionError,
    ProjectionResult, ProjectionRow, ProjectionTable,
};
pub use scenario::ScenarioRunner;
