//! AWS Lambda handler for single proposal projections
//!
//! Accepts the projection inputs as JSON, with optional config overrides, and
//! returns the year table and capitalized summary.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use transition_proposal::{
    projection::{DegenerateGrowth, ProjectionConfig, ProjectionEngine, ProjectionResult},
    proposal::{validate_all, ProjectionInput, ProposalForm},
};

/// Input for one projection
#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    #[serde(flatten)]
    pub input: ProjectionInput,

    /// Flat tax on additional payout (default: 40%)
    #[serde(default)]
    pub income_tax_rate: Option<f64>,

    /// Capitalization rate (default: 5%)
    #[serde(default)]
    pub capitalization_rate: Option<f64>,

    /// Reject growth equal to the capitalization rate instead of using the limit
    #[serde(default)]
    pub strict_growth: bool,
}

/// Output from the projection
#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ProjectionResult>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn build_config(request: &ProjectionRequest) -> ProjectionConfig {
    let mut config = ProjectionConfig::default();
    if let Some(rate) = request.income_tax_rate {
        config.income_tax_rate = rate;
    }
    if let Some(rate) = request.capitalization_rate {
        config.capitalization_rate = rate;
    }
    if request.strict_growth {
        config.degenerate_growth = DegenerateGrowth::Reject;
    }
    config
}

async fn handler(event: LambdaEvent<ProjectionRequest>) -> Result<ProjectionResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;

    let outcome = validate_all(&ProposalForm::from(&request.input))
        .map_err(|e| e.to_string())
        .and_then(|input| {
            ProjectionEngine::new(build_config(&request))
                .project(&input)
                .map_err(|e| e.to_string())
        });

    let (result, error) = match outcome {
        Ok(result) => (Some(result), None),
        Err(message) => {
            log::warn!("projection request rejected: {}", message);
            (None, Some(message))
        }
    };

    Ok(ProjectionResponse {
        result,
        execution_time_ms: start.elapsed().as_millis() as u64,
        error,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
