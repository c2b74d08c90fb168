//! Run projections for every proposal in a CSV file
//!
//! Outputs one capitalized summary line per proposal

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use transition_proposal::{
    proposal::{load_default_proposals, load_proposals, loader::DEFAULT_PROPOSALS_PATH},
    report::write_summary_csv,
    ScenarioRunner,
};

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Project every proposal in a CSV file")]
struct Args {
    /// Proposals CSV (defaults to data/proposals.csv)
    #[arg(long)]
    proposals: Option<PathBuf>,

    /// Projection config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Summary CSV to write
    #[arg(long, default_value = "batch_summary.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let proposals = match &args.proposals {
        Some(path) => {
            println!("Loading proposals from {}...", path.display());
            load_proposals(path)
        }
        None => {
            println!("Loading proposals from {}...", DEFAULT_PROPOSALS_PATH);
            load_default_proposals()
        }
    }
    .context("failed to load proposals")?;
    println!("Loaded {} proposals in {:?}", proposals.len(), start.elapsed());

    let runner = match &args.config {
        Some(path) => ScenarioRunner::from_json_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ScenarioRunner::new(),
    };

    println!("Running projections...");
    let proj_start = Instant::now();
    let outcomes = runner.run_batch(&proposals);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    write_summary_csv(file, &outcomes)?;
    println!("Output written to {}", args.output.display());

    // Print summary stats
    let succeeded: Vec<_> = outcomes.iter().filter_map(|(_, r)| r.as_ref().ok()).collect();
    let total: i64 = succeeded.iter().map(|r| r.capitalized.capitalized_total).sum();

    println!("\nBatch Summary:");
    println!("  Projected: {} of {}", succeeded.len(), outcomes.len());
    println!("  Combined capitalized total: {}", total);
    for (proposal_id, outcome) in &outcomes {
        if let Err(err) = outcome {
            println!("  Proposal {}: {}", proposal_id, err);
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
