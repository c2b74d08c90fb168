//! Transition Proposal CLI
//!
//! Command-line interface for projecting a single proposal

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use transition_proposal::{
    projection::{DegenerateGrowth, ProjectionConfig, ProjectionEngine},
    proposal::{load_input_json, validate_all, ProposalForm},
    report::{render_table, write_table_csv},
};

#[derive(Debug, Parser)]
#[command(name = "transition_proposal", about = "Project current vs. proposed payout to retirement")]
struct Args {
    /// Read inputs from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["current_age", "retirement_age", "current_production"])]
    input: Option<PathBuf>,

    #[arg(long)]
    current_age: Option<i64>,

    #[arg(long)]
    retirement_age: Option<i64>,

    #[arg(long)]
    current_production: Option<i64>,

    /// Current payout, percent
    #[arg(long)]
    current_payout: Option<f64>,

    /// Annual production growth, percent
    #[arg(long)]
    growth: Option<f64>,

    /// Proposed payout, percent
    #[arg(long)]
    new_payout: Option<f64>,

    #[arg(long)]
    bonus: Option<i64>,

    /// Projection config JSON (tax and capitalization rates)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail instead of using the analytic limit when growth equals the capitalization rate
    #[arg(long)]
    strict_growth: bool,

    /// Write the table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the full result as JSON instead of the text table
    #[arg(long)]
    json: bool,
}

/// Wizard form from the input flags; absent flags stay absent for validation
fn form_from_args(args: &Args) -> ProposalForm {
    ProposalForm {
        current_age: args.current_age,
        retirement_age: args.retirement_age,
        current_production: args.current_production,
        current_payout_rate: args.current_payout,
        production_growth_rate: args.growth,
        new_payout_rate: args.new_payout,
        bonus_amount: args.bonus,
        ..ProposalForm::default()
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let input = match &args.input {
        Some(path) => load_input_json(path)
            .with_context(|| format!("loading input from {}", path.display()))?,
        None => validate_all(&form_from_args(&args)).context("invalid proposal inputs")?,
    };

    let mut config = match &args.config {
        Some(path) => ProjectionConfig::from_json_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ProjectionConfig::default(),
    };
    if args.strict_growth {
        config.degenerate_growth = DegenerateGrowth::Reject;
    }

    let engine = ProjectionEngine::new(config);
    let result = engine.project(&input).context("projection failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Transition Proposal v0.1.0");
        println!("==========================\n");
        println!(
            "Producer age {} retiring at {}, production {}",
            input.current_age, input.retirement_age, input.current_production
        );
        println!(
            "Payout {}% -> {}%, growth {}%\n",
            input.current_payout_rate, input.new_payout_rate, input.production_growth_rate
        );
        print!("{}", render_table(&result));
    }

    if let Some(path) = &args.csv {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_table_csv(file, &result.table)?;
        eprintln!("Table written to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use transition_proposal::proposal::FieldErrorKind;

    const BASE_FLAGS: [&str; 9] = [
        "transition_proposal",
        "--current-age", "40",
        "--retirement-age", "45",
        "--current-production", "1000000",
        "--current-payout", "40",
    ];

    fn parse(extra: &[&str]) -> Args {
        let flags: Vec<&str> = BASE_FLAGS.iter().chain(extra).copied().collect();
        Args::try_parse_from(flags).unwrap()
    }

    #[test]
    fn test_growth_and_bonus_are_required() {
        let args = parse(&["--new-payout", "50"]);
        let errors = validate_all(&form_from_args(&args)).unwrap_err();

        assert_eq!(errors.for_field("production_growth_rate")[0].kind, FieldErrorKind::Missing);
        assert_eq!(errors.for_field("bonus_amount")[0].kind, FieldErrorKind::Missing);
        assert_eq!(errors.errors.len(), 2);
    }

    #[test]
    fn test_complete_flags_validate() {
        let args = parse(&["--new-payout", "50", "--growth", "0", "--bonus", "100000"]);
        let input = validate_all(&form_from_args(&args)).unwrap();

        assert_eq!(input.production_growth_rate, 0.0);
        assert_eq!(input.bonus_amount, 100_000);
    }
}
