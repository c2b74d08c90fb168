//! CSV export and plain-text preview of projection results

use std::fmt::Write as _;
use std::io::Write;

use serde::Serialize;

use crate::projection::{ProjectionResult, ProjectionTable};
use crate::scenario::BatchOutcome;

/// One line of the batch summary file
#[derive(Debug, Serialize)]
struct SummaryRecord<'a> {
    proposal_id: u32,
    horizon_years: Option<u32>,
    capitalized_bonus: Option<i64>,
    capitalized_payout: Option<i64>,
    capitalized_total: Option<i64>,
    error: Option<&'a str>,
}

/// Write the table, one record per sampled year in table order.
/// Absent values are written as empty cells.
pub fn write_table_csv<W: Write>(writer: W, table: &ProjectionTable) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in table {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write one summary record per proposal; failed proposals carry the error text
pub fn write_summary_csv<W: Write>(writer: W, outcomes: &[BatchOutcome]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    for (proposal_id, outcome) in outcomes {
        let message;
        let record = match outcome {
            Ok(result) => SummaryRecord {
                proposal_id: *proposal_id,
                horizon_years: Some(result.capitalized.horizon_years),
                capitalized_bonus: Some(result.capitalized.capitalized_bonus),
                capitalized_payout: Some(result.capitalized.capitalized_payout),
                capitalized_total: Some(result.capitalized.capitalized_total),
                error: None,
            },
            Err(err) => {
                message = err.to_string();
                SummaryRecord {
                    proposal_id: *proposal_id,
                    horizon_years: None,
                    capitalized_bonus: None,
                    capitalized_payout: None,
                    capitalized_total: None,
                    error: Some(&message),
                }
            }
        };
        wtr.serialize(record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Fixed-width preview of the table and capitalized summary
pub fn render_table(result: &ProjectionResult) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:>4} {:>4} {:>14} {:>14} {:>14} {:>12} {:>14} {:>12}",
        "Year", "Age", "Gross Prod", "Current Pay", "New Pay", "Additional", "After Tax", "Bonus"
    );
    let _ = writeln!(out, "{}", "-".repeat(95));

    for row in &result.table {
        let _ = writeln!(
            out,
            "{:>4} {:>4} {:>14} {:>14} {:>14} {:>12} {:>14} {:>12}",
            row.year,
            row.age,
            row.gross_production,
            row.current_payout_value,
            cell(row.new_payout_value),
            cell(row.additional_payout),
            cell(row.additional_payout_after_tax.map(|v| format!("{:.2}", v))),
            cell(row.bonus_amount),
        );
    }

    let c = &result.capitalized;
    let _ = writeln!(out);
    let _ = writeln!(out, "Capitalized at retirement ({} years):", c.horizon_years);
    let _ = writeln!(out, "  Bonus:  {:>14}", c.capitalized_bonus);
    let _ = writeln!(out, "  Payout: {:>14}", c.capitalized_payout);
    let _ = writeln!(out, "  Total:  {:>14}", c.capitalized_total);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{project, ProjectionError};
    use crate::proposal::ProjectionInput;

    fn sample_result() -> ProjectionResult {
        project(&ProjectionInput {
            current_age: 40,
            retirement_age: 42,
            current_production: 1_000_000,
            current_payout_rate: 40.0,
            production_growth_rate: 0.0,
            new_payout_rate: 50.0,
            bonus_amount: 100_000,
        })
        .unwrap()
    }

    #[test]
    fn test_table_csv_layout() {
        let mut buf = Vec::new();
        write_table_csv(&mut buf, &sample_result().table).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "year,age,gross_production,current_payout_value,new_payout_value,additional_payout,additional_payout_after_tax,bonus_amount"
        );
        assert_eq!(lines[1], "0,40,1000000,400000,,,,100000");
        assert_eq!(lines[2], "1,41,1000000,400000,500000,100000,60000.0,");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_summary_csv_reports_errors() {
        let outcomes: Vec<BatchOutcome> = vec![
            (1, Ok(sample_result())),
            (2, Err(ProjectionError::InvalidHorizon { current_age: 50, retirement_age: 45 })),
        ];

        let mut buf = Vec::new();
        write_summary_csv(&mut buf, &outcomes).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "proposal_id,horizon_years,capitalized_bonus,capitalized_payout,capitalized_total,error"
        );
        assert!(lines[1].starts_with("1,2,110250,"));
        assert!(lines[2].starts_with("2,,,,,"));
        assert!(lines[2].contains("precedes current age 50"));
    }

    #[test]
    fn test_render_marks_absent_cells() {
        let text = render_table(&sample_result());
        let present_line = text.lines().nth(2).unwrap();

        assert!(present_line.trim_start().starts_with("0"));
        assert_eq!(present_line.matches(" -").count(), 3);
        assert!(text.contains("Capitalized at retirement (2 years):"));
    }
}
