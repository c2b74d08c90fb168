//! Load proposals from CSV and single inputs from JSON

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::Reader;
use thiserror::Error;

use super::data::{ProjectionInput, Proposal, ProposalDetails, ProposalForm};
use super::validation::{validate_all, ValidationErrors};

/// Default location of the batch proposal file
pub const DEFAULT_PROPOSALS_PATH: &str = "data/proposals.csv";

/// Failure while reading proposal or config files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed proposal CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("proposal {proposal_id} is invalid: {errors}")]
    InvalidProposal {
        proposal_id: u32,
        #[source]
        errors: ValidationErrors,
    },

    #[error("projection input is invalid: {0}")]
    InvalidInput(#[from] ValidationErrors),
}

/// Raw CSV row; numeric columns may be blank and are caught by validation
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    proposal_id: u32,
    current_age: Option<i64>,
    retirement_age: Option<i64>,
    current_production: Option<i64>,
    current_payout_rate: Option<f64>,
    production_growth_rate: Option<f64>,
    new_payout_rate: Option<f64>,
    bonus_amount: Option<i64>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    recruiting_firm: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    producer: Option<String>,
    #[serde(default)]
    new_firm: Option<String>,
}

impl CsvRow {
    fn into_form(self) -> (u32, ProposalForm) {
        let form = ProposalForm {
            details: ProposalDetails {
                date: self.date,
                recruiting_firm: self.recruiting_firm,
                phone: self.phone,
                email: self.email,
                producer: self.producer,
                new_firm: self.new_firm,
            },
            current_age: self.current_age,
            retirement_age: self.retirement_age,
            current_production: self.current_production,
            current_payout_rate: self.current_payout_rate,
            production_growth_rate: self.production_growth_rate,
            new_payout_rate: self.new_payout_rate,
            bonus_amount: self.bonus_amount,
        };
        (self.proposal_id, form)
    }

    fn into_proposal(self) -> Result<Proposal, LoadError> {
        let (proposal_id, form) = self.into_form();
        let input = validate_all(&form)
            .map_err(|errors| LoadError::InvalidProposal { proposal_id, errors })?;

        Ok(Proposal {
            proposal_id,
            details: form.details,
            input,
        })
    }
}

/// Load and validate proposals from a CSV file
pub fn load_proposals<P: AsRef<Path>>(path: P) -> Result<Vec<Proposal>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let proposals = load_proposals_from_reader(file)?;

    log::info!("loaded {} proposals from {}", proposals.len(), path.display());
    Ok(proposals)
}

/// Load proposals from any reader (e.g., string buffer, request body)
pub fn load_proposals_from_reader<R: Read>(reader: R) -> Result<Vec<Proposal>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut proposals = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        proposals.push(row.into_proposal()?);
    }

    Ok(proposals)
}

/// Load proposals from the default data/proposals.csv location
pub fn load_default_proposals() -> Result<Vec<Proposal>, LoadError> {
    load_proposals(DEFAULT_PROPOSALS_PATH)
}

/// Load a single projection input from JSON and validate it
pub fn load_input_json<P: AsRef<Path>>(path: P) -> Result<ProjectionInput, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let input: ProjectionInput = serde_json::from_reader(file).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(validate_all(&ProposalForm::from(&input))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "proposal_id,current_age,retirement_age,current_production,current_payout_rate,production_growth_rate,new_payout_rate,bonus_amount,producer,email";

    #[test]
    fn test_load_from_reader() {
        let data = format!(
            "{}\n1,40,45,1000000,40,5,50,100000,Jordan Reyes,jordan@example.com\n2,35,65,2500000,38,4,45,750000,,\n",
            HEADER
        );
        let proposals = load_proposals_from_reader(data.as_bytes()).unwrap();

        assert_eq!(proposals.len(), 2);
        assert_eq!(proposals[0].proposal_id, 1);
        assert_eq!(proposals[0].input.current_production, 1_000_000);
        assert_eq!(proposals[0].details.producer.as_deref(), Some("Jordan Reyes"));
        assert_eq!(proposals[1].input.retirement_age, 65);
        assert_eq!(proposals[1].details.email, None);
    }

    #[test]
    fn test_invalid_row_names_proposal() {
        let data = format!("{}\n7,40,45,1000000,40,5,150,100000,,\n", HEADER);
        let err = load_proposals_from_reader(data.as_bytes()).unwrap_err();

        match err {
            LoadError::InvalidProposal { proposal_id, errors } => {
                assert_eq!(proposal_id, 7);
                assert_eq!(errors.for_field("new_payout_rate").len(), 1);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_blank_required_column() {
        let data = format!("{}\n3,40,,1000000,40,5,50,100000,,\n", HEADER);
        let err = load_proposals_from_reader(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("retirement_age is required"));
    }

    #[test]
    fn test_load_default_proposals() {
        let proposals = load_default_proposals().unwrap();
        assert_eq!(proposals.len(), 4);
        assert_eq!(proposals[0].proposal_id, 1);
    }

    #[test]
    fn test_missing_file() {
        let err = load_proposals("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
