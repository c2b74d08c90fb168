//! Proposal inputs, wizard validation and batch loading

mod data;
pub mod loader;
pub mod validation;

pub use data::{ProjectionInput, Proposal, ProposalDetails, ProposalForm};
pub use loader::{load_default_proposals, load_input_json, load_proposals, load_proposals_from_reader, LoadError};
pub use validation::{validate_all, validate_step, FieldError, FieldErrorKind, ValidationErrors, WizardStep};
