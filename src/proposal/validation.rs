//! Step-indexed validation of wizard input
//!
//! The wizard collects a proposal over three steps. Each step validates only
//! its own fields; the step being validated is passed in explicitly.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::data::{ProjectionInput, ProposalForm};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([^@\s]+)@((?:[-a-z0-9]+\.)+[a-z]{2,})$").expect("valid email regex")
});

/// Wizard steps in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    /// Contact details and ages
    Contact = 1,
    /// Production and payout assumptions
    Production = 2,
    /// Read-only preview of the proposal
    Preview = 3,
}

impl WizardStep {
    pub fn all() -> [WizardStep; 3] {
        [WizardStep::Contact, WizardStep::Production, WizardStep::Preview]
    }

    pub fn first() -> Self {
        WizardStep::Contact
    }

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::all().into_iter().find(|s| s.number() == number)
    }

    /// Following step, or None from the preview
    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// Preceding step; the first step stays where it is
    pub fn previous(&self) -> Self {
        Self::from_number(self.number() - 1).unwrap_or(*self)
    }

    pub fn is_first(&self) -> bool {
        *self == Self::first()
    }

    pub fn is_final(&self) -> bool {
        *self == WizardStep::Preview
    }
}

/// Why a single field failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldErrorKind {
    #[error("is required")]
    Missing,

    #[error("must be between {min} and {max}, got {value}")]
    OutOfRange { min: String, max: String, value: String },

    #[error("length must be between {min} and {max} characters, got {len}")]
    Length { min: usize, max: usize, len: usize },

    #[error("is not a valid email address")]
    Format,
}

/// A failed field together with the step that owns it
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub step: WizardStep,
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}: {} {}", self.step.number(), self.field, self.kind)
    }
}

/// All field errors found while validating
#[derive(Debug, Clone, Default, PartialEq, Error)]
#[error("{} invalid field(s): {}", .errors.len(), summarize(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors belonging to one field
    pub fn for_field(&self, field: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }
}

/// Collects errors for one step
struct StepCheck<'a> {
    step: WizardStep,
    errors: &'a mut Vec<FieldError>,
}

impl StepCheck<'_> {
    fn push(&mut self, field: &'static str, kind: FieldErrorKind) {
        self.errors.push(FieldError { step: self.step, field, kind });
    }

    /// Optional free text; blank is allowed
    fn text_length(&mut self, field: &'static str, value: &Option<String>, min: usize, max: usize) {
        if let Some(text) = value.as_deref().filter(|t| !t.trim().is_empty()) {
            let len = text.chars().count();
            if len < min || len > max {
                self.push(field, FieldErrorKind::Length { min, max, len });
            }
        }
    }

    fn email(&mut self, value: &Option<String>) {
        if let Some(text) = value.as_deref().filter(|t| !t.trim().is_empty()) {
            if !EMAIL_RE.is_match(text) {
                self.push("email", FieldErrorKind::Format);
            }
        }
        self.text_length("email", value, 7, 40);
    }

    /// Required integer within an inclusive range
    fn integer(&mut self, field: &'static str, value: Option<i64>, min: i64, max: i64) {
        match value {
            None => self.push(field, FieldErrorKind::Missing),
            Some(v) if v < min || v > max => self.push(
                field,
                FieldErrorKind::OutOfRange {
                    min: min.to_string(),
                    max: max.to_string(),
                    value: v.to_string(),
                },
            ),
            Some(_) => {}
        }
    }

    /// Required rate; `min_inclusive` controls whether the lower bound itself is allowed
    fn rate(&mut self, field: &'static str, value: Option<f64>, min: f64, min_inclusive: bool, max: f64) {
        match value {
            None => self.push(field, FieldErrorKind::Missing),
            Some(v) => {
                let above_min = if min_inclusive { v >= min } else { v > min };
                if !v.is_finite() || !above_min || v >= max {
                    self.push(
                        field,
                        FieldErrorKind::OutOfRange {
                            min: min.to_string(),
                            max: max.to_string(),
                            value: v.to_string(),
                        },
                    );
                }
            }
        }
    }
}

/// Validate the fields owned by `step`
pub fn validate_step(form: &ProposalForm, step: WizardStep) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    check_step(form, step, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

fn check_step(form: &ProposalForm, step: WizardStep, errors: &mut Vec<FieldError>) {
    let mut check = StepCheck { step, errors };
    let details = &form.details;

    match step {
        WizardStep::Contact => {
            check.text_length("date", &details.date, 3, 25);
            check.text_length("recruiting_firm", &details.recruiting_firm, 3, 40);
            check.text_length("phone", &details.phone, 3, 15);
            check.email(&details.email);
            check.text_length("producer", &details.producer, 3, 25);
            check.integer("current_age", form.current_age, 21, 69);
            check.integer("retirement_age", form.retirement_age, 26, 69);
        }
        WizardStep::Production => {
            check.integer("current_production", form.current_production, 100_001, 99_999_999);
            check.rate("current_payout_rate", form.current_payout_rate, 1.0, false, 100.0);
            check.rate("production_growth_rate", form.production_growth_rate, 0.0, true, 100.0);
            check.rate("new_payout_rate", form.new_payout_rate, 1.0, false, 100.0);
            check.integer("bonus_amount", form.bonus_amount, 0, 499_999_999);
            check.text_length("new_firm", &details.new_firm, 3, 40);
        }
        WizardStep::Preview => {}
    }
}

/// Validate every step and produce the engine input.
///
/// Errors from all steps are reported together. Retirement age not after
/// current age is not a field error; the engine reports it.
pub fn validate_all(form: &ProposalForm) -> Result<ProjectionInput, ValidationErrors> {
    let mut errors = Vec::new();
    for step in WizardStep::all() {
        check_step(form, step, &mut errors);
    }

    match required_fields(form) {
        Some(input) if errors.is_empty() => Ok(input),
        _ => Err(ValidationErrors { errors }),
    }
}

fn required_fields(form: &ProposalForm) -> Option<ProjectionInput> {
    Some(ProjectionInput {
        current_age: u8::try_from(form.current_age?).ok()?,
        retirement_age: u8::try_from(form.retirement_age?).ok()?,
        current_production: form.current_production?,
        current_payout_rate: form.current_payout_rate?,
        production_growth_rate: form.production_growth_rate?,
        new_payout_rate: form.new_payout_rate?,
        bonus_amount: form.bonus_amount?,
    })
}
