//! Error types for field edits and submissions

use crate::state::ValidationErrors;
use thiserror::Error;

/// Rejected field edit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The dotted path does not name a form field
    #[error("unknown form field `{0}`")]
    UnknownField(String),

    /// The tag is not part of the configured service catalog
    #[error("unknown service `{0}`")]
    UnknownService(String),

    /// The state code is not a subdivision of the selected country
    #[error("state `{region}` does not belong to country `{country}`")]
    UnknownRegion { country: String, region: String },
}

/// Outcome of a failed `submit()` call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Field validation failed; nothing was delivered
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(ValidationErrors),

    /// A delivery attempt is already in flight
    #[error("form is already being submitted")]
    AlreadySubmitting,

    /// The submission sink reported a failure; entered values are kept
    #[error("form submission failed: {0}")]
    Delivery(String),
}
