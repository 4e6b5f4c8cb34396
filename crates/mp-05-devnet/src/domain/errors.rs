use mp_04_validator::{Rejection, ValidationOutcome};
use thiserror::Error;

/// Why the devnet refused a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The consumed record is not live: never existed or already replaced.
    #[error("Dead input: {out_point}")]
    DeadInput { out_point: String },

    /// The validator rejected the transition.
    #[error("Transition rejected: {0}")]
    Rejected(#[from] Rejection),
}

impl SubmitError {
    /// Validator outcome, when the validator ran.
    pub fn outcome(&self) -> Option<ValidationOutcome> {
        match self {
            Self::DeadInput { .. } => None,
            Self::Rejected(rejection) => Some(rejection.outcome()),
        }
    }

    /// Label for the `outcome` metric dimension.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DeadInput { .. } => "dead_input",
            Self::Rejected(rejection) => rejection.outcome().as_str(),
        }
    }
}
