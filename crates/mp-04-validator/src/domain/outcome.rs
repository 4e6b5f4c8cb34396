use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of validator results, each with a distinct exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    Accepted,
    MissingRecord,
    OldStateInvalid,
    NewStateInvalid,
}

impl ValidationOutcome {
    /// Process exit code of the on-chain script.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Accepted => 0,
            Self::MissingRecord => 1,
            Self::OldStateInvalid => 2,
            Self::NewStateInvalid => 3,
        }
    }

    pub fn from_exit_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Accepted),
            1 => Some(Self::MissingRecord),
            2 => Some(Self::OldStateInvalid),
            3 => Some(Self::NewStateInvalid),
            _ => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Stable label for logs and metric dimensions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::MissingRecord => "missing_record",
            Self::OldStateInvalid => "old_state_invalid",
            Self::NewStateInvalid => "new_state_invalid",
        }
    }
}

impl std::fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a transition was rejected. Every rejection is final.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// No record at the witness index, or the record does not decode.
    #[error("Missing record: {0}")]
    MissingRecord(String),

    #[error("Old state invalid: {0}")]
    OldStateInvalid(String),

    #[error("New state invalid: {0}")]
    NewStateInvalid(String),
}

impl Rejection {
    pub fn outcome(&self) -> ValidationOutcome {
        match self {
            Self::MissingRecord(_) => ValidationOutcome::MissingRecord,
            Self::OldStateInvalid(_) => ValidationOutcome::OldStateInvalid,
            Self::NewStateInvalid(_) => ValidationOutcome::NewStateInvalid,
        }
    }
}
