use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid placement {placement}: not a recognized rank and not present in the distribution")]
    InvalidPlacement { placement: u32 },

    #[error("Points earned must be set if no placement is specified")]
    MissingPoints,

    #[error("Participant '{0}' not found in roster")]
    ParticipantNotFound(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

pub type ScoringResult<T> = Result<T, ScoringError>;
