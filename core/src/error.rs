use thiserror::Error;

/// Rejected condition or shape labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("unknown condition: {0:?} (expected neutral, negative or positive)")]
    UnknownCondition(String),

    #[error("unknown shape: {0:?} (expected square, circle or hexagon)")]
    UnknownShape(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParticipantError {
    #[error("participant id must not be empty")]
    EmptyId,

    #[error("participant id {id:?} contains disallowed character {found:?}")]
    InvalidCharacter { id: String, found: char },

    #[error("participant {field} contains control character {found:?}")]
    ControlCharacter { field: &'static str, found: char },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session stage out of order: expected {expected}, got {found}")]
    OutOfOrder {
        expected: &'static str,
        found: &'static str,
    },

    #[error("trial {trial_nr} already has a {field} value")]
    AlreadyRecorded { trial_nr: usize, field: &'static str },

    #[error("confidence position {0} is outside 0..=100")]
    ConfidenceOutOfRange(u8),

    #[error("no response record pending")]
    NothingPending,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("{field} must be finite and non-negative, got {value}")]
    NegativeDegrees { field: &'static str, value: f64 },

    #[error("cardinal direction {0} is outside [0, 180)")]
    CardinalOutOfRange(u16),

    #[error("at least one cardinal direction is required")]
    NoCardinalDirections,

    #[error(
        "trials_per_shape ({trials}) must be at least the number of cardinal directions \
         ({cardinals})"
    )]
    TooFewTrials { trials: usize, cardinals: usize },
}
