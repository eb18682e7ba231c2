use thiserror::Error;

/// Invariant violations raised while editing a configuration record
///
/// These indicate that path steps and power restrictions went out of sync;
/// the action that raised one is aborted and the record is left untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfError {
    #[error("path step '{0}' not found")]
    PathStepNotFound(String),
    #[error("path step '{0}' has no position on path")]
    UndefinedPosition(String),
    #[error("path steps contain an unset entry")]
    IncompletePathSteps,
    #[error("power restrictions {left_to} -> {right_from} are not adjacent")]
    NonAdjacentRanges { left_to: String, right_from: String },
    #[error("power restriction starting at '{0}' would end before it starts")]
    InvertedRange(String),
    #[error("power restriction {from} -> {to} not found")]
    RangeNotFound { from: String, to: String },
    #[error("expected {expected} positions, got {found}")]
    PositionCountMismatch { expected: usize, found: usize },
    #[error("no via at index {0}")]
    ViaIndexOutOfRange(usize),
    #[error("no drag in progress")]
    NotDragging,
}
