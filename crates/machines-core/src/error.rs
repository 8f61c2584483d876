//! Content validation errors.
//!
//! These never escape the frame loop. Level loading turns each one into a
//! skipped directive plus a warning.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContentError {
    #[error("unknown enemy kind `{0}`")]
    UnknownEnemy(String),
    #[error("unknown formation template `{0}`")]
    UnknownFormation(String),
    #[error("unknown formation behavior `{0}`")]
    UnknownBehavior(String),
    #[error("unknown movement pattern `{0}`")]
    UnknownPattern(String),
    #[error("directive trigger time {0} is not a finite, non-negative number")]
    BadTriggerTime(f64),
    #[error("difficulty multiplier {0} must be finite and positive")]
    BadDifficulty(f64),
    #[error("formation directive has no members")]
    EmptyFormation,
    #[error("formation of {count} members exceeds the limit of {max}")]
    FormationTooLarge { count: usize, max: usize },
    #[error("invalid obstacle: {0}")]
    BadObstacle(&'static str),
    #[error("movement never leaves through the bottom edge: {0}")]
    NoDownwardExit(&'static str),
    #[error("directive names neither an enemy nor a formation")]
    MissingDescriptor,
    #[error("invalid pattern parameter: {0}")]
    BadPatternParameter(&'static str),
    #[error("wave {wave} directive {index}: {source}")]
    InDirective {
        wave: usize,
        index: usize,
        #[source]
        source: Box<ContentError>,
    },
}
