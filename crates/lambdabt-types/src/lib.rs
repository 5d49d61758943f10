//! `lambdabt-types` – shared vocabulary for LambdaBT.
//!
//! - [`Outcome`] – the four-valued result of every node tick.
//! - [`BtError`] – contract violations raised while building trees or
//!   accessing an empty [`PersistentList`].
//! - [`list`] – [`PersistentList`][list::PersistentList], the immutable,
//!   structure-sharing list used to hand child collections to composites.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod list;

pub use list::PersistentList;

/// The result of ticking a behavior tree node once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// The node has started but has not yet finished.
    Running,
    /// The node completed its task.
    Success,
    /// The node's decision logic said no. An expected, normal result.
    Failure,
    /// The tick could not be completed meaningfully.
    Error,
}

impl Outcome {
    /// `true` for [`Outcome::Success`] and [`Outcome::Failure`].
    pub fn is_terminal(self) -> bool {
        matches!(self, Outcome::Success | Outcome::Failure)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Running => write!(f, "RUNNING"),
            Outcome::Success => write!(f, "SUCCESS"),
            Outcome::Failure => write!(f, "FAILURE"),
            Outcome::Error => write!(f, "ERROR"),
        }
    }
}

/// Caller bugs: misuse of the list API or invalid combinator arguments.
///
/// These never travel through the tick channel; that is what
/// [`Outcome::Error`] is for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BtError {
    #[error("Invalid operation: {0}")]
    InvalidOperation(&'static str),

    #[error("Repeat bound must be non-negative, got {0}")]
    NegativeRepeatBound(i64),

    #[error("Invalid selection policy: {0}")]
    InvalidPolicy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_as_upper_case() {
        let json = serde_json::to_string(&Outcome::Running).unwrap();
        assert_eq!(json, "\"RUNNING\"");
        let back: Outcome = serde_json::from_str("\"FAILURE\"").unwrap();
        assert_eq!(back, Outcome::Failure);
    }

    #[test]
    fn outcome_display_matches_wire_names() {
        assert_eq!(Outcome::Success.to_string(), "SUCCESS");
        assert_eq!(Outcome::Error.to_string(), "ERROR");
    }

    #[test]
    fn only_success_and_failure_are_terminal() {
        assert!(Outcome::Success.is_terminal());
        assert!(Outcome::Failure.is_terminal());
        assert!(!Outcome::Running.is_terminal());
        assert!(!Outcome::Error.is_terminal());
    }

    #[test]
    fn bt_error_display() {
        let err = BtError::NegativeRepeatBound(-3);
        assert!(err.to_string().contains("-3"));

        let err2 = BtError::InvalidOperation("head of empty list");
        assert!(err2.to_string().contains("head of empty list"));
    }
}
