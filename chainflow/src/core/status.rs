//! Handler role and per-handler outcome enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role a handler plays in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerRole {
    /// Validates the request; may reject it with a tip.
    Check,
    /// Does the work; may be skipped when the request is a duplicate.
    Process,
    /// Produces the final payload.
    Completed,
}

impl fmt::Display for HandlerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Check => write!(f, "check"),
            Self::Process => write!(f, "process"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// What happened after a single handler ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerOutcome {
    /// The handler ran and the chain moves on.
    #[default]
    Continued,
    /// The request was a duplicate; `process` did not run.
    Skipped,
    /// The context was interrupted; no later handler runs.
    Halted,
    /// The handler returned a forced interrupt.
    Interrupted,
    /// The handler failed or panicked.
    Faulted,
}

impl fmt::Display for HandlerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continued => write!(f, "continued"),
            Self::Skipped => write!(f, "skipped"),
            Self::Halted => write!(f, "halted"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::Faulted => write!(f, "faulted"),
        }
    }
}

impl HandlerOutcome {
    /// Returns true if no further handler runs after this outcome.
    #[must_use]
    pub const fn stops_chain(&self) -> bool {
        matches!(self, Self::Halted | Self::Interrupted | Self::Faulted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_role_display() {
        assert_eq!(HandlerRole::Check.to_string(), "check");
        assert_eq!(HandlerRole::Process.to_string(), "process");
        assert_eq!(HandlerRole::Completed.to_string(), "completed");
    }

    #[test]
    fn test_outcome_stops_chain() {
        assert!(!HandlerOutcome::Continued.stops_chain());
        assert!(!HandlerOutcome::Skipped.stops_chain());
        assert!(HandlerOutcome::Halted.stops_chain());
        assert!(HandlerOutcome::Interrupted.stops_chain());
        assert!(HandlerOutcome::Faulted.stops_chain());
    }

    #[test]
    fn test_outcome_default() {
        assert_eq!(HandlerOutcome::default(), HandlerOutcome::Continued);
    }

    #[test]
    fn test_outcome_serialize() {
        let json = serde_json::to_string(&HandlerOutcome::Skipped).unwrap();
        assert_eq!(json, r#""skipped""#);

        let role: HandlerRole = serde_json::from_str(r#""completed""#).unwrap();
        assert_eq!(role, HandlerRole::Completed);
    }
}
