//! Execution reports.

use crate::core::{HandlerOutcome, HandlerRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One handler invocation within an execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Handler name.
    pub handler: String,
    /// Handler role.
    pub role: HandlerRole,
    /// What happened.
    pub outcome: HandlerOutcome,
    /// Time spent in the handler, in milliseconds.
    pub duration_ms: f64,
}

/// How an execution ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// Every handler ran without interrupting the context.
    Completed,
    /// A handler interrupted the context with a tip or data.
    Halted {
        /// The interrupting handler.
        handler: String,
    },
    /// A handler returned a forced interrupt.
    ForcedInterrupt {
        /// The interrupting handler.
        handler: String,
        /// The code it surfaced.
        code: String,
    },
    /// A handler failed or panicked.
    Fault {
        /// The failing handler.
        handler: String,
    },
}

impl Termination {
    /// Returns the handler that stopped the chain, if any.
    #[must_use]
    pub fn stopped_by(&self) -> Option<&str> {
        match self {
            Self::Completed => None,
            Self::Halted { handler } | Self::ForcedInterrupt { handler, .. } | Self::Fault { handler } => {
                Some(handler.as_str())
            }
        }
    }

    /// Returns true for faults.
    #[must_use]
    pub const fn is_fault(&self) -> bool {
        matches!(self, Self::Fault { .. })
    }
}

/// Summary of one execution, returned by `Pipeline::execute_with_report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Run identifier.
    pub run_id: Uuid,
    /// Pipeline name.
    pub pipeline: String,
    /// When the execution started.
    pub started_at: DateTime<Utc>,
    /// Total duration in milliseconds.
    pub duration_ms: f64,
    /// Handlers invoked, in order.
    pub steps: Vec<StepRecord>,
    /// How the execution ended.
    pub termination: Termination,
}

impl ExecutionReport {
    pub(crate) fn begin(run_id: Uuid, pipeline: impl Into<String>) -> Self {
        Self {
            run_id,
            pipeline: pipeline.into(),
            started_at: Utc::now(),
            duration_ms: 0.0,
            steps: Vec::new(),
            termination: Termination::Completed,
        }
    }

    /// Returns the step recorded for a handler.
    #[must_use]
    pub fn step(&self, handler: &str) -> Option<&StepRecord> {
        self.steps.iter().find(|step| step.handler == handler)
    }

    /// Returns true if the handler was invoked.
    #[must_use]
    pub fn ran(&self, handler: &str) -> bool {
        self.step(handler).is_some()
    }

    /// Returns the handler names in invocation order.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.handler.as_str()).collect()
    }

    /// Returns the outcomes in invocation order.
    #[must_use]
    pub fn outcomes(&self) -> Vec<HandlerOutcome> {
        self.steps.iter().map(|step| step.outcome).collect()
    }
}
