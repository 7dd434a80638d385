//! Lifecycle events emitted by pipelines.
//!
//! A pipeline reports its progress through an [`EventSink`]. Every payload
//! carries the `pipeline` name and the `run_id` of the execution, plus
//! event-specific fields such as the `handler` that stopped the chain.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle events a pipeline emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainEvent {
    /// An execution began.
    #[serde(rename = "chain.started")]
    Started,
    /// A process handler reported a duplicate and was skipped.
    #[serde(rename = "handler.skipped")]
    HandlerSkipped,
    /// A handler interrupted the context (tip or data).
    #[serde(rename = "chain.halted")]
    Halted,
    /// A handler raised a forced interrupt.
    #[serde(rename = "chain.interrupted")]
    Interrupted,
    /// A handler failed or panicked.
    #[serde(rename = "chain.failed")]
    Failed,
    /// The response was finalized.
    #[serde(rename = "chain.completed")]
    Completed,
}

impl ChainEvent {
    /// Returns the dotted event type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Started => "chain.started",
            Self::HandlerSkipped => "handler.skipped",
            Self::Halted => "chain.halted",
            Self::Interrupted => "chain.interrupted",
            Self::Failed => "chain.failed",
            Self::Completed => "chain.completed",
        }
    }
}

impl fmt::Display for ChainEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
