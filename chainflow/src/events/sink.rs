//! Event sinks.

use super::ChainEvent;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info, warn, Level};

/// Receives pipeline lifecycle events.
///
/// `emit` is called inline from the handler loop. Implementations must not
/// block or panic.
pub trait EventSink: Send + Sync {
    /// Receives one event and its payload.
    fn emit(&self, event: ChainEvent, payload: &Value);
}

/// Discards all events. The default sink of a pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn emit(&self, _event: ChainEvent, _payload: &Value) {}
}

fn field<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Writes events to `tracing`.
///
/// Interrupted and failed executions log at WARN. Everything else logs at
/// the sink's level, which is INFO unless created with [`Self::debug`].
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self::info()
    }
}

impl LoggingEventSink {
    /// Creates a debug-level logging sink.
    #[must_use]
    pub const fn debug() -> Self {
        Self { level: Level::DEBUG }
    }

    /// Creates an info-level logging sink.
    #[must_use]
    pub const fn info() -> Self {
        Self { level: Level::INFO }
    }
}

impl EventSink for LoggingEventSink {
    fn emit(&self, event: ChainEvent, payload: &Value) {
        let pipeline = field(payload, "pipeline");
        let run_id = field(payload, "run_id");
        let handler = field(payload, "handler");

        match event {
            ChainEvent::Interrupted | ChainEvent::Failed => {
                warn!(event = %event, pipeline, run_id, handler, %payload, "chain event");
            }
            _ if self.level == Level::DEBUG => {
                debug!(event = %event, pipeline, run_id, handler, %payload, "chain event");
            }
            _ => {
                info!(event = %event, pipeline, run_id, handler, %payload, "chain event");
            }
        }
    }
}

/// Keeps every event in memory. Used by tests.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: RwLock<Vec<(ChainEvent, Value)>>,
}

impl CollectingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<(ChainEvent, Value)> {
        self.events.read().clone()
    }

    /// Returns the dotted event types in emission order.
    #[must_use]
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.read().iter().map(|(event, _)| event.as_str()).collect()
    }

    /// Returns the payloads of one kind of event.
    #[must_use]
    pub fn payloads_of(&self, event: ChainEvent) -> Vec<Value> {
        self.events
            .read()
            .iter()
            .filter(|(seen, _)| *seen == event)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Forgets every collected event.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl EventSink for CollectingEventSink {
    fn emit(&self, event: ChainEvent, payload: &Value) {
        self.events.write().push((event, payload.clone()));
    }
}
