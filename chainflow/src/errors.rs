//! Error types for the chainflow framework.
//!
//! Two families live here:
//!
//! - [`HandlerError`], returned by handler methods. The pipeline inspects it
//!   and turns it into a response; it never escapes `Pipeline::execute`.
//! - [`ChainError`], returned by the surrounding APIs (configuration,
//!   logging setup, typed scratch access, accessor bindings).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type returned by handler methods.
pub type HandlerResult<T = ()> = Result<T, HandlerError>;

/// The main error type for chainflow operations outside the handler loop.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An accessor binding was declared or used incorrectly.
    #[error("{0}")]
    Binding(#[from] BindingError),

    /// The logging subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Explicit abort signal raised by a handler.
///
/// The pipeline stops at the raising handler and answers with this
/// code and message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Forced interrupt [{code}]: {message}")]
pub struct ForcedInterrupt {
    /// Response code to surface.
    pub code: String,
    /// Response message to surface.
    pub message: String,
}

impl ForcedInterrupt {
    /// Creates a new forced interrupt.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Abort the chain with a caller-visible code and message.
    #[error("{0}")]
    ForcedInterrupt(#[from] ForcedInterrupt),

    /// Any other failure. Surfaces as the pipeline's system error.
    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}

impl HandlerError {
    /// Creates a forced interrupt error.
    #[must_use]
    pub fn interrupt(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ForcedInterrupt(ForcedInterrupt::new(code, message))
    }

    /// Creates a fault from a plain message.
    #[must_use]
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault(anyhow::anyhow!(message.into()))
    }

    /// Returns true if this is a forced interrupt.
    #[must_use]
    pub fn is_forced_interrupt(&self) -> bool {
        matches!(self, Self::ForcedInterrupt(_))
    }

    /// Converts to a dictionary representation for event payloads.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        match self {
            Self::ForcedInterrupt(interrupt) => {
                map.insert("type".to_string(), serde_json::json!("ForcedInterrupt"));
                map.insert("code".to_string(), serde_json::json!(interrupt.code));
            }
            Self::Fault(_) => {
                map.insert("type".to_string(), serde_json::json!("Fault"));
            }
        }
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

impl From<ChainError> for HandlerError {
    fn from(err: ChainError) -> Self {
        Self::Fault(err.into())
    }
}

impl From<BindingError> for HandlerError {
    fn from(err: BindingError) -> Self {
        Self::Fault(err.into())
    }
}

/// Errors raised by [`crate::binding::BindingTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// An accessor was declared as both a read and a write.
    #[error("Accessor '{accessor}' can't be both a context read and a context write")]
    Conflict {
        /// The accessor name.
        accessor: String,
    },

    /// An accessor was declared twice with the same direction.
    #[error("Accessor '{accessor}' is declared more than once")]
    Duplicate {
        /// The accessor name.
        accessor: String,
    },

    /// A table was built without any accessors.
    #[error("Binding table for '{owner}' doesn't declare any accessors")]
    Empty {
        /// The owning handler name.
        owner: String,
    },

    /// An accessor name or key was blank.
    #[error("Invalid binding: {reason}")]
    Invalid {
        /// Why the binding was rejected.
        reason: String,
    },

    /// The accessor is not declared in the table.
    #[error("Accessor '{accessor}' is not bound to the context")]
    Unknown {
        /// The accessor name.
        accessor: String,
    },

    /// A read accessor was used to write or vice versa.
    #[error("Accessor '{accessor}' is a context {declared}, not a {requested}")]
    WrongDirection {
        /// The accessor name.
        accessor: String,
        /// The declared direction.
        declared: String,
        /// The direction the caller attempted.
        requested: String,
    },
}
