//! The response record produced by a pipeline execution.

use serde::{Deserialize, Serialize};

/// Result of one execution: a code, a message and optional data.
///
/// While an execution is running any field may be unset. Once the
/// pipeline finalizes it, `code` and `message` are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response<D> {
    /// Response code.
    pub code: Option<String>,
    /// Human readable message.
    pub message: Option<String>,
    /// Payload, only populated on the data path.
    pub data: Option<D>,
}

impl<D> Default for Response<D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<D> Response<D> {
    /// Creates a response with every field unset.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            code: None,
            message: None,
            data: None,
        }
    }

    /// Creates a tip response: a code and message without data.
    #[must_use]
    pub fn tip(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: Some(message.into()),
            data: None,
        }
    }

    /// Creates a data response with no code or message yet.
    #[must_use]
    pub const fn with_data(data: D) -> Self {
        Self {
            code: None,
            message: None,
            data: Some(data),
        }
    }

    /// Returns the code, or an empty string if unset.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or_default()
    }

    /// Returns the message, or an empty string if unset.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    /// Returns true if the response carries a payload.
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Returns true if both code and message are set.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.code.is_some() && self.message.is_some()
    }

    /// Fills a missing code and message. Set fields are left untouched.
    pub fn fill_missing(&mut self, code: &str, message: &str) {
        if self.code.is_none() {
            self.code = Some(code.to_string());
        }
        if self.message.is_none() {
            self.message = Some(message.to_string());
        }
    }
}
