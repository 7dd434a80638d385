//! The mutable context owned by a single execution.

use crate::binding::ScratchKey;
use crate::core::Response;
use crate::errors::ChainError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Per-execution storage shared by the handlers of one chain run.
///
/// Holds the in-progress response, the scratch values handlers pass to
/// each other, and the interrupt flag. The response and scratch map are
/// created on first access.
///
/// Once `interrupted` is set it stays set until [`reset`](Self::reset),
/// which ends the execution.
#[derive(Debug)]
pub struct ExecutionContext<D> {
    /// Run identifier.
    run_id: Uuid,
    /// The response being built.
    response: Option<Response<D>>,
    /// Values exchanged between handlers.
    scratch: Option<HashMap<String, serde_json::Value>>,
    /// Interrupt flag.
    interrupted: bool,
}

impl<D> Default for ExecutionContext<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> ExecutionContext<D> {
    /// Creates a new, empty execution context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            response: None,
            scratch: None,
            interrupted: false,
        }
    }

    /// Binds the context to a new execution.
    pub(crate) fn begin(&mut self) {
        self.reset();
        self.run_id = Uuid::new_v4();
    }

    /// Returns the run ID of the current execution.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Returns the response, creating an empty one on first access.
    pub fn response(&mut self) -> &mut Response<D> {
        self.response.get_or_insert_with(Response::empty)
    }

    /// Returns the response without creating it.
    #[must_use]
    pub const fn peek_response(&self) -> Option<&Response<D>> {
        self.response.as_ref()
    }

    /// Returns true once a handler or fault has interrupted the chain.
    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    fn scratch_mut(&mut self) -> &mut HashMap<String, serde_json::Value> {
        self.scratch.get_or_insert_with(HashMap::new)
    }

    /// Stores a scratch value, returning the previous one under that key.
    pub fn set_scratch(
        &mut self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Option<serde_json::Value> {
        self.scratch_mut().insert(key.into(), value)
    }

    /// Gets a scratch value. Missing keys yield `None`.
    #[must_use]
    pub fn get_scratch(&self, key: &str) -> Option<&serde_json::Value> {
        self.scratch.as_ref().and_then(|scratch| scratch.get(key))
    }

    /// Removes a scratch value.
    pub fn remove_scratch(&mut self, key: &str) -> Option<serde_json::Value> {
        self.scratch.as_mut().and_then(|scratch| scratch.remove(key))
    }

    /// Checks if a scratch key exists.
    #[must_use]
    pub fn contains_scratch(&self, key: &str) -> bool {
        self.get_scratch(key).is_some()
    }

    /// Returns the number of scratch entries.
    #[must_use]
    pub fn scratch_len(&self) -> usize {
        self.scratch.as_ref().map_or(0, HashMap::len)
    }

    /// Returns all scratch keys.
    #[must_use]
    pub fn scratch_keys(&self) -> Vec<String> {
        self.scratch
            .as_ref()
            .map(|scratch| scratch.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Reads a typed scratch value.
    ///
    /// Returns `Ok(None)` if nothing was written under the key.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Serialization` if the stored value doesn't
    /// deserialize into `T`.
    pub fn read<T: DeserializeOwned>(&self, key: &ScratchKey<T>) -> Result<Option<T>, ChainError> {
        self.read_raw(key.name())
    }

    /// Writes a typed scratch value, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Serialization` if `value` can't be serialized.
    pub fn write<T: Serialize>(&mut self, key: &ScratchKey<T>, value: T) -> Result<(), ChainError> {
        self.write_raw(key.name(), &value)
    }

    pub(crate) fn read_raw<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ChainError> {
        self.get_scratch(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(ChainError::from)
    }

    pub(crate) fn write_raw<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), ChainError> {
        let value = serde_json::to_value(value)?;
        self.set_scratch(key, value);
        Ok(())
    }

    /// Rejects the request with a business tip and interrupts the chain.
    ///
    /// Clears any data already placed in the response.
    pub fn signal_tip(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.interrupted = true;
        let response = self.response();
        response.data = None;
        response.code = Some(code.into());
        response.message = Some(message.into());
    }

    /// Delivers the final payload and interrupts the chain.
    ///
    /// Clears any code or message already placed in the response.
    pub fn signal_data(&mut self, data: D) {
        self.interrupted = true;
        let response = self.response();
        response.data = Some(data);
        response.code = None;
        response.message = None;
    }

    /// Takes the response out of the context, leaving nothing behind.
    pub(crate) fn take_response(&mut self) -> Response<D> {
        self.response.take().unwrap_or_default()
    }

    /// Releases every piece of per-execution state.
    ///
    /// Only the pool calls this, between executions. Handlers have no way to
    /// clear the interrupt flag.
    pub(crate) fn reset(&mut self) {
        self.response = None;
        self.scratch = None;
        self.interrupted = false;
    }

    /// Returns true if no state from a previous execution remains.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.interrupted && self.response.is_none() && self.scratch_len() == 0
    }
}
