//! Mock handlers for testing.
//!
//! Every mock records its invocations in a shared [`CallLog`], so a test can
//! assert exactly which handlers ran and in which order.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::context::ExecutionContext;
use crate::errors::{HandlerError, HandlerResult};
use crate::handlers::{CheckHandler, CompletedHandler, ProcessHandler};

/// Ordered record of handler invocations, shared between mocks.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.calls.lock().push(entry.into());
    }

    /// Returns all entries in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Returns true if an entry was recorded.
    #[must_use]
    pub fn contains(&self, entry: &str) -> bool {
        self.calls.lock().iter().any(|call| call == entry)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Clears the log.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// A check handler that records its call and accepts the request.
#[derive(Debug)]
pub struct PassingCheck {
    name: String,
    log: CallLog,
}

impl PassingCheck {
    /// Creates a new passing check.
    #[must_use]
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
        }
    }
}

#[async_trait]
impl<Req, D> CheckHandler<Req, D> for PassingCheck
where
    Req: Send + Sync + 'static,
    D: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_params(&self, _ctx: &mut ExecutionContext<D>, _request: &Req) -> HandlerResult {
        self.log.record(&self.name);
        Ok(())
    }
}

/// A check handler that rejects every request with a tip.
#[derive(Debug)]
pub struct RejectingCheck {
    name: String,
    code: String,
    message: String,
    log: CallLog,
}

impl RejectingCheck {
    /// Creates a new rejecting check.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        log: &CallLog,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            message: message.into(),
            log: log.clone(),
        }
    }
}

#[async_trait]
impl<Req, D> CheckHandler<Req, D> for RejectingCheck
where
    Req: Send + Sync + 'static,
    D: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_params(&self, ctx: &mut ExecutionContext<D>, _request: &Req) -> HandlerResult {
        self.log.record(&self.name);
        ctx.signal_tip(self.code.as_str(), self.message.as_str());
        Ok(())
    }
}

/// A process handler with a fixed duplicate answer.
///
/// Logs `"<name>.duplicated"` and, when it runs, `"<name>.process"`.
#[derive(Debug)]
pub struct RecordingProcess {
    name: String,
    duplicated: bool,
    log: CallLog,
}

impl RecordingProcess {
    /// Creates a process handler that always runs.
    #[must_use]
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            duplicated: false,
            log: log.clone(),
        }
    }

    /// Creates a process handler that always reports a duplicate.
    #[must_use]
    pub fn duplicate(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            duplicated: true,
            ..Self::new(name, log)
        }
    }
}

#[async_trait]
impl<Req, D> ProcessHandler<Req, D> for RecordingProcess
where
    Req: Send + Sync + 'static,
    D: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn duplicated(&self, _ctx: &mut ExecutionContext<D>, _request: &Req) -> HandlerResult<bool> {
        self.log.record(format!("{}.duplicated", self.name));
        Ok(self.duplicated)
    }

    async fn process(&self, ctx: &mut ExecutionContext<D>, _request: &Req) -> HandlerResult {
        self.log.record(format!("{}.process", self.name));
        ctx.set_scratch(self.name.as_str(), serde_json::json!(true));
        Ok(())
    }
}

/// A completed handler that delivers a fixed payload.
#[derive(Debug)]
pub struct DataCompleted<D> {
    name: String,
    data: D,
    log: CallLog,
}

impl<D> DataCompleted<D> {
    /// Creates a completed handler delivering `data`.
    #[must_use]
    pub fn new(name: impl Into<String>, data: D, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            data,
            log: log.clone(),
        }
    }
}

#[async_trait]
impl<Req, D> CompletedHandler<Req, D> for DataCompleted<D>
where
    Req: Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn completed(&self, ctx: &mut ExecutionContext<D>, _request: &Req) -> HandlerResult {
        self.log.record(&self.name);
        ctx.signal_data(self.data.clone());
        Ok(())
    }
}

/// How a [`FaultyHandler`] misbehaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Misbehavior {
    /// Returns `HandlerError::Fault`.
    Error(String),
    /// Panics.
    Panic(String),
    /// Returns `HandlerError::ForcedInterrupt`.
    Interrupt {
        /// Code to surface.
        code: String,
        /// Message to surface.
        message: String,
    },
}

/// A handler that fails in every role.
///
/// Usable as a check, process (its duplicate test fails) or completed
/// handler, so a failure can be placed at any position in a chain.
#[derive(Debug)]
pub struct FaultyHandler {
    name: String,
    misbehavior: Misbehavior,
    log: CallLog,
}

impl FaultyHandler {
    /// Creates a handler returning a fault.
    #[must_use]
    pub fn error(name: impl Into<String>, detail: impl Into<String>, log: &CallLog) -> Self {
        Self::new(name, Misbehavior::Error(detail.into()), log)
    }

    /// Creates a handler that panics.
    #[must_use]
    pub fn panic(name: impl Into<String>, detail: impl Into<String>, log: &CallLog) -> Self {
        Self::new(name, Misbehavior::Panic(detail.into()), log)
    }

    /// Creates a handler returning a forced interrupt.
    #[must_use]
    pub fn interrupt(
        name: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        log: &CallLog,
    ) -> Self {
        Self::new(
            name,
            Misbehavior::Interrupt {
                code: code.into(),
                message: message.into(),
            },
            log,
        )
    }

    fn new(name: impl Into<String>, misbehavior: Misbehavior, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            misbehavior,
            log: log.clone(),
        }
    }

    fn misbehave<D>(&self, ctx: &mut ExecutionContext<D>) -> HandlerResult {
        self.log.record(&self.name);
        ctx.set_scratch(format!("{}.partial", self.name), serde_json::json!(true));
        match &self.misbehavior {
            Misbehavior::Error(detail) => Err(HandlerError::fault(detail.as_str())),
            Misbehavior::Panic(detail) => panic!("{detail}"),
            Misbehavior::Interrupt { code, message } => {
                Err(HandlerError::interrupt(code.as_str(), message.as_str()))
            }
        }
    }
}

#[async_trait]
impl<Req, D> CheckHandler<Req, D> for FaultyHandler
where
    Req: Send + Sync + 'static,
    D: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_params(&self, ctx: &mut ExecutionContext<D>, _request: &Req) -> HandlerResult {
        self.misbehave(ctx)
    }
}

#[async_trait]
impl<Req, D> ProcessHandler<Req, D> for FaultyHandler
where
    Req: Send + Sync + 'static,
    D: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn duplicated(&self, ctx: &mut ExecutionContext<D>, _request: &Req) -> HandlerResult<bool> {
        self.misbehave(ctx).map(|()| false)
    }

    async fn process(&self, ctx: &mut ExecutionContext<D>, _request: &Req) -> HandlerResult {
        self.misbehave(ctx)
    }
}

#[async_trait]
impl<Req, D> CompletedHandler<Req, D> for FaultyHandler
where
    Req: Send + Sync + 'static,
    D: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn completed(&self, ctx: &mut ExecutionContext<D>, _request: &Req) -> HandlerResult {
        self.misbehave(ctx)
    }
}

/// A process handler that sleeps before finishing.
#[derive(Debug)]
pub struct SlowProcess {
    name: String,
    delay: Duration,
}

impl SlowProcess {
    /// Creates a new slow process handler.
    #[must_use]
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
        }
    }
}

#[async_trait]
impl<Req, D> ProcessHandler<Req, D> for SlowProcess
where
    Req: Send + Sync + 'static,
    D: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn duplicated(&self, _ctx: &mut ExecutionContext<D>, _request: &Req) -> HandlerResult<bool> {
        Ok(false)
    }

    async fn process(&self, ctx: &mut ExecutionContext<D>, _request: &Req) -> HandlerResult {
        ctx.set_scratch(format!("{}.started", self.name), serde_json::json!(true));
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// A check handler that verifies it starts from a clean context.
///
/// Counts every execution whose context already held scratch values or an
/// interrupt when the probe ran first, then leaves a marker behind.
#[derive(Debug, Default)]
pub struct ContextProbe {
    runs: AtomicUsize,
    dirty: AtomicUsize,
}

impl ContextProbe {
    /// Creates a new probe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many executions the probe saw.
    #[must_use]
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// Returns how many executions started with leftover state.
    #[must_use]
    pub fn dirty_runs(&self) -> usize {
        self.dirty.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<Req, D> CheckHandler<Req, D> for ContextProbe
where
    Req: Send + Sync + 'static,
    D: Send + 'static,
{
    fn name(&self) -> &str {
        "ContextProbe"
    }

    async fn check_params(&self, ctx: &mut ExecutionContext<D>, _request: &Req) -> HandlerResult {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if ctx.scratch_len() != 0 || ctx.is_interrupted() || ctx.peek_response().is_some() {
            self.dirty.fetch_add(1, Ordering::SeqCst);
        }
        ctx.set_scratch("probe.marker", serde_json::json!(ctx.run_id().to_string()));
        Ok(())
    }
}
