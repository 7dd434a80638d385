//! The handler-chain executor.

use super::report::{ExecutionReport, StepRecord, Termination};
use crate::config::{ChainConfig, ResponseCodes};
use crate::context::{ContextPool, ExecutionContext};
use crate::core::{HandlerOutcome, Response};
use crate::errors::{HandlerError, HandlerResult};
use crate::events::{ChainEvent, EventSink, NoOpEventSink};
use crate::handlers::{CheckHandler, CompletedHandler, Handler, ProcessHandler};
use crate::observability::SpanTimer;
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, debug_span, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// An ordered chain of handlers for one request type.
///
/// Build it once with [`register`](Self::register) (or the `check` /
/// `process` / `completed` shorthands), then share it, typically behind an
/// `Arc`, and call [`execute`](Self::execute) from as many tasks as needed.
/// Each execution gets its own context from the pipeline's pool.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = Pipeline::new("credit")
///     .check(CheckAmount)
///     .process(ApplyCredit)
///     .completed(FinalCredit);
///
/// let response = pipeline.execute(&request).await;
/// ```
pub struct Pipeline<Req, D> {
    name: String,
    handlers: Vec<Handler<Req, D>>,
    codes: ResponseCodes,
    event_sink: Arc<dyn EventSink>,
    pool: ContextPool<D>,
}

impl<Req, D> fmt::Debug for Pipeline<Req, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("handlers", &self.handlers)
            .field("codes", &self.codes)
            .field("pool_capacity", &self.pool.capacity())
            .finish_non_exhaustive()
    }
}

impl<Req, D> Pipeline<Req, D>
where
    Req: Send + Sync + 'static,
    D: Send + 'static,
{
    /// Creates an empty pipeline with default codes and no event sink.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
            codes: ResponseCodes::default(),
            event_sink: Arc::new(NoOpEventSink),
            pool: ContextPool::new(),
        }
    }

    /// Creates an empty pipeline from a configuration.
    #[must_use]
    pub fn from_config(name: impl Into<String>, config: &ChainConfig) -> Self {
        Self::new(name)
            .with_codes(config.codes.clone())
            .with_pool_capacity(config.pool_capacity)
    }

    /// Sets the terminal codes.
    #[must_use]
    pub fn with_codes(mut self, codes: ResponseCodes) -> Self {
        self.codes = codes;
        self
    }

    /// Sets the sink receiving lifecycle events.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Sets how many idle contexts are kept for reuse.
    #[must_use]
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool = ContextPool::with_capacity(capacity);
        self
    }

    /// Appends a handler. Handlers run in registration order.
    #[must_use]
    pub fn register(mut self, handler: Handler<Req, D>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Appends a check handler.
    #[must_use]
    pub fn check(self, handler: impl CheckHandler<Req, D> + 'static) -> Self {
        self.register(Handler::check(handler))
    }

    /// Appends a process handler.
    #[must_use]
    pub fn process(self, handler: impl ProcessHandler<Req, D> + 'static) -> Self {
        self.register(Handler::process(handler))
    }

    /// Appends a completed handler.
    #[must_use]
    pub fn completed(self, handler: impl CompletedHandler<Req, D> + 'static) -> Self {
        self.register(Handler::completed(handler))
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Returns the handler names in registration order.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(Handler::name).collect()
    }

    /// Returns the terminal codes.
    #[must_use]
    pub const fn codes(&self) -> &ResponseCodes {
        &self.codes
    }

    /// Returns the number of idle contexts waiting for reuse.
    #[must_use]
    pub fn idle_contexts(&self) -> usize {
        self.pool.idle_count()
    }

    /// Runs the chain for one request.
    ///
    /// Never fails: rejections, forced interrupts, errors and panics all
    /// become the returned response.
    pub async fn execute(&self, request: &Req) -> Response<D> {
        self.execute_with_report(request).await.0
    }

    /// Runs the chain for one request and reports what each handler did.
    pub async fn execute_with_report(&self, request: &Req) -> (Response<D>, ExecutionReport) {
        let mut ctx = self.pool.acquire();
        let run_id = ctx.run_id();
        let span = info_span!("chain.execute", pipeline = %self.name, %run_id);

        self.run(&mut ctx, request).instrument(span).await
    }

    async fn run(&self, ctx: &mut ExecutionContext<D>, request: &Req) -> (Response<D>, ExecutionReport) {
        let timer = SpanTimer::start(self.name.as_str());
        let run_id = ctx.run_id();
        let mut report = ExecutionReport::begin(run_id, self.name.as_str());

        self.emit(
            ChainEvent::Started,
            run_id,
            serde_json::json!({ "handlers": self.handlers.len() }),
        );

        for handler in &self.handlers {
            let name = handler.name();
            let role = handler.role();
            let step_timer = SpanTimer::start(name);
            let span = debug_span!("chain.handler", handler = name, %role);

            let result = AssertUnwindSafe(Self::invoke(handler, ctx, request).instrument(span))
                .catch_unwind()
                .await;

            let outcome = match result {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(HandlerError::ForcedInterrupt(interrupt))) => {
                    warn!(
                        handler = name,
                        code = %interrupt.code,
                        message = %interrupt.message,
                        "Handler forced an interrupt"
                    );
                    self.emit(
                        ChainEvent::Interrupted,
                        run_id,
                        serde_json::json!({ "handler": name, "code": interrupt.code }),
                    );
                    report.termination = Termination::ForcedInterrupt {
                        handler: name.to_string(),
                        code: interrupt.code.clone(),
                    };
                    ctx.signal_tip(interrupt.code, interrupt.message);
                    HandlerOutcome::Interrupted
                }
                Ok(Err(HandlerError::Fault(err))) => {
                    error!(handler = name, error = %format!("{err:#}"), "Handler failed");
                    self.fail(ctx, &mut report, run_id, name, "error");
                    HandlerOutcome::Faulted
                }
                Err(panic) => {
                    error!(handler = name, panic = %panic_message(panic.as_ref()), "Handler panicked");
                    self.fail(ctx, &mut report, run_id, name, "panic");
                    HandlerOutcome::Faulted
                }
            };

            let duration_ms = step_timer.finish();
            debug!(handler = name, %role, %outcome, duration_ms, "Handler finished");

            match outcome {
                HandlerOutcome::Skipped => {
                    self.emit(ChainEvent::HandlerSkipped, run_id, serde_json::json!({ "handler": name }));
                }
                HandlerOutcome::Halted => {
                    self.emit(ChainEvent::Halted, run_id, serde_json::json!({ "handler": name }));
                    report.termination = Termination::Halted {
                        handler: name.to_string(),
                    };
                }
                _ => {}
            }

            report.steps.push(StepRecord {
                handler: name.to_string(),
                role,
                outcome,
                duration_ms,
            });

            if outcome.stops_chain() {
                break;
            }
        }

        ctx.response()
            .fill_missing(&self.codes.success_code, &self.codes.success_message);
        let response = ctx.take_response();
        report.duration_ms = timer.finish();

        info!(
            code = response.code(),
            steps = report.steps.len(),
            duration_ms = report.duration_ms,
            "Chain finished"
        );
        self.emit(
            ChainEvent::Completed,
            run_id,
            serde_json::json!({
                "code": response.code(),
                "termination": report.termination,
                "duration_ms": report.duration_ms,
            }),
        );

        (response, report)
    }

    /// Runs one handler and classifies how it left the context.
    async fn invoke(
        handler: &Handler<Req, D>,
        ctx: &mut ExecutionContext<D>,
        request: &Req,
    ) -> HandlerResult<HandlerOutcome> {
        match handler {
            Handler::Check(h) => h.check_params(ctx, request).await?,
            Handler::Process(h) => {
                let duplicated = h.duplicated(ctx, request).await?;
                if ctx.is_interrupted() {
                    return Ok(HandlerOutcome::Halted);
                }
                if duplicated {
                    return Ok(HandlerOutcome::Skipped);
                }
                h.process(ctx, request).await?;
            }
            Handler::Completed(h) => h.completed(ctx, request).await?,
        }

        Ok(if ctx.is_interrupted() {
            HandlerOutcome::Halted
        } else {
            HandlerOutcome::Continued
        })
    }

    fn fail(
        &self,
        ctx: &mut ExecutionContext<D>,
        report: &mut ExecutionReport,
        run_id: Uuid,
        handler: &str,
        kind: &str,
    ) {
        self.emit(
            ChainEvent::Failed,
            run_id,
            serde_json::json!({ "handler": handler, "kind": kind }),
        );
        report.termination = Termination::Fault {
            handler: handler.to_string(),
        };
        ctx.signal_tip(
            self.codes.system_error_code.as_str(),
            self.codes.system_error_message.as_str(),
        );
    }

    fn emit(&self, event: ChainEvent, run_id: Uuid, mut payload: serde_json::Value) {
        if let serde_json::Value::Object(ref mut map) = payload {
            map.insert("pipeline".to_string(), serde_json::json!(self.name));
            map.insert("run_id".to_string(), serde_json::json!(run_id.to_string()));
        }
        self.event_sink.emit(event, &payload);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;
    use crate::handlers::{FnCheck, FnCompleted, FnProcess};
    use pretty_assertions::assert_eq;

    type Ctx = ExecutionContext<String>;

    fn echo_pipeline() -> Pipeline<String, String> {
        Pipeline::new("echo")
            .check(FnCheck::new("NotBlank", |ctx: &mut Ctx, request: &String| {
                if request.trim().is_empty() {
                    ctx.signal_tip("100001", "request must not be blank");
                }
                Ok(())
            }))
            .completed(FnCompleted::new("Echo", |ctx: &mut Ctx, request: &String| {
                ctx.signal_data(request.to_uppercase());
                Ok(())
            }))
    }

    #[test]
    fn test_builder_accessors() {
        let pipeline = echo_pipeline();
        assert_eq!(pipeline.name(), "echo");
        assert_eq!(pipeline.len(), 2);
        assert!(!pipeline.is_empty());
        assert_eq!(pipeline.handler_names(), vec!["NotBlank", "Echo"]);
        assert_eq!(pipeline.codes(), &ResponseCodes::default());
        assert!(format!("{pipeline:?}").contains("echo"));
    }

    #[tokio::test]
    async fn test_data_path_gets_success_codes() {
        let response = echo_pipeline().execute(&"hi".to_string()).await;

        assert_eq!(response.code(), "000000");
        assert_eq!(response.message(), "Success");
        assert_eq!(response.data.as_deref(), Some("HI"));
    }

    #[tokio::test]
    async fn test_tip_path() {
        let (response, report) = echo_pipeline().execute_with_report(&" ".to_string()).await;

        assert_eq!(response, Response::tip("100001", "request must not be blank"));
        assert_eq!(report.handler_names(), vec!["NotBlank"]);
        assert_eq!(
            report.termination,
            Termination::Halted {
                handler: "NotBlank".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_pipeline_succeeds() {
        let pipeline: Pipeline<(), ()> = Pipeline::new("empty");
        let (response, report) = pipeline.execute_with_report(&()).await;

        assert_eq!(response.code(), "000000");
        assert_eq!(response.message(), "Success");
        assert_eq!(response.data, None);
        assert_eq!(report.termination, Termination::Completed);
        assert!(report.steps.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_skips_only_process() {
        let pipeline: Pipeline<u32, u32> = Pipeline::new("dup")
            .process(FnProcess::new(
                "AlreadyDone",
                |_ctx: &mut ExecutionContext<u32>, _request: &u32| Ok(true),
                |_ctx: &mut ExecutionContext<u32>, _request: &u32| Err(HandlerError::fault("must not run")),
            ))
            .completed(FnCompleted::new("Finish", |ctx: &mut ExecutionContext<u32>, request: &u32| {
                ctx.signal_data(*request);
                Ok(())
            }));

        let (response, report) = pipeline.execute_with_report(&7).await;

        assert_eq!(response.data, Some(7));
        assert_eq!(response.code(), "000000");
        assert_eq!(
            report.outcomes(),
            vec![HandlerOutcome::Skipped, HandlerOutcome::Halted]
        );
    }

    #[tokio::test]
    async fn test_custom_codes_and_events() {
        let sink = Arc::new(CollectingEventSink::new());
        let codes = ResponseCodes::default().with_system_error("500000", "Try again later");
        let pipeline: Pipeline<(), ()> = Pipeline::new("broken")
            .with_codes(codes)
            .with_event_sink(sink.clone())
            .check(FnCheck::new("Boom", |_ctx: &mut ExecutionContext<()>, _request: &()| {
                Err(HandlerError::fault("database unreachable"))
            }));

        let response = pipeline.execute(&()).await;

        assert_eq!(response, Response::tip("500000", "Try again later"));
        assert_eq!(
            sink.event_types(),
            vec!["chain.started", "chain.failed", "chain.completed"]
        );
        let failed = &sink.payloads_of(ChainEvent::Failed)[0];
        assert_eq!(failed["handler"], "Boom");
        assert_eq!(failed["pipeline"], "broken");
        assert_eq!(failed["kind"], "error");
    }

    #[test]
    fn test_from_config() {
        let config = ChainConfig::from_json_str(r#"{"pool_capacity": 2}"#).unwrap();
        let pipeline: Pipeline<(), ()> = Pipeline::from_config("configured", &config);

        assert_eq!(pipeline.pool.capacity(), 2);
        assert_eq!(pipeline.codes(), &config.codes);
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("static str");
        assert_eq!(panic_message(boxed.as_ref()), "static str");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");

        let boxed: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(boxed.as_ref()), "non-string panic payload");
    }
}
