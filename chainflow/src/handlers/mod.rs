//! Handler contracts.
//!
//! A handler is one unit of business logic registered into a pipeline. It
//! plays exactly one role:
//!
//! - [`CheckHandler`] validates the request and may reject it with a tip.
//! - [`ProcessHandler`] does work, unless it reports the request as a
//!   duplicate, in which case only this handler is skipped.
//! - [`CompletedHandler`] produces the final payload.
//!
//! Every method receives the execution context explicitly. Handlers halt the
//! chain by interrupting the context (`signal_tip` / `signal_data`), or by
//! returning [`HandlerError::ForcedInterrupt`](crate::errors::HandlerError).

mod fn_handlers;

pub use fn_handlers::{FnCheck, FnCompleted, FnProcess};

use crate::context::ExecutionContext;
use crate::core::HandlerRole;
use crate::errors::HandlerResult;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Validates a request.
#[async_trait]
pub trait CheckHandler<Req, D>: Send + Sync {
    /// Returns the handler name used in logs, events and reports.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Checks the request. Rejects it by calling `ctx.signal_tip`.
    async fn check_params(&self, ctx: &mut ExecutionContext<D>, request: &Req) -> HandlerResult;
}

/// Performs work for a request.
#[async_trait]
pub trait ProcessHandler<Req, D>: Send + Sync {
    /// Returns the handler name used in logs, events and reports.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Returns true if this request was already processed.
    ///
    /// When true, [`process`](Self::process) is not called and the chain
    /// moves on to the next handler.
    async fn duplicated(&self, ctx: &mut ExecutionContext<D>, request: &Req) -> HandlerResult<bool>;

    /// Processes the request.
    async fn process(&self, ctx: &mut ExecutionContext<D>, request: &Req) -> HandlerResult;
}

/// Produces the final payload.
#[async_trait]
pub trait CompletedHandler<Req, D>: Send + Sync {
    /// Returns the handler name used in logs, events and reports.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Completes the request, usually by calling `ctx.signal_data`.
    async fn completed(&self, ctx: &mut ExecutionContext<D>, request: &Req) -> HandlerResult;
}

/// A registered handler in one of the three roles.
pub enum Handler<Req, D> {
    /// A validation handler.
    Check(Arc<dyn CheckHandler<Req, D>>),
    /// A processing handler.
    Process(Arc<dyn ProcessHandler<Req, D>>),
    /// A completion handler.
    Completed(Arc<dyn CompletedHandler<Req, D>>),
}

impl<Req, D> Handler<Req, D> {
    /// Wraps a check handler.
    pub fn check(handler: impl CheckHandler<Req, D> + 'static) -> Self {
        Self::Check(Arc::new(handler))
    }

    /// Wraps a process handler.
    pub fn process(handler: impl ProcessHandler<Req, D> + 'static) -> Self {
        Self::Process(Arc::new(handler))
    }

    /// Wraps a completed handler.
    pub fn completed(handler: impl CompletedHandler<Req, D> + 'static) -> Self {
        Self::Completed(Arc::new(handler))
    }

    /// Returns the handler's role.
    #[must_use]
    pub const fn role(&self) -> HandlerRole {
        match self {
            Self::Check(_) => HandlerRole::Check,
            Self::Process(_) => HandlerRole::Process,
            Self::Completed(_) => HandlerRole::Completed,
        }
    }

    /// Returns the handler's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Check(h) => h.name(),
            Self::Process(h) => h.name(),
            Self::Completed(h) => h.name(),
        }
    }
}

impl<Req, D> Clone for Handler<Req, D> {
    fn clone(&self) -> Self {
        match self {
            Self::Check(h) => Self::Check(Arc::clone(h)),
            Self::Process(h) => Self::Process(Arc::clone(h)),
            Self::Completed(h) => Self::Completed(Arc::clone(h)),
        }
    }
}

impl<Req, D> fmt::Debug for Handler<Req, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("role", &self.role())
            .field("name", &self.name())
            .finish()
    }
}

/// Strips the module path and generic arguments from a type name.
pub(crate) fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
