//! Closure-backed handlers.

use super::{CheckHandler, CompletedHandler, ProcessHandler};
use crate::context::ExecutionContext;
use crate::errors::HandlerResult;
use async_trait::async_trait;
use std::fmt::Debug;
use std::marker::PhantomData;

/// A check handler backed by a closure.
pub struct FnCheck<Req, D, F>
where
    F: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult + Send + Sync,
{
    name: String,
    func: F,
    _marker: PhantomData<fn(&Req) -> D>,
}

impl<Req, D, F> FnCheck<Req, D, F>
where
    F: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult + Send + Sync,
{
    /// Creates a new closure-backed check handler.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _marker: PhantomData,
        }
    }
}

impl<Req, D, F> Debug for FnCheck<Req, D, F>
where
    F: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCheck").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<Req, D, F> CheckHandler<Req, D> for FnCheck<Req, D, F>
where
    Req: Send + Sync + 'static,
    D: Send + 'static,
    F: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_params(&self, ctx: &mut ExecutionContext<D>, request: &Req) -> HandlerResult {
        (self.func)(ctx, request)
    }
}

/// A process handler backed by two closures: a duplicate test and the work.
pub struct FnProcess<Req, D, Dup, P>
where
    Dup: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult<bool> + Send + Sync,
    P: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult + Send + Sync,
{
    name: String,
    duplicated: Dup,
    process: P,
    _marker: PhantomData<fn(&Req) -> D>,
}

impl<Req, D, Dup, P> FnProcess<Req, D, Dup, P>
where
    Dup: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult<bool> + Send + Sync,
    P: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult + Send + Sync,
{
    /// Creates a new closure-backed process handler.
    pub fn new(name: impl Into<String>, duplicated: Dup, process: P) -> Self {
        Self {
            name: name.into(),
            duplicated,
            process,
            _marker: PhantomData,
        }
    }
}

impl<Req, D, Dup, P> Debug for FnProcess<Req, D, Dup, P>
where
    Dup: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult<bool> + Send + Sync,
    P: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProcess").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<Req, D, Dup, P> ProcessHandler<Req, D> for FnProcess<Req, D, Dup, P>
where
    Req: Send + Sync + 'static,
    D: Send + 'static,
    Dup: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult<bool> + Send + Sync,
    P: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn duplicated(&self, ctx: &mut ExecutionContext<D>, request: &Req) -> HandlerResult<bool> {
        (self.duplicated)(ctx, request)
    }

    async fn process(&self, ctx: &mut ExecutionContext<D>, request: &Req) -> HandlerResult {
        (self.process)(ctx, request)
    }
}

/// A completed handler backed by a closure.
pub struct FnCompleted<Req, D, F>
where
    F: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult + Send + Sync,
{
    name: String,
    func: F,
    _marker: PhantomData<fn(&Req) -> D>,
}

impl<Req, D, F> FnCompleted<Req, D, F>
where
    F: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult + Send + Sync,
{
    /// Creates a new closure-backed completed handler.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _marker: PhantomData,
        }
    }
}

impl<Req, D, F> Debug for FnCompleted<Req, D, F>
where
    F: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCompleted").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<Req, D, F> CompletedHandler<Req, D> for FnCompleted<Req, D, F>
where
    Req: Send + Sync + 'static,
    D: Send + 'static,
    F: Fn(&mut ExecutionContext<D>, &Req) -> HandlerResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn completed(&self, ctx: &mut ExecutionContext<D>, request: &Req) -> HandlerResult {
        (self.func)(ctx, request)
    }
}
