//! Context management for chain execution.
//!
//! This module provides:
//! - The mutable per-execution context handlers read and write
//! - A pool that recycles contexts and resets them on every exit path

mod execution;
mod pool;

pub use execution::ExecutionContext;
pub use pool::{ContextPool, PooledContext, DEFAULT_POOL_CAPACITY};
