//! Reusable execution-context slots.
//!
//! A pipeline serves many executions, possibly from many worker threads at
//! once. Contexts are handed out from a pool behind [`PooledContext`], whose
//! `Drop` resets the context before it can serve another execution. The
//! reset runs on every exit path: normal return, handler fault, panic, and a
//! dropped (cancelled) execution future.

use super::ExecutionContext;
use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};

/// Default number of idle contexts kept for reuse.
pub const DEFAULT_POOL_CAPACITY: usize = 64;

/// A bounded pool of idle execution contexts.
#[derive(Debug)]
pub struct ContextPool<D> {
    idle: Mutex<Vec<ExecutionContext<D>>>,
    capacity: usize,
}

impl<D> Default for ContextPool<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> ContextPool<D> {
    /// Creates a pool with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_CAPACITY)
    }

    /// Creates a pool keeping at most `capacity` idle contexts.
    ///
    /// A capacity of zero disables reuse.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(capacity.min(DEFAULT_POOL_CAPACITY))),
            capacity,
        }
    }

    /// Takes a context for a new execution.
    ///
    /// The context is clean and carries a fresh run ID.
    pub fn acquire(&self) -> PooledContext<'_, D> {
        let mut ctx = self.idle.lock().pop().unwrap_or_default();
        ctx.begin();
        PooledContext { ctx, pool: self }
    }

    /// Returns the number of idle contexts.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Returns the maximum number of idle contexts kept.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn release(&self, mut ctx: ExecutionContext<D>) {
        ctx.reset();
        let mut idle = self.idle.lock();
        if idle.len() < self.capacity {
            idle.push(ctx);
        }
    }
}

/// An execution context on loan from a [`ContextPool`].
///
/// Dereferences to the context. Dropping it resets the context and
/// returns it to the pool.
#[derive(Debug)]
pub struct PooledContext<'a, D> {
    ctx: ExecutionContext<D>,
    pool: &'a ContextPool<D>,
}

impl<D> Deref for PooledContext<'_, D> {
    type Target = ExecutionContext<D>;

    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl<D> DerefMut for PooledContext<'_, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ctx
    }
}

impl<D> Drop for PooledContext<'_, D> {
    fn drop(&mut self) {
        let ctx = std::mem::take(&mut self.ctx);
        self.pool.release(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_from_empty_pool() {
        let pool: ContextPool<String> = ContextPool::new();
        let ctx = pool.acquire();

        assert!(ctx.is_clean());
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn test_release_on_drop() {
        let pool: ContextPool<String> = ContextPool::new();
        {
            let mut ctx = pool.acquire();
            ctx.set_scratch("leftover", serde_json::json!(true));
            ctx.signal_data("payload".to_string());
        }

        assert_eq!(pool.idle_count(), 1);

        let reused = pool.acquire();
        assert!(reused.is_clean());
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn test_reused_context_gets_new_run_id() {
        let pool: ContextPool<()> = ContextPool::new();
        let first = pool.acquire().run_id();
        let second = pool.acquire().run_id();

        assert_ne!(first, second);
    }

    #[test]
    fn test_capacity_bounds_idle_contexts() {
        let pool: ContextPool<()> = ContextPool::with_capacity(1);
        {
            let _a = pool.acquire();
            let _b = pool.acquire();
        }

        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn test_zero_capacity_disables_reuse() {
        let pool: ContextPool<()> = ContextPool::with_capacity(0);
        drop(pool.acquire());

        assert_eq!(pool.idle_count(), 0);
        assert_eq!(pool.capacity(), 0);
    }

    #[test]
    fn test_reset_survives_panic() {
        let pool: ContextPool<u32> = ContextPool::new();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut ctx = pool.acquire();
            ctx.set_scratch("half-written", serde_json::json!(1));
            panic!("handler blew up");
        }));

        assert!(result.is_err());
        assert_eq!(pool.idle_count(), 1);
        assert!(pool.acquire().is_clean());
    }
}
