//! # Chainflow
//!
//! Ordered handler chains with a request-scoped execution context.
//!
//! A [`Pipeline`](pipeline::Pipeline) runs a sequence of handlers against one
//! request:
//!
//! - **Check handlers** validate the request and may reject it with a tip
//! - **Process handlers** do the work, or are skipped for duplicate requests
//! - **Completed handlers** deliver the final payload
//!
//! Handlers share values through an [`ExecutionContext`](context::ExecutionContext)
//! that lives for exactly one execution. Rejections, forced interrupts,
//! errors and panics all end as a [`Response`](core::Response); `execute`
//! itself never fails.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chainflow::prelude::*;
//!
//! let pipeline = Pipeline::new("credit")
//!     .check(CheckCreditParams)
//!     .process(ApplyCredit)
//!     .completed(FinalCredit::new()?);
//!
//! let response = pipeline.execute(&request).await;
//! assert_eq!(response.code(), "000000");
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod binding;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod observability;
pub mod pipeline;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::binding::{BindingTable, ScratchKey};
    pub use crate::config::{ChainConfig, ResponseCodes};
    pub use crate::context::ExecutionContext;
    pub use crate::core::{HandlerOutcome, HandlerRole, Response};
    pub use crate::errors::{BindingError, ChainError, ForcedInterrupt, HandlerError, HandlerResult};
    pub use crate::events::{ChainEvent, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::handlers::{
        CheckHandler, CompletedHandler, FnCheck, FnCompleted, FnProcess, Handler, ProcessHandler,
    };
    pub use crate::observability::{init_logging, LoggingConfig};
    pub use crate::pipeline::{ExecutionReport, Pipeline, Termination};
}
