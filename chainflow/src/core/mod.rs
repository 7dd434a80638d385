//! Core domain model types for chainflow.
//!
//! This module contains the fundamental types used throughout the framework:
//! - The response record handed back by every execution
//! - Handler role and per-handler outcome enums

mod response;
mod status;

pub use response::Response;
pub use status::{HandlerOutcome, HandlerRole};
