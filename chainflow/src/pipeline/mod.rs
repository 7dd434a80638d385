//! Pipeline building and execution.
//!
//! This module provides:
//! - [`Pipeline`], the ordered handler chain and its executor
//! - [`ExecutionReport`], a per-execution summary of what each handler did

mod chain;
mod report;


pub use chain::Pipeline;
pub use report::{ExecutionReport, StepRecord, Termination};
