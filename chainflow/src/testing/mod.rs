//! Testing utilities for chainflow pipelines.
//!
//! This module provides:
//! - Mock handlers that record their calls or misbehave on purpose
//! - Response assertions
//! - A credit-application chain used as a realistic fixture

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_response_data, assert_response_success, assert_response_system_error,
    assert_response_tip,
};
pub use fixtures::{
    credit_pipeline, ApplyCredit, CheckCreditParams, CreditRequest, CreditResult, FinalCredit,
    CREDIT_RESULT, MAX_APPLY_AMOUNT, MIN_APPLY_AMOUNT, PARAMS_ERROR_CODE,
};
pub use mocks::{
    CallLog, ContextProbe, DataCompleted, FaultyHandler, Misbehavior, PassingCheck,
    RecordingProcess, RejectingCheck, SlowProcess,
};
