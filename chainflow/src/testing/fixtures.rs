//! A credit-application chain used by tests and benchmarks.
//!
//! `CheckCreditParams` validates the request, `ApplyCredit` decides the
//! application and stores the result under [`CREDIT_RESULT`], and
//! `FinalCredit` reads it back through a [`BindingTable`] and delivers it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::binding::{BindingTable, ScratchKey};
use crate::context::ExecutionContext;
use crate::errors::{BindingError, HandlerError, HandlerResult};
use crate::handlers::{CheckHandler, CompletedHandler, ProcessHandler};
use crate::pipeline::Pipeline;

/// Code of every parameter rejection.
pub const PARAMS_ERROR_CODE: &str = "100001";

/// Smallest amount accepted.
pub const MIN_APPLY_AMOUNT: u64 = 500;

/// Largest amount accepted.
pub const MAX_APPLY_AMOUNT: u64 = 50_000;

/// Scratch key holding the decided application.
pub const CREDIT_RESULT: ScratchKey<CreditResult> = ScratchKey::new("creditResult");

/// A credit application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRequest {
    /// Product applied for.
    pub product_code: Option<String>,
    /// Application number.
    pub apply_no: Option<String>,
    /// Requested amount.
    pub apply_amount: Option<u64>,
}

impl CreditRequest {
    /// Creates a fully populated request.
    #[must_use]
    pub fn new(product_code: impl Into<String>, apply_no: impl Into<String>, apply_amount: u64) -> Self {
        Self {
            product_code: Some(product_code.into()),
            apply_no: Some(apply_no.into()),
            apply_amount: Some(apply_amount),
        }
    }
}

/// The decided application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditResult {
    /// Product applied for.
    pub product_code: String,
    /// Application number.
    pub apply_no: String,
    /// Requested amount.
    pub apply_amount: u64,
    /// `SUCCESS` or `FAIL`.
    pub status: String,
}

fn params_error(ctx: &mut ExecutionContext<CreditResult>, detail: &str) {
    ctx.signal_tip(PARAMS_ERROR_CODE, format!("Parameter error - {detail}"));
}

fn is_blank(value: Option<&String>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Rejects incomplete requests and out-of-range amounts.
#[derive(Debug, Default)]
pub struct CheckCreditParams;

#[async_trait]
impl CheckHandler<CreditRequest, CreditResult> for CheckCreditParams {
    async fn check_params(
        &self,
        ctx: &mut ExecutionContext<CreditResult>,
        request: &CreditRequest,
    ) -> HandlerResult {
        if is_blank(request.product_code.as_ref()) {
            params_error(ctx, "productCode must not be blank");
        } else if is_blank(request.apply_no.as_ref()) {
            params_error(ctx, "applyNo must not be blank");
        } else {
            match request.apply_amount {
                None => params_error(ctx, "applyAmount must not be empty"),
                Some(amount) if amount < MIN_APPLY_AMOUNT => params_error(
                    ctx,
                    &format!("applyAmount must not be less than {MIN_APPLY_AMOUNT}"),
                ),
                Some(amount) if amount > MAX_APPLY_AMOUNT => params_error(
                    ctx,
                    &format!("applyAmount must not be greater than {MAX_APPLY_AMOUNT}"),
                ),
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Decides the application from the last digit of its number.
///
/// `...0` succeeds, `...9` fails, anything else is a fault.
#[derive(Debug, Default)]
pub struct ApplyCredit;

#[async_trait]
impl ProcessHandler<CreditRequest, CreditResult> for ApplyCredit {
    async fn duplicated(
        &self,
        _ctx: &mut ExecutionContext<CreditResult>,
        _request: &CreditRequest,
    ) -> HandlerResult<bool> {
        Ok(false)
    }

    async fn process(
        &self,
        ctx: &mut ExecutionContext<CreditResult>,
        request: &CreditRequest,
    ) -> HandlerResult {
        let apply_no = request.apply_no.clone().unwrap_or_default();
        let status = if apply_no.ends_with('0') {
            "SUCCESS"
        } else if apply_no.ends_with('9') {
            "FAIL"
        } else {
            return Err(HandlerError::fault(format!("{apply_no} Error")));
        };

        let result = CreditResult {
            product_code: request.product_code.clone().unwrap_or_default(),
            apply_no,
            apply_amount: request.apply_amount.unwrap_or_default(),
            status: status.to_string(),
        };
        ctx.write(&CREDIT_RESULT, result)?;
        Ok(())
    }
}

/// Delivers the stored result as the response data.
#[derive(Debug)]
pub struct FinalCredit {
    bindings: BindingTable,
}

impl FinalCredit {
    /// Creates the handler and its accessor table.
    ///
    /// # Errors
    ///
    /// Returns the binding error if the table is invalid.
    pub fn new() -> Result<Self, BindingError> {
        let bindings = BindingTable::builder("FinalCredit")
            .read("get_credit_result", CREDIT_RESULT.name())
            .build()?;
        Ok(Self { bindings })
    }

    /// Returns the accessor table.
    #[must_use]
    pub const fn bindings(&self) -> &BindingTable {
        &self.bindings
    }
}

#[async_trait]
impl CompletedHandler<CreditRequest, CreditResult> for FinalCredit {
    async fn completed(
        &self,
        ctx: &mut ExecutionContext<CreditResult>,
        _request: &CreditRequest,
    ) -> HandlerResult {
        let result: Option<CreditResult> = self.bindings.read(ctx, "get_credit_result")?;
        let result = result.ok_or_else(|| HandlerError::fault("credit result was never written"))?;
        ctx.signal_data(result);
        Ok(())
    }
}

/// Builds the `[CheckCreditParams, ApplyCredit, FinalCredit]` chain.
///
/// # Errors
///
/// Returns the binding error of [`FinalCredit::new`].
pub fn credit_pipeline() -> Result<Pipeline<CreditRequest, CreditResult>, BindingError> {
    Ok(Pipeline::new("credit")
        .check(CheckCreditParams)
        .process(ApplyCredit)
        .completed(FinalCredit::new()?))
}
