use napi::Result as NapiResult;
use napi_derive::napi;

use dante_finance_core::amortization::level_payment as term_payment;
use dante_finance_core::amortization::schedule;
use dante_finance_core::simulator::payment_comparison;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// Schedule from `LoanTerms` JSON (annual rate in percent).
#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: schedule::LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::amortize(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Schedule from `ScheduleInput` JSON (periodic rate).
#[napi]
pub fn amortization_schedule_periodic(input_json: String) -> NapiResult<String> {
    let input: schedule::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::generate_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn level_payment(input_json: String) -> NapiResult<String> {
    let input: term_payment::PaymentForTermInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = term_payment::payment_for_term(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Compare `SimulationTerms` JSON: current vs proposed payment.
#[napi]
pub fn compare_payments(input_json: String) -> NapiResult<String> {
    let input: payment_comparison::SimulationTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = payment_comparison::simulate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
