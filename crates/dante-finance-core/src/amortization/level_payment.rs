//! Level payment for a target term, checked against the schedule it produces.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::amortization::schedule::{generate_schedule, AmortizationOutcome, ScheduleInput};
use crate::error::DanteFinanceError;
use crate::time_value::{level_payment, periodic_rate_from_annual_pct};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, CENT};
use crate::DanteFinanceResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentForTermInput {
    pub principal: Money,
    /// Nominal annual rate in percent, compounded monthly.
    pub annual_rate_pct: Decimal,
    pub term_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentForTermOutput {
    pub periodic_rate: Rate,
    /// Fixed monthly payment, rounded up to the cent.
    pub payment_amount: Money,
    pub term_months: u32,
    /// Periods the resulting schedule actually needs (never above the term).
    pub periods_to_payoff: u32,
    /// Last payment: what is owed in the final period, usually below the fixed
    /// payment and never more than a cent above it.
    pub final_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
}

/// Cent adjustments tried on top of the closed-form payment. Interest
/// rounding drifts at most half a cent per period, so one always suffices.
const MAX_CENT_ADJUSTMENTS: u32 = 3;

/// Payment that retires the loan within `term_months`, with the totals of
/// the schedule it yields.
///
/// Starts from the closed-form level payment and raises it a cent at a time
/// until the cent-rounded schedule pays off within the term.
pub fn payment_for_term(
    input: &PaymentForTermInput,
) -> DanteFinanceResult<ComputationOutput<PaymentForTermOutput>> {
    let start = Instant::now();

    let periodic_rate = periodic_rate_from_annual_pct(input.annual_rate_pct)?;
    let closed_form = level_payment(input.principal, periodic_rate, input.term_months)?;

    let mut payment_amount = closed_form;
    let mut adjustments = 0;
    let (mut warnings, entries, totals) = loop {
        let schedule = generate_schedule(&ScheduleInput {
            principal: input.principal,
            periodic_rate,
            payment_amount,
            start_date: input.start_date,
            max_periods: Some(input.term_months),
        })?;

        match schedule.result.outcome {
            AmortizationOutcome::Amortizing { schedule: entries, totals } => {
                break (schedule.warnings, entries, totals);
            }
            other if adjustments < MAX_CENT_ADJUSTMENTS => {
                debug!(
                    payment = %payment_amount,
                    outcome = outcome_kind(&other),
                    "level payment falls short of the term, adding a cent"
                );
                payment_amount = payment_amount
                    .checked_add(CENT)
                    .ok_or_else(|| DanteFinanceError::overflow("level payment"))?;
                adjustments += 1;
            }
            other => {
                return Err(DanteFinanceError::invalid(
                    "term_months",
                    format!(
                        "Level payment {payment_amount} does not retire the loan in {} months ({})",
                        input.term_months,
                        outcome_kind(&other)
                    ),
                ))
            }
        }
    };

    if payment_amount > closed_form {
        warnings.push(format!(
            "Payment raised from {closed_form} to {payment_amount} so cent-rounded interest still pays off in {} months",
            input.term_months
        ));
    }

    let output = PaymentForTermOutput {
        periodic_rate,
        payment_amount,
        term_months: input.term_months,
        periods_to_payoff: totals.periods,
        final_payment: entries
            .last()
            .map(|e| e.payment_amount)
            .unwrap_or(payment_amount),
        total_interest: totals.total_interest,
        total_paid: totals.total_paid,
        payoff_date: totals.last_payment_date,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level payment (annuity PMT) rounded up to the cent",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "term_months": input.term_months,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn outcome_kind(outcome: &AmortizationOutcome) -> &'static str {
    match outcome {
        AmortizationOutcome::Amortizing { .. } => "amortizing",
        AmortizationOutcome::NonAmortizing { .. } => "non-amortizing",
        AmortizationOutcome::Incomplete { .. } => "incomplete",
    }
}
