//! Fixed-payment loan amortization.
//!
//! Builds the period-by-period split of each payment into interest and
//! principal until the balance reaches zero, the payment stops covering the
//! interest, or the period cap is hit. All amounts are `rust_decimal::Decimal`
//! rounded to whole cents, so every entry conserves its payment exactly.

use chrono::{Local, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::DanteFinanceError;
use crate::time_value::{minimum_amortizing_payment, periodic_rate_from_annual_pct};
use crate::types::{round_money, with_metadata, ComputationOutput, Money, Rate, CENT};
use crate::DanteFinanceResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Period cap applied when the caller does not supply one.
pub const DEFAULT_MAX_PERIODS: u32 = 1000;

/// A remaining balance at or below this is treated as paid off.
const PAYOFF_EPSILON: Money = CENT;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Loan state in periodic form, as consumed by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInput {
    /// Outstanding balance at the start of the schedule.
    pub principal: Money,
    /// Interest rate per payment period (0.01 = 1% per month).
    pub periodic_rate: Rate,
    /// Fixed payment made every period.
    pub payment_amount: Money,
    /// Labels the rows; today when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Iteration cap; defaults to [`DEFAULT_MAX_PERIODS`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_periods: Option<u32>,
}

/// Loan terms as a user enters them: a nominal annual rate in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Nominal annual rate in percent (`12` = 12%), compounded monthly.
    pub annual_rate_pct: Decimal,
    pub payment_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_periods: Option<u32>,
}

impl LoanTerms {
    pub fn to_schedule_input(&self) -> DanteFinanceResult<ScheduleInput> {
        Ok(ScheduleInput {
            principal: self.principal,
            periodic_rate: periodic_rate_from_annual_pct(self.annual_rate_pct)?,
            payment_amount: self.payment_amount,
            start_date: self.start_date,
            max_periods: self.max_periods,
        })
    }
}

/// One period of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1-based period index.
    pub period: u32,
    /// `start_date + period` months, clamped to the end of shorter months.
    pub payment_date: NaiveDate,
    /// The fixed payment, except on the final entry which pays what is owed.
    pub payment_amount: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub remaining_balance: Money,
}

/// Aggregates over a (possibly partial) schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    pub total_paid: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    /// Number of entries. Equals the periods to payoff for a complete schedule.
    pub periods: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_payment_date: Option<NaiveDate>,
}

impl ScheduleTotals {
    pub fn from_entries(entries: &[ScheduleEntry]) -> DanteFinanceResult<Self> {
        Ok(ScheduleTotals {
            total_paid: checked_total(entries, "total paid", |e| e.payment_amount)?,
            total_interest: checked_total(entries, "total interest", |e| e.interest_portion)?,
            total_principal: checked_total(entries, "total principal", |e| e.principal_portion)?,
            periods: entries.len() as u32,
            last_payment_date: entries.last().map(|e| e.payment_date),
        })
    }
}

fn checked_total(
    entries: &[ScheduleEntry],
    context: &str,
    amount: impl Fn(&ScheduleEntry) -> Money,
) -> DanteFinanceResult<Money> {
    entries
        .iter()
        .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(amount(e)))
        .ok_or_else(|| DanteFinanceError::overflow(context))
}

/// Result of running the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AmortizationOutcome {
    /// The balance reached zero.
    Amortizing {
        schedule: Vec<ScheduleEntry>,
        totals: ScheduleTotals,
    },
    /// The payment does not exceed the interest accrued in `period`; the
    /// balance never decreases and the loan never pays off.
    NonAmortizing {
        period: u32,
        balance: Money,
        interest_due: Money,
        payment_amount: Money,
        /// Smallest payment that would amortize from this balance.
        minimum_payment: Money,
    },
    /// The loan amortizes but did not pay off within the period cap.
    Incomplete {
        partial_schedule: Vec<ScheduleEntry>,
        periods_computed: u32,
        remaining_balance: Money,
        totals: ScheduleTotals,
    },
}

impl AmortizationOutcome {
    pub fn is_amortizing(&self) -> bool {
        matches!(self, AmortizationOutcome::Amortizing { .. })
    }

    /// Entries computed, empty for a non-amortizing loan.
    pub fn entries(&self) -> &[ScheduleEntry] {
        match self {
            AmortizationOutcome::Amortizing { schedule, .. } => schedule,
            AmortizationOutcome::Incomplete {
                partial_schedule, ..
            } => partial_schedule,
            AmortizationOutcome::NonAmortizing { .. } => &[],
        }
    }

    pub fn totals(&self) -> Option<&ScheduleTotals> {
        match self {
            AmortizationOutcome::Amortizing { totals, .. }
            | AmortizationOutcome::Incomplete { totals, .. } => Some(totals),
            AmortizationOutcome::NonAmortizing { .. } => None,
        }
    }
}

/// Output of the schedule generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub principal: Money,
    pub periodic_rate: Rate,
    pub payment_amount: Money,
    /// Resolved start date the payment dates count from.
    pub start_date: NaiveDate,
    pub max_periods: u32,
    pub outcome: AmortizationOutcome,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generate the amortization schedule for a fixed periodic payment.
pub fn generate_schedule(
    input: &ScheduleInput,
) -> DanteFinanceResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_schedule_input(input)?;

    let start_date = match input.start_date {
        Some(date) => date,
        None => {
            let today = Local::now().date_naive();
            warnings.push(format!("No start date given; counting from today ({today})"));
            today
        }
    };
    let max_periods = input.max_periods.unwrap_or(DEFAULT_MAX_PERIODS);

    if input.periodic_rate.is_zero() {
        warnings.push("Zero interest rate: every payment goes to principal".into());
    }

    debug!(
        principal = %input.principal,
        periodic_rate = %input.periodic_rate,
        payment = %input.payment_amount,
        max_periods,
        "generating amortization schedule"
    );

    let outcome = build_schedule(input, start_date, max_periods)?;

    match &outcome {
        AmortizationOutcome::Amortizing { totals, .. } => {
            debug!(periods = totals.periods, total_interest = %totals.total_interest, "loan pays off");
        }
        AmortizationOutcome::NonAmortizing {
            period,
            interest_due,
            minimum_payment,
            ..
        } => {
            warn!(period, interest_due = %interest_due, "payment does not cover interest");
            warnings.push(format!(
                "Payment {} does not exceed interest {} due in period {}; minimum amortizing payment is {}",
                input.payment_amount, interest_due, period, minimum_payment
            ));
        }
        AmortizationOutcome::Incomplete {
            remaining_balance, ..
        } => {
            warn!(max_periods, remaining_balance = %remaining_balance, "period cap reached before payoff");
            warnings.push(format!(
                "Loan not paid off within {max_periods} periods; {remaining_balance} still outstanding"
            ));
        }
    }

    let output = AmortizationOutput {
        principal: input.principal,
        periodic_rate: input.periodic_rate,
        payment_amount: input.payment_amount,
        start_date,
        max_periods,
        outcome,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-payment amortization: monthly periods, interest rounded to cents",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "periodic_rate": input.periodic_rate.to_string(),
            "payment_amount": input.payment_amount.to_string(),
            "start_date": start_date.to_string(),
            "max_periods": max_periods,
            "payoff_epsilon": PAYOFF_EPSILON.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Generate a schedule from user-facing terms with an annual percent rate.
pub fn amortize(terms: &LoanTerms) -> DanteFinanceResult<ComputationOutput<AmortizationOutput>> {
    generate_schedule(&terms.to_schedule_input()?)
}

// ---------------------------------------------------------------------------
// Core recurrence
// ---------------------------------------------------------------------------

/// Run the recurrence from a resolved start date. Pure.
pub(crate) fn build_schedule(
    input: &ScheduleInput,
    start_date: NaiveDate,
    max_periods: u32,
) -> DanteFinanceResult<AmortizationOutcome> {
    let rate = input.periodic_rate;
    let payment = input.payment_amount;

    let mut schedule: Vec<ScheduleEntry> = Vec::new();
    let mut balance = input.principal;

    for period in 1..=max_periods {
        let accrued = balance
            .checked_mul(rate)
            .ok_or_else(|| DanteFinanceError::overflow("period interest"))?;
        let interest = round_money(accrued);

        // Checked every period against the current balance, exact and as charged
        if payment <= accrued || payment <= interest {
            return Ok(AmortizationOutcome::NonAmortizing {
                period,
                balance,
                interest_due: interest,
                payment_amount: payment,
                minimum_payment: minimum_amortizing_payment(balance, rate)?,
            });
        }

        let payment_date = payment_date(start_date, period)?;
        let after_full_payment = balance - (payment - interest);

        let entry = if after_full_payment <= PAYOFF_EPSILON {
            // Final period: pay exactly what is owed, folding any sub-cent residual
            ScheduleEntry {
                period,
                payment_date,
                payment_amount: balance
                    .checked_add(interest)
                    .ok_or_else(|| DanteFinanceError::overflow("final payment"))?,
                interest_portion: interest,
                principal_portion: balance,
                remaining_balance: Decimal::ZERO,
            }
        } else {
            ScheduleEntry {
                period,
                payment_date,
                payment_amount: payment,
                interest_portion: interest,
                principal_portion: payment - interest,
                remaining_balance: after_full_payment,
            }
        };

        balance = entry.remaining_balance;
        schedule.push(entry);

        if balance.is_zero() {
            let totals = ScheduleTotals::from_entries(&schedule)?;
            return Ok(AmortizationOutcome::Amortizing { schedule, totals });
        }
    }

    let totals = ScheduleTotals::from_entries(&schedule)?;
    Ok(AmortizationOutcome::Incomplete {
        periods_computed: schedule.len() as u32,
        remaining_balance: balance,
        partial_schedule: schedule,
        totals,
    })
}

fn payment_date(start_date: NaiveDate, period: u32) -> DanteFinanceResult<NaiveDate> {
    start_date
        .checked_add_months(Months::new(period))
        .ok_or_else(|| {
            DanteFinanceError::DateError(format!(
                "Payment date for period {period} after {start_date} is out of range"
            ))
        })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_schedule_input(input: &ScheduleInput) -> DanteFinanceResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(DanteFinanceError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    if input.periodic_rate < Decimal::ZERO {
        return Err(DanteFinanceError::invalid(
            "periodic_rate",
            "Periodic rate cannot be negative",
        ));
    }
    if input.payment_amount <= Decimal::ZERO {
        return Err(DanteFinanceError::invalid(
            "payment_amount",
            "Payment amount must be positive",
        ));
    }
    if input.max_periods == Some(0) {
        return Err(DanteFinanceError::invalid(
            "max_periods",
            "Period cap must be at least 1",
        ));
    }
    Ok(())
}
