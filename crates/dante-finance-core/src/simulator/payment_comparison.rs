//! "What-if" comparison of two fixed payments on the same loan.
//!
//! Both scenarios run through the schedule generator; the deltas are reported
//! as a tagged [`Delta`] so a scenario that never pays off (or pays off past
//! the period cap) is never turned into a numeric artifact.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::amortization::schedule::{
    generate_schedule, AmortizationOutcome, AmortizationOutput, ScheduleInput,
    DEFAULT_MAX_PERIODS,
};
use crate::error::DanteFinanceError;
use crate::time_value::periodic_rate_from_annual_pct;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::DanteFinanceResult;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Input for comparing a baseline payment against a proposed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub principal: Money,
    /// Interest rate per payment period (0.01 = 1% per month).
    pub periodic_rate: Rate,
    /// Baseline, usually the current payment.
    pub payment_a: Money,
    /// Proposed payment.
    pub payment_b: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_periods: Option<u32>,
}

/// Simulation inputs with a nominal annual rate in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationTerms {
    pub principal: Money,
    pub annual_rate_pct: Decimal,
    pub current_payment: Money,
    pub proposed_payment: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_periods: Option<u32>,
}

impl SimulationTerms {
    pub fn to_simulation_input(&self) -> DanteFinanceResult<SimulationInput> {
        Ok(SimulationInput {
            principal: self.principal,
            periodic_rate: periodic_rate_from_annual_pct(self.annual_rate_pct)?,
            payment_a: self.current_payment,
            payment_b: self.proposed_payment,
            start_date: self.start_date,
            max_periods: self.max_periods,
        })
    }
}

/// How one payment scenario ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioSummary {
    PaysOff {
        periods: u32,
        total_interest: Money,
        total_paid: Money,
        #[serde(skip_serializing_if = "Option::is_none")]
        payoff_date: Option<NaiveDate>,
    },
    NeverPaysOff {
        interest_due: Money,
        minimum_payment: Money,
    },
    /// Amortizes, but not within the period cap.
    BeyondHorizon {
        periods_computed: u32,
        interest_so_far: Money,
        remaining_balance: Money,
    },
}

impl ScenarioSummary {
    pub fn from_outcome(outcome: &AmortizationOutcome) -> Self {
        match outcome {
            AmortizationOutcome::Amortizing { totals, .. } => ScenarioSummary::PaysOff {
                periods: totals.periods,
                total_interest: totals.total_interest,
                total_paid: totals.total_paid,
                payoff_date: totals.last_payment_date,
            },
            AmortizationOutcome::NonAmortizing {
                interest_due,
                minimum_payment,
                ..
            } => ScenarioSummary::NeverPaysOff {
                interest_due: *interest_due,
                minimum_payment: *minimum_payment,
            },
            AmortizationOutcome::Incomplete {
                periods_computed,
                remaining_balance,
                totals,
                ..
            } => ScenarioSummary::BeyondHorizon {
                periods_computed: *periods_computed,
                interest_so_far: totals.total_interest,
                remaining_balance: *remaining_balance,
            },
        }
    }
}

/// Baseline minus proposal, positive when the proposal is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Delta<T> {
    /// Both scenarios pay off.
    Exact { value: T },
    /// Baseline runs past the cap; the true delta exceeds `value`.
    AtLeast { value: T },
    /// Proposal runs past the cap; the true delta is below `value`.
    AtMost { value: T },
    /// Baseline never pays off, proposal does.
    Improvement,
    /// Baseline pays off, proposal never does.
    Regression,
    /// Neither scenario has a finite horizon to compare.
    Undefined,
}

impl<T> Delta<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Delta::Exact { value } | Delta::AtLeast { value } | Delta::AtMost { value } => {
                Some(value)
            }
            Delta::Improvement | Delta::Regression | Delta::Undefined => None,
        }
    }
}

/// Output of a payment comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub baseline: ScenarioSummary,
    pub proposal: ScenarioSummary,
    /// payment_b - payment_a
    pub payment_increase: Money,
    /// periods_a - periods_b
    pub periods_delta: Delta<i64>,
    /// interest_a - interest_b
    pub interest_delta: Delta<Money>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare payoff time and total interest between two payments.
pub fn compare_payments(
    input: &SimulationInput,
) -> DanteFinanceResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // Both branches must count from the same day
    let start_date = match input.start_date {
        Some(date) => date,
        None => {
            let today = Local::now().date_naive();
            warnings.push(format!("No start date given; counting from today ({today})"));
            today
        }
    };
    let max_periods = input.max_periods.unwrap_or(DEFAULT_MAX_PERIODS);

    let baseline = run_scenario(input, input.payment_a, start_date, max_periods)
        .map_err(|e| label_payment_error(e, "payment_a"))?;
    let proposal = run_scenario(input, input.payment_b, start_date, max_periods)
        .map_err(|e| label_payment_error(e, "payment_b"))?;

    for w in baseline.warnings {
        warnings.push(format!("baseline: {w}"));
    }
    for w in proposal.warnings {
        warnings.push(format!("proposal: {w}"));
    }

    let baseline = ScenarioSummary::from_outcome(&baseline.result.outcome);
    let proposal = ScenarioSummary::from_outcome(&proposal.result.outcome);

    let (periods_delta, interest_delta) = compute_deltas(&baseline, &proposal);

    debug!(?periods_delta, ?interest_delta, "payment comparison complete");

    let output = SimulationOutput {
        baseline,
        proposal,
        payment_increase: input.payment_b - input.payment_a,
        periods_delta,
        interest_delta,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Payment comparison: two fixed-payment amortization schedules",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "periodic_rate": input.periodic_rate.to_string(),
            "payment_a": input.payment_a.to_string(),
            "payment_b": input.payment_b.to_string(),
            "start_date": start_date.to_string(),
            "max_periods": max_periods,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Compare payments from terms with an annual percent rate.
pub fn simulate(
    terms: &SimulationTerms,
) -> DanteFinanceResult<ComputationOutput<SimulationOutput>> {
    compare_payments(&terms.to_simulation_input()?)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn run_scenario(
    input: &SimulationInput,
    payment: Money,
    start_date: NaiveDate,
    max_periods: u32,
) -> DanteFinanceResult<ComputationOutput<AmortizationOutput>> {
    generate_schedule(&ScheduleInput {
        principal: input.principal,
        periodic_rate: input.periodic_rate,
        payment_amount: payment,
        start_date: Some(start_date),
        max_periods: Some(max_periods),
    })
}

fn label_payment_error(e: DanteFinanceError, field: &str) -> DanteFinanceError {
    match e {
        DanteFinanceError::InvalidInput {
            field: ref inner,
            reason,
        } if inner == "payment_amount" => DanteFinanceError::InvalidInput {
            field: field.into(),
            reason,
        },
        other => other,
    }
}

fn compute_deltas(
    baseline: &ScenarioSummary,
    proposal: &ScenarioSummary,
) -> (Delta<i64>, Delta<Money>) {
    use ScenarioSummary::*;

    match (baseline, proposal) {
        (
            PaysOff {
                periods: pa,
                total_interest: ia,
                ..
            },
            PaysOff {
                periods: pb,
                total_interest: ib,
                ..
            },
        ) => (
            Delta::Exact {
                value: i64::from(*pa) - i64::from(*pb),
            },
            Delta::Exact { value: ia - ib },
        ),
        (
            BeyondHorizon {
                periods_computed: pa,
                interest_so_far: ia,
                ..
            },
            PaysOff {
                periods: pb,
                total_interest: ib,
                ..
            },
        ) => (
            Delta::AtLeast {
                value: i64::from(*pa) - i64::from(*pb),
            },
            Delta::AtLeast { value: ia - ib },
        ),
        (
            PaysOff {
                periods: pa,
                total_interest: ia,
                ..
            },
            BeyondHorizon {
                periods_computed: pb,
                interest_so_far: ib,
                ..
            },
        ) => (
            Delta::AtMost {
                value: i64::from(*pa) - i64::from(*pb),
            },
            Delta::AtMost { value: ia - ib },
        ),
        (NeverPaysOff { .. }, PaysOff { .. } | BeyondHorizon { .. }) => {
            (Delta::Improvement, Delta::Improvement)
        }
        (PaysOff { .. } | BeyondHorizon { .. }, NeverPaysOff { .. }) => {
            (Delta::Regression, Delta::Regression)
        }
        (NeverPaysOff { .. }, NeverPaysOff { .. })
        | (BeyondHorizon { .. }, BeyondHorizon { .. }) => (Delta::Undefined, Delta::Undefined),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn loan(payment_a: Money, payment_b: Money) -> SimulationInput {
        SimulationInput {
            principal: dec!(10000),
            periodic_rate: dec!(0.01),
            payment_a,
            payment_b,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            max_periods: None,
        }
    }

    fn run(input: &SimulationInput) -> SimulationOutput {
        compare_payments(input).unwrap().result
    }

    #[test]
    fn test_higher_payment_finishes_sooner_and_cheaper() {
        let out = run(&loan(dec!(500), dec!(750)));
        // 500/month pays off in 23 periods, 750/month in 15
        assert_eq!(out.periods_delta, Delta::Exact { value: 8 });
        assert_eq!(
            out.interest_delta,
            Delta::Exact {
                value: dec!(1213.48) - dec!(787.01)
            }
        );
        assert_eq!(out.payment_increase, dec!(250));
    }

    #[test]
    fn test_lower_proposal_gives_negative_delta() {
        let out = run(&loan(dec!(750), dec!(500)));
        assert_eq!(out.periods_delta, Delta::Exact { value: -8 });
        assert!(*out.interest_delta.value().unwrap() < Decimal::ZERO);
    }

    #[test]
    fn test_same_payment_zero_delta() {
        let out = run(&loan(dec!(500), dec!(500)));
        assert_eq!(out.periods_delta, Delta::Exact { value: 0 });
        assert_eq!(out.interest_delta, Delta::Exact { value: Decimal::ZERO });
    }

    #[test]
    fn test_non_amortizing_baseline_to_amortizing_proposal() {
        let out = run(&loan(dec!(50), dec!(500)));
        assert!(matches!(out.baseline, ScenarioSummary::NeverPaysOff { .. }));
        assert!(matches!(out.proposal, ScenarioSummary::PaysOff { periods: 23, .. }));
        assert_eq!(out.periods_delta, Delta::Improvement);
        assert_eq!(out.interest_delta, Delta::Improvement);
    }

    #[test]
    fn test_amortizing_baseline_to_non_amortizing_proposal() {
        let out = run(&loan(dec!(500), dec!(100)));
        assert_eq!(out.periods_delta, Delta::Regression);
        assert_eq!(out.interest_delta.value(), None);
    }

    #[test]
    fn test_neither_amortizes() {
        let out = run(&loan(dec!(50), dec!(100)));
        assert_eq!(out.periods_delta, Delta::Undefined);
        assert_eq!(out.interest_delta, Delta::Undefined);
    }

    #[test]
    fn test_baseline_beyond_horizon_gives_lower_bound() {
        let input = SimulationInput {
            max_periods: Some(20),
            ..loan(dec!(500), dec!(750))
        };
        let out = run(&input);
        assert!(matches!(
            out.baseline,
            ScenarioSummary::BeyondHorizon {
                periods_computed: 20,
                ..
            }
        ));
        assert_eq!(out.periods_delta, Delta::AtLeast { value: 5 });
        assert!(matches!(out.interest_delta, Delta::AtLeast { .. }));
    }

    #[test]
    fn test_proposal_beyond_horizon_gives_upper_bound() {
        let input = SimulationInput {
            max_periods: Some(20),
            ..loan(dec!(750), dec!(500))
        };
        let out = run(&input);
        assert_eq!(out.periods_delta, Delta::AtMost { value: -5 });
    }

    #[test]
    fn test_both_beyond_horizon_undefined() {
        let input = SimulationInput {
            max_periods: Some(5),
            ..loan(dec!(500), dec!(750))
        };
        let out = run(&input);
        assert_eq!(out.periods_delta, Delta::Undefined);
    }

    #[test]
    fn test_invalid_payment_names_branch() {
        let err = compare_payments(&loan(dec!(500), dec!(0))).unwrap_err();
        assert!(matches!(err, DanteFinanceError::InvalidInput { ref field, .. } if field == "payment_b"));
    }

    #[test]
    fn test_warnings_labelled_by_branch() {
        let out = compare_payments(&loan(dec!(50), dec!(500))).unwrap();
        assert!(out.warnings.iter().any(|w| w.starts_with("baseline: ")));
        assert!(!out.warnings.iter().any(|w| w.starts_with("proposal: ")));
    }

    #[test]
    fn test_simulation_terms_from_annual_percent() {
        let terms = SimulationTerms {
            principal: dec!(10000),
            annual_rate_pct: dec!(12),
            current_payment: dec!(500),
            proposed_payment: dec!(750),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            max_periods: None,
        };
        let out = simulate(&terms).unwrap().result;
        assert_eq!(out, run(&loan(dec!(500), dec!(750))));
    }

    #[test]
    fn test_delta_serializes_with_kind_tag() {
        let out = run(&loan(dec!(50), dec!(500)));
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["periods_delta"]["kind"], "improvement");
        assert_eq!(value["baseline"]["kind"], "never_pays_off");
        assert_eq!(value["proposal"]["kind"], "pays_off");
    }
}
