use chrono::NaiveDate;
use dante_finance_core::amortization::schedule::{generate_schedule, ScheduleInput};
use dante_finance_core::simulator::payment_comparison::{
    compare_payments, simulate, Delta, ScenarioSummary, SimulationInput, SimulationTerms,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Payment simulator tests
// ===========================================================================

fn sample_loan(payment_a: Decimal, payment_b: Decimal) -> SimulationInput {
    SimulationInput {
        principal: dec!(10000),
        periodic_rate: dec!(0.01),
        payment_a,
        payment_b,
        start_date: NaiveDate::from_ymd_opt(2025, 6, 30),
        max_periods: None,
    }
}

#[test]
fn test_higher_payment_saves_time_and_interest() {
    let out = compare_payments(&sample_loan(dec!(500), dec!(750)))
        .unwrap()
        .result;

    match (&out.periods_delta, &out.interest_delta) {
        (Delta::Exact { value: periods }, Delta::Exact { value: interest }) => {
            assert!(*periods > 0, "proposal should finish sooner");
            assert!(*interest > Decimal::ZERO, "proposal should pay less interest");
        }
        other => panic!("expected exact deltas, got {other:?}"),
    }
}

#[test]
fn test_scenarios_match_standalone_schedules() {
    let input = sample_loan(dec!(500), dec!(750));
    let out = compare_payments(&input).unwrap().result;

    for (payment, summary) in [(dec!(500), &out.baseline), (dec!(750), &out.proposal)] {
        let schedule = generate_schedule(&ScheduleInput {
            principal: input.principal,
            periodic_rate: input.periodic_rate,
            payment_amount: payment,
            start_date: input.start_date,
            max_periods: None,
        })
        .unwrap()
        .result;
        let totals = schedule.outcome.totals().unwrap();
        assert_eq!(
            summary,
            &ScenarioSummary::PaysOff {
                periods: totals.periods,
                total_interest: totals.total_interest,
                total_paid: totals.total_paid,
                payoff_date: totals.last_payment_date,
            }
        );
    }
}

#[test]
fn test_non_amortizing_baseline_reports_improvement() {
    let out = compare_payments(&sample_loan(dec!(50), dec!(750)))
        .unwrap()
        .result;
    assert_eq!(out.periods_delta, Delta::Improvement);
    assert_eq!(out.interest_delta, Delta::Improvement);
    match out.baseline {
        ScenarioSummary::NeverPaysOff {
            minimum_payment, ..
        } => assert_eq!(minimum_payment, dec!(100.01)),
        other => panic!("expected never_pays_off, got {other:?}"),
    }
}

#[test]
fn test_no_numeric_artifacts_in_json() {
    for (a, b) in [
        (dec!(50), dec!(750)),
        (dec!(750), dec!(50)),
        (dec!(50), dec!(60)),
    ] {
        let out = compare_payments(&sample_loan(a, b)).unwrap();
        let json = serde_json::to_string(&out.result).unwrap();
        assert!(!json.contains("NaN"));
        assert!(!json.contains("inf"));
        assert!(!json.contains("\"value\""), "non-finite deltas carry no value: {json}");
    }
}

#[test]
fn test_simulate_from_terms_json() {
    let json = r#"{
        "principal": "10000",
        "annual_rate_pct": "12",
        "current_payment": "500",
        "proposed_payment": "750",
        "start_date": "2025-06-30",
        "max_periods": 600
    }"#;
    let terms: SimulationTerms = serde_json::from_str(json).unwrap();
    let out = simulate(&terms).unwrap().result;
    assert_eq!(out.periods_delta, Delta::Exact { value: 8 });
    match out.proposal {
        ScenarioSummary::PaysOff { payoff_date, .. } => {
            // 15 months after 30 June, clamped to month end
            assert_eq!(payoff_date, NaiveDate::from_ymd_opt(2026, 9, 30));
        }
        other => panic!("expected pays_off, got {other:?}"),
    }
}
