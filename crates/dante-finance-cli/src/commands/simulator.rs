use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use dante_finance_core::simulator::payment_comparison::{self, SimulationTerms};

use crate::input;

/// Arguments for a current-vs-proposed payment comparison
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Outstanding balance
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual interest rate in percent (12 = 12%)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Baseline (current) monthly payment
    #[arg(long, alias = "current-payment")]
    pub payment_a: Option<Decimal>,

    /// Proposed monthly payment
    #[arg(long, alias = "proposed-payment")]
    pub payment_b: Option<Decimal>,

    /// First period counts from this date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Stop each scenario after this many periods
    #[arg(long)]
    pub max_periods: Option<u32>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: SimulationTerms = match input::from_file_or_stdin(args.input.as_deref())? {
        Some(terms) => terms,
        None => simulation_terms_from_flags(&args)?,
    };

    let result = payment_comparison::simulate(&terms)?;
    Ok(serde_json::to_value(result)?)
}

fn simulation_terms_from_flags(
    args: &SimulateArgs,
) -> Result<SimulationTerms, Box<dyn std::error::Error>> {
    Ok(SimulationTerms {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_pct: args
            .annual_rate
            .ok_or("--annual-rate is required (or provide --input)")?,
        current_payment: args
            .payment_a
            .ok_or("--payment-a is required (or provide --input)")?,
        proposed_payment: args
            .payment_b
            .ok_or("--payment-b is required (or provide --input)")?,
        start_date: args.start_date,
        max_periods: args.max_periods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::file::write_temp;
    use rust_decimal_macros::dec;

    fn simulate_flags() -> SimulateArgs {
        SimulateArgs {
            input: None,
            principal: Some(dec!(10000)),
            annual_rate: Some(dec!(12)),
            payment_a: Some(dec!(500)),
            payment_b: Some(dec!(750)),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 30),
            max_periods: None,
        }
    }

    #[test]
    fn test_input_file_takes_precedence_over_flags() {
        let path = write_temp(
            "simulate-precedence.json",
            r#"{"principal": "10000", "annual_rate_pct": "12", "current_payment": "50", "proposed_payment": "750", "start_date": "2025-06-30"}"#,
        );
        let args = SimulateArgs {
            input: Some(path.to_string_lossy().into_owned()),
            ..simulate_flags()
        };
        let value = run_simulate(args).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(value["result"]["baseline"]["kind"], "never_pays_off");
        assert_eq!(value["result"]["periods_delta"]["kind"], "improvement");
    }

    #[test]
    fn test_missing_proposed_payment_is_reported() {
        let args = SimulateArgs {
            payment_b: None,
            ..simulate_flags()
        };
        let err = simulation_terms_from_flags(&args).unwrap_err();
        assert_eq!(err.to_string(), "--payment-b is required (or provide --input)");
    }

    #[test]
    fn test_flags_build_simulation_terms() {
        let terms = simulation_terms_from_flags(&simulate_flags()).unwrap();
        assert_eq!(terms.current_payment, dec!(500));
        assert_eq!(terms.proposed_payment, dec!(750));
    }
}
