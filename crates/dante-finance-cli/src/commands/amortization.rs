use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use dante_finance_core::amortization::level_payment::{self, PaymentForTermInput};
use dante_finance_core::amortization::schedule::{self, LoanTerms};

use crate::input;

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Outstanding balance
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual interest rate in percent (12 = 12%)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Fixed monthly payment
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// First period counts from this date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Stop after this many periods
    #[arg(long)]
    pub max_periods: Option<u32>,
}

/// Arguments for the level payment of a target term
#[derive(Args)]
pub struct PaymentArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Outstanding balance
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual interest rate in percent (12 = 12%)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "months")]
    pub term_months: Option<u32>,

    /// First period counts from this date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = match input::from_file_or_stdin(args.input.as_deref())? {
        Some(terms) => terms,
        None => loan_terms_from_flags(&args)?,
    };

    let result = schedule::amortize(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input: PaymentForTermInput = match input::from_file_or_stdin(args.input.as_deref())? {
        Some(data) => data,
        None => payment_input_from_flags(&args)?,
    };

    let result = level_payment::payment_for_term(&payment_input)?;
    Ok(serde_json::to_value(result)?)
}

fn loan_terms_from_flags(args: &ScheduleArgs) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    Ok(LoanTerms {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_pct: args
            .annual_rate
            .ok_or("--annual-rate is required (or provide --input)")?,
        payment_amount: args
            .payment
            .ok_or("--payment is required (or provide --input)")?,
        start_date: args.start_date,
        max_periods: args.max_periods,
    })
}

fn payment_input_from_flags(
    args: &PaymentArgs,
) -> Result<PaymentForTermInput, Box<dyn std::error::Error>> {
    Ok(PaymentForTermInput {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_pct: args
            .annual_rate
            .ok_or("--annual-rate is required (or provide --input)")?,
        term_months: args
            .term_months
            .ok_or("--term-months is required (or provide --input)")?,
        start_date: args.start_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::file::write_temp;
    use rust_decimal_macros::dec;

    fn schedule_flags() -> ScheduleArgs {
        ScheduleArgs {
            input: None,
            principal: Some(dec!(5000)),
            annual_rate: Some(dec!(6)),
            payment: Some(dec!(999)),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 15),
            max_periods: None,
        }
    }

    #[test]
    fn test_input_file_takes_precedence_over_flags() {
        let path = write_temp(
            "schedule-precedence.json",
            r#"{"principal": "10000", "annual_rate_pct": "12", "payment_amount": "500", "start_date": "2025-01-15"}"#,
        );
        let args = ScheduleArgs {
            input: Some(path.to_string_lossy().into_owned()),
            ..schedule_flags()
        };
        let value = run_schedule(args).unwrap();
        std::fs::remove_file(&path).ok();

        let result = &value["result"];
        assert_eq!(result["principal"], "10000");
        assert_eq!(result["payment_amount"], "500");
        assert_eq!(result["outcome"]["kind"], "amortizing");
        assert_eq!(result["outcome"]["totals"]["periods"], 23);
    }

    #[test]
    fn test_flags_build_loan_terms() {
        let terms = loan_terms_from_flags(&schedule_flags()).unwrap();
        assert_eq!(terms.principal, dec!(5000));
        assert_eq!(terms.annual_rate_pct, dec!(6));
        assert_eq!(terms.payment_amount, dec!(999));
    }

    #[test]
    fn test_missing_payment_flag_is_reported() {
        let args = ScheduleArgs {
            payment: None,
            ..schedule_flags()
        };
        let err = loan_terms_from_flags(&args).unwrap_err();
        assert_eq!(err.to_string(), "--payment is required (or provide --input)");
    }

    #[test]
    fn test_payment_from_yaml_input_file() {
        let path = write_temp(
            "payment-term.yaml",
            "principal: \"1000\"\nannual_rate_pct: \"4\"\nterm_months: 240\nstart_date: 2025-01-01\n",
        );
        let args = PaymentArgs {
            input: Some(path.to_string_lossy().into_owned()),
            principal: None,
            annual_rate: None,
            term_months: None,
            start_date: None,
        };
        let value = run_payment(args).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(value["result"]["payment_amount"], "6.07");
        assert_eq!(value["result"]["term_months"], 240);
    }

    #[test]
    fn test_missing_term_flag_is_reported() {
        let args = PaymentArgs {
            input: None,
            principal: Some(dec!(1000)),
            annual_rate: Some(dec!(4)),
            term_months: None,
            start_date: None,
        };
        let err = payment_input_from_flags(&args).unwrap_err();
        assert!(err.to_string().contains("--term-months is required"));
    }

    #[test]
    fn test_unreadable_input_file_is_an_error() {
        let args = ScheduleArgs {
            input: Some("/definitely/not/here.json".into()),
            ..schedule_flags()
        };
        let err = run_schedule(args).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
