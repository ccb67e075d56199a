use serde_json::Value;

use super::{format_scalar, result_of};

/// Print just the key answer: the payoff horizon of a schedule, the deltas
/// of a simulation, or the level payment.
pub fn print_minimal(value: &Value) {
    println!("{}", summarize(result_of(value)));
}

fn summarize(result: &Value) -> String {
    if let Some(outcome) = result.get("outcome") {
        return summarize_outcome(outcome);
    }

    if let (Some(periods), Some(interest)) =
        (result.get("periods_delta"), result.get("interest_delta"))
    {
        return format!(
            "periods_delta: {}, interest_delta: {}",
            summarize_delta(periods),
            summarize_delta(interest)
        );
    }

    if let Some(payment) = result.get("payment_amount") {
        return format_scalar(payment);
    }

    match result {
        Value::Object(map) => map
            .iter()
            .next()
            .map(|(key, val)| format!("{}: {}", key, format_scalar(val)))
            .unwrap_or_default(),
        other => format_scalar(other),
    }
}

fn summarize_outcome(outcome: &Value) -> String {
    let field = |name: &str| outcome.get(name).map(format_scalar).unwrap_or_default();
    let total = |name: &str| {
        outcome
            .get("totals")
            .and_then(|t| t.get(name))
            .map(format_scalar)
            .unwrap_or_default()
    };

    match outcome.get("kind").and_then(Value::as_str) {
        Some("amortizing") => format!(
            "{} periods, total interest {}",
            total("periods"),
            total("total_interest")
        ),
        Some("non_amortizing") => format!(
            "never pays off (minimum payment {})",
            field("minimum_payment")
        ),
        Some("incomplete") => format!(
            "not paid off after {} periods ({} remaining)",
            field("periods_computed"),
            field("remaining_balance")
        ),
        _ => format_scalar(outcome),
    }
}

fn summarize_delta(delta: &Value) -> String {
    let kind = delta.get("kind").and_then(Value::as_str).unwrap_or("unknown");
    match delta.get("value") {
        Some(v) => format!("{} {}", kind, format_scalar(v)),
        None => kind.to_string(),
    }
}
