use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::DanteFinanceError;
use crate::types::{ceil_money, round_money, Money, Rate, CENT};
use crate::DanteFinanceResult;

/// Interest compounds monthly regardless of the displayed annual rate.
pub const PERIODS_PER_YEAR: u32 = 12;

const PERCENT: Decimal = dec!(100);

/// Convert a nominal annual rate in percent (`12` = 12%) to the monthly
/// periodic rate (`0.01`).
pub fn periodic_rate_from_annual_pct(annual_rate_pct: Decimal) -> DanteFinanceResult<Rate> {
    if annual_rate_pct < Decimal::ZERO {
        return Err(DanteFinanceError::invalid(
            "annual_rate_pct",
            "Annual interest rate cannot be negative",
        ));
    }
    Ok(annual_rate_pct / PERCENT / Decimal::from(PERIODS_PER_YEAR))
}

/// Level payment (PMT) that retires `principal` in `periods` payments.
///
/// Rounded up to the cent. Interest is charged in whole cents each period,
/// so a schedule built with this payment can still be a few cents short
/// after `periods` payments; `payment_for_term` adjusts for that.
pub fn level_payment(principal: Money, periodic_rate: Rate, periods: u32) -> DanteFinanceResult<Money> {
    if principal <= Decimal::ZERO {
        return Err(DanteFinanceError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    if periodic_rate < Decimal::ZERO {
        return Err(DanteFinanceError::invalid(
            "periodic_rate",
            "Periodic rate cannot be negative",
        ));
    }
    if periods == 0 {
        return Err(DanteFinanceError::invalid(
            "periods",
            "Number of periods must be > 0",
        ));
    }

    if periodic_rate.is_zero() {
        return Ok(ceil_money(principal / Decimal::from(periods)));
    }

    let factor = (Decimal::ONE + periodic_rate)
        .checked_powu(u64::from(periods))
        .ok_or_else(|| {
            DanteFinanceError::invalid(
                "periods",
                format!("Compounding factor overflows for {periods} periods"),
            )
        })?;

    // factor > 1 whenever the rate is positive
    let payment = factor
        .checked_div(factor - Decimal::ONE)
        .and_then(|annuity| principal.checked_mul(periodic_rate)?.checked_mul(annuity))
        .ok_or_else(|| DanteFinanceError::overflow("level payment"))?;

    Ok(ceil_money(payment))
}

/// Smallest cent-denominated payment that strictly exceeds the first
/// period's interest on `principal`, both exact and as charged in cents.
pub fn minimum_amortizing_payment(principal: Money, periodic_rate: Rate) -> DanteFinanceResult<Money> {
    principal
        .checked_mul(periodic_rate)
        .and_then(|interest| round_money(interest).checked_add(CENT))
        .ok_or_else(|| DanteFinanceError::overflow("minimum amortizing payment"))
}
