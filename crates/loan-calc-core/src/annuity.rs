//! Annuity payment and amortisation schedule primitives shared by the offer
//! and credit calculators.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanCalcError;
use crate::types::{round_money, Money, MonthlyRate, RatePercent, TermMonths};
use crate::LoanCalcResult;

/// Decimal places kept on `i / ((1 + i)^n - 1)` before the final multiply.
const RATIO_SCALE: u32 = 8;

/// Rows reserved up front; longer schedules grow as they are built.
const PREALLOCATED_ROWS: usize = 1200;

/// One row of an amortisation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentScheduleEntry {
    pub payment_number: u32,
    pub payment_date: NaiveDate,
    pub payment_amount: Money,
    pub interest_payment: Money,
    pub principal_payment: Money,
    pub remaining_debt: Money,
}

/// Convert an annual percentage rate to a monthly decimal rate.
pub fn monthly_rate(annual_rate: RatePercent) -> MonthlyRate {
    annual_rate / dec!(100) / dec!(12)
}

/// Fixed monthly annuity payment, rounded half-up to 2 dp.
///
/// `P = S * (i + i / ((1 + i)^n - 1))` with `i` the monthly rate.
/// Falls back to `S / n` when the rate is non-positive or the denominator is
/// zero, and returns `0.00` for a non-positive term.
pub fn monthly_payment(principal: Money, term: TermMonths, annual_rate: RatePercent) -> Money {
    if term <= 0 {
        log::warn!("term {term} <= 0: monthly payment is 0.00");
        return round_money(Decimal::ZERO);
    }

    let i = monthly_rate(annual_rate);
    let n = Decimal::from(term);

    if i <= Decimal::ZERO {
        let payment = round_money(principal / n);
        log::debug!("non-positive rate {annual_rate}: straight-line payment {payment}");
        return payment;
    }

    let ratio = match (Decimal::ONE + i).checked_powi(i64::from(term)) {
        Some(growth) => {
            let denominator = growth - Decimal::ONE;
            if denominator.is_zero() {
                log::warn!("annuity denominator is zero: falling back to principal / term");
                return round_money(principal / n);
            }
            (i / denominator)
                .round_dp_with_strategy(RATIO_SCALE, RoundingStrategy::MidpointAwayFromZero)
        }
        // (1 + i)^n beyond Decimal range: the ratio vanishes at 8 dp anyway
        None => Decimal::ZERO,
    };

    let payment = round_money(principal * (i + ratio));
    log::debug!(
        "monthly payment: principal={principal} term={term} rate={annual_rate} -> {payment}"
    );
    payment
}

/// Build the month-by-month amortisation schedule for a fixed payment.
///
/// The payment figure is reused verbatim on every row. Interest is rounded
/// per row and the residual rounding drift is left in place, so the final
/// `remaining_debt` may differ from zero by a few cents. Row `k` is dated
/// `k` calendar months after `start` (clamped to month end).
///
/// Dates are bounded by `chrono`'s calendar (about year 262142), so a term
/// reaching past it, roughly 3.1 million months from today, fails with
/// [`LoanCalcError::DateError`] instead of producing a truncated schedule.
pub fn payment_schedule(
    principal: Money,
    term: TermMonths,
    annual_rate: RatePercent,
    payment: Money,
    start: NaiveDate,
) -> LoanCalcResult<Vec<PaymentScheduleEntry>> {
    if payment.is_zero() || term <= 0 {
        log::warn!("payment={payment} term={term}: schedule is empty");
        return Ok(Vec::new());
    }

    let i = monthly_rate(annual_rate);
    let mut remaining = principal;
    let mut schedule = Vec::with_capacity((term as usize).min(PREALLOCATED_ROWS));

    for k in 1..=term as u32 {
        let interest = round_money(remaining * i);
        let principal_part = (payment - interest).max(Decimal::ZERO);
        remaining = (remaining - principal_part).max(Decimal::ZERO);

        let payment_date = start.checked_add_months(Months::new(k)).ok_or_else(|| {
            LoanCalcError::DateError(format!("payment {k} falls outside the supported date range"))
        })?;

        schedule.push(PaymentScheduleEntry {
            payment_number: k,
            payment_date,
            payment_amount: payment,
            interest_payment: interest,
            principal_payment: principal_part,
            remaining_debt: remaining,
        });
    }

    Ok(schedule)
}
