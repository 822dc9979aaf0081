use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity::{self, PaymentScheduleEntry};
use crate::config::PricingConfig;
use crate::error::LoanCalcError;
use crate::types::*;
use crate::LoanCalcResult;

/// Multiplier in the simplified cost-of-credit figure (PSK = rate * 1.2).
/// Not a regulatory APR.
const PSK_FACTOR: Decimal = dec!(1.2);

/// Scoring data for the final credit calculation.
///
/// A missing `amount` is priced as zero and missing flags count as `false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringData {
    #[serde(default)]
    pub amount: Option<Money>,
    pub term: TermMonths,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_series: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<String>,
    #[serde(default)]
    pub is_insurance_enabled: Option<bool>,
    #[serde(default)]
    pub is_salary_client: Option<bool>,
    /// Schedule dates count from this day; today when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_date: Option<NaiveDate>,
}

impl ScoringData {
    pub fn new(amount: Money, term: TermMonths, insurance: bool, salary_client: bool) -> Self {
        Self {
            amount: Some(amount),
            term,
            first_name: None,
            last_name: None,
            middle_name: None,
            birthdate: None,
            passport_series: None,
            passport_number: None,
            is_insurance_enabled: Some(insurance),
            is_salary_client: Some(salary_client),
            calculation_date: None,
        }
    }
}

/// Final credit terms with the full payment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditResult {
    pub amount: Money,
    pub term: TermMonths,
    pub monthly_payment: Money,
    pub rate: RatePercent,
    pub psk: RatePercent,
    pub is_insurance_enabled: bool,
    pub is_salary_client: bool,
    pub total_interest: Money,
    pub total_payments: Money,
    pub payment_schedule: Vec<PaymentScheduleEntry>,
}

/// Simplified annual cost of credit, rounded half-up to 2 dp.
pub fn psk(rate: RatePercent) -> RatePercent {
    round_money(rate * PSK_FACTOR)
}

/// Compute credit terms from scoring data, with schedule dates counted from
/// `calculation_date`.
pub fn compute_credit(
    input: &ScoringData,
    config: &PricingConfig,
    calculation_date: NaiveDate,
) -> LoanCalcResult<CreditResult> {
    let amount = input.amount.unwrap_or_else(|| {
        log::warn!("scoring amount missing: treated as 0.00");
        round_money(Decimal::ZERO)
    });
    let insurance = input.is_insurance_enabled.unwrap_or(false);
    let salary_client = input.is_salary_client.unwrap_or(false);

    let adjusted = config.adjust(amount, insurance, salary_client);
    let monthly_payment = annuity::monthly_payment(adjusted.amount, input.term, adjusted.rate);
    let psk = psk(adjusted.rate);
    let payment_schedule = annuity::payment_schedule(
        adjusted.amount,
        input.term,
        adjusted.rate,
        monthly_payment,
        calculation_date,
    )?;

    let total_interest = payment_schedule
        .iter()
        .map(|row| row.interest_payment)
        .sum::<Decimal>();
    let total_payments = payment_schedule
        .iter()
        .map(|row| row.payment_amount)
        .sum::<Decimal>();

    log::debug!(
        "credit: amount={} rate={} payment={monthly_payment} psk={psk} rows={}",
        adjusted.amount,
        adjusted.rate,
        payment_schedule.len()
    );

    Ok(CreditResult {
        amount: adjusted.amount,
        term: input.term,
        monthly_payment,
        rate: adjusted.rate,
        psk,
        is_insurance_enabled: insurance,
        is_salary_client: salary_client,
        total_interest: round_money(total_interest),
        total_payments: round_money(total_payments),
        payment_schedule,
    })
}

/// Calculate the final credit parameters and amortisation schedule.
///
/// Besides a negative amount, the only failure is a schedule dated past the
/// end of the supported calendar (see [`annuity::payment_schedule`]).
pub fn calculate_credit(
    input: &ScoringData,
    config: &PricingConfig,
) -> LoanCalcResult<ComputationOutput<CreditResult>> {
    let start = Instant::now();
    let calculation_date = input
        .calculation_date
        .unwrap_or_else(|| Local::now().date_naive());
    let mut warnings: Vec<String> = Vec::new();

    if let Some(amount) = input.amount {
        if amount < Decimal::ZERO {
            return Err(LoanCalcError::InvalidInput {
                field: "amount".into(),
                reason: "Credit amount cannot be negative".into(),
            });
        }
    } else {
        warnings.push("amount missing: treated as 0.00".into());
    }
    if input.term <= 0 {
        warnings.push("term <= 0: monthly payment is 0.00 and schedule is empty".into());
    }

    let result = compute_credit(input, config, calculation_date)?;

    if let Some(last) = result.payment_schedule.last() {
        if !last.remaining_debt.is_zero() {
            warnings.push(format!(
                "Rounding residual of {} left on the final payment",
                last.remaining_debt
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annuity credit calculation with simplified PSK",
        &serde_json::json!({
            "base_rate": config.base_rate.to_string(),
            "insurance_rate_discount": config.insurance_rate_discount.to_string(),
            "salary_client_rate_discount": config.salary_client_rate_discount.to_string(),
            "insurance_cost": config.insurance_cost.to_string(),
            "psk_factor": PSK_FACTOR.to_string(),
            "calculation_date": calculation_date.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    #[test]
    fn test_psk() {
        assert_eq!(psk(dec!(11.0)), dec!(13.20));
        assert_eq!(psk(dec!(15.0)), dec!(18.00));
        assert_eq!(psk(dec!(12.0)).to_string(), "14.40");
    }

    #[test]
    fn test_insurance_and_salary_client() {
        let input = ScoringData::new(dec!(50000), 12, true, true);
        let r = compute_credit(&input, &PricingConfig::credit(), calc_date()).unwrap();
        assert_eq!(r.amount, dec!(51000));
        assert_eq!(r.rate, dec!(11.0));
        assert_eq!(r.monthly_payment, dec!(4507.46));
        assert_eq!(r.psk, dec!(13.20));
        assert_eq!(r.payment_schedule.len(), 12);
        assert!(r.is_insurance_enabled && r.is_salary_client);
    }

    #[test]
    fn test_schedule_dates_follow_calculation_date() {
        let input = ScoringData::new(dec!(50000), 12, false, false);
        let r = compute_credit(&input, &PricingConfig::credit(), calc_date()).unwrap();
        assert_eq!(
            r.payment_schedule[0].payment_date,
            NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()
        );
        assert_eq!(
            r.payment_schedule[11].payment_date,
            NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_totals() {
        let input = ScoringData::new(dec!(50000), 12, true, true);
        let r = compute_credit(&input, &PricingConfig::credit(), calc_date()).unwrap();
        assert_eq!(r.total_payments, dec!(4507.46) * dec!(12));
        let interest: Decimal = r.payment_schedule.iter().map(|e| e.interest_payment).sum();
        assert_eq!(r.total_interest, interest);
    }

    #[test]
    fn test_missing_amount_is_zero() {
        let mut input = ScoringData::new(Decimal::ZERO, 12, false, false);
        input.amount = None;
        let out = calculate_credit(&input, &PricingConfig::credit()).unwrap();
        assert!(out.result.amount.is_zero());
        assert_eq!(out.result.monthly_payment.to_string(), "0.00");
        assert!(out.result.payment_schedule.is_empty());
        assert_eq!(out.warnings, vec!["amount missing: treated as 0.00".to_string()]);
    }

    #[test]
    fn test_missing_flags_default_false() {
        let mut input = ScoringData::new(dec!(30000), 6, true, true);
        input.is_insurance_enabled = None;
        input.is_salary_client = None;
        let r = compute_credit(&input, &PricingConfig::credit(), calc_date()).unwrap();
        assert_eq!(r.rate, dec!(15.0));
        assert_eq!(r.amount, dec!(30000));
        assert!(!r.is_insurance_enabled && !r.is_salary_client);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let input = ScoringData::new(dec!(-10), 12, false, false);
        assert!(matches!(
            calculate_credit(&input, &PricingConfig::credit()),
            Err(LoanCalcError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_residual_warning() {
        let mut input = ScoringData::new(dec!(50000), 12, true, true);
        input.calculation_date = Some(calc_date());
        let out = calculate_credit(&input, &PricingConfig::credit()).unwrap();
        assert_eq!(out.result.payment_schedule[0].payment_date, NaiveDate::from_ymd_opt(2025, 4, 15).unwrap());
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("0.05"));
    }
}
