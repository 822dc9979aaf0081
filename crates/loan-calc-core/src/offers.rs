use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Instant;
use uuid::Uuid;

use crate::annuity;
use crate::config::PricingConfig;
use crate::error::LoanCalcError;
use crate::types::*;
use crate::LoanCalcResult;

/// Insurance × salary-client combinations, one offer each.
const FLAG_COMBINATIONS: [(bool, bool); 4] = [(false, false), (false, true), (true, false), (true, true)];

/// Pre-scoring loan request. Only `amount` and `term` drive the pricing; the
/// applicant fields are carried for the validation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanStatementRequest {
    pub amount: Money,
    pub term: TermMonths,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_series: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<String>,
    /// Reference day for the applicant age check; today when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_date: Option<NaiveDate>,
}

impl LoanStatementRequest {
    pub fn new(amount: Money, term: TermMonths) -> Self {
        Self {
            amount,
            term,
            first_name: None,
            last_name: None,
            middle_name: None,
            email: None,
            birthdate: None,
            passport_series: None,
            passport_number: None,
            calculation_date: None,
        }
    }
}

/// A priced loan offer. All offers from one request share `statement_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOffer {
    pub statement_id: Uuid,
    pub requested_amount: Money,
    pub total_amount: Money,
    pub term: TermMonths,
    pub monthly_payment: Money,
    pub rate: RatePercent,
    pub is_insurance_enabled: bool,
    pub is_salary_client: bool,
}

/// Ascending by rate, then total amount. `build_offers` reverses the sorted
/// list, so full ties come out in reverse flag-combination order.
fn offer_cmp(a: &LoanOffer, b: &LoanOffer) -> Ordering {
    a.rate
        .cmp(&b.rate)
        .then_with(|| a.total_amount.cmp(&b.total_amount))
}

fn build_offer(
    statement_id: Uuid,
    requested_amount: Money,
    term: TermMonths,
    config: &PricingConfig,
    insurance_enabled: bool,
    salary_client: bool,
) -> LoanOffer {
    let adjusted = config.adjust(requested_amount, insurance_enabled, salary_client);
    let monthly_payment = annuity::monthly_payment(adjusted.amount, term, adjusted.rate);

    let offer = LoanOffer {
        statement_id,
        requested_amount,
        total_amount: adjusted.amount,
        term,
        monthly_payment,
        rate: adjusted.rate,
        is_insurance_enabled: insurance_enabled,
        is_salary_client: salary_client,
    };
    log::debug!("built offer: {offer:?}");
    offer
}

/// Price the four flag combinations under one shared `statement_id` and rank
/// them, most expensive first.
pub fn build_offers(
    requested_amount: Money,
    term: TermMonths,
    config: &PricingConfig,
    statement_id: Uuid,
) -> Vec<LoanOffer> {
    let mut offers: Vec<LoanOffer> = FLAG_COMBINATIONS
        .iter()
        .map(|&(insurance, salary)| {
            build_offer(statement_id, requested_amount, term, config, insurance, salary)
        })
        .collect();
    offers.sort_by(offer_cmp);
    offers.reverse();
    offers
}

/// Generate the four ranked loan offers for a statement request.
pub fn generate_offers(
    input: &LoanStatementRequest,
    config: &PricingConfig,
) -> LoanCalcResult<ComputationOutput<Vec<LoanOffer>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.amount < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "amount".into(),
            reason: "Requested amount cannot be negative".into(),
        });
    }
    if input.term <= 0 {
        warnings.push("term <= 0: monthly payments are 0.00".into());
    }

    let statement_id = Uuid::new_v4();
    log::debug!("generating offers for statement {statement_id}");

    let offers = build_offers(input.amount, input.term, config, statement_id);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annuity loan offers (insurance x salary-client)",
        &serde_json::json!({
            "amount": input.amount.to_string(),
            "term": input.term,
            "base_rate": config.base_rate.to_string(),
            "insurance_rate_discount": config.insurance_rate_discount.to_string(),
            "salary_client_rate_discount": config.salary_client_rate_discount.to_string(),
            "insurance_cost": config.insurance_cost.to_string(),
        }),
        warnings,
        elapsed,
        offers,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn offers_for(amount: Money, term: TermMonths) -> Vec<LoanOffer> {
        build_offers(amount, term, &PricingConfig::offers(), Uuid::nil())
    }

    #[test]
    fn test_four_offers_one_per_combination() {
        let offers = offers_for(dec!(50000), 6);
        assert_eq!(offers.len(), 4);
        for combo in FLAG_COMBINATIONS {
            let count = offers
                .iter()
                .filter(|o| (o.is_insurance_enabled, o.is_salary_client) == combo)
                .count();
            assert_eq!(count, 1, "combination {combo:?}");
        }
    }

    #[test]
    fn test_ranking_order() {
        let offers = offers_for(dec!(50000), 6);
        let flags: Vec<_> = offers
            .iter()
            .map(|o| (o.is_insurance_enabled, o.is_salary_client))
            .collect();
        assert_eq!(flags, vec![(false, false), (false, true), (true, false), (true, true)]);
        let rates: Vec<_> = offers.iter().map(|o| o.rate).collect();
        assert_eq!(rates, vec![dec!(15.0), dec!(14.0), dec!(12.0), dec!(11.0)]);
    }

    #[test]
    fn test_equal_rates_put_larger_amount_first() {
        // Flat config: every offer shares the base rate, so amount decides.
        let cfg = PricingConfig {
            base_rate: dec!(10.0),
            insurance_rate_discount: Decimal::ZERO,
            salary_client_rate_discount: Decimal::ZERO,
            insurance_cost: dec!(500),
        };
        let offers = build_offers(dec!(20000), 12, &cfg, Uuid::nil());
        assert!(offers[0].is_insurance_enabled);
        assert!(offers[1].is_insurance_enabled);
        assert!(!offers[2].is_insurance_enabled);
        assert!(!offers[3].is_insurance_enabled);
        assert_eq!(offers[0].total_amount, dec!(20500));
        assert_eq!(offers[3].total_amount, dec!(20000));
    }

    #[test]
    fn test_full_ties_come_out_in_reverse_combination_order() {
        // Both discounts equal and free insurance: the two middle offers tie
        let cfg = PricingConfig {
            base_rate: dec!(15.0),
            insurance_rate_discount: dec!(1.0),
            salary_client_rate_discount: dec!(1.0),
            insurance_cost: Decimal::ZERO,
        };
        let offers = build_offers(dec!(20000), 12, &cfg, Uuid::nil());
        let flags: Vec<_> = offers
            .iter()
            .map(|o| (o.is_insurance_enabled, o.is_salary_client))
            .collect();
        assert_eq!(flags, vec![(false, false), (true, false), (false, true), (true, true)]);
        assert_eq!(offers[1].rate, offers[2].rate);
        assert_eq!(offers[1].total_amount, offers[2].total_amount);
    }

    #[test]
    fn test_payments_per_offer() {
        let offers = offers_for(dec!(50000), 6);
        assert_eq!(offers[0].monthly_payment, dec!(8701.69));
        assert_eq!(offers[1].monthly_payment, dec!(8676.90));
        assert_eq!(offers[2].monthly_payment, dec!(25882.26));
        assert_eq!(offers[3].monthly_payment, dec!(25808.18));
    }

    #[test]
    fn test_generate_offers_shares_statement_id() {
        let req = LoanStatementRequest::new(dec!(1_000_000), 12);
        let out = generate_offers(&req, &PricingConfig::offers()).unwrap();
        let id = out.result[0].statement_id;
        assert!(!id.is_nil());
        assert!(out.result.iter().all(|o| o.statement_id == id));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_generate_offers_new_id_per_call() {
        let req = LoanStatementRequest::new(dec!(50000), 6);
        let cfg = PricingConfig::offers();
        let a = generate_offers(&req, &cfg).unwrap();
        let b = generate_offers(&req, &cfg).unwrap();
        assert_ne!(a.result[0].statement_id, b.result[0].statement_id);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let req = LoanStatementRequest::new(dec!(-1), 6);
        let err = generate_offers(&req, &PricingConfig::offers()).unwrap_err();
        match err {
            LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, "amount"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_term_warns() {
        let req = LoanStatementRequest::new(dec!(50000), 0);
        let out = generate_offers(&req, &PricingConfig::offers()).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.result.iter().all(|o| o.monthly_payment.is_zero()));
    }
}
