//! Pricing and validation parameters.
//!
//! Each calculator receives its own [`PricingConfig`] by reference; nothing
//! here is global or mutable. The offer and credit paths ship with different
//! insurance surcharges and are kept as two separate presets.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, RatePercent};

pub const DEFAULT_BASE_RATE: RatePercent = dec!(15.0);
pub const DEFAULT_INSURANCE_RATE_DISCOUNT: RatePercent = dec!(3.0);
pub const DEFAULT_SALARY_CLIENT_RATE_DISCOUNT: RatePercent = dec!(1.0);
pub const OFFER_INSURANCE_COST: Money = dec!(100000);
pub const CREDIT_INSURANCE_COST: Money = dec!(1000);

/// Rate and amount adjustment rules for one computation path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Annual rate before any discount, in percent
    pub base_rate: RatePercent,
    /// Subtracted from the rate when insurance is taken
    pub insurance_rate_discount: RatePercent,
    /// Subtracted from the rate for salary-project clients
    pub salary_client_rate_discount: RatePercent,
    /// Added to the financed amount when insurance is taken
    pub insurance_cost: Money,
}

/// Amount and rate after the insurance / salary-client rules are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub amount: Money,
    pub rate: RatePercent,
}

impl PricingConfig {
    /// Preset used when generating the four pre-scoring offers.
    pub fn offers() -> Self {
        Self {
            base_rate: DEFAULT_BASE_RATE,
            insurance_rate_discount: DEFAULT_INSURANCE_RATE_DISCOUNT,
            salary_client_rate_discount: DEFAULT_SALARY_CLIENT_RATE_DISCOUNT,
            insurance_cost: OFFER_INSURANCE_COST,
        }
    }

    /// Preset used for the final credit calculation.
    pub fn credit() -> Self {
        Self {
            insurance_cost: CREDIT_INSURANCE_COST,
            ..Self::offers()
        }
    }

    pub fn adjust(&self, amount: Money, insurance_enabled: bool, salary_client: bool) -> Adjustment {
        let mut amount = amount;
        let mut rate = self.base_rate;

        if insurance_enabled {
            amount += self.insurance_cost;
            rate -= self.insurance_rate_discount;
            log::debug!(
                "insurance: +{} to amount, -{} to rate",
                self.insurance_cost,
                self.insurance_rate_discount
            );
        }

        if salary_client {
            rate -= self.salary_client_rate_discount;
            log::debug!("salary client: -{} to rate", self.salary_client_rate_discount);
        }

        Adjustment { amount, rate }
    }
}

/// Thresholds enforced by the request validation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    pub min_amount: Money,
    pub min_term: i32,
    pub min_age_years: u32,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_amount: dec!(20000),
            min_term: 6,
            min_age_years: 18,
        }
    }
}

/// Pricing section as written in a config file. Every field is optional and
/// falls back to the preset of the section it appears in.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PricingSection {
    base_rate: Option<RatePercent>,
    insurance_rate_discount: Option<RatePercent>,
    salary_client_rate_discount: Option<RatePercent>,
    insurance_cost: Option<Money>,
}

impl PricingSection {
    fn over(self, preset: PricingConfig) -> PricingConfig {
        PricingConfig {
            base_rate: self.base_rate.unwrap_or(preset.base_rate),
            insurance_rate_discount: self
                .insurance_rate_discount
                .unwrap_or(preset.insurance_rate_discount),
            salary_client_rate_discount: self
                .salary_client_rate_discount
                .unwrap_or(preset.salary_client_rate_discount),
            insurance_cost: self.insurance_cost.unwrap_or(preset.insurance_cost),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    offers: PricingSection,
    #[serde(default)]
    credit: PricingSection,
    #[serde(default)]
    validation: ValidationRules,
}

impl From<ConfigFile> for CalculatorConfig {
    fn from(file: ConfigFile) -> Self {
        Self {
            offers: file.offers.over(PricingConfig::offers()),
            credit: file.credit.over(PricingConfig::credit()),
            validation: file.validation,
        }
    }
}

/// Full calculator configuration, as loaded from a config file.
///
/// Sections and fields may be omitted. A missing pricing field takes the
/// value of its own section's preset, so `credit.insurance_cost` falls back
/// to 1000 while `offers.insurance_cost` falls back to 100000.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct CalculatorConfig {
    pub offers: PricingConfig,
    pub credit: PricingConfig,
    pub validation: ValidationRules,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            offers: PricingConfig::offers(),
            credit: PricingConfig::credit(),
            validation: ValidationRules::default(),
        }
    }
}

impl CalculatorConfig {
    /// Parse a JSON config document; absent sections keep their defaults.
    pub fn from_json(json: &str) -> crate::LoanCalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ_only_in_insurance_cost() {
        let offers = PricingConfig::offers();
        let credit = PricingConfig::credit();
        assert_eq!(offers.insurance_cost, dec!(100000));
        assert_eq!(credit.insurance_cost, dec!(1000));
        assert_eq!(offers.base_rate, credit.base_rate);
        assert_eq!(offers.insurance_rate_discount, credit.insurance_rate_discount);
        assert_eq!(
            offers.salary_client_rate_discount,
            credit.salary_client_rate_discount
        );
    }

    #[test]
    fn test_adjust_all_combinations() {
        let cfg = PricingConfig::credit();
        let base = dec!(50000);

        let a = cfg.adjust(base, false, false);
        assert_eq!(a, Adjustment { amount: dec!(50000), rate: dec!(15.0) });

        let a = cfg.adjust(base, false, true);
        assert_eq!(a, Adjustment { amount: dec!(50000), rate: dec!(14.0) });

        let a = cfg.adjust(base, true, false);
        assert_eq!(a, Adjustment { amount: dec!(51000), rate: dec!(12.0) });

        let a = cfg.adjust(base, true, true);
        assert_eq!(a, Adjustment { amount: dec!(51000), rate: dec!(11.0) });
    }

    #[test]
    fn test_rate_keeps_one_decimal_place() {
        let a = PricingConfig::offers().adjust(dec!(1), true, true);
        assert_eq!(a.rate.to_string(), "11.0");
    }

    #[test]
    fn test_partial_config_json_keeps_defaults() {
        let json = r#"{
            "credit": {
                "base_rate": "14.5",
                "insurance_rate_discount": "3.0",
                "salary_client_rate_discount": "1.0",
                "insurance_cost": "2500"
            },
            "validation": { "min_term": 12 }
        }"#;
        let cfg = CalculatorConfig::from_json(json).unwrap();
        assert_eq!(cfg.credit.insurance_cost, dec!(2500));
        assert_eq!(cfg.credit.base_rate, dec!(14.5));
        assert_eq!(cfg.offers, PricingConfig::offers());
        assert_eq!(cfg.validation.min_term, 12);
        assert_eq!(cfg.validation.min_amount, dec!(20000));
    }

    #[test]
    fn test_partial_section_falls_back_to_its_own_preset() {
        let cfg = CalculatorConfig::from_json(r#"{"credit": {"base_rate": "14"}}"#).unwrap();
        assert_eq!(cfg.credit.base_rate, dec!(14));
        assert_eq!(cfg.credit.insurance_cost, CREDIT_INSURANCE_COST);
        assert_eq!(cfg.credit.insurance_rate_discount, dec!(3.0));

        let cfg = CalculatorConfig::from_json(
            r#"{"credit": {"insurance_cost": "2500"}, "offers": {"salary_client_rate_discount": "0.5"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.credit.insurance_cost, dec!(2500));
        assert_eq!(cfg.credit.base_rate, DEFAULT_BASE_RATE);
        assert_eq!(cfg.offers.salary_client_rate_discount, dec!(0.5));
        assert_eq!(cfg.offers.insurance_cost, OFFER_INSURANCE_COST);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(CalculatorConfig::from_json("{}").unwrap(), CalculatorConfig::default());
    }

    #[test]
    fn test_unknown_pricing_field_rejected() {
        let err = CalculatorConfig::from_json(r#"{"credit": {"insurance": "1"}}"#).unwrap_err();
        assert!(matches!(err, crate::LoanCalcError::SerializationError(_)));
    }

    #[test]
    fn test_bad_config_json_is_serialization_error() {
        let err = CalculatorConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::LoanCalcError::SerializationError(_)));
    }
}
