//! Request checks run by callers before the calculators.
//!
//! The calculators themselves trust their input; this module holds the
//! acceptance rules for amounts, terms and applicant identity fields and
//! reports every violation at once.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::ValidationRules;
use crate::credit::ScoringData;
use crate::error::{FieldViolation, LoanCalcError};
use crate::offers::LoanStatementRequest;
use crate::types::{Money, TermMonths};
use crate::LoanCalcResult;

/// Whether absent identity fields are violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Identity fields must be present and well-formed
    #[default]
    Strict,
    /// Only the identity fields supplied are checked
    Lenient,
}

struct Checker<'a> {
    rules: &'a ValidationRules,
    mode: ValidationMode,
    today: NaiveDate,
    violations: Vec<FieldViolation>,
}

impl<'a> Checker<'a> {
    fn new(rules: &'a ValidationRules, mode: ValidationMode, today: NaiveDate) -> Self {
        Self {
            rules,
            mode,
            today,
            violations: Vec::new(),
        }
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn amount(&mut self, amount: Option<Money>) {
        match amount {
            None => self.fail("amount", "amount is required"),
            Some(a) if a < self.rules.min_amount => self.fail(
                "amount",
                format!("amount must be at least {}", self.rules.min_amount),
            ),
            Some(_) => {}
        }
    }

    fn term(&mut self, term: TermMonths) {
        if term < self.rules.min_term {
            self.fail(
                "term",
                format!("term must be at least {} months", self.rules.min_term),
            );
        }
    }

    /// Present-value check, or a "required" violation in strict mode.
    fn present<'v, T: ?Sized>(&mut self, field: &str, value: Option<&'v T>) -> Option<&'v T> {
        if value.is_none() && self.mode == ValidationMode::Strict {
            self.fail(field, format!("{field} is required"));
        }
        value
    }

    fn latin_name(&mut self, field: &str, value: Option<&str>, required: bool) {
        let value = if required {
            self.present(field, value)
        } else {
            value
        };
        if let Some(name) = value {
            if !is_latin_name(name) {
                self.fail(field, format!("{field} must be 2 to 30 Latin letters"));
            }
        }
    }

    fn email(&mut self, value: Option<&str>) {
        if let Some(email) = self.present("email", value) {
            if !is_email(email) {
                self.fail("email", "email format is invalid");
            }
        }
    }

    fn birthdate(&mut self, value: Option<NaiveDate>) {
        let Some(birthdate) = value else {
            if self.mode == ValidationMode::Strict {
                self.fail("birthdate", "birthdate is required");
            }
            return;
        };
        if birthdate >= self.today {
            self.fail("birthdate", "birthdate must be in the past");
            return;
        }
        let age = self.today.years_since(birthdate).unwrap_or(0);
        if age < self.rules.min_age_years {
            self.fail(
                "birthdate",
                format!("applicant must be at least {} years old", self.rules.min_age_years),
            );
        }
    }

    fn digits(&mut self, field: &str, value: Option<&str>, len: usize) {
        if let Some(v) = self.present(field, value) {
            if v.len() != len || !v.bytes().all(|b| b.is_ascii_digit()) {
                self.fail(field, format!("{field} must be exactly {len} digits"));
            }
        }
    }

    fn finish(self) -> LoanCalcResult<()> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            log::warn!("validation failed: {} violation(s)", self.violations.len());
            Err(LoanCalcError::ValidationFailed(self.violations))
        }
    }
}

fn is_latin_name(s: &str) -> bool {
    (2..=30).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"._%+-".contains(&b));
    let labels: Vec<&str> = domain.split('.').collect();
    let domain_ok = labels.len() >= 2
        && labels
            .iter()
            .all(|l| !l.is_empty() && l.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-'))
        && labels
            .last()
            .is_some_and(|tld| tld.len() >= 2 && tld.bytes().all(|b| b.is_ascii_alphabetic()));
    local_ok && domain_ok
}

fn reference_date(explicit: Option<NaiveDate>) -> NaiveDate {
    explicit.unwrap_or_else(|| Local::now().date_naive())
}

/// Check a pre-scoring request against `rules`.
pub fn validate_statement_request(
    request: &LoanStatementRequest,
    rules: &ValidationRules,
    mode: ValidationMode,
) -> LoanCalcResult<()> {
    let mut c = Checker::new(rules, mode, reference_date(request.calculation_date));
    c.amount(Some(request.amount));
    c.term(request.term);
    c.latin_name("first_name", request.first_name.as_deref(), true);
    c.latin_name("last_name", request.last_name.as_deref(), true);
    c.latin_name("middle_name", request.middle_name.as_deref(), false);
    c.email(request.email.as_deref());
    c.birthdate(request.birthdate);
    c.digits("passport_series", request.passport_series.as_deref(), 4);
    c.digits("passport_number", request.passport_number.as_deref(), 6);
    c.finish()
}

/// Check scoring data against `rules`.
pub fn validate_scoring_data(
    data: &ScoringData,
    rules: &ValidationRules,
    mode: ValidationMode,
) -> LoanCalcResult<()> {
    let mut c = Checker::new(rules, mode, reference_date(data.calculation_date));
    c.amount(data.amount);
    c.term(data.term);
    c.latin_name("first_name", data.first_name.as_deref(), true);
    c.latin_name("last_name", data.last_name.as_deref(), true);
    c.latin_name("middle_name", data.middle_name.as_deref(), false);
    c.birthdate(data.birthdate);
    c.digits("passport_series", data.passport_series.as_deref(), 4);
    c.digits("passport_number", data.passport_number.as_deref(), 6);
    c.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_name() {
        assert!(is_latin_name("Jo"));
        assert!(is_latin_name("Johann"));
        assert!(!is_latin_name("J"));
        assert!(!is_latin_name("Jean-Luc"));
        assert!(!is_latin_name("Иван"));
        assert!(!is_latin_name(&"a".repeat(31)));
    }

    #[test]
    fn test_email() {
        assert!(is_email("john.doe@test.com"));
        assert!(is_email("a+b@mail.example.org"));
        assert!(!is_email("bad_email_format"));
        assert!(!is_email("@test.com"));
        assert!(!is_email("john@localhost"));
        assert!(!is_email("john@test.c"));
        assert!(!is_email("john@test..com"));
    }

    #[test]
    fn test_lenient_skips_absent_identity() {
        let req = LoanStatementRequest::new(rust_decimal_macros::dec!(20000), 6);
        assert!(validate_statement_request(&req, &ValidationRules::default(), ValidationMode::Lenient).is_ok());
    }

    #[test]
    fn test_strict_requires_identity() {
        let req = LoanStatementRequest::new(rust_decimal_macros::dec!(20000), 6);
        let err = validate_statement_request(&req, &ValidationRules::default(), ValidationMode::Strict)
            .unwrap_err();
        let LoanCalcError::ValidationFailed(v) = err else {
            panic!("expected validation failure");
        };
        let fields: Vec<_> = v.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["first_name", "last_name", "email", "birthdate", "passport_series", "passport_number"]
        );
    }

    #[test]
    fn test_future_birthdate_reported_once() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let rules = ValidationRules::default();
        for birthdate in [today, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()] {
            let mut c = Checker::new(&rules, ValidationMode::Strict, today);
            c.birthdate(Some(birthdate));
            assert_eq!(c.violations.len(), 1, "birthdate {birthdate}");
            assert_eq!(c.violations[0].message, "birthdate must be in the past");
        }
    }

    #[test]
    fn test_underage_birthdate_reports_minimum_age() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let rules = ValidationRules::default();
        let mut c = Checker::new(&rules, ValidationMode::Strict, today);
        c.birthdate(NaiveDate::from_ymd_opt(2010, 6, 1));
        assert_eq!(c.violations.len(), 1);
        assert!(c.violations[0].message.contains("at least 18 years old"));
    }
}
