use napi::Result as NapiResult;
use napi_derive::napi;

use loan_calc_core::config::CalculatorConfig;
use loan_calc_core::credit::{self, ScoringData};
use loan_calc_core::offers::{self, LoanStatementRequest};
use loan_calc_core::validation::{self, ValidationMode};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Optional config JSON; defaults when absent or empty.
fn parse_config(config_json: Option<String>) -> NapiResult<CalculatorConfig> {
    match config_json.as_deref().map(str::trim) {
        None | Some("") => Ok(CalculatorConfig::default()),
        Some(json) => CalculatorConfig::from_json(json).map_err(to_napi_error),
    }
}

// ---------------------------------------------------------------------------
// Offers
// ---------------------------------------------------------------------------

#[napi]
pub fn generate_loan_offers(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let input: LoanStatementRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    validation::validate_statement_request(&input, &config.validation, ValidationMode::Strict)
        .map_err(to_napi_error)?;
    let output = offers::generate_offers(&input, &config.offers).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Credit
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_credit(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let input: ScoringData = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    validation::validate_scoring_data(&input, &config.validation, ValidationMode::Strict)
        .map_err(to_napi_error)?;
    let output = credit::calculate_credit(&input, &config.credit).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Returns the violation list as JSON (`[]` when the request is acceptable).
#[napi]
pub fn validate_statement_request(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let input: LoanStatementRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let violations = match validation::validate_statement_request(
        &input,
        &config.validation,
        ValidationMode::Strict,
    ) {
        Ok(()) => Vec::new(),
        Err(loan_calc_core::LoanCalcError::ValidationFailed(v)) => v,
        Err(e) => return Err(to_napi_error(e)),
    };
    serde_json::to_string(&violations).map_err(to_napi_error)
}
