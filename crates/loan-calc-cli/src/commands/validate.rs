use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use loan_calc_core::validation;
use loan_calc_core::LoanCalcError;

use super::credit::{self, CreditArgs};
use super::offers::{self, OffersArgs};
use super::{ApplicantArgs, GlobalOptions};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RequestKind {
    /// Pre-scoring loan statement request
    Statement,
    /// Scoring data for the final credit calculation
    Scoring,
}

/// Arguments for request validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Which request shape to check
    #[arg(long, value_enum, default_value = "statement")]
    pub kind: RequestKind,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Requested amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<i32>,

    /// Contact email (statement requests only)
    #[arg(long)]
    pub email: Option<String>,

    #[command(flatten)]
    pub applicant: ApplicantArgs,
}

pub fn run_validate(args: ValidateArgs, opts: &GlobalOptions) -> Result<Value, Box<dyn std::error::Error>> {
    let rules = &opts.config.validation;
    let (kind, outcome) = match args.kind {
        RequestKind::Statement => {
            let (request, from_document) = offers::read_request(OffersArgs {
                input: args.input,
                amount: args.amount,
                term: args.term,
                email: args.email,
                applicant: args.applicant,
            }, opts.calculation_date)?;
            let mode = opts.validation_mode(from_document);
            ("statement", validation::validate_statement_request(&request, rules, mode))
        }
        RequestKind::Scoring => {
            let (data, from_document) = credit::read_scoring(CreditArgs {
                input: args.input,
                amount: args.amount,
                term: args.term,
                insurance: false,
                salary_client: false,
                applicant: args.applicant,
            }, opts.calculation_date)?;
            let mode = opts.validation_mode(from_document);
            ("scoring", validation::validate_scoring_data(&data, rules, mode))
        }
    };

    match outcome {
        Ok(()) => Ok(json!({ "kind": kind, "valid": true, "violations": [] })),
        Err(LoanCalcError::ValidationFailed(violations)) => Ok(json!({
            "kind": kind,
            "valid": false,
            "violations": violations,
        })),
        Err(e) => Err(e.into()),
    }
}
