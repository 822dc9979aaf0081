use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::offers::{self, LoanStatementRequest};
use loan_calc_core::validation;

use super::{ApplicantArgs, GlobalOptions};
use crate::input;

/// Arguments for loan offer generation
#[derive(Args)]
pub struct OffersArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Requested amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<i32>,

    /// Contact email
    #[arg(long)]
    pub email: Option<String>,

    #[command(flatten)]
    pub applicant: ApplicantArgs,
}

/// Resolve the request from `--input`, piped stdin or flags. The flag is true
/// when the request came from a JSON document. A `calculation_date` given on
/// the command line replaces the document's.
pub fn read_request(
    args: OffersArgs,
    calculation_date: Option<NaiveDate>,
) -> Result<(LoanStatementRequest, bool), Box<dyn std::error::Error>> {
    let (mut request, from_document): (LoanStatementRequest, bool) = if let Some(ref path) = args.input {
        (input::file::read_json(path)?, true)
    } else if let Some(request) = input::stdin::read_piped()? {
        (request, true)
    } else {
        let applicant = args.applicant;
        (
            LoanStatementRequest {
                amount: args.amount
                    .ok_or("--amount is required (or provide --input)")?,
                term: args.term
                    .ok_or("--term is required (or provide --input)")?,
                first_name: applicant.first_name,
                last_name: applicant.last_name,
                middle_name: applicant.middle_name,
                email: args.email,
                birthdate: applicant.birthdate,
                passport_series: applicant.passport_series,
                passport_number: applicant.passport_number,
                calculation_date: None,
            },
            false,
        )
    };
    if calculation_date.is_some() {
        request.calculation_date = calculation_date;
    }
    Ok((request, from_document))
}

pub fn run_offers(args: OffersArgs, opts: &GlobalOptions) -> Result<Value, Box<dyn std::error::Error>> {
    let (request, from_document) = read_request(args, opts.calculation_date)?;
    validation::validate_statement_request(
        &request,
        &opts.config.validation,
        opts.validation_mode(from_document),
    )?;
    let result = offers::generate_offers(&request, &opts.config.offers)?;
    Ok(serde_json::to_value(result)?)
}
