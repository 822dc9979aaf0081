use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::credit::{self, ScoringData};
use loan_calc_core::validation;

use super::{ApplicantArgs, GlobalOptions};
use crate::input;

/// Arguments for the final credit calculation
#[derive(Args)]
pub struct CreditArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Credit amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<i32>,

    /// Applicant takes the insurance product
    #[arg(long)]
    pub insurance: bool,

    /// Applicant is a salary-project client
    #[arg(long)]
    pub salary_client: bool,

    #[command(flatten)]
    pub applicant: ApplicantArgs,
}

/// Resolve the scoring data from `--input`, piped stdin or flags. The flag is
/// true when the data came from a JSON document. A `calculation_date` given
/// on the command line replaces the document's.
pub fn read_scoring(
    args: CreditArgs,
    calculation_date: Option<NaiveDate>,
) -> Result<(ScoringData, bool), Box<dyn std::error::Error>> {
    let (mut data, from_document): (ScoringData, bool) = if let Some(ref path) = args.input {
        (input::file::read_json(path)?, true)
    } else if let Some(data) = input::stdin::read_piped()? {
        (data, true)
    } else {
        let applicant = args.applicant;
        (
            ScoringData {
                amount: Some(args.amount
                    .ok_or("--amount is required (or provide --input)")?),
                term: args.term
                    .ok_or("--term is required (or provide --input)")?,
                first_name: applicant.first_name,
                last_name: applicant.last_name,
                middle_name: applicant.middle_name,
                birthdate: applicant.birthdate,
                passport_series: applicant.passport_series,
                passport_number: applicant.passport_number,
                is_insurance_enabled: Some(args.insurance),
                is_salary_client: Some(args.salary_client),
                calculation_date: None,
            },
            false,
        )
    };
    if calculation_date.is_some() {
        data.calculation_date = calculation_date;
    }
    Ok((data, from_document))
}

pub fn run_credit(args: CreditArgs, opts: &GlobalOptions) -> Result<Value, Box<dyn std::error::Error>> {
    let (data, from_document) = read_scoring(args, opts.calculation_date)?;
    validation::validate_scoring_data(
        &data,
        &opts.config.validation,
        opts.validation_mode(from_document),
    )?;
    let result = credit::calculate_credit(&data, &opts.config.credit)?;
    Ok(serde_json::to_value(result)?)
}
