pub mod credit;
pub mod offers;
pub mod validate;

use chrono::NaiveDate;
use clap::Args;

use loan_calc_core::config::CalculatorConfig;
use loan_calc_core::validation::ValidationMode;

use crate::input;

/// Settings shared by every calculation command.
pub struct GlobalOptions {
    pub config: CalculatorConfig,
    pub strict: bool,
    /// Overrides any `calculation_date` in the request document
    pub calculation_date: Option<NaiveDate>,
}

impl GlobalOptions {
    pub fn load(
        config_path: Option<&str>,
        strict: bool,
        calculation_date: Option<NaiveDate>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = match config_path {
            Some(path) => input::file::read_config(path)?,
            None => CalculatorConfig::default(),
        };
        Ok(Self {
            config,
            strict,
            calculation_date,
        })
    }

    /// Documents (file or stdin) are always checked strictly; bare flags only
    /// when `--strict` is given.
    pub fn validation_mode(&self, from_document: bool) -> ValidationMode {
        if from_document || self.strict {
            ValidationMode::Strict
        } else {
            ValidationMode::Lenient
        }
    }
}

/// Applicant identity flags shared by the request-building commands
#[derive(Args, Debug, Default)]
pub struct ApplicantArgs {
    /// First name (2-30 Latin letters)
    #[arg(long)]
    pub first_name: Option<String>,

    /// Last name (2-30 Latin letters)
    #[arg(long)]
    pub last_name: Option<String>,

    /// Middle name (optional, 2-30 Latin letters)
    #[arg(long)]
    pub middle_name: Option<String>,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub birthdate: Option<NaiveDate>,

    /// Passport series (4 digits)
    #[arg(long)]
    pub passport_series: Option<String>,

    /// Passport number (6 digits)
    #[arg(long)]
    pub passport_number: Option<String>,
}
