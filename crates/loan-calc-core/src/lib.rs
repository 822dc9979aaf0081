pub mod annuity;
pub mod config;
pub mod error;
pub mod types;

#[cfg(feature = "offers")]
pub mod offers;

#[cfg(feature = "credit")]
pub mod credit;

#[cfg(feature = "validation")]
pub mod validation;

pub use error::{FieldViolation, LoanCalcError};
pub use types::*;

/// Standard result type for all loan-calc operations
pub type LoanCalcResult<T> = Result<T, LoanCalcError>;
