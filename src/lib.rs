pub mod models;
pub mod passport_validator;
pub mod processing;
pub mod utils;
pub mod validation;
pub mod verification;

pub use models::{MrzRecord, ValidationResult};
pub use passport_validator::PassportValidator;
pub use utils::MrzError;

/// Parse raw MRZ text with the default rules.
pub fn parse_mrz(raw: &str) -> Result<MrzRecord, MrzError> {
    PassportValidator::new().parse_mrz(raw)
}

/// Check every check digit of a parsed record.
pub fn validate(record: &MrzRecord) -> ValidationResult {
    validation::MrzValidator::validate(record)
}
