use chrono::NaiveDate;
use log::info;

use crate::models::{MrzRecord, VerificationResult};
use crate::validation::{ExpiryValidator, FormatValidator, MrzValidator};

/// MRTD Verifier for checking a parsed machine readable zone
/// according to ICAO Doc 9303
pub struct MRTDVerifier;

impl MRTDVerifier {
    pub fn new() -> Self {
        MRTDVerifier
    }

    /// Run the check digit, completeness and expiry checks against `today`.
    pub fn verify(&self, record: &MrzRecord, today: NaiveDate) -> VerificationResult {
        // Collect validation issues
        let mut issues = Vec::new();

        // 1. Check digits
        let mrz_validation = MrzValidator::validate(record);
        issues.extend(mrz_validation.issues.clone());

        // 2. Field completeness
        let format_validation = FormatValidator::validate(record);
        issues.extend(format_validation.issues.clone());

        // 3. Expiry
        let expiry_validation = ExpiryValidator::validate(record, today);
        issues.extend(expiry_validation.issues.clone());

        let is_valid = mrz_validation.is_valid
            && format_validation.is_valid
            && expiry_validation.is_valid;

        info!(
            "Verified {} {}: {}",
            record.document_type(),
            record.document_number,
            if is_valid { "VALID" } else { "INVALID" }
        );

        VerificationResult {
            is_valid,
            document_type: record.document_type(),
            mrz_validation,
            format_validation,
            expiry_validation,
            issues,
        }
    }
}

impl Default for MRTDVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentType, ValidationIssueType};
    use crate::parse_mrz;

    const TD3: &str = "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<\nL898902C36UTO7408122F1204159ZE184226B<<<<<10";

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_valid_before_expiry() {
        let record = parse_mrz(TD3).unwrap();
        let result = MRTDVerifier::new().verify(&record, day(2010, 6, 1));
        assert!(result.is_valid, "{:?}", result.issues);
        assert_eq!(result.document_type, DocumentType::Passport);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_expired_document_is_invalid() {
        let record = parse_mrz(TD3).unwrap();
        let result = MRTDVerifier::new().verify(&record, day(2026, 10, 18));
        assert!(!result.is_valid);
        assert!(result.mrz_validation.is_valid);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].issue_type, ValidationIssueType::Expiry);
    }

    #[test]
    fn test_issues_are_ordered_by_check() {
        let mut record = parse_mrz(TD3).unwrap();
        record.primary_identifier = String::new();
        record.document_number_check = '0';
        let result = MRTDVerifier::new().verify(&record, day(2026, 10, 18));
        let kinds: Vec<ValidationIssueType> = result.issues.iter().map(|i| i.issue_type).collect();
        assert_eq!(kinds.first(), Some(&ValidationIssueType::Checksum));
        assert!(kinds.contains(&ValidationIssueType::Format));
        assert_eq!(kinds.last(), Some(&ValidationIssueType::Expiry));
        assert!(!result.format_validation.is_valid);
    }
}
