use chrono::NaiveDate;
use crate::models::{ExpiryValidationResult, MrzRecord, ValidationIssue, ValidationIssueType};
use crate::utils::dates::resolve_expiry_date;

pub struct ExpiryValidator;

impl ExpiryValidator {
    pub fn validate(record: &MrzRecord, today: NaiveDate) -> ExpiryValidationResult {
        let mut issues = Vec::new();
        let mut not_expired = false;

        let expiry_date = resolve_expiry_date(&record.date_of_expiry, today);
        if let Some(date) = expiry_date {
            // The document is still valid on its expiry day
            not_expired = date >= today;

            if !not_expired {
                issues.push(ValidationIssue {
                    issue_type: ValidationIssueType::Expiry,
                    message: format!("Document expired on {}", date),
                });
            }
        } else {
            issues.push(ValidationIssue {
                issue_type: ValidationIssueType::Expiry,
                message: "Invalid expiry date format".to_string(),
            });
        }

        ExpiryValidationResult {
            is_valid: not_expired,
            not_expired,
            expiry_date,
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_mrz;

    const TD3: &str = "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<\nL898902C36UTO7408122F1204159ZE184226B<<<<<10";

    #[test]
    fn test_expired_document() {
        let record = parse_mrz(TD3).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let result = ExpiryValidator::validate(&record, today);
        assert!(!result.is_valid);
        assert_eq!(result.expiry_date, NaiveDate::from_ymd_opt(2012, 4, 15));
        assert_eq!(result.issues.len(), 1);
    }

    #[test]
    fn test_valid_on_expiry_day() {
        let record = parse_mrz(TD3).unwrap();
        let today = NaiveDate::from_ymd_opt(2012, 4, 15).unwrap();
        assert!(ExpiryValidator::validate(&record, today).not_expired);
    }

    #[test]
    fn test_unreadable_expiry() {
        let mut record = parse_mrz(TD3).unwrap();
        record.date_of_expiry = "12<415".to_string();
        let today = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        let result = ExpiryValidator::validate(&record, today);
        assert!(!result.is_valid);
        assert_eq!(result.expiry_date, None);
    }
}
