use crate::models::{DocumentFormat, FormatValidationResult, MrzRecord, ValidationIssue, ValidationIssueType};
use crate::utils::dates::is_calendar_date;
use crate::utils::MrzError;

/// Maps tokenized lines to their ICAO layout.
pub struct DocumentClassifier;

impl DocumentClassifier {
    /// Line count and width pick the layout; the first character of the
    /// document code must then belong to it. Nothing is guessed.
    pub fn classify(lines: &[String]) -> Result<DocumentFormat, MrzError> {
        let width = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        if lines.iter().any(|l| l.chars().count() != width) {
            return Err(MrzError::LayoutError("MRZ lines differ in width".to_string()));
        }

        let format = DocumentFormat::from_shape(lines.len(), width).ok_or_else(|| {
            MrzError::LayoutError(format!(
                "No MRZ layout has {} lines of {} characters",
                lines.len(),
                width
            ))
        })?;

        match lines[0].chars().next() {
            Some(code) if format.accepts_document_code(code) => Ok(format),
            code => Err(MrzError::UnknownDocumentType(format!(
                "Document code {:?} does not match the {:?} layout",
                code, format
            ))),
        }
    }
}

/// Checks that the fields a reader needs are present and well formed.
pub struct FormatValidator;

impl FormatValidator {
    pub fn validate(record: &MrzRecord) -> FormatValidationResult {
        let mut issues = Vec::new();
        let mut correct_format = true;

        let mut missing = |present: bool, message: &str| {
            if !present {
                correct_format = false;
                issues.push(ValidationIssue {
                    issue_type: ValidationIssueType::Format,
                    message: message.to_string(),
                });
            }
        };

        missing(!record.document_number.is_empty(), "Document number is missing");
        missing(!record.primary_identifier.is_empty(), "Surname is missing");
        missing(!record.issuing_state.is_empty(), "Issuing state is missing");
        missing(!record.nationality.is_empty(), "Nationality is missing");
        missing(is_calendar_date(&record.date_of_birth), "Date of birth is missing or not a date");
        missing(is_calendar_date(&record.date_of_expiry), "Date of expiry is missing or not a date");

        FormatValidationResult {
            is_valid: correct_format,
            correct_format,
            issues,
        }
    }
}
