use chrono::NaiveDate;
use log::{debug, info};

use crate::models::*;
use crate::processing::*;
use crate::utils::MrzError;
use crate::validation::*;
use crate::verification::{AccessKey, MRTDVerifier};

/// Entry point for every MRZ operation, configured with the OCR repairs it
/// may apply.
pub struct PassportValidator {
    rules: MrzRules,
}

impl PassportValidator {
    pub fn new() -> Self {
        Self::with_rules(MrzRules::default())
    }

    pub fn with_rules(rules: MrzRules) -> Self {
        PassportValidator { rules }
    }

    /// Tokenize, classify and slice raw text into a record.
    pub fn parse_mrz(&self, raw: &str) -> Result<MrzRecord, MrzError> {
        // Step 1: Find the zone lines
        let lines = MrzTokenizer::new(&self.rules).tokenize(raw)?;
        debug!("MRZ lines: {:?}", lines);

        // Step 2: Classify and extract fields
        let record = FieldExtractor::new(&self.rules).extract(&lines)?;
        info!(
            "Parsed {:?} MRZ for document {}",
            record.document_format, record.document_number
        );
        Ok(record)
    }

    pub fn validate(&self, record: &MrzRecord) -> ValidationResult {
        MrzValidator::validate(record)
    }

    pub fn parse_and_validate(&self, raw: &str) -> Result<ValidationResult, MrzError> {
        let record = self.parse_mrz(raw)?;
        Ok(self.validate(&record))
    }

    /// Parse and reject any record with a failing check digit.
    pub fn parse_verified(&self, raw: &str) -> Result<MrzRecord, MrzError> {
        let result = self.parse_and_validate(raw)?;
        if !result.is_valid {
            let failed: Vec<String> = result.failed_fields().iter().map(|f| f.to_string()).collect();
            return Err(MrzError::ChecksumError(format!(
                "Check digit mismatch in: {}",
                failed.join(", ")
            )));
        }
        Ok(result.record)
    }

    /// The cleaned candidate lines of `raw`, one per line.
    pub fn clean_mrz_string(&self, raw: &str) -> String {
        MrzTokenizer::new(&self.rules).clean(raw)
    }

    /// Whether `raw` holds a zone of a known layout and document type.
    pub fn is_valid_mrz_format(&self, raw: &str) -> bool {
        MrzTokenizer::new(&self.rules)
            .tokenize(raw)
            .and_then(|lines| DocumentClassifier::classify(&lines))
            .is_ok()
    }

    pub fn document_type(&self, record: &MrzRecord) -> DocumentType {
        record.document_type()
    }

    pub fn personal_info(&self, record: &MrzRecord, today: NaiveDate) -> PersonalInfo {
        extract_personal_info(record, today)
    }

    /// Parse zone lines that were already separated by the caller.
    pub fn process_lines(
        &self,
        line1: &str,
        line2: &str,
        line3: Option<&str>,
    ) -> Result<MrzRecord, MrzError> {
        let raw = match line3 {
            Some(line3) if !line3.trim().is_empty() => format!("{}\n{}\n{}", line1, line2, line3),
            _ => format!("{}\n{}", line1, line2),
        };
        self.parse_mrz(&raw)
    }

    /// Check MRZ data received from a host application.
    pub fn validate_info(&self, mrz_info: MrzInfo, today: NaiveDate) -> Result<VerificationResult, MrzError> {
        let record = mrz_info.into_record()?;
        Ok(self.verify(&record, today))
    }

    pub fn verify(&self, record: &MrzRecord, today: NaiveDate) -> VerificationResult {
        MRTDVerifier::new().verify(record, today)
    }

    pub fn access_key(&self, record: &MrzRecord) -> Result<AccessKey, MrzError> {
        AccessKey::from_record(record)
    }
}

impl Default for PassportValidator {
    fn default() -> Self {
        Self::new()
    }
}
