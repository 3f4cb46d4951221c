use crate::models::{pad_field, MrzRecord};
use crate::utils::MrzError;
use crate::validation::compute_check_digit;
use serde::Serialize;

/// The MRZ fields a chip reader needs to open a session with the document.
///
/// Only the seed string is built here; key derivation and the secure
/// messaging handshake belong to the chip access library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKey {
    pub document_number: String,
    pub date_of_birth: String,
    pub date_of_expiry: String,
}

impl AccessKey {
    pub fn from_record(record: &MrzRecord) -> Result<AccessKey, MrzError> {
        let is_date = |d: &str| d.len() == 6 && d.chars().all(|c| c.is_ascii_digit());
        if record.document_number.is_empty() {
            return Err(MrzError::InvalidField("Document number is required for chip access".to_string()));
        }
        if !is_date(&record.date_of_birth) || !is_date(&record.date_of_expiry) {
            return Err(MrzError::InvalidDate(
                "Birth and expiry dates must be YYMMDD for chip access".to_string(),
            ));
        }
        Ok(AccessKey {
            document_number: record.document_number.clone(),
            date_of_birth: record.date_of_birth.clone(),
            date_of_expiry: record.date_of_expiry.clone(),
        })
    }

    /// Document number (at least nine characters), birth date and expiry
    /// date, each followed by its check digit.
    pub fn mrz_information(&self) -> Result<String, MrzError> {
        let number = if self.document_number.chars().count() < 9 {
            pad_field(&self.document_number, 9)
        } else {
            self.document_number.clone()
        };

        let mut seed = String::new();
        for field in [&number, &self.date_of_birth, &self.date_of_expiry] {
            let check = compute_check_digit(field).ok_or_else(|| {
                MrzError::InvalidField(format!("Cannot compute a check digit over {:?}", field))
            })?;
            seed.push_str(field);
            seed.push(check);
        }
        Ok(seed)
    }
}
