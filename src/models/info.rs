use super::data::{pad_field, trim_filler, DocumentFormat, MrzRecord, Sex, FILLER};
use super::rules::MrzRules;
use crate::processing::FieldExtractor;
use crate::utils::MrzError;
use crate::validation::{compute_check_digit, MrzValidator};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref MRZ_DATE: Regex = Regex::new(r"^[0-9]{6}$").unwrap();
    static ref ALPHA_FIELD: Regex = Regex::new(r"^[A-Z<]*$").unwrap();
    static ref ALPHANUMERIC_FIELD: Regex = Regex::new(r"^[A-Z0-9<]*$").unwrap();
}

/// MRZ data as exchanged with host applications, keyed the way the mobile
/// bridge keys it. Check digits are not carried; they are recomputed when the
/// data is turned back into a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MrzInfo {
    pub document_code: String,
    pub issuing_state: String,
    pub primary_identifier: String,
    pub secondary_identifier: String,
    pub document_number: String,
    pub nationality: String,
    pub date_of_birth: String,
    pub gender: String,
    pub date_of_expiry: String,
    pub optional_data: String,
}

impl MrzInfo {
    pub fn from_record(record: &MrzRecord) -> MrzInfo {
        let gender = match record.sex {
            Sex::Male => "MALE",
            Sex::Female => "FEMALE",
            Sex::Unspecified => "UNSPECIFIED",
            Sex::NotGiven => "UNKNOWN",
        };
        MrzInfo {
            document_code: record.document_code.clone(),
            issuing_state: record.issuing_state.clone(),
            primary_identifier: record.surname(),
            secondary_identifier: record.given_names(),
            document_number: record.document_number.clone(),
            nationality: record.nationality.clone(),
            date_of_birth: record.date_of_birth.clone(),
            gender: gender.to_string(),
            date_of_expiry: record.date_of_expiry.clone(),
            optional_data: record.optional_data.clone(),
        }
    }

    /// Validate every field once and build the record a document with these
    /// fields would carry: TD3 for passport codes, TD1 otherwise.
    pub fn into_record(self) -> Result<MrzRecord, MrzError> {
        let document_code = coded("documentCode", &self.document_code, &ALPHA_FIELD)?;
        let format = if document_code.starts_with('P') {
            DocumentFormat::TD3
        } else {
            DocumentFormat::TD1
        };

        let date_of_birth = date("dateOfBirth", &self.date_of_birth)?;
        let date_of_expiry = date("dateOfExpiry", &self.date_of_expiry)?;
        let document_number = coded("documentNumber", &self.document_number, &ALPHANUMERIC_FIELD)?;
        if document_number.is_empty() {
            return Err(MrzError::InvalidField("documentNumber is empty".to_string()));
        }
        let optional_data = coded("optionalData", &self.optional_data, &ALPHANUMERIC_FIELD)?;

        let mut record = MrzRecord {
            document_format: format,
            document_code,
            issuing_state: coded("issuingState", &self.issuing_state, &ALPHA_FIELD)?,
            primary_identifier: coded("primaryIdentifier", &self.primary_identifier, &ALPHA_FIELD)?,
            secondary_identifier: coded("secondaryIdentifier", &self.secondary_identifier, &ALPHA_FIELD)?,
            document_number,
            document_number_check: FILLER,
            nationality: coded("nationality", &self.nationality, &ALPHA_FIELD)?,
            date_of_birth,
            date_of_birth_check: FILLER,
            sex: parse_gender(&self.gender),
            date_of_expiry,
            date_of_expiry_check: FILLER,
            optional_data,
            optional_data_2: String::new(),
            optional_data_check: None,
            composite_check: FILLER,
        };

        record.document_number_check = check_digit(&record.document_number_field())?;
        record.date_of_birth_check = check_digit(&record.date_of_birth)?;
        record.date_of_expiry_check = check_digit(&record.date_of_expiry)?;
        if format == DocumentFormat::TD3 {
            record.optional_data_check = Some(if record.optional_data.is_empty() {
                FILLER
            } else {
                check_digit(&pad_field(&record.optional_data, 14))?
            });
        }
        record.composite_check = check_digit(&MrzValidator::composite_source(&record))?;

        // Fields that overflow their columns would not survive printing.
        let rules = MrzRules::default();
        let reparsed = FieldExtractor::new(&rules).extract(&record.to_lines())?;
        if reparsed != record {
            return Err(MrzError::InvalidField(format!(
                "Fields do not fit the {:?} layout",
                format
            )));
        }

        Ok(record)
    }
}

// Host values may use spaces where the MRZ uses fillers.
fn coded(name: &str, value: &str, alphabet: &Regex) -> Result<String, MrzError> {
    let normalized: String = value
        .trim()
        .chars()
        .map(|c| if c == ' ' { FILLER } else { c.to_ascii_uppercase() })
        .collect();
    if !alphabet.is_match(&normalized) {
        return Err(MrzError::InvalidField(format!("{} contains invalid characters: {:?}", name, value)));
    }
    Ok(trim_filler(&normalized))
}

fn date(name: &str, value: &str) -> Result<String, MrzError> {
    let value = value.trim();
    if !MRZ_DATE.is_match(value) {
        return Err(MrzError::InvalidField(format!("{} must be YYMMDD, got {:?}", name, value)));
    }
    Ok(value.to_string())
}

fn check_digit(value: &str) -> Result<char, MrzError> {
    compute_check_digit(value)
        .ok_or_else(|| MrzError::InvalidField(format!("Cannot compute a check digit over {:?}", value)))
}

fn parse_gender(gender: &str) -> Sex {
    match gender.trim().to_ascii_uppercase().as_str() {
        "M" | "MALE" => Sex::Male,
        "F" | "FEMALE" => Sex::Female,
        "<" | "UNKNOWN" => Sex::NotGiven,
        _ => Sex::Unspecified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_mrz;

    fn passport_info() -> MrzInfo {
        serde_json::from_str(
            r#"{
                "documentCode": "P",
                "issuingState": "UTO",
                "primaryIdentifier": "ERIKSSON",
                "secondaryIdentifier": "ANNA MARIA",
                "documentNumber": "L898902C3",
                "nationality": "UTO",
                "dateOfBirth": "740812",
                "gender": "F",
                "dateOfExpiry": "120415",
                "optionalData": "ZE184226B"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_into_record_matches_printed_zone() {
        let record = passport_info().into_record().unwrap();
        let printed = parse_mrz(
            "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<\nL898902C36UTO7408122F1204159ZE184226B<<<<<10",
        )
        .unwrap();
        assert_eq!(record, printed);
    }

    #[test]
    fn test_from_record_uses_readable_names() {
        let record = passport_info().into_record().unwrap();
        let info = MrzInfo::from_record(&record);
        assert_eq!(info.secondary_identifier, "ANNA MARIA");
        assert_eq!(info.gender, "FEMALE");
        assert_eq!(info.clone().into_record().unwrap(), record);
    }

    #[test]
    fn test_id_card_becomes_td1() {
        let mut info = passport_info();
        info.document_code = "I".to_string();
        info.document_number = "D23145890734".to_string();
        info.optional_data = String::new();
        let record = info.into_record().unwrap();
        assert_eq!(record.document_format, DocumentFormat::TD1);
        assert_eq!(record.document_number_check, '9');
        assert!(record.has_long_document_number());
    }

    #[test]
    fn test_rejects_bad_fields() {
        let mut info = passport_info();
        info.date_of_birth = "74-08-12".to_string();
        assert!(matches!(info.into_record(), Err(MrzError::InvalidField(_))));

        let mut info = passport_info();
        info.nationality = "U70".to_string();
        assert!(matches!(info.into_record(), Err(MrzError::InvalidField(_))));

        let mut info = passport_info();
        info.optional_data = "X".repeat(15);
        assert!(matches!(info.into_record(), Err(MrzError::InvalidField(_))));
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let info: MrzInfo = serde_json::from_str(r#"{"documentNumber": "L898902C3"}"#).unwrap();
        assert_eq!(info.gender, "");
        assert_eq!(parse_gender(&info.gender), Sex::Unspecified);
    }
}
