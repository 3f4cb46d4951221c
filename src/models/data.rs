use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The MRZ filler character.
pub const FILLER: char = '<';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    TD1, // ID Card (85.6mm × 54.0mm)
    TD2, // ID Card (105.0mm × 74.0mm)
    TD3, // Passport (125.0mm × 88.0mm)
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 3] = [DocumentFormat::TD1, DocumentFormat::TD2, DocumentFormat::TD3];

    /// Index of the line that holds the name field.
    pub fn name_line(&self) -> usize {
        match self {
            DocumentFormat::TD1 => 2,
            DocumentFormat::TD2 | DocumentFormat::TD3 => 0,
        }
    }

    pub fn mrz_lines(&self) -> usize {
        match self {
            DocumentFormat::TD1 => 3,
            DocumentFormat::TD2 => 2,
            DocumentFormat::TD3 => 2,
        }
    }

    pub fn mrz_chars_per_line(&self) -> usize {
        match self {
            DocumentFormat::TD1 => 30,
            DocumentFormat::TD2 => 36,
            DocumentFormat::TD3 => 44,
        }
    }

    /// Layout with exactly this line count and line width, if any.
    pub fn from_shape(lines: usize, width: usize) -> Option<DocumentFormat> {
        Self::ALL
            .into_iter()
            .find(|f| f.mrz_lines() == lines && f.mrz_chars_per_line() == width)
    }

    pub fn is_known_width(width: usize) -> bool {
        Self::ALL.iter().any(|f| f.mrz_chars_per_line() == width)
    }

    /// Whether a document code starting with `first` belongs on this layout.
    pub fn accepts_document_code(&self, first: char) -> bool {
        match self {
            DocumentFormat::TD3 => first == 'P',
            DocumentFormat::TD1 | DocumentFormat::TD2 => matches!(first, 'I' | 'A' | 'C'),
        }
    }

    pub fn document_type(&self) -> DocumentType {
        match self {
            DocumentFormat::TD3 => DocumentType::Passport,
            DocumentFormat::TD1 | DocumentFormat::TD2 => DocumentType::IdCard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Passport,
    IdCard,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Passport => "PASSPORT",
            DocumentType::IdCard => "ID_CARD",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "X")]
    Unspecified,
    #[serde(rename = "<")]
    NotGiven,
}

impl Sex {
    pub fn from_code(code: char) -> Option<Sex> {
        match code {
            'M' => Some(Sex::Male),
            'F' => Some(Sex::Female),
            'X' => Some(Sex::Unspecified),
            FILLER => Some(Sex::NotGiven),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Sex::Male => 'M',
            Sex::Female => 'F',
            Sex::Unspecified => 'X',
            Sex::NotGiven => FILLER,
        }
    }
}

/// One machine readable zone, kept in its coded form.
///
/// Variable-content fields are stored with trailing fillers removed and are
/// padded back to the layout width by [`MrzRecord::to_lines`], so a record
/// survives a serialize/parse cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MrzRecord {
    pub document_format: DocumentFormat,
    pub document_code: String,
    pub issuing_state: String,
    pub primary_identifier: String,
    pub secondary_identifier: String,
    pub document_number: String,
    pub document_number_check: char,
    pub nationality: String,
    pub date_of_birth: String,
    pub date_of_birth_check: char,
    pub sex: Sex,
    pub date_of_expiry: String,
    pub date_of_expiry_check: char,
    pub optional_data: String,
    /// TD1 only: optional data on line 2.
    pub optional_data_2: String,
    /// TD3 only: check digit over the personal number.
    pub optional_data_check: Option<char>,
    pub composite_check: char,
}

impl MrzRecord {
    pub fn document_type(&self) -> DocumentType {
        self.document_format.document_type()
    }

    pub fn surname(&self) -> String {
        decode_name(&self.primary_identifier)
    }

    pub fn given_names(&self) -> String {
        decode_name(&self.secondary_identifier)
    }

    /// Given names followed by surname, as printed on most documents.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_names(), self.surname())
            .trim()
            .to_string()
    }

    /// Document number as checked: padded to nine characters, or the full
    /// number when a TD1 long document number spills into the optional data.
    pub fn document_number_field(&self) -> String {
        if self.document_number.chars().count() > 9 {
            self.document_number.clone()
        } else {
            pad_field(&self.document_number, 9)
        }
    }

    pub fn has_long_document_number(&self) -> bool {
        self.document_format == DocumentFormat::TD1 && self.document_number.chars().count() > 9
    }

    pub fn to_lines(&self) -> Vec<String> {
        let width = self.document_format.mrz_chars_per_line();
        let header = format!(
            "{}{}",
            pad_field(&self.document_code, 2),
            pad_field(&self.issuing_state, 3)
        );

        match self.document_format {
            DocumentFormat::TD3 => {
                let line1 = format!("{}{}", header, self.name_field(width - 5));
                let line2 = format!(
                    "{}{}{}{}{}{}{}{}{}{}{}",
                    pad_field(&self.document_number, 9),
                    self.document_number_check,
                    pad_field(&self.nationality, 3),
                    pad_field(&self.date_of_birth, 6),
                    self.date_of_birth_check,
                    self.sex.code(),
                    pad_field(&self.date_of_expiry, 6),
                    self.date_of_expiry_check,
                    pad_field(&self.optional_data, 14),
                    self.optional_data_check.unwrap_or(FILLER),
                    self.composite_check,
                );
                vec![line1, line2]
            }
            DocumentFormat::TD2 => {
                let line1 = format!("{}{}", header, self.name_field(width - 5));
                let line2 = format!(
                    "{}{}{}{}{}{}{}{}{}{}",
                    pad_field(&self.document_number, 9),
                    self.document_number_check,
                    pad_field(&self.nationality, 3),
                    pad_field(&self.date_of_birth, 6),
                    self.date_of_birth_check,
                    self.sex.code(),
                    pad_field(&self.date_of_expiry, 6),
                    self.date_of_expiry_check,
                    pad_field(&self.optional_data, 7),
                    self.composite_check,
                );
                vec![line1, line2]
            }
            DocumentFormat::TD1 => {
                let number_block = if self.has_long_document_number() {
                    let head: String = self.document_number.chars().take(9).collect();
                    let tail: String = self.document_number.chars().skip(9).collect();
                    let spill = format!(
                        "{}{}{}{}",
                        tail, self.document_number_check, FILLER, self.optional_data
                    );
                    format!("{}{}{}", head, FILLER, pad_field(&spill, 15))
                } else {
                    format!(
                        "{}{}{}",
                        pad_field(&self.document_number, 9),
                        self.document_number_check,
                        pad_field(&self.optional_data, 15)
                    )
                };
                let line1 = format!("{}{}", header, number_block);
                let line2 = format!(
                    "{}{}{}{}{}{}{}{}",
                    pad_field(&self.date_of_birth, 6),
                    self.date_of_birth_check,
                    self.sex.code(),
                    pad_field(&self.date_of_expiry, 6),
                    self.date_of_expiry_check,
                    pad_field(&self.nationality, 3),
                    pad_field(&self.optional_data_2, 11),
                    self.composite_check,
                );
                let line3 = self.name_field(width);
                vec![line1, line2, line3]
            }
        }
    }

    /// The zone as a single newline-separated string.
    pub fn to_mrz_string(&self) -> String {
        self.to_lines().join("\n")
    }

    fn name_field(&self, width: usize) -> String {
        pad_field(
            &format!("{}<<{}", self.primary_identifier, self.secondary_identifier),
            width,
        )
    }
}

/// Pad with fillers, or truncate, to exactly `width` characters.
pub(crate) fn pad_field(value: &str, width: usize) -> String {
    let mut padded: String = value.chars().take(width).collect();
    let len = padded.chars().count();
    padded.extend(std::iter::repeat(FILLER).take(width - len));
    padded
}

pub(crate) fn trim_filler(value: &str) -> String {
    value.trim_end_matches(FILLER).to_string()
}

fn decode_name(coded: &str) -> String {
    coded
        .split(FILLER)
        .filter(|part| !part.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Fields protected by a check digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckedField {
    DocumentNumber,
    DateOfBirth,
    DateOfExpiry,
    OptionalData,
    Composite,
}

impl fmt::Display for CheckedField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CheckedField::DocumentNumber => "document number",
            CheckedField::DateOfBirth => "date of birth",
            CheckedField::DateOfExpiry => "date of expiry",
            CheckedField::OptionalData => "optional data",
            CheckedField::Composite => "composite",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub issue_type: ValidationIssueType,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationIssueType {
    Checksum,
    Format,
    Expiry,
}

impl fmt::Display for ValidationIssueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            ValidationIssueType::Checksum => "CHECKSUM",
            ValidationIssueType::Format => "FORMAT",
            ValidationIssueType::Expiry => "EXPIRY",
        };
        f.write_str(label)
    }
}

/// Check digit outcome for one parsed record.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub record: MrzRecord,
    pub document_number_check_valid: bool,
    pub date_of_birth_check_valid: bool,
    pub date_of_expiry_check_valid: bool,
    /// Always true for layouts without an optional data check digit.
    pub optional_data_check_valid: bool,
    pub composite_check_valid: bool,
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn failed_fields(&self) -> Vec<CheckedField> {
        [
            (CheckedField::DocumentNumber, self.document_number_check_valid),
            (CheckedField::DateOfBirth, self.date_of_birth_check_valid),
            (CheckedField::DateOfExpiry, self.date_of_expiry_check_valid),
            (CheckedField::OptionalData, self.optional_data_check_valid),
            (CheckedField::Composite, self.composite_check_valid),
        ]
        .into_iter()
        .filter(|(_, valid)| !valid)
        .map(|(field, _)| field)
        .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormatValidationResult {
    pub is_valid: bool,
    pub correct_format: bool,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpiryValidationResult {
    pub is_valid: bool,
    pub not_expired: bool,
    pub expiry_date: Option<NaiveDate>,
    pub issues: Vec<ValidationIssue>,
}

/// Combined checksum, completeness and expiry outcome.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationResult {
    pub is_valid: bool,
    pub document_type: DocumentType,
    pub mrz_validation: ValidationResult,
    pub format_validation: FormatValidationResult,
    pub expiry_validation: ExpiryValidationResult,
    pub issues: Vec<ValidationIssue>,
}

/// Human-readable holder details derived from a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub document_type: DocumentType,
    pub document_number: String,
    pub surname: String,
    pub given_names: String,
    pub full_name: String,
    pub nationality: String,
    pub issuing_state: String,
    pub sex: Sex,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_expiry: Option<NaiveDate>,
}
