use crate::models::{
    pad_field, CheckedField, DocumentFormat, MrzRecord, ValidationIssue, ValidationIssueType,
    ValidationResult, FILLER,
};
use log::warn;

const WEIGHTS: [u32; 3] = [7, 3, 1];

/// Numeric value of an MRZ character, `None` outside `[A-Z0-9<]`.
pub fn char_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        'A'..='Z' => Some(c as u32 - 'A' as u32 + 10),
        FILLER => Some(0),
        _ => None,
    }
}

/// ICAO 7-3-1 check digit of `value`.
pub fn compute_check_digit(value: &str) -> Option<char> {
    let mut sum = 0;
    for (i, c) in value.chars().enumerate() {
        sum += char_value(c)? * WEIGHTS[i % 3];
    }
    char::from_digit(sum % 10, 10)
}

pub fn is_check_digit_valid(value: &str, check: char) -> bool {
    compute_check_digit(value) == Some(check)
}

pub struct MrzValidator;

impl MrzValidator {
    pub fn validate(record: &MrzRecord) -> ValidationResult {
        let mut issues = Vec::new();

        let document_number_check_valid =
            is_check_digit_valid(&record.document_number_field(), record.document_number_check);
        let date_of_birth_check_valid =
            is_check_digit_valid(&pad_field(&record.date_of_birth, 6), record.date_of_birth_check);
        let date_of_expiry_check_valid =
            is_check_digit_valid(&pad_field(&record.date_of_expiry, 6), record.date_of_expiry_check);
        let optional_data_check_valid = Self::optional_data_check(record);
        let composite_check_valid =
            is_check_digit_valid(&Self::composite_source(record), record.composite_check);

        let checks = [
            (CheckedField::DocumentNumber, document_number_check_valid),
            (CheckedField::DateOfBirth, date_of_birth_check_valid),
            (CheckedField::DateOfExpiry, date_of_expiry_check_valid),
            (CheckedField::OptionalData, optional_data_check_valid),
            (CheckedField::Composite, composite_check_valid),
        ];
        for (field, valid) in checks {
            if !valid {
                warn!("MRZ {} check digit mismatch", field);
                issues.push(ValidationIssue {
                    issue_type: ValidationIssueType::Checksum,
                    message: format!("The {} check digit does not match", field),
                });
            }
        }

        let is_valid = checks.iter().all(|(_, valid)| *valid);

        ValidationResult {
            record: record.clone(),
            document_number_check_valid,
            date_of_birth_check_valid,
            date_of_expiry_check_valid,
            optional_data_check_valid,
            composite_check_valid,
            is_valid,
            issues,
        }
    }

    // Only TD3 carries a check digit over the personal number; an empty
    // personal number may carry a filler instead of a digit.
    fn optional_data_check(record: &MrzRecord) -> bool {
        if record.document_format != DocumentFormat::TD3 {
            return true;
        }
        let field = pad_field(&record.optional_data, 14);
        match record.optional_data_check {
            Some(FILLER) => field.chars().all(|c| c == FILLER),
            Some(check) => is_check_digit_valid(&field, check),
            None => false,
        }
    }

    /// The characters the composite check digit covers, per layout.
    pub fn composite_source(record: &MrzRecord) -> String {
        let lines = record.to_lines();
        let line = |i: usize| lines.get(i).map(String::as_str).unwrap_or("");
        match record.document_format {
            DocumentFormat::TD3 => {
                let l2 = line(1);
                format!("{}{}{}", span(l2, 0, 10), span(l2, 13, 20), span(l2, 21, 43))
            }
            DocumentFormat::TD2 => {
                let l2 = line(1);
                format!("{}{}{}", span(l2, 0, 10), span(l2, 13, 20), span(l2, 21, 35))
            }
            DocumentFormat::TD1 => {
                let (l1, l2) = (line(0), line(1));
                format!(
                    "{}{}{}{}",
                    span(l1, 5, 30),
                    span(l2, 0, 7),
                    span(l2, 8, 15),
                    span(l2, 18, 29)
                )
            }
        }
    }
}

fn span(line: &str, start: usize, end: usize) -> String {
    line.chars().skip(start).take(end.saturating_sub(start)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{FieldExtractor, MrzTokenizer};
    use crate::models::MrzRules;

    const TD3: &str = "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<\nL898902C36UTO7408122F1204159ZE184226B<<<<<10";
    const TD1: &str = "I<UTOD231458907<<<<<<<<<<<<<<<\n7408122F1204159UTO<<<<<<<<<<<6\nERIKSSON<<ANNA<MARIA<<<<<<<<<<";

    fn parse(raw: &str) -> MrzRecord {
        let rules = MrzRules::default();
        let lines = MrzTokenizer::new(&rules).tokenize(raw).unwrap();
        FieldExtractor::new(&rules).extract(&lines).unwrap()
    }

    fn replace_at(s: &str, index: usize, c: char) -> String {
        s.chars()
            .enumerate()
            .map(|(i, orig)| if i == index { c } else { orig })
            .collect()
    }

    #[test]
    fn test_known_check_digits() {
        assert_eq!(compute_check_digit("L898902C3"), Some('6'));
        assert_eq!(compute_check_digit("740812"), Some('2'));
        assert_eq!(compute_check_digit("120415"), Some('9'));
        assert_eq!(compute_check_digit("ZE184226B<<<<<"), Some('1'));
        assert_eq!(compute_check_digit("D23145890734"), Some('9'));
        assert_eq!(compute_check_digit(""), Some('0'));
    }

    #[test]
    fn test_illegal_character_never_validates() {
        assert_eq!(compute_check_digit("74o812"), None);
        assert!(!is_check_digit_valid("74 812", '2'));
    }

    #[test]
    fn test_valid_td3_passes_every_check() {
        let result = MrzValidator::validate(&parse(TD3));
        assert!(result.is_valid);
        assert!(result.issues.is_empty());
        assert!(result.failed_fields().is_empty());
    }

    #[test]
    fn test_valid_td1_passes_every_check() {
        let result = MrzValidator::validate(&parse(TD1));
        assert!(result.is_valid, "{:?}", result.failed_fields());
    }

    #[test]
    fn test_digit_flip_only_breaks_its_own_field() {
        // (line index, column, field) for one digit inside each protected field
        let cases = [
            (1, 2, CheckedField::DocumentNumber),
            (1, 15, CheckedField::DateOfBirth),
            (1, 24, CheckedField::DateOfExpiry),
            (1, 30, CheckedField::OptionalData),
        ];
        let lines: Vec<&str> = TD3.lines().collect();
        for (line, column, field) in cases {
            let original = lines[line].chars().nth(column).unwrap();
            let flipped = if original == '1' { '2' } else { '1' };
            let mut mutated: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
            mutated[line] = replace_at(&mutated[line], column, flipped);
            let result = MrzValidator::validate(&parse(&mutated.join("\n")));
            let individual: Vec<CheckedField> = result
                .failed_fields()
                .into_iter()
                .filter(|f| *f != CheckedField::Composite)
                .collect();
            assert_eq!(individual, vec![field], "flip at {}:{}", line, column);
            assert!(!result.is_valid);
        }
    }

    #[test]
    fn test_composite_flip() {
        let mutated = TD3.replace("<<<<<10", "<<<<<15");
        let result = MrzValidator::validate(&parse(&mutated));
        assert_eq!(result.failed_fields(), vec![CheckedField::Composite]);
        assert_eq!(result.issues.len(), 1);
    }

    #[test]
    fn test_empty_personal_number_accepts_filler_check() {
        let mut record = parse(TD3);
        record.optional_data = String::new();
        record.optional_data_check = Some('<');
        record.composite_check = compute_check_digit(&MrzValidator::composite_source(&record)).unwrap();
        let result = MrzValidator::validate(&record);
        assert!(result.optional_data_check_valid);
        assert!(result.is_valid);
    }
}
