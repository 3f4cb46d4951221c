// Fixed-column field extraction for the ICAO 9303 TD1, TD2 and TD3 layouts
use super::field_correction::FieldCorrection;
use super::tokenizer::is_mrz_char;
use crate::models::{trim_filler, DocumentFormat, MrzRecord, MrzRules, Sex, FILLER};
use crate::utils::MrzError;
use crate::validation::DocumentClassifier;

pub struct FieldExtractor<'a> {
    rules: &'a MrzRules,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(rules: &'a MrzRules) -> Self {
        FieldExtractor { rules }
    }

    /// Classify the lines and slice them into a record.
    pub fn extract(&self, lines: &[String]) -> Result<MrzRecord, MrzError> {
        let format = DocumentClassifier::classify(lines)?;
        self.extract_as(lines, format)
    }

    pub fn extract_as(&self, lines: &[String], format: DocumentFormat) -> Result<MrzRecord, MrzError> {
        let width = format.mrz_chars_per_line();
        if lines.len() != format.mrz_lines() || lines.iter().any(|l| l.chars().count() != width) {
            return Err(MrzError::LayoutError(format!(
                "{:?} needs {} lines of {} characters",
                format,
                format.mrz_lines(),
                width
            )));
        }
        if let Some(bad) = lines.iter().flat_map(|l| l.chars()).find(|&c| !is_mrz_char(c)) {
            return Err(MrzError::FormatError(format!("Character {:?} is not allowed in an MRZ", bad)));
        }

        let corrected = FieldCorrection::new(self.rules).correct_lines(lines, format);
        let rows: Vec<Vec<char>> = corrected.iter().map(|l| l.chars().collect()).collect();

        match format {
            DocumentFormat::TD1 => Self::extract_td1(&rows),
            DocumentFormat::TD2 | DocumentFormat::TD3 => Self::extract_two_line(&rows, format),
        }
    }

    fn extract_two_line(rows: &[Vec<char>], format: DocumentFormat) -> Result<MrzRecord, MrzError> {
        let (line1, line2) = (&rows[0], &rows[1]);
        let width = format.mrz_chars_per_line();
        let (primary_identifier, secondary_identifier) = split_name(&field(line1, 5, width));

        let (optional_data, optional_data_check) = match format {
            DocumentFormat::TD3 => (trim_filler(&field(line2, 28, 42)), Some(line2[42])),
            _ => (trim_filler(&field(line2, 28, 35)), None),
        };

        Ok(MrzRecord {
            document_format: format,
            document_code: trim_filler(&field(line1, 0, 2)),
            issuing_state: trim_filler(&field(line1, 2, 5)),
            primary_identifier,
            secondary_identifier,
            document_number: trim_filler(&field(line2, 0, 9)),
            document_number_check: line2[9],
            nationality: trim_filler(&field(line2, 10, 13)),
            date_of_birth: field(line2, 13, 19),
            date_of_birth_check: line2[19],
            sex: parse_sex(line2[20])?,
            date_of_expiry: field(line2, 21, 27),
            date_of_expiry_check: line2[27],
            optional_data,
            optional_data_2: String::new(),
            optional_data_check,
            composite_check: line2[width - 1],
        })
    }

    fn extract_td1(rows: &[Vec<char>]) -> Result<MrzRecord, MrzError> {
        let (line1, line2, line3) = (&rows[0], &rows[1], &rows[2]);
        let (document_number, document_number_check, optional_data) = Self::td1_document_number(line1);
        let (primary_identifier, secondary_identifier) = split_name(&field(line3, 0, 30));

        Ok(MrzRecord {
            document_format: DocumentFormat::TD1,
            document_code: trim_filler(&field(line1, 0, 2)),
            issuing_state: trim_filler(&field(line1, 2, 5)),
            primary_identifier,
            secondary_identifier,
            document_number,
            document_number_check,
            nationality: trim_filler(&field(line2, 15, 18)),
            date_of_birth: field(line2, 0, 6),
            date_of_birth_check: line2[6],
            sex: parse_sex(line2[7])?,
            date_of_expiry: field(line2, 8, 14),
            date_of_expiry_check: line2[14],
            optional_data,
            optional_data_2: trim_filler(&field(line2, 18, 29)),
            optional_data_check: None,
            composite_check: line2[29],
        })
    }

    // A filler where the check digit belongs means the number continues in
    // the optional data; the last character before the next filler is the
    // check digit over the whole number.
    fn td1_document_number(line1: &[char]) -> (String, char, String) {
        let head = field(line1, 5, 14);
        let optional: Vec<char> = line1[15..30].to_vec();

        if line1[14] == FILLER {
            let spill_len = optional.iter().position(|&c| c == FILLER).unwrap_or(optional.len());
            if spill_len >= 2 {
                let tail: String = optional[..spill_len - 1].iter().collect();
                let check = optional[spill_len - 1];
                let rest: String = optional.iter().skip(spill_len + 1).collect();
                return (format!("{}{}", head, tail), check, trim_filler(&rest));
            }
        }

        (
            trim_filler(&head),
            line1[14],
            trim_filler(&optional.iter().collect::<String>()),
        )
    }
}

fn field(row: &[char], start: usize, end: usize) -> String {
    row[start..end].iter().collect()
}

fn parse_sex(code: char) -> Result<Sex, MrzError> {
    Sex::from_code(code).ok_or_else(|| MrzError::FormatError(format!("Invalid sex marker '{}'", code)))
}

/// Split a coded name field at the first double filler.
fn split_name(name: &str) -> (String, String) {
    match name.split_once("<<") {
        Some((primary, secondary)) => (trim_filler(primary), trim_filler(secondary)),
        None => (trim_filler(name), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(raw: &[&str]) -> Result<MrzRecord, MrzError> {
        let rules = MrzRules::default();
        let lines: Vec<String> = raw.iter().map(|l| l.to_string()).collect();
        FieldExtractor::new(&rules).extract(&lines)
    }

    #[test]
    fn test_td3_fields() {
        let record = extract(&[
            "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
            "L898902C36UTO7408122F1204159ZE184226B<<<<<10",
        ])
        .unwrap();
        assert_eq!(record.document_format, DocumentFormat::TD3);
        assert_eq!(record.document_code, "P");
        assert_eq!(record.issuing_state, "UTO");
        assert_eq!(record.primary_identifier, "ERIKSSON");
        assert_eq!(record.secondary_identifier, "ANNA<MARIA");
        assert_eq!(record.document_number, "L898902C3");
        assert_eq!(record.document_number_check, '6');
        assert_eq!(record.nationality, "UTO");
        assert_eq!(record.date_of_birth, "740812");
        assert_eq!(record.sex, Sex::Female);
        assert_eq!(record.date_of_expiry, "120415");
        assert_eq!(record.optional_data, "ZE184226B");
        assert_eq!(record.optional_data_check, Some('1'));
        assert_eq!(record.composite_check, '0');
    }

    #[test]
    fn test_td2_fields() {
        let record = extract(&[
            "I<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<",
            "D231458907UTO7408122F1204159<<<<<<<6",
        ])
        .unwrap();
        assert_eq!(record.document_format, DocumentFormat::TD2);
        assert_eq!(record.document_number, "D23145890");
        assert_eq!(record.optional_data, "");
        assert_eq!(record.optional_data_check, None);
        assert_eq!(record.composite_check, '6');
    }

    #[test]
    fn test_td1_fields() {
        let record = extract(&[
            "I<UTOD231458907<<<<<<<<<<<<<<<",
            "7408122F1204159UTO<<<<<<<<<<<6",
            "ERIKSSON<<ANNA<MARIA<<<<<<<<<<",
        ])
        .unwrap();
        assert_eq!(record.document_number, "D23145890");
        assert_eq!(record.document_number_check, '7');
        assert_eq!(record.nationality, "UTO");
        assert_eq!(record.date_of_birth, "740812");
        assert_eq!(record.date_of_expiry, "120415");
        assert_eq!(record.secondary_identifier, "ANNA<MARIA");
        assert_eq!(record.composite_check, '6');
    }

    #[test]
    fn test_td1_long_document_number() {
        let lines = [
            "I<UTOD23145890<7349<<<<<<<<<<<",
            "7408122F1204159UTO<<<<<<<<<<<6",
            "ERIKSSON<<ANNA<MARIA<<<<<<<<<<",
        ];
        let record = extract(&lines).unwrap();
        assert_eq!(record.document_number, "D23145890734");
        assert_eq!(record.document_number_check, '9');
        assert_eq!(record.optional_data, "");
        assert_eq!(record.to_lines(), lines.iter().map(|l| l.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_name_without_secondary_identifier() {
        let (primary, secondary) = split_name("ERIKSSON<<<<<<<<<");
        assert_eq!(primary, "ERIKSSON");
        assert_eq!(secondary, "");
    }

    #[test]
    fn test_invalid_sex_marker() {
        let result = extract(&[
            "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
            "L898902C36UTO7408122Q1204159ZE184226B<<<<<10",
        ]);
        assert!(matches!(result, Err(MrzError::FormatError(_))));
    }

    #[test]
    fn test_wrong_shape_is_layout_error() {
        let rules = MrzRules::default();
        let lines = vec!["P<UTO".to_string(), "L898".to_string()];
        let result = FieldExtractor::new(&rules).extract_as(&lines, DocumentFormat::TD3);
        assert!(matches!(result, Err(MrzError::LayoutError(_))));
    }
}
