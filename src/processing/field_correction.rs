use crate::models::{DocumentFormat, MrzRules};
use log::debug;
use std::ops::Range;

/// What a fixed MRZ position is allowed to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Numeric,
    Alphabetic,
}

/// FieldCorrection repairs OCR confusions at positions whose character class
/// is fixed by the layout, using only the substitutions whitelisted in
/// [`MrzRules`].
pub struct FieldCorrection<'a> {
    rules: &'a MrzRules,
}

impl<'a> FieldCorrection<'a> {
    pub fn new(rules: &'a MrzRules) -> Self {
        FieldCorrection { rules }
    }

    pub fn correct_lines(&self, lines: &[String], format: DocumentFormat) -> Vec<String> {
        let mut corrected: Vec<Vec<char>> = lines.iter().map(|l| l.chars().collect()).collect();
        let mut corrections = Vec::new();

        for (line, range, field_type) in Self::typed_positions(format) {
            let Some(chars) = corrected.get_mut(line) else {
                continue;
            };
            for pos in range {
                let Some(c) = chars.get(pos).copied() else {
                    break;
                };
                let replacement = match field_type {
                    FieldType::Numeric if !c.is_ascii_digit() => self.rules.digit_for(c),
                    FieldType::Alphabetic if c.is_ascii_digit() => self.rules.letter_for(c),
                    _ => None,
                };
                if let Some(fixed) = replacement {
                    chars[pos] = fixed;
                    corrections.push(format!("line {} col {}: {} -> {}", line + 1, pos + 1, c, fixed));
                }
            }
        }

        if !corrections.is_empty() {
            debug!("MRZ field corrections applied: {}", corrections.join(", "));
        }

        corrected.into_iter().map(|chars| chars.into_iter().collect()).collect()
    }

    fn typed_positions(format: DocumentFormat) -> Vec<(usize, Range<usize>, FieldType)> {
        use FieldType::{Alphabetic, Numeric};
        match format {
            DocumentFormat::TD3 => vec![
                (0, 0..5, Alphabetic),
                (1, 9..10, Numeric),
                (1, 10..13, Alphabetic),
                (1, 13..20, Numeric),
                (1, 21..28, Numeric),
                (1, 42..44, Numeric),
            ],
            DocumentFormat::TD2 => vec![
                (0, 0..5, Alphabetic),
                (1, 9..10, Numeric),
                (1, 10..13, Alphabetic),
                (1, 13..20, Numeric),
                (1, 21..28, Numeric),
                (1, 35..36, Numeric),
            ],
            DocumentFormat::TD1 => vec![
                (0, 0..5, Alphabetic),
                (1, 0..7, Numeric),
                (1, 8..15, Numeric),
                (1, 15..18, Alphabetic),
                (1, 29..30, Numeric),
            ],
        }
    }
}
