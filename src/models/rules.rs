use crate::utils::MrzError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A single whitelisted character rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: char,
    pub to: char,
}

/// The complete set of OCR repairs the parser is allowed to make.
///
/// Nothing outside these lists is ever rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MrzRules {
    /// Characters rewritten to the filler when the rewritten line has a
    /// layout width; dropped otherwise.
    pub filler_substitutes: Vec<char>,
    /// Applied only where a digit is required (dates, check digits).
    pub digit_substitutions: Vec<Substitution>,
    /// Applied only where a letter or filler is required (document code,
    /// issuing state, nationality).
    pub letter_substitutions: Vec<Substitution>,
    /// Cleaned lines shorter than this are not MRZ candidates.
    pub min_line_length: usize,
    /// Trailing fillers that may be restored on a line ending in a filler.
    pub max_filler_padding: usize,
    /// Split a single line of 72, 88 or 90 characters into its MRZ lines.
    pub split_joined_lines: bool,
}

impl Default for MrzRules {
    fn default() -> Self {
        MrzRules {
            filler_substitutes: vec![' '],
            digit_substitutions: Vec::new(),
            letter_substitutions: Vec::new(),
            min_line_length: 30,
            max_filler_padding: 3,
            split_joined_lines: true,
        }
    }
}

impl MrzRules {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<MrzRules, MrzError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            MrzError::ConfigError(format!("Failed to read rules file {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<MrzRules, MrzError> {
        let rules: MrzRules = serde_json::from_str(json)
            .map_err(|e| MrzError::ConfigError(format!("Invalid rules: {}", e)))?;
        rules.check()?;
        Ok(rules)
    }

    /// The usual OCR digit/letter confusions, for callers that opt in.
    pub fn with_common_ocr_confusions() -> MrzRules {
        let digit = [('O', '0'), ('Q', '0'), ('D', '0'), ('I', '1'), ('L', '1'), ('Z', '2'), ('S', '5'), ('G', '6'), ('B', '8')];
        let letter = [('0', 'O'), ('1', 'I'), ('2', 'Z'), ('5', 'S'), ('6', 'G'), ('8', 'B')];
        MrzRules {
            digit_substitutions: digit.iter().map(|&(from, to)| Substitution { from, to }).collect(),
            letter_substitutions: letter.iter().map(|&(from, to)| Substitution { from, to }).collect(),
            ..MrzRules::default()
        }
    }

    pub fn is_filler_substitute(&self, c: char) -> bool {
        self.filler_substitutes.contains(&c)
    }

    pub fn digit_for(&self, c: char) -> Option<char> {
        Self::lookup(&self.digit_substitutions, c)
    }

    pub fn letter_for(&self, c: char) -> Option<char> {
        Self::lookup(&self.letter_substitutions, c)
    }

    fn lookup(table: &[Substitution], c: char) -> Option<char> {
        table.iter().find(|s| s.from == c).map(|s| s.to)
    }

    fn check(&self) -> Result<(), MrzError> {
        if self.min_line_length == 0 {
            return Err(MrzError::ConfigError("min_line_length must be at least 1".to_string()));
        }
        if let Some(bad) = self.digit_substitutions.iter().find(|s| !s.to.is_ascii_digit()) {
            return Err(MrzError::ConfigError(format!(
                "digit substitution '{}' -> '{}' must produce a digit",
                bad.from, bad.to
            )));
        }
        if let Some(bad) = self
            .letter_substitutions
            .iter()
            .find(|s| !(s.to.is_ascii_uppercase() || s.to == '<'))
        {
            return Err(MrzError::ConfigError(format!(
                "letter substitution '{}' -> '{}' must produce a letter or filler",
                bad.from, bad.to
            )));
        }
        Ok(())
    }
}
