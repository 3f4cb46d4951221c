use crate::models::{pad_field, DocumentFormat, MrzRules, FILLER};
use crate::utils::MrzError;
use log::debug;

/// Splits raw OCR text into the fixed-width lines of one machine readable
/// zone.
pub struct MrzTokenizer<'a> {
    rules: &'a MrzRules,
}

pub fn is_mrz_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == FILLER
}

impl<'a> MrzTokenizer<'a> {
    pub fn new(rules: &'a MrzRules) -> Self {
        MrzTokenizer { rules }
    }

    /// Return the 2 or 3 lines of the zone found nearest the bottom of `raw`.
    pub fn tokenize(&self, raw: &str) -> Result<Vec<String>, MrzError> {
        let candidates = self.candidate_lines(raw);

        if candidates.len() < 2 {
            return Err(MrzError::FormatError(format!(
                "Expected at least 2 MRZ lines of {} or more characters, found {}",
                self.rules.min_line_length,
                candidates.len()
            )));
        }

        self.select_block(&candidates)
    }

    /// Every cleaned candidate line, joined by newlines.
    pub fn clean(&self, raw: &str) -> String {
        self.candidate_lines(raw).join("\n")
    }

    fn candidate_lines(&self, raw: &str) -> Vec<String> {
        let mut candidates = Vec::new();
        for line in raw.lines() {
            match self.clean_line(line) {
                Some(cleaned) => candidates.push(cleaned),
                None => {
                    if !line.trim().is_empty() {
                        debug!("Discarding non-MRZ line: {:?}", line.trim());
                    }
                }
            }
        }

        if self.rules.split_joined_lines && candidates.len() == 1 {
            if let Some(split) = Self::split_joined(&candidates[0]) {
                debug!("Split joined MRZ line into {} lines", split.len());
                return split;
            }
        }

        candidates
    }

    // Whitelisted filler substitutes are kept only when the substituted line
    // has a layout width; otherwise they are dropped like any other noise.
    fn clean_line(&self, line: &str) -> Option<String> {
        let upper: Vec<char> = line.trim().chars().map(|c| c.to_ascii_uppercase()).collect();

        let stripped: String = upper.iter().copied().filter(|&c| is_mrz_char(c)).collect();
        let substituted: String = upper
            .iter()
            .map(|&c| if self.rules.is_filler_substitute(c) { FILLER } else { c })
            .filter(|&c| is_mrz_char(c))
            .collect();

        let cleaned = if substituted != stripped && DocumentFormat::is_known_width(substituted.len()) {
            debug!("Applied filler substitutions: {:?} -> {}", line.trim(), substituted);
            substituted
        } else {
            stripped
        };

        if cleaned.len() >= self.rules.min_line_length.max(1) {
            Some(cleaned)
        } else {
            None
        }
    }

    fn split_joined(line: &str) -> Option<Vec<String>> {
        let format = DocumentFormat::ALL
            .into_iter()
            .find(|f| f.mrz_lines() * f.mrz_chars_per_line() == line.len())?;
        let width = format.mrz_chars_per_line();
        Some(
            (0..format.mrz_lines())
                .map(|i| line[i * width..(i + 1) * width].to_string())
                .collect(),
        )
    }

    fn select_block(&self, candidates: &[String]) -> Result<Vec<String>, MrzError> {
        for end in (2..=candidates.len()).rev() {
            for format in DocumentFormat::ALL {
                let count = format.mrz_lines();
                if end < count {
                    continue;
                }
                let block = &candidates[end - count..end];
                if let Some(lines) = self.fit_block(block, format) {
                    debug!("Selected {:?} block ending at candidate line {}", format, end);
                    return Ok(lines);
                }
            }
        }

        // No layout fits. Lines narrower than some layout are truncated or
        // missing; only lines wider than every layout go on to classification.
        let last = &candidates[candidates.len() - 2..];
        let width = last[0].len();
        if width == last[1].len() && DocumentFormat::ALL.iter().all(|f| f.mrz_chars_per_line() < width) {
            return Ok(last.to_vec());
        }

        Err(MrzError::FormatError(format!(
            "MRZ lines of {} and {} characters match no layout",
            last[0].len(),
            last[1].len()
        )))
    }

    // A line fits if it has the exact width. The name line may also end in a
    // filler and be short by no more than the allowed padding.
    fn fit_block(&self, block: &[String], format: DocumentFormat) -> Option<Vec<String>> {
        let width = format.mrz_chars_per_line();
        block
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let len = line.len();
                if len == width {
                    Some(line.clone())
                } else if index == format.name_line()
                    && len < width
                    && width - len <= self.rules.max_filler_padding
                    && line.ends_with(FILLER)
                {
                    debug!("Restoring {} trailing fillers", width - len);
                    Some(pad_field(line, width))
                } else {
                    None
                }
            })
            .collect()
    }
}
