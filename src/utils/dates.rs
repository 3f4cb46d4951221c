use chrono::{Datelike, NaiveDate};

// MRZ dates are YYMMDD with no century; these resolve the century against a
// reference day so results stay deterministic.

/// Birth dates are never in the future.
pub fn resolve_birth_date(yymmdd: &str, today: NaiveDate) -> Option<NaiveDate> {
    let (yy, month, day) = split_mrz_date(yymmdd)?;
    let recent = NaiveDate::from_ymd_opt(2000 + yy, month, day);
    match recent {
        Some(date) if date <= today => Some(date),
        _ => NaiveDate::from_ymd_opt(1900 + yy, month, day),
    }
}

/// Expiry dates fall in this century unless that puts them more than fifty
/// years ahead.
pub fn resolve_expiry_date(yymmdd: &str, today: NaiveDate) -> Option<NaiveDate> {
    let (yy, month, day) = split_mrz_date(yymmdd)?;
    let year = if 2000 + yy > today.year() + 50 { 1900 + yy } else { 2000 + yy };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whether the field is six digits naming a real month and day.
pub fn is_calendar_date(yymmdd: &str) -> bool {
    // 2000 is a leap year, so 29 February is accepted for any YY here
    split_mrz_date(yymmdd)
        .and_then(|(yy, month, day)| NaiveDate::from_ymd_opt(2000 + yy, month, day))
        .is_some()
}

fn split_mrz_date(yymmdd: &str) -> Option<(i32, u32, u32)> {
    if yymmdd.len() != 6 || !yymmdd.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year = yymmdd[0..2].parse::<i32>().ok()?;
    let month = yymmdd[2..4].parse::<u32>().ok()?;
    let day = yymmdd[4..6].parse::<u32>().ok()?;
    Some((year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_birth_century() {
        let today = day(2026, 10, 18);
        assert_eq!(resolve_birth_date("740812", today), Some(day(1974, 8, 12)));
        assert_eq!(resolve_birth_date("050101", today), Some(day(2005, 1, 1)));
        assert_eq!(resolve_birth_date("261019", today), Some(day(1926, 10, 19)));
    }

    #[test]
    fn test_expiry_century() {
        let today = day(2026, 10, 18);
        assert_eq!(resolve_expiry_date("120415", today), Some(day(2012, 4, 15)));
        assert_eq!(resolve_expiry_date("991231", today), Some(day(1999, 12, 31)));
    }

    #[test]
    fn test_rejects_bad_dates() {
        assert!(!is_calendar_date("741332"));
        assert!(!is_calendar_date("74O812"));
        assert!(!is_calendar_date("7408"));
        assert!(is_calendar_date("960229"));
        assert_eq!(resolve_birth_date("<<<<<<", day(2026, 1, 1)), None);
    }
}
