use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use chrono_english::{parse_date_string, Dialect};

/// Parses a due date given either as `YYYY-MM-DD` or in plain English
/// ("tomorrow", "next friday").
pub fn parse_due_date(date_str: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date_string(date_str, Utc::now(), Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow!("Failed to parse due date '{}': {}", date_str, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_iso_date() {
        assert_eq!(
            parse_due_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_relative_date() {
        let tomorrow = Utc::now().date_naive().succ_opt().unwrap();
        assert_eq!(parse_due_date("tomorrow").unwrap(), tomorrow);
    }

    #[rstest]
    #[case("not a date at all")]
    #[case("banana")]
    fn test_garbage_is_rejected(#[case] input: &str) {
        assert!(parse_due_date(input).is_err());
    }
}
