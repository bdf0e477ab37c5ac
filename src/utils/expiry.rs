//! Parsing of expiration input from the create and manage forms.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Message shown when the expiry fields cannot be parsed.
pub const EXPIRY_PARSE_MESSAGE: &str = "Couldn't parse expiration date/time.";

/// Time used when a date is chosen without a time.
const DEFAULT_TIME: &str = "00:00";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Couldn't parse expiration date/time: {raw}")]
pub struct ExpiryParseError {
    pub raw: String,
}

/// Builds the expiry from the form fields.
///
/// - `never_expires` wins over any date/time.
/// - A date without a time means midnight UTC.
/// - Empty input means no expiry.
///
/// # Errors
///
/// Returns [`ExpiryParseError`] if a date/time was supplied but cannot be parsed.
pub fn parse_expiry_input(
    never_expires: bool,
    date: &str,
    time: &str,
) -> Result<Option<DateTime<Utc>>, ExpiryParseError> {
    let date = date.trim();
    let time = match time.trim() {
        "" if !date.is_empty() => DEFAULT_TIME,
        t => t,
    };

    let raw = if time.is_empty() {
        date.to_string()
    } else {
        format!("{date}T{time}")
    };

    if never_expires || raw.is_empty() {
        return Ok(None);
    }

    parse_datetime(&raw)
        .map(Some)
        .ok_or(ExpiryParseError { raw })
}

/// Parses an ISO 8601 timestamp (with or without offset) or `YYYY-MM-DD HH:MM`.
///
/// Values without an offset are taken as UTC.
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if s.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }

        for format in [
            "%Y-%m-%dT%H:%M%:z",
            "%Y-%m-%dT%H:%M%z",
            "%Y-%m-%dT%H:%M:%S%z",
        ] {
            if let Ok(dt) = DateTime::parse_from_str(s, format) {
                return Some(dt.with_timezone(&Utc));
            }
        }

        for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Some(naive.and_utc());
            }
        }

        None
    } else {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Splits an expiry into the `(date, time)` strings used by the form inputs.
pub fn split_for_form(expires_at: Option<DateTime<Utc>>) -> (String, String) {
    match expires_at {
        Some(dt) => (
            dt.format("%Y-%m-%d").to_string(),
            dt.format("%H:%M").to_string(),
        ),
        None => (String::new(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_date_and_time() {
        assert_eq!(
            parse_expiry_input(false, "2030-05-01", "13:45"),
            Ok(Some(utc(2030, 5, 1, 13, 45)))
        );
    }

    #[test]
    fn test_date_without_time_defaults_to_midnight() {
        assert_eq!(
            parse_expiry_input(false, "2030-05-01", ""),
            Ok(Some(utc(2030, 5, 1, 0, 0)))
        );
    }

    #[test]
    fn test_never_expires_wins() {
        assert_eq!(parse_expiry_input(true, "2030-05-01", "13:45"), Ok(None));
    }

    #[test]
    fn test_empty_input_means_no_expiry() {
        assert_eq!(parse_expiry_input(false, "", ""), Ok(None));
        assert_eq!(parse_expiry_input(false, "  ", ""), Ok(None));
    }

    #[test]
    fn test_time_without_date_is_error() {
        let err = parse_expiry_input(false, "", "10:00").unwrap_err();
        assert_eq!(err.raw, "T10:00");
    }

    #[test]
    fn test_garbage_is_error() {
        assert!(parse_expiry_input(false, "tomorrow", "").is_err());
        assert!(parse_expiry_input(false, "2030-13-01", "10:00").is_err());
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = utc(2030, 1, 2, 3, 4);

        assert_eq!(parse_datetime("2030-01-02T03:04"), Some(expected));
        assert_eq!(parse_datetime("2030-01-02T03:04:00"), Some(expected));
        assert_eq!(parse_datetime("2030-01-02T03:04:00.000000"), Some(expected));
        assert_eq!(parse_datetime("2030-01-02T03:04:00Z"), Some(expected));
        assert_eq!(parse_datetime("2030-01-02T03:04:00+00:00"), Some(expected));
        assert_eq!(parse_datetime("2030-01-02 03:04"), Some(expected));
    }

    #[test]
    fn test_parse_datetime_converts_offsets_to_utc() {
        assert_eq!(
            parse_datetime("2030-01-02T05:04+02:00"),
            Some(utc(2030, 1, 2, 3, 4))
        );
        assert_eq!(
            parse_datetime("2030-01-02T05:04:00+02:00"),
            Some(utc(2030, 1, 2, 3, 4))
        );
        assert_eq!(
            parse_datetime("2030-01-02T05:04+0200"),
            Some(utc(2030, 1, 2, 3, 4))
        );
        assert_eq!(
            parse_datetime("2030-01-02T05:04:00+0200"),
            Some(utc(2030, 1, 2, 3, 4))
        );
    }

    #[test]
    fn test_parse_datetime_rejects_empty() {
        assert_eq!(parse_datetime(""), None);
    }

    #[test]
    fn test_split_for_form() {
        assert_eq!(
            split_for_form(Some(utc(2030, 1, 2, 3, 4))),
            ("2030-01-02".to_string(), "03:04".to_string())
        );
        assert_eq!(split_for_form(None), (String::new(), String::new()));
    }
}
