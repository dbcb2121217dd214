//! Fixed-format timestamp codec for the report document.
//!
//! The report service emits every timestamp as `YYYY-MM-DD HH:MM:SS` with
//! no zone designator. All of them are read as naive date-times in one
//! implicit zone, the same zone the caller uses for "now".
//!
//! Mining-ledger entries are looser: the upstream ledger stores a calendar
//! date only, so [`parse_ledger_timestamp`] also accepts a bare
//! `YYYY-MM-DD`, read as midnight of that day.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// `chrono` format string for report timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `chrono` format string for date-only ledger timestamps.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A timestamp field that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unparsable timestamp {raw:?} in {field}")]
pub struct TimestampError {
    /// Name of the field that carried the value.
    pub field: &'static str,
    /// The raw text as it appeared in the document.
    pub raw: String,
}

/// Parse a report timestamp in [`TIMESTAMP_FORMAT`].
///
/// # Errors
///
/// Returns [`TimestampError`] naming `field` if the text does not match.
pub fn parse_timestamp(field: &'static str, raw: &str) -> Result<NaiveDateTime, TimestampError> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(|_parse| TimestampError {
        field,
        raw: raw.to_owned(),
    })
}

/// Parse a ledger timestamp: either [`TIMESTAMP_FORMAT`] or [`DATE_FORMAT`].
///
/// # Errors
///
/// Returns [`TimestampError`] if neither format matches.
pub fn parse_ledger_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    let trimmed = raw.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT) {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_parse| TimestampError {
            field: "last_updated",
            raw: raw.to_owned(),
        })
}

/// Render a timestamp back into [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn parses_report_format() {
        let ts = parse_timestamp("chunk_arrival_time", "2021-08-19 01:28:18");
        assert!(ts.is_ok());
        let ts = ts.unwrap_or_default();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2021, 8, 19));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (1, 28, 18));
    }

    #[test]
    fn rejects_other_formats() {
        let err = parse_timestamp("chunk_arrival_time", "2021-08-19T01:28:18Z");
        assert_eq!(
            err,
            Err(TimestampError {
                field: "chunk_arrival_time",
                raw: "2021-08-19T01:28:18Z".to_owned(),
            })
        );
        assert!(parse_timestamp("x", "").is_err());
    }

    #[test]
    fn ledger_accepts_date_only() {
        let ts = parse_ledger_timestamp("2021-08-20");
        assert!(ts.is_ok());
        assert_eq!(format_timestamp(ts.unwrap_or_default()), "2021-08-20 00:00:00");
    }

    #[test]
    fn ledger_accepts_full_timestamp() {
        let ts = parse_ledger_timestamp("2021-08-20 13:00:01");
        assert_eq!(
            ts.map(format_timestamp),
            Ok("2021-08-20 13:00:01".to_owned())
        );
    }

    #[test]
    fn ledger_rejects_garbage() {
        assert!(parse_ledger_timestamp("yesterday").is_err());
    }
}
