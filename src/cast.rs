//! SQL-visible cast entry points.

use crate::common::is_valid_year;
use crate::error::{Error, Result};
use crate::format::format_timestamp_with_elements;
use crate::parse::parse_timestamp_with_elements;
use crate::tokenizer::tokenize;
use crate::validate::{validate_for_formatting, validate_for_parsing, OutputType};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

#[inline]
fn resolve_timezone(timezone_name: &str) -> Result<Tz> {
    timezone_name
        .parse()
        .map_err(|_| Error::InvalidTimeZone(timezone_name.to_string()))
}

fn timestamp_from_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| Error::FormatError(format!("Invalid timestamp value: {}", micros)))
}

/// Parses `timestamp_string` under `format_string` into an instant, at
/// nanosecond resolution.
///
/// Fields the format does not mention default from `current_timestamp`
/// observed in `default_timezone` (year and month) or to the first day of
/// the month at midnight.
pub fn cast_string_to_timestamp(
    format_string: &str,
    timestamp_string: &str,
    default_timezone: Tz,
    current_timestamp: DateTime<Utc>,
) -> Result<DateTime<Tz>> {
    let elements = tokenize(format_string)?;
    validate_for_parsing(&elements, OutputType::Timestamp)?;
    parse_timestamp_with_elements(
        &elements,
        timestamp_string,
        default_timezone,
        current_timestamp,
    )
}

/// [`cast_string_to_timestamp`] with the default zone given by name.
pub fn cast_string_to_timestamp_with_timezone_name(
    format_string: &str,
    timestamp_string: &str,
    default_timezone: &str,
    current_timestamp: DateTime<Utc>,
) -> Result<DateTime<Tz>> {
    let timezone = resolve_timezone(default_timezone)?;
    cast_string_to_timestamp(format_string, timestamp_string, timezone, current_timestamp)
}

/// Parses `timestamp_string` under `format_string` into microseconds since
/// the Unix epoch.
pub fn cast_string_to_timestamp_micros(
    format_string: &str,
    timestamp_string: &str,
    default_timezone: Tz,
    current_timestamp_micros: i64,
) -> Result<i64> {
    let current_timestamp = DateTime::from_timestamp_micros(current_timestamp_micros)
        .ok_or_else(|| {
            Error::ParseError(format!(
                "Invalid timestamp value: {}",
                current_timestamp_micros
            ))
        })?;
    let timestamp = cast_string_to_timestamp(
        format_string,
        timestamp_string,
        default_timezone,
        current_timestamp,
    )?;
    Ok(timestamp.timestamp_micros())
}

/// [`cast_string_to_timestamp_micros`] with the default zone given by name.
pub fn cast_string_to_timestamp_micros_with_timezone_name(
    format_string: &str,
    timestamp_string: &str,
    default_timezone: &str,
    current_timestamp_micros: i64,
) -> Result<i64> {
    let timezone = resolve_timezone(default_timezone)?;
    cast_string_to_timestamp_micros(
        format_string,
        timestamp_string,
        timezone,
        current_timestamp_micros,
    )
}

/// Renders a date through `format_string`.
pub fn cast_format_date_to_string(format_string: &str, date: NaiveDate) -> Result<String> {
    if !is_valid_year(date.year()) {
        return Err(Error::FormatError(format!("Invalid date value: {}", date)));
    }
    let elements = tokenize(format_string)?;
    validate_for_formatting(&elements, OutputType::Date)?;

    // A date formats as the timestamp at midnight on that date in UTC.
    let timestamp = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    format_timestamp_with_elements(&elements, timestamp, Tz::UTC)
}

/// Renders a civil datetime through `format_string`.
pub fn cast_format_datetime_to_string(
    format_string: &str,
    datetime: NaiveDateTime,
) -> Result<String> {
    if !is_valid_year(datetime.year()) {
        return Err(Error::FormatError(format!(
            "Invalid datetime value: {}",
            datetime
        )));
    }
    let elements = tokenize(format_string)?;
    validate_for_formatting(&elements, OutputType::Datetime)?;

    let timestamp = Utc.from_utc_datetime(&datetime);
    format_timestamp_with_elements(&elements, timestamp, Tz::UTC)
}

/// Renders a time of day through `format_string`.
pub fn cast_format_time_to_string(format_string: &str, time: NaiveTime) -> Result<String> {
    let elements = tokenize(format_string)?;
    validate_for_formatting(&elements, OutputType::Time)?;

    // A time formats on the epoch day in UTC.
    let timestamp = Utc.from_utc_datetime(&DateTime::UNIX_EPOCH.date_naive().and_time(time));
    format_timestamp_with_elements(&elements, timestamp, Tz::UTC)
}

/// Renders an instant, observed in `timezone`, through `format_string`.
pub fn cast_format_timestamp_to_string(
    format_string: &str,
    timestamp_micros: i64,
    timezone: Tz,
) -> Result<String> {
    let elements = tokenize(format_string)?;
    let timestamp = timestamp_from_micros(timestamp_micros)?;
    format_timestamp_with_elements(&elements, timestamp, timezone)
}

/// [`cast_format_timestamp_to_string`] with the zone given by name.
pub fn cast_format_timestamp_to_string_with_timezone_name(
    format_string: &str,
    timestamp_micros: i64,
    timezone_name: &str,
) -> Result<String> {
    let timezone = resolve_timezone(timezone_name)?;
    cast_format_timestamp_to_string(format_string, timestamp_micros, timezone)
}

/// Checks that `format_string` can drive a parse into `out_type`.
pub fn validate_format_string_for_parsing(format_string: &str, out_type: OutputType) -> Result<()> {
    let elements = tokenize(format_string)?;
    validate_for_parsing(&elements, out_type)
}

/// Checks that `format_string` can drive a rendering of `out_type`.
pub fn validate_format_string_for_formatting(
    format_string: &str,
    out_type: OutputType,
) -> Result<()> {
    let elements = tokenize(format_string)?;
    validate_for_formatting(&elements, out_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2002, 6, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_validate_for_parsing() {
        assert!(validate_format_string_for_parsing(
            "YYYY-MM-DD HH24:MI:SS",
            OutputType::Timestamp
        )
        .is_ok());

        let err =
            validate_format_string_for_parsing("HH12:MI", OutputType::Timestamp).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Format element in category MERIDIAN_INDICATOR is required when format element 'HH12' exists"
        );
        assert!(!err.is_evaluation_error());

        let err = validate_format_string_for_parsing("HH24 AM", OutputType::Timestamp).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Format element in category MERIDIAN_INDICATOR ('AM') and format element 'HH24' cannot exist simultaneously"
        );

        // Tokenizer failures surface through validation too.
        let err = validate_format_string_for_parsing("YYYY#", OutputType::Timestamp).unwrap_err();
        assert_eq!(err.to_string(), "Cannot find matched format element at 4");
    }

    #[test]
    fn test_validate_for_formatting() {
        assert!(validate_format_string_for_formatting("YYYY-MM-DD", OutputType::Date).is_ok());
        assert!(
            validate_format_string_for_formatting("HH24:MI:SS.FF3", OutputType::Time).is_ok()
        );
        assert_eq!(
            validate_format_string_for_formatting("HH24", OutputType::Date)
                .unwrap_err()
                .to_string(),
            "DATE does not support 'HH24'"
        );
        assert_eq!(
            validate_format_string_for_formatting("TZH", OutputType::Datetime)
                .unwrap_err()
                .to_string(),
            "DATETIME does not support 'TZH'"
        );
        assert!(validate_format_string_for_formatting("TZH", OutputType::Timestamp).is_ok());
    }

    #[test]
    fn test_cast_string_to_timestamp() {
        let parsed =
            cast_string_to_timestamp("YYYYMMDD", "20200229", Tz::UTC, now()).unwrap();
        assert_eq!(
            parsed.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2020, 2, 29, 0, 0, 0).unwrap()
        );

        let err = cast_string_to_timestamp("YYYYMMDD", "20210229", Tz::UTC, now()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid result from year, month, day values after parsing"
        );
        assert!(err.is_evaluation_error());
    }

    #[test]
    fn test_cast_string_to_timestamp_micros() {
        let micros = cast_string_to_timestamp_micros(
            "YYYY-MM-DD HH24:MI:SS",
            "1970-01-01 00:00:01",
            Tz::UTC,
            now().timestamp_micros(),
        )
        .unwrap();
        assert_eq!(micros, 1_000_000);

        // Subseconds below micros resolution truncate.
        let micros = cast_string_to_timestamp_micros(
            "SS.FF9",
            "00.000000999",
            Tz::UTC,
            Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap().timestamp_micros(),
        )
        .unwrap();
        assert_eq!(micros, 0);
    }

    #[test]
    fn test_cast_with_timezone_names() {
        let micros = cast_string_to_timestamp_micros_with_timezone_name(
            "YYYY-MM-DD HH24:MI:SS",
            "2021-01-15 00:00:00",
            "America/New_York",
            now().timestamp_micros(),
        )
        .unwrap();
        assert_eq!(
            micros,
            Utc.with_ymd_and_hms(2021, 1, 15, 5, 0, 0).unwrap().timestamp_micros()
        );

        let err = cast_string_to_timestamp_with_timezone_name(
            "YYYY",
            "2021",
            "Mars/Olympus",
            now(),
        )
        .unwrap_err();
        assert_eq!(err, Error::InvalidTimeZone("Mars/Olympus".to_string()));
        assert_eq!(err.to_string(), "Invalid time zone: Mars/Olympus");
    }

    #[test]
    fn test_cast_format_date_to_string() {
        assert_eq!(
            cast_format_date_to_string("YYYY-MM-DD", date(2021, 7, 4)).unwrap(),
            "2021-07-04"
        );
        assert_eq!(
            cast_format_date_to_string("Month", date(2021, 7, 4)).unwrap(),
            "July"
        );
        assert_eq!(
            cast_format_date_to_string("Dy, Month DD, YYYY", date(2021, 7, 4)).unwrap(),
            "Sun, July 04, 2021"
        );
        assert_eq!(
            cast_format_date_to_string("HH24", date(2021, 7, 4))
                .unwrap_err()
                .to_string(),
            "DATE does not support 'HH24'"
        );
    }

    #[test]
    fn test_cast_format_datetime_to_string() {
        let datetime = date(2021, 7, 4).and_hms_nano_opt(16, 5, 7, 123_000_000).unwrap();
        assert_eq!(
            cast_format_datetime_to_string("YYYY-MM-DD HH24:MI:SS.FF3", datetime).unwrap(),
            "2021-07-04 16:05:07.123"
        );
        assert_eq!(
            cast_format_datetime_to_string("HH12:MI a.m.", datetime).unwrap(),
            "04:05 p.m."
        );
    }

    #[test]
    fn test_cast_format_time_to_string() {
        let time = NaiveTime::from_hms_opt(14, 30, 5).unwrap();
        assert_eq!(
            cast_format_time_to_string("HH12:MI:SS P.M.", time).unwrap(),
            "02:30:05 P.M."
        );
        assert_eq!(
            cast_format_time_to_string("SSSSS", time).unwrap(),
            "52205"
        );
        assert_eq!(
            cast_format_time_to_string("YYYY", time).unwrap_err().to_string(),
            "TIME does not support 'YYYY'"
        );
    }

    #[test]
    fn test_cast_format_timestamp_to_string() {
        let micros = Utc
            .with_ymd_and_hms(2021, 1, 15, 12, 0, 0)
            .unwrap()
            .timestamp_micros();
        assert_eq!(
            cast_format_timestamp_to_string_with_timezone_name(
                "YYYY-MM-DD HH24:MI TZH:TZM",
                micros,
                "America/New_York"
            )
            .unwrap(),
            "2021-01-15 07:00 -05:00"
        );
        assert_eq!(
            cast_format_timestamp_to_string("YYYY-MM-DD", micros, Tz::UTC).unwrap(),
            "2021-01-15"
        );
    }

    #[test]
    fn test_parse_format_round_trip() {
        let format_string = "YYYY-MM-DD HH24:MI:SS.FF6";
        let timestamp = Utc.with_ymd_and_hms(2021, 7, 4, 16, 5, 7).unwrap()
            + chrono::Duration::microseconds(123_456);
        let micros = timestamp.timestamp_micros();

        let rendered =
            cast_format_timestamp_to_string(format_string, micros, Tz::UTC).unwrap();
        assert_eq!(rendered, "2021-07-04 16:05:07.123456");

        let reparsed = cast_string_to_timestamp_micros(
            format_string,
            &rendered,
            Tz::UTC,
            now().timestamp_micros(),
        )
        .unwrap();
        assert_eq!(reparsed, micros);
    }

    #[test]
    fn test_trailing_data_diagnostic() {
        let err = cast_string_to_timestamp("YYYY", "2021-07", Tz::UTC, now()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Illegal non-space trailing data '-07' in timestamp string"
        );
    }
}
