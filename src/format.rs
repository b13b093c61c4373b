//! Rendering civil times through an element sequence.

use crate::common::{is_valid_timestamp_micros, POWERS_OF_TEN};
use crate::element::{ElementType, FormatCasing, FormatElement};
use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, Offset, Timelike, Utc};
use chrono_tz::Tz;

/// Renders `timestamp`, observed in `timezone`, through the element
/// sequence.
pub(crate) fn format_timestamp_with_elements(
    elements: &[FormatElement],
    timestamp: DateTime<Utc>,
    timezone: Tz,
) -> Result<String> {
    if !is_valid_timestamp_micros(timestamp.timestamp_micros()) {
        return Err(Error::FormatError(format!(
            "Invalid timestamp value: {}",
            timestamp.timestamp_micros()
        )));
    }

    let local = timestamp.with_timezone(&timezone);
    let mut out = String::new();
    for element in elements {
        render_element(element, &local, &mut out)?;
    }
    Ok(out)
}

/// Renders one element and applies its casing. Literal elements are
/// emitted verbatim; the others go through the strftime facility one
/// conversion at a time, or are rendered by hand where no conversion
/// exists.
fn render_element(element: &FormatElement, local: &DateTime<Tz>, out: &mut String) -> Result<()> {
    let rendered = match element.ty {
        ElementType::SimpleLiteral | ElementType::DoubleQuotedLiteral => {
            out.push_str(&element.literal_value);
            return Ok(());
        }
        ElementType::Whitespace => {
            for _ in 0..element.len_in_format_str {
                out.push(' ');
            }
            return Ok(());
        }
        ElementType::YYYY
        | ElementType::YYY
        | ElementType::YY
        | ElementType::Y
        | ElementType::RRRR
        | ElementType::RR => {
            // The four-character elements render the full year; the shorter
            // ones truncate to their length.
            let element_len = element.len_in_format_str;
            let year = local.year();
            let value = if element_len == 4 {
                year
            } else {
                year % POWERS_OF_TEN[element_len] as i32
            };
            format!("{:0width$}", value, width = element_len)
        }
        ElementType::MM => strftime(local, "%m"),
        ElementType::MON => strftime(local, "%b"),
        ElementType::MONTH => strftime(local, "%B"),
        ElementType::DD => strftime(local, "%d"),
        ElementType::DDD => strftime(local, "%j"),
        ElementType::DAY => strftime(local, "%A"),
        ElementType::DY => strftime(local, "%a"),
        ElementType::HH | ElementType::HH12 => strftime(local, "%I"),
        ElementType::HH24 => strftime(local, "%H"),
        ElementType::MI => strftime(local, "%M"),
        ElementType::SS => strftime(local, "%S"),
        ElementType::D => {
            // Day of week numbered Sunday=1 through Saturday=7.
            (local.weekday().num_days_from_sunday() + 1).to_string()
        }
        ElementType::SSSSS => format!("{:05}", local.num_seconds_from_midnight()),
        ElementType::FFN => {
            // Subsecond digits are truncated, never rounded.
            let digits = element.subsecond_digits as usize;
            let value = local.timestamp_subsec_nanos() / POWERS_OF_TEN[9 - digits] as u32;
            format!("{:0width$}", value, width = digits)
        }
        ElementType::AM | ElementType::PM => {
            if local.hour() > 12 { "PM" } else { "AM" }.to_string()
        }
        ElementType::AMWithDots | ElementType::PMWithDots => {
            if local.hour() > 12 { "P.M." } else { "A.M." }.to_string()
        }
        ElementType::TZH => {
            let offset = local.offset().fix().local_minus_utc();
            let sign = if offset < 0 { '-' } else { '+' };
            format!("{}{:02}", sign, offset.abs() / 3600)
        }
        ElementType::TZM => {
            let offset = local.offset().fix().local_minus_utc();
            format!("{:02}", offset.abs() % 3600 / 60)
        }
        _ => {
            return Err(Error::FormatError(format!(
                "Unsupported format element {}",
                element
            )));
        }
    };

    match element.casing {
        // The strftime facility already capitalizes the first letter of
        // names, so both of these take the rendering as-is.
        FormatCasing::PreserveCase | FormatCasing::OnlyFirstLetterUppercase => {
            out.push_str(&rendered)
        }
        FormatCasing::AllUppercase => out.push_str(&rendered.to_ascii_uppercase()),
        FormatCasing::AllLowercase => out.push_str(&rendered.to_ascii_lowercase()),
    }
    Ok(())
}

#[inline]
fn strftime(local: &DateTime<Tz>, pattern: &str) -> String {
    local.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use chrono::TimeZone;

    fn format(format_str: &str, timestamp: DateTime<Utc>, timezone: Tz) -> Result<String> {
        format_timestamp_with_elements(&tokenize(format_str).unwrap(), timestamp, timezone)
    }

    fn utc_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
            .unwrap()
    }

    #[test]
    fn test_common_format() {
        let ts = utc_hms(2021, 7, 4, 16, 5, 7);
        assert_eq!(
            format("YYYY-MM-DD HH24:MI:SS", ts, Tz::UTC).unwrap(),
            "2021-07-04 16:05:07"
        );
    }

    #[test]
    fn test_year_truncation() {
        let ts = utc_hms(2021, 7, 4, 0, 0, 0);
        assert_eq!(format("YYYY", ts, Tz::UTC).unwrap(), "2021");
        assert_eq!(format("YYY", ts, Tz::UTC).unwrap(), "021");
        assert_eq!(format("YY", ts, Tz::UTC).unwrap(), "21");
        assert_eq!(format("Y", ts, Tz::UTC).unwrap(), "1");
        assert_eq!(format("RRRR", ts, Tz::UTC).unwrap(), "2021");
        assert_eq!(format("RR", ts, Tz::UTC).unwrap(), "21");

        // Short years are zero-padded to the element length.
        let early = utc_hms(987, 1, 1, 0, 0, 0);
        assert_eq!(format("YYYY", early, Tz::UTC).unwrap(), "0987");
    }

    #[test]
    fn test_names_and_casing() {
        let ts = utc_hms(2021, 7, 4, 0, 0, 0);
        assert_eq!(format("Month", ts, Tz::UTC).unwrap(), "July");
        assert_eq!(format("MONTH", ts, Tz::UTC).unwrap(), "JULY");
        assert_eq!(format("month", ts, Tz::UTC).unwrap(), "july");
        assert_eq!(format("Mon", ts, Tz::UTC).unwrap(), "Jul");
        assert_eq!(format("mon", ts, Tz::UTC).unwrap(), "jul");

        // 2021-07-04 was a Sunday.
        assert_eq!(format("Day", ts, Tz::UTC).unwrap(), "Sunday");
        assert_eq!(format("DAY", ts, Tz::UTC).unwrap(), "SUNDAY");
        assert_eq!(format("dy", ts, Tz::UTC).unwrap(), "sun");
        assert_eq!(format("D", ts, Tz::UTC).unwrap(), "1");

        // Literals keep the bytes the user wrote.
        assert_eq!(
            format("Month \"of\" YYYY", ts, Tz::UTC).unwrap(),
            "July of 2021"
        );
    }

    #[test]
    fn test_day_of_year() {
        let ts = utc_hms(2021, 7, 4, 0, 0, 0);
        assert_eq!(format("DDD", ts, Tz::UTC).unwrap(), "185");
        assert_eq!(
            format("DDD", utc_hms(2021, 1, 1, 0, 0, 0), Tz::UTC).unwrap(),
            "001"
        );
    }

    #[test]
    fn test_hours_and_meridian() {
        let afternoon = utc_hms(2021, 7, 4, 16, 5, 7);
        assert_eq!(format("HH24", afternoon, Tz::UTC).unwrap(), "16");
        assert_eq!(format("HH", afternoon, Tz::UTC).unwrap(), "04");
        assert_eq!(format("HH12", afternoon, Tz::UTC).unwrap(), "04");
        assert_eq!(format("AM", afternoon, Tz::UTC).unwrap(), "PM");
        assert_eq!(format("PM", afternoon, Tz::UTC).unwrap(), "PM");
        assert_eq!(format("P.M.", afternoon, Tz::UTC).unwrap(), "P.M.");
        assert_eq!(format("a.m.", afternoon, Tz::UTC).unwrap(), "p.m.");
        assert_eq!(format("pm", afternoon, Tz::UTC).unwrap(), "pm");

        let morning = utc_hms(2021, 7, 4, 9, 0, 0);
        assert_eq!(format("AM", morning, Tz::UTC).unwrap(), "AM");

        // Noon renders as AM: the boundary is hour > 12.
        let noon = utc_hms(2021, 7, 4, 12, 0, 0);
        assert_eq!(format("AM", noon, Tz::UTC).unwrap(), "AM");
        assert_eq!(format("A.M.", noon, Tz::UTC).unwrap(), "A.M.");
        let one_pm = utc_hms(2021, 7, 4, 13, 0, 0);
        assert_eq!(format("AM", one_pm, Tz::UTC).unwrap(), "PM");

        let midnight = utc_hms(2021, 7, 4, 0, 0, 0);
        assert_eq!(format("HH12", midnight, Tz::UTC).unwrap(), "12");
        assert_eq!(format("AM", midnight, Tz::UTC).unwrap(), "AM");
    }

    #[test]
    fn test_seconds_of_day() {
        let ts = utc_hms(2021, 7, 4, 1, 2, 3);
        assert_eq!(format("SSSSS", ts, Tz::UTC).unwrap(), "03723");
        assert_eq!(
            format("SSSSS", utc_hms(2021, 7, 4, 0, 0, 0), Tz::UTC).unwrap(),
            "00000"
        );
    }

    #[test]
    fn test_subseconds_truncate() {
        let ts = utc_hms(2021, 7, 4, 0, 0, 0) + chrono::Duration::nanoseconds(123_456_789);
        assert_eq!(format("FF1", ts, Tz::UTC).unwrap(), "1");
        assert_eq!(format("FF3", ts, Tz::UTC).unwrap(), "123");
        assert_eq!(format("FF6", ts, Tz::UTC).unwrap(), "123456");
        assert_eq!(format("FF9", ts, Tz::UTC).unwrap(), "123456789");

        // Truncation, not rounding.
        let ts = utc_hms(2021, 7, 4, 0, 0, 0) + chrono::Duration::nanoseconds(999_999_999);
        assert_eq!(format("FF3", ts, Tz::UTC).unwrap(), "999");

        let whole = utc_hms(2021, 7, 4, 0, 0, 0);
        assert_eq!(format("FF5", whole, Tz::UTC).unwrap(), "00000");
    }

    #[test]
    fn test_zone_offsets() {
        let ts = utc_hms(2021, 1, 15, 12, 0, 0);
        let new_york: Tz = "America/New_York".parse().unwrap();
        assert_eq!(format("TZH:TZM", ts, new_york).unwrap(), "-05:00");

        let kathmandu: Tz = "Asia/Kathmandu".parse().unwrap();
        assert_eq!(format("TZH:TZM", ts, kathmandu).unwrap(), "+05:45");

        assert_eq!(format("TZH:TZM", ts, Tz::UTC).unwrap(), "+00:00");

        // The hour still reflects the observation zone.
        assert_eq!(format("HH24", ts, new_york).unwrap(), "07");
    }

    #[test]
    fn test_whitespace_and_simple_literals() {
        let ts = utc_hms(2021, 7, 4, 0, 0, 0);
        assert_eq!(format("YYYY   MM", ts, Tz::UTC).unwrap(), "2021   07");
        assert_eq!(format("YYYY/MM;DD", ts, Tz::UTC).unwrap(), "2021/07;04");
    }

    #[test]
    fn test_unsupported_elements_fail_at_render() {
        let ts = utc_hms(2021, 7, 4, 0, 0, 0);
        for (format_str, element) in [
            ("CC", "'CC'"),
            ("Q", "'Q'"),
            ("IW", "'IW'"),
            ("AD", "'AD'"),
            ("SP", "'SP'"),
            ("Y,YYY", "'Y,YYY'"),
            ("YEAR", "'YEAR'"),
            ("J", "'J'"),
        ] {
            assert_eq!(
                format(format_str, ts, Tz::UTC).unwrap_err(),
                Error::FormatError(format!("Unsupported format element {}", element)),
                "for {:?}",
                format_str
            );
        }
    }

    #[test]
    fn test_out_of_range_timestamp() {
        let ts = utc_hms(10000, 1, 1, 0, 0, 0);
        assert_eq!(
            format("YYYY", ts, Tz::UTC).unwrap_err(),
            Error::FormatError(format!("Invalid timestamp value: {}", ts.timestamp_micros()))
        );
    }
}
