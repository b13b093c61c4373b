//! Parsing of input timestamp strings against an element sequence.

use crate::common::{is_valid_timestamp_micros, POWERS_OF_TEN};
use crate::element::{ElementType, FormatElement};
use crate::error::{Error, Result};
use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Copy, Clone, PartialEq)]
enum Meridian {
    Am,
    Pm,
}

/// Civil fields accumulated while walking the element sequence. Fields not
/// set by any element keep their defaults: year and month from the current
/// timestamp in the default zone, day 1, midnight, no zone offset.
struct ParsedFields {
    year: i32,
    month: u32,
    day: u32,
    day_of_year: Option<u32>,
    hour: u32,
    minute: u32,
    second: u32,
    nanos: u32,
    meridian: Option<Meridian>,
    tz_negative: bool,
    tz_hour: Option<u32>,
    tz_minute: Option<u32>,
}

impl ParsedFields {
    /// The hour on the 24-hour clock, folding in a parsed meridian. Format
    /// validation guarantees a meridian only coexists with HH/HH12.
    fn hour24(&self) -> u32 {
        match self.meridian {
            Some(Meridian::Am) => {
                if self.hour == 12 {
                    0
                } else {
                    self.hour
                }
            }
            Some(Meridian::Pm) => {
                if self.hour == 12 {
                    12
                } else {
                    self.hour + 12
                }
            }
            None => self.hour,
        }
    }
}

/// Parses `input` under `elements`, resolving the result in
/// `default_timezone` (or at a parsed TZH/TZM offset).
pub(crate) fn parse_timestamp_with_elements(
    elements: &[FormatElement],
    input: &str,
    default_timezone: Tz,
    current_timestamp: DateTime<Utc>,
) -> Result<DateTime<Tz>> {
    let now = current_timestamp.with_timezone(&default_timezone);

    let mut fields = ParsedFields {
        year: now.year(),
        month: now.month(),
        day: 1,
        day_of_year: None,
        hour: 0,
        minute: 0,
        second: 0,
        nanos: 0,
        meridian: None,
        tz_negative: false,
        tz_hour: None,
        tz_minute: None,
    };

    let mut parsed_len = leading_whitespace_len(input);
    let mut processed = 0;
    let mut parse_failed = false;

    while !parse_failed && parsed_len < input.len() && processed < elements.len() {
        let rest = &input[parsed_len..];
        let element = &elements[processed];

        match consume_element(element, rest, &mut fields) {
            Some(n) => {
                parsed_len += n;
                processed += 1;
            }
            None => parse_failed = true,
        }
    }

    if parse_failed {
        return Err(Error::ParseError(format!(
            "Failed to parse input timestamp string at {} with format element {}",
            parsed_len, elements[processed]
        )));
    }

    parsed_len += leading_whitespace_len(&input[parsed_len..]);

    // Trailing empty quoted literals match the empty remainder.
    while processed < elements.len()
        && elements[processed].ty == ElementType::DoubleQuotedLiteral
        && elements[processed].literal_value.is_empty()
    {
        processed += 1;
    }

    if parsed_len < input.len() {
        return Err(Error::ParseError(format!(
            "Illegal non-space trailing data '{}' in timestamp string",
            &input[parsed_len..]
        )));
    }

    if processed < elements.len() {
        return Err(Error::ParseError(format!(
            "Entire timestamp string has been parsed before dealing with format element {}",
            elements[processed]
        )));
    }

    let date = match fields.day_of_year {
        Some(day_of_year) => NaiveDate::from_yo_opt(fields.year, day_of_year),
        None => NaiveDate::from_ymd_opt(fields.year, fields.month, fields.day),
    };
    let civil = date
        .and_then(|date| date.and_hms_nano_opt(fields.hour24(), fields.minute, fields.second, fields.nanos))
        .ok_or_else(|| {
            Error::ParseError("Invalid result from year, month, day values after parsing".to_string())
        })?;

    let timestamp = match (fields.tz_hour, fields.tz_minute) {
        (None, None) => resolve_in_zone(default_timezone, civil),
        (tz_hour, tz_minute) => {
            let seconds =
                (tz_hour.unwrap_or(0) * 3600 + tz_minute.unwrap_or(0) * 60) as i32;
            let seconds = if fields.tz_negative { -seconds } else { seconds };
            // A parsed offset pins the civil time to the timeline directly;
            // the offset magnitude was bounded during scanning.
            default_timezone.from_utc_datetime(&(civil - Duration::seconds(seconds as i64)))
        }
    };

    if !is_valid_timestamp_micros(timestamp.timestamp_micros()) {
        return Err(Error::ParseError(
            "The parsing result is out of valid time range".to_string(),
        ));
    }
    Ok(timestamp)
}

/// Matches one element at the head of `rest`, updating `fields`. Returns
/// the number of consumed bytes, or `None` on mismatch.
fn consume_element(element: &FormatElement, rest: &str, fields: &mut ParsedFields) -> Option<usize> {
    match element.ty {
        ElementType::SimpleLiteral | ElementType::DoubleQuotedLiteral => {
            match_exact(rest, &element.literal_value)
        }
        ElementType::Whitespace => {
            // One or more Unicode whitespace code points; zero is an error,
            // not a no-op.
            match leading_whitespace_len(rest) {
                0 => None,
                n => Some(n),
            }
        }
        ElementType::YYYY | ElementType::RRRR => {
            parse_int(rest, 1, 5, 0, 10_000).map(|(width, value)| {
                fields.year = value as i32;
                width
            })
        }
        ElementType::YYY | ElementType::YY | ElementType::Y => {
            // Replace the last 1..=3 digits of the current year. With
            // current year 1970, "12" under YY gives 1912.
            let element_len = element.len_in_format_str;
            let power = POWERS_OF_TEN[element_len];
            parse_int(rest, 1, element_len, 0, power - 1).map(|(width, value)| {
                fields.year = fields.year - fields.year % power as i32 + value as i32;
                width
            })
        }
        ElementType::RR => parse_rr(rest, fields.year).map(|(width, value)| {
            fields.year = value;
            width
        }),
        ElementType::YCommaYYY => parse_y_comma_yyy(rest).map(|(width, value)| {
            fields.year = value;
            width
        }),
        ElementType::MM => parse_int(rest, 1, 2, 0, 99).map(|(width, value)| {
            fields.month = value as u32;
            width
        }),
        ElementType::MON | ElementType::MONTH => parse_month_name(rest).map(|(width, month)| {
            fields.month = month;
            width
        }),
        ElementType::DD => parse_int(rest, 1, 2, 0, 99).map(|(width, value)| {
            fields.day = value as u32;
            width
        }),
        ElementType::DDD => parse_int(rest, 1, 3, 0, 999).map(|(width, value)| {
            fields.day_of_year = Some(value as u32);
            width
        }),
        ElementType::HH | ElementType::HH12 => {
            let (width, value) = parse_int(rest, 1, 2, 0, 99)?;
            if !(1..=12).contains(&value) {
                return None;
            }
            fields.hour = value as u32;
            Some(width)
        }
        ElementType::HH24 => {
            let (width, value) = parse_int(rest, 1, 2, 0, 99)?;
            if value > 23 {
                return None;
            }
            fields.hour = value as u32;
            Some(width)
        }
        ElementType::MI => {
            let (width, value) = parse_int(rest, 1, 2, 0, 99)?;
            if value > 59 {
                return None;
            }
            fields.minute = value as u32;
            Some(width)
        }
        ElementType::SS => {
            let (width, value) = parse_int(rest, 1, 2, 0, 99)?;
            if value > 59 {
                return None;
            }
            fields.second = value as u32;
            Some(width)
        }
        ElementType::SSSSS => {
            let (width, value) = parse_int(rest, 1, 5, 0, 99_999)?;
            if value > 86_399 {
                return None;
            }
            fields.hour = (value / 3600) as u32;
            fields.minute = (value % 3600 / 60) as u32;
            fields.second = (value % 60) as u32;
            Some(width)
        }
        ElementType::FFN => {
            let digits = element.subsecond_digits as usize;
            let (width, value) = parse_int(rest, 1, digits, 0, POWERS_OF_TEN[digits] - 1)?;
            fields.nanos = (value * POWERS_OF_TEN[9 - width]) as u32;
            Some(width)
        }
        ElementType::AM | ElementType::PM | ElementType::AMWithDots | ElementType::PMWithDots => {
            // Any of the four spellings satisfies any meridian element.
            parse_meridian(rest).map(|(width, meridian)| {
                fields.meridian = Some(meridian);
                width
            })
        }
        ElementType::TZH => {
            let (sign_len, negative) = match rest.as_bytes().first() {
                Some(b'+') => (1, false),
                Some(b'-') => (1, true),
                _ => (0, false),
            };
            let (width, value) = parse_int(&rest[sign_len..], 1, 2, 0, 99)?;
            if value > 14 {
                return None;
            }
            fields.tz_negative = negative;
            fields.tz_hour = Some(value as u32);
            Some(sign_len + width)
        }
        ElementType::TZM => {
            let (width, value) = parse_int(rest, 1, 2, 0, 99)?;
            if value > 59 {
                return None;
            }
            fields.tz_minute = Some(value as u32);
            Some(width)
        }
        // Everything else was rejected by parse validation.
        _ => None,
    }
}

/// Maps a civil time onto the timeline of `tz`, choosing the earlier
/// candidate across a fall-back fold, and resolving a spring-forward gap
/// through the offset in effect before the transition.
pub(crate) fn resolve_in_zone(tz: Tz, civil: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&civil) {
        LocalResult::Single(timestamp) => timestamp,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => {
            let offset = tz.offset_from_utc_datetime(&civil).fix().local_minus_utc();
            tz.from_utc_datetime(&(civil - Duration::seconds(offset as i64)))
        }
    }
}

/// The byte length of the leading Unicode whitespace of `s`.
#[inline]
fn leading_whitespace_len(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

/// Byte-exact prefix match. An empty target matches zero characters.
#[inline]
fn match_exact(s: &str, target: &str) -> Option<usize> {
    if s.starts_with(target) {
        Some(target.len())
    } else {
        None
    }
}

#[inline]
fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Greedy, value-bounded integer scan: consumes digits while staying within
/// `max_width` and while the running value does not exceed `max`. The
/// consumed width must reach `min_width` and the value must reach `min`.
fn parse_int(s: &str, min_width: usize, max_width: usize, min: i64, max: i64) -> Option<(usize, i64)> {
    let bytes = s.as_bytes();
    let mut value: i64 = 0;
    let mut width = 0;

    while width < max_width && width < bytes.len() {
        let b = bytes[width];
        if !b.is_ascii_digit() {
            break;
        }
        let next = value * 10 + (b - b'0') as i64;
        if next > max {
            break;
        }
        value = next;
        width += 1;
    }

    if width < min_width || value < min {
        return None;
    }
    Some((width, value))
}

/// Expands a two-digit year relative to `current_year`: the century is
/// adjusted by one when the two-digit year and the current year's last two
/// digits fall on opposite sides of 50.
fn parse_rr(s: &str, current_year: i32) -> Option<(usize, i32)> {
    let (width, parsed) = parse_int(s, 1, 2, 0, 99)?;
    let year_last_two_digits = parsed as i32;
    let current_last_two_digits = current_year % 100;
    let mut century = current_year / 100;

    if year_last_two_digits < 50 && current_last_two_digits >= 50 {
        century += 1;
    } else if year_last_two_digits >= 50 && current_last_two_digits < 50 {
        century -= 1;
    }
    Some((width, century * 100 + year_last_two_digits))
}

/// Parses a full year written as `X,XXX` or `XX,XXX`.
fn parse_y_comma_yyy(s: &str) -> Option<(usize, i32)> {
    let (high_width, high) = parse_int(s, 1, 2, 0, 10)?;

    let rest = &s[high_width..];
    if !rest.starts_with(',') {
        return None;
    }

    let (low_width, low) = parse_int(&rest[1..], 3, 3, 0, 999)?;
    Some((high_width + 1 + low_width, (high * 1000 + low) as i32))
}

/// Matches an English month name or abbreviation, case-insensitively.
fn parse_month_name(s: &str) -> Option<(usize, u32)> {
    for (index, name) in MONTH_NAMES.iter().enumerate() {
        if starts_with_ignore_ascii_case(s, name) {
            return Some((name.len(), index as u32 + 1));
        }
    }
    for (index, name) in MONTH_ABBREVIATIONS.iter().enumerate() {
        if starts_with_ignore_ascii_case(s, name) {
            return Some((name.len(), index as u32 + 1));
        }
    }
    None
}

/// Matches any of `AM`, `PM`, `A.M.`, `P.M.`, case-insensitively.
fn parse_meridian(s: &str) -> Option<(usize, Meridian)> {
    if starts_with_ignore_ascii_case(s, "AM") {
        Some((2, Meridian::Am))
    } else if starts_with_ignore_ascii_case(s, "PM") {
        Some((2, Meridian::Pm))
    } else if starts_with_ignore_ascii_case(s, "A.M.") {
        Some((4, Meridian::Am))
    } else if starts_with_ignore_ascii_case(s, "P.M.") {
        Some((4, Meridian::Pm))
    } else {
        None
    }
}
