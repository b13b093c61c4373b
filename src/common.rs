//! Common constants and functions.

pub const MICROS_PER_SECOND: i64 = 1_000_000;
pub const MICROS_PER_DAY: i64 = 86_400 * MICROS_PER_SECOND;

pub const DATE_MIN_YEAR: i32 = 1;
pub const DATE_MAX_YEAR: i32 = 9999;

/// Days from the Unix epoch to `0001-01-01`.
pub const DATE_MIN_DAYS: i32 = -719_162;
/// Days from the Unix epoch to `9999-12-31`.
pub const DATE_MAX_DAYS: i32 = 2_932_896;

/// Microseconds from the Unix epoch to `0001-01-01 00:00:00` UTC.
pub const TIMESTAMP_MICROS_MIN: i64 = DATE_MIN_DAYS as i64 * MICROS_PER_DAY;
/// Microseconds from the Unix epoch to `9999-12-31 23:59:59.999999` UTC.
pub const TIMESTAMP_MICROS_MAX: i64 = (DATE_MAX_DAYS as i64 + 1) * MICROS_PER_DAY - 1;

pub const POWERS_OF_TEN: [i64; 10] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

#[inline(always)]
pub const fn is_valid_timestamp_micros(micros: i64) -> bool {
    micros >= TIMESTAMP_MICROS_MIN && micros <= TIMESTAMP_MICROS_MAX
}

#[inline(always)]
pub const fn is_valid_year(year: i32) -> bool {
    year >= DATE_MIN_YEAR && year <= DATE_MAX_YEAR
}
