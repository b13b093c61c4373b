//! This crate provides the format-element engine behind SQL casts of the
//! form `CAST(string AS TIMESTAMP FORMAT fmt)` and
//! `CAST(ts AS STRING FORMAT fmt)`, for the DATE, TIME, DATETIME and
//! TIMESTAMP types.

mod cast;
mod common;
mod element;
mod error;
mod format;
mod parse;
mod tokenizer;
mod trie;
mod validate;

pub use crate::cast::{
    cast_format_date_to_string, cast_format_datetime_to_string, cast_format_time_to_string,
    cast_format_timestamp_to_string, cast_format_timestamp_to_string_with_timezone_name,
    cast_string_to_timestamp, cast_string_to_timestamp_micros,
    cast_string_to_timestamp_micros_with_timezone_name,
    cast_string_to_timestamp_with_timezone_name, validate_format_string_for_formatting,
    validate_format_string_for_parsing,
};
pub use crate::error::{Error, Result};
pub use crate::validate::OutputType;
