//! Format string tokenization.

use crate::element::{ElementCategory, ElementType, FormatCasing, FormatElement};
use crate::error::{Error, Result};
use crate::trie::element_trie;

/// Splits a format string into an ordered element sequence.
///
/// Matching is case-insensitive; the casing of the original bytes decides
/// each element's [`FormatCasing`]. Offsets in diagnostics are byte offsets
/// into the format string.
pub(crate) fn tokenize(format_str: &str) -> Result<Vec<FormatElement>> {
    // ASCII-only upper-casing keeps byte offsets aligned with the original.
    let upper = format_str.to_ascii_uppercase();

    let mut elements = Vec::new();
    let mut pos = 0;
    while pos < format_str.len() {
        match next_element(&format_str[pos..], &upper[pos..]) {
            Ok(element) => {
                pos += element.len_in_format_str;
                elements.push(element);
            }
            Err(message) => {
                return Err(Error::InvalidFormat(format!("{} at {}", message, pos)));
            }
        }
    }

    Ok(elements)
}

/// Scans one element from the head of `original`. `upper` is the same span
/// upper-cased. Errors are returned without the offset suffix; the caller
/// appends it.
fn next_element(original: &str, upper: &str) -> std::result::Result<FormatElement, String> {
    let (ty, matched_len) = element_trie()
        .longest_match(upper.as_bytes())
        .ok_or_else(|| "Cannot find matched format element".to_string())?;

    if ty.category() != ElementCategory::Literal {
        let span = &original[..matched_len];
        let casing = FormatCasing::infer(span, ty);
        let mut element = FormatElement::non_literal(ty, casing, matched_len);
        if ty == ElementType::FFN {
            // The trie only admits FF1..FF9, so the third byte is the digit.
            element.subsecond_digits = span.as_bytes()[2] - b'0';
        }
        return Ok(element);
    }

    match ty {
        ElementType::SimpleLiteral => Ok(FormatElement {
            ty,
            casing: FormatCasing::PreserveCase,
            len_in_format_str: matched_len,
            literal_value: original[..matched_len].to_string(),
            subsecond_digits: 0,
        }),
        ElementType::Whitespace => {
            // Extend over the whole run of ASCII spaces.
            let mut len = matched_len;
            let bytes = original.as_bytes();
            while len < bytes.len() && bytes[len] == b' ' {
                len += 1;
            }
            Ok(FormatElement {
                ty,
                casing: FormatCasing::PreserveCase,
                len_in_format_str: len,
                literal_value: String::new(),
                subsecond_digits: 0,
            })
        }
        ElementType::DoubleQuotedLiteral => scan_quoted_literal(original),
        _ => unreachable!("literal category covers exactly three element types"),
    }
}

/// Scans a double-quoted literal from the opening quote, unescaping as it
/// goes. Only `\\` and `\"` are valid escapes.
fn scan_quoted_literal(original: &str) -> std::result::Result<FormatElement, String> {
    let mut literal = String::new();
    let mut len = 1;
    let mut escaped = false;
    let mut closed = false;

    for c in original[1..].chars() {
        len += c.len_utf8();
        if escaped {
            if c != '\\' && c != '"' {
                return Err(format!("Unsupported escape sequence \\{} in text", c));
            }
            escaped = false;
        } else if c == '\\' {
            escaped = true;
            continue;
        } else if c == '"' {
            closed = true;
            break;
        }
        literal.push(c);
    }

    if !closed {
        return Err("Cannot find matching \" for quoted literal".to_string());
    }

    Ok(FormatElement {
        ty: ElementType::DoubleQuotedLiteral,
        casing: FormatCasing::PreserveCase,
        len_in_format_str: len,
        literal_value: literal,
        subsecond_digits: 0,
    })
}
