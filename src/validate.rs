//! Structural validation of format element sequences.

use crate::element::{ElementCategory, ElementType, FormatElement};
use crate::error::{Error, Result};
use std::collections::HashMap;

/// The SQL type a format string is validated against.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputType {
    Date,
    Time,
    Datetime,
    Timestamp,
}

impl OutputType {
    pub(crate) const fn name(self) -> &'static str {
        match self {
            OutputType::Date => "DATE",
            OutputType::Time => "TIME",
            OutputType::Datetime => "DATETIME",
            OutputType::Timestamp => "TIMESTAMP",
        }
    }
}

type CategoryToElements<'a> = HashMap<ElementCategory, Vec<&'a FormatElement>>;
type TypeToElement<'a> = HashMap<ElementType, &'a FormatElement>;

/// The element types the parser accepts. Everything else is rejected when a
/// format string is validated for parsing.
fn is_supported_for_parsing(ty: ElementType) -> bool {
    use ElementType::*;

    matches!(
        ty,
        SimpleLiteral
            | DoubleQuotedLiteral
            | Whitespace
            | YYYY
            | YYY
            | YY
            | Y
            | RRRR
            | RR
            | YCommaYYY
            | MM
            | MON
            | MONTH
            | DD
            | DDD
            | HH
            | HH12
            | HH24
            | MI
            | SS
            | SSSSS
            | FFN
            | AM
            | PM
            | AMWithDots
            | PMWithDots
            | TZH
            | TZM
    )
}

/// Rejects more than one element in `category`. For example, `YY` and
/// `RRRR` cannot appear together since both are in the YEAR category.
fn check_for_duplicates_in_category(
    category: ElementCategory,
    category_to_elements: &CategoryToElements<'_>,
) -> Result<()> {
    if let Some(elements) = category_to_elements.get(&category) {
        if elements.len() > 1 {
            return Err(Error::InvalidFormat(format!(
                "More than one format element in category {} exist: {} and {}",
                category.name(),
                elements[0],
                elements[1]
            )));
        }
    }
    Ok(())
}

/// Rejects the presence of any element in `category` for the given output
/// type.
fn check_category_not_present(
    category: ElementCategory,
    category_to_elements: &CategoryToElements<'_>,
    output_type_name: &str,
) -> Result<()> {
    if let Some(elements) = category_to_elements.get(&category) {
        return Err(Error::InvalidFormat(format!(
            "Format element in category {} ({}) is not allowed for output type {}",
            category.name(),
            elements[0],
            output_type_name
        )));
    }
    Ok(())
}

/// Rejects the simultaneous presence of an element of `ty` and any element
/// in `category`.
fn check_type_excludes_category(
    ty: ElementType,
    category: ElementCategory,
    type_to_element: &TypeToElement<'_>,
    category_to_elements: &CategoryToElements<'_>,
) -> Result<()> {
    if let (Some(element_of_type), Some(elements)) =
        (type_to_element.get(&ty), category_to_elements.get(&category))
    {
        return Err(Error::InvalidFormat(format!(
            "Format element in category {} ({}) and format element {} cannot exist simultaneously",
            category.name(),
            elements[0],
            element_of_type
        )));
    }
    Ok(())
}

/// Rejects the simultaneous presence of elements of both types.
fn check_type_excludes_type(
    ty1: ElementType,
    ty2: ElementType,
    type_to_element: &TypeToElement<'_>,
) -> Result<()> {
    if let (Some(element1), Some(element2)) = (type_to_element.get(&ty1), type_to_element.get(&ty2))
    {
        return Err(Error::InvalidFormat(format!(
            "Format elements {} and {} cannot exist simultaneously",
            element1, element2
        )));
    }
    Ok(())
}

/// Requires that an element in `category` is present iff an element of one
/// of `types` is present. For example, an HH or HH12 element requires a
/// meridian indicator, and vice versa.
fn check_coexistence(
    types: &[ElementType],
    category: ElementCategory,
    type_to_element: &TypeToElement<'_>,
    category_to_elements: &CategoryToElements<'_>,
) -> Result<()> {
    let present = types.iter().find_map(|ty| type_to_element.get(ty));

    match (present, category_to_elements.get(&category)) {
        (Some(element), None) => Err(Error::InvalidFormat(format!(
            "Format element in category {} is required when format element {} exists",
            category.name(),
            element
        ))),
        (None, Some(elements)) => {
            let joined = types
                .iter()
                .map(|ty| ty.name())
                .collect::<Vec<_>>()
                .join("/");
            Err(Error::InvalidFormat(format!(
                "Format element of type {} is required when format element in category {} ({}) exists",
                joined,
                category.name(),
                elements[0]
            )))
        }
        _ => Ok(()),
    }
}

fn validate_elements_for_parsing(
    elements: &[FormatElement],
    barred_categories: &[ElementCategory],
    output_type_name: &str,
) -> Result<()> {
    let mut category_to_elements: CategoryToElements<'_> = HashMap::new();
    let mut type_to_element: TypeToElement<'_> = HashMap::new();

    for element in elements {
        if !is_supported_for_parsing(element.ty) {
            return Err(Error::InvalidFormat(format!(
                "Format element {} is not supported for parsing",
                element
            )));
        }

        // Two per category suffice for any duplicate diagnostic.
        let in_category = category_to_elements.entry(element.category()).or_default();
        if in_category.len() < 2 {
            in_category.push(element);
        }

        if type_to_element.contains_key(&element.ty) {
            // Non-literal types may appear at most once, case-insensitively:
            // "MiYYmI" is invalid since both "Mi" and "mI" are MI elements.
            if element.category() != ElementCategory::Literal {
                return Err(Error::InvalidFormat(format!(
                    "Format element {} appears more than once in the format string",
                    element
                )));
            }
        } else {
            type_to_element.insert(element.ty, element);
        }
    }

    for category in [
        ElementCategory::MeridianIndicator,
        ElementCategory::Year,
        ElementCategory::Month,
        ElementCategory::Day,
        ElementCategory::Hour,
        ElementCategory::Minute,
    ] {
        check_for_duplicates_in_category(category, &category_to_elements)?;
    }

    // DDD carries both month and day information, so elements in the MONTH
    // category are barred. DDD against DD is covered by the DAY duplicate
    // check above.
    check_type_excludes_category(
        ElementType::DDD,
        ElementCategory::Month,
        &type_to_element,
        &category_to_elements,
    )?;

    // HH24 against HH/HH12 is covered by the HOUR duplicate check.
    check_type_excludes_category(
        ElementType::HH24,
        ElementCategory::MeridianIndicator,
        &type_to_element,
        &category_to_elements,
    )?;

    check_coexistence(
        &[ElementType::HH, ElementType::HH12],
        ElementCategory::MeridianIndicator,
        &type_to_element,
        &category_to_elements,
    )?;

    // SSSSS carries hour, minute and second information.
    check_type_excludes_category(
        ElementType::SSSSS,
        ElementCategory::Hour,
        &type_to_element,
        &category_to_elements,
    )?;
    check_type_excludes_category(
        ElementType::SSSSS,
        ElementCategory::Minute,
        &type_to_element,
        &category_to_elements,
    )?;
    check_type_excludes_type(ElementType::SSSSS, ElementType::SS, &type_to_element)?;

    for &category in barred_categories {
        check_category_not_present(category, &category_to_elements, output_type_name)?;
    }

    Ok(())
}

/// Validates an element sequence for parsing into `out_type`.
pub(crate) fn validate_for_parsing(elements: &[FormatElement], out_type: OutputType) -> Result<()> {
    match out_type {
        OutputType::Timestamp => {
            validate_elements_for_parsing(elements, &[], out_type.name())
        }
        _ => Err(Error::InvalidFormat(
            "Unsupported output type for validation".to_string(),
        )),
    }
}

/// Validates an element sequence for formatting a value of `out_type`.
///
/// Timestamp formatting accepts every tokenizable format string; elements
/// without a rendering are reported when the cast is evaluated.
pub(crate) fn validate_for_formatting(
    elements: &[FormatElement],
    out_type: OutputType,
) -> Result<()> {
    let allowed: &[ElementCategory] = match out_type {
        OutputType::Date => &[
            ElementCategory::Literal,
            ElementCategory::Year,
            ElementCategory::Month,
            ElementCategory::Day,
        ],
        OutputType::Time => &[
            ElementCategory::Literal,
            ElementCategory::Hour,
            ElementCategory::Minute,
            ElementCategory::Second,
            ElementCategory::MeridianIndicator,
        ],
        OutputType::Datetime => &[
            ElementCategory::Literal,
            ElementCategory::Year,
            ElementCategory::Month,
            ElementCategory::Day,
            ElementCategory::Hour,
            ElementCategory::Minute,
            ElementCategory::Second,
            ElementCategory::MeridianIndicator,
        ],
        OutputType::Timestamp => return Ok(()),
    };

    for element in elements {
        if !allowed.contains(&element.category()) {
            return Err(Error::InvalidFormat(format!(
                "{} does not support {}",
                out_type.name(),
                element
            )));
        }
    }
    Ok(())
}
