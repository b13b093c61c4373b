//! Format element catalog.

use std::fmt;

/// The type of a single format element.
///
/// The vocabulary is closed; every recognized element string maps to exactly
/// one of these tags. Elements that only differ by subsecond digit count
/// (`FF1`..`FF9`) share the `FFN` tag and carry the digit count in the
/// [`FormatElement`] record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// One of `- . / , ' ; :`
    SimpleLiteral,
    /// Arbitrary text between double quotes, with `\\` and `\"` escapes.
    DoubleQuotedLiteral,
    /// A run of ASCII spaces.
    Whitespace,
    YYYY,
    YYY,
    YY,
    Y,
    RRRR,
    RR,
    /// `Y,YYY`
    YCommaYYY,
    IYYY,
    IYY,
    IY,
    I,
    SYYYY,
    YEAR,
    SYEAR,
    MM,
    MON,
    MONTH,
    RM,
    DDD,
    DD,
    D,
    DAY,
    DY,
    J,
    HH,
    HH12,
    HH24,
    MI,
    SS,
    SSSSS,
    /// `FF1`..`FF9`
    FFN,
    AM,
    PM,
    /// `A.M.`
    AMWithDots,
    /// `P.M.`
    PMWithDots,
    TZH,
    TZM,
    CC,
    SCC,
    Q,
    IW,
    WW,
    W,
    AD,
    BC,
    /// `A.D.`
    ADWithDots,
    /// `B.C.`
    BCWithDots,
    SP,
    TH,
    SPTH,
    THSP,
    FM,
}

/// Coarse grouping of element types, used by structural validation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    Literal,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    MeridianIndicator,
    TimeZone,
    Century,
    Quarter,
    Week,
    EraIndicator,
    Misc,
}

impl ElementType {
    /// The category of the element type. Total over the vocabulary.
    #[inline]
    pub const fn category(self) -> ElementCategory {
        use ElementType::*;

        match self {
            SimpleLiteral | DoubleQuotedLiteral | Whitespace => ElementCategory::Literal,
            YYYY | YYY | YY | Y | RRRR | RR | YCommaYYY | IYYY | IYY | IY | I | SYYYY | YEAR
            | SYEAR => ElementCategory::Year,
            MM | MON | MONTH | RM => ElementCategory::Month,
            DDD | DD | D | DAY | DY | J => ElementCategory::Day,
            HH | HH12 | HH24 => ElementCategory::Hour,
            MI => ElementCategory::Minute,
            SS | SSSSS | FFN => ElementCategory::Second,
            AM | PM | AMWithDots | PMWithDots => ElementCategory::MeridianIndicator,
            TZH | TZM => ElementCategory::TimeZone,
            CC | SCC => ElementCategory::Century,
            Q => ElementCategory::Quarter,
            IW | WW | W => ElementCategory::Week,
            AD | BC | ADWithDots | BCWithDots => ElementCategory::EraIndicator,
            SP | TH | SPTH | THSP | FM => ElementCategory::Misc,
        }
    }

    /// The catalog name of the element type, as used in diagnostics.
    pub(crate) const fn name(self) -> &'static str {
        use ElementType::*;

        match self {
            SimpleLiteral => "SIMPLE_LITERAL",
            DoubleQuotedLiteral => "DOUBLE_QUOTED_LITERAL",
            Whitespace => "WHITESPACE",
            YYYY => "YYYY",
            YYY => "YYY",
            YY => "YY",
            Y => "Y",
            RRRR => "RRRR",
            RR => "RR",
            YCommaYYY => "Y,YYY",
            IYYY => "IYYY",
            IYY => "IYY",
            IY => "IY",
            I => "I",
            SYYYY => "SYYYY",
            YEAR => "YEAR",
            SYEAR => "SYEAR",
            MM => "MM",
            MON => "MON",
            MONTH => "MONTH",
            RM => "RM",
            DDD => "DDD",
            DD => "DD",
            D => "D",
            DAY => "DAY",
            DY => "DY",
            J => "J",
            HH => "HH",
            HH12 => "HH12",
            HH24 => "HH24",
            MI => "MI",
            SS => "SS",
            SSSSS => "SSSSS",
            FFN => "FFN",
            AM => "AM",
            PM => "PM",
            AMWithDots => "A.M.",
            PMWithDots => "P.M.",
            TZH => "TZH",
            TZM => "TZM",
            CC => "CC",
            SCC => "SCC",
            Q => "Q",
            IW => "IW",
            WW => "WW",
            W => "W",
            AD => "AD",
            BC => "BC",
            ADWithDots => "A.D.",
            BCWithDots => "B.C.",
            SP => "SP",
            TH => "TH",
            SPTH => "SPTH",
            THSP => "THSP",
            FM => "FM",
        }
    }
}

impl ElementCategory {
    /// The catalog name of the category, as used in diagnostics.
    pub(crate) const fn name(self) -> &'static str {
        match self {
            ElementCategory::Literal => "LITERAL",
            ElementCategory::Year => "YEAR",
            ElementCategory::Month => "MONTH",
            ElementCategory::Day => "DAY",
            ElementCategory::Hour => "HOUR",
            ElementCategory::Minute => "MINUTE",
            ElementCategory::Second => "SECOND",
            ElementCategory::MeridianIndicator => "MERIDIAN_INDICATOR",
            ElementCategory::TimeZone => "TIME_ZONE",
            ElementCategory::Century => "CENTURY",
            ElementCategory::Quarter => "QUARTER",
            ElementCategory::Week => "WEEK",
            ElementCategory::EraIndicator => "ERA_INDICATOR",
            ElementCategory::Misc => "MISC",
        }
    }
}

/// How the rendered text of a non-literal element is re-cased, derived from
/// the element's original spelling in the format string.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormatCasing {
    /// Literal elements keep the bytes the user wrote.
    PreserveCase,
    AllUppercase,
    AllLowercase,
    /// The first letter of each rendered word is capitalized; the strftime
    /// collaborator already emits names in this shape, so no rewrite is
    /// needed.
    OnlyFirstLetterUppercase,
}

impl FormatCasing {
    /// Derives the casing of a non-literal element from the original
    /// (pre-uppercase) spelling of the matched span.
    pub(crate) fn infer(original: &str, ty: ElementType) -> FormatCasing {
        let bytes = original.as_bytes();
        // The first letter dictates lowercase output on its own.
        if bytes[0].is_ascii_lowercase() {
            return FormatCasing::AllLowercase;
        }

        // For meridian and era indicators the second character is a dot, and
        // "Y,YYY" renders no letters at all; the first letter decides. The
        // same holds for single-character elements.
        let category = ty.category();
        if category == ElementCategory::MeridianIndicator
            || category == ElementCategory::EraIndicator
            || bytes.len() == 1
            || ty == ElementType::YCommaYYY
        {
            return FormatCasing::AllUppercase;
        }

        if bytes[1].is_ascii_lowercase() {
            FormatCasing::OnlyFirstLetterUppercase
        } else {
            FormatCasing::AllUppercase
        }
    }
}

/// One element of a tokenized format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatElement {
    pub ty: ElementType,
    pub casing: FormatCasing,
    /// Number of format string bytes the element consumed.
    pub len_in_format_str: usize,
    /// The bytes to emit or match, unescaped; only populated for
    /// `SimpleLiteral` and `DoubleQuotedLiteral`.
    pub literal_value: String,
    /// 1..=9 for `FFN`, 0 otherwise.
    pub subsecond_digits: u8,
}

impl FormatElement {
    #[inline]
    pub fn category(&self) -> ElementCategory {
        self.ty.category()
    }

    pub(crate) fn non_literal(ty: ElementType, casing: FormatCasing, len: usize) -> Self {
        FormatElement {
            ty,
            casing,
            len_in_format_str: len,
            literal_value: String::new(),
            subsecond_digits: 0,
        }
    }
}

impl fmt::Display for FormatElement {
    /// The debug name used verbatim in diagnostics, e.g. `'YYYY'`, `'FF3'`,
    /// `'"abc"'`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            ElementType::SimpleLiteral => write!(f, "'{}'", self.literal_value),
            ElementType::DoubleQuotedLiteral => {
                let escaped = self.literal_value.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "'\"{}\"'", escaped)
            }
            ElementType::Whitespace => {
                write!(f, "'")?;
                for _ in 0..self.len_in_format_str {
                    f.write_str(" ")?;
                }
                write!(f, "'")
            }
            ElementType::FFN => write!(f, "'FF{}'", self.subsecond_digits),
            _ => write!(f, "'{}'", self.ty.name()),
        }
    }
}
