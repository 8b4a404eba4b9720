//! Quantity scaling
//!
//! Finds every scalar and two-ended range in a normalized amount string and
//! rewrites it for the serving multiplier in one scan.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::format_decimal;
use super::units::UnitClass;

// One alternation, tried left to right at each position:
// - `opaque`: digits joined by `/` or `,` that normalization did not evaluate
//   ("1.5/2", "2/0", "1,500"); emitted untouched
// - `low`/`sep`/`high`: a two-ended range
// - `scalar`: a lone number, with or without a leading dot (".5")
// A single scan means no digit is scaled twice.
static QUANTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    const NUMBER: &str = r"(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)";
    Regex::new(&format!(
        r"(?P<opaque>[0-9.]*[0-9](?:[/,][0-9.]*[0-9])+)|(?P<low>{n})(?P<sep>\s*[-–]\s*)(?P<high>{n})|(?P<scalar>{n})",
        n = NUMBER
    ))
    .expect("quantity pattern")
});

/// A magnitude found in an amount string
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantityToken {
    Scalar(f64),
    Range(f64, f64),
}

impl QuantityToken {
    /// Build a token from a `QUANTITY_PATTERN` match; None for opaque text
    fn from_captures(caps: &Captures) -> Option<Self> {
        if let Some(value) = caps.name("scalar") {
            return value.as_str().parse().ok().map(QuantityToken::Scalar);
        }
        let low = caps.name("low")?.as_str().parse().ok()?;
        let high = caps.name("high")?.as_str().parse().ok()?;
        Some(QuantityToken::Range(low, high))
    }

    /// Multiply every end of the token and round it per `class`
    pub fn scale(self, multiplier: f64, class: UnitClass) -> Self {
        match self {
            QuantityToken::Scalar(value) => QuantityToken::Scalar(class.round(value * multiplier)),
            QuantityToken::Range(low, high) => QuantityToken::Range(
                class.round(low * multiplier),
                class.round(high * multiplier),
            ),
        }
    }

    /// Render the token
    ///
    /// Ranges are re-joined with `-`; an en-dash becomes `-` while any spaces
    /// around the separator are kept ("3 – 4" -> "6 - 8").
    fn render(&self, separator: &str) -> String {
        match self {
            QuantityToken::Scalar(value) => format_decimal(*value),
            QuantityToken::Range(low, high) => format!(
                "{}{}{}",
                format_decimal(*low),
                separator.replace('–', "-"),
                format_decimal(*high)
            ),
        }
    }
}

/// Scale every quantity in a normalized amount string
///
/// Non-numeric text is kept in place, and so is numeric notation this module
/// does not understand. A string with no numerals is returned borrowed and
/// unchanged.
///
/// Examples (multiplier 2):
/// - "3-4 ביצים" (discrete) -> "6-8 ביצים"
/// - "0.5 כוס" (continuous) -> "1 כוס"
/// - "1,500 גרם" -> "1,500 גרם"
pub fn scale_quantities(text: &str, multiplier: f64, class: UnitClass) -> Cow<'_, str> {
    QUANTITY_PATTERN.replace_all(text, |caps: &Captures| {
        match QuantityToken::from_captures(caps) {
            Some(token) => {
                let separator = caps.name("sep").map_or("-", |m| m.as_str());
                token.scale(multiplier, class).render(separator)
            }
            None => {
                tracing::debug!("Leaving unrecognized quantity '{}' unscaled", &caps[0]);
                caps[0].to_string()
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_scalar_discrete() {
        assert_eq!(scale_quantities("2 עגבניות", 3.0, UnitClass::Discrete), "6 עגבניות");
    }

    #[test]
    fn test_scale_range_once() {
        assert_eq!(scale_quantities("3-4 ביצים", 2.0, UnitClass::Discrete), "6-8 ביצים");
    }

    #[test]
    fn test_range_spacing_preserved() {
        assert_eq!(scale_quantities("3 - 4 ביצים", 2.0, UnitClass::Discrete), "6 - 8 ביצים");
        assert_eq!(scale_quantities("100-150 גרם", 0.5, UnitClass::Continuous), "50-75 גרם");
    }

    #[test]
    fn test_discrete_never_below_one() {
        assert_eq!(scale_quantities("3 ביצים", 0.1, UnitClass::Discrete), "1 ביצים");
        assert_eq!(scale_quantities("0.5 בצל", 0.25, UnitClass::Discrete), "1 בצל");
    }

    #[test]
    fn test_discrete_rounds_up() {
        assert_eq!(scale_quantities("3 ביצים", 0.5, UnitClass::Discrete), "2 ביצים");
    }

    #[test]
    fn test_continuous_one_decimal() {
        assert_eq!(scale_quantities("150 גרם", 0.33, UnitClass::Continuous), "49.5 גרם");
        assert_eq!(scale_quantities("0.333 כוס", 3.0, UnitClass::Continuous), "1 כוס");
        assert_eq!(scale_quantities("1 כפית", 0.25, UnitClass::Continuous), "0.3 כפית");
    }

    #[test]
    fn test_multiple_quantities() {
        assert_eq!(
            scale_quantities("2 כוסות ועוד 3 כפות", 2.0, UnitClass::Continuous),
            "4 כוסות ועוד 6 כפות"
        );
    }

    #[test]
    fn test_no_numerals_borrowed() {
        let result = scale_quantities("קורט מלח", 4.0, UnitClass::Discrete);
        assert!(matches!(result, Cow::Borrowed("קורט מלח")));
    }

    #[test]
    fn test_en_dash_range_rejoined_with_hyphen() {
        assert_eq!(scale_quantities("3–4 ביצים", 2.0, UnitClass::Discrete), "6-8 ביצים");
        assert_eq!(scale_quantities("3 – 4 ביצים", 2.0, UnitClass::Discrete), "6 - 8 ביצים");
    }

    #[test]
    fn test_leading_dot_decimal() {
        assert_eq!(scale_quantities(".5 כוס", 2.0, UnitClass::Continuous), "1 כוס");
        assert_eq!(scale_quantities(".5-.75 כוס", 2.0, UnitClass::Continuous), "1-1.5 כוס");
    }

    #[test]
    fn test_unevaluated_slash_left_alone() {
        assert_eq!(scale_quantities("1.5/2 כוס", 2.0, UnitClass::Continuous), "1.5/2 כוס");
        assert_eq!(scale_quantities("1/0 כוס", 2.0, UnitClass::Continuous), "1/0 כוס");
        assert_eq!(scale_quantities("1/0 בצל", 2.0, UnitClass::Discrete), "1/0 בצל");
    }

    #[test]
    fn test_comma_grouped_number_left_alone() {
        assert_eq!(scale_quantities("1,500 גרם", 2.0, UnitClass::Continuous), "1,500 גרם");
        // comma followed by a space is ordinary punctuation
        assert_eq!(scale_quantities("2, 3 ביצים", 2.0, UnitClass::Discrete), "4, 6 ביצים");
    }

    #[test]
    fn test_token_scale() {
        let token = QuantityToken::Range(1.5, 2.0).scale(3.0, UnitClass::Continuous);
        assert_eq!(token, QuantityToken::Range(4.5, 6.0));
        let token = QuantityToken::Scalar(0.5).scale(1.0, UnitClass::Discrete);
        assert_eq!(token, QuantityToken::Scalar(1.0));
    }
}
