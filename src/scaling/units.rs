//! Unit classification
//!
//! Decides from textual unit markers whether scaled quantities may stay
//! fractional (weight, volume, measuring utensils) or must be whole counts.

use serde::{Deserialize, Serialize};

use super::round_to;

/// How quantities in an amount string are rounded after scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitClass {
    /// Weight, volume, spoon and cup measures - fractions are meaningful
    Continuous,
    /// Countable items (eggs, onions, buns) - the default
    Discrete,
}

/// Decimal places kept for continuous quantities
const CONTINUOUS_PLACES: i32 = 1;

/// Products are snapped to this precision before rounding up, so float noise
/// such as `1.1 * 10 = 11.000000000000002` does not add a whole item.
const DISCRETE_SNAP_PLACES: i32 = 6;

impl UnitClass {
    /// Round a scaled quantity according to this class
    ///
    /// Continuous values keep one decimal; discrete values round up and never
    /// drop below one item.
    pub fn round(&self, value: f64) -> f64 {
        match self {
            UnitClass::Continuous => round_to(value, CONTINUOUS_PLACES),
            UnitClass::Discrete => round_to(value, DISCRETE_SNAP_PLACES).ceil().max(1.0),
        }
    }
}

// ============================================================================
// Unit Markers
// ============================================================================

/// Hebrew weight/volume/utensil markers. A marker may carry one prefix letter
/// from `HEBREW_PREFIXES` ("וכוס") but must not run into further letters
/// ("כוסברה" is cilantro).
pub const HEBREW_MARKERS: &[&str] = &[
    // weight
    "גרם",
    "גרמים",
    "גר'",
    "גר׳",
    "ג'",
    "ג׳",
    "קילוגרם",
    "קילו",
    "ק\"ג",
    "ק״ג",
    "קג",
    // volume
    "מיליליטר",
    "מ\"ל",
    "מ״ל",
    "ליטר",
    "ליטרים",
    // utensils
    "כוס",
    "כוסות",
    "כף",
    "כפות",
    "כפית",
    "כפיות",
];

/// Single-letter Hebrew prefixes (and, in, the, to, from, that, as)
pub const HEBREW_PREFIXES: &[char] = &['ו', 'ב', 'ה', 'ל', 'מ', 'ש', 'כ'];

/// Latin markers, matched case-insensitively as whole words ("200g" counts)
pub const LATIN_MARKERS: &[&str] = &[
    "g",
    "gr",
    "gram",
    "grams",
    "kg",
    "kilogram",
    "kilograms",
    "ml",
    "milliliter",
    "milliliters",
    "l",
    "liter",
    "liters",
    "litre",
    "litres",
    "cup",
    "cups",
    "tbsp",
    "tablespoon",
    "tablespoons",
    "tsp",
    "teaspoon",
    "teaspoons",
];

/// Classify an amount string by its unit markers
///
/// Any single marker makes the string `Continuous`; everything else is
/// `Discrete`. The input is only inspected, never altered.
pub fn classify(text: &str) -> UnitClass {
    let lower = text.to_lowercase();

    let hebrew = HEBREW_MARKERS
        .iter()
        .any(|marker| contains_marker(&lower, marker, HEBREW_PREFIXES));
    let latin = || {
        LATIN_MARKERS
            .iter()
            .any(|marker| contains_marker(&lower, marker, &[]))
    };

    if hebrew || latin() {
        UnitClass::Continuous
    } else {
        UnitClass::Discrete
    }
}

/// Check for a marker occurrence that is not followed by another letter and
/// is preceded either by a non-letter or by exactly one `prefixes` letter
fn contains_marker(text: &str, marker: &str, prefixes: &[char]) -> bool {
    text.match_indices(marker).any(|(start, found)| {
        let end = start + found.len();
        let followed = text[end..].chars().next().is_some_and(char::is_alphabetic);
        if followed {
            return false;
        }

        let mut before = text[..start].chars().rev();
        match before.next() {
            Some(c) if c.is_alphabetic() => {
                prefixes.contains(&c) && !before.next().is_some_and(char::is_alphabetic)
            }
            _ => true,
        }
    })
}
