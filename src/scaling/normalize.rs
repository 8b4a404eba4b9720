//! Numeral normalization
//!
//! Replaces fraction words, Unicode fraction glyphs and slash fractions with
//! plain decimal literals of the same magnitude. Nothing is scaled here.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{format_decimal, round_to};

/// Hebrew fraction words in match priority order.
///
/// "שני שלישים" must precede "שליש" so the two-word phrase is never split.
pub const FRACTION_WORDS: &[(&str, f64)] = &[
    ("שני שלישים", 0.67),
    ("שליש", 0.33),
    ("רבע", 0.25),
    ("חצי", 0.5),
];

/// Unicode vulgar fraction glyphs
pub const FRACTION_GLYPHS: &[(char, f64)] = &[
    ('½', 0.5),
    ('¼', 0.25),
    ('¾', 0.75),
    ('⅓', 0.333),
    ('⅔', 0.667),
    ('⅛', 0.125),
    ('⅜', 0.375),
    ('⅝', 0.625),
    ('⅞', 0.875),
];

/// Decimal places kept when a glyph is folded into a whole number ("1⅓")
const GLYPH_PLACES: i32 = 3;

/// Decimal places kept for evaluated slash fractions
const SLASH_PLACES: i32 = 1;

// Alternation order follows FRACTION_WORDS; the regex engine prefers the
// earlier branch when several match at the same position.
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = FRACTION_WORDS
        .iter()
        .map(|(word, _)| regex::escape(word))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).expect("fraction word pattern")
});

static GLYPH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let class: String = FRACTION_GLYPHS.iter().map(|(glyph, _)| *glyph).collect();
    Regex::new(&format!(r"(?:([0-9]+) ?)?([{}])", class)).expect("fraction glyph pattern")
});

static SLASH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:([0-9]+) +)?([0-9]+)/([0-9]+)").expect("slash fraction pattern")
});

/// Rewrite every recognized fraction notation as a decimal literal
///
/// Stages run in a fixed order: words, then glyphs, then slash fractions.
/// Unrecognized notation passes through verbatim, and a string without any
/// recognized notation is returned borrowed and byte-identical.
///
/// Examples:
/// - "חצי בצל" -> "0.5 בצל"
/// - "1½ כוסות" -> "1.5 כוסות"
/// - "2 1/2 כפות" -> "2.5 כפות"
pub fn normalize_numerals(text: &str) -> Cow<'_, str> {
    let words = replace_fraction_words(text);
    let glyphs = replace_fraction_glyphs(&words);
    let slashes = replace_slash_fractions(&glyphs);

    let untouched = matches!(words, Cow::Borrowed(_))
        && matches!(glyphs, Cow::Borrowed(_))
        && matches!(slashes, Cow::Borrowed(_));
    if untouched {
        return Cow::Borrowed(text);
    }
    Cow::Owned(slashes.into_owned())
}

fn fraction_word_value(word: &str) -> Option<f64> {
    FRACTION_WORDS
        .iter()
        .find(|(candidate, _)| *candidate == word)
        .map(|(_, value)| *value)
}

fn fraction_glyph_value(glyph: &str) -> Option<f64> {
    let mut chars = glyph.chars();
    let glyph = chars.next()?;
    FRACTION_GLYPHS
        .iter()
        .find(|(candidate, _)| *candidate == glyph)
        .map(|(_, value)| *value)
}

fn replace_fraction_words(text: &str) -> Cow<'_, str> {
    WORD_PATTERN.replace_all(text, |caps: &Captures| match fraction_word_value(&caps[0]) {
        Some(value) => format_decimal(value),
        None => caps[0].to_string(),
    })
}

fn replace_fraction_glyphs(text: &str) -> Cow<'_, str> {
    GLYPH_PATTERN.replace_all(text, |caps: &Captures| {
        let Some(fraction) = fraction_glyph_value(&caps[2]) else {
            return caps[0].to_string();
        };
        let whole = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0);
        format_decimal(round_to(whole + fraction, GLYPH_PLACES))
    })
}

fn replace_slash_fractions(text: &str) -> Cow<'_, str> {
    SLASH_PATTERN.replace_all(text, |caps: &Captures| {
        let start = caps.get(0).map_or(0, |m| m.start());
        // "1.5/2" is not a fraction we understand
        if text[..start].ends_with('.') {
            return caps[0].to_string();
        }

        let numerator = caps[2].parse::<f64>().ok();
        let denominator = caps[3].parse::<f64>().ok();
        match (numerator, denominator) {
            (Some(n), Some(d)) if d != 0.0 => {
                let whole = caps
                    .get(1)
                    .and_then(|m| m.as_str().parse::<f64>().ok())
                    .unwrap_or(0.0);
                format_decimal(whole + round_to(n / d, SLASH_PLACES))
            }
            _ => {
                tracing::debug!("Leaving slash fraction '{}' unevaluated", &caps[0]);
                caps[0].to_string()
            }
        }
    })
}
