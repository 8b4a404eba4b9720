//! Serving-size scaling
//!
//! Rewrites free-text ingredient amounts ("2 כפות קמח", "½ בצל", "3-4 ביצים")
//! for a new serving multiplier. The pipeline is a pure function composition:
//! numeral normalization, unit classification, a single-pass quantity rewrite,
//! and the ingredient assembler that also scales cost.

pub mod ingredient;
pub mod normalize;
pub mod scaler;
pub mod units;

pub use ingredient::{
    scale_amount, scale_cost, scale_ingredient, scale_ingredients, servings_multiplier,
    total_cost, Ingredient, ScaledIngredient,
};
pub use normalize::{normalize_numerals, FRACTION_GLYPHS, FRACTION_WORDS};
pub use scaler::{scale_quantities, QuantityToken};
pub use units::{classify, UnitClass};

/// Round to a fixed number of decimal places (half away from zero)
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Render a quantity as a plain decimal literal: `6`, `0.5`, `1.333`
///
/// Integral values carry no trailing `.0`.
pub(crate) fn format_decimal(value: f64) -> String {
    if value == 0.0 {
        // Avoids "-0"
        return "0".to_string();
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(49.4999999, 1), 49.5);
        assert_eq!(round_to(0.25, 1), 0.3);
        assert_eq!(round_to(1.3333, 3), 1.333);
        assert_eq!(round_to(12.0, 1), 12.0);
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(6.0), "6");
        assert_eq!(format_decimal(0.5), "0.5");
        assert_eq!(format_decimal(49.5), "49.5");
        assert_eq!(format_decimal(round_to(1.0 + 0.333, 3)), "1.333");
        assert_eq!(format_decimal(-0.0), "0");
    }
}
