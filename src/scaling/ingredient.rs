//! Ingredient assembly
//!
//! Combines the amount pipeline with cost scaling into the single operation
//! the recipe display layer calls per ingredient.

use serde::{Deserialize, Serialize};

use super::normalize::normalize_numerals;
use super::round_to;
use super::scaler::scale_quantities;
use super::units::classify;

/// Decimal places kept for scaled cost
const COST_PLACES: i32 = 1;

/// An ingredient as authored for the recipe's base serving count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
    #[serde(default)]
    pub cost: f64,
}

/// An ingredient rewritten for a serving multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledIngredient {
    pub name: String,
    pub amount: String,
    pub cost: f64,
}

/// Compute the serving multiplier `target / base`
///
/// Returns None unless both counts are finite and positive.
pub fn servings_multiplier(target_servings: f64, base_servings: f64) -> Option<f64> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(target_servings) && valid(base_servings) {
        Some(target_servings / base_servings)
    } else {
        None
    }
}

/// Rewrite a free-text amount for a serving multiplier
///
/// Classification reads the original text; normalization and scaling then
/// run once each, so every magnitude is multiplied exactly once.
///
/// # Arguments
/// * `amount` - The authored amount (e.g., "½ כוס סוכר")
/// * `multiplier` - Target servings over base servings, must be > 0
pub fn scale_amount(amount: &str, multiplier: f64) -> String {
    let class = classify(amount);
    let normalized = normalize_numerals(amount);
    scale_quantities(&normalized, multiplier, class).into_owned()
}

/// Scale a cost, rounded to one decimal
pub fn scale_cost(cost: f64, multiplier: f64) -> f64 {
    round_to(cost * multiplier, COST_PLACES)
}

/// Scale one ingredient; the name is carried over untouched
pub fn scale_ingredient(ingredient: &Ingredient, multiplier: f64) -> ScaledIngredient {
    ScaledIngredient {
        name: ingredient.name.clone(),
        amount: scale_amount(&ingredient.amount, multiplier),
        cost: scale_cost(ingredient.cost, multiplier),
    }
}

/// Scale a whole ingredient list, preserving order
pub fn scale_ingredients(ingredients: &[Ingredient], multiplier: f64) -> Vec<ScaledIngredient> {
    ingredients
        .iter()
        .map(|ingredient| scale_ingredient(ingredient, multiplier))
        .collect()
}

/// Sum of scaled costs, rounded to one decimal
pub fn total_cost(ingredients: &[ScaledIngredient]) -> f64 {
    round_to(ingredients.iter().map(|i| i.cost).sum(), COST_PLACES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(name: &str, amount: &str, cost: f64) -> Ingredient {
        Ingredient {
            name: name.to_string(),
            amount: amount.to_string(),
            cost,
        }
    }

    #[test]
    fn test_end_to_end() {
        let scaled = scale_ingredient(&ingredient("עגבניות", "2 עגבניות", 4.0), 3.0);
        assert_eq!(
            scaled,
            ScaledIngredient {
                name: "עגבניות".to_string(),
                amount: "6 עגבניות".to_string(),
                cost: 12.0,
            }
        );
    }

    #[test]
    fn test_identity_at_unit_multiplier() {
        let scaled = scale_ingredient(&ingredient("סוכר", "½ כוס", 3.7), 1.0);
        assert_eq!(scaled.amount, "0.5 כוס");
        assert_eq!(scaled.cost, 3.7);

        assert_eq!(scale_amount("2 כוסות קמח", 1.0), "2 כוסות קמח");
        assert_eq!(scale_amount("3-4 ביצים", 1.0), "3-4 ביצים");
        assert_eq!(scale_amount("150 גרם", 1.0), "150 גרם");
    }

    #[test]
    fn test_non_numeric_untouched() {
        for m in [0.25, 1.0, 3.0, 7.5] {
            assert_eq!(scale_amount("קורט מלח", m), "קורט מלח");
            assert_eq!(scale_amount("לפי הטעם", m), "לפי הטעם");
        }
    }

    #[test]
    fn test_discrete_floor() {
        for m in [0.01, 0.1, 0.33, 0.5, 0.99] {
            let amount = scale_amount("3 ביצים", m);
            let count: f64 = amount.split(' ').next().unwrap().parse().unwrap();
            assert!(count >= 1.0);
            assert_eq!(count.fract(), 0.0);
        }
    }

    #[test]
    fn test_continuous_fractional() {
        assert_eq!(scale_amount("2 כוסות קמח", 0.5), "1 כוסות קמח");
        assert_eq!(scale_amount("150 גרם", 0.33), "49.5 גרם");
        assert_eq!(scale_amount("1 כף שמן זית", 0.5), "0.5 כף שמן זית");
    }

    #[test]
    fn test_range_no_double_application() {
        assert_eq!(scale_amount("3-4 ביצים", 2.0), "6-8 ביצים");
    }

    #[test]
    fn test_fraction_word_before_scaling() {
        assert_eq!(scale_amount("חצי בצל", 4.0), "2 בצל");
        assert_eq!(scale_amount("רבע כוס שמן", 2.0), "0.5 כוס שמן");
    }

    #[test]
    fn test_glyph_and_slash_scaling() {
        assert_eq!(scale_amount("1½ כוסות חלב", 2.0), "3 כוסות חלב");
        assert_eq!(scale_amount("1/2 כפית מלח", 3.0), "1.5 כפית מלח");
        assert_eq!(scale_amount("⅓ כוס", 3.0), "1 כוס");
    }

    #[test]
    fn test_unrecognized_numerals_pass_through() {
        assert_eq!(scale_amount("1.5/2 כוס", 2.0), "1.5/2 כוס");
        assert_eq!(scale_amount("2/0 כוס", 2.0), "2/0 כוס");
        assert_eq!(scale_amount("1/0 בצל", 2.0), "1/0 בצל");
        assert_eq!(scale_amount("1,500 גרם", 2.0), "1,500 גרם");
    }

    #[test]
    fn test_leading_dot_amount() {
        assert_eq!(scale_amount(".5 כוס", 2.0), "1 כוס");
    }

    #[test]
    fn test_name_never_altered() {
        let scaled = scale_ingredient(&ingredient("2 סוגי גבינה", "100 גרם", 10.0), 2.0);
        assert_eq!(scaled.name, "2 סוגי גבינה");
        assert_eq!(scaled.amount, "200 גרם");
    }

    #[test]
    fn test_cost_rounding_and_monotonicity() {
        assert_eq!(scale_cost(4.0, 3.0), 12.0);
        assert_eq!(scale_cost(2.5, 0.5), 1.3);
        assert_eq!(scale_cost(0.0, 5.0), 0.0);

        let multipliers = [0.1, 0.5, 1.0, 1.5, 2.0, 4.0, 10.0];
        for pair in multipliers.windows(2) {
            assert!(scale_cost(7.9, pair[0]) <= scale_cost(7.9, pair[1]));
        }
    }

    #[test]
    fn test_servings_multiplier() {
        assert_eq!(servings_multiplier(4.0, 1.0), Some(4.0));
        assert_eq!(servings_multiplier(3.0, 6.0), Some(0.5));
        assert_eq!(servings_multiplier(0.0, 1.0), None);
        assert_eq!(servings_multiplier(2.0, 0.0), None);
        assert_eq!(servings_multiplier(f64::NAN, 1.0), None);
    }

    #[test]
    fn test_scale_ingredients_and_total() {
        let ingredients = vec![
            ingredient("ביצים", "2 ביצים", 2.5),
            ingredient("קמח", "200 גרם", 1.2),
            ingredient("מלח", "קורט מלח", 0.0),
        ];
        let scaled = scale_ingredients(&ingredients, 2.0);
        assert_eq!(scaled.len(), 3);
        assert_eq!(scaled[0].amount, "4 ביצים");
        assert_eq!(scaled[1].amount, "400 גרם");
        assert_eq!(scaled[2].amount, "קורט מלח");
        assert_eq!(total_cost(&scaled), 7.4);
    }
}
