//! Schema boundary between the vision provider's free-form JSON and the
//! typed meal records handed to clients.
//!
//! Exactly one condition is a hard failure: the provider explicitly
//! answering `is_food: false`. Everything else is repaired in place or the
//! offending food entry is dropped.

pub mod chat;
pub mod coerce;
pub mod non_food;
pub mod vision;

pub use chat::sanitize_chat_meal_data;
pub use non_food::is_clearly_non_food_name;
pub use vision::sanitize_vision_analysis_result;

use serde_json::Value;

use crate::models::NutritionData;
use coerce::{clamp, field, first_finite, to_string_or_empty, truncate_chars};

/// Ceiling for every per-food nutrition value
pub const FOOD_NUTRIENT_CEILING: f64 = 99_999.0;
/// Ceiling for aggregated totals
pub const TOTAL_NUTRIENT_CEILING: f64 = 999_999.0;
pub const MAX_PORTION_AMOUNT: f64 = 9_999.99;

pub const MAX_NAME_CHARS: usize = 120;
pub const MAX_TEXT_CHARS: usize = 2_000;

/// Trimmed, bounded food name. `None` means the entry must be dropped.
fn sanitize_food_name(v: Option<&Value>) -> Option<String> {
    let name = truncate_chars(&to_string_or_empty(v), MAX_NAME_CHARS);
    if name.is_empty() {
        log::debug!("🗑️ Dropping food entry without a name");
        return None;
    }
    if is_clearly_non_food_name(&name) {
        log::debug!("🗑️ Dropping non-food entry: {}", name);
        return None;
    }
    Some(name)
}

/// Per-food nutrition, nested `nutrition.X` first and flat `X` second
fn extract_food_nutrition(entry: &Value) -> NutritionData {
    let nested = field(Some(entry), "nutrition");
    let lookup = |key: &str| first_finite(&[field(nested, key), field(Some(entry), key)]);
    let macro_value = |key: &str| clamp(lookup(key).unwrap_or(0.0), 0.0, FOOD_NUTRIENT_CEILING);

    NutritionData {
        calories: macro_value("calories").round() as i64,
        protein: macro_value("protein"),
        carbs: macro_value("carbs"),
        fat: macro_value("fat"),
        fiber: lookup("fiber")
            .filter(|f| *f > 0.0)
            .map(|f| clamp(f, 0.0, FOOD_NUTRIENT_CEILING)),
    }
}

/// Zero portion and zero macros: a filler row, not a food
fn is_noise(amount: f64, nutrition: &NutritionData) -> bool {
    amount == 0.0 && nutrition.has_no_macros()
}

/// Field-wise sum, clamped to the totals ceiling. Fiber stays `None` unless
/// at least one item reports it.
fn sum_nutrition<'a>(items: impl IntoIterator<Item = &'a NutritionData>) -> NutritionData {
    let mut total = NutritionData::default();
    for n in items {
        total.calories += n.calories;
        total.protein += n.protein;
        total.carbs += n.carbs;
        total.fat += n.fat;
        if let Some(fiber) = n.fiber {
            total.fiber = Some(total.fiber.unwrap_or(0.0) + fiber);
        }
    }

    NutritionData {
        calories: total.calories.clamp(0, TOTAL_NUTRIENT_CEILING as i64),
        protein: clamp(total.protein, 0.0, TOTAL_NUTRIENT_CEILING),
        carbs: clamp(total.carbs, 0.0, TOTAL_NUTRIENT_CEILING),
        fat: clamp(total.fat, 0.0, TOTAL_NUTRIENT_CEILING),
        fiber: total.fiber.map(|f| clamp(f, 0.0, TOTAL_NUTRIENT_CEILING)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_nutrition_wins_over_flat() {
        let entry = json!({
            "nutrition": {"calories": 200, "protein": "4"},
            "calories": 999,
            "protein": 50,
            "carbs": 45,
        });
        let n = extract_food_nutrition(&entry);
        assert_eq!(n.calories, 200);
        assert_eq!(n.protein, 4.0);
        assert_eq!(n.carbs, 45.0);
        assert_eq!(n.fat, 0.0);
        assert_eq!(n.fiber, None);
    }

    #[test]
    fn test_invalid_nested_value_falls_back_to_flat() {
        let entry = json!({"nutrition": {"fat": null}, "fat": 3.5});
        assert_eq!(extract_food_nutrition(&entry).fat, 3.5);
    }

    #[test]
    fn test_nutrition_is_clamped() {
        let entry = json!({"nutrition": {"calories": -10, "protein": 1e9, "fiber": -2}});
        let n = extract_food_nutrition(&entry);
        assert_eq!(n.calories, 0);
        assert_eq!(n.protein, FOOD_NUTRIENT_CEILING);
        assert_eq!(n.fiber, None);
    }

    #[test]
    fn test_sum_keeps_fiber_unknown_when_nobody_reports_it() {
        let a = NutritionData {
            calories: 100,
            protein: 1.0,
            carbs: 2.0,
            fat: 3.0,
            fiber: None,
        };
        let b = NutritionData {
            calories: 50,
            protein: 1.0,
            carbs: 0.0,
            fat: 0.5,
            fiber: None,
        };
        let total = sum_nutrition([&a, &b]);
        assert_eq!(total.calories, 150);
        assert_eq!(total.fat, 3.5);
        assert_eq!(total.fiber, None);

        let c = NutritionData { fiber: Some(2.5), ..b };
        assert_eq!(sum_nutrition([&a, &c]).fiber, Some(2.5));
    }

    #[test]
    fn test_food_name_filter() {
        assert_eq!(sanitize_food_name(Some(&json!(" Arroz "))), Some("Arroz".to_string()));
        assert_eq!(sanitize_food_name(Some(&json!("plate"))), None);
        assert_eq!(sanitize_food_name(Some(&json!(""))), None);
        assert_eq!(sanitize_food_name(Some(&json!(12))), None);
    }
}
