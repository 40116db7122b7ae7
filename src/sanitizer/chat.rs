use serde_json::Value;

use super::coerce::{
    clamp, field, first_finite, sanitize_category, sanitize_unit, to_string_or_empty,
    truncate_chars,
};
use super::{
    extract_food_nutrition, is_noise, sanitize_food_name, sum_nutrition, MAX_PORTION_AMOUNT,
    TOTAL_NUTRIENT_CEILING,
};
use crate::models::{ChatMealFood, ChatMealPayload, NutritionData};

/// Chat foods carry arbitrary units ("cup", "slice"), so no grams default
pub const CHAT_DEFAULT_UNIT: &str = "serving";
pub const DEFAULT_MEAL_TYPE: &str = "snack";
const MAX_MEAL_TYPE_CHARS: usize = 32;

/// Normalize the optional `mealData` block of a chat reply.
///
/// `None` means the turn carries no meal to register: the block is missing,
/// not an object, or none of its foods survived filtering. Declared totals
/// are preferred over the summed ones here, since chat food lists may only
/// be representative of the meal.
pub fn sanitize_chat_meal_data(raw: Option<&Value>) -> Option<ChatMealPayload> {
    let data = raw.filter(|v| v.is_object())?;

    let foods: Vec<ChatMealFood> = data
        .get("foods")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(sanitize_chat_food).collect())
        .unwrap_or_default();

    if foods.is_empty() {
        log::debug!("💬 Chat reply has no usable foods, skipping meal data");
        return None;
    }

    let summed = sum_nutrition(foods.iter().map(|f| &f.nutrition));
    let declared = data.get("totalNutrition").or_else(|| data.get("total_nutrition"));
    let total_nutrition = reconcile_totals(declared, &summed);

    if total_nutrition.calories != summed.calories {
        log::debug!(
            "💬 Declared calories {} differ from summed {}, keeping declared",
            total_nutrition.calories,
            summed.calories
        );
    }

    let meal_type = to_string_or_empty(data.get("mealType").or_else(|| data.get("meal_type")));
    let meal_type = if meal_type.is_empty() {
        DEFAULT_MEAL_TYPE.to_string()
    } else {
        truncate_chars(&meal_type, MAX_MEAL_TYPE_CHARS)
    };

    Some(ChatMealPayload {
        foods,
        total_nutrition,
        meal_type,
    })
}

fn sanitize_chat_food(entry: &Value) -> Option<ChatMealFood> {
    if !entry.is_object() {
        return None;
    }

    let name = sanitize_food_name(entry.get("name"))?;
    let portion = entry.get("portion");

    let amount = first_finite(&[entry.get("amount"), field(portion, "amount")]).unwrap_or(0.0);
    let amount = clamp(amount, 0.0, MAX_PORTION_AMOUNT);

    let nutrition = extract_food_nutrition(entry);
    if is_noise(amount, &nutrition) {
        log::debug!("🗑️ Dropping noise entry: {}", name);
        return None;
    }

    let unit_value = [entry.get("unit"), field(portion, "unit")]
        .into_iter()
        .find(|v| !to_string_or_empty(*v).is_empty())
        .flatten();

    Some(ChatMealFood {
        name,
        amount,
        unit: sanitize_unit(unit_value, CHAT_DEFAULT_UNIT),
        nutrition,
        category: sanitize_category(entry.get("category")),
    })
}

/// Declared value per field when finite, summed value otherwise. Fiber is
/// the exception: a declared 0 means "unknown", so the summed fiber is kept.
fn reconcile_totals(declared: Option<&Value>, summed: &NutritionData) -> NutritionData {
    let pick = |key: &str, fallback: f64| {
        first_finite(&[field(declared, key)])
            .map(|v| clamp(v, 0.0, TOTAL_NUTRIENT_CEILING))
            .unwrap_or(fallback)
    };

    NutritionData {
        calories: pick("calories", summed.calories as f64).round() as i64,
        protein: pick("protein", summed.protein),
        carbs: pick("carbs", summed.carbs),
        fat: pick("fat", summed.fat),
        fiber: first_finite(&[field(declared, "fiber")])
            .filter(|f| *f > 0.0)
            .map(|f| clamp(f, 0.0, TOTAL_NUTRIENT_CEILING))
            .or(summed.fiber),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodCategory;
    use serde_json::json;

    #[test]
    fn test_empty_foods_is_absent() {
        let raw = json!({"foods": [], "totalNutrition": {"calories": 300}, "mealType": "lunch"});
        assert!(sanitize_chat_meal_data(Some(&raw)).is_none());
    }

    #[test]
    fn test_missing_or_malformed_block_is_absent() {
        assert!(sanitize_chat_meal_data(None).is_none());
        assert!(sanitize_chat_meal_data(Some(&Value::Null)).is_none());
        assert!(sanitize_chat_meal_data(Some(&json!("pão"))).is_none());
        assert!(sanitize_chat_meal_data(Some(&json!({"foods": "pão"}))).is_none());
    }

    #[test]
    fn test_all_filtered_is_absent() {
        let raw = json!({"foods": [{"name": "table"}, {"name": "Água", "amount": 0}]});
        assert!(sanitize_chat_meal_data(Some(&raw)).is_none());
    }

    #[test]
    fn test_declared_totals_preferred() {
        let raw = json!({
            "foods": [{"name": "Pão francês", "amount": 1, "unit": "Unidade", "nutrition": {"calories": 135, "protein": 4.5, "carbs": 28, "fat": 1}}],
            "totalNutrition": {"calories": 270, "protein": "9", "carbs": null, "fat": -5},
            "mealType": "breakfast"
        });

        let payload = sanitize_chat_meal_data(Some(&raw)).unwrap();
        assert_eq!(payload.total_nutrition.calories, 270);
        assert_eq!(payload.total_nutrition.protein, 9.0);
        assert_eq!(payload.total_nutrition.carbs, 28.0);
        assert_eq!(payload.total_nutrition.fat, 0.0);
        assert_eq!(payload.meal_type, "breakfast");
        assert_eq!(payload.foods[0].unit, "unidade");
    }

    #[test]
    fn test_missing_totals_are_summed() {
        let raw = json!({
            "foods": [
                {"name": "Ovo", "amount": 2, "unit": "unit", "nutrition": {"calories": 140, "protein": 12, "carbs": 1, "fat": 10}},
                {"name": "Café", "portion": {"amount": 1, "unit": "cup"}, "calories": 2}
            ]
        });

        let payload = sanitize_chat_meal_data(Some(&raw)).unwrap();
        assert_eq!(payload.foods.len(), 2);
        assert_eq!(payload.total_nutrition.calories, 142);
        assert_eq!(payload.total_nutrition.protein, 12.0);
        assert_eq!(payload.total_nutrition.fiber, None);
        assert_eq!(payload.meal_type, DEFAULT_MEAL_TYPE);
        assert_eq!(payload.foods[1].amount, 1.0);
        assert_eq!(payload.foods[1].unit, "cup");
    }

    #[test]
    fn test_declared_totals_are_clamped() {
        let raw = json!({
            "foods": [{"name": "Bolo", "amount": 1, "calories": 400}],
            "total_nutrition": {"calories": 5e9, "fiber": 3}
        });

        let payload = sanitize_chat_meal_data(Some(&raw)).unwrap();
        assert_eq!(payload.total_nutrition.calories, 999_999);
        assert_eq!(payload.total_nutrition.fiber, Some(3.0));
    }

    #[test]
    fn test_declared_zero_fiber_keeps_summed_fiber() {
        let raw = json!({
            "foods": [
                {"name": "Aveia", "amount": 40, "unit": "g", "nutrition": {"calories": 150, "fiber": 4}},
                {"name": "Banana", "amount": 1, "unit": "unit", "nutrition": {"calories": 90, "fiber": 2.5}}
            ],
            "totalNutrition": {"calories": 0, "fiber": 0}
        });

        let payload = sanitize_chat_meal_data(Some(&raw)).unwrap();
        assert_eq!(payload.total_nutrition.fiber, Some(6.5));
        // a declared 0 still wins for the other fields
        assert_eq!(payload.total_nutrition.calories, 0);
    }

    #[test]
    fn test_declared_zero_fiber_without_food_fiber_stays_unknown() {
        let raw = json!({
            "foods": [{"name": "Arroz", "amount": 100, "calories": 130}],
            "totalNutrition": {"fiber": 0}
        });

        let payload = sanitize_chat_meal_data(Some(&raw)).unwrap();
        assert_eq!(payload.total_nutrition.fiber, None);
        assert_eq!(payload.total_nutrition.calories, 130);
    }

    #[test]
    fn test_chat_food_defaults() {
        let raw = json!({
            "foods": [{"name": "Maçã", "amount": "1", "unit": "", "category": "FRUIT", "carbs": 25}],
            "mealType": 7
        });

        let payload = sanitize_chat_meal_data(Some(&raw)).unwrap();
        let food = &payload.foods[0];
        assert_eq!(food.unit, CHAT_DEFAULT_UNIT);
        assert_eq!(food.category, FoodCategory::Fruit);
        assert_eq!(food.nutrition.carbs, 25.0);
        assert_eq!(payload.meal_type, DEFAULT_MEAL_TYPE);
    }
}
