use serde_json::Value;

use super::coerce::{
    clamp, field, first_finite, sanitize_category, to_finite_number, to_string_or_empty,
    truncate_chars,
};
use super::{
    extract_food_nutrition, is_noise, sanitize_food_name, sum_nutrition, MAX_PORTION_AMOUNT,
    MAX_TEXT_CHARS,
};
use crate::errors::{AppError, DEFAULT_NOT_FOOD_MESSAGE};
use crate::models::{DetectedFood, MealAnalysisSummary, Portion, VisionAnalysisResult};

const DEFAULT_HEALTH_SCORE: f64 = 50.0;
const DEFAULT_CONFIDENCE: f64 = 0.5;
const MAX_INGREDIENTS: usize = 32;
const MAX_INGREDIENT_CHARS: usize = 80;
const MAX_SHORT_TEXT_CHARS: usize = 64;

/// Normalize a full meal-photo analysis from the vision provider.
///
/// Fails only when the provider explicitly says `is_food: false`; the food
/// list is not looked at in that case. `totalNutrition` is always the sum
/// of the accepted foods, whatever the provider declared.
pub fn sanitize_vision_analysis_result(raw: &Value) -> Result<VisionAnalysisResult, AppError> {
    if raw.get("is_food") == Some(&Value::Bool(false)) {
        let provided = truncate_chars(&to_string_or_empty(raw.get("error")), MAX_TEXT_CHARS);
        let message = if provided.is_empty() {
            DEFAULT_NOT_FOOD_MESSAGE.to_string()
        } else {
            provided
        };
        log::info!("🚫 Provider rejected image as not food: {}", message);
        return Err(AppError::InvalidFoodImage(message));
    }

    let entries = raw.get("foods").and_then(Value::as_array);
    let foods: Vec<DetectedFood> = entries
        .map(|items| items.iter().filter_map(sanitize_detected_food).collect())
        .unwrap_or_default();

    log::debug!(
        "🥗 Accepted {} of {} food entries",
        foods.len(),
        entries.map_or(0, |items| items.len())
    );

    let total_nutrition = sum_nutrition(foods.iter().map(|f| &f.nutrition));
    let meal_analysis = sanitize_meal_analysis(raw.get("meal_analysis"));

    Ok(VisionAnalysisResult {
        is_food: true,
        error: None,
        reasoning: truncate_chars(&to_string_or_empty(raw.get("reasoning")), MAX_TEXT_CHARS),
        foods,
        meal_analysis,
        total_nutrition,
    })
}

fn sanitize_detected_food(entry: &Value) -> Option<DetectedFood> {
    if !entry.is_object() {
        log::debug!("🗑️ Skipping non-object food entry");
        return None;
    }

    let name = sanitize_food_name(entry.get("name"))?;

    let amount = first_finite(&[
        entry.get("portion_grams"),
        field(entry.get("portion"), "amount"),
        entry.get("portion_amount"),
    ])
    .unwrap_or(0.0);
    let amount = clamp(amount, 0.0, MAX_PORTION_AMOUNT);

    let nutrition = extract_food_nutrition(entry);
    if is_noise(amount, &nutrition) {
        log::debug!("🗑️ Dropping noise entry: {}", name);
        return None;
    }

    let portion_display = truncate_chars(
        &to_string_or_empty(entry.get("portion_display")),
        MAX_SHORT_TEXT_CHARS,
    );
    let portion_display = if portion_display.is_empty() {
        format!("{} g", format_amount(amount))
    } else {
        portion_display
    };

    Some(DetectedFood {
        name,
        confidence: clamp(to_finite_number(entry.get("confidence"), DEFAULT_CONFIDENCE), 0.0, 1.0),
        portion: Portion {
            amount,
            // grams only on this path
            unit: "g".to_string(),
        },
        nutrition,
        category: sanitize_category(entry.get("category")),
        detected_ingredients: sanitize_ingredients(entry.get("detected_ingredients")),
        portion_display,
        portion_grams: amount,
    })
}

fn sanitize_ingredients(v: Option<&Value>) -> Vec<String> {
    let Some(items) = v.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| truncate_chars(&to_string_or_empty(Some(item)), MAX_INGREDIENT_CHARS))
        .filter(|s| !s.is_empty())
        .take(MAX_INGREDIENTS)
        .collect()
}

fn sanitize_meal_analysis(v: Option<&Value>) -> MealAnalysisSummary {
    MealAnalysisSummary {
        health_score: clamp(
            to_finite_number(field(v, "health_score"), DEFAULT_HEALTH_SCORE),
            0.0,
            100.0,
        ),
        health_feedback: truncate_chars(
            &to_string_or_empty(field(v, "health_feedback")),
            MAX_TEXT_CHARS,
        ),
        dominant_macro: truncate_chars(
            &to_string_or_empty(field(v, "dominant_macro")),
            MAX_SHORT_TEXT_CHARS,
        ),
    }
}

/// "150", "150.5", "0.25"
fn format_amount(amount: f64) -> String {
    let s = format!("{:.2}", amount);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
