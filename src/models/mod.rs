use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Protein,
    Carb,
    Vegetable,
    Fruit,
    Dairy,
    Fat,
    Mixed,
}

impl FoodCategory {
    /// Exact match on the lowercase name, nothing else
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "protein" => Some(FoodCategory::Protein),
            "carb" => Some(FoodCategory::Carb),
            "vegetable" => Some(FoodCategory::Vegetable),
            "fruit" => Some(FoodCategory::Fruit),
            "dairy" => Some(FoodCategory::Dairy),
            "fat" => Some(FoodCategory::Fat),
            "mixed" => Some(FoodCategory::Mixed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionData {
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>, // None = unknown, never coerced to 0
}

impl NutritionData {
    /// True when all four macros are zero (fiber is not a macro here)
    pub fn has_no_macros(&self) -> bool {
        self.calories == 0 && self.protein == 0.0 && self.carbs == 0.0 && self.fat == 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portion {
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFood {
    pub name: String,
    pub confidence: f64,
    pub portion: Portion,
    pub nutrition: NutritionData,
    pub category: FoodCategory,
    pub detected_ingredients: Vec<String>,
    pub portion_display: String,
    pub portion_grams: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealAnalysisSummary {
    pub health_score: f64,
    pub health_feedback: String,
    pub dominant_macro: String,
}

/// Accepted meal-photo analysis. Only ever built by the sanitizer, so
/// `is_food` is always true and `error` always null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionAnalysisResult {
    pub is_food: bool,
    pub error: Option<String>,
    pub reasoning: String,
    pub foods: Vec<DetectedFood>,
    pub meal_analysis: MealAnalysisSummary,
    #[serde(rename = "totalNutrition")]
    pub total_nutrition: NutritionData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMealFood {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub nutrition: NutritionData,
    pub category: FoodCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMealPayload {
    pub foods: Vec<ChatMealFood>,
    #[serde(rename = "totalNutrition")]
    pub total_nutrition: NutritionData,
    #[serde(rename = "mealType")]
    pub meal_type: String,
}

// ----- HTTP DTOs -----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeMealRequest {
    pub image_base64: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeMealResponse {
    pub success: bool,
    pub analysis: VisionAnalysisResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(rename = "mealData")]
    pub meal_data: Option<ChatMealPayload>,
}
