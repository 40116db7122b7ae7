use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{ChatRequest, ChatResponse};
use crate::sanitizer::sanitize_chat_meal_data;
use crate::services::VisionProvider;

const MAX_MESSAGE_CHARS: usize = 4_000;
const MAX_HISTORY_TURNS: usize = 20;

pub struct ChatHandler {
    provider: Arc<dyn VisionProvider>,
}

impl ChatHandler {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self { provider }
    }

    /// Conversational turn. `mealData` is only present when the reply
    /// describes at least one usable food.
    pub async fn handle_chat(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(AppError::InvalidRequest("message must not be empty".to_string()));
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AppError::InvalidRequest(format!(
                "message is longer than {} characters",
                MAX_MESSAGE_CHARS
            )));
        }

        // Most recent turns only
        let skip = request.history.len().saturating_sub(MAX_HISTORY_TURNS);
        let history = &request.history[skip..];

        log::info!("💬 Chat message ({} chars, {} history turns)", message.chars().count(), history.len());

        let answer = self.provider.chat(message, history).await?;
        let meal_data = sanitize_chat_meal_data(answer.meal_data.as_ref());

        if let Some(meal) = &meal_data {
            log::info!(
                "🍽️ Chat reply carries a {} with {} foods ({} kcal)",
                meal.meal_type,
                meal.foods.len(),
                meal.total_nutrition.calories
            );
        }

        Ok(ChatResponse {
            reply: answer.reply,
            meal_data,
        })
    }
}
