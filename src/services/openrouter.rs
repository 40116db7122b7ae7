use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::provider::{ProviderChatReply, VisionProvider};
use crate::models::ChatTurn;
use crate::sanitizer::coerce::to_string_or_empty;

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

const MEAL_ANALYSIS_PROMPT: &str = "You are a nutrition analysis expert. Look carefully at this meal photo.\n\
\n\
1. Decide whether the photo shows food. If it does not, answer only \
{\"is_food\": false, \"error\": \"<short reason in Brazilian Portuguese>\"}.\n\
2. Otherwise list every food you can see, estimating each portion in grams and its nutrition for that portion.\n\
3. Ignore plates, cutlery, tables and other non-food objects.\n\
\n\
Answer with ONLY one JSON object in this exact shape:\n\
{\"is_food\": true, \"reasoning\": \"...\", \"foods\": [{\"name\": \"...\", \"confidence\": 0.0-1.0, \
\"portion_grams\": 0, \"portion_display\": \"...\", \"category\": \"protein|carb|vegetable|fruit|dairy|fat|mixed\", \
\"detected_ingredients\": [\"...\"], \"nutrition\": {\"calories\": 0, \"protein\": 0, \"carbs\": 0, \"fat\": 0, \"fiber\": 0}}], \
\"meal_analysis\": {\"health_score\": 0-100, \"health_feedback\": \"...\", \"dominant_macro\": \"protein|carbs|fat\"}}";

const CHAT_SYSTEM_PROMPT: &str = "You are a friendly nutrition assistant. Reply in Brazilian Portuguese.\n\
When the user describes something they ate, also estimate it as a meal.\n\
Answer with ONLY one JSON object: {\"reply\": \"<your message>\", \"mealData\": null} or \
{\"reply\": \"...\", \"mealData\": {\"mealType\": \"breakfast|lunch|dinner|snack\", \
\"foods\": [{\"name\": \"...\", \"amount\": 0, \"unit\": \"g|ml|cup|slice|unit\", \"category\": \"...\", \
\"nutrition\": {\"calories\": 0, \"protein\": 0, \"carbs\": 0, \"fat\": 0, \"fiber\": 0}}], \
\"totalNutrition\": {\"calories\": 0, \"protein\": 0, \"carbs\": 0, \"fat\": 0, \"fiber\": 0}}}";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

impl ChatMessage {
    fn text(role: &str, text: &str) -> Self {
        Self {
            role: role.to_string(),
            content: vec![ContentPart::Text {
                content_type: "text".to_string(),
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        #[serde(rename = "type")]
        content_type: String,
        text: String
    },
    ImageUrl {
        #[serde(rename = "type")]
        content_type: String,
        image_url: ImageData
    },
}

#[derive(Debug, Serialize)]
struct ImageData {
    url: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: String,
}

pub struct OpenRouterService {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenRouterService {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            model,
            client,
        })
    }

    async fn complete(&self, messages: Vec<ChatMessage>, max_tokens: u32) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens,
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        };

        log::info!("🤖 Sending request to OpenRouter with model: {}", self.model);
        log::debug!("📤 Request payload size: {} bytes", serde_json::to_string(&request)?.len());

        let response = self
            .client
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "Meal Vision Backend")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        log::debug!("📥 OpenRouter response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await?;
            log::error!("❌ OpenRouter API error response: {}", error_text);
            anyhow::bail!("OpenRouter API error ({}): {}", status, error_text);
        }

        let chat_response: ChatResponse = response.json().await?;
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("OpenRouter returned no choices"))?;

        log::debug!("💬 OpenRouter response content: {}", content);
        Ok(content)
    }
}

#[async_trait::async_trait]
impl VisionProvider for OpenRouterService {
    async fn analyze_meal_image(&self, image: &[u8], mime_type: &str) -> Result<Value> {
        log::debug!("📊 Image size: {} bytes ({})", image.len(), mime_type);

        let data_url = format!("data:{};base64,{}", mime_type, general_purpose::STANDARD.encode(image));

        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: vec![
                ContentPart::Text {
                    content_type: "text".to_string(),
                    text: MEAL_ANALYSIS_PROMPT.to_string(),
                },
                ContentPart::ImageUrl {
                    content_type: "image_url".to_string(),
                    image_url: ImageData { url: data_url },
                },
            ],
        }];

        let content = self.complete(messages, 1500).await?;
        extract_json_object(&content)
    }

    async fn chat(&self, message: &str, history: &[ChatTurn]) -> Result<ProviderChatReply> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::text("system", CHAT_SYSTEM_PROMPT));
        for turn in history {
            messages.push(ChatMessage::text(&turn.role.to_string(), &turn.content));
        }
        messages.push(ChatMessage::text("user", message));

        let content = self.complete(messages, 1000).await?;
        Ok(parse_chat_content(&content))
    }
}

/// Pull the JSON object out of a model answer, tolerating ```json fences
/// and prose around it
pub fn extract_json_object(content: &str) -> Result<Value> {
    let trimmed = content.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => serde_json::from_str(&trimmed[start..=end])
            .context("Model answer contains malformed JSON"),
        _ => anyhow::bail!("Model answer contains no JSON object"),
    }
}

/// Chat answers that are not JSON are kept as plain text with no meal data
fn parse_chat_content(content: &str) -> ProviderChatReply {
    match extract_json_object(content) {
        Ok(value) if value.is_object() => {
            let reply = to_string_or_empty(value.get("reply").or_else(|| value.get("message")));
            let meal_data = value
                .get("mealData")
                .or_else(|| value.get("meal_data"))
                .filter(|v| !v.is_null())
                .cloned();
            ProviderChatReply { reply, meal_data }
        }
        _ => {
            log::warn!("Chat answer was not JSON, using it as plain text");
            ProviderChatReply {
                reply: content.trim().to_string(),
                meal_data: None,
            }
        }
    }
}
