use anyhow::Result;
use serde_json::Value;

use crate::models::ChatTurn;

/// What a chat completion gave back, before any sanitizing
#[derive(Debug, Clone, Default)]
pub struct ProviderChatReply {
    pub reply: String,
    /// Raw `mealData` block, if the model produced one
    pub meal_data: Option<Value>,
}

/// Trait for vision/LLM providers (OpenRouter, OpenAI, ...)
#[async_trait::async_trait]
pub trait VisionProvider: Send + Sync {
    /// Raw JSON analysis of a meal photo
    async fn analyze_meal_image(&self, image: &[u8], mime_type: &str) -> Result<Value>;
    async fn chat(&self, message: &str, history: &[ChatTurn]) -> Result<ProviderChatReply>;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Provider returning canned answers
    pub struct MockProvider {
        pub analysis: Value,
        pub chat: ProviderChatReply,
        pub fail: bool,
    }

    impl MockProvider {
        pub fn with_analysis(analysis: Value) -> Self {
            Self {
                analysis,
                chat: ProviderChatReply::default(),
                fail: false,
            }
        }

        pub fn with_chat(reply: &str, meal_data: Option<Value>) -> Self {
            Self {
                analysis: Value::Null,
                chat: ProviderChatReply {
                    reply: reply.to_string(),
                    meal_data,
                },
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                analysis: Value::Null,
                chat: ProviderChatReply::default(),
                fail: true,
            }
        }
    }

    #[async_trait::async_trait]
    impl VisionProvider for MockProvider {
        async fn analyze_meal_image(&self, _image: &[u8], _mime_type: &str) -> Result<Value> {
            if self.fail {
                anyhow::bail!("upstream unavailable");
            }
            Ok(self.analysis.clone())
        }

        async fn chat(&self, _message: &str, _history: &[ChatTurn]) -> Result<ProviderChatReply> {
            if self.fail {
                anyhow::bail!("upstream unavailable");
            }
            Ok(self.chat.clone())
        }
    }
}
