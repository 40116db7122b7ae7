pub mod openrouter; // OpenRouter vision/chat provider
pub mod provider;

pub use openrouter::OpenRouterService;
pub use provider::VisionProvider;
