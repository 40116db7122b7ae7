use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout:free";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub openrouter_model: String,
    pub bind_addr: String,
    pub max_body_bytes: usize,
    pub provider_timeout: Duration,
}

impl Config {
    /// Reads the process environment (call `dotenv()` first)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let openrouter_api_key = lookup("OPENROUTER_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .context("OPENROUTER_API_KEY must be set in .env file")?;

        let openrouter_model = lookup("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(v) => v.trim().parse().with_context(|| format!("Invalid MAX_BODY_BYTES: {}", v))?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        let timeout_secs: u64 = match lookup("PROVIDER_TIMEOUT_SECS") {
            Some(v) => v.trim().parse().with_context(|| format!("Invalid PROVIDER_TIMEOUT_SECS: {}", v))?,
            None => DEFAULT_PROVIDER_TIMEOUT_SECS,
        };

        Ok(Self {
            openrouter_api_key,
            openrouter_model,
            bind_addr,
            max_body_bytes,
            provider_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
