use serde_json::Value;

use crate::error::{AppError, Result};
use crate::prompt::GenerationRequest;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Substituted when the service answers with empty or whitespace-only text.
pub const FALLBACK_ACTIVITY: &str =
    "Share one thing you appreciate about each other's presence today.";

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub temperature: f32,
}

impl GeneratorConfig {
    pub fn new(api_key: String) -> Self {
        GeneratorConfig {
            model: DEFAULT_MODEL.to_string(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Client for the external generation capability. Exactly one attempt per
/// call: no retry, no internal timeout.
pub struct ActivityClient {
    config: GeneratorConfig,
    http_client: reqwest::Client,
}

impl ActivityClient {
    pub fn new(config: GeneratorConfig) -> Self {
        ActivityClient {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Invoke the generation service and normalize its answer. Any transport
    /// error, error response, or malformed body is reported as `Err`; the
    /// caller must not touch application state in that case.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            self.config.api_key,
        );

        let body = serde_json::json!({
            "system_instruction": {
                "parts": [{ "text": request.instruction }]
            },
            "contents": [{
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": {
                "temperature": self.config.temperature
            }
        });

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Generation(format!(
                "Generation service returned {}",
                response.status()
            )));
        }

        let response_json: Value = response.json().await?;
        let text = extract_text(&response_json)
            .ok_or_else(|| AppError::Generation("Invalid generation response format".to_string()))?;

        Ok(normalize_activity(text))
    }
}

fn extract_text(value: &Value) -> Option<&str> {
    value["candidates"][0]["content"]["parts"][0]["text"].as_str()
}

/// Trim the generated text; an empty result substitutes the fixed fallback.
pub fn normalize_activity(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        FALLBACK_ACTIVITY.to_string()
    } else {
        trimmed.to_string()
    }
}
