use crate::config::GeminiConfig;
use crate::error::ExtractError;
use crate::providers::LlmProvider;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Google Gemini provider from configuration and a resolved API key
    pub fn new(config: &GeminiConfig, api_key: impl Into<String>) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(GeminiProvider {
            client,
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "contents": [{
                "parts": [{
                    "text": prompt
                }]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens
            }
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ExtractError> {
        // Google Gemini API endpoint
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&self.request_body(prompt))
            .send()
            .await
            // The request URL carries the API key
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::api(status.as_u16(), &body));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)?;
        debug!("Google Gemini response: {:?}", response_body);

        response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or(ExtractError::EmptyResponse)
    }
}
