use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};
use crate::ai::RoutineService;
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct RoutineOutput {
    recommendations: String,
}

/// Generates skincare routine text for a predicted condition via Gemini.
pub struct GeminiRoutineClient {
    http: GeminiHttpClient,
}

impl GeminiRoutineClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(60),
                client,
            ),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn build_request(condition: &str, probability: f64) -> GenerateContentRequest {
        let probability = probability.to_string();

        GenerateContentRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: prompts::ROUTINE_SYSTEM.to_string(),
                }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompts::render(
                        prompts::ROUTINE_USER,
                        &[("condition", condition), ("probability", &probability)],
                    ),
                }],
            }],
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(4096),
                response_mime_type: Some("application/json".to_string()),
            }),
        }
    }
}

#[async_trait]
impl RoutineService for GeminiRoutineClient {
    async fn generate_routine(&self, condition: &str, probability: f64) -> Result<String> {
        tracing::debug!(
            "Requesting routine for {} (probability {}) from Gemini model {}",
            condition,
            probability,
            self.http.model()
        );

        let request = Self::build_request(condition, probability);
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let text = response.first_text().ok_or_else(|| {
            Error::AiProvider(format!(
                "routine reply from {} has no text for {}",
                self.http.model(),
                condition
            ))
        })?;

        let output: RoutineOutput = serde_json::from_str(text.trim()).map_err(|e| {
            tracing::error!("Routine text for {} is not JSON: {}\nText: {}", condition, e, text);
            Error::AiProvider(format!(
                "routine text for {} lacks a recommendations field: {}",
                condition, e
            ))
        })?;

        Ok(output.recommendations)
    }
}
