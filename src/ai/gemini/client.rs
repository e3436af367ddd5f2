use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::{Error, Result};
use reqwest::Client;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// `generateContent` transport for the routine generator.
pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    /// `model` is the bare model ID (`gemini-2.5-flash`); a leading
    /// `models/` segment is stripped.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        let model = match model.strip_prefix("models/") {
            Some(bare) => bare.to_string(),
            None => model,
        };

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Sends one routine request. Every failure is an `AiProvider` error
    /// naming the model, so a degraded routine can be traced in the logs.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(self.generate_url())
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Routine request to {} failed: {}", self.model, e);
                Error::AiProvider(format!("routine request to {} failed: {}", self.model, e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Could not read routine reply from {}: {}", self.model, e);
            Error::AiProvider(format!("routine reply from {} unreadable: {}", self.model, e))
        })?;

        if !status.is_success() {
            tracing::error!("Routine model {} answered {}: {}", self.model, status, body);
            return Err(Error::AiProvider(format!(
                "routine model {} answered {}",
                self.model, status
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                "Routine reply from {} is not a generateContent response: {}\nBody: {}",
                self.model,
                e,
                body
            );
            Error::AiProvider(format!(
                "routine reply from {} is not a generateContent response: {}",
                self.model, e
            ))
        })
    }
}
