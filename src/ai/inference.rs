use super::InferenceService;
use crate::data_uri::DataUri;
use crate::models::{
    analysis_api_url_from_env, AnalysisRequest, Prediction, PredictionResponse,
};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

/// Resolves the inference endpoint; `None` means not configured.
pub type EndpointLookup = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Client for the Python inference service's `/predict` endpoint.
///
/// The endpoint is resolved on every call. No request timeout is set; the
/// `reqwest` default applies.
pub struct InferenceClient {
    client: Client,
    endpoint: EndpointLookup,
}

impl InferenceClient {
    /// Client with a fixed endpoint.
    pub fn new(endpoint: Option<String>) -> Self {
        Self::new_with_lookup(Arc::new(move || endpoint.clone()), Client::new())
    }

    /// Client that reads `PYTHON_API_URL` from the environment per request.
    pub fn from_env_with_client(client: Client) -> Self {
        Self::new_with_lookup(Arc::new(analysis_api_url_from_env), client)
    }

    pub fn new_with_lookup(endpoint: EndpointLookup, client: Client) -> Self {
        Self { client, endpoint }
    }

    /// The endpoint the next request would use.
    pub fn endpoint(&self) -> Option<String> {
        (self.endpoint)()
    }

    fn parse_predictions(body: &str) -> Result<Vec<Prediction>> {
        let response: PredictionResponse = serde_json::from_str(body).map_err(|e| {
            tracing::error!("Invalid data format from analysis model: {}\nBody: {}", e, body);
            Error::Format(e.to_string())
        })?;

        for (index, prediction) in response.predictions.iter().enumerate() {
            if prediction.condition.trim().is_empty() {
                tracing::error!("Prediction {} has an empty condition label", index);
                return Err(Error::Format(format!(
                    "prediction {} has an empty condition",
                    index
                )));
            }
            if !(0.0..=1.0).contains(&prediction.probability) {
                tracing::error!(
                    "Prediction {} ({}) has out-of-range probability {}",
                    index,
                    prediction.condition,
                    prediction.probability
                );
                return Err(Error::Format(format!(
                    "prediction {} has probability {} outside [0, 1]",
                    index, prediction.probability
                )));
            }
        }

        Ok(response.predictions)
    }
}

#[async_trait]
impl InferenceService for InferenceClient {
    async fn predict(&self, image: &DataUri) -> Result<Vec<Prediction>> {
        let endpoint = self.endpoint().ok_or_else(|| {
            tracing::error!("PYTHON_API_URL environment variable is not set");
            Error::Config("PYTHON_API_URL environment variable is not set".to_string())
        })?;

        tracing::info!("Calling analysis model at: {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&AnalysisRequest {
                photo_data_uri: image.as_str(),
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to analysis model: {}", e);
                Error::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read analysis model response (status {}): {}", status, e);
            Error::Transport(e.to_string())
        })?;

        if !status.is_success() {
            tracing::error!("Analysis model error (status {}): {}", status, body);
            return Err(Error::Transport(format!(
                "request failed with status {}",
                status
            )));
        }

        let predictions = Self::parse_predictions(&body)?;
        tracing::debug!("Analysis model returned {} predictions", predictions.len());
        Ok(predictions)
    }
}
