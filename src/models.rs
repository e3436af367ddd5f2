//! Data models and structures
//!
//! Defines the prediction and outcome types exchanged with the inference
//! service and handed to the caller, plus the environment configuration.

use serde::{Deserialize, Serialize};

const DEFAULT_ROUTINE_MODEL: &str = "gemini-2.5-flash";

/// A single (condition label, probability) pair from the inference service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub condition: String,
    pub probability: f64,
}

// Inference service request/response models
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest<'a> {
    pub photo_data_uri: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct PredictionResponse {
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSuccess {
    pub predictions: Vec<Prediction>,
    pub recommendations: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Input,
    Config,
    Transport,
    Format,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisFailure {
    pub error: String,
    #[serde(skip)]
    pub kind: FailureKind,
}

/// Result of one analysis: exactly one of success or failure.
///
/// Serialized untagged, so the JSON is either
/// `{"predictions": [...], "recommendations": "..."}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Success(AnalysisSuccess),
    Failure(AnalysisFailure),
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }

    pub fn success(&self) -> Option<&AnalysisSuccess> {
        match self {
            AnalysisOutcome::Success(success) => Some(success),
            AnalysisOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&AnalysisFailure> {
        match self {
            AnalysisOutcome::Success(_) => None,
            AnalysisOutcome::Failure(failure) => Some(failure),
        }
    }
}

// Configuration
pub const ANALYSIS_API_URL_VAR: &str = "PYTHON_API_URL";

/// Reads the inference endpoint from the process environment.
///
/// Called on every request, so a value set after startup is picked up.
pub fn analysis_api_url_from_env() -> Option<String> {
    std::env::var(ANALYSIS_API_URL_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Settings for the optional routine generator.
///
/// The inference endpoint is not part of this snapshot; see
/// [`analysis_api_url_from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    pub routine_enabled: bool,
    pub gemini_api_key: Option<String>,
    pub routine_model: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Broken routine settings turn
    /// routine generation off rather than failing, since analysis does not
    /// depend on them.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let requested = match non_empty("ROUTINE_ENABLED") {
            Some(value) => parse_flag(&value).unwrap_or_else(|| {
                tracing::warn!(
                    "ROUTINE_ENABLED has invalid value '{}', routine generation disabled",
                    value
                );
                false
            }),
            None => false,
        };

        let gemini_api_key = non_empty("GEMINI_API_KEY");
        let routine_enabled = requested && gemini_api_key.is_some();
        if requested && !routine_enabled {
            tracing::warn!(
                "ROUTINE_ENABLED is on but GEMINI_API_KEY is not set, routine generation disabled"
            );
        }

        Self {
            routine_enabled,
            gemini_api_key,
            routine_model: non_empty("ROUTINE_MODEL")
                .unwrap_or_else(|| DEFAULT_ROUTINE_MODEL.to_string()),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
