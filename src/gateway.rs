//! The analysis gateway: validates the image, forwards it to the inference
//! service and turns every outcome into an [`AnalysisOutcome`].

use crate::ai::{GeminiRoutineClient, InferenceClient, InferenceService, RoutineService};
use crate::data_uri::DataUri;
use crate::models::{
    analysis_api_url_from_env, AnalysisFailure, AnalysisOutcome, AnalysisSuccess, Config,
    Prediction,
};
use crate::{Error, Result};
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// Forwards images to the inference service and normalizes its replies.
pub struct Gateway {
    inference: Box<dyn InferenceService>,
    routine: Option<Box<dyn RoutineService>>,
}

/// Injectable service bundle used to construct [`Gateway`] in tests/harnesses.
pub struct GatewayServices {
    pub inference: Box<dyn InferenceService>,
    /// `None` keeps routine generation off and recommendations empty.
    pub routine: Option<Box<dyn RoutineService>>,
}

impl Gateway {
    pub fn with_services(services: GatewayServices) -> Self {
        Self {
            inference: services.inference,
            routine: services.routine,
        }
    }

    /// Build a gateway from configuration.
    ///
    /// The inference endpoint is read from `PYTHON_API_URL` on every
    /// `analyze` call, so a missing value only fails the requests made while
    /// it is unset.
    pub fn from_config(config: &Config) -> Self {
        let http_client = reqwest::Client::new();

        if analysis_api_url_from_env().is_none() {
            warn!("PYTHON_API_URL is not set; analysis requests will fail until it is configured");
        }

        let routine: Option<Box<dyn RoutineService>> =
            match (config.routine_enabled, &config.gemini_api_key) {
                (true, Some(api_key)) => {
                    info!("Routine provider: Gemini (model: {})", config.routine_model);
                    Some(Box::new(GeminiRoutineClient::new_with_client(
                        api_key.clone(),
                        config.routine_model.clone(),
                        http_client.clone(),
                    )))
                }
                _ => {
                    info!("Routine generation disabled");
                    None
                }
            };

        Self::with_services(GatewayServices {
            inference: Box::new(InferenceClient::from_env_with_client(http_client)),
            routine,
        })
    }

    /// Construct a gateway from environment configuration (`Config::from_env`).
    pub fn from_env() -> Self {
        Self::from_config(&Config::from_env())
    }

    pub fn routine_enabled(&self) -> bool {
        self.routine.is_some()
    }

    /// Analyze one image. Never returns a raw error: every failure becomes
    /// [`AnalysisOutcome::Failure`] with a user-facing message.
    pub async fn analyze(&self, photo_data_uri: &str) -> AnalysisOutcome {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("analyze", %request_id);

        async {
            match self.run(photo_data_uri).await {
                Ok(success) => {
                    info!(
                        "Analysis succeeded with {} predictions",
                        success.predictions.len()
                    );
                    AnalysisOutcome::Success(success)
                }
                Err(e) => {
                    error!("Error during image analysis: {}", e);
                    AnalysisOutcome::Failure(AnalysisFailure::from(&e))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, photo_data_uri: &str) -> Result<AnalysisSuccess> {
        let image = DataUri::parse(photo_data_uri)?;

        let predictions = self.inference.predict(&image).await?;

        let Some(top) = top_prediction(&predictions) else {
            return Err(Error::NoConditions);
        };
        info!(
            "Top prediction: {} ({:.3})",
            top.condition, top.probability
        );

        let recommendations = match &self.routine {
            Some(routine) => routine
                .generate_routine(&top.condition, top.probability)
                .await
                .unwrap_or_else(|e| {
                    warn!("Routine generation failed, returning no recommendations: {}", e);
                    String::new()
                }),
            None => String::new(),
        };

        Ok(AnalysisSuccess {
            predictions,
            recommendations,
        })
    }
}

/// The prediction with the highest probability.
///
/// Ties go to the first one encountered; callers should not rely on that.
pub fn top_prediction(predictions: &[Prediction]) -> Option<&Prediction> {
    predictions.iter().fold(None, |best, p| match best {
        Some(b) if b.probability >= p.probability => Some(b),
        _ => Some(p),
    })
}
