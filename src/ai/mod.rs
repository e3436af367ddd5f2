//! AI service integration for skin analysis
//!
//! Provides the interface to the external Python inference endpoint that
//! classifies skin conditions, and to the text-generation service that turns
//! the top prediction into a routine recommendation.

pub mod gemini;
pub mod inference;
pub mod mock;

pub use gemini::GeminiRoutineClient;
pub use inference::InferenceClient;
pub use mock::{MockInferenceClient, MockRoutineClient};

use crate::data_uri::DataUri;
use crate::models::Prediction;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Returns the validated predictions for the image, in upstream order.
    async fn predict(&self, image: &DataUri) -> Result<Vec<Prediction>>;
}

#[async_trait]
pub trait RoutineService: Send + Sync {
    async fn generate_routine(&self, condition: &str, probability: f64) -> Result<String>;
}
