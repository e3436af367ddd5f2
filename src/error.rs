//! Error handling and custom error types
//!
//! Provides unified error handling across the gateway using thiserror, plus
//! the mapping from internal errors to the messages a user is allowed to see.

use crate::models::{AnalysisFailure, FailureKind};
use thiserror::Error;

pub const NO_IMAGE_MESSAGE: &str = "No image data provided.";
pub const MALFORMED_IMAGE_MESSAGE: &str =
    "The image must be provided as a base64-encoded data URI.";
pub const UNREADABLE_IMAGE_MESSAGE: &str = "Could not read the image file.";
pub const CONFIG_MESSAGE: &str =
    "The analysis service is not configured. Please set PYTHON_API_URL.";
pub const TRANSPORT_MESSAGE: &str =
    "Could not connect to the analysis model. Please ensure the Python server is running and try a different photo.";
pub const FORMAT_MESSAGE: &str = "Received invalid data format from the analysis model.";
pub const NO_CONDITIONS_MESSAGE: &str =
    "Could not analyze the image. The AI was unable to identify any conditions. Please try a different photo.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No image data provided")]
    MissingImage,

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Analysis model unreachable: {0}")]
    Transport(String),

    #[error("Invalid analysis response: {0}")]
    Format(String),

    #[error("Analysis returned no conditions")]
    NoConditions,

    #[error("AI provider error: {0}")]
    AiProvider(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Classifies the error into one of the user-visible failure kinds.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::MissingImage | Error::InvalidDataUri(_) | Error::Io(_) => FailureKind::Input,
            Error::Config(_) => FailureKind::Config,
            Error::Http(_) | Error::Transport(_) | Error::AiProvider(_) => FailureKind::Transport,
            Error::Serialization(_) | Error::Format(_) | Error::NoConditions => FailureKind::Format,
        }
    }

    /// The message shown to the user. Backend details never leak through here.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::MissingImage => NO_IMAGE_MESSAGE,
            Error::InvalidDataUri(_) => MALFORMED_IMAGE_MESSAGE,
            Error::Io(_) => UNREADABLE_IMAGE_MESSAGE,
            Error::Config(_) => CONFIG_MESSAGE,
            Error::Http(_) | Error::Transport(_) | Error::AiProvider(_) => TRANSPORT_MESSAGE,
            Error::Serialization(_) | Error::Format(_) => FORMAT_MESSAGE,
            Error::NoConditions => NO_CONDITIONS_MESSAGE,
        }
    }
}

impl From<&Error> for AnalysisFailure {
    fn from(err: &Error) -> Self {
        AnalysisFailure {
            error: err.user_message().to_string(),
            kind: err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_image_maps_to_input_failure() {
        let failure = AnalysisFailure::from(&Error::MissingImage);
        assert_eq!(failure.kind, FailureKind::Input);
        assert_eq!(failure.error, "No image data provided.");
    }

    #[test]
    fn test_transport_message_hides_backend_detail() {
        let err = Error::Transport("status 500: Traceback (most recent call last)".to_string());
        let failure = AnalysisFailure::from(&err);
        assert_eq!(failure.kind, FailureKind::Transport);
        assert!(!failure.error.contains("Traceback"));
    }

    #[test]
    fn test_format_and_transport_messages_differ() {
        assert_ne!(
            Error::Format("bad".to_string()).user_message(),
            Error::Transport("down".to_string()).user_message()
        );
    }

    #[test]
    fn test_no_conditions_is_a_format_failure() {
        assert_eq!(Error::NoConditions.kind(), FailureKind::Format);
        assert!(Error::NoConditions
            .user_message()
            .contains("unable to identify any conditions"));
    }

    #[test]
    fn test_io_error_is_input_failure_with_own_message() {
        let err = Error::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "/photos/face.jpg",
        ));
        let failure = AnalysisFailure::from(&err);
        assert_eq!(failure.kind, FailureKind::Input);
        assert_eq!(failure.error, "Could not read the image file.");
        assert!(!failure.error.contains("face.jpg"));
    }

    #[test]
    fn test_config_error_kind() {
        let err = Error::Config("PYTHON_API_URL environment variable is not set".to_string());
        assert_eq!(err.kind(), FailureKind::Config);
    }
}
